use std::collections::HashMap;
use std::error::Error;
use std::fmt::Debug;

use bigdecimal::BigDecimal;

pub use coingecko::{CoingeckoClient, CoingeckoClientError};
pub use scaled::{ScalePriceError, ScaledPrice};

mod coingecko;
pub mod scaled;
pub mod snippet;
pub mod utils;


pub trait TokenPriceProvider: Debug {
    type Error: Error + Debug;

    /// Quotes every id in a single call. Ids without a usable USD quote are left out of the
    /// returned map.
    async fn get_token_prices(
        &self,
        coingecko_ids: &[String],
    ) -> Result<HashMap<String, BigDecimal>, Self::Error>;
}
