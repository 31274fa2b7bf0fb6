use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use derive_more::Display;
use log::{error, info, warn};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use config::CoinGeckoConfig;

use crate::coingecko::CoingeckoClientError::RequestFailed;
use crate::TokenPriceProvider;

const VS_CURRENCY: &str = "usd";

#[derive(Debug)]
pub struct CoingeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoingeckoClient {
    pub fn new(
        CoinGeckoConfig { base_url }: &CoinGeckoConfig,
    ) -> Result<Self, CoingeckoClientError> {
        let client = reqwest::Client::builder().build()?;

        Ok(CoingeckoClient { base_url: base_url.trim_end_matches('/').to_string(), client })
    }
}

impl TokenPriceProvider for CoingeckoClient {
    type Error = CoingeckoClientError;

    async fn get_token_prices(
        &self,
        coingecko_ids: &[String],
    ) -> Result<HashMap<String, BigDecimal>, Self::Error> {
        info!("Fetching token prices for {} ids", coingecko_ids.len());

        let ids = coingecko_ids.join(",");
        let response = self
            .client
            .get(format!("{}/simple/price", self.base_url))
            .query(&[("ids", ids.as_str()), ("vs_currencies", VS_CURRENCY)])
            .send()
            .await?;

        if !response.status().is_success() {
            error!("CoinGecko /simple/price Request failed with status: {}", response.status());
            return Err(RequestFailed(response.status()));
        }

        let raw_text = response.text().await?;

        let response: SimplePriceResponse = serde_json::from_str(&raw_text)
            .map_err(|err| CoingeckoClientError::DeserialisationError(raw_text, err))?;

        let mut prices = HashMap::new();
        for (id, quote) in response {
            match quote.usd.as_ref().and_then(parse_usd_quote) {
                Some(price) => {
                    prices.insert(id, price);
                }
                None => warn!("Unusable USD quote for {}: {:?}", id, quote.usd),
            }
        }

        info!("Token prices fetched from API: {} of {} ids quoted", prices.len(), coingecko_ids.len());

        Ok(prices)
    }
}

// Numbers arrive as the literal text the API sent; quoted numbers are accepted too
fn parse_usd_quote(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(number) => BigDecimal::from_str(&number.to_string()).ok(),
        Value::String(text) => BigDecimal::from_str(text.trim()).ok(),
        _ => None,
    }
}

#[derive(Debug, Error, Display)]
pub enum CoingeckoClientError {
    #[display("Deserialization Error - Original String {}, Error {}", _0, _1)]
    DeserialisationError(String, serde_json::Error),

    #[display("CoinGecko request failed with status {}", _0)]
    RequestFailed(StatusCode),

    #[display("CoinGecko API call error: {}", _0)]
    ApiCallError(#[from] reqwest::Error),
}

type SimplePriceResponse = HashMap<String, SimplePriceQuote>;

#[derive(Debug, Deserialize)]
struct SimplePriceQuote {
    #[serde(default)]
    usd: Option<Value>,
}
