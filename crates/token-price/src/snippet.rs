use std::collections::HashMap;

use bigdecimal::BigDecimal;
use log::warn;

use config::TokenEntry;

use crate::ScaledPrice;

/// Decimals argument written into every `TokenConfig` line.
pub const TOKEN_DECIMALS: u8 = 18;

pub fn render_token_config(token: &TokenEntry, price: &ScaledPrice) -> String {
    format!(
        "tokens.push(TokenConfig(\"{}\", {}, {}, {}));",
        token.symbol, token.address, price, TOKEN_DECIMALS
    )
}

/// One line per token, in table order.
pub fn render_token_configs(
    tokens: &[TokenEntry],
    prices: &HashMap<String, Option<BigDecimal>>,
) -> Vec<String> {
    tokens
        .iter()
        .map(|token| {
            let price = prices.get(&token.symbol).and_then(Option::as_ref);
            let scaled = ScaledPrice::from_price(price).unwrap_or_else(|err| {
                warn!("Cannot scale price for {}: {}", token.symbol, err);
                ScaledPrice::Absent
            });
            render_token_config(token, &scaled)
        })
        .collect()
}
