use std::collections::HashMap;
use std::fmt::Debug;

use bigdecimal::BigDecimal;
use log::{info, warn};
use thiserror::Error;

use config::Config;

use crate::TokenPriceProvider;

/// Prices every token in `config` with a single provider call.
///
/// Every token symbol is present in the result. The price is `None` when the token has no
/// CoinGecko id or when the provider returned no usable quote for it.
pub async fn fetch_prices<'config, T: TokenPriceProvider>(
    config: &'config Config,
    token_price_provider: &'config T,
) -> Result<HashMap<String, Option<BigDecimal>>, FetchPricesError<T::Error>> {
    let coingecko_ids = config.coingecko_ids();

    let quotes = if coingecko_ids.is_empty() {
        info!("No token has a CoinGecko id, skipping price request");
        HashMap::new()
    } else {
        token_price_provider
            .get_token_prices(&coingecko_ids)
            .await
            .map_err(FetchPricesError::<T::Error>::TokenPriceProviderError)?
    };

    let mut prices = HashMap::new();
    for token in config.tokens.iter() {
        let price = match &token.coingecko_id {
            Some(coingecko_id) => {
                let price = quotes.get(coingecko_id).cloned();
                if price.is_none() {
                    warn!("No USD price returned for {} ({})", token.symbol, coingecko_id);
                }
                price
            }
            None => {
                warn!("No CoinGecko id configured for {}", token.symbol);
                None
            }
        };
        prices.insert(token.symbol.clone(), price);
    }

    Ok(prices)
}

#[derive(Debug, Error)]
pub enum FetchPricesError<T: Debug> {
    #[error("Token price provider error: {0:?}")]
    TokenPriceProviderError(T),
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fmt::Error;
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use config::{CoinGeckoConfig, Config, TokenEntry};

    use crate::utils::{fetch_prices, FetchPricesError};
    use crate::TokenPriceProvider;

    fn token(symbol: &str, coingecko_id: Option<&str>) -> TokenEntry {
        TokenEntry {
            symbol: symbol.to_string(),
            address: format!("0x{}", symbol.to_lowercase()),
            coingecko_id: coingecko_id.map(String::from),
        }
    }

    fn setup(tokens: Vec<TokenEntry>) -> Config {
        Config {
            coingecko: CoinGeckoConfig { base_url: "https://api.coingecko.com/api/v3".to_string() },
            tokens,
        }
    }

    #[derive(Debug, Default)]
    struct TokenPriceProviderStub {
        quotes: HashMap<String, BigDecimal>,
        fail: bool,
        requests: RefCell<Vec<Vec<String>>>,
    }

    impl TokenPriceProviderStub {
        fn with_quotes(quotes: &[(&str, &str)]) -> Self {
            TokenPriceProviderStub {
                quotes: quotes
                    .iter()
                    .map(|(id, price)| (id.to_string(), BigDecimal::from_str(price).unwrap()))
                    .collect(),
                ..Default::default()
            }
        }
    }

    impl TokenPriceProvider for TokenPriceProviderStub {
        type Error = Error;

        async fn get_token_prices(
            &self,
            coingecko_ids: &[String],
        ) -> Result<HashMap<String, BigDecimal>, Self::Error> {
            self.requests.borrow_mut().push(coingecko_ids.to_vec());
            if self.fail {
                return Err(Error);
            }
            Ok(self.quotes.clone())
        }
    }

    #[tokio::test]
    async fn test_fetch_prices_single_request() {
        let config = setup(vec![
            token("LTC", Some("litecoin")),
            token("FOO", None),
            token("XRP", Some("ripple")),
        ]);
        let provider = TokenPriceProviderStub::with_quotes(&[("litecoin", "2.5"), ("ripple", "0.5")]);

        let prices = fetch_prices(&config, &provider).await.unwrap();

        assert_eq!(
            *provider.requests.borrow(),
            vec![vec!["litecoin".to_string(), "ripple".to_string()]]
        );
        assert_eq!(prices.len(), 3);
        assert_eq!(prices["LTC"], Some(BigDecimal::from_str("2.5").unwrap()));
        assert_eq!(prices["XRP"], Some(BigDecimal::from_str("0.5").unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_prices_unmapped_symbol_is_absent() {
        // The provider quotes an id that happens to match the symbol; it must still be ignored
        let config = setup(vec![token("LTC", Some("litecoin")), token("FOO", None)]);
        let provider = TokenPriceProviderStub::with_quotes(&[("litecoin", "2.5"), ("FOO", "1")]);

        let prices = fetch_prices(&config, &provider).await.unwrap();

        assert_eq!(prices["FOO"], None);
    }

    #[tokio::test]
    async fn test_fetch_prices_missing_quote_is_absent() {
        let config = setup(vec![token("LTC", Some("litecoin")), token("KAS", Some("kaspa"))]);
        let provider = TokenPriceProviderStub::with_quotes(&[("litecoin", "2.5")]);

        let prices = fetch_prices(&config, &provider).await.unwrap();

        assert_eq!(prices["KAS"], None);
        assert!(prices["LTC"].is_some());
    }

    #[tokio::test]
    async fn test_fetch_prices_empty_response() {
        let config = setup(vec![token("LTC", Some("litecoin")), token("KAS", Some("kaspa"))]);
        let provider = TokenPriceProviderStub::default();

        let prices = fetch_prices(&config, &provider).await.unwrap();

        assert_eq!(prices.len(), 2);
        assert!(prices.values().all(Option::is_none));
    }

    #[tokio::test]
    async fn test_fetch_prices_without_ids_skips_request() {
        let config = setup(vec![token("FOO", None), token("BAR", None)]);
        let provider = TokenPriceProviderStub::default();

        let prices = fetch_prices(&config, &provider).await.unwrap();

        assert!(provider.requests.borrow().is_empty());
        assert_eq!(prices.len(), 2);
        assert!(prices.values().all(Option::is_none));
    }

    #[tokio::test]
    async fn test_fetch_prices_propagates_provider_error() {
        let config = setup(vec![token("LTC", Some("litecoin"))]);
        let provider = TokenPriceProviderStub { fail: true, ..Default::default() };

        let result = fetch_prices(&config, &provider).await;

        assert!(matches!(result, Err(FetchPricesError::TokenPriceProviderError(Error))));
    }
}
