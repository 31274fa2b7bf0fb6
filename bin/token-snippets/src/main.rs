use log::{error, info, LevelFilter};

use config::Config;
use token_price::snippet::render_token_configs;
use token_price::utils::fetch_prices;
use token_price::CoingeckoClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    simple_logger::SimpleLogger::new().with_level(LevelFilter::Warn).init().unwrap();

    let config = Config::embedded().expect("Failed to load embedded token table");

    let token_price_provider =
        CoingeckoClient::new(&config.coingecko).expect("Failed to Instantiate CoinGecko Client");

    let prices = match fetch_prices(&config, &token_price_provider).await {
        Ok(prices) => prices,
        Err(e) => {
            error!("Fetching token prices failed: {}", e);
            std::process::exit(1);
        }
    };

    for line in render_token_configs(&config.tokens, &prices) {
        println!("{}", line);
    }

    info!("Rendered {} token configs", config.tokens.len());
}
