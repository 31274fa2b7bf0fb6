use std::ops::Deref;

use derive_more::{Display, From, Into};
use serde::Deserialize;
use serde_valid::yaml::FromYamlStr;
use serde_valid::{UniqueItemsError, Validate, ValidateUniqueItems};

// Token table compiled into the binary
const EMBEDDED_CONFIG: &str = include_str!("../tokens/tokens.yaml");

// Config Type
#[derive(Debug, Clone)]
pub struct Config {
    // CoinGecko API configuration
    pub coingecko: CoinGeckoConfig,
    // Tokens in the order their snippet lines are emitted
    pub tokens: Vec<TokenEntry>,
}

impl Config {
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml_str(EMBEDDED_CONFIG)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let raw_config = RawConfig::from_yaml_str(s)?;

        if raw_config.tokens.is_empty() {
            return Err(ConfigError::EmptyTokenTable);
        }

        for token in raw_config.tokens.iter() {
            if let Err(e) = token.validate() {
                return Err(ConfigError::InvalidToken(token.symbol.clone(), e));
            }
        }

        Ok(Config { coingecko: raw_config.coingecko, tokens: raw_config.tokens.0 })
    }

    // Provider ids in table order, each requested once
    pub fn coingecko_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.tokens.iter().filter_map(|t| t.coingecko_id.as_ref()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

#[derive(Debug, From, Display)]
pub enum ConfigError {
    #[display("Token table is empty")]
    #[from(ignore)]
    EmptyTokenTable,

    #[display("Invalid token {}: {}", _0, _1)]
    #[from(ignore)]
    InvalidToken(String, serde_valid::validation::Errors),

    #[display("Serde Error: {}", _0)]
    SerdeError(serde_valid::Error<serde_yaml::Error>),
}

impl std::error::Error for ConfigError {}

// Intermediate Config Type as Deserialization Target
#[derive(Debug, Deserialize, From, Into)]
pub struct TokenEntries(Vec<TokenEntry>);

impl ValidateUniqueItems for TokenEntries {
    fn validate_unique_items(&self) -> Result<(), UniqueItemsError> {
        self.iter().map(|t| t.symbol.clone()).collect::<Vec<_>>().validate_unique_items()
    }
}

impl Deref for TokenEntries {
    type Target = Vec<TokenEntry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawConfig {
    #[validate]
    pub coingecko: CoinGeckoConfig,
    #[validate(unique_items)]
    pub tokens: TokenEntries,
}

#[derive(Debug, Deserialize, Validate, Clone, PartialEq)]
pub struct TokenEntry {
    // The token symbol
    #[validate(pattern = r"^[A-Z0-9]+$")]
    pub symbol: String,
    // The token address, emitted verbatim
    #[validate(min_length = 1)]
    pub address: String,
    // The id of the token in CoinGecko API; tokens without one are never priced
    #[validate(min_length = 1)]
    #[serde(default)]
    pub coingecko_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CoinGeckoConfig {
    // The base URL of the CoinGecko API
    #[validate(
        pattern = r"https?:\/\/(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&//=]*)"
    )]
    pub base_url: String,
}

pub fn get_sample_config() -> Config {
    Config::embedded().unwrap()
}
