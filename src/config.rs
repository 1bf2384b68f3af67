//! SDK Configuration
//!
//! Gas tuning and logging settings with:
//! - Protocol defaults matching the Sui reference SDKs
//! - JSON file loading
//! - `SUI_SDK_*` environment overrides
//! - Validation of settings

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SuiError, SuiResult};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SUI_SDK_";

/// Gas auto-configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    /// Placeholder budget used for dry runs
    pub max_gas_budget: u64,
    /// Extra gas units priced in on top of the dry-run computation cost
    pub gas_safe_overhead: u64,
    /// Added to the reference gas price when no price is set
    pub gas_price_bump: u64,
    /// Coin type used for gas payment
    pub gas_coin_type: String,
    /// Page size for `get_coins`
    pub coin_page_limit: usize,
    /// Protocol cap on gas payment objects
    pub max_payment_coins: usize,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_gas_budget: 50_000_000_000,
            gas_safe_overhead: 1_000,
            gas_price_bump: 1,
            gas_coin_type: "0x2::sui::SUI".to_string(),
            coin_page_limit: 50,
            max_payment_coins: 256,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub gas: GasConfig,
    /// `tracing-subscriber` filter directive, e.g. `sui_tx_core=debug`
    pub log_filter: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            gas: GasConfig::default(),
            log_filter: "warn".to_string(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> SuiResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SuiError::Config(format!("{}{} has invalid value `{}`", ENV_PREFIX, key, value)))
}

impl SdkConfig {
    pub fn from_json_str(json: &str) -> SuiResult<Self> {
        let config: SdkConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SuiResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SuiError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    /// Apply `SUI_SDK_*` overrides from `(name, value)` pairs. Unknown
    /// names are ignored.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> SuiResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in vars {
            let Some(key) = name.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();
            match key {
                "MAX_GAS_BUDGET" => self.gas.max_gas_budget = parse_env(key, value)?,
                "GAS_SAFE_OVERHEAD" => self.gas.gas_safe_overhead = parse_env(key, value)?,
                "GAS_PRICE_BUMP" => self.gas.gas_price_bump = parse_env(key, value)?,
                "GAS_COIN_TYPE" => self.gas.gas_coin_type = value.trim().to_string(),
                "COIN_PAGE_LIMIT" => self.gas.coin_page_limit = parse_env(key, value)?,
                "MAX_PAYMENT_COINS" => self.gas.max_payment_coins = parse_env(key, value)?,
                "LOG" => self.log_filter = value.trim().to_string(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Defaults, then the optional JSON file, then the process environment
    pub fn load(path: Option<&Path>) -> SuiResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(SuiError::Config(errors.join("; ")));
        }
        Ok(config)
    }

    /// Validate settings consistency
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let gas = &self.gas;

        if gas.max_gas_budget == 0 {
            errors.push("max_gas_budget must be positive".to_string());
        }

        if gas.coin_page_limit == 0 {
            errors.push("coin_page_limit must be positive".to_string());
        }

        if gas.max_payment_coins == 0 || gas.max_payment_coins > 256 {
            errors.push("max_payment_coins must be within 1..=256".to_string());
        }

        if gas.gas_coin_type.split("::").count() != 3 {
            errors.push(format!(
                "gas_coin_type `{}` is not a fully qualified type",
                gas.gas_coin_type
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SdkConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.gas.max_gas_budget, 50_000_000_000);
        assert_eq!(config.gas.gas_safe_overhead, 1_000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SdkConfig::from_json_str(r#"{"gas": {"gas_price_bump": 5}}"#).unwrap();
        assert_eq!(config.gas.gas_price_bump, 5);
        assert_eq!(config.gas.coin_page_limit, 50);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SdkConfig::default();
        config
            .apply_env([
                ("SUI_SDK_MAX_GAS_BUDGET", "1000"),
                ("SUI_SDK_LOG", "debug"),
                ("HOME", "/root"),
            ])
            .unwrap();
        assert_eq!(config.gas.max_gas_budget, 1000);
        assert_eq!(config.log_filter, "debug");

        let err = config.apply_env([("SUI_SDK_COIN_PAGE_LIMIT", "many")]).unwrap_err();
        assert!(err.to_string().contains("SUI_SDK_COIN_PAGE_LIMIT"));
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let mut config = SdkConfig::default();
        config.gas.max_gas_budget = 0;
        config.gas.max_payment_coins = 1000;
        config.gas.gas_coin_type = "SUI".to_string();
        assert_eq!(config.validate().len(), 3);
    }
}
