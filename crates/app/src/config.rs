//! Environment-based configuration.
//!
//! | variable                    | default | meaning                          |
//! |-----------------------------|---------|----------------------------------|
//! | `PARTQUOTE_CURRENCY_SYMBOL` | `R$`    | prefix for displayed amounts     |
//! | `PARTQUOTE_LOG`             | `info`  | filter used when `RUST_LOG` unset |
//! | `PARTQUOTE_LOG_FORMAT`      | `json`  | `json`, `pretty` or `text`       |

use thiserror::Error;

use partquote_observability::{LogFormat, LogSettings};

pub const CURRENCY_SYMBOL_VAR: &str = "PARTQUOTE_CURRENCY_SYMBOL";
pub const LOG_FILTER_VAR: &str = "PARTQUOTE_LOG";
pub const LOG_FORMAT_VAR: &str = "PARTQUOTE_LOG_FORMAT";

const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub currency_symbol: String,
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_VAR) {
            config.currency_symbol = parse_currency_symbol(CURRENCY_SYMBOL_VAR, &symbol)?;
        }

        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            if filter.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: LOG_FILTER_VAR,
                    value: filter,
                    reason: "filter cannot be empty".to_string(),
                });
            }
            config.log.default_filter = filter;
        }

        if let Some(format) = lookup(LOG_FORMAT_VAR) {
            config.log.format = format
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: LOG_FORMAT_VAR,
                    value: format.clone(),
                    reason,
                })?;
        }

        Ok(config)
    }

    /// Override the currency symbol (e.g. from a CLI flag).
    pub fn with_currency_symbol(mut self, symbol: &str) -> Result<Self, ConfigError> {
        self.currency_symbol = parse_currency_symbol("--currency", symbol)?;
        Ok(self)
    }
}

fn parse_currency_symbol(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let symbol = value.trim();
    if symbol.is_empty() {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "currency symbol cannot be empty".to_string(),
        });
    }
    Ok(symbol.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.currency_symbol, "R$");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn variables_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (CURRENCY_SYMBOL_VAR, " US$ "),
            (LOG_FILTER_VAR, "partquote_quoting=debug"),
            (LOG_FORMAT_VAR, "pretty"),
        ]))
        .unwrap();
        assert_eq!(config.currency_symbol, "US$");
        assert_eq!(config.log.default_filter, "partquote_quoting=debug");
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn invalid_values_are_reported_with_their_key() {
        let err = AppConfig::from_lookup(lookup_from(&[(LOG_FORMAT_VAR, "xml")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, LOG_FORMAT_VAR);
                assert_eq!(value, "xml");
            }
        }

        assert!(AppConfig::from_lookup(lookup_from(&[(CURRENCY_SYMBOL_VAR, "  ")])).is_err());
        assert!(AppConfig::default().with_currency_symbol("").is_err());
    }
}
