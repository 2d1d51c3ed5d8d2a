//! Module: config
//! Responsibility: execution limits and policies supplied by the embedding
//! service, loadable from TOML.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

pub const DEFAULT_MAX_PAGE_SIZE: usize = 1_000;
pub const DEFAULT_MAX_FETCH_SIZE: usize = 1_000;
pub const DEFAULT_MAX_CURSOR_LEN: usize = 8 * 1024;

///
/// MalformedColumnPolicy
///
/// What an index scan does with a column that fails to parse.
/// Skipping is opt-in: a silently dropped column breaks merge correctness.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedColumnPolicy {
    #[default]
    Fail,
    SkipAndTrace,
}

///
/// ExecutionConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Upper bound on results per executed page.
    pub max_page_size: usize,

    /// Upper bound on raw columns requested by one store fetch.
    pub max_fetch_size: usize,

    pub malformed_columns: MalformedColumnPolicy,

    /// Upper bound on accepted cursor token length, in hex characters.
    pub max_cursor_len: usize,
}

impl ExecutionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;
        config.validate()?;

        Ok(config)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_page_size",
            });
        }
        if self.max_fetch_size == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_fetch_size",
            });
        }
        if self.max_cursor_len == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_cursor_len",
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_malformed_columns(mut self, policy: MalformedColumnPolicy) -> Self {
        self.malformed_columns = policy;
        self
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            max_fetch_size: DEFAULT_MAX_FETCH_SIZE,
            malformed_columns: MalformedColumnPolicy::Fail,
            max_cursor_len: DEFAULT_MAX_CURSOR_LEN,
        }
    }
}

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid execution config: {message}")]
    Parse { message: String },

    #[error("execution config field '{field}' must be greater than zero")]
    ZeroLimit { field: &'static str },
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ExecutionConfig::from_toml_str("").expect("empty config");

        assert_eq!(config, ExecutionConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = ExecutionConfig::from_toml_str(
            r#"
            max_page_size = 50
            malformed_columns = "skip_and_trace"
            "#,
        )
        .expect("partial config");

        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.max_fetch_size, DEFAULT_MAX_FETCH_SIZE);
        assert_eq!(config.malformed_columns, MalformedColumnPolicy::SkipAndTrace);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = ExecutionConfig::from_toml_str("max_fetch_size = 0").expect_err("zero fetch");

        assert_eq!(
            err,
            ConfigError::ZeroLimit {
                field: "max_fetch_size"
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ExecutionConfig::from_toml_str("max_rows = 10").expect_err("unknown field");

        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
