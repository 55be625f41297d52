use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Request buffer of every collection and counter actor.
    pub mailbox_capacity: usize,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 32,
            log_filter: "info".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let mailbox_capacity = match var("CATALOG_MAILBOX_CAPACITY") {
            Some(raw) => raw
                .parse()
                .context("CATALOG_MAILBOX_CAPACITY must be a valid number")?,
            None => defaults.mailbox_capacity,
        };

        let config = Self {
            mailbox_capacity,
            log_filter: var("CATALOG_LOG").unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the actors cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.mailbox_capacity > 0, "mailbox capacity must be at least 1");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        assert_eq!(CatalogConfig::from_vars(vars(&[])).unwrap(), CatalogConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = CatalogConfig::from_vars(vars(&[
            ("CATALOG_MAILBOX_CAPACITY", "128"),
            ("CATALOG_LOG", "catalog_store=debug"),
        ]))
        .unwrap();
        assert_eq!(config.mailbox_capacity, 128);
        assert_eq!(config.log_filter, "catalog_store=debug");
    }

    #[test]
    fn invalid_capacity_is_rejected() {
        let err = CatalogConfig::from_vars(vars(&[("CATALOG_MAILBOX_CAPACITY", "lots")])).unwrap_err();
        assert!(err.to_string().contains("CATALOG_MAILBOX_CAPACITY"));
        assert!(CatalogConfig::from_vars(vars(&[("CATALOG_MAILBOX_CAPACITY", "0")])).is_err());
    }

    #[test]
    fn hand_built_zero_capacity_fails_validation() {
        let config = CatalogConfig {
            mailbox_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(CatalogConfig::default().validate().is_ok());
    }
}
