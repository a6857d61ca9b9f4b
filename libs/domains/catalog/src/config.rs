use core_config::{ConfigError, FromEnv, env_parse_or};
use std::time::Duration;

/// Tuning for the demo listing pages and startup seeding
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// How many times `/listarfull` and `/listarchunked` repeat the catalog
    pub listing_repeat: usize,
    /// Pause before each row of `/listar-datadriver`
    pub element_delay: Duration,
    /// Rows per flushed chunk in `/listar-datadriver`
    pub chunk_size: usize,
    /// Insert sample categories and products into an empty database
    pub seed: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            listing_repeat: 5000,
            element_delay: Duration::from_secs(1),
            chunk_size: 2,
            seed: false,
        }
    }
}

impl FromEnv for CatalogConfig {
    /// - CATALOG_LISTING_REPEAT: defaults to 5000
    /// - CATALOG_LISTING_DELAY_MS: defaults to 1000
    /// - CATALOG_SEED: defaults to false
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let delay_ms = env_parse_or("CATALOG_LISTING_DELAY_MS", 1000u64)?;

        Ok(Self {
            listing_repeat: env_parse_or("CATALOG_LISTING_REPEAT", defaults.listing_repeat)?,
            element_delay: Duration::from_millis(delay_ms),
            chunk_size: defaults.chunk_size,
            seed: env_parse_or("CATALOG_SEED", defaults.seed)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(
            ["CATALOG_LISTING_REPEAT", "CATALOG_LISTING_DELAY_MS", "CATALOG_SEED"],
            || {
                let config = CatalogConfig::from_env().unwrap();
                assert_eq!(config.listing_repeat, 5000);
                assert_eq!(config.element_delay, Duration::from_secs(1));
                assert_eq!(config.chunk_size, 2);
                assert!(!config.seed);
            },
        );
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("CATALOG_LISTING_REPEAT", Some("3")),
                ("CATALOG_LISTING_DELAY_MS", Some("10")),
                ("CATALOG_SEED", Some("true")),
            ],
            || {
                let config = CatalogConfig::from_env().unwrap();
                assert_eq!(config.listing_repeat, 3);
                assert_eq!(config.element_delay, Duration::from_millis(10));
                assert!(config.seed);
            },
        );
    }

    #[test]
    fn test_bad_seed_flag() {
        temp_env::with_var("CATALOG_SEED", Some("si"), || {
            assert!(CatalogConfig::from_env().is_err());
        });
    }
}
