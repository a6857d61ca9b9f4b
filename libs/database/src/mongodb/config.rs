#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};

/// MongoDB connection settings
///
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "catalog")
///     .with_app_name("catalog-web");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[user:pass@]host[:port][/db][?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server in its connection logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, max: u32, min: u32) -> Self {
        self.max_pool_size = max;
        self.min_pool_size = min;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "catalog".to_string(),
            app_name: None,
            max_pool_size: 50,
            min_pool_size: 2,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
        }
    }
}

/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default `catalog`)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` / `MONGODB_MIN_POOL_SIZE` (default 50 / 2)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` / `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default 10 / 10)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("MONGODB_URL").or_else(|_| env_required("MONGO_URL"))?;
        let database = std::env::var("MONGODB_DATABASE")
            .unwrap_or_else(|_| env_or_default("MONGO_DATABASE", "catalog"));
        let app_name = std::env::var("MONGODB_APP_NAME").ok();

        let defaults = Self::default();
        Ok(Self {
            url,
            database,
            app_name,
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
            connect_timeout_secs: env_parse_or(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_database_keeps_pool_defaults() {
        let config = MongoConfig::with_database("mongodb://db:27017", "tienda");
        assert_eq!(config.url(), "mongodb://db:27017");
        assert_eq!(config.database(), "tienda");
        assert_eq!(config.max_pool_size, 50);
        assert!(config.app_name.is_none());
    }

    #[test]
    fn test_builders() {
        let config = MongoConfig::new("mongodb://localhost:27017")
            .with_app_name("catalog-web")
            .with_pool_size(10, 1);
        assert_eq!(config.database(), "catalog");
        assert_eq!(config.app_name.as_deref(), Some("catalog-web"));
        assert_eq!((config.max_pool_size, config.min_pool_size), (10, 1));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_falls_back_to_mongo_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None),
                ("MONGO_URL", Some("mongodb://fallback:27017")),
                ("MONGODB_DATABASE", None),
                ("MONGO_DATABASE", Some("tienda")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url(), "mongodb://fallback:27017");
                assert_eq!(config.database(), "tienda");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_requires_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            let err = MongoConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGO_URL"));
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_rejects_bad_pool_size() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_MAX_POOL_SIZE", Some("lots")),
            ],
            || {
                assert!(MongoConfig::from_env().is_err());
            },
        );
    }
}
