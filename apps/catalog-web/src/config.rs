use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_catalog::{CatalogConfig, UploadsConfig};

pub use core_config::Environment;

/// Everything the catalog server reads from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub uploads: UploadsConfig,
    pub catalog: CatalogConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            uploads: UploadsConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongodb_url_is_required() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("tienda")),
                ("UPLOADS_PATH", Some("/var/lib/catalog/img")),
                ("PORT", Some("9090")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database(), "tienda");
                assert_eq!(config.server.port, 9090);
                assert_eq!(
                    config.uploads.path,
                    std::path::PathBuf::from("/var/lib/catalog/img")
                );
            },
        );
    }
}
