use core_config::{ConfigError, Environment, FromEnv};
use database::mongodb::MongoConfig;

/// Application configuration
/// Composes shared config components from `core_config` and `database`
#[derive(Clone, Debug)]
pub struct Config {
    pub mongo: MongoConfig,
    pub environment: Environment,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mongo: MongoConfig::from_env()?, // Falls back to mongodb://localhost:27017/wow-items
            environment: Environment::from_env(),
        })
    }
}
