use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub jwt_secret: String,
    pub cron_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            mongodb_uri: env::var("MONGODB_URI").map_err(|_| ConfigError::MissingVar("MONGODB_URI"))?,
            database: env::var("MONGODB_DB").unwrap_or_else(|_| "glowcart".to_string()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
            cron_secret: env::var("CRON_SECRET").map_err(|_| ConfigError::MissingVar("CRON_SECRET"))?,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::ConfigError;

    #[test]
    fn errors_name_the_offending_variable() {
        assert_eq!(
            ConfigError::MissingVar("MONGODB_URI").to_string(),
            "Missing environment variable: MONGODB_URI"
        );
        assert_eq!(
            ConfigError::InvalidValue("PORT".to_string()).to_string(),
            "Invalid value for: PORT"
        );
    }
}
