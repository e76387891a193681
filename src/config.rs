use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Application configuration, loaded from defaults, an optional per-environment
/// TOML file and `APP__*` environment variables (later sources win).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: i64,
    pub auth_issuer: String,
    pub auth_audience: String,
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// Run embedded migrations on startup.
    pub auto_migrate: bool,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Loads configuration. `RUN_ENV` selects the optional `config/{env}.toml`
/// overlay (default `development`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        .set_default("database_url", "sqlite::memory:")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)?
        .set_default("jwt_secret", "development-secret-change-me")?
        .set_default("jwt_expiration", 86400)?
        .set_default("auth_issuer", "storefront-api")?
        .set_default("auth_audience", "storefront-clients")?
        .set_default("environment", run_env.clone())?
        .set_default("log_level", "info")?
        .set_default("log_json", false)?
        .set_default("auto_migrate", true)?
        .set_default("db_max_connections", 20)?
        .set_default("db_min_connections", 1)?
        .set_default("db_connect_timeout_secs", 10)?
        .set_default("cors_allowed_origins", vec!["*".to_string()])?
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    if app_config.is_production() && app_config.jwt_secret == "development-secret-change-me" {
        return Err(ConfigError::Message(
            "jwt_secret must be overridden in production".to_string(),
        ));
    }

    Ok(app_config)
}

/// Initializes the global tracing subscriber. `RUST_LOG` overrides the
/// configured level when set.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("storefront_api={0},tower_http={0}", log_level)));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_environment() {
        let config = load_config().expect("defaults should satisfy the schema");
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_expiration, 86400);
        assert!(config.auto_migrate);
        assert!(!config.is_production());
    }
}
