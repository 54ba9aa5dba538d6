use serde::{Deserialize, Serialize};
use tracing::{info, error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// CORS allowed origins, comma separated
    pub cors_origins: Option<String>,

    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// HS256 secret used to validate bearer tokens
    pub auth_jwt_secret: Option<String>,

    /// Largest websocket message accepted, in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Room whose awareness traffic is decoded and classified
    #[serde(default = "default_global_awareness_room")]
    pub global_awareness_room: String,

    /// Seconds per connected client before an unrefreshed lock goes stale
    #[serde(default = "default_lock_window_secs")]
    pub lock_window_secs: u32,
}

/// The part of the configuration every connection session needs.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub global_awareness_room: String,
    pub lock_window_secs: i64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            global_awareness_room: default_global_awareness_room(),
            lock_window_secs: i64::from(default_lock_window_secs()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        match envy::from_env::<Config>() {
            Ok(config) => {
                info!("✅ Configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    /// Tracing filter used when RUST_LOG is not set
    pub fn log_filter(&self) -> String {
        format!("yjs_relay=debug,tower_http=debug,axum::rejection=trace,{}", self.log_level)
    }

    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            global_awareness_room: self.global_awareness_room.clone(),
            lock_window_secs: i64::from(self.lock_window_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: None,
            log_level: default_log_level(),
            service_name: default_service_name(),
            auth_jwt_secret: None,
            max_message_size: default_max_message_size(),
            global_awareness_room: default_global_awareness_room(),
            lock_window_secs: default_lock_window_secs(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "yjs-relay".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_max_message_size() -> usize {
    1024 * 1024 * 1024
}

fn default_global_awareness_room() -> String {
    "JupyterLab:globalAwareness".to_string()
}

fn default_lock_window_secs() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_relay_protocol() {
        let config = Config::default();
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert!(config.is_development());
        assert_eq!(config.log_level, "info");
        assert!(config.log_filter().ends_with(",info"));

        let settings = config.relay_settings();
        assert_eq!(settings.global_awareness_room, "JupyterLab:globalAwareness");
        assert_eq!(settings.lock_window_secs, 10);
    }

    #[test]
    fn reads_overrides_from_variables() {
        let vars = vec![
            ("port".to_string(), "8888".to_string()),
            ("environment".to_string(), "production".to_string()),
            ("auth_jwt_secret".to_string(), "s3cret".to_string()),
            ("lock_window_secs".to_string(), "3".to_string()),
            ("log_level".to_string(), "warn".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 8888);
        assert!(!config.is_development());
        assert_eq!(config.auth_jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.relay_settings().lock_window_secs, 3);
        assert_eq!(config.max_message_size, 1024 * 1024 * 1024);
        assert_eq!(config.log_filter(), "yjs_relay=debug,tower_http=debug,axum::rejection=trace,warn");
    }
}
