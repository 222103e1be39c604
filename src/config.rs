/*
 * Responsibility
 * - Environment / .env configuration with validation at startup
 * - Missing or invalid settings fail the boot, not the first request
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub keys_dir: PathBuf,
    pub active_kid: String,
    pub shutdown_grace: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let keys_dir = PathBuf::from(
            std::env::var("AUTH_KEYS_DIR").unwrap_or_else(|_| "zarf/keys".to_string()),
        );

        let active_kid =
            std::env::var("AUTH_ACTIVE_KID").unwrap_or_else(|_| "private".to_string());
        if active_kid.is_empty() {
            return Err(ConfigError::Invalid("AUTH_ACTIVE_KID"));
        }

        let shutdown_grace = Duration::from_secs(
            std::env::var("SHUTDOWN_GRACE_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(20),
        );

        Ok(Self {
            addr,
            keys_dir,
            active_kid,
            shutdown_grace,
        })
    }
}
