use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub drafts: DraftStorageConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::from_str(&var_or("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", "info"),
            },
            drafts: DraftStorageConfig::from_env()?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = var_or("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        Ok(Self {
            host: var_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where saved drafts live. `None` keeps them in process memory.
#[derive(Debug, Clone, Default)]
pub struct DraftStorageConfig {
    pub directory: Option<PathBuf>,
}

impl DraftStorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directory = match env::var("PORTAL_DRAFT_DIR") {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ConfigError::EmptyDraftDirectory);
                }
                Some(PathBuf::from(trimmed))
            }
            Err(_) => None,
        };
        Ok(Self { directory })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyDraftDirectory,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ConfigError::InvalidPort => "APP_PORT must be a port number between 0 and 65535",
            ConfigError::InvalidHost { .. } => "APP_HOST must be localhost or an IP address",
            ConfigError::EmptyDraftDirectory => "PORTAL_DRAFT_DIR must not be blank when set",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, PoisonError};

    const KEYS: [&str; 5] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "PORTAL_DRAFT_DIR",
    ];

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Runs `check` with exactly `vars` set among the keys this module reads.
    fn with_env<R>(vars: &[(&str, &str)], check: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        KEYS.iter().for_each(|key| env::remove_var(key));
        vars.iter().for_each(|(key, value)| env::set_var(key, value));
        let result = check();
        KEYS.iter().for_each(|key| env::remove_var(key));
        result
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = with_env(&[], AppConfig::load).expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.drafts.directory.is_none());
    }

    #[test]
    fn localhost_binds_loopback() {
        let config = with_env(&[("APP_HOST", "localhost"), ("APP_PORT", "8088")], AppConfig::load)
            .expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8088));
    }

    #[test]
    fn hostnames_other_than_localhost_are_rejected() {
        let config = with_env(&[("APP_HOST", "portal.internal")], AppConfig::load)
            .expect("host is only checked when binding");
        assert!(matches!(
            config.server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let result = with_env(&[("APP_PORT", "http")], AppConfig::load);
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
    }

    #[test]
    fn draft_directory_and_environment_are_read() {
        let config = with_env(
            &[("APP_ENV", "ci"), ("PORTAL_DRAFT_DIR", " /var/lib/portal/drafts ")],
            AppConfig::load,
        )
        .expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.drafts.directory,
            Some(PathBuf::from("/var/lib/portal/drafts"))
        );

        let blank = with_env(&[("PORTAL_DRAFT_DIR", "   ")], AppConfig::load);
        assert!(matches!(blank, Err(ConfigError::EmptyDraftDirectory)));
    }
}
