use crate::workflows::checklist::{CatalogError, RequirementCatalog};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime stage the service is deployed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Coloured log output is only useful on a developer terminal.
    pub const fn wants_ansi(self) -> bool {
        matches!(self, Self::Development)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Read settings from the process environment, after loading `.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let raw_port = env::var("APP_PORT").unwrap_or_else(|_| "3000".to_string());
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: raw_port.clone() })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalog_path = env::var("CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment.wants_ansi(),
            },
            catalog: CatalogConfig { path: catalog_path },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                value: self.host.clone(),
                source,
            })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Where document requirements come from. Without a path the built-in catalog is used.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn load_catalog(&self) -> Result<RequirementCatalog, CatalogError> {
        match &self.path {
            Some(path) => RequirementCatalog::from_path(path),
            None => {
                tracing::info!("CATALOG_PATH not set; using built-in requirement catalog");
                Ok(RequirementCatalog::standard())
            }
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{value}' is not a valid port number")
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST '{value}' is not an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort { .. } => None,
            ConfigError::InvalidHost { source, .. } => Some(source),
        }
    }
}
