// settings
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;

use thiserror::Error;
use tracing::info;
use url::Url;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_PORT: u16 = 5432;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set; provide the database connection descriptor")]
    MissingDatabaseUrl,

    #[error("malformed connection descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("{0} must be set when MODE=prod")]
    MissingSetting(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// `Prod` refuses to fall back to the development listen address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mode = match get("MODE") {
            Some(mode) if mode.to_lowercase() == "prod" => Mode::Prod,
            _ => Mode::Dev,
        };

        let raw_descriptor = get("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;
        let database_url = parse_connection_descriptor(&raw_descriptor)?;

        let port = match (get("PORT"), mode) {
            (Some(port), _) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value: port })?,
            (None, Mode::Dev) => DEFAULT_PORT,
            (None, Mode::Prod) => return Err(ConfigError::MissingSetting("PORT")),
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "DB_MAX_CONNECTIONS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let host = match (get("HOST"), mode) {
            (Some(host), _) => host,
            (None, Mode::Dev) => DEFAULT_HOST.to_string(),
            (None, Mode::Prod) => return Err(ConfigError::MissingSetting("HOST")),
        };

        // Log which settings are configured (NOT their values!)
        let configured: Vec<&str> = ["MODE", "DATABASE_URL", "HOST", "PORT", "DB_MAX_CONNECTIONS"]
            .into_iter()
            .filter(|key| get(*key).is_some())
            .collect();
        info!("Settings configured: {:?} (mode={:?})", configured, mode);

        Ok(Settings {
            mode,
            database_url,
            host,
            port,
            max_connections,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "HOST",
                value: self.host.clone(),
            })
    }
}

/// Turns the environment-provided connection descriptor into a postgres URL.
///
/// Accepts either a `postgres://` / `postgresql://` URL or the `;`-separated
/// `Server=...;Initial Catalog=...;User ID=...;Password=...` form handed out by
/// cloud portals. Keys of the latter are case-insensitive.
pub fn parse_connection_descriptor(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::MissingDatabaseUrl);
    }

    if raw.contains("://") {
        return validate_url(raw);
    }

    let mut params: HashMap<String, String> = HashMap::new();
    for segment in raw.split(';') {
        if let Some((key, value)) = segment.split_once('=') {
            params.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let server = params
        .get("server")
        .ok_or_else(|| ConfigError::MalformedDescriptor("missing Server".to_string()))?;
    let server = server.strip_prefix("tcp:").unwrap_or(server);
    let (host, port) = match server.split_once(',') {
        Some((host, port)) => {
            let port = port.trim().parse::<u16>().map_err(|_| {
                ConfigError::MalformedDescriptor(format!("invalid port {port:?} in Server"))
            })?;
            (host.trim(), port)
        }
        None => (server.trim(), DEFAULT_DB_PORT),
    };
    if host.is_empty() {
        return Err(ConfigError::MalformedDescriptor("empty host in Server".to_string()));
    }

    let database = params
        .get("initial catalog")
        .or_else(|| params.get("database"))
        .filter(|db| !db.is_empty())
        .ok_or_else(|| ConfigError::MalformedDescriptor("missing Initial Catalog".to_string()))?;
    let username = params
        .get("user id")
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ConfigError::MalformedDescriptor("missing User ID".to_string()))?;
    let password = params.get("password").map(String::as_str).unwrap_or_default();

    let mut url = Url::parse(&format!("postgres://{host}:{port}"))
        .map_err(|e| ConfigError::MalformedDescriptor(e.to_string()))?;
    url.set_username(username)
        .map_err(|_| ConfigError::MalformedDescriptor("invalid User ID".to_string()))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| ConfigError::MalformedDescriptor("invalid Password".to_string()))?;
    }
    url.set_path(database);

    Ok(url.to_string())
}

fn validate_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::MalformedDescriptor(e.to_string()))?;
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(ConfigError::MalformedDescriptor(format!(
            "unsupported scheme {:?}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::MalformedDescriptor("missing host".to_string()));
    }
    if url.path().trim_start_matches('/').is_empty() {
        return Err(ConfigError::MalformedDescriptor("missing database name".to_string()));
    }
    Ok(raw.to_string())
}
