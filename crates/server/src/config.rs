//! Server configuration structures and loaders.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use map_store::StoreLocation;

pub const DEFAULT_STORE_URI: &str = "memory://";
pub const DEFAULT_DATABASE: &str = "dnd_dev";
pub const DEFAULT_COLLECTION: &str = "maps";
pub const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8000);
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_SECRET_KEY: &str = "dev-secret";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Process-wide settings, loaded once at startup.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub store_uri: String,
    /// Database namespace inside the store.
    pub database: String,
    pub collection: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    pub secret_key: String,
    /// Upper bound on every store call.
    pub store_timeout: Duration,
    /// When set, logs are also written to a daily-rotated file here.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store_uri: DEFAULT_STORE_URI.to_owned(),
            database: DEFAULT_DATABASE.to_owned(),
            collection: DEFAULT_COLLECTION.to_owned(),
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_owned()],
            secret_key: DEFAULT_SECRET_KEY.to_owned(),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MAP_STORE_URI` - `memory://` or `file://<path>` (default: memory://)
    /// - `MAP_STORE_DB` - Database namespace (default: dnd_dev)
    /// - `MAP_COLLECTION` - Collection holding the maps (default: maps)
    /// - `BIND_ADDR` - Listen address (default: 127.0.0.1:8000)
    /// - `CORS_ORIGINS` - Comma-separated allow-list (default: http://localhost:5173)
    /// - `SECRET_KEY` - Process secret (default: dev-secret)
    /// - `STORE_TIMEOUT_MS` - Per-call store timeout (default: 5000)
    /// - `LOG_DIR` - Optional directory for log files
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(uri) = read_string("MAP_STORE_URI") {
            config.store_uri = uri;
        }
        if let Some(database) = read_string("MAP_STORE_DB") {
            config.database = database;
        }
        if let Some(collection) = read_string("MAP_COLLECTION") {
            config.collection = collection;
        }
        if let Some(addr) = read_env::<SocketAddr>("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(origins) = read_string("CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins);
        }
        if let Some(secret) = read_string("SECRET_KEY") {
            config.secret_key = secret;
        }
        if let Some(millis) = read_env::<u64>("STORE_TIMEOUT_MS") {
            config.store_timeout = Duration::from_millis(millis.max(1));
        }
        config.log_dir = read_string("LOG_DIR").map(PathBuf::from);

        config
    }

    pub fn store_location(&self) -> map_store::Result<StoreLocation> {
        self.store_uri.parse()
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

fn read_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    read_string(key)?.parse().ok()
}
