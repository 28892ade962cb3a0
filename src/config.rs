// ⚙️ Configuration - environment driven, with defaults for a local gateway
//
// GATEWAY_HTTP_URL, GATEWAY_HTTP_TIMEOUT_SECS, SEEDS_DUMPS_DIR, SEEDS_STORE,
// SEEDS_SQLITE_PATH, SEEDS_LOG_LEVEL, SEEDS_LOG_FORMAT, SEEDS_SERVER_ADDR

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{Result, SeedsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = SeedsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(SeedsError::Config(format!("unknown log format: {}", other))),
        }
    }
}

/// Where seeded dumps are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = SeedsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(StoreKind::File),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(SeedsError::Config(format!("unknown seeds store: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedsConfig {
    pub gateway_url: String,
    pub gateway_timeout: Duration,
    pub dumps_dir: PathBuf,
    pub store: StoreKind,
    pub sqlite_path: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    pub server_addr: SocketAddr,
}

impl Default for SeedsConfig {
    fn default() -> Self {
        let dumps_dir = PathBuf::from("dumps");
        SeedsConfig {
            gateway_url: "http://localhost:8003".to_string(),
            gateway_timeout: Duration::from_secs(100),
            sqlite_path: dumps_dir.join("seeds.db"),
            dumps_dir,
            store: StoreKind::File,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            server_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl SeedsConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SeedsConfig::default();

        if let Some(url) = lookup("GATEWAY_HTTP_URL") {
            config.gateway_url = url;
        }
        if let Some(secs) = lookup("GATEWAY_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| SeedsError::Config(format!("invalid GATEWAY_HTTP_TIMEOUT_SECS: {}", secs)))?;
            config.gateway_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("SEEDS_DUMPS_DIR") {
            config.dumps_dir = PathBuf::from(dir);
        }
        config.sqlite_path = match lookup("SEEDS_SQLITE_PATH") {
            Some(path) => PathBuf::from(path),
            None => config.dumps_dir.join("seeds.db"),
        };
        if let Some(store) = lookup("SEEDS_STORE") {
            config.store = store.parse()?;
        }
        if let Some(level) = lookup("SEEDS_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(format) = lookup("SEEDS_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        if let Some(addr) = lookup("SEEDS_SERVER_ADDR") {
            config.server_addr = addr
                .parse()
                .map_err(|_| SeedsError::Config(format!("invalid SEEDS_SERVER_ADDR: {}", addr)))?;
        }

        Ok(config)
    }
}

/// Initialise the tracing subscriber; RUST_LOG wins over the configured level
pub fn init_tracing(config: &SeedsConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.clone().into());

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SeedsConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.gateway_url, "http://localhost:8003");
        assert_eq!(config.gateway_timeout, Duration::from_secs(100));
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.sqlite_path, PathBuf::from("dumps").join("seeds.db"));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = SeedsConfig::from_lookup(lookup_from(&[
            ("GATEWAY_HTTP_URL", "http://gateway:9000"),
            ("GATEWAY_HTTP_TIMEOUT_SECS", "5"),
            ("SEEDS_DUMPS_DIR", "/tmp/seeds"),
            ("SEEDS_STORE", "sqlite"),
            ("SEEDS_LOG_FORMAT", "json"),
            ("SEEDS_SERVER_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();

        assert_eq!(config.gateway_url, "http://gateway:9000");
        assert_eq!(config.gateway_timeout, Duration::from_secs(5));
        assert_eq!(config.sqlite_path, PathBuf::from("/tmp/seeds/seeds.db"));
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.server_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = SeedsConfig::from_lookup(lookup_from(&[("GATEWAY_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, SeedsError::Config(_)));

        let err = SeedsConfig::from_lookup(lookup_from(&[("SEEDS_STORE", "redis")])).unwrap_err();
        assert!(matches!(err, SeedsError::Config(_)));
    }
}
