//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::{ttl, FileMedium};

// == Tier Configs ==
/// Capacity and default TTL of the memory tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTierConfig {
    /// TTL in milliseconds for writes without an explicit TTL
    pub default_ttl: u64,
    /// Entry count at which a write evicts the oldest entry
    pub max_size: usize,
}

/// Capacity, default TTL and key namespace of a durable tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurableTierConfig {
    /// TTL in milliseconds for writes without an explicit TTL
    pub default_ttl: u64,
    /// Population the namespace is trimmed to after a failed write
    pub max_size: usize,
    /// Prefix of every key this tier writes
    pub namespace: String,
}

/// Configuration of all three tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub memory: MemoryTierConfig,
    pub session: DurableTierConfig,
    pub persistent: DurableTierConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory: MemoryTierConfig {
                default_ttl: ttl::MEDIUM,
                max_size: 500,
            },
            session: DurableTierConfig {
                default_ttl: ttl::LONG,
                max_size: 200,
                namespace: "session_cache".to_string(),
            },
            persistent: DurableTierConfig {
                default_ttl: ttl::PERSISTENT,
                max_size: 100,
                namespace: "persistent_cache".to_string(),
            },
        }
    }
}

impl CacheConfig {
    /// Loads tier settings from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMORY_MAX_ENTRIES` (default: 500)
    /// - `MEMORY_DEFAULT_TTL_MS` (default: 300000)
    /// - `SESSION_MAX_ENTRIES` (default: 200)
    /// - `SESSION_DEFAULT_TTL_MS` (default: 1800000)
    /// - `SESSION_NAMESPACE` (default: session_cache)
    /// - `PERSISTENT_MAX_ENTRIES` (default: 100)
    /// - `PERSISTENT_DEFAULT_TTL_MS` (default: 604800000)
    /// - `PERSISTENT_NAMESPACE` (default: persistent_cache)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            memory: MemoryTierConfig {
                default_ttl: env_or("MEMORY_DEFAULT_TTL_MS", defaults.memory.default_ttl),
                max_size: env_or("MEMORY_MAX_ENTRIES", defaults.memory.max_size),
            },
            session: DurableTierConfig {
                default_ttl: env_or("SESSION_DEFAULT_TTL_MS", defaults.session.default_ttl),
                max_size: env_or("SESSION_MAX_ENTRIES", defaults.session.max_size),
                namespace: env_or("SESSION_NAMESPACE", defaults.session.namespace),
            },
            persistent: DurableTierConfig {
                default_ttl: env_or("PERSISTENT_DEFAULT_TTL_MS", defaults.persistent.default_ttl),
                max_size: env_or("PERSISTENT_MAX_ENTRIES", defaults.persistent.max_size),
                namespace: env_or("PERSISTENT_NAMESPACE", defaults.persistent.namespace),
            },
        }
    }
}

// == Server Config ==
/// Host configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tier settings
    pub cache: CacheConfig,
    /// Location of the persistent tier's document, None if no home directory
    pub data_path: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DATA_DIR` - Directory of the persistent tier (default: per-user data dir)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 60)
    /// - plus the tier variables read by [`CacheConfig::from_env`]
    pub fn from_env() -> Self {
        let data_path = env::var("CACHE_DATA_DIR")
            .ok()
            .map(|dir| PathBuf::from(dir).join("persistent.json"))
            .or_else(FileMedium::default_path);

        Self {
            cache: CacheConfig::from_env(),
            data_path,
            server_port: env_or("SERVER_PORT", 3000),
            sweep_interval: env_or("SWEEP_INTERVAL", 60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            data_path: FileMedium::default_path(),
            server_port: 3000,
            sweep_interval: 60,
        }
    }
}

/// Parses an environment variable, falling back to `default` when it is
/// unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
