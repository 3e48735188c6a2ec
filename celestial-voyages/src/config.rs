use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 3600);
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);
const SECURE_COOKIES_ENV: &str = "VOYAGES_SECURE_COOKIES";

#[derive(Debug, Default, Parser)]
#[command(
    name = "celestial-voyages",
    version,
    about = "Space tourism booking service"
)]
pub struct Cli {
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How long a login stays valid, e.g. `24h` or `90m`.
    #[arg(long, value_name = "DURATION")]
    pub session_ttl: Option<String>,

    #[arg(long, value_name = "DURATION")]
    pub session_sweep_interval: Option<String>,

    /// Start with an empty catalogue.
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub seed_catalog: bool,
    pub secure_cookies: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid boolean value for env var {key}: {value}")]
    InvalidEnvBool { key: String, value: String },
    #[error("invalid duration for {key}: {value}: {source}")]
    InvalidDuration {
        key: String,
        value: String,
        source: humantime::DurationError,
    },
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind: Option<SocketAddr>,
    session_ttl: Option<String>,
    session_sweep_interval: Option<String>,
    seed_catalog: Option<bool>,
    secure_cookies: Option<bool>,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let from_file = read_file_config(cli.config.as_deref())?;
        let env_secure_cookies = read_env_bool(SECURE_COOKIES_ENV)?;

        let bind = cli
            .bind
            .or(from_file.bind)
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));
        let session_ttl = resolve_duration(
            "session_ttl",
            cli.session_ttl.or(from_file.session_ttl),
            DEFAULT_SESSION_TTL,
        )?;
        let session_sweep_interval = resolve_duration(
            "session_sweep_interval",
            cli.session_sweep_interval
                .or(from_file.session_sweep_interval),
            DEFAULT_SWEEP_INTERVAL,
        )?;
        let seed_catalog = !cli.no_seed && from_file.seed_catalog.unwrap_or(true);
        let secure_cookies = env_secure_cookies
            .or(from_file.secure_cookies)
            .unwrap_or(false);

        Ok(Self {
            bind,
            session_ttl,
            session_sweep_interval,
            seed_catalog,
            secure_cookies,
        })
    }
}

fn resolve_duration(
    key: &str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let parsed = humantime::parse_duration(raw.trim()).map_err(|source| {
        ConfigError::InvalidDuration {
            key: String::from(key),
            value: raw.clone(),
            source,
        }
    })?;
    Ok(parsed.max(Duration::from_secs(1)))
}

fn read_file_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn read_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => parse_bool_value(key, &value).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnvBool {
            key: String::from(key),
            value: String::from("<non-unicode>"),
        }),
    }
}

fn parse_bool_value(key: &str, raw: &str) -> Result<bool, ConfigError> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvBool {
            key: String::from(key),
            value: String::from(raw),
        }),
    }
}
