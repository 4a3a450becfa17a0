use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::env_utils::{self, EnvLookup, ENV_BAUD, ENV_PORT, ENV_TIMEOUT_MS};

pub const DEFAULT_CONFIG_FILE: &str = "floppyctl.toml";
pub const DEFAULT_BAUD: u32 = 2_000_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub port: Option<String>,
    pub baud: u32,
    pub timeout: Duration,
}

pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                return Ok(FileConfig::default());
            }
            fallback
        }
    };
    parse_config_file(&path)
}

pub fn parse_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

pub fn resolve(file: FileConfig, cli: Overrides, env: EnvLookup<'_>) -> Result<ConnectionConfig> {
    let port = cli.port.or_else(|| env(ENV_PORT)).or(file.port);
    let baud = match cli.baud {
        Some(baud) => baud,
        None => env_utils::parse_env_u32(env, ENV_BAUD)?
            .or(file.baud)
            .unwrap_or(DEFAULT_BAUD),
    };
    let timeout_ms = match cli.timeout_ms {
        Some(ms) => ms,
        None => env_utils::parse_env_u64(env, ENV_TIMEOUT_MS)?
            .or(file.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS),
    };
    Ok(ConnectionConfig {
        port,
        baud,
        timeout: Duration::from_millis(timeout_ms),
    })
}
