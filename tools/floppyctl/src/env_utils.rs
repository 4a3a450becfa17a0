use anyhow::{anyhow, Context, Result};

use crate::port_detect;

pub const ENV_PORT: &str = "FLOPPYCTL_PORT";
pub const ENV_PORT_HINT: &str = "FLOPPYCTL_PORT_HINT";
pub const ENV_BAUD: &str = "FLOPPYCTL_BAUD";
pub const ENV_TIMEOUT_MS: &str = "FLOPPYCTL_TIMEOUT_MS";
pub const ENV_LOG_JSON_PATH: &str = "FLOPPYCTL_LOG_JSON_PATH";

pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn parse_env_u32(env: EnvLookup<'_>, name: &str) -> Result<Option<u32>> {
    env(name)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .with_context(|| format!("{name} must be an unsigned integer"))
        })
        .transpose()
}

pub fn parse_env_u64(env: EnvLookup<'_>, name: &str) -> Result<Option<u64>> {
    env(name)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("{name} must be an unsigned integer"))
        })
        .transpose()
}

pub fn require_port(configured: Option<String>, env: EnvLookup<'_>) -> Result<String> {
    if let Some(port) = configured.filter(|port| !port.trim().is_empty()) {
        return Ok(port);
    }

    let hint = env(ENV_PORT_HINT);
    if let Some(port) = port_detect::detect_port(hint.as_deref()) {
        return Ok(port);
    }

    let candidates = port_detect::list_candidates();
    let mut message = format!(
        "{ENV_PORT} is not set and autodetection was not conclusive. Set {ENV_PORT} or pass --port."
    );
    if !candidates.is_empty() {
        message.push_str(" Candidates:\n");
        for candidate in candidates {
            message.push_str("  - ");
            message.push_str(&candidate);
            message.push('\n');
        }
    }
    Err(anyhow!(message))
}
