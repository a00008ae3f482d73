//! Environment configuration.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// `TAPE_CLAMP_DEBUG=1` raises the crate's log filter to `debug`.
    pub debug: bool,
    /// Explicit `env_logger` filter string (`TAPE_CLAMP_LOG`).
    pub log_filter: Option<String>,
    /// Overrides the clamp ellipsis (`TAPE_CLAMP_ELLIPSIS`).
    pub ellipsis: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("TAPE_CLAMP_DEBUG"),
            log_filter: env_string_opt("TAPE_CLAMP_LOG"),
            ellipsis: env_string_opt("TAPE_CLAMP_ELLIPSIS"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
