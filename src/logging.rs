//! Log sink setup.
//!
//! The crate logs through the `log` facade only. Hosts that already install a logger
//! can skip [`init`]; it never replaces an existing one.

use crate::config::EnvConfig;

const CRATE_TARGET: &str = "tape_clamp";

/// Filter string derived from the environment config.
///
/// An explicit `TAPE_CLAMP_LOG` wins; otherwise `TAPE_CLAMP_DEBUG=1` enables
/// `debug` for this crate and everything else stays at `warn`.
pub fn filter_for(config: &EnvConfig) -> String {
    if let Some(filter) = &config.log_filter {
        return filter.clone();
    }
    if config.debug {
        format!("warn,{CRATE_TARGET}=debug")
    } else {
        "warn".to_string()
    }
}

/// Install an `env_logger` sink. Returns `false` when a logger was already set.
pub fn init(config: &EnvConfig) -> bool {
    env_logger::Builder::new()
        .parse_filters(&filter_for(config))
        .format_timestamp(None)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{filter_for, init};
    use crate::config::EnvConfig;

    #[test]
    fn default_filter_is_warn() {
        assert_eq!(filter_for(&EnvConfig::default()), "warn");
    }

    #[test]
    fn debug_flag_scopes_to_crate() {
        let config = EnvConfig {
            debug: true,
            ..EnvConfig::default()
        };
        assert_eq!(filter_for(&config), "warn,tape_clamp=debug");
    }

    #[test]
    fn explicit_filter_wins() {
        let config = EnvConfig {
            debug: true,
            log_filter: Some("trace".to_string()),
            ..EnvConfig::default()
        };
        assert_eq!(filter_for(&config), "trace");
    }

    #[test]
    fn init_is_idempotent() {
        let config = EnvConfig::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
