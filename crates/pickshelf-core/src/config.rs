use crate::app_config::{AppConfig, Environment};

use thiserror::Error;

/// Default desktop browser identity used for product-page fetches.
pub const DEFAULT_DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Default mobile browser identity used for the mobile-site fallback fetch.
pub const DEFAULT_MOBILE_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let store_url = require("STORE_URL")?;
    let store_service_key = require("STORE_SERVICE_KEY")?;

    let env = parse_environment(&or_default("PICKSHELF_ENV", "development"));

    let bind_addr = parse_addr("PICKSHELF_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PICKSHELF_LOG_LEVEL", "info");

    let store_timeout_secs = parse_u64("PICKSHELF_STORE_TIMEOUT_SECS", "15")?;

    let marketplace_base = or_default("PICKSHELF_MARKETPLACE_BASE", "https://www.amazon.co.uk");
    let mobile_base = or_default("PICKSHELF_MOBILE_BASE", "https://m.amazon.co.uk");
    let scrape_timeout_secs = parse_u64("PICKSHELF_SCRAPE_TIMEOUT_SECS", "20")?;
    let scrape_desktop_user_agent =
        or_default("PICKSHELF_SCRAPE_DESKTOP_UA", DEFAULT_DESKTOP_USER_AGENT);
    let scrape_mobile_user_agent =
        or_default("PICKSHELF_SCRAPE_MOBILE_UA", DEFAULT_MOBILE_USER_AGENT);

    let home_pick_count = parse_usize("PICKSHELF_HOME_PICK_COUNT", "6")?;
    let home_pick_pool_limit = parse_u32("PICKSHELF_HOME_PICK_POOL_LIMIT", "200")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_url,
        store_service_key,
        store_timeout_secs,
        marketplace_base,
        mobile_base,
        scrape_timeout_secs,
        scrape_desktop_user_agent,
        scrape_mobile_user_agent,
        home_pick_count,
        home_pick_pool_limit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    fn minimal_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("STORE_URL", "https://store.example.com"),
            ("STORE_SERVICE_KEY", "service-key-1"),
        ])
    }

    #[test]
    fn build_app_config_applies_defaults() {
        let map = minimal_env();
        let config = build_app_config(lookup_from_map(&map)).expect("config should build");

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.marketplace_base, "https://www.amazon.co.uk");
        assert_eq!(config.mobile_base, "https://m.amazon.co.uk");
        assert_eq!(config.scrape_timeout_secs, 20);
        assert_eq!(config.home_pick_count, 6);
        assert_eq!(config.home_pick_pool_limit, 200);
    }

    #[test]
    fn build_app_config_requires_store_url() {
        let mut map = minimal_env();
        map.remove("STORE_URL");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(var) if var == "STORE_URL"));
    }

    #[test]
    fn build_app_config_requires_service_key() {
        let mut map = minimal_env();
        map.remove("STORE_SERVICE_KEY");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(var) if var == "STORE_SERVICE_KEY"));
    }

    #[test]
    fn build_app_config_rejects_invalid_bind_addr() {
        let mut map = minimal_env();
        map.insert("PICKSHELF_BIND_ADDR", "not-an-addr");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { var, .. } if var == "PICKSHELF_BIND_ADDR")
        );
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = minimal_env();
        map.insert("PICKSHELF_SCRAPE_TIMEOUT_SECS", "soon");
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { var, .. } if var == "PICKSHELF_SCRAPE_TIMEOUT_SECS")
        );
    }

    #[test]
    fn parse_environment_recognizes_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("anything-else"), Environment::Development);
    }

    #[test]
    fn debug_output_redacts_service_key() {
        let map = minimal_env();
        let config = build_app_config(lookup_from_map(&map)).expect("config should build");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("service-key-1"));
        assert!(rendered.contains("[redacted]"));
    }
}
