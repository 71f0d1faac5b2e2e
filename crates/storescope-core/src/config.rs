use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
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
/// Returns `ConfigError` if a value fails to parse.
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

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("STORESCOPE_ENV", "development"));
    let bind_addr = parse_addr("STORESCOPE_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("STORESCOPE_LOG_LEVEL", "info");

    let cache_ttl_secs = parse_u64("STORESCOPE_CACHE_TTL_SECS", "3600")?;
    let fetch_timeout_secs = parse_u64("STORESCOPE_FETCH_TIMEOUT_SECS", "15")?;
    let fetch_max_retries = parse_u32("STORESCOPE_FETCH_MAX_RETRIES", "3")?;
    let fetch_backoff_base_ms = parse_u64("STORESCOPE_FETCH_BACKOFF_BASE_MS", "500")?;
    let fetch_user_agent = or_default(
        "STORESCOPE_FETCH_USER_AGENT",
        "storescope/0.1 (storefront-intelligence)",
    );
    let max_followup_fetches = parse_usize("STORESCOPE_MAX_FOLLOWUP_FETCHES", "4")?;

    let sentiment_min_corpus_chars = parse_usize("STORESCOPE_SENTIMENT_MIN_CORPUS_CHARS", "80")?;
    let sentiment_min_fields = parse_usize("STORESCOPE_SENTIMENT_MIN_FIELDS", "2")?;
    let key_theme_count = parse_usize("STORESCOPE_KEY_THEME_COUNT", "5")?;
    let seo_keyword_count = parse_usize("STORESCOPE_SEO_KEYWORD_COUNT", "15")?;

    let pricing_premium_threshold = parse_f64("STORESCOPE_PRICING_PREMIUM_THRESHOLD", "150.0")?;
    let pricing_value_threshold = parse_f64("STORESCOPE_PRICING_VALUE_THRESHOLD", "30.0")?;
    let pricing_dispersion_ceiling = parse_f64("STORESCOPE_PRICING_DISPERSION_CEILING", "0.75")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cache_ttl_secs,
        fetch_timeout_secs,
        fetch_max_retries,
        fetch_backoff_base_ms,
        fetch_user_agent,
        max_followup_fetches,
        sentiment_min_corpus_chars,
        sentiment_min_fields,
        key_theme_count,
        seo_keyword_count,
        pricing_premium_threshold,
        pricing_value_threshold,
        pricing_dispersion_ceiling,
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

    #[test]
    fn parse_environment_development() {
        assert_eq!(parse_environment("development"), Environment::Development);
    }

    #[test]
    fn parse_environment_test() {
        assert_eq!(parse_environment("test"), Environment::Test);
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should parse");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.cache_ttl_secs, 3600);
        assert_eq!(cfg.fetch_timeout_secs, 15);
        assert_eq!(cfg.fetch_max_retries, 3);
        assert_eq!(cfg.fetch_backoff_base_ms, 500);
        assert_eq!(
            cfg.fetch_user_agent,
            "storescope/0.1 (storefront-intelligence)"
        );
        assert_eq!(cfg.max_followup_fetches, 4);
        assert_eq!(cfg.sentiment_min_corpus_chars, 80);
        assert_eq!(cfg.sentiment_min_fields, 2);
        assert_eq!(cfg.key_theme_count, 5);
        assert_eq!(cfg.seo_keyword_count, 15);
        assert!((cfg.pricing_premium_threshold - 150.0).abs() < f64::EPSILON);
        assert!((cfg.pricing_value_threshold - 30.0).abs() < f64::EPSILON);
        assert!((cfg.pricing_dispersion_ceiling - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STORESCOPE_BIND_ADDR"),
            "expected InvalidEnvVar(STORESCOPE_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_cache_ttl_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_CACHE_TTL_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.cache_ttl_secs, 60);
    }

    #[test]
    fn build_app_config_cache_ttl_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_CACHE_TTL_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STORESCOPE_CACHE_TTL_SECS"),
            "expected InvalidEnvVar(STORESCOPE_CACHE_TTL_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fetch_retries_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_FETCH_MAX_RETRIES", "5");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_max_retries, 5);
    }

    #[test]
    fn build_app_config_user_agent_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_FETCH_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_user_agent, "custom-agent/2.0");
    }

    #[test]
    fn build_app_config_pricing_threshold_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_PRICING_PREMIUM_THRESHOLD", "200.5");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!((cfg.pricing_premium_threshold - 200.5).abs() < f64::EPSILON);
    }

    #[test]
    fn build_app_config_pricing_threshold_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("STORESCOPE_PRICING_VALUE_THRESHOLD", "cheap");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STORESCOPE_PRICING_VALUE_THRESHOLD"),
            "expected InvalidEnvVar(STORESCOPE_PRICING_VALUE_THRESHOLD), got: {result:?}"
        );
    }
}
