use crate::app_config::{AppConfig, Environment};
use crate::sources::SortStrategy;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f32 = |var: &str, default: &str| -> Result<f32, ConfigError> {
        or_default(var, default)
            .parse::<f32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default)).ok_or_else(|| {
            invalid(
                var,
                "expected one of true/false/1/0/yes/no".to_string(),
            )
        })
    };

    let env = parse_environment(&or_default("THREADMINE_ENV", "development"))?;
    let log_level = or_default("THREADMINE_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "THREADMINE_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let lexicon_path = lookup("THREADMINE_LEXICON_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let max_ideas = parse_usize("THREADMINE_MAX_IDEAS", "20")?;
    if max_ideas == 0 {
        return Err(invalid("THREADMINE_MAX_IDEAS", "must be at least 1".to_string()));
    }
    let max_duration_secs = parse_u64("THREADMINE_MAX_DURATION_SECS", "300")?;
    let dedup_enabled = parse_bool("THREADMINE_DEDUP_ENABLED", "true")?;
    let generation_delay_ms = parse_u64("THREADMINE_GENERATION_DELAY_MS", "1000")?;
    let retain_partial_on_timeout = parse_bool("THREADMINE_RETAIN_PARTIAL_ON_TIMEOUT", "false")?;

    let reply_sort_raw = or_default("THREADMINE_REPLY_SORT", "top");
    let reply_sort = reply_sort_raw
        .parse::<SortStrategy>()
        .map_err(|reason| invalid("THREADMINE_REPLY_SORT", reason))?;

    let generation_model = or_default("THREADMINE_GENERATION_MODEL", "default");
    let generation_temperature = parse_f32("THREADMINE_GENERATION_TEMPERATURE", "0.7")?;
    if !(0.0..=2.0).contains(&generation_temperature) {
        return Err(invalid(
            "THREADMINE_GENERATION_TEMPERATURE",
            format!("{generation_temperature} is outside 0.0..=2.0"),
        ));
    }
    let generation_max_tokens = parse_u32("THREADMINE_GENERATION_MAX_TOKENS", "4000")?;

    Ok(AppConfig {
        env,
        log_level,
        sources_path,
        lexicon_path,
        max_ideas,
        max_duration_secs,
        dedup_enabled,
        generation_delay_ms,
        retain_partial_on_timeout,
        reply_sort,
        generation_model,
        generation_temperature,
        generation_max_tokens,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "THREADMINE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
