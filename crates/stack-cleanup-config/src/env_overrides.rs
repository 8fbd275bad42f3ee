use super::{CleanupConfig, LogFormat};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "STACK_CLEANUP_";

/// Abstraction over environment-variable lookups so tests can supply their own
/// overrides without touching the process environment.
pub trait EnvSource {
    /// Get a variable by its key without the STACK_CLEANUP_ prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides to the cleanup config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut CleanupConfig, env: &E) -> Result<()> {
    if let Some(region) = get_env_string(env, "REGION") {
        config.region = region;
    }
    if let Some(prefix) = get_env_string(env, "STACK_PREFIX") {
        config.stack_prefix = prefix;
    }
    if let Some(profile) = get_env_string(env, "PROFILE") {
        config.profile = if profile.is_empty() {
            None
        } else {
            Some(profile)
        };
    }
    if let Some(val) = get_env_bool(env, "ASSUME_YES")? {
        config.assume_yes = val;
    }
    if let Some(val) = get_env_bool(env, "DRY_RUN")? {
        config.dry_run = val;
    }

    // Polling
    if let Some(val) = get_env_bool(env, "WAIT_STACK_DELETION")? {
        config.wait.stack_deletion = val;
    }
    if let Some(val) = get_env_u32(env, "WAIT_STACK_ATTEMPTS")? {
        config.wait.stack_attempts = val;
    }
    if let Some(val) = get_env_u32(env, "WAIT_TABLE_ATTEMPTS")? {
        config.wait.table_attempts = val;
    }
    if let Some(val) = get_env_u64(env, "WAIT_INTERVAL_SECS")? {
        config.wait.interval_secs = val;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.log.format = format
            .parse::<LogFormat>()
            .context("Invalid STACK_CLEANUP_LOG_FORMAT value")?;
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
}

fn get_env_u32<E: EnvSource>(env: &E, key: &str) -> Result<Option<u32>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<u32>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = match val.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(anyhow!(
                        "Failed to parse {}{} (expected bool): {}",
                        ENV_PREFIX,
                        key,
                        val
                    ))
                }
            };
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
