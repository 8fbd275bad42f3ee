// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::{CleanupConfig, WaitConfig};
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &CleanupConfig) -> Result<()> {
    validate_region(&config.region)?;
    validate_wait_config(&config.wait)?;

    if config.stack_prefix.is_empty() {
        warn!(
            region = %config.region,
            "stack_prefix is empty; every stack in the region will match"
        );
    }

    if config.log.level.is_empty() {
        bail!("log.level must not be empty");
    }

    Ok(())
}

fn validate_region(region: &str) -> Result<()> {
    if region.is_empty() {
        bail!("region must not be empty");
    }

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!(
            "region '{}' must contain only lowercase letters, numbers, and hyphens",
            region
        );
    }

    Ok(())
}

fn validate_wait_config(config: &WaitConfig) -> Result<()> {
    if config.stack_attempts == 0 {
        bail!("wait.stack_attempts must be greater than 0");
    }

    if config.table_attempts == 0 {
        bail!("wait.table_attempts must be greater than 0");
    }

    // Warn about very long polls
    if u64::from(config.stack_attempts) * config.interval_secs > 3600 {
        warn!(
            stack_attempts = config.stack_attempts,
            interval_secs = config.interval_secs,
            "stack deletion wait exceeds one hour"
        );
    }

    Ok(())
}
