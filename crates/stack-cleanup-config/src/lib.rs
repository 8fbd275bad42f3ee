// stack-cleanup-config - Configuration for the stack cleanup tool
//
// Supports configuration from multiple sources:
// 1. Command-line flags (applied by the binary, highest priority)
// 2. Environment variables (STACK_CLEANUP_* prefix)
// 3. Config file given with --config or STACK_CLEANUP_CONFIG
// 4. Default config file locations (./stack-cleanup.toml, ./.stack-cleanup.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};

/// Region used when neither the command line, environment nor config file names one
pub const DEFAULT_REGION: &str = "us-west-2";

/// Stack-name prefix used to select stacks when no stack name is given
pub const DEFAULT_STACK_PREFIX: &str = "smoke-lambda";

/// Main cleanup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub region: String,

    pub stack_prefix: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Skip the per-stack confirmation prompt
    pub assume_yes: bool,

    /// List everything, delete nothing
    pub dry_run: bool,

    pub wait: WaitConfig,

    pub log: LogConfig,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            stack_prefix: DEFAULT_STACK_PREFIX.to_string(),
            profile: None,
            assume_yes: false,
            dry_run: false,
            wait: WaitConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Polling behaviour for eventually-consistent deletes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Poll DescribeStacks after DeleteStack until the stack is gone
    pub stack_deletion: bool,
    pub stack_attempts: u32,
    pub table_attempts: u32,
    pub interval_secs: u64,
}

impl WaitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            stack_deletion: false,
            stack_attempts: 60,
            table_attempts: 30,
            interval_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl CleanupConfig {
    /// Load configuration from the default file locations and the environment.
    /// Call [`CleanupConfig::validate`] once every override is applied.
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from an explicit file path (for the --config flag)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Parse a TOML document on top of the built-in defaults
    #[cfg(test)]
    fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
