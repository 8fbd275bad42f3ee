use anyhow::{Context, Result};
use clap::Parser;
use stack_cleanup_config::CleanupConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// Empty S3 buckets and S3 Tables namespaces, then delete their CloudFormation stacks
#[derive(Parser)]
#[command(name = "stack-cleanup")]
#[command(version)]
#[command(
    about = "Empty S3 buckets and S3 Tables namespaces, then delete their CloudFormation stacks",
    long_about = None
)]
struct Cli {
    /// AWS region [default: us-west-2]
    region: Option<String>,

    /// Delete only this stack (no confirmation prompt)
    stack_name: Option<String>,

    /// Stack-name prefix to match when no stack name is given
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Delete every matching stack without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// List what would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Wait until CloudFormation finishes deleting each stack
    #[arg(long)]
    wait: bool,

    /// AWS shared-config profile
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Step 1: Load base configuration
    let mut config = if let Some(config_path) = &cli.config {
        CleanupConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        CleanupConfig::load().context("Failed to load configuration")?
    };

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli);

    // Step 3: Initialize tracing so validation warnings show up
    stack_cleanup::init_tracing(&config);
    config.validate()?;

    display_startup_info(&config, cli.stack_name.as_deref());

    // Step 4: One call at a time on a single thread
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(stack_cleanup::run_with_config(
            &config,
            cli.stack_name.as_deref(),
        ));

    match &result {
        Ok(report) => {
            println!();
            for line in report.summary_lines() {
                println!("{}", line);
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(ExitCode::from(stack_cleanup::exit_code(&result)))
}

fn apply_cli_overrides(config: &mut CleanupConfig, cli: &Cli) {
    if let Some(region) = &cli.region {
        config.region = region.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.stack_prefix = prefix.clone();
    }
    if let Some(profile) = &cli.profile {
        config.profile = Some(profile.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    // Flags can only switch behaviour on
    config.assume_yes |= cli.yes;
    config.dry_run |= cli.dry_run;
    config.wait.stack_deletion |= cli.wait;
}

fn display_startup_info(config: &CleanupConfig, stack_name: Option<&str>) {
    use tracing::info;

    info!("╭─────────────────────────────────────────────────");
    info!("│ stack-cleanup v{}", env!("CARGO_PKG_VERSION"));
    info!("├─────────────────────────────────────────────────");
    info!("│ Region: {}", config.region);
    if let Some(profile) = &config.profile {
        info!("│ Profile: {}", profile);
    }
    match stack_name {
        Some(name) => info!("│ Stack: {}", name),
        None => info!("│ Stacks matching prefix: '{}'", config.stack_prefix),
    }
    if config.dry_run {
        info!("│ Dry run: nothing will be deleted");
    }
    if config.assume_yes {
        info!("│ Confirmation: skipped (--yes)");
    }
    if config.wait.stack_deletion {
        info!(
            "│ Waiting for deletion: up to {} polls every {}s",
            config.wait.stack_attempts, config.wait.interval_secs
        );
    }
    info!("╰─────────────────────────────────────────────────");
}
