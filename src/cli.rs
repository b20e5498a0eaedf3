// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the guide opens in the terminal. Subcommands:
// - config --show|--path|--reset: inspect or regenerate configuration
// - detect [--json]: print which install guide this device would open

use crate::config::{Config, VERSION};
use crate::detect::{self, AgentSignals};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;

/// Install guide with device-aware tabs and a translatable panel
#[derive(Parser)]
#[command(name = "guidepanel")]
#[command(version = VERSION)]
#[command(about = "Install guide with device-aware tabs", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Open this page address instead of the configured one
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Device signals used by detection (fall back to env, then the host)
#[derive(Args, Debug, Default, Clone)]
pub struct DeviceArgs {
    /// User agent string to detect from
    #[arg(long, global = true)]
    pub agent: Option<String>,

    /// Platform string to detect from
    #[arg(long, global = true)]
    pub platform: Option<String>,
}

impl DeviceArgs {
    /// CLI > GUIDEPANEL_USER_AGENT/GUIDEPANEL_PLATFORM > host
    pub fn signals(&self) -> AgentSignals {
        let host = AgentSignals::from_host();
        let user_agent = self
            .agent
            .clone()
            .or_else(|| std::env::var("GUIDEPANEL_USER_AGENT").ok())
            .unwrap_or(host.user_agent);
        let platform = self
            .platform
            .clone()
            .or_else(|| std::env::var("GUIDEPANEL_PLATFORM").ok())
            .unwrap_or(host.platform);
        AgentSignals::new(user_agent, platform)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Print the detected device guide
    Detect {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Handle a subcommand. Returns true if one ran (exit after).
pub fn handle_cli(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if *path {
                handle_config_path()?;
            } else if *show {
                handle_config_show();
            } else if *reset {
                handle_config_reset()?;
            } else {
                println!("Usage: guidepanel config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Ok(true)
        }
        Some(Commands::Detect { json }) => {
            handle_detect(&cli.device, *json)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!("Config file exists at {}. Overwrite? [y/N] ", path.display());
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_detect(device: &DeviceArgs, json: bool) -> Result<()> {
    let signals = device.signals();
    let result = detect::detect(&signals);
    tracing::debug!(user_agent = %signals.user_agent, platform = %signals.platform, key = result.key, "Detected device");

    if json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}\t{}", result.key, result.label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detect_with_globals() {
        let cli = Cli::try_parse_from([
            "guidepanel",
            "detect",
            "--json",
            "--agent",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Detect { json: true })));
        let signals = cli.device.signals();
        assert_eq!(detect::detect(&signals).key, detect::IPHONE_SAFARI);
    }

    #[test]
    fn test_parse_without_subcommand() {
        let cli = Cli::try_parse_from(["guidepanel", "--url", "https://x.test/#mac"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.url.as_deref(), Some("https://x.test/#mac"));
    }

    #[test]
    fn test_config_flags() {
        let cli = Cli::try_parse_from(["guidepanel", "config", "--path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                path: true,
                show: false,
                reset: false
            })
        ));
    }
}
