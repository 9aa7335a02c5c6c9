// CLI module - command-line argument parsing and handlers
//
// Run flags override the loaded configuration. Subcommands manage the config
// file:
// - config --show: Display effective configuration
// - config --path: Print config file location
// - config --reset: Regenerate config file with defaults

use crate::config::{Config, VERSION};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// chatweave - multi-platform chat aggregator
#[derive(Parser)]
#[command(name = "chatweave")]
#[command(version = VERSION)]
#[command(about = "Unified Twitch/YouTube/Kick chat feed with third-party emotes", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Flags for a normal run
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Twitch channel id for channel emote catalogs
    #[arg(long)]
    pub channel_id: Option<String>,

    /// Generate sample chat traffic
    #[arg(long)]
    pub demo: bool,

    /// Replay ChatMessage JSON lines from a file
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Print the feed as plain text instead of running the TUI
    #[arg(long)]
    pub headless: bool,
}

impl RunArgs {
    /// Apply flags on top of a loaded configuration
    pub fn apply(self, config: &mut Config) {
        if let Some(id) = self.channel_id.filter(|s| !s.trim().is_empty()) {
            config.channel_id = Some(id.trim().to_string());
        }
        if self.demo {
            config.demo_mode = true;
        }
        if let Some(path) = self.replay {
            config.replay = Some(path);
        }
        if self.headless {
            config.enable_tui = false;
        }
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
}

/// Handle CLI commands
///
/// Returns the run flags when no subcommand was given, `None` when a
/// subcommand ran and the program should exit.
pub fn handle_cli() -> Option<RunArgs> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else {
                println!("Usage: chatweave config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            None
        }
        None => Some(cli.run),
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
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

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}
