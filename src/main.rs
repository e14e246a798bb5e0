//! `hotkeys` - inspect hotkey descriptors from the command line.
//!
//! ```bash
//! hotkeys parse "Mod+Shift+S" --platform mac
//! hotkeys display "ctrl+alt+delete" --labels
//! hotkeys validate "Foo+A"
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use hotkeys::config::{default_config_path, load_config};
use hotkeys::hotkey::{
    check_hotkey, format_descriptor_for_display, format_with_labels, normalize_hotkey,
    parse_hotkey, validate_hotkey, Platform,
};
use hotkeys::logging;

#[derive(Parser)]
#[command(author, version, about = "Parse, normalize and validate hotkey descriptors", long_about = None)]
struct Cli {
    /// Platform used to resolve `Mod` (default: config file, then detected)
    #[arg(short, long, global = true)]
    platform: Option<Platform>,

    /// Config file (default: <config dir>/hotkeys/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed form as JSON
    Parse { hotkey: String },
    /// Print the canonical descriptor
    Normalize { hotkey: String },
    /// Print the platform display string
    Display {
        hotkey: String,
        /// Word labels (Cmd, Option) instead of symbols
        #[arg(long)]
        labels: bool,
    },
    /// Report errors and warnings; exits non-zero when invalid
    Validate {
        hotkey: String,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let _guard = logging::init();
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path);
    let platform = cli.platform.unwrap_or_else(|| config.platform());

    match cli.command {
        Command::Parse { hotkey } => {
            let parsed = parse_hotkey(&hotkey, platform);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Normalize { hotkey } => {
            println!("{}", normalize_hotkey(&hotkey, platform));
        }
        Command::Display { hotkey, labels } => {
            let rendered = if labels {
                format_with_labels(&hotkey, platform)
            } else {
                format_descriptor_for_display(&hotkey, platform)
            };
            println!("{rendered}");
        }
        Command::Validate { hotkey, json } => {
            if json {
                let result = validate_hotkey(&hotkey);
                println!("{}", serde_json::to_string_pretty(&result)?);
                if !result.valid {
                    bail!("invalid hotkey '{}'", hotkey);
                }
            } else if check_hotkey(&hotkey) {
                println!("ok");
            } else {
                bail!("invalid hotkey '{}'", hotkey);
            }
        }
    }

    Ok(())
}
