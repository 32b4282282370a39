//! Config command - inspect presets and override keys.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pixel_qa_core::config::fields;
use pixel_qa_core::{DetectionConfig, Preset};

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print a preset as TOML, or list presets when none is given
    Show {
        /// Preset to print
        preset: Option<Preset>,
    },
    /// List override keys accepted from config files and PIXEL_QA_* variables
    Keys,
}

/// Run the config command.
pub fn run(args: &ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show { preset: Some(p) } => show_preset(p),
        ConfigCommand::Show { preset: None } => {
            list_presets();
            Ok(())
        }
        ConfigCommand::Keys => {
            list_keys();
            Ok(())
        }
    }
}

fn show_preset(preset: Preset) -> Result<()> {
    let config = DetectionConfig::from_preset(preset);
    let rendered = toml::to_string_pretty(&config)
        .with_context(|| format!("Failed to render preset {preset}"))?;
    println!("# preset: {preset}");
    print!("{rendered}");
    Ok(())
}

fn list_presets() {
    println!("Available presets:");
    for preset in Preset::ALL {
        let marker = if preset == Preset::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {preset}{marker}");
    }
}

fn list_keys() {
    for field in fields() {
        if field.aliases.is_empty() {
            println!("{:<42} {}", field.key, field.value_hint);
        } else {
            println!(
                "{:<42} {} (alias: {})",
                field.key,
                field.value_hint,
                field.aliases.join(", ")
            );
        }
    }
}
