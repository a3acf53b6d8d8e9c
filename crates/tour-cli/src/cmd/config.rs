use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use tour_core::{
    config::{TourConfig, WarnLevel},
    keys,
};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = TourConfig::load(root).context("failed to load config")?;

    if json {
        return print_json(&config);
    }

    println!("# {}", keys::config_path(root).display());
    print_table(
        &["KEY", "VALUE"],
        vec![
            vec!["autostart_delay_ms".into(), config.autostart_delay_ms.to_string()],
            vec!["resume_delay_ms".into(), config.resume_delay_ms.to_string()],
            vec![
                "launch_signal_delay_ms".into(),
                config.launch_signal_delay_ms.to_string(),
            ],
            vec!["dismissable".into(), config.dismissable.to_string()],
        ],
    );
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = TourConfig::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
