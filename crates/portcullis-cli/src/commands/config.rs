//! Configuration management commands.

use std::path::Path;

use anyhow::{Context, Result};
use portcullis_config::PortcullisConfig;

use super::load_project;
use crate::style::{
    colors::SemanticStyle, print_error, print_labeled, print_spacer, print_success,
    resource_table, rules_table,
};

/// Show current configuration.
pub fn show(project: &str, format: &str) -> Result<()> {
    let config = load_project(project)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        "toml" => {
            let toml_str = config
                .to_toml_string()
                .context("Failed to serialize configuration")?;
            println!("{toml_str}");
        }
        "text" => print_text(&config),
        other => anyhow::bail!("Unknown format '{other}' (expected text, json or toml)"),
    }

    Ok(())
}

fn print_text(config: &PortcullisConfig) {
    println!("{}", "Portcullis Configuration".header());
    print_spacer();

    println!("Project:");
    print_labeled("Name", &config.project.name);
    print_spacer();

    println!("Evaluator:");
    print_labeled(
        "Overnight windows",
        &format!("{:?}", config.evaluator.overnight_windows).to_lowercase(),
    );
    print_spacer();

    println!("Logging:");
    print_labeled("Level", &config.logging.level);
    print_spacer();

    println!("Resources:");
    if config.resources.is_empty() {
        println!("  {}", "(none)".muted());
    } else {
        println!("{}", resource_table(&config.resources));
    }
    print_spacer();

    println!("Rules:");
    if config.rules.is_empty() {
        println!("  {}", "(none)".muted());
    } else {
        println!("{}", rules_table(&config.rules));
    }
}

/// Validate configuration files.
pub fn validate(project: &str) -> Result<()> {
    println!(
        "Validating configuration in {}...",
        Path::new(project).display()
    );

    let config = load_project(project)?;

    match config.validate() {
        Ok(()) => {
            print_success(&format!(
                "Configuration is valid ({} resources, {} rules)",
                config.resources.len(),
                config.rules.len()
            ));
            Ok(())
        }
        Err(e) => {
            print_error("Configuration validation failed:");
            eprintln!("  {e}");
            Err(e.into())
        }
    }
}
