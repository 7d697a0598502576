//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use portcullis_abac::{AccessContext, Resource, SystemClock};
use portcullis_config::{Paths, PortcullisConfig};
use tracing::debug;

pub mod check;
pub mod config;
pub mod init;
pub mod list;
pub mod rules;
pub mod version;

/// Parses a `--at` time of day, `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("expected HH:MM, got '{raw}'"))
}

/// Loads the merged configuration of an initialized project.
fn load_project(project: &str) -> Result<PortcullisConfig> {
    let project_path = Path::new(project);

    if !Paths::is_initialized(project_path) {
        anyhow::bail!(
            "Project not initialized. Run 'portcullis init' in {} first.",
            project_path.display()
        );
    }

    let config =
        PortcullisConfig::load_from_dir(project_path).context("Failed to load configuration")?;
    debug!(
        project = %config.project.name,
        resources = config.resources.len(),
        rules = config.rules.len(),
        "Loaded configuration"
    );
    Ok(config)
}

fn find_resource<'a>(config: &'a PortcullisConfig, key: &str) -> Result<&'a Resource> {
    config
        .find_resource(key)
        .with_context(|| format!("Unknown resource '{key}'"))
}

/// Request context at `at`, or at the local wall-clock time.
fn request_context(at: Option<NaiveTime>, client_ip: Option<&str>) -> AccessContext {
    let context = at.map_or_else(|| AccessContext::from_clock(&SystemClock), AccessContext::at);
    match client_ip {
        Some(ip) => context.with_client_ip(ip),
        None => context,
    }
}
