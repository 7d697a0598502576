//! Configuration management for Portcullis
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (PORTCULLIS_* prefix, highest precedence)
//! 2. portcullis.local.toml (gitignored, local overrides)
//! 3. portcullis.toml (git-tracked, project config)
//! 4. ~/.config/portcullis/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! The project file carries the resource catalog and the policy rules the
//! evaluator runs against it.

use anyhow::Result;
use portcullis_abac::{
    ALWAYS_AVAILABLE, Evaluator, EvaluatorOptions, PolicyRule, Resource, ResourceId,
    StandardRules, Tier, TimeWindow,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::{LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE, Paths};

/// Main Portcullis configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortcullisConfig {
    pub project: ProjectConfig,
    pub evaluator: EvaluatorOptions,
    pub logging: LoggingConfig,
    pub resources: Vec<Resource>,
    pub rules: Vec<PolicyRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "portcullis-project".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl PortcullisConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Create the demo learning-portal catalog
    pub fn demo() -> Self {
        Self {
            project: ProjectConfig {
                name: "learning-portal".to_string(),
            },
            resources: vec![
                Resource::new(1, "Python Basics", Tier::Basic, "09:00-18:00")
                    .with_description("Python fundamentals"),
                Resource::new(2, "Flask Advanced", Tier::Premium, ALWAYS_AVAILABLE)
                    .with_description("Advanced Flask"),
                Resource::new(3, "SQL Database", Tier::Basic, "09:00-20:00")
                    .with_description("Relational databases"),
            ],
            rules: StandardRules::defaults(),
            ..Default::default()
        }
    }

    /// Evaluator configured with the `[evaluator]` options
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.evaluator)
    }

    /// Look up a resource by numeric id, or by name (case-insensitive)
    pub fn find_resource(&self, key: &str) -> Option<&Resource> {
        let key = key.trim();
        if let Ok(id) = key.parse::<u64>()
            && let Some(resource) = self.resources.iter().find(|r| r.id == ResourceId::new(id))
        {
            return Some(resource);
        }
        self.resources
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(key))
    }

    /// Check the catalog and rules before any request is evaluated
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            TimeWindow::parse(&resource.available_window, self.evaluator.overnight_windows)
                .map_err(|source| ConfigError::InvalidResource {
                    resource: resource.name.clone(),
                    source,
                })?;

            if !seen.insert(resource.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate resource id {}",
                    resource.id
                )));
            }
        }

        for rule in &self.rules {
            rule.validate().map_err(|source| ConfigError::InvalidRule {
                rule: rule.name.clone(),
                source,
            })?;

            if let Some(id) = rule.resource
                && !seen.contains(&id)
            {
                return Err(ConfigError::ValidationError(format!(
                    "rule '{}' is scoped to unknown resource {id}",
                    rule.name
                )));
            }
        }

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write as TOML to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        })
    }
}
