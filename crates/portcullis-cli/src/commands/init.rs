//! Initialize command - writes a starter catalog.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use portcullis_config::{LOCAL_CONFIG_FILE, Paths, PortcullisConfig};

use crate::style::{print_code_example, print_hint, print_labeled, print_spacer, print_success};

pub fn run(path: &str, force: bool) -> Result<()> {
    let project_dir = Path::new(path);

    if Paths::is_initialized(project_dir) && !force {
        anyhow::bail!(
            "Project already initialized in {}. portcullis.toml already exists (use --force to overwrite).",
            project_dir.display()
        );
    }

    fs::create_dir_all(project_dir).context("Failed to create project directory")?;

    let config = PortcullisConfig::demo();
    let config_path = Paths::project_config_file(project_dir);
    config
        .write_to(&config_path)
        .context("Failed to write portcullis.toml")?;
    print_success("Wrote portcullis.toml");

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(
            &gitignore_path,
            format!("# Local config overrides (not tracked in git)\n{LOCAL_CONFIG_FILE}\n"),
        )
        .context("Failed to write .gitignore")?;
        print_success("Created .gitignore");
    }

    print_spacer();
    print_labeled("Project", &config.project.name);
    print_labeled("Resources", &config.resources.len().to_string());
    print_labeled("Rules", &config.rules.len().to_string());
    print_spacer();
    print_hint("Try:");
    print_code_example(&format!(
        "portcullis --project {} list --status active --tier basic --all",
        project_dir.display()
    ));

    Ok(())
}
