//! Portcullis CLI.
//!
//! Attribute-based access control for subscription catalogs.
//!
//! # Quick Start
//!
//! ```bash
//! # Write a starter catalog
//! portcullis init ./portal
//!
//! # Can a basic subscriber open resource 2 at 10:30?
//! portcullis --project ./portal check --resource 2 --status active --tier basic --at 10:30
//!
//! # What can a premium subscriber open right now?
//! portcullis --project ./portal list --status active --tier premium
//! ```

mod commands;
mod style;

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};
use portcullis_abac::{AccountStatus, Subject, Tier};
use portcullis_config::PortcullisConfig;

/// Portcullis - attribute-based access control for subscription catalogs.
#[derive(Parser)]
#[command(name = "portcullis")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory containing portcullis.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: String,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Log every gate decision to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Attributes of the requesting subject.
#[derive(Args)]
struct SubjectArgs {
    /// Account status (active, frozen, suspended).
    #[arg(long)]
    status: AccountStatus,

    /// Subscription tier (basic, premium).
    #[arg(long)]
    tier: Tier,
}

impl SubjectArgs {
    fn subject(&self) -> Subject {
        Subject::new(self.status, self.tier)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Write a starter portcullis.toml with the demo catalog.
    Init {
        /// Directory to initialize (defaults to --project).
        path: Option<String>,

        /// Overwrite an existing portcullis.toml.
        #[arg(long)]
        force: bool,
    },

    /// Decide whether a subject may open a resource.
    Check {
        /// Resource id or name.
        #[arg(short, long)]
        resource: String,

        #[command(flatten)]
        subject: SubjectArgs,

        /// Time of day to evaluate at (HH:MM, defaults to local time).
        #[arg(long, value_parser = commands::parse_time)]
        at: Option<NaiveTime>,

        /// Also run the configured policy rules.
        #[arg(long)]
        with_rules: bool,

        /// Client IP address recorded with the request.
        #[arg(long)]
        client_ip: Option<String>,
    },

    /// List catalog resources the subject may open.
    List {
        #[command(flatten)]
        subject: SubjectArgs,

        /// Time of day to evaluate at (HH:MM, defaults to local time).
        #[arg(long, value_parser = commands::parse_time)]
        at: Option<NaiveTime>,

        /// Include denied resources with their reasons.
        #[arg(long)]
        all: bool,
    },

    /// Evaluate only the configured policy rules for a resource.
    Rules {
        /// Resource id or name.
        #[arg(short, long)]
        resource: String,

        #[command(flatten)]
        subject: SubjectArgs,

        /// Client IP address, for rules on `client_ip`.
        #[arg(long)]
        client_ip: Option<String>,
    },

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Output format (text, json, toml).
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate the catalog and rules.
    Validate,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        PortcullisConfig::load_from_dir(&cli.project)
            .map(|config| config.logging.level)
            .unwrap_or_else(|_| "warn".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let project = cli.project.as_str();

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { path, force } => {
            commands::init::run(path.as_deref().unwrap_or(project), force)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            resource,
            subject,
            at,
            with_rules,
            client_ip,
        } => commands::check::run(
            project,
            &resource,
            &subject.subject(),
            at,
            with_rules,
            client_ip.as_deref(),
        ),
        Commands::List { subject, at, all } => {
            commands::list::run(project, &subject.subject(), at, all)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rules {
            resource,
            subject,
            client_ip,
        } => commands::rules::run(project, &resource, &subject.subject(), client_ip.as_deref()),
        Commands::Config(cmd) => {
            match cmd {
                ConfigCommands::Show { format } => commands::config::show(project, &format)?,
                ConfigCommands::Validate => commands::config::validate(project)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
