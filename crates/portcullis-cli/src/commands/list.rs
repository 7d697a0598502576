//! List command - catalog decisions for one subject.

use anyhow::Result;
use chrono::NaiveTime;
use portcullis_abac::Subject;

use super::{load_project, request_context};
use crate::style::{catalog_table, colors::SemanticStyle, print_labeled, print_spacer};

pub fn run(project: &str, subject: &Subject, at: Option<NaiveTime>, all: bool) -> Result<()> {
    let config = load_project(project)?;
    let context = request_context(at, None);

    let entries: Vec<_> = config
        .evaluator()
        .evaluate_catalog(subject, &config.resources, &context)?
        .into_iter()
        .filter(|entry| all || entry.decision.allowed)
        .collect();

    print_labeled(
        "Subject",
        &format!("{} / {}", subject.account_status, subject.subscription_tier),
    );
    print_labeled("Time", &context.now.format("%H:%M:%S").to_string());
    print_spacer();

    if entries.is_empty() {
        println!("{}", "No accessible resources.".muted());
        return Ok(());
    }

    println!("{}", catalog_table(&entries));

    let count = entries.len();
    let word = if count == 1 { "resource" } else { "resources" };
    println!("{}", format!("({count} {word})").muted());

    Ok(())
}
