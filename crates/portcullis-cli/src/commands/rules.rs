//! Rules command - evaluate the data-driven policy rules alone.

use std::process::ExitCode;

use anyhow::{Context, Result};
use portcullis_abac::Subject;

use super::{check::DENIED, find_resource, load_project, request_context};
use crate::style::{colors::SemanticStyle, print_decision, print_spacer, rules_table};

pub fn run(
    project: &str,
    resource_key: &str,
    subject: &Subject,
    client_ip: Option<&str>,
) -> Result<ExitCode> {
    let config = load_project(project)?;
    let resource = find_resource(&config, resource_key)?;

    let applicable: Vec<_> = config
        .rules
        .iter()
        .filter(|rule| rule.applies_to(resource))
        .collect();

    if applicable.is_empty() {
        println!("{}", format!("No rules apply to {}.", resource.name).muted());
    } else {
        println!("{}", rules_table(applicable));
    }
    print_spacer();

    let evaluator = config.evaluator();
    let outcome = match client_ip {
        Some(ip) => {
            let context = request_context(None, Some(ip));
            evaluator.evaluate_rules_in(&config.rules, subject, resource, &context)
        }
        None => evaluator.evaluate_rules(&config.rules, subject, resource),
    };
    let decision = outcome.context("Policy rules are misconfigured")?;
    print_decision(&decision);

    Ok(if decision.allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DENIED)
    })
}
