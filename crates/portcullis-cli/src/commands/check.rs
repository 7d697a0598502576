//! Check command - one access decision.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use portcullis_abac::Subject;

use super::{find_resource, load_project, request_context};
use crate::style::{print_decision, print_labeled, print_spacer};

/// Exit status of a denied request.
pub const DENIED: u8 = 2;

pub fn run(
    project: &str,
    resource_key: &str,
    subject: &Subject,
    at: Option<NaiveTime>,
    with_rules: bool,
    client_ip: Option<&str>,
) -> Result<ExitCode> {
    let config = load_project(project)?;
    let resource = find_resource(&config, resource_key)?;
    let context = request_context(at, client_ip);

    let evaluator = config.evaluator();
    let outcome = if with_rules {
        evaluator.evaluate_with_rules(&config.rules, subject, resource, &context)
    } else {
        evaluator.evaluate(subject, resource, &context)
    };
    let decision =
        outcome.with_context(|| format!("Resource '{}' is misconfigured", resource.name))?;

    print_labeled("Resource", &format!("{} ({})", resource.name, resource.id));
    print_labeled(
        "Subject",
        &format!("{} / {}", subject.account_status, subject.subscription_tier),
    );
    print_labeled("Time", &context.now.format("%H:%M:%S").to_string());
    if let Some(ip) = &context.client_ip {
        print_labeled("Client IP", ip);
    }
    print_spacer();
    print_decision(&decision);

    Ok(if decision.allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DENIED)
    })
}
