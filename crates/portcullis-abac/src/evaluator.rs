//! ABAC evaluation engine.
//!
//! Every check is a [`Gate`]. Built-in checks (account status, tier, time
//! window) and data-driven [`PolicyRule`]s are evaluated by the same loop:
//! gates run in order and the first one that fails decides the outcome.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attributes::{AccessContext, AccountStatus, Resource, Subject, Tier};
use crate::error::{ConfigurationError, Result};
use crate::policy::PolicyRule;
use crate::window::{OvernightWindows, TimeWindow};

// ============================================================================
// Decision
// ============================================================================

/// Why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The subject's account is not active.
    AccountInactive(AccountStatus),
    /// The resource needs a premium subscription the subject does not hold.
    PremiumRequired,
    /// The request falls outside the resource's availability window.
    OutsideWindow { start: String, end: String },
    /// A data-driven rule did not hold.
    PolicyNotSatisfied { rule: String },
}

impl Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountInactive(_) => f.write_str("account not active"),
            Self::PremiumRequired => f.write_str("premium subscription required"),
            Self::OutsideWindow { start, end } => {
                write!(f, "resource available from {start} to {end}")
            }
            Self::PolicyNotSatisfied { rule } => write!(f, "policy '{rule}' not satisfied"),
        }
    }
}

/// Reason attached to every allow decision.
pub const ACCESS_GRANTED: &str = "access granted";

/// The result of evaluating an access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether access is granted.
    pub allowed: bool,
    /// Human-readable explanation, suitable for showing to the end user.
    pub reason: String,
    /// The failed condition, or `None` when access is granted.
    pub denial: Option<Denial>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: ACCESS_GRANTED.to_string(),
            denial: None,
        }
    }

    pub fn deny(denial: Denial) -> Self {
        Self {
            allowed: false,
            reason: denial.to_string(),
            denial: Some(denial),
        }
    }
}

// ============================================================================
// Gates
// ============================================================================

/// One ordered check in the evaluation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Denies unless the subject's account is active.
    Status,
    /// Denies premium resources to non-premium subjects.
    Tier,
    /// Denies requests outside the resource's availability window.
    TimeWindow(TimeWindow),
    /// Denies unless the rule holds.
    Attribute(PolicyRule),
}

impl Gate {
    pub fn name(&self) -> &str {
        match self {
            Self::Status => "status",
            Self::Tier => "tier",
            Self::TimeWindow(_) => "time-window",
            Self::Attribute(rule) => &rule.name,
        }
    }

    /// Runs the gate. `Ok(Some(_))` is a denial; `Ok(None)` lets the request through.
    fn check(
        &self,
        subject: &Subject,
        resource: &Resource,
        context: Option<&AccessContext>,
    ) -> Result<Option<Denial>> {
        match self {
            Self::Status => Ok((!subject.is_active())
                .then_some(Denial::AccountInactive(subject.account_status))),
            Self::Tier => Ok((resource.required_access_level == Tier::Premium
                && subject.subscription_tier != Tier::Premium)
                .then_some(Denial::PremiumRequired)),
            Self::TimeWindow(window) => {
                let ctx = context.ok_or_else(|| ConfigurationError::MissingContext {
                    gate: self.name().to_string(),
                })?;
                Ok((!window.contains(ctx.now)).then(|| Denial::OutsideWindow {
                    start: window.start_label().to_string(),
                    end: window.end_label().to_string(),
                }))
            }
            Self::Attribute(rule) => Ok((!rule.is_satisfied(subject, resource, context)?)
                .then(|| Denial::PolicyNotSatisfied {
                    rule: rule.name.clone(),
                })),
        }
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Tunables for the evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorOptions {
    /// Treatment of windows whose start is later than their end.
    pub overnight_windows: OvernightWindows,
}

/// Stateless policy evaluator.
///
/// Holds only its options; every call works on its own inputs and may run
/// concurrently with any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    options: EvaluatorOptions,
}

impl Evaluator {
    pub fn new(options: EvaluatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EvaluatorOptions {
        self.options
    }

    /// Builds the built-in gates for `resource`, in evaluation order.
    ///
    /// The availability window is parsed here, before any gate runs, so a
    /// malformed window is reported no matter which subject is asking.
    pub fn builtin_gates(&self, resource: &Resource) -> Result<Vec<Gate>> {
        let window = TimeWindow::parse(&resource.available_window, self.options.overnight_windows)?;

        let mut gates = vec![Gate::Status, Gate::Tier];
        if !window.is_always_available() {
            gates.push(Gate::TimeWindow(window));
        }
        Ok(gates)
    }

    /// Evaluates the built-in checks: account status, tier, time window.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError`] if the resource's availability window is malformed
    /// (or crosses midnight while overnight windows are rejected).
    pub fn evaluate(
        &self,
        subject: &Subject,
        resource: &Resource,
        context: &AccessContext,
    ) -> Result<Decision> {
        let gates = self
            .builtin_gates(resource)
            .inspect_err(|e| warn!(resource = %resource.name, error = %e, "Invalid resource"))?;
        run_gates(&gates, subject, resource, Some(context))
    }

    /// Evaluates the data-driven rules that apply to `resource`.
    ///
    /// All applicable rules must hold. The first failing rule, in input order,
    /// names the denial. With no applicable rules access is granted.
    ///
    /// # Errors
    ///
    /// Every applicable rule is validated before any of them runs, so a rule
    /// with an unknown operator or attribute is reported even when an earlier
    /// rule denies. A rule reading `client_ip` needs a context; use
    /// [`Evaluator::evaluate_rules_in`] for those.
    pub fn evaluate_rules(
        &self,
        rules: &[PolicyRule],
        subject: &Subject,
        resource: &Resource,
    ) -> Result<Decision> {
        let gates = rule_gates(rules, resource, None)?;
        run_gates(&gates, subject, resource, None)
    }

    /// Evaluates the applicable rules against a request context.
    pub fn evaluate_rules_in(
        &self,
        rules: &[PolicyRule],
        subject: &Subject,
        resource: &Resource,
        context: &AccessContext,
    ) -> Result<Decision> {
        let gates = rule_gates(rules, resource, Some(context))?;
        run_gates(&gates, subject, resource, Some(context))
    }

    /// Evaluates the built-in checks followed by the applicable rules.
    ///
    /// # Errors
    ///
    /// The window and every applicable rule are validated before any gate
    /// runs; a misconfiguration is reported whatever the subject.
    pub fn evaluate_with_rules(
        &self,
        rules: &[PolicyRule],
        subject: &Subject,
        resource: &Resource,
        context: &AccessContext,
    ) -> Result<Decision> {
        let mut gates = self.builtin_gates(resource)?;
        gates.extend(rule_gates(rules, resource, Some(context))?);
        run_gates(&gates, subject, resource, Some(context))
    }

    /// Evaluates every resource of a catalog, in catalog order.
    ///
    /// # Errors
    ///
    /// The first [`ConfigurationError::Resource`] encountered, naming the
    /// offending resource.
    pub fn evaluate_catalog<'a>(
        &self,
        subject: &Subject,
        resources: &'a [Resource],
        context: &AccessContext,
    ) -> Result<Vec<CatalogEntry<'a>>> {
        resources
            .iter()
            .map(|resource| {
                self.evaluate(subject, resource, context)
                    .map(|decision| CatalogEntry { resource, decision })
                    .map_err(|e| e.for_resource(&resource.name))
            })
            .collect()
    }

    /// Returns the resources of a catalog the subject may access right now.
    pub fn accessible<'a>(
        &self,
        subject: &Subject,
        resources: &'a [Resource],
        context: &AccessContext,
    ) -> Result<Vec<&'a Resource>> {
        Ok(self
            .evaluate_catalog(subject, resources, context)?
            .into_iter()
            .filter(|entry| entry.decision.allowed)
            .map(|entry| entry.resource)
            .collect())
    }
}

/// A catalog resource paired with its decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub resource: &'a Resource,
    pub decision: Decision,
}

/// Gates for the rules that apply to `resource`, each validated up front.
fn rule_gates(
    rules: &[PolicyRule],
    resource: &Resource,
    context: Option<&AccessContext>,
) -> Result<Vec<Gate>> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(resource))
        .map(|rule| {
            rule.validate()?;
            if rule.needs_context() && context.is_none() {
                return Err(ConfigurationError::MissingContext {
                    gate: rule.name.clone(),
                });
            }
            Ok(Gate::Attribute(rule.clone()))
        })
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| warn!(resource = %resource.name, error = %e, "Invalid policy rule"))
}

fn run_gates(
    gates: &[Gate],
    subject: &Subject,
    resource: &Resource,
    context: Option<&AccessContext>,
) -> Result<Decision> {
    for gate in gates {
        let outcome = gate
            .check(subject, resource, context)
            .inspect_err(|e| warn!(gate = gate.name(), error = %e, "Gate misconfigured"))?;

        if let Some(denial) = outcome {
            debug!(
                gate = gate.name(),
                status = %subject.account_status,
                tier = %subject.subscription_tier,
                resource = %resource.name,
                client_ip = context.and_then(|c| c.client_ip.as_deref()),
                reason = %denial,
                "Access denied"
            );
            return Ok(Decision::deny(denial));
        }
    }

    debug!(
        status = %subject.account_status,
        tier = %subject.subscription_tier,
        resource = %resource.name,
        gates = gates.len(),
        "Access granted"
    );
    Ok(Decision::allow())
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates the built-in checks with default options.
pub fn evaluate(
    subject: &Subject,
    resource: &Resource,
    context: &AccessContext,
) -> Result<Decision> {
    Evaluator::default().evaluate(subject, resource, context)
}

/// Evaluates data-driven rules with default options.
pub fn evaluate_rules(
    rules: &[PolicyRule],
    subject: &Subject,
    resource: &Resource,
) -> Result<Decision> {
    Evaluator::default().evaluate_rules(rules, subject, resource)
}

// ============================================================================
// Tests
// ============================================================================
