#![no_main]

use arbitrary::Arbitrary;
use chrono::NaiveTime;
use libfuzzer_sys::fuzz_target;
use portcullis_abac::{
    AccessContext, AccountStatus, ConfigurationError, Decision, Evaluator, EvaluatorOptions,
    OvernightWindows, PolicyRule, Resource, Subject, Tier,
};

// ============================================================================
// Arbitrary Implementations
// ============================================================================

#[derive(Debug, Clone, Copy, Arbitrary)]
enum FuzzStatus {
    Active,
    Frozen,
    Suspended,
}

impl From<FuzzStatus> for AccountStatus {
    fn from(f: FuzzStatus) -> Self {
        match f {
            FuzzStatus::Active => AccountStatus::Active,
            FuzzStatus::Frozen => AccountStatus::Frozen,
            FuzzStatus::Suspended => AccountStatus::Suspended,
        }
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum FuzzTier {
    Basic,
    Premium,
}

impl From<FuzzTier> for Tier {
    fn from(f: FuzzTier) -> Self {
        match f {
            FuzzTier::Basic => Tier::Basic,
            FuzzTier::Premium => Tier::Premium,
        }
    }
}

/// Rule with free-form text, so unknown attributes and operators are reached.
#[derive(Debug, Clone, Arbitrary)]
struct FuzzRule {
    name: String,
    attribute: String,
    operator: String,
    value: String,
    scope: Option<u64>,
}

impl FuzzRule {
    fn to_rule(&self) -> PolicyRule {
        let rule = PolicyRule::new(&self.name, &self.attribute, &self.operator, &self.value);
        match self.scope {
            Some(id) => rule.scoped_to(id.into()),
            None => rule,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzRequest {
    status: FuzzStatus,
    tier: FuzzTier,
    resource_id: u64,
    required: FuzzTier,
    /// Raw window text, usually malformed.
    window: String,
    seconds_from_midnight: u32,
    reject_overnight: bool,
    rules: Vec<FuzzRule>,
}

fuzz_target!(|req: FuzzRequest| {
    let subject = Subject::new(req.status.into(), req.tier.into());
    let resource = Resource::new(req.resource_id, "fuzz", req.required.into(), &req.window);
    let Some(now) = NaiveTime::from_num_seconds_from_midnight_opt(req.seconds_from_midnight % 86_400, 0)
    else {
        return;
    };
    let ctx = AccessContext::at(now);
    let evaluator = Evaluator::new(EvaluatorOptions {
        overnight_windows: if req.reject_overnight {
            OvernightWindows::Reject
        } else {
            OvernightWindows::Wrap
        },
    });
    let rules: Vec<PolicyRule> = req.rules.iter().map(FuzzRule::to_rule).collect();

    // Evaluation must never panic, whatever the window or rule text
    let builtin = evaluator.evaluate(&subject, &resource, &ctx);
    let combined = evaluator.evaluate_with_rules(&rules, &subject, &resource, &ctx);
    let rules_only = evaluator.evaluate_rules(&rules, &subject, &resource);

    validate_invariants(&subject, &resource, &rules, &builtin, &combined, &rules_only);

    // Determinism
    assert_eq!(builtin, evaluator.evaluate(&subject, &resource, &ctx));
});

/// Validates evaluator invariants.
///
/// **Invariants checked:**
/// 1. Every decision carries a non-empty reason, and a denial iff it denies
/// 2. Inactive accounts are never granted access
/// 3. An empty rule set always allows
/// 4. Adding rules can only turn an allow into a deny, never the reverse
/// 5. An invalid applicable rule is an error, never a decision
fn validate_invariants(
    subject: &Subject,
    resource: &Resource,
    rules: &[PolicyRule],
    builtin: &Result<Decision, ConfigurationError>,
    combined: &Result<Decision, ConfigurationError>,
    rules_only: &Result<Decision, ConfigurationError>,
) {
    for decision in [builtin, combined, rules_only].into_iter().flatten() {
        assert!(!decision.reason.is_empty(), "decision must have a reason");
        assert_eq!(decision.allowed, decision.denial.is_none());
    }

    if !subject.is_active() {
        if let Ok(decision) = builtin {
            assert!(!decision.allowed, "inactive account must be denied");
        }
    }

    if rules.is_empty() {
        assert!(
            matches!(rules_only, Ok(d) if d.allowed),
            "empty rule set must allow"
        );
    }

    let misconfigured = rules
        .iter()
        .any(|rule| rule.applies_to(resource) && rule.validate().is_err());
    if misconfigured {
        assert!(combined.is_err(), "invalid rule must not yield a decision");
        assert!(rules_only.is_err(), "invalid rule must not yield a decision");
    }

    if let (Ok(with_rules), Ok(without)) = (combined, builtin) {
        if with_rules.allowed {
            assert!(without.allowed, "rules must never widen access");
        }
        if !without.allowed {
            assert_eq!(with_rules, without, "built-in denial must win over rules");
        }
    }
}
