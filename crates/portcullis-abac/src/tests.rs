//! Scenario and property tests for portcullis-abac

use chrono::NaiveTime;
use proptest::prelude::*;
use test_case::test_case;

use crate::{
    ALWAYS_AVAILABLE, AccessContext, AccountStatus, Decision, Denial, PolicyRule, Resource,
    Subject, Tier, evaluate, evaluate_rules,
};

fn at(h: u32, m: u32) -> AccessContext {
    AccessContext::at(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn basic_subject_opens_basic_resource() {
    let decision = evaluate(
        &Subject::active(Tier::Basic),
        &Resource::new(1, "Python Basics", Tier::Basic, ALWAYS_AVAILABLE),
        &at(3, 0),
    )
    .unwrap();

    assert_eq!(decision, Decision::allow());
    assert_eq!(decision.reason, "access granted");
}

#[test]
fn basic_subject_denied_premium_resource() {
    let decision = evaluate(
        &Subject::active(Tier::Basic),
        &Resource::new(2, "Flask Advanced", Tier::Premium, ALWAYS_AVAILABLE),
        &at(12, 0),
    )
    .unwrap();

    assert!(!decision.allowed);
    assert_eq!(decision.reason, "premium subscription required");
}

#[test]
fn frozen_premium_subject_denied_before_tier_check() {
    let decision = evaluate(
        &Subject::new(AccountStatus::Frozen, Tier::Premium),
        &Resource::new(2, "Flask Advanced", Tier::Premium, ALWAYS_AVAILABLE),
        &at(12, 0),
    )
    .unwrap();

    assert!(!decision.allowed);
    assert_eq!(decision.reason, "account not active");
    assert_eq!(
        decision.denial,
        Some(Denial::AccountInactive(AccountStatus::Frozen))
    );
}

#[test_case(10, 0, true; "inside window")]
#[test_case(20, 0, false; "after window")]
#[test_case(9, 0, true; "at start")]
#[test_case(18, 0, true; "at end")]
#[test_case(8, 59, false; "just before start")]
fn office_hours_window(h: u32, m: u32, allowed: bool) {
    let resource = Resource::new(1, "Python Basics", Tier::Basic, "09:00-18:00");
    let decision = evaluate(&Subject::active(Tier::Basic), &resource, &at(h, m)).unwrap();

    assert_eq!(decision.allowed, allowed);
    if !allowed {
        assert!(decision.reason.contains("09:00"));
        assert!(decision.reason.contains("18:00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn any_status() -> impl Strategy<Value = AccountStatus> {
    prop_oneof![
        Just(AccountStatus::Active),
        Just(AccountStatus::Frozen),
        Just(AccountStatus::Suspended),
    ]
}

fn any_tier() -> impl Strategy<Value = Tier> {
    prop_oneof![Just(Tier::Basic), Just(Tier::Premium)]
}

fn any_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

/// A well-formed `HH:MM-HH:MM` window with `start <= end`.
fn any_daytime_window() -> impl Strategy<Value = (NaiveTime, NaiveTime, String)> {
    (0u32..24 * 60, 0u32..24 * 60).prop_map(|(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let start = NaiveTime::from_hms_opt(lo / 60, lo % 60, 0).unwrap();
        let end = NaiveTime::from_hms_opt(hi / 60, hi % 60, 0).unwrap();
        let raw = format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"));
        (start, end, raw)
    })
}

proptest! {
    /// Property: inactive accounts are always denied, whatever the tier or window
    #[test]
    fn prop_inactive_always_denied(
        status in any_status().prop_filter("inactive", |s| *s != AccountStatus::Active),
        tier in any_tier(),
        required in any_tier(),
        (_, _, window) in any_daytime_window(),
        now in any_time(),
    ) {
        let resource = Resource::new(1, "r", required, &window);
        let decision = evaluate(&Subject::new(status, tier), &resource, &AccessContext::at(now)).unwrap();

        prop_assert!(!decision.allowed);
        prop_assert_eq!(decision.reason, "account not active");
    }

    /// Property: active non-premium subjects never open premium resources
    #[test]
    fn prop_premium_required(
        (_, _, window) in any_daytime_window(),
        now in any_time(),
    ) {
        let resource = Resource::new(1, "r", Tier::Premium, &window);
        let decision = evaluate(&Subject::active(Tier::Basic), &resource, &AccessContext::at(now)).unwrap();

        prop_assert!(!decision.allowed);
        prop_assert_eq!(decision.denial, Some(Denial::PremiumRequired));
    }

    /// Property: the sentinel window never restricts access
    #[test]
    fn prop_sentinel_never_fires(tier in any_tier(), now in any_time()) {
        let resource = Resource::new(1, "r", Tier::Basic, ALWAYS_AVAILABLE);
        let decision = evaluate(&Subject::active(tier), &resource, &AccessContext::at(now)).unwrap();
        prop_assert!(decision.allowed);
    }

    /// Property: for start <= end, access is granted iff start <= now <= end
    #[test]
    fn prop_window_is_inclusive_interval(
        (start, end, window) in any_daytime_window(),
        now in any_time(),
    ) {
        prop_assume!(window != ALWAYS_AVAILABLE);
        let resource = Resource::new(1, "r", Tier::Basic, &window);
        let decision = evaluate(&Subject::active(Tier::Basic), &resource, &AccessContext::at(now)).unwrap();

        prop_assert_eq!(decision.allowed, start <= now && now <= end);
    }

    /// Property: evaluation is deterministic for identical inputs
    #[test]
    fn prop_evaluation_is_idempotent(
        status in any_status(),
        tier in any_tier(),
        required in any_tier(),
        (_, _, window) in any_daytime_window(),
        now in any_time(),
    ) {
        let subject = Subject::new(status, tier);
        let resource = Resource::new(1, "r", required, &window);
        let ctx = AccessContext::at(now);

        prop_assert_eq!(
            evaluate(&subject, &resource, &ctx).unwrap(),
            evaluate(&subject, &resource, &ctx).unwrap()
        );
    }

    /// Property: an empty rule set always allows
    #[test]
    fn prop_empty_rules_allow(status in any_status(), tier in any_tier(), required in any_tier()) {
        let resource = Resource::new(1, "r", required, ALWAYS_AVAILABLE);
        let decision = evaluate_rules(&[], &Subject::new(status, tier), &resource).unwrap();
        prop_assert!(decision.allowed);
    }

    /// Property: rules that all hold allow; breaking any single one denies and names it
    #[test]
    fn prop_rules_are_conjunctive(
        status in any_status(),
        tier in any_tier(),
        id in 1u64..1000,
        broken in 0usize..3,
    ) {
        let subject = Subject::new(status, tier);
        let resource = Resource::new(id, "r", Tier::Basic, ALWAYS_AVAILABLE);

        let mut rules = vec![
            PolicyRule::new("status", "account_status", "==", status.as_str()),
            PolicyRule::new("tier", "subscription_tier", "<=", "premium"),
            PolicyRule::new("id", "id", ">=", &id.to_string()),
        ];
        prop_assert!(evaluate_rules(&rules, &subject, &resource).unwrap().allowed);

        rules[broken].operator = "!=".to_string();
        rules[broken].value = match broken {
            0 => status.as_str().to_string(),
            1 => tier.as_str().to_string(),
            _ => id.to_string(),
        };
        let decision = evaluate_rules(&rules, &subject, &resource).unwrap();
        prop_assert!(!decision.allowed);
        prop_assert_eq!(
            decision.reason,
            format!("policy '{}' not satisfied", rules[broken].name)
        );
    }
}
