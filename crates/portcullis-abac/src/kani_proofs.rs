//! Kani proofs for ABAC evaluation
//!
//! These proofs verify correctness properties of the gate pipeline using
//! bounded model checking.
//!
//! Run with: `cargo kani --tests --harness verify_*`

#[cfg(kani)]
use crate::attributes::{AccessContext, AccountStatus, Resource, Subject, Tier};
#[cfg(kani)]
use crate::evaluator::{self, Denial};
#[cfg(kani)]
use crate::window::{ALWAYS_AVAILABLE, OvernightWindows, TimeWindow};
#[cfg(kani)]
use chrono::NaiveTime;

#[cfg(kani)]
fn any_status() -> AccountStatus {
    match kani::any::<u8>() % 3 {
        0 => AccountStatus::Active,
        1 => AccountStatus::Frozen,
        _ => AccountStatus::Suspended,
    }
}

#[cfg(kani)]
fn any_tier() -> Tier {
    if kani::any() { Tier::Premium } else { Tier::Basic }
}

#[cfg(kani)]
fn any_time() -> NaiveTime {
    let secs: u32 = kani::any();
    kani::assume(secs < 86_400);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap()
}

/// Proof: evaluation determinism
///
/// **Property**: Same inputs always produce the same decision
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_evaluation_determinism() {
    let subject = Subject::new(any_status(), any_tier());
    let resource = Resource::new(1, "Python Basics", any_tier(), "09:00-18:00");
    let ctx = AccessContext::at(any_time());

    let first = evaluator::evaluate(&subject, &resource, &ctx);
    let second = evaluator::evaluate(&subject, &resource, &ctx);

    assert_eq!(first, second);
}

/// Proof: status gate precedence
///
/// **Property**: An inactive account is denied for every tier, level and time,
/// and the denial always names the account status
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_inactive_always_denied() {
    let status = any_status();
    kani::assume(status != AccountStatus::Active);

    let subject = Subject::new(status, any_tier());
    let resource = Resource::new(1, "Flask Advanced", any_tier(), "09:00-18:00");
    let decision = evaluator::evaluate(&subject, &resource, &AccessContext::at(any_time()))
        .expect("well-formed window");

    assert!(!decision.allowed);
    assert_eq!(decision.denial, Some(Denial::AccountInactive(status)));
}

/// Proof: sentinel window
///
/// **Property**: The always-available window never produces a time denial
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_sentinel_window_never_fires() {
    let subject = Subject::active(Tier::Premium);
    let resource = Resource::new(2, "Flask Advanced", Tier::Premium, ALWAYS_AVAILABLE);
    let decision = evaluator::evaluate(&subject, &resource, &AccessContext::at(any_time()))
        .expect("well-formed window");

    assert!(decision.allowed);
}

/// Proof: inclusive window bounds
///
/// **Property**: Both endpoints of a daytime window are inside it
#[cfg(kani)]
#[kani::proof]
#[kani::unwind(8)]
fn verify_window_bounds_inclusive() {
    let window = TimeWindow::parse("09:00-18:00", OvernightWindows::Reject).unwrap();
    assert!(window.contains(window.start()));
    assert!(window.contains(window.end()));
}
