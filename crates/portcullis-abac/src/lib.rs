//! # portcullis-abac: Attribute-Based Access Control
//!
//! Decides whether a subject may open a catalog resource, given the
//! subject's account and subscription, the resource's access level and
//! availability window, and the time of the request.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Access Request                              │
//! │  (Subject + Resource + AccessContext)        │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Gate pipeline (first failure wins)          │
//! │  ├─ Status: account must be active           │
//! │  ├─ Tier: premium resources need premium     │
//! │  ├─ TimeWindow: now within HH:MM-HH:MM       │
//! │  └─ Attribute: data-driven policy rules      │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - allowed                                   │
//! │  - human-readable reason                     │
//! │  - typed denial                              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Denials are ordinary decisions. Bad data (a malformed window, a rule
//! naming an attribute that does not exist, an unknown operator) is a
//! [`ConfigurationError`] and is never reported as a denial.
//!
//! ## Examples
//!
//! ```
//! use portcullis_abac::{AccessContext, FixedClock, Resource, Subject, Tier, evaluate};
//! use chrono::NaiveTime;
//!
//! let subject = Subject::active(Tier::Basic);
//! let resource = Resource::new(1, "Python Basics", Tier::Basic, "09:00-18:00");
//!
//! let clock = FixedClock::new(NaiveTime::from_hms_opt(20, 0, 0).unwrap());
//! let decision = evaluate(&subject, &resource, &AccessContext::from_clock(&clock))?;
//!
//! assert!(!decision.allowed);
//! assert_eq!(decision.reason, "resource available from 09:00 to 18:00");
//! # Ok::<(), portcullis_abac::ConfigurationError>(())
//! ```
//!
//! Data-driven rules:
//!
//! ```
//! use portcullis_abac::{PolicyRule, Resource, StandardRules, Subject, Tier, evaluate_rules};
//!
//! let rules = vec![
//!     StandardRules::active_account(),
//!     PolicyRule::new("paid-only", "subscription_tier", ">=", "premium"),
//! ];
//! let resource = Resource::new(2, "Flask Advanced", Tier::Premium, "00:00-23:59");
//!
//! let decision = evaluate_rules(&rules, &Subject::active(Tier::Basic), &resource)?;
//! assert_eq!(decision.reason, "policy 'paid-only' not satisfied");
//! # Ok::<(), portcullis_abac::ConfigurationError>(())
//! ```

pub mod attributes;
pub mod clock;
pub mod error;
pub mod evaluator;
pub mod policy;
pub mod window;

#[cfg(test)]
mod tests;

// Kani proofs for bounded model checking
#[cfg(any(test, kani))]
mod kani_proofs;

pub use attributes::{
    AccessContext, AccountStatus, AttributeValue, Resource, ResourceId, Subject, Tier,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigurationError, ParseError, Result};
pub use evaluator::{
    CatalogEntry, Decision, Denial, Evaluator, EvaluatorOptions, Gate, evaluate, evaluate_rules,
};
pub use policy::{Operator, PolicyRule, StandardRules};
pub use window::{ALWAYS_AVAILABLE, OvernightWindows, TimeWindow};
