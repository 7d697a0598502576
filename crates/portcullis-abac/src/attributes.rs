//! Attribute types for ABAC evaluation.
//!
//! Three attribute categories drive access decisions:
//! - **Subject attributes**: account status, subscription tier
//! - **Resource attributes**: identity, required access level, availability window
//! - **Context attributes**: wall-clock time of the request, network origin

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::ParseError;

/// Attribute names resolvable on a [`Subject`].
pub const SUBJECT_ATTRIBUTES: &[&str] =
    &["account_status", "subscription_tier", "subscription_level"];

/// Attribute names resolvable on a [`Resource`].
pub const RESOURCE_ATTRIBUTES: &[&str] = &[
    "id",
    "name",
    "description",
    "required_access_level",
    "access_level",
    "available_window",
    "available_hours",
];

/// Attribute names resolvable on an [`AccessContext`].
pub const CONTEXT_ATTRIBUTES: &[&str] = &["client_ip"];

/// Returns true if `name` resolves on a subject, a resource or a request context.
pub fn is_known_attribute(name: &str) -> bool {
    SUBJECT_ATTRIBUTES.contains(&name)
        || RESOURCE_ATTRIBUTES.contains(&name)
        || CONTEXT_ATTRIBUTES.contains(&name)
}

// ============================================================================
// Account Status
// ============================================================================

/// Lifecycle state of a subject's account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// The account may be used.
    #[default]
    Active,
    /// The account is temporarily frozen (e.g. billing hold).
    Frozen,
    /// The account is suspended by an operator.
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Frozen => "frozen",
            Self::Suspended => "suspended",
        }
    }
}

impl Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Active, Self::Frozen, Self::Suspended]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::new("account status", s))
    }
}

// ============================================================================
// Tier
// ============================================================================

/// Subscription tier of a subject, and the access level a resource requires.
///
/// Ordered: `Basic < Premium`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Basic,
    Premium,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Basic, Self::Premium]
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::new("subscription tier", s))
    }
}

// ============================================================================
// Resource Id
// ============================================================================

/// Catalog identity of a resource. Rules use it to scope themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ResourceId> for u64 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

// ============================================================================
// Attribute Value
// ============================================================================

/// A resolved attribute, typed so rule comparisons can respect enum ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Status(AccountStatus),
    Tier(Tier),
    Number(u64),
    Text(String),
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => status.fmt(f),
            Self::Tier(tier) => tier.fmt(f),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

// ============================================================================
// Subject
// ============================================================================

/// Attributes of the authenticated actor.
///
/// Populated by the authentication layer; the evaluator only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub account_status: AccountStatus,
    #[serde(alias = "subscription_level")]
    pub subscription_tier: Tier,
}

impl Subject {
    pub fn new(account_status: AccountStatus, subscription_tier: Tier) -> Self {
        Self {
            account_status,
            subscription_tier,
        }
    }

    /// An active subject on the given tier.
    pub fn active(subscription_tier: Tier) -> Self {
        Self::new(AccountStatus::Active, subscription_tier)
    }

    pub fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    /// Resolves a named attribute, or `None` if the subject has no such field.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            "account_status" => Some(AttributeValue::Status(self.account_status)),
            "subscription_tier" | "subscription_level" => {
                Some(AttributeValue::Tier(self.subscription_tier))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Resource
// ============================================================================

/// The window used when a catalog entry does not specify one.
pub const DEFAULT_WINDOW: &str = "09:00-18:00";

fn default_window() -> String {
    DEFAULT_WINDOW.to_string()
}

/// Attributes of a protected resource.
///
/// The availability window is kept as the raw catalog string and parsed at
/// evaluation time, so a malformed value surfaces as a configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(alias = "access_level", default)]
    pub required_access_level: Tier,
    #[serde(alias = "available_hours", default = "default_window")]
    pub available_window: String,
}

impl Resource {
    pub fn new(id: u64, name: &str, required_access_level: Tier, available_window: &str) -> Self {
        Self {
            id: ResourceId::new(id),
            name: name.to_string(),
            description: String::new(),
            required_access_level,
            available_window: available_window.to_string(),
        }
    }

    /// Sets the catalog description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Resolves a named attribute, or `None` if the resource has no such field.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            "id" => Some(AttributeValue::Number(self.id.into())),
            "name" => Some(AttributeValue::Text(self.name.clone())),
            "description" => Some(AttributeValue::Text(self.description.clone())),
            "required_access_level" | "access_level" => {
                Some(AttributeValue::Tier(self.required_access_level))
            }
            "available_window" | "available_hours" => {
                Some(AttributeValue::Text(self.available_window.clone()))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Access Context
// ============================================================================

/// Ambient attributes of a single request.
///
/// Computed by the caller at request time. `now` comes from an injected
/// [`Clock`] so evaluation stays deterministic under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    /// Wall-clock time of day of the request.
    pub now: NaiveTime,
    /// Network origin of the request (String to avoid `IpAddr` serde issues).
    pub client_ip: Option<String>,
}

impl AccessContext {
    /// Context at a fixed time of day.
    pub fn at(now: NaiveTime) -> Self {
        Self {
            now,
            client_ip: None,
        }
    }

    /// Context at whatever time `clock` reports.
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::at(clock.now())
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: &str) -> Self {
        self.client_ip = Some(ip.to_string());
        self
    }

    /// Resolves a named attribute, or `None` if the context has no such field.
    ///
    /// An unrecorded client IP resolves to the empty string.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            "client_ip" => Some(AttributeValue::Text(
                self.client_ip.clone().unwrap_or_default(),
            )),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_account_status_parse_is_case_insensitive() {
        assert_eq!("active".parse::<AccountStatus>(), Ok(AccountStatus::Active));
        assert_eq!("FROZEN".parse::<AccountStatus>(), Ok(AccountStatus::Frozen));
        assert_eq!(
            "Suspended".parse::<AccountStatus>(),
            Ok(AccountStatus::Suspended)
        );
        assert!("deleted".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Basic < Tier::Premium);
        assert_eq!("premium".parse::<Tier>(), Ok(Tier::Premium));
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_subject_attribute_resolution() {
        let subject = Subject::new(AccountStatus::Frozen, Tier::Premium);

        assert_eq!(
            subject.attribute("account_status"),
            Some(AttributeValue::Status(AccountStatus::Frozen))
        );
        assert_eq!(
            subject.attribute("subscription_level"),
            Some(AttributeValue::Tier(Tier::Premium))
        );
        assert_eq!(subject.attribute("name"), None);
    }

    #[test]
    fn test_resource_attribute_resolution() {
        let resource = Resource::new(7, "SQL Database", Tier::Basic, "09:00-20:00");

        assert_eq!(resource.attribute("id"), Some(AttributeValue::Number(7)));
        assert_eq!(
            resource.attribute("access_level"),
            Some(AttributeValue::Tier(Tier::Basic))
        );
        assert_eq!(
            resource.attribute("available_hours"),
            Some(AttributeValue::Text("09:00-20:00".to_string()))
        );
        assert_eq!(resource.attribute("account_status"), None);
    }

    #[test]
    fn test_known_attributes() {
        assert!(is_known_attribute("account_status"));
        assert!(is_known_attribute("available_window"));
        assert!(is_known_attribute("description"));
        assert!(is_known_attribute("client_ip"));
        assert!(!is_known_attribute("country"));
    }

    #[test]
    fn test_resource_description() {
        let resource = Resource::new(1, "Python Basics", Tier::Basic, "09:00-18:00")
            .with_description("Python fundamentals");
        assert_eq!(
            resource.attribute("description"),
            Some(AttributeValue::Text("Python fundamentals".to_string()))
        );

        let json = serde_json::to_string(&resource).expect("serialize resource");
        let back: Resource = serde_json::from_str(&json).expect("deserialize resource");
        assert_eq!(back, resource);

        let bare = Resource::new(2, "SQL Database", Tier::Basic, "09:00-20:00");
        let json = serde_json::to_string(&bare).expect("serialize resource");
        assert!(!json.contains("description"));
    }

    #[test]
    fn test_resource_deserialize_aliases_and_defaults() {
        let json = r#"{"id": 1, "name": "Python Basics", "access_level": "premium"}"#;
        let resource: Resource = serde_json::from_str(json).expect("deserialize resource");

        assert_eq!(resource.id, ResourceId::new(1));
        assert_eq!(resource.required_access_level, Tier::Premium);
        assert_eq!(resource.available_window, DEFAULT_WINDOW);
        assert!(resource.description.is_empty());
    }

    #[test]
    fn test_context_from_clock() {
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let ctx = AccessContext::from_clock(&FixedClock::new(ten)).with_client_ip("10.0.0.1");

        assert_eq!(ctx.now, ten);
        assert_eq!(ctx.client_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(
            ctx.attribute("client_ip"),
            Some(AttributeValue::Text("10.0.0.1".to_string()))
        );
        assert_eq!(
            AccessContext::at(ten).attribute("client_ip"),
            Some(AttributeValue::Text(String::new()))
        );
        assert_eq!(ctx.attribute("now"), None);
    }
}
