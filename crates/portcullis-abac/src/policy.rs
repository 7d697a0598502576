//! Data-driven policy rules.
//!
//! A rule names an attribute, an operator and a comparison value. Rules are
//! snapshots from a policy store, so the operator is kept as text and parsed
//! when the rule is evaluated; an unrecognized operator is a configuration
//! error, not a deny.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::{
    AccessContext, AccountStatus, AttributeValue, CONTEXT_ATTRIBUTES, Resource, ResourceId,
    Subject, Tier, is_known_attribute,
};
use crate::error::{ConfigurationError, ParseError, Result};

// ============================================================================
// Operator
// ============================================================================

/// Comparison operator of a policy rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns true if `actual <op> expected` given their ordering.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            _ => Err(ParseError::new("operator", s)),
        }
    }
}

// ============================================================================
// Typed comparison
// ============================================================================

/// Orders a resolved attribute against a rule's comparison value.
///
/// Enum attributes compare by enum order when the value parses as the same
/// enum. Otherwise both sides compare as integers if both parse as `u64`,
/// then as numbers if both parse as finite floats, and lexically if not.
pub fn compare(actual: &AttributeValue, expected: &str) -> Ordering {
    match actual {
        AttributeValue::Status(status) => match expected.parse::<AccountStatus>() {
            Ok(other) => status.cmp(&other),
            Err(_) => status.as_str().cmp(expected),
        },
        AttributeValue::Tier(tier) => match expected.parse::<Tier>() {
            Ok(other) => tier.cmp(&other),
            Err(_) => tier.as_str().cmp(expected),
        },
        AttributeValue::Number(n) => compare_text(&n.to_string(), expected),
        AttributeValue::Text(text) => compare_text(text, expected),
    }
}

fn compare_text(actual: &str, expected: &str) -> Ordering {
    if let (Ok(a), Ok(b)) = (actual.trim().parse::<u64>(), expected.trim().parse::<u64>()) {
        return a.cmp(&b);
    }
    match (parse_number(actual), parse_number(expected)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => actual.cmp(expected),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// ============================================================================
// PolicyRule
// ============================================================================

/// A named, data-driven predicate over subject or resource attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Human-readable name, quoted in denial reasons.
    pub name: String,
    /// Attribute to inspect; resolved on the subject, then the resource, then
    /// the request context.
    #[serde(alias = "attribute_name")]
    pub attribute: String,
    /// One of `== != < <= > >=`.
    pub operator: String,
    /// Value the attribute is compared against.
    pub value: String,
    /// Restricts the rule to one resource; `None` applies it globally.
    #[serde(default, alias = "resource_id", skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceId>,
}

impl PolicyRule {
    /// Creates a global rule.
    pub fn new(name: &str, attribute: &str, operator: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            attribute: attribute.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
            resource: None,
        }
    }

    /// Restricts the rule to a single resource.
    pub fn scoped_to(mut self, resource: ResourceId) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Returns true if the rule is global or scoped to `resource`.
    pub fn applies_to(&self, resource: &Resource) -> bool {
        self.resource.is_none_or(|id| id == resource.id)
    }

    /// Parses the operator.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::UnknownOperator`] if it is not one of `== != < <= > >=`.
    pub fn operator(&self) -> Result<Operator> {
        self.operator
            .parse()
            .map_err(|_| ConfigurationError::UnknownOperator {
                rule: self.name.clone(),
                operator: self.operator.clone(),
            })
    }

    /// Checks the rule without evaluating it: the operator must parse and the
    /// attribute must name a subject, resource or context field.
    pub fn validate(&self) -> Result<()> {
        self.operator()?;
        if !is_known_attribute(&self.attribute) {
            return Err(self.unknown_attribute());
        }
        Ok(())
    }

    /// Returns true if the rule reads a request attribute such as `client_ip`.
    pub fn needs_context(&self) -> bool {
        CONTEXT_ATTRIBUTES.contains(&self.attribute.as_str())
    }

    /// Evaluates the rule for one request.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::UnknownOperator`],
    /// [`ConfigurationError::UnknownAttribute`], or
    /// [`ConfigurationError::MissingContext`] when the rule reads a request
    /// attribute and no context was supplied. An unresolvable attribute is
    /// never treated as a failed rule.
    pub fn is_satisfied(
        &self,
        subject: &Subject,
        resource: &Resource,
        context: Option<&AccessContext>,
    ) -> Result<bool> {
        let operator = self.operator()?;
        let actual = match subject
            .attribute(&self.attribute)
            .or_else(|| resource.attribute(&self.attribute))
        {
            Some(value) => value,
            None if self.needs_context() => context
                .ok_or_else(|| ConfigurationError::MissingContext {
                    gate: self.name.clone(),
                })?
                .attribute(&self.attribute)
                .ok_or_else(|| self.unknown_attribute())?,
            None => return Err(self.unknown_attribute()),
        };

        Ok(operator.holds(compare(&actual, &self.value)))
    }

    fn unknown_attribute(&self) -> ConfigurationError {
        ConfigurationError::UnknownAttribute {
            rule: self.name.clone(),
            attribute: self.attribute.clone(),
        }
    }
}

// ============================================================================
// Standard Rules
// ============================================================================

/// Pre-built rules for the subscription catalog.
pub struct StandardRules;

impl StandardRules {
    /// The subject's account must be active.
    pub fn active_account() -> PolicyRule {
        PolicyRule::new("active-account", "account_status", "==", "active")
    }

    /// The subject must hold a premium subscription.
    pub fn premium_access() -> PolicyRule {
        PolicyRule::new("premium-access", "subscription_tier", "==", "premium")
    }

    /// The rules a fresh policy store is seeded with.
    pub fn defaults() -> Vec<PolicyRule> {
        vec![Self::premium_access(), Self::active_account()]
    }
}

// ============================================================================
// Tests
// ============================================================================
