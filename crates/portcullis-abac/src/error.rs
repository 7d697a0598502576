//! Error types for ABAC evaluation.
//!
//! A denied request is not an error: it is an ordinary [`Decision`](crate::Decision)
//! with `allowed == false`. The errors here describe caller-fixable data
//! problems (a malformed window, a rule naming an attribute that does not
//! exist) and are always propagated, never folded into a deny.

use thiserror::Error;

/// A configuration problem in the data handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The availability window is not two `HH:MM` times joined by a single `-`.
    #[error("Malformed availability window '{window}': expected HH:MM-HH:MM")]
    MalformedWindow { window: String },

    /// The availability window crosses midnight and overnight windows are rejected.
    #[error("Availability window '{window}' crosses midnight")]
    OvernightWindow { window: String },

    /// A policy rule names an attribute that resolves on neither entity.
    #[error("Policy '{rule}' references unknown attribute '{attribute}'")]
    UnknownAttribute { rule: String, attribute: String },

    /// A policy rule uses an operator outside `== != < <= > >=`.
    #[error("Policy '{rule}' uses unrecognized operator '{operator}'")]
    UnknownOperator { rule: String, operator: String },

    /// A gate that reads request attributes was evaluated without an access context.
    #[error("Gate '{gate}' requires an access context")]
    MissingContext { gate: String },

    /// A catalog entry failed to evaluate.
    #[error("Resource '{resource}': {source}")]
    Resource {
        resource: String,
        #[source]
        source: Box<ConfigurationError>,
    },
}

impl ConfigurationError {
    /// Wraps this error with the name of the catalog resource it came from.
    pub fn for_resource(self, resource: &str) -> Self {
        Self::Resource {
            resource: resource.to_string(),
            source: Box::new(self),
        }
    }
}

/// Failure to parse an attribute value or operator from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized {kind} '{value}'")]
pub struct ParseError {
    /// What was being parsed (e.g. "account status").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Result type for evaluator operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
