//! Soft-failure results.
//!
//! Upstream outages, short histories and missing fields never abort a batch.
//! Scorers and collaborator calls return a [`Scored`] value instead, which
//! always carries a usable (possibly neutral) value and, when something went
//! wrong, the [`Degraded`] reason explaining why the value is neutral.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a neutral value was substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degraded {
    /// A collaborator returned an error.
    Upstream { source: String, reason: String },
    /// A collaborator did not answer within its deadline.
    Timeout { source: String, after_ms: u64 },
    /// Too few points for an indicator window.
    InsufficientData { required: usize, available: usize },
    /// A required field was absent or unusable.
    MissingInput { field: String },
}

impl fmt::Display for Degraded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degraded::Upstream { source, reason } => write!(f, "{source} unavailable: {reason}"),
            Degraded::Timeout { source, after_ms } => {
                write!(f, "{source} timed out after {after_ms}ms")
            }
            Degraded::InsufficientData {
                required,
                available,
            } => write!(f, "insufficient data: need {required}, have {available}"),
            Degraded::MissingInput { field } => write!(f, "missing input: {field}"),
        }
    }
}

/// A value plus an optional degradation flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    pub value: T,
    pub degraded: Option<Degraded>,
}

impl<T> Scored<T> {
    /// A value computed from complete inputs.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            degraded: None,
        }
    }

    /// A fallback value with the reason it was used.
    pub fn degraded(value: T, reason: Degraded) -> Self {
        Self {
            value,
            degraded: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Split into the value and the reason, if any.
    pub fn into_parts(self) -> (T, Option<Degraded>) {
        (self.value, self.degraded)
    }
}

impl<T: Default> Scored<T> {
    /// The neutral default with a reason.
    pub fn neutral(reason: Degraded) -> Self {
        Self::degraded(T::default(), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_carries_reason() {
        let scored: Scored<f64> = Scored::neutral(Degraded::InsufficientData {
            required: 20,
            available: 3,
        });

        assert_eq!(scored.value, 0.0);
        assert!(scored.is_degraded());
        assert_eq!(
            scored.degraded.unwrap().to_string(),
            "insufficient data: need 20, have 3"
        );
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_string(&Degraded::MissingInput {
            field: "close".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"missing_input","field":"close"}"#);
    }
}
