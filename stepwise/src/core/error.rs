//! Error taxonomy shared by every engine call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::matrix::Shape;

/// Stable classification of a [`SolveError`], serialized for API consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Parse,
    Dimension,
    Domain,
    Numerical,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("invalid {what}: {reason}")]
    Parse { what: String, reason: String },
    #[error("cannot compute {operation} of a {left} and a {right} matrix: {requirement}")]
    Dimension {
        operation: &'static str,
        left: Shape,
        right: Shape,
        requirement: &'static str,
    },
    #[error(
        "rows must all have the same length: row 1 has {expected} values but row {row} has {found}"
    )]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{0}")]
    Domain(String),
    #[error("the computation produced a non-finite {0}")]
    Numerical(String),
}

impl SolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolveError::Parse { .. } => ErrorKind::Parse,
            SolveError::Dimension { .. } | SolveError::Ragged { .. } => ErrorKind::Dimension,
            SolveError::Domain(_) => ErrorKind::Domain,
            SolveError::Numerical(_) => ErrorKind::Numerical,
        }
    }

    pub(crate) fn parse(what: impl Into<String>, reason: impl Into<String>) -> Self {
        SolveError::Parse {
            what: what.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        SolveError::Domain(message.into())
    }
}

/// Reject NaN and infinities instead of letting them reach a trace.
pub(crate) fn ensure_finite(value: f64, what: &str) -> Result<f64, SolveError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolveError::Numerical(what.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_message_names_both_shapes() {
        let err = SolveError::Dimension {
            operation: "A + B",
            left: Shape { rows: 2, cols: 3 },
            right: Shape { rows: 3, cols: 2 },
            requirement: "both matrices must have the same dimensions",
        };
        let message = err.to_string();
        assert!(message.contains("2×3"));
        assert!(message.contains("3×2"));
        assert_eq!(err.kind(), ErrorKind::Dimension);
    }

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert!(ensure_finite(1.5, "value").is_ok());
        assert_eq!(
            ensure_finite(f64::INFINITY, "power").map_err(|err| err.kind()),
            Err(ErrorKind::Numerical)
        );
        assert!(ensure_finite(f64::NAN, "value").is_err());
    }
}
