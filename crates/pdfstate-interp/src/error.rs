//! Error type for the interpreter layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`InterpretError`]
//! wraps the core [`PdfError`] and converts back into it.

use pdfstate_core::PdfError;
use thiserror::Error;

/// Error returned when interpretation of a content stream must stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    /// A core library error.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Text shown before any font was selected, or with an unknown font.
    #[error("operator {operator} at #{operator_index}: no usable font")]
    MissingFont {
        operator: String,
        operator_index: usize,
    },

    /// `Q` with no matching `q`. Only raised in strict mode.
    #[error("unbalanced Q at operator #{operator_index}")]
    UnbalancedRestore { operator_index: usize },

    /// Forms or groups nested deeper than the configured limit.
    #[error("form nesting exceeds {max} levels")]
    RecursionLimit { max: usize },

    /// Any other interpretation failure.
    #[error("interpreter error: {0}")]
    Interpreter(String),
}

impl From<InterpretError> for PdfError {
    fn from(err: InterpretError) -> Self {
        match err {
            InterpretError::Pdf(e) => e,
            InterpretError::MissingFont { operator, .. } => PdfError::MissingTextParameter {
                operator,
                parameter: "font".to_string(),
            },
            InterpretError::RecursionLimit { max } => PdfError::ResourceLimitExceeded {
                limit_name: "max_recursion_depth".to_string(),
                limit_value: max,
                actual_value: max + 1,
            },
            other @ InterpretError::UnbalancedRestore { .. } => {
                PdfError::InterpreterError(other.to_string())
            }
            InterpretError::Interpreter(msg) => PdfError::InterpreterError(msg),
        }
    }
}
