//! Error, warning and option types shared by the interpreter layers.
//!
//! The state records themselves never fail: the only signal they raise is
//! [`StateStack::restore`](crate::stack::StateStack::restore) returning
//! `false`. [`PdfError`] and [`InterpretWarning`] are what the interpreter
//! reports on top of that, and [`InterpretOptions`] decides which of the two
//! a given problem becomes.

use std::fmt;

/// Fatal error types for content stream interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// Error resolving font information.
    FontError(String),
    /// A text parameter that must be set before this operator was not.
    MissingTextParameter {
        /// Operator that needed the parameter (e.g. "Tj").
        operator: String,
        /// The missing parameter (e.g. "font").
        parameter: String,
    },
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_stack_depth").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::MissingTextParameter {
                operator,
                parameter,
            } => write!(f, "operator {operator} requires {parameter} to be set"),
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

/// Machine-readable warning code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum InterpretWarningCode {
    /// `Q` with no matching `q`.
    UnbalancedRestore,
    /// Text shown with no font selected, or `Tf` naming an unknown font.
    MissingFont,
    /// A named resource (ExtGState, color space, XObject) was not found.
    MissingResource,
    /// Operands of the wrong type or count.
    MalformedOperands,
    /// An operator this interpreter does not handle.
    UnsupportedOperator,
    /// `/TK` set through `gs` inside a text object.
    TextKnockoutInTextObject,
    /// The content ended inside a `BT` ... `ET` block.
    UnterminatedTextObject,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl InterpretWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            InterpretWarningCode::UnbalancedRestore => "UNBALANCED_RESTORE",
            InterpretWarningCode::MissingFont => "MISSING_FONT",
            InterpretWarningCode::MissingResource => "MISSING_RESOURCE",
            InterpretWarningCode::MalformedOperands => "MALFORMED_OPERANDS",
            InterpretWarningCode::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            InterpretWarningCode::TextKnockoutInTextObject => "TEXT_KNOCKOUT_IN_TEXT_OBJECT",
            InterpretWarningCode::UnterminatedTextObject => "UNTERMINATED_TEXT_OBJECT",
            InterpretWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for InterpretWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal problem found while interpreting a content stream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpretWarning {
    /// Machine-readable warning code.
    pub code: InterpretWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Index of the operator in the content stream.
    pub operator_index: Option<usize>,
    /// Name of the operator (e.g. "Q").
    pub operator: Option<String>,
    /// Font name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl InterpretWarning {
    /// Create a warning with a specific code and description.
    pub fn new(code: InterpretWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            operator_index: None,
            operator: None,
            font_name: None,
        }
    }

    /// Attach the operator position and name.
    pub fn at_operator(mut self, index: usize, operator: impl Into<String>) -> Self {
        self.operator_index = Some(index);
        self.operator = Some(operator.into());
        self
    }

    /// Attach a font name.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// Convert this warning into a [`PdfError`].
    ///
    /// Used by strict mode to escalate warnings to errors.
    pub fn to_error(&self) -> PdfError {
        match self.code {
            InterpretWarningCode::MissingFont => PdfError::FontError(self.to_string()),
            _ => PdfError::InterpreterError(self.to_string()),
        }
    }
}

impl fmt::Display for InterpretWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        match (self.operator_index, &self.operator) {
            (Some(index), Some(op)) => write!(f, " [operator #{index} {op}]")?,
            (Some(index), None) => write!(f, " [operator #{index}]")?,
            _ => {}
        }
        Ok(())
    }
}

/// Options controlling interpretation limits and warning behavior.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpretOptions {
    /// Maximum nesting of form XObjects and transparency groups (default: 10).
    pub max_recursion_depth: usize,
    /// Maximum graphics state stack depth (default: None = no limit).
    pub max_stack_depth: Option<usize>,
    /// Whether to deliver warnings to the handler (default: true).
    pub collect_warnings: bool,
    /// When true, any warning is escalated to an error (default: false).
    pub strict_mode: bool,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            max_stack_depth: None,
            collect_warnings: true,
            strict_mode: false,
        }
    }
}

impl InterpretOptions {
    /// Options that turn every warning into an error.
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }
}
