//! Error types for extraction and plan loading.

use std::fmt;

/// Error type for extraction operations.
///
/// Configuration errors abort the whole extraction call: once one is
/// raised no partial output is returned. Type mismatches inside a
/// transformation chain are not errors; they produce the
/// [`Value::Inapplicable`](crate::Value::Inapplicable) sentinel instead.
#[derive(Debug, Clone)]
pub enum ExtractError {
    /// A chain referenced a transformation name that is not registered.
    TransformNotFound(String),
    /// A transformation factory rejected its static arguments.
    InvalidArgs { transform: String, message: String },
    /// A transformation failed at application time.
    ExecutionError { transform: String, message: String },
    /// The document backend rejected a selector string.
    InvalidSelector { selector: String, message: String },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::TransformNotFound(name) => {
                write!(f, "Transform not found: {}", name)
            }
            ExtractError::InvalidArgs { transform, message } => {
                write!(f, "Invalid arguments for transform '{}': {}", transform, message)
            }
            ExtractError::ExecutionError { transform, message } => {
                write!(f, "Transform '{}' failed: {}", transform, message)
            }
            ExtractError::InvalidSelector { selector, message } => {
                write!(f, "Invalid selector '{}': {}", selector, message)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Error type for loading declarative extraction plans.
#[derive(Debug)]
pub enum PlanError {
    /// The plan file could not be read.
    Io(String),
    /// The plan document could not be parsed.
    Parse(String),
    /// The plan document parsed but has an invalid shape.
    Invalid(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Io(msg) => write!(f, "Failed to read plan: {}", msg),
            PlanError::Parse(msg) => write!(f, "Failed to parse plan: {}", msg),
            PlanError::Invalid(msg) => write!(f, "Invalid plan: {}", msg),
        }
    }
}

impl std::error::Error for PlanError {}
