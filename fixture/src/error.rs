use thiserror::Error;

// Error message prefixes
const MSG_INVALID_PREFIX: &str = "Invalid";
const MSG_CANNOT_PREFIX: &str = "Cannot";

/// Result type for the `fixture_forge` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Error categories surfaced by tree building, manipulation and generation
#[derive(Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A generated value could not be assembled into an instance of `type_name`
    #[error("Construction of {type_name} failed: {message}")]
    Construction {
        /// The type whose construction failed
        type_name: String,
        /// What went wrong while assembling it
        message:   String,
    },

    /// Post-conditions rejected every candidate value
    #[error("Post-condition filter exhausted for {path} after {attempts} attempts")]
    FilterExhausted {
        /// Concrete path of the filtered node
        path:     String,
        /// Number of candidates that were generated and rejected
        attempts: usize,
    },

    /// Caller-supplied configuration is invalid (size bounds, filter types, entry targets)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A path expression could not be parsed
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression {
        /// The expression as the caller wrote it
        expression: String,
        /// Why parsing failed
        reason:     String,
    },

    /// Internal state did not match what the engine expected
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The introspection provider has no descriptor for the type
    #[error("Type not registered: {type_name}")]
    TypeNotRegistered {
        /// The unknown type
        type_name: String,
    },
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Construction { type_name, message } => f
                .debug_struct("Construction")
                .field("type_name", type_name)
                .field("message", message)
                .finish(),
            Self::FilterExhausted { path, attempts } => f
                .debug_struct("FilterExhausted")
                .field("path", path)
                .field("attempts", attempts)
                .finish(),
            Self::InvalidArgument(s) => f.debug_tuple("InvalidArgument").field(s).finish(),
            Self::InvalidExpression { expression, reason } => f
                .debug_struct("InvalidExpression")
                .field("expression", expression)
                .field("reason", reason)
                .finish(),
            Self::InvalidState(s) => f.debug_tuple("InvalidState").field(s).finish(),
            Self::TypeNotRegistered { type_name } => f
                .debug_struct("TypeNotRegistered")
                .field("type_name", type_name)
                .finish(),
        }
    }
}

impl Error {
    /// Create an "Invalid X" error
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::InvalidArgument(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create a "Cannot X" error
    pub fn cannot(action: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidArgument(format!("{MSG_CANNOT_PREFIX} {action}: {reason}"))
    }

    /// Create a construction error for the offending type
    pub fn construction(type_name: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.to_string(),
            message:   message.into(),
        }
    }

    /// Create an error for size bounds where min exceeds max
    pub fn size_bounds(min: usize, max: usize) -> Self {
        Self::InvalidArgument(format!(
            "container size min ({min}) exceeds max ({max}), should be min <= max"
        ))
    }
}
