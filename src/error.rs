use crate::error_code::ErrorClass;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "admission.refill_rate")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_loader", "response_validator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the optimization client.
///
/// Variants map one-to-one onto an [`ErrorClass`] via [`Error::class`]; the class decides
/// retry behaviour in the scheduler.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Authentication rejected: HTTP {status}: {message}")]
    Auth { status: u16, message: String },

    #[error("Rate limited on every model ({models_tried} tried): {message}")]
    RateLimited { message: String, models_tried: usize },

    #[error("Provider server error: HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Remote error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Provider call timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid provider response: {message}")]
    InvalidResponse { message: String },

    #[error("Request queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Optimizer client shut down before the request resolved")]
    Shutdown,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Classify a non-success HTTP status into the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorClass::from_http_status(status) {
            ErrorClass::Authentication => Error::Auth { status, message },
            ErrorClass::RateLimited => Error::RateLimited {
                message,
                models_tried: 1,
            },
            ErrorClass::ServerError => Error::Server { status, message },
            _ => Error::Remote { status, message },
        }
    }

    /// The classification used for retry decisions and user-facing messages.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Configuration { .. } | Error::Yaml(_) | Error::Io(_) => ErrorClass::Configuration,
            Error::Auth { .. } => ErrorClass::Authentication,
            Error::RateLimited { .. } => ErrorClass::RateLimited,
            Error::Server { .. } => ErrorClass::ServerError,
            Error::Remote { status, .. } => ErrorClass::from_http_status(*status),
            Error::Transport(TransportError::Http(e)) if e.is_timeout() => ErrorClass::Timeout,
            Error::Transport(_) => ErrorClass::Network,
            Error::Timeout { .. } => ErrorClass::Timeout,
            Error::Validation { .. } => ErrorClass::Validation,
            Error::InvalidResponse { .. } | Error::Serialization(_) => ErrorClass::InvalidResponse,
            Error::QueueFull { .. } => ErrorClass::QueueFull,
            Error::Shutdown => ErrorClass::Shutdown,
        }
    }

    /// Shorthand for `self.class().retryable()`.
    pub fn is_retryable(&self) -> bool {
        self.class().retryable()
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
