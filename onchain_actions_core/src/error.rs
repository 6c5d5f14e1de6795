//! Error taxonomy shared by providers, the validator and the registry.

use thiserror::Error;

/// Category of an [`ActionError`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    UnknownAction,
    NameCollision,
    HandlerExecution,
}

#[derive(Debug, Error)]
pub enum ActionError {
    /// A provider could not be constructed from its inputs.
    #[error("failed to initialize {provider} action provider: {source:#}")]
    Configuration {
        provider: String,
        #[source]
        source: anyhow::Error,
    },

    /// Arguments were rejected before the handler ran.
    #[error("invalid argument `{field}` for action `{action}`: {reason}")]
    Validation {
        action: String,
        field: String,
        reason: String,
    },

    /// No action with this name exists in the active catalog.
    #[error("unknown action: {name}")]
    UnknownAction { name: String },

    #[error("action `{name}` is registered by both `{first_provider}` and `{second_provider}`")]
    NameCollision {
        name: String,
        first_provider: String,
        second_provider: String,
    },

    /// The handler (usually the external call inside it) failed.
    #[error("action `{action}` failed: {source:#}")]
    HandlerExecution {
        action: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ActionError {
    pub fn configuration(provider: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            source: source.into(),
        }
    }

    pub fn validation(
        action: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            action: action.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::UnknownAction { .. } => ErrorKind::UnknownAction,
            Self::NameCollision { .. } => ErrorKind::NameCollision,
            Self::HandlerExecution { .. } => ErrorKind::HandlerExecution,
        }
    }

    /// Field a validation error is attributed to.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Underlying cause for construction and handler failures.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Configuration { source, .. } | Self::HandlerExecution { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
