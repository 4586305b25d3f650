//! Error types for action-echo.
//!
//! All fatal errors are strongly typed using thiserror. Queue-level
//! conditions (a full queue on push, an empty queue on pop) are deliberately
//! kept out of this hierarchy: they are steady-state signals handled at the
//! call site, never surfaced as fatal errors.

use thiserror::Error;

/// Configuration errors detected before any subscription work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("\"{name}\" is incorrect interface name")]
    InvalidInterface {
        name: String,
    },

    #[error("Queue size must be a positive integer, got {size}")]
    InvalidQueueSize {
        size: usize,
    },

    #[error("Truncate length must be a positive integer, got {length}")]
    InvalidTruncateLength {
        length: usize,
    },

    #[error("An action name is required")]
    MissingActionName,
}

/// Resolution errors raised while mapping an action name or explicit type
/// identifier to a schema.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("The action name '{name}' is invalid")]
    UnknownAction {
        name: String,
    },

    #[error("The action type '{name}' is invalid")]
    UnknownType {
        name: String,
    },
}

/// Transport errors from the middleware collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to subscribe to '{channel}': {reason}")]
    SubscribeFailed {
        channel: String,
        reason: String,
    },

    #[error("Middleware context is no longer alive")]
    ContextDown,
}

/// Top-level error type for action-echo.
///
/// Configuration and resolution errors abort before any concurrency is
/// started, so there is never partial subscription state to unwind.
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl EchoError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is a resolution error.
    #[must_use]
    pub const fn is_resolve(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }

    /// Returns true if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for action-echo operations.
pub type EchoResult<T> = Result<T, EchoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_invalid_interface() {
        let err = ConfigError::InvalidInterface {
            name: "bogus".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("bogus"));
        assert!(msg.contains("incorrect interface name"));
    }

    #[test]
    fn test_config_error_queue_size() {
        let err = ConfigError::InvalidQueueSize { size: 0 };
        let msg = format!("{err}");
        assert!(msg.contains("positive integer"));
        assert!(msg.contains('0'));
    }

    #[test]
    fn test_resolve_error_unknown_action() {
        let err = ResolveError::UnknownAction {
            name: "/fibonacci".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("/fibonacci"));
        assert!(msg.contains("invalid"));
    }

    #[test]
    fn test_echo_error_from_config() {
        let config_err = ConfigError::MissingActionName;
        let echo_err: EchoError = config_err.into();
        assert!(echo_err.is_config());
        assert!(!echo_err.is_resolve());
    }

    #[test]
    fn test_echo_error_from_resolve() {
        let resolve_err = ResolveError::UnknownType {
            name: "example/Fake".to_string(),
        };
        let echo_err: EchoError = resolve_err.into();
        assert!(echo_err.is_resolve());
    }

    #[test]
    fn test_echo_error_from_transport() {
        let transport_err = TransportError::ContextDown;
        let echo_err: EchoError = transport_err.into();
        assert!(echo_err.is_transport());
    }

    #[test]
    fn test_echo_error_internal() {
        let err = EchoError::internal("unexpected state");
        assert!(err.is_internal());
        let msg = format!("{err}");
        assert!(msg.contains("unexpected state"));
    }
}
