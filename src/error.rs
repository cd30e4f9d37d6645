use thiserror::Error;

/// Reasons a navigation request is dropped.
///
/// None of these reach the caller of a public navigation operation: they are
/// logged at the point of detection and the operation becomes a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The host (or node context) is absent or mid-transition
    #[error("{container} is not ready for {operation}")]
    NotReady {
        operation: &'static str,
        container: String,
    },

    /// The requested tag is not in the host's stack
    #[error("tag {tag} not found in {container}")]
    NotFound { tag: String, container: String },

    /// Out-of-range slot id, tab index or mismatched kind
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl NavError {
    pub fn not_ready(operation: &'static str, container: impl Into<String>) -> Self {
        NavError::NotReady {
            operation,
            container: container.into(),
        }
    }

    pub fn not_found(tag: impl Into<String>, container: impl Into<String>) -> Self {
        NavError::NotFound {
            tag: tag.into(),
            container: container.into(),
        }
    }
}

/// Log a dropped navigation request.
pub(crate) fn log_dropped(operation: &str, err: &NavError) {
    log::debug!("{} fail due to {}", operation, err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NavError::not_ready("show", "main_host");
        assert_eq!(err.to_string(), "main_host is not ready for show");

        let err = NavError::not_found("Detail:1", "main_host");
        assert_eq!(err.to_string(), "tag Detail:1 not found in main_host");

        let err = NavError::InvalidArgument("slot 0".to_string());
        assert_eq!(err.to_string(), "invalid argument: slot 0");
    }
}
