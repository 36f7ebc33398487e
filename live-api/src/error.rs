use bridge_client::BridgeError;
use std::time::Duration;
use thiserror::Error;

use crate::operation::Operation;

/// Errors returned by Live queries and commands
///
/// Transport problems surface as [`ApiError::Bridge`] with the bridge error
/// unchanged. The remaining variants describe failures this crate detects
/// itself.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bridge could not deliver the request or its reply
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// A read was requested with an operation kind that does not produce a value
    ///
    /// Only `get` and `count` are reads. This is raised before the bridge is
    /// contacted.
    #[error("Unsupported read operation: {0}")]
    UnsupportedOperation(Operation),

    /// The bridge did not answer a read in time
    #[error("Timed out after {after:?} reading '{property}' of '{path}'")]
    Timeout {
        path: String,
        property: String,
        after: Duration,
    },

    /// A value had the wrong type for the field it was read into
    #[error("Unexpected value for '{field}': expected {expected}, found {found}")]
    UnexpectedValue {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// A record lacked a field its typed form requires
    #[error("Missing field '{0}'")]
    MissingField(String),

    /// Client configuration is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_conversion() {
        let error: ApiError = BridgeError::Closed.into();
        assert!(matches!(error, ApiError::Bridge(BridgeError::Closed)));
        assert_eq!(format!("{}", error), "Bridge error: Bridge connection closed");
    }

    #[test]
    fn test_error_display() {
        let unsupported = ApiError::UnsupportedOperation(Operation::Set);
        assert_eq!(format!("{}", unsupported), "Unsupported read operation: set");

        let timeout = ApiError::Timeout {
            path: "live_set".to_string(),
            property: "tempo".to_string(),
            after: Duration::from_secs(5),
        };
        assert_eq!(
            format!("{}", timeout),
            "Timed out after 5s reading 'tempo' of 'live_set'"
        );

        let unexpected = ApiError::UnexpectedValue {
            field: "name".to_string(),
            expected: "string",
            found: "int 3".to_string(),
        };
        assert_eq!(
            format!("{}", unexpected),
            "Unexpected value for 'name': expected string, found int 3"
        );
    }
}
