//! Error types for the dispatch layer.
//!
//! None of these become HTTP responses on their own. Decode errors go back to
//! the controller, which picks the envelope; registration and serve errors go
//! back to the code assembling the service.

use thiserror::Error;

/// Failure to decode a request body inside a controller.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body could not be read from the transport (or exceeded the limit).
    #[error("Failed to read request body: {0}")]
    Body(String),

    /// The body was read but is not valid JSON for the requested type.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Route installation was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// The path template is already served by an earlier registration.
    #[error("Route already registered: {path}")]
    DuplicateRoute {
        /// Path template that collided.
        path: String,
    },

    /// The controller root is not an absolute literal path.
    #[error("Route path must start with '/' and contain no ':' or '*': {path}")]
    InvalidPath {
        /// Offending path template.
        path: String,
    },
}

/// The service could not start or stopped with an I/O error.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Binding the listener failed.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested.
        address: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The accept loop terminated with an error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_route_display() {
        let err = RegistrationError::DuplicateRoute {
            path: "/widgets/".to_string(),
        };
        assert_eq!(err.to_string(), "Route already registered: /widgets/");
    }

    #[test]
    fn test_decode_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DecodeError::from(json_err);
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(err.to_string().starts_with("Invalid JSON body"));
    }

    #[test]
    fn test_body_error_display() {
        let err = DecodeError::Body("length limit exceeded".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to read request body: length limit exceeded"
        );
    }
}
