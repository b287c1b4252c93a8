//! Error types for the matchdesk application.

use thiserror::Error;

/// The main error type for matchdesk.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The API answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport-level failures from the HTTP client.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The request exceeded its configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The API returned an envelope with `success: false`.
    #[error("API rejected request: {0}")]
    Rejected(String),

    /// Response bodies that do not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (user can retry).
    ///
    /// Everything the API or the network can throw at us is recoverable;
    /// only local setup failures are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = Error::http(503, "Service unavailable");
        assert_eq!(err.to_string(), "HTTP 503: Service unavailable");
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::Timeout(30).is_recoverable());
        assert!(Error::Rejected("no links".into()).is_recoverable());
        assert!(Error::http(500, "boom").is_recoverable());
        assert!(!Error::config("bad toml").is_recoverable());
        assert!(!Error::Io(std::io::Error::other("no tty")).is_recoverable());
    }
}
