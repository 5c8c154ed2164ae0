// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Mustekala
//!
//! Four domain error kinds map to the failure modes of driving a WebForms
//! portal: transport failures (retryable with a freshly fetched state),
//! control resolution failures (fixable only with a caller override),
//! rejected logins, and exports that produced no locatable artifact.
//! Transport-level errors from reqwest/url/io convert via `#[from]`.

use std::fmt;

use thiserror::Error;

/// Result type alias for Mustekala operations
pub type Result<T> = std::result::Result<T, Error>;

/// Role of an interactive control the resolver was asked to locate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    /// Username / login / document-id input
    Username,
    /// Password input
    Password,
    /// Submit trigger on a login form
    Submit,
    /// Export trigger on a report page
    Export,
}

impl fmt::Display for ControlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlRole::Username => "username",
            ControlRole::Password => "password",
            ControlRole::Submit => "submit",
            ControlRole::Export => "export",
        };
        f.write_str(name)
    }
}

/// Main error type for Mustekala
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the reqwest level (network, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Transport-level failure with request context
    #[error("Transport failure for {url}: {reason}")]
    Transport {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// Operation exceeded its deadline
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        url: Option<String>,
    },

    /// No control matched a required role
    #[error("No {role} control resolved on page; supply an explicit field name override")]
    Resolution { role: ControlRole },

    /// Login submission was classified as not-authenticated
    #[error("Authentication rejected: {reason}")]
    AuthRejected { reason: String, excerpt: String },

    /// Export completed at the transport level but produced nothing downloadable
    #[error("No downloadable artifact found in response")]
    ArtifactNotFound { excerpt: String },

    /// Cookie handling error
    #[error("Cookie error: {0}")]
    Cookie(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error without a status code
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Transport {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// Create a transport error carrying the response status
    pub fn transport_status(
        url: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
    ) -> Self {
        Error::Transport {
            url: url.into(),
            status: Some(status),
            reason: reason.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            url: None,
        }
    }

    /// Create a resolution error for a control role
    pub fn resolution(role: ControlRole) -> Self {
        Error::Resolution { role }
    }

    /// Create a rejected-authentication error
    pub fn auth_rejected(reason: impl Into<String>, excerpt: impl Into<String>) -> Self {
        Error::AuthRejected {
            reason: reason.into(),
            excerpt: excerpt.into(),
        }
    }

    /// Create an artifact-not-found error
    pub fn artifact_not_found(excerpt: impl Into<String>) -> Self {
        Error::ArtifactNotFound {
            excerpt: excerpt.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a transport-level failure
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Transport { .. } | Error::Timeout { .. }
        )
    }

    /// Check if this is a control resolution failure
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resolution { .. })
    }

    /// Check if retrying with a freshly fetched state can help
    ///
    /// Resolution failures need a caller override; a rejected login with
    /// the same credentials is pointless to retry. Only transport
    /// failures are worth another attempt.
    pub fn is_recoverable(&self) -> bool {
        self.is_transport()
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport { url, .. } => Some(url),
            Error::Timeout { url: Some(u), .. } => Some(u),
            _ => None,
        }
    }

    /// Get the response excerpt kept for diagnostics, if any
    pub fn excerpt(&self) -> Option<&str> {
        match self {
            Error::AuthRejected { excerpt, .. } => Some(excerpt),
            Error::ArtifactNotFound { excerpt } => Some(excerpt),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error() {
        let err = Error::transport_status("https://example.com/login.aspx", 503, "fetch failed");

        assert!(err.is_transport());
        assert!(err.is_recoverable());
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.url(), Some("https://example.com/login.aspx"));
    }

    #[test]
    fn test_resolution_error_names_role() {
        let err = Error::resolution(ControlRole::Password);

        assert!(err.is_resolution());
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_excerpt_surfaced() {
        let err = Error::artifact_not_found("<html>no link here</html>");
        assert_eq!(err.excerpt(), Some("<html>no link here</html>"));

        let err = Error::auth_rejected("login rejected by server", "senha inválida");
        assert_eq!(err.excerpt(), Some("senha inválida"));
        assert!(!err.is_recoverable());
    }
}
