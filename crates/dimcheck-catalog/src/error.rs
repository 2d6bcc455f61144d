//! Catalog error types.

use dimcheck_http::FetchError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Broad classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, reset, TLS error.
    Network,
    /// No response within the client timeout.
    Timeout,
    /// Credentials rejected (401/403).
    Unauthorized,
    /// Rate limit hit (429).
    RateLimited,
    /// Any other non-2xx answer.
    Status(u16),
    /// The body could not be decoded as a list of products.
    Decode,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network error"),
            Self::Timeout => write!(f, "timeout"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Decode => write!(f, "malformed response"),
        }
    }
}

/// Failure to communicate with a product source.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Decode, message)
    }
}

impl From<FetchError> for TransportError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Timeout => Self::new(TransportErrorKind::Timeout, "request timed out"),
            FetchError::HttpError { status, message } => {
                let kind = match status {
                    401 | 403 => TransportErrorKind::Unauthorized,
                    429 => TransportErrorKind::RateLimited,
                    other => TransportErrorKind::Status(other),
                };
                Self::new(kind, message)
            }
            FetchError::ParseError(m) => Self::decode(m),
            FetchError::RequestError(m) | FetchError::InvalidUrl(m) => Self::network(m),
        }
    }
}

/// Errors raised by the catalog audit layer.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The product source could not be reached.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Store connection settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Page size outside `1..=100`.
    #[error("Invalid page size {0}: must be between 1 and {max}", max = crate::source::PageSize::MAX.get())]
    InvalidPageSize(u32),

    /// Attribute name not one of weight, height, width, length.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// `scan` was called on an auditor that already ran.
    #[error("Catalog already scanned; create a new auditor to scan again")]
    AlreadyScanned,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> FetchError {
        FetchError::HttpError {
            status,
            message: "body".to_string(),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TransportError::from(http(401)).kind,
            TransportErrorKind::Unauthorized
        );
        assert_eq!(
            TransportError::from(http(403)).kind,
            TransportErrorKind::Unauthorized
        );
        assert_eq!(
            TransportError::from(http(429)).kind,
            TransportErrorKind::RateLimited
        );
        assert_eq!(
            TransportError::from(http(500)).kind,
            TransportErrorKind::Status(500)
        );
    }

    #[test]
    fn test_other_fetch_errors() {
        assert_eq!(
            TransportError::from(FetchError::Timeout).kind,
            TransportErrorKind::Timeout
        );
        assert_eq!(
            TransportError::from(FetchError::ParseError("eof".into())).kind,
            TransportErrorKind::Decode
        );
        assert_eq!(
            TransportError::from(FetchError::RequestError("refused".into())).kind,
            TransportErrorKind::Network
        );
    }

    #[test]
    fn test_display() {
        let err = TransportError::from(http(503));
        assert_eq!(err.to_string(), "HTTP 503: body");
        let err = CatalogError::InvalidPageSize(101);
        assert_eq!(
            err.to_string(),
            "Invalid page size 101: must be between 1 and 100"
        );
    }
}
