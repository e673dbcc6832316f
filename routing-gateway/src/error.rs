//! The error taxonomy shared by every gateway operation.
//!
//! All failures surface as a [`RoutingError`] carrying one of the closed
//! [`ErrorKind`] values, so callers can branch on the kind without knowing
//! which provider produced the failure.

use std::error::Error;
use std::fmt;

use serde::Deserialize;

/// How much of a provider body to keep in decode error messages.
const BODY_SNIPPET_LEN: usize = 500;

/// The closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Provider credentials are missing, empty or rejected.
    CredentialsInvalid,
    /// A provider response could not be decoded or lacked expected fields.
    ResponseFormat,
    /// A transport mode outside the supported set was requested.
    InvalidTransportMode,
    /// Transport-level failure: connect, timeout, TLS, or an unrecognized
    /// provider status.
    Transport,
    /// The provider rejected the request as malformed (status 400).
    BadRequest,
    /// The provider rejected the HTTP method (status 405).
    WrongMethod,
    /// The provider could not find the requested resource (status 404).
    NotFound,
    /// The provider reported an internal error (status 500).
    Internal,
    /// The provider does not implement the requested method (status 501).
    NotImplemented,
    /// A provider URL could not be constructed from the request parts.
    InvalidUri,
}

impl ErrorKind {
    /// Map a provider status code to the kind it stands for.
    ///
    /// Status codes may come from the HTTP response line or from a
    /// `status_code` field embedded in the body; the mapping is the same.
    ///
    /// # Panics
    ///
    /// Panics when called with 200: a success code is not an error, and
    /// reaching this mapper with one is a bug in the calling client.
    pub fn from_status(status: u16) -> ErrorKind {
        assert!(status != 200, "status 200 is not an erroneous status code");
        match status {
            400 => ErrorKind::BadRequest,
            404 => ErrorKind::NotFound,
            405 => ErrorKind::WrongMethod,
            500 => ErrorKind::Internal,
            501 => ErrorKind::NotImplemented,
            _ => ErrorKind::Transport,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ErrorKind::CredentialsInvalid => "provider credentials are invalid",
            ErrorKind::ResponseFormat => "provider response could not be decoded",
            ErrorKind::InvalidTransportMode => "unsupported transport mode",
            ErrorKind::Transport => "transport error talking to the provider",
            ErrorKind::BadRequest => "provider rejected the request as malformed",
            ErrorKind::WrongMethod => "wrong method for the provider endpoint",
            ErrorKind::NotFound => "provider resource not found",
            ErrorKind::Internal => "provider reported an internal error",
            ErrorKind::NotImplemented => "method not implemented by the provider",
            ErrorKind::InvalidUri => "provider request URL could not be built",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Error returned by every fallible gateway operation.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RoutingError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl RoutingError {
    /// Create an error of the given kind with a context message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create an error from a provider status code.
    pub fn from_status(status: u16, context: &str) -> Self {
        Self::new(
            ErrorKind::from_status(status),
            format!("{context} (status {status})"),
        )
    }

    /// Decode failure for a provider body, keeping a bounded snippet of the
    /// body for diagnosis.
    pub(crate) fn decode(context: &str, source: serde_json::Error, body: &str) -> Self {
        let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
        Self::new(
            ErrorKind::ResponseFormat,
            format!("{context}: {source} (body: {snippet})"),
        )
        .with_source(source)
    }

    /// The kind of failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(source: reqwest::Error) -> Self {
        Self::new(ErrorKind::Transport, source.to_string()).with_source(source)
    }
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status_code: Option<u16>,
    status: Option<String>,
}

/// Check a response body for an embedded provider status code.
///
/// Some providers report failures inside the body as a `status_code` field
/// alongside a `status` message, regardless of the HTTP status line. Returns
/// the mapped error when such a field is present and not 200; `None` for
/// bodies without the field, bodies that are not JSON objects, or embedded
/// success codes.
pub(crate) fn embedded_status_error(body: &str, provider: &str) -> Option<RoutingError> {
    let envelope: StatusEnvelope = serde_json::from_str(body).ok()?;
    match envelope.status_code {
        Some(200) | None => None,
        Some(code) => {
            let status = envelope.status.unwrap_or_default();
            Some(RoutingError::from_status(
                code,
                &format!("{provider} reported \"{status}\""),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_table() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::BadRequest);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(405), ErrorKind::WrongMethod);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Internal);
        assert_eq!(ErrorKind::from_status(501), ErrorKind::NotImplemented);
    }

    #[test]
    fn unknown_statuses_map_to_transport() {
        for status in [201, 204, 301, 401, 403, 418, 429, 502, 503] {
            assert_eq!(ErrorKind::from_status(status), ErrorKind::Transport);
        }
    }

    #[test]
    #[should_panic(expected = "not an erroneous status code")]
    fn mapping_a_success_code_is_a_bug() {
        let _ = ErrorKind::from_status(200);
    }

    #[test]
    fn display_includes_kind_and_context() {
        let err = RoutingError::from_status(404, "valhalla route");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let message = err.to_string();
        assert!(message.contains("not found"));
        assert!(message.contains("valhalla route"));
        assert!(message.contains("404"));
    }

    #[test]
    fn decode_keeps_a_bounded_snippet() {
        let body = "x".repeat(2000);
        let source = serde_json::from_str::<StatusEnvelope>("not json").unwrap_err();
        let err = RoutingError::decode("test response", source, &body);
        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
        assert!(err.to_string().len() < 700);
    }

    #[test]
    fn source_chain_is_preserved() {
        let source = serde_json::from_str::<StatusEnvelope>("{").unwrap_err();
        let err = RoutingError::decode("test response", source, "{");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn embedded_status_code_is_mapped() {
        let body = r#"{"status_code": 400, "status": "Bad Request", "error": true}"#;
        let err = embedded_status_error(body, "valhalla").unwrap();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn embedded_success_and_absent_codes_pass() {
        assert!(embedded_status_error(r#"{"status_code": 200}"#, "valhalla").is_none());
        assert!(embedded_status_error(r#"{"trip": {}}"#, "valhalla").is_none());
        assert!(embedded_status_error("[1, 2, 3]", "valhalla").is_none());
        assert!(embedded_status_error("not json at all", "valhalla").is_none());
    }
}
