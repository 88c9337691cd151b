use reqwest::StatusCode;
use thiserror::Error;

/// Errors related to the passkey server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request could not be sent or the response could not be read.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The passkey server responded with a non-success status.
    #[error("passkey server responded with {status}: {body}")]
    PasskeyServerStatus {
        /// The HTTP status.
        status: StatusCode,
        /// The response body.
        body: String,
    },
    /// The passkey server responded with a payload of an unexpected shape.
    #[error("unexpected passkey server response from {endpoint}: {reason}")]
    UnexpectedServerResponse {
        /// The endpoint that was called.
        endpoint: &'static str,
        /// Why the payload was rejected.
        reason: String,
    },
    /// The passkey server URL could not be joined with an endpoint path.
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
}
