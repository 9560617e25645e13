//! Nobody is perfect.
use reqwest::StatusCode;
use thiserror::Error;

use crate::api::GraphErrorBody;

/// Error used by the entire crate.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP error.
    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    /// Url error.
    #[error("invalid url")]
    UrlError(#[from] url::ParseError),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The site, drive or item does not exist (`404 Not Found`).
    #[error("no such item")]
    NotFound,

    /// Any other unsuccessful response from Graph. The body is kept when it
    /// could be parsed as a Graph error envelope.
    #[error(
        "graph error ({status}): {}",
        body.as_ref().map_or("no details", |b| b.error.message.as_str())
    )]
    GraphError {
        /// HTTP status of the response.
        status: StatusCode,
        /// Parsed error envelope, if any.
        body: Option<GraphErrorBody>,
    },

    /// The token endpoint rejected the credentials.
    #[error("authorization failed ({status}): {message}")]
    AuthError {
        /// HTTP status returned by the token endpoint.
        status: StatusCode,
        /// Human-readable reason, usually Azure AD's `error_description`.
        message: String,
    },

    /// An upload session answered with a status that is neither
    /// `202 Accepted` nor a completed item.
    #[error("unexpected upload session response: {0}")]
    UnexpectedUploadStatus(StatusCode),

    /// The upload session expects a different byte offset than the one
    /// about to be sent.
    #[error("upload session expects byte {expected}, next chunk starts at {actual}")]
    UploadOutOfSync {
        /// Offset the session asked for.
        expected: u64,
        /// Offset of the chunk we were about to send.
        actual: u64,
    },
}

impl Error {
    /// HTTP status code of the upstream response that caused this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::NotFound => Some(StatusCode::NOT_FOUND),
            Error::GraphError { status, .. }
            | Error::AuthError { status, .. }
            | Error::UnexpectedUploadStatus(status) => Some(*status),
            Error::HttpError(e) => e.status(),
            _ => None,
        }
    }

    /// Build an error from a non-successful Graph response.
    pub(crate) fn from_graph_response(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::NOT_FOUND {
            return Error::NotFound;
        }

        Error::GraphError {
            status,
            body: serde_json::from_str(body).ok(),
        }
    }
}
