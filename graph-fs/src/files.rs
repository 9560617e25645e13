//! Upload sessions.
//!
//! Files larger than a few megabytes cannot be sent in a single request.
//! Instead, an upload session is created for the target path and the bytes
//! are `PUT` to its pre-authenticated url in consecutive ranges.
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::drive::DriveItem;

/// What to do if an item already exists at the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictBehavior {
    /// Overwrite it.
    Replace,
    /// Fail the upload.
    Fail,
    /// Pick a new name.
    Rename,
}

/// Request body of `createUploadSession`.
#[derive(Debug, Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct UploadSessionRequest<'a> {
    /// Properties of the item being uploaded.
    pub item: UploadItem<'a>,
}

impl<'a> UploadSessionRequest<'a> {
    /// Create a new request.
    #[must_use]
    pub fn new(name: &'a str, conflict_behavior: ConflictBehavior) -> Self {
        Self {
            item: UploadItem {
                conflict_behavior,
                name,
            },
        }
    }
}

/// Properties of the item being uploaded.
#[derive(Debug, Serialize)]
pub struct UploadItem<'a> {
    /// Conflict resolution.
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    pub conflict_behavior: ConflictBehavior,
    /// Name of the item.
    pub name: &'a str,
}

/// A freshly created upload session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    /// Where to send the bytes. Requests to it must not carry a bearer token.
    pub upload_url: String,
    /// When the session expires.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date_time: Option<OffsetDateTime>,
    /// Ranges the service wants next, e.g. `["0-"]`.
    #[serde(default)]
    pub next_expected_ranges: Vec<String>,
}

/// Progress reported after an intermediate range was accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    /// When the session expires.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date_time: Option<OffsetDateTime>,
    /// Ranges the service wants next, e.g. `["327680-"]`.
    #[serde(default)]
    pub next_expected_ranges: Vec<String>,
}

/// Result of uploading a range.
#[derive(Debug)]
#[allow(clippy::large_enum_variant)]
pub enum UploadRes {
    /// More bytes are needed.
    Incomplete(UploadProgress),
    /// The last range was received and the item has been created.
    Complete(DriveItem),
}

#[cfg(test)]
mod tests {
    use super::{ConflictBehavior, UploadProgress, UploadSessionRequest};

    #[test]
    fn session_request_body() {
        let json =
            serde_json::to_value(UploadSessionRequest::new("big.bin", ConflictBehavior::Replace))
                .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "item": { "@microsoft.graph.conflictBehavior": "replace", "name": "big.bin" }
            })
        );
    }

    #[test]
    fn progress_without_expiry() {
        let progress: UploadProgress =
            serde_json::from_str(r#"{"nextExpectedRanges":["26-"]}"#).unwrap();

        assert_eq!(progress.next_expected_ranges, vec!["26-"]);
        assert!(progress.expiration_date_time.is_none());
    }
}
