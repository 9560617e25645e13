//! API client utilities.
use reqwest::Response;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::trace;

use crate::Error;

/// The error envelope Graph wraps every unsuccessful response in:
///
/// ```json
/// { "error": { "code": "itemNotFound", "message": "...", "innerError": { "request-id": "..." } } }
/// ```
#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
    /// The error itself.
    pub error: GraphError,
}

/// Error details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphError {
    /// Machine-readable code, e.g. `itemNotFound` or `accessDenied`.
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Diagnostics attached by the service.
    pub inner_error: Option<InnerError>,
}

/// Diagnostics worth quoting in a support ticket.
#[derive(Debug, Deserialize)]
pub struct InnerError {
    /// Request id.
    #[serde(rename = "request-id")]
    pub request_id: Option<String>,
    /// Date of the failed request.
    pub date: Option<String>,
}

/// A page of a Graph collection.
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
    pub(crate) value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub(crate) next_link: Option<String>,
}

/// Pass the response through if it has a 2xx status code, otherwise turn
/// it into an [`Error`].
///
/// # Errors
///
/// - `404 Not Found` becomes [`Error::NotFound`]
/// - other statuses become [`Error::GraphError`]
pub(crate) async fn check(res: Response) -> crate::Result<Response> {
    let status = res.status();

    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await?;
    trace!("{}", body);

    Err(Error::from_graph_response(status, &body))
}

/// Parse JSON as the associated type if the response has a 2xx status
/// code, otherwise parse it as a [`GraphErrorBody`].
///
/// # Errors
///
/// - unsuccessful status
/// - invalid json
pub(crate) async fn read_json<T: DeserializeOwned>(res: Response) -> crate::Result<T> {
    let text = check(res).await?.text().await?;

    trace!("{}", text);

    Ok(serde_json::from_str(&text)?)
}
