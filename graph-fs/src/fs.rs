//! A low-level Microsoft Graph client with just enough drive capabilities
//! to act like a filesystem.
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use once_cell::sync::Lazy;
use reqwest::{
    header, Body, Client, IntoUrl, Method, RequestBuilder, Response, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::{
    api::{check, read_json, Collection},
    auth::TokenStore,
    drive::{CreateListRequest, Drive, DriveItem, List, Site},
    files::{UploadRes, UploadSession, UploadSessionRequest},
    path::{ItemPath, ItemPrefix},
    range::ContentRange,
    sharing::{InviteRequest, Permission},
    Error,
};

/// `User-Agent` used in all requests to Graph.
pub static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Base url of the Graph `v1.0` API.
pub static GRAPH_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://graph.microsoft.com/v1.0/").unwrap());

/// An authorized Graph client.
#[derive(Debug)]
pub struct Fs {
    client: Client,
    base: Url,
    token_store: Box<dyn TokenStore>,
}

impl Fs {
    /// Create a new client talking to the public Graph endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to initialize.
    #[must_use]
    pub fn new<S: TokenStore + 'static>(token_store: S) -> Self {
        Self::with_base_url(token_store, GRAPH_BASE.clone())
    }

    /// Create a new client talking to another Graph endpoint, such as a
    /// national cloud deployment. The url should end with a slash.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to initialize.
    #[must_use]
    pub fn with_base_url<S: TokenStore + 'static>(token_store: S, base: Url) -> Self {
        Self {
            client: Client::builder().user_agent(USER_AGENT).build().unwrap(),
            base,
            token_store: Box::new(token_store),
        }
    }

    /// The Graph endpoint used.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn authed_req(&self, method: Method, url: impl IntoUrl) -> crate::Result<RequestBuilder> {
        let access_token = self.token_store.get_access_token(&self.client).await?;

        Ok(self.client.request(method, url).bearer_auth(access_token))
    }

    async fn graph_req(&self, method: Method, path: &str) -> crate::Result<RequestBuilder> {
        let url = self.base.join(path)?;

        trace!("{} {}", method, url);

        self.authed_req(method, url).await
    }

    /// Fetch every page of a collection, following `@odata.nextLink`.
    async fn collect_pages<T: DeserializeOwned>(&self, path: &str) -> crate::Result<Vec<T>> {
        let res = self.graph_req(Method::GET, path).await?.send().await?;
        let mut page: Collection<T> = read_json(res).await?;
        let mut items = std::mem::take(&mut page.value);

        while let Some(next) = page.next_link.take() {
            debug!("following next link");

            let res = self.authed_req(Method::GET, &next).await?.send().await?;
            page = read_json(res).await?;
            items.append(&mut page.value);
        }

        Ok(items)
    }

    /// Look up a site by id, or by `{hostname}:/{server-relative-path}`.
    ///
    /// # Errors
    ///
    /// - no such site ([`Error::NotFound`])
    /// - malformed site id (usually `400 Bad Request`)
    /// - network and authentication errors
    #[instrument(skip(self))]
    pub async fn site(&self, site_id: &str) -> crate::Result<Site> {
        let res = self
            .graph_req(Method::GET, &format!("sites/{}", site_id))
            .await?
            .send()
            .await?;

        read_json(res).await
    }

    /// List all document libraries of a site.
    ///
    /// # Errors
    ///
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn drives(&self, site_id: &str) -> crate::Result<Vec<Drive>> {
        self.collect_pages(&format!("sites/{}/drives", site_id)).await
    }

    /// Get the list backing a drive.
    ///
    /// # Errors
    ///
    /// - no such drive
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn drive_list(&self, drive_id: &str) -> crate::Result<List> {
        let res = self
            .graph_req(Method::GET, &format!("drives/{}/list", drive_id))
            .await?
            .send()
            .await?;

        read_json(res).await
    }

    /// Create a list in a site.
    ///
    /// # Errors
    ///
    /// - name already taken (`409 Conflict`)
    /// - insufficient permissions
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn create_list(
        &self,
        site_id: &str,
        req: &CreateListRequest<'_>,
    ) -> crate::Result<List> {
        let res = self
            .graph_req(Method::POST, &format!("sites/{}/lists", site_id))
            .await?
            .json(req)
            .send()
            .await?;

        read_json(res).await
    }

    /// **Permanently** delete a list, and the drive it backs.
    ///
    /// # Errors
    ///
    /// - no such list
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn delete_list(&self, site_id: &str, list_id: &str) -> crate::Result<()> {
        let res = self
            .graph_req(Method::DELETE, &format!("sites/{}/lists/{}", site_id, list_id))
            .await?
            .send()
            .await?;

        check(res).await?;

        Ok(())
    }

    /// Get an item by its path.
    ///
    /// # Errors
    ///
    /// - no such item ([`Error::NotFound`])
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn item_by_path(
        &self,
        prefix: &ItemPrefix,
        path: &ItemPath,
    ) -> crate::Result<DriveItem> {
        let res = self
            .graph_req(Method::GET, &format!("{}{}", prefix, path.selector()))
            .await?
            .send()
            .await?;

        read_json(res).await
    }

    /// List the direct children of a folder.
    ///
    /// # Errors
    ///
    /// - no such folder
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn children(
        &self,
        prefix: &ItemPrefix,
        item_id: &str,
    ) -> crate::Result<Vec<DriveItem>> {
        self.collect_pages(&format!("{}{}/children", prefix, item_id))
            .await
    }

    /// Open a stream to the content of a file.
    ///
    /// Graph answers with a redirect to a pre-authenticated download url,
    /// which is followed transparently.
    ///
    /// # Errors
    ///
    /// - no such file
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn content_stream(
        &self,
        prefix: &ItemPrefix,
        item_id: &str,
    ) -> crate::Result<impl Stream<Item = crate::Result<Bytes>>> {
        let res = self
            .graph_req(Method::GET, &format!("{}{}/content", prefix, item_id))
            .await?
            .send()
            .await?;

        let res = check(res).await?;

        Ok(res.bytes_stream().map_err(Into::into))
    }

    /// Create or replace a file in a single request. Graph refuses bodies
    /// larger than 4 MB here; use an upload session for those.
    ///
    /// # Errors
    ///
    /// - body too large
    /// - network and Graph errors
    #[instrument(skip(self, body))]
    pub async fn put_content(
        &self,
        prefix: &ItemPrefix,
        path: &ItemPath,
        body: impl Into<Body>,
    ) -> crate::Result<DriveItem> {
        let res = self
            .graph_req(Method::PUT, &format!("{}{}", prefix, path.action("content")))
            .await?
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await?;

        read_json(res).await
    }

    /// Delete an item. Deleted items go to the site's recycle bin.
    ///
    /// # Errors
    ///
    /// - no such item
    /// - network and Graph errors
    #[instrument(skip(self))]
    pub async fn delete_item(&self, prefix: &ItemPrefix, item_id: &str) -> crate::Result<()> {
        let res = self
            .graph_req(Method::DELETE, &format!("{}{}", prefix, item_id))
            .await?
            .send()
            .await?;

        check(res).await?;

        Ok(())
    }

    /// Grant principals access to an item.
    ///
    /// # Errors
    ///
    /// - no such item
    /// - unknown principal
    /// - network and Graph errors
    #[instrument(skip(self, req))]
    pub async fn invite(
        &self,
        prefix: &ItemPrefix,
        item_id: &str,
        req: &InviteRequest,
    ) -> crate::Result<Vec<Permission>> {
        let res = self
            .graph_req(Method::POST, &format!("{}{}/invite", prefix, item_id))
            .await?
            .json(req)
            .send()
            .await?;

        let permissions: Collection<Permission> = read_json(res).await?;

        Ok(permissions.value)
    }

    /// Create an upload session for a file that may or may not exist yet.
    ///
    /// # Errors
    ///
    /// - conflicting item, depending on the conflict behavior
    /// - network and Graph errors
    #[instrument(skip(self, req))]
    pub async fn create_upload_session(
        &self,
        prefix: &ItemPrefix,
        path: &ItemPath,
        req: &UploadSessionRequest<'_>,
    ) -> crate::Result<UploadSession> {
        let res = self
            .graph_req(
                Method::POST,
                &format!("{}{}", prefix, path.action("createUploadSession")),
            )
            .await?
            .json(req)
            .send()
            .await?;

        read_json(res).await
    }

    /// Upload one range of an upload session. `upload_url` is acquired from
    /// [`Fs::create_upload_session`] and is pre-authenticated, so no bearer
    /// token is attached.
    ///
    /// # Errors
    ///
    /// - premature end of body (smaller `body` than `range`)
    /// - range not expected by the session
    /// - [`Error::UnexpectedUploadStatus`] for a 2xx status that is neither
    ///   progress nor completion
    /// - network and Graph errors
    #[instrument(skip(self, upload_url, body))]
    pub async fn upload_range(
        &self,
        upload_url: &str,
        body: impl Into<Body>,
        range: ContentRange,
    ) -> crate::Result<UploadRes> {
        let res = self
            .client
            .put(upload_url)
            .header(header::CONTENT_LENGTH, range.len())
            .header(header::CONTENT_RANGE, range)
            .body(body)
            .send()
            .await?;

        match res.status() {
            StatusCode::ACCEPTED => Ok(UploadRes::Incomplete(read_json(res).await?)),
            StatusCode::OK | StatusCode::CREATED => Ok(UploadRes::Complete(read_json(res).await?)),
            status if status.is_success() => Err(Error::UnexpectedUploadStatus(status)),
            _ => Err(upload_error(res).await),
        }
    }

    /// Cancel an upload session, discarding everything uploaded so far.
    ///
    /// # Errors
    ///
    /// - network and Graph errors
    #[instrument(skip(self, upload_url))]
    pub async fn cancel_upload_session(&self, upload_url: &str) -> crate::Result<()> {
        let res = self.client.delete(upload_url).send().await?;

        check(res).await?;

        Ok(())
    }
}

async fn upload_error(res: Response) -> Error {
    match check(res).await {
        Err(e) => e,
        Ok(res) => Error::UnexpectedUploadStatus(res.status()),
    }
}

#[cfg(test)]
mod tests {
    use super::USER_AGENT;

    #[test]
    fn user_agent_is_product_and_version() {
        assert_eq!(USER_AGENT, concat!("graph-fs/", env!("CARGO_PKG_VERSION")));
    }
}
