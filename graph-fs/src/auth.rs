//! Authentication and authorization against Azure AD.
use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, instrument};

use crate::Error;

/// Azure AD authority used unless another one is specified.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested for app-only Graph access.
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Resource (audience) of the v1 token endpoint.
const GRAPH_RESOURCE: &str = "https://graph.microsoft.com/";

/// A [`TokenStore`] hands out the bearer token attached to every Graph request.
#[async_trait]
pub trait TokenStore: Debug + Send + Sync {
    /// Get the access token.
    async fn get_access_token(&self, client: &Client) -> crate::Result<AccessToken>;
}

/// An access token used to authenticate with Graph.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    exp: Option<OffsetDateTime>,
}

impl AccessToken {
    /// Construct a new access token.
    #[must_use]
    pub fn new(value: String, exp: Option<OffsetDateTime>) -> Self {
        Self { value, exp }
    }

    /// Expiration time, if the issuer told us.
    #[must_use]
    pub fn exp(&self) -> Option<OffsetDateTime> {
        self.exp
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("exp", &self.exp)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A token acquired elsewhere.
#[derive(Debug, Clone)]
pub struct StaticToken(AccessToken);

impl StaticToken {
    /// Wrap a raw bearer token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(AccessToken::new(value.into(), None))
    }
}

#[async_trait]
impl TokenStore for StaticToken {
    async fn get_access_token(&self, _client: &Client) -> crate::Result<AccessToken> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    scope: &'static str,
    resource: &'static str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<StringOrInt>,
}

/// The v1 endpoint sends `expires_in` as a string, v2 as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrInt {
    String(String),
    Int(i64),
}

impl StringOrInt {
    fn seconds(&self) -> Option<i64> {
        match self {
            StringOrInt::String(s) => s.parse().ok(),
            StringOrInt::Int(i) => Some(*i),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error: String,
    error_description: Option<String>,
}

/// App-only credentials obtained through the OAuth2 client credentials grant.
///
/// The token is acquired once, by [`ClientCredentials::authorize`], and is
/// never renewed. Authorize again once it expires.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientCredentials {
    access_token: AccessToken,
    tenant_id: String,
    client_id: String,
}

impl ClientCredentials {
    /// Exchange a client id and secret for an access token at the default
    /// authority.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthError`] if the token endpoint rejects the request
    /// - network errors
    pub async fn authorize(
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> crate::Result<Self> {
        Self::authorize_with_authority(DEFAULT_AUTHORITY, tenant_id, client_id, client_secret)
            .await
    }

    /// Like [`ClientCredentials::authorize`] but against another authority,
    /// e.g. a national cloud.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthError`] if the token endpoint rejects the request
    /// - invalid authority url
    /// - network errors
    #[instrument(skip(client_secret))]
    pub async fn authorize_with_authority(
        authority: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> crate::Result<Self> {
        let mut url = Url::parse(&format!(
            "{}/{}/oauth2/token",
            authority.trim_end_matches('/'),
            tenant_id
        ))?;
        url.query_pairs_mut().append_pair("api-version", "1.0");

        let res = Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()?
            .post(url)
            .form(&TokenRequest {
                client_id,
                client_secret,
                scope: GRAPH_SCOPE,
                resource: GRAPH_RESOURCE,
                grant_type: "client_credentials",
            })
            .send()
            .await?;

        let status = res.status();

        if !status.is_success() {
            let body = res.text().await?;
            let message = match serde_json::from_str::<AuthErrorBody>(&body) {
                Ok(e) => e.error_description.unwrap_or(e.error),
                Err(_) => body,
            };

            return Err(Error::AuthError { status, message });
        }

        let token: TokenResponse = res.json().await?;

        if token.access_token.is_empty() {
            return Err(Error::AuthError {
                status,
                message: "token endpoint returned an empty access token".into(),
            });
        }

        let exp = token
            .expires_in
            .as_ref()
            .and_then(StringOrInt::seconds)
            .map(|s| OffsetDateTime::now_utc() + Duration::seconds(s));

        debug!("authorized client");

        Ok(Self {
            access_token: AccessToken::new(token.access_token, exp),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
        })
    }

    /// Tenant the token was issued for.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Application (client) id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

#[async_trait]
impl TokenStore for ClientCredentials {
    async fn get_access_token(&self, _client: &Client) -> crate::Result<AccessToken> {
        Ok(self.access_token.clone())
    }
}
