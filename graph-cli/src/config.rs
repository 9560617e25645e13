use std::{fmt::Debug, str::FromStr};

use graph_adapter::{
    graph_fs::{
        auth::{ClientCredentials, DEFAULT_AUTHORITY},
        Fs, Url,
    },
    upload::DEFAULT_CHUNK_SIZE,
    Config, Context, Error, Mode,
};
use tracing::debug;

/// Everything needed to reach a site, read from the environment (and
/// `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority: String,
    graph_url: Option<Url>,
    pub site: String,
    pub drive: Option<String>,
    pub mode: String,
    pub upload_chunk_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            tenant_id: env("TENANT_ID"),
            client_id: env("CLIENT_ID"),
            client_secret: env("CLIENT_SECRET"),
            authority: env_opt("AUTHORITY").unwrap_or_else(|| DEFAULT_AUTHORITY.into()),
            graph_url: env_opt("GRAPH_URL"),
            site: env("SITE_ID"),
            drive: env_opt::<String>("DRIVE_NAME").filter(|d| !d.is_empty()),
            mode: env_opt("MODE").unwrap_or_else(|| "sharepoint".into()),
            upload_chunk_size: env_opt("UPLOAD_CHUNK_SIZE").unwrap_or(DEFAULT_CHUNK_SIZE),
        }
    }

    pub fn adapter_config(&self) -> Result<Config, Error> {
        let mut config = Config::new(&self.site)
            .with_mode(Mode::parse(&self.mode)?)
            .with_upload_chunk_size(self.upload_chunk_size);

        if let Some(drive) = &self.drive {
            config = config.with_drive(drive);
        }

        Ok(config)
    }

    pub async fn create_context(&self) -> Result<Context, Error> {
        let config = self.adapter_config()?;

        // fail on bad configuration before asking for a token
        config.validate()?;

        let credentials = ClientCredentials::authorize_with_authority(
            &self.authority,
            &self.tenant_id,
            &self.client_id,
            &self.client_secret,
        )
        .await?;

        debug!("authorized as {}", credentials.client_id());

        let fs = match &self.graph_url {
            Some(base) => Fs::with_base_url(credentials, base.clone()),
            None => Fs::new(credentials),
        };

        Context::initialize(fs, config).await
    }
}

/// Get an environment variable.
///
/// # Panics
///
/// If the environment variable isn't set or cannot be properly
/// parsed, this function panics.
#[track_caller]
pub fn env<T>(key: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    env_opt(key).unwrap_or_else(|| panic!("`{key}` was not set"))
}

/// Get an environment variable, or return `None` if it isn't set.
///
/// # Panics
///
/// If the environment variable exists but cannot be parsed, this
/// function panics.
#[track_caller]
pub fn env_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    dotenv::var(key).ok().map(|s| {
        s.parse()
            .unwrap_or_else(|e| panic!("`{key}` was defined but could not be parsed: {e:?}"))
    })
}
