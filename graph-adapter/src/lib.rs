#![doc = include_str!("../README.md")]
#![warn(
    unreachable_pub,
    missing_debug_implementations,
    missing_docs,
    clippy::pedantic
)]

pub mod drive;
pub mod errors;
pub mod item;
pub mod meta;
pub mod path;
pub mod plugin;
pub mod storage;
pub mod upload;

pub(crate) type Result<T> = core::result::Result<T, errors::Error>;

pub use errors::Error;
pub use graph_fs;
pub use storage::{Filesystem, Storage};

use graph_fs::{
    drive::{Drive, Site},
    path::ItemPrefix,
    Fs,
};
use tracing::{debug, instrument};

/// How the backend is organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    /// Document libraries of a SharePoint site.
    #[strum(serialize = "sharepoint")]
    SharePoint,
    /// A personal OneDrive. Not implemented.
    #[strum(serialize = "onedrive")]
    OneDrive,
}

impl Mode {
    /// Parse a mode, case-insensitively.
    ///
    /// ```
    /// use graph_adapter::Mode;
    ///
    /// assert_eq!(Mode::parse("SharePoint").unwrap(), Mode::SharePoint);
    /// assert!(Mode::parse("dropbox").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMode`] if the mode is unknown.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse().map_err(|_| Error::InvalidMode(s.into()))
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::SharePoint
    }
}

/// Adapter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend topology.
    pub mode: Mode,
    /// Site id, or `{hostname}:/{server-relative-path}`.
    pub site: String,
    /// Name of the drive to select initially. The site's default library
    /// is used if `None`.
    pub drive: Option<String>,
    /// Bytes per upload session request.
    pub upload_chunk_size: usize,
}

impl Config {
    /// Create a new config for a site, with the default drive and chunk size.
    #[must_use]
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            mode: Mode::default(),
            site: site.into(),
            drive: None,
            upload_chunk_size: upload::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Select a drive by name on initialization.
    #[must_use]
    pub fn with_drive(mut self, drive: impl Into<String>) -> Self {
        self.drive = Some(drive.into());
        self
    }

    /// Set the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the upload session chunk size.
    #[must_use]
    pub fn with_upload_chunk_size(mut self, size: usize) -> Self {
        self.upload_chunk_size = size;
        self
    }

    /// Check that the configuration makes sense before touching the network.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMode`] for anything but SharePoint
    /// - [`Error::InvalidChunkSize`] if the chunk size isn't a positive
    ///   multiple of [`upload::CHUNK_ALIGNMENT`]
    pub fn validate(&self) -> Result<()> {
        if self.mode != Mode::SharePoint {
            return Err(Error::UnsupportedMode(self.mode));
        }

        if self.upload_chunk_size == 0 || self.upload_chunk_size % upload::CHUNK_ALIGNMENT != 0 {
            return Err(Error::InvalidChunkSize(self.upload_chunk_size));
        }

        Ok(())
    }
}

/// The context is used for all adapter operations. It owns the Graph client
/// and knows which site and drive paths are relative to.
#[derive(Debug)]
pub struct Context {
    pub(crate) fs: Fs,
    config: Config,
    site: Site,
    drive: Option<Drive>,
}

impl Context {
    /// Resolve the configured site (and drive, if any) and return a context
    /// ready for use.
    ///
    /// # Errors
    ///
    /// - invalid configuration, see [`Config::validate`]
    /// - [`Error::SiteInvalid`] if Graph rejects the site with a 4xx status
    /// - [`Error::DriveInvalid`] if the configured drive doesn't exist
    /// - other Graph and network errors
    #[instrument(skip(fs))]
    pub async fn initialize(fs: Fs, config: Config) -> Result<Self> {
        config.validate()?;

        let site = match fs.site(&config.site).await {
            Ok(site) => site,
            Err(source) if source.status().map_or(false, |s| s.is_client_error()) => {
                return Err(Error::SiteInvalid {
                    site: config.site.clone(),
                    source,
                });
            }
            Err(e) => return Err(e.into()),
        };

        debug!("resolved site {}", site.id);

        let initial_drive = config.drive.clone().filter(|d| !d.is_empty());

        let mut ctx = Self {
            fs,
            config,
            site,
            drive: None,
        };

        if let Some(drive) = initial_drive {
            ctx.set_drive_by_name(&drive).await?;
        }

        Ok(ctx)
    }

    /// The resolved site.
    #[must_use]
    pub fn site(&self) -> &Site {
        &self.site
    }

    /// The current drive, or `None` for the site's default library.
    #[must_use]
    pub fn drive(&self) -> Option<&Drive> {
        self.drive.as_ref()
    }

    /// The configuration the context was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying Graph client.
    #[must_use]
    pub fn fs(&self) -> &Fs {
        &self.fs
    }

    /// Prefix of item urls in the current drive.
    #[must_use]
    pub fn prefix(&self) -> ItemPrefix {
        match &self.drive {
            Some(drive) => ItemPrefix::drive(&drive.id),
            None => ItemPrefix::site(&self.site.id),
        }
    }

    /// Make `drive` the current drive.
    pub fn set_drive(&mut self, drive: Drive) {
        debug!("switching to drive {} ({})", drive.name, drive.id);

        self.drive = Some(drive);
    }

    /// Go back to the site's default library.
    pub fn reset_drive(&mut self) {
        self.drive = None;
    }

    /// Make the drive named `name` the current drive.
    ///
    /// # Errors
    ///
    /// - [`Error::DriveInvalid`] if there is no such drive
    /// - Graph and network errors
    pub async fn set_drive_by_name(&mut self, name: &str) -> Result<()> {
        let drive = drive::get_by_name(self, name).await?;

        self.set_drive(drive);

        Ok(())
    }

    /// Make the drive named by the first segment of `path` the current
    /// drive. Nothing changes if the path has no drive segment.
    ///
    /// # Errors
    ///
    /// Same as [`Context::set_drive_by_name`].
    pub async fn set_drive_by_path(&mut self, path: &str) -> Result<()> {
        if let (Some(name), _) = path::split_drive(path) {
            self.set_drive_by_name(name).await?;
        }

        Ok(())
    }
}
