//! Resolving adapter paths to drive items.
//!
//! An adapter path is `{drive}/{path in drive}`. The part before the first
//! slash names a drive of the site. A path without any slash addresses an
//! item in the current drive.
use graph_fs::path::{ItemPath, ItemPrefix};
use tracing::debug;

use crate::{drive, Context};

/// Split a path into its drive segment and the rest.
///
/// ```
/// use graph_adapter::path::split_drive;
///
/// assert_eq!(split_drive("Documents/a/b.txt"), (Some("Documents"), "a/b.txt"));
/// assert_eq!(split_drive("/Documents/b.txt"), (Some("Documents"), "b.txt"));
/// assert_eq!(split_drive("b.txt"), (None, "b.txt"));
/// ```
#[must_use]
pub fn split_drive(path: &str) -> (Option<&str>, &str) {
    let path = path.trim_start_matches('/');

    match path.split_once('/') {
        Some((drive, rest)) => (Some(drive), rest),
        None => (None, path),
    }
}

/// The last segment of a path.
///
/// ```
/// use graph_adapter::path::filename_from_path;
///
/// assert_eq!(filename_from_path("a/b/c.txt"), "c.txt");
/// assert_eq!(filename_from_path("c.txt"), "c.txt");
/// ```
#[must_use]
pub fn filename_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Where an item lives: the drive prefix and the path inside the drive.
///
/// A location is resolved anew for every operation and never changes the
/// current drive of the [`Context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Drive part of the item url.
    pub prefix: ItemPrefix,
    /// Path relative to the drive root.
    pub item: ItemPath,
}

impl Context {
    /// Resolve a path to a [`Location`].
    ///
    /// # Errors
    ///
    /// - [`crate::Error::DriveInvalid`] if the drive segment doesn't name a
    ///   drive
    /// - [`crate::Error::InvalidPath`] if the path has `.` or `..` segments
    /// - Graph and network errors while listing drives
    pub async fn locate(&self, path: &str) -> crate::Result<Location> {
        let location = match split_drive(path) {
            (Some(name), rest) => Location {
                prefix: ItemPrefix::drive(drive::get_by_name(self, name).await?.id),
                item: ItemPath::new(rest)?,
            },
            (None, item) => Location {
                prefix: self.prefix(),
                item: ItemPath::new(item)?,
            },
        };

        debug!("located `{}` at {}{}", path, location.prefix, location.item.selector());

        Ok(location)
    }

    /// Resolve a directory to a [`Location`]. Unlike [`Context::locate`], a
    /// directory without any slash is the root of the drive it names, and
    /// an empty directory is the root of the current drive.
    ///
    /// # Errors
    ///
    /// Same as [`Context::locate`].
    pub async fn locate_directory(&self, dir: &str) -> crate::Result<Location> {
        let dir = dir.trim_matches('/');

        if dir.is_empty() {
            return Ok(Location {
                prefix: self.prefix(),
                item: ItemPath::root(),
            });
        }

        if dir.contains('/') {
            return self.locate(dir).await;
        }

        Ok(Location {
            prefix: ItemPrefix::drive(drive::get_by_name(self, dir).await?.id),
            item: ItemPath::root(),
        })
    }
}
