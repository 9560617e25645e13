//! Addressing drive items.
//!
//! Every item endpoint in Graph is reached through a prefix naming the drive
//! (`sites/{site-id}/drive/items/` for the default document library of a
//! site, `drives/{drive-id}/items/` for any other drive) followed by either
//! an item id or a path relative to the drive root (`root:/a/b.txt`).
use std::{fmt::Display, str::FromStr};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

/// Characters that have to be escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// The drive part of an item url.
///
/// ```
/// use graph_fs::path::ItemPrefix;
///
/// assert_eq!(ItemPrefix::site("contoso,1,2").to_string(), "sites/contoso,1,2/drive/items/");
/// assert_eq!(ItemPrefix::drive("b!xyz").to_string(), "drives/b!xyz/items/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub enum ItemPrefix {
    /// The default drive of a site.
    Site(String),
    /// A specific drive.
    Drive(String),
}

impl ItemPrefix {
    /// Prefix of the default drive of a site.
    #[must_use]
    pub fn site(site_id: impl Into<String>) -> Self {
        Self::Site(site_id.into())
    }

    /// Prefix of a drive.
    #[must_use]
    pub fn drive(drive_id: impl Into<String>) -> Self {
        Self::Drive(drive_id.into())
    }

    /// Is this the default drive of a site?
    #[must_use]
    pub fn is_site_default(&self) -> bool {
        matches!(self, Self::Site(_))
    }
}

impl Display for ItemPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemPrefix::Site(id) => write!(f, "sites/{}/drive/items/", id),
            ItemPrefix::Drive(id) => write!(f, "drives/{}/items/", id),
        }
    }
}

/// Path of an item relative to the root of its drive.
///
/// Leading and trailing slashes are insignificant, so `""`, `"/"` and
/// `"//"` all address the root itself.
///
/// ```
/// use graph_fs::path::ItemPath;
///
/// let path = ItemPath::new("/reports/q1 #final.pdf").unwrap();
///
/// assert_eq!(path.as_str(), "reports/q1 #final.pdf");
/// assert_eq!(path.file_name(), "q1 #final.pdf");
/// assert_eq!(path.selector(), "root:/reports/q1%20%23final.pdf");
/// assert_eq!(ItemPath::new("/").unwrap().selector(), "root");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct ItemPath(String);

impl ItemPath {
    /// Construct a path.
    ///
    /// ```
    /// use graph_fs::path::{InvalidItemPath, ItemPath};
    ///
    /// assert_eq!(
    ///     ItemPath::new("reports/../secret.txt"),
    ///     Err(InvalidItemPath::DotSegment("reports/../secret.txt".into()))
    /// );
    /// assert!(ItemPath::new("reports/.hidden/...").is_ok());
    /// ```
    ///
    /// # Errors
    ///
    /// Urls are resolved before they are sent, so `.` and `..` segments
    /// would address some other item. They are rejected.
    pub fn new(path: impl AsRef<str>) -> Result<Self, InvalidItemPath> {
        let path = path.as_ref().trim_matches('/');

        if path.split('/').any(|segment| matches!(segment, "." | "..")) {
            return Err(InvalidItemPath::DotSegment(path.to_owned()));
        }

        Ok(Self(path.to_owned()))
    }

    /// The root of the drive.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Does this path address the drive root?
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path as given, without surrounding slashes.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the path.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Path with every segment percent-encoded, ready to be put in a url.
    #[must_use]
    pub fn encoded(&self) -> String {
        self.0
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The item selector used after an [`ItemPrefix`]: `root` or
    /// `root:/{path}`.
    #[must_use]
    pub fn selector(&self) -> String {
        if self.is_root() {
            "root".into()
        } else {
            format!("root:/{}", self.encoded())
        }
    }

    /// Selector of an action on the item addressed by path, such as
    /// `content` or `createUploadSession`.
    ///
    /// ```
    /// use graph_fs::path::ItemPath;
    ///
    /// assert_eq!(ItemPath::new("a/b.txt").unwrap().action("content"), "root:/a/b.txt:/content");
    /// ```
    #[must_use]
    pub fn action(&self, action: &str) -> String {
        if self.is_root() {
            format!("root/{}", action)
        } else {
            format!("{}:/{}", self.selector(), action)
        }
    }
}

impl Display for ItemPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.0)
    }
}

impl FromStr for ItemPath {
    type Err = InvalidItemPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Why a string is not an [`ItemPath`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidItemPath {
    /// The path contains a `.` or `..` segment.
    #[error("`{0}` contains a `.` or `..` segment")]
    DotSegment(String),
}

#[cfg(test)]
mod tests {
    use reqwest::Url;

    use super::{InvalidItemPath, ItemPath, ItemPrefix};

    #[test]
    fn reserved_characters_are_escaped_per_segment() {
        let path = ItemPath::new("a b/c?d/e%f:g").unwrap();

        assert_eq!(path.encoded(), "a%20b/c%3Fd/e%25f%3Ag");
        assert_eq!(path.file_name(), "e%f:g");
    }

    #[test]
    fn root_variants() {
        for raw in ["", "/", "//"] {
            let path = ItemPath::new(raw).unwrap();
            assert!(path.is_root());
            assert_eq!(path.selector(), "root");
            assert_eq!(path.action("children"), "root/children");
        }
    }

    #[test]
    fn prefix_and_selector_compose() {
        let prefix = ItemPrefix::drive("b!1");
        let path = ItemPath::new("folder/file.txt").unwrap();

        assert_eq!(
            format!("{}{}", prefix, path.action("createUploadSession")),
            "drives/b!1/items/root:/folder/file.txt:/createUploadSession"
        );
        assert!(!prefix.is_site_default());
        assert!(ItemPrefix::site("s").is_site_default());
    }

    #[test]
    fn dot_segments_are_rejected() {
        for raw in [".", "..", "a/..", "../b", "a/./b", "/a/../"] {
            assert!(
                matches!(ItemPath::new(raw), Err(InvalidItemPath::DotSegment(_))),
                "{raw} was accepted"
            );
        }

        assert_eq!("a/..b/c.".parse::<ItemPath>().unwrap().as_str(), "a/..b/c.");
    }

    #[test]
    fn selector_survives_url_resolution() {
        let base = Url::parse("https://graph.microsoft.com/v1.0/").unwrap();
        let path = ItemPath::new("a/..b/x").unwrap();

        let url = base
            .join(&format!("{}{}", ItemPrefix::drive("d"), path.selector()))
            .unwrap();

        assert_eq!(url.path(), "/v1.0/drives/d/items/root:/a/..b/x");
    }
}
