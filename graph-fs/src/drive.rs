//! Sites, drives and the items inside them.
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A SharePoint site.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Composite id: `{hostname},{site-collection-id},{web-id}`.
    pub id: String,
    /// Url-friendly name.
    pub name: Option<String>,
    /// Name shown to humans.
    pub display_name: Option<String>,
    /// Where the site lives in a browser.
    pub web_url: Option<String>,
}

/// A drive, i.e. a document library.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    /// Drive id.
    pub id: String,
    /// Name of the document library.
    pub name: String,
    /// `documentLibrary`, `business` or `personal`.
    pub drive_type: Option<String>,
    /// Where the drive lives in a browser.
    pub web_url: Option<String>,
}

/// The SharePoint list backing a document library.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// List id.
    pub id: String,
    /// Url-friendly name.
    pub name: Option<String>,
    /// Name shown to humans.
    pub display_name: Option<String>,
    /// Where the list lives in a browser.
    pub web_url: Option<String>,
}

/// Request body for creating a list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest<'a> {
    /// Name of the new list.
    pub display_name: &'a str,
    /// List settings.
    pub list: ListInfo<'a>,
}

impl<'a> CreateListRequest<'a> {
    /// A list based on the `documentLibrary` template, which gets a drive
    /// of its own.
    #[must_use]
    pub fn document_library(display_name: &'a str) -> Self {
        Self {
            display_name,
            list: ListInfo {
                template: "documentLibrary",
            },
        }
    }
}

/// List settings.
#[derive(Debug, Serialize)]
pub struct ListInfo<'a> {
    /// Template the list is created from.
    pub template: &'a str,
}

/// A file or folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Item id, unique within its drive.
    pub id: String,
    /// File or folder name.
    pub name: String,
    /// Where the item lives in a browser.
    pub web_url: Option<String>,
    /// Size in bytes. For folders, the sum of everything inside.
    pub size: Option<u64>,
    /// Present if the item is a file.
    pub file: Option<FileFacet>,
    /// Present if the item is a folder.
    pub folder: Option<FolderFacet>,
    /// Creation time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_date_time: Option<OffsetDateTime>,
    /// Last modification time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified_date_time: Option<OffsetDateTime>,
    /// Where the item sits.
    pub parent_reference: Option<ItemReference>,
}

impl DriveItem {
    /// Is this a folder?
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// File facet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    /// Mime type as detected by the service.
    pub mime_type: Option<String>,
}

/// Folder facet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Number of direct children.
    pub child_count: Option<u64>,
}

/// Reference to another item, usually the parent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    /// Drive of the referenced item.
    pub drive_id: Option<String>,
    /// Id of the referenced item.
    pub id: Option<String>,
    /// Path, like `/drive/root:/folder`.
    pub path: Option<String>,
}
