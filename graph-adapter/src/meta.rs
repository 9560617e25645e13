//! Normalized item metadata.
use graph_fs::drive::DriveItem;
use serde::Serialize;

/// Kind of an entry. Folders are reported as files too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    /// A file.
    File,
}

/// Metadata of an item, in the shape storage callers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Item name.
    pub path: String,
    /// Where the item lives in a browser.
    pub linking_url: Option<String>,
    /// Last modification, in seconds since the unix epoch.
    pub timestamp: Option<i64>,
    /// Creation, in seconds since the unix epoch.
    pub created: Option<i64>,
    /// Always empty.
    pub dirname: String,
    /// Mime type, for files.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Always [`Kind::File`].
    #[serde(rename = "type")]
    pub kind: Kind,
}

impl From<DriveItem> for Metadata {
    fn from(item: DriveItem) -> Self {
        Self {
            path: item.name,
            linking_url: item.web_url,
            timestamp: item.last_modified_date_time.map(|t| t.unix_timestamp()),
            created: item.created_date_time.map(|t| t.unix_timestamp()),
            dirname: String::new(),
            mimetype: item.file.and_then(|f| f.mime_type),
            size: item.size.unwrap_or_default(),
            kind: Kind::File,
        }
    }
}

#[cfg(test)]
mod tests {
    use graph_fs::drive::DriveItem;

    use super::{Kind, Metadata};

    fn item(json: &str) -> DriveItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalize_file() {
        let meta = Metadata::from(item(
            r#"{
                "id": "1",
                "name": "report.pdf",
                "webUrl": "https://contoso.sharepoint.com/report.pdf",
                "size": 42,
                "createdDateTime": "1970-01-01T00:01:00Z",
                "lastModifiedDateTime": "2022-03-02T11:30:00Z",
                "file": { "mimeType": "application/pdf" },
                "parentReference": { "path": "/drive/root:/reports" }
            }"#,
        ));

        assert_eq!(
            meta,
            Metadata {
                path: "report.pdf".into(),
                linking_url: Some("https://contoso.sharepoint.com/report.pdf".into()),
                timestamp: Some(1_646_220_600),
                created: Some(60),
                dirname: String::new(),
                mimetype: Some("application/pdf".into()),
                size: 42,
                kind: Kind::File,
            }
        );
    }

    #[test]
    fn folders_are_files_too() {
        let meta = Metadata::from(item(r#"{"id":"2","name":"reports","folder":{}}"#));

        assert_eq!(meta.kind, Kind::File);
        assert_eq!(meta.mimetype, None);
        assert_eq!(meta.size, 0);
    }

    #[test]
    fn serialized_shape() {
        let meta = Metadata::from(item(r#"{"id":"3","name":"a.txt","size":1}"#));
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["type"], "file");
        assert_eq!(json["dirname"], "");
        assert_eq!(json["path"], "a.txt");
        assert!(json.get("linkingUrl").is_some());
    }
}
