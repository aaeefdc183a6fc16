use std::path::PathBuf;
use uuid::Uuid;

/// The extension conventions for every artifact kind an entry may carry
/// (§6), before any `.gz` compression suffix is appended.
pub const PDF_EXT: &str = "pdf";
pub const NXML_EXT: &str = "nxml";
pub const JATS_EXT: &str = "jats.xml";
pub const TEI_EXT: &str = "pub2tei.tei.xml";
pub const JSON_EXT: &str = "json";
pub const SOFTWARE_JSON_EXT: &str = "software.json";
pub const ZIP_EXT: &str = "zip";
pub const THUMB_SMALL_EXT: &str = "-thumb-small.png";
pub const THUMB_MEDIUM_EXT: &str = "-thumb-medium.png";
pub const THUMB_LARGE_EXT: &str = "-thumb-large.png";

/// Convert a UUID into the four-level 2-char shard prefix that distributes
/// artifacts across directories/object-store prefixes: `u[0:2]/u[2:4]/
/// u[4:6]/u[6:8]/u/`.
pub fn shard_path(id: &Uuid) -> PathBuf {
    let hex = id.simple().to_string();
    PathBuf::from(&hex[0..2])
        .join(&hex[2..4])
        .join(&hex[4..6])
        .join(&hex[6..8])
        .join(&hex)
}

/// The object-store key (forward-slash separated, no leading slash) for an
/// artifact of the given UUID and file name suffix (e.g. `"pdf"` or
/// `"-thumb-small.png"`), optionally gzip-compressed.
pub fn object_key(id: &Uuid, suffix: &str, compressed: bool) -> String {
    let hex = id.simple().to_string();
    let file_name = if suffix.starts_with('-') {
        format!("{hex}{suffix}")
    } else {
        format!("{hex}.{suffix}")
    };
    let file_name = if compressed { format!("{file_name}.gz") } else { file_name };
    format!(
        "{}/{}/{}/{}/{}/{}",
        &hex[0..2],
        &hex[2..4],
        &hex[4..6],
        &hex[6..8],
        hex,
        file_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_path_splits_into_four_two_char_segments() {
        let id = Uuid::parse_str("12345678-9abc-def0-1234-56789abcdef0").unwrap();
        let path = shard_path(&id);
        assert_eq!(path, PathBuf::from("12/34/56/78/123456789abcdef0123456789abcdef0"));
    }

    #[test]
    fn object_key_appends_gz_once() {
        let id = Uuid::parse_str("12345678-9abc-def0-1234-56789abcdef0").unwrap();
        let key = object_key(&id, PDF_EXT, true);
        assert!(key.ends_with(".pdf.gz"));
        assert!(!key.ends_with(".gz.gz"));
    }

    #[test]
    fn object_key_handles_thumbnail_suffix() {
        let id = Uuid::parse_str("12345678-9abc-def0-1234-56789abcdef0").unwrap();
        let key = object_key(&id, THUMB_SMALL_EXT, false);
        assert!(key.ends_with("123456789abcdef0123456789abcdef0-thumb-small.png"));
    }
}
