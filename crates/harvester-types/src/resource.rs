use serde::{Deserialize, Serialize};

/// A kind of artifact that can be attached to a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Json,
    Pdf,
    Xml,
    Thumbnails,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Json => "json",
            Resource::Pdf => "pdf",
            Resource::Xml => "xml",
            Resource::Thumbnails => "thumbnails",
        }
    }
}

/// The MIME kind a downloaded file is validated against (§4.5). Distinct
/// from [`Resource`]: a `Resource::Xml` entry may originate from either a
/// `.nxml` or `.jats.xml` file, both validated as `xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Xml,
    Png,
}

impl FileKind {
    /// MIME types recognized as valid for this kind, per §4.5.
    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            FileKind::Pdf => &["application/pdf"],
            FileKind::Xml => &["application/xml", "text/xml"],
            FileKind::Png => &["image/png"],
        }
    }
}
