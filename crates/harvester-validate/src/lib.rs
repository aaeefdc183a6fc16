//! The Validator (§4.5): confirms a downloaded file is non-empty and has
//! a recognized MIME type for its declared kind.
//!
//! Grounded on the original `_check_compression`/`_is_valid_file`
//! (size-then-MIME-sniff checks via `libmagic`); sniffing itself uses the
//! `infer` crate rather than `libmagic` bindings, since none of the
//! workspace's other components need libmagic and `infer` is a pure-Rust,
//! dependency-free sniffer for the binary kinds (`pdf`, `png`). XML has no
//! reliable magic number, so it is sniffed textually instead.

use std::fs;
use std::path::Path;

use harvester_types::resource::FileKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns `true` iff `path` exists, has non-zero size, and its sniffed
/// MIME type is in `kind.allowed_mime_types()`.
pub fn is_valid_file(path: impl AsRef<Path>, kind: FileKind) -> Result<bool> {
    let path = path.as_ref();
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() || metadata.len() == 0 {
        return Ok(false);
    }

    let allowed = kind.allowed_mime_types();
    match kind {
        FileKind::Xml => Ok(sniff_xml(path)?),
        FileKind::Pdf | FileKind::Png => {
            let sniffed = infer::get_from_path(path)?;
            Ok(sniffed.is_some_and(|t| allowed.contains(&t.mime_type())))
        }
    }
}

/// `infer` has no magic number for XML; sniff the first non-whitespace
/// bytes for an opening tag or `<?xml` declaration instead.
fn sniff_xml(path: &Path) -> std::io::Result<bool> {
    let bytes = fs::read(path)?;
    let head = &bytes[..bytes.len().min(512)];
    let trimmed = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|i| &head[i..])
        .unwrap_or(&[]);
    Ok(trimmed.starts_with(b"<?xml") || trimmed.starts_with(b"<"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(bytes).unwrap();
        f
    }

    #[test]
    fn empty_file_is_invalid() {
        let f = NamedTempFile::new().unwrap();
        assert!(!is_valid_file(f.path(), FileKind::Pdf).unwrap());
    }

    #[test]
    fn missing_file_is_invalid() {
        assert!(!is_valid_file("/nonexistent/path/x.pdf", FileKind::Pdf).unwrap());
    }

    #[test]
    fn real_pdf_magic_is_valid() {
        let f = write_temp(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\n");
        assert!(is_valid_file(f.path(), FileKind::Pdf).unwrap());
    }

    #[test]
    fn wrong_kind_is_invalid() {
        let f = write_temp(b"%PDF-1.4\nbody");
        assert!(!is_valid_file(f.path(), FileKind::Png).unwrap());
    }

    #[test]
    fn xml_declaration_is_valid() {
        let f = write_temp(b"<?xml version=\"1.0\"?>\n<article/>");
        assert!(is_valid_file(f.path(), FileKind::Xml).unwrap());
    }

    #[test]
    fn plain_text_is_not_valid_xml() {
        let f = write_temp(b"not xml at all");
        assert!(!is_valid_file(f.path(), FileKind::Xml).unwrap());
    }

    #[test]
    fn real_png_magic_is_valid() {
        let f = write_temp(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0]);
        assert!(is_valid_file(f.path(), FileKind::Png).unwrap());
    }
}
