//! Front-page PDF thumbnail generation (§6 CLI surface `--thumbnail`),
//! grounded on the original's `generate_thumbnail`: three independent
//! ImageMagick `convert` invocations, one per size, each allowed to fail
//! without affecting the others. Kept as a subprocess per §9 ("subprocess
//! invocation of external tools... is retained as an interface"), the same
//! idiom `harvester_download::cli_fetcher_command` uses for the fetcher.

use std::path::{Path, PathBuf};
use std::process::Command;

use harvester_types::storage_path;

const SIZES: [(&str, &str); 3] = [
    (storage_path::THUMB_SMALL_EXT, "x150"),
    (storage_path::THUMB_MEDIUM_EXT, "x300"),
    (storage_path::THUMB_LARGE_EXT, "x500"),
];

/// Attempt all three sizes against `pdf_path`'s first page. Returns
/// whether the small thumbnail was produced, matching the original's sole
/// `valid_thumbnails` criterion (medium/large are best-effort).
pub fn generate(bin: &str, pdf_path: &Path) -> bool {
    let mut small_ok = false;
    for (suffix, geometry) in SIZES {
        let thumb_path = sibling_with_suffix(pdf_path, suffix);
        let status = Command::new(bin)
            .arg("-quiet")
            .arg("-density")
            .arg("200")
            .arg("-thumbnail")
            .arg(geometry)
            .arg("-flatten")
            .arg(format!("{}[0]", pdf_path.display()))
            .arg(&thumb_path)
            .status();
        let ok = matches!(status, Ok(s) if s.success()) && thumb_path.is_file();
        if !ok {
            tracing::warn!(pdf = %pdf_path.display(), suffix, "thumbnail generation failed");
        } else if suffix == storage_path::THUMB_SMALL_EXT {
            small_ok = true;
        }
    }
    small_ok
}

/// Where a given thumbnail suffix would land next to `pdf_path`, regardless
/// of whether generation actually produced it — callers check `is_file`.
pub fn sibling_with_suffix(pdf_path: &Path, suffix: &str) -> PathBuf {
    let stem = pdf_path.with_extension("");
    PathBuf::from(format!("{}{}", stem.display(), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_with_suffix_attaches_dash_prefixed_name() {
        let path = PathBuf::from("/data/ab/cd/ef/01/uuid/uuid.pdf");
        assert_eq!(
            sibling_with_suffix(&path, storage_path::THUMB_SMALL_EXT),
            PathBuf::from("/data/ab/cd/ef/01/uuid/uuid-thumb-small.png")
        );
    }

    #[test]
    fn generate_reports_false_when_binary_is_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let pdf_path = dir.path().join("uuid.pdf");
        std::fs::write(&pdf_path, b"%PDF-1.4").unwrap();
        assert!(!generate("this-binary-does-not-exist-anywhere", &pdf_path));
    }
}
