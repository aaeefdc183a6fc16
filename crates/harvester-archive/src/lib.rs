//! The Archive Extractor (§4.4): given a downloaded `.tar.gz`, pulls at
//! most one `.pdf` and any `.nxml` member into sibling files named after
//! the archive, then removes the archive.
//!
//! Grounded on the tar/gzip handling conventions in `dump/src/writer.rs`
//! and `dump/src/archive_ext.rs`; the member-selection and temp-directory
//! semantics follow the original `_manage_pmc_archives`.

use std::fs;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What the extractor recovered from the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArchive {
    pub pdf_path: Option<PathBuf>,
    pub nxml_path: Option<PathBuf>,
}

impl ExtractedArchive {
    pub fn has_pdf(&self) -> bool {
        self.pdf_path.is_some()
    }
}

/// Extract the first `.pdf` member and any `.nxml` member of the `.tar.gz`
/// at `archive_path` into siblings named by replacing the `.tar.gz` suffix,
/// then delete the archive regardless of whether a PDF was found. Returns
/// an error only if the archive cannot be read at all; a missing PDF is a
/// normal (logged) outcome, not a failure, matching the original's
/// best-effort `_manage_pmc_archives`.
pub fn extract_pmc_archive(archive_path: impl AsRef<Path>) -> Result<ExtractedArchive> {
    let archive_path = archive_path.as_ref();
    let dir = archive_path.parent().unwrap_or_else(|| Path::new("."));

    // Unique per-archive scratch directory so concurrent workers extracting
    // archives with colliding member names never clash (mirrors the
    // original's `basename[0:6]` temp subdirectory).
    let scratch = tempfile::Builder::new().prefix(".archive-").tempdir_in(dir)?;

    let file = fs::File::open(archive_path)?;
    let mut tar = Archive::new(GzDecoder::new(file));

    let mut extracted = ExtractedArchive::default();
    for entry in tar.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path()?.to_string_lossy().to_lowercase();

        if extracted.pdf_path.is_none() && name.ends_with(".pdf") {
            let dest = replace_archive_suffix(archive_path, "pdf");
            let tmp = scratch.path().join("member.pdf");
            entry.unpack(&tmp)?;
            fs::rename(&tmp, &dest)?;
            extracted.pdf_path = Some(dest);
            continue;
        }

        if name.ends_with(".nxml") {
            let dest = replace_archive_suffix(archive_path, "nxml");
            let tmp = scratch.path().join("member.nxml");
            entry.unpack(&tmp)?;
            fs::rename(&tmp, &dest)?;
            extracted.nxml_path = Some(dest);
        }
    }

    if !extracted.has_pdf() {
        tracing::warn!(archive = %archive_path.display(), "no pdf found in archive");
    }

    if archive_path.is_file() {
        fs::remove_file(archive_path)?;
    }

    Ok(extracted)
}

fn replace_archive_suffix(archive_path: &Path, new_ext: &str) -> PathBuf {
    let name = archive_path.to_string_lossy();
    let replaced = if let Some(stripped) = name.strip_suffix(".tar.gz") {
        format!("{stripped}.{new_ext}")
    } else {
        format!("{name}.{new_ext}")
    };
    PathBuf::from(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn build_archive(path: &Path, members: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let enc = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(enc);
        for (name, data) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn extracts_pdf_and_nxml_and_deletes_archive() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("10.1234_abc.tar.gz");
        build_archive(
            &archive_path,
            &[
                ("PMC1234/main.pdf", b"%PDF-1.4 body"),
                ("PMC1234/main.nxml", b"<article/>"),
                ("PMC1234/readme.txt", b"ignore me"),
            ],
        );

        let result = extract_pmc_archive(&archive_path).unwrap();

        assert!(!archive_path.exists());
        let pdf_path = result.pdf_path.unwrap();
        assert_eq!(pdf_path, dir.path().join("10.1234_abc.pdf"));
        assert_eq!(fs::read(&pdf_path).unwrap(), b"%PDF-1.4 body");

        let nxml_path = result.nxml_path.unwrap();
        assert_eq!(nxml_path, dir.path().join("10.1234_abc.nxml"));
    }

    #[test]
    fn missing_pdf_still_deletes_archive() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("no_pdf.tar.gz");
        build_archive(&archive_path, &[("file.txt", b"no pdf here")]);

        let result = extract_pmc_archive(&archive_path).unwrap();

        assert!(!result.has_pdf());
        assert!(!archive_path.exists());
    }

    #[test]
    fn only_first_pdf_member_is_kept() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("two_pdfs.tar.gz");
        build_archive(
            &archive_path,
            &[("first.pdf", b"first"), ("second.pdf", b"second")],
        );

        let result = extract_pmc_archive(&archive_path).unwrap();

        let pdf_path = result.pdf_path.unwrap();
        assert_eq!(fs::read(&pdf_path).unwrap(), b"first");
    }
}
