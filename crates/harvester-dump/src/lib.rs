//! The Catalogue Dumper/Resetter/Diagnostic (§4.6): a JSON-lines dump of
//! the `entries` map with an optional parallel failures file, the Reset
//! operation that wipes all harvesting state, and a one-line diagnostic
//! summary.
//!
//! Grounded on `dump()`/`reset()`/`diagnostic()` in the original, and on
//! `dump/src/writer.rs`'s `KeyWriter`/`TaskWriter` (one JSON value per line,
//! `flate2::write::GzEncoder` for compression) for the Rust-side plumbing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use harvester_index::PersistentIndex;
use harvester_objectstore::ObjectStore;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Index(#[from] harvester_index::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] harvester_objectstore::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// File suffixes the Reset operation sweeps out of the data directory,
/// verbatim from the original's clean-up list.
const RESET_SUFFIXES: &[&str] =
    &[".pdf", ".png", ".nxml", ".gz", ".xml", ".zip", ".json"];

#[derive(Debug, Clone)]
pub struct DumpReport {
    pub entries_total: u64,
    pub failures_written: u64,
    pub dump_path: PathBuf,
    pub fail_path: Option<PathBuf>,
}

/// Write every `entries` row as one JSON object per line to `dump_path`.
/// When `fail_path` is given, every row with neither a `pdf` nor an `xml`
/// resource (§8 invariant 3) is additionally written there. When
/// `compress` is set, both files are gzip-compressed in place and their
/// returned paths carry a `.gz` suffix, mirroring the original's
/// `subprocess.check_call(['gzip', '-f', dump_file])`.
pub fn dump(
    index: &PersistentIndex,
    dump_path: &Path,
    fail_path: Option<&Path>,
    compress: bool,
) -> Result<DumpReport> {
    let entries = index.scan_entries()?;
    tracing::info!(count = entries.len(), "number of entries with OA link");

    let mut dump_writer = BufWriter::new(File::create(dump_path)?);
    let mut fail_writer = match fail_path {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let mut failures_written = 0u64;
    for (_, entry) in &entries {
        serde_json::to_writer(&mut dump_writer, entry)?;
        dump_writer.write_all(b"\n")?;

        if let Some(writer) = fail_writer.as_mut() {
            if entry.is_failure() {
                serde_json::to_writer(&mut *writer, entry)?;
                writer.write_all(b"\n")?;
                failures_written += 1;
            }
        }
    }
    dump_writer.flush()?;
    if let Some(writer) = fail_writer.as_mut() {
        writer.flush()?;
    }

    let mut final_dump_path = dump_path.to_path_buf();
    let mut final_fail_path = fail_path.map(Path::to_path_buf);
    if compress {
        final_dump_path = gzip_in_place(&final_dump_path)?;
        if let Some(path) = final_fail_path {
            final_fail_path = Some(gzip_in_place(&path)?);
        }
    }

    Ok(DumpReport {
        entries_total: entries.len() as u64,
        failures_written,
        dump_path: final_dump_path,
        fail_path: final_fail_path,
    })
}

fn gzip_in_place(path: &Path) -> Result<PathBuf> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    {
        let input = File::open(path)?;
        let mut reader = std::io::BufReader::new(input);
        let output = File::create(&gz_path)?;
        let mut encoder = GzEncoder::new(output, Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?;
    }
    fs::remove_file(path)?;
    Ok(gz_path)
}

/// Upload `local_path` to `remote` under `key`, first backing up any
/// existing object at that key to `<key>.old` (§9 "Dump back-up-before-
/// overwrite"). A missing existing object is not an error.
pub fn upload_dump_with_backup(
    remote: &dyn ObjectStore,
    local_path: &Path,
    key: &str,
) -> Result<()> {
    if remote.exists(key).unwrap_or(false) {
        let backup_local = PathBuf::from(format!("{}.old", local_path.display()));
        match remote.download_to_file(key, &backup_local) {
            Ok(()) => {
                let backup_key = format!("{key}.old");
                if let Err(e) = remote.upload_file(&backup_local, &backup_key) {
                    tracing::warn!(error = %e, "could not back up previous dump");
                }
                let _ = fs::remove_file(&backup_local);
            }
            Err(e) => tracing::debug!(error = %e, "no previous dump to back up"),
        }
    }

    remote.upload_file(local_path, key)?;
    Ok(())
}

/// Wipe every index map and every artifact file left in `data_path` (§3
/// "Lifecycle": "A Record is destroyed only by the Reset operation").
/// S3 is deliberately left untouched (§9 Open Question); Swift objects
/// are removed when `swift` is given.
pub fn reset(
    index: &PersistentIndex,
    data_path: &Path,
    swift: Option<&dyn ObjectStore>,
) -> Result<()> {
    index.clear_all()?;

    if data_path.is_dir() {
        for entry in fs::read_dir(data_path)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if RESET_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
                let removed = if path.is_dir() { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
                if let Err(e) = removed {
                    tracing::warn!(path = %path.display(), error = %e, "error cleaning tmp file");
                }
                continue;
            }

            if path.is_dir() {
                if let Err(e) = fs::remove_dir_all(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "error cleaning tmp files");
                }
            }
        }
    }

    if let Some(swift) = swift {
        if let Err(e) = swift.delete_all() {
            tracing::error!(error = %e, "error resetting SWIFT object storage");
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub entries_total: u64,
    pub failures_total: u64,
}

/// A report on failures stored during the harvesting process (§4.6).
pub fn diagnostic(index: &PersistentIndex) -> Result<DiagnosticReport> {
    use harvester_index::MapName;
    Ok(DiagnosticReport {
        entries_total: index.len(MapName::Entries)?,
        failures_total: index.len(MapName::Fail)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_types::{CatalogueEntry, Resource};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn entry(id: Uuid, failing: bool) -> CatalogueEntry {
        CatalogueEntry {
            id,
            doi: Some(format!("10.1/{id}")),
            pmid: None,
            pmcid: None,
            istex_id: None,
            ark: None,
            pii: None,
            resources: if failing { vec![Resource::Json] } else { vec![Resource::Json, Resource::Pdf] },
            license: None,
            oa_link: None,
        }
    }

    #[test]
    fn dump_writes_one_json_line_per_entry_and_a_failures_file() {
        let dir = TempDir::new().unwrap();
        let index = PersistentIndex::open(dir.path().join("index"), Some(10 * 1024 * 1024)).unwrap();

        let ok_id = Uuid::new_v4();
        let fail_id = Uuid::new_v4();
        index.put_entry(ok_id, &entry(ok_id, false)).unwrap();
        index.put_entry(fail_id, &entry(fail_id, true)).unwrap();

        let dump_path = dir.path().join("dump.jsonl");
        let fail_path = dir.path().join("fail.jsonl");
        let report = dump(&index, &dump_path, Some(&fail_path), false).unwrap();

        assert_eq!(report.entries_total, 2);
        assert_eq!(report.failures_written, 1);

        let dump_contents = fs::read_to_string(&dump_path).unwrap();
        assert_eq!(dump_contents.lines().count(), 2);

        let fail_contents = fs::read_to_string(&fail_path).unwrap();
        assert_eq!(fail_contents.lines().count(), 1);
        assert!(fail_contents.contains(&fail_id.to_string()));
    }

    #[test]
    fn dump_with_compression_produces_gz_suffixed_files() {
        let dir = TempDir::new().unwrap();
        let index = PersistentIndex::open(dir.path().join("index"), Some(10 * 1024 * 1024)).unwrap();
        let id = Uuid::new_v4();
        index.put_entry(id, &entry(id, false)).unwrap();

        let dump_path = dir.path().join("dump.jsonl");
        let report = dump(&index, &dump_path, None, true).unwrap();

        assert!(report.dump_path.to_string_lossy().ends_with("dump.jsonl.gz"));
        assert!(report.dump_path.is_file());
        assert!(!dump_path.is_file());
    }

    #[test]
    fn reset_clears_index_and_sweeps_artifact_files() {
        let dir = TempDir::new().unwrap();
        let index_dir = dir.path().join("index");
        let index = PersistentIndex::open(&index_dir, Some(10 * 1024 * 1024)).unwrap();
        let id = Uuid::new_v4();
        index.put_entry(id, &entry(id, false)).unwrap();
        index.put_fail(id, "transient_network").unwrap();

        let data_path = dir.path().join("data");
        fs::create_dir_all(&data_path).unwrap();
        fs::write(data_path.join("abc.pdf"), b"stub").unwrap();
        fs::write(data_path.join("keep.txt"), b"not a sweep target").unwrap();

        reset(&index, &data_path, None).unwrap();

        assert_eq!(index.len(harvester_index::MapName::Entries).unwrap(), 0);
        assert_eq!(index.len(harvester_index::MapName::Fail).unwrap(), 0);
        assert!(!data_path.join("abc.pdf").is_file());
        assert!(data_path.join("keep.txt").is_file());
    }

    #[test]
    fn diagnostic_reports_entries_and_failures_totals() {
        let dir = TempDir::new().unwrap();
        let index = PersistentIndex::open(dir.path().join("index"), Some(10 * 1024 * 1024)).unwrap();
        let ok_id = Uuid::new_v4();
        let fail_id = Uuid::new_v4();
        index.put_entry(ok_id, &entry(ok_id, false)).unwrap();
        index.put_entry(fail_id, &entry(fail_id, true)).unwrap();
        index.put_fail(fail_id, "payload_invalid").unwrap();

        let report = diagnostic(&index).unwrap();
        assert_eq!(report.entries_total, 2);
        assert_eq!(report.failures_total, 1);
    }
}
