//! The streaming batch loop (§4.2): parse → dedup against `ident` →
//! best-location selection → batch → bounded-pool download phase →
//! serial index writes → bounded-pool upload phase → cleanup.
//!
//! The two bounded phases are run on a `rayon::ThreadPool` sized to
//! `OrchestratorConfig::worker_pool_size`, in the style of
//! `milli/src/thread_pool_no_abort.rs`'s `ThreadPoolNoAbort` (a bounded-pool
//! wrapper around `rayon::ThreadPoolBuilder`). Per-worker timeouts (§5) are
//! layered on top via a detached thread and a channel `recv_timeout`, since
//! rayon itself has no per-task deadline and a scoped thread would block
//! pool shutdown on a hung worker.

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::ThreadPool;
use uuid::Uuid;

use harvester_download::{Downloader, Outcome};
use harvester_index::PersistentIndex;
use harvester_objectstore::ObjectStore;
use harvester_types::error::ErrorCode;
use harvester_types::record::OaLocation;
use harvester_types::storage_path::{self, object_key};
use harvester_types::{CatalogueEntry, Record};
use harvester_validate::FileKind;

use crate::config::{MirrorHostConfig, OrchestratorConfig};
use crate::location::select_best_location;

/// ImageMagick's front-page renderer, invoked the same subprocess way as
/// `harvester_download::cli_fetcher_command`.
const THUMBNAIL_BIN: &str = "convert";

/// Every sidecar extension the Downloader (or thumbnail generation) can
/// leave next to the pdf for a given UUID, besides the pdf/nxml pair that
/// the record-level failure reconciliation already tracks separately.
/// `.zip` is last since it is never gzip-compressed regardless of
/// `config.compression` (§6 object-storage path layout: "the `.zip`
/// archive is never re-compressed").
const EXTRA_SIDECAR_EXTS: &[&str] = &[
    storage_path::JSON_EXT,
    storage_path::JATS_EXT,
    storage_path::TEI_EXT,
    storage_path::SOFTWARE_JSON_EXT,
    storage_path::ZIP_EXT,
];

const THUMBNAIL_EXTS: &[&str] =
    &[storage_path::THUMB_SMALL_EXT, storage_path::THUMB_MEDIUM_EXT, storage_path::THUMB_LARGE_EXT];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Index(#[from] harvester_index::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to build the {0}-worker pool: {1}")]
    Pool(usize, rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

const WORKER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u64,
    pub usable_pdf_url: u64,
    pub failed: u64,
}

struct WorkItem {
    record: Record,
    url: String,
}

/// Run an arbitrary `FnMut(usize) -> T + Send` with a hard wall-clock
/// deadline, on a throwaway thread. Returns `None` on timeout; the thread
/// is not killed, matching §5 "in-flight external subprocesses are not
/// forcibly killed".
fn run_with_timeout<F, T>(timeout: Duration, f: F) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(timeout).ok()
}

pub struct Orchestrator<'a> {
    index: &'a PersistentIndex,
    downloader: Arc<Downloader>,
    uploader: Arc<dyn ObjectStore>,
    data_path: PathBuf,
    config: OrchestratorConfig,
    mirrors: MirrorHostConfig,
    pool: ThreadPool,
}

impl<'a> Orchestrator<'a> {
    /// `downloader`/`uploader` are `Arc`-owned because the per-worker
    /// timeout (§5) detaches a real `std::thread::spawn` rather than a
    /// scoped one — an abandoned, possibly still-running worker must not
    /// borrow from this call frame. `index` stays borrowed: it is only
    /// ever touched from this thread, never from a spawned worker.
    pub fn new(
        index: &'a PersistentIndex,
        downloader: Arc<Downloader>,
        uploader: Arc<dyn ObjectStore>,
        data_path: impl Into<PathBuf>,
        config: OrchestratorConfig,
        mirrors: MirrorHostConfig,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_pool_size)
            .build()
            .map_err(|e| Error::Pool(config.worker_pool_size, e))?;
        Ok(Orchestrator { index, downloader, uploader, data_path: data_path.into(), config, mirrors, pool })
    }

    /// Drive the Unpaywall input (§4.2, §6).
    pub fn run_unpaywall(
        &self,
        path: &Path,
        rng: &mut impl rand::Rng,
    ) -> Result<RunSummary> {
        let total = crate::input::count_unpaywall_lines(path)?;
        let sample = self.config.sample.map(|n| crate::sampling::draw_sample_indices(total, n, rng));
        let lines = crate::input::open_unpaywall_lines(path)?;

        self.drive(lines, sample.as_ref(), |line| {
            let Some(parsed) = crate::input::parse_unpaywall_line(line) else { return LineOutcome::ParseFailed };
            let (best, alternatives) =
                select_best_location(&parsed.oa_locations, parsed.input_best.as_ref(), &self.mirrors);
            let Some(best) = best else { return LineOutcome::NoUsableUrl };
            let Some(url) = best.url_for_pdf.clone() else { return LineOutcome::NoUsableUrl };

            let mut record = parsed.record;
            record.oa_locations = parsed.oa_locations;
            record.best_oa_location = Some(best);
            record.alternative_oa_locations = alternatives;
            LineOutcome::Usable(WorkItem { record, url })
        })
    }

    /// Drive the PMC input (§4.2, §6): `url = pmc_base + subpath`.
    pub fn run_pmc(&self, path: &Path, pmc_base: &str, rng: &mut impl rand::Rng) -> Result<RunSummary> {
        let total = crate::input::count_pmc_lines(path)?;
        let sample = self.config.sample.map(|n| crate::sampling::draw_sample_indices(total, n, rng));
        let lines = crate::input::open_pmc_lines(path)?;

        self.drive(lines, sample.as_ref(), |line| {
            let Some(parsed) = crate::input::parse_pmc_line(line) else { return LineOutcome::ParseFailed };
            let url = format!("{pmc_base}{}", parsed.subpath);
            let mut record = parsed.record;
            record.best_oa_location =
                Some(OaLocation { url_for_pdf: Some(url.clone()), ..Default::default() });
            LineOutcome::Usable(WorkItem { record, url })
        })
    }

    fn drive(
        &self,
        lines: impl Iterator<Item = std::io::Result<String>>,
        sample: Option<&std::collections::BTreeSet<u64>>,
        mut parse_line: impl FnMut(&str) -> LineOutcome,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut batch: Vec<WorkItem> = Vec::with_capacity(self.config.batch_size);

        for (pos, line) in lines.enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(line = pos, error = %e, "I/O error reading input line");
                    continue;
                }
            };

            if let Some(sample) = sample {
                if !sample.contains(&(pos as u64)) {
                    continue;
                }
            }

            summary.processed += 1;

            match parse_line(&line) {
                LineOutcome::ParseFailed => {
                    tracing::warn!(line = pos, "failed to parse catalogue line");
                }
                LineOutcome::NoUsableUrl => {}
                LineOutcome::Usable(item) => {
                    summary.usable_pdf_url += 1;
                    if let Some(item) = self.admit(item)? {
                        batch.push(item);
                        if batch.len() >= self.config.batch_size {
                            summary.failed += self.process_batch(std::mem::take(&mut batch))?;
                        }
                    }
                }
            }
        }

        if !batch.is_empty() {
            summary.failed += self.process_batch(batch)?;
        }

        Ok(summary)
    }

    /// Dedup against `ident`, minting and committing a UUID immediately
    /// for a new identifier (§4.2 step 3, §3 "Lifecycle").
    fn admit(&self, mut item: WorkItem) -> Result<Option<WorkItem>> {
        let Some(identifier) = item.record.primary_identifier().map(str::to_owned) else {
            return Ok(None);
        };

        let id = match self.index.lookup_identifier(&identifier)? {
            Some(existing) => {
                if !self.config.reprocess {
                    return Ok(None);
                }
                match self.index.get_entry(existing)? {
                    Some(entry) if entry.has_pdf() => return Ok(None),
                    _ => existing,
                }
            }
            None => {
                let id = Uuid::new_v4();
                self.index.put_identifier_mapping(&identifier, id)?;
                id
            }
        };

        item.record.id = id;
        Ok(Some(item))
    }

    fn local_path_for(&self, id: Uuid, url: &str) -> PathBuf {
        let ext = if url.ends_with(".tar.gz") {
            "tar.gz".to_string()
        } else {
            Path::new(url).extension().and_then(|e| e.to_str()).unwrap_or("pdf").to_string()
        };
        self.data_path.join(storage_path::shard_path(&id)).join(format!("{id}.{ext}"))
    }

    /// Download phase (parallel) then index-write phase (serial on this
    /// thread) then upload phase (parallel), per §4.2/§5.
    fn process_batch(&self, mut batch: Vec<WorkItem>) -> Result<u64> {
        for item in &batch {
            if let Some(parent) = self.local_path_for(item.record.id, &item.url).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
        }

        let outcomes: Vec<Option<Outcome>> = self.pool.install(|| {
            use rayon::prelude::*;
            batch
                .par_iter_mut()
                .map(|item| {
                    let local_path = self.local_path_for(item.record.id, &item.url);
                    let downloader = Arc::clone(&self.downloader);
                    let url = item.url.clone();
                    let mut record = item.record.clone();
                    let outcome = run_with_timeout(WORKER_TIMEOUT, move || {
                        let outcome = downloader.download(&url, &local_path, &mut record);
                        (outcome, record)
                    });
                    match outcome {
                        Some((outcome, record)) => {
                            item.record = record;
                            Some(outcome)
                        }
                        None => None,
                    }
                })
                .collect()
        });

        let mut failed = 0u64;
        for (item, outcome) in batch.iter_mut().zip(outcomes.iter()) {
            let local_path = self.local_path_for(item.record.id, &item.url);
            self.write_index_result(item, &local_path, *outcome)?;
            if !matches!(outcome, Some(Outcome::Success)) {
                failed += 1;
            }
        }

        let compression = self.config.compression;
        let generate_thumbnails = self.config.generate_thumbnails;

        // Every item gets the finalize-and-upload pass, matching the
        // original's `executor.map(self.manageFiles, entries)`, which
        // writes the json metadata sidecar for every entry regardless of
        // whether the download itself succeeded — pdf/nxml/thumbnails are
        // simply absent (and skipped) when there was no successful
        // download to produce them.
        let upload_results: Vec<UploadOutcome> = self.pool.install(|| {
            use rayon::prelude::*;
            batch
                .par_iter()
                .map(|item| {
                    let local_path = self.local_path_for(item.record.id, &item.url);
                    let uploader = Arc::clone(&self.uploader);
                    let id = item.record.id;
                    let record = item.record.clone();
                    run_with_timeout(WORKER_TIMEOUT, move || {
                        finalize_and_upload(uploader.as_ref(), id, &local_path, &record, generate_thumbnails, compression)
                    })
                    .unwrap_or_default()
                })
                .collect()
        });

        // A fully-failed pdf/xml upload is a record-level failure (§9):
        // don't claim an artifact is present in the catalogue if nothing
        // made it to the store. Sidecar upload outcomes never feed this
        // reconciliation, matching the original's lenient handling of
        // secondary-artifact upload failures. A thumbnail upgrade is the
        // mirror case: it only ever turns the flag on.
        for (idx, outcome) in upload_results.into_iter().enumerate() {
            let item = &mut batch[idx];
            let mut changed = false;
            if !outcome.pdf_uploaded && item.record.valid_fulltext_pdf {
                item.record.valid_fulltext_pdf = false;
                changed = true;
            }
            if let Some(false) = outcome.xml_uploaded {
                if item.record.valid_fulltext_xml {
                    item.record.valid_fulltext_xml = false;
                    changed = true;
                }
            }
            if outcome.thumbnails_generated && !item.record.valid_thumbnails {
                item.record.valid_thumbnails = true;
                changed = true;
            }
            if !changed {
                continue;
            }

            let entry = CatalogueEntry::from_record(&item.record);
            self.index.put_entry(item.record.id, &entry)?;
            if entry.is_failure() {
                self.index.put_fail(item.record.id, ErrorCode::TransientNetwork.as_str())?;
                failed += 1;
            }
        }

        Ok(failed)
    }

    fn write_index_result(
        &self,
        item: &mut WorkItem,
        local_path: &Path,
        outcome: Option<Outcome>,
    ) -> Result<()> {
        let id = item.record.id;
        let (pdf_path, nxml_path) = final_artifact_paths(local_path);

        match outcome {
            Some(Outcome::Success) => {
                item.record.valid_fulltext_pdf =
                    harvester_validate::is_valid_file(&pdf_path, FileKind::Pdf).unwrap_or(false);
                item.record.valid_fulltext_xml = nxml_path
                    .as_deref()
                    .map(|p| harvester_validate::is_valid_file(p, FileKind::Xml).unwrap_or(false))
                    .unwrap_or(false);
            }
            Some(Outcome::Fail(code)) => {
                self.index.put_fail(id, code.as_str())?;
                delete_if_empty(&pdf_path);
            }
            None => {
                self.index.put_fail(id, ErrorCode::Timeout.as_str())?;
                delete_if_empty(&pdf_path);
            }
        }

        let entry = CatalogueEntry::from_record(&item.record);
        self.index.put_entry(id, &entry)?;

        if matches!(outcome, Some(Outcome::Success)) {
            self.index.delete_fail(id)?;
        }

        Ok(())
    }
}

/// The artifact(s) actually left on disk once a download completes
/// (including any `.tar.gz` → `.pdf`/`.nxml` archive extraction, which
/// happens inside the Downloader itself before the outcome is returned).
fn final_artifact_paths(local_path: &Path) -> (PathBuf, Option<PathBuf>) {
    let raw = local_path.to_string_lossy();
    match raw.strip_suffix(".tar.gz") {
        Some(stem) => (PathBuf::from(format!("{stem}.pdf")), Some(PathBuf::from(format!("{stem}.nxml")))),
        None => (local_path.to_path_buf(), None),
    }
}

enum LineOutcome {
    ParseFailed,
    NoUsableUrl,
    Usable(WorkItem),
}

fn delete_if_empty(path: &Path) {
    if let Ok(meta) = std::fs::metadata(path) {
        if meta.len() == 0 {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct UploadOutcome {
    pdf_uploaded: bool,
    xml_uploaded: Option<bool>,
    thumbnails_generated: bool,
}

/// The logical sidecar path for `suffix` next to `local_path`, splitting on
/// the last `.` the same way `harvester_download`'s downloaders construct
/// their sidecar targets (`sibling_with_ext`) — so a suffix like
/// `storage_path::JATS_EXT` (`"jats.xml"`) lands at `{stem}.jats.xml`, not
/// `{stem}.xml`.
fn sidecar_path(local_path: &Path, suffix: &str) -> PathBuf {
    let name = local_path.to_string_lossy();
    match name.rsplit_once('.') {
        Some((stem, _)) => PathBuf::from(format!("{stem}.{suffix}")),
        None => PathBuf::from(format!("{name}.{suffix}")),
    }
}

/// Write the per-record metadata sidecar (§3/§6: the `json` resource),
/// mirroring the original's `json.dump(local_entry, outfile)` — the full
/// processed record, not the compact catalogue projection.
fn write_json_sidecar(path: &Path, record: &Record) {
    match serde_json::to_vec(record) {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(path, bytes) {
                tracing::warn!(path = %path.display(), error = %e, "failed to write metadata json sidecar");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize metadata json sidecar"),
    }
}

/// Upload phase per successful record (§4.2 "Upload phase"): write the json
/// metadata sidecar, optionally generate thumbnails, then upload every
/// artifact actually present on disk for this UUID — pdf/nxml plus
/// whichever of the arXiv/PLOS mirror sidecars and thumbnails exist — and
/// remove each local copy once its upload succeeds. Mirrors the original's
/// `manageFiles`, which performs this whole sequence as one per-record
/// step. Returns the pdf/xml-specific outcomes so the caller can downgrade
/// the catalogue entry on total upload failure (§9 Open Question decision);
/// sidecar upload failures are logged and otherwise ignored.
fn finalize_and_upload(
    uploader: &dyn ObjectStore,
    id: Uuid,
    local_path: &Path,
    record: &Record,
    generate_thumbnails: bool,
    compress: bool,
) -> UploadOutcome {
    let (pdf_path, nxml_path) = final_artifact_paths(local_path);

    let thumbnails_generated = if generate_thumbnails && pdf_path.is_file() {
        crate::thumbnail::generate(THUMBNAIL_BIN, &pdf_path)
    } else {
        false
    };

    let mut record_snapshot = record.clone();
    record_snapshot.valid_thumbnails = thumbnails_generated;
    write_json_sidecar(&sidecar_path(local_path, storage_path::JSON_EXT), &record_snapshot);

    let pdf_uploaded = pdf_path.is_file()
        && upload_artifact(uploader, id, &pdf_path, storage_path::PDF_EXT, compress);
    let xml_uploaded = nxml_path
        .as_deref()
        .map(|p| p.is_file() && upload_artifact(uploader, id, p, storage_path::NXML_EXT, compress));

    for &suffix in EXTRA_SIDECAR_EXTS {
        let path = sidecar_path(local_path, suffix);
        if path.is_file() {
            upload_artifact(uploader, id, &path, suffix, compress && suffix != storage_path::ZIP_EXT);
        }
    }

    if generate_thumbnails {
        for &suffix in THUMBNAIL_EXTS {
            let path = crate::thumbnail::sibling_with_suffix(&pdf_path, suffix);
            if path.is_file() {
                upload_artifact(uploader, id, &path, suffix, compress);
            }
        }
    }

    UploadOutcome { pdf_uploaded, xml_uploaded, thumbnails_generated }
}

/// Upload one artifact at `local_path` under its deterministic sharded
/// key, gzip-compressing it first when `compress` is set, then remove the
/// local file(s) once the upload has succeeded. Returns whether the upload
/// succeeded.
fn upload_artifact(uploader: &dyn ObjectStore, id: Uuid, local_path: &Path, suffix: &str, compress: bool) -> bool {
    let (upload_path, key, compressed_tmp) = if compress {
        match gzip_file(local_path) {
            Ok(gz_path) => {
                let key = object_key(&id, suffix, true);
                (gz_path.clone(), key, Some(gz_path))
            }
            Err(e) => {
                tracing::warn!(id = %id, suffix, error = %e, "gzip compression failed, uploading uncompressed");
                (local_path.to_path_buf(), object_key(&id, suffix, false), None)
            }
        }
    } else {
        (local_path.to_path_buf(), object_key(&id, suffix, false), None)
    };

    let ok = match uploader.upload_file(&upload_path, &key) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(id = %id, suffix, error = %e, "upload failed, artifact remains local only");
            false
        }
    };

    if let Some(tmp) = &compressed_tmp {
        let _ = std::fs::remove_file(tmp);
    }
    if ok {
        let _ = std::fs::remove_file(local_path);
    }
    ok
}

/// Gzip-compress `path` into a `.gz` sibling, leaving the original in
/// place for the caller to clean up once the upload of the compressed copy
/// has actually succeeded.
fn gzip_file(path: &Path) -> std::io::Result<PathBuf> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    let input = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(input);
    let output = std::fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    std::io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;
    Ok(gz_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_objectstore::LocalDiskStore;
    use tempfile::TempDir;

    fn new_orchestrator(index: &PersistentIndex, data_path: &Path) -> Orchestrator<'_> {
        let downloader = Arc::new(Downloader::new(None, harvester_download::MirrorConfig::default()));
        let uploader: Arc<dyn ObjectStore> = Arc::new(LocalDiskStore::new(data_path.join("store")).unwrap());
        Orchestrator::new(
            index,
            downloader,
            uploader,
            data_path,
            OrchestratorConfig { batch_size: 2, worker_pool_size: 2, ..Default::default() },
            MirrorHostConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn local_path_for_uses_tar_gz_extension_when_applicable() {
        let dir = TempDir::new().unwrap();
        let index = PersistentIndex::open(dir.path().join("index"), Some(10 * 1024 * 1024)).unwrap();
        let orchestrator = new_orchestrator(&index, dir.path());

        let id = Uuid::new_v4();
        let path = orchestrator.local_path_for(id, "https://example.test/x.tar.gz");
        assert!(path.to_string_lossy().ends_with(".tar.gz"));
    }

    #[test]
    fn empty_unpaywall_input_produces_zero_summary() {
        let dir = TempDir::new().unwrap();
        let index = PersistentIndex::open(dir.path().join("index"), Some(10 * 1024 * 1024)).unwrap();
        let orchestrator = new_orchestrator(&index, dir.path());

        let input_path = dir.path().join("empty.jsonl.gz");
        {
            use std::io::Write;
            let file = std::fs::File::create(&input_path).unwrap();
            let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(b"").unwrap();
            encoder.finish().unwrap();
        }

        let mut rng = rand::thread_rng();
        let summary = orchestrator.run_unpaywall(&input_path, &mut rng).unwrap();
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn sidecar_path_preserves_multi_dot_suffixes() {
        let local_path = PathBuf::from("/data/ab/cd/ef/01/uuid/uuid.pdf");
        assert_eq!(
            sidecar_path(&local_path, storage_path::JATS_EXT),
            PathBuf::from("/data/ab/cd/ef/01/uuid/uuid.jats.xml")
        );
        assert_eq!(
            sidecar_path(&local_path, storage_path::SOFTWARE_JSON_EXT),
            PathBuf::from("/data/ab/cd/ef/01/uuid/uuid.software.json")
        );
    }

    #[test]
    fn finalize_and_upload_writes_and_uploads_json_sidecar_even_without_pdf() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join("store");
        let store = LocalDiskStore::new(&store_dir).unwrap();
        let id = Uuid::new_v4();
        let local_path = dir.path().join(format!("{id}.pdf"));

        let record = Record::new(id);
        let outcome = finalize_and_upload(&store, id, &local_path, &record, false, false);

        assert!(!outcome.pdf_uploaded);
        assert_eq!(outcome.xml_uploaded, None);
        assert!(store.exists(&object_key(&id, storage_path::JSON_EXT, false)).unwrap());
        assert!(!local_path.with_extension("json").is_file());
    }

    #[test]
    fn finalize_and_upload_compresses_pdf_but_never_the_mirror_zip() {
        let dir = TempDir::new().unwrap();
        let store = LocalDiskStore::new(dir.path().join("store")).unwrap();
        let id = Uuid::new_v4();
        let local_path = dir.path().join(format!("{id}.pdf"));
        std::fs::write(&local_path, b"%PDF-1.4").unwrap();
        std::fs::write(sidecar_path(&local_path, storage_path::ZIP_EXT), b"PK\x03\x04").unwrap();

        let record = Record::new(id);
        let outcome = finalize_and_upload(&store, id, &local_path, &record, false, true);

        assert!(outcome.pdf_uploaded);
        assert!(store.exists(&object_key(&id, storage_path::PDF_EXT, true)).unwrap());
        assert!(store.exists(&object_key(&id, storage_path::ZIP_EXT, false)).unwrap());
        assert!(!store.exists(&object_key(&id, storage_path::ZIP_EXT, true)).unwrap());
    }
}
