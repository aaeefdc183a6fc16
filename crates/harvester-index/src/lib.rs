//! The Persistent Index (§4.1): three disjoint heed databases backed by a
//! single LMDB environment — `entries` (UUID → [`CatalogueEntry`]), `ident`
//! (strong identifier string → UUID) and `fail` (UUID → last error code) —
//! plus the atomic single-key operations and full-map scans the rest of the
//! workspace drives the harvest through.
//!
//! Grounded on `meilisearch-auth/src/store.rs`'s `HeedAuthStore` for the
//! `Database<Bytes, SerdeJson<V>>` / explicit `&mut wtxn` idiom, and on the
//! older `index-scheduler/src/index_scheduler.rs` for opening several named
//! databases out of one environment.

use std::path::Path;

use harvester_types::CatalogueEntry;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Heed(#[from] heed::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("malformed uuid stored in index: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

const ENTRIES_DB_NAME: &str = "entries";
const IDENT_DB_NAME: &str = "ident";
const FAIL_DB_NAME: &str = "fail";

/// Default LMDB map size: 100GiB, large enough for a catalogue of hundreds
/// of millions of rows without needing a resize mid-harvest.
const DEFAULT_MAP_SIZE: usize = 100 * 1024 * 1024 * 1024;

/// Which of the three maps a [`PersistentIndex::scan`] call iterates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapName {
    Entries,
    Ident,
    Fail,
}

#[derive(Clone)]
pub struct PersistentIndex {
    env: Env,
    entries: Database<Bytes, Bytes>,
    ident: Database<Str, Bytes>,
    fail: Database<Bytes, Str>,
}

impl PersistentIndex {
    /// Open (creating if absent) the LMDB environment at `path` with the
    /// three named databases. `map_size` defaults to 100GiB when `None`.
    pub fn open(path: impl AsRef<Path>, map_size: Option<usize>) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref()).map_err(heed::Error::Io)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size.unwrap_or(DEFAULT_MAP_SIZE));
        options.max_dbs(3);
        let env = unsafe { options.open(path.as_ref())? };

        let mut wtxn = env.write_txn()?;
        let entries = env.create_database(&mut wtxn, Some(ENTRIES_DB_NAME))?;
        let ident = env.create_database(&mut wtxn, Some(IDENT_DB_NAME))?;
        let fail = env.create_database(&mut wtxn, Some(FAIL_DB_NAME))?;
        wtxn.commit()?;

        Ok(PersistentIndex { env, entries, ident, fail })
    }

    /// `lookup_identifier(s) -> uuid?`, read-only (§4.1).
    pub fn lookup_identifier(&self, identifier: &str) -> Result<Option<Uuid>> {
        let rtxn = self.env.read_txn()?;
        let found = self
            .ident
            .get(&rtxn, identifier)?
            .map(|bytes| Uuid::from_slice(bytes))
            .transpose()?;
        Ok(found)
    }

    /// `put_identifier_mapping(s, uuid)`, atomic single-key write.
    pub fn put_identifier_mapping(&self, identifier: &str, id: Uuid) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.ident.put(&mut wtxn, identifier, id.as_bytes())?;
        wtxn.commit()?;
        Ok(())
    }

    /// `put_entry(uuid, compact_entry)`, atomic single-key write.
    pub fn put_entry(&self, id: Uuid, entry: &CatalogueEntry) -> Result<()> {
        let bytes = serde_json::to_vec(entry)?;
        let mut wtxn = self.env.write_txn()?;
        self.entries.put(&mut wtxn, id.as_bytes(), &bytes)?;
        wtxn.commit()?;
        Ok(())
    }

    pub fn get_entry(&self, id: Uuid) -> Result<Option<CatalogueEntry>> {
        let rtxn = self.env.read_txn()?;
        match self.entries.get(&rtxn, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    /// `put_fail(uuid, error_code)`, atomic single-key write.
    pub fn put_fail(&self, id: Uuid, error_code: &str) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.fail.put(&mut wtxn, id.as_bytes(), error_code)?;
        wtxn.commit()?;
        Ok(())
    }

    /// `delete_fail(uuid)`, used by the Reprocess flow once a retry
    /// succeeds (§3 "Lifecycle").
    pub fn delete_fail(&self, id: Uuid) -> Result<bool> {
        let mut wtxn = self.env.write_txn()?;
        let existed = self.fail.delete(&mut wtxn, id.as_bytes())?;
        wtxn.commit()?;
        Ok(existed)
    }

    pub fn get_fail(&self, id: Uuid) -> Result<Option<String>> {
        let rtxn = self.env.read_txn()?;
        Ok(self.fail.get(&rtxn, id.as_bytes())?.map(str::to_owned))
    }

    pub fn is_failed(&self, id: Uuid) -> Result<bool> {
        Ok(self.get_fail(id)?.is_some())
    }

    /// `scan(map) -> iterator<(key,value)>` (§4.1), materialized eagerly
    /// under a single read snapshot rather than returned as a lazy
    /// iterator, since the read transaction cannot outlive this call.
    pub fn scan_entries(&self) -> Result<Vec<(Uuid, CatalogueEntry)>> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for result in self.entries.iter(&rtxn)? {
            let (key, value) = result?;
            let id = Uuid::from_slice(key)?;
            out.push((id, serde_json::from_slice(value)?));
        }
        Ok(out)
    }

    pub fn scan_ident(&self) -> Result<Vec<(String, Uuid)>> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for result in self.ident.iter(&rtxn)? {
            let (key, value) = result?;
            let id = Uuid::from_slice(value)?;
            out.push((key.to_owned(), id));
        }
        Ok(out)
    }

    pub fn scan_fail(&self) -> Result<Vec<(Uuid, String)>> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for result in self.fail.iter(&rtxn)? {
            let (key, value) = result?;
            let id = Uuid::from_slice(key)?;
            out.push((id, value.to_owned()));
        }
        Ok(out)
    }

    pub fn len(&self, map: MapName) -> Result<u64> {
        let rtxn = self.env.read_txn()?;
        let len = match map {
            MapName::Entries => self.entries.len(&rtxn)?,
            MapName::Ident => self.ident.len(&rtxn)?,
            MapName::Fail => self.fail.len(&rtxn)?,
        };
        Ok(len)
    }

    /// Truncate all three maps. Used only by the Reset operation (§3
    /// "Lifecycle": "A Record is destroyed only by the Reset operation").
    pub fn clear_all(&self) -> Result<()> {
        let mut wtxn = self.env.write_txn()?;
        self.entries.clear(&mut wtxn)?;
        self.ident.clear(&mut wtxn)?;
        self.fail.clear(&mut wtxn)?;
        wtxn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvester_types::Resource;
    use tempfile::TempDir;

    fn open_index() -> (TempDir, PersistentIndex) {
        let dir = TempDir::new().unwrap();
        let index = PersistentIndex::open(dir.path(), Some(10 * 1024 * 1024)).unwrap();
        (dir, index)
    }

    fn sample_entry(id: Uuid) -> CatalogueEntry {
        CatalogueEntry {
            id,
            doi: Some("10.1/abc".to_string()),
            pmid: None,
            pmcid: None,
            istex_id: None,
            ark: None,
            pii: None,
            resources: vec![Resource::Json, Resource::Pdf],
            license: None,
            oa_link: Some("https://example.test/a.pdf".to_string()),
        }
    }

    #[test]
    fn identifier_mapping_round_trips() {
        let (_dir, index) = open_index();
        let id = Uuid::new_v4();
        assert_eq!(index.lookup_identifier("10.1/abc").unwrap(), None);

        index.put_identifier_mapping("10.1/abc", id).unwrap();
        assert_eq!(index.lookup_identifier("10.1/abc").unwrap(), Some(id));
    }

    #[test]
    fn entry_and_fail_are_independent_maps() {
        let (_dir, index) = open_index();
        let id = Uuid::new_v4();
        let entry = sample_entry(id);

        index.put_entry(id, &entry).unwrap();
        index.put_fail(id, "transient_network").unwrap();

        assert_eq!(index.get_entry(id).unwrap(), Some(entry));
        assert!(index.is_failed(id).unwrap());

        let deleted = index.delete_fail(id).unwrap();
        assert!(deleted);
        assert!(!index.is_failed(id).unwrap());
        assert!(index.get_entry(id).unwrap().is_some());
    }

    #[test]
    fn clear_all_empties_every_map() {
        let (_dir, index) = open_index();
        let id = Uuid::new_v4();
        index.put_identifier_mapping("10.1/abc", id).unwrap();
        index.put_entry(id, &sample_entry(id)).unwrap();
        index.put_fail(id, "timeout").unwrap();

        index.clear_all().unwrap();

        assert_eq!(index.len(MapName::Entries).unwrap(), 0);
        assert_eq!(index.len(MapName::Ident).unwrap(), 0);
        assert_eq!(index.len(MapName::Fail).unwrap(), 0);
    }

    #[test]
    fn scan_entries_reflects_committed_writes() {
        let (_dir, index) = open_index();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            index.put_entry(*id, &sample_entry(*id)).unwrap();
        }

        let scanned = index.scan_entries().unwrap();
        assert_eq!(scanned.len(), 3);
    }
}
