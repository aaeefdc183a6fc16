/// Orchestration knobs the core itself consumes (§4.2, §5). The broader
/// flat configuration file (`data_path`, storage credentials, metadata
/// endpoints, ...) is owned by the CLI crate; this is the subset the
/// orchestrator needs to drive batching and the worker pools.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Records queued before a batch is handed to the download phase.
    pub batch_size: usize,
    /// Bounded worker pool size for both the download and upload phases.
    pub worker_pool_size: usize,
    /// Retry UUIDs already present in `ident`, reusing the UUID, when the
    /// existing catalogue entry lacks a `pdf` resource.
    pub reprocess: bool,
    /// Draw a uniform-with-replacement sample of this many line indices
    /// instead of processing every line.
    pub sample: Option<u64>,
    /// Gzip every per-record artifact (pdf/nxml/json/sidecars, never the
    /// `.zip` mirror archive) before it is uploaded.
    pub compression: bool,
    /// Generate the three `convert`-based PDF thumbnails (`--thumbnail`)
    /// and upload them alongside the other per-record artifacts.
    pub generate_thumbnails: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            batch_size: 100,
            worker_pool_size: 12,
            reprocess: false,
            sample: None,
            compression: false,
            generate_thumbnails: false,
        }
    }
}

/// Which mirrors and PMC prioritization are active, for best-location
/// selection (§4.2).
#[derive(Debug, Clone, Default)]
pub struct MirrorHostConfig {
    pub prioritize_pmc: bool,
    pub arxiv_mirror_configured: bool,
    pub plos_mirror_configured: bool,
}
