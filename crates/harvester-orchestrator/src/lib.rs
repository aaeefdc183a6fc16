//! The Batch Orchestrator (§4.2): streams one catalogue file, dedups and
//! mints UUIDs against the Persistent Index, assembles fixed-size
//! batches, and drives two bounded-pool phases (download, upload) per
//! batch with strict serial ordering between batches.
//!
//! Grounded on the ingestion/batching/best-location-selection loop in the
//! original's batch-processing driver, and on `milli/src/thread_pool_no_abort.rs`
//! for the bounded `rayon` worker pool idiom.

mod config;
mod input;
mod location;
mod run;
mod sampling;
mod thumbnail;

pub use config::{MirrorHostConfig, OrchestratorConfig};
pub use location::select_best_location;
pub use run::{Error, Orchestrator, Result, RunSummary};
pub use sampling::draw_sample_indices;
