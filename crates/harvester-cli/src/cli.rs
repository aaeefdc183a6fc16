//! Command-line surface (§6 "CLI surface (minimum)"), mirroring
//! `meilisearch/src/option.rs`'s `Opt`/clap-derive shape: one `long` flag
//! per field, defaults baked in where the original has them.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Resumable harvester for Open-Access full text and metadata")]
pub struct Cli {
    /// Path to the Unpaywall JSONL.gz catalogue to ingest.
    #[arg(long)]
    pub unpaywall: Option<PathBuf>,

    /// Path to the PMC TSV catalogue to ingest.
    #[arg(long)]
    pub pmc: Option<PathBuf>,

    /// Configuration file location.
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Write a catalogue dump to this path instead of ingesting.
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Alongside `--dump`, also write entries with neither pdf nor xml here.
    #[arg(long)]
    pub dump_fail: Option<PathBuf>,

    /// Retry identifiers already seen, when their entry still lacks a pdf.
    #[arg(long)]
    pub reprocess: bool,

    /// Truncate the index and sweep the data directory; no ingestion runs.
    #[arg(long)]
    pub reset: bool,

    /// Print entries/failures totals instead of ingesting.
    #[arg(long)]
    pub diagnostic: bool,

    /// Generate front-page PDF thumbnails (three sizes) via ImageMagick's
    /// `convert` and upload them alongside the other per-record artifacts.
    #[arg(long)]
    pub thumbnail: bool,

    /// Draw only N sampled lines from the input instead of the whole file.
    #[arg(long)]
    pub sample: Option<u64>,

    /// Override `data_path` from the configuration file.
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}
