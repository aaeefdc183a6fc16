//! The harvester binary: wires the Persistent Index, Downloader, object
//! stores and Batch Orchestrator together behind the CLI surface (§6).
//!
//! Grounded on `meilitool/src/main.rs`'s `Cli`-then-dispatch-by-subcommand
//! shape, adapted to flags rather than subcommands since spec.md's CLI
//! surface is flag-based (`--unpaywall`/`--pmc`/`--dump`/`--reset`/...).

mod cli;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use config::Config;
use harvester_download::{Downloader, MirrorConfig};
use harvester_index::PersistentIndex;
use harvester_metadata::MetadataClient;
use harvester_objectstore::swift::{SwiftConfig, SwiftStore};
use harvester_objectstore::{LocalDiskStore, ObjectStore, S3Config, S3Store};
use harvester_orchestrator::{MirrorHostConfig, Orchestrator, OrchestratorConfig};

const INDEX_MAP_SIZE: usize = 10 * 1024 * 1024 * 1024;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let mut config = config::load(&cli.config).context("while loading the configuration file")?;
    if let Some(data_path) = &cli.data_path {
        config.data_path = data_path.clone();
    }

    let _log_guard = logging::init(&config.data_path).context("while setting up logging")?;

    let index = PersistentIndex::open(config.data_path.join("index"), Some(INDEX_MAP_SIZE))
        .context("while opening the persistent index")?;

    if cli.reset {
        let swift = build_swift_store(&config)?;
        harvester_dump::reset(&index, &config.data_path, swift.as_deref())
            .context("while resetting harvester state")?;
        println!("reset complete");
        return Ok(());
    }

    if cli.diagnostic {
        let report = harvester_dump::diagnostic(&index).context("while computing diagnostic report")?;
        println!("entries: {}, failures: {}", report.entries_total, report.failures_total);
        return Ok(());
    }

    if let Some(dump_path) = &cli.dump {
        let report = harvester_dump::dump(&index, dump_path, cli.dump_fail.as_deref(), config.compression)
            .context("while dumping the catalogue")?;
        println!(
            "dumped {} entries ({} failures) to {}",
            report.entries_total,
            report.failures_written,
            report.dump_path.display()
        );

        if let Some(remote) = build_upload_store(&config)? {
            let key = report
                .dump_path
                .file_name()
                .context("dump path has no file name")?
                .to_string_lossy()
                .into_owned();
            harvester_dump::upload_dump_with_backup(remote.as_ref(), &report.dump_path, &key)
                .context("while uploading the dump")?;
        }
        return Ok(());
    }

    let orchestrator_config = OrchestratorConfig {
        batch_size: config.batch_size,
        worker_pool_size: config.worker_pool_size,
        reprocess: cli.reprocess,
        sample: cli.sample,
        compression: config.compression,
        generate_thumbnails: cli.thumbnail,
    };
    let mirrors = MirrorHostConfig {
        prioritize_pmc: config.resources.pmc.prioritize_pmc,
        arxiv_mirror_configured: config.resources.arxiv.s3.is_some() || config.resources.arxiv.swift.is_some(),
        plos_mirror_configured: config.resources.plos.s3.is_some() || config.resources.plos.swift.is_some(),
    };

    let uploader = match build_upload_store(&config)? {
        Some(store) => store,
        None => fallback_local_store(&config.data_path).context("while preparing the local disk store")?,
    };
    let downloader = std::sync::Arc::new(build_downloader(&config)?);

    let orchestrator = Orchestrator::new(&index, downloader, uploader, &config.data_path, orchestrator_config, mirrors)
        .context("while building the worker pool")?;

    let mut rng = rand::thread_rng();
    let summary = match (&cli.unpaywall, &cli.pmc) {
        (Some(path), None) => {
            orchestrator.run_unpaywall(path, &mut rng).context("while running the Unpaywall ingest")?
        }
        (None, Some(path)) => {
            let pmc_base = config
                .resources
                .pmc
                .pmc_base
                .clone()
                .context("resources.pmc.pmc_base is required for --pmc")?;
            orchestrator.run_pmc(path, &pmc_base, &mut rng).context("while running the PMC ingest")?
        }
        (Some(_), Some(_)) => bail!("--unpaywall and --pmc are mutually exclusive"),
        (None, None) => bail!("one of --unpaywall, --pmc, --dump, --reset, --diagnostic is required"),
    };

    println!(
        "processed: {}, usable_pdf_url: {}, failed: {}",
        summary.processed, summary.usable_pdf_url, summary.failed
    );

    Ok(())
}

fn fallback_local_store(data_path: &PathBuf) -> harvester_objectstore::Result<std::sync::Arc<dyn ObjectStore>> {
    Ok(std::sync::Arc::new(LocalDiskStore::new(data_path.join("store"))?))
}

/// The main upload destination: S3 when `aws.bucket_name` is set, Swift
/// when `swift.swift_container` is set, otherwise `None` (caller falls
/// back to local disk per SUPPLEMENTED FEATURES).
fn build_upload_store(config: &Config) -> anyhow::Result<Option<std::sync::Arc<dyn ObjectStore>>> {
    if let Some(aws) = &config.aws {
        let store = S3Store::new(&S3Config {
            bucket_name: aws.bucket_name.clone(),
            region: aws.region.clone(),
            endpoint: aws.endpoint.clone(),
            access_key: aws.access_key.clone(),
            secret_key: aws.secret_key.clone(),
        })
        .context("while connecting to the configured S3 bucket")?;
        return Ok(Some(std::sync::Arc::new(store)));
    }

    if let Some(swift) = &config.swift {
        let store = SwiftStore::new(SwiftConfig {
            storage_url: swift.storage_url.clone(),
            auth_token: swift.auth_token.clone(),
            container: swift.swift_container.clone(),
        })
        .context("while connecting to the configured Swift container")?;
        return Ok(Some(std::sync::Arc::new(store)));
    }

    Ok(None)
}

/// Swift is the only backend the Reset operation clears (§4.6: S3 is
/// intentionally left untouched).
fn build_swift_store(config: &Config) -> anyhow::Result<Option<Box<dyn ObjectStore>>> {
    let Some(swift) = &config.swift else { return Ok(None) };
    let store = SwiftStore::new(SwiftConfig {
        storage_url: swift.storage_url.clone(),
        auth_token: swift.auth_token.clone(),
        container: swift.swift_container.clone(),
    })
    .context("while connecting to the configured Swift container")?;
    Ok(Some(Box::new(store)))
}

fn build_downloader(config: &Config) -> anyhow::Result<Downloader> {
    let metadata = if config.metadata.biblio_glutton_base.is_some() || config.metadata.crossref_base.is_some() {
        Some(
            MetadataClient::new(
                config.metadata.biblio_glutton_base.clone(),
                config.metadata.crossref_base.clone(),
                config.metadata.crossref_email.clone(),
            )
            .context("while building the metadata lookup client")?,
        )
    } else {
        None
    };

    let arxiv = build_mirror_store(&config.resources.arxiv)?;
    let plos = build_mirror_store(&config.resources.plos)?;

    Ok(Downloader::new(metadata, MirrorConfig { arxiv, plos }))
}

fn build_mirror_store(mirror: &config::MirrorResourceConfig) -> anyhow::Result<Option<Box<dyn ObjectStore>>> {
    if let Some(s3) = &mirror.s3 {
        let bucket_name = s3.arxiv_bucket_name.clone().or_else(|| s3.plos_bucket_name.clone());
        if let Some(bucket_name) = bucket_name.filter(|b| !b.trim().is_empty()) {
            let store = S3Store::new(&S3Config {
                bucket_name,
                region: s3.region.clone(),
                endpoint: s3.endpoint.clone(),
                access_key: s3.access_key.clone(),
                secret_key: s3.secret_key.clone(),
            })
            .context("while connecting to a mirror's S3 bucket")?;
            return Ok(Some(Box::new(store)));
        }
    }

    if let Some(swift) = &mirror.swift {
        let container = swift.arxiv_swift_container.clone().or_else(|| swift.plos_swift_container.clone());
        if let Some(container) = container.filter(|c| !c.trim().is_empty()) {
            let storage_url = swift.storage_url.clone().context("swift.storage_url is required for a mirror")?;
            let auth_token = swift.auth_token.clone().context("swift.auth_token is required for a mirror")?;
            let store = SwiftStore::new(SwiftConfig { storage_url, auth_token, container })
                .context("while connecting to a mirror's Swift container")?;
            return Ok(Some(Box::new(store)));
        }
    }

    Ok(None)
}
