//! The flat configuration mapping (§6 "Configuration keys"): a YAML file
//! deserialized into typed sections, CLI flags applied on top.
//!
//! Key names and nesting are taken verbatim from `self.config[...]` access
//! patterns in the original (`resources.{pmc,arxiv,plos}`, `aws`, `swift`,
//! `metadata`), since spec.md enumerates the keys but not a Rust shape.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn default_batch_size() -> usize {
    100
}

fn default_worker_pool_size() -> usize {
    12
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_path: PathBuf,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    #[serde(default)]
    pub compression: bool,

    #[serde(default)]
    pub resources: ResourcesConfig,
    pub aws: Option<AwsConfig>,
    pub swift: Option<SwiftTopConfig>,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub pmc: PmcConfig,
    #[serde(default)]
    pub arxiv: MirrorResourceConfig,
    #[serde(default)]
    pub plos: MirrorResourceConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PmcConfig {
    pub pmc_base: Option<String>,
    #[serde(default)]
    pub prioritize_pmc: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorResourceConfig {
    pub s3: Option<MirrorS3Config>,
    pub swift: Option<MirrorSwiftConfig>,
}

/// `{arxiv,plos}_bucket_name`, per the original's `s3["bucket_name"] =
/// config["resources"][mirror]["s3"][f"{mirror}_bucket_name"]` rewrite.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorS3Config {
    pub arxiv_bucket_name: Option<String>,
    pub plos_bucket_name: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorSwiftConfig {
    pub arxiv_swift_container: Option<String>,
    pub plos_swift_container: Option<String>,
    pub storage_url: Option<String>,
    pub auth_token: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    pub bucket_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwiftTopConfig {
    pub swift_container: String,
    pub storage_url: String,
    pub auth_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataConfig {
    pub biblio_glutton_base: Option<String>,
    pub crossref_base: Option<String>,
    pub crossref_email: Option<String>,
}

pub fn load(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "data_path: /tmp/harvester-data\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.worker_pool_size, 12);
        assert!(!config.compression);
        assert!(config.aws.is_none());
    }

    #[test]
    fn loads_nested_resource_sections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
data_path: /tmp/harvester-data
resources:
  pmc:
    pmc_base: "https://example.test/pmc/"
    prioritize_pmc: true
metadata:
  crossref_email: "ops@example.test"
"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.resources.pmc.pmc_base.as_deref(), Some("https://example.test/pmc/"));
        assert!(config.resources.pmc.prioritize_pmc);
        assert_eq!(config.metadata.crossref_email.as_deref(), Some("ops@example.test"));
    }
}
