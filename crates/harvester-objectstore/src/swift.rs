//! OpenStack Swift backend.
//!
//! Grounded on `original_source/swift.py`'s container-existence check and
//! upload/download/delete surface. `swiftclient` handles Keystone auth and
//! multithreaded upload itself; since no vetted Rust Swift client exists in
//! the example corpus, this implements the same contract directly against
//! Swift's object REST API (`PUT`/`GET`/`HEAD`/`DELETE` under
//! `{storage_url}/{container}/{object}`) using a pre-authenticated storage
//! URL and token, the same shape `swiftclient`'s `get_auth()` would hand
//! back after a Keystone exchange.

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::{Error, ObjectStore, Result};

pub struct SwiftConfig {
    pub storage_url: String,
    pub auth_token: String,
    pub container: String,
}

pub struct SwiftStore {
    client: Client,
    config: SwiftConfig,
}

impl SwiftStore {
    /// Connects to `config.storage_url`, creating `config.container` if it
    /// does not already exist (mirrors the original `__init__`'s
    /// list-then-create-if-absent check).
    pub fn new(config: SwiftConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        let store = SwiftStore { client, config };
        store.ensure_container()?;
        Ok(store)
    }

    fn container_url(&self) -> String {
        format!("{}/{}", self.config.storage_url.trim_end_matches('/'), self.config.container)
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.container_url(), key)
    }

    fn ensure_container(&self) -> Result<()> {
        let response = self
            .client
            .head(self.container_url())
            .header("X-Auth-Token", &self.config.auth_token)
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            let create = self
                .client
                .put(self.container_url())
                .header("X-Auth-Token", &self.config.auth_token)
                .send()?;
            if !create.status().is_success() {
                return Err(Error::UnexpectedStatus {
                    status: create.status().as_u16(),
                    body: create.text().unwrap_or_default(),
                });
            }
            tracing::info!(container = %self.config.container, "created swift container");
        }
        Ok(())
    }
}

impl ObjectStore for SwiftStore {
    fn upload_file(&self, local_path: &Path, key: &str) -> Result<()> {
        let bytes = fs::read(local_path)?;
        let response = self
            .client
            .put(self.object_url(key))
            .header("X-Auth-Token", &self.config.auth_token)
            .body(bytes)
            .send()?;
        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn download_to_file(&self, key: &str, local_path: &Path) -> Result<()> {
        let response = self
            .client
            .get(self.object_url(key))
            .header("X-Auth-Token", &self.config.auth_token)
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let bytes = response.bytes()?;
        fs::write(local_path, bytes)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.object_url(key))
            .header("X-Auth-Token", &self.config.auth_token)
            .send()?;
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(Error::UnexpectedStatus {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let response = self
            .client
            .head(self.object_url(key))
            .header("X-Auth-Token", &self.config.auth_token)
            .send()?;
        Ok(response.status().is_success())
    }

    /// Lists every object in the container (Swift's container `GET` returns
    /// a newline-separated object listing) and deletes each — the Reset
    /// operation's "delete all objects" contract for Swift (§4.6).
    fn delete_all(&self) -> Result<()> {
        let response = self
            .client
            .get(self.container_url())
            .header("X-Auth-Token", &self.config.auth_token)
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(Error::UnexpectedStatus {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let listing = response.text()?;
        for object_name in listing.lines().filter(|l| !l.is_empty()) {
            self.delete(object_name)?;
        }
        Ok(())
    }
}
