//! Shared data model for the OA harvester: the in-memory [`Record`], its
//! compact [`CatalogueEntry`] projection, strong identifiers, resource
//! kinds and the error-code taxonomy used across the workspace.

pub mod entry;
pub mod error;
pub mod identifier;
pub mod record;
pub mod resource;
pub mod storage_path;

pub use entry::CatalogueEntry;
pub use error::ErrorCode;
pub use identifier::StrongIdentifier;
pub use record::{OaLocation, Record};
pub use resource::Resource;

pub type Uuid = uuid::Uuid;
