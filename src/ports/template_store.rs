use std::collections::BTreeMap;
use std::io;

use thiserror::Error;

use crate::domain::TemplateDocument;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid template name '{0}': nothing left after sanitizing")]
    InvalidName(String),

    #[error("template '{name}' not found{}", version_suffix(.version))]
    NotFound { name: String, version: Option<u32> },

    #[error("template '{name}' has no version left after v{}", u32::MAX)]
    VersionsExhausted { name: String },

    #[error("stored template '{name}' v{version} is corrupted: {reason}")]
    Corrupted { name: String, version: u32, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn version_suffix(version: &Option<u32>) -> String {
    version.map(|v| format!(" at version {v}")).unwrap_or_default()
}

/// Versioned persistence for template documents.
pub trait TemplateStore {
    /// Store `document` under `name`.
    ///
    /// Without an explicit version the next version after the latest is used
    /// (1 for a new name). Returns the version written.
    fn save(
        &self,
        document: &TemplateDocument,
        name: &str,
        version: Option<u32>,
    ) -> Result<u32, StoreError>;

    /// Load a specific version, or the latest when `version` is `None`.
    fn load(&self, name: &str, version: Option<u32>) -> Result<TemplateDocument, StoreError>;

    /// Stored versions per name, ascending. Restricted to one name when given.
    fn list(&self, name: Option<&str>) -> Result<BTreeMap<String, Vec<u32>>, StoreError>;

    /// Remove one version. Returns whether anything was deleted.
    fn delete(&self, name: &str, version: u32) -> Result<bool, StoreError>;
}

/// Sanitize `name` for storage, or fail with [`StoreError::InvalidName`].
pub fn storage_name(name: &str) -> Result<String, StoreError> {
    crate::domain::validation::sanitize_name(name)
        .ok_or_else(|| StoreError::InvalidName(name.to_string()))
}

/// The version an unversioned `save` writes after `latest`.
pub fn next_version(name: &str, latest: Option<u32>) -> Result<u32, StoreError> {
    match latest {
        None => Ok(1),
        Some(latest) => latest
            .checked_add(1)
            .ok_or_else(|| StoreError::VersionsExhausted { name: name.to_string() }),
    }
}
