use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::TemplateDocument;
use crate::domain::schema::parse_document;
use crate::ports::{StoreError, TemplateStore, next_version, storage_name};

const EXTENSION: &str = "yaml";

/// File-backed template store.
///
/// Layout: `<root>/<name>/v<version>.yaml`. Documents are validated again on
/// load, so a hand-edited file that breaks the schema surfaces as
/// [`StoreError::Corrupted`].
#[derive(Debug, Clone)]
pub struct FilesystemTemplateStore {
    root: PathBuf,
}

impl FilesystemTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn template_dir(&self, safe_name: &str) -> PathBuf {
        self.root.join(safe_name)
    }

    fn version_path(&self, safe_name: &str, version: u32) -> PathBuf {
        self.template_dir(safe_name).join(format!("v{version}.{EXTENSION}"))
    }

    fn versions(&self, safe_name: &str) -> Result<Vec<u32>, StoreError> {
        let dir = self.template_dir(safe_name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let path = entry?.path();
            match parse_version(&path) {
                Some(version) => versions.push(version),
                None => debug!(path = %path.display(), "ignoring non-template file"),
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }
}

fn parse_version(path: &Path) -> Option<u32> {
    if path.extension()? != EXTENSION {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix('v')?.parse().ok()
}

impl TemplateStore for FilesystemTemplateStore {
    fn save(
        &self,
        document: &TemplateDocument,
        name: &str,
        version: Option<u32>,
    ) -> Result<u32, StoreError> {
        let safe = storage_name(name)?;
        let version = match version {
            Some(version) => version,
            None => next_version(&safe, self.versions(&safe)?.last().copied())?,
        };

        let yaml = document.to_yaml().map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::create_dir_all(self.template_dir(&safe))?;
        fs::write(self.version_path(&safe, version), yaml)?;
        debug!(name = %safe, version, "saved template");
        Ok(version)
    }

    fn load(&self, name: &str, version: Option<u32>) -> Result<TemplateDocument, StoreError> {
        let safe = storage_name(name)?;
        let resolved = match version {
            Some(version) => version,
            None => self
                .versions(&safe)?
                .last()
                .copied()
                .ok_or_else(|| StoreError::NotFound { name: safe.clone(), version: None })?,
        };

        let path = self.version_path(&safe, resolved);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { name: safe, version });
            }
            Err(err) => return Err(err.into()),
        };

        parse_document(&source).map_err(|err| {
            warn!(path = %path.display(), error = %err, "stored template failed validation");
            StoreError::Corrupted { name: safe, version: resolved, reason: err.to_string() }
        })
    }

    fn list(&self, name: Option<&str>) -> Result<BTreeMap<String, Vec<u32>>, StoreError> {
        let mut listing = BTreeMap::new();

        if let Some(name) = name {
            let safe = storage_name(name)?;
            let versions = self.versions(&safe)?;
            if !versions.is_empty() {
                listing.insert(safe, versions);
            }
            return Ok(listing);
        }

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(listing),
            Err(err) => return Err(err.into()),
        };

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(dir_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let versions = self.versions(&dir_name)?;
            if !versions.is_empty() {
                listing.insert(dir_name, versions);
            }
        }
        Ok(listing)
    }

    fn delete(&self, name: &str, version: u32) -> Result<bool, StoreError> {
        let safe = storage_name(name)?;
        match fs::remove_file(self.version_path(&safe, version)) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        }

        if self.versions(&safe)?.is_empty() {
            // Only succeeds when no stray files remain.
            let _ = fs::remove_dir(self.template_dir(&safe));
        }
        debug!(name = %safe, version, "deleted template version");
        Ok(true)
    }
}
