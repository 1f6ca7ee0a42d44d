use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::TemplateDocument;
use crate::ports::{StoreError, TemplateStore, next_version, storage_name};

type Versions = BTreeMap<u32, TemplateDocument>;

/// In-memory template store.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: Arc<Mutex<BTreeMap<String, Versions>>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Versions>> {
        self.templates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn save(
        &self,
        document: &TemplateDocument,
        name: &str,
        version: Option<u32>,
    ) -> Result<u32, StoreError> {
        let name = storage_name(name)?;
        let mut templates = self.lock();
        let version = match version {
            Some(version) => version,
            None => {
                let latest = templates.get(&name).and_then(|versions| versions.keys().next_back());
                next_version(&name, latest.copied())?
            }
        };
        templates.entry(name).or_default().insert(version, document.clone());
        Ok(version)
    }

    fn load(&self, name: &str, version: Option<u32>) -> Result<TemplateDocument, StoreError> {
        let safe = storage_name(name)?;
        let templates = self.lock();
        let versions = templates.get(&safe);
        let found = match version {
            Some(version) => versions.and_then(|versions| versions.get(&version)),
            None => versions.and_then(|versions| versions.values().next_back()),
        };
        found.cloned().ok_or(StoreError::NotFound { name: safe, version })
    }

    fn list(&self, name: Option<&str>) -> Result<BTreeMap<String, Vec<u32>>, StoreError> {
        let filter = name.map(storage_name).transpose()?;
        let templates = self.lock();
        Ok(templates
            .iter()
            .filter(|(stored, versions)| {
                !versions.is_empty() && filter.as_ref().is_none_or(|wanted| wanted == *stored)
            })
            .map(|(stored, versions)| (stored.clone(), versions.keys().copied().collect()))
            .collect())
    }

    fn delete(&self, name: &str, version: u32) -> Result<bool, StoreError> {
        let safe = storage_name(name)?;
        let mut templates = self.lock();
        let Some(versions) = templates.get_mut(&safe) else {
            return Ok(false);
        };
        let removed = versions.remove(&version).is_some();
        if versions.is_empty() {
            templates.remove(&safe);
        }
        Ok(removed)
    }
}
