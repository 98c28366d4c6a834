use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

/// Version used when a documentation request carries no `v` parameter.
pub const DEFAULT_VERSION: &str = "default";

/// Supplies the versions listed in the Swagger UI, in display order.
pub trait VersionSource: Send + Sync {
    fn versions(&self) -> Vec<String>;
}

impl VersionSource for Vec<String> {
    fn versions(&self) -> Vec<String> {
        self.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{} is not a valid OpenAPI document: {source}", .path.display())]
    InvalidJson { path: PathBuf, source: serde_json::Error },
}

/// OpenAPI documents keyed by version.
#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    documents: BTreeMap<String, String>,
}

impl DocumentStore {
    #[cfg(test)]
    pub fn from_documents<V, D>(documents: impl IntoIterator<Item = (V, D)>) -> Self
    where
        V: Into<String>,
        D: Into<String>,
    {
        DocumentStore {
            documents: documents.into_iter().map(|(v, d)| (v.into(), d.into())).collect(),
        }
    }

    /// Loads every `<version>.json` file of `dir`. Other entries are skipped.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let dir = dir.as_ref();
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| DocumentError::Io { path, source }
        };

        let mut documents = BTreeMap::new();
        for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(version) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let body = std::fs::read_to_string(&path).map_err(io_err(path.as_path()))?;
            if let Err(source) = serde_json::from_str::<serde_json::Value>(&body) {
                return Err(DocumentError::InvalidJson { path, source });
            }
            tracing::debug!(version, path = %path.display(), "loaded openapi document");
            documents.insert(version.to_string(), body);
        }

        Ok(DocumentStore { documents })
    }

    pub fn get(&self, version: &str) -> Option<&str> {
        self.documents.get(version).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl VersionSource for DocumentStore {
    fn versions(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }
}
