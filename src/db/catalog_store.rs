use std::{fs, io::ErrorKind, path::PathBuf};

use crate::{error::AppResult, models::Catalog};

/// Read-only access to the shared catalog document
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the catalog; a missing document is an empty catalog
    pub fn load(&self) -> AppResult<Catalog> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let catalog: Catalog = serde_json::from_str(&contents)?;
                tracing::debug!(items = catalog.len(), "Loaded catalog");
                Ok(catalog)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No catalog document, using empty catalog");
                Ok(Catalog::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_loads_books_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"books": [
                {"id": "b1", "title": "Dune", "author": "Frank Herbert", "genres": ["scifi"]},
                {"id": "b2", "title": "Emma"}
            ]}"#,
        )
        .unwrap();

        let catalog = CatalogStore::new(&path).load().unwrap();
        let ids: Vec<&str> = catalog.items().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
        assert_eq!(catalog.find_by_id("b1").unwrap().author_name(), "Frank Herbert");
    }
}
