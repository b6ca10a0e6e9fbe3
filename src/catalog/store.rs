use std::path::{Path, PathBuf};

use log::info;

use super::Catalog;
use crate::document::{parse_document, write_document, ParseError};
use crate::error::DumpError;
use crate::types::DocumentLayout;

/// File-backed storage for a catalog
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
    layout: DocumentLayout,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>, layout: DocumentLayout) -> Self {
        Self {
            path: path.into(),
            layout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the catalog from disk or create an empty one if the file doesn't exist
    pub fn load(&self) -> Result<Catalog, DumpError> {
        if !self.exists() {
            info!("Creating new catalog for {}", self.path.display());
            return Ok(Catalog::new(&self.layout));
        }

        info!("Loading catalog from {}", self.path.display());
        let bytes = std::fs::read(&self.path).map_err(|e| DumpError::file_access(&self.path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| {
            DumpError::parse(
                &self.path,
                ParseError::new(e.utf8_error().valid_up_to() as u64, "catalog is not valid UTF-8"),
            )
        })?;
        let root = parse_document(&content).map_err(|e| DumpError::parse(&self.path, e))?;

        if root.name != self.layout.catalog_root {
            return Err(DumpError::parse(
                &self.path,
                ParseError::new(
                    0,
                    format!(
                        "expected root element <{}>, found <{}>",
                        self.layout.catalog_root, root.name
                    ),
                ),
            ));
        }

        let catalog = Catalog::from_root(root, &self.layout);
        info!("Loaded catalog with {} classes", catalog.len());
        Ok(catalog)
    }

    /// Rewrite the backing file with the catalog contents
    pub fn save(&self, catalog: &Catalog) -> Result<(), DumpError> {
        let xml = write_document(catalog.root())?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DumpError::file_access(parent, e))?;
        }

        info!("Saving catalog to {}", self.path.display());
        std::fs::write(&self.path, xml).map_err(|e| DumpError::file_access(&self.path, e))?;
        info!("Saved catalog with {} classes", catalog.len());
        Ok(())
    }
}
