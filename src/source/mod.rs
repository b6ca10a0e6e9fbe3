use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::document::{parse_document, Element, ParseError};
use crate::error::DumpError;
use crate::types::DocumentLayout;

/// A parsed packfile whose data section supplies object definitions
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    root: Element,
}

impl SourceDocument {
    /// Read and parse a source document
    pub fn load(path: &Path) -> Result<Self, DumpError> {
        debug!("Loading source document {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| DumpError::file_access(path, e))?;
        let content = String::from_utf8(bytes).map_err(|e| {
            DumpError::parse(
                path,
                ParseError::new(e.utf8_error().valid_up_to() as u64, "document is not valid UTF-8"),
            )
        })?;
        Self::parse(path, &content)
    }

    /// Parse a source document from text; `path` is used for reporting only
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, DumpError> {
        let path = path.into();
        let root = parse_document(content).map_err(|e| DumpError::parse(&path, e))?;
        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The first top-level section carrying the configured marker
    pub fn data_section(&self, layout: &DocumentLayout) -> Option<&Element> {
        self.root.find_child(
            &layout.section_tag,
            &layout.section_attribute,
            &layout.section_marker,
        )
    }

    /// Consume the document and move out the object elements of its data section.
    ///
    /// Returns `None` when the document has no data section.
    pub fn into_objects(mut self, layout: &DocumentLayout) -> Option<Vec<Element>> {
        let Some(section) = self.root.find_child_mut(
            &layout.section_tag,
            &layout.section_attribute,
            &layout.section_marker,
        ) else {
            warn!(
                "{} has no <{} {}=\"{}\"> section",
                self.path.display(),
                layout.section_tag,
                layout.section_attribute,
                layout.section_marker
            );
            return None;
        };

        let objects = section.take_elements_named(&layout.object_tag);
        debug!("{} holds {} objects", self.path.display(), objects.len());
        Some(objects)
    }
}
