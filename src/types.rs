use std::path::PathBuf;

use serde::Serialize;

/// Catalog file used when none is given, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "Res/Ds3ClothClasses.xml";

/// Marker naming the data section of a packfile
pub const DEFAULT_SECTION_MARKER: &str = "__data__";

/// Tag and attribute names that locate objects in sources and the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    /// Tag of the top-level sections in a source document
    pub section_tag: String,
    /// Attribute of a section that carries its marker
    pub section_attribute: String,
    /// Marker value of the section holding the objects
    pub section_marker: String,
    /// Tag of object elements
    pub object_tag: String,
    /// Attribute used as the deduplication key
    pub key_attribute: String,
    /// Root tag of the catalog document
    pub catalog_root: String,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            section_tag: "hksection".to_string(),
            section_attribute: "name".to_string(),
            section_marker: DEFAULT_SECTION_MARKER.to_string(),
            object_tag: "hkobject".to_string(),
            key_attribute: "class".to_string(),
            catalog_root: "Classes".to_string(),
        }
    }
}

/// What to do with objects that have no key attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum KeylessPolicy {
    /// All keyless objects share one null key; the first one seen is kept
    #[default]
    KeepFirst,
    /// Keyless objects are never added to the catalog
    Skip,
}

/// Configuration for a dump run
#[derive(Debug, Clone)]
pub struct DumpConfig {
    /// Source documents or directories of source documents, in merge order
    pub sources: Vec<PathBuf>,
    /// Catalog file to load and rewrite
    pub catalog_path: PathBuf,
    pub layout: DocumentLayout,
    pub keyless: KeylessPolicy,
    /// Merge in memory but leave the catalog file untouched
    pub dry_run: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            layout: DocumentLayout::default(),
            keyless: KeylessPolicy::default(),
            dry_run: false,
        }
    }
}

/// Outcome of merging one batch of objects into a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Keys appended to the catalog, in insertion order.
    /// `None` stands for the shared key of keyless objects.
    pub added: Vec<Option<String>>,
    /// Keys that were already present and therefore discarded
    pub duplicates: Vec<Option<String>>,
    /// Number of objects without a key attribute
    pub keyless: usize,
}

impl MergeReport {
    /// Whether the merge changed the catalog
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

/// Per-source part of a run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub path: PathBuf,
    /// Whether the data section was found
    pub section_found: bool,
    #[serde(flatten)]
    pub report: MergeReport,
}

/// Summary of a complete run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpSummary {
    pub catalog_path: PathBuf,
    /// Whether the catalog file existed before the run
    pub catalog_existed: bool,
    pub sources: Vec<SourceSummary>,
    /// Number of objects in the catalog after the run
    pub catalog_size: usize,
    /// Whether the catalog file was rewritten
    pub written: bool,
}

impl DumpSummary {
    /// Total number of classes added over all sources
    pub fn added(&self) -> usize {
        self.sources.iter().map(|s| s.report.added.len()).sum()
    }

    /// Total number of duplicates discarded over all sources
    pub fn duplicates(&self) -> usize {
        self.sources.iter().map(|s| s.report.duplicates.len()).sum()
    }
}

impl std::fmt::Display for DumpSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: added {} new classes, skipped {} known, {} total",
            self.catalog_path.display(),
            self.added(),
            self.duplicates(),
            self.catalog_size,
        )?;
        if !self.written {
            write!(f, " (not written)")?;
        }
        Ok(())
    }
}
