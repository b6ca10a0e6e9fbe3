pub mod catalog;
pub mod document;
pub mod error;
pub mod source;
pub mod types;
pub mod utils;

pub use catalog::{Catalog, CatalogStore, ClassKey};
pub use document::{Element, Node};
pub use error::DumpError;
pub use source::SourceDocument;
pub use types::{
    DocumentLayout,
    DumpConfig,
    DumpSummary,
    KeylessPolicy,
    MergeReport,
    SourceSummary,
    DEFAULT_CATALOG_PATH,
    DEFAULT_SECTION_MARKER,
};

use log::{info, warn};

/// Merge the unique objects of every source into the catalog and rewrite it.
///
/// All sources are parsed before anything is written, so a failure leaves an
/// existing catalog file untouched.
pub fn dump_classes(config: &DumpConfig) -> Result<DumpSummary, DumpError> {
    if config.sources.is_empty() {
        return Err(DumpError::MissingArgument);
    }

    let sources = utils::expand_sources(&config.sources);
    if sources.is_empty() {
        warn!("No source documents found");
    }

    let documents = sources
        .iter()
        .map(|path| SourceDocument::load(path))
        .collect::<Result<Vec<_>, _>>()?;

    let store = CatalogStore::new(&config.catalog_path, config.layout.clone());
    let catalog_existed = store.exists();
    let mut catalog = store.load()?;

    let mut summaries = Vec::with_capacity(documents.len());
    for document in documents {
        let path = document.path().to_path_buf();
        let (section_found, report) = match document.into_objects(&config.layout) {
            Some(objects) => (true, catalog.merge(objects, config.keyless)),
            None => (false, MergeReport::default()),
        };
        info!(
            "{}: {} added, {} already known",
            path.display(),
            report.added.len(),
            report.duplicates.len()
        );
        summaries.push(SourceSummary {
            path,
            section_found,
            report,
        });
    }

    let written = !config.dry_run;
    if written {
        store.save(&catalog)?;
    } else {
        info!("Dry run, not writing {}", store.path().display());
    }

    Ok(DumpSummary {
        catalog_path: config.catalog_path.clone(),
        catalog_existed,
        sources: summaries,
        catalog_size: catalog.len(),
        written,
    })
}
