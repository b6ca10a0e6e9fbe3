mod store;

pub use store::CatalogStore;

use std::collections::HashSet;

use log::{debug, warn};

use crate::document::Element;
use crate::types::{DocumentLayout, KeylessPolicy, MergeReport};

/// Deduplication key of an object. `None` is the shared key of objects
/// that lack the key attribute.
pub type ClassKey = Option<String>;

/// Accumulated object definitions, unique by class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    root: Element,
    object_tag: String,
    key_attribute: String,
    keys: HashSet<ClassKey>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(layout: &DocumentLayout) -> Self {
        Self::from_root(Element::new(layout.catalog_root.as_str()), layout)
    }

    /// Wrap an existing catalog document. Objects already present are kept
    /// as they are, even if their keys repeat.
    pub fn from_root(root: Element, layout: &DocumentLayout) -> Self {
        let keys = root
            .elements_named(&layout.object_tag)
            .map(|e| e.attribute(&layout.key_attribute).map(str::to_string))
            .collect();

        Self {
            root,
            object_tag: layout.object_tag.clone(),
            key_attribute: layout.key_attribute.clone(),
            keys,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// Number of object entries
    pub fn len(&self) -> usize {
        self.root.elements_named(&self.object_tag).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an object with this class is recorded
    pub fn contains(&self, class: Option<&str>) -> bool {
        self.keys.contains(&class.map(str::to_string))
    }

    /// The recorded object for a class
    pub fn get(&self, class: &str) -> Option<&Element> {
        self.root
            .find_child(&self.object_tag, &self.key_attribute, class)
    }

    /// Class keys of the recorded objects in catalog order
    pub fn classes(&self) -> impl Iterator<Item = Option<&str>> {
        self.root
            .elements_named(&self.object_tag)
            .map(|e| e.attribute(&self.key_attribute))
    }

    /// Move every object whose class is not yet recorded into the catalog.
    ///
    /// Objects are considered in order, so the first definition of a class
    /// wins, both within `objects` and across calls. Existing entries are
    /// never modified.
    pub fn merge<I>(&mut self, objects: I, keyless: KeylessPolicy) -> MergeReport
    where
        I: IntoIterator<Item = Element>,
    {
        let mut report = MergeReport::default();

        for object in objects {
            let key: ClassKey = object.attribute(&self.key_attribute).map(str::to_string);

            if key.is_none() {
                report.keyless += 1;
                let name = object.attribute("name").unwrap_or("?");
                warn!("<{} name=\"{}\"> has no {} attribute", object.name, name, self.key_attribute);
                if keyless == KeylessPolicy::Skip {
                    continue;
                }
            }

            if self.keys.contains(&key) {
                debug!("Skipping known class {}", display_key(&key));
                report.duplicates.push(key);
                continue;
            }

            debug!("Adding class {}", display_key(&key));
            self.keys.insert(key.clone());
            self.root.push_element(object);
            report.added.push(key);
        }

        report
    }
}

fn display_key(key: &ClassKey) -> &str {
    key.as_deref().unwrap_or("<none>")
}
