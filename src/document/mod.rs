mod parser;
mod writer;

pub use parser::{parse_document, ParseError};
pub use writer::{ascii_escape, write_document, WriteError};

/// A node inside an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

/// An XML element with ordered attributes and child nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, including any namespace prefix
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style child appender
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Get the value of an attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Iterate over the direct child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over the direct child elements with the given tag
    pub fn elements_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First direct child with the given tag whose attribute equals `value`
    pub fn find_child(&self, name: &str, attribute: &str, value: &str) -> Option<&Element> {
        self.elements()
            .find(|e| e.name == name && e.attribute(attribute) == Some(value))
    }

    pub fn find_child_mut(&mut self, name: &str, attribute: &str, value: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(e) if e.name == name && e.attribute(attribute) == Some(value) => Some(e),
            _ => None,
        })
    }

    /// Move out every direct child element with the given tag, keeping their order.
    /// Other nodes stay where they are.
    pub fn take_elements_named(&mut self, name: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node {
                Node::Element(e) if e.name == name => taken.push(e),
                other => kept.push(other),
            }
        }
        self.children = kept;
        taken
    }

    /// Append a child element
    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Concatenated text of the direct text and CDATA children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> Element {
        Element::new("hksection")
            .with_attribute("name", "__data__")
            .with_child("\n")
            .with_child(Element::new("hkobject").with_attribute("class", "A"))
            .with_child(Node::Comment(" between ".to_string()))
            .with_child(Element::new("other"))
            .with_child(Element::new("hkobject").with_attribute("class", "B"))
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut e = Element::new("hkobject")
            .with_attribute("name", "#0001")
            .with_attribute("class", "A");
        e.set_attribute("name", "#0002");
        assert_eq!(
            e.attributes,
            vec![
                ("name".to_string(), "#0002".to_string()),
                ("class".to_string(), "A".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_child_matches_tag_and_attribute() {
        let s = section();
        assert_eq!(s.find_child("hkobject", "class", "B").and_then(|e| e.attribute("class")), Some("B"));
        assert!(s.find_child("other", "class", "B").is_none());
        assert!(s.find_child("hkobject", "class", "C").is_none());
    }

    #[test]
    fn test_find_child_outlives_query_strings() {
        let s = section();
        let found = {
            let tag = String::from("hkobject");
            let class = String::from("A");
            s.find_child(&tag, "class", &class)
        };
        assert_eq!(found.and_then(|e| e.attribute("class")), Some("A"));
    }

    #[test]
    fn test_take_elements_named_keeps_other_nodes() {
        let mut s = section();
        let taken = s.take_elements_named("hkobject");
        let classes: Vec<_> = taken.iter().filter_map(|e| e.attribute("class")).collect();
        assert_eq!(classes, vec!["A", "B"]);
        assert_eq!(s.children.len(), 3);
        assert_eq!(s.elements().count(), 1);
    }

    #[test]
    fn test_text_joins_text_and_cdata() {
        let e = Element::new("hkparam")
            .with_child("1 ")
            .with_child(Node::CData("2".to_string()))
            .with_child(Element::new("x"));
        assert_eq!(e.text(), "1 2");
    }
}
