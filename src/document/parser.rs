use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::{Element, Node};

/// A document that is not well-formed XML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at byte {position})")]
pub struct ParseError {
    /// Byte offset in the input where the problem was detected
    pub position: u64,
    pub message: String,
}

impl ParseError {
    pub fn new(position: u64, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parse a complete document and return its root element.
///
/// Whitespace-only text is dropped so that re-serialization controls all
/// indentation. The XML declaration, doctype, processing instructions and
/// comments outside the root are discarded.
pub fn parse_document(content: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::new(reader.buffer_position() as u64, e.to_string()))?;
        let position = reader.buffer_position() as u64;

        match event {
            Event::Start(start) => {
                stack.push(start_element(&start, position)?);
            }
            Event::Empty(start) => {
                let element = start_element(&start, position)?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::new(position, "closing tag without matching opening tag"))?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::new(position, e.to_string()))?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                    None => return Err(ParseError::new(position, "text outside of the root element")),
                }
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(text)),
                    None => return Err(ParseError::new(position, "CDATA outside of the root element")),
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::new(
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }

    root.ok_or_else(|| ParseError::new(0, "document has no root element"))
}

fn start_element(start: &BytesStart<'_>, position: u64) -> Result<Element, ParseError> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())
        .map_err(|e| ParseError::new(position, format!("invalid tag name: {e}")))?;
    let mut element = Element::new(name);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ParseError::new(position, e.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| ParseError::new(position, format!("invalid attribute name: {e}")))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| ParseError::new(position, e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    position: u64,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::new(position, "document has more than one root element"));
    }
    *root = Some(element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_strips_blank_text() {
        let root = parse_document(
            r##"<?xml version="1.0" encoding="ascii"?>
<hkpackfile classversion="8">
    <hksection name="__data__">
        <hkobject name="#0001" class="hkRootLevelContainer">
            <hkparam name="namedVariants" numelements="0"></hkparam>
        </hkobject>
    </hksection>
</hkpackfile>
"##,
        )
        .unwrap();

        assert_eq!(root.name, "hkpackfile");
        assert_eq!(root.children.len(), 1);
        let section = root.elements().next().unwrap();
        let object = section.elements().next().unwrap();
        assert_eq!(object.attribute("class"), Some("hkRootLevelContainer"));
        let param = object.elements().next().unwrap();
        assert!(param.children.is_empty());
    }

    #[test]
    fn test_parse_reads_tag_names() {
        let root = parse_document(r#"<hk:packfile><hksection name="__data__"/></hk:packfile>"#).unwrap();
        assert_eq!(root.name, "hk:packfile");
        assert_eq!(root.elements().next().map(|e| e.name.as_str()), Some("hksection"));
    }

    #[test]
    fn test_parse_keeps_inner_whitespace_of_text() {
        let root = parse_document("<a><b>\n  1 2\n  3 4\n</b></a>").unwrap();
        let b = root.elements().next().unwrap();
        assert_eq!(b.text(), "\n  1 2\n  3 4\n");
    }

    #[test]
    fn test_parse_unescapes_entities_and_char_refs() {
        let root = parse_document(r#"<a v="x &amp; &#233;">&lt;&#x41;&gt;</a>"#).unwrap();
        assert_eq!(root.attribute("v"), Some("x & \u{e9}"));
        assert_eq!(root.text(), "<A>");
    }

    #[test]
    fn test_parse_keeps_comments_inside_root() {
        let root = parse_document("<!-- top --><a><!-- inner --><b/></a>").unwrap();
        assert_eq!(root.children[0], Node::Comment(" inner ".to_string()));
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        assert!(parse_document("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_element() {
        assert!(parse_document("<a><b></b>").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_and_multi_root_documents() {
        assert!(parse_document("").is_err());
        assert!(parse_document("   \n").is_err());
        assert!(parse_document("<a/><b/>").is_err());
        assert!(parse_document("<a/>trailing").is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_attributes() {
        assert!(parse_document(r#"<a class="x" class="y"/>"#).is_err());
    }
}
