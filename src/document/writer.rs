use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use thiserror::Error;

use super::{Element, Node};

const INDENT_WIDTH: usize = 2;

/// Failure while encoding a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to write XML: {0}")]
pub struct WriteError(String);

/// Serialize a document as ASCII with a `standalone="no"` declaration.
///
/// Nested elements are indented, leaf text stays on the line of its element
/// and every character outside ASCII is written as a numeric reference.
pub fn write_document(root: &Element) -> Result<String, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("ASCII"), Some("no"))),
    )?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| WriteError(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), WriteError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        let escaped = ascii_escape(value);
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escaped.into_owned().into_bytes()),
        });
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(text) => {
                emit(writer, Event::Text(BytesText::from_escaped(ascii_escape(text))))?;
            }
            Node::CData(text) if text.is_ascii() && !text.contains("]]>") => {
                emit(writer, Event::CData(BytesCData::new(text.as_str())))?;
            }
            Node::CData(text) => {
                emit(writer, Event::Text(BytesText::from_escaped(ascii_escape(text))))?;
            }
            Node::Comment(text) => {
                emit(writer, Event::Comment(BytesText::from_escaped(char_refs(text))))?;
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), WriteError> {
    writer
        .write_event(event)
        .map_err(|e| WriteError(e.to_string()))
}

/// Escape markup characters and replace everything outside ASCII with
/// numeric character references.
pub fn ascii_escape(text: &str) -> Cow<'_, str> {
    match escape(text) {
        Cow::Borrowed(s) => char_refs(s),
        Cow::Owned(s) => Cow::Owned(char_refs(&s).into_owned()),
    }
}

fn char_refs(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&format!("&#{};", c as u32));
        }
    }
    Cow::Owned(out)
}
