//! Minimal element tree read with quick-xml.
//!
//! Job documents are small and only their first two levels are inspected, so
//! the whole document is materialized; text content is ignored.

use std::io::{BufReader, Read};

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ReviewError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Raw tag name, namespace prefix included.
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Read a whole XML document and return its root element.
pub fn read_root<R: Read>(input: R) -> Result<Element, ReviewError> {
    let mut reader = Reader::from_reader(BufReader::new(input));
    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(ReviewError::parse(
                    "P001",
                    format!(
                        "Failed to read XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                ));
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => open.push(element_from(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = open
                    .pop()
                    .ok_or_else(|| ReviewError::parse("P001", "Unexpected closing tag"))?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.last() {
        return Err(ReviewError::parse(
            "P001",
            format!("Unclosed element <{}>", unclosed.tag),
        ));
    }
    root.ok_or_else(|| ReviewError::parse("P001", "Document has no root element"))
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, ReviewError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = IndexMap::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            ReviewError::parse("P001", format!("Malformed attribute in <{}>: {}", tag, e))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| {
            ReviewError::parse(
                "P001",
                format!("Cannot decode attribute '{}' in <{}>: {}", key, tag, e),
            )
        })?;
        attributes.insert(key, value.into_owned());
    }

    Ok(Element {
        tag,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ReviewError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ReviewError::parse(
                "P001",
                format!("Unexpected second root element <{}>", element.tag),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_elements_and_unescapes_attributes() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<talendfile:ProcessType xmlns:talendfile="platform:/resource/org.talend.model/model/TalendFile.xsd">
  <node componentName="tRunJob">
    <elementParameter name="PROCESS" value="&quot;Child&quot;"/>
  </node>
  <context name="Default"/>
</talendfile:ProcessType>"#;
        let root = read_root(xml.as_bytes()).unwrap();
        assert_eq!(root.tag, "talendfile:ProcessType");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].attr("componentName"), Some("tRunJob"));
        assert_eq!(root.children[0].children[0].attr("value"), Some("\"Child\""));
        assert_eq!(root.children[1].tag, "context");
    }

    #[test]
    fn mismatched_tags_are_a_read_error() {
        let err = read_root("<a><b></a>".as_bytes()).unwrap_err();
        assert_eq!(err.code, "P001");
    }

    #[test]
    fn empty_input_has_no_root() {
        let err = read_root("".as_bytes()).unwrap_err();
        assert_eq!(err.code, "P001");
        assert!(err.message.contains("no root"));
    }

    #[test]
    fn unclosed_element_is_a_read_error() {
        let err = read_root("<a><b/>".as_bytes()).unwrap_err();
        assert_eq!(err.code, "P001");
    }
}
