//! Job document phase: `.item` XML → [`JobDocument`].
//!
//! Only the direct children of the document root are inspected. Their tag
//! decides their kind by substring: `node`, `connection` or `context`.

pub mod extract;
pub mod types;
pub mod xml;

pub use extract::{DatabaseEndpoint, SqlStatement};
pub use types::*;

use std::io::Read;

use crate::error::ReviewError;
use xml::Element;

/// Parse one job document.
pub fn parse_job<R: Read>(input: R) -> Result<JobDocument, ReviewError> {
    let root = xml::read_root(input)?;
    let mut doc = JobDocument::default();

    for element in &root.children {
        if element.tag.contains("node") {
            process_node(element, &mut doc)?;
        } else if element.tag.contains("connection") {
            process_connection(element, &mut doc)?;
        } else if element.tag.contains("context") {
            process_context(element, &mut doc)?;
        }
    }

    Ok(doc)
}

fn required_attr<'a>(element: &'a Element, name: &str) -> Result<&'a str, ReviewError> {
    element.attr(name).ok_or_else(|| {
        ReviewError::parse(
            "P003",
            format!("<{}> is missing the '{}' attribute", element.tag, name),
        )
    })
}

fn process_node(element: &Element, doc: &mut JobDocument) -> Result<(), ReviewError> {
    let mut params = Params::new();
    for child in &element.children {
        if !child.tag.contains("elementParameter") {
            continue;
        }
        if let (Some(name), Some(value)) = (child.attr("name"), child.attr("value")) {
            params.insert(name.to_string(), value.to_string());
        }
    }

    if params.get("ACTIVATE").map(String::as_str) == Some("false") {
        return Ok(());
    }

    let component = required_attr(element, "componentName")?;
    params.insert(COMPONENT_KEY.to_string(), component.to_string());

    let unique_name = params.get("UNIQUE_NAME").cloned().ok_or_else(|| {
        ReviewError::parse(
            "P002",
            format!("'{}' node has no UNIQUE_NAME parameter", component),
        )
    })?;

    let lowered = component.to_lowercase();
    if !doc.uses_teradata && lowered.contains("teradata") {
        doc.uses_teradata = true;
    }
    if !doc.uses_files && lowered.contains("file") {
        doc.uses_files = true;
    }

    if component == JOB_INVOCATION_COMPONENT {
        if let Some(process) = params.get("PROCESS") {
            doc.children.push(process.clone());
        }
    }

    if let Some(table) = params.get("TABLE").filter(|t| !t.is_empty()) {
        let schema = params.get("DBNAME").map(String::as_str).unwrap_or_default();
        doc.tables
            .insert(format!("{}.{}", schema, table).replace('"', ""));
    }

    doc.nodes.insert(
        unique_name.clone(),
        Node {
            unique_name,
            params,
        },
    );
    Ok(())
}

fn process_connection(element: &Element, doc: &mut JobDocument) -> Result<(), ReviewError> {
    let connector = required_attr(element, "connectorName")?;
    let mut activated = None;
    let mut unique_name = None;

    for child in &element.children {
        if !child.tag.contains("elementParameter") {
            continue;
        }
        match child.attr("name") {
            Some("ACTIVATE") => activated = child.attr("value"),
            Some("UNIQUE_NAME") => unique_name = child.attr("value"),
            _ => {}
        }
    }

    if activated != Some("true") {
        return Ok(());
    }
    let unique_name = unique_name.ok_or_else(|| {
        ReviewError::parse(
            "P002",
            format!("'{}' connection has no UNIQUE_NAME parameter", connector),
        )
    })?;
    doc.connections
        .insert(unique_name.to_string(), connector.to_string());
    Ok(())
}

fn process_context(element: &Element, doc: &mut JobDocument) -> Result<(), ReviewError> {
    let group = required_attr(element, "name")?;
    let mut params = Params::new();
    for child in &element.children {
        let name = required_attr(child, "name")?;
        let value = required_attr(child, "value")?;
        params.insert(name.to_string(), value.to_string());
    }
    // Same-named groups replace each other wholesale.
    doc.context.insert(group.to_string(), params);
    Ok(())
}
