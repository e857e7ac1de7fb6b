//! `talend.project` descriptor.

use std::io::Read;

use crate::document::xml;
use crate::error::ReviewError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// `technicalLabel`
    pub name: String,
    /// `productVersion`
    pub product_version: String,
}

/// The first element under the root carries the project attributes.
pub fn read_descriptor<R: Read>(input: R) -> Result<ProjectDescriptor, ReviewError> {
    let root = xml::read_root(input)?;
    let project = root
        .children
        .first()
        .ok_or_else(|| ReviewError::parse("P004", "Project descriptor has no project element"))?;

    let product_version = project.attr("productVersion").ok_or_else(|| {
        ReviewError::parse("P004", "Unknown Talend version. Cannot parse!")
    })?;
    let name = project.attr("technicalLabel").ok_or_else(|| {
        ReviewError::parse("P004", "Couldn't find Talend project name. XML corrupt?")
    })?;

    Ok(ProjectDescriptor {
        name: name.to_string(),
        product_version: product_version.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_name_and_version() {
        let xml = r#"<xmi:XMI xmlns:xmi="http://www.omg.org/XMI">
  <TalendProperties:Project technicalLabel="DWH" label="dwh" productVersion="Talend Open Studio-6.4.1"/>
</xmi:XMI>"#;
        let descriptor = read_descriptor(xml.as_bytes()).unwrap();
        assert_eq!(descriptor.name, "DWH");
        assert_eq!(descriptor.product_version, "Talend Open Studio-6.4.1");
    }

    #[test]
    fn missing_attributes_are_structural_errors() {
        let no_version = r#"<x><p technicalLabel="DWH"/></x>"#;
        assert_eq!(read_descriptor(no_version.as_bytes()).unwrap_err().code, "P004");
        let no_label = r#"<x><p productVersion="7.3"/></x>"#;
        assert_eq!(read_descriptor(no_label.as_bytes()).unwrap_err().code, "P004");
        assert_eq!(read_descriptor("<x/>".as_bytes()).unwrap_err().code, "P004");
    }
}
