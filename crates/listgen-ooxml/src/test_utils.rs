//! Shared test utilities for listgen-ooxml
//!
//! This module provides package fixtures used by the unit tests here and by
//! the integration tests of dependent crates.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::archive::OoxmlArchive;
use crate::document::NumberingRef;
use crate::numbering::Numbering;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Zip a list of `(path, contents)` parts into package bytes
pub fn build_package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (path, contents) in parts {
        zip.start_file(*path, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

/// Create a minimal valid DOCX for testing
///
/// Contains the content types, package and document relationships, and a
/// document with one paragraph. There is no styles or numbering part.
///
/// # Example
/// ```ignore
/// use listgen_ooxml::test_utils::create_minimal_template;
/// let template = create_minimal_template();
/// ```
pub fn create_minimal_template() -> Vec<u8> {
    build_package(&[
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#
                .to_string(),
        ),
        ("_rels/.rels", package_rels()),
        (
            "word/_rels/document.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
</Relationships>"#
                .to_string(),
        ),
        (
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="{W_NS}">
  <w:body>
    <w:p><w:r><w:t>Template</w:t></w:r></w:p>
  </w:body>
</w:document>"#
            ),
        ),
    ])
}

/// Create a DOTX template with numbering definitions
///
/// Each `(abstract_id, style)` pair becomes an abstract numbering definition
/// whose first level is bound to `style` when one is given; every style
/// named this way is also declared in styles.xml. The template carries a
/// header, a footer and a body with a title paragraph, a table and section
/// properties referencing the header and footer. With no pairs the
/// numbering part is omitted entirely.
pub fn create_numbering_template(bindings: &[(u32, Option<&str>)]) -> Vec<u8> {
    let has_numbering = !bindings.is_empty();

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>
  <Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>
"#,
    );
    if has_numbering {
        content_types.push_str(
            r#"  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
"#,
        );
    }
    content_types.push_str("</Types>");

    let mut document_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
"#,
    );
    if has_numbering {
        document_rels.push_str(
            r#"  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
"#,
        );
    }
    document_rels.push_str(
        r#"  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/>
</Relationships>"#,
    );

    let mut parts = vec![
        ("[Content_Types].xml", content_types),
        ("_rels/.rels", package_rels()),
        ("word/_rels/document.xml.rels", document_rels),
        ("word/styles.xml", styles_xml(bindings)),
        (
            "word/header1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<w:hdr xmlns:w="{W_NS}"><w:p><w:r><w:t>Sample header</w:t></w:r></w:p></w:hdr>"#
            ),
        ),
        (
            "word/footer1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<w:ftr xmlns:w="{W_NS}"><w:p><w:r><w:t>Sample footer</w:t></w:r></w:p></w:ftr>"#
            ),
        ),
        (
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Template title</w:t></w:r></w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:p><w:r><w:t>Template text</w:t></w:r></w:p>
    <w:sectPr><w:headerReference w:type="default" r:id="rId3"/><w:footerReference w:type="default" r:id="rId4"/><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>
  </w:body>
</w:document>"#
            ),
        ),
    ];
    if has_numbering {
        parts.push(("word/numbering.xml", numbering_xml(bindings)));
    }

    build_package(&parts)
}

/// Build a numbering part with one abstract definition and one instance per pair
///
/// Every definition has three decimal levels; only level 0 carries the style
/// binding. Instance IDs are assigned 1, 2, ... in pair order.
pub fn numbering_xml(bindings: &[(u32, Option<&str>)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="{W_NS}">
"#
    );

    for (abstract_id, style) in bindings {
        xml.push_str(&format!(
            "  <w:abstractNum w:abstractNumId=\"{}\">\n",
            abstract_id
        ));
        for ilvl in 0..3 {
            xml.push_str(&format!(
                "    <w:lvl w:ilvl=\"{ilvl}\"><w:start w:val=\"1\"/><w:numFmt w:val=\"decimal\"/>"
            ));
            if let (0, Some(style)) = (ilvl, style) {
                xml.push_str(&format!("<w:pStyle w:val=\"{}\"/>", style));
            }
            xml.push_str(&format!("<w:lvlText w:val=\"%{}.\"/></w:lvl>\n", ilvl + 1));
        }
        xml.push_str("  </w:abstractNum>\n");
    }

    for (index, (abstract_id, _)) in bindings.iter().enumerate() {
        xml.push_str(&format!(
            "  <w:num w:numId=\"{}\"><w:abstractNumId w:val=\"{}\"/></w:num>\n",
            index + 1,
            abstract_id
        ));
    }

    xml.push_str("</w:numbering>");
    xml
}

/// Read a part of a package as a string
pub fn extract_file(package: &[u8], path: &str) -> Option<String> {
    let archive = OoxmlArchive::from_reader(Cursor::new(package)).ok()?;
    archive.get_string(path).ok().flatten()
}

/// Computes the ordinal Word displays for each list paragraph.
///
/// Counters belong to the abstract definition, so two instances of the same
/// definition continue each other's sequence unless an instance carries a
/// start override, which applies the first time that instance is used at the
/// overridden level. Advancing a level resets all deeper levels.
#[derive(Debug)]
pub struct ListCounter<'a> {
    numbering: &'a Numbering,
    counters: HashMap<(u32, u32), u32>,
    started: HashSet<(u32, u32)>,
}

impl<'a> ListCounter<'a> {
    pub fn new(numbering: &'a Numbering) -> Self {
        Self {
            numbering,
            counters: HashMap::new(),
            started: HashSet::new(),
        }
    }

    /// Ordinal of the next paragraph bound to `reference`
    ///
    /// Returns `None` when the instance or its definition does not exist.
    pub fn next(&mut self, reference: NumberingRef) -> Option<u32> {
        let num = self.numbering.num(reference.num_id)?;
        let abstract_num = self.numbering.abstract_num(num.abstract_num_id)?;
        let key = (abstract_num.id, reference.ilvl);

        let first_use = self.started.insert((num.num_id, reference.ilvl));
        let value = match num.start_override(reference.ilvl) {
            Some(start) if first_use => start,
            _ => match self.counters.get(&key) {
                Some(current) => current + 1,
                None => abstract_num
                    .level(reference.ilvl)
                    .and_then(|l| l.start)
                    .unwrap_or(1),
            },
        };

        self.counters.insert(key, value);
        self.counters
            .retain(|&(id, ilvl), _| id != abstract_num.id || ilvl <= reference.ilvl);

        Some(value)
    }
}

fn package_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
        .to_string()
}

fn styles_xml(bindings: &[(u32, Option<&str>)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="{W_NS}">
  <w:style w:type="paragraph" w:styleId="Normal" w:default="1">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
  </w:style>
"#
    );

    for style in bindings.iter().filter_map(|(_, style)| *style) {
        if xml.contains(&format!("w:styleId=\"{}\"", style)) {
            continue;
        }
        xml.push_str(&format!(
            "  <w:style w:type=\"paragraph\" w:styleId=\"{style}\">\n    <w:name w:val=\"{style}\"/>\n    <w:basedOn w:val=\"Normal\"/>\n  </w:style>\n"
        ));
    }

    xml.push_str("</w:styles>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_template_parts() {
        let bytes = create_numbering_template(&[(1, Some("ListNumber"))]);
        assert!(extract_file(&bytes, "word/numbering.xml").is_some());
        assert!(extract_file(&bytes, "word/header1.xml").is_some());

        let styles = extract_file(&bytes, "word/styles.xml").unwrap();
        assert!(styles.contains(r#"w:styleId="ListNumber""#));
    }

    #[test]
    fn test_template_without_bindings_has_no_numbering() {
        let bytes = create_numbering_template(&[]);
        assert!(extract_file(&bytes, "word/numbering.xml").is_none());
        let rels = extract_file(&bytes, "word/_rels/document.xml.rels").unwrap();
        assert!(!rels.contains("numbering"));
    }

    #[test]
    fn test_counter_continues_without_override() {
        let mut numbering = Numbering::parse(numbering_xml(&[(0, Some("A"))]).as_bytes()).unwrap();
        let continued = numbering.add_num(0).unwrap();
        let mut counter = ListCounter::new(&numbering);

        let first = NumberingRef { num_id: 1, ilvl: 0 };
        assert_eq!(counter.next(first), Some(1));
        assert_eq!(counter.next(first), Some(2));

        let second = NumberingRef { num_id: continued, ilvl: 0 };
        assert_eq!(counter.next(second), Some(3));
    }

    #[test]
    fn test_counter_restarts_with_override() {
        let mut numbering = Numbering::parse(numbering_xml(&[(0, Some("A"))]).as_bytes()).unwrap();
        let restarted = numbering.add_restarting_num(0).unwrap();
        let mut counter = ListCounter::new(&numbering);

        let first = NumberingRef { num_id: 1, ilvl: 0 };
        counter.next(first);
        counter.next(first);

        let second = NumberingRef { num_id: restarted, ilvl: 0 };
        assert_eq!(counter.next(second), Some(1));
        assert_eq!(counter.next(second), Some(2));
    }

    #[test]
    fn test_counter_resets_deeper_levels() {
        let numbering = Numbering::parse(numbering_xml(&[(0, Some("A"))]).as_bytes()).unwrap();
        let mut counter = ListCounter::new(&numbering);

        let top = NumberingRef { num_id: 1, ilvl: 0 };
        let sub = NumberingRef { num_id: 1, ilvl: 1 };
        assert_eq!(counter.next(top), Some(1));
        assert_eq!(counter.next(sub), Some(1));
        assert_eq!(counter.next(sub), Some(2));
        assert_eq!(counter.next(top), Some(2));
        assert_eq!(counter.next(sub), Some(1));
        assert_eq!(counter.next(NumberingRef { num_id: 99, ilvl: 0 }), None);
    }
}
