//! Package relationships (`_rels/*.rels`)
//!
//! The writer reads `word/_rels/document.xml.rels`, adds the numbering
//! relationship when a report gains a numbering part, and writes the file
//! back with every existing entry in its original order.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::{escape_xml, get_attr};

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One `Relationship` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (`rIdN`)
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target part, relative to the source part
    pub target: String,
    /// `External` for hyperlinks and linked files
    pub target_mode: Option<String>,
}

/// The entries of one .rels file in document order
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Main document part, referenced from the package root
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Numbering part
    pub const TYPE_NUMBERING: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";

    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a .rels file
    ///
    /// Entries without an `Id` or `Target` are dropped.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    if let (Some(id), Some(target)) = (get_attr(e, b"Id"), get_attr(e, b"Target")) {
                        entries.push(Relationship {
                            id,
                            rel_type: get_attr(e, b"Type").unwrap_or_default(),
                            target,
                            target_mode: get_attr(e, b"TargetMode"),
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { entries })
    }

    /// Append an internal relationship and return its new ID
    ///
    /// The ID is one past the highest `rIdN` in use.
    pub fn add(&mut self, target: String, rel_type: String) -> String {
        let next = self
            .entries
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{}", next);

        self.entries.push(Relationship {
            id: id.clone(),
            rel_type,
            target,
            target_mode: None,
        });
        id
    }

    /// First relationship of a type
    pub fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Serialize to a .rels file
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');

        for rel in &self.entries {
            xml.push_str(&format!(
                r#"  <Relationship Id="{}" Type="{}" Target="{}""#,
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
            if let Some(ref mode) = rel.target_mode {
                xml.push_str(&format!(r#" TargetMode="{}""#, escape_xml(mode)));
            }
            xml.push_str("/>\n");
        }

        xml.push_str("</Relationships>");
        xml
    }
}
