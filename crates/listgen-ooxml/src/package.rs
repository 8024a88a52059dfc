//! In-memory Word package
//!
//! [`WordDocument`] owns the unpacked archive together with the parsed body,
//! numbering table and stylesheet. Parts that are not modelled (headers,
//! footers, settings, theme, ...) stay in the archive and are written back
//! unchanged.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART,
};
use crate::document::{Block, Document, Paragraph};
use crate::error::Result;
use crate::numbering::Numbering;
use crate::relationships::Relationships;
use crate::styles::StyleSheet;
use crate::writer::DocxWriter;

const BLANK_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

/// A Word package being read or generated
#[derive(Debug, Clone)]
pub struct WordDocument {
    archive: OoxmlArchive,
    body: Document,
    numbering: Numbering,
    styles: StyleSheet,
}

impl WordDocument {
    /// Create a blank package: an empty body, no styles and no numbering
    pub fn new() -> Self {
        let mut archive = OoxmlArchive::new();
        archive.set_string(CONTENT_TYPES_PART, BLANK_CONTENT_TYPES);

        let mut package_rels = Relationships::new();
        package_rels.add(
            DOCUMENT_PART.to_string(),
            Relationships::TYPE_OFFICE_DOCUMENT.to_string(),
        );
        archive.set_string("_rels/.rels", package_rels.to_xml());
        archive.set_string(DOCUMENT_RELS_PART, Relationships::new().to_xml());

        let body = Document::new();
        archive.set_string(DOCUMENT_PART, body.to_xml());

        Self {
            archive,
            body,
            numbering: Numbering::new(),
            styles: StyleSheet::default(),
        }
    }

    /// Parse the modelled parts of an unpacked archive
    ///
    /// `word/document.xml` is required; the styles and numbering parts are
    /// optional.
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let body = Document::parse(archive.document_xml()?)?;
        let numbering = match archive.numbering_xml() {
            Some(xml) => Numbering::parse(xml)?,
            None => Numbering::new(),
        };
        let styles = match archive.styles_xml() {
            Some(xml) => StyleSheet::parse(xml)?,
            None => StyleSheet::default(),
        };

        Ok(Self {
            archive,
            body,
            numbering,
            styles,
        })
    }

    /// Load a package from DOCX/DOTX bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_reader(Cursor::new(bytes))?)
    }

    /// Open a DOCX/DOTX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// The parsed body
    pub fn body(&self) -> &Document {
        &self.body
    }

    /// Mutable access to the body
    pub fn body_mut(&mut self) -> &mut Document {
        &mut self.body
    }

    /// The numbering table
    pub fn numbering(&self) -> &Numbering {
        &self.numbering
    }

    /// Mutable access to the numbering table
    pub fn numbering_mut(&mut self) -> &mut Numbering {
        &mut self.numbering
    }

    /// The stylesheet
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// The archive the package was read from
    ///
    /// Modelled parts here hold their state as loaded, not as edited.
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Body-level paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    /// Append an empty paragraph to the body and return it for editing
    pub fn create_paragraph(&mut self) -> &mut Paragraph {
        self.body.push_paragraph(Paragraph::new())
    }

    /// Number of body elements
    pub fn body_element_count(&self) -> usize {
        self.body.len()
    }

    /// The body element at `index`
    pub fn body_element(&self, index: usize) -> Option<&Block> {
        self.body.blocks.get(index)
    }

    /// Remove the body element at `index`
    ///
    /// Returns `false` when the index is out of range.
    pub fn remove_body_element(&mut self, index: usize) -> bool {
        self.body.remove(index).is_some()
    }

    /// Serialize the package and write it to `writer`
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the package to DOCX bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        DocxWriter::generate(self)
    }

    /// Write the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write(file)
    }
}

impl Default for WordDocument {
    fn default() -> Self {
        Self::new()
    }
}
