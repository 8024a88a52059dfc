//! DOCX writer
//!
//! Serializes a [`WordDocument`] back into a ZIP package. The body and the
//! numbering table are regenerated from the model; every other part is
//! copied from the source archive. The writer also makes sure the package
//! declares the numbering part and that a template's main content type is
//! turned into the document one, so a `.dotx` input produces a `.docx`.

use std::io::Cursor;

use tracing::debug;

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, NUMBERING_PART,
};
use crate::error::Result;
use crate::package::WordDocument;
use crate::relationships::Relationships;

const TEMPLATE_MAIN_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
const DOCUMENT_MAIN_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const NUMBERING_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

/// DOCX package writer
#[derive(Debug, Default)]
pub struct DocxWriter {
    /// Relationships of the main document part
    relationships: Relationships,
    /// Whether the relationships were changed and must be rewritten
    relationships_changed: bool,
}

impl DocxWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a package to DOCX bytes
    pub fn generate(document: &WordDocument) -> Result<Vec<u8>> {
        let archive = Self::new().build_archive(document)?;

        let mut output = Cursor::new(Vec::new());
        archive.write_to(&mut output)?;
        Ok(output.into_inner())
    }

    /// Produce the archive that [`generate`](Self::generate) zips
    pub fn build_archive(mut self, document: &WordDocument) -> Result<OoxmlArchive> {
        let mut archive = document.archive().clone();
        self.init_from_archive(&archive)?;

        archive.set_string(DOCUMENT_PART, document.body().to_xml());
        debug!(
            "Wrote {} with {} body elements",
            DOCUMENT_PART,
            document.body_element_count()
        );

        let numbering = document.numbering();
        let has_numbering = !numbering.is_empty() || archive.contains(NUMBERING_PART);
        if has_numbering {
            archive.set_string(NUMBERING_PART, numbering.to_xml());
            debug!(
                "Wrote {} with {} definitions and {} instances",
                NUMBERING_PART,
                numbering.abstract_nums().count(),
                numbering.nums().count()
            );
            self.ensure_numbering_relationship();
        }

        if self.relationships_changed {
            archive.set_string(DOCUMENT_RELS_PART, self.relationships.to_xml());
        }

        self.update_content_types(&mut archive, has_numbering)?;

        Ok(archive)
    }

    fn init_from_archive(&mut self, archive: &OoxmlArchive) -> Result<()> {
        self.relationships = match archive.document_rels_xml() {
            Some(xml) => Relationships::parse(xml)?,
            None => {
                // A package without document relationships still needs the file
                self.relationships_changed = true;
                Relationships::new()
            }
        };
        Ok(())
    }

    fn ensure_numbering_relationship(&mut self) {
        if self
            .relationships
            .find_by_type(Relationships::TYPE_NUMBERING)
            .is_none()
        {
            let id = self.relationships.add(
                "numbering.xml".to_string(),
                Relationships::TYPE_NUMBERING.to_string(),
            );
            debug!("Added numbering relationship {}", id);
            self.relationships_changed = true;
        }
    }

    /// Update [Content_Types].xml for the numbering part and the main part type
    fn update_content_types(&self, archive: &mut OoxmlArchive, has_numbering: bool) -> Result<()> {
        if let Some(content_types) = archive.get_string(CONTENT_TYPES_PART)? {
            let mut updated = content_types.replace(TEMPLATE_MAIN_TYPE, DOCUMENT_MAIN_TYPE);

            let numbering_part = format!("PartName=\"/{}\"", NUMBERING_PART);
            if has_numbering && !updated.contains(&numbering_part) {
                updated = updated.replace(
                    "</Types>",
                    &format!(
                        "  <Override {} ContentType=\"{}\"/>\n</Types>",
                        numbering_part, NUMBERING_TYPE
                    ),
                );
            }

            if updated != content_types {
                archive.set_string(CONTENT_TYPES_PART, updated);
            }
        }
        Ok(())
    }
}
