//! Template loading
//!
//! The report starts from a template whose body is emptied. Only the section
//! properties survive, because they carry the header and footer references
//! together with the page setup.

use listgen_ooxml::{Block, WordDocument};
use tracing::{debug, warn};

/// Load a template and strip its body
///
/// A template that cannot be read is not fatal: a warning is logged and the
/// report continues from a blank document, which has no styles and no
/// numbering, so no lists will be generated.
pub fn load_template(bytes: &[u8]) -> WordDocument {
    let mut document = match WordDocument::from_bytes(bytes) {
        Ok(document) => document,
        Err(e) => {
            warn!("Failed to load template, using a blank document: {}", e);
            WordDocument::new()
        }
    };

    let removed = strip_body(&mut document);
    debug!("Removed {} template body elements", removed);
    document
}

/// Remove every body element except the section properties
///
/// Elements are visited from the end of the body to the start so indices of
/// the elements still to visit do not shift. Returns the number removed.
pub fn strip_body(document: &mut WordDocument) -> usize {
    let mut removed = 0;

    for index in (0..document.body_element_count()).rev() {
        if let Some(Block::SectionProperties(_)) = document.body_element(index) {
            debug!("Keeping section properties at body index {}", index);
            continue;
        }

        if document.remove_body_element(index) {
            debug!("Removed body element {}", index);
            removed += 1;
        } else {
            debug!("Could not remove body element {}", index);
        }
    }

    removed
}
