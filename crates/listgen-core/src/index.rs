//! Numbering style index
//!
//! Maps paragraph style IDs to the abstract numbering definition whose first
//! level binds them. The map keeps discovery order so reports are
//! reproducible; a style bound by several definitions maps to the last one
//! but keeps the position where it was first seen.

use indexmap::IndexMap;
use listgen_ooxml::WordDocument;
use tracing::{debug, warn};

/// Style ID -> abstract numbering ID, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleIndex {
    styles: IndexMap<String, u32>,
}

impl StyleIndex {
    /// Build the index from a document's numbering table
    pub fn build(document: &WordDocument) -> Self {
        let mut styles = IndexMap::new();

        for definition in document.numbering().abstract_nums() {
            let Some(style) = definition.paragraph_style() else {
                debug!(
                    "Numbering definition {} has no level 0 style binding",
                    definition.id
                );
                continue;
            };

            if !document.styles().is_empty() && !document.styles().contains(style) {
                warn!(
                    "Numbering definition {} binds style '{}' which the stylesheet does not define",
                    definition.id, style
                );
            }

            if let Some(previous) = styles.insert(style.to_string(), definition.id) {
                debug!(
                    "Style '{}' rebound from definition {} to {}",
                    style, previous, definition.id
                );
            } else {
                debug!("Style '{}' uses numbering definition {}", style, definition.id);
            }
        }

        Self { styles }
    }

    /// Abstract numbering ID bound to a style
    pub fn get(&self, style: &str) -> Option<u32> {
        self.styles.get(style).copied()
    }

    /// Style IDs in discovery order
    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// `(style, abstract numbering ID)` pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.styles.iter().map(|(style, id)| (style.as_str(), *id))
    }

    /// Number of indexed styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no style is bound to a numbering definition
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listgen_ooxml::test_utils::create_numbering_template;

    fn index_for(bindings: &[(u32, Option<&str>)]) -> StyleIndex {
        let document = WordDocument::from_bytes(&create_numbering_template(bindings)).unwrap();
        StyleIndex::build(&document)
    }

    #[test]
    fn test_discovery_order() {
        let index = index_for(&[(4, Some("B")), (1, Some("A")), (2, Some("C"))]);
        let styles: Vec<_> = index.styles().collect();
        assert_eq!(styles, vec!["B", "A", "C"]);
        assert_eq!(index.get("A"), Some(1));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_unbound_definition_is_skipped() {
        let index = index_for(&[(1, Some("ListNumber")), (2, None)]);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![("ListNumber", 1)]);
    }

    #[test]
    fn test_duplicate_style_last_wins() {
        let index = index_for(&[(1, Some("A")), (2, Some("B")), (3, Some("A"))]);
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![("A", 3), ("B", 2)]);
    }

    #[test]
    fn test_no_numbering_is_empty() {
        let index = index_for(&[]);
        assert!(index.is_empty());
        assert_eq!(index.get("ListNumber"), None);
    }

    #[test]
    fn test_build_is_idempotent() {
        let document = WordDocument::from_bytes(&create_numbering_template(&[
            (1, Some("ListNumber")),
            (2, Some("ListBullet")),
        ]))
        .unwrap();
        assert_eq!(StyleIndex::build(&document), StyleIndex::build(&document));
    }
}
