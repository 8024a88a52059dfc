//! List building
//!
//! Every list gets its own numbering instance with a level 0 start override,
//! so it counts from 1 no matter how many lists of the same definition came
//! before. Sub-lists share their parent's instance and only change the
//! indent level.

use listgen_ooxml::WordDocument;
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::index::StyleIndex;

/// Prefix added for every level of sub-list
const SUB_LIST_PREFIX: &str = "Sub-";

/// Appends sample lists to a document
#[derive(Debug)]
pub struct ListBuilder<'a> {
    document: &'a mut WordDocument,
    index: &'a StyleIndex,
    config: &'a ReportConfig,
}

impl<'a> ListBuilder<'a> {
    /// Create a builder writing into `document`
    pub fn new(document: &'a mut WordDocument, index: &'a StyleIndex, config: &'a ReportConfig) -> Self {
        Self {
            document,
            index,
            config,
        }
    }

    /// Append a heading, a fresh list for `style` and a blank paragraph
    ///
    /// Returns the ID of the numbering instance created for the list.
    pub fn build_list(&mut self, list_index: usize, style: &str) -> Result<u32> {
        let abstract_num_id = self
            .index
            .get(style)
            .ok_or_else(|| ReportError::StyleNotFound(style.to_string()))?;

        self.document
            .create_paragraph()
            .add_run(format!("List {}: - {}", list_index, style));

        let num_id = self
            .document
            .numbering_mut()
            .add_restarting_num(abstract_num_id)?;
        debug!(
            "List {} for '{}' uses numbering instance {} of definition {}",
            list_index, style, num_id, abstract_num_id
        );

        for i in 1..=self.config.items_per_list {
            self.append_item(num_id, 0, style, format!("Item #{} using '{}' style.", i, style));
            if self.config.nested_sub_lists {
                self.build_sub_list(num_id, 1, style, SUB_LIST_PREFIX);
            }
        }

        self.document.create_paragraph();
        Ok(num_id)
    }

    /// Append a sub-list at `level` and, below each item, the next level down
    ///
    /// Nothing is appended once `level` passes the configured maximum.
    pub fn build_sub_list(&mut self, num_id: u32, level: u32, style: &str, prefix: &str) {
        if level > self.config.max_nesting_level {
            return;
        }

        let deeper_prefix = format!("{}{}", SUB_LIST_PREFIX, prefix);
        for i in 1..=self.config.items_per_list {
            self.append_item(
                num_id,
                level,
                style,
                format!("{}Item #{} using '{}' style.", prefix, i, style),
            );
            self.build_sub_list(num_id, level + 1, style, &deeper_prefix);
        }
    }

    fn append_item(&mut self, num_id: u32, ilvl: u32, style: &str, text: String) {
        let paragraph = self.document.create_paragraph();
        paragraph.set_style(style);
        paragraph.set_numbering(num_id, ilvl);
        paragraph.add_run(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_template;
    use listgen_ooxml::test_utils::create_numbering_template;

    fn setup(bindings: &[(u32, Option<&str>)]) -> (WordDocument, StyleIndex) {
        let document = load_template(&create_numbering_template(bindings));
        let index = StyleIndex::build(&document);
        (document, index)
    }

    fn texts(document: &WordDocument) -> Vec<String> {
        document.paragraphs().map(|p| p.text()).collect()
    }

    #[test]
    fn test_flat_list() {
        let (mut document, index) = setup(&[(1, Some("ListParagraph"))]);
        let config = ReportConfig {
            items_per_list: 5,
            ..ReportConfig::flat()
        };

        let num_id = ListBuilder::new(&mut document, &index, &config)
            .build_list(1, "ListParagraph")
            .unwrap();

        assert_eq!(
            texts(&document),
            vec![
                "List 1: - ListParagraph",
                "Item #1 using 'ListParagraph' style.",
                "Item #2 using 'ListParagraph' style.",
                "Item #3 using 'ListParagraph' style.",
                "Item #4 using 'ListParagraph' style.",
                "Item #5 using 'ListParagraph' style.",
                "",
            ]
        );

        let paragraphs: Vec<_> = document.paragraphs().collect();
        assert!(paragraphs[0].style_id.is_none());
        assert!(paragraphs[0].numbering.is_none());
        for item in &paragraphs[1..6] {
            assert_eq!(item.style_id.as_deref(), Some("ListParagraph"));
            assert_eq!(item.ilvl(), Some(0));
            assert_eq!(item.numbering.map(|n| n.num_id), Some(num_id));
        }
        assert!(paragraphs[6].numbering.is_none());
        assert!(paragraphs[6].runs.is_empty());
        assert!(document.body().blocks.last().unwrap().is_section_properties());
    }

    #[test]
    fn test_each_list_gets_restarting_instance() {
        let (mut document, index) = setup(&[(1, Some("ListNumber"))]);
        let config = ReportConfig::flat();
        let mut builder = ListBuilder::new(&mut document, &index, &config);

        let first = builder.build_list(1, "ListNumber").unwrap();
        let second = builder.build_list(2, "ListNumber").unwrap();
        assert_ne!(first, second);

        let numbering = document.numbering();
        for num_id in [first, second] {
            let num = numbering.num(num_id).unwrap();
            assert_eq!(num.abstract_num_id, 1);
            assert_eq!(num.start_override(0), Some(1));
        }
    }

    #[test]
    fn test_unknown_style_appends_nothing() {
        let (mut document, index) = setup(&[(1, Some("ListNumber"))]);
        let config = ReportConfig::flat();
        let before = document.body_element_count();
        let instances = document.numbering().nums().count();

        let result = ListBuilder::new(&mut document, &index, &config).build_list(1, "Missing");

        assert!(matches!(result, Err(ReportError::StyleNotFound(ref s)) if s == "Missing"));
        assert_eq!(document.body_element_count(), before);
        assert_eq!(document.numbering().nums().count(), instances);
    }

    #[test]
    fn test_sub_list_prefixes_and_levels() {
        let (mut document, index) = setup(&[(1, Some("ListNumber"))]);
        let config = ReportConfig {
            items_per_list: 1,
            pass_count: 1,
            nested_sub_lists: true,
            max_nesting_level: 3,
        };

        ListBuilder::new(&mut document, &index, &config)
            .build_list(1, "ListNumber")
            .unwrap();

        let items: Vec<_> = document
            .paragraphs()
            .filter_map(|p| p.ilvl().map(|ilvl| (ilvl, p.text())))
            .collect();
        assert_eq!(
            items,
            vec![
                (0, "Item #1 using 'ListNumber' style.".to_string()),
                (1, "Sub-Item #1 using 'ListNumber' style.".to_string()),
                (2, "Sub-Sub-Item #1 using 'ListNumber' style.".to_string()),
                (3, "Sub-Sub-Sub-Item #1 using 'ListNumber' style.".to_string()),
            ]
        );
    }

    #[test]
    fn test_sub_list_beyond_max_level_is_empty() {
        let (mut document, index) = setup(&[(1, Some("ListNumber"))]);
        let config = ReportConfig::nested();
        let before = document.body_element_count();

        ListBuilder::new(&mut document, &index, &config).build_sub_list(1, 4, "ListNumber", "Sub-");
        assert_eq!(document.body_element_count(), before);
    }
}
