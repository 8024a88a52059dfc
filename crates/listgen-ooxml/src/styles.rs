//! Style definitions parsing (word/styles.xml)
//!
//! Only what the report needs is read: style ID, display name and type.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::get_attr;

/// Collection of styles from a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Style type
    pub style_type: StyleType,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current_style: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"style" => {
                            let style_type = get_attr(e, b"w:type").map(|t| match t.as_str() {
                                "character" => StyleType::Character,
                                "table" => StyleType::Table,
                                "numbering" => StyleType::Numbering,
                                _ => StyleType::Paragraph,
                            });

                            // A self-closing <w:style/> never sees an end tag
                            if let Some(previous) = current_style.take() {
                                stylesheet.insert(previous);
                            }
                            current_style = Some(StyleBuilder {
                                id: get_attr(e, b"w:styleId"),
                                style_type,
                                ..StyleBuilder::default()
                            });
                        }
                        b"name" => {
                            if let Some(ref mut builder) = current_style {
                                builder.name = get_attr(e, b"w:val");
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(builder) = current_style.take() {
                            stylesheet.insert(builder);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if let Some(builder) = current_style.take() {
            stylesheet.insert(builder);
        }

        Ok(stylesheet)
    }

    fn insert(&mut self, builder: StyleBuilder) {
        if let Some(style) = builder.build() {
            self.styles.insert(style.id.clone(), style);
        }
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Check if a style ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the stylesheet defines no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Display name of a style, falling back to the ID
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|s| s.name.as_str()).unwrap_or(id)
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: Option<StyleType>,
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            style_type: self.style_type.unwrap_or(StyleType::Paragraph),
        })
    }
}
