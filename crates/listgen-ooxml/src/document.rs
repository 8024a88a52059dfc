//! Document body model (word/document.xml)
//!
//! Body-level paragraphs are parsed into [`Paragraph`] values. Everything else
//! at body level (tables, section properties, content controls, bookmarks) is
//! kept as raw markup so it can be written back untouched.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::{capture_element, element_name, escape_xml, get_attr, get_attr_u32};

/// Root element used when no usable root tag was read from the source part
const DEFAULT_DOCUMENT_ROOT: &str = concat!(
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
);

/// A parsed Word document body
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Opening `w:document` tag with its namespace declarations
    root_tag: Option<String>,
    /// Body blocks in document order
    pub blocks: Vec<Block>,
}

/// Body-level elements
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table, kept verbatim
    Table(RawElement),
    /// The final section properties (page setup, header/footer references)
    SectionProperties(RawElement),
    /// Any other body-level element, kept verbatim
    Other(RawElement),
}

/// Verbatim markup of an element that is not modelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    /// Local element name (e.g. `tbl`)
    pub name: String,
    /// Complete element markup
    pub xml: String,
}

/// A paragraph with its style, list binding and text runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    /// Style ID (references styles.xml)
    pub style_id: Option<String>,
    /// Numbering binding (for list items)
    pub numbering: Option<NumberingRef>,
    /// Text runs
    pub runs: Vec<Run>,
}

/// A text run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// The text content
    pub text: String,
}

/// Reference to a numbering instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberingRef {
    /// Numbering instance ID (`w:num/@w:numId`)
    pub num_id: u32,
    /// Indent level (0-based)
    pub ilvl: u32,
}

impl Block {
    fn from_raw(name: &[u8], xml: String) -> Self {
        let raw = RawElement {
            name: String::from_utf8_lossy(name).into_owned(),
            xml,
        };
        match name {
            b"tbl" => Block::Table(raw),
            b"sectPr" => Block::SectionProperties(raw),
            _ => Block::Other(raw),
        }
    }

    /// The paragraph, if this block is one
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this block carries the section properties
    pub fn is_section_properties(&self) -> bool {
        matches!(self, Block::SectionProperties(_))
    }

    fn write_xml(&self, out: &mut String) {
        match self {
            Block::Paragraph(p) => p.write_xml(out),
            Block::Table(raw) | Block::SectionProperties(raw) | Block::Other(raw) => {
                out.push_str(&raw.xml);
                out.push('\n');
            }
        }
    }
}

impl Paragraph {
    /// Create an empty paragraph with the default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paragraph style
    pub fn set_style(&mut self, style_id: impl Into<String>) {
        self.style_id = Some(style_id.into());
    }

    /// Bind the paragraph to a numbering instance at the given level
    pub fn set_numbering(&mut self, num_id: u32, ilvl: u32) {
        self.numbering = Some(NumberingRef { num_id, ilvl });
    }

    /// Append a text run
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.runs.push(Run { text: text.into() });
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Indent level, if the paragraph is a list item
    pub fn ilvl(&self) -> Option<u32> {
        self.numbering.map(|n| n.ilvl)
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:p>\n");

        if self.style_id.is_some() || self.numbering.is_some() {
            out.push_str("<w:pPr>\n");
            if let Some(ref style) = self.style_id {
                out.push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", escape_xml(style)));
            }
            if let Some(numbering) = self.numbering {
                out.push_str("<w:numPr>\n");
                out.push_str(&format!("<w:ilvl w:val=\"{}\"/>\n", numbering.ilvl));
                out.push_str(&format!("<w:numId w:val=\"{}\"/>\n", numbering.num_id));
                out.push_str("</w:numPr>\n");
            }
            out.push_str("</w:pPr>\n");
        }

        for run in &self.runs {
            out.push_str("<w:r>");
            out.push_str(&format!(
                "<w:t xml:space=\"preserve\">{}</w:t>",
                escape_xml(&run.text)
            ));
            out.push_str("</w:r>\n");
        }

        out.push_str("</w:p>\n");
    }

    fn apply_property(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            b"pStyle" => {
                if let Some(style) = get_attr(e, b"w:val") {
                    self.style_id = Some(style);
                }
            }
            b"numId" => {
                if let Some(num_id) = get_attr_u32(e, b"w:val") {
                    let ilvl = self.numbering.map(|n| n.ilvl).unwrap_or(0);
                    self.numbering = Some(NumberingRef { num_id, ilvl });
                }
            }
            b"ilvl" => {
                if let Some(ilvl) = get_attr_u32(e, b"w:val") {
                    let num_id = self.numbering.map(|n| n.num_id).unwrap_or(0);
                    self.numbering = Some(NumberingRef { num_id, ilvl });
                }
            }
            _ => {}
        }
    }
}

impl Document {
    /// Create an empty body
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document body from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Don't trim text - preserve whitespace in runs
        reader.config_mut().trim_text(false);

        let mut root_tag = None;
        let mut blocks = Vec::new();
        let mut buf = Vec::new();

        let mut in_body = false;
        let mut current_para: Option<Paragraph> = None;
        let mut current_run: Option<Run> = None;
        let mut in_text_element = false;

        loop {
            let start = reader.buffer_position() as usize;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"document" if root_tag.is_none() && !in_body => {
                            let end = reader.buffer_position() as usize;
                            let tag = String::from_utf8_lossy(&xml[start..end]);
                            root_tag = Some(tag.trim().to_string());
                        }
                        b"body" if !in_body => in_body = true,
                        b"p" if in_body && current_para.is_none() => {
                            current_para = Some(Paragraph::new());
                        }
                        other if in_body && current_para.is_none() => {
                            let raw = capture_element(&mut reader, xml, start, e, false)?;
                            blocks.push(Block::from_raw(other, raw));
                        }
                        b"r" if current_para.is_some() => {
                            current_run = Some(Run::default());
                        }
                        b"t" if current_run.is_some() => in_text_element = true,
                        _ => {
                            if let Some(ref mut para) = current_para {
                                para.apply_property(e);
                            }
                        }
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"p" if in_body && current_para.is_none() => {
                            blocks.push(Block::Paragraph(Paragraph::new()));
                        }
                        other if in_body && current_para.is_none() => {
                            let raw = capture_element(&mut reader, xml, start, e, true)?;
                            blocks.push(Block::from_raw(other, raw));
                        }
                        b"tab" if current_run.is_some() => {
                            if let Some(ref mut run) = current_run {
                                run.text.push('\t');
                            }
                        }
                        _ => {
                            if let Some(ref mut para) = current_para {
                                para.apply_property(e);
                            }
                        }
                    }
                }
                Ok(Event::Text(ref t)) if in_text_element => {
                    let text = t
                        .unescape()
                        .map_err(|e| OoxmlError::InvalidStructure(e.to_string()))?;
                    if let Some(ref mut run) = current_run {
                        run.text.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"t" => in_text_element = false,
                    b"r" => {
                        if let (Some(run), Some(para)) = (current_run.take(), current_para.as_mut())
                        {
                            if !run.text.is_empty() {
                                para.runs.push(run);
                            }
                        }
                    }
                    b"p" => {
                        if let Some(para) = current_para.take() {
                            blocks.push(Block::Paragraph(para));
                        }
                    }
                    b"body" if current_para.is_none() => in_body = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        if root_tag.is_none() {
            return Err(OoxmlError::InvalidStructure(
                "word/document.xml has no w:document root".to_string(),
            ));
        }

        Ok(Self { root_tag, blocks })
    }

    /// Iterate over body-level paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    /// Number of body elements
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the body has no elements
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Remove the body element at `index`
    pub fn remove(&mut self, index: usize) -> Option<Block> {
        if index < self.blocks.len() {
            Some(self.blocks.remove(index))
        } else {
            None
        }
    }

    /// The trailing section properties, if present
    pub fn section_properties(&self) -> Option<&RawElement> {
        self.blocks.iter().rev().find_map(|b| match b {
            Block::SectionProperties(raw) => Some(raw),
            _ => None,
        })
    }

    /// Append a paragraph, keeping the section properties last
    pub fn push_paragraph(&mut self, paragraph: Paragraph) -> &mut Paragraph {
        let index = match self.blocks.last() {
            Some(Block::SectionProperties(_)) => self.blocks.len() - 1,
            _ => self.blocks.len(),
        };
        self.blocks.insert(index, Block::Paragraph(paragraph));
        match &mut self.blocks[index] {
            Block::Paragraph(p) => p,
            _ => unreachable!("a paragraph was inserted at this index"),
        }
    }

    /// Serialize the body back to a complete document.xml
    pub fn to_xml(&self) -> String {
        let root = self
            .root_tag
            .as_deref()
            .filter(|tag| tag.contains("xmlns:w="))
            .unwrap_or(DEFAULT_DOCUMENT_ROOT);

        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(root);
        out.push('\n');
        out.push_str("<w:body>\n");

        for block in &self.blocks {
            block.write_xml(&mut out);
        }

        out.push_str("</w:body>\n");
        out.push_str(&format!("</{}>", element_name(root)));
        out
    }
}
