//! Numbering definitions (word/numbering.xml)
//!
//! The numbering part holds two tables:
//!
//! - `w:abstractNum`: reusable multi-level list formats. A level may bind
//!   itself to a paragraph style through `w:pStyle`.
//! - `w:num`: concrete instances pointing at an abstract definition. An
//!   instance may override the start value of individual levels, which is
//!   how a new list restarts its counter at 1.
//!
//! Abstract definitions and template instances are kept as raw markup and
//! written back verbatim; instances created at runtime are serialized from
//! the model.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::{capture_element, element_name, get_attr, get_attr_u32, open_tag};

const DEFAULT_NUMBERING_ROOT: &str =
    r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#;

/// The numbering table of a document
#[derive(Debug, Clone, Default)]
pub struct Numbering {
    /// Opening `w:numbering` tag with its namespace declarations
    root_tag: Option<String>,
    /// Picture bullet definitions (must precede abstract definitions)
    pic_bullets: Vec<String>,
    /// Abstract definitions in definition order
    abstract_nums: Vec<AbstractNum>,
    /// Numbering instances in definition order
    nums: Vec<Num>,
    /// Trailing elements such as `w:numIdMacAtCleanup`
    trailer: Vec<String>,
}

/// Abstract numbering definition
#[derive(Debug, Clone)]
pub struct AbstractNum {
    /// Abstract numbering ID
    pub id: u32,
    /// Optional definition name (`w:name`)
    pub name: Option<String>,
    /// Level definitions (0-8)
    pub levels: Vec<Level>,
    /// Original markup
    xml: String,
}

/// A level inside an abstract numbering definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Level {
    /// Level index (0-8)
    pub ilvl: u32,
    /// Start value
    pub start: Option<u32>,
    /// Number format (decimal, bullet, lowerLetter, ...)
    pub num_fmt: Option<String>,
    /// Level text (e.g. "%1.")
    pub level_text: Option<String>,
    /// Paragraph style bound to this level
    pub paragraph_style: Option<String>,
}

/// Concrete numbering instance
#[derive(Debug, Clone)]
pub struct Num {
    /// Numbering ID referenced by paragraphs
    pub num_id: u32,
    /// Abstract definition this instance uses
    pub abstract_num_id: u32,
    /// Per-level start overrides
    pub overrides: Vec<LevelOverride>,
    /// Original markup, if read from a package and not modified since
    xml: Option<String>,
}

/// A level override inside a numbering instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOverride {
    /// Level index
    pub ilvl: u32,
    /// Value the level restarts at
    pub start_override: Option<u32>,
}

impl Numbering {
    /// Create an empty numbering table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse numbering definitions from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut numbering = Numbering::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let start = reader.buffer_position() as usize;
            let (e, empty) = match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => (e, false),
                Ok(Event::Empty(e)) => (e, true),
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => continue,
            };

            if numbering.root_tag.is_none() {
                if e.local_name().as_ref() != b"numbering" {
                    return Err(OoxmlError::InvalidStructure(
                        "word/numbering.xml has no w:numbering root".to_string(),
                    ));
                }
                let end = reader.buffer_position() as usize;
                let tag = String::from_utf8_lossy(&xml[start..end]);
                numbering.root_tag = Some(tag.trim().to_string());
                continue;
            }

            let raw = capture_element(&mut reader, xml, start, &e, empty)?;
            match e.local_name().as_ref() {
                b"abstractNum" => numbering.abstract_nums.push(AbstractNum::parse(raw)?),
                b"num" => numbering.nums.push(Num::parse(raw)?),
                b"numPicBullet" => numbering.pic_bullets.push(raw),
                _ => numbering.trailer.push(raw),
            }
        }

        if numbering.root_tag.is_none() {
            return Err(OoxmlError::InvalidStructure(
                "word/numbering.xml is empty".to_string(),
            ));
        }

        Ok(numbering)
    }

    /// Whether the table has neither definitions nor instances
    pub fn is_empty(&self) -> bool {
        self.abstract_nums.is_empty() && self.nums.is_empty()
    }

    /// All abstract numbering definitions in definition order
    pub fn abstract_nums(&self) -> impl Iterator<Item = &AbstractNum> {
        self.abstract_nums.iter()
    }

    /// All numbering instances in definition order
    pub fn nums(&self) -> impl Iterator<Item = &Num> {
        self.nums.iter()
    }

    /// Get an abstract definition by ID
    pub fn abstract_num(&self, id: u32) -> Option<&AbstractNum> {
        self.abstract_nums.iter().find(|a| a.id == id)
    }

    /// Get a numbering instance by ID
    pub fn num(&self, num_id: u32) -> Option<&Num> {
        self.nums.iter().find(|n| n.num_id == num_id)
    }

    /// Get a mutable numbering instance by ID
    pub fn num_mut(&mut self, num_id: u32) -> Option<&mut Num> {
        self.nums.iter_mut().find(|n| n.num_id == num_id)
    }

    /// Add a new numbering instance for an abstract definition
    ///
    /// Returns the new `numId`, one past the highest ID in use.
    pub fn add_num(&mut self, abstract_num_id: u32) -> Result<u32> {
        if self.abstract_num(abstract_num_id).is_none() {
            return Err(OoxmlError::NumberingNotFound(abstract_num_id));
        }

        let num_id = self.nums.iter().map(|n| n.num_id).max().unwrap_or(0) + 1;
        self.nums.push(Num {
            num_id,
            abstract_num_id,
            overrides: Vec::new(),
            xml: None,
        });
        Ok(num_id)
    }

    /// Add a numbering instance whose level 0 restarts at 1
    pub fn add_restarting_num(&mut self, abstract_num_id: u32) -> Result<u32> {
        let num_id = self.add_num(abstract_num_id)?;
        if let Some(num) = self.num_mut(num_id) {
            num.set_start_override(0, 1);
        }
        Ok(num_id)
    }

    /// Serialize the numbering table to XML
    pub fn to_xml(&self) -> String {
        let root = self
            .root_tag
            .as_deref()
            .map(open_tag)
            .unwrap_or_else(|| DEFAULT_NUMBERING_ROOT.to_string());

        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&root);
        xml.push('\n');

        // Schema order: picture bullets, abstract definitions, instances
        for raw in &self.pic_bullets {
            xml.push_str(raw);
            xml.push('\n');
        }
        for abstract_num in &self.abstract_nums {
            xml.push_str(&abstract_num.xml);
            xml.push('\n');
        }
        for num in &self.nums {
            xml.push_str(&num.to_xml());
            xml.push('\n');
        }
        for raw in &self.trailer {
            xml.push_str(raw);
            xml.push('\n');
        }

        xml.push_str(&format!("</{}>", element_name(&root)));
        xml
    }
}

impl AbstractNum {
    fn parse(xml: String) -> Result<Self> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.config_mut().trim_text(true);

        let mut id = None;
        let mut name = None;
        let mut levels = Vec::new();
        let mut current_level: Option<Level> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"abstractNum" => id = get_attr_u32(e, b"w:abstractNumId"),
                        b"name" if current_level.is_none() => name = get_attr(e, b"w:val"),
                        b"lvl" => {
                            current_level = Some(Level {
                                ilvl: get_attr_u32(e, b"w:ilvl").unwrap_or(0),
                                ..Level::default()
                            });
                        }
                        b"start" => {
                            if let Some(ref mut level) = current_level {
                                level.start = get_attr_u32(e, b"w:val");
                            }
                        }
                        b"numFmt" => {
                            if let Some(ref mut level) = current_level {
                                level.num_fmt = get_attr(e, b"w:val");
                            }
                        }
                        b"lvlText" => {
                            if let Some(ref mut level) = current_level {
                                level.level_text = get_attr(e, b"w:val");
                            }
                        }
                        b"pStyle" => {
                            if let Some(ref mut level) = current_level {
                                level.paragraph_style = get_attr(e, b"w:val");
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"lvl" {
                        if let Some(level) = current_level.take() {
                            levels.push(level);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        let id = id.ok_or_else(|| {
            OoxmlError::InvalidStructure("w:abstractNum without w:abstractNumId".to_string())
        })?;

        Ok(Self {
            id,
            name,
            levels,
            xml,
        })
    }

    /// Get the definition of a level
    pub fn level(&self, ilvl: u32) -> Option<&Level> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }

    /// Paragraph style bound to the first indent level
    pub fn paragraph_style(&self) -> Option<&str> {
        self.level(0)
            .and_then(|l| l.paragraph_style.as_deref())
            .filter(|s| !s.is_empty())
    }
}

impl Num {
    fn parse(xml: String) -> Result<Self> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.config_mut().trim_text(true);

        let mut num_id = None;
        let mut abstract_num_id = None;
        let mut overrides = Vec::new();
        let mut current_override: Option<LevelOverride> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let (e, empty) = match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => (e, false),
                Ok(Event::Empty(e)) => (e, true),
                Ok(Event::End(ref e)) if e.local_name().as_ref() == b"lvlOverride" => {
                    if let Some(level_override) = current_override.take() {
                        overrides.push(level_override);
                    }
                    continue;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => continue,
            };

            match e.local_name().as_ref() {
                b"num" => num_id = get_attr_u32(&e, b"w:numId"),
                b"abstractNumId" => abstract_num_id = get_attr_u32(&e, b"w:val"),
                b"lvlOverride" => {
                    let level_override = LevelOverride {
                        ilvl: get_attr_u32(&e, b"w:ilvl").unwrap_or(0),
                        start_override: None,
                    };
                    if empty {
                        overrides.push(level_override);
                    } else {
                        current_override = Some(level_override);
                    }
                }
                b"startOverride" => {
                    if let Some(ref mut level_override) = current_override {
                        level_override.start_override = get_attr_u32(&e, b"w:val");
                    }
                }
                _ => {}
            }
        }

        match (num_id, abstract_num_id) {
            (Some(num_id), Some(abstract_num_id)) => Ok(Self {
                num_id,
                abstract_num_id,
                overrides,
                xml: Some(xml),
            }),
            _ => Err(OoxmlError::InvalidStructure(
                "w:num without w:numId or w:abstractNumId".to_string(),
            )),
        }
    }

    /// Start override configured for a level
    pub fn start_override(&self, ilvl: u32) -> Option<u32> {
        self.overrides
            .iter()
            .find(|o| o.ilvl == ilvl)
            .and_then(|o| o.start_override)
    }

    /// Force a level to restart at `start`
    pub fn set_start_override(&mut self, ilvl: u32, start: u32) {
        match self.overrides.iter_mut().find(|o| o.ilvl == ilvl) {
            Some(existing) => existing.start_override = Some(start),
            None => self.overrides.push(LevelOverride {
                ilvl,
                start_override: Some(start),
            }),
        }
        self.xml = None;
    }

    fn to_xml(&self) -> String {
        if let Some(ref raw) = self.xml {
            return raw.clone();
        }

        let mut xml = format!("<w:num w:numId=\"{}\">", self.num_id);
        xml.push_str(&format!(
            "<w:abstractNumId w:val=\"{}\"/>",
            self.abstract_num_id
        ));
        for level_override in &self.overrides {
            xml.push_str(&format!("<w:lvlOverride w:ilvl=\"{}\">", level_override.ilvl));
            if let Some(start) = level_override.start_override {
                xml.push_str(&format!("<w:startOverride w:val=\"{}\"/>", start));
            }
            xml.push_str("</w:lvlOverride>");
        }
        xml.push_str("</w:num>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:name w:val="Numbered"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="decimal"/>
      <w:pStyle w:val="ListNumber"/>
      <w:lvlText w:val="%1."/>
    </w:lvl>
    <w:lvl w:ilvl="1">
      <w:start w:val="1"/>
      <w:numFmt w:val="lowerLetter"/>
      <w:lvlText w:val="%2)"/>
    </w:lvl>
  </w:abstractNum>
  <w:abstractNum w:abstractNumId="4">
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="bullet"/>
      <w:lvlText w:val="-"/>
    </w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="4"/></w:num>
  <w:numIdMacAtCleanup w:val="1"/>
</w:numbering>"#;

    #[test]
    fn test_parse_numbering() {
        let numbering = Numbering::parse(SAMPLE.as_bytes()).unwrap();

        let ids: Vec<_> = numbering.abstract_nums().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 4]);
        assert_eq!(numbering.nums().count(), 2);

        let numbered = numbering.abstract_num(0).unwrap();
        assert_eq!(numbered.name.as_deref(), Some("Numbered"));
        assert_eq!(numbered.levels.len(), 2);
        assert_eq!(numbered.paragraph_style(), Some("ListNumber"));
        assert_eq!(numbered.level(1).unwrap().num_fmt.as_deref(), Some("lowerLetter"));
        assert_eq!(numbered.level(0).unwrap().level_text.as_deref(), Some("%1."));

        assert!(numbering.abstract_num(4).unwrap().paragraph_style().is_none());
        assert_eq!(numbering.num(2).unwrap().abstract_num_id, 4);
    }

    #[test]
    fn test_style_on_deeper_level_is_not_a_binding() {
        let xml = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="9">
    <w:lvl w:ilvl="0"><w:numFmt w:val="decimal"/></w:lvl>
    <w:lvl w:ilvl="1"><w:pStyle w:val="ListNumber2"/></w:lvl>
  </w:abstractNum>
</w:numbering>"#;
        let numbering = Numbering::parse(xml.as_bytes()).unwrap();
        assert!(numbering.abstract_num(9).unwrap().paragraph_style().is_none());
    }

    #[test]
    fn test_add_restarting_num() {
        let mut numbering = Numbering::parse(SAMPLE.as_bytes()).unwrap();

        let first = numbering.add_restarting_num(0).unwrap();
        let second = numbering.add_restarting_num(0).unwrap();
        assert_eq!(first, 3);
        assert_eq!(second, 4);

        let num = numbering.num(first).unwrap();
        assert_eq!(num.abstract_num_id, 0);
        assert_eq!(num.start_override(0), Some(1));
    }

    #[test]
    fn test_add_num_for_unknown_definition() {
        let mut numbering = Numbering::new();
        let result = numbering.add_num(12);
        assert!(matches!(result, Err(OoxmlError::NumberingNotFound(12))));
    }

    #[test]
    fn test_to_xml_keeps_schema_order() {
        let mut numbering = Numbering::parse(SAMPLE.as_bytes()).unwrap();
        numbering.add_restarting_num(4).unwrap();

        let xml = numbering.to_xml();
        let last_abstract = xml.rfind("<w:abstractNum ").unwrap();
        let first_num = xml.find("<w:num ").unwrap();
        let cleanup = xml.find("<w:numIdMacAtCleanup").unwrap();
        assert!(last_abstract < first_num);
        assert!(first_num < cleanup);
        assert!(xml.contains(
            r#"<w:num w:numId="3"><w:abstractNumId w:val="4"/><w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride></w:num>"#
        ));
        assert!(xml.ends_with("</w:numbering>"));

        let reparsed = Numbering::parse(xml.as_bytes()).unwrap();
        assert_eq!(reparsed.nums().count(), 3);
        assert_eq!(reparsed.num(3).unwrap().start_override(0), Some(1));
        assert_eq!(
            reparsed.abstract_num(0).unwrap().levels,
            numbering.abstract_num(0).unwrap().levels
        );
    }

    #[test]
    fn test_root_after_declaration_is_closed() {
        let xml = "<?xml version=\"1.0\"?>\n<w:numbering xmlns:w=\"x\">\n  <w:abstractNum w:abstractNumId=\"0\"><w:lvl w:ilvl=\"0\"/></w:abstractNum>\n</w:numbering>";
        let numbering = Numbering::parse(xml.as_bytes()).unwrap();

        let written = numbering.to_xml();
        assert!(written.contains("\n<w:numbering xmlns:w=\"x\">\n"));
        assert!(written.ends_with("</w:numbering>"));

        let reparsed = Numbering::parse(written.as_bytes()).unwrap();
        assert_eq!(reparsed.abstract_nums().count(), 1);
        assert!(reparsed.to_xml().ends_with("</w:numbering>"));
    }

    #[test]
    fn test_empty_root() {
        let numbering = Numbering::parse(
            br#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#,
        )
        .unwrap();
        assert!(numbering.is_empty());
        assert!(numbering.to_xml().contains("<w:numbering xmlns:w="));
    }

    #[test]
    fn test_wrong_root_is_invalid() {
        let result = Numbering::parse(b"<w:styles/>");
        assert!(matches!(result, Err(OoxmlError::InvalidStructure(_))));
    }
}
