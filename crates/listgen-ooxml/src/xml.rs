//! Small helpers shared by the part parsers

use quick_xml::events::BytesStart;
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::Result;

/// Get an attribute value by its qualified name (e.g. `w:val`)
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Get a numeric attribute value
pub(crate) fn get_attr_u32(e: &BytesStart, name: &[u8]) -> Option<u32> {
    get_attr(e, name).and_then(|v| v.trim().parse().ok())
}

/// Capture the markup of an element whose start tag has just been read.
///
/// `start` is the reader position before the tag was read. For a non-empty
/// element the reader is advanced past the matching end tag.
pub(crate) fn capture_element(
    reader: &mut Reader<&[u8]>,
    xml: &[u8],
    start: usize,
    tag: &BytesStart,
    empty: bool,
) -> Result<String> {
    if !empty {
        let name = tag.name().as_ref().to_vec();
        let mut skip = Vec::new();
        reader.read_to_end_into(QName(&name), &mut skip)?;
    }
    let end = reader.buffer_position() as usize;
    Ok(String::from_utf8_lossy(&xml[start..end]).into_owned())
}

/// Qualified element name of a start tag (`<w:document ...>` -> `w:document`)
pub(crate) fn element_name(tag: &str) -> &str {
    let inner = tag.trim_start().trim_start_matches('<');
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Turn a captured root tag into an opening tag (`<x/>` -> `<x>`)
pub(crate) fn open_tag(tag: &str) -> String {
    match tag.trim_end().strip_suffix("/>") {
        Some(head) => format!("{}>", head.trim_end()),
        None => tag.to_string(),
    }
}

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("'ListNumber'"), "&apos;ListNumber&apos;");
    }

    #[test]
    fn test_element_name() {
        assert_eq!(element_name(r#"<w:document xmlns:w="x">"#), "w:document");
        assert_eq!(element_name("<w:numbering/>"), "w:numbering");
        assert_eq!(element_name("<body>"), "body");
        assert_eq!(element_name("\n  <w:numbering xmlns:w=\"x\">"), "w:numbering");
    }

    #[test]
    fn test_open_tag() {
        assert_eq!(open_tag(r#"<w:numbering xmlns:w="x"/>"#), r#"<w:numbering xmlns:w="x">"#);
        assert_eq!(open_tag("<w:numbering>"), "<w:numbering>");
    }

    #[test]
    fn test_capture_element() {
        let xml = br#"<root><w:tbl><w:tr><w:tc/></w:tr></w:tbl><w:sectPr/></root>"#;
        let mut reader = Reader::from_reader(&xml[..]);
        let mut buf = Vec::new();
        let mut captured = Vec::new();

        loop {
            let start = reader.buffer_position() as usize;
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(ref e) if e.local_name().as_ref() != b"root" => {
                    captured.push(capture_element(&mut reader, xml, start, e, false).unwrap());
                }
                Event::Empty(ref e) => {
                    captured.push(capture_element(&mut reader, xml, start, e, true).unwrap());
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        assert_eq!(
            captured,
            vec![
                "<w:tbl><w:tr><w:tc/></w:tr></w:tbl>".to_string(),
                "<w:sectPr/>".to_string()
            ]
        );
    }
}
