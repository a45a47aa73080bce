//! Indented serialization of a [`Document`]

use super::document::{Document, NodeId, NodeKind};
use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use territory_common::{Error, Result};

/// Spaces per nesting level
pub const INDENT_WIDTH: usize = 4;

impl Document {
    /// Write the document with an XML declaration and indentation
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(out, b' ', INDENT_WIDTH);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
        if let Some(doctype) = &self.doctype {
            writer
                .write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))
                .map_err(write_error)?;
        }

        self.write_node(&mut writer, self.root())?;

        let mut out = writer.into_inner();
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    /// Serialize to a string
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Internal(format!("non UTF-8 output: {}", e)))
    }

    /// Serialize to a file, replacing it if present
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
            .map_err(|e| e.with_path(path))
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        match self.kind(id) {
            NodeKind::Element { name, attributes } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attributes {
                    let value = escape_attribute(value);
                    start.push_attribute((key.as_bytes(), value.as_bytes()));
                }

                let children = self.children(id);
                if children.is_empty() {
                    writer.write_event(Event::Empty(start)).map_err(write_error)?;
                } else {
                    writer.write_event(Event::Start(start)).map_err(write_error)?;
                    for &child in children {
                        self.write_node(writer, child)?;
                    }
                    writer
                        .write_event(Event::End(BytesEnd::new(name.as_str())))
                        .map_err(write_error)?;
                }
            }
            NodeKind::Text(raw) => {
                writer
                    .write_event(Event::Text(BytesText::from_escaped(raw.as_str())))
                    .map_err(write_error)?;
            }
            NodeKind::CData(text) => {
                writer
                    .write_event(Event::CData(BytesCData::new(text.as_str())))
                    .map_err(write_error)?;
            }
            NodeKind::Comment(text) => {
                writer
                    .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                    .map_err(write_error)?;
            }
        }
        Ok(())
    }
}

/// Markup escapes plus character references for whitespace that a reader
/// would otherwise normalize to a space
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

fn write_error(e: impl std::fmt::Display) -> Error {
    Error::xml(format!("write failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_declaration_and_indentation() {
        let mut doc = Document::new("map");
        let root = doc.root();
        let list = doc.append_element(root, "territory-type-list", Vec::new());
        doc.append_element(
            list,
            "territory-type",
            vec![("name".to_string(), "farms".to_string())],
        );

        let xml = doc.to_xml_string().unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <map>\n\
             \x20   <territory-type-list>\n\
             \x20       <territory-type name=\"farms\"/>\n\
             \x20   </territory-type-list>\n\
             </map>\n"
        );
    }

    #[test]
    fn test_attribute_values_escaped_on_write() {
        let mut doc = Document::new("t");
        let root = doc.root();
        doc.append_element(
            root,
            "zone",
            vec![("name".to_string(), "Tom & \"Jerry\"".to_string())],
        );

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains("name=\"Tom &amp; &quot;Jerry&quot;\""));

        let reparsed = Document::parse_str(&xml).unwrap();
        let zone = reparsed.find_child(reparsed.root(), "zone").unwrap();
        assert_eq!(reparsed.attr(zone, "name"), Some("Tom & \"Jerry\""));
    }

    #[test]
    fn test_attribute_whitespace_written_as_character_references() {
        let mut doc = Document::new("t");
        let root = doc.root();
        doc.append_element(
            root,
            "zone",
            vec![
                ("x".to_string(), "1\n".to_string()),
                ("name".to_string(), "a\tb\r".to_string()),
            ],
        );

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains(r#"<zone x="1&#10;" name="a&#9;b&#13;"/>"#));

        let reparsed = Document::parse_str(&xml).unwrap();
        let zone = reparsed.find_child(reparsed.root(), "zone").unwrap();
        assert_eq!(reparsed.attr(zone, "x"), Some("1\n"));
        assert_eq!(reparsed.attr(zone, "name"), Some("a\tb\r"));
    }

    #[test]
    fn test_text_comment_and_attribute_order_survive() {
        let source = r#"<map><!-- keep --><zone z="2" x="1" name="a"/><note>a &lt; b</note></map>"#;
        let doc = Document::parse_str(source).unwrap();
        let xml = doc.to_xml_string().unwrap();

        assert!(xml.contains("<!-- keep -->"));
        assert!(xml.contains(r#"<zone z="2" x="1" name="a"/>"#));
        assert!(xml.contains("<note>a &lt; b</note>"));
    }

    #[test]
    fn test_save_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("out.xml");
        Document::new("map").save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(content.contains("<map/>"));
    }
}
