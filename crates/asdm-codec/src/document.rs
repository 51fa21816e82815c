//! Reading and writing table and manifest documents.
//!
//! Documents are small enough to load whole, so reading builds an
//! [`XmlElement`] tree and row parsers pull typed values out of it by element
//! name. Writing goes through [`XmlDocWriter`], a thin layer over
//! `quick_xml::Writer` with two-space indentation.

use asdm_model::{Entity, EntityId};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{CodecError, Result};
use crate::xml::{XmlValue, parse_array, parse_matrix};

/// An element with its attributes, child elements and concatenated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse_document(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event().map_err(CodecError::xml)? {
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => attach(&mut stack, &mut root, element_from_start(&e)?)?,
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CodecError::xml("unbalanced end tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&unescape(utf8(&t)?)?);
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(utf8(&c)?);
                    }
                }
                Event::GeneralRef(r) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push(resolve_reference(utf8(&r)?)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(CodecError::xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| CodecError::xml("document has no root element"))
    }

    /// Element text with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Element text exactly as it appeared in the document.
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attribute(&self, name: &str) -> Result<&str> {
        self.attribute(name)
            .ok_or_else(|| CodecError::missing_attribute(&self.name, name))
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn required_child(&self, name: &str) -> Result<&XmlElement> {
        self.child(name)
            .ok_or_else(|| CodecError::missing_element(name))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Parse the text of a required child element.
    pub fn value<T: XmlValue>(&self, name: &str) -> Result<T> {
        let child = self.required_child(name)?;
        T::from_xml_text(child.raw_text()).map_err(|e| CodecError::invalid_element(name, e))
    }

    /// Parse the text of a child element that may be absent.
    pub fn optional_value<T: XmlValue>(&self, name: &str) -> Result<Option<T>> {
        self.child(name)
            .map(|c| T::from_xml_text(c.raw_text()).map_err(|e| CodecError::invalid_element(name, e)))
            .transpose()
    }

    pub fn array<T: XmlValue>(&self, name: &str) -> Result<Vec<T>> {
        let child = self.required_child(name)?;
        parse_array(child.text()).map_err(|e| CodecError::invalid_element(name, e))
    }

    pub fn optional_array<T: XmlValue>(&self, name: &str) -> Result<Option<Vec<T>>> {
        self.child(name)
            .map(|c| parse_array(c.text()).map_err(|e| CodecError::invalid_element(name, e)))
            .transpose()
    }

    pub fn matrix<T: XmlValue>(&self, name: &str) -> Result<Vec<Vec<T>>> {
        let child = self.required_child(name)?;
        parse_matrix(child.text()).map_err(|e| CodecError::invalid_element(name, e))
    }

    pub fn optional_matrix<T: XmlValue>(&self, name: &str) -> Result<Option<Vec<Vec<T>>>> {
        self.child(name)
            .map(|c| parse_matrix(c.text()).map_err(|e| CodecError::invalid_element(name, e)))
            .transpose()
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(CodecError::xml(format!(
            "unexpected second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = utf8(start.local_name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(CodecError::xml)?;
        let key = utf8(attr.key.local_name().as_ref())?.to_string();
        let value = unescape(utf8(&attr.value)?)?;
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(CodecError::xml)
}

/// Resolve `name` of a `&name;` reference.
fn resolve_reference(name: &str) -> Result<char> {
    let resolved = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };
    resolved.ok_or_else(|| CodecError::xml(format!("unknown entity reference &{name};")))
}

fn unescape(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| CodecError::xml(format!("unterminated entity reference in '{text}'")))?;
        out.push(resolve_reference(&after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Attributes of an `<Entity/>` or `<ContainerEntity/>` element.
pub fn entity_attributes(entity: &Entity) -> [(&'static str, &str); 5] {
    [
        ("entityId", entity.entity_id.as_str()),
        ("entityIdEncrypted", entity.entity_id_encrypted.as_str()),
        ("entityTypeName", entity.entity_type_name.as_str()),
        ("schemaVersion", entity.entity_version.as_str()),
        ("documentVersion", entity.instance_version.as_str()),
    ]
}

/// Read an entity from an element carrying [`entity_attributes`].
pub fn parse_entity(element: &XmlElement) -> Result<Entity> {
    let defaults = Entity::default();
    let optional = |name: &str, default: String| {
        element
            .attribute(name)
            .map_or(default, str::to_string)
    };
    Ok(Entity {
        entity_id: EntityId::new(element.required_attribute("entityId")?)?,
        entity_type_name: element.required_attribute("entityTypeName")?.to_string(),
        entity_id_encrypted: optional("entityIdEncrypted", defaults.entity_id_encrypted),
        entity_version: optional("schemaVersion", defaults.entity_version),
        instance_version: optional("documentVersion", defaults.instance_version),
    })
}

/// Indented document writer.
pub struct XmlDocWriter {
    inner: Writer<Vec<u8>>,
}

impl Default for XmlDocWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDocWriter {
    pub fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event).map_err(CodecError::xml)
    }

    pub fn declaration(&mut self) -> Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attributes {
            start.push_attribute((key, value));
        }
        self.emit(Event::Start(start))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attributes {
            start.push_attribute((key, value));
        }
        self.emit(Event::Empty(start))
    }

    /// `<name>text</name>` with the text escaped.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(name)))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.emit(Event::End(BytesEnd::new(name)))
    }

    pub fn entity(&mut self, name: &str, entity: &Entity) -> Result<()> {
        self.empty(name, &entity_attributes(entity))
    }

    pub fn finish(self) -> Result<String> {
        let mut bytes = self.inner.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(CodecError::xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let xml = r#"<?xml version="1.0"?>
<Root a="1">
  <row>
    <name> Pad W210 </name>
    <flag>true</flag>
  </row>
  <row><name>A &amp; B</name></row>
  <Empty x="&lt;y&gt;"/>
</Root>"#;
        let root = XmlElement::parse_document(xml).unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.attribute("a"), Some("1"));
        let rows: Vec<_> = root.children_named("row").collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value::<String>("name").unwrap(), " Pad W210 ");
        assert_eq!(rows[0].child("name").unwrap().text(), "Pad W210");
        assert!(rows[0].value::<bool>("flag").unwrap());
        assert_eq!(rows[1].child("name").unwrap().text(), "A & B");
        assert_eq!(root.child("Empty").unwrap().attribute("x"), Some("<y>"));
    }

    #[test]
    fn test_missing_and_optional_children() {
        let root = XmlElement::parse_document("<row><a>1</a></row>").unwrap();
        assert_eq!(root.optional_value::<i32>("a").unwrap(), Some(1));
        assert_eq!(root.optional_value::<i32>("b").unwrap(), None);
        assert!(matches!(
            root.value::<i32>("b"),
            Err(CodecError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_invalid_child_value_names_element() {
        let root = XmlElement::parse_document("<row><n>x</n></row>").unwrap();
        let err = root.value::<i32>("n").unwrap_err();
        assert!(err.to_string().starts_with("invalid content in <n>"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(XmlElement::parse_document("").is_err());
        assert!(XmlElement::parse_document("<a><b></a>").is_err());
        assert!(XmlElement::parse_document("<a/><b/>").is_err());
    }

    #[test]
    fn test_writer_output_parses_back() {
        let mut w = XmlDocWriter::new();
        w.declaration().unwrap();
        w.start("StationTable", &[]).unwrap();
        w.entity("Entity", &Entity::for_type("StationTable")).unwrap();
        w.text_element("name", "a < b & \"c\"").unwrap();
        w.end("StationTable").unwrap();
        let xml = w.finish().unwrap();

        let root = XmlElement::parse_document(&xml).unwrap();
        assert_eq!(root.name, "StationTable");
        assert_eq!(root.child("name").unwrap().text(), "a < b & \"c\"");
        let entity = parse_entity(root.child("Entity").unwrap()).unwrap();
        assert_eq!(entity, Entity::for_type("StationTable"));
    }
}
