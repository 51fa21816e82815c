//! MIME envelope of binary table files.
//!
//! # Structure
//!
//! 1. Envelope headers naming the boundary and the table's archive UID
//! 2. XML part (`Content-ID: <header.xml>`): table and container entities,
//!    byte order and the attribute-name sequence the rows were written with
//! 3. Binary part (`Content-ID: <content.bin>`): entities, row count, rows
//! 4. Closing boundary
//!
//! A header whose root element is `ASDMBinaryTable` comes from the legacy
//! layout: big-endian rows in canonical attribute order.

use asdm_model::Entity;

use crate::binary::ByteOrder;
use crate::document::{XmlDocWriter, XmlElement, parse_entity};
use crate::error::{CodecError, Result};

pub const MIME_BOUNDARY: &str = "MIME_boundary";

/// Root element of legacy binary table headers.
pub const LEGACY_HEADER_ROOT: &str = "ASDMBinaryTable";

const XML_PART_ID: &str = "Content-ID: <header.xml>";
const BIN_PART_ID: &str = "Content-ID: <content.bin>";

/// Envelope headers up to and including the blank line.
fn envelope_header(uid: &str) -> String {
    format!(
        "MIME-Version: 1.0\n\
         Content-Type: Multipart/Related; boundary='{MIME_BOUNDARY}'; type='text/xml'; start= '<header.xml>'\n\
         Content-Description: Correlator\n\
         alma-uid:{uid}\n\
         \n"
    )
}

fn xml_part_header() -> String {
    format!(
        "--{MIME_BOUNDARY}\n\
         Content-Type: text/xml; charset='ISO-8859-1'\n\
         Content-Transfer-Encoding: 8bit\n\
         {XML_PART_ID}\n\
         \n"
    )
}

fn bin_part_header() -> String {
    format!(
        "--{MIME_BOUNDARY}\n\
         Content-Type: binary/octet-stream\n\
         {BIN_PART_ID}\n\
         \n"
    )
}

/// Assemble a complete message from the XML header part and the binary body.
pub fn build_mime(uid: &str, header_xml: &str, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header_xml.len() + body.len() + 512);
    out.extend_from_slice(envelope_header(uid).as_bytes());
    out.extend_from_slice(xml_part_header().as_bytes());
    out.extend_from_slice(header_xml.as_bytes());
    if !header_xml.ends_with('\n') {
        out.push(b'\n');
    }
    out.extend_from_slice(bin_part_header().as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(format!("\n--{MIME_BOUNDARY}--\n").as_bytes());
    out
}

/// The two parts of a message.
#[derive(Debug, Clone, Copy)]
pub struct MimeParts<'a> {
    pub header_xml: &'a str,
    pub body: &'a [u8],
}

/// Locate the XML header part and the binary body.
///
/// Line endings in the framing may be `\n` or `\r\n`.
pub fn split_mime(message: &[u8]) -> Result<MimeParts<'_>> {
    let xml_id = find(message, XML_PART_ID.as_bytes(), 0)
        .ok_or_else(|| CodecError::mime("no XML header part"))?;
    let (xml_start, _) = skip_blank_line(message, xml_id)
        .ok_or_else(|| CodecError::mime("XML header part has no body"))?;
    let boundary = format!("--{MIME_BOUNDARY}");
    let xml_end = find(message, boundary.as_bytes(), xml_start)
        .ok_or_else(|| CodecError::mime("XML header part is not terminated"))?;
    let header_xml = std::str::from_utf8(&message[xml_start..xml_end])
        .map_err(|_| CodecError::mime("XML header part is not UTF-8"))?
        .trim();

    let bin_id = find(message, BIN_PART_ID.as_bytes(), xml_end)
        .ok_or_else(|| CodecError::mime("no binary part"))?;
    let (body_start, crlf) = skip_blank_line(message, bin_id)
        .ok_or_else(|| CodecError::mime("binary part has no body"))?;
    let closing = format!("--{MIME_BOUNDARY}--");
    let body_end = match rfind(message, closing.as_bytes()).filter(|&at| at >= body_start) {
        Some(at) => {
            // The line break before the closing boundary belongs to the framing.
            let separator: &[u8] = if crlf { b"\r\n" } else { b"\n" };
            if message[body_start..at].ends_with(separator) {
                at - separator.len()
            } else {
                at
            }
        }
        None => message.len(),
    };

    Ok(MimeParts {
        header_xml,
        body: &message[body_start..body_end],
    })
}

/// Offset just past the first blank line at or after `from`, and whether
/// that blank line used `\r\n` endings.
fn skip_blank_line(haystack: &[u8], from: usize) -> Option<(usize, bool)> {
    let lf = find(haystack, b"\n\n", from).map(|at| (at + 2, false));
    let crlf = find(haystack, b"\r\n\r\n", from).map(|at| (at + 4, true));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|at| at + from)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Contents of the XML header part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTableHeader {
    pub entity: Entity,
    pub container_entity: Entity,
    pub byte_order: ByteOrder,
    /// Attribute names in the order the rows were written.
    pub attributes: Vec<String>,
    /// The header used the legacy `ASDMBinaryTable` layout.
    pub legacy: bool,
}

impl BinaryTableHeader {
    /// Build the XML header part for a table named `table_name`.
    pub fn to_xml(&self, table_name: &str) -> Result<String> {
        let root = format!("{table_name}Table");
        let mut w = XmlDocWriter::new();
        w.declaration()?;
        w.start(&root, &[])?;
        w.entity("Entity", &self.entity)?;
        w.entity("ContainerEntity", &self.container_entity)?;
        w.empty(
            "BulkStoreRef",
            &[
                ("file_id", self.entity.entity_id.as_str()),
                ("byteOrder", self.byte_order.as_str()),
            ],
        )?;
        w.start("Attributes", &[])?;
        for name in &self.attributes {
            w.empty(name, &[])?;
        }
        w.end("Attributes")?;
        w.end(&root)?;
        w.finish()
    }

    /// Parse a header part, accepting the current and the legacy layout.
    ///
    /// `canonical_attributes` is the attribute sequence assumed for legacy
    /// headers.
    pub fn parse(xml: &str, table_name: &str, canonical_attributes: &[&str]) -> Result<Self> {
        let root = XmlElement::parse_document(xml)?;
        if root.name == LEGACY_HEADER_ROOT {
            let entity = match root.child("Entity") {
                Some(e) => parse_entity(e)?,
                None => Entity::for_type(format!("{table_name}Table")),
            };
            let container_entity = match root.child("ContainerEntity") {
                Some(e) => parse_entity(e)?,
                None => Entity::for_type("ASDM"),
            };
            return Ok(Self {
                entity,
                container_entity,
                byte_order: ByteOrder::BigEndian,
                attributes: canonical_attributes.iter().map(ToString::to_string).collect(),
                legacy: true,
            });
        }

        let expected = format!("{table_name}Table");
        if root.name != expected {
            return Err(CodecError::mime(format!(
                "header root <{}> does not match <{expected}>",
                root.name
            )));
        }
        let entity = parse_entity(root.required_child("Entity")?)?;
        let container_entity = parse_entity(root.required_child("ContainerEntity")?)?;
        let byte_order = root
            .required_child("BulkStoreRef")?
            .required_attribute("byteOrder")?
            .parse()?;
        let attributes = root
            .required_child("Attributes")?
            .children
            .iter()
            .map(|c| c.name.clone())
            .collect();
        Ok(Self {
            entity,
            container_entity,
            byte_order,
            attributes,
            legacy: false,
        })
    }
}
