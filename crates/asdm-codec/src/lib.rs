//! Codecs for ASDM table files.
//!
//! - [`binary`]: endian-aware primitives and the [`BinValue`] trait used by
//!   row serializers.
//! - [`xml`]: text forms of attribute values, including the `1 N ...` array
//!   notation.
//! - [`document`]: a small element tree over `quick-xml` for reading table
//!   documents and a writer for producing them.
//! - [`mime`]: the multipart envelope wrapping binary tables and its XML
//!   header part.

pub mod binary;
pub mod document;
pub mod error;
pub mod mime;
pub mod xml;

pub use binary::{BinReader, BinValue, BinWriter, ByteOrder};
pub use document::{XmlDocWriter, XmlElement, entity_attributes, parse_entity};
pub use error::{CodecError, Result};
pub use mime::{BinaryTableHeader, MimeParts, build_mime, split_mime};
pub use xml::{XmlValue, format_array, format_matrix, parse_array, parse_matrix};
