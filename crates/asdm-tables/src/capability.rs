//! Capabilities every table provides to the dataset container.
//!
//! Tables are stored type-erased behind [`TableHandle`]; the typed API lives
//! on [`Table`](crate::Table) itself.

use std::any::Any;
use std::path::Path;

use asdm_codec::ByteOrder;
use asdm_model::Entity;

use crate::error::Result;
use crate::options::{ParseOptions, SaveOptions};

pub trait Nameable {
    /// Table name, e.g. `Station`.
    fn name(&self) -> &'static str;
}

pub trait XmlSerializable {
    /// The whole table as an XML document.
    fn to_xml(&self, container: &Entity) -> Result<String>;

    /// Append the rows of an XML document produced by [`XmlSerializable::to_xml`].
    fn from_xml(&mut self, xml: &str, check_uniqueness: bool) -> Result<()>;
}

pub trait BinarySerializable {
    /// The whole table as a MIME message.
    fn to_mime(&self, container: &Entity, byte_order: ByteOrder) -> Result<Vec<u8>>;

    /// Append the rows of a MIME message produced by [`BinarySerializable::to_mime`].
    fn set_from_mime(&mut self, message: &[u8], check_uniqueness: bool) -> Result<()>;
}

pub trait FileStorable {
    /// Write `<Name>.xml`, plus `<Name>.bin` in binary mode, into `directory`.
    fn to_file(&self, directory: &Path, container: &Entity, options: &SaveOptions) -> Result<()>;

    /// Load the table's file from `directory`.
    fn set_from_file(&mut self, directory: &Path, options: &ParseOptions) -> Result<()>;
}

/// Type-erased table owned by the container.
pub trait TableHandle: Nameable + XmlSerializable + BinarySerializable + FileStorable {
    fn size(&self) -> usize;

    fn entity(&self) -> &Entity;

    fn set_entity(&mut self, entity: Entity);

    /// Whether the table is saved as a MIME message by default.
    fn is_file_as_bin(&self) -> bool;

    fn set_file_as_bin(&mut self, file_as_bin: bool);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
