//! Binary persistence of whole tables inside a MIME envelope.
//!
//! Rows are written in canonical attribute order. Reading follows the
//! attribute sequence stored in the header part, so files written by a
//! schema with more or fewer attributes still load.

use asdm_codec::{BinReader, BinWriter, BinaryTableHeader, ByteOrder, build_mime, split_mime};
use asdm_model::Entity;

use super::Table;
use crate::capability::BinarySerializable;
use crate::error::{AsdmError, Result};
use crate::row::{AsdmRow, TOKEN};

impl<R: AsdmRow> Table<R> {
    fn binary_header(&self, container: &Entity, byte_order: ByteOrder) -> BinaryTableHeader {
        BinaryTableHeader {
            entity: self.entity.clone(),
            container_entity: container.clone(),
            byte_order,
            attributes: R::SCHEMA.attributes.iter().map(ToString::to_string).collect(),
            legacy: false,
        }
    }

    /// The XML header part of the table's MIME message.
    pub(crate) fn binary_header_xml(
        &self,
        container: &Entity,
        byte_order: ByteOrder,
    ) -> Result<String> {
        self.binary_header(container, byte_order)
            .to_xml(R::SCHEMA.name())
            .map_err(|e| AsdmError::conversion(R::SCHEMA.name(), e))
    }

    fn write_body(&self, container: &Entity, byte_order: ByteOrder) -> asdm_codec::Result<Vec<u8>> {
        let mut w = BinWriter::new(byte_order);
        w.write(&self.entity)?;
        w.write(container)?;
        w.write_len(self.rows.len())?;
        for row in &self.rows {
            row.write_bin(&mut w)?;
        }
        Ok(w.into_inner())
    }

    fn read_row(&self, reader: &mut BinReader<'_>, attributes: &[String]) -> Result<R> {
        let name = R::SCHEMA.name();
        let mut row = R::default();
        for attribute in attributes {
            let known = row
                .read_bin_attribute(attribute, reader, TOKEN)
                .map_err(|e| AsdmError::conversion(name, format!("attribute '{attribute}': {e}")))?;
            if known {
                continue;
            }
            match self.unknown_attribute_reader(attribute) {
                Some(read) => read(reader).map_err(|e| {
                    AsdmError::conversion(name, format!("attribute '{attribute}': {e}"))
                })?,
                None => {
                    return Err(AsdmError::conversion(
                        name,
                        format!("unknown attribute '{attribute}' and no reader registered for it"),
                    ));
                }
            }
        }
        Ok(row)
    }
}

impl<R: AsdmRow> BinarySerializable for Table<R> {
    fn to_mime(&self, container: &Entity, byte_order: ByteOrder) -> Result<Vec<u8>> {
        let name = R::SCHEMA.name();
        let header = self.binary_header_xml(container, byte_order)?;
        let body = self
            .write_body(container, byte_order)
            .map_err(|e| AsdmError::conversion(name, e))?;
        Ok(build_mime(self.entity.entity_id.as_str(), &header, &body))
    }

    fn set_from_mime(&mut self, message: &[u8], check_uniqueness: bool) -> Result<()> {
        let name = R::SCHEMA.name();
        let parts = split_mime(message).map_err(|e| AsdmError::conversion(name, e))?;
        let header = BinaryTableHeader::parse(parts.header_xml, name, R::SCHEMA.attributes)
            .map_err(|e| AsdmError::conversion(name, e))?;

        let mut reader = BinReader::new(parts.body, header.byte_order);
        let entity: Entity = reader.read().map_err(|e| AsdmError::conversion(name, e))?;
        let _container: Entity = reader.read().map_err(|e| AsdmError::conversion(name, e))?;
        let count = reader
            .read_len()
            .map_err(|e| AsdmError::conversion(name, e))?;

        for _ in 0..count {
            let row = self.read_row(&mut reader, &header.attributes)?;
            self.check_and_add(row, check_uniqueness)?;
        }
        if reader.remaining() > 0 {
            tracing::debug!(
                table = name,
                trailing = reader.remaining(),
                "ignoring bytes after the last row"
            );
        }

        self.entity = entity;
        self.file_as_bin = true;
        Ok(())
    }
}
