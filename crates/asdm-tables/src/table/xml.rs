//! Table documents: `<NameTable>` with the table and container entities and
//! one `<row>` per row.

use asdm_codec::{XmlDocWriter, XmlElement, parse_entity};
use asdm_model::Entity;

use super::Table;
use crate::capability::XmlSerializable;
use crate::error::{AsdmError, Result};
use crate::row::AsdmRow;

impl<R: AsdmRow> Table<R> {
    fn write_document(
        &self,
        w: &mut XmlDocWriter,
        root: &str,
        container: &Entity,
    ) -> asdm_codec::Result<()> {
        w.declaration()?;
        w.start(root, &[])?;
        w.entity("Entity", &self.entity)?;
        w.entity("ContainerEntity", container)?;
        for row in &self.rows {
            w.start("row", &[])?;
            row.write_xml(w)?;
            w.end("row")?;
        }
        w.end(root)
    }
}

impl<R: AsdmRow> XmlSerializable for Table<R> {
    fn to_xml(&self, container: &Entity) -> Result<String> {
        let name = R::SCHEMA.name();
        let root = R::SCHEMA.entity_type_name();
        let mut w = XmlDocWriter::new();
        self.write_document(&mut w, &root, container)
            .map_err(|e| AsdmError::conversion(name, e))?;
        w.finish().map_err(|e| AsdmError::conversion(name, e))
    }

    fn from_xml(&mut self, xml: &str, check_uniqueness: bool) -> Result<()> {
        let name = R::SCHEMA.name();
        let expected_root = R::SCHEMA.entity_type_name();
        let doc = XmlElement::parse_document(xml).map_err(|e| AsdmError::conversion(name, e))?;
        if doc.name != expected_root {
            return Err(AsdmError::conversion(
                name,
                format!("root element <{}> is not <{expected_root}>", doc.name),
            ));
        }

        let entity = doc
            .required_child("Entity")
            .and_then(parse_entity)
            .map_err(|e| AsdmError::conversion(name, e))?;
        if entity.entity_type_name != expected_root {
            return Err(AsdmError::conversion(
                name,
                format!(
                    "entity type name '{}' is not '{expected_root}'",
                    entity.entity_type_name
                ),
            ));
        }
        doc.required_child("ContainerEntity")
            .and_then(parse_entity)
            .map_err(|e| AsdmError::conversion(name, e))?;

        for (i, element) in doc.children_named("row").enumerate() {
            let row = R::read_xml(element)
                .map_err(|e| AsdmError::conversion(name, format!("row {i}: {e}")))?;
            self.check_and_add(row, check_uniqueness)?;
        }
        self.entity = entity;
        self.file_as_bin = false;
        Ok(())
    }
}
