//! Processor table.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{ProcessorSubType, ProcessorType, Tag, TagType};

use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_value,
};
use crate::table::Table;

pub type ProcessorTable = Table<ProcessorRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessorRow {
    membership: Membership,
    processor_id: Tag,
    mode_id: Tag,
    processor_type: ProcessorType,
    processor_sub_type: ProcessorSubType,
}

impl ProcessorRow {
    pub fn processor_id(&self) -> Tag {
        self.processor_id
    }

    pub fn set_processor_id(&mut self, processor_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "processorId")?;
        self.processor_id = processor_id;
        Ok(())
    }

    /// Row of the mode table matching the processor type (e.g. `CorrelatorMode`).
    pub fn mode_id(&self) -> Tag {
        self.mode_id
    }

    pub fn set_mode_id(&mut self, mode_id: Tag) {
        self.mode_id = mode_id;
    }

    pub fn processor_type(&self) -> ProcessorType {
        self.processor_type
    }

    pub fn set_processor_type(&mut self, processor_type: ProcessorType) {
        self.processor_type = processor_type;
    }

    pub fn processor_sub_type(&self) -> ProcessorSubType {
        self.processor_sub_type
    }

    pub fn set_processor_sub_type(&mut self, processor_sub_type: ProcessorSubType) {
        self.processor_sub_type = processor_sub_type;
    }
}

impl AsdmRow for ProcessorRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::Processor,
        key: &["processorId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "processorId",
        },
        attributes: &["processorId", "modeId", "processorType", "processorSubType"],
    };

    fn key(&self) -> Tag {
        self.processor_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.mode_id == other.mode_id
            && self.processor_type == other.processor_type
            && self.processor_sub_type == other.processor_sub_type
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.mode_id, self.processor_type, self.processor_sub_type
        )
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.processor_id = Tag::new(index, TagType::Processor);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "processorId", &self.processor_id)?;
        write_value(w, "modeId", &self.mode_id)?;
        write_value(w, "processorType", &self.processor_type)?;
        write_value(w, "processorSubType", &self.processor_sub_type)
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            processor_id: row.value("processorId")?,
            mode_id: row.value("modeId")?,
            processor_type: row.value("processorType")?,
            processor_sub_type: row.value("processorSubType")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.processor_id)?;
        w.write(&self.mode_id)?;
        w.write(&self.processor_type)?;
        w.write(&self.processor_sub_type)
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "processorId" => self.processor_id = r.read()?,
            "modeId" => self.mode_id = r.read()?,
            "processorType" => self.processor_type = r.read()?,
            "processorSubType" => self.processor_sub_type = r.read()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<ProcessorRow> {
    pub fn new_row_with(
        &self,
        mode_id: Tag,
        processor_type: ProcessorType,
        processor_sub_type: ProcessorSubType,
    ) -> ProcessorRow {
        ProcessorRow {
            mode_id,
            processor_type,
            processor_sub_type,
            ..ProcessorRow::default()
        }
    }
}
