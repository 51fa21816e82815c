//! Antenna table.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{AntennaMake, AntennaType, ArrayTime, Length, Tag, TagType};

use crate::container::Asdm;
use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, require_optional,
    write_array, write_optional, write_value,
};
use crate::table::Table;
use crate::tables::StationRow;

pub type AntennaTable = Table<AntennaRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AntennaRow {
    membership: Membership,
    antenna_id: Tag,
    name: String,
    antenna_make: AntennaMake,
    antenna_type: AntennaType,
    dish_diameter: Length,
    position: Vec<Length>,
    offset: Vec<Length>,
    time: ArrayTime,
    station_id: Tag,
    assoc_antenna_id: Option<Tag>,
}

impl AntennaRow {
    pub fn antenna_id(&self) -> Tag {
        self.antenna_id
    }

    pub fn set_antenna_id(&mut self, antenna_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "antennaId")?;
        self.antenna_id = antenna_id;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn antenna_make(&self) -> AntennaMake {
        self.antenna_make
    }

    pub fn set_antenna_make(&mut self, antenna_make: AntennaMake) {
        self.antenna_make = antenna_make;
    }

    pub fn antenna_type(&self) -> AntennaType {
        self.antenna_type
    }

    pub fn set_antenna_type(&mut self, antenna_type: AntennaType) {
        self.antenna_type = antenna_type;
    }

    pub fn dish_diameter(&self) -> Length {
        self.dish_diameter
    }

    pub fn set_dish_diameter(&mut self, dish_diameter: Length) {
        self.dish_diameter = dish_diameter;
    }

    pub fn position(&self) -> &[Length] {
        &self.position
    }

    pub fn set_position(&mut self, position: Vec<Length>) {
        self.position = position;
    }

    /// Offset of the antenna reference point from the station position.
    pub fn offset(&self) -> &[Length] {
        &self.offset
    }

    pub fn set_offset(&mut self, offset: Vec<Length>) {
        self.offset = offset;
    }

    pub fn time(&self) -> ArrayTime {
        self.time
    }

    pub fn set_time(&mut self, time: ArrayTime) {
        self.time = time;
    }

    pub fn station_id(&self) -> Tag {
        self.station_id
    }

    pub fn set_station_id(&mut self, station_id: Tag) {
        self.station_id = station_id;
    }

    pub fn assoc_antenna_id(&self) -> Option<Tag> {
        self.assoc_antenna_id
    }

    pub fn set_assoc_antenna_id(&mut self, assoc_antenna_id: Tag) {
        self.assoc_antenna_id = Some(assoc_antenna_id);
    }

    pub fn clear_assoc_antenna_id(&mut self) {
        self.assoc_antenna_id = None;
    }

    /// The station this antenna stands on.
    pub fn station_using_station_id<'a>(&self, asdm: &'a Asdm) -> Result<&'a StationRow> {
        asdm.table::<StationRow>()?.row_by_key(&self.station_id)
    }

    /// The associated antenna. Fails with `IllegalAccess` when none is set.
    pub fn assoc_antenna_using_assoc_antenna_id<'a>(&self, asdm: &'a Asdm) -> Result<&'a AntennaRow> {
        let id = require_optional::<Self, _>(self.assoc_antenna_id.as_ref(), "assocAntennaId")?;
        asdm.table::<AntennaRow>()?.row_by_key(id)
    }
}

impl AsdmRow for AntennaRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::Antenna,
        key: &["antennaId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "antennaId",
        },
        attributes: &[
            "antennaId",
            "name",
            "antennaMake",
            "antennaType",
            "dishDiameter",
            "position",
            "offset",
            "time",
            "stationId",
            "assocAntennaId",
        ],
    };

    fn key(&self) -> Tag {
        self.antenna_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.name == other.name
            && self.antenna_make == other.antenna_make
            && self.antenna_type == other.antenna_type
            && self.dish_diameter == other.dish_diameter
            && self.position == other.position
            && self.offset == other.offset
            && self.time == other.time
            && self.station_id == other.station_id
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!(
            "{:?}",
            (
                &self.name,
                self.antenna_make,
                self.antenna_type,
                self.dish_diameter,
                &self.position,
                &self.offset,
                self.time,
                self.station_id,
            )
        )
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.antenna_id = Tag::new(index, TagType::Antenna);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "antennaId", &self.antenna_id)?;
        write_value(w, "name", &self.name)?;
        write_value(w, "antennaMake", &self.antenna_make)?;
        write_value(w, "antennaType", &self.antenna_type)?;
        write_value(w, "dishDiameter", &self.dish_diameter)?;
        write_array(w, "position", &self.position)?;
        write_array(w, "offset", &self.offset)?;
        write_value(w, "time", &self.time)?;
        write_value(w, "stationId", &self.station_id)?;
        write_optional(w, "assocAntennaId", self.assoc_antenna_id.as_ref())
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            antenna_id: row.value("antennaId")?,
            name: row.value("name")?,
            antenna_make: row.value("antennaMake")?,
            antenna_type: row.value("antennaType")?,
            dish_diameter: row.value("dishDiameter")?,
            position: row.array("position")?,
            offset: row.array("offset")?,
            time: row.value("time")?,
            station_id: row.value("stationId")?,
            assoc_antenna_id: row.optional_value("assocAntennaId")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.antenna_id)?;
        w.write(&self.name)?;
        w.write(&self.antenna_make)?;
        w.write(&self.antenna_type)?;
        w.write(&self.dish_diameter)?;
        w.write_vec(&self.position)?;
        w.write_vec(&self.offset)?;
        w.write(&self.time)?;
        w.write(&self.station_id)?;
        w.write_optional(self.assoc_antenna_id.as_ref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "antennaId" => self.antenna_id = r.read()?,
            "name" => self.name = r.read()?,
            "antennaMake" => self.antenna_make = r.read()?,
            "antennaType" => self.antenna_type = r.read()?,
            "dishDiameter" => self.dish_diameter = r.read()?,
            "position" => self.position = r.read_vec()?,
            "offset" => self.offset = r.read_vec()?,
            "time" => self.time = r.read()?,
            "stationId" => self.station_id = r.read()?,
            "assocAntennaId" => self.assoc_antenna_id = r.read_optional()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<AntennaRow> {
    #[allow(clippy::too_many_arguments)]
    pub fn new_row_with(
        &self,
        name: impl Into<String>,
        antenna_make: AntennaMake,
        antenna_type: AntennaType,
        dish_diameter: Length,
        position: Vec<Length>,
        offset: Vec<Length>,
        time: ArrayTime,
        station_id: Tag,
    ) -> AntennaRow {
        AntennaRow {
            name: name.into(),
            antenna_make,
            antenna_type,
            dish_diameter,
            position,
            offset,
            time,
            station_id,
            ..AntennaRow::default()
        }
    }
}
