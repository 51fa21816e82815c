//! Station table: pads and other sites antennas can occupy.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{ArrayTime, Length, StationType, Tag, TagType};

use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_array,
    write_optional, write_value,
};
use crate::table::Table;

pub type StationTable = Table<StationRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationRow {
    membership: Membership,
    station_id: Tag,
    name: String,
    position: Vec<Length>,
    station_type: StationType,
    time: Option<ArrayTime>,
}

impl StationRow {
    pub fn station_id(&self) -> Tag {
        self.station_id
    }

    pub fn set_station_id(&mut self, station_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "stationId")?;
        self.station_id = station_id;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Geocentric position in metres.
    pub fn position(&self) -> &[Length] {
        &self.position
    }

    pub fn set_position(&mut self, position: Vec<Length>) {
        self.position = position;
    }

    pub fn station_type(&self) -> StationType {
        self.station_type
    }

    pub fn set_station_type(&mut self, station_type: StationType) {
        self.station_type = station_type;
    }

    pub fn time(&self) -> Option<ArrayTime> {
        self.time
    }

    pub fn set_time(&mut self, time: ArrayTime) {
        self.time = Some(time);
    }

    pub fn clear_time(&mut self) {
        self.time = None;
    }
}

impl AsdmRow for StationRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::Station,
        key: &["stationId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "stationId",
        },
        attributes: &["stationId", "name", "position", "type", "time"],
    };

    fn key(&self) -> Tag {
        self.station_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.name == other.name
            && self.position == other.position
            && self.station_type == other.station_type
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!("{:?}", (&self.name, &self.position, self.station_type))
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.station_id = Tag::new(index, TagType::Station);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "stationId", &self.station_id)?;
        write_value(w, "name", &self.name)?;
        write_array(w, "position", &self.position)?;
        write_value(w, "type", &self.station_type)?;
        write_optional(w, "time", self.time.as_ref())
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            station_id: row.value("stationId")?,
            name: row.value("name")?,
            position: row.array("position")?,
            station_type: row.value("type")?,
            time: row.optional_value("time")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.station_id)?;
        w.write(&self.name)?;
        w.write_vec(&self.position)?;
        w.write(&self.station_type)?;
        w.write_optional(self.time.as_ref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "stationId" => self.station_id = r.read()?,
            "name" => self.name = r.read()?,
            "position" => self.position = r.read_vec()?,
            "type" => self.station_type = r.read()?,
            "time" => self.time = r.read_optional()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<StationRow> {
    /// A row holding every mandatory value, ready for [`Table::add`].
    pub fn new_row_with(
        &self,
        name: impl Into<String>,
        position: Vec<Length>,
        station_type: StationType,
    ) -> StationRow {
        StationRow {
            name: name.into(),
            position,
            station_type,
            ..StationRow::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AsdmError;

    fn pad(name: &str, x: f64) -> StationRow {
        let table = StationTable::new();
        table.new_row_with(
            name,
            vec![Length::new(x), Length::new(0.0), Length::new(0.0)],
            StationType::AntennaPad,
        )
    }

    #[test]
    fn test_add_assigns_station_tags() {
        let mut table = StationTable::new();
        let a = table.add(pad("A001", 1.0)).unwrap().station_id();
        let b = table.add(pad("A002", 2.0)).unwrap().station_id();
        assert_eq!(a, Tag::new(0, TagType::Station));
        assert_eq!(b, Tag::new(1, TagType::Station));
    }

    #[test]
    fn test_optional_time_is_ignored_by_duplicate_detection() {
        let mut table = StationTable::new();
        table.add(pad("A001", 1.0)).unwrap();
        let mut again = pad("A001", 1.0);
        again.set_time(ArrayTime::from_nanoseconds(5));
        let existing = table.add(again).unwrap();
        assert_eq!(existing.time(), None);
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_key_setter_after_add() {
        let mut table = StationTable::new();
        let id = table.add(pad("A001", 1.0)).unwrap().station_id();
        let mut row = table.get_row_by_key_mut(&id).unwrap();
        let err = row.set_station_id(Tag::new(9, TagType::Station)).unwrap_err();
        assert!(matches!(err, AsdmError::IllegalAccess { .. }));
        assert_eq!(row.station_id(), id);
        row.set_name("renamed");
        drop(row);
        assert_eq!(table.get_row_by_key(&id).unwrap().name(), "renamed");
    }
}
