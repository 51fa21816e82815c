//! DataDescription table: pairs of spectral window and polarization setup.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{Tag, TagType};

use crate::container::Asdm;
use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_value,
};
use crate::table::Table;
use crate::tables::{PolarizationRow, SpectralWindowRow};

pub type DataDescriptionTable = Table<DataDescriptionRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataDescriptionRow {
    membership: Membership,
    data_description_id: Tag,
    pol_or_holo_id: Tag,
    spectral_window_id: Tag,
}

impl DataDescriptionRow {
    pub fn data_description_id(&self) -> Tag {
        self.data_description_id
    }

    pub fn set_data_description_id(&mut self, data_description_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "dataDescriptionId")?;
        self.data_description_id = data_description_id;
        Ok(())
    }

    /// A `Polarization` tag, or a `Holography` tag for holography data.
    pub fn pol_or_holo_id(&self) -> Tag {
        self.pol_or_holo_id
    }

    pub fn set_pol_or_holo_id(&mut self, pol_or_holo_id: Tag) {
        self.pol_or_holo_id = pol_or_holo_id;
    }

    pub fn spectral_window_id(&self) -> Tag {
        self.spectral_window_id
    }

    pub fn set_spectral_window_id(&mut self, spectral_window_id: Tag) {
        self.spectral_window_id = spectral_window_id;
    }

    pub fn spectral_window_using_spectral_window_id<'a>(
        &self,
        asdm: &'a Asdm,
    ) -> Result<&'a SpectralWindowRow> {
        asdm.table::<SpectralWindowRow>()?
            .row_by_key(&self.spectral_window_id)
    }

    pub fn polarization_using_pol_or_holo_id<'a>(
        &self,
        asdm: &'a Asdm,
    ) -> Result<&'a PolarizationRow> {
        asdm.table::<PolarizationRow>()?
            .row_by_key(&self.pol_or_holo_id)
    }
}

impl AsdmRow for DataDescriptionRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::DataDescription,
        key: &["dataDescriptionId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "dataDescriptionId",
        },
        attributes: &["dataDescriptionId", "polOrHoloId", "spectralWindowId"],
    };

    fn key(&self) -> Tag {
        self.data_description_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.pol_or_holo_id == other.pol_or_holo_id
            && self.spectral_window_id == other.spectral_window_id
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!("{}_{}", self.pol_or_holo_id, self.spectral_window_id)
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.data_description_id = Tag::new(index, TagType::DataDescription);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "dataDescriptionId", &self.data_description_id)?;
        write_value(w, "polOrHoloId", &self.pol_or_holo_id)?;
        write_value(w, "spectralWindowId", &self.spectral_window_id)
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            data_description_id: row.value("dataDescriptionId")?,
            pol_or_holo_id: row.value("polOrHoloId")?,
            spectral_window_id: row.value("spectralWindowId")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.data_description_id)?;
        w.write(&self.pol_or_holo_id)?;
        w.write(&self.spectral_window_id)
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "dataDescriptionId" => self.data_description_id = r.read()?,
            "polOrHoloId" => self.pol_or_holo_id = r.read()?,
            "spectralWindowId" => self.spectral_window_id = r.read()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<DataDescriptionRow> {
    pub fn new_row_with(&self, pol_or_holo_id: Tag, spectral_window_id: Tag) -> DataDescriptionRow {
        DataDescriptionRow {
            pol_or_holo_id,
            spectral_window_id,
            ..DataDescriptionRow::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AsdmError;

    #[test]
    fn test_same_pair_reuses_surrogate() {
        let mut table = DataDescriptionTable::new();
        let pol = Tag::new(0, TagType::Polarization);
        let spw = Tag::new(3, TagType::SpectralWindow);
        let first = table.add(table.new_row_with(pol, spw)).unwrap().data_description_id();
        let second = table.add(table.new_row_with(pol, spw)).unwrap().data_description_id();
        assert_eq!(first, second);
        assert_eq!(first, Tag::new(0, TagType::DataDescription));
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_uniqueness_check_on_load_path() {
        let mut table = DataDescriptionTable::new();
        let pol = Tag::new(0, TagType::Polarization);
        let spw = Tag::new(0, TagType::SpectralWindow);
        let mut row = table.new_row_with(pol, spw);
        row.set_data_description_id(Tag::new(0, TagType::DataDescription))
            .unwrap();
        table.check_and_add(row.clone(), true).unwrap();

        let mut duplicate = row.clone();
        duplicate
            .set_data_description_id(Tag::new(1, TagType::DataDescription))
            .unwrap();
        let err = table.check_and_add(duplicate.clone(), true).unwrap_err();
        assert!(matches!(err, AsdmError::UniquenessViolation { .. }));

        table.check_and_add(duplicate, false).unwrap();
        assert_eq!(table.size(), 2);

        let err = table.check_and_add(row, false).unwrap_err();
        assert!(matches!(err, AsdmError::DuplicateKey { .. }));
    }
}
