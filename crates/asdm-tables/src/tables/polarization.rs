//! Polarization table: correlation products recorded per data description.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{PolarizationType, StokesParameter, Tag, TagType};

use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_array,
    write_matrix, write_optional, write_value,
};
use crate::table::Table;

pub type PolarizationTable = Table<PolarizationRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolarizationRow {
    membership: Membership,
    polarization_id: Tag,
    num_corr: i32,
    corr_type: Vec<StokesParameter>,
    corr_product: Vec<Vec<PolarizationType>>,
    flag_row: Option<bool>,
}

impl PolarizationRow {
    pub fn polarization_id(&self) -> Tag {
        self.polarization_id
    }

    pub fn set_polarization_id(&mut self, polarization_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "polarizationId")?;
        self.polarization_id = polarization_id;
        Ok(())
    }

    pub fn num_corr(&self) -> i32 {
        self.num_corr
    }

    pub fn set_num_corr(&mut self, num_corr: i32) {
        self.num_corr = num_corr;
    }

    pub fn corr_type(&self) -> &[StokesParameter] {
        &self.corr_type
    }

    pub fn set_corr_type(&mut self, corr_type: Vec<StokesParameter>) {
        self.corr_type = corr_type;
    }

    /// Receptor pair of each correlation, one row per correlation.
    pub fn corr_product(&self) -> &[Vec<PolarizationType>] {
        &self.corr_product
    }

    pub fn set_corr_product(&mut self, corr_product: Vec<Vec<PolarizationType>>) {
        self.corr_product = corr_product;
    }

    pub fn flag_row(&self) -> Option<bool> {
        self.flag_row
    }

    pub fn set_flag_row(&mut self, flag_row: bool) {
        self.flag_row = Some(flag_row);
    }

    pub fn clear_flag_row(&mut self) {
        self.flag_row = None;
    }
}

impl AsdmRow for PolarizationRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::Polarization,
        key: &["polarizationId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "polarizationId",
        },
        attributes: &[
            "polarizationId",
            "numCorr",
            "corrType",
            "corrProduct",
            "flagRow",
        ],
    };

    fn key(&self) -> Tag {
        self.polarization_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.num_corr == other.num_corr
            && self.corr_type == other.corr_type
            && self.corr_product == other.corr_product
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!("{:?}", (self.num_corr, &self.corr_type, &self.corr_product))
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.polarization_id = Tag::new(index, TagType::Polarization);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "polarizationId", &self.polarization_id)?;
        write_value(w, "numCorr", &self.num_corr)?;
        write_array(w, "corrType", &self.corr_type)?;
        write_matrix(w, "corrProduct", &self.corr_product)?;
        write_optional(w, "flagRow", self.flag_row.as_ref())
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            polarization_id: row.value("polarizationId")?,
            num_corr: row.value("numCorr")?,
            corr_type: row.array("corrType")?,
            corr_product: row.matrix("corrProduct")?,
            flag_row: row.optional_value("flagRow")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.polarization_id)?;
        w.write(&self.num_corr)?;
        w.write_vec(&self.corr_type)?;
        w.write_matrix(&self.corr_product)?;
        w.write_optional(self.flag_row.as_ref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "polarizationId" => self.polarization_id = r.read()?,
            "numCorr" => self.num_corr = r.read()?,
            "corrType" => self.corr_type = r.read_vec()?,
            "corrProduct" => self.corr_product = r.read_matrix()?,
            "flagRow" => self.flag_row = r.read_optional()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<PolarizationRow> {
    pub fn new_row_with(
        &self,
        num_corr: i32,
        corr_type: Vec<StokesParameter>,
        corr_product: Vec<Vec<PolarizationType>>,
    ) -> PolarizationRow {
        PolarizationRow {
            num_corr,
            corr_type,
            corr_product,
            ..PolarizationRow::default()
        }
    }
}
