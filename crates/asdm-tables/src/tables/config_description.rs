//! ConfigDescription table: the instrument configuration of a set of
//! observations.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{AtmPhaseCorrection, CorrelationMode, ProcessorType, SpectralResolutionType, Tag, TagType};

use crate::container::Asdm;
use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, require_optional,
    write_array, write_optional, write_optional_array, write_value,
};
use crate::table::Table;
use crate::tables::{AntennaRow, DataDescriptionRow, ProcessorRow, resolve_tags};

pub type ConfigDescriptionTable = Table<ConfigDescriptionRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDescriptionRow {
    membership: Membership,
    config_description_id: Tag,
    num_antenna: i32,
    num_data_description: i32,
    num_feed: i32,
    correlation_mode: CorrelationMode,
    num_atm_phase_correction: i32,
    atm_phase_correction: Vec<AtmPhaseCorrection>,
    processor_type: ProcessorType,
    spectral_type: SpectralResolutionType,
    antenna_id: Vec<Tag>,
    feed_id: Vec<i32>,
    switch_cycle_id: Vec<Tag>,
    data_description_id: Vec<Tag>,
    processor_id: Tag,
    phased_array_list: Option<Vec<i32>>,
    num_assoc_values: Option<i32>,
    assoc_nature: Option<Vec<SpectralResolutionType>>,
    assoc_config_description_id: Option<Vec<Tag>>,
}

impl ConfigDescriptionRow {
    pub fn config_description_id(&self) -> Tag {
        self.config_description_id
    }

    pub fn set_config_description_id(&mut self, config_description_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "configDescriptionId")?;
        self.config_description_id = config_description_id;
        Ok(())
    }

    pub fn num_antenna(&self) -> i32 {
        self.num_antenna
    }

    pub fn set_num_antenna(&mut self, num_antenna: i32) {
        self.num_antenna = num_antenna;
    }

    pub fn num_data_description(&self) -> i32 {
        self.num_data_description
    }

    pub fn set_num_data_description(&mut self, num_data_description: i32) {
        self.num_data_description = num_data_description;
    }

    pub fn num_feed(&self) -> i32 {
        self.num_feed
    }

    pub fn set_num_feed(&mut self, num_feed: i32) {
        self.num_feed = num_feed;
    }

    pub fn correlation_mode(&self) -> CorrelationMode {
        self.correlation_mode
    }

    pub fn set_correlation_mode(&mut self, correlation_mode: CorrelationMode) {
        self.correlation_mode = correlation_mode;
    }

    pub fn num_atm_phase_correction(&self) -> i32 {
        self.num_atm_phase_correction
    }

    pub fn set_num_atm_phase_correction(&mut self, num_atm_phase_correction: i32) {
        self.num_atm_phase_correction = num_atm_phase_correction;
    }

    pub fn atm_phase_correction(&self) -> &[AtmPhaseCorrection] {
        &self.atm_phase_correction
    }

    pub fn set_atm_phase_correction(&mut self, atm_phase_correction: Vec<AtmPhaseCorrection>) {
        self.atm_phase_correction = atm_phase_correction;
    }

    pub fn processor_type(&self) -> ProcessorType {
        self.processor_type
    }

    pub fn set_processor_type(&mut self, processor_type: ProcessorType) {
        self.processor_type = processor_type;
    }

    pub fn spectral_type(&self) -> SpectralResolutionType {
        self.spectral_type
    }

    pub fn set_spectral_type(&mut self, spectral_type: SpectralResolutionType) {
        self.spectral_type = spectral_type;
    }

    pub fn antenna_id(&self) -> &[Tag] {
        &self.antenna_id
    }

    pub fn set_antenna_id(&mut self, antenna_id: Vec<Tag>) {
        self.antenna_id = antenna_id;
    }

    pub fn feed_id(&self) -> &[i32] {
        &self.feed_id
    }

    pub fn set_feed_id(&mut self, feed_id: Vec<i32>) {
        self.feed_id = feed_id;
    }

    pub fn switch_cycle_id(&self) -> &[Tag] {
        &self.switch_cycle_id
    }

    pub fn set_switch_cycle_id(&mut self, switch_cycle_id: Vec<Tag>) {
        self.switch_cycle_id = switch_cycle_id;
    }

    pub fn data_description_id(&self) -> &[Tag] {
        &self.data_description_id
    }

    pub fn set_data_description_id(&mut self, data_description_id: Vec<Tag>) {
        self.data_description_id = data_description_id;
    }

    pub fn processor_id(&self) -> Tag {
        self.processor_id
    }

    pub fn set_processor_id(&mut self, processor_id: Tag) {
        self.processor_id = processor_id;
    }

    pub fn phased_array_list(&self) -> Option<&[i32]> {
        self.phased_array_list.as_deref()
    }

    pub fn set_phased_array_list(&mut self, value: Vec<i32>) {
        self.phased_array_list = Some(value);
    }

    pub fn clear_phased_array_list(&mut self) {
        self.phased_array_list = None;
    }

    pub fn num_assoc_values(&self) -> Option<i32> {
        self.num_assoc_values
    }

    pub fn set_num_assoc_values(&mut self, value: i32) {
        self.num_assoc_values = Some(value);
    }

    pub fn clear_num_assoc_values(&mut self) {
        self.num_assoc_values = None;
    }

    pub fn assoc_nature(&self) -> Option<&[SpectralResolutionType]> {
        self.assoc_nature.as_deref()
    }

    pub fn set_assoc_nature(&mut self, value: Vec<SpectralResolutionType>) {
        self.assoc_nature = Some(value);
    }

    pub fn clear_assoc_nature(&mut self) {
        self.assoc_nature = None;
    }

    pub fn assoc_config_description_id(&self) -> Option<&[Tag]> {
        self.assoc_config_description_id.as_deref()
    }

    pub fn set_assoc_config_description_id(&mut self, value: Vec<Tag>) {
        self.assoc_config_description_id = Some(value);
    }

    pub fn clear_assoc_config_description_id(&mut self) {
        self.assoc_config_description_id = None;
    }

    /// Antennas referenced by `antennaId`, skipping tags with no row.
    pub fn antennas_using_antenna_id<'a>(&self, asdm: &'a Asdm) -> Result<Vec<&'a AntennaRow>> {
        Ok(resolve_tags(asdm.table::<AntennaRow>()?, &self.antenna_id))
    }

    /// Data descriptions referenced by `dataDescriptionId`, skipping tags with no row.
    pub fn data_descriptions_using_data_description_id<'a>(
        &self,
        asdm: &'a Asdm,
    ) -> Result<Vec<&'a DataDescriptionRow>> {
        Ok(resolve_tags(
            asdm.table::<DataDescriptionRow>()?,
            &self.data_description_id,
        ))
    }

    pub fn processor_using_processor_id<'a>(&self, asdm: &'a Asdm) -> Result<&'a ProcessorRow> {
        asdm.table::<ProcessorRow>()?.row_by_key(&self.processor_id)
    }

    /// Associated configurations. Fails with `IllegalAccess` when
    /// `assocConfigDescriptionId` is absent.
    pub fn config_descriptions_using_assoc_config_description_id<'a>(
        &self,
        asdm: &'a Asdm,
    ) -> Result<Vec<&'a ConfigDescriptionRow>> {
        let ids = require_optional::<Self, _>(
            self.assoc_config_description_id.as_ref(),
            "assocConfigDescriptionId",
        )?;
        Ok(resolve_tags(asdm.table::<ConfigDescriptionRow>()?, ids))
    }
}

impl AsdmRow for ConfigDescriptionRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::ConfigDescription,
        key: &["configDescriptionId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "configDescriptionId",
        },
        attributes: &[
            "configDescriptionId",
            "numAntenna",
            "numDataDescription",
            "numFeed",
            "correlationMode",
            "numAtmPhaseCorrection",
            "atmPhaseCorrection",
            "processorType",
            "spectralType",
            "antennaId",
            "feedId",
            "switchCycleId",
            "dataDescriptionId",
            "processorId",
            "phasedArrayList",
            "numAssocValues",
            "assocNature",
            "assocConfigDescriptionId",
        ],
    };

    fn key(&self) -> Tag {
        self.config_description_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.num_antenna == other.num_antenna
            && self.num_data_description == other.num_data_description
            && self.num_feed == other.num_feed
            && self.correlation_mode == other.correlation_mode
            && self.num_atm_phase_correction == other.num_atm_phase_correction
            && self.atm_phase_correction == other.atm_phase_correction
            && self.processor_type == other.processor_type
            && self.spectral_type == other.spectral_type
            && self.antenna_id == other.antenna_id
            && self.feed_id == other.feed_id
            && self.switch_cycle_id == other.switch_cycle_id
            && self.data_description_id == other.data_description_id
            && self.processor_id == other.processor_id
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!(
            "{:?}",
            (
                (
                    self.num_antenna,
                    self.num_data_description,
                    self.num_feed,
                    self.correlation_mode,
                    self.num_atm_phase_correction,
                    &self.atm_phase_correction,
                    self.processor_type,
                ),
                (
                    self.spectral_type,
                    &self.antenna_id,
                    &self.feed_id,
                    &self.switch_cycle_id,
                    &self.data_description_id,
                    self.processor_id,
                ),
            )
        )
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.config_description_id = Tag::new(index, TagType::ConfigDescription);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "configDescriptionId", &self.config_description_id)?;
        write_value(w, "numAntenna", &self.num_antenna)?;
        write_value(w, "numDataDescription", &self.num_data_description)?;
        write_value(w, "numFeed", &self.num_feed)?;
        write_value(w, "correlationMode", &self.correlation_mode)?;
        write_value(w, "numAtmPhaseCorrection", &self.num_atm_phase_correction)?;
        write_array(w, "atmPhaseCorrection", &self.atm_phase_correction)?;
        write_value(w, "processorType", &self.processor_type)?;
        write_value(w, "spectralType", &self.spectral_type)?;
        write_array(w, "antennaId", &self.antenna_id)?;
        write_array(w, "feedId", &self.feed_id)?;
        write_array(w, "switchCycleId", &self.switch_cycle_id)?;
        write_array(w, "dataDescriptionId", &self.data_description_id)?;
        write_value(w, "processorId", &self.processor_id)?;
        write_optional_array(w, "phasedArrayList", self.phased_array_list.as_ref())?;
        write_optional(w, "numAssocValues", self.num_assoc_values.as_ref())?;
        write_optional_array(w, "assocNature", self.assoc_nature.as_ref())?;
        write_optional_array(
            w,
            "assocConfigDescriptionId",
            self.assoc_config_description_id.as_ref(),
        )
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            config_description_id: row.value("configDescriptionId")?,
            num_antenna: row.value("numAntenna")?,
            num_data_description: row.value("numDataDescription")?,
            num_feed: row.value("numFeed")?,
            correlation_mode: row.value("correlationMode")?,
            num_atm_phase_correction: row.value("numAtmPhaseCorrection")?,
            atm_phase_correction: row.array("atmPhaseCorrection")?,
            processor_type: row.value("processorType")?,
            spectral_type: row.value("spectralType")?,
            antenna_id: row.array("antennaId")?,
            feed_id: row.array("feedId")?,
            switch_cycle_id: row.array("switchCycleId")?,
            data_description_id: row.array("dataDescriptionId")?,
            processor_id: row.value("processorId")?,
            phased_array_list: row.optional_array("phasedArrayList")?,
            num_assoc_values: row.optional_value("numAssocValues")?,
            assoc_nature: row.optional_array("assocNature")?,
            assoc_config_description_id: row.optional_array("assocConfigDescriptionId")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.config_description_id)?;
        w.write(&self.num_antenna)?;
        w.write(&self.num_data_description)?;
        w.write(&self.num_feed)?;
        w.write(&self.correlation_mode)?;
        w.write(&self.num_atm_phase_correction)?;
        w.write_vec(&self.atm_phase_correction)?;
        w.write(&self.processor_type)?;
        w.write(&self.spectral_type)?;
        w.write_vec(&self.antenna_id)?;
        w.write_vec(&self.feed_id)?;
        w.write_vec(&self.switch_cycle_id)?;
        w.write_vec(&self.data_description_id)?;
        w.write(&self.processor_id)?;
        w.write_optional_vec(self.phased_array_list.as_deref())?;
        w.write_optional(self.num_assoc_values.as_ref())?;
        w.write_optional_vec(self.assoc_nature.as_deref())?;
        w.write_optional_vec(self.assoc_config_description_id.as_deref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "configDescriptionId" => self.config_description_id = r.read()?,
            "numAntenna" => self.num_antenna = r.read()?,
            "numDataDescription" => self.num_data_description = r.read()?,
            "numFeed" => self.num_feed = r.read()?,
            "correlationMode" => self.correlation_mode = r.read()?,
            "numAtmPhaseCorrection" => self.num_atm_phase_correction = r.read()?,
            "atmPhaseCorrection" => self.atm_phase_correction = r.read_vec()?,
            "processorType" => self.processor_type = r.read()?,
            "spectralType" => self.spectral_type = r.read()?,
            "antennaId" => self.antenna_id = r.read_vec()?,
            "feedId" => self.feed_id = r.read_vec()?,
            "switchCycleId" => self.switch_cycle_id = r.read_vec()?,
            "dataDescriptionId" => self.data_description_id = r.read_vec()?,
            "processorId" => self.processor_id = r.read()?,
            "phasedArrayList" => self.phased_array_list = r.read_optional_vec()?,
            "numAssocValues" => self.num_assoc_values = r.read_optional()?,
            "assocNature" => self.assoc_nature = r.read_optional_vec()?,
            "assocConfigDescriptionId" => self.assoc_config_description_id = r.read_optional_vec()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<ConfigDescriptionRow> {
    /// A row whose counters are derived from the id lists.
    #[allow(clippy::too_many_arguments)]
    pub fn new_row_with(
        &self,
        correlation_mode: CorrelationMode,
        atm_phase_correction: Vec<AtmPhaseCorrection>,
        processor_type: ProcessorType,
        spectral_type: SpectralResolutionType,
        antenna_id: Vec<Tag>,
        feed_id: Vec<i32>,
        switch_cycle_id: Vec<Tag>,
        data_description_id: Vec<Tag>,
        processor_id: Tag,
    ) -> ConfigDescriptionRow {
        let count = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        ConfigDescriptionRow {
            num_antenna: count(antenna_id.len()),
            num_data_description: count(data_description_id.len()),
            num_feed: count(feed_id.len().checked_div(antenna_id.len()).unwrap_or(0)),
            correlation_mode,
            num_atm_phase_correction: count(atm_phase_correction.len()),
            atm_phase_correction,
            processor_type,
            spectral_type,
            antenna_id,
            feed_id,
            switch_cycle_id,
            data_description_id,
            processor_id,
            ..ConfigDescriptionRow::default()
        }
    }
}
