//! SpectralWindow table.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{
    BasebandName, Frequency, NetSideband, SidebandProcessingMode, Tag, TagType, WindowFunction,
};

use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_optional,
    write_optional_array, write_value,
};
use crate::table::Table;

pub type SpectralWindowTable = Table<SpectralWindowRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectralWindowRow {
    membership: Membership,
    spectral_window_id: Tag,
    baseband_name: BasebandName,
    net_sideband: NetSideband,
    num_chan: i32,
    ref_freq: Frequency,
    sideband_processing_mode: SidebandProcessingMode,
    tot_bandwidth: Frequency,
    window_function: WindowFunction,
    chan_freq_start: Option<Frequency>,
    chan_freq_step: Option<Frequency>,
    chan_freq_array: Option<Vec<Frequency>>,
    chan_width: Option<Frequency>,
    effective_bw: Option<Frequency>,
    name: Option<String>,
    freq_group: Option<i32>,
    freq_group_name: Option<String>,
}

impl SpectralWindowRow {
    pub fn spectral_window_id(&self) -> Tag {
        self.spectral_window_id
    }

    pub fn set_spectral_window_id(&mut self, spectral_window_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "spectralWindowId")?;
        self.spectral_window_id = spectral_window_id;
        Ok(())
    }

    pub fn baseband_name(&self) -> BasebandName {
        self.baseband_name
    }

    pub fn set_baseband_name(&mut self, baseband_name: BasebandName) {
        self.baseband_name = baseband_name;
    }

    pub fn net_sideband(&self) -> NetSideband {
        self.net_sideband
    }

    pub fn set_net_sideband(&mut self, net_sideband: NetSideband) {
        self.net_sideband = net_sideband;
    }

    pub fn num_chan(&self) -> i32 {
        self.num_chan
    }

    pub fn set_num_chan(&mut self, num_chan: i32) {
        self.num_chan = num_chan;
    }

    pub fn ref_freq(&self) -> Frequency {
        self.ref_freq
    }

    pub fn set_ref_freq(&mut self, ref_freq: Frequency) {
        self.ref_freq = ref_freq;
    }

    pub fn sideband_processing_mode(&self) -> SidebandProcessingMode {
        self.sideband_processing_mode
    }

    pub fn set_sideband_processing_mode(&mut self, mode: SidebandProcessingMode) {
        self.sideband_processing_mode = mode;
    }

    pub fn tot_bandwidth(&self) -> Frequency {
        self.tot_bandwidth
    }

    pub fn set_tot_bandwidth(&mut self, tot_bandwidth: Frequency) {
        self.tot_bandwidth = tot_bandwidth;
    }

    pub fn window_function(&self) -> WindowFunction {
        self.window_function
    }

    pub fn set_window_function(&mut self, window_function: WindowFunction) {
        self.window_function = window_function;
    }

    pub fn chan_freq_start(&self) -> Option<Frequency> {
        self.chan_freq_start
    }

    pub fn set_chan_freq_start(&mut self, value: Frequency) {
        self.chan_freq_start = Some(value);
    }

    pub fn clear_chan_freq_start(&mut self) {
        self.chan_freq_start = None;
    }

    pub fn chan_freq_step(&self) -> Option<Frequency> {
        self.chan_freq_step
    }

    pub fn set_chan_freq_step(&mut self, value: Frequency) {
        self.chan_freq_step = Some(value);
    }

    pub fn clear_chan_freq_step(&mut self) {
        self.chan_freq_step = None;
    }

    /// Centre frequency of every channel.
    pub fn chan_freq_array(&self) -> Option<&[Frequency]> {
        self.chan_freq_array.as_deref()
    }

    pub fn set_chan_freq_array(&mut self, value: Vec<Frequency>) {
        self.chan_freq_array = Some(value);
    }

    pub fn clear_chan_freq_array(&mut self) {
        self.chan_freq_array = None;
    }

    pub fn chan_width(&self) -> Option<Frequency> {
        self.chan_width
    }

    pub fn set_chan_width(&mut self, value: Frequency) {
        self.chan_width = Some(value);
    }

    pub fn clear_chan_width(&mut self) {
        self.chan_width = None;
    }

    pub fn effective_bw(&self) -> Option<Frequency> {
        self.effective_bw
    }

    pub fn set_effective_bw(&mut self, value: Frequency) {
        self.effective_bw = Some(value);
    }

    pub fn clear_effective_bw(&mut self) {
        self.effective_bw = None;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = Some(value.into());
    }

    pub fn clear_name(&mut self) {
        self.name = None;
    }

    pub fn freq_group(&self) -> Option<i32> {
        self.freq_group
    }

    pub fn set_freq_group(&mut self, value: i32) {
        self.freq_group = Some(value);
    }

    pub fn clear_freq_group(&mut self) {
        self.freq_group = None;
    }

    pub fn freq_group_name(&self) -> Option<&str> {
        self.freq_group_name.as_deref()
    }

    pub fn set_freq_group_name(&mut self, value: impl Into<String>) {
        self.freq_group_name = Some(value.into());
    }

    pub fn clear_freq_group_name(&mut self) {
        self.freq_group_name = None;
    }
}

impl AsdmRow for SpectralWindowRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::SpectralWindow,
        key: &["spectralWindowId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "spectralWindowId",
        },
        attributes: &[
            "spectralWindowId",
            "basebandName",
            "netSideband",
            "numChan",
            "refFreq",
            "sidebandProcessingMode",
            "totBandwidth",
            "windowFunction",
            "chanFreqStart",
            "chanFreqStep",
            "chanFreqArray",
            "chanWidth",
            "effectiveBw",
            "name",
            "freqGroup",
            "freqGroupName",
        ],
    };

    fn key(&self) -> Tag {
        self.spectral_window_id
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.baseband_name == other.baseband_name
            && self.net_sideband == other.net_sideband
            && self.num_chan == other.num_chan
            && self.ref_freq == other.ref_freq
            && self.sideband_processing_mode == other.sideband_processing_mode
            && self.tot_bandwidth == other.tot_bandwidth
            && self.window_function == other.window_function
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!(
            "{:?}",
            (
                self.baseband_name,
                self.net_sideband,
                self.num_chan,
                self.ref_freq,
                self.sideband_processing_mode,
                self.tot_bandwidth,
                self.window_function,
            )
        )
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.spectral_window_id = Tag::new(index, TagType::SpectralWindow);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "spectralWindowId", &self.spectral_window_id)?;
        write_value(w, "basebandName", &self.baseband_name)?;
        write_value(w, "netSideband", &self.net_sideband)?;
        write_value(w, "numChan", &self.num_chan)?;
        write_value(w, "refFreq", &self.ref_freq)?;
        write_value(w, "sidebandProcessingMode", &self.sideband_processing_mode)?;
        write_value(w, "totBandwidth", &self.tot_bandwidth)?;
        write_value(w, "windowFunction", &self.window_function)?;
        write_optional(w, "chanFreqStart", self.chan_freq_start.as_ref())?;
        write_optional(w, "chanFreqStep", self.chan_freq_step.as_ref())?;
        write_optional_array(w, "chanFreqArray", self.chan_freq_array.as_ref())?;
        write_optional(w, "chanWidth", self.chan_width.as_ref())?;
        write_optional(w, "effectiveBw", self.effective_bw.as_ref())?;
        write_optional(w, "name", self.name.as_ref())?;
        write_optional(w, "freqGroup", self.freq_group.as_ref())?;
        write_optional(w, "freqGroupName", self.freq_group_name.as_ref())
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            spectral_window_id: row.value("spectralWindowId")?,
            baseband_name: row.value("basebandName")?,
            net_sideband: row.value("netSideband")?,
            num_chan: row.value("numChan")?,
            ref_freq: row.value("refFreq")?,
            sideband_processing_mode: row.value("sidebandProcessingMode")?,
            tot_bandwidth: row.value("totBandwidth")?,
            window_function: row.value("windowFunction")?,
            chan_freq_start: row.optional_value("chanFreqStart")?,
            chan_freq_step: row.optional_value("chanFreqStep")?,
            chan_freq_array: row.optional_array("chanFreqArray")?,
            chan_width: row.optional_value("chanWidth")?,
            effective_bw: row.optional_value("effectiveBw")?,
            name: row.optional_value("name")?,
            freq_group: row.optional_value("freqGroup")?,
            freq_group_name: row.optional_value("freqGroupName")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.spectral_window_id)?;
        w.write(&self.baseband_name)?;
        w.write(&self.net_sideband)?;
        w.write(&self.num_chan)?;
        w.write(&self.ref_freq)?;
        w.write(&self.sideband_processing_mode)?;
        w.write(&self.tot_bandwidth)?;
        w.write(&self.window_function)?;
        w.write_optional(self.chan_freq_start.as_ref())?;
        w.write_optional(self.chan_freq_step.as_ref())?;
        w.write_optional_vec(self.chan_freq_array.as_deref())?;
        w.write_optional(self.chan_width.as_ref())?;
        w.write_optional(self.effective_bw.as_ref())?;
        w.write_optional(self.name.as_ref())?;
        w.write_optional(self.freq_group.as_ref())?;
        w.write_optional(self.freq_group_name.as_ref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "spectralWindowId" => self.spectral_window_id = r.read()?,
            "basebandName" => self.baseband_name = r.read()?,
            "netSideband" => self.net_sideband = r.read()?,
            "numChan" => self.num_chan = r.read()?,
            "refFreq" => self.ref_freq = r.read()?,
            "sidebandProcessingMode" => self.sideband_processing_mode = r.read()?,
            "totBandwidth" => self.tot_bandwidth = r.read()?,
            "windowFunction" => self.window_function = r.read()?,
            "chanFreqStart" => self.chan_freq_start = r.read_optional()?,
            "chanFreqStep" => self.chan_freq_step = r.read_optional()?,
            "chanFreqArray" => self.chan_freq_array = r.read_optional_vec()?,
            "chanWidth" => self.chan_width = r.read_optional()?,
            "effectiveBw" => self.effective_bw = r.read_optional()?,
            "name" => self.name = r.read_optional()?,
            "freqGroup" => self.freq_group = r.read_optional()?,
            "freqGroupName" => self.freq_group_name = r.read_optional()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<SpectralWindowRow> {
    #[allow(clippy::too_many_arguments)]
    pub fn new_row_with(
        &self,
        baseband_name: BasebandName,
        net_sideband: NetSideband,
        num_chan: i32,
        ref_freq: Frequency,
        sideband_processing_mode: SidebandProcessingMode,
        tot_bandwidth: Frequency,
        window_function: WindowFunction,
    ) -> SpectralWindowRow {
        SpectralWindowRow {
            baseband_name,
            net_sideband,
            num_chan,
            ref_freq,
            sideband_processing_mode,
            tot_bandwidth,
            window_function,
            ..SpectralWindowRow::default()
        }
    }
}
