//! Subscan table, keyed by execution block, scan and subscan number.

use std::fmt;

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{ArrayTime, CorrelatorCalibration, SubscanIntent, SwitchingMode, Tag};

use crate::container::Asdm;
use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_array,
    write_optional, write_value,
};
use crate::table::Table;
use crate::tables::ExecBlockRow;

pub type SubscanTable = Table<SubscanRow>;

/// Natural key of a subscan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscanKey {
    pub exec_block_id: Tag,
    pub scan_number: i32,
    pub subscan_number: i32,
}

impl SubscanKey {
    pub const fn new(exec_block_id: Tag, scan_number: i32, subscan_number: i32) -> Self {
        Self {
            exec_block_id,
            scan_number,
            subscan_number,
        }
    }
}

impl fmt::Display for SubscanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.exec_block_id, self.scan_number, self.subscan_number
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubscanRow {
    membership: Membership,
    exec_block_id: Tag,
    scan_number: i32,
    subscan_number: i32,
    start_time: ArrayTime,
    end_time: ArrayTime,
    field_name: String,
    subscan_intent: SubscanIntent,
    number_integration: i32,
    number_subintegration: Vec<i32>,
    flag_row: bool,
    subscan_mode: Option<SwitchingMode>,
    correlator_calibration: Option<CorrelatorCalibration>,
}

impl SubscanRow {
    pub fn exec_block_id(&self) -> Tag {
        self.exec_block_id
    }

    pub fn set_exec_block_id(&mut self, exec_block_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "execBlockId")?;
        self.exec_block_id = exec_block_id;
        Ok(())
    }

    pub fn scan_number(&self) -> i32 {
        self.scan_number
    }

    pub fn set_scan_number(&mut self, scan_number: i32) -> Result<()> {
        ensure_mutable_key(self, "scanNumber")?;
        self.scan_number = scan_number;
        Ok(())
    }

    pub fn subscan_number(&self) -> i32 {
        self.subscan_number
    }

    pub fn set_subscan_number(&mut self, subscan_number: i32) -> Result<()> {
        ensure_mutable_key(self, "subscanNumber")?;
        self.subscan_number = subscan_number;
        Ok(())
    }

    pub fn start_time(&self) -> ArrayTime {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: ArrayTime) {
        self.start_time = start_time;
    }

    pub fn end_time(&self) -> ArrayTime {
        self.end_time
    }

    pub fn set_end_time(&mut self, end_time: ArrayTime) {
        self.end_time = end_time;
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn set_field_name(&mut self, field_name: impl Into<String>) {
        self.field_name = field_name.into();
    }

    pub fn subscan_intent(&self) -> SubscanIntent {
        self.subscan_intent
    }

    pub fn set_subscan_intent(&mut self, subscan_intent: SubscanIntent) {
        self.subscan_intent = subscan_intent;
    }

    pub fn number_integration(&self) -> i32 {
        self.number_integration
    }

    pub fn set_number_integration(&mut self, number_integration: i32) {
        self.number_integration = number_integration;
    }

    /// Subintegrations per integration.
    pub fn number_subintegration(&self) -> &[i32] {
        &self.number_subintegration
    }

    pub fn set_number_subintegration(&mut self, number_subintegration: Vec<i32>) {
        self.number_subintegration = number_subintegration;
    }

    pub fn flag_row(&self) -> bool {
        self.flag_row
    }

    pub fn set_flag_row(&mut self, flag_row: bool) {
        self.flag_row = flag_row;
    }

    pub fn subscan_mode(&self) -> Option<SwitchingMode> {
        self.subscan_mode
    }

    pub fn set_subscan_mode(&mut self, subscan_mode: SwitchingMode) {
        self.subscan_mode = Some(subscan_mode);
    }

    pub fn clear_subscan_mode(&mut self) {
        self.subscan_mode = None;
    }

    pub fn correlator_calibration(&self) -> Option<CorrelatorCalibration> {
        self.correlator_calibration
    }

    pub fn set_correlator_calibration(&mut self, correlator_calibration: CorrelatorCalibration) {
        self.correlator_calibration = Some(correlator_calibration);
    }

    pub fn clear_correlator_calibration(&mut self) {
        self.correlator_calibration = None;
    }

    pub fn exec_block_using_exec_block_id<'a>(&self, asdm: &'a Asdm) -> Result<&'a ExecBlockRow> {
        asdm.table::<ExecBlockRow>()?.row_by_key(&self.exec_block_id)
    }
}

impl AsdmRow for SubscanRow {
    type Key = SubscanKey;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::Subscan,
        key: &["execBlockId", "scanNumber", "subscanNumber"],
        key_style: KeyStyle::Natural,
        attributes: &[
            "execBlockId",
            "scanNumber",
            "subscanNumber",
            "startTime",
            "endTime",
            "fieldName",
            "subscanIntent",
            "numberIntegration",
            "numberSubintegration",
            "flagRow",
            "subscanMode",
            "correlatorCalibration",
        ],
    };

    fn key(&self) -> SubscanKey {
        SubscanKey::new(self.exec_block_id, self.scan_number, self.subscan_number)
    }

    fn membership(&self) -> &Membership {
        &self.membership
    }

    fn membership_mut(&mut self, _: Token) -> &mut Membership {
        &mut self.membership
    }

    fn equal_required_values(&self, other: &Self) -> bool {
        self.start_time == other.start_time
            && self.end_time == other.end_time
            && self.field_name == other.field_name
            && self.subscan_intent == other.subscan_intent
            && self.number_integration == other.number_integration
            && self.number_subintegration == other.number_subintegration
            && self.flag_row == other.flag_row
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.key() == other.key() && self.equal_required_values(other)
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "execBlockId", &self.exec_block_id)?;
        write_value(w, "scanNumber", &self.scan_number)?;
        write_value(w, "subscanNumber", &self.subscan_number)?;
        write_value(w, "startTime", &self.start_time)?;
        write_value(w, "endTime", &self.end_time)?;
        write_value(w, "fieldName", &self.field_name)?;
        write_value(w, "subscanIntent", &self.subscan_intent)?;
        write_value(w, "numberIntegration", &self.number_integration)?;
        write_array(w, "numberSubintegration", &self.number_subintegration)?;
        write_value(w, "flagRow", &self.flag_row)?;
        write_optional(w, "subscanMode", self.subscan_mode.as_ref())?;
        write_optional(
            w,
            "correlatorCalibration",
            self.correlator_calibration.as_ref(),
        )
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            exec_block_id: row.value("execBlockId")?,
            scan_number: row.value("scanNumber")?,
            subscan_number: row.value("subscanNumber")?,
            start_time: row.value("startTime")?,
            end_time: row.value("endTime")?,
            field_name: row.value("fieldName")?,
            subscan_intent: row.value("subscanIntent")?,
            number_integration: row.value("numberIntegration")?,
            number_subintegration: row.array("numberSubintegration")?,
            flag_row: row.value("flagRow")?,
            subscan_mode: row.optional_value("subscanMode")?,
            correlator_calibration: row.optional_value("correlatorCalibration")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.exec_block_id)?;
        w.write(&self.scan_number)?;
        w.write(&self.subscan_number)?;
        w.write(&self.start_time)?;
        w.write(&self.end_time)?;
        w.write(&self.field_name)?;
        w.write(&self.subscan_intent)?;
        w.write(&self.number_integration)?;
        w.write_vec(&self.number_subintegration)?;
        w.write(&self.flag_row)?;
        w.write_optional(self.subscan_mode.as_ref())?;
        w.write_optional(self.correlator_calibration.as_ref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "execBlockId" => self.exec_block_id = r.read()?,
            "scanNumber" => self.scan_number = r.read()?,
            "subscanNumber" => self.subscan_number = r.read()?,
            "startTime" => self.start_time = r.read()?,
            "endTime" => self.end_time = r.read()?,
            "fieldName" => self.field_name = r.read()?,
            "subscanIntent" => self.subscan_intent = r.read()?,
            "numberIntegration" => self.number_integration = r.read()?,
            "numberSubintegration" => self.number_subintegration = r.read_vec()?,
            "flagRow" => self.flag_row = r.read()?,
            "subscanMode" => self.subscan_mode = r.read_optional()?,
            "correlatorCalibration" => self.correlator_calibration = r.read_optional()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl Table<SubscanRow> {
    /// A row holding every mandatory value; `numberIntegration` follows
    /// `number_subintegration`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_row_with(
        &self,
        exec_block_id: Tag,
        scan_number: i32,
        subscan_number: i32,
        start_time: ArrayTime,
        end_time: ArrayTime,
        field_name: impl Into<String>,
        subscan_intent: SubscanIntent,
        number_subintegration: Vec<i32>,
    ) -> SubscanRow {
        SubscanRow {
            exec_block_id,
            scan_number,
            subscan_number,
            start_time,
            end_time,
            field_name: field_name.into(),
            subscan_intent,
            number_integration: i32::try_from(number_subintegration.len()).unwrap_or(i32::MAX),
            number_subintegration,
            ..SubscanRow::default()
        }
    }

    /// Lookup by the three key attributes.
    pub fn get_row_by_key_parts(
        &self,
        exec_block_id: Tag,
        scan_number: i32,
        subscan_number: i32,
    ) -> Option<&SubscanRow> {
        self.get_row_by_key(&SubscanKey::new(exec_block_id, scan_number, subscan_number))
    }
}
