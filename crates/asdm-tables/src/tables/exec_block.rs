//! ExecBlock table: one row per execution of a scheduling block.

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement};
use asdm_model::{Angle, ArrayTime, Length, Tag, TagType};

use crate::container::Asdm;
use crate::error::Result;
use crate::registry::TableName;
use crate::row::{
    AsdmRow, KeyStyle, Membership, TableSchema, Token, ensure_mutable_key, write_array,
    write_optional, write_value,
};
use crate::table::Table;
use crate::tables::{AntennaRow, resolve_tags};

pub type ExecBlockTable = Table<ExecBlockRow>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecBlockRow {
    membership: Membership,
    exec_block_id: Tag,
    start_time: ArrayTime,
    end_time: ArrayTime,
    exec_block_num: i32,
    exec_block_uid: String,
    project_id: String,
    config_name: String,
    telescope_name: String,
    observer_name: String,
    observing_log: String,
    session_reference: String,
    sb_summary: String,
    scheduler_mode: String,
    base_range_min: Length,
    base_range_max: Length,
    base_rms_minor: Length,
    base_rms_major: Length,
    base_pa: Angle,
    site_altitude: Length,
    site_longitude: Angle,
    site_latitude: Angle,
    aborted: bool,
    num_antenna: i32,
    antenna_id: Vec<Tag>,
    sb_summary_id: Tag,
    release_date: Option<ArrayTime>,
    flag_row: Option<bool>,
}

/// Identity and provenance of an execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecBlockIdentity {
    pub exec_block_num: i32,
    pub exec_block_uid: String,
    pub project_id: String,
    pub config_name: String,
    pub telescope_name: String,
    pub observer_name: String,
    pub observing_log: String,
    pub session_reference: String,
    pub sb_summary: String,
    pub scheduler_mode: String,
    pub sb_summary_id: Tag,
}

/// Array geometry summary of an execution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExecBlockGeometry {
    pub base_range_min: Length,
    pub base_range_max: Length,
    pub base_rms_minor: Length,
    pub base_rms_major: Length,
    pub base_pa: Angle,
    pub site_altitude: Length,
    pub site_longitude: Angle,
    pub site_latitude: Angle,
}

macro_rules! string_attribute {
    ($($field:ident, $setter:ident);+ $(;)?) => {
        $(
            pub fn $field(&self) -> &str {
                &self.$field
            }

            pub fn $setter(&mut self, value: impl Into<String>) {
                self.$field = value.into();
            }
        )+
    };
}

macro_rules! copy_attribute {
    ($($field:ident, $setter:ident: $ty:ty);+ $(;)?) => {
        $(
            pub fn $field(&self) -> $ty {
                self.$field
            }

            pub fn $setter(&mut self, value: $ty) {
                self.$field = value;
            }
        )+
    };
}

impl ExecBlockRow {
    pub fn exec_block_id(&self) -> Tag {
        self.exec_block_id
    }

    pub fn set_exec_block_id(&mut self, exec_block_id: Tag) -> Result<()> {
        ensure_mutable_key(self, "execBlockId")?;
        self.exec_block_id = exec_block_id;
        Ok(())
    }

    string_attribute!(
        exec_block_uid, set_exec_block_uid;
        project_id, set_project_id;
        config_name, set_config_name;
        telescope_name, set_telescope_name;
        observer_name, set_observer_name;
        observing_log, set_observing_log;
        session_reference, set_session_reference;
        sb_summary, set_sb_summary;
        scheduler_mode, set_scheduler_mode;
    );

    copy_attribute!(
        start_time, set_start_time: ArrayTime;
        end_time, set_end_time: ArrayTime;
        exec_block_num, set_exec_block_num: i32;
        base_range_min, set_base_range_min: Length;
        base_range_max, set_base_range_max: Length;
        base_rms_minor, set_base_rms_minor: Length;
        base_rms_major, set_base_rms_major: Length;
        base_pa, set_base_pa: Angle;
        site_altitude, set_site_altitude: Length;
        site_longitude, set_site_longitude: Angle;
        site_latitude, set_site_latitude: Angle;
        aborted, set_aborted: bool;
        num_antenna, set_num_antenna: i32;
        sb_summary_id, set_sb_summary_id: Tag;
    );

    pub fn antenna_id(&self) -> &[Tag] {
        &self.antenna_id
    }

    pub fn set_antenna_id(&mut self, antenna_id: Vec<Tag>) {
        self.antenna_id = antenna_id;
    }

    pub fn release_date(&self) -> Option<ArrayTime> {
        self.release_date
    }

    pub fn set_release_date(&mut self, release_date: ArrayTime) {
        self.release_date = Some(release_date);
    }

    pub fn clear_release_date(&mut self) {
        self.release_date = None;
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

    /// Antennas referenced by `antennaId`, skipping tags with no row.
    pub fn antennas_using_antenna_id<'a>(&self, asdm: &'a Asdm) -> Result<Vec<&'a AntennaRow>> {
        Ok(resolve_tags(asdm.table::<AntennaRow>()?, &self.antenna_id))
    }
}

impl AsdmRow for ExecBlockRow {
    type Key = Tag;

    const SCHEMA: TableSchema = TableSchema {
        table: TableName::ExecBlock,
        key: &["execBlockId"],
        key_style: KeyStyle::AutoIncrement {
            attribute: "execBlockId",
        },
        attributes: &[
            "execBlockId",
            "startTime",
            "endTime",
            "execBlockNum",
            "execBlockUID",
            "projectId",
            "configName",
            "telescopeName",
            "observerName",
            "observingLog",
            "sessionReference",
            "sbSummary",
            "schedulerMode",
            "baseRangeMin",
            "baseRangeMax",
            "baseRmsMinor",
            "baseRmsMajor",
            "basePa",
            "siteAltitude",
            "siteLongitude",
            "siteLatitude",
            "aborted",
            "numAntenna",
            "antennaId",
            "sBSummaryId",
            "releaseDate",
            "flagRow",
        ],
    };

    fn key(&self) -> Tag {
        self.exec_block_id
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
            && self.identity() == other.identity()
            && self.geometry() == other.geometry()
            && self.aborted == other.aborted
            && self.num_antenna == other.num_antenna
            && self.antenna_id == other.antenna_id
    }

    fn equal_no_auto_inc(&self, other: &Self) -> bool {
        self.equal_required_values(other)
    }

    fn natural_key(&self) -> String {
        format!(
            "{:?}",
            (
                self.start_time,
                self.end_time,
                self.identity(),
                self.geometry(),
                self.aborted,
                self.num_antenna,
                &self.antenna_id,
            )
        )
    }

    fn assign_surrogate(&mut self, index: u32, _: Token) {
        self.exec_block_id = Tag::new(index, TagType::ExecBlock);
    }

    fn write_xml(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        write_value(w, "execBlockId", &self.exec_block_id)?;
        write_value(w, "startTime", &self.start_time)?;
        write_value(w, "endTime", &self.end_time)?;
        write_value(w, "execBlockNum", &self.exec_block_num)?;
        write_value(w, "execBlockUID", &self.exec_block_uid)?;
        write_value(w, "projectId", &self.project_id)?;
        write_value(w, "configName", &self.config_name)?;
        write_value(w, "telescopeName", &self.telescope_name)?;
        write_value(w, "observerName", &self.observer_name)?;
        write_value(w, "observingLog", &self.observing_log)?;
        write_value(w, "sessionReference", &self.session_reference)?;
        write_value(w, "sbSummary", &self.sb_summary)?;
        write_value(w, "schedulerMode", &self.scheduler_mode)?;
        write_value(w, "baseRangeMin", &self.base_range_min)?;
        write_value(w, "baseRangeMax", &self.base_range_max)?;
        write_value(w, "baseRmsMinor", &self.base_rms_minor)?;
        write_value(w, "baseRmsMajor", &self.base_rms_major)?;
        write_value(w, "basePa", &self.base_pa)?;
        write_value(w, "siteAltitude", &self.site_altitude)?;
        write_value(w, "siteLongitude", &self.site_longitude)?;
        write_value(w, "siteLatitude", &self.site_latitude)?;
        write_value(w, "aborted", &self.aborted)?;
        write_value(w, "numAntenna", &self.num_antenna)?;
        write_array(w, "antennaId", &self.antenna_id)?;
        write_value(w, "sBSummaryId", &self.sb_summary_id)?;
        write_optional(w, "releaseDate", self.release_date.as_ref())?;
        write_optional(w, "flagRow", self.flag_row.as_ref())
    }

    fn read_xml(row: &XmlElement) -> asdm_codec::Result<Self> {
        Ok(Self {
            membership: Membership::default(),
            exec_block_id: row.value("execBlockId")?,
            start_time: row.value("startTime")?,
            end_time: row.value("endTime")?,
            exec_block_num: row.value("execBlockNum")?,
            exec_block_uid: row.value("execBlockUID")?,
            project_id: row.value("projectId")?,
            config_name: row.value("configName")?,
            telescope_name: row.value("telescopeName")?,
            observer_name: row.value("observerName")?,
            observing_log: row.value("observingLog")?,
            session_reference: row.value("sessionReference")?,
            sb_summary: row.value("sbSummary")?,
            scheduler_mode: row.value("schedulerMode")?,
            base_range_min: row.value("baseRangeMin")?,
            base_range_max: row.value("baseRangeMax")?,
            base_rms_minor: row.value("baseRmsMinor")?,
            base_rms_major: row.value("baseRmsMajor")?,
            base_pa: row.value("basePa")?,
            site_altitude: row.value("siteAltitude")?,
            site_longitude: row.value("siteLongitude")?,
            site_latitude: row.value("siteLatitude")?,
            aborted: row.value("aborted")?,
            num_antenna: row.value("numAntenna")?,
            antenna_id: row.array("antennaId")?,
            sb_summary_id: row.value("sBSummaryId")?,
            release_date: row.optional_value("releaseDate")?,
            flag_row: row.optional_value("flagRow")?,
        })
    }

    fn write_bin(&self, w: &mut BinWriter) -> asdm_codec::Result<()> {
        w.write(&self.exec_block_id)?;
        w.write(&self.start_time)?;
        w.write(&self.end_time)?;
        w.write(&self.exec_block_num)?;
        w.write(&self.exec_block_uid)?;
        w.write(&self.project_id)?;
        w.write(&self.config_name)?;
        w.write(&self.telescope_name)?;
        w.write(&self.observer_name)?;
        w.write(&self.observing_log)?;
        w.write(&self.session_reference)?;
        w.write(&self.sb_summary)?;
        w.write(&self.scheduler_mode)?;
        w.write(&self.base_range_min)?;
        w.write(&self.base_range_max)?;
        w.write(&self.base_rms_minor)?;
        w.write(&self.base_rms_major)?;
        w.write(&self.base_pa)?;
        w.write(&self.site_altitude)?;
        w.write(&self.site_longitude)?;
        w.write(&self.site_latitude)?;
        w.write(&self.aborted)?;
        w.write(&self.num_antenna)?;
        w.write_vec(&self.antenna_id)?;
        w.write(&self.sb_summary_id)?;
        w.write_optional(self.release_date.as_ref())?;
        w.write_optional(self.flag_row.as_ref())
    }

    fn read_bin_attribute(
        &mut self,
        name: &str,
        r: &mut BinReader<'_>,
        _: Token,
    ) -> asdm_codec::Result<bool> {
        match name {
            "execBlockId" => self.exec_block_id = r.read()?,
            "startTime" => self.start_time = r.read()?,
            "endTime" => self.end_time = r.read()?,
            "execBlockNum" => self.exec_block_num = r.read()?,
            "execBlockUID" => self.exec_block_uid = r.read()?,
            "projectId" => self.project_id = r.read()?,
            "configName" => self.config_name = r.read()?,
            "telescopeName" => self.telescope_name = r.read()?,
            "observerName" => self.observer_name = r.read()?,
            "observingLog" => self.observing_log = r.read()?,
            "sessionReference" => self.session_reference = r.read()?,
            "sbSummary" => self.sb_summary = r.read()?,
            "schedulerMode" => self.scheduler_mode = r.read()?,
            "baseRangeMin" => self.base_range_min = r.read()?,
            "baseRangeMax" => self.base_range_max = r.read()?,
            "baseRmsMinor" => self.base_rms_minor = r.read()?,
            "baseRmsMajor" => self.base_rms_major = r.read()?,
            "basePa" => self.base_pa = r.read()?,
            "siteAltitude" => self.site_altitude = r.read()?,
            "siteLongitude" => self.site_longitude = r.read()?,
            "siteLatitude" => self.site_latitude = r.read()?,
            "aborted" => self.aborted = r.read()?,
            "numAntenna" => self.num_antenna = r.read()?,
            "antennaId" => self.antenna_id = r.read_vec()?,
            "sBSummaryId" => self.sb_summary_id = r.read()?,
            "releaseDate" => self.release_date = r.read_optional()?,
            "flagRow" => self.flag_row = r.read_optional()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl ExecBlockRow {
    fn identity(&self) -> ExecBlockIdentity {
        ExecBlockIdentity {
            exec_block_num: self.exec_block_num,
            exec_block_uid: self.exec_block_uid.clone(),
            project_id: self.project_id.clone(),
            config_name: self.config_name.clone(),
            telescope_name: self.telescope_name.clone(),
            observer_name: self.observer_name.clone(),
            observing_log: self.observing_log.clone(),
            session_reference: self.session_reference.clone(),
            sb_summary: self.sb_summary.clone(),
            scheduler_mode: self.scheduler_mode.clone(),
            sb_summary_id: self.sb_summary_id,
        }
    }

    fn geometry(&self) -> ExecBlockGeometry {
        ExecBlockGeometry {
            base_range_min: self.base_range_min,
            base_range_max: self.base_range_max,
            base_rms_minor: self.base_rms_minor,
            base_rms_major: self.base_rms_major,
            base_pa: self.base_pa,
            site_altitude: self.site_altitude,
            site_longitude: self.site_longitude,
            site_latitude: self.site_latitude,
        }
    }
}

impl Table<ExecBlockRow> {
    /// A row holding every mandatory value; `numAntenna` follows `antenna_id`.
    pub fn new_row_with(
        &self,
        start_time: ArrayTime,
        end_time: ArrayTime,
        identity: ExecBlockIdentity,
        geometry: ExecBlockGeometry,
        aborted: bool,
        antenna_id: Vec<Tag>,
    ) -> ExecBlockRow {
        ExecBlockRow {
            start_time,
            end_time,
            exec_block_num: identity.exec_block_num,
            exec_block_uid: identity.exec_block_uid,
            project_id: identity.project_id,
            config_name: identity.config_name,
            telescope_name: identity.telescope_name,
            observer_name: identity.observer_name,
            observing_log: identity.observing_log,
            session_reference: identity.session_reference,
            sb_summary: identity.sb_summary,
            scheduler_mode: identity.scheduler_mode,
            sb_summary_id: identity.sb_summary_id,
            base_range_min: geometry.base_range_min,
            base_range_max: geometry.base_range_max,
            base_rms_minor: geometry.base_rms_minor,
            base_rms_major: geometry.base_rms_major,
            base_pa: geometry.base_pa,
            site_altitude: geometry.site_altitude,
            site_longitude: geometry.site_longitude,
            site_latitude: geometry.site_latitude,
            aborted,
            num_antenna: i32::try_from(antenna_id.len()).unwrap_or(i32::MAX),
            antenna_id,
            ..ExecBlockRow::default()
        }
    }
}
