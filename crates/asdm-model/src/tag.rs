//! Typed identifiers used as table keys.
//!
//! A [`Tag`] pairs a table type with an integer index. Its text form is
//! `<Type>_<index>`, e.g. `Station_3`, and that text is also what the binary
//! codec writes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// The table a [`Tag`] points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TagType {
    #[default]
    NoType,
    Antenna,
    ConfigDescription,
    CorrelatorMode,
    DataDescription,
    ExecBlock,
    Field,
    Holography,
    Polarization,
    Processor,
    SBSummary,
    SpectralWindow,
    Station,
    SwitchCycle,
}

impl TagType {
    pub const ALL: &'static [TagType] = &[
        TagType::NoType,
        TagType::Antenna,
        TagType::ConfigDescription,
        TagType::CorrelatorMode,
        TagType::DataDescription,
        TagType::ExecBlock,
        TagType::Field,
        TagType::Holography,
        TagType::Polarization,
        TagType::Processor,
        TagType::SBSummary,
        TagType::SpectralWindow,
        TagType::Station,
        TagType::SwitchCycle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::NoType => "NoType",
            TagType::Antenna => "Antenna",
            TagType::ConfigDescription => "ConfigDescription",
            TagType::CorrelatorMode => "CorrelatorMode",
            TagType::DataDescription => "DataDescription",
            TagType::ExecBlock => "ExecBlock",
            TagType::Field => "Field",
            TagType::Holography => "Holography",
            TagType::Polarization => "Polarization",
            TagType::Processor => "Processor",
            TagType::SBSummary => "SBSummary",
            TagType::SpectralWindow => "SpectralWindow",
            TagType::Station => "Station",
            TagType::SwitchCycle => "SwitchCycle",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        TagType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| ModelError::InvalidTag(format!("unknown tag type '{s}'")))
    }
}

/// Identifier of a row, typed by the table it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tag {
    tag_type: TagType,
    value: u32,
}

impl Tag {
    pub const fn new(value: u32, tag_type: TagType) -> Self {
        Self { tag_type, value }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn tag_type(&self) -> TagType {
        self.tag_type
    }

    /// A tag that was never assigned (type `NoType`).
    pub fn is_null(&self) -> bool {
        self.tag_type == TagType::NoType
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.tag_type, self.value)
    }
}

impl FromStr for Tag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (type_name, index) = trimmed
            .rsplit_once('_')
            .ok_or_else(|| ModelError::InvalidTag(trimmed.to_string()))?;
        let tag_type: TagType = type_name.parse()?;
        let value = index
            .parse::<u32>()
            .map_err(|_| ModelError::InvalidTag(trimmed.to_string()))?;
        Ok(Self::new(value, tag_type))
    }
}
