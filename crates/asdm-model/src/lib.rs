//! Value types shared by every ASDM table.
//!
//! Rows are built from a small vocabulary of types: [`Tag`] identifiers used
//! as primary and foreign keys, [`Entity`] records identifying tables and
//! datasets, [`ArrayTime`] instants, physical quantities and a set of closed
//! enumerations.

pub mod entity;
pub mod enums;
pub mod error;
pub mod quantity;
pub mod tag;
pub mod time;

pub use entity::{Entity, EntityId};
pub use enums::{
    AntennaMake, AntennaType, AsdmEnum, AtmPhaseCorrection, BasebandName, CorrelationMode,
    CorrelatorCalibration, NetSideband, PolarizationType, ProcessorSubType, ProcessorType,
    SidebandProcessingMode, SpectralResolutionType, StationType, StokesParameter,
    SubscanIntent, SwitchingMode, WindowFunction,
};
pub use error::{ModelError, Result};
pub use quantity::{Angle, Frequency, Length};
pub use tag::{Tag, TagType};
pub use time::{ArrayTime, Interval};
