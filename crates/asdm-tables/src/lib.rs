//! Typed ASDM tables and the dataset container.
//!
//! Every table is a [`Table`] of one row type implementing [`AsdmRow`]. The
//! row type declares its schema: key attributes, key style (natural or
//! auto-increment) and the canonical attribute order shared by the XML and
//! binary codecs. The [`Asdm`] container owns one table of each kind and reads
//! and writes whole dataset directories.
//!
//! ```no_run
//! use asdm_tables::{Asdm, ParseOptions, SubscanRow};
//!
//! let asdm = Asdm::from_directory("uid___A002_X1", &ParseOptions::default())?;
//! for subscan in asdm.table::<SubscanRow>()?.iter() {
//!     let exec_block = subscan.exec_block_using_exec_block_id(&asdm)?;
//!     println!("{} {}", exec_block.exec_block_uid(), subscan.field_name());
//! }
//! # Ok::<(), asdm_tables::AsdmError>(())
//! ```

pub mod capability;
pub mod container;
pub mod error;
pub mod options;
pub mod registry;
pub mod row;
pub mod table;
pub mod tables;

pub use capability::{BinarySerializable, FileStorable, Nameable, TableHandle, XmlSerializable};
pub use container::Asdm;
pub use error::{AsdmError, Result};
pub use options::{ParseOptions, SaveOptions, StorageFormat};
pub use registry::TableName;
pub use row::{AsdmRow, KeyStyle, Membership, TableSchema};
pub use table::{RowMut, Table, UnknownAttributeReader};
pub use tables::{
    AntennaRow, AntennaTable, ConfigDescriptionRow, ConfigDescriptionTable, DataDescriptionRow,
    DataDescriptionTable, ExecBlockGeometry, ExecBlockIdentity, ExecBlockRow, ExecBlockTable,
    PolarizationRow, PolarizationTable, ProcessorRow, ProcessorTable, SpectralWindowRow,
    SpectralWindowTable, StationRow, StationTable, SubscanKey, SubscanRow, SubscanTable,
};
