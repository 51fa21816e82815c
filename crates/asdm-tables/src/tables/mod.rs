//! Concrete tables.

mod antenna;
mod config_description;
mod data_description;
mod exec_block;
mod polarization;
mod processor;
mod spectral_window;
mod station;
mod subscan;

pub use antenna::{AntennaRow, AntennaTable};
pub use config_description::{ConfigDescriptionRow, ConfigDescriptionTable};
pub use data_description::{DataDescriptionRow, DataDescriptionTable};
pub use exec_block::{ExecBlockGeometry, ExecBlockIdentity, ExecBlockRow, ExecBlockTable};
pub use polarization::{PolarizationRow, PolarizationTable};
pub use processor::{ProcessorRow, ProcessorTable};
pub use spectral_window::{SpectralWindowRow, SpectralWindowTable};
pub use station::{StationRow, StationTable};
pub use subscan::{SubscanKey, SubscanRow, SubscanTable};

use asdm_model::Tag;

use crate::row::AsdmRow;
use crate::table::Table;

/// Rows for every tag that has one, in tag order. Unresolved tags are skipped.
pub(crate) fn resolve_tags<'a, R>(table: &'a Table<R>, ids: &[Tag]) -> Vec<&'a R>
where
    R: AsdmRow<Key = Tag>,
{
    ids.iter()
        .filter_map(|id| table.get_row_by_key(id))
        .collect()
}
