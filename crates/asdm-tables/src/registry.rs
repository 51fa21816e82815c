//! Names of the tables a dataset holds, and their constructors.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::capability::TableHandle;
use crate::error::AsdmError;
use crate::table::Table;
use crate::tables::{
    AntennaRow, ConfigDescriptionRow, DataDescriptionRow, ExecBlockRow, PolarizationRow,
    ProcessorRow, SpectralWindowRow, StationRow, SubscanRow,
};

/// A table of the dataset. Declaration order is manifest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TableName {
    Antenna,
    ConfigDescription,
    DataDescription,
    ExecBlock,
    Polarization,
    Processor,
    SpectralWindow,
    Station,
    Subscan,
}

impl TableName {
    pub const ALL: [TableName; 9] = [
        TableName::Antenna,
        TableName::ConfigDescription,
        TableName::DataDescription,
        TableName::ExecBlock,
        TableName::Polarization,
        TableName::Processor,
        TableName::SpectralWindow,
        TableName::Station,
        TableName::Subscan,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TableName::Antenna => "Antenna",
            TableName::ConfigDescription => "ConfigDescription",
            TableName::DataDescription => "DataDescription",
            TableName::ExecBlock => "ExecBlock",
            TableName::Polarization => "Polarization",
            TableName::Processor => "Processor",
            TableName::SpectralWindow => "SpectralWindow",
            TableName::Station => "Station",
            TableName::Subscan => "Subscan",
        }
    }

    /// Position in [`TableName::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// An empty table of this kind.
    pub fn new_table(self) -> Box<dyn TableHandle> {
        match self {
            TableName::Antenna => Box::new(Table::<AntennaRow>::new()),
            TableName::ConfigDescription => Box::new(Table::<ConfigDescriptionRow>::new()),
            TableName::DataDescription => Box::new(Table::<DataDescriptionRow>::new()),
            TableName::ExecBlock => Box::new(Table::<ExecBlockRow>::new()),
            TableName::Polarization => Box::new(Table::<PolarizationRow>::new()),
            TableName::Processor => Box::new(Table::<ProcessorRow>::new()),
            TableName::SpectralWindow => Box::new(Table::<SpectralWindowRow>::new()),
            TableName::Station => Box::new(Table::<StationRow>::new()),
            TableName::Subscan => Box::new(Table::<SubscanRow>::new()),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = AsdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TableName::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| AsdmError::invalid_argument(format!("No such table as {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Nameable;

    #[test]
    fn test_index_matches_position() {
        for (i, name) in TableName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
            assert_eq!(name.as_str().parse::<TableName>().unwrap(), *name);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "Pointing".parse::<TableName>().unwrap_err();
        assert!(matches!(err, AsdmError::InvalidArgument { .. }));
        assert_eq!(err.to_string(), "No such table as Pointing");
    }

    #[test]
    fn test_new_table_is_named_and_empty() {
        for name in TableName::ALL {
            let table = name.new_table();
            assert_eq!(table.name(), name.as_str());
            assert_eq!(table.size(), 0);
        }
    }
}
