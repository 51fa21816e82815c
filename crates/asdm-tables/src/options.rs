//! Load and save options.

use asdm_codec::ByteOrder;

/// Options controlling how a dataset is read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Defer reading each table file until the table is first accessed.
    pub load_tables_on_demand: bool,
    /// Reject loaded rows that duplicate an existing row's content.
    pub check_row_uniqueness: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            load_tables_on_demand: false,
            check_row_uniqueness: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_load_tables_on_demand(mut self, enable: bool) -> Self {
        self.load_tables_on_demand = enable;
        self
    }

    #[must_use]
    pub fn with_check_row_uniqueness(mut self, enable: bool) -> Self {
        self.check_row_uniqueness = enable;
        self
    }
}

/// On-disk representation of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    /// `X.xml` holding the table document.
    Xml,
    /// `X.bin` holding the MIME message, with its XML header part in `X.xml`.
    Binary,
}

/// Options controlling how a dataset is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Format for every table; `None` keeps each table's own mode.
    pub format: Option<StorageFormat>,
    /// Byte order of binary table files.
    pub byte_order: ByteOrder,
    /// Replace files of an existing dataset.
    pub overwrite: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            format: None,
            byte_order: ByteOrder::native(),
            overwrite: false,
        }
    }
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(mut self, format: StorageFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let opts = ParseOptions::default();
        assert!(!opts.load_tables_on_demand);
        assert!(opts.check_row_uniqueness);
    }

    #[test]
    fn test_save_builder() {
        let opts = SaveOptions::new()
            .with_format(StorageFormat::Binary)
            .with_byte_order(ByteOrder::BigEndian)
            .with_overwrite(true);
        assert_eq!(opts.format, Some(StorageFormat::Binary));
        assert_eq!(opts.byte_order, ByteOrder::BigEndian);
        assert!(opts.overwrite);
        assert_eq!(SaveOptions::default().format, None);
    }
}
