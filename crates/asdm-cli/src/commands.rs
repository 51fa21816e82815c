//! Command implementations.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use asdm_codec::ByteOrder;
use asdm_tables::{Asdm, ParseOptions, SaveOptions, StorageFormat, TableName};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::cli::{ByteOrderArg, ConvertArgs, StorageFormatArg, ValidateArgs};

/// What `convert` wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub destination: PathBuf,
    pub tables: Vec<TableStatus>,
}

/// Outcome of loading one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableStatus {
    pub table: TableName,
    /// Row count declared by the manifest.
    pub declared_rows: usize,
    /// Row count found in the table file, when it loaded.
    pub rows: Option<usize>,
    pub binary: bool,
    pub error: Option<String>,
}

impl TableStatus {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of `validate`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub directory: PathBuf,
    pub entity_id: String,
    pub time_of_creation: String,
    pub tables: Vec<TableStatus>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.tables.iter().any(|t| !t.is_ok())
    }
}

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let span = info_span!("convert", source = %args.source.display());
    let _guard = span.enter();
    let start = Instant::now();

    let parse_options =
        ParseOptions::new().with_check_row_uniqueness(!args.no_uniqueness_check);
    let asdm = Asdm::from_directory(&args.source, &parse_options)
        .with_context(|| format!("read dataset {}", args.source.display()))?;

    let mut save_options = SaveOptions::new().with_overwrite(args.overwrite);
    if let Some(format) = args.format {
        save_options = save_options.with_format(storage_format(format));
    }
    if let Some(byte_order) = args.byte_order {
        save_options = save_options.with_byte_order(byte_order_of(byte_order));
    }
    asdm.to_file_with(&args.destination, &save_options)
        .with_context(|| format!("write dataset {}", args.destination.display()))?;

    let tables = collect_statuses(&asdm);
    info!(
        destination = %args.destination.display(),
        elapsed_ms = start.elapsed().as_millis(),
        "conversion finished"
    );
    Ok(ConvertResult {
        destination: args.destination.clone(),
        tables,
    })
}

/// Load every table of the dataset and record how each one fared.
///
/// Only a missing or unreadable manifest is an error; table failures end up
/// in the report.
pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    validate_directory(&args.directory, !args.no_uniqueness_check)
}

pub fn validate_directory(directory: &Path, check_row_uniqueness: bool) -> Result<ValidationReport> {
    let span = info_span!("validate", path = %directory.display());
    let _guard = span.enter();

    let options = ParseOptions::new()
        .with_load_tables_on_demand(true)
        .with_check_row_uniqueness(check_row_uniqueness);
    let asdm = Asdm::from_directory(directory, &options)
        .with_context(|| format!("read manifest of {}", directory.display()))?;

    let tables = collect_statuses(&asdm);
    for status in tables.iter().filter(|t| !t.is_ok()) {
        warn!(table = %status.table, error = status.error.as_deref(), "table failed to load");
    }
    Ok(ValidationReport {
        directory: directory.to_path_buf(),
        entity_id: asdm.entity().entity_id.to_string(),
        time_of_creation: asdm.time_of_creation().to_fits(),
        tables,
    })
}

fn collect_statuses(asdm: &Asdm) -> Vec<TableStatus> {
    asdm.table_names()
        .iter()
        .map(|&name| {
            let declared_rows = asdm.declared_rows(name);
            match asdm.get_table(name.as_str()) {
                Ok(table) => TableStatus {
                    table: name,
                    declared_rows,
                    rows: Some(table.size()),
                    binary: table.is_file_as_bin(),
                    error: None,
                },
                Err(error) => TableStatus {
                    table: name,
                    declared_rows,
                    rows: None,
                    binary: false,
                    error: Some(error.to_string()),
                },
            }
        })
        .collect()
}

fn storage_format(format: StorageFormatArg) -> StorageFormat {
    match format {
        StorageFormatArg::Xml => StorageFormat::Xml,
        StorageFormatArg::Bin => StorageFormat::Binary,
    }
}

fn byte_order_of(byte_order: ByteOrderArg) -> ByteOrder {
    match byte_order {
        ByteOrderArg::Big => ByteOrder::BigEndian,
        ByteOrderArg::Little => ByteOrder::LittleEndian,
    }
}
