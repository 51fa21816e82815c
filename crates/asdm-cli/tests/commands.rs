//! `convert` and `validate` against datasets on disk.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use asdm_cli::cli::{ByteOrderArg, ConvertArgs, StorageFormatArg};
use asdm_cli::commands::{run_convert, validate_directory};
use asdm_cli::summary::validation_json;
use asdm_model::{ArrayTime, Length, StationType, SubscanIntent, Tag, TagType};
use asdm_tables::{Asdm, StationRow, SubscanRow, TableName};

fn write_dataset(directory: &Path) {
    let mut asdm = Asdm::new();
    let stations = asdm.table_mut::<StationRow>().unwrap();
    for name in ["A001", "A002"] {
        let row = stations.new_row_with(
            name,
            vec![Length::new(1.0), Length::new(2.0), Length::new(3.0)],
            StationType::AntennaPad,
        );
        stations.add(row).unwrap();
    }
    let subscans = asdm.table_mut::<SubscanRow>().unwrap();
    let row = subscans.new_row_with(
        Tag::new(0, TagType::ExecBlock),
        1,
        1,
        ArrayTime::from_nanoseconds(1_000),
        ArrayTime::from_nanoseconds(2_000),
        "J1924-2914",
        SubscanIntent::OnSource,
        vec![2],
    );
    subscans.add(row).unwrap();
    asdm.to_file(directory).unwrap();
}

fn convert_args(source: &Path, destination: &Path) -> ConvertArgs {
    ConvertArgs {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        format: None,
        byte_order: None,
        overwrite: false,
        no_uniqueness_check: false,
    }
}

fn dataset_dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source");
    let destination = dir.path().join("converted");
    write_dataset(&source);
    (dir, source, destination)
}

#[test]
fn test_validate_reports_row_counts() {
    let (_dir, source, _) = dataset_dirs();

    let report = validate_directory(&source, true).unwrap();
    assert!(!report.has_errors());
    assert_eq!(report.tables.len(), TableName::ALL.len());

    let station = &report.tables[TableName::Station.index()];
    assert_eq!(station.declared_rows, 2);
    assert_eq!(station.rows, Some(2));
    assert!(!station.binary);

    let antenna = &report.tables[TableName::Antenna.index()];
    assert_eq!(antenna.declared_rows, 0);
    assert_eq!(antenna.rows, Some(0));
}

#[test]
fn test_validate_reports_broken_table() {
    let (_dir, source, _) = dataset_dirs();
    fs::write(source.join("Station.xml"), "<StationTable><row>").unwrap();

    let report = validate_directory(&source, true).unwrap();
    assert!(report.has_errors());

    let station = &report.tables[TableName::Station.index()];
    assert_eq!(station.rows, None);
    assert!(station.error.as_deref().unwrap().starts_with("Station"));

    let subscan = &report.tables[TableName::Subscan.index()];
    assert!(subscan.is_ok());
    assert_eq!(subscan.rows, Some(1));
}

#[test]
fn test_validate_without_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = validate_directory(dir.path(), true).unwrap_err();
    assert!(format!("{err:#}").contains("ASDM.xml"));
}

#[test]
fn test_convert_to_big_endian_binary() {
    let (_dir, source, destination) = dataset_dirs();
    let mut args = convert_args(&source, &destination);
    args.format = Some(StorageFormatArg::Bin);
    args.byte_order = Some(ByteOrderArg::Big);

    let result = run_convert(&args).unwrap();
    assert_eq!(result.destination, destination);
    assert!(destination.join("Station.bin").is_file());
    assert!(destination.join("Subscan.bin").is_file());
    assert!(!destination.join("Antenna.bin").exists());

    let report = validate_directory(&destination, true).unwrap();
    assert!(!report.has_errors());
    let station = &report.tables[TableName::Station.index()];
    assert!(station.binary);
    assert_eq!(station.rows, Some(2));

    let message = fs::read(destination.join("Station.bin")).unwrap();
    let text = String::from_utf8_lossy(&message);
    assert!(text.contains("Big_Endian"));
}

#[test]
fn test_convert_refuses_existing_dataset_without_overwrite() {
    let (_dir, source, destination) = dataset_dirs();
    run_convert(&convert_args(&source, &destination)).unwrap();

    let err = run_convert(&convert_args(&source, &destination)).unwrap_err();
    assert!(format!("{err:#}").contains("already exists"));

    let mut args = convert_args(&source, &destination);
    args.overwrite = true;
    args.format = Some(StorageFormatArg::Xml);
    let result = run_convert(&args).unwrap();
    let subscan = &result.tables[TableName::Subscan.index()];
    assert_eq!(subscan.rows, Some(1));
    assert!(!subscan.binary);
}

#[test]
fn test_convert_reports_manifest_row_counts() {
    let (_dir, source, destination) = dataset_dirs();
    let manifest_path = source.join("ASDM.xml");
    let manifest = fs::read_to_string(&manifest_path).unwrap();
    let station = manifest.find("<Name>Station</Name>").unwrap();
    let count = station + manifest[station..].find("<NumberRows>2</NumberRows>").unwrap();
    let edited = format!(
        "{}<NumberRows>5</NumberRows>{}",
        &manifest[..count],
        &manifest[count + "<NumberRows>2</NumberRows>".len()..]
    );
    fs::write(&manifest_path, edited).unwrap();

    let result = run_convert(&convert_args(&source, &destination)).unwrap();
    let station = &result.tables[TableName::Station.index()];
    assert_eq!(station.declared_rows, 5);
    assert_eq!(station.rows, Some(2));

    let subscan = &result.tables[TableName::Subscan.index()];
    assert_eq!(subscan.declared_rows, 1);
    assert_eq!(subscan.rows, Some(1));
}

#[test]
fn test_validation_report_as_json() {
    let (_dir, source, _) = dataset_dirs();
    let report = validate_directory(&source, true).unwrap();

    let json: serde_json::Value = serde_json::from_str(&validation_json(&report).unwrap()).unwrap();
    let tables = json["tables"].as_array().unwrap();
    assert_eq!(tables.len(), TableName::ALL.len());
    assert_eq!(tables[TableName::Station.index()]["table"], "Station");
    assert_eq!(tables[TableName::Station.index()]["rows"], 2);
    assert!(tables[TableName::Station.index()]["error"].is_null());
}
