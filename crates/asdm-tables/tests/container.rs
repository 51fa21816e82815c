//! Whole datasets on disk.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use asdm_codec::ByteOrder;
use asdm_model::{
    AntennaMake, AntennaType, ArrayTime, AtmPhaseCorrection, BasebandName, CorrelationMode,
    Entity, EntityId, Frequency, Length, NetSideband, PolarizationType, ProcessorSubType,
    ProcessorType, SidebandProcessingMode, SpectralResolutionType, StationType, StokesParameter,
    SubscanIntent, Tag, TagType, WindowFunction,
};
use asdm_tables::{
    AntennaRow, Asdm, AsdmError, ConfigDescriptionRow, DataDescriptionRow, ExecBlockGeometry,
    ExecBlockIdentity, ExecBlockRow, ParseOptions, PolarizationRow, ProcessorRow, SaveOptions,
    SpectralWindowRow, StationRow, StorageFormat, SubscanRow, TableName,
};
use tempfile::TempDir;

fn sample_dataset() -> Asdm {
    let mut asdm = Asdm::new();
    asdm.set_entity(Entity::new(
        EntityId::new("uid://A002/Xc3a/X1").unwrap(),
        "ASDM",
    ));
    asdm.set_time_of_creation(ArrayTime::from_nanoseconds(5_000_000_000_000_000_000));

    let stations = asdm.table_mut::<StationRow>().unwrap();
    let mut station_ids = Vec::new();
    for (name, x) in [("A001", 1.5), ("A002", -2.25)] {
        let row = stations.new_row_with(
            name,
            vec![Length::new(x), Length::new(0.0), Length::new(6.4e6)],
            StationType::AntennaPad,
        );
        station_ids.push(stations.add(row).unwrap().station_id());
    }

    let antennas = asdm.table_mut::<AntennaRow>().unwrap();
    let mut antenna_ids = Vec::new();
    for (name, station) in [("DA41", station_ids[0]), ("DV02", station_ids[1])] {
        let row = antennas.new_row_with(
            name,
            AntennaMake::Aem12,
            AntennaType::GroundBased,
            Length::new(12.0),
            vec![Length::new(0.0); 3],
            vec![Length::new(0.0); 3],
            ArrayTime::from_nanoseconds(7),
            station,
        );
        antenna_ids.push(antennas.add(row).unwrap().antenna_id());
    }

    let windows = asdm.table_mut::<SpectralWindowRow>().unwrap();
    let mut window = windows.new_row_with(
        BasebandName::Bb1,
        NetSideband::Upper,
        128,
        Frequency::new(9.0e10),
        SidebandProcessingMode::None,
        Frequency::new(2.0e9),
        WindowFunction::Hanning,
    );
    window.set_chan_freq_array(vec![Frequency::new(9.0e10), Frequency::new(9.0156e10)]);
    window.set_name("ALMA_RB_03#BB_1#SW-01#FULL_RES");
    let window_id = windows.add(window).unwrap().spectral_window_id();

    let polarizations = asdm.table_mut::<PolarizationRow>().unwrap();
    let row = polarizations.new_row_with(
        2,
        vec![StokesParameter::XX, StokesParameter::YY],
        vec![
            vec![PolarizationType::X, PolarizationType::X],
            vec![PolarizationType::Y, PolarizationType::Y],
        ],
    );
    let polarization_id = polarizations.add(row).unwrap().polarization_id();

    let descriptions = asdm.table_mut::<DataDescriptionRow>().unwrap();
    let row = descriptions.new_row_with(polarization_id, window_id);
    let description_id = descriptions.add(row).unwrap().data_description_id();

    let processors = asdm.table_mut::<ProcessorRow>().unwrap();
    let row = processors.new_row_with(
        Tag::new(0, TagType::CorrelatorMode),
        ProcessorType::Correlator,
        ProcessorSubType::AlmaCorrelatorMode,
    );
    let processor_id = processors.add(row).unwrap().processor_id();

    let configs = asdm.table_mut::<ConfigDescriptionRow>().unwrap();
    let row = configs.new_row_with(
        CorrelationMode::CrossAndAuto,
        vec![AtmPhaseCorrection::Uncorrected, AtmPhaseCorrection::Corrected],
        ProcessorType::Correlator,
        SpectralResolutionType::FullResolution,
        antenna_ids.clone(),
        vec![0, 0],
        vec![Tag::new(0, TagType::SwitchCycle)],
        vec![description_id],
        processor_id,
    );
    configs.add(row).unwrap();

    let exec_blocks = asdm.table_mut::<ExecBlockRow>().unwrap();
    let identity = ExecBlockIdentity {
        exec_block_num: 1,
        exec_block_uid: "uid://A002/Xc3a/X2".to_string(),
        project_id: "2023.1.00001.S".to_string(),
        config_name: "C43-4".to_string(),
        telescope_name: "ALMA".to_string(),
        observer_name: "observer one".to_string(),
        observing_log: String::new(),
        session_reference: "uid://A002/Xc3a/X3".to_string(),
        sb_summary: "uid://A002/Xc3a/X4".to_string(),
        scheduler_mode: "DYNAMIC".to_string(),
        sb_summary_id: Tag::new(0, TagType::SBSummary),
    };
    let row = exec_blocks.new_row_with(
        ArrayTime::from_nanoseconds(1_000),
        ArrayTime::from_nanoseconds(9_000),
        identity,
        ExecBlockGeometry::default(),
        false,
        antenna_ids,
    );
    let exec_block_id = exec_blocks.add(row).unwrap().exec_block_id();

    let subscans = asdm.table_mut::<SubscanRow>().unwrap();
    for number in 1..=3 {
        let row = subscans.new_row_with(
            exec_block_id,
            1,
            number,
            ArrayTime::from_nanoseconds(1_000 * i64::from(number)),
            ArrayTime::from_nanoseconds(1_000 * i64::from(number) + 500),
            "J1924-2914",
            SubscanIntent::OnSource,
            vec![2, 2, 2],
        );
        subscans.add(row).unwrap();
    }
    asdm
}

fn assert_same_rows(left: &Asdm, right: &Asdm) {
    assert_eq!(
        left.table::<StationRow>().unwrap().get(),
        right.table::<StationRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<AntennaRow>().unwrap().get(),
        right.table::<AntennaRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<SpectralWindowRow>().unwrap().get(),
        right.table::<SpectralWindowRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<PolarizationRow>().unwrap().get(),
        right.table::<PolarizationRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<DataDescriptionRow>().unwrap().get(),
        right.table::<DataDescriptionRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<ProcessorRow>().unwrap().get(),
        right.table::<ProcessorRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<ConfigDescriptionRow>().unwrap().get(),
        right.table::<ConfigDescriptionRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<ExecBlockRow>().unwrap().get(),
        right.table::<ExecBlockRow>().unwrap().get()
    );
    assert_eq!(
        left.table::<SubscanRow>().unwrap().get(),
        right.table::<SubscanRow>().unwrap().get()
    );
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_xml_dataset_round_trip() {
    let dir = TempDir::new().unwrap();
    let asdm = sample_dataset();
    asdm.to_file(dir.path()).unwrap();

    let names = file_names(dir.path());
    assert!(names.contains(&"ASDM.xml".to_string()));
    assert!(names.contains(&"Subscan.xml".to_string()));
    assert!(!names.iter().any(|n| n.ends_with(".bin")));

    let loaded = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap();
    assert_eq!(loaded.entity(), asdm.entity());
    assert_eq!(
        loaded.time_of_creation().to_fits(),
        asdm.time_of_creation().to_fits()
    );
    for name in loaded.table_names() {
        assert!(loaded.is_loaded(*name));
        assert_eq!(loaded.number_rows(*name), asdm.number_rows(*name));
    }
    assert_same_rows(&loaded, &asdm);
}

#[test]
fn test_binary_dataset_round_trip() {
    let dir = TempDir::new().unwrap();
    let asdm = sample_dataset();
    let options = SaveOptions::new()
        .with_format(StorageFormat::Binary)
        .with_byte_order(ByteOrder::BigEndian);
    asdm.to_file_with(dir.path(), &options).unwrap();

    let header = fs::read_to_string(dir.path().join("Station.xml")).unwrap();
    assert!(header.contains("<BulkStoreRef"));
    assert!(header.contains("Big_Endian"));
    assert!(dir.path().join("Station.bin").is_file());

    let loaded = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap();
    assert_same_rows(&loaded, &asdm);
    assert!(loaded.get_table("Station").unwrap().is_file_as_bin());
}

#[test]
fn test_binary_table_keeps_its_mode_on_save() {
    let dir = TempDir::new().unwrap();
    let mut asdm = sample_dataset();
    asdm.table_mut::<StationRow>().unwrap().set_file_as_bin(true);
    asdm.to_file(dir.path()).unwrap();

    assert!(dir.path().join("Station.bin").is_file());
    assert!(!dir.path().join("Antenna.bin").exists());

    let loaded = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap();
    assert_same_rows(&loaded, &asdm);
}

#[test]
fn test_tables_load_on_demand() {
    let dir = TempDir::new().unwrap();
    sample_dataset().to_file(dir.path()).unwrap();

    let options = ParseOptions::new().with_load_tables_on_demand(true);
    let loaded = Asdm::from_directory(dir.path(), &options).unwrap();
    for name in loaded.table_names() {
        assert!(!loaded.is_loaded(*name));
    }
    assert_eq!(loaded.number_rows(TableName::Subscan), 3);

    let subscans = loaded.table::<SubscanRow>().unwrap();
    assert_eq!(subscans.size(), 3);
    assert!(loaded.is_loaded(TableName::Subscan));
    assert!(!loaded.is_loaded(TableName::Station));
}

#[test]
fn test_on_demand_load_reports_broken_table_file() {
    let dir = TempDir::new().unwrap();
    sample_dataset().to_file(dir.path()).unwrap();
    fs::write(dir.path().join("Station.xml"), "<NotATable/>").unwrap();

    let options = ParseOptions::new().with_load_tables_on_demand(true);
    let loaded = Asdm::from_directory(dir.path(), &options).unwrap();
    let err = loaded.table::<StationRow>().unwrap_err();
    assert!(matches!(err, AsdmError::Conversion { .. }));

    let err = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap_err();
    assert!(err.to_string().starts_with("Station:"));
}

#[test]
fn test_save_refuses_existing_dataset() {
    let dir = TempDir::new().unwrap();
    let asdm = sample_dataset();
    asdm.to_file(dir.path()).unwrap();

    let err = asdm.to_file(dir.path()).unwrap_err();
    assert!(err.to_string().contains("already exists"));

    asdm.to_file_with(dir.path(), &SaveOptions::new().with_overwrite(true))
        .unwrap();
}

#[test]
fn test_save_over_source_directory() {
    let dir = TempDir::new().unwrap();
    let asdm = sample_dataset();
    asdm.to_file(dir.path()).unwrap();

    let options = ParseOptions::new().with_load_tables_on_demand(true);
    let loaded = Asdm::from_directory(dir.path(), &options).unwrap();
    loaded
        .to_file_with(
            dir.path(),
            &SaveOptions::new()
                .with_overwrite(true)
                .with_format(StorageFormat::Binary),
        )
        .unwrap();

    let reloaded = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap();
    assert_same_rows(&reloaded, &asdm);
}

#[test]
fn test_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let err = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, AsdmError::Conversion { .. }));
    assert!(err.to_string().contains("ASDM.xml not found"));

    fs::write(dir.path().join("ASDM.bin"), b"binary").unwrap();
    let err = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap_err();
    assert!(err.to_string().contains("binary manifests are not supported"));
}

#[test]
fn test_unknown_manifest_table_is_ignored() {
    let dir = TempDir::new().unwrap();
    sample_dataset().to_file(dir.path()).unwrap();

    let manifest = dir.path().join("ASDM.xml");
    let xml = fs::read_to_string(&manifest).unwrap();
    let extra = "<Table><Name>Pointing</Name><NumberRows>12</NumberRows></Table></ASDM>";
    fs::write(&manifest, xml.replace("</ASDM>", extra)).unwrap();

    let loaded = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap();
    assert_eq!(loaded.number_rows(TableName::Subscan), 3);
}

#[test]
fn test_empty_tables_have_no_file() {
    let dir = TempDir::new().unwrap();
    let mut asdm = Asdm::new();
    let stations = asdm.table_mut::<StationRow>().unwrap();
    let row = stations.new_row_with("A001", vec![Length::new(1.0)], StationType::AntennaPad);
    stations.add(row).unwrap();
    asdm.to_file(dir.path()).unwrap();

    assert_eq!(file_names(dir.path()), vec!["ASDM.xml", "Station.xml"]);
    let manifest = fs::read_to_string(dir.path().join("ASDM.xml")).unwrap();
    assert!(manifest.contains("<Name>Antenna</Name>"));
    assert!(manifest.contains("entityTypeName=\"StationTable\""));
    assert!(!manifest.contains("entityTypeName=\"AntennaTable\""));

    let loaded = Asdm::from_directory(dir.path(), &ParseOptions::default()).unwrap();
    assert_eq!(loaded.number_rows(TableName::Station), 1);
    assert!(loaded.table::<AntennaRow>().unwrap().is_empty());
}

#[test]
fn test_table_lookup_by_name() {
    let asdm = sample_dataset();
    assert_eq!(asdm.get_table("ExecBlock").unwrap().size(), 1);
    assert_eq!(
        asdm.get_table("SpectralWindow").unwrap().entity().entity_type_name,
        "SpectralWindowTable"
    );
    let err = asdm.get_table("Weather").err().unwrap();
    assert!(matches!(err, AsdmError::InvalidArgument { .. }));
}
