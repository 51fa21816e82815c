//! Navigation from a row to the rows its foreign keys name.

#![allow(missing_docs)]

use asdm_model::{
    AntennaMake, AntennaType, ArrayTime, AtmPhaseCorrection, BasebandName, CorrelationMode,
    Frequency, Length, NetSideband, PolarizationType, ProcessorSubType, ProcessorType,
    SidebandProcessingMode, SpectralResolutionType, StationType, StokesParameter, Tag, TagType,
    WindowFunction,
};
use asdm_tables::{
    AntennaRow, Asdm, AsdmError, ConfigDescriptionRow, DataDescriptionRow, PolarizationRow,
    ProcessorRow, SpectralWindowRow, StationRow,
};

fn add_station(asdm: &mut Asdm, name: &str) -> Tag {
    let stations = asdm.table_mut::<StationRow>().unwrap();
    let row = stations.new_row_with(name, vec![Length::new(1.0)], StationType::AntennaPad);
    stations.add(row).unwrap().station_id()
}

fn antenna(asdm: &mut Asdm, name: &str, station: Tag) -> AntennaRow {
    asdm.table_mut::<AntennaRow>().unwrap().new_row_with(
        name,
        AntennaMake::Vertex12,
        AntennaType::GroundBased,
        Length::new(12.0),
        vec![Length::new(0.0); 3],
        vec![Length::new(0.0); 3],
        ArrayTime::from_nanoseconds(0),
        station,
    )
}

fn add_antenna(asdm: &mut Asdm, row: AntennaRow) -> Tag {
    asdm.table_mut::<AntennaRow>()
        .unwrap()
        .add(row)
        .unwrap()
        .antenna_id()
}

#[test]
fn test_antenna_resolves_its_station() {
    let mut asdm = Asdm::new();
    let station = add_station(&mut asdm, "A001");
    let row = antenna(&mut asdm, "DA41", station);
    let id = add_antenna(&mut asdm, row);

    let antenna = asdm.table::<AntennaRow>().unwrap().row_by_key(&id).unwrap();
    assert_eq!(antenna.station_using_station_id(&asdm).unwrap().name(), "A001");
}

#[test]
fn test_dangling_station_is_no_such_row() {
    let mut asdm = Asdm::new();
    let row = antenna(&mut asdm, "DA41", Tag::new(9, TagType::Station));
    let id = add_antenna(&mut asdm, row);

    let antenna = asdm.table::<AntennaRow>().unwrap().row_by_key(&id).unwrap();
    let err = antenna.station_using_station_id(&asdm).unwrap_err();
    assert!(matches!(err, AsdmError::NoSuchRow { .. }));
    assert_eq!(err.to_string(), "Station: no row with key Station_9");
}

#[test]
fn test_absent_optional_link_is_illegal_access() {
    let mut asdm = Asdm::new();
    let station = add_station(&mut asdm, "A001");
    let row = antenna(&mut asdm, "DA41", station);
    let first = add_antenna(&mut asdm, row);

    let antenna_row = asdm.table::<AntennaRow>().unwrap().row_by_key(&first).unwrap();
    let err = antenna_row
        .assoc_antenna_using_assoc_antenna_id(&asdm)
        .unwrap_err();
    assert!(matches!(err, AsdmError::IllegalAccess { .. }));

    let mut row = antenna(&mut asdm, "DA42", station);
    row.set_assoc_antenna_id(first);
    let second = add_antenna(&mut asdm, row);
    let antenna_row = asdm.table::<AntennaRow>().unwrap().row_by_key(&second).unwrap();
    let assoc = antenna_row.assoc_antenna_using_assoc_antenna_id(&asdm).unwrap();
    assert_eq!(assoc.name(), "DA41");
}

#[test]
fn test_collection_links_skip_unresolved_tags() {
    let mut asdm = Asdm::new();
    let station = add_station(&mut asdm, "A001");
    let mut antenna_ids = Vec::new();
    for name in ["DA41", "DA42"] {
        let row = antenna(&mut asdm, name, station);
        antenna_ids.push(add_antenna(&mut asdm, row));
    }
    antenna_ids.insert(1, Tag::new(77, TagType::Antenna));

    let windows = asdm.table_mut::<SpectralWindowRow>().unwrap();
    let row = windows.new_row_with(
        BasebandName::Bb2,
        NetSideband::Lower,
        64,
        Frequency::new(1.0e11),
        SidebandProcessingMode::None,
        Frequency::new(1.875e9),
        WindowFunction::Uniform,
    );
    let window = windows.add(row).unwrap().spectral_window_id();

    let polarizations = asdm.table_mut::<PolarizationRow>().unwrap();
    let row = polarizations.new_row_with(
        1,
        vec![StokesParameter::XX],
        vec![vec![PolarizationType::X, PolarizationType::X]],
    );
    let polarization = polarizations.add(row).unwrap().polarization_id();

    let descriptions = asdm.table_mut::<DataDescriptionRow>().unwrap();
    let row = descriptions.new_row_with(polarization, window);
    let description = descriptions.add(row).unwrap().data_description_id();

    let processors = asdm.table_mut::<ProcessorRow>().unwrap();
    let row = processors.new_row_with(
        Tag::new(0, TagType::CorrelatorMode),
        ProcessorType::Correlator,
        ProcessorSubType::AlmaCorrelatorMode,
    );
    let processor = processors.add(row).unwrap().processor_id();

    let configs = asdm.table_mut::<ConfigDescriptionRow>().unwrap();
    let row = configs.new_row_with(
        CorrelationMode::CrossOnly,
        vec![AtmPhaseCorrection::Uncorrected],
        ProcessorType::Correlator,
        SpectralResolutionType::FullResolution,
        antenna_ids,
        vec![0, 0, 0],
        vec![],
        vec![description, Tag::new(5, TagType::DataDescription)],
        processor,
    );
    assert_eq!(row.num_antenna(), 3);
    let config = configs.add(row).unwrap().config_description_id();

    let row = asdm
        .table::<ConfigDescriptionRow>()
        .unwrap()
        .row_by_key(&config)
        .unwrap();
    let antennas: Vec<&str> = row
        .antennas_using_antenna_id(&asdm)
        .unwrap()
        .into_iter()
        .map(AntennaRow::name)
        .collect();
    assert_eq!(antennas, vec!["DA41", "DA42"]);

    let descriptions = row.data_descriptions_using_data_description_id(&asdm).unwrap();
    assert_eq!(descriptions.len(), 1);
    let description = descriptions[0];
    assert_eq!(
        description
            .spectral_window_using_spectral_window_id(&asdm)
            .unwrap()
            .num_chan(),
        64
    );
    assert_eq!(
        description
            .polarization_using_pol_or_holo_id(&asdm)
            .unwrap()
            .corr_type(),
        &[StokesParameter::XX]
    );
    assert_eq!(
        row.processor_using_processor_id(&asdm)
            .unwrap()
            .processor_sub_type(),
        ProcessorSubType::AlmaCorrelatorMode
    );

    let err = row
        .config_descriptions_using_assoc_config_description_id(&asdm)
        .unwrap_err();
    assert!(matches!(err, AsdmError::IllegalAccess { .. }));
}
