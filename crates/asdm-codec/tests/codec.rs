//! Value, stream and envelope codecs exercised through the public API.

#![allow(missing_docs)]

use asdm_codec::{
    BinReader, BinWriter, BinaryTableHeader, ByteOrder, XmlElement, build_mime, format_array,
    format_matrix, parse_array, parse_matrix, split_mime,
};
use asdm_model::{ArrayTime, Entity, PolarizationType, StokesParameter, Tag, TagType};
use proptest::prelude::*;

fn byte_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::LittleEndian), Just(ByteOrder::BigEndian)]
}

proptest! {
    #[test]
    fn prop_string_arrays_keep_inner_spaces(values in prop::collection::vec("[ -~]{0,20}", 0..8)) {
        let text = format_array(&values);
        prop_assert_eq!(parse_array::<String>(&text).unwrap(), values);
    }

    #[test]
    fn prop_integer_matrices(rows in 0usize..5, columns in 1usize..5, seed in any::<i32>()) {
        let matrix: Vec<Vec<i32>> = (0..rows)
            .map(|r| (0..columns).map(|c| seed.wrapping_add((r * columns + c) as i32)).collect())
            .collect();
        let text = format_matrix(&matrix).unwrap();
        prop_assert_eq!(parse_matrix::<i32>(&text).unwrap(), matrix);
    }

    #[test]
    fn prop_primitives_follow_byte_order(
        order in byte_order(),
        int in any::<i32>(),
        long in any::<i64>(),
        double in any::<f64>().prop_filter("NaN never compares equal", |v| !v.is_nan()),
        text in "\\PC{0,16}",
    ) {
        let mut w = BinWriter::new(order);
        w.write_i32(int);
        w.write_i64(long);
        w.write_f64(double);
        w.write_str(&text).unwrap();
        let bytes = w.into_inner();

        let expected_int = match order {
            ByteOrder::BigEndian => int.to_be_bytes(),
            ByteOrder::LittleEndian => int.to_le_bytes(),
        };
        prop_assert_eq!(&bytes[..4], &expected_int[..]);

        let mut r = BinReader::new(&bytes, order);
        prop_assert_eq!(r.read_i32().unwrap(), int);
        prop_assert_eq!(r.read_i64().unwrap(), long);
        prop_assert_eq!(r.read_f64().unwrap(), double);
        prop_assert_eq!(r.read_string().unwrap(), text);
        prop_assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn prop_mime_body_is_recovered(body in prop::collection::vec(any::<u8>(), 0..256)) {
        let header = "<StationTable><Entity/></StationTable>";
        let message = build_mime("uid://X0/X0/X0", header, &body);
        let parts = split_mime(&message).unwrap();
        prop_assert_eq!(parts.header_xml, header);
        prop_assert_eq!(parts.body, &body[..]);
    }
}

#[test]
fn test_split_mime_with_crlf_framing() {
    let body = [0u8, 0, 0, 1, b'\r', b'\n', 7];
    let lf = build_mime("uid://A002/X1/X2", "<SubscanTable/>", &body);
    let text = String::from_utf8_lossy(&lf[..lf.len() - body.len() - 19]).replace('\n', "\r\n");
    let mut crlf = text.into_bytes();
    crlf.extend_from_slice(&body);
    crlf.extend_from_slice(b"\r\n--MIME_boundary--\r\n");

    let parts = split_mime(&crlf).unwrap();
    assert_eq!(parts.header_xml, "<SubscanTable/>");
    assert_eq!(parts.body, &body);
}

#[test]
fn test_split_mime_requires_both_parts() {
    assert!(split_mime(b"MIME-Version: 1.0\n\nno parts here").is_err());

    let message = build_mime("uid://X0/X0/X0", "<x/>", b"abc");
    let text = String::from_utf8(message).unwrap();
    let without_body = text.replace("Content-ID: <content.bin>", "Content-ID: <other>");
    assert!(split_mime(without_body.as_bytes()).is_err());
}

#[test]
fn test_header_round_trip_keeps_attribute_order() {
    let header = BinaryTableHeader {
        entity: Entity::for_type("SubscanTable"),
        container_entity: Entity::for_type("ASDM"),
        byte_order: ByteOrder::BigEndian,
        attributes: vec![
            "subscanNumber".to_string(),
            "execBlockId".to_string(),
            "scanNumber".to_string(),
        ],
        legacy: false,
    };
    let xml = header.to_xml("Subscan").unwrap();
    let parsed = BinaryTableHeader::parse(&xml, "Subscan", &[]).unwrap();
    assert_eq!(parsed, header);

    let err = BinaryTableHeader::parse(&xml, "Station", &[]).unwrap_err();
    assert!(err.to_string().contains("StationTable"));
}

#[test]
fn test_row_values_in_documents() {
    let doc = XmlElement::parse_document(
        "<row>\
           <execBlockId>ExecBlock_3</execBlockId>\
           <startTime>4981000000000000000</startTime>\
           <corrType>1 2 XX YY</corrType>\
           <corrProduct>2 2 2 X X Y Y</corrProduct>\
           <comments>1 2 \"rain &amp; wind\" \"\"</comments>\
         </row>",
    )
    .unwrap();

    assert_eq!(
        doc.value::<Tag>("execBlockId").unwrap(),
        Tag::new(3, TagType::ExecBlock)
    );
    assert_eq!(
        doc.value::<ArrayTime>("startTime").unwrap(),
        ArrayTime::from_nanoseconds(4_981_000_000_000_000_000)
    );
    assert_eq!(
        doc.array::<StokesParameter>("corrType").unwrap(),
        vec![StokesParameter::XX, StokesParameter::YY]
    );
    assert_eq!(
        doc.matrix::<PolarizationType>("corrProduct").unwrap(),
        vec![
            vec![PolarizationType::X, PolarizationType::X],
            vec![PolarizationType::Y, PolarizationType::Y]
        ]
    );
    assert_eq!(
        doc.array::<String>("comments").unwrap(),
        vec!["rain & wind".to_string(), String::new()]
    );
    assert_eq!(doc.optional_value::<i32>("flagRow").unwrap(), None);
    assert!(doc.value::<i32>("flagRow").is_err());
}

#[test]
fn test_truncated_stream() {
    let mut w = BinWriter::new(ByteOrder::LittleEndian);
    w.write_str("Station_0").unwrap();
    let bytes = w.into_inner();

    let mut r = BinReader::new(&bytes[..6], ByteOrder::LittleEndian);
    assert!(r.read_string().is_err());
}
