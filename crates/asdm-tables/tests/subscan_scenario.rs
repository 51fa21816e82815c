//! A subscan added, found, written and read back.

#![allow(missing_docs)]

use asdm_model::{ArrayTime, Entity, SubscanIntent, Tag, TagType};
use asdm_tables::{AsdmRow, SubscanTable, XmlSerializable};

#[test]
fn test_subscan_lifecycle() {
    let exec_block = Tag::new(1, TagType::ExecBlock);
    let mut table = SubscanTable::new();
    let row = table.new_row_with(
        exec_block,
        1,
        1,
        ArrayTime::from_nanoseconds(4_981_000_000_000_000_000),
        ArrayTime::from_nanoseconds(4_981_000_030_000_000_000),
        "J0538-4405",
        SubscanIntent::OnSource,
        vec![10; 6],
    );
    table.add(row.clone()).unwrap();

    let found = table.get_row_by_key_parts(exec_block, 1, 1).unwrap();
    assert_eq!(found, &row);
    assert!(found.is_added());
    assert_eq!(found.number_integration(), 6);

    let xml = table.to_xml(&Entity::for_type("ASDM")).unwrap();
    let mut fresh = SubscanTable::new();
    fresh.from_xml(&xml, true).unwrap();
    assert_eq!(fresh.get_row_by_key_parts(exec_block, 1, 1), Some(&row));

    table.add(row).unwrap();
    assert_eq!(table.size(), 1);
}
