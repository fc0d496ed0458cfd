//! Boundary Tests for dataexport
//!
//! Empty datasets, unusual record shapes and property-based checks of the
//! table layout.

use dataexport::{
    ColumnSpec, DataExportError, ExcelSerializer, Serializer, DEFAULT_WORKSHEET_NAME,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Number of `<td>` cells in the first `<tr>` of the table (the header)
fn header_cell_count(document: &str) -> usize {
    let start = document.find("<table><tr>").expect("header row");
    let header = &document[start..];
    let end = header.find("</tr>").expect("header end");
    count(&header[..end], "<td>")
}

#[test]
fn test_empty_dataset_without_mapping() {
    let serializer = ExcelSerializer::new();
    assert!(matches!(
        serializer.transform(&[]),
        Err(DataExportError::EmptyDataset)
    ));
}

#[test]
fn test_empty_dataset_with_mapping_is_header_only() {
    let mut serializer = ExcelSerializer::new();
    serializer.set_mapping(Some(vec![ColumnSpec::new("a", "A"), ColumnSpec::new("b", "B")]));

    let document = serializer.transform(&[]).unwrap();
    assert_eq!(count(&document, "<tr>"), 1);
    assert!(document.contains("<table><tr><td>A</td><td>B</td></tr></table>"));
}

#[test]
fn test_empty_mapping_renders_empty_rows() {
    let mut serializer = ExcelSerializer::new();
    serializer.set_mapping(Some(Vec::new()));

    let document = serializer.transform(&[json!({"a": 1}), json!({"a": 2})]).unwrap();
    assert!(document.contains("<table><tr></tr><tr></tr><tr></tr></table>"));
}

#[test]
fn test_first_record_empty_object() {
    let serializer = ExcelSerializer::new();
    let document = serializer.transform(&[json!({}), json!({"a": 1})]).unwrap();

    assert!(document.contains("<table><tr></tr><tr></tr><tr><td>1</td></tr></table>"));
}

#[test]
fn test_first_record_not_enumerable() {
    let serializer = ExcelSerializer::new();
    for record in [json!(null), json!(true), json!(1.5), json!("text")] {
        assert!(matches!(
            serializer.transform(&[record]),
            Err(DataExportError::UnsupportedEnvironment(_))
        ));
    }
}

#[test]
fn test_unicode_values_pass_through() {
    let serializer = ExcelSerializer::new();
    let document = serializer
        .transform(&[json!({"名前": "山田太郎", "emoji": "🦀"})])
        .unwrap();

    assert!(document.contains("<tr><td>名前</td><td>emoji</td></tr>"));
    assert!(document.contains("<tr><td>山田太郎</td><td>🦀</td></tr>"));
}

#[test]
fn test_markup_in_values_is_not_escaped() {
    let serializer = ExcelSerializer::new();
    let document = serializer
        .transform(&[json!({"html": "<b>bold</b> & more"})])
        .unwrap();

    assert!(document.contains("<td><b>bold</b> & more</td>"));
}

#[test]
fn test_large_dataset_row_count() {
    let records: Vec<Value> = (0..10_000).map(|i| json!({"n": i})).collect();
    let document = ExcelSerializer::new().transform(&records).unwrap();

    assert_eq!(count(&document, "<tr>"), 10_001);
    assert!(document.contains("<tr><td>9999</td></tr>"));
}

#[test]
fn test_worksheet_metadata_present() {
    let document = ExcelSerializer::new().transform(&[json!({"a": 1})]).unwrap();

    assert!(document.contains("xmlns:o='urn:schemas-microsoft-com:office:office'"));
    assert!(document.contains("xmlns:x='urn:schemas-microsoft-com:office:excel'"));
    assert!(document.contains(&format!("<x:Name>{}</x:Name>", DEFAULT_WORKSHEET_NAME)));
    assert!(document.contains("<x:DisplayGridlines/>"));
}

fn record_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,6}", 0i64..1000), 1..6).prop_map(|pairs| {
        let mut map = Map::new();
        for (key, value) in pairs {
            map.insert(key, json!(value));
        }
        Value::Object(map)
    })
}

proptest! {
    #[test]
    fn prop_body_rows_match_record_count(records in prop::collection::vec(record_strategy(), 1..20)) {
        let document = ExcelSerializer::new().transform(&records).unwrap();
        prop_assert_eq!(count(&document, "<tr>"), records.len() + 1);
    }

    #[test]
    fn prop_inferred_header_matches_first_record(records in prop::collection::vec(record_strategy(), 1..10)) {
        let document = ExcelSerializer::new().transform(&records).unwrap();
        let first_keys = records[0].as_object().unwrap().len();
        prop_assert_eq!(header_cell_count(&document), first_keys);
    }

    #[test]
    fn prop_mapped_header_matches_mapping(
        records in prop::collection::vec(record_strategy(), 0..10),
        fields in prop::collection::vec("[a-z]{0,4}", 0..8),
    ) {
        let mapping: Vec<ColumnSpec> = fields
            .iter()
            .enumerate()
            .map(|(i, field)| ColumnSpec::new(field.clone(), format!("Col{}", i)))
            .collect();
        let mut serializer = ExcelSerializer::new();
        serializer.set_mapping(Some(mapping));

        let document = serializer.transform(&records).unwrap();
        prop_assert_eq!(header_cell_count(&document), fields.len());
        prop_assert_eq!(count(&document, "<tr>"), records.len() + 1);

        let body_cells = fields.iter().filter(|f| !f.is_empty()).count() * records.len();
        prop_assert_eq!(count(&document, "<td>"), fields.len() + body_cells);
    }

    #[test]
    fn prop_transform_is_deterministic(records in prop::collection::vec(record_strategy(), 1..10)) {
        let serializer = ExcelSerializer::new();
        let first = serializer.transform(&records).unwrap();
        let second = serializer.transform(&records).unwrap();
        prop_assert_eq!(first, second);
    }
}
