use choropleth_check::{
    error::CheckError,
    rows::{
        DATA_FIELD, DataRow, ECODE_FIELD, LABEL_FIELD, build_data_lookup, check_duplicates,
        find_duplicates, read_grid,
    },
};
use encoding_rs::UTF_8;
use proptest::prelude::*;

mod common;

fn keyed(field: &str, keys: &[&str]) -> Vec<DataRow> {
    keys.iter().map(|k| DataRow::new().with(field, k)).collect()
}

#[test]
fn duplicates_listed_in_order_of_first_repeat() {
    let rows = keyed(ECODE_FIELD, &["A", "B", "A", "C", "B", "B"]);
    assert_eq!(
        check_duplicates(&rows, ECODE_FIELD).unwrap_err(),
        CheckError::DuplicateRows(vec!["A".into(), "B".into()])
    );
}

#[test]
fn distinct_keys_pass() {
    let rows = keyed(LABEL_FIELD, &["A", "B", "C", "", "", " "]);
    assert!(check_duplicates(&rows, LABEL_FIELD).is_ok());
}

#[test]
fn whitespace_variants_are_the_same_key() {
    let rows = keyed(ECODE_FIELD, &["E07000008", " E07000008 "]);
    assert_eq!(find_duplicates(&rows, ECODE_FIELD), vec!["E07000008"]);
}

#[test]
fn read_grid_maps_headers_to_fields() {
    let ws = common::TestWorkspace::new();
    let path = ws.write(
        "grid.csv",
        "ecode,data\nE10000003, 12\n,\nE07000008,n/a\n",
    );
    let rows = read_grid(&path, b',', UTF_8, &[ECODE_FIELD, DATA_FIELD]).expect("grid");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get(ECODE_FIELD), "E10000003");
    assert_eq!(rows[0].data(), " 12");
    assert!(rows[1].is_blank());

    let lookup = build_data_lookup(&rows, ECODE_FIELD);
    assert_eq!(lookup.keys().collect::<Vec<_>>(), ["E07000008", "E10000003"]);
    assert_eq!(lookup["E10000003"].data(), "12");
}

#[test]
fn read_grid_rejects_missing_columns() {
    let ws = common::TestWorkspace::new();
    let path = ws.write("grid.csv", "code,value\nE10000003,1\n");
    let err = read_grid(&path, b',', UTF_8, &[ECODE_FIELD]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CheckError>(),
        Some(&CheckError::MissingColumn("ecode".into()))
    );
}

#[test]
fn short_rows_leave_fields_blank() {
    let ws = common::TestWorkspace::new();
    let path = ws.write("grid.tsv", "ecode\tdata\nE10000003\n");
    let rows = read_grid(&path, b'\t', UTF_8, &[]).expect("grid");
    assert_eq!(rows[0].data(), "");
}

proptest! {
    #[test]
    fn each_duplicate_reported_once(keys in proptest::collection::vec("[A-D ]{0,2}", 0..20)) {
        let rows = keyed(ECODE_FIELD, &keys.iter().map(String::as_str).collect::<Vec<_>>());
        let duplicates = find_duplicates(&rows, ECODE_FIELD);
        let mut deduped = duplicates.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), duplicates.len());
        for key in &duplicates {
            prop_assert!(!key.is_empty());
            let count = keys.iter().filter(|k| k.trim() == key).count();
            prop_assert!(count >= 2);
        }
    }
}
