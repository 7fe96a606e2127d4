use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;
use ukvax::models::{DoseStage, Observation};
use ukvax::storage;

fn rows() -> Vec<Observation> {
    let d = NaiveDate::from_ymd_opt(2021, 2, 14).unwrap();
    vec![
        Observation {
            date: d,
            nation: "England".into(),
            stage: DoseStage::First,
            value: Some(13_000_000),
        },
        Observation {
            date: d,
            nation: "England".into(),
            stage: DoseStage::Second,
            value: None,
        },
        Observation {
            date: d,
            nation: "=HYPERLINK(\"x\")".into(),
            stage: DoseStage::First,
            value: Some(1),
        },
    ]
}

#[test]
fn csv_round_trip_keeps_missing_counts() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("long.csv");
    storage::save_csv(&rows(), &p).unwrap();

    let text = fs::read_to_string(&p).unwrap();
    assert!(text.starts_with("date,nation,stage,value"));
    assert!(text.contains("2021-02-14,England,Second,\n"));

    let back = storage::load_csv(&p).unwrap();
    assert_eq!(back, rows());
}

#[test]
fn formula_like_names_are_neutralised_on_disk() {
    let mut buf = Vec::new();
    storage::write_csv(&rows(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("'=HYPERLINK"));
    assert!(!text.contains(",=HYPERLINK"));
}

#[test]
fn json_is_an_array_of_observations() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("long.json");
    storage::save_json(&rows(), &p).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&p).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["stage"], "First");
    assert!(arr[1]["value"].is_null());
}

#[test]
fn loading_a_missing_file_names_it() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("absent.csv");
    let err = storage::load_csv(&p).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}
