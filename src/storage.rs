use crate::models::Observation;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const CSV_HEADER: [&str; 4] = ["date", "nation", "stage", "value"];

/// Characters that make spreadsheet apps treat a cell as a formula.
const FORMULA_STARTERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Prefix risky text cells with `'` so they open as plain text.
fn guard_cell(s: &str) -> String {
    match s.chars().next() {
        Some(c) if FORMULA_STARTERS.contains(&c) => format!("'{s}"),
        _ => s.to_string(),
    }
}

fn unguard_cell(s: &str) -> String {
    match s.strip_prefix('\'') {
        Some(rest) if rest.starts_with(FORMULA_STARTERS) => rest.to_string(),
        _ => s.to_string(),
    }
}

/// Write the long-form table as CSV (with header) to any writer.
pub fn write_csv<W: Write>(obs: &[Observation], out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for o in obs {
        wtr.serialize((
            o.date.format("%Y-%m-%d").to_string(),
            guard_cell(&o.nation),
            o.stage.label(),
            o.value,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save observations as CSV with header.
pub fn save_csv<P: AsRef<Path>>(obs: &[Observation], path: P) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(obs, f)
}

/// Save observations as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(obs: &[Observation], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(obs)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Read a long-form CSV written by [`save_csv`].
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<Observation>().enumerate() {
        let mut o = rec.with_context(|| format!("{}: row {}", path.display(), i + 1))?;
        o.nation = unguard_cell(&o.nation);
        out.push(o);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoseStage;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let obs = vec![Observation {
            date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            nation: "Scotland".into(),
            stage: DoseStage::First,
            value: Some(1_500_000),
        }];
        save_csv(&obs, &csvp).unwrap();
        save_json(&obs, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }

    #[test]
    fn guard_round_trips() {
        assert_eq!(guard_cell("=cmd"), "'=cmd");
        assert_eq!(guard_cell("Wales"), "Wales");
        assert_eq!(unguard_cell("'=cmd"), "=cmd");
        assert_eq!(unguard_cell("'quoted"), "'quoted");
    }
}
