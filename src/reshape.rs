//! Wide → long reshaping of vaccination rows, plus the small derived scalars
//! the renderer needs (time span, latest date, latest value per series).

use crate::models::{DoseStage, Observation, SeriesKey, VaccinationRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Melt the two dose-stage columns into `stage`/`value` pairs.
///
/// Keeps `date` and `nation` as identifiers and returns exactly `2 * rows.len()`
/// observations (null cells stay as `None`), sorted by nation, then date, with
/// `First` before `Second` for the same day.
pub fn melt(rows: &[VaccinationRecord]) -> Vec<Observation> {
    let mut out: Vec<Observation> = DoseStage::ALL
        .iter()
        .flat_map(|&stage| {
            rows.iter().map(move |r| Observation {
                date: r.date,
                nation: r.name.clone(),
                stage,
                value: r.count(stage),
            })
        })
        .collect();
    out.sort_by(|a, b| {
        a.nation
            .cmp(&b.nation)
            .then(a.date.cmp(&b.date))
            .then(a.stage.cmp(&b.stage))
    });
    out
}

/// Earliest and latest observation date.
pub fn date_bounds(obs: &[Observation]) -> Option<(NaiveDate, NaiveDate)> {
    let min = obs.iter().map(|o| o.date).min()?;
    let max = obs.iter().map(|o| o.date).max()?;
    Some((min, max))
}

/// Days between the earliest and latest observation.
pub fn days_elapsed(obs: &[Observation]) -> Option<i64> {
    date_bounds(obs).map(|(min, max)| (max - min).num_days())
}

pub fn latest_date(obs: &[Observation]) -> Option<NaiveDate> {
    date_bounds(obs).map(|(_, max)| max)
}

/// Most recent non-null value of a date-ordered series.
pub fn latest_value(series: &[(NaiveDate, u64)]) -> Option<(NaiveDate, u64)> {
    series.iter().max_by_key(|(d, _)| *d).copied()
}

/// Split observations into per-(nation, stage) series of non-null points, sorted by date.
pub fn group_series(obs: &[Observation]) -> BTreeMap<SeriesKey, Vec<(NaiveDate, u64)>> {
    let mut groups: BTreeMap<SeriesKey, Vec<(NaiveDate, u64)>> = BTreeMap::new();
    for o in obs {
        let entry = groups.entry(SeriesKey::from(o)).or_default();
        if let Some(v) = o.value {
            entry.push((o.date, v));
        }
    }
    for series in groups.values_mut() {
        series.sort_by_key(|(d, _)| *d);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 2, day).unwrap()
    }

    fn rec(day: u32, name: &str, first: Option<u64>, second: Option<u64>) -> VaccinationRecord {
        VaccinationRecord {
            date: d(day),
            name: name.into(),
            first,
            second,
        }
    }

    #[test]
    fn melt_sorts_by_nation_then_date_then_stage() {
        // API order is newest first, nations interleaved
        let rows = vec![
            rec(3, "Wales", Some(30), Some(3)),
            rec(3, "England", Some(300), Some(30)),
            rec(1, "Wales", Some(10), None),
            rec(1, "England", Some(100), Some(10)),
        ];
        let long = melt(&rows);
        let keys: Vec<(&str, u32, DoseStage)> = long
            .iter()
            .map(|o| (o.nation.as_str(), chrono::Datelike::day(&o.date), o.stage))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("England", 1, DoseStage::First),
                ("England", 1, DoseStage::Second),
                ("England", 3, DoseStage::First),
                ("England", 3, DoseStage::Second),
                ("Wales", 1, DoseStage::First),
                ("Wales", 1, DoseStage::Second),
                ("Wales", 3, DoseStage::First),
                ("Wales", 3, DoseStage::Second),
            ]
        );
        assert_eq!(long[5].value, None);
    }

    #[test]
    fn empty_input_has_no_span() {
        assert_eq!(days_elapsed(&[]), None);
        assert_eq!(latest_date(&[]), None);
        assert!(melt(&[]).is_empty());
    }

    #[test]
    fn span_and_latest() {
        let long = melt(&[rec(1, "Wales", Some(1), Some(0)), rec(28, "Wales", Some(9), None)]);
        assert_eq!(days_elapsed(&long), Some(27));
        assert_eq!(latest_date(&long), Some(d(28)));

        let groups = group_series(&long);
        let second = &groups[&SeriesKey {
            nation: "Wales".into(),
            stage: DoseStage::Second,
        }];
        // null on the last day: latest value comes from the day before
        assert_eq!(latest_value(second), Some((d(1), 0)));
    }
}
