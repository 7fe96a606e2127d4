use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vaccination milestone distinguished in the long-form table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DoseStage {
    First,
    Second,
}

impl DoseStage {
    /// All stages in plotting/legend order.
    pub const ALL: [DoseStage; 2] = [DoseStage::First, DoseStage::Second];

    pub fn label(&self) -> &'static str {
        match self {
            DoseStage::First => "First",
            DoseStage::Second => "Second",
        }
    }

    /// Position in [`DoseStage::ALL`]; used to pick palette colors.
    pub fn index(&self) -> usize {
        match self {
            DoseStage::First => 0,
            DoseStage::Second => 1,
        }
    }
}

impl fmt::Display for DoseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw wide row as returned by the API for the default vaccination structure.
///
/// The field names match the *output* names of the query structure
/// (`Date`, `Name`, `First`, `Second`), not the API's source metric names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Name")]
    pub name: String,
    /// The API reports `null` for days before a series starts.
    #[serde(rename = "First", default, deserialize_with = "de_opt_count")]
    pub first: Option<u64>,
    #[serde(rename = "Second", default, deserialize_with = "de_opt_count")]
    pub second: Option<u64>,
}

impl VaccinationRecord {
    /// Count for one dose stage (the "column" melted by the reshaper).
    pub fn count(&self, stage: DoseStage) -> Option<u64> {
        match stage {
            DoseStage::First => self.first,
            DoseStage::Second => self.second,
        }
    }
}

/// Tidy structure used by this crate (one row = one observation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub nation: String,
    pub stage: DoseStage,
    /// Cumulative recipients as of `date`; `None` when the source cell was null.
    pub value: Option<u64>,
}

/// Grouping key used when splitting observations into plotted series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeriesKey {
    pub nation: String,
    pub stage: DoseStage,
}

impl From<&Observation> for SeriesKey {
    fn from(o: &Observation) -> Self {
        Self {
            nation: o.nation.clone(),
            stage: o.stage,
        }
    }
}

/// Serde helper: parse an optional count from `null`, a JSON number or a numeric string.
///
/// Float values are accepted when they carry no fractional part (some API
/// mirrors serialize counts as `123.0`).
fn de_opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "null, a non-negative integer, or a string holding one")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("negative value for a cumulative count"));
            }
            Ok(Some(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                Ok(Some(v as u64))
            } else {
                Err(E::custom(format!("not a whole non-negative count: {v}")))
            }
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<u64>().map(Some).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_null_number_and_string_counts() {
        let rows: Vec<VaccinationRecord> = serde_json::from_str(
            r#"[
                {"Date":"2021-01-10","Name":"Wales","First":null,"Second":12},
                {"Date":"2021-01-11","Name":"Wales","First":"1500","Second":13.0}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows[0].first, None);
        assert_eq!(rows[0].second, Some(12));
        assert_eq!(rows[1].first, Some(1500));
        assert_eq!(rows[1].second, Some(13));
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2021, 1, 11).unwrap());
    }

    #[test]
    fn record_rejects_negative_counts() {
        let r: Result<VaccinationRecord, _> = serde_json::from_str(
            r#"{"Date":"2021-01-10","Name":"Wales","First":-4,"Second":0}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn stage_labels() {
        assert_eq!(DoseStage::First.to_string(), "First");
        assert_eq!(DoseStage::Second.label(), "Second");
        assert!(DoseStage::First < DoseStage::Second);
    }
}
