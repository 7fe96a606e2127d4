//! Pure chart model: facets, series, shared x range, per-facet y ranges, ticks
//! and annotation values. Drawing code only reads from this.

use super::theme::Theme;
use super::ticks::TickPolicy;
use crate::models::{DoseStage, Observation};
use crate::reshape::{date_bounds, group_series, latest_value};
use anyhow::{Result, anyhow};
use chrono::{Days, NaiveDate};
use log::warn;
use std::collections::BTreeMap;

pub const SOURCE_LINE: &str = "Source: coronavirus.data.gov.uk";

/// Headroom above the largest value of a facet.
const Y_HEADROOM: f64 = 1.05;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLayout {
    pub stage: DoseStage,
    /// Non-null points in date order.
    pub points: Vec<(NaiveDate, u64)>,
    /// Value annotated at the right edge of the facet.
    pub latest: Option<(NaiveDate, u64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacetLayout {
    pub nation: String,
    pub series: Vec<SeriesLayout>,
    pub y_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub facets: Vec<FacetLayout>,
    /// Shared x range (inclusive dates).
    pub x_start: NaiveDate,
    pub x_end: NaiveDate,
    pub days_elapsed: i64,
    pub ticks: TickPolicy,
    pub major_ticks: Vec<NaiveDate>,
    pub minor_ticks: Vec<NaiveDate>,
    pub latest_date: NaiveDate,
    pub attribution: Vec<String>,
}

impl ChartLayout {
    /// Build the chart model from long-form observations.
    ///
    /// ### Errors
    /// - no observations
    /// - no numeric values at all
    pub fn build(obs: &[Observation], theme: &Theme) -> Result<Self> {
        let (first_date, latest_date) = date_bounds(obs).ok_or_else(|| anyhow!("no data to plot"))?;
        if obs.iter().all(|o| o.value.is_none()) {
            return Err(anyhow!("no numeric values to plot"));
        }
        let days_elapsed = (latest_date - first_date).num_days();

        // One day of data still needs a non-empty x range
        let (x_start, x_end) = if first_date == latest_date {
            (
                first_date.checked_sub_days(Days::new(1)).unwrap_or(first_date),
                latest_date.checked_add_days(Days::new(1)).unwrap_or(latest_date),
            )
        } else {
            (first_date, latest_date)
        };

        // BTreeMap keys order facets by nation and series by stage
        let mut by_nation: BTreeMap<String, Vec<SeriesLayout>> = BTreeMap::new();
        for (key, points) in group_series(obs) {
            if points.is_empty() {
                warn!("{} / {}: no values, line left empty", key.nation, key.stage);
            }
            let latest = latest_value(&points);
            by_nation.entry(key.nation).or_default().push(SeriesLayout {
                stage: key.stage,
                points,
                latest,
            });
        }

        let facets = by_nation
            .into_iter()
            .map(|(nation, series)| {
                let max = series
                    .iter()
                    .flat_map(|s| s.points.iter().map(|(_, v)| *v))
                    .max()
                    .unwrap_or(0);
                let y_max = if max == 0 {
                    1.0
                } else {
                    max as f64 * Y_HEADROOM
                };
                FacetLayout {
                    nation,
                    series,
                    y_max,
                }
            })
            .collect();

        let ticks = TickPolicy::for_span(days_elapsed);
        let major_ticks = ticks.major.ticks_between(x_start, x_end);
        let minor_ticks = ticks.minor.ticks_between(x_start, x_end);

        let mut attribution = vec![
            SOURCE_LINE.to_string(),
            format!(
                "Data up to and including {}",
                latest_date.format("%Y-%m-%d")
            ),
        ];
        if let Some(credit) = theme.credit.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            attribution.push(credit.to_string());
        }

        Ok(Self {
            title: theme.title.clone(),
            facets,
            x_start,
            x_end,
            days_elapsed,
            ticks,
            major_ticks,
            minor_ticks,
            latest_date,
            attribution,
        })
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    /// Number of lines per facet, in facet order.
    pub fn lines_per_facet(&self) -> Vec<usize> {
        self.facets.iter().map(|f| f.series.len()).collect()
    }

    /// X coordinate of a date (days since `x_start`).
    pub fn x_of(&self, d: NaiveDate) -> i32 {
        (d - self.x_start).num_days() as i32
    }

    pub fn x_span(&self) -> i32 {
        self.x_of(self.x_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ob(day: u32, nation: &str, stage: DoseStage, value: Option<u64>) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            nation: nation.into(),
            stage,
            value,
        }
    }

    #[test]
    fn empty_and_all_null_are_errors() {
        assert!(ChartLayout::build(&[], &Theme::standard()).is_err());
        let nulls = vec![ob(1, "Wales", DoseStage::First, None)];
        assert!(ChartLayout::build(&nulls, &Theme::standard()).is_err());
    }

    #[test]
    fn single_day_is_widened() {
        let obs = vec![ob(10, "Wales", DoseStage::First, Some(5))];
        let l = ChartLayout::build(&obs, &Theme::standard()).unwrap();
        assert_eq!(l.days_elapsed, 0);
        assert_eq!(l.x_span(), 2);
        assert_eq!(l.facets[0].y_max, 5.0 * Y_HEADROOM);
    }

    #[test]
    fn credit_line_is_optional() {
        let obs = vec![ob(1, "Wales", DoseStage::First, Some(1)), ob(9, "Wales", DoseStage::First, Some(2))];
        let plain = ChartLayout::build(&obs, &Theme::standard()).unwrap();
        assert_eq!(
            plain.attribution,
            vec![SOURCE_LINE.to_string(), "Data up to and including 2021-01-09".to_string()]
        );

        let theme = Theme {
            credit: Some("Charts: example.org".into()),
            ..Theme::standard()
        };
        let credited = ChartLayout::build(&obs, &theme).unwrap();
        assert_eq!(credited.attribution.len(), 3);
        assert_eq!(credited.attribution[2], "Charts: example.org");
    }
}
