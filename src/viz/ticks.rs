//! Date tick placement. Density depends on how many days the data spans.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Weekly ticks land on this weekday.
pub const WEEKLY_TICK_WEEKDAY: Weekday = Weekday::Tue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickUnit {
    Day,
    Week,
    /// First day of every `every`-th month, counted from the first month boundary
    /// on or after the start of the range.
    Month { every: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPolicy {
    pub major: TickUnit,
    pub minor: TickUnit,
}

impl TickPolicy {
    /// `< 45` days: weekly/daily; `45..100`: monthly/weekly; `>= 100`: quarterly/weekly.
    pub fn for_span(days_elapsed: i64) -> Self {
        if days_elapsed < 45 {
            Self {
                major: TickUnit::Week,
                minor: TickUnit::Day,
            }
        } else if days_elapsed < 100 {
            Self {
                major: TickUnit::Month { every: 1 },
                minor: TickUnit::Week,
            }
        } else {
            Self {
                major: TickUnit::Month { every: 3 },
                minor: TickUnit::Week,
            }
        }
    }
}

impl TickUnit {
    /// All tick dates in `start..=end` (empty when `end < start`).
    pub fn ticks_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        match *self {
            TickUnit::Day => days_where(start, end, |_| true),
            TickUnit::Week => days_where(start, end, |d| d.weekday() == WEEKLY_TICK_WEEKDAY),
            TickUnit::Month { every } => month_starts(start, end, every.max(1)),
        }
    }
}

fn days_where(start: NaiveDate, end: NaiveDate, keep: impl Fn(NaiveDate) -> bool) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = start;
    while d <= end {
        if keep(d) {
            out.push(d);
        }
        match d.checked_add_days(Days::new(1)) {
            Some(next) => d = next,
            None => break,
        }
    }
    out
}

fn month_starts(start: NaiveDate, end: NaiveDate, every: u32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let Some(mut d) = start.with_day(1) else {
        return out;
    };
    if d < start {
        match d.checked_add_months(Months::new(1)) {
            Some(next) => d = next,
            None => return out,
        }
    }
    while d <= end {
        out.push(d);
        match d.checked_add_months(Months::new(every)) {
            Some(next) => d = next,
            None => break,
        }
    }
    out
}
