use ukvax::viz::{TickPolicy, TickUnit};

const WEEKLY_DAILY: TickPolicy = TickPolicy {
    major: TickUnit::Week,
    minor: TickUnit::Day,
};
const MONTHLY_WEEKLY: TickPolicy = TickPolicy {
    major: TickUnit::Month { every: 1 },
    minor: TickUnit::Week,
};
const QUARTERLY_WEEKLY: TickPolicy = TickPolicy {
    major: TickUnit::Month { every: 3 },
    minor: TickUnit::Week,
};

#[test]
fn span_buckets() {
    let cases = [
        (10, WEEKLY_DAILY),
        (44, WEEKLY_DAILY),
        (45, MONTHLY_WEEKLY),
        (99, MONTHLY_WEEKLY),
        (100, QUARTERLY_WEEKLY),
        (400, QUARTERLY_WEEKLY),
    ];
    for (days, expected) in cases {
        assert_eq!(TickPolicy::for_span(days), expected, "{days} days");
    }
}

#[test]
fn same_span_same_policy() {
    for days in [0, 44, 45, 99, 100, 1000] {
        assert_eq!(TickPolicy::for_span(days), TickPolicy::for_span(days));
    }
}
