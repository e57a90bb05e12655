//! Group-by-year averaging of the selected metric.

use crate::filter::FilterState;
use crate::models::{Metric, Record, Selection, Series, SeriesPoint, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The two series the chart compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub metric: Metric,
    /// Requested year range; the renderer falls back to it when both series are empty.
    pub years: YearRange,
    pub league: Series,
    /// `(team name, series)` when a single team is selected.
    pub team: Option<(String, Series)>,
}

impl Aggregation {
    pub fn team_series(&self) -> Option<&Series> {
        self.team.as_ref().map(|(_, s)| s)
    }

    pub fn is_empty(&self) -> bool {
        self.league.is_empty() && self.team_series().is_none_or(|s| s.is_empty())
    }
}

/// Mean of `metric` per year over the records accepted by `keep`, sorted by year.
///
/// Years without a matching record produce no point.
pub fn mean_by_year<'a, I, F>(records: I, metric: Metric, keep: F) -> Series
where
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&Record) -> bool,
{
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for r in records.into_iter().filter(|r| keep(*r)) {
        let slot = groups.entry(r.year).or_default();
        slot.0 += r.rate(metric);
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|(year, (sum, n))| SeriesPoint {
            year,
            value: sum / n as f64,
        })
        .collect()
}

/// League-wide series: league filter, year range, then per-year mean.
pub fn league_series(records: &[Record], state: &FilterState) -> Series {
    mean_by_year(records, state.metric, |r| {
        state.league.matches(&r.league) && state.years.contains(r.year)
    })
}

/// Same as [`league_series`] restricted to one team name.
pub fn team_series(records: &[Record], state: &FilterState, team: &str) -> Series {
    mean_by_year(records, state.metric, |r| {
        r.team == team && state.league.matches(&r.league) && state.years.contains(r.year)
    })
}

/// Pure function of `(records, state)`: the league series plus, when a team is
/// selected, the team series.
pub fn aggregate(records: &[Record], state: &FilterState) -> Aggregation {
    let team = match &state.team {
        Selection::All => None,
        Selection::Only(name) => Some((name.clone(), team_series(records, state, name))),
    };
    Aggregation {
        metric: state.metric,
        years: state.years,
        league: league_series(records, state),
        team,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, lg: &str, team: &str, g: f64, r: f64) -> Record {
        Record::new(year, lg, team, team, g, r, 0.0, 0.0, 0.0, None)
    }

    fn state(league: Selection, team: Selection, years: (i32, i32)) -> FilterState {
        FilterState {
            league,
            team,
            metric: Metric::Runs,
            years: YearRange::new(years.0, years.1),
        }
    }

    #[test]
    fn league_filter_keeps_matching_league_only() {
        let rows = vec![rec(2000, "A", "X", 10.0, 50.0), rec(2000, "B", "Y", 10.0, 20.0)];
        let agg = aggregate(&rows, &state(Selection::only("A"), Selection::All, (2000, 2000)));
        assert_eq!(agg.league, vec![SeriesPoint { year: 2000, value: 5.0 }]);
        assert!(agg.team.is_none());
    }

    #[test]
    fn team_selection_adds_second_series() {
        let rows = vec![rec(2000, "A", "X", 10.0, 50.0), rec(2000, "B", "Y", 10.0, 20.0)];
        let agg = aggregate(&rows, &state(Selection::All, Selection::only("X"), (2000, 2000)));
        assert_eq!(agg.league, vec![SeriesPoint { year: 2000, value: 3.5 }]);
        let (name, team) = agg.team.unwrap();
        assert_eq!(name, "X");
        assert_eq!(team, vec![SeriesPoint { year: 2000, value: 5.0 }]);
    }

    #[test]
    fn gaps_are_not_filled_and_years_sorted() {
        let rows = vec![
            rec(2003, "A", "X", 10.0, 30.0),
            rec(2001, "A", "X", 10.0, 10.0),
            rec(2001, "A", "Y", 10.0, 30.0),
        ];
        let s = league_series(&rows, &state(Selection::All, Selection::All, (2000, 2005)));
        assert_eq!(
            s,
            vec![
                SeriesPoint { year: 2001, value: 2.0 },
                SeriesPoint { year: 2003, value: 3.0 },
            ]
        );
    }

    #[test]
    fn range_without_rows_yields_empty_series() {
        let rows = vec![rec(2000, "A", "X", 10.0, 50.0)];
        let agg = aggregate(&rows, &state(Selection::All, Selection::only("X"), (2001, 2005)));
        assert!(agg.league.is_empty());
        assert_eq!(agg.team_series().map(Vec::len), Some(0));
        assert!(agg.is_empty());
    }
}
