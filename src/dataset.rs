use crate::models::{Record, Selection, YearRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What happened to the rows of a source while loading it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub read: usize,
    pub kept: usize,
    pub before_cutoff: usize,
    pub missing_fields: usize,
    pub non_positive_games: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.before_cutoff + self.missing_fields + self.non_positive_games
    }
}

/// The full in-memory table of retained team-seasons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    report: LoadReport,
}

impl Dataset {
    pub fn new(records: Vec<Record>, report: LoadReport) -> Self {
        Self { records, report }
    }

    /// Wrap already-validated records (tests, embedding callers).
    pub fn from_records(records: Vec<Record>) -> Self {
        let n = records.len();
        Self::new(
            records,
            LoadReport {
                read: n,
                kept: n,
                ..Default::default()
            },
        )
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct league codes across the whole table.
    pub fn leagues(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.league.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct team names among records of `league`.
    pub fn teams(&self, league: &Selection) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter(|r| league.matches(&r.league))
            .map(|r| r.team.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn has_league(&self, code: &str) -> bool {
        self.records.iter().any(|r| r.league == code)
    }

    pub fn has_team(&self, league: &Selection, name: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.team == name && league.matches(&r.league))
    }

    /// `[min year, max year]` of the table, `None` when empty.
    pub fn year_bounds(&self) -> Option<YearRange> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some(YearRange::new(min, max))
    }
}
