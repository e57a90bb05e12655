use crate::error::UnknownMetric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widget value meaning "no filter" for league and team selections.
pub const ALL: &str = "All";

/// Per-game statistic selected for aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Runs,
    Hits,
    Strikeouts,
    HomeRuns,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Runs,
        Metric::Hits,
        Metric::Strikeouts,
        Metric::HomeRuns,
    ];

    /// Stable key used in widget values, CLI flags and exports.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Runs => "runs",
            Metric::Hits => "hits",
            Metric::Strikeouts => "strikeouts",
            Metric::HomeRuns => "home_runs",
        }
    }

    /// Axis/tooltip label, e.g. `Runs/Game`.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Runs => "Runs/Game",
            Metric::Hits => "Hits/Game",
            Metric::Strikeouts => "Strikeouts/Game",
            Metric::HomeRuns => "Home Runs/Game",
        }
    }

    /// Parse a widget value, falling back to [`Metric::Runs`] for anything unknown.
    ///
    /// Stale or hand-edited control values must never break the chart, so this
    /// is the entry point used by the control binder.
    pub fn parse_lenient(s: &str) -> Metric {
        s.parse().unwrap_or_else(|_| {
            log::warn!("unknown metric {s:?}, falling back to {}", Metric::Runs.key());
            Metric::Runs
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    /// Accepts the keys plus short aliases (`r`, `batting`, `so`, `hr`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "runs" | "r" => Ok(Metric::Runs),
            "hits" | "h" | "batting" => Ok(Metric::Hits),
            "strikeouts" | "so" | "k" => Ok(Metric::Strikeouts),
            "home_runs" | "homeruns" | "hr" => Ok(Metric::HomeRuns),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// Equality filter over a record field with an "everything" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only<S: Into<String>>(value: S) -> Self {
        Selection::Only(value.into())
    }

    /// Interpret a widget value; empty or `All` means no filter.
    pub fn from_value(value: &str) -> Self {
        let v = value.trim();
        if v.is_empty() || v == ALL {
            Selection::All
        } else {
            Selection::Only(v.to_string())
        }
    }

    pub fn matches(&self, field: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == field,
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Only(v) => v,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

/// Inclusive year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }

    /// `min > max` ranges are kept as typed and simply match nothing.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Label shown next to the range inputs, e.g. `1960 – 2023`.
    pub fn label(&self) -> String {
        format!("{} – {}", self.min, self.max)
    }
}

/// One team-season with its per-game rates computed once at load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,
    pub league: String,
    pub team_id: String,
    pub team: String,
    pub games: f64,
    pub runs: f64,
    pub hits: f64,
    pub strikeouts: f64,
    pub home_runs: f64,
    pub wins: Option<f64>,
    pub runs_per_game: f64,
    pub hits_per_game: f64,
    pub strikeouts_per_game: f64,
    pub home_runs_per_game: f64,
}

impl Record {
    /// Build a record from raw counts. `games` must be positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        league: impl Into<String>,
        team_id: impl Into<String>,
        team: impl Into<String>,
        games: f64,
        runs: f64,
        hits: f64,
        strikeouts: f64,
        home_runs: f64,
        wins: Option<f64>,
    ) -> Self {
        debug_assert!(games > 0.0);
        Self {
            year,
            league: league.into(),
            team_id: team_id.into(),
            team: team.into(),
            games,
            runs,
            hits,
            strikeouts,
            home_runs,
            wins,
            runs_per_game: runs / games,
            hits_per_game: hits / games,
            strikeouts_per_game: strikeouts / games,
            home_runs_per_game: home_runs / games,
        }
    }

    pub fn rate(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Runs => self.runs_per_game,
            Metric::Hits => self.hits_per_game,
            Metric::Strikeouts => self.strikeouts_per_game,
            Metric::HomeRuns => self.home_runs_per_game,
        }
    }
}

/// One aggregated value per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// Points ordered by year ascending.
pub type Series = Vec<SeriesPoint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_aliases_and_fallback() {
        assert_eq!("batting".parse::<Metric>().unwrap(), Metric::Hits);
        assert_eq!("SO".parse::<Metric>().unwrap(), Metric::Strikeouts);
        assert_eq!("home-runs".parse::<Metric>().unwrap(), Metric::HomeRuns);
        let err = "era".parse::<Metric>().unwrap_err();
        assert_eq!(err, UnknownMetric("era".into()));
        assert!(err.to_string().starts_with("unknown metric `era`"));
        assert_eq!(Metric::parse_lenient("era"), Metric::Runs);
        for m in Metric::ALL {
            assert_eq!(m.key().parse::<Metric>().unwrap(), m);
        }
    }

    #[test]
    fn selection_sentinel() {
        assert_eq!(Selection::from_value("All"), Selection::All);
        assert_eq!(Selection::from_value("  "), Selection::All);
        assert_eq!(Selection::from_value("NL"), Selection::only("NL"));
        assert!(Selection::All.matches("AL"));
        assert!(!Selection::only("NL").matches("AL"));
        assert_eq!(Selection::only("NL").as_value(), "NL");
    }
}
