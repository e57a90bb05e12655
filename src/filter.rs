//! Filter state and the events that replace it.
//!
//! A [`FilterState`] is never edited in place: each UI event produces a new
//! state through [`FilterState::apply`], which the aggregator and renderer then
//! read. Values coming from stale widgets (a league or team no longer present)
//! leave the state unchanged.

use crate::dataset::Dataset;
use crate::models::{Metric, Selection, YearRange};
use serde::{Deserialize, Serialize};

/// The active league/team/metric/year selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub league: Selection,
    pub team: Selection,
    pub metric: Metric,
    pub years: YearRange,
}

/// A single control change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    League(Selection),
    Team(Selection),
    Metric(Metric),
    YearMin(i32),
    YearMax(i32),
}

impl FilterState {
    /// Everything selected over the dataset's full year span.
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            league: Selection::All,
            team: Selection::All,
            metric: Metric::default(),
            years: dataset.year_bounds().unwrap_or(YearRange::new(0, 0)),
        }
    }

    pub fn with_league(&self, league: Selection) -> Self {
        Self {
            league,
            team: Selection::All,
            ..self.clone()
        }
    }

    pub fn with_team(&self, team: Selection) -> Self {
        Self {
            team,
            ..self.clone()
        }
    }

    pub fn with_metric(&self, metric: Metric) -> Self {
        Self {
            metric,
            ..self.clone()
        }
    }

    pub fn with_years(&self, years: YearRange) -> Self {
        Self {
            years,
            ..self.clone()
        }
    }

    /// Compute the state that follows `event`.
    ///
    /// - A league change resets the team to `All`.
    /// - Unknown leagues, or teams outside the current league, are ignored.
    /// - Year endpoints are clamped to the dataset bounds; an inverted range is kept.
    pub fn apply(&self, event: FilterEvent, dataset: &Dataset) -> Self {
        match event {
            FilterEvent::League(Selection::Only(code)) if !dataset.has_league(&code) => {
                log::warn!("ignoring unknown league {code:?}");
                self.clone()
            }
            FilterEvent::League(league) => self.with_league(league),
            FilterEvent::Team(Selection::Only(name)) if !dataset.has_team(&self.league, &name) => {
                log::warn!(
                    "ignoring team {name:?}, not in league {:?}",
                    self.league.as_value()
                );
                self.clone()
            }
            FilterEvent::Team(team) => self.with_team(team),
            FilterEvent::Metric(metric) => self.with_metric(metric),
            FilterEvent::YearMin(y) => self.with_years(YearRange::new(
                clamp_year(y, dataset),
                self.years.max,
            )),
            FilterEvent::YearMax(y) => self.with_years(YearRange::new(
                self.years.min,
                clamp_year(y, dataset),
            )),
        }
    }
}

fn clamp_year(year: i32, dataset: &Dataset) -> i32 {
    match dataset.year_bounds() {
        Some(b) => year.clamp(b.min, b.max),
        None => year,
    }
}
