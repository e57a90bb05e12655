//! Control binder: keeps selection widgets and the rendered view in step with
//! the filter state.
//!
//! Widgets are reached through [`ControlSurface`], so the same binder drives the
//! egui dashboard and plain test doubles. A change on any widget becomes a
//! [`FilterEvent`]; [`Dashboard::dispatch`] turns it into a new state and
//! recomputes the aggregation from scratch.

use crate::aggregate::{Aggregation, aggregate};
use crate::dataset::Dataset;
use crate::filter::{FilterEvent, FilterState};
use crate::models::{ALL, Metric, Selection};

/// One entry of a select or radio group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlOption {
    pub value: String,
    pub label: String,
}

impl ControlOption {
    pub fn new<V: Into<String>, L: Into<String>>(value: V, label: L) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A widget the binder can fill and read back.
pub trait ControlSurface {
    /// Replace the widget's choices. Text-only widgets ignore this.
    fn populate(&mut self, options: &[ControlOption]);
    /// Current value as a string (option value, or the typed number).
    fn value(&self) -> String;
    /// Set the displayed value or text.
    fn set_text(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    League,
    Team,
    Metric,
    YearMin,
    YearMax,
}

/// The widgets of one dashboard page.
pub struct Bindings<'a> {
    pub league: &'a mut dyn ControlSurface,
    pub team: &'a mut dyn ControlSurface,
    pub metric: &'a mut dyn ControlSurface,
    pub year_min: &'a mut dyn ControlSurface,
    pub year_max: &'a mut dyn ControlSurface,
    pub year_label: &'a mut dyn ControlSurface,
    pub title: &'a mut dyn ControlSurface,
}

impl Bindings<'_> {
    fn get(&self, id: ControlId) -> &dyn ControlSurface {
        match id {
            ControlId::League => &*self.league,
            ControlId::Team => &*self.team,
            ControlId::Metric => &*self.metric,
            ControlId::YearMin => &*self.year_min,
            ControlId::YearMax => &*self.year_max,
        }
    }
}

/// What the chart shows for the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub aggregation: Aggregation,
    pub title: String,
    pub year_label: String,
}

impl View {
    fn compute(dataset: &Dataset, state: &FilterState) -> Self {
        Self {
            aggregation: aggregate(dataset.records(), state),
            title: chart_title(state.metric),
            year_label: state.years.label(),
        }
    }
}

pub fn chart_title(metric: Metric) -> String {
    format!("League Average {} by Year", metric.label())
}

/// Dataset plus the current filter state and the view derived from them.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    state: FilterState,
    view: View,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        let state = FilterState::initial(&dataset);
        let view = View::compute(&dataset, &state);
        Self {
            dataset,
            state,
            view,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// `All` followed by every league code.
    pub fn league_options(&self) -> Vec<ControlOption> {
        std::iter::once(ControlOption::new(ALL, ALL))
            .chain(
                self.dataset
                    .leagues()
                    .into_iter()
                    .map(|l| ControlOption::new(l.clone(), l)),
            )
            .collect()
    }

    /// `All` followed by the teams of the selected league.
    pub fn team_options(&self) -> Vec<ControlOption> {
        std::iter::once(ControlOption::new(ALL, ALL))
            .chain(
                self.dataset
                    .teams(&self.state.league)
                    .into_iter()
                    .map(|t| ControlOption::new(t.clone(), t)),
            )
            .collect()
    }

    pub fn metric_options() -> Vec<ControlOption> {
        Metric::ALL
            .iter()
            .map(|m| ControlOption::new(m.key(), m.label()))
            .collect()
    }

    /// Apply `event`; recompute the view when the state actually changed.
    pub fn dispatch(&mut self, event: FilterEvent) -> bool {
        let next = self.state.apply(event, &self.dataset);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.view = View::compute(&self.dataset, &self.state);
        log::debug!(
            "filter {:?}/{:?} {} {}: {} league points",
            self.state.league.as_value(),
            self.state.team.as_value(),
            self.state.metric,
            self.view.year_label,
            self.view.aggregation.league.len()
        );
        true
    }

    /// Translate a widget value into an event. Unparseable year text yields `None`.
    pub fn event_from(id: ControlId, value: &str) -> Option<FilterEvent> {
        let value = value.trim();
        Some(match id {
            ControlId::League => FilterEvent::League(Selection::from_value(value)),
            ControlId::Team => FilterEvent::Team(Selection::from_value(value)),
            ControlId::Metric => FilterEvent::Metric(Metric::parse_lenient(value)),
            ControlId::YearMin => FilterEvent::YearMin(value.parse().ok()?),
            ControlId::YearMax => FilterEvent::YearMax(value.parse().ok()?),
        })
    }

    /// Fill every widget from the dataset and show the current state.
    pub fn bind(&self, b: &mut Bindings<'_>) {
        b.league.populate(&self.league_options());
        b.metric.populate(&Self::metric_options());
        self.sync(b);
    }

    /// Push the current state into the widgets. Team options are refilled
    /// because they depend on the league.
    pub fn sync(&self, b: &mut Bindings<'_>) {
        b.league.set_text(self.state.league.as_value());
        b.team.populate(&self.team_options());
        b.team.set_text(self.state.team.as_value());
        b.metric.set_text(self.state.metric.key());
        b.year_min.set_text(&self.state.years.min.to_string());
        b.year_max.set_text(&self.state.years.max.to_string());
        b.year_label.set_text(&self.view.year_label);
        b.title.set_text(&self.view.title);
    }

    /// Change handler for widget `id`: read it, dispatch, and write the
    /// resulting state back (rejected values snap back to the state).
    pub fn on_change(&mut self, id: ControlId, b: &mut Bindings<'_>) -> bool {
        let changed = match Self::event_from(id, &b.get(id).value()) {
            Some(event) => self.dispatch(event),
            None => false,
        };
        self.sync(b);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, YearRange};

    #[derive(Default)]
    struct Fake {
        options: Vec<ControlOption>,
        text: String,
    }

    impl ControlSurface for Fake {
        fn populate(&mut self, options: &[ControlOption]) {
            self.options = options.to_vec();
        }
        fn value(&self) -> String {
            self.text.clone()
        }
        fn set_text(&mut self, text: &str) {
            self.text = text.to_string();
        }
    }

    #[derive(Default)]
    struct Page {
        league: Fake,
        team: Fake,
        metric: Fake,
        year_min: Fake,
        year_max: Fake,
        year_label: Fake,
        title: Fake,
    }

    impl Page {
        fn bindings(&mut self) -> Bindings<'_> {
            Bindings {
                league: &mut self.league,
                team: &mut self.team,
                metric: &mut self.metric,
                year_min: &mut self.year_min,
                year_max: &mut self.year_max,
                year_label: &mut self.year_label,
                title: &mut self.title,
            }
        }
    }

    fn rec(year: i32, lg: &str, team: &str) -> Record {
        Record::new(year, lg, team, team, 10.0, 50.0, 90.0, 70.0, 10.0, None)
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(Dataset::from_records(vec![
            rec(1990, "NL", "Cubs"),
            rec(1995, "AL", "Twins"),
            rec(2000, "NL", "Mets"),
        ]))
    }

    fn values(opts: &[ControlOption]) -> Vec<&str> {
        opts.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn bind_populates_from_dataset() {
        let d = dashboard();
        let mut page = Page::default();
        d.bind(&mut page.bindings());
        assert_eq!(values(&page.league.options), ["All", "AL", "NL"]);
        assert_eq!(values(&page.team.options), ["All", "Cubs", "Mets", "Twins"]);
        assert_eq!(values(&page.metric.options).len(), 4);
        assert_eq!(page.year_min.text, "1990");
        assert_eq!(page.year_max.text, "2000");
        assert_eq!(page.year_label.text, "1990 – 2000");
        assert_eq!(page.title.text, "League Average Runs/Game by Year");
    }

    #[test]
    fn league_change_refills_teams_and_resets_team() {
        let mut d = dashboard();
        let mut page = Page::default();
        d.bind(&mut page.bindings());

        page.team.text = "Twins".into();
        assert!(d.on_change(ControlId::Team, &mut page.bindings()));
        assert_eq!(d.state().team, Selection::only("Twins"));

        page.league.text = "NL".into();
        assert!(d.on_change(ControlId::League, &mut page.bindings()));
        assert_eq!(d.state().team, Selection::All);
        assert_eq!(values(&page.team.options), ["All", "Cubs", "Mets"]);
        assert_eq!(page.team.text, "All");
    }

    #[test]
    fn stale_and_invalid_values_are_no_ops() {
        let mut d = dashboard();
        let mut page = Page::default();
        d.bind(&mut page.bindings());
        let before = d.state().clone();

        page.league.text = "FL".into();
        assert!(!d.on_change(ControlId::League, &mut page.bindings()));
        assert_eq!(page.league.text, "All");

        page.year_min.text = "abc".into();
        assert!(!d.on_change(ControlId::YearMin, &mut page.bindings()));
        assert_eq!(page.year_min.text, "1990");
        assert_eq!(d.state(), &before);
    }

    #[test]
    fn metric_and_years_update_view() {
        let mut d = dashboard();
        assert!(d.dispatch(FilterEvent::Metric(Metric::Strikeouts)));
        assert_eq!(d.view().title, "League Average Strikeouts/Game by Year");
        assert_eq!(d.view().aggregation.league[0].value, 7.0);

        assert!(d.dispatch(FilterEvent::YearMin(1991)));
        // Clamped to the dataset's last year, which is already selected.
        assert!(!d.dispatch(FilterEvent::YearMax(3000)));
        assert_eq!(d.state().years, YearRange::new(1991, 2000));
        assert_eq!(d.view().year_label, "1991 – 2000");
        assert_eq!(d.view().aggregation.league.len(), 2);
        assert!(!d.dispatch(FilterEvent::YearMax(2000)));
    }

    #[test]
    fn unknown_metric_falls_back_to_runs() {
        assert_eq!(
            Dashboard::event_from(ControlId::Metric, "batting_avg"),
            Some(FilterEvent::Metric(Metric::Runs))
        );
        assert_eq!(
            Dashboard::event_from(ControlId::YearMax, " 1999 "),
            Some(FilterEvent::YearMax(1999))
        );
    }
}
