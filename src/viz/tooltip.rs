//! Hover tooltip for chart markers.

use super::Point;
use super::layout::{ChartLayout, Marker, SeriesRole};
use crate::models::Metric;

/// Offset from the pointer to the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: Point = (10.0, -28.0);
/// Extra pixels around a marker that still count as hovering it.
pub const HIT_SLOP: f32 = 3.0;

/// A floating box near the pointer. Hiding only toggles visibility; the last
/// text stays so a fade-out can keep showing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub at: Point,
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Show the series name, year and value of `marker` next to `pointer`.
    pub fn show(&mut self, marker: &Marker, pointer: Point, metric: Metric, precision: usize) {
        self.lines = vec![
            marker.series.clone(),
            format!("Year: {}", marker.year),
            format!("{}: {:.*}", metric.label(), precision, marker.value),
        ];
        self.follow(pointer);
        self.visible = true;
    }

    pub fn follow(&mut self, pointer: Point) {
        self.at = (pointer.0 + TOOLTIP_OFFSET.0, pointer.1 + TOOLTIP_OFFSET.1);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// What a pointer update did to the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Entered,
    Moved,
    Left,
    Idle,
}

/// Tracks which marker the pointer is over across frames.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    hovered: Option<(SeriesRole, i32)>,
    pub tooltip: Tooltip,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<(SeriesRole, i32)> {
        self.hovered
    }

    /// Feed the current pointer position (`None` when outside the chart).
    ///
    /// The tooltip text is rebuilt on every hit, so a redrawn layout (another
    /// metric, a resize) under a resting pointer shows the current value.
    pub fn pointer(
        &mut self,
        layout: &ChartLayout,
        pos: Option<Point>,
        precision: usize,
    ) -> HoverChange {
        let hit = pos.and_then(|p| {
            layout
                .hit_test(p, HIT_SLOP)
                .map(|i| (p, &layout.markers[i]))
        });
        match (self.hovered, hit) {
            (Some(key), Some((p, m))) if key == (m.role, m.year) => {
                self.tooltip.show(m, p, layout.metric, precision);
                HoverChange::Moved
            }
            (_, Some((p, m))) => {
                self.tooltip.show(m, p, layout.metric, precision);
                self.hovered = Some((m.role, m.year));
                HoverChange::Entered
            }
            (Some(_), None) => {
                self.tooltip.hide();
                self.hovered = None;
                HoverChange::Left
            }
            (None, None) => HoverChange::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregation;
    use crate::config::ChartConfig;
    use crate::models::{SeriesPoint, YearRange};

    fn layout() -> ChartLayout {
        layout_for(Metric::HomeRuns, 1.123456)
    }

    fn layout_for(metric: Metric, team_value: f64) -> ChartLayout {
        let agg = Aggregation {
            metric,
            years: YearRange::new(1990, 1992),
            league: vec![
                SeriesPoint { year: 1990, value: 0.85 },
                SeriesPoint { year: 1992, value: 0.9 },
            ],
            team: Some((
                "Boston Red Sox".into(),
                vec![SeriesPoint {
                    year: 1991,
                    value: team_value,
                }],
            )),
        };
        ChartLayout::compute(&agg, "", (900.0, 400.0), &ChartConfig::default())
    }

    #[test]
    fn enter_move_leave() {
        let l = layout();
        let team = l.markers.iter().find(|m| m.role == SeriesRole::Team).unwrap().clone();
        let mut h = HoverState::new();

        assert_eq!(h.pointer(&l, Some((0.0, 0.0)), 3), HoverChange::Idle);

        assert_eq!(h.pointer(&l, Some(team.at), 3), HoverChange::Entered);
        assert!(h.tooltip.visible);
        assert_eq!(
            h.tooltip.lines,
            ["Boston Red Sox", "Year: 1991", "Home Runs/Game: 1.123"]
        );
        assert_eq!(h.tooltip.at, (team.at.0 + 10.0, team.at.1 - 28.0));

        let nudged = (team.at.0 + 1.0, team.at.1 + 1.0);
        assert_eq!(h.pointer(&l, Some(nudged), 3), HoverChange::Moved);
        assert_eq!(h.tooltip.at, (nudged.0 + 10.0, nudged.1 - 28.0));

        assert_eq!(h.pointer(&l, None, 3), HoverChange::Left);
        assert!(!h.tooltip.visible);
        assert_eq!(h.tooltip.lines.len(), 3);
        assert_eq!(h.hovered(), None);
    }

    #[test]
    fn jumping_between_markers_re_enters() {
        let l = layout();
        let mut h = HoverState::new();
        let a = l.markers[0].clone();
        let b = l.markers[1].clone();
        assert_eq!(h.pointer(&l, Some(a.at), 2), HoverChange::Entered);
        assert_eq!(h.pointer(&l, Some(b.at), 2), HoverChange::Entered);
        assert_eq!(h.tooltip.lines[0], "League");
        assert_eq!(h.tooltip.lines[1], format!("Year: {}", b.year));
    }

    #[test]
    fn resting_pointer_picks_up_a_new_view() {
        let before = layout();
        let at = before
            .markers
            .iter()
            .find(|m| m.role == SeriesRole::Team)
            .unwrap()
            .at;
        let mut h = HoverState::new();
        assert_eq!(h.pointer(&before, Some(at), 3), HoverChange::Entered);

        // Same year and series under the pointer, different metric and value.
        let after = layout_for(Metric::Runs, 4.5);
        let at = after
            .markers
            .iter()
            .find(|m| m.role == SeriesRole::Team)
            .unwrap()
            .at;
        assert_eq!(h.pointer(&after, Some(at), 3), HoverChange::Moved);
        assert_eq!(h.tooltip.lines[2], "Runs/Game: 4.500");
        assert!(h.tooltip.visible);
    }
}
