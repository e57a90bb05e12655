//! Backend-independent chart geometry.

use super::Point;
use super::scale::{LinearScale, format_tick, tick_spacing};
use super::text::truncate_to_width;
use crate::aggregate::Aggregation;
use crate::config::{ChartConfig, Rgb};
use crate::models::{Metric, Series};

/// Which series a line or marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesRole {
    League,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotArea {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis.
    pub at: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub role: SeriesRole,
    pub color: Rgb,
    pub width: f32,
    pub points: Vec<Point>,
}

/// A hoverable data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub role: SeriesRole,
    /// Series name shown in the tooltip (league label or team name).
    pub series: String,
    pub year: i32,
    pub value: f64,
    pub at: Point,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    /// Top-left corner of the color swatch.
    pub at: Point,
}

/// Everything needed to draw one frame of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub area: PlotArea,
    pub x: LinearScale,
    pub y: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub metric: Metric,
    pub lines: Vec<Polyline>,
    pub markers: Vec<Marker>,
    pub legend: Vec<LegendEntry>,
}

/// Observed `(min, max)` over all points, widened when degenerate.
fn extent(values: impl Iterator<Item = f64>, fallback: (f64, f64), pad: f64) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        fallback
    } else if lo == hi {
        (lo - pad, hi + pad)
    } else {
        (lo, hi)
    }
}

impl ChartLayout {
    /// Compute the geometry of `agg` on a `size` pixel canvas.
    ///
    /// The x domain is the union of years of both series and the y domain the
    /// union of their values, niced. With both series empty the requested year
    /// range (or `0..1`) and `0..1` stand in, so axes still draw.
    pub fn compute(agg: &Aggregation, title: &str, size: (f32, f32), cfg: &ChartConfig) -> Self {
        let (width, height) = size;
        let m = &cfg.margin;
        let left = m.left.min(width - 1.0).max(0.0);
        let top = m.top.min(height - 1.0).max(0.0);
        let area = PlotArea {
            left,
            top,
            right: (width - m.right).max(left + 1.0),
            bottom: (height - m.bottom).max(top + 1.0),
        };

        let team = agg.team_series();
        let all_points = || agg.league.iter().chain(team.into_iter().flatten());

        let year_fallback = if agg.years.is_inverted() {
            (0.0, 1.0)
        } else {
            (agg.years.min as f64, agg.years.max as f64)
        };
        let x_domain = extent(all_points().map(|p| p.year as f64), year_fallback, 1.0);
        let y_domain = extent(all_points().map(|p| p.value), (0.0, 1.0), 1.0);

        let x = LinearScale::new(x_domain, (area.left as f64, area.right as f64));
        let y = LinearScale::new(y_domain, (area.bottom as f64, area.top as f64)).nice(cfg.ticks);

        let x_ticks = x
            .integer_ticks(cfg.ticks)
            .into_iter()
            .map(|year| Tick {
                at: x.map(year as f64) as f32,
                label: year.to_string(),
            })
            .collect();
        let y_values = y.ticks(cfg.ticks);
        let y_step = tick_spacing(&y_values);
        let y_ticks = y_values
            .into_iter()
            .map(|v| Tick {
                at: y.map(v) as f32,
                label: format_tick(v, y_step),
            })
            .collect();

        let project = |s: &Series| -> Vec<Point> {
            s.iter()
                .map(|p| (x.map(p.year as f64) as f32, y.map(p.value) as f32))
                .collect()
        };

        let mut lines = vec![Polyline {
            role: SeriesRole::League,
            color: cfg.league_color,
            width: cfg.league_stroke,
            points: project(&agg.league),
        }];
        let mut markers: Vec<Marker> = agg
            .league
            .iter()
            .zip(project(&agg.league))
            .map(|(p, at)| Marker {
                role: SeriesRole::League,
                series: cfg.league_label.clone(),
                year: p.year,
                value: p.value,
                at,
                radius: (cfg.marker_radius - 1.0).max(1.0),
                color: cfg.league_color,
            })
            .collect();

        let label_px = (m.right - 10.0 - 18.0).max(0.0);
        // Both entries are always listed, whether or not a team is selected.
        let legend = vec![
            LegendEntry {
                label: truncate_to_width(&cfg.league_label, cfg.font_px, label_px),
                color: cfg.league_color,
                at: (area.right + 10.0, area.top + 10.0),
            },
            LegendEntry {
                label: truncate_to_width(&cfg.team_label, cfg.font_px, label_px),
                color: cfg.team_color,
                at: (area.right + 10.0, area.top + 30.0),
            },
        ];

        if let Some((name, series)) = &agg.team {
            lines.push(Polyline {
                role: SeriesRole::Team,
                color: cfg.team_color,
                width: cfg.team_stroke,
                points: project(series),
            });
            markers.extend(series.iter().zip(project(series)).map(|(p, at)| Marker {
                role: SeriesRole::Team,
                series: name.clone(),
                year: p.year,
                value: p.value,
                at,
                radius: cfg.marker_radius,
                color: cfg.team_color,
            }));
        }

        Self {
            width,
            height,
            area,
            x,
            y,
            x_ticks,
            y_ticks,
            title: title.to_string(),
            x_title: "Year".into(),
            y_title: agg.metric.label().into(),
            metric: agg.metric,
            lines,
            markers,
            legend,
        }
    }

    /// Index of the marker closest to `p` whose hit circle (radius + `slop`) contains it.
    pub fn hit_test(&self, p: Point, slop: f32) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let dx = m.at.0 - p.0;
                let dy = m.at.1 - p.1;
                (i, dx * dx + dy * dy, m.radius + slop)
            })
            .filter(|(_, d2, r)| *d2 <= r * r)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _, _)| i)
    }
}
