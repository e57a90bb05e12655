//! teamstats
//!
//! A small Rust library for charting historical baseball team statistics from a
//! Lahman-style `Teams.csv`. Pairs with the `teamstats` CLI and the
//! `teamstats-gui` desktop dashboard.
//!
//! ### Features
//! - Load `Teams.csv` from a file or an HTTP(S) URL, deriving per-game rates
//! - Filter by league, team and an inclusive year range
//! - Average the selected metric per year, league-wide and for one team
//! - Render the comparison as an SVG/PNG line chart (or onto any [`viz::DrawingSurface`])
//! - Export the aggregated series as CSV or JSON, print quick summaries
//!
//! ### Example
//! ```no_run
//! use teamstats::{Dashboard, FilterEvent, Metric, Selection, Source};
//!
//! let dataset = teamstats::loader::load(&Source::from("Teams.csv"), &Default::default())?;
//! let mut dashboard = Dashboard::new(dataset);
//! dashboard.dispatch(FilterEvent::League(Selection::only("NL")));
//! dashboard.dispatch(FilterEvent::Metric(Metric::HomeRuns));
//! teamstats::viz::render_to_file(
//!     &dashboard.view().aggregation,
//!     &dashboard.view().title,
//!     "nl_home_runs.svg",
//!     &Default::default(),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod controls;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use aggregate::Aggregation;
pub use config::{ChartConfig, Config, LoadOptions};
pub use controls::{ControlSurface, Dashboard, View};
pub use dataset::Dataset;
pub use error::{ConfigError, LoadError, UnknownMetric};
pub use filter::{FilterEvent, FilterState};
pub use loader::Source;
pub use models::{Metric, Record, Selection, Series, SeriesPoint, YearRange};
