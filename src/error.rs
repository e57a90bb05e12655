use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while turning a `Teams.csv` source into a [`crate::Dataset`].
///
/// Rows that merely miss a required value are not errors; they are counted in
/// the [`crate::dataset::LoadReport`] and skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("no usable rows: read {read}, dropped all of them")]
    NoRecords { read: usize },
}

/// Errors raised while reading a TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid color `{0}`, expected #rrggbb or a color name")]
    Color(String),
}

/// A metric name that is neither a key nor a known alias.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric `{0}` (expected runs, hits, strikeouts or home_runs)")]
pub struct UnknownMetric(pub String);
