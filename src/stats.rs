use crate::aggregate::Aggregation;
use crate::models::Series;
use serde::{Deserialize, Serialize};

/// Summary statistics for one aggregated series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub label: String,
    pub count: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Summarize the yearly values of `series`.
pub fn summarize(label: &str, series: &Series) -> Summary {
    let mut vals: Vec<f64> = series.iter().map(|p| p.value).collect();
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        label: label.to_string(),
        count,
        first_year: series.first().map(|p| p.year),
        last_year: series.last().map(|p| p.year),
        min: vals.first().copied(),
        max: vals.last().copied(),
        mean,
        median,
    }
}

/// One summary per series of the aggregation: league first, then the team if any.
pub fn summaries(agg: &Aggregation, league_label: &str) -> Vec<Summary> {
    let mut out = vec![summarize(league_label, &agg.league)];
    if let Some((name, series)) = &agg.team {
        out.push(summarize(name, series));
    }
    out
}
