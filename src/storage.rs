use crate::aggregate::Aggregation;
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Flat export row: one series value for one year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportRow {
    pub series: String,
    pub metric: &'static str,
    pub year: i32,
    pub value: f64,
}

/// Flatten the aggregation: league rows first, then team rows.
pub fn export_rows(agg: &Aggregation, league_label: &str) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = agg
        .league
        .iter()
        .map(|p| ExportRow {
            series: league_label.to_string(),
            metric: agg.metric.key(),
            year: p.year,
            value: p.value,
        })
        .collect();
    if let Some((name, series)) = &agg.team {
        rows.extend(series.iter().map(|p| ExportRow {
            series: name.clone(),
            metric: agg.metric.key(),
            year: p.year,
            value: p.value,
        }));
    }
    rows
}

/// Spreadsheet apps evaluate cells starting with these characters as formulas.
fn neutralize_formula(cell: &str) -> String {
    if cell.starts_with(['=', '+', '-', '@']) {
        format!("'{cell}")
    } else {
        cell.to_string()
    }
}

/// Save the series as CSV with header `series,metric,year,value`.
pub fn save_csv<P: AsRef<Path>>(agg: &Aggregation, league_label: &str, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["series", "metric", "year", "value"])?;
    for row in export_rows(agg, league_label) {
        wtr.serialize((
            neutralize_formula(&row.series),
            row.metric,
            row.year,
            row.value,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the series as a pretty JSON array of rows.
pub fn save_json<P: AsRef<Path>>(agg: &Aggregation, league_label: &str, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&export_rows(agg, league_label))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
