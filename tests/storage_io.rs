use std::fs;
use teamstats::{Aggregation, Metric, SeriesPoint, YearRange, stats, storage};

fn sample() -> Aggregation {
    Aggregation {
        metric: Metric::Strikeouts,
        years: YearRange::new(2010, 2013),
        league: (2010..=2013)
            .map(|year| SeriesPoint {
                year,
                value: 6.0 + (year - 2010) as f64 * 0.5,
            })
            .collect(),
        team: Some((
            "Houston Astros".into(),
            vec![
                SeriesPoint { year: 2012, value: 7.5 },
                SeriesPoint { year: 2013, value: 9.0 },
            ],
        )),
    }
}

#[test]
fn save_csv_and_json() {
    let agg = sample();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("series.csv");
    storage::save_csv(&agg, "League", &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("series,metric,year,value"));
    assert_eq!(csv_txt.lines().count(), 1 + 6);
    assert!(csv_txt.contains("Houston Astros,strikeouts,2013,9.0"));

    let json_path = dir.path().join("series.json");
    storage::save_json(&agg, "League", &json_path).unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 6);
    assert_eq!(v[5]["series"], "Houston Astros");
    assert_eq!(v[5]["year"], 2013);
}

//test that series names can't smuggle spreadsheet formulas into the export
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let mut agg = sample();
    agg.team = Some(("@SUM(A1:A9)".into(), vec![SeriesPoint { year: 2012, value: 1.0 }]));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.csv");
    storage::save_csv(&agg, "+League", &path).unwrap();
    let txt = fs::read_to_string(&path).unwrap();
    assert!(txt.contains("'+League,strikeouts,2010,6.0"));
    assert!(txt.contains("'@SUM(A1:A9),strikeouts,2012,1.0"));
}

#[test]
fn summaries_cover_both_series() {
    let s = stats::summaries(&sample(), "League");
    assert_eq!(s.len(), 2);
    assert_eq!(s[0].label, "League");
    assert_eq!(s[0].count, 4);
    assert_eq!((s[0].first_year, s[0].last_year), (Some(2010), Some(2013)));
    assert_eq!(s[0].min, Some(6.0));
    assert_eq!(s[0].max, Some(7.5));
    assert_eq!(s[0].mean, Some(6.75));
    assert_eq!(s[0].median, Some(6.75));
    assert_eq!(s[1].median, Some(8.25));
}

#[test]
fn summary_of_empty_series_is_all_none() {
    let s = stats::summarize("League", &Vec::new());
    assert_eq!(s.count, 0);
    assert_eq!(s.mean, None);
    assert_eq!(s.median, None);
    assert_eq!(s.first_year, None);
}
