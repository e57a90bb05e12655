//! Load a Lahman-style `Teams.csv` into a [`Dataset`].
//!
//! Columns are matched by header name (`yearID`, `lgID`, `teamID`, `name`, `G`,
//! `W`, `R`, `H`, `SO`, `HR`); anything else in the file is ignored and never
//! decoded. Numeric cells are parsed as floats, and a cell that is empty, not a
//! number, or not finite (`nan`, `inf`) counts as missing.
//!
//! Rows are kept only when the season is at or after the cutoff year, games,
//! runs, hits, strikeouts and home runs are all present, and games is positive.
//! Everything else, including rows whose used cells are not valid UTF-8, is
//! dropped silently and tallied in the [`LoadReport`].

use crate::config::LoadOptions;
use crate::dataset::{Dataset, LoadReport};
use crate::error::LoadError;
use crate::models::Record;
use csv::{ByteRecord, ReaderBuilder, Trim};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::time::Duration;

const REQUIRED_COLUMNS: [&str; 8] = ["yearID", "lgID", "name", "G", "R", "H", "SO", "HR"];

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }
}

impl From<PathBuf> for Source {
    fn from(p: PathBuf) -> Self {
        Source::File(p)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(p) => write!(f, "{}", p.display()),
            Source::Url(u) => f.write_str(u),
        }
    }
}

/// One CSV row as it appears in the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTeamRow {
    #[serde(rename = "yearID", deserialize_with = "csv::invalid_option")]
    year: Option<i32>,
    #[serde(rename = "lgID")]
    league: String,
    #[serde(rename = "teamID")]
    team_id: String,
    name: String,
    #[serde(rename = "G", deserialize_with = "csv::invalid_option")]
    games: Option<f64>,
    #[serde(rename = "W", deserialize_with = "csv::invalid_option")]
    wins: Option<f64>,
    #[serde(rename = "R", deserialize_with = "csv::invalid_option")]
    runs: Option<f64>,
    #[serde(rename = "H", deserialize_with = "csv::invalid_option")]
    hits: Option<f64>,
    #[serde(rename = "SO", deserialize_with = "csv::invalid_option")]
    strikeouts: Option<f64>,
    #[serde(rename = "HR", deserialize_with = "csv::invalid_option")]
    home_runs: Option<f64>,
}

enum Verdict {
    Keep(Record),
    BeforeCutoff,
    MissingField,
    NonPositiveGames,
}

fn judge(row: RawTeamRow, opts: &LoadOptions) -> Verdict {
    let RawTeamRow {
        year,
        league,
        team_id,
        name,
        games,
        wins,
        runs,
        hits,
        strikeouts,
        home_runs,
    } = row;
    let Some(year) = year else {
        return Verdict::MissingField;
    };
    if year < opts.min_year {
        return Verdict::BeforeCutoff;
    }
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let (Some(games), Some(runs), Some(hits), Some(strikeouts), Some(home_runs)) = (
        finite(games),
        finite(runs),
        finite(hits),
        finite(strikeouts),
        finite(home_runs),
    ) else {
        return Verdict::MissingField;
    };
    if games <= 0.0 {
        return Verdict::NonPositiveGames;
    }
    Verdict::Keep(Record::new(
        year,
        league,
        team_id,
        name,
        games,
        runs,
        hits,
        strikeouts,
        home_runs,
        finite(wins),
    ))
}

/// Parse CSV text from any reader.
pub fn read_records<R: Read>(reader: R, opts: &LoadOptions) -> Result<Dataset, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|c| !headers.iter().any(|h| h == **c))
    {
        return Err(LoadError::MissingColumn(*missing));
    }

    let byte_headers = rdr.byte_headers()?.clone();

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    let mut raw = ByteRecord::new();
    // Rows are decoded from bytes so only the columns we use must be UTF-8.
    while rdr.read_byte_record(&mut raw)? {
        report.read += 1;
        let row: RawTeamRow = match raw.deserialize(Some(&byte_headers)) {
            Ok(row) => row,
            Err(e) => {
                log::debug!("skipping row {}: {e}", report.read);
                report.missing_fields += 1;
                continue;
            }
        };
        match judge(row, opts) {
            Verdict::Keep(r) => records.push(r),
            Verdict::BeforeCutoff => report.before_cutoff += 1,
            Verdict::MissingField => report.missing_fields += 1,
            Verdict::NonPositiveGames => report.non_positive_games += 1,
        }
    }
    report.kept = records.len();

    log::debug!(
        "read {} rows: kept {}, before {} {}, missing fields {}, non-positive games {}",
        report.read,
        report.kept,
        opts.min_year,
        report.before_cutoff,
        report.missing_fields,
        report.non_positive_games
    );
    if records.is_empty() {
        return Err(LoadError::NoRecords { read: report.read });
    }
    Ok(Dataset::new(records, report))
}

fn http_client() -> Result<HttpClient, reqwest::Error> {
    HttpClient::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(5))
        .user_agent(concat!("teamstats/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    let http_err = |source: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        source,
    };
    let resp = http_client().map_err(http_err)?.get(url).send().map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp.bytes().map_err(http_err)?.to_vec())
}

/// Load and validate the table from `source`.
pub fn load(source: &Source, opts: &LoadOptions) -> Result<Dataset, LoadError> {
    log::info!("loading {source}");
    let dataset = match source {
        Source::File(path) => {
            let file = File::open(path).map_err(|source| LoadError::Open {
                path: path.clone(),
                source,
            })?;
            read_records(BufReader::new(file), opts)?
        }
        Source::Url(url) => read_records(fetch(url)?.as_slice(), opts)?,
    };
    log::info!(
        "loaded {} team-seasons ({} dropped)",
        dataset.len(),
        dataset.report().dropped()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    const HEADER: &str = "yearID,lgID,teamID,franchID,name,G,W,L,R,H,SO,HR\n";

    fn parse(body: &str) -> Result<Dataset, LoadError> {
        read_records(format!("{HEADER}{body}").as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn derives_rates_and_drops_bad_rows() {
        let ds = parse(
            "1959,AL,BOS,BOS,Boston Red Sox,154,75,79,726,1335,685,125\n\
             1961,AL,BOS,BOS,Boston Red Sox,163,76,86,729,1401,,112\n\
             1961,NL,CHN,CHC,Chicago Cubs,0,64,90,689,1364,767,176\n\
             1961,NL,CIN,CIN,Cincinnati Reds,154,93,61,710,1414,787,158\n\
             1962,NL,NYN,NYM,New York Mets,161,40,120,617,NA,982,139\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!(r.team, "Cincinnati Reds");
        assert!((r.runs_per_game - 710.0 / 154.0).abs() < 1e-12);
        assert!((r.home_runs_per_game - 158.0 / 154.0).abs() < 1e-12);
        assert_eq!(r.wins, Some(93.0));

        let rep = ds.report();
        assert_eq!(rep.read, 5);
        assert_eq!(rep.before_cutoff, 1);
        assert_eq!(rep.missing_fields, 2);
        assert_eq!(rep.non_positive_games, 1);
        assert_eq!(rep.dropped(), 4);
    }

    #[test]
    fn non_finite_counts_are_missing() {
        let ds = parse(
            "2004,AL,BOS,BOS,Boston Red Sox,162,98,64,nan,1613,1189,222\n\
             2004,AL,NYA,NYY,New York Yankees,inf,101,61,897,1483,1058,242\n\
             2004,AL,TEX,TEX,Texas Rangers,162,89,73,860,1492,-Infinity,227\n\
             2004,AL,SEA,SEA,Seattle Mariners,162,NaN,99,698,1544,936,136\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.report().missing_fields, 3);
        let r = &ds.records()[0];
        assert_eq!(r.team, "Seattle Mariners");
        assert_eq!(r.wins, None);
        for m in Metric::ALL {
            assert!(r.rate(m).is_finite());
        }
    }

    #[test]
    fn undecodable_bytes_only_drop_rows_that_use_them() {
        let mut csv = b"yearID,lgID,teamID,name,park,G,R,H,SO,HR\n".to_vec();
        csv.extend_from_slice(b"1977,AL,TOR,Toronto Blue Jays,Exhibition Stadium,161,605,1367,819,100\n");
        csv.extend_from_slice(b"1977,NL,MON,Montreal Expos,Stade Olympique \xe9,162,665,1474,929,138\n");
        csv.extend_from_slice(b"1977,NL,MON,Montr\xe9al Expos,Stade Olympique,162,665,1474,929,138\n");
        let ds = read_records(csv.as_slice(), &LoadOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].team, "Montreal Expos");
        assert_eq!(ds.report().missing_fields, 1);
    }

    #[test]
    fn missing_header_is_an_error() {
        let e = read_records(
            "yearID,lgID,name,G,R,H,SO\n2000,AL,X,162,1,1,1\n".as_bytes(),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(e, LoadError::MissingColumn("HR")));
    }

    #[test]
    fn nothing_retained_is_an_error() {
        let e = parse("1950,AL,BOS,BOS,Boston Red Sox,154,94,60,1027,1665,488,121\n").unwrap_err();
        assert!(matches!(e, LoadError::NoRecords { read: 1 }));
    }

    #[test]
    fn source_detects_urls() {
        assert_eq!(
            Source::from("https://example.org/Teams.csv"),
            Source::Url("https://example.org/Teams.csv".into())
        );
        assert_eq!(
            Source::from("data/Teams.csv"),
            Source::File(PathBuf::from("data/Teams.csv"))
        );
    }
}
