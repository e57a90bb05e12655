use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use teamstats::{
    Config, Dashboard, Dataset, FilterEvent, Metric, Selection, Source, loader, stats, storage,
    viz,
};

#[derive(Parser, Debug)]
#[command(
    name = "teamstats",
    version,
    about = "Chart league-wide and per-team baseball rates from Teams.csv"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate the selection and draw it (optionally export and print stats).
    Render(RenderArgs),
    /// List the leagues, teams and year span found in the data.
    Options(OptionsArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Path or http(s) URL of a Teams.csv file.
    source: String,
    /// TOML file with [chart] and [data] settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop seasons before this year (overrides the config file, default 1960).
    #[arg(long)]
    min_year: Option<i32>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: SourceArgs,
    /// League code (e.g., AL, NL), or All.
    #[arg(short, long)]
    league: Option<String>,
    /// Team name as written in the data (e.g., "Boston Red Sox"), or All.
    #[arg(short, long)]
    team: Option<String>,
    /// runs, hits, strikeouts or home_runs.
    #[arg(short, long, default_value = "runs")]
    metric: String,
    /// First season to include.
    #[arg(long)]
    from: Option<i32>,
    /// Last season to include.
    #[arg(long)]
    to: Option<i32>,
    /// Chart output path (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Chart width in pixels (default 900).
    #[arg(long)]
    width: Option<u32>,
    /// Chart height in pixels (default 400).
    #[arg(long)]
    height: Option<u32>,
    /// TrueType font for PNG output.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Save the aggregated series to file (format inferred by --format or extension).
    #[arg(long)]
    export: Option<PathBuf>,
    /// Export format (csv or json). If omitted, inferred from --export extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print series statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct OptionsArgs {
    #[command(flatten)]
    input: SourceArgs,
    /// Only list the teams of this league.
    #[arg(short, long)]
    league: Option<String>,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Options(args) => cmd_options(args),
    }
}

fn load_input(input: &SourceArgs) -> Result<(Config, Dataset)> {
    let mut config = match &input.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(y) = input.min_year {
        config.data.min_year = y;
    }
    let source = Source::from(input.source.as_str());
    let dataset = loader::load(&source, &config.data)?;
    let report = dataset.report();
    eprintln!(
        "Loaded {} team-seasons from {} ({} rows skipped)",
        dataset.len(),
        source,
        report.dropped()
    );
    Ok((config, dataset))
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let (mut config, dataset) = load_input(&args.input)?;
    if let Some(w) = args.width {
        config.chart.width = w;
    }
    if let Some(h) = args.height {
        config.chart.height = h;
    }
    if let Some(font) = &args.font {
        viz::fonts::register_font_file(font)?;
    }
    let metric: Metric = args.metric.parse()?;

    let league = Selection::from_value(args.league.as_deref().unwrap_or_default());
    if let Selection::Only(code) = &league
        && !dataset.has_league(code)
    {
        bail!(
            "unknown league {code:?}, available: {}",
            dataset.leagues().join(", ")
        );
    }
    let team = Selection::from_value(args.team.as_deref().unwrap_or_default());
    if let Selection::Only(name) = &team
        && !dataset.has_team(&league, name)
    {
        bail!(
            "no team named {name:?} in league {:?} (see `teamstats options`)",
            league.as_value()
        );
    }

    let mut dashboard = Dashboard::new(dataset);
    let mut events = vec![
        FilterEvent::League(league),
        FilterEvent::Team(team),
        FilterEvent::Metric(metric),
    ];
    events.extend(args.from.map(FilterEvent::YearMin));
    events.extend(args.to.map(FilterEvent::YearMax));
    for event in events {
        dashboard.dispatch(event);
    }
    let view = dashboard.view();
    let agg = &view.aggregation;
    if agg.is_empty() {
        eprintln!("No seasons match {}; drawing axes only", view.year_label);
    }

    viz::render_to_file(agg, &view.title, &args.out, &config.chart)?;
    eprintln!("Wrote chart to {}", args.out.display());

    if let Some(path) = args.export.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        let label = &config.chart.league_label;
        match fmt.as_str() {
            "csv" => storage::save_csv(agg, label, path),
            "json" => storage::save_json(agg, label, path),
            other => bail!("unsupported format: {}", other),
        }
        .with_context(|| format!("exporting to {}", path.display()))?;
        eprintln!("Saved series to {}", path.display());
    }

    if args.stats {
        for s in stats::summaries(agg, &config.chart.league_label) {
            println!(
                "{} • {}  count={}  years={}-{}  min={} max={} mean={} median={}",
                s.label,
                metric.label(),
                s.count,
                s.first_year.map_or("NA".into(), |y| y.to_string()),
                s.last_year.map_or("NA".into(), |y| y.to_string()),
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}

fn cmd_options(args: OptionsArgs) -> Result<()> {
    let (_, dataset) = load_input(&args.input)?;
    let league = Selection::from_value(args.league.as_deref().unwrap_or_default());
    if let Some(years) = dataset.year_bounds() {
        println!("Years: {}", years.label());
    }
    println!("Leagues: {}", dataset.leagues().join(", "));
    println!("Teams ({}):", league.as_value());
    for team in dataset.teams(&league) {
        println!("  {team}");
    }
    Ok(())
}
