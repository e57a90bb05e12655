use teamstats::aggregate::aggregate;
use teamstats::loader::read_records;
use teamstats::{
    Dashboard, Dataset, FilterEvent, FilterState, LoadOptions, Metric, Selection, SeriesPoint,
    YearRange,
};

const HEADER: &str = "yearID,lgID,teamID,franchID,name,G,W,L,R,H,SO,HR\n";

fn dataset(body: &str) -> Dataset {
    read_records(format!("{HEADER}{body}").as_bytes(), &LoadOptions::default()).unwrap()
}

fn two_leagues() -> Dataset {
    dataset(
        "2000,A,XXX,XXX,X,10,5,5,50,90,60,12\n\
         2000,B,YYY,YYY,Y,10,5,5,20,80,70,8\n",
    )
}

#[test]
fn league_filter_averages_only_that_league() {
    let mut d = Dashboard::new(two_leagues());
    d.dispatch(FilterEvent::League(Selection::only("A")));
    let agg = &d.view().aggregation;
    assert_eq!(agg.league, vec![SeriesPoint { year: 2000, value: 5.0 }]);
    assert!(agg.team.is_none());
}

#[test]
fn selected_team_is_compared_to_all_leagues() {
    let mut d = Dashboard::new(two_leagues());
    d.dispatch(FilterEvent::Team(Selection::only("X")));
    let agg = &d.view().aggregation;
    assert_eq!(agg.league, vec![SeriesPoint { year: 2000, value: 3.5 }]);
    assert_eq!(
        agg.team,
        Some(("X".to_string(), vec![SeriesPoint { year: 2000, value: 5.0 }]))
    );
}

#[test]
fn year_range_without_rows_gives_empty_series() {
    let ds = two_leagues();
    let state = FilterState {
        league: Selection::All,
        team: Selection::only("X"),
        metric: Metric::Runs,
        years: YearRange::new(2001, 2005),
    };
    let agg = aggregate(ds.records(), &state);
    assert!(agg.league.is_empty());
    assert_eq!(agg.team_series().map(Vec::len), Some(0));

    let svg = teamstats::viz::render_svg_string(&agg, "empty", &Default::default()).unwrap();
    assert!(svg.contains("Year"));
    assert!(!svg.contains("<circle"));
}

#[test]
fn each_metric_uses_its_own_rate() {
    let mut d = Dashboard::new(two_leagues());
    d.dispatch(FilterEvent::League(Selection::only("B")));
    let expect = [
        (Metric::Runs, 2.0),
        (Metric::Hits, 8.0),
        (Metric::Strikeouts, 7.0),
        (Metric::HomeRuns, 0.8),
    ];
    for (metric, value) in expect {
        d.dispatch(FilterEvent::Metric(metric));
        let got = d.view().aggregation.league[0].value;
        assert!((got - value).abs() < 1e-12, "{metric}: {got}");
    }
}

#[test]
fn inverted_year_range_is_kept_and_empty() {
    let ds = dataset(
        "1990,AL,BOS,BOS,Boston Red Sox,162,88,74,699,1502,1033,106\n\
         1995,AL,BOS,BOS,Boston Red Sox,144,86,58,791,1406,1026,175\n\
         2000,AL,BOS,BOS,Boston Red Sox,162,85,77,792,1503,1019,167\n",
    );
    let mut d = Dashboard::new(ds);
    d.dispatch(FilterEvent::YearMin(1999));
    d.dispatch(FilterEvent::YearMax(1991));
    assert_eq!(d.state().years, YearRange::new(1999, 1991));
    assert!(d.view().aggregation.is_empty());
}
