use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

use fpl_analyzer::analysis::analyze_team;
use fpl_analyzer::config::AnalyzerConfig;
use fpl_analyzer::error::AnalysisError;
use fpl_analyzer::fpl_fetch::{
    FplSource, SquadPick, parse_bootstrap_json, parse_history_json, parse_picks_json,
};
use fpl_analyzer::history::PeriodRecord;
use fpl_analyzer::player_pool::RawPlayerRecord;
use fpl_analyzer::render::{JsonRenderer, ReportRenderer, TextRenderer};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

struct FixtureSource {
    history: Result<Vec<PeriodRecord>, AnalysisError>,
    picks: Vec<SquadPick>,
    bootstrap: String,
    picks_calls: Cell<u32>,
    pool_calls: Cell<u32>,
}

impl FixtureSource {
    fn new(bootstrap: &str) -> Self {
        Self {
            history: parse_history_json(&read_fixture("entry_history.json")),
            picks: parse_picks_json(&read_fixture("entry_picks.json")).expect("picks fixture"),
            bootstrap: read_fixture(bootstrap),
            picks_calls: Cell::new(0),
            pool_calls: Cell::new(0),
        }
    }
}

impl FplSource for FixtureSource {
    fn team_history(&self, _team_id: u32) -> Result<Vec<PeriodRecord>, AnalysisError> {
        self.history.clone()
    }

    fn team_picks(&self, _team_id: u32, period: u32) -> Result<Vec<SquadPick>, AnalysisError> {
        assert_eq!(period, 6, "picks should be requested for the latest scoring gameweek");
        self.picks_calls.set(self.picks_calls.get() + 1);
        Ok(self.picks.clone())
    }

    fn player_records(&self) -> Result<Vec<RawPlayerRecord>, AnalysisError> {
        self.pool_calls.set(self.pool_calls.get() + 1);
        parse_bootstrap_json(&self.bootstrap)
    }
}

fn names(players: &[fpl_analyzer::Player]) -> Vec<&str> {
    players.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn analyses_fixture_team_end_to_end() {
    let source = FixtureSource::new("bootstrap_static.json");
    let report = analyze_team(&source, 1234, &AnalyzerConfig::default()).expect("analysis ok");

    assert_eq!(report.team_id, 1234);
    assert_eq!(report.current_period, 6);
    let trend: Vec<u32> = report.trend.iter().map(|r| r.period).collect();
    assert_eq!(trend, vec![2, 3, 4, 5, 6]);

    assert_eq!(
        names(report.worst.players()),
        vec!["Fabianski", "Mykolenko", "Andersen", "Eze", "Pedro Porro", "Wissa", "Gvardiol"]
    );
    assert_eq!(
        names(report.best.players()),
        vec!["Salah", "Isak", "Saka", "Gabriel", "Mbeumo", "Raya", "Watkins"]
    );

    let t = report.recommendation.thresholds;
    assert_eq!(t.budget, 373);
    assert!((t.form_floor - 13.7 / 7.0).abs() < 1e-9);
    assert_eq!(t.ownership_ceiling, 15.0);
    assert_eq!(
        names(report.recommendation.players()),
        vec!["Semenyo", "Palmer", "Kluivert", "Mbeumo", "Rogers", "Munoz", "Ndiaye"]
    );
}

#[test]
fn repeated_analysis_is_identical() {
    let source = FixtureSource::new("bootstrap_static.json");
    let config = AnalyzerConfig::default();
    let first = analyze_team(&source, 1, &config).expect("first run");
    let second = analyze_team(&source, 1, &config).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn config_overrides_flow_through() {
    let source = FixtureSource::new("bootstrap_static.json");
    let config = AnalyzerConfig {
        subset_size: 3,
        candidate_count: 2,
        ownership_ceiling: 100.0,
        trend_window: 2,
        ..AnalyzerConfig::default()
    };
    let report = analyze_team(&source, 1, &config).expect("analysis ok");
    assert_eq!(report.worst.len(), 3);
    assert_eq!(report.best.len(), 3);
    assert_eq!(report.recommendation.len(), 2);
    assert_eq!(report.trend.len(), 2);
}

#[test]
fn malformed_pool_aborts_without_report() {
    let source = FixtureSource::new("bootstrap_malformed.json");
    let err = analyze_team(&source, 1, &AnalyzerConfig::default()).expect_err("must fail");
    assert!(matches!(err, AnalysisError::MalformedPlayerRecord { .. }));
}

#[test]
fn history_failure_stops_before_later_fetches() {
    let mut source = FixtureSource::new("bootstrap_static.json");
    source.history = Err(AnalysisError::upstream("team history", "http 404 Not Found"));
    let err = analyze_team(&source, 1, &AnalyzerConfig::default()).expect_err("must fail");
    assert!(matches!(err, AnalysisError::UpstreamUnavailable { .. }));
    assert_eq!(source.picks_calls.get(), 0);
    assert_eq!(source.pool_calls.get(), 0);
}

#[test]
fn season_without_points_is_reported() {
    let mut source = FixtureSource::new("bootstrap_static.json");
    source.history = Ok(vec![PeriodRecord {
        period: 1,
        points: 0,
    }]);
    let err = analyze_team(&source, 77, &AnalyzerConfig::default()).expect_err("must fail");
    assert_eq!(err, AnalysisError::NoCompletedPeriod { team_id: 77 });
    assert_eq!(source.picks_calls.get(), 0);
}

#[test]
fn empty_squad_renders_empty_tables() {
    let mut source = FixtureSource::new("bootstrap_static.json");
    source.picks = Vec::new();
    let report = analyze_team(&source, 1, &AnalyzerConfig::default()).expect("analysis ok");
    assert!(report.worst.is_empty());
    assert!(report.best.is_empty());
    assert_eq!(report.recommendation.thresholds.budget, 0);
    assert!(report.recommendation.is_empty());

    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render_report(&report).expect("render ok");
    let out = String::from_utf8(renderer.into_inner()).expect("utf8");
    assert_eq!(out.matches("(none)").count(), 3);
}

#[test]
fn text_report_keeps_column_order() {
    let source = FixtureSource::new("bootstrap_static.json");
    let report = analyze_team(&source, 1234, &AnalyzerConfig::default()).expect("analysis ok");

    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render_report(&report).expect("render ok");
    let out = String::from_utf8(renderer.into_inner()).expect("utf8");

    assert!(out.starts_with("Team Performance for Team ID: 1234\nCurrent Gameweek: 6\n"));
    assert!(out.contains("Player                 Form    Cost\n"));
    assert!(out.contains("Player                 Form    Cost   Owned%\n"));
    assert!(out.contains("Semenyo                 6.4   £5.7m      8.1\n"));
    assert!(out.contains("Salah                   8.7  £13.1m\n"));
}

#[test]
fn json_report_carries_every_table() {
    let source = FixtureSource::new("bootstrap_static.json");
    let report = analyze_team(&source, 1234, &AnalyzerConfig::default()).expect("analysis ok");

    let mut renderer = JsonRenderer::new(Vec::new());
    renderer.render_report(&report).expect("render ok");
    let value: serde_json::Value =
        serde_json::from_slice(&renderer.into_inner()).expect("valid json");

    assert_eq!(value["team_id"], 1234);
    assert_eq!(value["current_period"], 6);
    let trend: Vec<u64> = value["trend"]
        .as_array()
        .expect("trend array")
        .iter()
        .filter_map(|r| r["event"].as_u64())
        .collect();
    assert_eq!(trend, vec![2, 3, 4, 5, 6]);

    assert_eq!(value["worst"].as_array().map(Vec::len), Some(7));
    assert_eq!(value["best"][0]["name"], "Salah");
    assert_eq!(value["best"][0]["form"], 8.7);
    assert_eq!(value["best"][0]["cost"], 131);
    assert_eq!(value["thresholds"]["budget"], 373);
    assert_eq!(value["thresholds"]["ownership_ceiling"], 15.0);
    assert_eq!(
        value["recommended"][0],
        serde_json::json!({ "name": "Semenyo", "form": 6.4, "cost": 57, "ownership": 8.1 })
    );
}
