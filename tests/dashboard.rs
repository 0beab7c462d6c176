use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use nfl_dashboard::config::StandingsSource;
use nfl_dashboard::dashboard::{Dashboard, LAST_UPDATED_CONTAINER};
use nfl_dashboard::feed::{Endpoint, SnapshotFeed};
use nfl_dashboard::leaders::LeaderCategory;
use nfl_dashboard::sections::{
    GAMES_CONTAINER, LEADERS_CONTAINER, LIVE_STANDINGS_CONTAINER, NEWS_CONTAINER,
    SectionStatus, TOP_PLAYERS_CONTAINER,
};
use nfl_dashboard::surface::Surface;
use nfl_dashboard::view::Node;

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).expect("fixture file should be readable")
}

fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 18)
        .and_then(|d| d.and_hms_opt(hour, min, sec))
        .expect("valid timestamp")
}

fn container(dashboard: &Dashboard, id: &str) -> Vec<Node> {
    dashboard
        .containers()
        .into_iter()
        .find(|(cid, _)| cid == id)
        .map(|(_, nodes)| nodes)
        .expect("container should exist")
}

fn container_text(dashboard: &Dashboard, id: &str) -> String {
    container(dashboard, id)
        .iter()
        .map(Node::text_content)
        .collect::<Vec<_>>()
        .join(" ")
}

fn count_class(nodes: &[Node], class: &str) -> usize {
    nodes.iter().map(|n| n.find_by_class(class).len()).sum()
}

fn loaded_dashboard(source: StandingsSource) -> Dashboard {
    let feed = SnapshotFeed::from_dir(fixtures_dir());
    let mut dashboard = Dashboard::new(source);
    dashboard.refresh(&feed, 2, at(15, 4, 5));
    dashboard
}

#[test]
fn sections_show_loading_before_first_refresh() {
    let dashboard = Dashboard::new(StandingsSource::Static);
    assert!(dashboard.last_updated().is_none());
    assert_eq!(container_text(&dashboard, GAMES_CONTAINER), "Loading games...");
    assert_eq!(container_text(&dashboard, NEWS_CONTAINER), "Loading news...");
    // Built-in standings render immediately.
    assert_eq!(count_class(&container(&dashboard, "afcStandings"), "division-item"), 4);
}

#[test]
fn full_refresh_loads_every_section_and_stamps_time() {
    let feed = SnapshotFeed::from_dir(fixtures_dir());
    let mut dashboard = Dashboard::new(StandingsSource::Static);
    let reports = dashboard.refresh(&feed, 2, at(15, 4, 5));

    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|r| r.status == SectionStatus::Loaded));
    assert_eq!(
        dashboard.last_updated(),
        Some("Last updated: 1/18/2026, 3:04:05 PM")
    );

    let games = container(&dashboard, GAMES_CONTAINER);
    assert_eq!(count_class(&games, "game-card"), 4);
    assert_eq!(count_class(&games, "winner"), 1);
    assert_eq!(count_class(&games, "live"), 1);

    let players = container(&dashboard, TOP_PLAYERS_CONTAINER);
    assert_eq!(count_class(&players, "player-card"), 3);
}

#[test]
fn static_standings_do_not_hit_the_feed() {
    let dashboard = Dashboard::new(StandingsSource::Static);
    assert!(!dashboard.endpoints().contains(&Endpoint::Standings));
    let live = Dashboard::new(StandingsSource::Live);
    assert!(live.endpoints().contains(&Endpoint::Standings));
}

#[test]
fn one_failing_section_leaves_the_others_alone() {
    let feed = SnapshotFeed::new()
        .with_failure(Endpoint::Scoreboard, "connection refused")
        .with_body(Endpoint::Leaders, read_fixture("leaders.json"))
        .with_body(Endpoint::News, read_fixture("news.json"));
    let mut dashboard = Dashboard::new(StandingsSource::Static);
    let reports = dashboard.refresh(&feed, 4, at(9, 0, 0));

    assert!(matches!(reports[0].status, SectionStatus::Failed(_)));
    assert_eq!(
        container_text(&dashboard, GAMES_CONTAINER),
        "Failed to load games. Please try again later."
    );
    assert_eq!(
        count_class(&container(&dashboard, NEWS_CONTAINER), "news-card"),
        3
    );
    assert!(dashboard.last_updated().is_some());
}

#[test]
fn empty_and_malformed_payloads_render_messages() {
    let feed = SnapshotFeed::new()
        .with_body(Endpoint::Scoreboard, r#"{"events":[]}"#)
        .with_body(Endpoint::Leaders, r#"{"leaders":[]}"#)
        .with_body(Endpoint::News, "{}")
        .with_body(Endpoint::Standings, "[]");
    let mut dashboard = Dashboard::new(StandingsSource::Live);
    let reports = dashboard.refresh(&feed, 2, at(9, 0, 0));

    assert_eq!(reports[0].status, SectionStatus::Empty);
    assert_eq!(
        container_text(&dashboard, GAMES_CONTAINER),
        "No playoff games scheduled - check back soon"
    );
    assert_eq!(
        container_text(&dashboard, TOP_PLAYERS_CONTAINER),
        "No player stats available"
    );
    assert_eq!(container_text(&dashboard, NEWS_CONTAINER), "Failed to load news");
    assert_eq!(
        container_text(&dashboard, LIVE_STANDINGS_CONTAINER),
        "Failed to load standings"
    );
}

#[test]
fn news_shows_at_most_three_cards() {
    let dashboard = loaded_dashboard(StandingsSource::Static);
    let news = container(&dashboard, NEWS_CONTAINER);
    assert_eq!(count_class(&news, "news-card"), 3);
    let html = news.iter().map(Node::to_html).collect::<String>();
    assert!(!html.contains("Fourth article never shown"));
}

#[test]
fn empty_leader_category_gets_no_data_row_and_no_chart() {
    let body = r#"{"leaders":[
        {"name":"passingYards","displayName":"Passing Yards","leaders":[
            {"displayValue":"4,918","value":4918,"athlete":{"id":"1","displayName":"Joe Burrow","team":{"abbreviation":"CIN"}}}
        ]},
        {"name":"rushingYards","displayName":"Rushing Yards","leaders":[]}
    ]}"#;
    let feed = SnapshotFeed::new().with_body(Endpoint::Leaders, body);
    let mut dashboard = Dashboard::new(StandingsSource::Static);
    dashboard.refresh(&feed, 1, at(9, 0, 0));

    let leaders = &dashboard.leaders;
    assert!(leaders.chart(LeaderCategory::Passing).is_some());
    assert!(leaders.chart(LeaderCategory::Rushing).is_none());
    assert!(leaders.chart(LeaderCategory::Receiving).is_none());
    assert_eq!(leaders.live_charts(), 1);

    let nodes = container(&dashboard, LEADERS_CONTAINER);
    let no_data = nodes
        .iter()
        .flat_map(|n| n.find_by_class("no-data"))
        .count();
    assert_eq!(no_data, 2);
    let html = nodes.iter().map(Node::to_html).collect::<String>();
    assert!(html.contains(r#"id="rushingTable""#));
    assert!(html.contains("No data available"));
}

#[test]
fn refreshing_replaces_charts_instead_of_stacking_them() {
    let feed = SnapshotFeed::from_dir(fixtures_dir());
    let mut dashboard = Dashboard::new(StandingsSource::Static);
    dashboard.refresh(&feed, 2, at(9, 0, 0));
    assert_eq!(dashboard.leaders.live_charts(), 3);
    dashboard.refresh(&feed, 2, at(9, 5, 0));
    assert_eq!(dashboard.leaders.live_charts(), 3);

    let failing = SnapshotFeed::new().with_failure(Endpoint::Leaders, "timeout");
    dashboard.refresh(&failing, 2, at(9, 10, 0));
    assert_eq!(dashboard.leaders.live_charts(), 0);
    assert_eq!(
        container_text(&dashboard, LEADERS_CONTAINER),
        "Failed to load leaders"
    );
}

#[test]
fn leader_tabs_keep_exactly_one_view_active() {
    let mut dashboard = loaded_dashboard(StandingsSource::Static);
    assert!(dashboard.leaders.select_tab(LeaderCategory::Rushing));

    let nodes = container(&dashboard, LEADERS_CONTAINER);
    let views = nodes
        .iter()
        .flat_map(|n| n.find_by_class("chart-view"))
        .collect::<Vec<_>>();
    assert_eq!(views.len(), 3);
    let active = views
        .iter()
        .filter(|v| v.has_class("active"))
        .map(|v| v.get_attr("id"))
        .collect::<Vec<_>>();
    assert_eq!(active, vec![Some("rushingView")]);

    let active_tabs = nodes
        .iter()
        .flat_map(|n| n.find_by_class("tab-btn"))
        .filter(|b| b.has_class("active"))
        .count();
    assert_eq!(active_tabs, 1);
}

#[test]
fn division_accordions_toggle_independently() {
    let mut dashboard = Dashboard::new(StandingsSource::Static);
    assert_eq!(dashboard.standings.division_keys().len(), 8);

    assert_eq!(dashboard.standings.toggle_division("AFC East"), Some(true));
    assert_eq!(dashboard.standings.toggle_division("NFC East"), Some(true));
    assert_eq!(count_class(&container(&dashboard, "afcStandings"), "open"), 1);
    assert_eq!(count_class(&container(&dashboard, "nfcStandings"), "open"), 1);

    assert_eq!(dashboard.standings.toggle_division("AFC East"), Some(false));
    assert_eq!(count_class(&container(&dashboard, "afcStandings"), "open"), 0);
    assert!(dashboard.standings.is_division_open("NFC East"));
}

#[test]
fn live_standings_render_tables_per_division() {
    let mut dashboard = loaded_dashboard(StandingsSource::Live);
    assert_eq!(dashboard.standings.toggle_division("AFC East"), None);

    let nodes = container(&dashboard, LIVE_STANDINGS_CONTAINER);
    assert_eq!(count_class(&nodes, "conference-standings"), 2);
    assert_eq!(count_class(&nodes, "division-standings"), 3);
    let text = nodes.iter().map(Node::text_content).collect::<String>();
    assert!(text.contains("AFC East"));
    assert!(text.contains("0.824"));
}

#[test]
fn rendering_is_idempotent() {
    let feed = SnapshotFeed::from_dir(fixtures_dir());
    let mut dashboard = Dashboard::new(StandingsSource::Static);
    dashboard.refresh(&feed, 2, at(15, 4, 5));
    let first = dashboard.render_page();
    assert_eq!(first, dashboard.render_page());

    dashboard.refresh(&feed, 2, at(15, 4, 5));
    assert_eq!(first, dashboard.render_page());

    let mut surface = Surface::new();
    assert!(dashboard.render_into(&mut surface) > 0);
    assert_eq!(dashboard.render_into(&mut surface), 0);
    assert_eq!(
        surface.get(LAST_UPDATED_CONTAINER),
        Some("Last updated: 1/18/2026, 3:04:05 PM")
    );
}

#[test]
fn view_tree_serializes_every_container() {
    let dashboard = loaded_dashboard(StandingsSource::Static);
    let tree = dashboard.view_tree();
    for id in [
        LAST_UPDATED_CONTAINER,
        GAMES_CONTAINER,
        "afcStandings",
        "nfcStandings",
        TOP_PLAYERS_CONTAINER,
        LEADERS_CONTAINER,
        NEWS_CONTAINER,
    ] {
        assert!(tree.contains_key(id), "missing {id}");
    }
    let json = serde_json::to_string(&tree).expect("view tree serializes");
    assert!(json.contains("\"kind\":\"element\""));
}
