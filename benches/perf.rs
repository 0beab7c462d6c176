use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;

use nfl_dashboard::config::StandingsSource;
use nfl_dashboard::dashboard::Dashboard;
use nfl_dashboard::feed::{Endpoint, SnapshotFeed};
use nfl_dashboard::leaders::{normalize_leaders, parse_leaders_json};

const LEADERS_JSON: &str = include_str!("../tests/fixtures/leaders.json");
const SCOREBOARD_JSON: &str = include_str!("../tests/fixtures/scoreboard.json");
const NEWS_JSON: &str = include_str!("../tests/fixtures/news.json");
const STANDINGS_JSON: &str = include_str!("../tests/fixtures/standings.json");

fn snapshot_feed() -> SnapshotFeed {
    SnapshotFeed::new()
        .with_body(Endpoint::Leaders, LEADERS_JSON)
        .with_body(Endpoint::Scoreboard, SCOREBOARD_JSON)
        .with_body(Endpoint::News, NEWS_JSON)
        .with_body(Endpoint::Standings, STANDINGS_JSON)
}

fn bench_leaders_normalize(c: &mut Criterion) {
    c.bench_function("leaders_normalize", |b| {
        b.iter(|| {
            let payload = parse_leaders_json(black_box(LEADERS_JSON)).unwrap();
            for stat in ["passingYards", "rushingYards", "receivingYards"] {
                black_box(normalize_leaders(&payload, stat).len());
            }
        })
    });
}

fn bench_render_page(c: &mut Criterion) {
    let feed = snapshot_feed();
    let now = NaiveDate::from_ymd_opt(2026, 1, 18)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    let mut dashboard = Dashboard::new(StandingsSource::Live);
    dashboard.refresh(&feed, 1, now);

    c.bench_function("render_page", |b| {
        b.iter(|| black_box(dashboard.render_page().len()))
    });
}

fn bench_refresh(c: &mut Criterion) {
    let feed = snapshot_feed();
    let now = NaiveDate::from_ymd_opt(2026, 1, 18)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    let mut dashboard = Dashboard::new(StandingsSource::Live);

    c.bench_function("dashboard_refresh", |b| {
        b.iter(|| black_box(dashboard.refresh(&feed, 2, now).len()))
    });
}

criterion_group!(
    benches,
    bench_leaders_normalize,
    bench_render_page,
    bench_refresh
);
criterion_main!(benches);
