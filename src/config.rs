use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://site.api.espn.com/apis";
const DEFAULT_HTML_OUT: &str = "nfl_dashboard.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsSource {
    /// Hardcoded final standings of the 2025-26 season, shown as accordions.
    Static,
    /// Standings tree fetched from the API.
    Live,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_base: String,
    pub standings_source: StandingsSource,
    pub feed_dir: Option<PathBuf>,
    pub fetch_parallelism: usize,
    pub request_timeout: Duration,
    pub html_out: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            standings_source: StandingsSource::Static,
            feed_dir: None,
            fetch_parallelism: 4,
            request_timeout: Duration::from_secs(10),
            html_out: PathBuf::from(DEFAULT_HTML_OUT),
        }
    }
}

impl DashboardConfig {
    /// Reads `NFL_*` variables. Call `dotenvy` first so `.env` files apply.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base = env::var("NFL_API_BASE")
            .ok()
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        let standings_source = env::var("NFL_STANDINGS_SOURCE")
            .ok()
            .and_then(|val| parse_standings_source(&val))
            .unwrap_or(defaults.standings_source);
        let feed_dir = env::var("NFL_FEED_DIR")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);
        let fetch_parallelism = env::var("NFL_FETCH_PARALLELISM")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.fetch_parallelism)
            .clamp(1, 8);
        let request_timeout = Duration::from_secs(
            env::var("NFL_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(10)
                .clamp(2, 60),
        );
        let html_out = env::var("NFL_HTML_OUT")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.html_out);

        Self {
            api_base,
            standings_source,
            feed_dir,
            fetch_parallelism,
            request_timeout,
            html_out,
        }
    }
}

pub fn parse_standings_source(raw: &str) -> Option<StandingsSource> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "static" | "final" | "2025" => Some(StandingsSource::Static),
        "live" | "api" => Some(StandingsSource::Live),
        _ => None,
    }
}
