use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::config::DashboardConfig;
use crate::http_client::http_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Scoreboard,
    Leaders,
    News,
    Standings,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Scoreboard => "/site/v2/sports/football/nfl/scoreboard",
            Endpoint::Leaders => "/site/v2/sports/football/nfl/leaders",
            Endpoint::News => "/site/v2/sports/football/nfl/news",
            Endpoint::Standings => "/v2/sports/football/nfl/standings",
        }
    }

    /// File name used by snapshot directories.
    pub fn file_name(self) -> &'static str {
        match self {
            Endpoint::Scoreboard => "scoreboard.json",
            Endpoint::Leaders => "leaders.json",
            Endpoint::News => "news.json",
            Endpoint::Standings => "standings.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Scoreboard => "scoreboard",
            Endpoint::Leaders => "leaders",
            Endpoint::News => "news",
            Endpoint::Standings => "standings",
        }
    }
}

/// Source of raw JSON bodies. Implementations are shared across the fetch
/// threads and handed to background loaders.
pub trait Feed: Send + Sync {
    fn fetch(&self, endpoint: Endpoint) -> Result<String>;
}

pub struct EspnFeed {
    base: String,
    timeout: Duration,
}

impl EspnFeed {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base: base.into(),
            timeout,
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), endpoint.path())
    }
}

impl Feed for EspnFeed {
    fn fetch(&self, endpoint: Endpoint) -> Result<String> {
        let client = http_client(self.timeout)?;
        let url = self.url(endpoint);
        debug!("GET {url}");
        let resp = client
            .get(&url)
            .send()
            .with_context(|| format!("{} request failed", endpoint.label()))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {} from {}", status, endpoint.label()));
        }
        Ok(body)
    }
}

/// Serves canned bodies, either from memory or from a directory holding one
/// `<endpoint>.json` file per endpoint. Missing bodies fail like a transport
/// error would.
#[derive(Debug, Default, Clone)]
pub struct SnapshotFeed {
    dir: Option<PathBuf>,
    bodies: HashMap<Endpoint, std::result::Result<String, String>>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
            bodies: HashMap::new(),
        }
    }

    pub fn with_body(mut self, endpoint: Endpoint, body: impl Into<String>) -> Self {
        self.bodies.insert(endpoint, Ok(body.into()));
        self
    }

    pub fn with_failure(mut self, endpoint: Endpoint, message: impl Into<String>) -> Self {
        self.bodies.insert(endpoint, Err(message.into()));
        self
    }
}

impl Feed for SnapshotFeed {
    fn fetch(&self, endpoint: Endpoint) -> Result<String> {
        if let Some(body) = self.bodies.get(&endpoint) {
            return body.clone().map_err(|msg| anyhow!(msg));
        }
        let Some(dir) = self.dir.as_ref() else {
            return Err(anyhow!("no snapshot for {}", endpoint.label()));
        };
        let path = dir.join(endpoint.file_name());
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }
}

/// Picks the offline snapshot feed when `NFL_FEED_DIR` is set, else ESPN.
pub fn feed_from_config(config: &DashboardConfig) -> Arc<dyn Feed> {
    match config.feed_dir.as_ref() {
        Some(dir) => Arc::new(SnapshotFeed::from_dir(dir)),
        None => Arc::new(EspnFeed::new(
            config.api_base.clone(),
            config.request_timeout,
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Endpoint, EspnFeed, Feed, SnapshotFeed};

    #[test]
    fn espn_urls_join_base_and_path() {
        let feed = EspnFeed::new("https://site.api.espn.com/apis/", Duration::from_secs(1));
        assert_eq!(
            feed.url(Endpoint::Scoreboard),
            "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard"
        );
        assert_eq!(
            feed.url(Endpoint::Standings),
            "https://site.api.espn.com/apis/v2/sports/football/nfl/standings"
        );
    }

    #[test]
    fn snapshot_feed_serves_bodies_and_failures() {
        let feed = SnapshotFeed::new()
            .with_body(Endpoint::News, "{}")
            .with_failure(Endpoint::Leaders, "boom");
        assert_eq!(feed.fetch(Endpoint::News).expect("body"), "{}");
        assert!(feed.fetch(Endpoint::Leaders).is_err());
        assert!(feed.fetch(Endpoint::Scoreboard).is_err());
    }
}
