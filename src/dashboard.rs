use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use log::info;
use rayon::prelude::*;

use crate::config::StandingsSource;
use crate::feed::{Endpoint, Feed};
use crate::sections::{
    Container, GamesSection, LeadersSection, NewsSection, Section, SectionStatus,
    StandingsSection,
};
use crate::surface::Surface;
use crate::view::{Node, escape_text};

pub const LAST_UPDATED_CONTAINER: &str = "lastUpdated";

// Same order as `Dashboard::sections`.
const SECTION_TITLES: [&str; 4] = ["Recent Games", "Standings", "Top Players", "NFL News"];

/// Raw bodies of one fetch round, in request order.
#[derive(Debug)]
pub struct FetchBatch {
    results: Vec<(Endpoint, Result<String>)>,
}

impl FetchBatch {
    pub fn new(results: Vec<(Endpoint, Result<String>)>) -> Self {
        Self { results }
    }

    pub fn take(&mut self, endpoint: Endpoint) -> Option<Result<String>> {
        let idx = self.results.iter().position(|(ep, _)| *ep == endpoint)?;
        Some(self.results.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub section: &'static str,
    pub status: SectionStatus,
}

pub struct Dashboard {
    pub games: GamesSection,
    pub standings: StandingsSection,
    pub leaders: LeadersSection,
    pub news: NewsSection,
    last_updated: Option<String>,
}

impl Dashboard {
    pub fn new(standings: StandingsSource) -> Self {
        let standings = match standings {
            StandingsSource::Static => StandingsSection::final_2025(),
            StandingsSource::Live => StandingsSection::live(),
        };
        Self {
            games: GamesSection::new(),
            standings,
            leaders: LeadersSection::new(),
            news: NewsSection::new(),
            last_updated: None,
        }
    }

    fn sections(&self) -> [&dyn Section; 4] {
        [&self.games, &self.standings, &self.leaders, &self.news]
    }

    fn sections_mut(&mut self) -> [&mut dyn Section; 4] {
        [
            &mut self.games,
            &mut self.standings,
            &mut self.leaders,
            &mut self.news,
        ]
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.sections()
            .iter()
            .filter_map(|s| s.endpoint())
            .collect()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Fetches, waits for every section, applies, and stamps the time.
    pub fn refresh(
        &mut self,
        feed: &dyn Feed,
        parallelism: usize,
        now: NaiveDateTime,
    ) -> Vec<SectionReport> {
        let batch = fetch_all(feed, &self.endpoints(), parallelism);
        self.apply(batch, now)
    }

    /// Hands each section its own result. A missing result leaves the
    /// section as it was.
    pub fn apply(&mut self, mut batch: FetchBatch, now: NaiveDateTime) -> Vec<SectionReport> {
        let mut reports = Vec::new();
        for section in self.sections_mut() {
            if let Some(body) = section.endpoint().and_then(|ep| batch.take(ep)) {
                section.apply(body);
            }
            reports.push(SectionReport {
                section: section.name(),
                status: section.status(),
            });
        }
        self.last_updated = Some(format_last_updated(now));
        let failed = reports
            .iter()
            .filter(|r| matches!(r.status, SectionStatus::Failed(_)))
            .count();
        info!(
            "dashboard refreshed: {} sections, {} failed",
            reports.len(),
            failed
        );
        reports
    }

    pub fn containers(&self) -> Vec<Container> {
        self.sections()
            .iter()
            .flat_map(|s| s.containers())
            .collect()
    }

    /// Container id → view tree, for JSON dumps.
    pub fn view_tree(&self) -> BTreeMap<String, Vec<Node>> {
        let mut tree: BTreeMap<String, Vec<Node>> = self.containers().into_iter().collect();
        if let Some(stamp) = self.last_updated.as_ref() {
            tree.insert(LAST_UPDATED_CONTAINER.to_string(), vec![Node::text(stamp)]);
        }
        tree
    }

    /// Pushes every container to `surface`; returns how many changed.
    pub fn render_into(&self, surface: &mut Surface) -> usize {
        let mut changed = 0;
        if let Some(stamp) = self.last_updated.as_ref() {
            changed += usize::from(surface.set_text(LAST_UPDATED_CONTAINER, stamp));
        }
        for (id, nodes) in self.containers() {
            changed += usize::from(surface.replace(&id, &nodes));
        }
        changed
    }

    /// Full standalone HTML document.
    pub fn render_page(&self) -> String {
        let mut surface = Surface::new();
        self.render_into(&mut surface);

        let mut body = String::new();
        for (title, section) in SECTION_TITLES.into_iter().zip(self.sections()) {
            body.push_str(&format!(
                "<section class=\"dashboard-section\"><h2>{}</h2>",
                escape_text(title)
            ));
            for (id, _) in section.containers() {
                body.push_str(&format!(
                    "<div id=\"{id}\" class=\"container\">{}</div>",
                    surface.get(&id).unwrap_or_default()
                ));
            }
            body.push_str("</section>");
        }

        let stamp = surface.get(LAST_UPDATED_CONTAINER).unwrap_or_default();
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>NFL Stats Dashboard</title><style>{PAGE_CSS}</style></head><body>\
<header><h1>NFL Stats Dashboard</h1><p id=\"{LAST_UPDATED_CONTAINER}\">{stamp}</p></header>\
<main>{body}</main><script>{PAGE_SCRIPT}</script></body></html>\n"
        )
    }
}

/// Fetches `endpoints` in parallel and returns once all of them settled.
pub fn fetch_all(feed: &dyn Feed, endpoints: &[Endpoint], parallelism: usize) -> FetchBatch {
    let pool = build_fetch_pool(parallelism);
    let results = with_fetch_pool(&pool, || {
        endpoints
            .par_iter()
            .map(|endpoint| (*endpoint, feed.fetch(*endpoint)))
            .collect::<Vec<_>>()
    });
    FetchBatch::new(results)
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

/// `Last updated: 1/18/2026, 3:04:05 PM`
pub fn format_last_updated(now: NaiveDateTime) -> String {
    format!("Last updated: {}", now.format("%-m/%-d/%Y, %-I:%M:%S %p"))
}

const PAGE_CSS: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f4f5f7;color:#111}\
header{background:#013369;color:#fff;padding:1rem 2rem}main{padding:1rem 2rem}\
.dashboard-section{margin-bottom:2rem}.error{color:#d50a0a}\
.game-card,.player-card,.news-card{display:inline-block;vertical-align:top;background:#fff;margin:.5rem;padding:.75rem;border-radius:8px}\
.team-row{display:flex;justify-content:space-between;gap:1rem}.team-row.winner{font-weight:700}\
.team-logo{width:24px;height:24px}.game-status.live{color:#d50a0a}\
.division-header{cursor:pointer;display:flex;justify-content:space-between;background:#fff;padding:.5rem}\
.division-content{display:none}.division-item.open .division-content{display:block}\
.playoff-indicator{font-size:.7rem;margin-left:.4rem;padding:0 .3rem;border-radius:3px;background:#ddd}\
.chart-view{display:none}.chart-view.active{display:block}.tab-btn.active{background:#013369;color:#fff}\
.news-card{width:280px;text-decoration:none;color:inherit}.news-image img{width:100%}";

const PAGE_SCRIPT: &str = "function toggleDivision(h){h.parentElement.classList.toggle('open');}\
document.querySelectorAll('.tab-btn').forEach(function(b){b.addEventListener('click',function(){\
var t=b.getAttribute('data-tab');\
document.querySelectorAll('.tab-btn').forEach(function(x){x.classList.toggle('active',x===b);});\
document.querySelectorAll('.chart-view').forEach(function(v){v.classList.toggle('active',v.id===t+'View');});\
});});";

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::format_last_updated;

    #[test]
    fn last_updated_uses_locale_like_format() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 18)
            .and_then(|d| d.and_hms_opt(15, 4, 5))
            .expect("valid timestamp");
        assert_eq!(
            format_last_updated(ts),
            "Last updated: 1/18/2026, 3:04:05 PM"
        );
    }
}
