use anyhow::Result;
use log::{debug, warn};

use crate::accordion::{AccordionState, division_key};
use crate::chart::{ChartBar, ChartSlot, ChartSpec, SvgChart, SvgChartBackend};
use crate::feed::Endpoint;
use crate::leaders::{
    LeaderCategory, LeaderRecord, TopPlayer, normalize_leaders, parse_leaders_json, top_player,
};
use crate::news::{MAX_ARTICLES, NewsArticle, parse_news_json};
use crate::render;
use crate::scoreboard::{Game, parse_scoreboard_json};
use crate::standings::{Conference, final_standings_2025, parse_standings_json};
use crate::tabs::TabSelection;
use crate::view::{Element, Node};

pub const GAMES_CONTAINER: &str = "gamesContainer";
pub const LIVE_STANDINGS_CONTAINER: &str = "liveStandings";
pub const TOP_PLAYERS_CONTAINER: &str = "topPlayersContainer";
pub const LEADERS_CONTAINER: &str = "leadersContainer";
pub const NEWS_CONTAINER: &str = "newsContainer";

/// Where a section stands after its last fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Pending,
    Loaded(T),
    /// Valid answer without anything to show.
    Empty,
    /// Transport failure or a payload of the wrong shape.
    Failed(String),
}

impl<T> SectionState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            SectionState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn status(&self) -> SectionStatus {
        match self {
            SectionState::Pending => SectionStatus::Pending,
            SectionState::Loaded(_) => SectionStatus::Loaded,
            SectionState::Empty => SectionStatus::Empty,
            SectionState::Failed(err) => SectionStatus::Failed(err.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Pending,
    Loaded,
    Empty,
    Failed(String),
}

/// User-visible wording for the non-loaded states.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub loading: &'static str,
    pub empty: &'static str,
    pub failed: &'static str,
}

const GAMES_MESSAGES: Messages = Messages {
    loading: "Loading games...",
    empty: "No playoff games scheduled - check back soon",
    failed: "Failed to load games. Please try again later.",
};

const PLAYERS_MESSAGES: Messages = Messages {
    loading: "Loading player stats...",
    empty: "No player stats available",
    failed: "Failed to load player stats",
};

const LEADERS_MESSAGES: Messages = Messages {
    loading: "Loading leaders...",
    empty: "No leaders available",
    failed: "Failed to load leaders",
};

const STANDINGS_MESSAGES: Messages = Messages {
    loading: "Loading standings...",
    empty: "No standings available",
    failed: "Failed to load standings",
};

const NEWS_MESSAGES: Messages = Messages {
    loading: "Loading news...",
    empty: "No news available",
    failed: "Failed to load news",
};

/// Rendered content for one named container, replaced wholesale.
pub type Container = (String, Vec<Node>);

/// One dashboard section: it names its endpoint, normalizes the fetched
/// body, and renders its containers.
pub trait Section {
    fn name(&self) -> &'static str;

    /// `None` for sections that render built-in data.
    fn endpoint(&self) -> Option<Endpoint>;

    /// Absorbs a fetch result. Errors never leave the section.
    fn apply(&mut self, body: Result<String>);

    fn status(&self) -> SectionStatus;

    fn containers(&self) -> Vec<Container>;
}

fn settle<T>(
    section: &str,
    body: Result<String>,
    parse: impl FnOnce(&str) -> Result<T>,
    is_empty: impl FnOnce(&T) -> bool,
) -> SectionState<T> {
    let parsed = body.and_then(|raw| parse(&raw));
    match parsed {
        Ok(data) if is_empty(&data) => {
            debug!("{section}: empty response");
            SectionState::Empty
        }
        Ok(data) => SectionState::Loaded(data),
        Err(err) => {
            warn!("Error fetching {section}: {err:#}");
            SectionState::Failed(format!("{err:#}"))
        }
    }
}

fn placeholder<T>(state: &SectionState<T>, messages: Messages) -> Option<Node> {
    match state {
        SectionState::Pending => Some(render::loading_message(messages.loading)),
        SectionState::Empty => Some(render::error_message(messages.empty)),
        SectionState::Failed(_) => Some(render::error_message(messages.failed)),
        SectionState::Loaded(_) => None,
    }
}

#[derive(Debug)]
pub struct GamesSection {
    pub state: SectionState<Vec<Game>>,
}

impl GamesSection {
    pub fn new() -> Self {
        Self {
            state: SectionState::Pending,
        }
    }
}

impl Default for GamesSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for GamesSection {
    fn name(&self) -> &'static str {
        "games"
    }

    fn endpoint(&self) -> Option<Endpoint> {
        Some(Endpoint::Scoreboard)
    }

    fn apply(&mut self, body: Result<String>) {
        self.state = settle("games", body, parse_scoreboard_json, Vec::is_empty);
    }

    fn status(&self) -> SectionStatus {
        self.state.status()
    }

    fn containers(&self) -> Vec<Container> {
        let nodes = match placeholder(&self.state, GAMES_MESSAGES) {
            Some(node) => vec![node],
            None => self
                .state
                .loaded()
                .map(|games| games.iter().map(render::game_card).collect())
                .unwrap_or_default(),
        };
        vec![(GAMES_CONTAINER.to_string(), nodes)]
    }
}

#[derive(Debug)]
pub enum StandingsSection {
    /// Built-in season data shown as independent accordions.
    Static {
        conferences: Vec<Conference>,
        accordion: AccordionState,
    },
    Live {
        state: SectionState<Vec<Conference>>,
    },
}

impl StandingsSection {
    pub fn final_2025() -> Self {
        StandingsSection::Static {
            conferences: final_standings_2025(),
            accordion: AccordionState::new(),
        }
    }

    pub fn live() -> Self {
        StandingsSection::Live {
            state: SectionState::Pending,
        }
    }

    pub fn conferences(&self) -> &[Conference] {
        match self {
            StandingsSection::Static { conferences, .. } => conferences,
            StandingsSection::Live { state } => state.loaded().map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Accordion keys in display order; empty for live standings.
    pub fn division_keys(&self) -> Vec<String> {
        match self {
            StandingsSection::Static { conferences, .. } => conferences
                .iter()
                .flat_map(|c| c.divisions.iter().map(|d| division_key(&c.name, &d.name)))
                .collect(),
            StandingsSection::Live { .. } => Vec::new(),
        }
    }

    /// Flips one division. Returns the new open state, or `None` when the
    /// standings have no accordions.
    pub fn toggle_division(&mut self, key: &str) -> Option<bool> {
        match self {
            StandingsSection::Static { accordion, .. } => Some(accordion.toggle(key)),
            StandingsSection::Live { .. } => None,
        }
    }

    pub fn is_division_open(&self, key: &str) -> bool {
        match self {
            StandingsSection::Static { accordion, .. } => accordion.is_open(key),
            StandingsSection::Live { .. } => false,
        }
    }
}

impl Section for StandingsSection {
    fn name(&self) -> &'static str {
        "standings"
    }

    fn endpoint(&self) -> Option<Endpoint> {
        match self {
            StandingsSection::Static { .. } => None,
            StandingsSection::Live { .. } => Some(Endpoint::Standings),
        }
    }

    fn apply(&mut self, body: Result<String>) {
        if let StandingsSection::Live { state } = self {
            *state = settle("standings", body, parse_standings_json, |conferences| {
                conferences
                    .iter()
                    .all(|c| c.divisions.iter().all(|d| d.entries.is_empty()))
            });
        }
    }

    fn status(&self) -> SectionStatus {
        match self {
            StandingsSection::Static { .. } => SectionStatus::Loaded,
            StandingsSection::Live { state } => state.status(),
        }
    }

    fn containers(&self) -> Vec<Container> {
        match self {
            StandingsSection::Static {
                conferences,
                accordion,
            } => conferences
                .iter()
                .map(|conference| {
                    let nodes = conference
                        .divisions
                        .iter()
                        .map(|division| {
                            let key = division_key(&conference.name, &division.name);
                            let open = accordion.is_open(&key);
                            render::division_accordion(&key, division, open)
                        })
                        .collect();
                    (
                        format!("{}Standings", conference.name.to_lowercase()),
                        nodes,
                    )
                })
                .collect(),
            StandingsSection::Live { state } => {
                let nodes = match placeholder(state, STANDINGS_MESSAGES) {
                    Some(node) => vec![node],
                    None => state
                        .loaded()
                        .map(|conferences| {
                            conferences
                                .iter()
                                .map(|conference| -> Node {
                                    Element::new("div")
                                        .class("conference-standings")
                                        .child(Element::new("h2").text(conference.name.clone()))
                                        .children(
                                            conference.divisions.iter().map(render::live_division_table),
                                        )
                                        .into()
                                })
                                .collect::<Vec<Node>>()
                        })
                        .unwrap_or_default(),
                };
                vec![(LIVE_STANDINGS_CONTAINER.to_string(), nodes)]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadersData {
    pub top_players: Vec<TopPlayer>,
    pub categories: Vec<(LeaderCategory, Vec<LeaderRecord>)>,
}

impl LeadersData {
    pub fn records(&self, category: LeaderCategory) -> &[LeaderRecord] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }
}

/// Leaders and top players: player cards, one tab per category, each tab
/// with a chart slot and a table.
#[derive(Debug)]
pub struct LeadersSection {
    pub state: SectionState<LeadersData>,
    tabs: TabSelection<LeaderCategory>,
    charts: SvgChartBackend,
    slots: Vec<(LeaderCategory, ChartSlot<SvgChart>)>,
}

impl LeadersSection {
    pub fn new() -> Self {
        let slots = LeaderCategory::ALL
            .into_iter()
            .map(|c| (c, ChartSlot::new(format!("{}Chart", c.slug()))))
            .collect();
        Self {
            state: SectionState::Pending,
            tabs: TabSelection::new(LeaderCategory::Passing, &LeaderCategory::ALL[1..]),
            charts: SvgChartBackend::new(),
            slots,
        }
    }

    pub fn active_tab(&self) -> LeaderCategory {
        self.tabs.active()
    }

    /// Shows `category` and hides every other view.
    pub fn select_tab(&mut self, category: LeaderCategory) -> bool {
        self.tabs.select(category)
    }

    pub fn next_tab(&mut self) {
        self.tabs.select_next();
    }

    pub fn prev_tab(&mut self) {
        self.tabs.select_prev();
    }

    fn slot(&self, category: LeaderCategory) -> Option<&ChartSlot<SvgChart>> {
        self.slots
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, slot)| slot)
    }

    pub fn chart(&self, category: LeaderCategory) -> Option<&SvgChart> {
        self.slot(category).and_then(ChartSlot::current)
    }

    pub fn live_charts(&self) -> usize {
        self.charts.live()
    }

    fn redraw_charts(&mut self) {
        let data = self.state.loaded();
        for (category, slot) in &mut self.slots {
            let bars = data
                .map(|d| d.records(*category))
                .unwrap_or(&[])
                .iter()
                .map(|r| ChartBar {
                    label: r.name.clone(),
                    value: r.value,
                })
                .collect();
            let spec = ChartSpec {
                title: format!("{} Yards", category.label()),
                color: category.color().to_string(),
                bars,
            };
            slot.redraw(&mut self.charts, &spec);
        }
    }

    fn chart_view(&self, category: LeaderCategory, records: &[LeaderRecord]) -> Node {
        let active = self.tabs.is_active(category);
        let view_class = if active { "chart-view active" } else { "chart-view" };
        let mut canvas = Element::new("div").class("chart-canvas");
        if let Some(slot) = self.slot(category) {
            canvas = canvas.attr("id", slot.canvas_id());
            if let Some(chart) = slot.current() {
                canvas = canvas.child(chart.markup.clone());
            }
        }
        Element::new("div")
            .class(view_class)
            .attr("id", format!("{}View", category.slug()))
            .child(canvas)
            .child(render::leader_table(category, records))
            .into()
    }
}

impl Default for LeadersSection {
    fn default() -> Self {
        Self::new()
    }
}

fn build_leaders(raw: &str) -> Result<LeadersData> {
    let payload = parse_leaders_json(raw)?;
    if payload.leaders.is_empty() {
        return Ok(LeadersData {
            top_players: Vec::new(),
            categories: Vec::new(),
        });
    }
    let top_players = LeaderCategory::ALL
        .into_iter()
        .filter_map(|c| top_player(&payload, c))
        .collect();
    let categories = LeaderCategory::ALL
        .into_iter()
        .map(|c| (c, normalize_leaders(&payload, c.stat_name())))
        .collect();
    Ok(LeadersData {
        top_players,
        categories,
    })
}

impl Section for LeadersSection {
    fn name(&self) -> &'static str {
        "leaders"
    }

    fn endpoint(&self) -> Option<Endpoint> {
        Some(Endpoint::Leaders)
    }

    fn apply(&mut self, body: Result<String>) {
        self.state = settle("player stats", body, build_leaders, |data| {
            data.categories.is_empty()
        });
        self.redraw_charts();
    }

    fn status(&self) -> SectionStatus {
        self.state.status()
    }

    fn containers(&self) -> Vec<Container> {
        let players = match placeholder(&self.state, PLAYERS_MESSAGES) {
            Some(node) => vec![node],
            None => {
                let cards: Vec<Node> = self
                    .state
                    .loaded()
                    .map(|d| d.top_players.iter().map(render::player_card).collect())
                    .unwrap_or_default();
                if cards.is_empty() {
                    vec![render::error_message(PLAYERS_MESSAGES.empty)]
                } else {
                    cards
                }
            }
        };

        let leaders = match &self.state {
            SectionState::Pending | SectionState::Failed(_) => {
                placeholder(&self.state, LEADERS_MESSAGES).into_iter().collect()
            }
            SectionState::Empty | SectionState::Loaded(_) => {
                let data = self.state.loaded();
                let tabs = Element::new("div").class("tabs").children(
                    self.tabs
                        .tabs()
                        .iter()
                        .map(|c| render::leader_tab(*c, self.tabs.is_active(*c))),
                );
                let views = self.tabs.tabs().iter().map(|c| {
                    let records = data.map(|d| d.records(*c)).unwrap_or(&[]);
                    self.chart_view(*c, records)
                });
                let mut nodes: Vec<Node> = vec![tabs.into()];
                nodes.extend(views);
                nodes
            }
        };

        vec![
            (TOP_PLAYERS_CONTAINER.to_string(), players),
            (LEADERS_CONTAINER.to_string(), leaders),
        ]
    }
}

#[derive(Debug)]
pub struct NewsSection {
    pub state: SectionState<Vec<NewsArticle>>,
}

impl NewsSection {
    pub fn new() -> Self {
        Self {
            state: SectionState::Pending,
        }
    }
}

impl Default for NewsSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for NewsSection {
    fn name(&self) -> &'static str {
        "news"
    }

    fn endpoint(&self) -> Option<Endpoint> {
        Some(Endpoint::News)
    }

    fn apply(&mut self, body: Result<String>) {
        self.state = settle("news", body, parse_news_json, Vec::is_empty);
    }

    fn status(&self) -> SectionStatus {
        self.state.status()
    }

    fn containers(&self) -> Vec<Container> {
        let nodes = match placeholder(&self.state, NEWS_MESSAGES) {
            Some(node) => vec![node],
            None => self
                .state
                .loaded()
                .map(|articles| {
                    articles
                        .iter()
                        .take(MAX_ARTICLES)
                        .map(render::news_card)
                        .collect()
                })
                .unwrap_or_default(),
        };
        vec![(NEWS_CONTAINER.to_string(), nodes)]
    }
}
