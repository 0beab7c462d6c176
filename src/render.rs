//! Pure renderers: one normalized record in, one markup fragment out.

use crate::leaders::{LeaderCategory, LeaderRecord, NO_PHOTO, TopPlayer};
use crate::news::{FALLBACK_IMAGE, NewsArticle};
use crate::scoreboard::{Competitor, Game};
use crate::standings::{Division, PlayoffTag, StandingsEntry};
use crate::view::{Element, Node};

pub const NO_DATA: &str = "No data available";
const HIDE_ON_ERROR: &str = "this.style.display='none'";

pub fn error_message(text: &str) -> Node {
    Element::new("p").class("error").text(text).into()
}

pub fn loading_message(text: &str) -> Node {
    Element::new("p").class("loading").text(text).into()
}

pub fn game_card(game: &Game) -> Node {
    let status_class = if game.status.is_live {
        "game-status live"
    } else {
        "game-status"
    };
    Element::new("div")
        .class("game-card")
        .child(
            Element::new("div")
                .class(status_class)
                .text(game.status.description.clone()),
        )
        .child(
            Element::new("div")
                .class("teams")
                .child(team_row(game.away.as_ref(), game.away_winner))
                .child(team_row(game.home.as_ref(), game.home_winner)),
        )
        .into()
}

fn team_row(competitor: Option<&Competitor>, winner: bool) -> Element {
    let row_class = if winner { "team-row winner" } else { "team-row" };
    let Some(c) = competitor else {
        return Element::new("div")
            .class(row_class)
            .child(
                Element::new("div")
                    .class("team-info")
                    .child(Element::new("span").text("TBD")),
            )
            .child(Element::new("span").class("score").text("-"));
    };

    let mut info = Element::new("div").class("team-info");
    if let Some(logo) = c.logo.as_ref() {
        info = info.child(
            Element::new("img")
                .class("team-logo")
                .attr("src", logo.clone())
                .attr("alt", c.display_name.clone())
                .attr("onerror", HIDE_ON_ERROR),
        );
    }
    info = info.child(Element::new("span").text(c.abbreviation.clone()));

    let score = c
        .score
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "-".to_string());

    Element::new("div")
        .class(row_class)
        .child(info)
        .child(Element::new("span").class("score").text(score))
}

/// Collapsible division table. Collapsed unless `open`.
pub fn division_accordion(key: &str, division: &Division, open: bool) -> Node {
    let item_class = if open {
        "division-item open"
    } else {
        "division-item"
    };
    let rows = division
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| static_standings_row(idx + 1, entry));

    Element::new("div")
        .class(item_class)
        .attr("data-division", key)
        .child(
            Element::new("div")
                .class("division-header")
                .attr("onclick", "toggleDivision(this)")
                .child(Element::new("span").text(division.name.clone()))
                .child(Element::new("span").class("arrow").text("▼")),
        )
        .child(
            Element::new("div").class("division-content").child(
                Element::new("table")
                    .child(table_head(&["#", "Team", "Record", "Div"]))
                    .child(Element::new("tbody").children(rows)),
            ),
        )
        .into()
}

fn static_standings_row(rank: usize, entry: &StandingsEntry) -> Element {
    let mut team = Element::new("td").child(
        Element::new("span")
            .class("team-name")
            .text(entry.abbr.clone()),
    );
    if let Some(tag) = entry.playoff {
        let class = match tag {
            PlayoffTag::Division => "playoff-indicator division-winner",
            PlayoffTag::Wildcard => "playoff-indicator wildcard",
        };
        team = team.child(Element::new("span").class(class).text(tag.badge()));
    }
    Element::new("tr")
        .child(Element::new("td").text(rank.to_string()))
        .child(team)
        .child(Element::new("td").class("record-cell").text(entry.record()))
        .child(Element::new("td").class("div-record").text(entry.div_record.clone()))
}

/// Live standings table for one division: logo, team, W, L, T, PCT.
pub fn live_division_table(division: &Division) -> Node {
    let rows = division.entries.iter().map(live_standings_row);
    Element::new("div")
        .class("division-standings")
        .child(Element::new("h3").text(division.name.clone()))
        .child(
            Element::new("table")
                .child(table_head(&["Team", "W", "L", "T", "PCT"]))
                .child(Element::new("tbody").children(rows)),
        )
        .into()
}

pub fn live_standings_row(entry: &StandingsEntry) -> Node {
    let mut team = Element::new("td").class("team-cell");
    if let Some(logo) = entry.logo.as_ref() {
        team = team.child(
            Element::new("img")
                .class("team-logo")
                .attr("src", logo.clone())
                .attr("alt", entry.team.clone())
                .attr("onerror", HIDE_ON_ERROR),
        );
    }
    team = team.child(Element::new("span").class("team-name").text(entry.abbr.clone()));

    Element::new("tr")
        .child(team)
        .child(Element::new("td").text(entry.wins.to_string()))
        .child(Element::new("td").text(entry.losses.to_string()))
        .child(Element::new("td").text(entry.ties.to_string()))
        .child(Element::new("td").class("pct").text(entry.win_percent.clone()))
        .into()
}

pub fn player_card(player: &TopPlayer) -> Node {
    Element::new("div")
        .class("player-card")
        .child(
            Element::new("div")
                .class("player-category")
                .attr("style", format!("background: {}", player.category.color()))
                .text(format!("{} Leader", player.category.label())),
        )
        .child(
            Element::new("div").class("player-photo").child(
                Element::new("img")
                    .attr("src", player.headshot.clone())
                    .attr("alt", player.name.clone())
                    .attr("onerror", format!("this.src='{NO_PHOTO}'")),
            ),
        )
        .child(
            Element::new("div")
                .class("player-info")
                .child(
                    Element::new("h3")
                        .class("player-name")
                        .text(player.name.clone()),
                )
                .child(Element::new("p").class("player-team").text(player.team.clone()))
                .child(
                    Element::new("div")
                        .class("player-stat")
                        .child(
                            Element::new("span")
                                .class("stat-value")
                                .text(player.stat.clone()),
                        )
                        .child(
                            Element::new("span")
                                .class("stat-label")
                                .text(player.stat_label.clone()),
                        ),
                ),
        )
        .into()
}

pub fn leader_tab(category: LeaderCategory, active: bool) -> Node {
    let class = if active { "tab-btn active" } else { "tab-btn" };
    Element::new("button")
        .class(class)
        .attr("data-tab", category.slug())
        .text(category.label())
        .into()
}

/// Leader table; an empty list renders one "no data" row.
pub fn leader_table(category: LeaderCategory, records: &[LeaderRecord]) -> Node {
    let body = if records.is_empty() {
        Element::new("tbody").child(
            Element::new("tr").class("no-data").child(
                Element::new("td")
                    .attr("colspan", "4")
                    .text(NO_DATA),
            ),
        )
    } else {
        Element::new("tbody").children(records.iter().enumerate().map(|(idx, record)| {
            Element::new("tr")
                .child(Element::new("td").text((idx + 1).to_string()))
                .child(Element::new("td").text(record.name.clone()))
                .child(Element::new("td").text(record.team.clone()))
                .child(Element::new("td").class("stat").text(record.display.clone()))
        }))
    };
    Element::new("table")
        .class("leaders-table")
        .attr("id", format!("{}Table", category.slug()))
        .child(table_head(&["#", "Player", "Team", category.label()]))
        .child(body)
        .into()
}

pub fn news_card(article: &NewsArticle) -> Node {
    Element::new("a")
        .attr("href", article.link.clone())
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .class("news-card")
        .child(
            Element::new("div").class("news-image").child(
                Element::new("img")
                    .attr("src", article.image.clone())
                    .attr("alt", article.headline.clone())
                    .attr("onerror", format!("this.src='{FALLBACK_IMAGE}'")),
            ),
        )
        .child(
            Element::new("div")
                .class("news-content")
                .child(
                    Element::new("h3")
                        .class("news-headline")
                        .text(article.headline.clone()),
                )
                .child(
                    Element::new("p")
                        .class("news-excerpt")
                        .text(article.description.clone()),
                )
                .child(Element::new("span").class("news-link").text("Read More →")),
        )
        .into()
}

fn table_head(labels: &[&str]) -> Element {
    Element::new("thead").child(
        Element::new("tr").children(labels.iter().map(|label| Element::new("th").text(*label))),
    )
}
