use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub abbreviation: String,
    pub display_name: String,
    pub logo: Option<String>,
    /// Raw score text as sent by the API; empty before kickoff.
    pub score: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameStatus {
    pub description: String,
    pub is_live: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub home: Option<Competitor>,
    pub away: Option<Competitor>,
    pub status: GameStatus,
    pub home_winner: bool,
    pub away_winner: bool,
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    events: Vec<EventRaw>,
}

#[derive(Debug, Deserialize)]
struct EventRaw {
    #[serde(default)]
    competitions: Option<Vec<CompetitionRaw>>,
    #[serde(default)]
    status: Option<StatusRaw>,
}

#[derive(Debug, Deserialize)]
struct CompetitionRaw {
    #[serde(default)]
    competitors: Option<Vec<CompetitorRaw>>,
}

#[derive(Debug, Deserialize)]
struct CompetitorRaw {
    #[serde(rename = "homeAway", default)]
    home_away: Option<String>,
    #[serde(default)]
    team: Option<TeamRaw>,
    #[serde(default)]
    score: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TeamRaw {
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(default)]
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusRaw {
    #[serde(rename = "type", default)]
    status_type: Option<StatusTypeRaw>,
}

#[derive(Debug, Deserialize)]
struct StatusTypeRaw {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
}

/// Parses a scoreboard body. A body without an `events` array is malformed;
/// an empty array is a valid "no games" answer.
pub fn parse_scoreboard_json(raw: &str) -> Result<Vec<Game>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid scoreboard json")?;
    if !root.get("events").is_some_and(Value::is_array) {
        return Err(anyhow!("scoreboard payload has no events array"));
    }
    let data: ScoreboardResponse =
        serde_json::from_value(root).context("unexpected scoreboard shape")?;
    Ok(data.events.into_iter().map(build_game).collect())
}

fn build_game(event: EventRaw) -> Game {
    let mut home = None;
    let mut away = None;
    let competitors = event
        .competitions
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.competitors)
        .unwrap_or_default();
    for raw in competitors {
        let side = raw.home_away.clone().unwrap_or_default();
        let slot = match side.as_str() {
            "home" => &mut home,
            "away" => &mut away,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(competitor(raw));
        }
    }

    let status_type = event.status.and_then(|s| s.status_type);
    let status = GameStatus {
        description: status_type
            .as_ref()
            .and_then(|t| t.description.clone())
            .unwrap_or_default(),
        is_live: status_type
            .as_ref()
            .and_then(|t| t.state.as_deref())
            .is_some_and(|state| state == "in"),
        completed: status_type
            .as_ref()
            .and_then(|t| t.completed)
            .unwrap_or(false),
    };

    let (home_winner, away_winner) =
        winner_flags(status.completed, home.as_ref(), away.as_ref());

    Game {
        home,
        away,
        status,
        home_winner,
        away_winner,
    }
}

fn competitor(raw: CompetitorRaw) -> Competitor {
    let team = raw.team;
    let score = raw.score.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    Competitor {
        abbreviation: team
            .as_ref()
            .and_then(|t| t.abbreviation.clone())
            .unwrap_or_default(),
        display_name: team
            .as_ref()
            .and_then(|t| t.display_name.clone())
            .unwrap_or_default(),
        logo: team.and_then(|t| t.logo).filter(|logo| !logo.is_empty()),
        score,
    }
}

/// `(home, away)` winner flags. Only completed games with both sides and
/// integer scores can have a winner; a tie has none.
pub fn winner_flags(
    completed: bool,
    home: Option<&Competitor>,
    away: Option<&Competitor>,
) -> (bool, bool) {
    if !completed {
        return (false, false);
    }
    let (Some(home), Some(away)) = (home, away) else {
        return (false, false);
    };
    let (Some(h), Some(a)) = (parse_score(home), parse_score(away)) else {
        return (false, false);
    };
    (h > a, a > h)
}

fn parse_score(competitor: &Competitor) -> Option<i64> {
    competitor.score.as_deref()?.trim().parse::<i64>().ok()
}
