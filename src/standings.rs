use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

pub const WIN_PERCENT_FALLBACK: &str = ".000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayoffTag {
    Division,
    Wildcard,
}

impl PlayoffTag {
    pub fn badge(self) -> &'static str {
        match self {
            PlayoffTag::Division => "DIV",
            PlayoffTag::Wildcard => "WC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsEntry {
    pub team: String,
    pub abbr: String,
    pub logo: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub win_percent: String,
    pub div_record: String,
    pub playoff: Option<PlayoffTag>,
}

impl StandingsEntry {
    /// `W-L`, or `W-L-T` when the team has ties.
    pub fn record(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub name: String,
    pub entries: Vec<StandingsEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conference {
    pub name: String,
    pub divisions: Vec<Division>,
}

struct SeedTeam {
    team: &'static str,
    abbr: &'static str,
    wins: u32,
    losses: u32,
    ties: u32,
    div_record: &'static str,
    playoff: Option<PlayoffTag>,
}

const fn seed(
    team: &'static str,
    abbr: &'static str,
    wins: u32,
    losses: u32,
    ties: u32,
    div_record: &'static str,
    playoff: Option<PlayoffTag>,
) -> SeedTeam {
    SeedTeam {
        team,
        abbr,
        wins,
        losses,
        ties,
        div_record,
        playoff,
    }
}

const DIV: Option<PlayoffTag> = Some(PlayoffTag::Division);
const WC: Option<PlayoffTag> = Some(PlayoffTag::Wildcard);

type SeedDivision = (&'static str, [SeedTeam; 4]);

const AFC_2025: [SeedDivision; 4] = [
    (
        "East",
        [
            seed("New England Patriots", "NE", 14, 3, 0, "5-1", DIV),
            seed("Buffalo Bills", "BUF", 12, 5, 0, "4-2", WC),
            seed("Miami Dolphins", "MIA", 7, 10, 0, "3-3", None),
            seed("New York Jets", "NYJ", 3, 14, 0, "0-6", None),
        ],
    ),
    (
        "North",
        [
            seed("Pittsburgh Steelers", "PIT", 10, 7, 0, "4-2", DIV),
            seed("Baltimore Ravens", "BAL", 8, 9, 0, "3-3", None),
            seed("Cincinnati Bengals", "CIN", 6, 11, 0, "3-3", None),
            seed("Cleveland Browns", "CLE", 5, 12, 0, "2-4", None),
        ],
    ),
    (
        "South",
        [
            seed("Jacksonville Jaguars", "JAX", 13, 4, 0, "5-1", DIV),
            seed("Houston Texans", "HOU", 12, 5, 0, "4-2", WC),
            seed("Indianapolis Colts", "IND", 8, 9, 0, "3-3", None),
            seed("Tennessee Titans", "TEN", 3, 14, 0, "0-6", None),
        ],
    ),
    (
        "West",
        [
            seed("Denver Broncos", "DEN", 14, 3, 0, "5-1", DIV),
            seed("Los Angeles Chargers", "LAC", 11, 6, 0, "4-2", WC),
            seed("Kansas City Chiefs", "KC", 6, 11, 0, "1-5", None),
            seed("Las Vegas Raiders", "LV", 3, 14, 0, "2-4", None),
        ],
    ),
];

const NFC_2025: [SeedDivision; 4] = [
    (
        "East",
        [
            seed("Philadelphia Eagles", "PHI", 11, 6, 0, "4-2", DIV),
            seed("Dallas Cowboys", "DAL", 7, 9, 1, "3-3", None),
            seed("Washington Commanders", "WAS", 5, 12, 0, "2-4", None),
            seed("New York Giants", "NYG", 4, 13, 0, "2-4", None),
        ],
    ),
    (
        "North",
        [
            seed("Chicago Bears", "CHI", 11, 6, 0, "5-1", DIV),
            seed("Green Bay Packers", "GB", 9, 8, 0, "3-3", WC),
            seed("Minnesota Vikings", "MIN", 9, 8, 0, "3-3", None),
            seed("Detroit Lions", "DET", 8, 9, 0, "3-3", None),
        ],
    ),
    (
        "South",
        [
            seed("Carolina Panthers", "CAR", 8, 9, 0, "3-3", DIV),
            seed("Tampa Bay Buccaneers", "TB", 8, 9, 0, "3-3", None),
            seed("Atlanta Falcons", "ATL", 8, 9, 0, "3-3", None),
            seed("New Orleans Saints", "NO", 7, 10, 0, "3-3", None),
        ],
    ),
    (
        "West",
        [
            seed("Seattle Seahawks", "SEA", 14, 3, 0, "6-0", DIV),
            seed("Los Angeles Rams", "LAR", 12, 5, 0, "4-2", WC),
            seed("San Francisco 49ers", "SF", 12, 5, 0, "3-3", WC),
            seed("Arizona Cardinals", "ARI", 5, 12, 0, "1-5", None),
        ],
    ),
];

/// Final 2025-26 regular-season standings, AFC first.
pub fn final_standings_2025() -> Vec<Conference> {
    vec![
        seeded_conference("AFC", &AFC_2025),
        seeded_conference("NFC", &NFC_2025),
    ]
}

fn seeded_conference(name: &str, divisions: &[SeedDivision]) -> Conference {
    Conference {
        name: name.to_string(),
        divisions: divisions
            .iter()
            .map(|(division, teams)| Division {
                name: division.to_string(),
                entries: teams.iter().map(seeded_entry).collect(),
            })
            .collect(),
    }
}

fn seeded_entry(seed: &SeedTeam) -> StandingsEntry {
    let games = seed.wins + seed.losses + seed.ties;
    let pct = (games > 0)
        .then(|| (seed.wins as f64 + seed.ties as f64 * 0.5) / games as f64);
    StandingsEntry {
        team: seed.team.to_string(),
        abbr: seed.abbr.to_string(),
        logo: None,
        wins: seed.wins,
        losses: seed.losses,
        ties: seed.ties,
        win_percent: format_win_percent(pct),
        div_record: seed.div_record.to_string(),
        playoff: seed.playoff,
    }
}

pub fn format_win_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.3}"),
        None => WIN_PERCENT_FALLBACK.to_string(),
    }
}

/// Parses the live standings tree (conference → division → entries). A
/// conference reported without division children becomes a single
/// division named after the conference.
pub fn parse_standings_json(raw: &str) -> Result<Vec<Conference>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid standings json")?;
    let conferences = root
        .get("children")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("standings payload has no children array"))?;

    Ok(conferences.iter().map(parse_conference).collect())
}

fn parse_conference(node: &Value) -> Conference {
    let name = pick_str(node, &["abbreviation", "name"]).unwrap_or_default();
    let divisions = match node.get("children").and_then(Value::as_array) {
        Some(children) => children
            .iter()
            .map(|child| Division {
                name: pick_str(child, &["name", "abbreviation"]).unwrap_or_default(),
                entries: extract_division_rows(division_entries(child)),
            })
            .collect(),
        None => vec![Division {
            name: name.clone(),
            entries: extract_division_rows(division_entries(node)),
        }],
    };
    Conference { name, divisions }
}

fn division_entries(node: &Value) -> &[Value] {
    node.get("standings")
        .and_then(|s| s.get("entries"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// One fully formed row per entry, whatever stats are missing.
pub fn extract_division_rows(entries: &[Value]) -> Vec<StandingsEntry> {
    entries.iter().map(extract_row).collect()
}

fn extract_row(entry: &Value) -> StandingsEntry {
    let team = entry.get("team").unwrap_or(&Value::Null);
    let stats = stat_lookup(entry);

    let count = |name: &str| -> u32 {
        stats
            .get(name)
            .and_then(|stat| stat_number(stat))
            .map(|v| v.max(0.0).round() as u32)
            .unwrap_or(0)
    };

    let logo = team
        .get("logos")
        .and_then(Value::as_array)
        .and_then(|logos| {
            logos
                .iter()
                .filter_map(|logo| logo.get("href").and_then(Value::as_str))
                .find(|href| !href.is_empty())
        })
        .map(str::to_string);

    StandingsEntry {
        team: pick_str(team, &["displayName", "name"]).unwrap_or_default(),
        abbr: pick_str(team, &["abbreviation"]).unwrap_or_default(),
        logo,
        wins: count("wins"),
        losses: count("losses"),
        ties: count("ties"),
        win_percent: format_win_percent(stats.get("winPercent").and_then(|s| stat_number(s))),
        div_record: stats
            .get("divisionRecord")
            .and_then(|s| s.get("displayValue"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| "-".to_string()),
        playoff: None,
    }
}

fn stat_lookup(entry: &Value) -> HashMap<&str, &Value> {
    let mut lookup = HashMap::new();
    let Some(stats) = entry.get("stats").and_then(Value::as_array) else {
        return lookup;
    };
    for stat in stats {
        let key = stat
            .get("name")
            .or_else(|| stat.get("type"))
            .and_then(Value::as_str);
        if let Some(key) = key {
            lookup.entry(key).or_insert(stat);
        }
    }
    lookup
}

fn stat_number(stat: &Value) -> Option<f64> {
    match stat.get("value") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => stat
            .get("displayValue")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse::<f64>().ok()),
    }
}

fn pick_str(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| v.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PlayoffTag, extract_division_rows, final_standings_2025, format_win_percent};

    #[test]
    fn win_percent_has_three_decimals_or_fallback() {
        assert_eq!(format_win_percent(Some(0.625)), "0.625");
        assert_eq!(format_win_percent(Some(1.0)), "1.000");
        assert_eq!(format_win_percent(None), ".000");
        assert_eq!(format_win_percent(Some(f64::NAN)), ".000");
    }

    #[test]
    fn missing_stats_default_independently() {
        let entries = vec![json!({
            "team": {"displayName": "Chicago Bears", "abbreviation": "CHI"},
            "stats": [{"name": "wins", "value": 11.0}, {"name": "ties", "value": 0}]
        })];
        let rows = extract_division_rows(&entries);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].wins, 11);
        assert_eq!(rows[0].losses, 0);
        assert_eq!(rows[0].ties, 0);
        assert_eq!(rows[0].win_percent, ".000");
        assert_eq!(rows[0].logo, None);
    }

    #[test]
    fn logo_is_first_non_empty_href() {
        let entries = vec![
            json!({
                "team": {"abbreviation": "NE", "logos": [{"rel": ["dark"]}, {"href": "https://x/ne.png"}]}
            }),
            json!({
                "team": {"abbreviation": "BUF", "logos": [{"href": ""}]}
            }),
        ];
        let rows = extract_division_rows(&entries);
        assert_eq!(rows[0].logo.as_deref(), Some("https://x/ne.png"));
        assert_eq!(rows[1].logo, None);
    }

    #[test]
    fn entry_without_team_or_stats_still_produces_row() {
        let rows = extract_division_rows(&[json!({})]);
        assert_eq!(rows[0].record(), "0-0");
        assert_eq!(rows[0].div_record, "-");
    }

    #[test]
    fn static_dataset_has_one_division_winner_per_division() {
        let conferences = final_standings_2025();
        assert_eq!(conferences.len(), 2);
        for conference in &conferences {
            assert_eq!(conference.divisions.len(), 4);
            for division in &conference.divisions {
                assert_eq!(division.entries.len(), 4);
                let winners = division
                    .entries
                    .iter()
                    .filter(|e| e.playoff == Some(PlayoffTag::Division))
                    .count();
                assert_eq!(winners, 1, "{} {}", conference.name, division.name);
            }
        }
    }

    #[test]
    fn records_show_ties_only_when_present() {
        let conferences = final_standings_2025();
        let nfc_east = &conferences[1].divisions[0];
        assert_eq!(nfc_east.entries[1].record(), "7-9-1");
        assert_eq!(nfc_east.entries[0].record(), "11-6");
    }
}
