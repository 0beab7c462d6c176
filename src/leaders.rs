use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

pub const MAX_LEADERS: usize = 10;

const HEADSHOT_BASE: &str = "https://a.espncdn.com/i/headshots/nfl/players/full";
pub const NO_PHOTO: &str =
    "https://a.espncdn.com/combiner/i?img=/i/headshots/nophoto.png&w=200&h=146";
const TEAM_FALLBACK: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaderCategory {
    Passing,
    Rushing,
    Receiving,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 3] = [
        LeaderCategory::Passing,
        LeaderCategory::Rushing,
        LeaderCategory::Receiving,
    ];

    pub fn stat_name(self) -> &'static str {
        match self {
            LeaderCategory::Passing => "passingYards",
            LeaderCategory::Rushing => "rushingYards",
            LeaderCategory::Receiving => "receivingYards",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeaderCategory::Passing => "Passing",
            LeaderCategory::Rushing => "Rushing",
            LeaderCategory::Receiving => "Receiving",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            LeaderCategory::Passing => "passing",
            LeaderCategory::Rushing => "rushing",
            LeaderCategory::Receiving => "receiving",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            LeaderCategory::Passing => "#013369",
            LeaderCategory::Rushing => "#d50a0a",
            LeaderCategory::Receiving => "#1a4a8a",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderRecord {
    pub name: String,
    pub team: String,
    /// Numeric value used for charting; unparseable values are 0.
    pub value: f64,
    /// Text shown in tables; may differ from `value` (e.g. "4,394").
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopPlayer {
    pub name: String,
    pub team: String,
    pub team_name: String,
    pub headshot: String,
    pub category: LeaderCategory,
    pub stat: String,
    pub stat_label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadersPayload {
    #[serde(default)]
    pub leaders: Vec<StatCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub leaders: Option<Vec<LeaderEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderEntry {
    #[serde(rename = "displayValue", default)]
    pub display_value: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub athlete: Option<Athlete>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Athlete {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub team: Option<AthleteTeam>,
    #[serde(default)]
    pub headshot: Option<Headshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AthleteTeam {
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Headshot {
    #[serde(default)]
    pub href: Option<String>,
}

/// Ways to pick a category out of the payload, tried in order over every
/// category before the next one is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatcher {
    ExactName(String),
    DisplayNameStem(String),
}

impl CategoryMatcher {
    pub fn matches(&self, category: &StatCategory) -> bool {
        match self {
            CategoryMatcher::ExactName(name) => category.name.as_deref() == Some(name.as_str()),
            CategoryMatcher::DisplayNameStem(stem) => category
                .display_name
                .as_deref()
                .is_some_and(|display| display.to_lowercase().contains(stem.as_str())),
        }
    }
}

pub fn matchers_for(stat_name: &str) -> Vec<CategoryMatcher> {
    let mut matchers = vec![CategoryMatcher::ExactName(stat_name.to_string())];
    let stem = stat_name.to_lowercase().replacen("yards", "", 1);
    // An empty stem would match every display name.
    if !stem.is_empty() {
        matchers.push(CategoryMatcher::DisplayNameStem(stem));
    }
    matchers
}

#[derive(Debug, Clone, Copy)]
pub enum CategoryLookup<'a> {
    Found(&'a StatCategory),
    NotFound,
}

impl<'a> CategoryLookup<'a> {
    pub fn entries(self) -> &'a [LeaderEntry] {
        match self {
            CategoryLookup::Found(category) => category.leaders.as_deref().unwrap_or_default(),
            CategoryLookup::NotFound => &[],
        }
    }
}

pub fn parse_leaders_json(raw: &str) -> Result<LeadersPayload> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid leaders json")?;
    if !root.get("leaders").is_some_and(Value::is_array) {
        return Err(anyhow!("leaders payload has no leaders array"));
    }
    serde_json::from_value(root).context("unexpected leaders shape")
}

pub fn find_category<'a>(payload: &'a LeadersPayload, stat_name: &str) -> CategoryLookup<'a> {
    for matcher in matchers_for(stat_name) {
        if let Some(category) = payload.leaders.iter().find(|c| matcher.matches(c)) {
            return CategoryLookup::Found(category);
        }
    }
    CategoryLookup::NotFound
}

/// Up to `MAX_LEADERS` records of the matching category, in source order.
/// An empty result means "no data" and is not an error.
pub fn normalize_leaders(payload: &LeadersPayload, stat_name: &str) -> Vec<LeaderRecord> {
    find_category(payload, stat_name)
        .entries()
        .iter()
        .take(MAX_LEADERS)
        .map(leader_record)
        .collect()
}

pub fn top_player(payload: &LeadersPayload, category: LeaderCategory) -> Option<TopPlayer> {
    let entry = find_category(payload, category.stat_name()).entries().first()?;
    let athlete = entry.athlete.as_ref();
    let record = leader_record(entry);

    let team_name = athlete
        .and_then(|a| a.team.as_ref())
        .and_then(|t| t.display_name.clone())
        .unwrap_or_default();
    let headshot = athlete
        .and_then(|a| a.headshot.as_ref())
        .and_then(|h| h.href.clone())
        .filter(|href| !href.is_empty())
        .unwrap_or_else(|| {
            athlete
                .and_then(|a| a.id.as_ref())
                .map(value_text)
                .filter(|id| !id.is_empty())
                .map(|id| format!("{HEADSHOT_BASE}/{id}.png"))
                .unwrap_or_else(|| NO_PHOTO.to_string())
        });

    Some(TopPlayer {
        name: record.name,
        team: record.team,
        team_name,
        headshot,
        category,
        stat: record.display,
        stat_label: format!("{} Yards", category.label()),
    })
}

fn leader_record(entry: &LeaderEntry) -> LeaderRecord {
    let athlete = entry.athlete.as_ref();
    let name = athlete
        .and_then(|a| a.display_name.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let team = athlete
        .and_then(|a| a.team.as_ref())
        .and_then(|t| t.abbreviation.clone())
        .filter(|abbr| !abbr.is_empty())
        .unwrap_or_else(|| TEAM_FALLBACK.to_string());
    let value = entry.value.as_ref().map(parse_stat_value).unwrap_or(0.0);
    let display = entry
        .display_value
        .as_ref()
        .map(value_text)
        .filter(|text| !text.is_empty())
        .or_else(|| entry.value.as_ref().map(value_text))
        .unwrap_or_default();

    LeaderRecord {
        name,
        team,
        value,
        display,
    }
}

/// Float conversion that reads the leading numeric prefix and falls back to
/// 0 when there is none. Never fails.
pub fn parse_stat_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s),
        _ => 0.0,
    }
}

pub fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_digit() {
            seen_digit = true;
        } else if b == b'.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        CategoryMatcher, LeaderCategory, LeadersPayload, NO_PHOTO, matchers_for, parse_float_prefix,
        parse_stat_value, top_player,
    };

    #[test]
    fn float_prefix_matches_lenient_parsing() {
        assert_eq!(parse_float_prefix("4394"), 4394.0);
        assert_eq!(parse_float_prefix(" 12.5 yds"), 12.5);
        assert_eq!(parse_float_prefix("4,394"), 4.0);
        assert_eq!(parse_float_prefix("-3"), -3.0);
        assert_eq!(parse_float_prefix("abc"), 0.0);
        assert_eq!(parse_float_prefix(""), 0.0);
        assert_eq!(parse_float_prefix("."), 0.0);
    }

    #[test]
    fn float_prefix_reads_exponents() {
        assert_eq!(parse_float_prefix("1.5e3"), 1500.0);
        assert_eq!(parse_float_prefix("2E-1 yds"), 0.2);
        assert_eq!(parse_float_prefix("4e+2"), 400.0);
        // A dangling exponent marker is not part of the number.
        assert_eq!(parse_float_prefix("7e"), 7.0);
        assert_eq!(parse_float_prefix("7e-x"), 7.0);
    }

    #[test]
    fn top_player_without_id_or_headshot_uses_no_photo() {
        let payload: LeadersPayload = serde_json::from_value(json!({
            "leaders": [{"name": "passingYards", "leaders": [
                {"displayValue": "300", "value": 300, "athlete": {"displayName": "Anon"}}
            ]}]
        }))
        .expect("valid payload");
        let player = top_player(&payload, LeaderCategory::Passing).expect("leader");
        assert_eq!(player.headshot, NO_PHOTO);
    }

    #[test]
    fn stat_value_handles_numbers_strings_and_junk() {
        assert_eq!(parse_stat_value(&json!(1201.0)), 1201.0);
        assert_eq!(parse_stat_value(&json!("88")), 88.0);
        assert_eq!(parse_stat_value(&json!(null)), 0.0);
        assert_eq!(parse_stat_value(&json!({"x": 1})), 0.0);
    }

    #[test]
    fn matchers_put_exact_name_first() {
        let matchers = matchers_for("rushingYards");
        assert_eq!(
            matchers,
            vec![
                CategoryMatcher::ExactName("rushingYards".to_string()),
                CategoryMatcher::DisplayNameStem("rushing".to_string()),
            ]
        );
    }

    #[test]
    fn bare_yards_has_no_stem_matcher() {
        assert_eq!(matchers_for("yards").len(), 1);
    }
}
