use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

pub const MAX_ARTICLES: usize = 3;
pub const DESCRIPTION_LIMIT: usize = 120;
pub const ELLIPSIS: &str = "...";
pub const FALLBACK_IMAGE: &str =
    "https://a.espncdn.com/combiner/i?img=/i/espn/misc_logos/500/nfl.png&w=200";
const DEAD_LINK: &str = "#";

#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    pub headline: String,
    pub description: String,
    pub image: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    articles: Vec<ArticleRaw>,
}

#[derive(Debug, Deserialize)]
struct ArticleRaw {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Option<Vec<ImageRaw>>,
    #[serde(default)]
    links: Option<LinksRaw>,
}

#[derive(Debug, Deserialize)]
struct ImageRaw {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinksRaw {
    #[serde(default)]
    web: Option<HrefRaw>,
    #[serde(default)]
    api: Option<ApiLinksRaw>,
}

#[derive(Debug, Deserialize)]
struct ApiLinksRaw {
    #[serde(default)]
    news: Option<HrefRaw>,
}

#[derive(Debug, Deserialize)]
struct HrefRaw {
    #[serde(default)]
    href: Option<String>,
}

/// Every article of the feed, in order. Callers take `MAX_ARTICLES`.
pub fn parse_news_json(raw: &str) -> Result<Vec<NewsArticle>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid news json")?;
    if !root.get("articles").is_some_and(Value::is_array) {
        return Err(anyhow!("news payload has no articles array"));
    }
    let data: NewsResponse = serde_json::from_value(root).context("unexpected news shape")?;
    Ok(data.articles.into_iter().map(build_article).collect())
}

fn build_article(raw: ArticleRaw) -> NewsArticle {
    let headline = raw.headline.unwrap_or_default();
    let description = raw
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| headline.clone());
    let image = raw
        .images
        .and_then(|images| images.into_iter().next())
        .and_then(|image| image.url)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| FALLBACK_IMAGE.to_string());
    let link = raw
        .links
        .and_then(|links| {
            let web = links.web.and_then(|w| w.href).filter(|h| !h.is_empty());
            web.or_else(|| {
                links
                    .api
                    .and_then(|api| api.news)
                    .and_then(|n| n.href)
                    .filter(|h| !h.is_empty())
            })
        })
        .unwrap_or_else(|| DEAD_LINK.to_string());

    NewsArticle {
        description: truncate_description(&description),
        headline,
        image,
        link,
    }
}

/// Cuts text longer than `DESCRIPTION_LIMIT` characters down to the limit and
/// appends `ELLIPSIS`; shorter text is returned unchanged.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
