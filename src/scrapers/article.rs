//! Article content fetching and extraction.
//!
//! Second phase of the fetcher: download each feed entry's page, strip it
//! down to main body text and a lead image, and run the quality gate.
//! Failed or rejected entries become typed [`Skipped`] records instead of
//! disappearing silently. Downloads fan out over a bounded worker pool; an
//! ordered stream keeps acceptance in feed order.

use crate::config::FetchConfig;
use crate::models::{ArticleRecord, FeedEntry, FetchReport, SkipReason, Skipped};
use crate::utils::{collapse_whitespace, truncate_chars};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

static ARTICLE_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article p").unwrap());
static ANY_PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static LEAD_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());

/// Fetch up to `count` articles for the given feed entries.
///
/// Considers at most `2 * count` entries to compensate for the skip rate,
/// downloads them concurrently (`max_parallel` at a time, each with the
/// client's timeout), and accepts the first `count` that pass the quality
/// gate, in feed order.
#[instrument(level = "info", skip_all, fields(entries = entries.len(), count))]
pub async fn fetch_articles(
    client: &reqwest::Client,
    entries: Vec<FeedEntry>,
    count: usize,
    config: &FetchConfig,
) -> (Vec<ArticleRecord>, FetchReport) {
    let considered: Vec<FeedEntry> = entries.into_iter().take(count * 2).collect();

    let outcomes: Vec<Result<ArticleRecord, Skipped>> = stream::iter(considered)
        .map(|entry| async move {
            match fetch_article(client, &entry, config).await {
                Ok(article) => {
                    debug!(link = %entry.link, "Accepted article");
                    Ok(article)
                }
                Err(reason) => {
                    warn!(link = %entry.link, %reason, "Skipping article");
                    Err(Skipped {
                        link: entry.link,
                        reason,
                    })
                }
            }
        })
        .buffered(config.max_parallel.max(1))
        .collect()
        .await;

    let (articles, report) = select_accepted(outcomes, count);
    info!(
        accepted = report.accepted,
        skipped = report.skipped.len(),
        "Fetched article contents"
    );
    (articles, report)
}

/// Keep the first `count` accepted articles, in order, and build the report.
pub fn select_accepted(
    outcomes: Vec<Result<ArticleRecord, Skipped>>,
    count: usize,
) -> (Vec<ArticleRecord>, FetchReport) {
    let considered = outcomes.len();
    let mut articles = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(article) => {
                if articles.len() < count {
                    articles.push(article);
                }
            }
            Err(skip) => skipped.push(skip),
        }
    }
    let report = FetchReport {
        considered,
        accepted: articles.len(),
        skipped,
    };
    (articles, report)
}

/// Fetch one article page and run it through extraction and the gate.
async fn fetch_article(
    client: &reqwest::Client,
    entry: &FeedEntry,
    config: &FetchConfig,
) -> Result<ArticleRecord, SkipReason> {
    let html = client
        .get(&entry.link)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(classify_request_error)?
        .text()
        .await
        .map_err(classify_request_error)?;

    let (body, image) = extract(&html);
    let body = gate_body(&body, entry, config)?;

    Ok(ArticleRecord {
        title: entry.title.clone(),
        link: entry.link.clone(),
        image,
        body: truncate_chars(&body, config.article_char_budget),
    })
}

fn classify_request_error(e: reqwest::Error) -> SkipReason {
    if e.is_timeout() {
        SkipReason::Timeout
    } else {
        SkipReason::Request(e.to_string())
    }
}

/// Extract main body text and the lead image URL from an article page.
///
/// Prefers paragraphs inside an `<article>` element; falls back to all
/// paragraphs when the page has none. The lead image comes from the
/// `og:image` meta tag.
pub fn extract(html: &str) -> (String, Option<String>) {
    let document = Html::parse_document(html);

    let mut paragraphs: Vec<String> = document
        .select(&ARTICLE_PARAGRAPHS)
        .map(|p| collapse_whitespace(&p.text().collect::<Vec<_>>().join(" ")))
        .filter(|t| !t.is_empty())
        .collect();
    if paragraphs.is_empty() {
        paragraphs = document
            .select(&ANY_PARAGRAPHS)
            .map(|p| collapse_whitespace(&p.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
            .collect();
    }
    let body = paragraphs.join("\n");

    let image = document
        .select(&LEAD_IMAGE)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|s| s.to_string());

    (body, image)
}

/// Quality gate: decide whether extracted body text is usable.
///
/// A body shorter than `min_body_chars` is rejected, unless the summary
/// fallback is enabled and the feed provided a summary or title to use
/// instead.
pub fn gate_body(
    body: &str,
    entry: &FeedEntry,
    config: &FetchConfig,
) -> Result<String, SkipReason> {
    let trimmed = body.trim();
    let len = trimmed.chars().count();
    if len >= config.min_body_chars && len > 0 {
        return Ok(trimmed.to_string());
    }

    if config.summary_fallback {
        if let Some(summary) = entry.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            return Ok(summary.trim().to_string());
        }
        if !entry.title.trim().is_empty() {
            return Ok(entry.title.trim().to_string());
        }
    }

    if len == 0 {
        Err(SkipReason::EmptyBody)
    } else {
        Err(SkipReason::BodyTooShort {
            len,
            min: config.min_body_chars,
        })
    }
}
