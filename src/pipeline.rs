//! The posting pipeline.
//!
//! One run is a function from an immutable [`PostRequest`] (plus config and
//! clients) to a [`PostBundle`] or a typed error. Order of operations:
//! pre-flight validation, domestic fetch, optional translate-and-fetch for
//! the English edition, link dedup, context assembly, generation call.
//! Validation happens before any network call; an empty article set halts
//! the run before the generation call.

use crate::api::TextGenerator;
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::models::{ArticleRecord, FetchReport, PostBundle, PostRequest};
use crate::prompt::{build_post_prompt, build_translation_prompt};
use crate::scrapers::{article, feed};
use chrono::Local;
use itertools::Itertools;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Largest article count a run may request.
pub const MAX_COUNT: usize = 5;

/// Resolve the search keyword from a preset label or free text.
///
/// Free text wins when both are given; a preset label must match a
/// configured topic exactly.
pub fn resolve_keyword(
    config: &AppConfig,
    topic: Option<&str>,
    keyword: Option<&str>,
) -> Result<String, PipelineError> {
    if let Some(k) = keyword {
        return Ok(k.to_string());
    }
    match topic {
        Some(label) => config
            .topic_keyword(label)
            .map(|k| k.to_string())
            .ok_or_else(|| PipelineError::UnknownTopic(label.to_string())),
        None => Err(PipelineError::NoTopic),
    }
}

/// Resolve the style text from a preset label or a user-supplied file.
///
/// The file wins when both are given, mirroring the original's upload
/// escape hatch.
pub fn resolve_style(
    config: &AppConfig,
    style: Option<&str>,
    style_file: Option<&Path>,
) -> Result<String, PipelineError> {
    if let Some(path) = style_file {
        return std::fs::read_to_string(path).map_err(|source| PipelineError::StyleFile {
            path: path.to_path_buf(),
            source,
        });
    }
    match style {
        Some(label) => config
            .style_text(label)
            .map(|s| s.to_string())
            .ok_or_else(|| PipelineError::UnknownStyle(label.to_string())),
        None => Err(PipelineError::NoStyle),
    }
}

/// Pre-flight validation: runs before any network call.
pub fn validate(request: &PostRequest) -> Result<(), PipelineError> {
    if request.credential.trim().is_empty() {
        return Err(PipelineError::MissingCredential);
    }
    if request.style_text.trim().is_empty() {
        return Err(PipelineError::MissingStyle);
    }
    if request.count < 1 || request.count > MAX_COUNT {
        return Err(PipelineError::CountOutOfRange(request.count));
    }
    Ok(())
}

/// Run one posting pipeline end to end.
#[instrument(level = "info", skip_all, fields(keyword = %request.keyword, count = request.count, bilingual = request.bilingual))]
pub async fn run<G: TextGenerator>(
    request: PostRequest,
    config: &AppConfig,
    http: &reqwest::Client,
    generator: &G,
) -> Result<PostBundle, PipelineError> {
    validate(&request)?;

    let fetch = &config.fetch;
    let entries =
        feed::fetch_entries(http, &request.keyword, &fetch.language, &fetch.region).await?;
    let (mut articles, mut report) =
        article::fetch_articles(http, entries, request.count, fetch).await;

    let mut english_keyword = None;
    if request.bilingual {
        let translation_prompt = build_translation_prompt(&config.prompt, &request.keyword);
        let translated = generator.generate(&translation_prompt).await?;
        let translated = translated.trim().to_string();
        info!(keyword = %translated, "Translated keyword for English edition");

        let english_entries = feed::fetch_entries(
            http,
            &translated,
            &fetch.english_language,
            &fetch.english_region,
        )
        .await?;
        let (english_articles, english_report) =
            article::fetch_articles(http, english_entries, request.count, fetch).await;
        english_keyword = Some(translated);
        articles.extend(english_articles);
        report.merge(english_report);
    }

    let articles = dedupe_by_link(articles, &mut report);
    if articles.is_empty() {
        warn!(
            considered = report.considered,
            skipped = report.skipped.len(),
            "No usable articles; halting before the generation call"
        );
        return Err(PipelineError::NoArticles { report });
    }
    info!(count = articles.len(), "Articles ready for generation");

    let prompt = build_post_prompt(&config.prompt, &articles, &request.style_text);
    let generated = generator.generate(&prompt).await?;

    Ok(PostBundle {
        request,
        articles,
        generated,
        report,
        english_keyword,
        created_at: Local::now().to_rfc3339(),
    })
}

/// Deduplicate articles across editions by link URL; first occurrence wins.
///
/// The report's accepted count is recounted afterwards so it always equals
/// the number of articles actually kept, even when the bilingual passes
/// fetched the same story twice.
fn dedupe_by_link(articles: Vec<ArticleRecord>, report: &mut FetchReport) -> Vec<ArticleRecord> {
    let deduped: Vec<ArticleRecord> = articles
        .into_iter()
        .unique_by(|a| a.link.clone())
        .collect();
    report.accepted = deduped.len();
    deduped
}
