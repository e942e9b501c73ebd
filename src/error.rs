//! Error taxonomy for the posting pipeline.
//!
//! Failures fall into three buckets:
//! - per-article problems are *skip reasons* ([`crate::models::SkipReason`]),
//!   recorded in the fetch report and never fatal
//! - pre-flight and empty-result problems abort the run before the
//!   generation call ([`PipelineError`])
//! - generation-service and feed problems are surfaced verbatim

use crate::models::FetchReport;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a posting run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No API credential was supplied (flag or environment).
    #[error("no API credential supplied; pass --api-key or set GEMINI_API_KEY")]
    MissingCredential,

    /// The resolved style text is empty (e.g. an empty style file).
    #[error("style content is empty; pick a preset or supply a non-empty style file")]
    MissingStyle,

    /// Requested article count is outside the allowed [1, 5] range.
    #[error("article count {0} is out of range (allowed: 1..=5)")]
    CountOutOfRange(usize),

    /// Neither a topic preset nor a free-text keyword was given.
    #[error("no topic given; pass --topic <preset> or --keyword <text>")]
    NoTopic,

    /// The topic label does not match any configured preset.
    #[error("unknown topic preset '{0}'")]
    UnknownTopic(String),

    /// Neither a style preset nor a style file was given.
    #[error("no style given; pass --style <preset> or --style-file <path>")]
    NoStyle,

    /// The style label does not match any configured preset.
    #[error("unknown style preset '{0}'")]
    UnknownStyle(String),

    /// A custom style file could not be read.
    #[error("failed to read style file {path}: {source}")]
    StyleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The syndication feed could not be fetched or parsed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Every candidate article was rejected; the generation call never runs.
    #[error("no usable articles ({} considered, {} skipped)", report.considered, report.skipped.len())]
    NoArticles { report: FetchReport },

    /// The text-generation service failed or returned nothing usable.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors surfaced by the syndication feed fetch/parse.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed feed document: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Errors surfaced by the text-generation service client.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("generation service returned no text")]
    EmptyResponse,
}
