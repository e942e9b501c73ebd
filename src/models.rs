//! Data models shared across the pipeline.
//!
//! - [`FeedEntry`]: one entry of the syndication feed, before the article
//!   page has been fetched
//! - [`ArticleRecord`]: an accepted article (passed the quality gate)
//! - [`SkipReason`] / [`Skipped`] / [`FetchReport`]: typed record of why
//!   candidates were dropped, so skips are observable instead of silent
//! - [`PostRequest`] / [`PostBundle`]: the immutable pipeline input and the
//!   rendered result
//! - [`MarketQuote`]: one tile of the market quote board

use serde::Serialize;
use thiserror::Error;

/// One entry parsed out of the syndication feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Feed-provided summary, tag-stripped. Used as fallback body text when
    /// the article page yields too little.
    pub summary: Option<String>,
}

/// An article that passed the quality gate.
///
/// Exists only if its body text met the configured minimum length (or the
/// summary fallback kicked in). Body text is already truncated to the
/// per-article character budget.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    /// Lead image URL extracted from the article page, when present.
    pub image: Option<String>,
    pub body: String,
}

/// Why a feed entry did not become an [`ArticleRecord`].
#[derive(Debug, Clone, Error, Serialize)]
pub enum SkipReason {
    #[error("download failed: {0}")]
    Request(String),

    #[error("download timed out")]
    Timeout,

    #[error("extracted body was empty")]
    EmptyBody,

    #[error("extracted body too short ({len} chars, minimum {min})")]
    BodyTooShort { len: usize, min: usize },
}

/// One skipped feed entry with its reason.
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub link: String,
    pub reason: SkipReason,
}

/// Outcome summary of one fetch pass over a feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    /// Feed entries we attempted to fetch.
    pub considered: usize,
    /// Entries that became accepted articles.
    pub accepted: usize,
    pub skipped: Vec<Skipped>,
}

impl FetchReport {
    /// Fold another pass (e.g. the English edition) into this report.
    pub fn merge(&mut self, other: FetchReport) {
        self.considered += other.considered;
        self.accepted += other.accepted;
        self.skipped.extend(other.skipped);
    }
}

/// Immutable input to one posting run.
///
/// The credential lives only for the session and is excluded from any
/// serialized echo of the request.
#[derive(Debug, Clone, Serialize)]
pub struct PostRequest {
    /// Resolved search keyword (preset value or free text, verbatim).
    pub keyword: String,
    /// Resolved style description text.
    pub style_text: String,
    /// Desired article count, within [1, 5].
    pub count: usize,
    /// Also fetch the English edition with a translated keyword.
    pub bilingual: bool,
    #[serde(skip_serializing)]
    pub credential: String,
}

/// Result of a successful posting run.
#[derive(Debug, Serialize)]
pub struct PostBundle {
    pub request: PostRequest,
    pub articles: Vec<ArticleRecord>,
    pub generated: String,
    pub report: FetchReport,
    /// Translated English keyword, when the bilingual pass ran.
    pub english_keyword: Option<String>,
    pub created_at: String,
}

/// One surviving tile of the market quote board.
#[derive(Debug, Clone, Serialize)]
pub struct MarketQuote {
    pub name: String,
    pub symbol: String,
    /// Latest close.
    pub price: f64,
    /// Latest close minus the prior session's close.
    pub change: f64,
    /// `change / previous * 100`.
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_report_merge() {
        let mut a = FetchReport {
            considered: 4,
            accepted: 2,
            skipped: vec![Skipped {
                link: "https://a.example/1".into(),
                reason: SkipReason::EmptyBody,
            }],
        };
        let b = FetchReport {
            considered: 3,
            accepted: 3,
            skipped: vec![],
        };
        a.merge(b);
        assert_eq!(a.considered, 7);
        assert_eq!(a.accepted, 5);
        assert_eq!(a.skipped.len(), 1);
    }

    #[test]
    fn test_request_echo_hides_credential() {
        let req = PostRequest {
            keyword: "Bitcoin crypto market news".into(),
            style_text: "terse".into(),
            count: 3,
            bilingual: false,
            credential: "sk-very-secret".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("sk-very-secret"));
        assert!(json.contains("Bitcoin crypto market news"));
    }

    #[test]
    fn test_skip_reason_display() {
        let r = SkipReason::BodyTooShort { len: 42, min: 200 };
        assert_eq!(
            r.to_string(),
            "extracted body too short (42 chars, minimum 200)"
        );
    }
}
