//! Application configuration.
//!
//! Everything that varied between the historical one-off editions of this
//! tool lives here as data: the topic list, the style presets, the quality
//! threshold, the prompt wording, and the quote board. A YAML file can
//! override any subset of it; missing fields fall back to the compiled-in
//! defaults.

use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::info;

/// A named news topic preset mapping a label to a search keyword.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TopicPreset {
    pub label: String,
    pub keyword: String,
}

/// A named writing-style preset: a label and a free-text tone/format guide.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StylePreset {
    pub label: String,
    pub text: String,
}

/// Tuning for the news fetcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Feed language code for the domestic edition (`hl`).
    pub language: String,
    /// Feed region code for the domestic edition (`gl`).
    pub region: String,
    /// Language code used for the translated English pass.
    pub english_language: String,
    /// Region code used for the translated English pass.
    pub english_region: String,
    /// Minimum extracted-body length (chars) for an article to be accepted.
    pub min_body_chars: usize,
    /// Fall back to the feed summary/title when the body fails the gate.
    pub summary_fallback: bool,
    /// Per-article body character budget after acceptance.
    pub article_char_budget: usize,
    /// Bounded worker pool size for per-article fetches.
    pub max_parallel: usize,
    /// Per-request timeout in seconds for feed and article downloads.
    pub timeout_secs: u64,
    /// Client identification string sent to origin servers.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            language: "ko".into(),
            region: "KR".into(),
            english_language: "en-US".into(),
            english_region: "US".into(),
            min_body_chars: 200,
            summary_fallback: true,
            article_char_budget: 1200,
            max_parallel: 4,
            timeout_secs: 20,
            user_agent: concat!("post_factory/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Text-generation service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-1.5-flash".into(),
            timeout_secs: 60,
        }
    }
}

/// Prompt wording and context limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Directive block placed at the top of the instruction payload.
    pub directive: String,
    /// Note inserted in place of article data when no articles survived.
    pub no_data_note: String,
    /// Instruction for the keyword translation call; `{keyword}` is
    /// substituted with the domestic keyword.
    pub translation_instruction: String,
    /// Ceiling on the concatenated article block, in chars.
    pub max_context_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            directive: "\
You are an investment content influencer. Using only the [ARTICLE DATA] \
below, write a post that faithfully clones the [STYLE GUIDE]: its signature \
phrases, emoji frequency, and line-break rhythm.
Rules:
1. Stay strictly within the article data. Never introduce a topic it does not mention.
2. Keep the analysis fact-driven, solid enough for a professional reader.
3. End with a single line containing an English image-generation prompt that fits the post's mood."
                .into(),
            no_data_note: "No article data was available for this topic. \
Write a short note in the target style saying fresh coverage could not be \
found, without inventing any news."
                .into(),
            translation_instruction: "Translate the following news-search \
keyword into a short English search phrase. Reply with the phrase only, no \
explanation: {keyword}"
                .into(),
            max_context_chars: 12_000,
        }
    }
}

/// One tile of the market quote board.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteTile {
    pub name: String,
    pub symbol: String,
}

/// Quote board settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteBoardConfig {
    /// Chart endpoint base; the instrument symbol is appended.
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Bounded worker pool size for per-symbol lookups.
    pub max_parallel: usize,
    pub tiles: Vec<QuoteTile>,
}

impl Default for QuoteBoardConfig {
    fn default() -> Self {
        let tile = |name: &str, symbol: &str| QuoteTile {
            name: name.into(),
            symbol: symbol.into(),
        };
        Self {
            endpoint: "https://query1.finance.yahoo.com/v8/finance/chart".into(),
            timeout_secs: 15,
            max_parallel: 4,
            tiles: vec![
                tile("Nasdaq", "^IXIC"),
                tile("S&P 500", "^GSPC"),
                tile("KOSPI", "^KS11"),
                tile("USD/KRW", "KRW=X"),
                tile("Gold", "GC=F"),
                tile("WTI Crude", "CL=F"),
                tile("Bitcoin", "BTC-USD"),
                tile("Ethereum", "ETH-USD"),
            ],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub topics: Vec<TopicPreset>,
    pub styles: Vec<StylePreset>,
    pub fetch: FetchConfig,
    pub generation: GenerationConfig,
    pub prompt: PromptConfig,
    pub quotes: QuoteBoardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            topics: default_topics(),
            styles: default_styles(),
            fetch: FetchConfig::default(),
            generation: GenerationConfig::default(),
            prompt: PromptConfig::default(),
            quotes: QuoteBoardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, merging an optional YAML file over the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                let config: AppConfig = serde_yaml::from_str(&raw)?;
                info!(path = %p, "Loaded configuration file");
                Ok(config)
            }
            None => Ok(AppConfig::default()),
        }
    }

    /// Look up the configured keyword for a topic preset label.
    pub fn topic_keyword(&self, label: &str) -> Option<&str> {
        self.topics
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.keyword.as_str())
    }

    /// Look up the style text for a style preset label.
    pub fn style_text(&self, label: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.text.as_str())
    }
}

fn default_topics() -> Vec<TopicPreset> {
    let topic = |label: &str, keyword: &str| TopicPreset {
        label: label.into(),
        keyword: keyword.into(),
    };
    vec![
        topic("rocket-lab", "Rocket Lab RKLB news stock"),
        topic("musk-spacex", "Elon Musk SpaceX xAI news"),
        topic("bitcoin", "Bitcoin crypto market news"),
        topic("nasdaq", "Nasdaq 100 stock market news"),
        topic("semiconductor", "Semiconductor HBM AI industry news"),
    ]
}

fn default_styles() -> Vec<StylePreset> {
    let style = |label: &str, text: &str| StylePreset {
        label: label.into(),
        text: text.into(),
    };
    vec![
        style(
            "analogy-analyst",
            "\
Tone: professional but friendly; explains jargon through everyday analogies \
(restaurants, chefs, kitchens). Opens with a [bracketed title], then a \
numbered list with one idea per item, each naming the related tickers. \
Closes with a tight summary and a row of hashtags.",
        ),
        style(
            "hype-ant",
            "\
Tone: aggressive and commanding, radiating total conviction. Uses phrases \
like 'Listen up.' and 'Don't flinch.'. Heavy on bold text and bullet \
points, short punchy sentences. Always ends with the line 'Powered by \
#USAnt'.",
        ),
        style(
            "thread-strategist",
            "\
Tone: long-form storytelling with strategic depth; drops philosophical \
hooks like 'There are no coincidences, only intent.'. Prefers the pacing of \
a numbered thread, building one logical step per paragraph. Closes with a \
community sign-off such as 'Go find your own alpha' or an invitation to \
subscribe.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_presets() {
        let config = AppConfig::default();
        assert_eq!(config.topics.len(), 5);
        assert_eq!(config.styles.len(), 3);
        assert!(!config.quotes.tiles.is_empty());
        assert_eq!(config.quotes.max_parallel, 4);
        assert_eq!(config.fetch.min_body_chars, 200);
        assert!(config.fetch.summary_fallback);
    }

    #[test]
    fn test_quote_board_pool_size_overridable() {
        let yaml = "\
quotes:
  max_parallel: 1
";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.quotes.max_parallel, 1);
        // the rest of the board keeps its defaults
        assert_eq!(config.quotes.tiles.len(), 8);
        assert_eq!(config.quotes.timeout_secs, 15);
    }

    #[test]
    fn test_topic_keyword_lookup() {
        let config = AppConfig::default();
        assert_eq!(
            config.topic_keyword("bitcoin"),
            Some("Bitcoin crypto market news")
        );
        assert_eq!(config.topic_keyword("nope"), None);
    }

    #[test]
    fn test_style_text_lookup() {
        let config = AppConfig::default();
        assert!(config.style_text("hype-ant").unwrap().contains("#USAnt"));
        assert_eq!(config.style_text("nope"), None);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "\
fetch:
  min_body_chars: 50
topics:
  - label: custom
    keyword: custom keyword news
";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.fetch.min_body_chars, 50);
        // untouched sections keep their defaults
        assert_eq!(config.fetch.article_char_budget, 1200);
        assert_eq!(config.topics.len(), 1);
        assert_eq!(config.styles.len(), 3);
        assert_eq!(config.generation.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.topics.len(), config.topics.len());
        assert_eq!(back.prompt.max_context_chars, config.prompt.max_context_chars);
    }
}
