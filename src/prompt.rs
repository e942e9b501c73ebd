//! Instruction payload assembly.
//!
//! Combines the directive block, the fetched article data, and the style
//! description into the single text sent to the generation service. Pure
//! string work; all wording comes from [`PromptConfig`] so editions can
//! tune it without code changes.

use crate::config::PromptConfig;
use crate::models::ArticleRecord;

/// Build the full instruction payload for the post-generation call.
///
/// Layout: directive block, then `[STYLE GUIDE]`, then `[ARTICLE DATA]`.
/// When no articles survived the fetch, the article block is replaced by
/// the configured no-data note so the payload never references articles
/// that do not exist.
pub fn build_post_prompt(
    config: &PromptConfig,
    articles: &[ArticleRecord],
    style_text: &str,
) -> String {
    let data = articles_block(articles, config);
    format!(
        "{}\n\n[STYLE GUIDE]:\n{}\n\n[ARTICLE DATA]:\n{}",
        config.directive.trim(),
        style_text.trim(),
        data
    )
}

/// Build the one-shot instruction for the keyword translation call.
pub fn build_translation_prompt(config: &PromptConfig, keyword: &str) -> String {
    config.translation_instruction.replace("{keyword}", keyword)
}

/// Concatenate article titles and bodies, capped at the context ceiling.
///
/// Articles are appended whole, in order, until the next one would push the
/// block past `max_context_chars`; later articles are dropped rather than
/// split mid-text.
fn articles_block(articles: &[ArticleRecord], config: &PromptConfig) -> String {
    if articles.is_empty() {
        return config.no_data_note.trim().to_string();
    }

    let mut block = String::new();
    for article in articles {
        let chunk = format!("Title: {}\nBody: {}\n---\n", article.title, article.body);
        if !block.is_empty()
            && block.chars().count() + chunk.chars().count() > config.max_context_chars
        {
            break;
        }
        block.push_str(&chunk);
    }
    block.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, body: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.into(),
            link: "https://news.example.com/a".into(),
            image: None,
            body: body.into(),
        }
    }

    #[test]
    fn test_prompt_contains_all_parts() {
        let config = PromptConfig::default();
        let articles = vec![article("Bitcoin climbs", "Spot ETF inflows continued.")];
        let prompt = build_post_prompt(&config, &articles, "terse, all caps");
        assert!(prompt.contains("[STYLE GUIDE]"));
        assert!(prompt.contains("terse, all caps"));
        assert!(prompt.contains("[ARTICLE DATA]"));
        assert!(prompt.contains("Title: Bitcoin climbs"));
        assert!(prompt.contains("Spot ETF inflows continued."));
        assert!(prompt.contains("image-generation prompt"));
    }

    #[test]
    fn test_empty_articles_uses_no_data_note() {
        let config = PromptConfig::default();
        let prompt = build_post_prompt(&config, &[], "friendly analyst voice");
        assert!(prompt.contains("friendly analyst voice"));
        assert!(prompt.contains(config.no_data_note.trim()));
        assert!(!prompt.contains("Title:"));
    }

    #[test]
    fn test_articles_concatenated_in_order() {
        let config = PromptConfig::default();
        let articles = vec![article("First", "one"), article("Second", "two")];
        let prompt = build_post_prompt(&config, &articles, "style");
        let first = prompt.find("Title: First").unwrap();
        let second = prompt.find("Title: Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_context_ceiling_drops_whole_articles() {
        let config = PromptConfig {
            max_context_chars: 80,
            ..PromptConfig::default()
        };
        let articles = vec![
            article("First", &"a".repeat(60)),
            article("Second", &"b".repeat(60)),
        ];
        let prompt = build_post_prompt(&config, &articles, "style");
        assert!(prompt.contains("Title: First"));
        assert!(!prompt.contains("Title: Second"));
    }

    #[test]
    fn test_first_article_kept_even_when_over_ceiling() {
        // The ceiling never produces an empty block when articles exist.
        let config = PromptConfig {
            max_context_chars: 10,
            ..PromptConfig::default()
        };
        let articles = vec![article("Only", &"c".repeat(500))];
        let prompt = build_post_prompt(&config, &articles, "style");
        assert!(prompt.contains("Title: Only"));
    }

    #[test]
    fn test_translation_prompt_substitutes_keyword() {
        let config = PromptConfig::default();
        let prompt = build_translation_prompt(&config, "비트코인 시세");
        assert!(prompt.contains("비트코인 시세"));
        assert!(!prompt.contains("{keyword}"));
    }
}
