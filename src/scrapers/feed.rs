//! Google News search-feed indexing.
//!
//! First phase of the fetcher: build a search-feed URL from the
//! percent-encoded keyword plus a language/region pair, download it, and
//! parse the RSS document into [`FeedEntry`] values. An empty feed is a
//! valid, empty result; malformed XML is an error.

use crate::error::FeedError;
use crate::models::FeedEntry;
use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, instrument};
use url::Url;

static SEARCH_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://news.google.com/rss/search").unwrap());

/// Build the search-feed query URL for a keyword and language/region pair.
///
/// The keyword is percent-encoded into the `q` parameter; `language`/`region`
/// land in the feed's `hl`/`gl`/`ceid` parameters (e.g.
/// `hl=ko&gl=KR&ceid=KR:ko`).
pub fn search_url(keyword: &str, language: &str, region: &str) -> Url {
    let mut url = SEARCH_BASE.clone();
    url.query_pairs_mut()
        .append_pair("q", keyword)
        .append_pair("hl", language)
        .append_pair("gl", region)
        .append_pair("ceid", &format!("{region}:{language}"));
    url
}

/// Fetch and parse the feed for a keyword.
#[instrument(level = "info", skip(client), fields(%keyword, %language, %region))]
pub async fn fetch_entries(
    client: &reqwest::Client,
    keyword: &str,
    language: &str,
    region: &str,
) -> Result<Vec<FeedEntry>, FeedError> {
    let url = search_url(keyword, language, region);
    let xml = client.get(url).send().await?.error_for_status()?.text().await?;
    let entries = parse_feed(&xml)?;
    info!(count = entries.len(), "Indexed feed entries");
    debug!(links = ?entries.iter().map(|e| e.link.as_str()).collect::<Vec<_>>(), "Feed links");
    Ok(entries)
}

/// Parse an RSS feed document into entries, in feed order.
///
/// Only `<item>` children are considered; an item without a link is
/// dropped. Descriptions are tag-stripped and kept as the summary.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut in_item = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    description.clear();
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if !link.is_empty() {
                        let summary = strip_tags(&description);
                        entries.push(FeedEntry {
                            title: title.clone(),
                            link: link.clone(),
                            summary: if summary.is_empty() {
                                None
                            } else {
                                Some(summary)
                            },
                        });
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "link" => link = text,
                        "description" => description = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "link" => link = text,
                        "description" => description = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}

/// Strip HTML tags from a string, returning trimmed plain text.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"bitcoin" - Google News</title>
    <link>https://news.google.com</link>
    <item>
      <title>Bitcoin climbs past resistance</title>
      <link>https://news.example.com/articles/btc-1</link>
      <description>&lt;a href="https://news.example.com"&gt;Bitcoin climbs&lt;/a&gt; after ETF inflows</description>
    </item>
    <item>
      <title><![CDATA[Miners brace for halving]]></title>
      <link>https://news.example.com/articles/btc-2</link>
    </item>
    <item>
      <title>No link, should be dropped</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_in_order() {
        let entries = parse_feed(FEED).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Bitcoin climbs past resistance");
        assert_eq!(entries[0].link, "https://news.example.com/articles/btc-1");
        assert_eq!(entries[1].title, "Miners brace for halving");
    }

    #[test]
    fn test_parse_feed_strips_description_tags() {
        let entries = parse_feed(FEED).unwrap();
        let summary = entries[0].summary.as_deref().unwrap();
        assert!(!summary.contains('<'));
        assert!(summary.contains("Bitcoin climbs"));
        assert!(summary.contains("after ETF inflows"));
    }

    #[test]
    fn test_parse_feed_missing_summary_is_none() {
        let entries = parse_feed(FEED).unwrap();
        assert!(entries[1].summary.is_none());
    }

    #[test]
    fn test_parse_empty_feed() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>empty</title></channel></rss>"#;
        let entries = parse_feed(xml).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_channel_title_not_picked_up() {
        // The channel's own <title> lives outside any <item> and must not
        // leak into an entry.
        let entries = parse_feed(FEED).unwrap();
        assert!(entries.iter().all(|e| !e.title.contains("Google News")));
    }

    #[test]
    fn test_search_url_encodes_keyword() {
        let url = search_url("Bitcoin crypto market news", "ko", "KR");
        assert_eq!(url.host_str(), Some("news.google.com"));
        assert_eq!(url.path(), "/rss/search");
        assert!(url.as_str().contains("q=Bitcoin+crypto+market+news"));
        assert!(url.as_str().contains("hl=ko"));
        assert!(url.as_str().contains("gl=KR"));
        assert!(url.as_str().contains("ceid=KR%3Ako"));
    }

    #[test]
    fn test_search_url_escapes_query_metacharacters() {
        // Free-text keywords must not be able to smuggle in extra
        // parameters.
        let url = search_url("a&b=c", "en-US", "US");
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(q, "a&b=c");
        assert_eq!(url.query_pairs().count(), 4);
    }
}
