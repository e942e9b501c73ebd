//! Markdown rendering for the terminal.

use crate::models::{MarketQuote, PostBundle};
use std::fmt::Write;

/// Render a finished post bundle: the generated post first, then one tile
/// per source article (title, link, lead image when present), then the
/// skip summary.
pub fn render_bundle(bundle: &PostBundle) -> String {
    let mut out = String::new();

    out.push_str("## Generated post\n\n");
    out.push_str(bundle.generated.trim());
    out.push_str("\n\n## Sources\n\n");

    for article in &bundle.articles {
        let _ = writeln!(out, "- [{}]({})", article.title, article.link);
        if let Some(image) = &article.image {
            let _ = writeln!(out, "  ![lead image]({image})");
        }
    }

    let _ = write!(
        out,
        "\n{} article(s) used, {} candidate(s) skipped",
        bundle.articles.len(),
        bundle.report.skipped.len()
    );
    if let Some(keyword) = &bundle.english_keyword {
        let _ = write!(out, " (English keyword: {keyword})");
    }
    out.push('\n');
    for skip in &bundle.report.skipped {
        let _ = writeln!(out, "  - skipped {}: {}", skip.link, skip.reason);
    }

    out
}

/// Render the quote board as aligned tiles with signed changes.
pub fn render_quotes(quotes: &[MarketQuote]) -> String {
    let mut out = String::new();
    out.push_str("## Market board\n\n");
    let width = quotes.iter().map(|q| q.name.len()).max().unwrap_or(0);
    for quote in quotes {
        let _ = writeln!(
            out,
            "{:<width$}  {:>12.2}  {:>+10.2} ({:>+.2}%)",
            quote.name,
            quote.price,
            quote.change,
            quote.percent,
            width = width
        );
    }
    out
}
