//! Market quote board.
//!
//! For a fixed config-driven map of display name to instrument symbol,
//! fetch a short daily-close window from a Yahoo-style chart endpoint and
//! compute the change versus the prior session. Symbols with fewer than two
//! valid closes, or whose lookup fails, are omitted rather than zero-filled;
//! the batch never fails as a whole.

use crate::config::QuoteBoardConfig;
use crate::models::MarketQuote;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Fetch the whole board, in config order, skipping failed symbols.
#[instrument(level = "info", skip_all, fields(tiles = config.tiles.len()))]
pub async fn fetch_board(config: &QuoteBoardConfig) -> Vec<MarketQuote> {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to build HTTP client for quote board");
            return Vec::new();
        }
    };

    let quotes: Vec<MarketQuote> = stream::iter(config.tiles.clone())
        .map(|tile| {
            let client = client.clone();
            let endpoint = config.endpoint.clone();
            async move {
                match fetch_quote(&client, &endpoint, &tile.symbol).await {
                    Ok(Some((price, change, percent))) => Some(MarketQuote {
                        name: tile.name,
                        symbol: tile.symbol,
                        price,
                        change,
                        percent,
                    }),
                    Ok(None) => {
                        warn!(symbol = %tile.symbol, "Fewer than two closes; omitting quote");
                        None
                    }
                    Err(e) => {
                        warn!(symbol = %tile.symbol, error = %e, "Quote lookup failed; omitting");
                        None
                    }
                }
            }
        })
        .buffered(config.max_parallel.max(1))
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = quotes.len(), "Fetched quote board");
    quotes
}

/// Fetch one symbol's 5-day close history and compute its change.
async fn fetch_quote(
    client: &reqwest::Client,
    endpoint: &str,
    symbol: &str,
) -> Result<Option<(f64, f64, f64)>, reqwest::Error> {
    let url = format!(
        "{}/{}?range=5d&interval=1d",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(symbol)
    );
    let response: ChartResponse = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(latest_change(&closes(&response)))
}

/// Pull the raw close series out of a chart response.
fn closes(response: &ChartResponse) -> Vec<Option<f64>> {
    response
        .chart
        .result
        .as_deref()
        .unwrap_or_default()
        .first()
        .and_then(|r| r.indicators.quote.first())
        .map(|q| q.close.clone())
        .unwrap_or_default()
}

/// Compute `(latest, change, percent)` from a close series.
///
/// Null entries (holidays, half-days) are dropped first; fewer than two
/// valid closes yields `None` so the symbol is omitted, not zero-filled.
pub fn latest_change(closes: &[Option<f64>]) -> Option<(f64, f64, f64)> {
    let valid: Vec<f64> = closes.iter().filter_map(|c| *c).collect();
    if valid.len() < 2 {
        return None;
    }
    let latest = valid[valid.len() - 1];
    let previous = valid[valid.len() - 2];
    if previous == 0.0 {
        return None;
    }
    let change = latest - previous;
    let percent = change / previous * 100.0;
    Some((latest, change, percent))
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    // null on lookup errors, hence Option
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_change_math() {
        let closes = vec![Some(100.0), Some(110.0)];
        let (latest, change, percent) = latest_change(&closes).unwrap();
        assert_eq!(latest, 110.0);
        assert_eq!(change, 10.0);
        assert!((percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_latest_change_negative() {
        let closes = vec![Some(80.0), Some(60.0)];
        let (_, change, percent) = latest_change(&closes).unwrap();
        assert_eq!(change, -20.0);
        assert!((percent - -25.0).abs() < 1e-9);
    }

    #[test]
    fn test_latest_change_skips_null_closes() {
        let closes = vec![Some(100.0), None, Some(105.0), None];
        let (latest, change, _) = latest_change(&closes).unwrap();
        assert_eq!(latest, 105.0);
        assert_eq!(change, 5.0);
    }

    #[test]
    fn test_latest_change_single_close_omitted() {
        assert!(latest_change(&[Some(100.0)]).is_none());
        assert!(latest_change(&[]).is_none());
        assert!(latest_change(&[None, Some(100.0)]).is_none());
    }

    #[test]
    fn test_latest_change_zero_previous_omitted() {
        assert!(latest_change(&[Some(0.0), Some(10.0)]).is_none());
    }

    #[test]
    fn test_chart_response_parsing() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "BTC-USD"},
                    "timestamp": [1, 2, 3],
                    "indicators": {"quote": [{"close": [64000.5, null, 65321.25]}]}
                }],
                "error": null
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        let series = closes(&response);
        assert_eq!(series, vec![Some(64000.5), None, Some(65321.25)]);
        let (latest, change, _) = latest_change(&series).unwrap();
        assert_eq!(latest, 65321.25);
        assert!((change - 1320.75).abs() < 1e-9);
    }

    #[test]
    fn test_chart_response_empty_result() {
        let json = r#"{"chart": {"result": [], "error": {"code": "Not Found"}}}"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(closes(&response).is_empty());
        assert!(latest_change(&closes(&response)).is_none());
    }

    #[test]
    fn test_chart_response_null_result() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(closes(&response).is_empty());
    }
}
