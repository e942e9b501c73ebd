//! JSON output for downstream consumers.
//!
//! Writes the whole post bundle (request echo minus credential, articles,
//! generated text, skip report) under a date directory:
//!
//! ```text
//! json_output_dir/
//! └── 2026-08-28/
//!     └── 093015_post.json
//! ```

use crate::models::PostBundle;
use crate::utils::ensure_writable_dir;
use chrono::Local;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize a bundle and write it under `{dir}/{date}/{HHMMSS}_post.json`.
///
/// Returns the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_bundle(
    bundle: &PostBundle,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(bundle)?;

    let now = Local::now();
    let full_dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        now.date_naive()
    );
    ensure_writable_dir(&full_dir).await?;

    let path = format!("{}/{}_post.json", full_dir, now.format("%H%M%S"));
    fs::write(&path, json).await?;
    info!(%path, "Wrote post bundle JSON");

    Ok(path)
}
