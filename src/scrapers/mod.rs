//! News gathering: feed indexing and article fetching.
//!
//! The fetcher runs in two phases, each with its own module:
//!
//! 1. **Indexing** ([`feed`]): query the Google News search feed for a
//!    keyword and language/region pair, yielding entries in feed order
//! 2. **Fetching** ([`article`]): download each entry's page, extract main
//!    body text and a lead image, and apply the quality gate
//!
//! Downloads are concurrent over a bounded pool with per-request timeouts;
//! every rejection carries a typed skip reason so nothing fails silently.

pub mod article;
pub mod feed;
