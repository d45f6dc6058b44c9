//! cvesieve NVD - feed model and affected-product extraction
//!
//! This crate provides:
//! - Serde model of the NVD 2.0 yearly JSON feed
//! - CPE 2.3 identifier decomposition
//! - Version range resolution from boundary qualifiers
//! - The affected-product extraction engine (tree walk, target filter,
//!   per-record deduplication)
//! - Yearly archive download and decompression

pub mod cpe;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod version;

pub use cpe::{CpeError, CpeName};
pub use extract::{Extraction, Extractor, TargetProducts, MAX_NODE_DEPTH};
pub use fetch::{extract_feed_json, FeedClient};
pub use model::{Configurations, CpeMatch, Cve, Feed, FeedEntry, Node};
pub use version::{is_wildcard, resolve, VersionBounds};
