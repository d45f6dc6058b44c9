//! Vulnerability record and affected-product types

use serde::{Deserialize, Serialize};

/// One software product affected by a vulnerability.
///
/// The version field carries either a concrete version string (for example
/// `8.0.32`) or a composed inequality expression (for example
/// `>= 5.5 < 8.0`) reconstructed from the feed's boundary qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AffectedProduct {
    /// Vendor name as decomposed from the CPE identifier
    pub vendor: String,
    /// Product name as decomposed from the CPE identifier
    pub product: String,
    /// Concrete version or composed range expression
    pub version: String,
}

impl AffectedProduct {
    pub fn new(
        vendor: impl Into<String>,
        product: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            product: product.into(),
            version: version.into(),
        }
    }

    /// Identity key used for per-record deduplication
    pub fn key(&self) -> (String, String, String) {
        (
            self.vendor.clone(),
            self.product.clone(),
            self.version.clone(),
        )
    }
}

/// A single CVE entry with the metadata relayed to the export sink.
///
/// Scores and severities are carried through from the feed as-is; missing
/// metric sections stay `None` and render as empty output fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CveRecord {
    /// CVE identifier, e.g. `CVE-2023-21912`
    pub cve_id: String,
    /// Publication timestamp as reported by the feed
    pub published: Option<String>,
    /// Last-modification timestamp as reported by the feed
    pub last_modified: Option<String>,
    pub cvss_v3_score: Option<f64>,
    pub cvss_v3_severity: Option<String>,
    pub cvss_v2_score: Option<f64>,
    pub cvss_v2_severity: Option<String>,
    /// First description text from the feed entry
    pub summary: String,
    /// Reference URLs in feed order
    pub references: Vec<String>,
    /// Affected products resolved by the extraction engine, deduplicated
    pub affected: Vec<AffectedProduct>,
}

impl CveRecord {
    /// Reference URLs joined for tabular output
    pub fn joined_references(&self) -> String {
        self.references.join("; ")
    }
}
