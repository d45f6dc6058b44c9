//! Flat CSV row type
//!
//! One row per (record, affected product) pair. The field order here IS
//! the output column order; do not reorder.

use cvesieve_core::{AffectedProduct, CveRecord};
use serde::Serialize;

/// Output column names, in emission order
pub const COLUMNS: [&str; 12] = [
    "cve_id",
    "published_date",
    "last_modified",
    "cvss_v3_score",
    "cvss_v3_severity",
    "cvss_v2_score",
    "cvss_v2_severity",
    "summary",
    "vendor",
    "product",
    "version",
    "references",
];

/// One flat output row; record-level metadata merged with one affected
/// product. Absent scores and severities serialize as empty fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CveRow {
    pub cve_id: String,
    pub published_date: Option<String>,
    pub last_modified: Option<String>,
    pub cvss_v3_score: Option<f64>,
    pub cvss_v3_severity: Option<String>,
    pub cvss_v2_score: Option<f64>,
    pub cvss_v2_severity: Option<String>,
    pub summary: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
    /// Reference URLs joined with `"; "`
    pub references: String,
}

impl CveRow {
    /// Merge one record's metadata with one of its affected products
    pub fn for_product(record: &CveRecord, product: &AffectedProduct) -> Self {
        Self {
            cve_id: record.cve_id.clone(),
            published_date: record.published.clone(),
            last_modified: record.last_modified.clone(),
            cvss_v3_score: record.cvss_v3_score,
            cvss_v3_severity: record.cvss_v3_severity.clone(),
            cvss_v2_score: record.cvss_v2_score,
            cvss_v2_severity: record.cvss_v2_severity.clone(),
            summary: record.summary.clone(),
            vendor: product.vendor.clone(),
            product: product.product.clone(),
            version: product.version.clone(),
            references: record.joined_references(),
        }
    }
}
