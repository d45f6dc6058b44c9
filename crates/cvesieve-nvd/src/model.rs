//! Serde data model for the NVD 2.0 yearly JSON feed
//!
//! Only the fields the exporter reads are modeled; everything else in the
//! feed is ignored during deserialization. Field-presence quirks of the
//! feed (optional lists, the two `configurations` shapes, CVSS v2 severity
//! living outside `cvssData`) are handled here so the extraction engine
//! sees one normalized shape.

use cvesieve_core::{AffectedProduct, CveRecord};
use serde::Deserialize;

/// Top-level yearly feed document
#[derive(Debug, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub vulnerabilities: Vec<FeedEntry>,
}

/// One entry of the `vulnerabilities` array
#[derive(Debug, Deserialize)]
pub struct FeedEntry {
    pub cve: Cve,
}

/// One CVE item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cve {
    pub id: String,
    pub published: Option<String>,
    pub last_modified: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub configurations: Configurations,
}

impl Cve {
    /// First description text, empty when the entry carries none
    pub fn summary(&self) -> String {
        self.descriptions
            .first()
            .map(|d| d.value.clone())
            .unwrap_or_default()
    }

    /// CVSS v3 base score and severity from the first v3.1 metric
    pub fn cvss_v3(&self) -> (Option<f64>, Option<String>) {
        match self.metrics.cvss_metric_v31.first() {
            Some(metric) => (
                metric.cvss_data.base_score,
                metric.cvss_data.base_severity.clone(),
            ),
            None => (None, None),
        }
    }

    /// CVSS v2 base score and severity from the first v2 metric.
    ///
    /// In the 2.0 feed the v2 severity sits on the metric object itself,
    /// not inside `cvssData`.
    pub fn cvss_v2(&self) -> (Option<f64>, Option<String>) {
        match self.metrics.cvss_metric_v2.first() {
            Some(metric) => (metric.cvss_data.base_score, metric.base_severity.clone()),
            None => (None, None),
        }
    }

    /// Reference URLs in feed order
    pub fn reference_urls(&self) -> Vec<String> {
        self.references.iter().map(|r| r.url.clone()).collect()
    }

    /// Configuration nodes after shape normalization
    pub fn configuration_nodes(&self) -> &[Node] {
        self.configurations.nodes()
    }

    /// Build the export record, pairing this entry's metadata with the
    /// affected products resolved by the extraction engine.
    pub fn to_record(&self, affected: Vec<AffectedProduct>) -> CveRecord {
        let (cvss_v3_score, cvss_v3_severity) = self.cvss_v3();
        let (cvss_v2_score, cvss_v2_severity) = self.cvss_v2();

        CveRecord {
            cve_id: self.id.clone(),
            published: self.published.clone(),
            last_modified: self.last_modified.clone(),
            cvss_v3_score,
            cvss_v3_severity,
            cvss_v2_score,
            cvss_v2_severity,
            summary: self.summary(),
            references: self.reference_urls(),
            affected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub lang: String,
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default)]
    pub cvss_metric_v31: Vec<CvssMetricV31>,
    #[serde(default)]
    pub cvss_metric_v2: Vec<CvssMetricV2>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssMetricV31 {
    #[serde(default)]
    pub cvss_data: CvssData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssMetricV2 {
    #[serde(default)]
    pub cvss_data: CvssData,
    pub base_severity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssData {
    pub base_score: Option<f64>,
    pub base_severity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Reference {
    pub url: String,
}

/// The feed's `configurations` field appears either as a single
/// `{nodes: [...]}` object or as a list wrapping such objects. Both
/// shapes are normalized here, once, before traversal; any other shape
/// reads as no configurations.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
pub enum Configurations {
    #[default]
    Missing,
    Block(ConfigurationBlock),
    List(Vec<ConfigurationBlock>),
    Unrecognized(serde_json::Value),
}

impl Configurations {
    /// The node list to traverse. List form resolves to its first
    /// element, matching the observed feed contract.
    pub fn nodes(&self) -> &[Node] {
        match self {
            Configurations::Block(block) => &block.nodes,
            Configurations::List(blocks) => blocks
                .first()
                .map(|b| b.nodes.as_slice())
                .unwrap_or_default(),
            Configurations::Missing | Configurations::Unrecognized(_) => &[],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfigurationBlock {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// One level of the boolean applicability tree
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub operator: Option<String>,
    pub negate: Option<bool>,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub cpe_match: Vec<CpeMatch>,
}

/// Leaf platform condition of the applicability tree
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpeMatch {
    #[serde(default)]
    pub vulnerable: bool,
    pub criteria: Option<String>,
    pub version_start_including: Option<String>,
    pub version_start_excluding: Option<String>,
    pub version_end_including: Option<String>,
    pub version_end_excluding: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cve(json: &str) -> Cve {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_minimal_entry() {
        let cve = parse_cve(r#"{"id": "CVE-2023-0001"}"#);
        assert_eq!(cve.id, "CVE-2023-0001");
        assert_eq!(cve.summary(), "");
        assert_eq!(cve.cvss_v3(), (None, None));
        assert_eq!(cve.cvss_v2(), (None, None));
        assert!(cve.configuration_nodes().is_empty());
    }

    #[test]
    fn test_parse_metrics() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0002",
                "metrics": {
                    "cvssMetricV31": [
                        {"cvssData": {"baseScore": 9.8, "baseSeverity": "CRITICAL"}}
                    ],
                    "cvssMetricV2": [
                        {"cvssData": {"baseScore": 7.5}, "baseSeverity": "HIGH"}
                    ]
                }
            }"#,
        );
        assert_eq!(cve.cvss_v3(), (Some(9.8), Some(String::from("CRITICAL"))));
        assert_eq!(cve.cvss_v2(), (Some(7.5), Some(String::from("HIGH"))));
    }

    #[test]
    fn test_summary_takes_first_description() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0003",
                "descriptions": [
                    {"lang": "en", "value": "first"},
                    {"lang": "es", "value": "segundo"}
                ]
            }"#,
        );
        assert_eq!(cve.summary(), "first");
    }

    #[test]
    fn test_configurations_object_shape() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0004",
                "configurations": {
                    "nodes": [{"operator": "OR", "cpeMatch": []}]
                }
            }"#,
        );
        assert_eq!(cve.configuration_nodes().len(), 1);
    }

    #[test]
    fn test_configurations_list_shape() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0005",
                "configurations": [
                    {"nodes": [{"operator": "OR"}, {"operator": "AND"}]}
                ]
            }"#,
        );
        assert_eq!(cve.configuration_nodes().len(), 2);
    }

    #[test]
    fn test_configurations_list_resolves_to_first_element() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0006",
                "configurations": [
                    {"nodes": [{"operator": "OR"}]},
                    {"nodes": [{"operator": "OR"}, {"operator": "OR"}]}
                ]
            }"#,
        );
        assert_eq!(cve.configuration_nodes().len(), 1);
    }

    #[test]
    fn test_configurations_unrecognized_shape() {
        let cve = parse_cve(r#"{"id": "CVE-2023-0007", "configurations": "bogus"}"#);
        assert!(cve.configuration_nodes().is_empty());

        let cve = parse_cve(r#"{"id": "CVE-2023-0008", "configurations": [1, 2]}"#);
        assert!(cve.configuration_nodes().is_empty());
    }

    #[test]
    fn test_cpe_match_boundary_fields() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0009",
                "configurations": {
                    "nodes": [{
                        "cpeMatch": [{
                            "vulnerable": true,
                            "criteria": "cpe:2.3:a:oracle:mysql:*:*:*:*:*:*:*:*",
                            "versionStartIncluding": "5.5",
                            "versionEndExcluding": "8.0"
                        }]
                    }]
                }
            }"#,
        );
        let node = &cve.configuration_nodes()[0];
        let m = &node.cpe_match[0];
        assert!(m.vulnerable);
        assert_eq!(m.version_start_including.as_deref(), Some("5.5"));
        assert_eq!(m.version_start_excluding, None);
        assert_eq!(m.version_end_excluding.as_deref(), Some("8.0"));
    }

    #[test]
    fn test_to_record() {
        let cve = parse_cve(
            r#"{
                "id": "CVE-2023-0010",
                "published": "2023-04-18T20:15:00.000",
                "lastModified": "2023-05-01T11:00:00.000",
                "descriptions": [{"lang": "en", "value": "Vulnerability in MySQL Server."}],
                "references": [
                    {"url": "https://www.oracle.com/security-alerts/cpuapr2023.html"},
                    {"url": "https://nvd.example/ref"}
                ]
            }"#,
        );
        let record = cve.to_record(vec![]);
        assert_eq!(record.cve_id, "CVE-2023-0010");
        assert_eq!(record.published.as_deref(), Some("2023-04-18T20:15:00.000"));
        assert_eq!(record.summary, "Vulnerability in MySQL Server.");
        assert_eq!(
            record.joined_references(),
            "https://www.oracle.com/security-alerts/cpuapr2023.html; https://nvd.example/ref"
        );
    }

    #[test]
    fn test_parse_feed_document() {
        let feed: Feed = serde_json::from_str(
            r#"{
                "resultsPerPage": 1,
                "vulnerabilities": [
                    {"cve": {"id": "CVE-2023-0011"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(feed.vulnerabilities.len(), 1);
        assert_eq!(feed.vulnerabilities[0].cve.id, "CVE-2023-0011");
    }
}
