//! Affected-product extraction engine
//!
//! Walks a CVE entry's boolean applicability tree, decomposes each
//! vulnerable CPE match, resolves its version descriptor, filters to the
//! configured target products, and deduplicates the result. The engine is
//! purely functional over its inputs and keeps no state between records.

use crate::cpe::CpeName;
use crate::model::{CpeMatch, Node};
use crate::version::{self, VersionBounds};
use cvesieve_core::{AffectedProduct, Error, Result};
use std::collections::HashSet;
use tracing::debug;

/// Recursion cap for the applicability tree. Well-formed feeds nest a
/// handful of levels; anything near this bound is a corrupted or
/// adversarial document and aborts that record's traversal.
pub const MAX_NODE_DEPTH: usize = 256;

/// Target product name fragments, matched case-insensitively as
/// substrings of the decomposed product name. Substring containment also
/// captures variant identifiers such as `mysql_server` or
/// `mariadb-connector-j`.
#[derive(Debug, Clone)]
pub struct TargetProducts {
    fragments: Vec<String>,
}

impl TargetProducts {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|f| f.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Membership test for a decomposed product name
    pub fn matches(&self, product: &str) -> bool {
        let product = product.to_lowercase();
        self.fragments.iter().any(|f| product.contains(f))
    }
}

/// Result of one extraction pass over a single CVE entry
#[derive(Debug, Default)]
pub struct Extraction {
    /// Deduplicated affected products, in traversal order
    pub products: Vec<AffectedProduct>,
    /// Matches dropped for malformed or missing identifiers
    pub skipped_matches: u32,
}

/// Affected-product extraction engine.
///
/// Construct once with the target-product configuration and reuse across
/// records; each call to [`Extractor::extract`] is an independent pass.
#[derive(Debug, Clone)]
pub struct Extractor {
    targets: TargetProducts,
}

impl Extractor {
    pub fn new(targets: TargetProducts) -> Self {
        Self { targets }
    }

    /// Extract the affected products from one entry's configuration nodes.
    ///
    /// Malformed CPE identifiers drop only their own match and are counted
    /// in the result. Exceeding [`MAX_NODE_DEPTH`] aborts this record with
    /// [`Error::ExcessiveNesting`]; the caller continues with the next one.
    pub fn extract(&self, nodes: &[Node]) -> Result<Extraction> {
        let mut matches = Vec::new();
        for node in nodes {
            collect_vulnerable(node, 0, &mut matches)?;
        }

        let mut extraction = Extraction::default();
        let mut seen: HashSet<(String, String, String)> = HashSet::new();

        for m in matches {
            let criteria = match m.criteria.as_deref() {
                Some(c) => c,
                None => {
                    extraction.skipped_matches += 1;
                    continue;
                }
            };

            let name = match CpeName::decompose(criteria) {
                Ok(name) => name,
                Err(e) => {
                    debug!("Skipping malformed CPE identifier {:?}: {}", criteria, e);
                    extraction.skipped_matches += 1;
                    continue;
                }
            };

            if !self.targets.matches(&name.product) {
                continue;
            }

            let bounds = VersionBounds {
                start_including: m.version_start_including.as_deref(),
                start_excluding: m.version_start_excluding.as_deref(),
                end_including: m.version_end_including.as_deref(),
                end_excluding: m.version_end_excluding.as_deref(),
            };
            let descriptor = version::resolve(&name.version, &bounds);

            let product = AffectedProduct::new(name.vendor, name.product, descriptor);
            if seen.insert(product.key()) {
                extraction.products.push(product);
            }
        }

        Ok(extraction)
    }
}

/// Pre-order walk: local vulnerable matches first, then each child in
/// listed order. Missing lists read as empty via the data model.
fn collect_vulnerable<'a>(
    node: &'a Node,
    depth: usize,
    out: &mut Vec<&'a CpeMatch>,
) -> Result<()> {
    if depth >= MAX_NODE_DEPTH {
        return Err(Error::ExcessiveNesting {
            max: MAX_NODE_DEPTH,
        });
    }

    for m in &node.cpe_match {
        if m.vulnerable {
            out.push(m);
        }
    }

    for child in &node.children {
        collect_vulnerable(child, depth + 1, out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cve;

    fn mysql_extractor() -> Extractor {
        Extractor::new(TargetProducts::new(["mysql", "mariadb"]))
    }

    fn parse_nodes(json: &str) -> Vec<Node> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_target_products_substring_match() {
        let targets = TargetProducts::new(["mysql", "mariadb"]);
        assert!(targets.matches("mysql"));
        assert!(targets.matches("mysql_server"));
        assert!(targets.matches("mariadb-connector-j"));
        assert!(targets.matches("MariaDB"));
        assert!(!targets.matches("postgresql"));
        assert!(!targets.matches("oracle_database"));
    }

    #[test]
    fn test_walker_collects_across_nesting() {
        // 2 local matches (1 vulnerable) plus one child with 1 vulnerable
        // match yields exactly 2 collected matches
        let nodes = parse_nodes(
            r#"[{
                "operator": "OR",
                "cpeMatch": [
                    {"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:8.0.1:*:*:*:*:*:*:*"},
                    {"vulnerable": false, "criteria": "cpe:2.3:o:linux:linux_kernel:-:*:*:*:*:*:*:*"}
                ],
                "children": [{
                    "operator": "OR",
                    "cpeMatch": [
                        {"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:8.0.2:*:*:*:*:*:*:*"}
                    ]
                }]
            }]"#,
        );

        let extraction = mysql_extractor().extract(&nodes).unwrap();
        assert_eq!(extraction.products.len(), 2);
        assert_eq!(extraction.products[0].version, "8.0.1");
        assert_eq!(extraction.products[1].version, "8.0.2");
    }

    #[test]
    fn test_non_vulnerable_matches_never_emit() {
        let nodes = parse_nodes(
            r#"[{
                "cpeMatch": [
                    {"vulnerable": false, "criteria": "cpe:2.3:a:oracle:mysql:8.0.1:*:*:*:*:*:*:*"}
                ]
            }]"#,
        );
        let extraction = mysql_extractor().extract(&nodes).unwrap();
        assert!(extraction.products.is_empty());
        assert_eq!(extraction.skipped_matches, 0);
    }

    #[test]
    fn test_malformed_identifier_skips_match_only() {
        let nodes = parse_nodes(
            r#"[{
                "cpeMatch": [
                    {"vulnerable": true, "criteria": "cpe:2.3:a:oracle"},
                    {"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:8.0.32:*:*:*:*:*:*:*"},
                    {"vulnerable": true}
                ]
            }]"#,
        );
        let extraction = mysql_extractor().extract(&nodes).unwrap();
        assert_eq!(extraction.products.len(), 1);
        assert_eq!(extraction.products[0].version, "8.0.32");
        assert_eq!(extraction.skipped_matches, 2);
    }

    #[test]
    fn test_product_filter_drops_non_targets() {
        let nodes = parse_nodes(
            r#"[{
                "cpeMatch": [
                    {"vulnerable": true, "criteria": "cpe:2.3:a:postgresql:postgresql:15.1:*:*:*:*:*:*:*"},
                    {"vulnerable": true, "criteria": "cpe:2.3:a:mariadb:mariadb:10.6.1:*:*:*:*:*:*:*"}
                ]
            }]"#,
        );
        let extraction = mysql_extractor().extract(&nodes).unwrap();
        assert_eq!(extraction.products.len(), 1);
        assert_eq!(extraction.products[0].vendor, "mariadb");
    }

    #[test]
    fn test_deduplication_within_one_pass() {
        // The same triple reachable through two branches emits once
        let nodes = parse_nodes(
            r#"[
                {"cpeMatch": [{"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:8.0.32:*:*:*:*:*:*:*"}]},
                {"cpeMatch": [{"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:8.0.32:*:*:*:*:*:*:*"}]}
            ]"#,
        );
        let extraction = mysql_extractor().extract(&nodes).unwrap();
        assert_eq!(extraction.products.len(), 1);
    }

    #[test]
    fn test_no_state_between_passes() {
        let nodes = parse_nodes(
            r#"[{"cpeMatch": [{"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:8.0.32:*:*:*:*:*:*:*"}]}]"#,
        );
        let extractor = mysql_extractor();
        let first = extractor.extract(&nodes).unwrap();
        let second = extractor.extract(&nodes).unwrap();
        // A repeated triple across invocations is not deduplicated
        assert_eq!(first.products, second.products);
        assert_eq!(second.products.len(), 1);
    }

    /// Chain of single-child nodes, `levels` deep, built directly since
    /// JSON this deep would be refused by the parser long before the
    /// walker sees it.
    fn nested_chain(levels: usize) -> Node {
        let mut node = Node {
            operator: None,
            negate: None,
            children: vec![],
            cpe_match: vec![],
        };
        for _ in 0..levels {
            node = Node {
                operator: None,
                negate: None,
                children: vec![node],
                cpe_match: vec![],
            };
        }
        node
    }

    #[test]
    fn test_depth_cap_aborts_record() {
        let nodes = vec![nested_chain(MAX_NODE_DEPTH + 1)];

        let err = mysql_extractor().extract(&nodes).unwrap_err();
        assert!(matches!(err, Error::ExcessiveNesting { .. }));
        assert!(err.is_record_scoped());
    }

    #[test]
    fn test_depth_within_cap_is_fine() {
        let mut inner = String::from(
            r#"{"cpeMatch": [{"vulnerable": true, "criteria": "cpe:2.3:a:oracle:mysql:5.6.1:*:*:*:*:*:*:*"}]}"#,
        );
        for _ in 0..10 {
            inner = format!(r#"{{"children": [{}]}}"#, inner);
        }
        let nodes = parse_nodes(&format!("[{}]", inner));

        let extraction = mysql_extractor().extract(&nodes).unwrap();
        assert_eq!(extraction.products.len(), 1);
    }

    #[test]
    fn test_end_to_end_concrete_version() {
        // AND of two groups; only the vulnerable MySQL match emits
        let cve: Cve = serde_json::from_str(
            r#"{
                "id": "CVE-2023-1000",
                "configurations": {
                    "nodes": [{
                        "operator": "AND",
                        "children": [
                            {
                                "operator": "OR",
                                "cpeMatch": [{
                                    "vulnerable": true,
                                    "criteria": "cpe:2.3:a:oracle:mysql:8.0.32:*:*:*:*:*:*:*"
                                }]
                            },
                            {
                                "operator": "OR",
                                "cpeMatch": [{
                                    "vulnerable": false,
                                    "criteria": "cpe:2.3:o:linux:linux_kernel:-:*:*:*:*:*:*:*"
                                }]
                            }
                        ]
                    }]
                }
            }"#,
        )
        .unwrap();

        let extraction = mysql_extractor()
            .extract(cve.configuration_nodes())
            .unwrap();
        assert_eq!(
            extraction.products,
            vec![AffectedProduct::new("oracle", "mysql", "8.0.32")]
        );
    }

    #[test]
    fn test_end_to_end_range_version() {
        let cve: Cve = serde_json::from_str(
            r#"{
                "id": "CVE-2023-1001",
                "configurations": {
                    "nodes": [{
                        "operator": "AND",
                        "children": [{
                            "operator": "OR",
                            "cpeMatch": [{
                                "vulnerable": true,
                                "criteria": "cpe:2.3:a:oracle:mysql:*:*:*:*:*:*:*:*",
                                "versionEndExcluding": "8.1.0"
                            }]
                        }]
                    }]
                }
            }"#,
        )
        .unwrap();

        let extraction = mysql_extractor()
            .extract(cve.configuration_nodes())
            .unwrap();
        assert_eq!(extraction.products.len(), 1);
        assert_eq!(extraction.products[0].version, "< 8.1.0");
    }
}
