//! CPE (Common Platform Enumeration) identifier decomposition
//!
//! Splits a colon-delimited CPE 2.3 string into the vendor, product, and
//! version components used by the extraction engine. The feed is permissive
//! about identifier contents, so beyond the minimum field count no syntax
//! validation is performed.

use std::fmt;
use std::str::FromStr;

/// Minimum number of colon-delimited fields for a usable identifier:
/// scheme, version tag, part, vendor, product, version.
const MIN_FIELDS: usize = 6;

/// Vendor, product, and version decomposed from a CPE identifier.
///
/// Format: `cpe:2.3:part:vendor:product:version:update:edition:...` -
/// fields 3, 4, and 5 (zero-indexed) are the ones this exporter reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpeName {
    pub vendor: String,
    pub product: String,
    pub version: String,
}

impl CpeName {
    /// Decompose a CPE identifier string.
    ///
    /// Identifiers with fewer than six colon-delimited fields are
    /// malformed; the caller skips the enclosing match without aborting
    /// the surrounding traversal.
    pub fn decompose(criteria: &str) -> Result<Self, CpeError> {
        let fields: Vec<&str> = criteria.split(':').collect();
        if fields.len() < MIN_FIELDS {
            return Err(CpeError::TooFewFields {
                found: fields.len(),
            });
        }

        Ok(Self {
            vendor: fields[3].to_string(),
            product: fields[4].to_string(),
            version: fields[5].to_string(),
        })
    }
}

impl FromStr for CpeName {
    type Err = CpeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CpeName::decompose(s)
    }
}

/// CPE decomposition error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpeError {
    TooFewFields { found: usize },
}

impl fmt::Display for CpeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpeError::TooFewFields { found } => write!(
                f,
                "CPE identifier has {} fields, at least {} required",
                found, MIN_FIELDS
            ),
        }
    }
}

impl std::error::Error for CpeError {}
