use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reservation category a cutoff applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryCode {
    Oc,
    Bc,
    Bcm,
    Mbc,
    Sc,
    Sca,
    St,
}

impl CategoryCode {
    pub const ALL: [CategoryCode; 7] = [
        CategoryCode::Oc,
        CategoryCode::Bc,
        CategoryCode::Bcm,
        CategoryCode::Mbc,
        CategoryCode::Sc,
        CategoryCode::Sca,
        CategoryCode::St,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryCode::Oc => "OC",
            CategoryCode::Bc => "BC",
            CategoryCode::Bcm => "BCM",
            CategoryCode::Mbc => "MBC",
            CategoryCode::Sc => "SC",
            CategoryCode::Sca => "SCA",
            CategoryCode::St => "ST",
        }
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category code '{0}' (expected one of OC, BC, BCM, MBC, SC, SCA, ST)")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryCode {
    type Err = UnknownCategory;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        CategoryCode::ALL
            .into_iter()
            .find(|c| c.as_str() == code)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One branch (programme) offered by a college.
/// A category absent from `cutoffs` had no seat allotted historically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub cutoffs: BTreeMap<CategoryCode, f64>,
}

impl Branch {
    pub fn cutoff_for(&self, category: CategoryCode) -> Option<f64> {
        self.cutoffs.get(&category).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct College {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// A single (college, branch) offer that a student's score qualifies for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub college: String,
    pub branch: String,
    pub cutoff: f64,
    pub address: String,
}
