use std::{collections::BTreeSet, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config;

/// Reference lists of GSS codes that identify a boundary family.
///
/// Counties and districts are closed lists of full codes. Constituencies are
/// recognised by the first three characters of the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryRegistry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub counties: BTreeSet<String>,
    pub districts: BTreeSet<String>,
    pub constituency_prefixes: Vec<String>,
}

impl BoundaryRegistry {
    /// The registry compiled into the binary from `resources/boundary_codes.yaml`.
    pub fn builtin() -> Result<Self> {
        config::from_str(config::BOUNDARY_CODES_YAML)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        config::load_or_default(path, config::BOUNDARY_CODES_YAML)
    }

    pub fn is_county(&self, ecode: &str) -> bool {
        self.counties.contains(ecode)
    }

    pub fn is_district(&self, ecode: &str) -> bool {
        self.districts.contains(ecode)
    }

    pub fn has_constituency_prefix(&self, key: &str) -> bool {
        let prefix = key.get(..3).unwrap_or(key);
        self.constituency_prefixes.iter().any(|p| p == prefix)
    }

    pub fn to_yaml(&self) -> Result<String> {
        config::to_string(self)
    }
}
