//! Geography level detection from boundary codes.
//!
//! Each record is classified on its own, then the populated buckets decide
//! the answer: none gives `None`, one gives that level, more than one is an
//! [`CheckError::AmbiguousBoundary`] carrying the partition. A single stray
//! code from another family is never outvoted by the rest of the grid.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BoundaryBuckets, CheckError},
    registry::BoundaryRegistry,
    rows::{DataLookup, DataRow, ECODE_FIELD},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
    County,
    District,
    Constituency,
}

impl RegionLevel {
    pub const ALL: [RegionLevel; 3] = [
        RegionLevel::County,
        RegionLevel::District,
        RegionLevel::Constituency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionLevel::County => "county",
            RegionLevel::District => "district",
            RegionLevel::Constituency => "constituency",
        }
    }
}

impl fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionLevel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "county" => Ok(RegionLevel::County),
            "district" | "la" | "lad" => Ok(RegionLevel::District),
            "constituency" | "pcon" => Ok(RegionLevel::Constituency),
            other => Err(anyhow!(
                "Unknown geography level '{other}' (expected county, district or constituency)"
            )),
        }
    }
}

/// Anything that carries a boundary code.
pub trait RegionCode {
    fn ecode(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub ecode: String,
}

impl RegionRecord {
    pub fn new(ecode: &str) -> Self {
        Self {
            ecode: ecode.to_string(),
        }
    }
}

impl RegionCode for RegionRecord {
    fn ecode(&self) -> &str {
        &self.ecode
    }
}

impl RegionCode for DataRow {
    fn ecode(&self) -> &str {
        self.get(ECODE_FIELD)
    }
}

/// Which family a single record belongs to, if any.
///
/// The constituency test looks at the record's lookup key; the county and
/// district tests look at its ecode.
pub fn classify_record(key: &str, ecode: &str, registry: &BoundaryRegistry) -> Option<RegionLevel> {
    if registry.has_constituency_prefix(key) {
        Some(RegionLevel::Constituency)
    } else if registry.is_county(ecode) {
        Some(RegionLevel::County)
    } else if registry.is_district(ecode) {
        Some(RegionLevel::District)
    } else {
        None
    }
}

pub fn partition_records<'a, I, R>(records: I, registry: &BoundaryRegistry) -> BoundaryBuckets
where
    I: IntoIterator<Item = (&'a String, &'a R)>,
    R: RegionCode + 'a,
{
    let mut buckets = BoundaryBuckets::default();
    for (key, record) in records {
        let ecode = record.ecode();
        match classify_record(key, ecode, registry) {
            Some(level) => {
                debug!("{key}: '{ecode}' classified as {level}");
                buckets.push(level, ecode);
            }
            None => debug!("{key}: '{ecode}' matches no boundary family"),
        }
    }
    buckets
}

pub fn classify_region_type<'a, I, R>(
    records: I,
    registry: &BoundaryRegistry,
) -> Result<Option<RegionLevel>, CheckError>
where
    I: IntoIterator<Item = (&'a String, &'a R)>,
    R: RegionCode + 'a,
{
    let buckets = partition_records(records, registry);
    match buckets.populated().as_slice() {
        [] => Ok(None),
        [level] => Ok(Some(*level)),
        _ => Err(CheckError::AmbiguousBoundary(buckets)),
    }
}

/// Detected level of `lookup`, or `chosen` when no code is recognised.
pub fn resolve_data_level(
    lookup: &DataLookup,
    registry: &BoundaryRegistry,
    chosen: RegionLevel,
) -> Result<RegionLevel, CheckError> {
    match classify_region_type(lookup, registry)? {
        None => Ok(chosen),
        Some(detected) => {
            if detected != chosen {
                info!("Data looks like {detected} codes; switching from {chosen}");
            }
            Ok(detected)
        }
    }
}
