//! Typed failures raised by the checks in this crate.
//!
//! Variants carry the structured payload a caller needs to point at the
//! offending cells of the grid.

use std::{collections::BTreeSet, fmt};

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::region::RegionLevel;

/// Ecodes split by the boundary family they were recognised as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundaryBuckets {
    pub counties: Vec<String>,
    pub districts: Vec<String>,
    pub constituencies: Vec<String>,
}

impl BoundaryBuckets {
    pub fn push(&mut self, level: RegionLevel, ecode: &str) {
        let bucket = match level {
            RegionLevel::County => &mut self.counties,
            RegionLevel::District => &mut self.districts,
            RegionLevel::Constituency => &mut self.constituencies,
        };
        bucket.push(ecode.to_string());
    }

    pub fn get(&self, level: RegionLevel) -> &[String] {
        match level {
            RegionLevel::County => &self.counties,
            RegionLevel::District => &self.districts,
            RegionLevel::Constituency => &self.constituencies,
        }
    }

    /// Levels whose bucket holds at least one code, in county, district,
    /// constituency order.
    pub fn populated(&self) -> Vec<RegionLevel> {
        RegionLevel::ALL
            .into_iter()
            .filter(|level| !self.get(*level).is_empty())
            .collect()
    }
}

impl fmt::Display for BoundaryBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self
            .populated()
            .into_iter()
            .map(|level| format!("{level}: [{}]", self.get(level).join(", ")))
            .join("; ");
        write!(f, "{parts}")
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("Multiple boundary types ({0})")]
    AmbiguousBoundary(BoundaryBuckets),
    #[error("Duplicate row(s): {}", .0.join(", "))]
    DuplicateRows(Vec<String>),
    #[error("Unrecognised identifier(s): {}", .0.iter().join(", "))]
    UnmatchedIdentifiers(BTreeSet<String>),
    #[error(
        "Cannot graph categorical data with more than {limit} levels. You have {}",
        .levels.len()
    )]
    TooManyCategories { limit: usize, levels: Vec<String> },
    #[error("No valid data found; enter labels in the first column and numeric values in the second")]
    NoChartData,
    #[error(
        "Negative values are not allowed in donut charts. Found: {}",
        .0.iter().map(|(label, value)| format!("{label}: {value}")).join(", ")
    )]
    NegativeValues(Vec<(String, f64)>),
    #[error("Donut chart values add up to more than can be represented")]
    ChartTotalOverflow,
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("No palette found for '{0}'")]
    UnknownPalette(String),
    #[error("Unknown organisation '{organisation}' (known: {})", .known.join(", "))]
    UnknownOrganisation {
        organisation: String,
        known: Vec<String>,
    },
    #[error("No boundary data configured for {level} in {year}")]
    UnknownMapData { level: RegionLevel, year: u16 },
    #[error("No boundary data configured for {0}")]
    NoMapData(RegionLevel),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_display_lists_only_populated_levels() {
        let mut buckets = BoundaryBuckets::default();
        buckets.push(RegionLevel::County, "E10000003");
        buckets.push(RegionLevel::District, "E07000008");
        assert_eq!(
            buckets.to_string(),
            "county: [E10000003]; district: [E07000008]"
        );
        assert_eq!(
            buckets.populated(),
            vec![RegionLevel::County, RegionLevel::District]
        );
    }

    #[test]
    fn missing_level_message_has_no_year() {
        assert_eq!(
            CheckError::NoMapData(RegionLevel::District).to_string(),
            "No boundary data configured for district"
        );
    }

    #[test]
    fn duplicate_rows_message_lists_keys() {
        let err = CheckError::DuplicateRows(vec!["A".into(), "B".into()]);
        assert_eq!(err.to_string(), "Duplicate row(s): A, B");
    }
}
