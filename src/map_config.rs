use std::{collections::BTreeMap, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{config, error::CheckError, region::RegionLevel};

const DEFAULT_SHETLAND_CODE: &str = "S12000027";
const LONDON_BOROUGH_PREFIX: &str = "E09";

/// Boundary geometry file and property names for one level and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDataAttributes {
    pub file: String,
    pub name_field: String,
    pub id_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub london: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shetland: Option<String>,
}

impl MapDataAttributes {
    pub fn is_london(&self, id: &str) -> bool {
        match &self.london {
            Some(codes) => codes.iter().any(|code| code == id),
            None => id.starts_with(LONDON_BOROUGH_PREFIX),
        }
    }

    pub fn is_shetland(&self, id: &str) -> bool {
        id.starts_with(self.shetland.as_deref().unwrap_or(DEFAULT_SHETLAND_CODE))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Prefix joined to each geometry file name.
    #[serde(default)]
    pub location: String,
    pub levels: BTreeMap<RegionLevel, BTreeMap<u16, MapDataAttributes>>,
}

impl MapConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        config::load_or_default(path, config::MAP_DATA_YAML)
    }

    /// Attributes for `level` in `year`, with `file` resolved against
    /// `location`.
    pub fn attributes(&self, level: RegionLevel, year: u16) -> Result<MapDataAttributes, CheckError> {
        let attrs = self
            .levels
            .get(&level)
            .and_then(|years| years.get(&year))
            .ok_or(CheckError::UnknownMapData { level, year })?;
        Ok(MapDataAttributes {
            file: format!("{}{}", self.location, attrs.file),
            ..attrs.clone()
        })
    }

    pub fn latest_year(&self, level: RegionLevel) -> Option<u16> {
        self.levels
            .get(&level)
            .and_then(|years| years.keys().next_back().copied())
    }

    /// `year` when given, otherwise the latest year configured for `level`.
    pub fn resolve_year(&self, level: RegionLevel, year: Option<u16>) -> Result<u16, CheckError> {
        match year {
            Some(year) => Ok(year),
            None => self.latest_year(level).ok_or(CheckError::NoMapData(level)),
        }
    }
}
