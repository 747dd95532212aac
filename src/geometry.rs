//! GeoJSON feature collections and their reconciliation with grid data.
//!
//! Features keep whatever members they arrive with. Reconciliation attaches
//! the matching grid row as a `data` member; a feature without one has no
//! value (not zero) for the renderer.

use std::{collections::BTreeSet, str::FromStr};

use anyhow::anyhow;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::CheckError,
    map_config::MapDataAttributes,
    rows::{DataLookup, DataRow},
};

fn feature_kind() -> String {
    "Feature".to_string()
}

fn collection_kind() -> String {
    "FeatureCollection".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataRow>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    pub fn new(properties: Map<String, Value>) -> Self {
        Self {
            kind: feature_kind(),
            properties,
            geometry: Value::Null,
            data: None,
            extra: Map::new(),
        }
    }

    /// The identifier stored under `field`. Numeric identifiers are read as
    /// their decimal text.
    pub fn id(&self, field: &str) -> Option<String> {
        match self.properties.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn with_data(&self, row: &DataRow) -> Self {
        Self {
            data: Some(row.clone()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_kind")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_kind(),
            features,
            extra: Map::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.features.iter().filter(|f| f.data.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub features: FeatureCollection,
    /// Lookup keys that no feature carried.
    pub unmatched: BTreeSet<String>,
}

impl Reconciliation {
    /// Fails with [`CheckError::UnmatchedIdentifiers`] when any key went
    /// unmatched.
    pub fn require_all_matched(self) -> Result<FeatureCollection, CheckError> {
        if self.unmatched.is_empty() {
            Ok(self.features)
        } else {
            Err(CheckError::UnmatchedIdentifiers(self.unmatched))
        }
    }
}

pub fn reconcile(geometry: &FeatureCollection, lookup: &DataLookup, id_field: &str) -> Reconciliation {
    let mut used = BTreeSet::new();
    let features = geometry
        .features
        .iter()
        .map(|feature| match feature.id(id_field) {
            Some(id) => match lookup.get_key_value(id.as_str()) {
                Some((key, row)) => {
                    used.insert(key.as_str());
                    feature.with_data(row)
                }
                None => feature.clone(),
            },
            None => feature.clone(),
        })
        .collect::<Vec<_>>();

    let unmatched = lookup
        .keys()
        .filter(|key| !used.contains(key.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>();
    debug!(
        "Matched {} of {} feature(s) on '{id_field}'",
        used.len(),
        geometry.len()
    );
    if !unmatched.is_empty() {
        warn!("{} identifier(s) have no boundary", unmatched.len());
    }
    Reconciliation {
        features: FeatureCollection {
            kind: geometry.kind.clone(),
            features,
            extra: geometry.extra.clone(),
        },
        unmatched,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inset {
    London,
    Shetland,
}

impl FromStr for Inset {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "london" => Ok(Inset::London),
            "shetland" => Ok(Inset::Shetland),
            other => Err(anyhow!("Unknown inset '{other}' (expected london or shetland)")),
        }
    }
}

/// Features belonging to the inset area, identified through `attrs`.
pub fn inset_features(
    features: &FeatureCollection,
    attrs: &MapDataAttributes,
    inset: Inset,
) -> FeatureCollection {
    let selected = features
        .features
        .iter()
        .filter(|feature| match feature.id(&attrs.id_field) {
            Some(id) if !id.is_empty() => match inset {
                Inset::London => attrs.is_london(&id),
                Inset::Shetland => attrs.is_shetland(&id),
            },
            _ => false,
        })
        .cloned()
        .collect();
    FeatureCollection::new(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{DATA_FIELD, ECODE_FIELD, build_data_lookup};
    use serde_json::json;

    fn collection(ids: &[&str]) -> FeatureCollection {
        let features = ids
            .iter()
            .map(|id| {
                let mut props = Map::new();
                props.insert("LAD24CD".into(), json!(id));
                Feature::new(props)
            })
            .collect();
        FeatureCollection::new(features)
    }

    #[test]
    fn numeric_identifiers_read_as_text() {
        let mut props = Map::new();
        props.insert("code".into(), json!(42));
        assert_eq!(Feature::new(props).id("code").as_deref(), Some("42"));
    }

    #[test]
    fn feature_without_id_field_passes_through() {
        let geometry = FeatureCollection::new(vec![Feature::new(Map::new())]);
        let lookup = build_data_lookup(
            &[DataRow::new().with(ECODE_FIELD, "E1").with(DATA_FIELD, "1")],
            ECODE_FIELD,
        );
        let result = reconcile(&geometry, &lookup, "LAD24CD");
        assert_eq!(result.features.matched_count(), 0);
        assert_eq!(result.unmatched.into_iter().collect::<Vec<_>>(), ["E1"]);
    }

    #[test]
    fn collection_members_survive_reconciliation() {
        let raw = json!({
            "type": "FeatureCollection",
            "name": "LAD_2024",
            "features": [{
                "type": "Feature",
                "id": 7,
                "properties": {"LAD24CD": "E07000008"},
                "geometry": {"type": "Point", "coordinates": [0.1, 52.2]}
            }]
        });
        let geometry: FeatureCollection = serde_json::from_value(raw).expect("geojson");
        let lookup = build_data_lookup(
            &[DataRow::new().with(ECODE_FIELD, "E07000008").with(DATA_FIELD, "12")],
            ECODE_FIELD,
        );
        let result = reconcile(&geometry, &lookup, "LAD24CD");
        let out = serde_json::to_value(&result.features).expect("serialize");
        assert_eq!(out["name"], "LAD_2024");
        assert_eq!(out["features"][0]["id"], 7);
        assert_eq!(out["features"][0]["data"]["data"], "12");
    }

    #[test]
    fn london_inset_falls_back_to_borough_prefix() {
        let attrs = MapDataAttributes {
            file: "LAD_2024.geojson".into(),
            name_field: "LAD24NM".into(),
            id_field: "LAD24CD".into(),
            london: None,
            shetland: None,
        };
        let features = collection(&["E09000001", "E07000008", "S12000027", ""]);
        let london = inset_features(&features, &attrs, Inset::London);
        assert_eq!(london.len(), 1);
        let shetland = inset_features(&features, &attrs, Inset::Shetland);
        assert_eq!(shetland.features[0].id("LAD24CD").as_deref(), Some("S12000027"));
    }
}
