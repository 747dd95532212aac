#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use choropleth_check::rows::{DATA_FIELD, DataRow, ECODE_FIELD};
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Grid rows with `ecode` and `data` columns.
pub fn grid(pairs: &[(&str, &str)]) -> Vec<DataRow> {
    pairs
        .iter()
        .map(|(ecode, data)| DataRow::new().with(ECODE_FIELD, ecode).with(DATA_FIELD, data))
        .collect()
}

/// Rows with only a `data` column.
pub fn column(values: &[&str]) -> Vec<DataRow> {
    values
        .iter()
        .map(|value| DataRow::new().with(DATA_FIELD, value))
        .collect()
}

/// A feature collection of unit squares keyed by `id_field`.
pub fn boundaries(id_field: &str, ids: &[&str]) -> Value {
    let features = ids
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            let x = idx as f64;
            json!({
                "type": "Feature",
                "properties": { id_field: id, "NAME": format!("Area {idx}") },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
                }
            })
        })
        .collect::<Vec<_>>();
    json!({ "type": "FeatureCollection", "features": features })
}
