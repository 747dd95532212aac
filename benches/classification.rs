use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::hint::black_box;
use std::path::PathBuf;

use choropleth_check::datatype::infer_value_type;
use choropleth_check::region::{RegionRecord, classify_region_type};
use choropleth_check::registry::BoundaryRegistry;
use choropleth_check::rows::{DATA_FIELD, DataRow, ECODE_FIELD, build_data_lookup, read_grid};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use encoding_rs::UTF_8;
use tempfile::TempDir;

fn generate_grid(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("grid.csv");
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(file, "ecode,data").expect("header");
    for i in 0..rows {
        let data = match i % 10 {
            0 => "NA".to_string(),
            1 => String::new(),
            n => format!("{}.{n}", i % 500),
        };
        writeln!(file, "E07{i:06},{data}").expect("row");
    }
    (temp_dir, csv_path)
}

fn bench_classification(c: &mut Criterion) {
    let (temp_dir, csv_path) = generate_grid(50_000);
    let registry = BoundaryRegistry::builtin().expect("registry");
    let rows = read_grid(&csv_path, b',', UTF_8, &[ECODE_FIELD, DATA_FIELD]).expect("read grid");
    let lookup = build_data_lookup(&rows, ECODE_FIELD);
    let records = lookup
        .iter()
        .map(|(key, row)| (key.clone(), RegionRecord::new(row.get(ECODE_FIELD))))
        .collect::<BTreeMap<_, _>>();

    let mut group = c.benchmark_group("grid_checks");

    group.bench_function("read_grid", |b| {
        b.iter(|| read_grid(&csv_path, b',', UTF_8, &[ECODE_FIELD]).expect("read grid"));
    });

    group.bench_function("classify_region_type", |b| {
        b.iter(|| classify_region_type(black_box(&records), &registry).expect("classify"));
    });

    group.bench_function("infer_value_type", |b| {
        b.iter_batched(
            || rows.iter().rev().cloned().collect::<Vec<DataRow>>(),
            |shuffled| infer_value_type(&shuffled),
            BatchSize::LargeInput,
        );
    });

    drop(temp_dir);
    group.finish();
}

criterion_group!(benches, bench_classification);
criterion_main!(benches);
