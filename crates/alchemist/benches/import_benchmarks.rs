//! Import and export benchmarks.
//!
//! Measures CSV parsing, header mapping and re-serialization.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use alchemist::input::{import_bytes, to_csv_string};
use alchemist::{EntityKind, Parser};

/// Generate a tasks CSV with the specified number of rows.
fn generate_tasks_csv(rows: usize) -> String {
    let mut data = String::from("taskid,TaskName,Category,Duration,RequiredSkills,PreferredPhases,MaxConcurrent,Notes\n");
    for row in 0..rows {
        data.push_str(&format!(
            "T{},Task {},Cat{},{},\"rust,sql\",\"[1,2]\",{},note\n",
            row,
            row,
            row % 5,
            (row % 4) + 1,
            (row % 3) + 1
        ));
    }
    data
}

/// Benchmark importing CSV content of various sizes.
fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_tasks");
    let parser = Parser::new();

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_tasks_csv(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| {
                black_box(import_bytes(&parser, EntityKind::Tasks, "tasks.csv", data.as_bytes()).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark exporting a table back to CSV.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_tasks");
    let parser = Parser::new();

    for rows in [1_000, 10_000].iter() {
        let data = generate_tasks_csv(*rows);
        let imported = import_bytes(&parser, EntityKind::Tasks, "tasks.csv", data.as_bytes()).unwrap();
        group.bench_with_input(BenchmarkId::new("rows", rows), &imported.table, |b, table| {
            b.iter(|| black_box(to_csv_string(table).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_import, bench_export);
criterion_main!(benches);
