//! Validation engine benchmarks.
//!
//! Measures full-recompute validation across table sizes, and the filter.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use alchemist::query::filter_indices;
use alchemist::{ClientRecord, Dataset, EntityRecord, TaskRecord, ValidationEngine, WorkerRecord};

const SKILLS: &[&str] = &["rust", "sql", "python", "ml", "ui", "design", "devops", "ops"];

/// Generate a dataset with `rows` rows per table and a sprinkling of errors.
fn generate_dataset(rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let pick = |rng: &mut StdRng| SKILLS[rng.gen_range(0..SKILLS.len())];

    let tasks = (0..rows)
        .map(|i| {
            TaskRecord::from_fields([
                ("TaskID", format!("T{}", i)),
                ("TaskName", format!("Task {}", i)),
                ("Duration", rng.gen_range(0..6).to_string()),
                ("RequiredSkills", format!("{},{}", pick(&mut rng), pick(&mut rng))),
            ])
        })
        .collect();

    let workers = (0..rows)
        .map(|i| {
            let slots: Vec<String> = (0..rng.gen_range(0..5)).map(|s| s.to_string()).collect();
            WorkerRecord::from_fields([
                ("WorkerID", format!("W{}", i)),
                ("WorkerName", format!("Worker {}", i)),
                ("Skills", format!("{},{}", pick(&mut rng), pick(&mut rng))),
                ("AvailableSlots", format!("[{}]", slots.join(","))),
                ("MaxLoadPerPhase", rng.gen_range(0..4).to_string()),
            ])
        })
        .collect();

    let clients = (0..rows)
        .map(|i| {
            let requested: Vec<String> = (0..3)
                .map(|_| format!("T{}", rng.gen_range(0..rows + 5)))
                .collect();
            ClientRecord::from_fields([
                ("ClientID", format!("C{}", rng.gen_range(0..rows))),
                ("ClientName", format!("Client {}", i)),
                ("PriorityLevel", rng.gen_range(0..7).to_string()),
                ("RequestedTaskIDs", requested.join(",")),
                ("AttributesJSON", r#"{"tier": 1}"#.to_string()),
            ])
        })
        .collect();

    Dataset {
        clients,
        workers,
        tasks,
    }
}

/// Benchmark the full validation pass at various sizes.
fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    let engine = ValidationEngine::new();

    for rows in [100, 1_000, 10_000].iter() {
        let dataset = generate_dataset(*rows, 42);
        group.throughput(Throughput::Elements((*rows * 3) as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| black_box(engine.validate(dataset)))
        });
    }

    group.finish();
}

/// Benchmark the single-comparison filter.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let dataset = generate_dataset(10_000, 7);

    group.bench_function("duration_gt", |b| {
        b.iter(|| black_box(filter_indices("Duration > 2", &dataset.tasks)))
    });

    group.bench_function("unparseable", |b| {
        b.iter(|| black_box(filter_indices("Duration >> 2", &dataset.tasks)))
    });

    group.finish();
}

criterion_group!(benches, bench_validate, bench_filter);
criterion_main!(benches);
