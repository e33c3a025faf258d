use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use csvfacade::{CsvFacade, Record};
use tempfile::TempDir;

fn populate(rows: usize) -> String {
    let mut text = String::from("id;name;password;");
    for i in 1..=rows {
        text.push_str(&format!("\n{};user{};secret;", i, i));
    }
    text
}

fn bench_get_by_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    let runtime = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("get_one_of_1000", |b| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, populate(1000)).unwrap();
        let facade = CsvFacade::new(&path, None);

        let mut counter = 0u64;
        b.to_async(&runtime).iter(|| {
            counter += 1;
            let id = counter % 1000 + 1;
            let facade = &facade;
            async move {
                black_box(facade.get(Some(id.into())).await.unwrap());
            }
        });
    });

    group.finish();
}

fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(20);
    group.throughput(Throughput::Elements(1));

    let runtime = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("read_then_update_100", |b| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, populate(100)).unwrap();
        let facade = CsvFacade::new(&path, None);

        b.to_async(&runtime).iter(|| async {
            black_box(facade.get(None).await.unwrap());
            let change: Record = [("id", "50"), ("name", "renamed")].into_iter().collect();
            facade.update(change).await.unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_get_by_id, bench_mixed);
criterion_main!(benches);
