use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use price_dataflow::*;
use tokio::runtime::Runtime;

fn create_price_array(count: usize) -> Vec<u8> {
    let mut data = b"[".to_vec();
    for i in 0..count {
        if i > 0 {
            data.push(b',');
        }
        data.extend(
            format!(
                r#"{{"aikaleima_suomi":"2024-01-01T{:02}:00","hinta":"{}.{:03}"}}"#,
                i % 24,
                i % 40,
                i % 1000
            )
            .as_bytes(),
        );
    }
    data.push(b']');
    data
}

fn reassemble(data: &[u8], chunk_size: usize) -> usize {
    let mut reassembler = StreamReassembler::new();
    let mut fragments = 0;
    for chunk in data.chunks(chunk_size) {
        fragments += reassembler.feed(chunk).unwrap().len();
    }
    reassembler.finish().unwrap();
    fragments
}

fn reassembly_benchmark(c: &mut Criterion) {
    let data = create_price_array(10_000);

    let mut group = c.benchmark_group("reassembly");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [64, 536, 1460, 16 * 1024].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| assert_eq!(reassemble(&data, chunk_size), 10_000));
            },
        );
    }

    group.finish();
}

fn feed_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let feed = PriceFeed::default();

    let mut group = c.benchmark_group("price_feed");
    group.sample_size(10);

    for count in [100, 1000, 10_000].iter() {
        let data = create_price_array(*count);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                rt.block_on(async {
                    let mut source = IterChunkSource::split(data, 1460);
                    let series = feed.collect(&mut source).await.unwrap();
                    assert_eq!(series.len(), *count);
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, reassembly_benchmark, feed_benchmark);
criterion_main!(benches);
