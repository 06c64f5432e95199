use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hamming_fec::{ErrorCorrection, StreamFramer, Word};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bench_framer<W: Word>(c: &mut Criterion, name: &str, framer: StreamFramer<W>) {
    let mut group = c.benchmark_group(name);
    for size in [64 * 1024, 2 * 1024 * 1024] {
        let mut rng = ChaCha8Rng::seed_from_u64(size as u64);
        let data: Vec<u8> = (0..size).map(|_| rng.gen()).collect();
        let encoded = framer.encode(&data).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| black_box(framer.encode(black_box(data)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| black_box(framer.decode(black_box(encoded)).unwrap()))
        });
    }
    group.finish();
}

fn stream_benchmarks(c: &mut Criterion) {
    bench_framer(c, "stream_32_26", StreamFramer::<u32>::new());
    bench_framer(c, "stream_64_57", StreamFramer::<u64>::new());
}

criterion_group!(benches, stream_benchmarks);
criterion_main!(benches);
