use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hamming_fec::{ExtendedHamming, Hamming32, Hamming64, Word};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const COUNT: usize = 1 << 16;

fn random_messages<W: Word>(code: &ExtendedHamming<W>, seed: u64) -> Vec<W> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let max = code.max_message().widen();
    (0..COUNT)
        .map(|_| W::truncate(rng.gen::<u64>() & max))
        .collect()
}

fn bench_code<W: Word>(c: &mut Criterion, name: &str, code: ExtendedHamming<W>) {
    let messages = random_messages(&code, 42);
    let encoded: Vec<W> = messages.iter().map(|&m| code.encode(m).unwrap()).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    let corrupted: Vec<W> = encoded
        .iter()
        .map(|&c| W::truncate(c.widen() ^ (1u64 << rng.gen_range(0..code.code_bits()))))
        .collect();

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes((COUNT * W::BYTES) as u64));

    group.bench_function("encode", |b| {
        b.iter(|| {
            for &m in &messages {
                black_box(code.encode(black_box(m)).unwrap());
            }
        })
    });

    group.bench_function("decode", |b| {
        b.iter(|| {
            for &c in &encoded {
                black_box(code.decode(black_box(c)).unwrap());
            }
        })
    });

    group.bench_function("decode_corrupted", |b| {
        b.iter(|| {
            for &c in &corrupted {
                black_box(code.decode(black_box(c)).unwrap());
            }
        })
    });

    #[cfg(feature = "parallel")]
    group.bench_with_input(
        BenchmarkId::new("decode_batch", COUNT),
        &corrupted,
        |b, corrupted| b.iter(|| black_box(code.decode_batch(corrupted).unwrap())),
    );

    group.finish();
}

fn hamming_benchmarks(c: &mut Criterion) {
    bench_code(c, "hamming_32_26", Hamming32::new());
    bench_code(c, "hamming_64_57", Hamming64::new());
}

criterion_group!(benches, hamming_benchmarks);
criterion_main!(benches);
