use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use textdelta::{EditScriptSource, MyersDiff, Span};

const WORDS: &[&str] = &[
    "delta", "encoder", "control", "word", "offset", "count", "insert", "delete", "keep", "span",
    "繁体", "Grüße", "\n",
];

fn gen_text(words: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::with_capacity(words * 8);
    for _ in 0..words {
        out.push_str(WORDS[rng.random_range(0..WORDS.len())]);
        out.push(' ');
    }
    out
}

/// Replace roughly one word in `stride` with a different one.
fn mutate(base: &str, stride: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    base.split(' ')
        .enumerate()
        .map(|(i, w)| {
            if i % stride.max(1) == 0 {
                WORDS[rng.random_range(0..WORDS.len())]
            } else {
                w
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_encode_end_to_end(c: &mut Criterion) {
    let mut g = c.benchmark_group("encode_end_to_end");
    for words in [1_000usize, 10_000, 50_000] {
        let old = gen_text(words, 1);
        let new = mutate(&old, 64, 2);
        g.throughput(Throughput::Bytes(new.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| {
                let delta = textdelta::encode(black_box(&old), black_box(&new)).unwrap();
                black_box(delta);
            });
        });
    }
    g.finish();
}

fn bench_encoder_only(c: &mut Criterion) {
    let mut g = c.benchmark_group("encoder_only");
    for words in [10_000usize, 100_000] {
        let old = gen_text(words, 3);
        let new = mutate(&old, 16, 4);
        let spans: Vec<Span<'_>> = MyersDiff::default().edit_script(&old, &new);
        g.throughput(Throughput::Elements(spans.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| {
                let delta = textdelta::encode_spans(black_box(spans.iter().copied())).unwrap();
                black_box(delta);
            });
        });
    }
    g.finish();
}

fn bench_long_runs(c: &mut Criterion) {
    let mut g = c.benchmark_group("long_runs");
    let keep = "k".repeat(1 << 20);
    let insert = "i".repeat(1 << 20);
    let spans = [
        Span::Keep(&keep),
        Span::Insert(&insert),
        Span::Keep(&keep),
        Span::Delete(1 << 20),
    ];
    g.throughput(Throughput::Bytes((insert.len() + (1 << 20)) as u64));
    g.bench_function("one_mib_insert_and_delete", |b| {
        b.iter(|| {
            let delta = textdelta::encode_spans(black_box(spans)).unwrap();
            black_box(delta);
        });
    });
    g.finish();
}

criterion_group!(
    benches,
    bench_encode_end_to_end,
    bench_encoder_only,
    bench_long_runs
);
criterion_main!(benches);
