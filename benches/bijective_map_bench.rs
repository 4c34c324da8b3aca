use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use keyview::{Bijection, BijectiveMap, Identity};
use std::collections::BTreeMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

type Hex = Bijection<u64, String, fn(&u64) -> String, fn(&String) -> u64>;

fn hex() -> Hex {
    Bijection::new(
        (|n: &u64| format!("{n:016x}")) as fn(&u64) -> String,
        (|s: &String| u64::from_str_radix(s, 16).unwrap_or_default()) as fn(&String) -> u64,
    )
}

fn filled(n: usize) -> BijectiveMap<BTreeMap<String, u64>, Hex, Identity<u64>> {
    let mut m = BijectiveMap::new(BTreeMap::new(), hex(), Identity::new());
    m.extend(lcg(7).take(n).map(|x| (x, x >> 3)));
    m
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("bijective_insert_10k", |b| {
        b.iter_batched(
            || BijectiveMap::new(BTreeMap::new(), hex(), Identity::<u64>::new()),
            |mut m| {
                for x in lcg(1).take(10_000) {
                    let _ = m.insert(x, x);
                }
                black_box(m.len())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find(c: &mut Criterion) {
    c.bench_function("bijective_find_hit", |b| {
        let m = filled(20_000);
        let keys: Vec<u64> = lcg(7).take(20_000).collect();
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

// Full walk, each entry mapped back exactly once.
fn bench_iterate(c: &mut Criterion) {
    c.bench_function("bijective_iterate_10k", |b| {
        let m = filled(10_000);
        b.iter(|| {
            let sum = m.iter().fold(0u64, |acc, (k, v)| acc ^ k ^ v);
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_find, bench_iterate
}
criterion_main!(benches);
