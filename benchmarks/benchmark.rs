use std::time::Instant;

use tern_std::{Arc, HashMap, OwnedStr, Vec};

const ARC_ROUNDS: usize = 1_000_000;
const VEC_ELEMS: usize = 1_000_000;
const MAP_ENTRIES: u64 = 100_000;

/// Clone/drop churn on one shared value: tern Arc vs std Arc.
fn bench_arc() -> (u128, u128) {
    let tern = Arc::new(7u64);
    let start = Instant::now();
    for _ in 0..ARC_ROUNDS {
        let dup = tern.clone();
        std::hint::black_box(&dup);
    }
    let tern_ns = start.elapsed().as_nanos();

    let std_arc = std::sync::Arc::new(7u64);
    let start = Instant::now();
    for _ in 0..ARC_ROUNDS {
        let dup = std_arc.clone();
        std::hint::black_box(&dup);
    }
    let std_ns = start.elapsed().as_nanos();

    (tern_ns, std_ns)
}

/// Append-heavy growth: tern Vec vs std Vec, both from empty.
fn bench_vec() -> (u128, u128) {
    let start = Instant::now();
    let mut tern = Vec::new();
    for i in 0..VEC_ELEMS {
        tern.push(i as u64);
    }
    std::hint::black_box(tern.len());
    let tern_ns = start.elapsed().as_nanos();

    let start = Instant::now();
    let mut std_vec = std::vec::Vec::new();
    for i in 0..VEC_ELEMS {
        std_vec.push(i as u64);
    }
    std::hint::black_box(std_vec.len());
    let std_ns = start.elapsed().as_nanos();

    (tern_ns, std_ns)
}

/// Insert-then-probe with string keys: tern HashMap vs std HashMap.
fn bench_map() -> (u128, u128) {
    let start = Instant::now();
    let mut tern: HashMap<OwnedStr, u64> = HashMap::new();
    for i in 0..MAP_ENTRIES {
        let key = OwnedStr::from(format!("entry-{i}"));
        tern.insert(&key, i).expect("table should keep growing");
    }
    let mut hits = 0u64;
    for i in 0..MAP_ENTRIES {
        let key = OwnedStr::from(format!("entry-{i}"));
        if tern.get(&key).is_some() {
            hits += 1;
        }
    }
    std::hint::black_box(hits);
    let tern_ns = start.elapsed().as_nanos();

    let start = Instant::now();
    let mut std_map = std::collections::HashMap::new();
    for i in 0..MAP_ENTRIES {
        std_map.insert(format!("entry-{i}"), i);
    }
    let mut hits = 0u64;
    for i in 0..MAP_ENTRIES {
        if std_map.get(&format!("entry-{i}")).is_some() {
            hits += 1;
        }
    }
    std::hint::black_box(hits);
    let std_ns = start.elapsed().as_nanos();

    (tern_ns, std_ns)
}

fn report(label: &str, tern_ns: u128, std_ns: u128) {
    println!(
        "{label}: tern {:.1} ms, std {:.1} ms",
        tern_ns as f64 / 1e6,
        std_ns as f64 / 1e6
    );
}

fn main() {
    let (tern_ns, std_ns) = bench_arc();
    report("arc clone/drop", tern_ns, std_ns);

    let (tern_ns, std_ns) = bench_vec();
    report("vec push", tern_ns, std_ns);

    let (tern_ns, std_ns) = bench_map();
    report("map insert/get", tern_ns, std_ns);
}
