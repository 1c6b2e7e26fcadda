//! ```bash
//! RUSTFLAGS="-C target-cpu=native" cargo run --example xbarrier-loadtest --release
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;
use xbarrier::{oracle, PrequeryState, Point, Segment};

/// Number of barriers preloaded for the run.
const N_BARRIERS: usize = 10_000;
/// Number of queries issued against the loaded set.
const N_QUERIES: usize = 2_000;
/// Deterministic seed for reproducibility.
const SEED: u64 = 42;
/// Coordinates are drawn from `[-BOUND, BOUND]`, inside `MAX_COORD_MAGNITUDE`.
const BOUND: i32 = 16_000;

fn random_segment(rng: &mut StdRng) -> Segment {
    let coord = |rng: &mut StdRng| rng.gen_range(-BOUND..=BOUND) as i16;
    Segment::new(Point::new(coord(rng), coord(rng)), Point::new(coord(rng), coord(rng)))
}

fn random_segments(n: usize, seed: u64) -> Vec<Segment> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| random_segment(&mut rng)).collect()
}

fn divider() {
    println!("{}", "─".repeat(60));
}

fn main() {
    #[cfg(feature = "diagnostics")]
    xbarrier::diagnostics::init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              xbarrier Load Test & Agreement Check           ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    // ── Phase 1: Barrier generation ──────────────────────────────────────
    divider();
    println!("Phase 1 — Generating random barrier segments");
    println!("  Barriers: {N_BARRIERS}");
    println!("  Coordinate range: [-{BOUND}, {BOUND}]");

    let t0 = Instant::now();
    let barriers = random_segments(N_BARRIERS, SEED);
    println!("  Generated in {:?}", t0.elapsed());

    // ── Phase 2: Load ─────────────────────────────────────────────────────
    divider();
    println!("Phase 2 — Building the prequery chunk buffer");

    let t0 = Instant::now();
    let state = PrequeryState::build(&barriers).expect("barriers within coordinate range");
    let load_duration = t0.elapsed();
    println!("  Built {} chunks in {load_duration:?}", state.num_chunks());
    println!(
        "  Throughput: {:.0} barriers/sec",
        N_BARRIERS as f64 / load_duration.as_secs_f64()
    );

    // ── Phase 3: Dispatched queries ───────────────────────────────────────
    divider();
    println!("Phase 3 — Running {N_QUERIES} queries (dispatched kernel)");

    let queries = random_segments(N_QUERIES, SEED + 1);
    let mut dispatched = vec![0u8; N_QUERIES];

    let t0 = Instant::now();
    xbarrier::query_batch(&state, &queries, &mut dispatched).expect("queries within range");
    let query_duration = t0.elapsed();

    let hits = dispatched.iter().filter(|&&b| b == 1).count();
    println!("  Completed in {query_duration:?}");
    println!(
        "  Average per query: {:.2} µs",
        query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!("  Intersecting queries: {hits}/{N_QUERIES}");

    // ── Phase 4: Parallel queries ─────────────────────────────────────────
    divider();
    println!("Phase 4 — Running the same queries through the parallel driver");

    let mut parallel = vec![0u8; N_QUERIES];
    let t0 = Instant::now();
    xbarrier::query_batch_parallel(&state, &queries, &mut parallel).expect("queries within range");
    let parallel_duration = t0.elapsed();
    println!("  Completed in {parallel_duration:?}");
    println!(
        "  Throughput: {:.0} queries/sec",
        N_QUERIES as f64 / parallel_duration.as_secs_f64()
    );

    // ── Phase 5: Oracle agreement ─────────────────────────────────────────
    divider();
    println!("Phase 5 — Verifying agreement against the non-SIMD oracle");

    let mut oracle_out = vec![0u8; N_QUERIES];
    let t0 = Instant::now();
    oracle::scalar_batch(&barriers, &queries, &mut oracle_out).expect("queries within range");
    let oracle_duration = t0.elapsed();

    let mismatches: Vec<usize> = (0..N_QUERIES)
        .filter(|&i| dispatched[i] != oracle_out[i] || parallel[i] != oracle_out[i])
        .collect();

    println!("  Oracle completed in {oracle_duration:?}");
    println!("  Mismatches: {}/{N_QUERIES}", mismatches.len());
    if !mismatches.is_empty() {
        let sample: Vec<usize> = mismatches.iter().take(5).copied().collect();
        eprintln!("  First mismatching query indices: {sample:?}");
    }

    // ── Phase 6: Summary ──────────────────────────────────────────────────
    divider();
    if mismatches.is_empty() {
        println!("✅ Kernel/oracle agreement: PASSED");
    } else {
        println!("❌ Kernel/oracle agreement: FAILED ({} mismatches)", mismatches.len());
    }

    println!();
    println!("Performance Summary");
    println!("──────────────────────────────────────────────────");
    println!(
        "  Load throughput:        {:.0} barriers/s",
        N_BARRIERS as f64 / load_duration.as_secs_f64()
    );
    println!(
        "  Query latency (avg):    {:.2} µs/query ({N_BARRIERS} barriers)",
        query_duration.as_micros() as f64 / N_QUERIES as f64
    );
    println!(
        "  Parallel throughput:    {:.0} queries/s",
        N_QUERIES as f64 / parallel_duration.as_secs_f64()
    );
    println!("──────────────────────────────────────────────────");
}
