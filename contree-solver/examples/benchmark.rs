use contree_core::{deal_from_seed, GameState, Suit, Trick};
use contree_solver::{solve_batch, BatchConfig, Solver, SolverConfig};
use std::time::Instant;

fn main() {
    let config = SolverConfig::default();

    // Benchmark a single full-deal solve
    println!("Benchmarking single solve...");
    let hands = deal_from_seed(42);
    let mut solver = Solver::new(config);
    let start = Instant::now();
    let state = GameState::new(hands, Suit::Hearts, 0);
    let score = solver.solve(&state).unwrap();
    let elapsed = start.elapsed();
    println!("Single solve: {:?} (score {})", elapsed, score);
    println!("Nodes: {}", solver.node_count());

    // Benchmark all four suits on one deal
    println!("\nBenchmarking solve_all_suits (4 solves)...");
    let start = Instant::now();
    let scores = solver
        .solve_all_suits(hands, 0, Trick::new(), 0, 0, 0)
        .unwrap();
    let elapsed = start.elapsed();
    println!("solve_all_suits: {:?} -> {:?}", elapsed, scores);
    println!("Per solve: {:?}", elapsed / 4);

    // Benchmark a batch of deals across all cores
    const DEALS: u64 = 100;
    println!("\nBenchmarking batch of {} deals (400 solves)...", DEALS);
    let deals: Vec<_> = (0..DEALS).map(deal_from_seed).collect();
    let start = Instant::now();
    let results = solve_batch(&deals, 0, &BatchConfig::default()).unwrap();
    let elapsed = start.elapsed();
    println!("Batch: {:?} ({} rows)", elapsed, results.len());
    println!("Per deal: {:?}", elapsed / DEALS as u32);
    println!(
        "Deals per second: {:.2}",
        DEALS as f64 / elapsed.as_secs_f64()
    );
}
