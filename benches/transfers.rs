//! Benchmark suite for core ledger operations
//!
//! This benchmark measures transfer batches against an in-memory
//! database, with and without tax withholding, using the divan
//! benchmarking framework. In-memory stores keep the numbers about
//! ledger logic rather than disk throughput.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```

use economy_ledger::Ledger;

fn main() {
    divan::main();
}

/// Opens a fresh in-memory ledger funded for `count` transfers of 10.
fn funded_ledger(count: i64, tax_rate: f32) -> Ledger {
    let ledger = Ledger::open_in_memory(0, tax_rate).expect("Failed to open ledger");
    ledger.add("alice", count * 10).expect("Funding failed");
    ledger
}

fn run_transfers(count: i64, tax_rate: f32) {
    let ledger = funded_ledger(count, tax_rate);
    for _ in 0..count {
        ledger
            .transfer("alice", "bob", 10, "money pay")
            .expect("Transfer failed");
    }
}

/// Benchmark a small batch of untaxed peer transfers (100 transfers)
#[divan::bench]
fn untaxed_transfers_small() {
    run_transfers(100, 0.0);
}

/// Benchmark a small batch of taxed peer transfers (100 transfers)
#[divan::bench]
fn taxed_transfers_small() {
    run_transfers(100, 0.10);
}

/// Benchmark a large batch of untaxed peer transfers (10,000 transfers)
#[divan::bench]
fn untaxed_transfers_large() {
    run_transfers(10_000, 0.0);
}

/// Benchmark a large batch of taxed peer transfers (10,000 transfers)
#[divan::bench]
fn taxed_transfers_large() {
    run_transfers(10_000, 0.10);
}

/// Benchmark repeated balance reads against one account (1,000 reads)
#[divan::bench]
fn balance_reads() {
    let ledger = Ledger::open_in_memory(100, 0.0).expect("Failed to open ledger");
    for _ in 0..1_000 {
        ledger.balance("alice").expect("Balance read failed");
    }
}

/// Benchmark a history window scan over a populated log (500 transfers)
#[divan::bench]
fn history_window_scan() {
    let ledger = funded_ledger(500, 0.0);
    for _ in 0..500 {
        ledger
            .transfer("alice", "bob", 10, "money pay")
            .expect("Transfer failed");
    }
    ledger.history("alice", 86_400).expect("History scan failed");
}
