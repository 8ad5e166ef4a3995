//! Benchmarks for n-port reconstruction
//!
//! Full pipeline: simulate C(n, 2) sub-measurements, renormalize and stitch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nport_core::frequency::{Frequency, FrequencyUnit, SweepType};
use nport_core::load::Load;
use nport_core::math::conversions::dbdeg_2_reim;
use nport_core::multiport::{reconstruct, simulate_measurements};
use nport_core::synth::random_passive;
use nport_core::{Network, ReconstructionOptions};

fn loads(freq: &Frequency, nports: usize) -> Vec<Network> {
    (0..nports)
        .map(|i| {
            Load::uniform_gamma(freq, dbdeg_2_reim(-10.0, 45.0 * i as f64), 50.0)
                .expect("valid load")
        })
        .collect()
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_measurements");

    for nfreq in [10, 100, 500].iter() {
        for nports in [3, 4, 8].iter() {
            let freq = Frequency::new(1.0, 10.0, *nfreq, FrequencyUnit::GHz, SweepType::Linear).expect("valid grid");
            let dut = random_passive(&freq, *nports, 1).expect("valid network");
            let loads = loads(&freq, *nports);
            let id = BenchmarkId::new(format!("{}ports", nports), nfreq);

            group.bench_with_input(id, nfreq, |b, _| {
                b.iter(|| black_box(simulate_measurements(&dut, &loads, None, 0)))
            });
        }
    }

    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");

    for nfreq in [10, 100, 500].iter() {
        for nports in [3, 4, 8].iter() {
            let freq = Frequency::new(1.0, 10.0, *nfreq, FrequencyUnit::GHz, SweepType::Linear).expect("valid grid");
            let dut = random_passive(&freq, *nports, 1).expect("valid network");
            let loads = loads(&freq, *nports);
            let meas = simulate_measurements(&dut, &loads, None, 0).expect("measurements");

            for (label, options) in [
                ("tippet", ReconstructionOptions::default()),
                ("raw", ReconstructionOptions::raw()),
            ] {
                let id = BenchmarkId::new(format!("{}_{}ports", label, nports), nfreq);
                group.bench_with_input(id, nfreq, |b, _| {
                    b.iter(|| black_box(reconstruct(&meas, &loads, options.clone())))
                });
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_simulate, bench_reconstruct);
criterion_main!(benches);
