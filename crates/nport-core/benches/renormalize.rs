//! Benchmarks for S/Z conversion and renormalization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use num_complex::Complex64;
use nport_core::frequency::{Frequency, FrequencyUnit, SweepType};
use nport_core::synth::random_passive;
use nport_core::WaveDefinition;

fn bench_renormalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("renormalize");

    for nfreq in [10, 100, 1000].iter() {
        for nports in [2, 4, 8].iter() {
            let freq = Frequency::new(1.0, 10.0, *nfreq, FrequencyUnit::GHz, SweepType::Linear).expect("valid grid");
            let network = random_passive(&freq, *nports, 3).expect("valid network");
            let z_new = Array2::from_shape_fn((*nfreq, *nports), |(_, p)| {
                Complex64::new(25.0 + 5.0 * p as f64, 10.0)
            });

            for wave in [WaveDefinition::Pseudo, WaveDefinition::Power] {
                let id = BenchmarkId::new(format!("{:?}_{}ports", wave, nports), nfreq);
                group.bench_with_input(id, nfreq, |b, _| {
                    b.iter(|| black_box(network.renormalized_with(z_new.clone(), wave)))
                });
            }
        }
    }

    group.finish();
}

fn bench_z(c: &mut Criterion) {
    let mut group = c.benchmark_group("s2z");

    for nfreq in [10, 100, 1000].iter() {
        let freq = Frequency::new(1.0, 10.0, *nfreq, FrequencyUnit::GHz, SweepType::Linear).expect("valid grid");
        let network = random_passive(&freq, 4, 5).expect("valid network");
        group.bench_with_input(BenchmarkId::new("4ports", nfreq), nfreq, |b, _| {
            b.iter(|| black_box(network.z()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_renormalize, bench_z);
criterion_main!(benches);
