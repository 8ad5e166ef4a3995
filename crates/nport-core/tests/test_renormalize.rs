//! Renormalization tests
//!
//! Reference impedance changes must preserve the impedance matrix.

use approx::assert_relative_eq;
use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;
use nport_core::frequency::{Frequency, FrequencyUnit, SweepType};
use nport_core::math::transforms::{s2z, z2s};
use nport_core::synth::random_passive;
use nport_core::{Network, NetworkError, ReferenceImpedance, WaveDefinition};

fn freq() -> Frequency {
    Frequency::new(0.5, 5.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap()
}

fn assert_close(a: &Array3<Complex64>, b: &Array3<Complex64>, rel: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!(
            (x - y).norm() <= rel * x.norm().max(1.0),
            "{} vs {}",
            x,
            y
        );
    }
}

fn complex_z0(nfreq: usize, nports: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((nfreq, nports), |(f, p)| {
        Complex64::new(20.0 + 10.0 * p as f64 + f as f64, 5.0 * p as f64 - 2.0)
    })
}

#[test]
fn test_roundtrip_through_intermediate_reference() {
    let net = random_passive(&freq(), 3, 1).unwrap();
    let z_a = complex_z0(10, 3);
    let z_b = ReferenceImpedance::PerPort(Array1::from_vec(vec![
        Complex64::new(75.0, 0.0),
        Complex64::new(30.0, 15.0),
        Complex64::new(100.0, -20.0),
    ]));

    let via_a = net.renormalized(z_a).unwrap().renormalized(z_b.clone()).unwrap();
    let direct = net.renormalized(z_b).unwrap();
    assert_close(via_a.s(), direct.s(), 1e-9);
    assert_eq!(via_a.z0(), direct.z0());
}

#[test]
fn test_identity_renormalization() {
    let net = random_passive(&freq(), 4, 2).unwrap();
    let same = net.renormalized(net.z0().clone()).unwrap();
    assert_close(same.s(), net.s(), 1e-12);
}

#[test]
fn test_z_matrix_invariant() {
    let net = random_passive(&freq(), 3, 3).unwrap();
    let z_before = net.z().unwrap();
    let renorm = net.renormalized(complex_z0(10, 3)).unwrap();
    assert_close(&renorm.z().unwrap(), &z_before, 1e-9);
}

#[test]
fn test_reactive_reference_pseudo_waves() {
    let net = random_passive(&freq(), 2, 4).unwrap();
    let reactive = ReferenceImpedance::PerPort(Array1::from_vec(vec![
        Complex64::new(0.0, 40.0),
        Complex64::new(50.0, 0.0),
    ]));
    let renorm = net.renormalized(reactive).unwrap();
    let back = renorm.renormalized(50.0).unwrap();
    assert_close(back.s(), net.s(), 1e-9);

    assert!(matches!(
        net.renormalized_with(Complex64::new(0.0, 40.0), WaveDefinition::Power),
        Err(NetworkError::SingularMatrix { .. })
    ));
}

#[test]
fn test_power_waves_roundtrip() {
    let net = random_passive(&freq(), 3, 5).unwrap();
    let z = complex_z0(10, 3);
    let there = net.renormalized_with(z, WaveDefinition::Power).unwrap();
    let back = there.renormalized_with(50.0, WaveDefinition::Power).unwrap();
    assert_close(back.s(), net.s(), 1e-9);
}

#[test]
fn test_one_port_resistor() {
    // 100 ohm resistor: Γ = 1/3 at 50 ohm, 0 at 100 ohm
    let z = Array3::from_elem((1, 1, 1), Complex64::new(100.0, 0.0));
    let f = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear).unwrap();
    let net = Network::from_z(f, &z, Array2::from_elem((1, 1), Complex64::new(50.0, 0.0))).unwrap();
    assert_relative_eq!(net.s()[[0, 0, 0]].re, 1.0 / 3.0, epsilon = 1e-12);

    let matched = net.renormalized(100.0).unwrap();
    assert!(matched.s()[[0, 0, 0]].norm() < 1e-12);
}

#[test]
fn test_batch_transforms_roundtrip() {
    let net = random_passive(&freq(), 3, 6).unwrap();
    let z0 = complex_z0(10, 3);
    for wave in [WaveDefinition::Pseudo, WaveDefinition::Power] {
        let z = s2z(net.s(), &z0, wave).unwrap();
        let s = z2s(&z, &z0, wave).unwrap();
        assert_close(&s, net.s(), 1e-9);
    }
}

#[test]
fn test_shape_mismatch() {
    let net = random_passive(&freq(), 3, 7).unwrap();
    assert!(matches!(
        net.renormalized(Array1::from_elem(2, Complex64::new(50.0, 0.0))),
        Err(NetworkError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_invalid_impedance_reports_frequency() {
    let net = random_passive(&freq(), 2, 8).unwrap();
    let mut z = Array2::from_elem((10, 2), Complex64::new(50.0, 0.0));
    z[[4, 1]] = Complex64::new(f64::NAN, 0.0);
    assert!(matches!(
        net.renormalized(z),
        Err(NetworkError::InvalidImpedance {
            freq_index: Some(4),
            port: 1,
            ..
        })
    ));
}
