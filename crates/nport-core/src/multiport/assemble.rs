//! Composite assembly
//!
//! The assembler owns an all-zero n-port at the system impedance. Each 2-port
//! sub-measurement is (optionally) renormalized to the impedances of the loads
//! that sat on its two ports while they were not being measured, then its
//! 2x2 block is stitched into the composite. Once every pair has been stitched
//! the composite is renormalized back to the system impedance.

use std::collections::BTreeMap;

use ndarray::{s, Array2, Array3, Axis};
use num_complex::Complex64;
use tracing::{debug, trace, warn};

use super::measure::simulate_measurements;
use super::pairs::{port_pairs, PortPair};
use crate::constants::{DIAGONAL_SPREAD_WARN, Z0_SYSTEM};
use crate::error::{NetworkError, Result};
use crate::frequency::Frequency;
use crate::load::{fully_reflective, load_impedance};
use crate::math::transforms::WaveDefinition;
use crate::network::{Network, PolarNoise, ReferenceImpedance};

/// Reconstruction settings
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionOptions {
    /// Reference impedance of the reconstructed network
    pub z_system: Complex64,
    /// Wave definition for every renormalization
    ///
    /// `Power` needs Re(z) != 0 on every reference, so it rejects purely
    /// reactive loads (|Γ| = 1 away from short and open) with `SingularMatrix`.
    /// `Pseudo` accepts them.
    pub wave: WaveDefinition,
    /// Renormalize sub-measurements to their load impedances (Tippet).
    /// When false the 2-ports are stitched as measured.
    pub renormalize: bool,
    /// Noise applied to simulated measurements
    pub noise: Option<PolarNoise>,
    /// Seed for the noise generator
    pub seed: u64,
}

impl Default for ReconstructionOptions {
    fn default() -> Self {
        Self {
            z_system: Complex64::new(Z0_SYSTEM, 0.0),
            wave: WaveDefinition::Pseudo,
            renormalize: true,
            noise: None,
            seed: 0,
        }
    }
}

impl ReconstructionOptions {
    /// Stitch raw sub-measurements (matched-termination assumption)
    pub fn raw() -> Self {
        Self {
            renormalize: false,
            ..Self::default()
        }
    }

    pub fn with_z_system(mut self, z_system: impl Into<Complex64>) -> Self {
        self.z_system = z_system.into();
        self
    }

    pub fn with_wave(mut self, wave: WaveDefinition) -> Self {
        self.wave = wave;
        self
    }

    pub fn with_renormalize(mut self, renormalize: bool) -> Self {
        self.renormalize = renormalize;
        self
    }

    pub fn with_noise(mut self, noise: PolarNoise, seed: u64) -> Self {
        self.noise = Some(noise);
        self.seed = seed;
        self
    }
}

/// Result of a reconstruction
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Reconstructed n-port at the system impedance
    pub network: Network,
    /// Sub-measurements as supplied
    pub measurements: BTreeMap<PortPair, Network>,
    /// Sub-measurements as stitched (renormalized unless raw)
    pub sub_networks: BTreeMap<PortPair, Network>,
}

impl Reconstruction {
    /// Per port, the largest deviation of S_ii between any two stitched
    /// sub-networks containing that port, over all frequencies
    ///
    /// Near zero when the sub-measurements are mutually consistent.
    pub fn diagonal_spread(&self) -> Vec<f64> {
        diagonal_spread(&self.sub_networks, self.network.nports())
    }
}

fn diagonal_spread(subs: &BTreeMap<PortPair, Network>, nports: usize) -> Vec<f64> {
    (0..nports)
        .map(|port| {
            let diag: Vec<_> = subs
                .iter()
                .filter(|(pair, _)| pair.contains(port))
                .map(|(pair, sub)| {
                    let idx = if pair.a == port { 0 } else { 1 };
                    sub.s.slice(s![.., idx, idx]).to_owned()
                })
                .collect();
            let mut spread = 0.0_f64;
            for (i, x) in diag.iter().enumerate() {
                for y in &diag[i + 1..] {
                    for (u, v) in x.iter().zip(y.iter()) {
                        spread = spread.max((u - v).norm());
                    }
                }
            }
            spread
        })
        .collect()
}

/// Stitches 2-port sub-measurements into an n-port
#[derive(Debug)]
pub struct CompositeAssembler {
    composite: Network,
    /// Load impedances [nfreq, nports]; absent in raw mode
    load_z: Option<Array2<Complex64>>,
    options: ReconstructionOptions,
    measurements: BTreeMap<PortPair, Network>,
    sub_networks: BTreeMap<PortPair, Network>,
}

impl CompositeAssembler {
    /// Prepare a composite with one port per load
    ///
    /// Fails with `SingularMatrix` if two or more loads reflect fully at the
    /// same frequency, and with `InvalidImpedance` if a load has no finite
    /// non-zero impedance (Tippet mode only).
    pub fn new(
        frequency: &Frequency,
        loads: &[Network],
        options: ReconstructionOptions,
    ) -> Result<Self> {
        let nports = loads.len();
        let nfreq = frequency.npoints();
        super::check_load_set(loads, nfreq)?;

        let reflective = loads
            .iter()
            .map(fully_reflective)
            .collect::<Result<Vec<_>>>()?;
        for f in 0..nfreq {
            let count = reflective.iter().filter(|r| r[f]).count();
            if count > 1 {
                debug!(freq_index = f, count, "more than one fully reflective load");
                return Err(NetworkError::SingularMatrix {
                    operation: "reconstruct",
                    freq_index: Some(f),
                });
            }
        }

        let load_z = if options.renormalize {
            let mut z = Array2::<Complex64>::zeros((nfreq, nports));
            for (port, load) in loads.iter().enumerate() {
                let zl = load_impedance(load).map_err(|e| match e {
                    NetworkError::InvalidImpedance {
                        freq_index, value, ..
                    } => NetworkError::InvalidImpedance {
                        freq_index,
                        port,
                        value,
                    },
                    other => other,
                })?;
                z.column_mut(port).assign(&zl);
            }
            Some(z)
        } else {
            None
        };

        Self::init(frequency, nports, load_z, options)
    }

    fn init(
        frequency: &Frequency,
        nports: usize,
        load_z: Option<Array2<Complex64>>,
        options: ReconstructionOptions,
    ) -> Result<Self> {
        if nports < 2 {
            return Err(NetworkError::shape(
                "at least 2 ports",
                format!("{} ports", nports),
            ));
        }
        let nfreq = frequency.npoints();
        let composite = Network::new(
            frequency.clone(),
            Array3::zeros((nfreq, nports, nports)),
            Array2::from_elem((nfreq, nports), options.z_system),
        )?;
        debug!(
            nports,
            nfreq,
            renormalize = options.renormalize,
            "composite initialized"
        );
        Ok(Self {
            composite,
            load_z,
            options,
            measurements: BTreeMap::new(),
            sub_networks: BTreeMap::new(),
        })
    }

    pub fn nports(&self) -> usize {
        self.composite.nports()
    }

    /// Pairs not yet stitched
    pub fn missing(&self) -> Vec<PortPair> {
        port_pairs(self.nports())
            .into_iter()
            .filter(|p| !self.sub_networks.contains_key(p))
            .collect()
    }

    /// Renormalize a sub-measurement on `pair` to the impedances of its loads
    ///
    /// The target is the reference in which each load is reflection-free: the
    /// load impedance for pseudo-waves, its conjugate for power waves.
    pub fn renormalize_measurement(&self, pair: PortPair, meas: &Network) -> Result<Network> {
        let Some(load_z) = &self.load_z else {
            return Ok(meas.clone());
        };
        let mut z_pair = load_z.select(Axis(1), &pair.as_array());
        if self.options.wave == WaveDefinition::Power {
            z_pair.mapv_inplace(|z| z.conj());
        }
        meas.renormalized_with(ReferenceImpedance::PerFrequency(z_pair), self.options.wave)
    }

    /// Renormalize `meas` and write its 2x2 block into the composite
    pub fn stitch(&mut self, pair: PortPair, meas: &Network) -> Result<()> {
        let nports = self.nports();
        if pair.b >= nports {
            return Err(NetworkError::PortIndexOutOfRange {
                port: pair.b,
                nports,
            });
        }
        if meas.nports() != 2 {
            return Err(NetworkError::shape(
                format!("2-port measurement for {}", pair),
                format!("{}-port network", meas.nports()),
            ));
        }
        self.composite.check_same_nfreq(meas)?;
        if self.sub_networks.contains_key(&pair) {
            return Err(NetworkError::DuplicateMeasurement(pair));
        }

        let sub = self.renormalize_measurement(pair, meas)?;
        trace!(%pair, "stitching sub-network");

        let ports = pair.as_array();
        for (i, &pi) in ports.iter().enumerate() {
            for (j, &pj) in ports.iter().enumerate() {
                self.composite
                    .s
                    .slice_mut(s![.., pi, pj])
                    .assign(&sub.s.slice(s![.., i, j]));
            }
            self.composite.z0.column_mut(pi).assign(&sub.z0.column(i));
        }

        self.measurements.insert(pair, meas.clone());
        self.sub_networks.insert(pair, sub);
        Ok(())
    }

    fn check_complete(&self) -> Result<()> {
        match self.missing().first() {
            Some(&pair) => Err(NetworkError::MissingMeasurement(pair)),
            None => Ok(()),
        }
    }

    /// Renormalize the complete composite to the system impedance
    pub fn finalize(self) -> Result<Reconstruction> {
        self.check_complete()?;
        let Self {
            composite,
            options,
            measurements,
            sub_networks,
            ..
        } = self;
        debug!("renormalizing composite to system impedance");
        let network = composite
            .renormalized_with(ReferenceImpedance::Uniform(options.z_system), options.wave)?
            .named("reconstruction");

        let result = Reconstruction {
            network,
            measurements,
            sub_networks,
        };
        let spread = result.diagonal_spread();
        let worst = spread.iter().copied().fold(0.0_f64, f64::max);
        if worst > DIAGONAL_SPREAD_WARN {
            warn!(
                spread = worst,
                renormalize = options.renormalize,
                "sub-measurements disagree on reflection coefficients"
            );
        }
        debug!(nports = result.network.nports(), "reconstruction done");
        Ok(result)
    }
}

/// Assemble an n-port from all C(n, 2) sub-measurements and the n loads used
///
/// At most one load may be fully reflective at any frequency. With
/// renormalization enabled that load must still have a finite non-zero
/// impedance: an ideal short or open fails with `InvalidImpedance` naming its
/// port. Raw mode
/// ([`ReconstructionOptions::raw`]) never uses load impedances and accepts them.
pub fn reconstruct(
    measurements: &BTreeMap<PortPair, Network>,
    loads: &[Network],
    options: ReconstructionOptions,
) -> Result<Reconstruction> {
    let frequency = match loads.first() {
        Some(load) => load.frequency.clone(),
        None => {
            return Err(NetworkError::shape("at least 2 loads", "0 loads"));
        }
    };
    let mut assembler = CompositeAssembler::new(&frequency, loads, options)?;
    for (&pair, meas) in measurements {
        assembler.stitch(pair, meas)?;
    }
    assembler.finalize()
}

/// Simulate the sub-measurements of `dut` and reconstruct it
///
/// Noise from `options.noise` is applied to the simulated measurements.
pub fn reconstruct_from_dut(
    dut: &Network,
    loads: &[Network],
    options: ReconstructionOptions,
) -> Result<Reconstruction> {
    let measurements = simulate_measurements(dut, loads, options.noise.as_ref(), options.seed)?;
    reconstruct(&measurements, loads, options)
}

/// Merge 2-ports measured with matched terminations into an n-port
///
/// No renormalization is applied; the result keeps the reference impedances
/// of the supplied 2-ports (the last one stitched wins for each port).
pub fn merge_two_ports(subnets: &BTreeMap<PortPair, Network>, nports: usize) -> Result<Network> {
    let frequency = match subnets.values().next() {
        Some(sub) => sub.frequency.clone(),
        None => return Err(NetworkError::MissingMeasurement(PortPair { a: 0, b: 1 })),
    };
    let mut assembler =
        CompositeAssembler::init(&frequency, nports, None, ReconstructionOptions::raw())?;
    for (&pair, sub) in subnets {
        assembler.stitch(pair, sub)?;
    }
    assembler.check_complete()?;
    Ok(assembler.composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{FrequencyUnit, SweepType};
    use crate::load::Load;
    use crate::synth::random_passive;

    fn freq() -> Frequency {
        Frequency::new(1.0, 2.0, 4, FrequencyUnit::GHz, SweepType::Linear).unwrap()
    }

    fn loads(gammas: &[Complex64]) -> Vec<Network> {
        gammas
            .iter()
            .map(|&g| Load::uniform_gamma(&freq(), g, 50.0).unwrap())
            .collect()
    }

    #[test]
    fn test_missing_and_duplicate_pairs() {
        let ls = loads(&[Complex64::new(0.0, 0.0); 3]);
        let dut = random_passive(&freq(), 3, 1).unwrap();
        let mut meas = simulate_measurements(&dut, &ls, None, 0).unwrap();
        let pair = PortPair::new(1, 2).unwrap();
        let removed = meas.remove(&pair).unwrap();

        let err = reconstruct(&meas, &ls, ReconstructionOptions::default()).unwrap_err();
        assert_eq!(err, NetworkError::MissingMeasurement(pair));

        let mut asm = CompositeAssembler::new(&freq(), &ls, ReconstructionOptions::default()).unwrap();
        asm.stitch(pair, &removed).unwrap();
        assert_eq!(
            asm.stitch(pair, &removed).unwrap_err(),
            NetworkError::DuplicateMeasurement(pair)
        );
        assert_eq!(asm.missing().len(), 2);
    }

    #[test]
    fn test_two_fully_reflective_loads_rejected() {
        let ls = loads(&[
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.1, 0.0),
        ]);
        let err = CompositeAssembler::new(&freq(), &ls, ReconstructionOptions::default()).unwrap_err();
        assert_eq!(
            err,
            NetworkError::SingularMatrix {
                operation: "reconstruct",
                freq_index: Some(0)
            }
        );
    }

    #[test]
    fn test_short_load_invalid_impedance_names_port() {
        let ls = loads(&[
            Complex64::new(0.0, 0.0),
            Complex64::new(-1.0, 0.0),
            Complex64::new(0.0, 0.0),
        ]);
        assert!(matches!(
            CompositeAssembler::new(&freq(), &ls, ReconstructionOptions::default()),
            Err(NetworkError::InvalidImpedance { port: 1, .. })
        ));
        // Raw mode never needs load impedances
        assert!(CompositeAssembler::new(&freq(), &ls, ReconstructionOptions::raw()).is_ok());
    }

    #[test]
    fn test_stitch_rejects_wrong_shape() {
        let ls = loads(&[Complex64::new(0.0, 0.0); 3]);
        let mut asm = CompositeAssembler::new(&freq(), &ls, ReconstructionOptions::default()).unwrap();
        let three = random_passive(&freq(), 3, 2).unwrap();
        assert!(matches!(
            asm.stitch(PortPair::new(0, 1).unwrap(), &three),
            Err(NetworkError::ShapeMismatch { .. })
        ));
        let two = three.subnetwork(&[0, 1]).unwrap();
        assert!(matches!(
            asm.stitch(PortPair::new(1, 3).unwrap(), &two),
            Err(NetworkError::PortIndexOutOfRange { port: 3, nports: 3 })
        ));
    }

    #[test]
    fn test_merge_two_ports_matched() {
        let dut = random_passive(&freq(), 4, 21).unwrap();
        let ls = loads(&[Complex64::new(0.0, 0.0); 4]);
        let meas = simulate_measurements(&dut, &ls, None, 0).unwrap();
        let merged = merge_two_ports(&meas, 4).unwrap();
        assert!(merged.max_abs_error(&dut).unwrap() < 1e-12);
    }

    #[test]
    fn test_options_builder() {
        let opts = ReconstructionOptions::default()
            .with_z_system(75.0)
            .with_wave(WaveDefinition::Power)
            .with_renormalize(false)
            .with_noise(PolarNoise::new(0.01, 1.0), 3);
        assert_eq!(opts.z_system, Complex64::new(75.0, 0.0));
        assert_eq!(opts.wave, WaveDefinition::Power);
        assert!(!opts.renormalize);
        assert_eq!(opts.seed, 3);
        assert!(!ReconstructionOptions::raw().renormalize);
    }
}
