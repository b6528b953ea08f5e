//! Partition functions of the separable degrees of freedom.
//!
//! Each degree of freedom (translation, rotation, classical or quantum
//! harmonic vibration, electronic level) yields a [`Contribution`]: the
//! natural logarithm of its molecular partition function together with the
//! molar internal energy, entropy and Helmholtz free energy derived from it.
//!
//! # Units
//!
//! - `lnq`: pure number
//! - `u`, `f`: kcal/mol
//! - `s`: cal/(mol·K)
//!
//! All values are molar (intensive). The conversion to extensive quantities,
//! including the N-particle indistinguishability term of the translational
//! part, is done by the kernel.
//!
//! # Formulas
//!
//! ```text
//! ln q_tr    = t/2 ln(2π m kB T / h²) + ln(V / 10^t / (n NA))
//! ln q_rot   = ln(√π/σ) + Σ_i ½ ln(8π² kB T I_i / h²)
//! ln q_vibcl = Σ_i ln(kB T / (h c ν_i))
//! ln q_vibqm = -Σ_i ln(2 sinh x_i),   x_i = h c ν_i / (2 kB T)
//! ln q_elec  = -E / RT
//! ```
//!
//! with F = -RT ln q and S = 1000 (U - F) / T.

use crate::units::{rt_kcal, AVOGADRO, BOLTZMANN, HC_CM, J2KCALMOL, PLANCK};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::Add;

/// Thermodynamic contribution of one (group of) degree(s) of freedom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Natural logarithm of the partition function
    pub lnq: f64,
    /// Internal energy
    pub u: f64,
    /// Entropy
    pub s: f64,
    /// Helmholtz free energy
    pub f: f64,
}

impl Contribution {
    /// Builds a contribution from ln q and the internal energy, deriving the
    /// free energy and the entropy.
    pub fn from_lnq(temperature: f64, lnq: f64, u: f64) -> Self {
        let f = -rt_kcal(temperature) * lnq;
        let s = 1000.0 * (u - f) / temperature;
        Self { lnq, u, s, f }
    }

    /// Multiplies every field by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            lnq: self.lnq * factor,
            u: self.u * factor,
            s: self.s * factor,
            f: self.f * factor,
        }
    }
}

impl Add for Contribution {
    type Output = Contribution;

    fn add(self, other: Contribution) -> Contribution {
        Contribution {
            lnq: self.lnq + other.lnq,
            u: self.u + other.u,
            s: self.s + other.s,
            f: self.f + other.f,
        }
    }
}

/// Ideal-gas translations over `ntr` degrees of freedom.
///
/// `mass` in g/mol, `volume` in L, `nmoles` in mol. The volume is divided by
/// `10^ntr` before entering the partition function; this fixes the reference
/// of the chemical potential and must not be changed.
///
/// With `ntr = 0` the momentum term vanishes but the configurational term
/// `ln(V/(n·N_A))` remains.
pub fn translational(temperature: f64, ntr: u32, mass: f64, volume: f64, nmoles: f64) -> Contribution {
    let t = ntr as f64;
    let momentum = if ntr == 0 {
        0.0
    } else {
        0.5 * t * ((2.0 * PI) * (mass / (AVOGADRO * 1000.0)) * (BOLTZMANN * temperature) / (PLANCK * PLANCK)).ln()
    };
    let lnq = momentum + ((volume / 10f64.powi(ntr as i32)) / (nmoles * AVOGADRO)).ln();
    let u = rt_kcal(temperature) * t * 0.5;
    Contribution::from_lnq(temperature, lnq, u)
}

/// ln q of a single rotational degree of freedom with moment `inertia` in (g/mol)·Å².
fn rotational_lnq_one(temperature: f64, inertia: f64) -> f64 {
    0.5 * ((8.0 * PI * PI) * BOLTZMANN * temperature * (inertia * (1E-23 / AVOGADRO)) / (PLANCK * PLANCK)).ln()
}

/// Rigid-rotor rotations, one degree of freedom per moment of inertia.
///
/// With no rotational degree of freedom every field is exactly zero (the
/// general formula would still carry the symmetry term).
pub fn rotational(temperature: f64, inertia: &[f64], symmetry: u32) -> Contribution {
    if inertia.is_empty() {
        return Contribution::default();
    }
    let lnq = (PI.sqrt() / symmetry as f64).ln()
        + inertia
            .iter()
            .map(|&i| rotational_lnq_one(temperature, i))
            .sum::<f64>();
    let u = rt_kcal(temperature) * inertia.len() as f64 * 0.5;
    Contribution::from_lnq(temperature, lnq, u)
}

/// ln q of one classical harmonic oscillator of frequency `freq` (cm⁻¹).
pub fn classical_mode_lnq(temperature: f64, freq: f64) -> f64 {
    ((BOLTZMANN * temperature) / (HC_CM * freq)).ln()
}

/// Reduced frequency x = h c ν / (2 kB T) of a quantum oscillator.
pub fn reduced_frequency(temperature: f64, freq: f64) -> f64 {
    (HC_CM * freq) / (2.0 * BOLTZMANN * temperature)
}

/// ln q of one quantum harmonic oscillator, -ln(2 sinh x), with the energy
/// zero at the bottom of the well.
pub fn quantum_mode_lnq(temperature: f64, freq: f64) -> f64 {
    let x = reduced_frequency(temperature, freq);
    // ln(2 sinh x) = x + ln(1 - exp(-2x)), finite for large x
    -(x + (-(-2.0 * x).exp()).ln_1p())
}

/// Molar free energy (kcal/mol) of one classical oscillator.
pub fn classical_mode_free_energy(temperature: f64, freq: f64) -> f64 {
    -rt_kcal(temperature) * classical_mode_lnq(temperature, freq)
}

/// Molar free energy (kcal/mol) of one quantum oscillator.
pub fn quantum_mode_free_energy(temperature: f64, freq: f64) -> f64 {
    -rt_kcal(temperature) * quantum_mode_lnq(temperature, freq)
}

/// Classical harmonic vibrations; every mode contributes RT to U.
pub fn vibrational_classical(temperature: f64, freqs: &[f64]) -> Contribution {
    let lnq = freqs.iter().map(|&nu| classical_mode_lnq(temperature, nu)).sum();
    let u = rt_kcal(temperature) * freqs.len() as f64;
    Contribution::from_lnq(temperature, lnq, u)
}

/// Quantum harmonic vibrations.
pub fn vibrational_quantum(temperature: f64, freqs: &[f64]) -> Contribution {
    let lnq = freqs.iter().map(|&nu| quantum_mode_lnq(temperature, nu)).sum();
    let u = rt_kcal(temperature)
        * freqs
            .iter()
            .map(|&nu| {
                let x = reduced_frequency(temperature, nu);
                x / x.tanh()
            })
            .sum::<f64>();
    Contribution::from_lnq(temperature, lnq, u)
}

/// Zero-point vibrational energy in kcal/mol, Σ ½ h c ν_i.
pub fn zero_point_energy(freqs: &[f64]) -> f64 {
    freqs.iter().map(|&nu| 0.5 * J2KCALMOL * HC_CM * nu).sum()
}

/// Single electronic level of molar energy `energy` (kcal/mol); zero entropy.
pub fn electronic(temperature: f64, energy: f64) -> Contribution {
    Contribution {
        lnq: -energy / rt_kcal(temperature),
        u: energy,
        s: 0.0,
        f: energy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translational_water_reference() {
        let tr = translational(300.0, 3, 18.015, 1.0, 1.0);
        let expected = 11.727946820470791;
        assert!(((tr.lnq - expected) / expected).abs() < 1e-6, "lnq = {}", tr.lnq);
        assert!((tr.u - 0.8942418655499589).abs() < 1e-9);
        assert!((tr.f - (-6.991747362539006)).abs() < 1e-6);
        assert!((tr.s - 26.28663076029655).abs() < 1e-6);
    }

    #[test]
    fn test_no_translations_keeps_configurational_term() {
        let tr = translational(300.0, 0, 18.0, 1.0, 1.0);
        assert!((tr.lnq - (-54.75490003095224)).abs() < 1e-9, "lnq = {}", tr.lnq);
        assert_eq!(tr.u, 0.0);
        assert!((tr.f - (-rt_kcal(300.0) * tr.lnq)).abs() < 1e-12);
        // the mass does not enter without translations
        assert_eq!(translational(300.0, 0, 0.0, 1.0, 1.0), tr);
    }

    #[test]
    fn test_no_rotations_is_exactly_zero() {
        let rot = rotational(300.0, &[], 2);
        assert_eq!(rot.lnq, 0.0);
        assert_eq!(rot.u, 0.0);
        assert_eq!(rot.s, 0.0);
        assert_eq!(rot.f, 0.0);
    }

    #[test]
    fn test_rotational_symmetry_number() {
        let inertia = [0.6148, 1.1546, 1.7694];
        let r1 = rotational(298.15, &inertia, 1);
        let r2 = rotational(298.15, &inertia, 2);
        assert!((r1.lnq - r2.lnq - 2f64.ln()).abs() < 1e-12);
        assert!((r1.u - r2.u).abs() < 1e-15);
        assert!(r1.s > r2.s);
    }

    #[test]
    fn test_single_mode_closed_forms() {
        let x = reduced_frequency(300.0, 1000.0);
        let expected_x = PLANCK * LIGHTSPEED_CM * 1000.0 / (2.0 * BOLTZMANN * 300.0);
        assert!((x - expected_x).abs() < 1e-12);
        assert!((x - 2.3979615999730255).abs() < 1e-9);

        let zpe = zero_point_energy(&[1000.0]);
        assert!((zpe - 1.4295717697846952).abs() < 1e-9);

        let qm = vibrational_quantum(300.0, &[1000.0]);
        assert!((qm.lnq + (2.0 * x.sinh()).ln()).abs() < 1e-12);
    }

    const LIGHTSPEED_CM: f64 = crate::units::LIGHTSPEED * 100.0;

    #[test]
    fn test_zpe_is_temperature_independent() {
        let freqs = [150.0, 800.0, 1650.0, 3100.0];
        let zpe = zero_point_energy(&freqs);
        let manual: f64 = freqs.iter().map(|nu| 0.5 * J2KCALMOL * HC_CM * nu).sum();
        assert!((zpe - manual).abs() < 1e-12);
        // quantum U tends to the ZPE at low temperature
        let cold = vibrational_quantum(1.0, &freqs);
        assert!((cold.u - zpe).abs() < 1e-9);
    }

    #[test]
    fn test_classical_limit_at_high_temperature() {
        let freqs = [100.0, 450.0, 1000.0];
        let t = 1.0e6;
        let cl = vibrational_classical(t, &freqs);
        let qm = vibrational_quantum(t, &freqs);
        assert!((cl.s - qm.s).abs() < 1e-4, "cl {} qm {}", cl.s, qm.s);
        assert!(((cl.u - qm.u) / cl.u).abs() < 1e-6);
    }

    #[test]
    fn test_quantum_mode_is_finite_for_stiff_modes() {
        let lnq = quantum_mode_lnq(10.0, 4000.0);
        assert!(lnq.is_finite());
        assert!((lnq + reduced_frequency(10.0, 4000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_electronic_level() {
        let e = electronic(300.0, -10.0);
        assert_eq!(e.u, -10.0);
        assert_eq!(e.f, -10.0);
        assert_eq!(e.s, 0.0);
        // F = -RT ln q must give back the energy
        assert!((-rt_kcal(300.0) * e.lnq - e.f).abs() < 1e-12);
    }

    #[test]
    fn test_contribution_sum_and_scale() {
        let a = Contribution { lnq: 1.0, u: 2.0, s: 3.0, f: 4.0 };
        let b = a.scaled(2.0);
        let c = a + b;
        assert_eq!(c, Contribution { lnq: 3.0, u: 6.0, s: 9.0, f: 12.0 });
    }
}
