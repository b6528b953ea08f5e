//! Spectral post-processing of the vibrational modes.
//!
//! The kernel deposits the free energy of every vibrational mode twice: once
//! per mode, in input order, and once on a frequency grid of bin width `dnu`
//! spanning 0 to 4000 cm⁻¹. Running sums over either index give the
//! cumulative vibrational free energy as a function of mode number or of
//! frequency.
//!
//! The vibrational density of states (VDOS) is a smoothed histogram of the
//! modes on the same grid, normalised to the number of modes.

use crate::partition::{classical_mode_free_energy, quantum_mode_free_energy};
use crate::system::{bin_index, grid_size};
use crate::units::{rt_kcal, BOLTZMANN, HC_CM};
use serde::{Deserialize, Serialize};

/// Half width of the VDOS moving-average window.
pub const VDOS_SMOOTHING_PERIOD: usize = 5;

/// Per-mode and per-bin molar vibrational free energies (kcal/mol).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationalCumulative {
    /// Bin width in cm⁻¹
    pub dnu: f64,
    /// Frequencies of the modes behind the per-mode series
    pub frequencies: Vec<f64>,
    /// Classical free energy of each mode
    pub per_mode_cl: Vec<f64>,
    /// Quantum free energy of each mode
    pub per_mode_qm: Vec<f64>,
    /// Classical free energy accumulated in each bin
    pub per_bin_cl: Vec<f64>,
    /// Quantum free energy accumulated in each bin
    pub per_bin_qm: Vec<f64>,
}

impl VibrationalCumulative {
    /// Empty structures on a grid of bin width `dnu`.
    pub fn new(dnu: f64) -> Self {
        let nbins = grid_size(dnu);
        Self {
            dnu,
            frequencies: Vec::new(),
            per_mode_cl: Vec::new(),
            per_mode_qm: Vec::new(),
            per_bin_cl: vec![0.0; nbins],
            per_bin_qm: vec![0.0; nbins],
        }
    }

    /// Number of bins of the grid.
    pub fn nbins(&self) -> usize {
        self.per_bin_cl.len()
    }

    /// Adds the mode of frequency `freq` at `temperature`.
    ///
    /// Returns the bin the mode landed in and whether it was clamped into the
    /// last bin because it lies beyond the grid.
    pub fn deposit(&mut self, temperature: f64, freq: f64) -> (usize, bool) {
        let f_cl = classical_mode_free_energy(temperature, freq);
        let f_qm = quantum_mode_free_energy(temperature, freq);

        self.frequencies.push(freq);
        self.per_mode_cl.push(f_cl);
        self.per_mode_qm.push(f_qm);

        let (bin, overflow) = bin_index(freq, self.dnu, self.nbins());
        self.per_bin_cl[bin] += f_cl;
        self.per_bin_qm[bin] += f_qm;
        (bin, overflow)
    }

    /// Drops the per-mode series, keeping the binned one.
    pub fn without_modes(mut self) -> Self {
        self.frequencies.clear();
        self.per_mode_cl.clear();
        self.per_mode_qm.clear();
        self
    }
}

/// One line of a cumulative report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeRow {
    /// Mode frequency, or lower edge of the bin, in cm⁻¹
    pub x: f64,
    /// Running classical free energy
    pub cumul_cl: f64,
    /// Running quantum free energy
    pub cumul_qm: f64,
    /// cumul_qm - cumul_cl
    pub delta: f64,
}

/// Running sums of the per-mode and per-bin free energies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeReport {
    /// One row per mode, in input order, x being the mode frequency
    pub per_mode: Vec<CumulativeRow>,
    /// One row per bin of the frequency grid, x being the lower bin edge
    pub per_bin: Vec<CumulativeRow>,
}

fn running_sums(xs: impl Iterator<Item = f64>, cl: &[f64], qm: &[f64]) -> Vec<CumulativeRow> {
    let mut sum_cl = 0.0;
    let mut sum_qm = 0.0;
    xs.zip(cl.iter().zip(qm))
        .map(|(x, (c, q))| {
            sum_cl += c;
            sum_qm += q;
            CumulativeRow {
                x,
                cumul_cl: sum_cl,
                cumul_qm: sum_qm,
                delta: sum_qm - sum_cl,
            }
        })
        .collect()
}

/// Cumulative vibrational free energy over mode order and over frequency.
pub fn cumulative_report(cumulative: &VibrationalCumulative) -> CumulativeReport {
    let dnu = cumulative.dnu;
    CumulativeReport {
        per_mode: running_sums(
            cumulative.frequencies.iter().copied(),
            &cumulative.per_mode_cl,
            &cumulative.per_mode_qm,
        ),
        per_bin: running_sums(
            (0..cumulative.nbins()).map(|bin| dnu * bin as f64),
            &cumulative.per_bin_cl,
            &cumulative.per_bin_qm,
        ),
    }
}

/// Smoothed vibrational density of states and the classical free energy it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vdos {
    /// Lower edge of each bin in cm⁻¹
    pub grid: Vec<f64>,
    /// Modes per bin after smoothing; sums to the number of modes
    pub density: Vec<f64>,
    /// Classical free energy of each bin in kcal/mol
    pub free_energy: Vec<f64>,
    /// Running sum of `free_energy`
    pub cumulative: Vec<f64>,
}

/// Triangular moving average; bins near the edges are normalised by the
/// weight actually available.
fn smooth(histogram: &[f64], period: usize) -> Vec<f64> {
    let n = histogram.len() as isize;
    let p = period as isize;
    (0..n)
        .map(|i| {
            let mut acc = 0.0;
            let mut total = 0.0;
            for offset in -p..=p {
                let j = i + offset;
                if j >= 0 && j < n {
                    let weight = (p + 1 - offset.abs()) as f64;
                    acc += histogram[j as usize] * weight;
                    total += weight;
                }
            }
            acc / total
        })
        .collect()
}

/// VDOS of the modes `frequencies` on a grid of bin width `dnu`.
///
/// All frequencies are expected positive. With no modes the density and the
/// free energies are zero everywhere.
pub fn vdos(temperature: f64, frequencies: &[f64], dnu: f64) -> Vdos {
    let nbins = grid_size(dnu);
    let mut histogram = vec![0.0; nbins];
    for &freq in frequencies {
        let (bin, _) = bin_index(freq, dnu, nbins);
        histogram[bin] += 1.0;
    }

    let smoothed = smooth(&histogram, VDOS_SMOOTHING_PERIOD);
    let total: f64 = smoothed.iter().sum();
    let density: Vec<f64> = if total > 0.0 {
        smoothed.iter().map(|v| v * frequencies.len() as f64 / total).collect()
    } else {
        vec![0.0; nbins]
    };

    let kbt = BOLTZMANN * temperature;
    let rt = rt_kcal(temperature);
    let free_energy: Vec<f64> = density
        .iter()
        .enumerate()
        .map(|(bin, d)| -rt * (kbt / (HC_CM * (bin + 1) as f64 * dnu)).ln() * d)
        .collect();
    let cumulative = free_energy
        .iter()
        .scan(0.0, |acc, f| {
            *acc += f;
            Some(*acc)
        })
        .collect();

    Vdos {
        grid: (0..nbins).map(|bin| dnu * bin as f64).collect(),
        density,
        free_energy,
        cumulative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{vibrational_classical, vibrational_quantum};

    const FREQS: [f64; 6] = [35.0, 120.5, 800.0, 1650.2, 3100.0, 3105.0];

    fn filled(temperature: f64, dnu: f64, freqs: &[f64]) -> VibrationalCumulative {
        let mut c = VibrationalCumulative::new(dnu);
        for &f in freqs {
            c.deposit(temperature, f);
        }
        c
    }

    #[test]
    fn test_binned_and_per_mode_sums_agree() {
        let c = filled(300.0, 2.0, &FREQS);
        let modes_cl: f64 = c.per_mode_cl.iter().sum();
        let bins_cl: f64 = c.per_bin_cl.iter().sum();
        let modes_qm: f64 = c.per_mode_qm.iter().sum();
        let bins_qm: f64 = c.per_bin_qm.iter().sum();
        assert!((modes_cl - bins_cl).abs() < 1e-10);
        assert!((modes_qm - bins_qm).abs() < 1e-10);

        // and both equal the vibrational free energies of the whole set
        assert!((modes_cl - vibrational_classical(300.0, &FREQS).f).abs() < 1e-10);
        assert!((modes_qm - vibrational_quantum(300.0, &FREQS).f).abs() < 1e-10);
    }

    #[test]
    fn test_deposit_bins_and_overflow() {
        let mut c = VibrationalCumulative::new(1.0);
        assert_eq!(c.nbins(), 4000);
        assert_eq!(c.deposit(300.0, 1000.4), (1000, false));
        assert_eq!(c.deposit(300.0, 4500.0), (3999, true));
        assert!(c.per_bin_cl[3999] != 0.0);
    }

    #[test]
    fn test_cumulative_report_is_running_sum() {
        let c = filled(300.0, 1.0, &FREQS);
        let report = cumulative_report(&c);
        assert_eq!(report.per_mode.len(), FREQS.len());
        assert_eq!(report.per_bin.len(), 4000);

        let last_mode = report.per_mode.last().unwrap();
        let last_bin = report.per_bin.last().unwrap();
        assert!((last_mode.cumul_cl - last_bin.cumul_cl).abs() < 1e-10);
        assert!((last_mode.cumul_qm - last_bin.cumul_qm).abs() < 1e-10);
        assert!((last_mode.delta - (last_mode.cumul_qm - last_mode.cumul_cl)).abs() < 1e-12);
        assert_eq!(report.per_mode[2].x, 800.0);
        assert_eq!(report.per_bin[10].x, 10.0);
        // nothing below the first mode
        assert_eq!(report.per_bin[30].cumul_cl, 0.0);
    }

    #[test]
    fn test_vdos_is_normalised_to_mode_count() {
        for dnu in [1.0, 2.5, 10.0] {
            let v = vdos(300.0, &FREQS, dnu);
            let sum: f64 = v.density.iter().sum();
            assert!((sum - FREQS.len() as f64).abs() < 1e-9, "dnu {}: {}", dnu, sum);
            assert_eq!(v.grid.len(), grid_size(dnu));
            assert!((v.cumulative.last().unwrap() - v.free_energy.iter().sum::<f64>()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_vdos_smoothing_spreads_a_single_mode() {
        let v = vdos(300.0, &[1000.0], 1.0);
        // weights 1..6..1 sum to 36
        assert!((v.density[1000] - 6.0 / 36.0).abs() < 1e-12);
        assert!((v.density[995] - 1.0 / 36.0).abs() < 1e-12);
        assert_eq!(v.density[994], 0.0);
    }

    #[test]
    fn test_vdos_edge_bin_is_renormalised() {
        let v = vdos(300.0, &[0.2], 1.0);
        // bin 0 sees offsets 0..=5, weights 6+5+4+3+2+1 = 21
        let raw0 = 6.0 / 21.0;
        let raw1 = 5.0 / 26.0;
        assert!((v.density[0] / v.density[1] - raw0 / raw1).abs() < 1e-12);
        assert!((v.density.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vdos_without_modes_is_zero() {
        let v = vdos(300.0, &[], 1.0);
        assert!(v.density.iter().all(|&d| d == 0.0));
        assert!(v.cumulative.iter().all(|&f| f == 0.0));
    }
}
