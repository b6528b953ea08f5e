//! Thermodynamics of a reaction `nA·A ⇌ nB·B`.
//!
//! The difference `D = nB·B − nA·A` is taken on the molar quantities and the
//! zero-point energy. Extensive quantities and ln q have no meaning for a
//! stoichiometric difference and are zero in `D`.

use crate::kernel::{Thermo, ThermoTable};
use crate::spectrum::VibrationalCumulative;
use thiserror::Error;

/// Errors that prevent a reaction difference from being taken.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReactionError {
    /// A coefficient is zero
    #[error("Stoichiometric coefficients must be at least 1, got {na}:{nb}")]
    Stoichiometry {
        /// Coefficient of A
        na: u32,
        /// Coefficient of B
        nb: u32,
    },
    /// The two systems were binned on different frequency grids
    #[error("Frequency grids differ between the two systems (dnu {dnu_a} vs {dnu_b})")]
    GridMismatch {
        /// Bin width of A in cm⁻¹
        dnu_a: f64,
        /// Bin width of B in cm⁻¹
        dnu_b: f64,
    },
}

/// Type alias for reaction results
pub type Result<T> = std::result::Result<T, ReactionError>;

/// Reaction difference between two evaluated systems.
///
/// # Arguments
///
/// * `a` - Reactant, with stoichiometric coefficient `na`
/// * `b` - Product, with stoichiometric coefficient `nb`
///
/// # Returns
///
/// A fresh [`Thermo`] holding `nB·B − nA·A`. The quantum correction
/// `Fm_totqm − Fm_totcl` is reported only for a 1:1 reaction and is 0
/// otherwise. The binned cumulative free energy is always differenced; the
/// per-mode one only when both sides have the same coefficient and the same
/// number of modes (a conformational equilibrium), using A's frequencies.
pub fn reaction_delta(a: &Thermo, b: &Thermo, na: u32, nb: u32) -> Result<Thermo> {
    if na < 1 || nb < 1 {
        return Err(ReactionError::Stoichiometry { na, nb });
    }
    let (ca, cb) = (&a.cumulative, &b.cumulative);
    if ca.dnu != cb.dnu || ca.nbins() != cb.nbins() {
        return Err(ReactionError::GridMismatch {
            dnu_a: ca.dnu,
            dnu_b: cb.dnu,
        });
    }

    let (fa, fb) = (na as f64, nb as f64);
    let diff = |xa: &[f64], xb: &[f64]| -> Vec<f64> { xb.iter().zip(xa).map(|(y, x)| fb * y - fa * x).collect() };

    let mut cumulative = VibrationalCumulative {
        dnu: ca.dnu,
        frequencies: ca.frequencies.clone(),
        per_mode_cl: diff(&ca.per_mode_cl, &cb.per_mode_cl),
        per_mode_qm: diff(&ca.per_mode_qm, &cb.per_mode_qm),
        per_bin_cl: diff(&ca.per_bin_cl, &cb.per_bin_cl),
        per_bin_qm: diff(&ca.per_bin_qm, &cb.per_bin_qm),
    };
    let conformational = na == nb && a.vibrations == b.vibrations;
    if !conformational {
        cumulative = cumulative.without_modes();
    }

    let molar = b.molar.combine(fb, &a.molar, -fa).without_lnq();
    let qm_corr = if na == 1 && nb == 1 {
        molar.totqm.f - molar.totcl.f
    } else {
        0.0
    };

    let solvation = match (&a.solvation, &b.solvation) {
        (Some(sa), Some(sb)) => Some(sb.combine(fb, sa, -fa)),
        _ => None,
    };

    Ok(Thermo {
        temperature: a.temperature,
        nmoles: 1.0,
        vibrations: cumulative.frequencies.len(),
        molar,
        extensive: ThermoTable::default(),
        zpe: fb * b.zpe - fa * a.zpe,
        qm_corr,
        solvation,
        cumulative,
    })
}
