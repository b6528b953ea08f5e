//! Empirical solvation entropy of a solute transferred from the ideal gas
//! (1 bar) into a liquid solvent.
//!
//! The liquid is pictured as solvent molecules each owning a small free
//! volume. A solute molecule sits in a cavity made of its own volume plus one
//! free volume, and may hop to neighbouring free volumes. This gives:
//!
//! - a translational term, from the volume accessible to the solute compared
//!   with the ideal-gas volume at 1 bar,
//! - a rotational term, from the solute's radius of gyration compared with
//!   the cavity radius,
//! - a cavity-formation term, in three variants: Ω (acentricity and surface
//!   ratio), ε (scaled-particle theory with a dielectric packing fraction)
//!   and ε+α (ε plus a thermal-expansion correction).
//!
//! All entropies are in cal/(mol·K).

use crate::solvents::Solvent;
use crate::units::{gas_constant_cal, AVOGADRO, BOLTZMANN};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Variant of the cavity-formation entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CavityModel {
    /// Packing fraction, acentricity and surface ratio
    Omega,
    /// Scaled-particle theory with a dielectric packing fraction
    Epsilon,
    /// ε model corrected for thermal expansion
    EpsilonAlpha,
}

impl CavityModel {
    /// Every model, in report order.
    pub const ALL: [CavityModel; 3] = [CavityModel::Omega, CavityModel::Epsilon, CavityModel::EpsilonAlpha];
}

impl fmt::Display for CavityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CavityModel::Omega => write!(f, "omega"),
            CavityModel::Epsilon => write!(f, "epsilon"),
            CavityModel::EpsilonAlpha => write!(f, "epsilon+alpha"),
        }
    }
}

/// Solvation entropy terms and the cavity geometry they were derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolvationEntropy {
    /// Translational confinement entropy
    pub ds_tr: f64,
    /// Rotational hindrance entropy
    pub ds_rot: f64,
    /// Cavity entropy, Ω model
    pub ds_cav_omega: f64,
    /// Cavity entropy, ε model
    pub ds_cav_eps: f64,
    /// Cavity entropy, ε+α model
    pub ds_cav_eps_alpha: f64,
    /// Free volume per solvent molecule in Å³
    pub free_volume: f64,
    /// Radius of the solute cavity in Å
    pub cavity_radius: f64,
    /// Probability of finding a neighbouring free volume
    pub hopping: f64,
    /// Effective number of cavities visited by the solute
    pub occupancy: f64,
    /// The solute does not fit in its cavity; the rotational term was zeroed
    pub rotor_exceeds_cavity: bool,
    /// A solute surface area was given but the solvent has no bounding-box
    /// area; the surface ratio was estimated from the volumes
    pub surface_area_ignored: bool,
}

impl SolvationEntropy {
    /// Cavity entropy of one model.
    pub fn cavity(&self, model: CavityModel) -> f64 {
        match model {
            CavityModel::Omega => self.ds_cav_omega,
            CavityModel::Epsilon => self.ds_cav_eps,
            CavityModel::EpsilonAlpha => self.ds_cav_eps_alpha,
        }
    }

    /// Total solvation entropy dS_tr + dS_rot + dS_cav of one model.
    pub fn total(&self, model: CavityModel) -> f64 {
        self.ds_tr + self.ds_rot + self.cavity(model)
    }

    /// Free energy `free_energy` (kcal/mol) corrected by the solvation entropy
    /// of `model` at `temperature`.
    pub fn corrected_free_energy(&self, free_energy: f64, temperature: f64, model: CavityModel) -> f64 {
        free_energy - temperature * self.total(model) / 1000.0
    }

    /// Linear combination `a·self + b·other`, used for reaction differences.
    /// Geometric fields are meaningless for a difference and are zeroed.
    pub fn combine(&self, a: f64, other: &SolvationEntropy, b: f64) -> SolvationEntropy {
        SolvationEntropy {
            ds_tr: a * self.ds_tr + b * other.ds_tr,
            ds_rot: a * self.ds_rot + b * other.ds_rot,
            ds_cav_omega: a * self.ds_cav_omega + b * other.ds_cav_omega,
            ds_cav_eps: a * self.ds_cav_eps + b * other.ds_cav_eps,
            ds_cav_eps_alpha: a * self.ds_cav_eps_alpha + b * other.ds_cav_eps_alpha,
            ..SolvationEntropy::default()
        }
    }
}

/// Scaled-particle cavity function g(y, R) and its derivative with respect to y.
fn cavity_function(y: f64, ratio: f64) -> (f64, f64) {
    let z = y / (1.0 - y);
    let g = -(1.0 - y).ln() + 3.0 * z * ratio + (3.0 * z + 4.5 * z * z) * ratio * ratio;
    let dg = 1.0 / (1.0 - y) + (3.0 * ratio + (3.0 + 9.0 * z) * ratio * ratio) / ((1.0 - y) * (1.0 - y));
    (g, dg)
}

fn sphere_radius(volume: f64) -> f64 {
    (3.0 * volume / (4.0 * PI)).cbrt()
}

/// Solvation entropy of a solute in `solvent` at `temperature`.
///
/// # Arguments
///
/// * `solute_volume` - Van der Waals volume of the solute in Å³
/// * `rgyr` - Solute radius of gyration in Å (taken as 0 when unknown)
/// * `sasa` - Solute surface area in Å²; when unknown the surface ratio is
///   estimated from the volume ratio
/// * `rotations` - Number of rotational degrees of freedom of the solute
///
/// # Returns
///
/// The entropy terms, or a message naming the solvent/solute property that is
/// out of range.
pub fn solvation_entropy(
    temperature: f64,
    solute_volume: f64,
    rgyr: Option<f64>,
    sasa: Option<f64>,
    rotations: usize,
    solvent: &Solvent,
) -> Result<SolvationEntropy, String> {
    if !(solute_volume > 0.0) {
        return Err(format!("Solute volume must be positive, got {}", solute_volume));
    }
    if !(solvent.mass > 0.0) || !(solvent.density > 0.0) || !(solvent.vvdw > 0.0) {
        return Err(format!(
            "Solvent '{}' needs positive mass, density and volume",
            solvent.name
        ));
    }
    if solvent.permittivity < 1.0 {
        return Err(format!(
            "Solvent permittivity must be at least 1, got {}",
            solvent.permittivity
        ));
    }

    let r = gas_constant_cal();
    let vm = solute_volume;
    let vs = solvent.vvdw;

    let number_density = AVOGADRO * 1000.0 * 1E-27 * solvent.density / solvent.mass;
    let free_volume = 1.0 / number_density - vs;
    if !(free_volume > 0.0) {
        return Err(format!(
            "Solvent '{}' leaves no free volume ({:.3} A^3 per molecule)",
            solvent.name, free_volume
        ));
    }

    let cavity_volume = (free_volume.cbrt() + vm.cbrt()).powi(3);
    let cavity_radius = sphere_radius(cavity_volume);
    let solvent_cavity_radius = sphere_radius((free_volume.cbrt() + vs.cbrt()).powi(3));

    let hopping = free_volume.powf(2.0 / 3.0) / (free_volume.powf(2.0 / 3.0) + vm.powf(2.0 / 3.0));
    let neighbours = 4.0 * (vm.cbrt() + vs.cbrt()).powi(2) / vs.powf(2.0 / 3.0);
    let occupancy = 1.0 + neighbours * hopping / (1.0 - hopping);
    let accessible = occupancy * cavity_volume * AVOGADRO * 1E-27;

    // ideal-gas molar volume at 1 bar, in L
    let gas_volume = BOLTZMANN * AVOGADRO * 1000.0 * temperature / 1E5;
    let ds_tr = r * (accessible / gas_volume).ln();

    let rg = rgyr.unwrap_or(0.0);
    let rotor_exceeds_cavity = rotations > 0 && rg >= cavity_radius;
    let ds_rot = if rotations == 0 || rotor_exceeds_cavity {
        0.0
    } else {
        3.0 * r * ((cavity_radius - rg) / cavity_radius).ln()
    };

    let y_omega = vs / (4.0 / 3.0 * PI * solvent_cavity_radius.powi(3));
    let surface_area_ignored = sasa.is_some() && !(solvent.bbox > 0.0);
    let surface_ratio = match sasa {
        Some(area) if solvent.bbox > 0.0 => area / solvent.bbox,
        _ => (vm / vs).powf(2.0 / 3.0),
    };
    let ds_cav_omega = r * surface_ratio * (1.0 + solvent.acentricity) * (1.0 - y_omega).ln();

    let y_eps = number_density * vs * (solvent.permittivity - 1.0) / (solvent.permittivity + 2.0);
    if y_eps >= 1.0 {
        return Err(format!("Dielectric packing fraction {:.4} is not below 1", y_eps));
    }
    let ratio = (vm / vs).cbrt();
    let (g, dg) = cavity_function(y_eps, ratio);
    let ds_cav_eps = -r * g;
    let ds_cav_eps_alpha = -r * (g - temperature * solvent.expansion * 1E-3 * y_eps * dg);

    Ok(SolvationEntropy {
        ds_tr,
        ds_rot,
        ds_cav_omega,
        ds_cav_eps,
        ds_cav_eps_alpha,
        free_volume,
        cavity_radius,
        hopping,
        occupancy,
        rotor_exceeds_cavity,
        surface_area_ignored,
    })
}
