//! Input description of one molecular system.
//!
//! A [`System`] holds everything the kernel needs to evaluate the canonical
//! ideal-gas partition function of a molecule: thermodynamic conditions,
//! mass and degrees of freedom, the moments of inertia and the vibrational
//! spectrum, plus the optional solute/solvent descriptors used by the
//! solvation entropy model.
//!
//! Units follow the rest of the crate: K, mol, L, atm, g/mol, kcal/mol,
//! (g/mol)·Å² and cm⁻¹.

use crate::solvents::Solvent;
use crate::units;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Upper edge of the frequency grid used for spectral histograms, in cm⁻¹.
pub const SPECTRUM_MAX: f64 = 4000.0;

/// What to do with vibrational modes whose frequency is zero or negative
/// (imaginary modes coming from a Hessian that is not at a minimum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImaginaryModePolicy {
    /// Refuse to evaluate the system.
    #[default]
    Reject,
    /// Drop the offending modes from every vibrational sum and report them.
    Skip,
}

impl FromStr for ImaginaryModePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            other => Err(format!("Unknown imaginary mode policy '{}' (expected reject or skip)", other)),
        }
    }
}

impl fmt::Display for ImaginaryModePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Geometric descriptors of the solute, needed only for solvation entropies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solute {
    /// Van der Waals volume in Å³
    pub volume: Option<f64>,
    /// Radius of gyration in Å
    pub rgyr: Option<f64>,
    /// Accessible (bounding-box) surface area in Å²
    pub sasa: Option<f64>,
}

/// One molecular system, as read from an input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    /// Temperature in K
    pub temperature: f64,
    /// Number of moles
    pub nmoles: f64,
    /// Volume in L (ignored when a pressure or a concentration is given)
    pub volume: f64,
    /// Pressure in atm; when positive the volume follows from the ideal-gas law
    pub pressure: Option<f64>,
    /// Concentration in mol/L; when positive the volume is nmoles/concentration
    pub concentration: Option<f64>,
    /// Molecular mass in g/mol
    pub mass: f64,
    /// Electronic energy in kcal/mol
    pub energy: f64,
    /// Rotational symmetry number
    pub symmetry: u32,
    /// Number of translational degrees of freedom
    pub translations: u32,
    /// Principal moments of inertia in (g/mol)·Å², one per rotational degree of freedom
    pub inertia: Vec<f64>,
    /// Vibrational frequencies in cm⁻¹, one per vibrational mode
    pub frequencies: Vec<f64>,
    /// Bin width of the frequency grid in cm⁻¹
    pub dnu: f64,
    /// Solute descriptors for the solvation model
    pub solute: Solute,
    /// Solvent, either tabulated or given property by property
    pub solvent: Option<Solvent>,
    /// Handling of zero or negative frequencies; `None` when not given, in
    /// which case [`ImaginaryModePolicy::Reject`] applies
    pub imaginary_modes: Option<ImaginaryModePolicy>,
    /// Hessian file from which frequencies are derived, if any
    pub hessian_file: Option<PathBuf>,
}

impl Default for System {
    fn default() -> Self {
        Self {
            temperature: 300.0,
            nmoles: 1.0,
            volume: 1.0,
            pressure: None,
            concentration: None,
            mass: 0.0,
            energy: 0.0,
            symmetry: 1,
            translations: 3,
            inertia: Vec::new(),
            frequencies: Vec::new(),
            dnu: 1.0,
            solute: Solute::default(),
            solvent: None,
            imaginary_modes: None,
            hessian_file: None,
        }
    }
}

impl System {
    /// Number of rotational degrees of freedom.
    pub fn rotations(&self) -> usize {
        self.inertia.len()
    }

    /// Policy for non-positive frequencies actually in force.
    pub fn imaginary_policy(&self) -> ImaginaryModePolicy {
        self.imaginary_modes.unwrap_or_default()
    }

    /// Number of vibrational modes.
    pub fn vibrations(&self) -> usize {
        self.frequencies.len()
    }

    /// Volume in liters actually used for the translational partition function.
    ///
    /// A positive pressure wins over a positive concentration, which wins over
    /// the explicit volume.
    pub fn effective_volume(&self) -> f64 {
        match (self.pressure, self.concentration) {
            (Some(p), _) if p > 0.0 => units::ideal_gas_volume(self.nmoles, self.temperature, p),
            (_, Some(c)) if c > 0.0 => self.nmoles / c,
            _ => self.volume,
        }
    }

    /// Number of bins of the frequency grid, `ceil(4000/dnu)`.
    pub fn grid_size(&self) -> usize {
        grid_size(self.dnu)
    }

    /// Checks that the system can be evaluated.
    ///
    /// # Returns
    ///
    /// - `Ok(())` when all scalar inputs are in range
    /// - `Err(String)` describing the first offending value
    pub fn validate(&self) -> Result<(), String> {
        if !(self.temperature > 0.0) {
            return Err(format!("Temperature must be positive, got {}", self.temperature));
        }
        if !(self.nmoles > 0.0) {
            return Err(format!("Number of moles must be positive, got {}", self.nmoles));
        }
        let volume = self.effective_volume();
        if !(volume > 0.0) || !volume.is_finite() {
            return Err(format!("Volume must be positive, got {}", volume));
        }
        if self.translations > 0 && !(self.mass > 0.0) {
            return Err(format!("Molecular mass must be positive, got {}", self.mass));
        }
        if self.symmetry < 1 {
            return Err("Symmetry number must be at least 1".to_string());
        }
        if self.rotations() > 3 {
            return Err(format!(
                "At most 3 rotational degrees of freedom are allowed, got {}",
                self.rotations()
            ));
        }
        if let Some((i, value)) = self.inertia.iter().enumerate().find(|(_, &v)| !(v > 0.0)) {
            return Err(format!("Moment of inertia #{} must be positive, got {}", i + 1, value));
        }
        if !(self.dnu > 0.0) || !self.dnu.is_finite() {
            return Err(format!("Frequency bin width must be positive, got {}", self.dnu));
        }
        Ok(())
    }
}

/// Number of bins of a frequency grid with bin width `dnu`.
pub fn grid_size(dnu: f64) -> usize {
    ((SPECTRUM_MAX / dnu).ceil() as usize).max(1)
}

/// Bin of the frequency grid a mode falls into.
///
/// Returns the bin index `round(freq/dnu)` clamped to `[0, nbins-1]` and a flag
/// telling whether the upper clamp was applied.
pub fn bin_index(freq: f64, dnu: f64, nbins: usize) -> (usize, bool) {
    let raw = (freq / dnu).round();
    if raw < 0.0 {
        (0, false)
    } else if raw as usize >= nbins {
        (nbins - 1, true)
    } else {
        (raw as usize, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> System {
        System {
            mass: 18.015,
            inertia: vec![0.6148, 1.1546, 1.7694],
            frequencies: vec![1595.0, 3657.0, 3756.0],
            symmetry: 2,
            ..System::default()
        }
    }

    #[test]
    fn test_defaults() {
        let s = System::default();
        assert_eq!(s.temperature, 300.0);
        assert_eq!(s.nmoles, 1.0);
        assert_eq!(s.volume, 1.0);
        assert_eq!(s.symmetry, 1);
        assert_eq!(s.dnu, 1.0);
        assert_eq!(s.grid_size(), 4000);
    }

    #[test]
    fn test_grid_size_rounds_up() {
        assert_eq!(grid_size(3.0), 1334);
        assert_eq!(grid_size(0.5), 8000);
    }

    #[test]
    fn test_bin_index_clamps() {
        assert_eq!(bin_index(1000.4, 1.0, 4000), (1000, false));
        assert_eq!(bin_index(1000.6, 1.0, 4000), (1001, false));
        assert_eq!(bin_index(5000.0, 1.0, 4000), (3999, true));
        assert_eq!(bin_index(3999.4, 1.0, 4000), (3999, false));
        assert_eq!(bin_index(-20.0, 1.0, 4000), (0, false));
    }

    #[test]
    fn test_effective_volume_precedence() {
        let mut s = water();
        assert_eq!(s.effective_volume(), 1.0);
        s.concentration = Some(2.0);
        assert!((s.effective_volume() - 0.5).abs() < 1e-12);
        s.pressure = Some(1.0);
        let v = s.effective_volume();
        assert!((v - units::ideal_gas_volume(1.0, 300.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(water().validate().is_ok());

        let mut s = water();
        s.temperature = 0.0;
        assert!(s.validate().unwrap_err().contains("Temperature"));

        let mut s = water();
        s.inertia.push(1.0);
        assert!(s.validate().unwrap_err().contains("rotational"));

        let mut s = water();
        s.dnu = 0.0;
        assert!(s.validate().unwrap_err().contains("bin width"));

        let mut s = water();
        s.mass = 0.0;
        assert!(s.validate().unwrap_err().contains("mass"));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Skip".parse::<ImaginaryModePolicy>().unwrap(), ImaginaryModePolicy::Skip);
        assert_eq!("reject".parse::<ImaginaryModePolicy>().unwrap(), ImaginaryModePolicy::Reject);
        assert!("ignore".parse::<ImaginaryModePolicy>().is_err());
    }
}
