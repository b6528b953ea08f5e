//! Physical constants and unit conversions.
//!
//! Every quantity handled by the crate uses chemistry-friendly units:
//!
//! - temperature in Kelvin
//! - moments of inertia in (g/mol)·Å²
//! - vibrational frequencies in wavenumbers (cm⁻¹)
//! - energies in kcal/mol, entropies in cal/(mol·K)
//!
//! Conversions between a characteristic temperature and the spectroscopic
//! quantities live here so that the parser and the kernel agree on them.

/// Planck constant [J·s]
pub const PLANCK: f64 = 6.62606957E-34;
/// Avogadro number [1/mol]
pub const AVOGADRO: f64 = 6.02214129E+23;
/// Boltzmann constant [J/K]
pub const BOLTZMANN: f64 = 1.3806488E-23;
/// Speed of light [m/s]
pub const LIGHTSPEED: f64 = 299792458.0;
/// One thermochemical calorie [J]
pub const CALORIE: f64 = 4.184;
/// Converts a per-molecule energy in joule to kcal/mol.
pub const J2KCALMOL: f64 = AVOGADRO / (CALORIE * 1000.0);
/// One standard atmosphere [Pa]
pub const ATMOSPHERE: f64 = 101325.0;

/// h·c expressed per wavenumber, h·c·100 [J·cm]
pub const HC_CM: f64 = PLANCK * LIGHTSPEED * 100.0;

/// Molar gas constant in cal/(mol·K).
pub fn gas_constant_cal() -> f64 {
    1000.0 * J2KCALMOL * BOLTZMANN
}

/// Molar gas constant times temperature, in kcal/mol.
pub fn rt_kcal(temperature: f64) -> f64 {
    J2KCALMOL * BOLTZMANN * temperature
}

/// Convert a rotational temperature (K) to a moment of inertia in (g/mol)·Å².
///
/// The relation is an involution: applied to a moment of inertia it gives
/// the rotational temperature.
pub fn kelvin_to_inertia(kelvin: f64) -> f64 {
    (PLANCK * PLANCK * AVOGADRO) / (8.0 * std::f64::consts::PI.powi(2) * BOLTZMANN * 1E-23 * kelvin)
}

/// Convert a vibrational temperature (K) to a frequency in cm⁻¹.
pub fn kelvin_to_wavenumber(kelvin: f64) -> f64 {
    kelvin * (BOLTZMANN / HC_CM)
}

/// Convert a frequency in cm⁻¹ to a vibrational temperature (K).
pub fn wavenumber_to_kelvin(wavenumber: f64) -> f64 {
    wavenumber * (HC_CM / BOLTZMANN)
}

/// Convert a rotational constant B (cm⁻¹) to a moment of inertia in (g/mol)·Å².
pub fn rotational_constant_to_inertia(wavenumber: f64) -> f64 {
    kelvin_to_inertia(wavenumber_to_kelvin(wavenumber))
}

/// Ideal-gas volume in liters occupied by `nmoles` at `temperature` (K) and
/// `pressure` (atm).
pub fn ideal_gas_volume(nmoles: f64, temperature: f64, pressure: f64) -> f64 {
    1000.0 * nmoles * AVOGADRO * BOLTZMANN * temperature / (pressure * ATMOSPHERE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_radiation_constant() {
        // c2 = h c / kB = 1.4387770 cm K
        let kelvin = wavenumber_to_kelvin(1.0);
        assert!((kelvin - 1.438777).abs() < 1e-5, "got {}", kelvin);
        assert!((kelvin_to_wavenumber(kelvin) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inertia_kelvin_involution() {
        let inertia = 1.7704; // roughly water, (g/mol) A^2
        let kelvin = kelvin_to_inertia(inertia);
        assert!(kelvin > 1.0 && kelvin < 100.0);
        assert!((kelvin_to_inertia(kelvin) - inertia).abs() < 1e-10);
    }

    #[test]
    fn test_rotational_constant_of_hcl() {
        // HCl: B = 10.59 cm-1, I = 1.59 (g/mol) A^2
        let inertia = rotational_constant_to_inertia(10.59);
        assert!((inertia - 1.5918).abs() < 5e-3, "got {}", inertia);
    }

    #[test]
    fn test_molar_volume_at_one_atmosphere() {
        let v = ideal_gas_volume(1.0, 273.15, 1.0);
        assert!((v - 22.414).abs() < 1e-2, "got {}", v);
    }

    #[test]
    fn test_gas_constant() {
        assert!((gas_constant_cal() - 1.98720).abs() < 1e-4);
        assert!((rt_kcal(300.0) - 0.596161).abs() < 1e-5);
    }
}
