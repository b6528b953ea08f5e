//! Thermodynamic kernel.
//!
//! [`evaluate`] turns a [`System`] into a [`Thermo`]: the molar and
//! extensive contributions of every degree of freedom, the classical and
//! quantum totals, the zero-point energy, the optional solvation entropies
//! and the cumulative vibrational free energies.
//!
//! The kernel does no I/O and no logging. Recoverable conditions are returned
//! as [`ThermoWarning`]s next to the result; the caller decides how to report
//! them. On failure nothing is returned, so a previously obtained [`Thermo`]
//! is never partially overwritten.
//!
//! # Examples
//!
//! ```
//! use thermo::kernel::{evaluate, Part, Quantity};
//! use thermo::system::System;
//!
//! let water = System {
//!     mass: 18.015,
//!     symmetry: 2,
//!     inertia: vec![0.6148, 1.1546, 1.7694],
//!     frequencies: vec![1595.0, 3657.0, 3756.0],
//!     ..System::default()
//! };
//! let evaluation = evaluate(&water).unwrap();
//! let results = evaluation.thermo.results();
//! assert!(results[Quantity::Sm(Part::TotQm)] > 0.0);
//! ```

use crate::partition::{
    electronic, rotational, translational, vibrational_classical, vibrational_quantum, zero_point_energy,
    Contribution,
};
use crate::solvation::{solvation_entropy, CavityModel, SolvationEntropy};
use crate::spectrum::VibrationalCumulative;
use crate::system::{ImaginaryModePolicy, System};
use crate::units::{gas_constant_cal, rt_kcal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use thiserror::Error;

/// Errors that prevent a system from being evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// A scalar input is out of range or not a number
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A non-positive frequency met under [`ImaginaryModePolicy::Reject`]
    #[error("Vibrational mode {mode} has non-positive frequency {frequency} cm-1")]
    ImaginaryMode {
        /// 1-based position of the mode in the input
        mode: usize,
        /// Frequency in cm⁻¹
        frequency: f64,
    },
    /// The solvent leaves no room for the solvation model
    #[error("Solvation model: {0}")]
    Solvation(String),
}

/// Result type of the kernel.
pub type Result<T> = std::result::Result<T, ThermoError>;

/// Recoverable conditions met while evaluating a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ThermoWarning {
    /// A mode lies beyond the frequency grid and was put in its last bin.
    BinOverflow {
        /// 1-based position of the mode in the input
        mode: usize,
        /// Frequency in cm⁻¹
        frequency: f64,
        /// Bin the mode was counted in
        bin: usize,
    },
    /// A non-positive frequency was left out of the vibrational treatment.
    ModeSkipped {
        /// 1-based position of the mode in the input
        mode: usize,
        /// Frequency in cm⁻¹
        frequency: f64,
    },
    /// The solute radius of gyration does not fit in its solvent cavity.
    RotorExceedsCavity {
        /// Solute radius of gyration in Å
        rgyr: f64,
        /// Cavity radius in Å
        cavity_radius: f64,
    },
    /// A solute surface area was given but the solvent has no bounding-box
    /// area, so the surface ratio of the Ω cavity model was estimated from
    /// the volumes.
    SurfaceAreaIgnored {
        /// Solute accessible surface area in Å²
        sasa: f64,
    },
}

impl fmt::Display for ThermoWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThermoWarning::BinOverflow { mode, frequency, bin } => write!(
                f,
                "Mode {} at {:.2} cm-1 is beyond the frequency grid, counted in bin {}",
                mode, frequency, bin
            ),
            ThermoWarning::ModeSkipped { mode, frequency } => {
                write!(f, "Skipping mode {} with frequency {:.2} cm-1", mode, frequency)
            }
            ThermoWarning::RotorExceedsCavity { rgyr, cavity_radius } => write!(
                f,
                "Solute radius of gyration {:.3} A exceeds the cavity radius {:.3} A, rotational solvation entropy set to 0",
                rgyr, cavity_radius
            ),
            ThermoWarning::SurfaceAreaIgnored { sasa } => write!(
                f,
                "Solute surface area {:.3} A^2 ignored: the solvent has no bounding-box area, surface ratio estimated from the volumes",
                sasa
            ),
        }
    }
}

/// Degree of freedom, or total, a quantity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Part {
    /// Electronic ground state
    Elec,
    /// Translations
    Tr,
    /// Rotations
    Rot,
    /// Classical harmonic vibrations
    VibCl,
    /// Quantum harmonic vibrations
    VibQm,
    /// Total with classical vibrations
    TotCl,
    /// Total with quantum vibrations
    TotQm,
}

impl Part {
    /// Every part, in report order.
    pub const ALL: [Part; 7] = [
        Part::Elec,
        Part::Tr,
        Part::Rot,
        Part::VibCl,
        Part::VibQm,
        Part::TotCl,
        Part::TotQm,
    ];

    fn position(self) -> usize {
        self as usize
    }

    /// Short lowercase tag used in raw output keys.
    pub fn tag(self) -> &'static str {
        match self {
            Part::Elec => "elec",
            Part::Tr => "tr",
            Part::Rot => "rot",
            Part::VibCl => "vibcl",
            Part::VibQm => "vibqm",
            Part::TotCl => "totcl",
            Part::TotQm => "totqm",
        }
    }
}

/// Key of one entry of the [`ResultVector`].
///
/// ln q, `Um`, `Sm`, `Fm` are molar; `U`, `S`, `F` are extensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    /// Logarithm of the partition function, per molecule
    Lnq(Part),
    /// Internal energy, kcal
    U(Part),
    /// Entropy, cal/K
    S(Part),
    /// Helmholtz free energy, kcal
    F(Part),
    /// Molar internal energy, kcal/mol
    Um(Part),
    /// Molar entropy, cal/(mol·K)
    Sm(Part),
    /// Molar free energy, kcal/mol
    Fm(Part),
    /// Zero-point vibrational energy, kcal/mol
    Zpe,
    /// Quantum correction of a 1:1 reaction free energy, kcal/mol
    QmCorr,
    /// Translational solvation entropy, cal/(mol·K)
    DsTr,
    /// Rotational solvation entropy, cal/(mol·K)
    DsRot,
    /// Cavity-formation entropy, cal/(mol·K)
    DsCav(CavityModel),
    /// Total solvation entropy, cal/(mol·K)
    DsTot(CavityModel),
}

const PER_PART_KINDS: usize = 7;
const NPARTS: usize = Part::ALL.len();

fn cavity_position(model: CavityModel) -> usize {
    match model {
        CavityModel::Omega => 0,
        CavityModel::Epsilon => 1,
        CavityModel::EpsilonAlpha => 2,
    }
}

impl Quantity {
    /// Number of entries of a result vector.
    pub const COUNT: usize = PER_PART_KINDS * NPARTS + 4 + 2 * 3;

    /// Position of the quantity in the result vector.
    pub fn index(self) -> usize {
        let per_part = |kind: usize, part: Part| kind * NPARTS + part.position();
        let tail = PER_PART_KINDS * NPARTS;
        match self {
            Quantity::Lnq(p) => per_part(0, p),
            Quantity::U(p) => per_part(1, p),
            Quantity::S(p) => per_part(2, p),
            Quantity::F(p) => per_part(3, p),
            Quantity::Um(p) => per_part(4, p),
            Quantity::Sm(p) => per_part(5, p),
            Quantity::Fm(p) => per_part(6, p),
            Quantity::Zpe => tail,
            Quantity::QmCorr => tail + 1,
            Quantity::DsTr => tail + 2,
            Quantity::DsRot => tail + 3,
            Quantity::DsCav(m) => tail + 4 + cavity_position(m),
            Quantity::DsTot(m) => tail + 7 + cavity_position(m),
        }
    }

    /// Every quantity, in result-vector order.
    pub fn all() -> Vec<Quantity> {
        let kinds: [fn(Part) -> Quantity; PER_PART_KINDS] = [
            Quantity::Lnq,
            Quantity::U,
            Quantity::S,
            Quantity::F,
            Quantity::Um,
            Quantity::Sm,
            Quantity::Fm,
        ];
        let mut all: Vec<Quantity> = kinds
            .iter()
            .flat_map(|kind| Part::ALL.iter().map(move |&p| kind(p)))
            .collect();
        all.extend([Quantity::Zpe, Quantity::QmCorr, Quantity::DsTr, Quantity::DsRot]);
        all.extend(CavityModel::ALL.iter().map(|&m| Quantity::DsCav(m)));
        all.extend(CavityModel::ALL.iter().map(|&m| Quantity::DsTot(m)));
        all
    }

    /// Key used in raw `key = value` output, e.g. `Fm_totqm` or `dS_cav_omega`.
    pub fn key(self) -> String {
        let cavity = |m: CavityModel| match m {
            CavityModel::Omega => "omega",
            CavityModel::Epsilon => "eps",
            CavityModel::EpsilonAlpha => "eps_alpha",
        };
        match self {
            Quantity::Lnq(p) => format!("lnq_{}", p.tag()),
            Quantity::U(p) => format!("U_{}", p.tag()),
            Quantity::S(p) => format!("S_{}", p.tag()),
            Quantity::F(p) => format!("F_{}", p.tag()),
            Quantity::Um(p) => format!("Um_{}", p.tag()),
            Quantity::Sm(p) => format!("Sm_{}", p.tag()),
            Quantity::Fm(p) => format!("Fm_{}", p.tag()),
            Quantity::Zpe => "ZPE".to_string(),
            Quantity::QmCorr => "qm_corr".to_string(),
            Quantity::DsTr => "dS_tr".to_string(),
            Quantity::DsRot => "dS_rot".to_string(),
            Quantity::DsCav(m) => format!("dS_cav_{}", cavity(m)),
            Quantity::DsTot(m) => format!("dS_tot_{}", cavity(m)),
        }
    }
}

/// Flat, fixed-order vector of every computed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultVector {
    values: Vec<f64>,
}

impl ResultVector {
    fn zeros() -> Self {
        Self {
            values: vec![0.0; Quantity::COUNT],
        }
    }

    fn set(&mut self, quantity: Quantity, value: f64) {
        self.values[quantity.index()] = value;
    }

    /// `(quantity, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (Quantity, f64)> + '_ {
        Quantity::all().into_iter().map(move |q| (q, self.values[q.index()]))
    }
}

impl Index<Quantity> for ResultVector {
    type Output = f64;

    fn index(&self, quantity: Quantity) -> &f64 {
        &self.values[quantity.index()]
    }
}

/// Contributions of every degree of freedom plus the two totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThermoTable {
    /// Electronic
    pub elec: Contribution,
    /// Translational
    pub tr: Contribution,
    /// Rotational
    pub rot: Contribution,
    /// Classical vibrational
    pub vibcl: Contribution,
    /// Quantum vibrational
    pub vibqm: Contribution,
    /// Sum of the parts with classical vibrations
    pub totcl: Contribution,
    /// Sum of the parts with quantum vibrations
    pub totqm: Contribution,
}

impl ThermoTable {
    /// Assembles a table; the totals are the sums of the parts.
    pub fn from_parts(
        elec: Contribution,
        tr: Contribution,
        rot: Contribution,
        vibcl: Contribution,
        vibqm: Contribution,
    ) -> Self {
        Self {
            elec,
            tr,
            rot,
            vibcl,
            vibqm,
            totcl: elec + tr + rot + vibcl,
            totqm: elec + tr + rot + vibqm,
        }
    }

    /// Contribution of `part`.
    pub fn get(&self, part: Part) -> &Contribution {
        match part {
            Part::Elec => &self.elec,
            Part::Tr => &self.tr,
            Part::Rot => &self.rot,
            Part::VibCl => &self.vibcl,
            Part::VibQm => &self.vibqm,
            Part::TotCl => &self.totcl,
            Part::TotQm => &self.totqm,
        }
    }

    /// Linear combination `a·self + b·other`, field by field.
    pub fn combine(&self, a: f64, other: &ThermoTable, b: f64) -> ThermoTable {
        let mix = |x: &Contribution, y: &Contribution| x.scaled(a) + y.scaled(b);
        ThermoTable {
            elec: mix(&self.elec, &other.elec),
            tr: mix(&self.tr, &other.tr),
            rot: mix(&self.rot, &other.rot),
            vibcl: mix(&self.vibcl, &other.vibcl),
            vibqm: mix(&self.vibqm, &other.vibqm),
            totcl: mix(&self.totcl, &other.totcl),
            totqm: mix(&self.totqm, &other.totqm),
        }
    }

    /// Same table with every ln q set to zero.
    pub fn without_lnq(mut self) -> ThermoTable {
        for c in [
            &mut self.elec,
            &mut self.tr,
            &mut self.rot,
            &mut self.vibcl,
            &mut self.vibqm,
            &mut self.totcl,
            &mut self.totqm,
        ] {
            c.lnq = 0.0;
        }
        self
    }
}

/// Everything computed for one system (or for a reaction difference).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thermo {
    /// Temperature in K
    pub temperature: f64,
    /// Number of moles
    pub nmoles: f64,
    /// Number of vibrational modes actually treated
    pub vibrations: usize,
    /// Molar quantities
    pub molar: ThermoTable,
    /// Extensive quantities; ln q is kept per molecule
    pub extensive: ThermoTable,
    /// Zero-point energy in kcal/mol
    pub zpe: f64,
    /// Quantum correction to a reaction free energy, Fm_totqm - Fm_totcl
    pub qm_corr: f64,
    /// Solvation entropies, when the system carries solute and solvent data
    pub solvation: Option<SolvationEntropy>,
    /// Per-mode and per-bin vibrational free energies
    pub cumulative: VibrationalCumulative,
}

impl Thermo {
    /// Flattens the evaluation into a [`ResultVector`].
    pub fn results(&self) -> ResultVector {
        let mut r = ResultVector::zeros();
        for part in Part::ALL {
            let m = self.molar.get(part);
            let e = self.extensive.get(part);
            r.set(Quantity::Lnq(part), m.lnq);
            r.set(Quantity::U(part), e.u);
            r.set(Quantity::S(part), e.s);
            r.set(Quantity::F(part), e.f);
            r.set(Quantity::Um(part), m.u);
            r.set(Quantity::Sm(part), m.s);
            r.set(Quantity::Fm(part), m.f);
        }
        r.set(Quantity::Zpe, self.zpe);
        r.set(Quantity::QmCorr, self.qm_corr);
        if let Some(solv) = &self.solvation {
            r.set(Quantity::DsTr, solv.ds_tr);
            r.set(Quantity::DsRot, solv.ds_rot);
            for model in CavityModel::ALL {
                r.set(Quantity::DsCav(model), solv.cavity(model));
                r.set(Quantity::DsTot(model), solv.total(model));
            }
        }
        r
    }
}

/// A successful evaluation and the warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Every computed quantity
    pub thermo: Thermo,
    /// Recoverable conditions, in the order they were met
    pub warnings: Vec<ThermoWarning>,
}

/// Frequencies entering the vibrational treatment, after applying the
/// imaginary-mode policy.
fn retained_modes(system: &System, warnings: &mut Vec<ThermoWarning>) -> Result<Vec<f64>> {
    if let Some((i, &nu)) = system.frequencies.iter().enumerate().find(|(_, nu)| !nu.is_finite()) {
        return Err(ThermoError::InvalidInput(format!(
            "Frequency of mode {} is not a number: {}",
            i + 1,
            nu
        )));
    }
    let mut kept = Vec::with_capacity(system.frequencies.len());
    for (i, &nu) in system.frequencies.iter().enumerate() {
        if nu > 0.0 {
            kept.push(nu);
            continue;
        }
        match system.imaginary_policy() {
            ImaginaryModePolicy::Reject => {
                return Err(ThermoError::ImaginaryMode {
                    mode: i + 1,
                    frequency: nu,
                })
            }
            ImaginaryModePolicy::Skip => warnings.push(ThermoWarning::ModeSkipped {
                mode: i + 1,
                frequency: nu,
            }),
        }
    }
    Ok(kept)
}

/// Extensive counterpart of a molar contribution for `nmoles` moles.
fn extensive(molar: &Contribution, nmoles: f64) -> Contribution {
    Contribution {
        lnq: molar.lnq,
        u: molar.u * nmoles,
        s: molar.s * nmoles,
        f: molar.f * nmoles,
    }
}

/// Evaluates every thermodynamic quantity of `system`.
///
/// # Returns
///
/// - `Ok(Evaluation)` with the complete [`Thermo`] and any warnings
/// - `Err(ThermoError)` when an input is out of range, when a non-positive
///   frequency is met under [`ImaginaryModePolicy::Reject`], or when the
///   solvation model cannot be built for the given solvent
pub fn evaluate(system: &System) -> Result<Evaluation> {
    system.validate().map_err(ThermoError::InvalidInput)?;

    let mut warnings = Vec::new();
    let freqs = retained_modes(system, &mut warnings)?;

    let t = system.temperature;
    let n = system.nmoles;
    let volume = system.effective_volume();

    let solvation = match (system.solute.volume, &system.solvent) {
        (Some(vm), Some(solvent)) => {
            let solv = solvation_entropy(
                t,
                vm,
                system.solute.rgyr,
                system.solute.sasa,
                system.rotations(),
                solvent,
            )
            .map_err(ThermoError::Solvation)?;
            if solv.rotor_exceeds_cavity {
                warnings.push(ThermoWarning::RotorExceedsCavity {
                    rgyr: system.solute.rgyr.unwrap_or(0.0),
                    cavity_radius: solv.cavity_radius,
                });
            }
            if let (true, Some(sasa)) = (solv.surface_area_ignored, system.solute.sasa) {
                warnings.push(ThermoWarning::SurfaceAreaIgnored { sasa });
            }
            Some(solv)
        }
        _ => None,
    };

    let molar = ThermoTable::from_parts(
        electronic(t, system.energy),
        translational(t, system.translations, system.mass, volume, n),
        rotational(t, &system.inertia, system.symmetry),
        vibrational_classical(t, &freqs),
        vibrational_quantum(t, &freqs),
    );

    // N-particle indistinguishability, applied once on the extensive scale
    let tr_ext = Contribution {
        lnq: molar.tr.lnq,
        u: n * molar.tr.u,
        s: n * (molar.tr.s + gas_constant_cal()),
        f: n * (molar.tr.f - rt_kcal(t)),
    };
    let extensive = ThermoTable::from_parts(
        extensive(&molar.elec, n),
        tr_ext,
        extensive(&molar.rot, n),
        extensive(&molar.vibcl, n),
        extensive(&molar.vibqm, n),
    );
    // totals keep the per-molecule ln q of the molar table
    let extensive = ThermoTable {
        totcl: Contribution {
            lnq: molar.totcl.lnq,
            ..extensive.totcl
        },
        totqm: Contribution {
            lnq: molar.totqm.lnq,
            ..extensive.totqm
        },
        ..extensive
    };

    let mut cumulative = VibrationalCumulative::new(system.dnu);
    for (i, &nu) in system.frequencies.iter().enumerate().filter(|(_, nu)| **nu > 0.0) {
        let (bin, overflow) = cumulative.deposit(t, nu);
        if overflow {
            warnings.push(ThermoWarning::BinOverflow {
                mode: i + 1,
                frequency: nu,
                bin,
            });
        }
    }

    Ok(Evaluation {
        thermo: Thermo {
            temperature: t,
            nmoles: n,
            vibrations: freqs.len(),
            molar,
            extensive,
            zpe: zero_point_energy(&freqs),
            qm_corr: 0.0,
            solvation,
            cumulative,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvents::find_solvent;
    use crate::system::Solute;
    use crate::units::AVOGADRO;

    fn water() -> System {
        System {
            mass: 18.015,
            symmetry: 2,
            inertia: vec![0.6148, 1.1546, 1.7694],
            frequencies: vec![1595.0, 3657.0, 3756.0],
            ..System::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_monoatomic_gas_reference() {
        let system = System {
            mass: 18.015,
            ..System::default()
        };
        let thermo = evaluate(&system).unwrap().thermo;
        let r = thermo.results();
        assert_eq!(r[Quantity::Lnq(Part::Rot)], 0.0);
        assert_eq!(r[Quantity::Sm(Part::Rot)], 0.0);
        assert!(((r[Quantity::Lnq(Part::Tr)] - 11.727946820470791) / 11.727946820470791).abs() < 1e-6);
        assert!((r[Quantity::S(Part::Tr)] - 28.273834905963124).abs() < 1e-6);
        assert_eq!(thermo.zpe, 0.0);
        assert_eq!(thermo.vibrations, 0);
    }

    #[test]
    fn test_totals_are_sums() {
        let thermo = evaluate(&water()).unwrap().thermo;
        let m = &thermo.molar;
        assert!(close(m.totcl.f, m.elec.f + m.tr.f + m.rot.f + m.vibcl.f));
        assert!(close(m.totqm.s, m.elec.s + m.tr.s + m.rot.s + m.vibqm.s));
        assert!(close(m.totqm.lnq, m.elec.lnq + m.tr.lnq + m.rot.lnq + m.vibqm.lnq));
    }

    #[test]
    fn test_extensive_scaling_with_translational_correction() {
        let mut system = water();
        system.nmoles = 2.5;
        system.energy = -3.0;
        let thermo = evaluate(&system).unwrap().thermo;
        let n = 2.5;
        let (m, e) = (&thermo.molar, &thermo.extensive);
        for part in [Part::Elec, Part::Rot, Part::VibCl, Part::VibQm] {
            assert!(close(e.get(part).u, n * m.get(part).u));
            assert!(close(e.get(part).s, n * m.get(part).s));
            assert!(close(e.get(part).f, n * m.get(part).f));
        }
        assert!(close(e.tr.u, n * m.tr.u));
        assert!(close(e.tr.f, n * (m.tr.f - rt_kcal(300.0))));
        assert!(close(e.tr.s, n * (m.tr.s + gas_constant_cal())));
        // correction applied exactly once
        assert!(close(e.totcl.f - n * m.totcl.f, -n * rt_kcal(300.0)));
        assert!(close(e.totqm.s - n * m.totqm.s, n * gas_constant_cal()));
    }

    #[test]
    fn test_imaginary_mode_is_rejected_by_default() {
        let mut system = water();
        system.frequencies[1] = -250.0;
        let err = evaluate(&system).unwrap_err();
        assert_eq!(
            err,
            ThermoError::ImaginaryMode {
                mode: 2,
                frequency: -250.0
            }
        );
    }

    #[test]
    fn test_imaginary_mode_skip_policy() {
        let mut system = water();
        system.frequencies = vec![-250.0, 1595.0, 0.0, 3657.0, 3756.0];
        system.imaginary_modes = Some(ImaginaryModePolicy::Skip);
        let evaluation = evaluate(&system).unwrap();
        let reference = evaluate(&water()).unwrap().thermo;

        assert_eq!(evaluation.thermo.vibrations, 3);
        assert!(close(evaluation.thermo.zpe, reference.zpe));
        assert!(close(evaluation.thermo.molar.vibqm.f, reference.molar.vibqm.f));
        assert_eq!(evaluation.thermo.cumulative.per_mode_cl.len(), 3);
        assert_eq!(
            evaluation.warnings,
            vec![
                ThermoWarning::ModeSkipped { mode: 1, frequency: -250.0 },
                ThermoWarning::ModeSkipped { mode: 3, frequency: 0.0 },
            ]
        );
    }

    #[test]
    fn test_bin_overflow_is_a_warning() {
        let mut system = water();
        system.frequencies.push(4200.0);
        let evaluation = evaluate(&system).unwrap();
        assert_eq!(
            evaluation.warnings,
            vec![ThermoWarning::BinOverflow {
                mode: 4,
                frequency: 4200.0,
                bin: 3999
            }]
        );
        let c = &evaluation.thermo.cumulative;
        assert!(close(c.per_bin_cl.iter().sum(), c.per_mode_cl.iter().sum()));
    }

    #[test]
    fn test_invalid_input() {
        let mut system = water();
        system.temperature = -1.0;
        assert!(matches!(evaluate(&system), Err(ThermoError::InvalidInput(_))));

        let mut system = water();
        system.frequencies[0] = f64::NAN;
        assert!(matches!(evaluate(&system), Err(ThermoError::InvalidInput(_))));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let a = evaluate(&water()).unwrap();
        let b = evaluate(&water()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_solvation_enters_results() {
        let mut system = water();
        system.temperature = 298.15;
        system.solute = Solute {
            volume: Some(19.413),
            rgyr: Some(0.684),
            sasa: Some(68.813),
        };
        system.solvent = find_solvent("water");
        let thermo = evaluate(&system).unwrap().thermo;
        let r = thermo.results();
        assert!((r[Quantity::DsTr] - (-7.157078765298492)).abs() < 1e-8);
        assert!((r[Quantity::DsRot] - (-1.5277313239150754)).abs() < 1e-8);
        let solv = thermo.solvation.unwrap();
        assert!(close(r[Quantity::DsTot(CavityModel::Omega)], solv.total(CavityModel::Omega)));

        // no solvent, no solvation
        system.solvent = None;
        let r = evaluate(&system).unwrap().thermo.results();
        assert_eq!(r[Quantity::DsTr], 0.0);
    }

    #[test]
    fn test_solvation_failure_is_an_error() {
        let mut system = water();
        system.solute.volume = Some(-1.0);
        system.solvent = find_solvent("water");
        assert!(matches!(evaluate(&system), Err(ThermoError::Solvation(_))));
    }

    #[test]
    fn test_no_translations_still_counts_the_box() {
        let mut system = water();
        system.translations = 0;
        system.nmoles = 2.0;
        system.volume = 4.0;
        let thermo = evaluate(&system).unwrap().thermo;
        let tr = thermo.molar.tr;
        assert!(close(tr.lnq, (2.0f64 / AVOGADRO).ln()));
        assert_eq!(tr.u, 0.0);
        assert!(close(thermo.extensive.tr.f, 2.0 * (tr.f - rt_kcal(300.0))));
        assert!(close(thermo.molar.totqm.f, thermo.molar.elec.f + tr.f + thermo.molar.rot.f + thermo.molar.vibqm.f));
    }

    #[test]
    fn test_ignored_surface_area_is_a_warning() {
        let mut system = water();
        system.solute = Solute {
            volume: Some(19.413),
            rgyr: Some(0.684),
            sasa: Some(68.813),
        };
        let mut solvent = find_solvent("water").unwrap();
        solvent.bbox = 0.0;
        system.solvent = Some(solvent);
        let evaluation = evaluate(&system).unwrap();
        assert_eq!(evaluation.warnings, vec![ThermoWarning::SurfaceAreaIgnored { sasa: 68.813 }]);

        system.solvent = find_solvent("water");
        assert!(evaluate(&system).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_result_vector_layout() {
        let all = Quantity::all();
        assert_eq!(all.len(), Quantity::COUNT);
        for (i, q) in all.iter().enumerate() {
            assert_eq!(q.index(), i, "{:?}", q);
        }
        assert_eq!(Quantity::Fm(Part::TotQm).key(), "Fm_totqm");
        assert_eq!(Quantity::DsCav(CavityModel::EpsilonAlpha).key(), "dS_cav_eps_alpha");

        let thermo = evaluate(&water()).unwrap().thermo;
        let r = thermo.results();
        assert_eq!(r[Quantity::Zpe], thermo.zpe);
        assert_eq!(r[Quantity::U(Part::VibQm)], thermo.extensive.vibqm.u);
        assert_eq!(r.iter().count(), Quantity::COUNT);
    }
}
