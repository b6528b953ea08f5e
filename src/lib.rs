#![deny(missing_docs)]

//! Thermo - Statistical Thermodynamics of Molecules in Gas Phase and Solution
//!
//! Thermo computes the thermodynamic functions of a molecule from a handful
//! of molecular properties: temperature, mass, moments of inertia,
//! vibrational frequencies and electronic energy. Every degree of freedom is
//! treated in its textbook approximation:
//!
//! - **Translations**: particle in a box, with the volume given directly, by
//!   concentration or by pressure (ideal gas)
//! - **Rotations**: classical rigid rotor, linear or non-linear
//! - **Vibrations**: harmonic oscillators, both classical and quantum
//! - **Electronic**: single ground state of the given energy
//!
//! Internal energy U, entropy S and Helmholtz free energy F are reported per
//! mole and for the amount of substance in the box.
//!
//! # Features
//!
//! - **Solvation entropy**: scaled-particle-theory estimate of the
//!   translational, rotational and cavity entropy lost on solvation, with
//!   three cavity models and a table of 32 common solvents
//! - **Reactions**: differences `nB·B − nA·A` between two molecules
//! - **Spectral analysis**: cumulative vibrational free energy and smoothed
//!   vibrational density of states over a frequency grid
//! - **Hessian input**: frequencies from a CHARMM second-derivative file
//! - **Reports**: text tables, raw `key = value` lines and JSON
//!
//! # Quick Start
//!
//! ```no_run
//! use thermo::kernel::evaluate;
//! use thermo::parser::parse_input;
//! use thermo::report::format_thermo;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = parse_input(Path::new("water.inp"))?;
//!     let evaluation = evaluate(&system)?;
//!     print!("{}", format_thermo(&evaluation.thermo, false));
//!     Ok(())
//! }
//! ```
//!
//! # Input File Format
//!
//! ```text
//! temperature = 298.15
//! concentration = 1.0
//! mass = 18.015
//! sigma = 2
//! energy = 0.0
//! rotations = 3
//! 0.6148
//! 1.1546
//! 1.7694
//! vibrations = 3
//! 1595.0
//! 3657.0
//! 3756.0
//! ```
//!
//! See [`parser`] for the complete list of keywords.
//!
//! # Units
//!
//! Energies are in kcal/mol, entropies in cal/(mol·K), frequencies in cm⁻¹,
//! moments of inertia in g/mol·Å², volumes in L and temperatures in K.

pub mod hessian;
pub mod io;
pub mod kernel;
pub mod parser;
pub mod partition;
pub mod reaction;
pub mod report;
pub mod settings;
pub mod solvation;
pub mod solvents;
pub mod spectrum;
pub mod system;
pub mod units;
