//! Vibrational frequencies from a Cartesian Hessian.
//!
//! The Hessian is read from the CHARMM second-derivative text format
//! (`VIBRAN WRITE SECOND CARD`): whitespace separated numbers giving the
//! number of atoms N, the energy, the 3N gradient components and the upper
//! triangle of the 3N×3N mass-weighted Hessian, row by row. Energy and
//! gradient are discarded.
//!
//! [`frequencies`] diagonalises the matrix, drops the lowest `t + r`
//! eigenvalues (overall translations and rotations) and converts the rest to
//! wavenumbers. Negative eigenvalues give negative frequencies, which stand
//! for imaginary modes.

use log::{debug, info};
use nalgebra::{DMatrix, SymmetricEigen};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Eigenvalue (kcal/mol/Å²/amu) to wavenumber (cm⁻¹) conversion factor.
pub const EIGENVALUE_TO_WAVENUMBER: f64 = 2045.5 / (2.99793 * 6.28319);

/// Errors raised while reading or diagonalising a Hessian.
#[derive(Error, Debug)]
pub enum HessianError {
    /// I/O error when reading the Hessian file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Missing or malformed number
    #[error("Hessian parse error: {0}")]
    Parse(String),
    /// Fewer than two atoms
    #[error("Number of atoms = {0} (at least 2 are required)")]
    TooFewAtoms(usize),
    /// More eigenvalues to skip than the matrix has
    #[error("Cannot skip {skip} of {total} degrees of freedom")]
    DegreesOfFreedom {
        /// Eigenvalues requested to be skipped
        skip: usize,
        /// Size of the matrix, 3N
        total: usize,
    },
}

/// Type alias for Hessian operation results
pub type Result<T> = std::result::Result<T, HessianError>;

/// Symmetric Cartesian Hessian of a molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Hessian {
    /// Number of atoms N
    pub natoms: usize,
    /// 3N×3N symmetric matrix
    pub matrix: DMatrix<f64>,
}

impl Hessian {
    /// Number of Cartesian degrees of freedom, 3N.
    pub fn dof(&self) -> usize {
        3 * self.natoms
    }
}

fn next_number<'a>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<f64> {
    let token = tokens
        .next()
        .ok_or_else(|| HessianError::Parse(format!("Unexpected end of file while reading {}", what)))?;
    // Fortran writers may use D exponents
    token
        .replace(['D', 'd'], "E")
        .parse()
        .map_err(|_| HessianError::Parse(format!("Invalid number '{}' for {}", token, what)))
}

/// Parses a Hessian in CHARMM text format.
pub fn parse_charmm_hessian(content: &str) -> Result<Hessian> {
    let mut tokens = content.split_whitespace();

    let natoms_token = tokens
        .next()
        .ok_or_else(|| HessianError::Parse("No number of atoms read".to_string()))?;
    let natoms: usize = natoms_token
        .parse()
        .map_err(|_| HessianError::Parse(format!("Invalid number of atoms '{}'", natoms_token)))?;
    if natoms < 2 {
        return Err(HessianError::TooFewAtoms(natoms));
    }
    let n3 = 3 * natoms;

    next_number(&mut tokens, "the energy")?;
    for i in 0..n3 {
        next_number(&mut tokens, &format!("gradient component {}", i + 1))?;
    }

    let mut matrix = DMatrix::zeros(n3, n3);
    for i in 0..n3 {
        for j in i..n3 {
            let value = next_number(&mut tokens, &format!("Hessian element ({}, {})", i + 1, j + 1))?;
            matrix[(i, j)] = value;
            matrix[(j, i)] = value;
        }
    }

    Ok(Hessian { natoms, matrix })
}

/// Reads a Hessian file in CHARMM text format.
pub fn read_charmm_hessian(path: &Path) -> Result<Hessian> {
    debug!("Reading Hessian from {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_charmm_hessian(&content)
}

/// Vibrational frequencies (cm⁻¹, ascending) of `hessian`, skipping the
/// `skip` lowest eigenvalues.
pub fn frequencies(hessian: &Hessian, skip: usize) -> Result<Vec<f64>> {
    let total = hessian.dof();
    if skip > total {
        return Err(HessianError::DegreesOfFreedom { skip, total });
    }

    let eigen = SymmetricEigen::new(hessian.matrix.clone());
    let mut eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    eigenvalues.sort_by(|a, b| a.total_cmp(b));

    info!("Number of atoms: {}", hessian.natoms);
    info!("Total number of degrees of freedom: {}", total);
    info!("Skipping {} for translations and rotations", skip);
    info!("Obtained {} vibrational modes", total - skip);

    Ok(eigenvalues[skip..]
        .iter()
        .map(|&lambda| lambda.signum() * lambda.abs().sqrt() * EIGENVALUE_TO_WAVENUMBER)
        .collect())
}
