//! Input file parsing.
//!
//! A system is described by a plain-text file of `key = value` lines. Blank
//! lines and `#` comments are ignored and keys are case insensitive.
//!
//! # Input File Format
//!
//! ```text
//! # water vapour at room temperature
//! temperature = 298.15
//! nmoles      = 1
//! pressure    = 1          # atm, overrides volume
//! mass        = 18.015
//! translations = 3
//! sigma       = 2
//! energy      = 0.0
//! rotations   = 3 unit=amu
//! 0.6148
//! 1.1546
//! 1.7694
//! vibrations  = 3
//! 1595.0
//! 3657.0
//! 3756.0
//! ```
//!
//! ## Core keys
//!
//! Matched on their first four characters, so `temp` and `temperature` are
//! the same key:
//!
//! - `temperature` (K), `nmoles` (mol), `volume` (L), `mass` (g/mol),
//!   `energy` (kcal/mol)
//! - `translations`, `sigma` (symmetry number)
//! - `rotations = r [unit=amu|K|cm-1]` followed by r moments of inertia,
//!   rotational temperatures or rotational constants
//! - `vibrations = v [unit=cm-1|K]` followed by v frequencies or vibrational
//!   temperatures
//! - `hessian = file`: CHARMM Hessian from which the frequencies are derived
//!
//! ## Additional keys
//!
//! - `pressure` (atm) and `concentration` (mol/L), which replace `volume`
//! - `imaginary = reject|skip`
//! - solute descriptors `solute_volume` (Å³), `rgyr` (Å), `sasa` (Å²)
//! - `solvent = name` from the reference table, and the per-property keys
//!   `solvent_mass`, `solvent_density`, `solvent_acentricity`,
//!   `solvent_permittivity`, `solvent_expansion`, `solvent_bbox`,
//!   `solvent_volume`, `solvent_rgyr` which override the table values
//!
//! # Examples
//!
//! ```
//! use thermo::parser::parse_str;
//!
//! let system = parse_str("temperature = 310\nmass = 4.0026\n", None).unwrap();
//! assert_eq!(system.temperature, 310.0);
//! assert!(system.inertia.is_empty());
//! ```

use crate::hessian::{self, HessianError};
use crate::solvents::{find_solvent, solvent_names, Solvent};
use crate::system::System;
use crate::units;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for parsing operations.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error when reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed value, with a descriptive message
    #[error("Parse error: {0}")]
    Parse(String),
    /// Key not recognised
    #[error("Unknown keyword <{0}>")]
    UnknownKeyword(String),
    /// Key given without a value
    #[error("Missing value for key <{0}>")]
    MissingValue(String),
    /// Failure while reading the Hessian referenced by the input
    #[error(transparent)]
    Hessian(#[from] HessianError),
}

/// Type alias for parse operation results
pub type Result<T> = std::result::Result<T, ParseError>;

lazy_static! {
    static ref UNIT_RE: Regex = Regex::new(r"(?i)\bunit\s*=\s*(\S+)").unwrap();
}

/// Units accepted after `rotations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RotationUnit {
    Amu,
    Kelvin,
    Wavenumber,
}

/// Units accepted after `vibrations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VibrationUnit {
    Wavenumber,
    Kelvin,
}

fn unit_of(value: &str) -> Option<String> {
    UNIT_RE.captures(value).map(|c| c[1].to_lowercase())
}

fn rotation_unit(value: &str) -> Result<RotationUnit> {
    match unit_of(value).as_deref() {
        None | Some("amu") => Ok(RotationUnit::Amu),
        Some("k") => Ok(RotationUnit::Kelvin),
        Some("cm-1") => Ok(RotationUnit::Wavenumber),
        Some(other) => Err(ParseError::Parse(format!(
            "Unknown unit '{}' for rotations (expected amu, K or cm-1)",
            other
        ))),
    }
}

fn vibration_unit(value: &str) -> Result<VibrationUnit> {
    match unit_of(value).as_deref() {
        None | Some("cm-1") => Ok(VibrationUnit::Wavenumber),
        Some("k") => Ok(VibrationUnit::Kelvin),
        Some(other) => Err(ParseError::Parse(format!(
            "Unknown unit '{}' for vibrations (expected cm-1 or K)",
            other
        ))),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// First whitespace-separated token of `value` parsed as `T`.
fn parse_value<T: std::str::FromStr>(key: &str, value: &str, lineno: usize) -> Result<T> {
    let token = value
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::MissingValue(key.to_string()))?;
    token
        .parse()
        .map_err(|_| ParseError::Parse(format!("line {}: invalid value <{}> for key <{}>", lineno, token, key)))
}

/// Core keys are recognised by their first four characters.
fn is_core_key(key: &str, name: &str) -> bool {
    matches!((key.get(..4), name.get(..4)), (Some(a), Some(b)) if a == b)
}

/// Reads `count` numbers, one per non-blank line, following a vector key.
fn read_block<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    count: usize,
    what: &str,
) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let (lineno, raw) = lines.next().ok_or_else(|| {
            ParseError::Parse(format!(
                "Impossible to read {} #{} (expected {})",
                what,
                values.len() + 1,
                count
            ))
        })?;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        values.push(parse_value(what, line, lineno)?);
    }
    Ok(values)
}

const SOLVENT_PROPERTIES: [&str; 8] = [
    "mass",
    "density",
    "acentricity",
    "permittivity",
    "expansion",
    "bbox",
    "volume",
    "rgyr",
];

fn set_solvent_property(solvent: &mut Solvent, property: &str, value: f64) {
    match property {
        "mass" => solvent.mass = value,
        "density" => solvent.density = value,
        "acentricity" => solvent.acentricity = value,
        "permittivity" => solvent.permittivity = value,
        "expansion" => solvent.expansion = value,
        "bbox" => solvent.bbox = value,
        "volume" => solvent.vvdw = value,
        "rgyr" => solvent.rgyr = value,
        _ => {}
    }
}

/// Parses the content of an input file.
///
/// # Arguments
///
/// * `content` - Text of the input file
/// * `base_dir` - Directory against which a relative `hessian` path is
///   resolved; `None` keeps the path as written
///
/// # Returns
///
/// The [`System`] described by the file. The Hessian, if any, is only
/// recorded, not read; see [`parse_input`].
pub fn parse_str(content: &str, base_dir: Option<&Path>) -> Result<System> {
    let mut system = System::default();
    let mut solvent_overrides: Vec<(String, f64)> = Vec::new();

    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));
    while let Some((lineno, raw)) = lines.next() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some((k, v)) => (k.trim().to_lowercase(), v.trim()),
            None => {
                return Err(ParseError::Parse(format!(
                    "line {}: expected 'key = value', got <{}>",
                    lineno, line
                )))
            }
        };
        if value.is_empty() {
            return Err(ParseError::MissingValue(key));
        }
        debug!("line {}: {} = {}", lineno, key, value);

        match key.as_str() {
            "pressure" => system.pressure = Some(parse_value(&key, value, lineno)?),
            "concentration" => system.concentration = Some(parse_value(&key, value, lineno)?),
            "solute_volume" => system.solute.volume = Some(parse_value(&key, value, lineno)?),
            "rgyr" => system.solute.rgyr = Some(parse_value(&key, value, lineno)?),
            "sasa" => system.solute.sasa = Some(parse_value(&key, value, lineno)?),
            "imaginary" => {
                system.imaginary_modes = Some(
                    value
                        .parse()
                        .map_err(|e: String| ParseError::Parse(format!("line {}: {}", lineno, e)))?,
                )
            }
            "solvent" => {
                let solvent = find_solvent(value).ok_or_else(|| {
                    ParseError::Parse(format!(
                        "line {}: unknown solvent '{}' (known solvents: {})",
                        lineno,
                        value,
                        solvent_names().join(", ")
                    ))
                })?;
                system.solvent = Some(solvent);
            }
            k if k.starts_with("solvent_") => {
                let property = &k["solvent_".len()..];
                if !SOLVENT_PROPERTIES.contains(&property) {
                    return Err(ParseError::UnknownKeyword(key.clone()));
                }
                let number: f64 = parse_value(&key, value, lineno)?;
                solvent_overrides.push((property.to_string(), number));
            }
            k if is_core_key(k, "temperature") => system.temperature = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "nmoles") => system.nmoles = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "volume") => system.volume = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "mass") => system.mass = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "translations") => system.translations = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "sigma") => system.symmetry = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "energy") => system.energy = parse_value(&key, value, lineno)?,
            k if is_core_key(k, "rotations") => {
                let count: usize = parse_value(&key, value, lineno)?;
                let unit = rotation_unit(value)?;
                let values = read_block(&mut lines, count, "inertia moment")?;
                system.inertia = values
                    .into_iter()
                    .map(|x| match unit {
                        RotationUnit::Amu => x,
                        RotationUnit::Kelvin => units::kelvin_to_inertia(x),
                        RotationUnit::Wavenumber => units::rotational_constant_to_inertia(x),
                    })
                    .collect();
            }
            k if is_core_key(k, "vibrations") => {
                let count: usize = parse_value(&key, value, lineno)?;
                let unit = vibration_unit(value)?;
                let values = read_block(&mut lines, count, "vibration")?;
                system.frequencies = values
                    .into_iter()
                    .map(|x| match unit {
                        VibrationUnit::Wavenumber => x,
                        VibrationUnit::Kelvin => units::kelvin_to_wavenumber(x),
                    })
                    .collect();
            }
            k if is_core_key(k, "hessian") => {
                let file: String = parse_value(&key, value, lineno)?;
                let path = Path::new(&file);
                system.hessian_file = Some(match base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.to_path_buf(),
                });
            }
            _ => return Err(ParseError::UnknownKeyword(key.clone())),
        }
    }

    if !solvent_overrides.is_empty() {
        let solvent = system.solvent.get_or_insert_with(Solvent::custom);
        for (property, value) in &solvent_overrides {
            set_solvent_property(solvent, property, *value);
        }
    }

    Ok(system)
}

/// Replaces the frequencies of `system` with those of its Hessian file.
///
/// The `t + r` lowest eigenvalues are dropped. Does nothing when the system
/// has no Hessian file.
pub fn apply_hessian(system: &mut System) -> Result<()> {
    let Some(path) = system.hessian_file.clone() else {
        return Ok(());
    };
    let hessian = hessian::read_charmm_hessian(&path)?;
    let skip = system.translations as usize + system.rotations();
    let freqs = hessian::frequencies(&hessian, skip)?;
    if !system.frequencies.is_empty() {
        warn!(
            "Replacing {} vibrations given in the input with {} from {}",
            system.frequencies.len(),
            freqs.len(),
            path.display()
        );
    }
    system.frequencies = freqs;
    Ok(())
}

/// Parses an input file and, when it names a Hessian, derives the
/// vibrational frequencies from it.
///
/// # Examples
///
/// ```no_run
/// use thermo::parser::parse_input;
/// use std::path::Path;
///
/// let system = parse_input(Path::new("water.inp"))?;
/// println!("{} vibrations", system.vibrations());
/// # Ok::<(), thermo::parser::ParseError>(())
/// ```
pub fn parse_input(path: &Path) -> Result<System> {
    info!("Reading input file {}", path.display());
    let content = fs::read_to_string(path)?;
    let mut system = parse_str(&content, path.parent())?;
    apply_hessian(&mut system)?;
    Ok(system)
}
