//! Thermo Command-Line Interface
//!
//! Evaluates the thermodynamics of one or two molecules and, given the
//! stoichiometric coefficients, of the reaction `nA·A ⇌ nB·B`.
//!
//! # Examples
//!
//! ```bash
//! # Thermodynamics of a single molecule
//! thermo -A water.inp
//!
//! # Dimerisation 2 A -> B, with cumulative free energies and VDOS files
//! thermo -A water.inp -B dimer.inp -s 2:1 -c -d
//!
//! # Raw key = value output written to a file
//! thermo -A water.inp -r -o water.out
//!
//! # Write a configuration template to ./thermo_config.cfg
//! thermo --init-config
//! ```

use clap::Parser;
use log::{warn, LevelFilter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use thermo::kernel::{evaluate, Evaluation, Thermo};
use thermo::settings::{SettingsManager, CONFIG_FILE_NAME};
use thermo::system::{ImaginaryModePolicy, System};
use thermo::{io as datafiles, parser, reaction, report, spectrum};

/// Statistical thermodynamics of molecules in gas phase and solution
#[derive(Parser, Debug)]
#[command(name = "thermo", version, about, long_about = None)]
struct Cli {
    /// Input thermo file for the molecule A
    #[arg(short = 'A', value_name = "FILE")]
    a: Option<PathBuf>,

    /// Input thermo file for the molecule B
    #[arg(short = 'B', value_name = "FILE")]
    b: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Print results as raw key = value lines
    #[arg(short, long)]
    raw: bool,

    /// Stoichiometric coefficients of the reaction a A <-> b B
    #[arg(short, long = "stechio", value_name = "a:b", value_parser = parse_stoichiometry)]
    stechio: Option<(u32, u32)>,

    /// Write the cumulative vibrational free energies
    #[arg(short, long)]
    cumul: bool,

    /// Write the vibrational density of states
    #[arg(short = 'd', long)]
    vdos: bool,

    /// Bin width of the vibrational histograms in cm-1
    #[arg(short = 'n', long, value_name = "DNU")]
    dnu: Option<f64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Write a configuration template to ./thermo_config.cfg and exit
    #[arg(long)]
    init_config: bool,
}

fn parse_stoichiometry(s: &str) -> Result<(u32, u32), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("cannot find two coefficients in a:b form in '{}'", s))?;
    let parse = |x: &str| -> Result<u32, String> {
        x.trim()
            .parse()
            .map_err(|_| format!("invalid stoichiometric coefficient '{}'", x))
    };
    let (na, nb) = (parse(a)?, parse(b)?);
    if na < 1 || nb < 1 {
        return Err(format!("coefficients must be at least 1, got {}:{}", na, nb));
    }
    Ok((na, nb))
}

/// Output options resolved from the command line and the settings.
struct RunOptions {
    raw: bool,
    json: bool,
    cumul: bool,
    vdos: bool,
    dnu: f64,
    imaginary_modes: ImaginaryModePolicy,
    cumul_prefix: String,
    vdos_prefix: String,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the results; the level is set again once the settings are read
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Trace)
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .init();
    log::set_max_level(LevelFilter::Info);

    let manager = match SettingsManager::load() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    log::set_max_level(manager.logging().level_filter());

    if cli.init_config {
        let path = Path::new(CONFIG_FILE_NAME);
        match SettingsManager::create_template(path) {
            Ok(()) => {
                println!("Settings template created: {}", path.display());
                return;
            }
            Err(e) => {
                eprintln!("Error creating settings template: {}", e);
                process::exit(1);
            }
        }
    }

    if let Err(e) = run(&cli, &manager) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, manager: &SettingsManager) -> Result<(), Box<dyn std::error::Error>> {
    if cli.a.is_none() && cli.b.is_none() {
        return Err("neither A nor B was given (use -A and/or -B)".into());
    }

    let options = RunOptions {
        raw: cli.raw || manager.output().raw,
        json: cli.json,
        cumul: cli.cumul,
        vdos: cli.vdos,
        dnu: cli.dnu.unwrap_or(manager.general().dnu),
        imaginary_modes: manager.general().imaginary_modes,
        cumul_prefix: manager.output().cumul_prefix.clone(),
        vdos_prefix: manager.output().vdos_prefix.clone(),
    };

    let mut out: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    if !options.raw && !options.json {
        write!(out, "{}", banner())?;
    }

    // the molecule header is only useful in raw mode when a reaction follows
    let headers = !options.raw || cli.stechio.is_some();
    let a = match &cli.a {
        Some(path) => Some(run_molecule("A", path, &options, headers, &mut out)?),
        None => None,
    };
    let b = match &cli.b {
        Some(path) => Some(run_molecule("B", path, &options, headers, &mut out)?),
        None => None,
    };

    let d = match (&a, &b, cli.stechio) {
        (Some(a), Some(b), Some((na, nb))) => {
            let d = reaction::reaction_delta(a, b, na, nb)?;
            if !options.json {
                writeln!(out, "\nDifferences for the reaction {}A <-> {}B", na, nb)?;
                writeln!(out, "---------------------------------------------\n")?;
                if options.raw {
                    write!(out, "{}", report::format_raw(&d))?;
                } else {
                    write!(out, "{}", report::format_thermo(&d, true))?;
                }
            }
            if options.cumul {
                let prefix = format!("{}_D", options.cumul_prefix);
                datafiles::write_cumulative(&prefix, &spectrum::cumulative_report(&d.cumulative))?;
            }
            Some(d)
        }
        (_, _, Some(_)) => {
            warn!("Stoichiometric coefficients given but A and B are not both defined: no reaction computed");
            None
        }
        _ => None,
    };

    if options.json {
        let entries: Vec<(&str, &Thermo)> = [("A", a.as_ref()), ("B", b.as_ref()), ("D", d.as_ref())]
            .into_iter()
            .filter_map(|(label, thermo)| thermo.map(|t| (label, t)))
            .collect();
        writeln!(out, "{}", report::format_json(&entries)?)?;
    }

    out.flush()?;
    Ok(())
}

/// Reads the system of one molecule and applies the run-wide settings.
///
/// The bin width always comes from the run. The imaginary-mode policy of the
/// settings applies only when the input file does not choose one.
fn load_system(path: &Path, options: &RunOptions) -> Result<System, parser::ParseError> {
    let mut system = parser::parse_input(path)?;
    system.imaginary_modes.get_or_insert(options.imaginary_modes);
    system.dnu = options.dnu;
    Ok(system)
}

/// Parses, evaluates and reports one molecule.
fn run_molecule(
    label: &str,
    path: &Path,
    options: &RunOptions,
    header: bool,
    out: &mut dyn Write,
) -> Result<Thermo, Box<dyn std::error::Error>> {
    let system = load_system(path, options)?;

    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if header && !options.json {
        writeln!(out, "\nMolecule {}: <{}>", label, name)?;
        writeln!(out, "---------------------------------------------\n")?;
    }
    if !options.raw && !options.json {
        writeln!(out, "{}", report::format_config(&system))?;
    }

    let Evaluation { thermo, warnings } = evaluate(&system)?;
    for warning in &warnings {
        warn!("Molecule {}: {}", label, warning);
    }

    if options.raw && !options.json {
        write!(out, "{}", report::format_raw(&thermo))?;
    } else if !options.json {
        write!(out, "{}", report::format_thermo(&thermo, false))?;
    }

    if options.cumul {
        let prefix = format!("{}_{}", options.cumul_prefix, label);
        datafiles::write_cumulative(&prefix, &spectrum::cumulative_report(&thermo.cumulative))?;
    }
    if options.vdos {
        let vdos = spectrum::vdos(thermo.temperature, &thermo.cumulative.frequencies, system.dnu);
        let vdos_path = PathBuf::from(format!("{}_{}.dat", options.vdos_prefix, label));
        datafiles::write_vdos(&vdos_path, &vdos)?;
    }

    Ok(thermo)
}

fn banner() -> String {
    format!(
        "\n    Thermo {}\n    ==========\n\n\
         Statistical thermodynamics of molecules in gas phase and solution.\n\n",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stoichiometry() {
        assert_eq!(parse_stoichiometry("2:1"), Ok((2, 1)));
        assert_eq!(parse_stoichiometry(" 1 : 3 "), Ok((1, 3)));
        assert!(parse_stoichiometry("2").is_err());
        assert!(parse_stoichiometry("0:1").is_err());
        assert!(parse_stoichiometry("a:b").is_err());
    }

    fn options(imaginary_modes: ImaginaryModePolicy) -> RunOptions {
        RunOptions {
            raw: false,
            json: false,
            cumul: false,
            vdos: false,
            dnu: 2.0,
            imaginary_modes,
            cumul_prefix: "cumul".to_string(),
            vdos_prefix: "vdos".to_string(),
        }
    }

    #[test]
    fn test_input_policy_wins_over_settings() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.inp");
        std::fs::write(&explicit, "mass = 18.0\nimaginary = reject\nvibrations = 2\n-100.0\n500.0\n").unwrap();
        let system = load_system(&explicit, &options(ImaginaryModePolicy::Skip)).unwrap();
        assert_eq!(system.imaginary_modes, Some(ImaginaryModePolicy::Reject));
        assert_eq!(system.dnu, 2.0);
        assert!(matches!(
            evaluate(&system),
            Err(thermo::kernel::ThermoError::ImaginaryMode { mode: 1, .. })
        ));

        let implicit = dir.path().join("implicit.inp");
        std::fs::write(&implicit, "mass = 18.0\nvibrations = 2\n-100.0\n500.0\n").unwrap();
        let system = load_system(&implicit, &options(ImaginaryModePolicy::Skip)).unwrap();
        assert_eq!(system.imaginary_modes, Some(ImaginaryModePolicy::Skip));
        assert_eq!(evaluate(&system).unwrap().warnings.len(), 1);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["thermo", "-A", "a.inp", "-B", "b.inp", "-s", "2:1", "-c", "-d", "-n", "2.5"]).unwrap();
        assert_eq!(cli.a, Some(PathBuf::from("a.inp")));
        assert_eq!(cli.stechio, Some((2, 1)));
        assert!(cli.cumul && cli.vdos && !cli.raw);
        assert_eq!(cli.dnu, Some(2.5));
        assert!(Cli::try_parse_from(["thermo", "-s", "0:2"]).is_err());
    }
}
