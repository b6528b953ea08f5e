//! Data files of the spectral analysis.
//!
//! Cumulative vibrational free energies and the vibrational density of states
//! are written as whitespace separated columns with a `#` header line, ready
//! for plotting.

use crate::spectrum::{CumulativeReport, CumulativeRow, Vdos};
use log::info;
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

fn cumulative_content(header: &str, rows: &[CumulativeRow]) -> String {
    let mut content = format!("{}\n", header);
    for row in rows {
        content.push_str(&format!(
            "{:12.4}  {:14.8}  {:14.8}  {:14.8}\n",
            row.x, row.cumul_cl, row.cumul_qm, row.delta
        ));
    }
    content
}

/// Paths of the per-mode and per-bin cumulative files for `prefix`.
pub fn cumulative_paths(prefix: &str) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{}.k.dat", prefix)),
        PathBuf::from(format!("{}.f.dat", prefix)),
    )
}

/// Writes the cumulative vibrational free energies.
///
/// `<prefix>.k.dat` holds the running sums over modes in input order, with
/// the mode frequency in the first column. `<prefix>.f.dat` holds the running
/// sums over the frequency grid, with the lower bin edge in the first column.
/// The remaining columns are the classical and quantum cumulative free
/// energies (kcal/mol) and their difference.
///
/// # Examples
///
/// ```no_run
/// use thermo::{io, spectrum::cumulative_report};
/// # fn run(thermo: &thermo::kernel::Thermo) -> std::io::Result<()> {
/// io::write_cumulative("cumul_A", &cumulative_report(&thermo.cumulative))?;
/// # Ok(())
/// # }
/// ```
pub fn write_cumulative(prefix: &str, report: &CumulativeReport) -> Result<()> {
    let (per_mode_path, per_bin_path) = cumulative_paths(prefix);
    fs::write(
        &per_mode_path,
        cumulative_content("#freq  cumul_cl  cumul_qm  delta", &report.per_mode),
    )?;
    fs::write(
        &per_bin_path,
        cumulative_content("#freq  cumul_cl  cumul_qm  delta", &report.per_bin),
    )?;
    info!(
        "Cumulative free energies written to {} and {}",
        per_mode_path.display(),
        per_bin_path.display()
    );
    Ok(())
}

/// Writes the VDOS with its per-bin and cumulative free energy.
pub fn write_vdos(path: &Path, vdos: &Vdos) -> Result<()> {
    let mut content = String::from("#freq  vdos  F  Ftot\n");
    for (((nu, density), f), ftot) in vdos
        .grid
        .iter()
        .zip(&vdos.density)
        .zip(&vdos.free_energy)
        .zip(&vdos.cumulative)
    {
        content.push_str(&format!("{:12.4}  {:14.8}  {:14.8}  {:14.8}\n", nu, density, f, ftot));
    }
    fs::write(path, content)?;
    info!("VDOS written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{cumulative_report, vdos, VibrationalCumulative};
    use tempfile::tempdir;

    fn columns(line: &str) -> Vec<f64> {
        line.split_whitespace().map(|t| t.parse().unwrap()).collect()
    }

    #[test]
    fn test_write_cumulative() {
        let mut c = VibrationalCumulative::new(10.0);
        for f in [500.0, 100.0, 1500.0] {
            c.deposit(300.0, f);
        }
        let report = cumulative_report(&c);

        let dir = tempdir().unwrap();
        let prefix = dir.path().join("cumul_A");
        let prefix = prefix.to_str().unwrap();
        write_cumulative(prefix, &report).unwrap();

        let (k_path, f_path) = cumulative_paths(prefix);
        let per_mode = fs::read_to_string(k_path).unwrap();
        let lines: Vec<&str> = per_mode.lines().collect();
        assert_eq!(lines[0], "#freq  cumul_cl  cumul_qm  delta");
        assert_eq!(lines.len(), 4);
        // input order is kept
        assert_eq!(columns(lines[1])[0], 500.0);
        assert_eq!(columns(lines[2])[0], 100.0);
        let last = columns(lines[3]);
        assert!((last[1] - report.per_mode[2].cumul_cl).abs() < 1e-7);
        assert!((last[3] - (last[2] - last[1])).abs() < 1e-7);

        let per_bin = fs::read_to_string(f_path).unwrap();
        assert_eq!(per_bin.lines().count(), 1 + c.nbins());
    }

    #[test]
    fn test_write_vdos() {
        let v = vdos(300.0, &[100.0, 200.0], 4.0);
        let dir = tempdir().unwrap();
        let path = dir.path().join("vdos_A.dat");
        write_vdos(&path, &v).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("#freq  vdos  F  Ftot"));
        let rows: Vec<Vec<f64>> = lines.map(columns).collect();
        assert_eq!(rows.len(), 1000);
        assert_eq!(rows[25][0], 100.0);
        let total: f64 = rows.iter().map(|r| r[1]).sum();
        assert!((total - 2.0).abs() < 1e-5);
    }
}
