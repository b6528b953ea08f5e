use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const WATER: &str = "\
temperature = 298.15
mass = 18.015
sigma = 2
rotations = 3
0.6148
1.1546
1.7694
vibrations = 3
1595.0
3657.0
3756.0
";

/// Runs the binary inside `dir`, away from any user configuration.
fn thermo(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_thermo"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("APPDATA", dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_json_stdout_is_a_single_document() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("w.inp"), WATER).unwrap();
    fs::write(dir.path().join("d.inp"), WATER).unwrap();

    let output = thermo(dir.path(), &["-A", "w.inp", "-B", "d.inp", "-s", "1:1", "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(doc["A"]["quantities"]["Fm_totqm"].is_number());
    assert_eq!(doc["D"]["quantities"]["Fm_totqm"].as_f64(), Some(0.0));

    // logging still happens, on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration loaded from"), "{}", stderr);
}

#[test]
fn test_raw_stdout_has_only_results() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("w.inp"), WATER).unwrap();
    let output = thermo(dir.path(), &["-A", "w.inp", "-r"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().all(|l| l.contains(" = ")), "{}", stdout);
}

#[test]
fn test_broken_configuration_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("w.inp"), WATER).unwrap();
    fs::write(dir.path().join("thermo_config.cfg"), "[general]\ndnu = -1\n").unwrap();
    let output = thermo(dir.path(), &["-A", "w.inp", "-r"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "{}", stderr);
}

#[test]
fn test_explicit_reject_beats_configuration() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("thermo_config.cfg"), "[general]\nimaginary_modes = skip\n").unwrap();
    fs::write(dir.path().join("ts.inp"), "mass = 18.0\nimaginary = reject\nvibrations = 2\n-100.0\n500.0\n").unwrap();
    fs::write(dir.path().join("plain.inp"), "mass = 18.0\nvibrations = 2\n-100.0\n500.0\n").unwrap();

    let rejected = thermo(dir.path(), &["-A", "ts.inp", "-r"]);
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("non-positive frequency"));

    let skipped = thermo(dir.path(), &["-A", "plain.inp", "-r"]);
    assert!(skipped.status.success());
    assert!(String::from_utf8_lossy(&skipped.stderr).contains("Skipping mode 1"));
}
