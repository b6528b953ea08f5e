//! Human-readable and machine-readable reports.
//!
//! Every function returns a `String`; the caller decides where it goes.

use crate::kernel::{Part, Thermo, ThermoTable};
use crate::partition::Contribution;
use crate::solvation::CavityModel;
use crate::solvents::Solvent;
use crate::system::System;
use serde_json::{json, Map, Value};

const COLUMNS: &str = "            Elec      Trans        Rot      VibCl      VibQm      TotCl      TotQm\n";

fn table_row(label: &str, values: [f64; 7], unit: &str) -> String {
    let mut row = format!("{:>5}", label);
    for v in values {
        row.push_str(&format!(" {:>10.3}", v));
    }
    row.push_str(&format!(" {}\n", unit));
    row
}

fn table(t: &ThermoTable, temperature: f64, suffix: &str, energy_unit: &str, entropy_unit: &str) -> String {
    let pick = |f: fn(&Contribution) -> f64| -> [f64; 7] { Part::ALL.map(|p| f(t.get(p))) };
    let mut minus_ts = pick(|c| c.s).map(|s| -temperature * s / 1000.0);
    // electronic entropy is zero by construction
    minus_ts[0] = 0.0;

    let mut out = String::from(COLUMNS);
    out.push_str(&table_row(&format!("U{}", suffix), pick(|c| c.u), energy_unit));
    out.push_str(&table_row(&format!("S{}", suffix), pick(|c| c.s), entropy_unit));
    out.push_str(&table_row(&format!("-TS{}", suffix), minus_ts, energy_unit));
    out.push_str(&table_row(&format!("F{}", suffix), pick(|c| c.f), energy_unit));
    out
}

/// Echo of the parsed input of a system.
pub fn format_config(system: &System) -> String {
    let mut out = String::from("Parsed thermodynamic quantities:\n");
    out.push_str(&format!("   Temperature [K]:           {}\n", system.temperature));
    out.push_str(&format!("   Number of moles [mol]:     {}\n", system.nmoles));
    let volume = system.effective_volume();
    out.push_str(&format!("   Volume [dm^3]:             {}\n", volume));
    match system.pressure {
        Some(p) if p > 0.0 => out.push_str(&format!("   Pressure [atm]:            {}\n", p)),
        _ => out.push_str(&format!("   Concentration [M]:         {}\n", system.nmoles / volume)),
    }
    out.push_str(&format!("   Molecular mass [g/mol]:    {}\n", system.mass));
    out.push_str(&format!("   Molar energy [kcal/mol]:   {:.6}\n", system.energy));
    out.push_str("   Degrees of freedom:\n");
    out.push_str(&format!("      translational:          {}\n", system.translations));
    out.push_str(&format!("      rotational:             {}\n", system.rotations()));
    if !system.inertia.is_empty() {
        out.push_str("         moments of inertia [g/mol A^2]:\n");
        for i in &system.inertia {
            out.push_str(&format!("            {:.6}\n", i));
        }
    }
    out.push_str(&format!("         symmetry number:     {}\n", system.symmetry));
    out.push_str(&format!("      vibrational modes:      {}\n", system.vibrations()));
    if !system.frequencies.is_empty() {
        out.push_str("         frequencies [1/cm]:\n");
        for row in system.frequencies.chunks(6) {
            let line: Vec<String> = row.iter().map(|nu| format!("{:11.6}", nu)).collect();
            out.push_str(&line.join("  "));
            out.push('\n');
        }
    }
    out.push_str(&format!("   Imaginary modes:           {}\n", system.imaginary_policy()));

    if let Some(v) = system.solute.volume {
        out.push_str(&format!("   Solute vdw volume:         {}\n", v));
    }
    if let Some(r) = system.solute.rgyr {
        out.push_str(&format!("   Solute gyration radius:    {}\n", r));
    }
    if let Some(a) = system.solute.sasa {
        out.push_str(&format!("   Solute accessible surface: {}\n", a));
    }
    if let Some(solvent) = &system.solvent {
        out.push('\n');
        out.push_str(&format_solvent(solvent));
    }
    out
}

/// Description of a solvent.
pub fn format_solvent(solvent: &Solvent) -> String {
    let mut out = format!("Solvent:                 {}\n", solvent.name);
    out.push_str(&format!("   Molecular weight:     {} g/mol\n", solvent.mass));
    out.push_str(&format!("   Density:              {} g/ml\n", solvent.density));
    out.push_str(&format!("   Acentric factor:      {}\n", solvent.acentricity));
    out.push_str(&format!("   Permittivity:         {}\n", solvent.permittivity));
    out.push_str(&format!("   Isobaric expansion:   {} *1E-3 /K\n", solvent.expansion));
    out.push_str(&format!("   Gyration radius:      {} A\n", solvent.rgyr));
    out.push_str(&format!("   Bounding box area:    {} A^2\n", solvent.bbox));
    out.push_str(&format!("   Van der Waals volume: {} A^3\n", solvent.vvdw));
    out
}

/// Result tables of an evaluation.
///
/// With `molar_only` the extensive table is left out, as for reaction
/// differences.
pub fn format_thermo(thermo: &Thermo, molar_only: bool) -> String {
    let t = thermo.temperature;
    let mut out = String::new();
    if !molar_only {
        out.push_str("Extensive quantities:\n");
        out.push_str(&table(&thermo.extensive, t, "", "kcal", " cal/K"));
        out.push('\n');
    }
    out.push_str("Intensive (molar) quantities:\n");
    out.push_str(&table(&thermo.molar, t, "m", "kcal/mol", " cal/mol/K"));
    out.push('\n');

    out.push_str(&format!("Zero point vibrational energy:  {:10.3} kcal/mol\n", thermo.zpe));
    if thermo.qm_corr != 0.0 {
        out.push_str(&format!("Vibrational quantum correction: {:10.3} kcal/mol\n", thermo.qm_corr));
    }

    if let Some(solv) = &thermo.solvation {
        out.push_str("\nSolvation entropy [cal/mol/K]:\n");
        out.push_str(&format!("   dS_tr                  {:10.3}\n", solv.ds_tr));
        out.push_str(&format!("   dS_rot                 {:10.3}\n", solv.ds_rot));
        out.push_str("                          dS_cav    dS_solv  Fm_totcl+solv  Fm_totqm+solv\n");
        for model in CavityModel::ALL {
            out.push_str(&format!(
                "   {:<14} {:>14.3} {:>10.3} {:>14.3} {:>14.3}\n",
                model.to_string(),
                solv.cavity(model),
                solv.total(model),
                solv.corrected_free_energy(thermo.molar.totcl.f, t, model),
                solv.corrected_free_energy(thermo.molar.totqm.f, t, model),
            ));
        }
    }
    out
}

/// One `key = value` line per quantity of the result vector, in fixed order.
pub fn format_raw(thermo: &Thermo) -> String {
    thermo
        .results()
        .iter()
        .map(|(q, v)| format!("{} = {:.6}\n", q.key(), v))
        .collect()
}

/// Evaluation conditions and every quantity of one evaluation.
pub fn thermo_json(thermo: &Thermo) -> Value {
    let mut quantities = Map::new();
    for (q, v) in thermo.results().iter() {
        quantities.insert(q.key(), json!(v));
    }
    json!({
        "temperature": thermo.temperature,
        "nmoles": thermo.nmoles,
        "vibrations": thermo.vibrations,
        "quantities": Value::Object(quantities),
        "solvation": thermo.solvation,
    })
}

/// A single JSON document holding every labelled evaluation of a run, keyed
/// by label (`A`, `B`, `D`).
pub fn format_json(entries: &[(&str, &Thermo)]) -> serde_json::Result<String> {
    let doc: Map<String, Value> = entries
        .iter()
        .map(|(label, thermo)| (label.to_string(), thermo_json(thermo)))
        .collect();
    serde_json::to_string_pretty(&Value::Object(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{evaluate, Quantity};
    use crate::solvents::find_solvent;

    fn water() -> System {
        System {
            mass: 18.015,
            symmetry: 2,
            inertia: vec![0.6148, 1.1546, 1.7694],
            frequencies: vec![1595.0, 3657.0, 3756.0, 100.0, 200.0, 300.0, 400.0],
            ..System::default()
        }
    }

    #[test]
    fn test_config_echo() {
        let text = format_config(&water());
        assert!(text.contains("Temperature [K]:           300\n"));
        assert!(text.contains("Concentration [M]:         1\n"));
        assert!(text.contains("vibrational modes:      7"));
        // six frequencies per row
        let rows: Vec<&str> = text.lines().filter(|l| l.contains("1595.000000")).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].split_whitespace().count(), 6);
        assert!(!text.contains("Solvent:"));
    }

    #[test]
    fn test_config_with_pressure_and_solvent() {
        let mut s = water();
        s.pressure = Some(1.0);
        s.solvent = find_solvent("benzene");
        let text = format_config(&s);
        assert!(text.contains("Pressure [atm]:            1\n"));
        assert!(text.contains("Solvent:                 benzene"));
    }

    #[test]
    fn test_thermo_tables() {
        let thermo = evaluate(&water()).unwrap().thermo;
        let full = format_thermo(&thermo, false);
        assert!(full.starts_with("Extensive quantities:"));
        assert!(full.contains("Intensive (molar) quantities:"));
        assert!(full.contains("Zero point vibrational energy:"));
        assert!(!full.contains("quantum correction"));
        assert!(!full.contains("Solvation"));
        assert!(full.contains(&format!("{:>10.3}", thermo.molar.totqm.f)));

        let molar = format_thermo(&thermo, true);
        assert!(!molar.contains("Extensive"));
    }

    #[test]
    fn test_raw_output_is_complete() {
        let thermo = evaluate(&water()).unwrap().thermo;
        let raw = format_raw(&thermo);
        assert_eq!(raw.lines().count(), Quantity::COUNT);
        assert!(raw.lines().next().unwrap().starts_with("lnq_elec = "));
        assert!(raw.contains(&format!("ZPE = {:.6}\n", thermo.zpe)));
    }

    #[test]
    fn test_json_output() {
        let thermo = evaluate(&water()).unwrap().thermo;
        let text = format_json(&[("A", &thermo), ("B", &thermo)]).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["A"]["vibrations"], 7);
        let zpe = doc["B"]["quantities"]["ZPE"].as_f64().unwrap();
        assert!((zpe - thermo.zpe).abs() < 1e-12);
        assert!(doc["A"]["solvation"].is_null());
        assert_eq!(doc.as_object().unwrap().len(), 2);
    }
}
