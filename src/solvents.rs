//! Reference table of common solvents.
//!
//! Data from A. J. Garza, "Solvation Entropy Made Simple", J. Chem. Theory
//! Comput. 2019. Geometric descriptors (bounding-box area, van der Waals
//! volume, radius of gyration) were computed on optimized 3D models.

use serde::{Deserialize, Serialize};

/// Physical and geometric description of a solvent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solvent {
    /// Solvent name (lowercase, underscores instead of spaces)
    pub name: String,
    /// Molar mass in g/mol
    pub mass: f64,
    /// Liquid density in g/mL
    pub density: f64,
    /// Acentric factor
    pub acentricity: f64,
    /// Relative permittivity
    pub permittivity: f64,
    /// Isobaric thermal expansion coefficient in 1E-3/K
    pub expansion: f64,
    /// Area of the minimum bounding box in Å²
    pub bbox: f64,
    /// Van der Waals volume in Å³
    pub vvdw: f64,
    /// Radius of gyration in Å
    pub rgyr: f64,
}

impl Solvent {
    /// An unnamed solvent with every property set to zero, to be filled in
    /// field by field from an input file.
    pub fn custom() -> Self {
        Self {
            name: "custom".to_string(),
            mass: 0.0,
            density: 0.0,
            acentricity: 0.0,
            permittivity: 0.0,
            expansion: 0.0,
            bbox: 0.0,
            vvdw: 0.0,
            rgyr: 0.0,
        }
    }
}

struct Entry {
    name: &'static str,
    density: f64,
    acentricity: f64,
    permittivity: f64,
    expansion: f64,
    mass: f64,
    bbox: f64,
    vvdw: f64,
    rgyr: f64,
}

macro_rules! solvent {
    ($name:expr, $dens:expr, $acen:expr, $perm:expr, $exp:expr, $mass:expr, $bbox:expr, $vvdw:expr, $rgyr:expr) => {
        Entry {
            name: $name,
            density: $dens,
            acentricity: $acen,
            permittivity: $perm,
            expansion: $exp,
            mass: $mass,
            bbox: $bbox,
            vvdw: $vvdw,
            rgyr: $rgyr,
        }
    };
}

#[rustfmt::skip]
const SOLVENTS: &[Entry] = &[
    //       name               density acentric perm    expans  mass     bbox     vvdw     rgyr
    solvent!("ethylene",        0.570,  0.089,   1.000,  2.400,  28.053,  101.392, 39.674,  1.315),
    solvent!("iodine",          3.960,  0.229,   4.000,  0.000,  253.809, 134.764, 58.904,  1.226),
    solvent!("cyclohexane",     0.778,  0.212,   2.000,  1.210,  84.160,  228.762, 100.710, 2.039),
    solvent!("benzene",         0.880,  0.212,   2.300,  1.250,  78.112,  199.623, 83.444,  2.013),
    solvent!("toluene",         0.867,  0.263,   2.400,  1.080,  92.139,  233.693, 100.262, 2.303),
    solvent!("m-xylene",        0.860,  0.325,   2.400,  0.990,  106.166, 264.478, 116.810, 2.568),
    solvent!("o-xylene",        0.880,  0.310,   2.600,  0.000,  106.166, 246.536, 116.701, 2.451),
    solvent!("pentane",         0.626,  0.251,   1.400,  1.580,  72.149,  208.747, 95.308,  2.325),
    solvent!("isopentane",      0.616,  0.227,   1.800,  0.000,  72.149,  229.972, 95.292,  2.100),
    solvent!("hexane",          0.660,  0.299,   1.900,  1.410,  86.176,  233.592, 112.064, 2.662),
    solvent!("octane",          0.703,  0.398,   2.000,  1.140,  114.229, 287.002, 145.610, 3.346),
    solvent!("chloroform",      1.490,  0.218,   4.800,  1.270,  119.378, 196.352, 75.822,  1.452),
    solvent!("dioxane",         0.796,  0.307,   2.300,  1.120,  88.106,  179.114, 85.513,  1.898),
    solvent!("acetaldehyde",    0.788,  0.303,   21.100, 1.690,  44.053,  126.436, 47.858,  1.390),
    solvent!("acetone",         0.784,  0.304,   20.700, 1.430,  58.079,  159.069, 64.454,  1.721),
    solvent!("ethyl_acetate",   0.810,  0.329,   6.000,  1.380,  88.106,  220.449, 89.664,  2.355),
    solvent!("acetic_acid",     1.050,  0.447,   6.200,  1.100,  60.052,  145.735, 55.674,  1.578),
    solvent!("acetonitrile",    0.786,  0.278,   37.500, 1.360,  41.052,  126.689, 45.678,  1.365),
    solvent!("dimethyl_ether",  0.740,  0.200,   5.300,  0.000,  46.069,  145.924, 53.961,  1.609),
    solvent!("diethyl_ether",   0.713,  0.281,   4.300,  1.600,  74.122,  205.264, 87.340,  2.329),
    solvent!("helium",          0.130,  -0.365,  1.100,  -1.490, 4.003,   47.040,  11.511,  0.000),
    solvent!("neon",            1.210,  -0.029,  1.500,  15.400, 20.180,  56.918,  15.291,  0.000),
    solvent!("argon",           1.400,  0.001,   1.500,  4.800,  39.948,  84.826,  27.830,  0.000),
    solvent!("krypton",         2.410,  0.005,   1.700,  0.000,  83.798,  97.930,  34.464,  0.000),
    solvent!("xenon",           2.940,  0.008,   1.900,  0.000,  131.294, 111.974, 42.272,  0.000),
    solvent!("water",           1.000,  0.344,   78.500, 0.210,  18.015,  68.813,  19.413,  0.684),
    solvent!("methanol",        0.796,  0.556,   32.600, 1.090,  32.042,  107.024, 36.757,  1.192),
    solvent!("ethanol",         0.796,  0.644,   24.600, 1.090,  46.069,  144.540, 53.478,  1.558),
    solvent!("propanol",        0.803,  0.623,   20.100, 0.790,  60.095,  174.781, 70.182,  1.858),
    solvent!("isopropanol",     0.786,  0.665,   17.900, 0.000,  60.095,  174.969, 70.064,  1.763),
    solvent!("butanol",         0.810,  0.593,   17.800, 0.750,  74.122,  199.101, 86.981,  2.179),
    solvent!("isobutanol",      0.802,  0.592,   17.300, 0.940,  74.122,  214.029, 87.020,  1.992),
];

impl From<&Entry> for Solvent {
    fn from(e: &Entry) -> Self {
        Self {
            name: e.name.to_string(),
            mass: e.mass,
            density: e.density,
            acentricity: e.acentricity,
            permittivity: e.permittivity,
            expansion: e.expansion,
            bbox: e.bbox,
            vvdw: e.vvdw,
            rgyr: e.rgyr,
        }
    }
}

/// Look up a solvent by name (case insensitive; spaces and dashes are
/// accepted in place of underscores).
pub fn find_solvent(name: &str) -> Option<Solvent> {
    let wanted = name.trim().to_lowercase().replace(' ', "_");
    SOLVENTS
        .iter()
        .find(|e| e.name == wanted || e.name == wanted.replace('-', "_"))
        .map(Solvent::from)
}

/// Names of all tabulated solvents, in table order.
pub fn solvent_names() -> Vec<&'static str> {
    SOLVENTS.iter().map(|e| e.name).collect()
}
