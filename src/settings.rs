//! Configuration management.
//!
//! Program defaults can be changed through INI-format configuration files,
//! looked up with the following precedence:
//!
//! 1. Local configuration (`./thermo_config.cfg`)
//! 2. User configuration (`~/.config/thermo/thermo_config.cfg`)
//! 3. System configuration (`/etc/thermo/thermo_config.cfg`)
//! 4. Built-in defaults
//!
//! Command-line options override whatever the files say.
//!
//! # Configuration File Format
//!
//! ```ini
//! [general]
//! dnu = 1.0
//! imaginary_modes = reject
//!
//! [logging]
//! level = info
//!
//! [output]
//! raw = false
//! cumul_prefix = cumul
//! vdos_prefix = vdos
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use thermo::settings::SettingsManager;
//!
//! let settings = SettingsManager::load()?;
//! println!("Histogram bin width: {}", settings.general().dnu);
//! # Ok::<(), thermo::settings::ConfigError>(())
//! ```

use crate::system::ImaginaryModePolicy;
use configparser::ini::Ini;
use log::{debug, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in every location.
pub const CONFIG_FILE_NAME: &str = "thermo_config.cfg";

/// Errors that can occur during configuration loading and processing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading or writing configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Main configuration structure containing all program settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// `[general]` section
    pub general: GeneralSettings,
    /// `[logging]` section
    pub logging: LoggingSettings,
    /// `[output]` section
    pub output: OutputSettings,
}

/// Settings of the thermodynamic evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Bin width of the frequency histograms in cm⁻¹ (default: 1.0)
    pub dnu: f64,
    /// Treatment of zero or negative frequencies (default: reject)
    pub imaginary_modes: ImaginaryModePolicy,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            dnu: 1.0,
            imaginary_modes: ImaginaryModePolicy::Reject,
        }
    }
}

/// Logging configuration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level: off, error, warn, info, debug, trace (default: "info")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    /// The configured level as a `log` filter, `Info` if it cannot be parsed.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Print results as raw `key = value` lines (default: false)
    pub raw: bool,
    /// Prefix of the cumulative free energy files (default: "cumul")
    pub cumul_prefix: String,
    /// Prefix of the VDOS files (default: "vdos")
    pub vdos_prefix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            raw: false,
            cumul_prefix: "cumul".to_string(),
            vdos_prefix: "vdos".to_string(),
        }
    }
}

type Section = HashMap<String, Option<String>>;

/// Configuration manager that handles loading and accessing program settings.
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads configuration from the standard locations.
    ///
    /// # Returns
    ///
    /// - `Ok(SettingsManager)` - Successfully loaded configuration
    /// - `Err(ConfigError)` - Configuration loading failed
    pub fn load() -> Result<Self, ConfigError> {
        let mut paths = Vec::new();
        if let Some(system_path) = Self::get_system_config_path() {
            paths.push(system_path);
        }
        if let Some(user_path) = Self::get_user_config_path() {
            paths.push(user_path);
        }
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        Self::load_from(&paths)
    }

    /// Loads configuration from `paths`, lowest precedence first.
    ///
    /// Missing files are skipped. A file that cannot be parsed is reported
    /// and ignored, so one broken file does not hide the others.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_config(path, &settings) {
                Ok(updated) => {
                    settings = updated;
                    config_source = path.display().to_string();
                    debug!("Loaded configuration from: {}", path.display());
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        info!("Configuration loaded from: {}", config_source);
        Ok(Self {
            settings,
            config_source,
        })
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// All loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings of the thermodynamic evaluation.
    pub fn general(&self) -> &GeneralSettings {
        &self.settings.general
    }

    /// Logging settings.
    pub fn logging(&self) -> &LoggingSettings {
        &self.settings.logging
    }

    /// Output settings.
    pub fn output(&self) -> &OutputSettings {
        &self.settings.output
    }

    /// Applies the values found in the INI file `path` on top of `base`.
    fn load_config(path: &Path, base: &Settings) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        let mut settings = base.clone();
        let map = ini.get_map_ref();
        if let Some(general) = map.get("general") {
            Self::parse_general(general, &mut settings.general)?;
        }
        if let Some(logging) = map.get("logging") {
            Self::parse_logging(logging, &mut settings.logging)?;
        }
        if let Some(output) = map.get("output") {
            Self::parse_output(output, &mut settings.output)?;
        }
        Ok(settings)
    }

    fn parse_general(section: &Section, general: &mut GeneralSettings) -> Result<(), ConfigError> {
        if let Some(Some(dnu)) = section.get("dnu") {
            let value: f64 = dnu
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid dnu: {}", dnu)))?;
            if !(value > 0.0) {
                return Err(ConfigError::InvalidValue(format!("dnu must be positive, got {}", dnu)));
            }
            general.dnu = value;
        }
        if let Some(Some(policy)) = section.get("imaginary_modes") {
            general.imaginary_modes = policy.parse().map_err(ConfigError::InvalidValue)?;
        }
        Ok(())
    }

    fn parse_logging(section: &Section, logging: &mut LoggingSettings) -> Result<(), ConfigError> {
        if let Some(Some(level)) = section.get("level") {
            level
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid log level: {}", level)))?;
            logging.level = level.to_lowercase();
        }
        Ok(())
    }

    fn parse_output(section: &Section, output: &mut OutputSettings) -> Result<(), ConfigError> {
        if let Some(Some(raw)) = section.get("raw") {
            output.raw = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid raw value: {}", raw)))?;
        }
        if let Some(Some(prefix)) = section.get("cumul_prefix") {
            output.cumul_prefix = prefix.clone();
        }
        if let Some(Some(prefix)) = section.get("vdos_prefix") {
            output.vdos_prefix = prefix.clone();
        }
        Ok(())
    }

    /// Gets the system configuration file path.
    fn get_system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/thermo").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("PROGRAMDATA")
                .ok()
                .map(|pd| PathBuf::from(pd).join("thermo").join(CONFIG_FILE_NAME))
        }
    }

    /// Gets the user configuration file path.
    fn get_user_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config").join("thermo").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|appdata| PathBuf::from(appdata).join("thermo").join(CONFIG_FILE_NAME))
        }
    }
}

impl SettingsManager {
    /// Writes a commented configuration file holding the built-in defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Where the file should be created
    pub fn create_template(path: &Path) -> Result<(), ConfigError> {
        fs::write(path, Self::generate_template_content())?;
        info!("Created settings template at: {}", path.display());
        Ok(())
    }

    /// Generates the content of a configuration template.
    pub fn generate_template_content() -> String {
        let general = GeneralSettings::default();
        let logging = LoggingSettings::default();
        let output = OutputSettings::default();
        format!(
            r#"# thermo configuration file
#
# Files are read in this order, later ones overriding earlier ones:
#
# 1. System config directory (/etc/thermo/{name})
# 2. User config directory (~/.config/thermo/{name})
# 3. Current working directory (./{name})
#
# Command-line options override every file. Missing values keep the
# built-in defaults shown below.

[general]
# Bin width of the frequency histograms, in cm-1 (default: {dnu})
# Spectra are binned on a grid from 0 to 4000 cm-1
dnu = {dnu}

# Zero or negative vibrational frequencies (default: {imaginary})
# - reject: stop with an error
# - skip: leave the mode out and print a warning
imaginary_modes = {imaginary}

[logging]
# Log level: off, error, warn, info, debug, trace (default: {level})
level = {level}

[output]
# Print results as raw key = value lines (default: {raw})
raw = {raw}

# Prefix of the cumulative vibrational free energy files (default: {cumul})
# Files are named <prefix>_A.k.dat, <prefix>_A.f.dat, ...
cumul_prefix = {cumul}

# Prefix of the vibrational density of states files (default: {vdos})
# Files are named <prefix>_A.dat, <prefix>_B.dat
vdos_prefix = {vdos}
"#,
            name = CONFIG_FILE_NAME,
            dnu = general.dnu,
            imaginary = general.imaginary_modes,
            level = logging.level,
            raw = output.raw,
            cumul = output.cumul_prefix,
            vdos = output.vdos_prefix,
        )
    }
}
