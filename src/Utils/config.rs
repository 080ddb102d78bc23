//! Calculator settings: name of the free variable, non-finite policy, quadrature cross-check and
//! logging. Built from defaults with setters, or read from a TOML file such as
//!
//! ```toml
//! variable = "t"
//! reject_non_finite = true
//! quadrature_check = true
//! quadrature_degree = 64
//! quadrature_tolerance = 1e-6
//! log_level = "warn"
//! log_to_console = true
//! log_file = "auto"        # "auto" gives a timestamped file name
//! ```
//! Every key is optional; unknown keys are rejected so typos do not go unnoticed.
use log::LevelFilter;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::symbolic::notation::DEFAULT_VARIABLE;

const KNOWN_KEYS: [&str; 8] = [
    "variable",
    "reject_non_finite",
    "quadrature_check",
    "quadrature_degree",
    "quadrature_tolerance",
    "log_level",
    "log_to_console",
    "log_file",
];

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Toml(e) => write!(f, "malformed config: {}", e),
            ConfigError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalcConfig {
    /// name of the free variable
    pub variable: String,
    /// treat NaN/inf produced from a finite sample as a numeric failure
    pub reject_non_finite: bool,
    /// compare definite integrals against Gauss-Legendre quadrature and warn on mismatch
    pub quadrature_check: bool,
    pub quadrature_degree: usize,
    /// relative tolerance of the quadrature cross-check
    pub quadrature_tolerance: f64,
    pub log_level: LevelFilter,
    pub log_to_console: bool,
    /// log file name, `"auto"` for a timestamped name
    pub log_file: Option<String>,
}

impl Default for CalcConfig {
    fn default() -> Self {
        CalcConfig {
            variable: DEFAULT_VARIABLE.to_string(),
            reject_non_finite: true,
            quadrature_check: false,
            quadrature_degree: 64,
            quadrature_tolerance: 1e-6,
            log_level: LevelFilter::Info,
            log_to_console: true,
            log_file: None,
        }
    }
}

/// Parses a level name as written in config files and on the command line.
pub fn parse_log_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.to_lowercase().as_str() {
        "off" | "none" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(ConfigError::Invalid(format!(
            "log_level must be off, error, warn, info, debug or trace, got '{}'",
            level
        ))),
    }
}

fn validate_variable(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_with_letter || !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ConfigError::Invalid(format!(
            "variable must be an identifier, got '{}'",
            name
        )));
    }
    if name == "pi" || name == "E" {
        return Err(ConfigError::Invalid(format!(
            "'{}' is a named constant and cannot be the variable",
            name
        )));
    }
    Ok(())
}

impl CalcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }

    pub fn with_reject_non_finite(mut self, reject: bool) -> Self {
        self.reject_non_finite = reject;
        self
    }

    pub fn with_quadrature_check(mut self, check: bool) -> Self {
        self.quadrature_check = check;
        self
    }

    pub fn with_quadrature_tolerance(mut self, tolerance: f64) -> Self {
        self.quadrature_tolerance = tolerance;
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_file(mut self, log_file: Option<&str>) -> Self {
        self.log_file = log_file.map(str::to_string);
        self
    }

    /// Checks the invariants that the setters do not enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_variable(&self.variable)?;
        if self.quadrature_degree < 2 {
            return Err(ConfigError::Invalid(
                "quadrature_degree must be at least 2".to_string(),
            ));
        }
        if !(self.quadrature_tolerance > 0.0) {
            return Err(ConfigError::Invalid(
                "quadrature_tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads settings from TOML text; missing keys keep their default values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table = text
            .parse::<toml::Table>()
            .map_err(|e| ConfigError::Toml(e.to_string()))?;
        if let Some(unknown) = table.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            return Err(ConfigError::Invalid(format!("unknown key '{}'", unknown)));
        }
        let wrong_type = |key: &str, expected: &str| {
            ConfigError::Invalid(format!("'{}' must be {}", key, expected))
        };

        let mut config = CalcConfig::default();
        for (key, value) in &table {
            match key.as_str() {
                "variable" => {
                    config.variable = value
                        .as_str()
                        .ok_or_else(|| wrong_type(key.as_str(), "a string"))?
                        .to_string()
                }
                "reject_non_finite" => {
                    config.reject_non_finite =
                        value.as_bool().ok_or_else(|| wrong_type(key.as_str(), "a boolean"))?
                }
                "quadrature_check" => {
                    config.quadrature_check =
                        value.as_bool().ok_or_else(|| wrong_type(key.as_str(), "a boolean"))?
                }
                "quadrature_degree" => {
                    let degree = value
                        .as_integer()
                        .ok_or_else(|| wrong_type(key.as_str(), "an integer"))?;
                    config.quadrature_degree = usize::try_from(degree)
                        .map_err(|_| wrong_type(key.as_str(), "a non-negative integer"))?;
                }
                "quadrature_tolerance" => {
                    config.quadrature_tolerance = value
                        .as_float()
                        .or_else(|| value.as_integer().map(|i| i as f64))
                        .ok_or_else(|| wrong_type(key.as_str(), "a number"))?
                }
                "log_level" => {
                    config.log_level =
                        parse_log_level(value.as_str().ok_or_else(|| wrong_type(key.as_str(), "a string"))?)?
                }
                "log_to_console" => {
                    config.log_to_console =
                        value.as_bool().ok_or_else(|| wrong_type(key.as_str(), "a boolean"))?
                }
                "log_file" => {
                    config.log_file = Some(
                        value
                            .as_str()
                            .ok_or_else(|| wrong_type(key.as_str(), "a string"))?
                            .to_string(),
                    )
                }
                _ => {}
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
