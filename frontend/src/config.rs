//! Front-end settings: `hyper9/config.toml` in the user config directory,
//! or an explicit `--config` path.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Timer period in CPU cycles.
    pub cycles_per_tick: u64,
    /// Disassembly listing length.
    pub window: usize,
    /// Print a trace line per executed instruction.
    pub trace: bool,
    /// Copy console port output to stdout while running.
    pub echo_console: bool,
    /// Log level used when no `-v` flag is given.
    pub log_level: Option<String>,
    /// Breakpoint addresses, in hex.
    pub breakpoints: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles_per_tick: 1000,
            window: 30,
            trace: false,
            echo_console: true,
            log_level: None,
            breakpoints: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Breakpoint(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "cannot read {}: {e}", path.display()),
            ConfigError::Parse(path, e) => write!(f, "invalid config {}: {e}", path.display()),
            ConfigError::Breakpoint(msg) => write!(f, "invalid breakpoint: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
            ConfigError::Breakpoint(_) => None,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load settings. An explicit path must exist; the default location is
    /// optional and a missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text).map_err(|e| ConfigError::Parse(path, e)),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(path, e)),
        }
    }

    pub fn breakpoint_addresses(&self) -> Result<Vec<u16>, ConfigError> {
        self.breakpoints
            .iter()
            .map(|text| parse_address(text).map_err(ConfigError::Breakpoint))
            .collect()
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hyper9").join("config.toml"))
}

/// Parse a hex address written as `1234`, `$1234` or `0x1234`.
pub fn parse_address(text: &str) -> Result<u16, String> {
    let digits = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u16::from_str_radix(digits, 16).map_err(|e| format!("{text:?}: {e}"))
}
