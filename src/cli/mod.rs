//! Command-line interface definitions.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flag values
//! override the settings file; both are folded into [`ScanOptions`] before
//! anything touches the network.

mod scan;

pub use scan::execute;

use crate::config::AppSettings;
use crate::error::{CliError, CliResult, ConfigResult};
use crate::types::{parse_ports, PortSet, Preset};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Value clap substitutes when a save flag is given without a file name.
const AUTO_NAME: &str = "auto";

/// Concurrent TCP port scanner and banner grabber.
///
/// Scan only targets you own or have permission to test.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Port scanner and banner grabber with clean CSV output", long_about = None)]
pub struct Cli {
    /// Target hostname/IP, CIDR block or IP range
    /// (e.g. 10.0.0.1, 10.0.0.1-10.0.0.10, 192.168.1.0/28)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g. "22,80,443" or "1-65535")
    #[arg(short, long, default_value = "1-1024")]
    pub ports: String,

    /// Preset port list, used instead of --ports
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Maximum concurrent probes per host [default: 200]
    #[arg(short = 't', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Connect and read timeout in seconds [default: 1.0]
    #[arg(short = 'T', long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Save only OPEN ports to CSV, optionally to FILE
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = AUTO_NAME)]
    pub save_open: Option<String>,

    /// Save every result to CSV, optionally to FILE
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = AUTO_NAME)]
    pub save_all: Option<String>,

    /// Save OPEN ports to CSV automatically for large port sets
    /// (only when more ports than the settings' auto_save_threshold, 200 by default, are scanned)
    #[arg(long)]
    pub save_auto: bool,

    /// Quiet output: no per-host or live lines, no summary
    #[arg(long)]
    pub silent: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a JSON settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Where to write a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// Timestamped name in the working directory.
    Auto,
    Path(PathBuf),
}

impl SaveTarget {
    fn from_arg(arg: &str) -> Self {
        if arg == AUTO_NAME {
            Self::Auto
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Auto => None,
            Self::Path(p) => Some(p),
        }
    }
}

/// Fully validated scan parameters.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub ports: PortSet,
    pub workers: usize,
    pub timeout: Duration,
    pub color: bool,
    pub silent: bool,
    pub save_open: Option<SaveTarget>,
    pub save_all: Option<SaveTarget>,
}

impl Cli {
    /// Load the settings file named by `--config`, or the default one.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => AppSettings::load(),
        }
    }

    /// Colour is on unless `--no-color` is given or the settings turn it off.
    pub fn use_color(&self, settings: &AppSettings) -> bool {
        settings.color && !self.no_color
    }

    /// Validate flags against `settings` and build the scan parameters.
    pub fn resolve(&self, settings: &AppSettings) -> CliResult<ScanOptions> {
        let ports = match self.preset {
            Some(preset) => preset.ports(),
            None => parse_ports(&self.ports)?,
        };

        let workers = self.threads.unwrap_or(settings.workers);
        if workers == 0 {
            return Err(CliError::InvalidWorkers);
        }

        let timeout = match self.timeout {
            Some(secs) => Duration::try_from_secs_f64(secs)
                .ok()
                .filter(|d| !d.is_zero())
                .ok_or_else(|| CliError::InvalidTimeout(format!("{} seconds", secs)))?,
            None => settings.timeout(),
        };
        if timeout.is_zero() {
            return Err(CliError::InvalidTimeout("0 seconds".to_string()));
        }

        let mut save_open = self.save_open.as_deref().map(SaveTarget::from_arg);
        if save_open.is_none() && self.save_auto && ports.len() > settings.auto_save_threshold {
            save_open = Some(SaveTarget::Auto);
        }
        let save_all = self.save_all.as_deref().map(SaveTarget::from_arg);

        Ok(ScanOptions {
            ports,
            workers,
            timeout,
            color: self.use_color(settings),
            silent: self.silent,
            save_open,
            save_all,
        })
    }
}
