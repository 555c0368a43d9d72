//! Configuration management for portsweep.
//!
//! Settings are read from an XDG-compliant location or an explicit path and
//! then overridden by command-line flags.

mod settings;

pub use settings::{AppSettings, Paths};
