//! # portsweep - Concurrent TCP Port Scanner and Banner Grabber
//!
//! portsweep determines, for every (host, port) pair, whether the port is
//! open, closed, or filtered, using plain `connect()` calls, and captures the
//! first line a service sends back from open ports.
//!
//! ## Features
//!
//! - **Flexible Targeting**: single hosts, CIDR blocks, and IP ranges in either direction
//! - **Bounded Concurrency**: per-host worker pool capped at `min(workers, ports)`
//! - **Banner Grabbing**: protocol-appropriate probes for well-known ports
//! - **Deterministic Results**: results sorted by port regardless of completion order
//! - **CSV Export**: open-only or full results
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::scan_host;
//! use portsweep::types::parse_ports;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ports = parse_ports("22,80,443").unwrap();
//!     let result = scan_host("192.168.1.1", &ports, 200, Duration::from_secs(1)).await;
//!
//!     for r in &result.results {
//!         println!("{} {} {}", r.port, r.status, r.banner);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port sets and target expansion
//! - [`banner`] - Probe table and banner extraction
//! - [`scanner`] - Connection prober, scan engine, and multi-host orchestration
//! - [`config`] - Settings file handling
//! - [`output`] - Live terminal reporting and CSV export
//! - [`cli`] - Command-line front end
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ScanError};
pub use scanner::{
    run_scan, scan_host, HostResult, ProbeResult, ProbeStatus, Prober, ScanEngine, ScanSummary,
};
pub use types::{expand_targets, parse_ports, Port, PortSet, TargetList};
