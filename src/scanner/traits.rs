//! Scanner trait abstraction and result types.
//!
//! `Prober` is the seam between the scan engine and the network, so the
//! engine can be driven by test doubles. `ScanObserver` receives in-flight
//! results for live display.

use crate::types::Port;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Status of a scanned port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Connect succeeded.
    Open,
    /// The host actively refused the connection.
    Closed,
    /// No answer within the timeout, or the attempt was blocked.
    Filtered,
    /// The probe itself faulted before producing an outcome.
    Error,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Outcome of a single (host, port) attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub port: Port,
    pub status: ProbeStatus,
    /// First line the service sent, empty when nothing was captured.
    pub banner: String,
}

impl ProbeResult {
    pub fn new(port: Port, status: ProbeStatus) -> Self {
        Self {
            port,
            status,
            banner: String::new(),
        }
    }

    pub fn open(port: Port, banner: impl Into<String>) -> Self {
        Self {
            port,
            status: ProbeStatus::Open,
            banner: banner.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ProbeStatus::Open
    }
}

/// All results for one host, ascending by port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostResult {
    pub host: String,
    pub results: Vec<ProbeResult>,
}

impl HostResult {
    /// Finalize a host's results, sorting them by port.
    pub fn new(host: impl Into<String>, mut results: Vec<ProbeResult>) -> Self {
        results.sort_by_key(|r| r.port);
        Self {
            host: host.into(),
            results,
        }
    }

    pub fn open_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_open()).count()
    }

    pub fn count(&self, status: ProbeStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

/// Performs one connection attempt against a host and port.
///
/// Implementations must not panic for ordinary network failures; those are
/// reported through [`ProbeStatus`]. The engine still tolerates a panic and
/// maps it to [`ProbeStatus::Error`].
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, host: &str, port: Port) -> ProbeResult;
}

/// Receives scan progress as it happens.
///
/// Every method has an empty default so observers implement only what they
/// display. `port_finished` is called in completion order, not port order.
pub trait ScanObserver: Send + Sync {
    fn host_started(&self, _target: &str, _resolved: &str, _ports: usize) {}

    fn port_finished(&self, _result: &ProbeResult) {}

    fn host_finished(&self, _result: &HostResult) {}
}

/// An observer that ignores everything.
impl ScanObserver for () {}
