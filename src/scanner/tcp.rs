//! TCP connect prober.
//!
//! Performs standard TCP connect scans using the operating system's socket
//! API, then makes one best-effort attempt to capture a banner. Each probe
//! owns exactly one socket, released when the stream is dropped on every
//! return path.

use crate::banner::{extract_banner, probe_for, ProbeLookup, MAX_BANNER_SIZE};
use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{ProbeResult, ProbeStatus, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// TCP connect prober.
///
/// A single connect attempt and a single read attempt, each bounded by the
/// same timeout, fully determine the outcome. No retries.
#[derive(Debug, Clone)]
pub struct TcpProber {
    timeout: Duration,
    probes: ProbeLookup,
}

impl TcpProber {
    /// Create a prober whose connect and read steps are each bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            probes: probe_for,
        }
    }

    /// Replace the table consulted for the payload written after connecting.
    pub fn with_probes(mut self, probes: ProbeLookup) -> Self {
        self.probes = probes;
        self
    }

    async fn attempt_connect(&self, host: &str, port: u16) -> ScanResult<TcpStream> {
        match timeout(self.timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                Err(ScanError::ConnectionRefused)
            }
            Ok(Err(e)) => Err(ScanError::ConnectionFailed(e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }

    /// Send the port's probe payload, if any, and read one chunk back.
    async fn grab_banner(&self, stream: &mut TcpStream, port: u16) -> String {
        if let Some(payload) = (self.probes)(port) {
            if let Err(e) = stream.write_all(payload).await {
                trace!(port, error = %e, "probe write failed");
            }
        }

        let mut buffer = vec![0u8; MAX_BANNER_SIZE];
        match timeout(self.timeout, stream.read(&mut buffer)).await {
            Ok(Ok(n)) if n > 0 => extract_banner(&buffer[..n]),
            Ok(Ok(_)) => String::new(),
            Ok(Err(e)) => {
                trace!(port, error = %e, "banner read failed");
                String::new()
            }
            Err(_) => String::new(),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &str, port: Port) -> ProbeResult {
        let port_num = port.as_u16();

        match self.attempt_connect(host, port_num).await {
            Ok(mut stream) => {
                let banner = self.grab_banner(&mut stream, port_num).await;
                debug!(host, port = port_num, %banner, "open");
                ProbeResult::open(port, banner)
            }
            Err(e) => {
                let status = classify(&e);
                debug!(host, port = port_num, %status, reason = %e, "not open");
                ProbeResult::new(port, status)
            }
        }
    }
}

/// Map a failed connect to a port status.
///
/// An explicit refusal or reset means the host answered with no listener:
/// `Closed`. Timeouts and every other failure mean no usable answer: `Filtered`.
pub fn classify(error: &ScanError) -> ProbeStatus {
    match error {
        ScanError::ConnectionRefused => ProbeStatus::Closed,
        ScanError::ConnectionFailed(e)
            if matches!(
                e.kind(),
                ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset
            ) =>
        {
            ProbeStatus::Closed
        }
        ScanError::Timeout | ScanError::ConnectionFailed(_) => ProbeStatus::Filtered,
    }
}

/// Probe a single host and port with the given timeout.
pub async fn probe(host: &str, port: Port, timeout: Duration) -> ProbeResult {
    TcpProber::new(timeout).probe(host, port).await
}
