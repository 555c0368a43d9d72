//! Multi-host scan orchestration.
//!
//! Hosts are scanned one at a time in target-list order; concurrency lives
//! only inside a single host's port set.

use crate::scanner::traits::{HostResult, ProbeResult, Prober, ScanObserver};
use crate::scanner::ScanEngine;
use crate::types::{resolve_or_literal, PortSet, Resolve, TargetList};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Results for one target, keyed by the target as it was listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostScan {
    /// Target string from the expanded target list.
    pub target: String,
    /// Address actually scanned (the target itself if resolution failed).
    pub resolved: String,
    pub result: HostResult,
}

/// Everything a scan produced, in target-list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub hosts: Vec<HostScan>,
    pub total_open: usize,
}

impl ScanSummary {
    pub fn new(hosts: Vec<HostScan>) -> Self {
        let total_open = hosts.iter().map(|h| h.result.open_count()).sum();
        Self { hosts, total_open }
    }

    /// Every (target, result) pair, hosts in order and ports ascending.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &ProbeResult)> {
        self.hosts.iter().flat_map(|h| {
            h.result
                .results
                .iter()
                .map(move |r| (h.target.as_str(), r))
        })
    }

    pub fn ports_scanned(&self) -> usize {
        self.hosts.iter().map(|h| h.result.results.len()).sum()
    }
}

/// Scan every target in order and total the open ports.
///
/// Each target is resolved again before scanning; a failed lookup keeps the
/// target string as-is and never stops the run.
pub async fn run_scan<P, R, O>(
    engine: &ScanEngine<P>,
    resolver: &R,
    targets: &TargetList,
    ports: &PortSet,
    observer: &O,
) -> ScanSummary
where
    P: Prober,
    R: Resolve + ?Sized,
    O: ScanObserver + ?Sized,
{
    let mut hosts = Vec::with_capacity(targets.len());

    for target in targets.iter() {
        let resolved = resolve_or_literal(resolver, target).await;
        info!(host = target, %resolved, ports = ports.len(), "scanning host");
        observer.host_started(target, &resolved, ports.len());

        let start = Instant::now();
        let result = engine.scan_host(&resolved, ports, observer).await;
        info!(
            host = target,
            open = result.open_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "host complete"
        );
        observer.host_finished(&result);

        hosts.push(HostScan {
            target: target.to_string(),
            resolved,
            result,
        });
    }

    ScanSummary::new(hosts)
}
