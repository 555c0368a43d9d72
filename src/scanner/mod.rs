//! Scanner module - the concurrent scan engine.
//!
//! Fans one probe per port out across a bounded pool of tokio tasks, collects
//! results as they complete, and sorts them by port once every probe for the
//! host has finished.

pub mod orchestrator;
pub mod tcp;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use orchestrator::{run_scan, HostScan, ScanSummary};
pub use tcp::{probe, TcpProber};
pub use traits::{HostResult, ProbeResult, ProbeStatus, Prober, ScanObserver};

use crate::types::PortSet;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Runs every port of one host through a [`Prober`] with bounded parallelism.
pub struct ScanEngine<P: Prober> {
    prober: Arc<P>,
    max_workers: usize,
}

impl ScanEngine<TcpProber> {
    /// Engine backed by real TCP connects.
    pub fn tcp(max_workers: usize, timeout: Duration) -> Self {
        Self::new(TcpProber::new(timeout), max_workers)
    }
}

impl<P: Prober> ScanEngine<P> {
    /// Create an engine that never runs more than `max_workers` probes at once.
    pub fn new(prober: P, max_workers: usize) -> Self {
        Self {
            prober: Arc::new(prober),
            max_workers: max_workers.max(1),
        }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of concurrent probes used for a host with `port_count` ports.
    pub fn pool_size(&self, port_count: usize) -> usize {
        self.max_workers.min(port_count).max(1)
    }

    /// Probe every port of `host` and return the results sorted by port.
    ///
    /// `observer.port_finished` sees each result in completion order. A probe
    /// task that panics is recorded as [`ProbeStatus::Error`] and never
    /// cancels its siblings.
    pub async fn scan_host<O>(&self, host: &str, ports: &PortSet, observer: &O) -> HostResult
    where
        O: ScanObserver + ?Sized,
    {
        let pool = self.pool_size(ports.len());
        let shared_host: Arc<str> = Arc::from(host);

        let mut in_flight = stream::iter(ports.iter())
            .map(|port| {
                let prober = Arc::clone(&self.prober);
                let host = Arc::clone(&shared_host);
                async move {
                    let task = tokio::spawn(async move { prober.probe(&host, port).await });
                    match task.await {
                        Ok(result) => result,
                        Err(e) => {
                            warn!(port = port.as_u16(), error = %e, "probe task failed");
                            ProbeResult::new(port, ProbeStatus::Error)
                        }
                    }
                }
            })
            .buffer_unordered(pool);

        let mut results = Vec::with_capacity(ports.len());
        while let Some(result) = in_flight.next().await {
            observer.port_finished(&result);
            results.push(result);
        }

        HostResult::new(host, results)
    }
}

/// Scan every port of one host over TCP with at most `max_workers` probes in flight.
pub async fn scan_host(
    host: &str,
    ports: &PortSet,
    max_workers: usize,
    timeout: Duration,
) -> HostResult {
    ScanEngine::tcp(max_workers, timeout)
        .scan_host(host, ports, &())
        .await
}

#[cfg(test)]
mod tests {
    use super::mock::MockProber;
    use super::*;
    use crate::types::{parse_ports, Port};
    use std::sync::Mutex;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct CompletionOrder(Mutex<Vec<u16>>);

    impl ScanObserver for CompletionOrder {
        fn port_finished(&self, result: &ProbeResult) {
            self.0.lock().unwrap().push(result.port.as_u16());
        }
    }

    fn ports_of(result: &HostResult) -> Vec<u16> {
        result.results.iter().map(|r| r.port.as_u16()).collect()
    }

    #[test]
    fn test_pool_size() {
        let engine = ScanEngine::new(MockProber::new(), 200);
        assert_eq!(engine.pool_size(5), 5);
        assert_eq!(engine.pool_size(1000), 200);
        assert_eq!(engine.pool_size(0), 1);
        assert_eq!(ScanEngine::new(MockProber::new(), 0).max_workers(), 1);
    }

    #[tokio::test]
    async fn test_workers_never_exceed_port_count() {
        let engine = ScanEngine::new(MockProber::new(), 200);
        let ports = parse_ports("1-5").unwrap();

        let result = engine.scan_host("10.0.0.1", &ports, &()).await;

        assert_eq!(result.results.len(), 5);
        assert!(engine.prober().max_in_flight() <= 5);
    }

    #[tokio::test]
    async fn test_workers_never_exceed_cap() {
        let engine = ScanEngine::new(MockProber::new(), 3);
        let ports = parse_ports("1-20").unwrap();

        let result = engine.scan_host("10.0.0.1", &ports, &()).await;

        assert_eq!(result.results.len(), 20);
        assert!(engine.prober().max_in_flight() <= 3);
        assert!(engine.prober().max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_results_sorted_despite_completion_order() {
        let prober = MockProber::new()
            .with_delay(10, Duration::from_millis(200))
            .with_delay(20, Duration::from_millis(150))
            .with_delay(30, Duration::from_millis(100))
            .with_delay(40, Duration::from_millis(50))
            .with_delay(50, Duration::from_millis(1));
        let engine = ScanEngine::new(prober, 10);
        let ports = parse_ports("50,40,30,20,10").unwrap();
        let order = CompletionOrder::default();

        let result = engine.scan_host("10.0.0.1", &ports, &order).await;

        assert_eq!(*order.0.lock().unwrap(), vec![50, 40, 30, 20, 10]);
        assert_eq!(ports_of(&result), vec![10, 20, 30, 40, 50]);
    }

    #[tokio::test]
    async fn test_fault_does_not_cancel_siblings() {
        let prober = MockProber::new().with_open(2).with_open(4).panicking_on(3);
        let engine = ScanEngine::new(prober, 2);
        let ports = parse_ports("1-5").unwrap();

        let result = engine.scan_host("10.0.0.1", &ports, &()).await;

        assert_eq!(ports_of(&result), vec![1, 2, 3, 4, 5]);
        let statuses: Vec<ProbeStatus> = result.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                ProbeStatus::Closed,
                ProbeStatus::Open,
                ProbeStatus::Error,
                ProbeStatus::Open,
                ProbeStatus::Closed,
            ]
        );
        assert_eq!(result.results[2].banner, "");
        assert_eq!(result.open_count(), 2);
    }

    #[tokio::test]
    async fn test_scan_host_against_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open_port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220 test ftp\r\n").await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed_port = closed.local_addr().unwrap().port();
        drop(closed);

        let ports = PortSet::from_ports(
            [open_port, closed_port]
                .into_iter()
                .filter_map(Port::new),
        );
        let result = scan_host("127.0.0.1", &ports, 200, Duration::from_millis(500)).await;

        assert_eq!(result.host, "127.0.0.1");
        assert_eq!(result.results.len(), 2);
        let open = result
            .results
            .iter()
            .find(|r| r.port.as_u16() == open_port)
            .unwrap();
        assert_eq!(open.status, ProbeStatus::Open);
        assert_eq!(open.banner, "220 test ftp");
        let closed = result
            .results
            .iter()
            .find(|r| r.port.as_u16() == closed_port)
            .unwrap();
        assert_eq!(closed.status, ProbeStatus::Closed);
    }
}
