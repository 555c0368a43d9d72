//! Scripted prober for exercising the engine without touching the network.

use crate::scanner::traits::{ProbeResult, ProbeStatus, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MockProber {
    delays: HashMap<u16, Duration>,
    open: HashSet<u16>,
    panics_on: HashSet<u16>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    hosts: Mutex<Vec<String>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, port: u16, delay: Duration) -> Self {
        self.delays.insert(port, delay);
        self
    }

    pub fn with_open(mut self, port: u16) -> Self {
        self.open.insert(port);
        self
    }

    pub fn panicking_on(mut self, port: u16) -> Self {
        self.panics_on.insert(port);
        self
    }

    /// Highest number of probes that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Hosts probed, in call order.
    pub fn hosts(&self) -> Vec<String> {
        self.hosts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, host: &str, port: Port) -> ProbeResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.hosts.lock().unwrap().push(host.to_string());

        let delay = self
            .delays
            .get(&port.as_u16())
            .copied()
            .unwrap_or(Duration::from_millis(20));
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panics_on.contains(&port.as_u16()) {
            panic!("scripted fault on port {}", port);
        }

        if self.open.contains(&port.as_u16()) {
            ProbeResult::open(port, format!("banner-{}", port))
        } else {
            ProbeResult::new(port, ProbeStatus::Closed)
        }
    }
}
