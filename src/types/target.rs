//! Target specification parsing and expansion.
//!
//! Provides flexible target parsing supporting:
//! - Single IP addresses (IPv4 and IPv6)
//! - CIDR notation (192.168.1.0/24)
//! - Address ranges in either direction (10.0.0.1-10.0.0.9, 10.0.0.9-10.0.0.1)
//! - Hostnames (example.com)

use async_trait::async_trait;
use ipnetwork::IpNetwork;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Maximum number of hosts a single CIDR block or range may expand to.
pub const MAX_TARGET_HOSTS: u128 = 65536;

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid CIDR notation '{0}'")]
    InvalidCidr(String),
    #[error("invalid IP range '{0}'")]
    InvalidRange(String),
    #[error("IP versions differ in range '{0}'")]
    MixedFamilies(String),
    #[error("'{0}' expands to {1} addresses (max: {2})")]
    TooLarge(String, u128, u128),
}

/// Resolves hostnames to IPv4 addresses.
///
/// Used both while expanding targets and for the cosmetic label shown before
/// each host is scanned. Failures are reported as `None`, never as errors.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr>;
}

/// DNS-backed resolver using the system configuration when available.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    pub fn new() -> Self {
        let inner = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            debug!(error = %e, "system resolver config unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { inner }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Some(ip);
        }
        match self.inner.lookup_ip(host).await {
            Ok(response) => response.iter().find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            }),
            Err(e) => {
                debug!(host, error = %e, "hostname lookup failed");
                None
            }
        }
    }
}

/// Resolve `host` for display and connection, keeping the literal on failure.
pub async fn resolve_or_literal<R: Resolve + ?Sized>(resolver: &R, host: &str) -> String {
    match resolver.resolve_ipv4(host).await {
        Some(ip) => ip.to_string(),
        None => host.to_string(),
    }
}

/// The ordered list of concrete hosts to scan.
///
/// Entries are IP literals, except when a single hostname could not be
/// resolved, in which case the input is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetList {
    hosts: Vec<String>,
}

impl TargetList {
    pub fn as_slice(&self) -> &[String] {
        &self.hosts
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Expand a target specification into the hosts it names.
///
/// Dispatch order: anything containing `/` is a CIDR block; anything with a
/// `-` and no letters is an address range; everything else is a single host,
/// resolved to one IPv4 address or passed through as-is.
pub async fn expand_targets<R: Resolve + ?Sized>(
    spec: &str,
    resolver: &R,
) -> Result<TargetList, TargetError> {
    let spec = spec.trim();

    let hosts = if spec.contains('/') {
        expand_cidr(spec)?
    } else if spec.contains('-') && !spec.chars().any(char::is_alphabetic) {
        expand_range(spec)?
    } else if let Ok(ip) = spec.parse::<IpAddr>() {
        vec![ip.to_string()]
    } else {
        let host = resolve_or_literal(resolver, spec).await;
        if host == spec {
            debug!(spec, "could not resolve target, scanning it as given");
        }
        vec![host]
    };

    Ok(TargetList { hosts })
}

/// Every usable host address of a network.
///
/// IPv4 networks drop the network and broadcast addresses unless the prefix
/// is /31 or /32; IPv6 networks drop the subnet-router anycast address unless
/// the prefix is /127 or /128.
fn expand_cidr(spec: &str) -> Result<Vec<String>, TargetError> {
    let network: IpNetwork = spec
        .parse()
        .map_err(|_| TargetError::InvalidCidr(spec.to_string()))?;

    let size = match network {
        IpNetwork::V4(net) => 1u128 << (32 - u32::from(net.prefix())),
        IpNetwork::V6(net) => {
            let prefix = u32::from(net.prefix());
            if prefix == 0 {
                u128::MAX
            } else {
                1u128 << (128 - prefix)
            }
        }
    };
    if size > MAX_TARGET_HOSTS {
        return Err(TargetError::TooLarge(
            spec.to_string(),
            size,
            MAX_TARGET_HOSTS,
        ));
    }

    let hosts = match network {
        IpNetwork::V4(net) => {
            let (network_addr, broadcast) = (net.network(), net.broadcast());
            net.iter()
                .filter(|addr| net.prefix() >= 31 || (*addr != network_addr && *addr != broadcast))
                .map(|addr| addr.to_string())
                .collect()
        }
        IpNetwork::V6(net) => {
            let network_addr = net.network();
            net.iter()
                .filter(|addr| net.prefix() >= 127 || *addr != network_addr)
                .map(|addr| addr.to_string())
                .collect()
        }
    };
    Ok(hosts)
}

/// Every address from start to end inclusive, walking down if end < start.
fn expand_range(spec: &str) -> Result<Vec<String>, TargetError> {
    let invalid = || TargetError::InvalidRange(spec.to_string());
    let (start, end) = spec.split_once('-').ok_or_else(invalid)?;
    let start: IpAddr = start.trim().parse().map_err(|_| invalid())?;
    let end: IpAddr = end.trim().parse().map_err(|_| invalid())?;

    let (first, last, v4) = match (start, end) {
        (IpAddr::V4(a), IpAddr::V4(b)) => (u128::from(u32::from(a)), u128::from(u32::from(b)), true),
        (IpAddr::V6(a), IpAddr::V6(b)) => (u128::from(a), u128::from(b), false),
        _ => return Err(TargetError::MixedFamilies(spec.to_string())),
    };

    let count = first.abs_diff(last).saturating_add(1);
    if count > MAX_TARGET_HOSTS {
        return Err(TargetError::TooLarge(
            spec.to_string(),
            count,
            MAX_TARGET_HOSTS,
        ));
    }

    let to_string = |n: u128| -> String {
        if v4 {
            // Both endpoints are IPv4, so every value in between fits in 32 bits.
            Ipv4Addr::from(n as u32).to_string()
        } else {
            Ipv6Addr::from(n).to_string()
        }
    };

    let hosts = if last >= first {
        (first..=last).map(to_string).collect()
    } else {
        (last..=first).rev().map(to_string).collect()
    };
    Ok(hosts)
}
