//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSet` is the sorted, deduplicated set of ports a scan works through.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

/// A validated network port number (1-65535).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| PortError::InvalidFormat(value.to_string()))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port specification parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port token: '{0}'")]
    InvalidFormat(String),
    #[error("no ports in range 1-65535 left after parsing '{0}'")]
    Empty(String),
}

/// Named port lists that bypass the parser entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// A dozen widely deployed TCP services
    Common,
    /// HTTP and HTTPS ports
    Web,
}

impl Preset {
    const COMMON: [u16; 12] = [21, 22, 23, 25, 53, 80, 110, 143, 443, 3306, 3389, 8080];
    const WEB: [u16; 5] = [80, 443, 8080, 8000, 8443];

    /// The fixed port list for this preset.
    pub fn ports(self) -> PortSet {
        let raw: &[u16] = match self {
            Self::Common => &Self::COMMON,
            Self::Web => &Self::WEB,
        };
        PortSet::from_ports(raw.iter().copied().filter_map(Port::new))
    }
}

/// An ascending, duplicate-free set of ports.
///
/// Built once per invocation and shared read-only by every worker of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    /// First port of the range used when no specification is given.
    pub const DEFAULT_START: u16 = 1;
    /// Last port of the range used when no specification is given.
    pub const DEFAULT_END: u16 = 1024;

    /// The default 1-1024 range.
    pub fn default_range() -> Self {
        Self::from_ports((Self::DEFAULT_START..=Self::DEFAULT_END).filter_map(Port::new))
    }

    /// Build a set from arbitrary ports, sorting and deduplicating them.
    pub fn from_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        let unique: BTreeSet<Port> = ports.into_iter().collect();
        Self {
            ports: unique.into_iter().collect(),
        }
    }

    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ports.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parse a port specification into a [`PortSet`].
///
/// Supports:
/// - Single ports: "80"
/// - Comma-separated: "80,443,8080"
/// - Ranges in either order: "1-1000", "1000-1"
/// - Mixed: "22,80,443,8000-9000"
///
/// An empty specification yields 1-1024. Values outside 1-65535 are dropped
/// rather than rejected; a specification with nothing left is an error.
pub fn parse_ports(spec: &str) -> Result<PortSet, PortError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(PortSet::default_range());
    }

    let mut ports = BTreeSet::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (low, high) = match part.split_once('-') {
            Some((a, b)) => {
                let a = parse_number(a, part)?;
                let b = parse_number(b, part)?;
                (a.min(b), a.max(b))
            }
            None => {
                let n = parse_number(part, part)?;
                (n, n)
            }
        };

        let low = low.max(i64::from(Port::MIN));
        let high = high.min(i64::from(Port::MAX));
        if low > high {
            continue;
        }
        // Both bounds are clamped into 1..=65535 above.
        ports.extend((low as u16..=high as u16).filter_map(Port::new));
    }

    if ports.is_empty() {
        return Err(PortError::Empty(spec.to_string()));
    }

    Ok(PortSet {
        ports: ports.into_iter().collect(),
    })
}

/// Parse one bound of a token. Numbers too large for `i64` saturate so the
/// range clamp drops them like any other out-of-range value.
fn parse_number(s: &str, token: &str) -> Result<i64, PortError> {
    s.trim().parse().or_else(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => Ok(i64::MAX),
        IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(PortError::InvalidFormat(token.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(set: &PortSet) -> Vec<u16> {
        set.iter().map(Port::as_u16).collect()
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_parse_single_port() {
        assert_eq!(raw(&parse_ports("80").unwrap()), vec![80]);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            raw(&parse_ports("20-25").unwrap()),
            vec![20, 21, 22, 23, 24, 25]
        );
    }

    #[test]
    fn test_parse_reversed_range() {
        assert_eq!(parse_ports("25-20").unwrap(), parse_ports("20-25").unwrap());
    }

    #[test]
    fn test_empty_spec_is_default_range() {
        let set = parse_ports("").unwrap();
        assert_eq!(set.len(), 1024);
        assert_eq!(set.as_slice().first().map(|p| p.as_u16()), Some(1));
        assert_eq!(set.as_slice().last().map(|p| p.as_u16()), Some(1024));
        assert_eq!(parse_ports("   ").unwrap(), set);
    }

    #[test]
    fn test_parse_mixed_dedup_and_sort() {
        assert_eq!(
            raw(&parse_ports("443, 22,80,80,21-23").unwrap()),
            vec![21, 22, 23, 80, 443]
        );
    }

    #[test]
    fn test_out_of_range_values_dropped() {
        assert_eq!(raw(&parse_ports("0,80,70000").unwrap()), vec![80]);
        assert_eq!(
            raw(&parse_ports("65533-70000").unwrap()),
            vec![65533, 65534, 65535]
        );
        assert_eq!(raw(&parse_ports("0-2").unwrap()), vec![1, 2]);
    }

    #[test]
    fn test_oversized_numbers_dropped_like_out_of_range() {
        let set = parse_ports("80,99999999999999999999").unwrap();
        assert_eq!(raw(&set), vec![80]);

        let set = parse_ports("65000-99999999999999999999").unwrap();
        assert_eq!(raw(&set), (65000..=65535).collect::<Vec<u16>>());
    }

    #[test]
    fn test_nothing_left_is_error() {
        assert!(matches!(parse_ports("0"), Err(PortError::Empty(_))));
        assert!(matches!(parse_ports(",,"), Err(PortError::Empty(_))));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(matches!(parse_ports("abc"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(parse_ports("80,x-90"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(parse_ports("1-2-3"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(parse_ports("-5"), Err(PortError::InvalidFormat(_))));
    }

    #[test]
    fn test_output_strictly_ascending() {
        let set = parse_ports("9000-8990,1,65535,100-90,5").unwrap();
        let ports = raw(&set);
        assert!(ports.windows(2).all(|w| w[0] < w[1]));
        assert!(ports.iter().all(|&p| p >= 1));
    }

    #[test]
    fn test_presets() {
        assert_eq!(raw(&Preset::Web.ports()), vec![80, 443, 8000, 8080, 8443]);
        let common = Preset::Common.ports();
        assert_eq!(common.len(), 12);
        assert!(raw(&common).contains(&3389));
    }
}
