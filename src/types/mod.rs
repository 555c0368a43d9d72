//! Core type definitions: ports, port sets and scan targets.
//!
//! These types are built once from user input before any network activity
//! and are read-only afterwards.

mod port;
mod target;

pub use port::{parse_ports, Port, PortError, PortSet, Preset};
pub use target::{
    expand_targets, resolve_or_literal, DnsResolver, Resolve, TargetError, TargetList,
    MAX_TARGET_HOSTS,
};
