//! Prefix-length-bucketed IPv4 forwarding table.
//!
//! # Architecture
//!
//! Routes are stored in a fixed array of 33 buckets, one per possible
//! prefix length (/0 through /32).  Lookup iterates from the longest prefix
//! (/32) down to the shortest (/0) and stops at the first match, which is
//! therefore the longest-prefix match: O(32) bucket probes regardless of
//! how many routes the table holds.  Within one bucket the earliest
//! inserted route wins, so overlapping equal-length routes resolve
//! deterministically.
//!
//! A default route is simply an entry at prefix length 0: it matches every
//! destination but loses to anything more specific.

use alloc::vec::Vec;
use core::fmt;

use log::debug;

use ethgate_wire::types::Ipv4Addr;

/// A single entry in the forwarding table.
#[derive(Clone, Copy)]
pub struct RouteEntry {
    /// Network prefix (e.g. `10.0.0.0` for a /8 route).
    pub prefix: Ipv4Addr,
    /// Prefix length in bits (0–32).
    pub prefix_len: u8,
    /// Next-hop address, or `None` when the network is directly attached
    /// (then the datagram's own destination is the next hop).
    pub next_hop: Option<Ipv4Addr>,
    /// Index of the interface the datagram leaves through.
    pub iface: usize,
}

impl RouteEntry {
    /// Returns `true` if `dst` falls within this route's prefix.
    #[inline]
    pub fn matches(&self, dst: Ipv4Addr) -> bool {
        let mask = prefix_len_to_mask(self.prefix_len);
        (dst.to_u32_be() & mask) == (self.prefix.to_u32_be() & mask)
    }

    /// The address the matching datagram is handed to on its way out.
    #[inline]
    pub fn next_hop_for(&self, dst: Ipv4Addr) -> Ipv4Addr {
        self.next_hop.unwrap_or(dst)
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.next_hop {
            Some(hop) => write!(f, "{}/{} via {} dev {}", self.prefix, self.prefix_len, hop, self.iface),
            None => write!(f, "{}/{} dev {} (direct)", self.prefix, self.prefix_len, self.iface),
        }
    }
}

/// Forwarding table with longest-prefix-match lookup.
///
/// See the [module documentation](self) for the bucket layout.
pub struct RouteTable {
    /// Index 0 = /0 (default routes), index 32 = /32 (host routes).
    buckets: [Vec<RouteEntry>; 33],
}

impl RouteTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            buckets: [const { Vec::new() }; 33],
        }
    }

    /// Append a route.  Duplicates are allowed; the earlier insertion wins
    /// lookups at equal specificity.
    ///
    /// `prefix_len` above 32 is a caller bug.
    pub fn add(&mut self, entry: RouteEntry) {
        assert!(entry.prefix_len <= 32, "prefix length out of range");
        debug!("route: added {entry}");
        self.buckets[entry.prefix_len as usize].push(entry);
    }

    /// Longest-prefix-match lookup for `dst`.
    pub fn lookup(&self, dst: Ipv4Addr) -> Option<&RouteEntry> {
        for prefix_len in (0..=32u8).rev() {
            for route in &self.buckets[prefix_len as usize] {
                if route.matches(dst) {
                    return Some(route);
                }
            }
        }
        None
    }

    /// Number of routes in the table (diagnostic).
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    /// `true` if no routes have been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a prefix length (0–32) to a host-order `u32` network mask.
///
/// E.g. `prefix_len_to_mask(24)` → `0xFFFF_FF00`.
#[inline]
fn prefix_len_to_mask(prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else if prefix_len >= 32 {
        u32::MAX
    } else {
        u32::MAX << (32 - prefix_len)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prefix: [u8; 4], prefix_len: u8, iface: usize) -> RouteEntry {
        RouteEntry {
            prefix: Ipv4Addr(prefix),
            prefix_len,
            next_hop: None,
            iface,
        }
    }

    #[test]
    fn masks() {
        assert_eq!(prefix_len_to_mask(0), 0);
        assert_eq!(prefix_len_to_mask(8), 0xff00_0000);
        assert_eq!(prefix_len_to_mask(24), 0xffff_ff00);
        assert_eq!(prefix_len_to_mask(32), 0xffff_ffff);
    }

    #[test]
    fn default_route_matches_everything() {
        let mut table = RouteTable::new();
        table.add(entry([0, 0, 0, 0], 0, 7));

        let route = table.lookup(Ipv4Addr([8, 8, 8, 8])).expect("default matches");
        assert_eq!(route.iface, 7);
        assert_eq!(route.next_hop_for(Ipv4Addr([8, 8, 8, 8])), Ipv4Addr([8, 8, 8, 8]));
    }

    #[test]
    fn longest_prefix_wins() {
        let mut table = RouteTable::new();
        table.add(entry([0, 0, 0, 0], 0, 0));
        table.add(entry([10, 0, 0, 0], 8, 1));
        table.add(entry([10, 0, 0, 0], 24, 2));

        assert_eq!(table.lookup(Ipv4Addr([10, 0, 0, 9])).unwrap().iface, 2);
        assert_eq!(table.lookup(Ipv4Addr([10, 1, 2, 3])).unwrap().iface, 1);
        assert_eq!(table.lookup(Ipv4Addr([8, 8, 8, 8])).unwrap().iface, 0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn equal_length_first_inserted_wins() {
        let mut table = RouteTable::new();
        table.add(entry([10, 0, 0, 0], 8, 1));
        table.add(entry([10, 0, 0, 0], 8, 2));

        assert_eq!(table.lookup(Ipv4Addr([10, 9, 9, 9])).unwrap().iface, 1);
    }

    #[test]
    fn no_match_without_default() {
        let mut table = RouteTable::new();
        table.add(entry([192, 168, 0, 0], 16, 0));

        assert!(table.lookup(Ipv4Addr([8, 8, 8, 8])).is_none());
    }

    #[test]
    fn host_route_matches_exactly() {
        let mut table = RouteTable::new();
        table.add(RouteEntry {
            prefix: Ipv4Addr([10, 0, 0, 5]),
            prefix_len: 32,
            next_hop: Some(Ipv4Addr([10, 0, 0, 1])),
            iface: 3,
        });

        let route = table.lookup(Ipv4Addr([10, 0, 0, 5])).expect("host route");
        assert_eq!(route.next_hop_for(Ipv4Addr([10, 0, 0, 5])), Ipv4Addr([10, 0, 0, 1]));
        assert!(table.lookup(Ipv4Addr([10, 0, 0, 6])).is_none());
    }
}
