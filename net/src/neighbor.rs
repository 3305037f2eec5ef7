//! ARP neighbor cache with pending-resolution queues and tick-driven aging.
//!
//! # Architecture
//!
//! Each next-hop IP the interface has dealt with owns at most one entry,
//! which moves through a two-state lifecycle:
//!
//! - **`Pending`**: an ARP request went out and no answer has arrived.
//!   Datagrams for that IP queue here in arrival order.  While the entry
//!   lives (at most [`PENDING_TTL_MS`]) no second request is sent; if it
//!   ages out, the queued datagrams are dropped with it and the next send
//!   starts resolution over.
//! - **`Resolved`**: the mapping was learned from an ARP message.  It stays
//!   usable for [`RESOLVED_TTL_MS`], then ages out entirely.
//!
//! Because pending and resolved are two states of the same entry, an IP can
//! never hold both at once, and a waiting queue only exists while its IP is
//! pending.
//!
//! # I/O
//!
//! The cache performs none.  Mutating methods return outcome values
//! ([`ResolveOutcome`], or the drained queue from [`NeighborCache::learn`])
//! and the owning interface turns those into frames.  Time is a parameter:
//! the interface passes its clock in, the cache never keeps one.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use log::debug;

use ethgate_wire::ipv4::InternetDatagram;
use ethgate_wire::types::{Ipv4Addr, MacAddr};

/// Milliseconds a learned mapping stays usable.
pub const RESOLVED_TTL_MS: u64 = 30_000;

/// Milliseconds an unanswered request keeps suppressing re-requests.
pub const PENDING_TTL_MS: u64 = 5_000;

// =============================================================================
// Entry state
// =============================================================================

enum NeighborState {
    /// Request sent at `requested_at`; datagrams wait for the answer.
    Pending {
        requested_at: u64,
        waiting: VecDeque<InternetDatagram>,
    },
    /// Mapping learned at `learned_at`.
    Resolved { mac: MacAddr, learned_at: u64 },
}

struct NeighborEntry {
    ip: Ipv4Addr,
    state: NeighborState,
}

/// What [`NeighborCache::resolve`] decided about one outgoing datagram.
pub enum ResolveOutcome {
    /// Mapping known: the datagram comes back for the caller to frame.
    Resolved {
        mac: MacAddr,
        dgram: InternetDatagram,
    },
    /// Resolution already in flight; the datagram joined the waiting queue.
    Queued,
    /// New pending entry created; the caller must broadcast an ARP request.
    RequestNeeded,
}

// =============================================================================
// NeighborCache
// =============================================================================

/// Per-interface ARP cache.  See the [module documentation](self).
pub struct NeighborCache {
    entries: Vec<NeighborEntry>,
}

impl NeighborCache {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Look up the hardware address for `ip`, if resolved.
    pub fn lookup(&self, ip: Ipv4Addr) -> Option<MacAddr> {
        self.entries
            .iter()
            .find(|e| e.ip == ip)
            .and_then(|e| match &e.state {
                NeighborState::Resolved { mac, .. } => Some(*mac),
                NeighborState::Pending { .. } => None,
            })
    }

    /// Resolve `ip` for the transmission of `dgram`.
    ///
    /// - Resolved entry: the datagram comes straight back with the address.
    /// - Pending entry: the datagram joins that IP's waiting queue; no
    ///   second request goes out.
    /// - No entry: a pending entry is created with the datagram queued, and
    ///   the caller is told to broadcast a request.
    pub fn resolve(&mut self, ip: Ipv4Addr, dgram: InternetDatagram, now: u64) -> ResolveOutcome {
        match self.entries.iter_mut().find(|e| e.ip == ip) {
            Some(entry) => match &mut entry.state {
                NeighborState::Resolved { mac, .. } => ResolveOutcome::Resolved {
                    mac: *mac,
                    dgram,
                },
                NeighborState::Pending { waiting, .. } => {
                    waiting.push_back(dgram);
                    ResolveOutcome::Queued
                }
            },
            None => {
                let mut waiting = VecDeque::new();
                waiting.push_back(dgram);
                self.entries.push(NeighborEntry {
                    ip,
                    state: NeighborState::Pending {
                        requested_at: now,
                        waiting,
                    },
                });
                ResolveOutcome::RequestNeeded
            }
        }
    }

    /// Record `ip -> mac`, learned at `now`.
    ///
    /// Any pending entry for `ip` becomes resolved and its waiting queue is
    /// handed back in arrival order for the caller to transmit.  An already
    /// resolved entry is refreshed in place.
    pub fn learn(&mut self, ip: Ipv4Addr, mac: MacAddr, now: u64) -> VecDeque<InternetDatagram> {
        debug!("neighbor: learned {ip} -> {mac}");
        match self.entries.iter_mut().find(|e| e.ip == ip) {
            Some(entry) => {
                let waiting = match &mut entry.state {
                    NeighborState::Pending { waiting, .. } => core::mem::take(waiting),
                    NeighborState::Resolved { .. } => VecDeque::new(),
                };
                entry.state = NeighborState::Resolved {
                    mac,
                    learned_at: now,
                };
                waiting
            }
            None => {
                self.entries.push(NeighborEntry {
                    ip,
                    state: NeighborState::Resolved {
                        mac,
                        learned_at: now,
                    },
                });
                VecDeque::new()
            }
        }
    }

    /// Age the cache out to `now`.
    ///
    /// Resolved entries older than [`RESOLVED_TTL_MS`] and pending entries
    /// older than [`PENDING_TTL_MS`] are deleted; a deleted pending entry
    /// takes its whole waiting queue with it.
    pub fn expire(&mut self, now: u64) {
        self.entries.retain(|entry| match &entry.state {
            NeighborState::Resolved { learned_at, .. } => now - learned_at <= RESOLVED_TTL_MS,
            NeighborState::Pending {
                requested_at,
                waiting,
            } => {
                let alive = now - requested_at <= PENDING_TTL_MS;
                if !alive && !waiting.is_empty() {
                    debug!(
                        "neighbor: request for {} expired, dropping {} queued datagrams",
                        entry.ip,
                        waiting.len()
                    );
                }
                alive
            }
        });
    }

    /// Number of entries, resolved or pending (diagnostic).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for NeighborCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
