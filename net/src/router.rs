//! IPv4 forwarder over a set of network interfaces.
//!
//! The router owns its interfaces (each wrapped in a [`QueuedInterface`] so
//! received datagrams park until the router asks for them) and a
//! [`RouteTable`].  One call to [`Router::route`] is one scheduling round:
//! every interface's ingress queue is drained in index order, and each
//! datagram is matched, aged one hop, and re-injected on its egress
//! interface.  Datagrams with no matching route or without TTL left to
//! spend are dropped without ceremony; no ICMP is generated.

use alloc::vec::Vec;

use log::debug;

use ethgate_wire::types::Ipv4Addr;

use crate::iface::{NetworkInterface, QueuedInterface};
use crate::route::{RouteEntry, RouteTable};

pub struct Router {
    interfaces: Vec<QueuedInterface>,
    routes: RouteTable,
}

impl Router {
    /// Create a router with no interfaces and an empty table.
    pub fn new() -> Self {
        Self {
            interfaces: Vec::new(),
            routes: RouteTable::new(),
        }
    }

    /// Adopt an interface; returns its index for use in routes.
    pub fn add_interface(&mut self, iface: NetworkInterface) -> usize {
        self.interfaces.push(QueuedInterface::new(iface));
        self.interfaces.len() - 1
    }

    /// The interface at `idx` (for the host to drain frames from).
    pub fn interface(&self, idx: usize) -> &QueuedInterface {
        &self.interfaces[idx]
    }

    /// The interface at `idx`, mutably (for the host to feed frames into).
    pub fn interface_mut(&mut self, idx: usize) -> &mut QueuedInterface {
        &mut self.interfaces[idx]
    }

    /// Number of owned interfaces.
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Add a forwarding entry.  `next_hop` of `None` means the network is
    /// directly attached and datagrams go to their own destination address.
    pub fn add_route(
        &mut self,
        prefix: Ipv4Addr,
        prefix_len: u8,
        next_hop: Option<Ipv4Addr>,
        iface: usize,
    ) {
        self.routes.add(RouteEntry {
            prefix,
            prefix_len,
            next_hop,
            iface,
        });
    }

    /// Forward everything currently received: drain each interface's
    /// ingress queue in index order and dispatch datagram by datagram.
    pub fn route(&mut self) {
        for idx in 0..self.interfaces.len() {
            while let Some(mut dgram) = self.interfaces[idx].maybe_receive() {
                let dst = dgram.header.dst;

                let Some((egress, next_hop)) = self
                    .routes
                    .lookup(dst)
                    .map(|route| (route.iface, route.next_hop_for(dst)))
                else {
                    debug!("router: no route to {dst}, dropping");
                    continue;
                };

                // A hop costs one TTL; a datagram that cannot pay stops here.
                if dgram.header.ttl <= 1 {
                    debug!("router: TTL expired on datagram for {dst}, dropping");
                    continue;
                }
                dgram.header.decrement_ttl();

                self.interfaces[egress].send_datagram(dgram, next_hop);
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
