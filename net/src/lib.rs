//! User-space IPv4-over-Ethernet link layer.
//!
//! A [`NetworkInterface`] bridges a network layer that speaks IPv4 datagrams
//! to a link layer that speaks Ethernet frames, resolving next-hop IP
//! addresses to hardware addresses with ARP ([`neighbor`]).  A [`Router`]
//! owns several interfaces and forwards datagrams between them by
//! longest-prefix match ([`route`]).
//!
//! # Event model
//!
//! Everything is synchronous, single-threaded, and driven from outside:
//! the host feeds received frames to `recv_frame`, hands outgoing datagrams
//! to `send_datagram`, advances time with `tick`, and drains the frames the
//! stack wants transmitted with `maybe_send`.  No operation blocks, no
//! thread is spawned, and no wall clock is ever read.  `tick` is the only
//! source of time, which keeps the whole stack deterministic under a
//! simulated clock.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod iface;
pub mod neighbor;
pub mod route;
pub mod router;

pub use iface::{NetworkInterface, QueuedInterface};
pub use neighbor::NeighborCache;
pub use route::{RouteEntry, RouteTable};
pub use router::Router;
