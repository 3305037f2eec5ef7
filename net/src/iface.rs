//! A single network interface: the bridge between IPv4 datagrams and
//! Ethernet frames.
//!
//! # Egress
//!
//! [`NetworkInterface::send_datagram`] consults the neighbor cache.  On a
//! hit the datagram is framed immediately; on a miss it waits in the cache
//! while a broadcast ARP request goes out (at most one request per next-hop
//! IP per [`PENDING_TTL_MS`](crate::neighbor::PENDING_TTL_MS) window).
//! Frames accumulate on an outbound FIFO that the host drains with
//! [`NetworkInterface::maybe_send`].
//!
//! # Ingress
//!
//! [`NetworkInterface::recv_frame`] filters on the destination hardware
//! address (ours or broadcast), then dispatches on EtherType.  IPv4 payloads
//! parse into datagrams for the caller; ARP messages are consumed here:
//! the sender mapping is learned, queued datagrams are flushed, and
//! requests for our own address get a unicast reply.  Malformed or
//! unsupported payloads are dropped without a word to the caller.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use log::debug;

use ethgate_wire::arp::{ArpMessage, ArpOpcode};
use ethgate_wire::ethernet::EthernetFrame;
use ethgate_wire::ipv4::InternetDatagram;
use ethgate_wire::types::{EtherType, Ipv4Addr, MacAddr};

use crate::neighbor::{NeighborCache, ResolveOutcome};

/// One attachment point to an Ethernet segment.
pub struct NetworkInterface {
    mac: MacAddr,
    ip: Ipv4Addr,
    /// Milliseconds since construction, advanced only by [`Self::tick`].
    now_ms: u64,
    neighbors: NeighborCache,
    outbound: VecDeque<EthernetFrame>,
}

impl NetworkInterface {
    /// Create an interface that owns the given hardware and IP addresses.
    pub fn new(mac: MacAddr, ip: Ipv4Addr) -> Self {
        debug!("iface: up with Ethernet address {mac} and IP address {ip}");
        Self {
            mac,
            ip,
            now_ms: 0,
            neighbors: NeighborCache::new(),
            outbound: VecDeque::new(),
        }
    }

    /// This interface's hardware address.
    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    /// This interface's IP address.
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    /// Send `dgram` towards `next_hop` (a router, gateway, or the final
    /// destination itself when directly attached).
    ///
    /// With the next hop's hardware address in cache the frame is queued at
    /// once; otherwise the datagram waits on ARP resolution.
    pub fn send_datagram(&mut self, dgram: InternetDatagram, next_hop: Ipv4Addr) {
        match self.neighbors.resolve(next_hop, dgram, self.now_ms) {
            ResolveOutcome::Resolved { mac, dgram } => self.push_ipv4(mac, &dgram),
            ResolveOutcome::Queued => {}
            ResolveOutcome::RequestNeeded => self.push_arp_request(next_hop),
        }
    }

    /// Accept a frame from the wire.
    ///
    /// Returns the enclosed IPv4 datagram when there is one for the upper
    /// layer.  ARP traffic is handled internally and never surfaces.
    pub fn recv_frame(&mut self, frame: &EthernetFrame) -> Option<InternetDatagram> {
        if !frame.header.dst.is_broadcast() && frame.header.dst != self.mac {
            return None;
        }

        match frame.header.ethertype {
            EtherType::Ipv4 => match InternetDatagram::parse(&frame.payload) {
                Ok(dgram) => Some(dgram),
                Err(err) => {
                    debug!("iface: dropping IPv4 payload from {}: {err}", frame.header.src);
                    None
                }
            },
            EtherType::Arp => {
                self.recv_arp(frame);
                None
            }
            EtherType::Ipv6 => None,
        }
    }

    /// Advance the clock and age the neighbor cache.
    pub fn tick(&mut self, ms: u64) {
        self.now_ms += ms;
        self.neighbors.expire(self.now_ms);
    }

    /// Pop the next frame to put on the wire, if any.
    pub fn maybe_send(&mut self) -> Option<EthernetFrame> {
        self.outbound.pop_front()
    }

    fn recv_arp(&mut self, frame: &EthernetFrame) {
        let msg = match ArpMessage::parse(&frame.payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!("iface: dropping ARP payload from {}: {err}", frame.header.src);
                return;
            }
        };

        // Learn the sender mapping from any valid message, request or reply.
        let waiting = self.neighbors.learn(msg.sender_ip, msg.sender_mac, self.now_ms);

        // Answer a request for our address before flushing, so the reply
        // precedes the data on the wire.
        if msg.opcode == ArpOpcode::Request && msg.target_ip == self.ip {
            let reply = ArpMessage::reply(self.mac, self.ip, msg.sender_mac, msg.sender_ip);
            self.push_frame(frame.header.src, EtherType::Arp, reply.serialize());
        }

        for dgram in waiting {
            self.push_ipv4(msg.sender_mac, &dgram);
        }
    }

    fn push_ipv4(&mut self, dst: MacAddr, dgram: &InternetDatagram) {
        self.push_frame(dst, EtherType::Ipv4, dgram.serialize());
    }

    fn push_arp_request(&mut self, target_ip: Ipv4Addr) {
        debug!("iface: ARP who-has {target_ip} tell {}", self.ip);
        let request = ArpMessage::request(self.mac, self.ip, target_ip);
        self.push_frame(MacAddr::BROADCAST, EtherType::Arp, request.serialize());
    }

    fn push_frame(&mut self, dst: MacAddr, ethertype: EtherType, payload: Vec<u8>) {
        self.outbound.push_back(EthernetFrame::new(dst, self.mac, ethertype, payload));
    }
}

// =============================================================================
// QueuedInterface
// =============================================================================

/// A [`NetworkInterface`] plus an upper-layer ingress queue.
///
/// The router wants to pull received datagrams at its own pace rather than
/// at frame-arrival time, so this wrapper parks whatever
/// [`NetworkInterface::recv_frame`] returns until
/// [`QueuedInterface::maybe_receive`] asks for it.  Everything else derefs
/// through to the inner interface.
pub struct QueuedInterface {
    iface: NetworkInterface,
    ingress: VecDeque<InternetDatagram>,
}

impl QueuedInterface {
    pub fn new(iface: NetworkInterface) -> Self {
        Self {
            iface,
            ingress: VecDeque::new(),
        }
    }

    /// Accept a frame from the wire, queueing any enclosed datagram.
    pub fn recv_frame(&mut self, frame: &EthernetFrame) {
        if let Some(dgram) = self.iface.recv_frame(frame) {
            self.ingress.push_back(dgram);
        }
    }

    /// Pop the next received datagram, if any.
    pub fn maybe_receive(&mut self) -> Option<InternetDatagram> {
        self.ingress.pop_front()
    }
}

impl Deref for QueuedInterface {
    type Target = NetworkInterface;

    fn deref(&self) -> &NetworkInterface {
        &self.iface
    }
}

impl DerefMut for QueuedInterface {
    fn deref_mut(&mut self) -> &mut NetworkInterface {
        &mut self.iface
    }
}
