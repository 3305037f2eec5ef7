//! Wire-format codecs for the ethgate link layer.
//!
//! Hand-rolled big-endian slice codecs for the three frame types the stack
//! speaks: Ethernet II ([`ethernet`]), ARP for the Ethernet/IPv4 pairing
//! ([`arp`]), and the IPv4 header ([`ipv4`]).  Address newtypes live in
//! [`types`].
//!
//! Every codec is a pure function over byte slices: `parse` returns
//! `Result<T, ParseError>` and `serialize` returns the exact bytes that
//! `parse` accepts, so `parse(serialize(x)) == x` holds for every value the
//! stack can emit.  Callers treat any `ParseError` as "drop this frame".

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arp;
pub mod ethernet;
pub mod ipv4;
pub mod types;

pub use arp::{ArpMessage, ArpOpcode};
pub use ethernet::{EthernetFrame, EthernetHeader};
pub use ipv4::{InternetDatagram, Ipv4Header};
pub use types::{EtherType, Ipv4Addr, MacAddr};

use core::fmt;

/// Reason a byte slice was rejected by a codec.
///
/// The stack never surfaces these to its caller; they exist so the drop
/// paths can log something more useful than "parse failed".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer bytes than the fixed header layout requires.
    Truncated,
    /// EtherType field is not one the stack knows.
    UnknownEtherType,
    /// ARP message is not Ethernet/IPv4 REQUEST or REPLY.
    UnsupportedArp,
    /// IP version field is not 4.
    BadVersion,
    /// IHL below the 20-byte minimum.
    BadHeaderLength,
    /// Total-length field smaller than the header it describes.
    BadLength,
    /// IPv4 header checksum does not verify.
    BadChecksum,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated"),
            Self::UnknownEtherType => write!(f, "unknown EtherType"),
            Self::UnsupportedArp => write!(f, "unsupported ARP message"),
            Self::BadVersion => write!(f, "bad IP version"),
            Self::BadHeaderLength => write!(f, "bad IP header length"),
            Self::BadLength => write!(f, "bad IP total length"),
            Self::BadChecksum => write!(f, "bad IP header checksum"),
        }
    }
}
