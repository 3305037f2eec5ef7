//! ARP message codec (RFC 826, Ethernet/IPv4 pairing only).
//!
//! Layout, all multi-byte fields big-endian:
//! `htype(2) | ptype(2) | hlen(1) | plen(1) | oper(2) | sender_mac(6) |
//! sender_ip(4) | target_mac(6) | target_ip(4)`.
//!
//! Messages for any other hardware/protocol pairing, or with an opcode
//! other than REQUEST/REPLY, fail to parse and are dropped by the caller.

use alloc::vec::Vec;

use crate::ParseError;
use crate::types::{Ipv4Addr, MacAddr};

pub const ARP_HTYPE_ETHERNET: u16 = 1;
pub const ARP_PTYPE_IPV4: u16 = 0x0800;
pub const ARP_HLEN_ETHERNET: u8 = 6;
pub const ARP_PLEN_IPV4: u8 = 4;

/// Length of an Ethernet/IPv4 ARP message.
pub const ARP_MESSAGE_LEN: usize = 28;

/// ARP operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum ArpOpcode {
    Request = 1,
    Reply = 2,
}

impl ArpOpcode {
    /// Parse from the raw `oper` field.  Returns `None` for anything else.
    #[inline]
    pub const fn from_u16(val: u16) -> Option<Self> {
        match val {
            1 => Some(Self::Request),
            2 => Some(Self::Reply),
            _ => None,
        }
    }

    /// Return the raw `u16` value.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// An Ethernet/IPv4 ARP message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArpMessage {
    pub opcode: ArpOpcode,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpMessage {
    /// Build a who-has request.  The target hardware address is zeroed; the
    /// answer is what the request is asking for.
    pub fn request(sender_mac: MacAddr, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        Self {
            opcode: ArpOpcode::Request,
            sender_mac,
            sender_ip,
            target_mac: MacAddr::ZERO,
            target_ip,
        }
    }

    /// Build a reply answering `target`'s request.
    pub fn reply(
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    ) -> Self {
        Self {
            opcode: ArpOpcode::Reply,
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        }
    }

    /// Parse an ARP message, rejecting anything that is not an
    /// Ethernet/IPv4 REQUEST or REPLY.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < ARP_MESSAGE_LEN {
            return Err(ParseError::Truncated);
        }

        let htype = u16::from_be_bytes([data[0], data[1]]);
        let ptype = u16::from_be_bytes([data[2], data[3]]);
        let hlen = data[4];
        let plen = data[5];
        if htype != ARP_HTYPE_ETHERNET
            || ptype != ARP_PTYPE_IPV4
            || hlen != ARP_HLEN_ETHERNET
            || plen != ARP_PLEN_IPV4
        {
            return Err(ParseError::UnsupportedArp);
        }

        let oper = u16::from_be_bytes([data[6], data[7]]);
        let opcode = ArpOpcode::from_u16(oper).ok_or(ParseError::UnsupportedArp)?;

        Ok(Self {
            opcode,
            sender_mac: MacAddr([data[8], data[9], data[10], data[11], data[12], data[13]]),
            sender_ip: Ipv4Addr([data[14], data[15], data[16], data[17]]),
            target_mac: MacAddr([data[18], data[19], data[20], data[21], data[22], data[23]]),
            target_ip: Ipv4Addr([data[24], data[25], data[26], data[27]]),
        })
    }

    /// Serialize to the fixed 28-byte wire layout.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ARP_MESSAGE_LEN);
        out.extend_from_slice(&ARP_HTYPE_ETHERNET.to_be_bytes());
        out.extend_from_slice(&ARP_PTYPE_IPV4.to_be_bytes());
        out.push(ARP_HLEN_ETHERNET);
        out.push(ARP_PLEN_IPV4);
        out.extend_from_slice(&self.opcode.as_u16().to_be_bytes());
        out.extend_from_slice(&self.sender_mac.0);
        out.extend_from_slice(&self.sender_ip.0);
        out.extend_from_slice(&self.target_mac.0);
        out.extend_from_slice(&self.target_ip.0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> ArpMessage {
        ArpMessage::request(
            MacAddr([2, 0, 0, 0, 0, 7]),
            Ipv4Addr([10, 0, 0, 1]),
            Ipv4Addr([10, 0, 0, 2]),
        )
    }

    #[test]
    fn round_trip_request() {
        let msg = sample_request();
        let bytes = msg.serialize();
        assert_eq!(bytes.len(), ARP_MESSAGE_LEN);
        assert_eq!(ArpMessage::parse(&bytes), Ok(msg));
        assert!(msg.target_mac.is_zero());
    }

    #[test]
    fn round_trip_reply() {
        let msg = ArpMessage::reply(
            MacAddr([2, 0, 0, 0, 0, 7]),
            Ipv4Addr([10, 0, 0, 1]),
            MacAddr([2, 0, 0, 0, 0, 9]),
            Ipv4Addr([10, 0, 0, 2]),
        );
        assert_eq!(ArpMessage::parse(&msg.serialize()), Ok(msg));
    }

    #[test]
    fn wrong_hardware_type_rejected() {
        let mut bytes = sample_request().serialize();
        bytes[1] = 6; // IEEE 802 instead of Ethernet
        assert_eq!(ArpMessage::parse(&bytes), Err(ParseError::UnsupportedArp));
    }

    #[test]
    fn unknown_opcode_rejected() {
        let mut bytes = sample_request().serialize();
        bytes[7] = 3; // RARP request
        assert_eq!(ArpMessage::parse(&bytes), Err(ParseError::UnsupportedArp));
    }

    #[test]
    fn truncated_rejected() {
        let bytes = sample_request().serialize();
        assert_eq!(
            ArpMessage::parse(&bytes[..ARP_MESSAGE_LEN - 1]),
            Err(ParseError::Truncated)
        );
    }
}
