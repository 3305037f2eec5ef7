//! Ethernet II framing.
//!
//! Layout: `dst(6) | src(6) | ethertype(2, big-endian)` followed by payload
//! bytes.  No FCS, no VLAN tags.

use alloc::vec::Vec;

use crate::ParseError;
use crate::types::{EtherType, MacAddr};

/// Length of the Ethernet II header.
pub const ETH_HEADER_LEN: usize = 14;

/// Ethernet II header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub ethertype: EtherType,
}

impl EthernetHeader {
    /// Parse the first [`ETH_HEADER_LEN`] bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < ETH_HEADER_LEN {
            return Err(ParseError::Truncated);
        }
        let dst = MacAddr([data[0], data[1], data[2], data[3], data[4], data[5]]);
        let src = MacAddr([data[6], data[7], data[8], data[9], data[10], data[11]]);
        let raw = u16::from_be_bytes([data[12], data[13]]);
        let ethertype = EtherType::from_u16(raw).ok_or(ParseError::UnknownEtherType)?;
        Ok(Self { dst, src, ethertype })
    }

    /// Append the 14 header bytes to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.dst.0);
        out.extend_from_slice(&self.src.0);
        out.extend_from_slice(&self.ethertype.as_u16().to_be_bytes());
    }
}

/// A complete Ethernet frame: header plus serialized payload bytes.
///
/// The payload is opaque at this layer; the header's `ethertype` says how to
/// interpret it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthernetFrame {
    pub header: EthernetHeader,
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    pub fn new(dst: MacAddr, src: MacAddr, ethertype: EtherType, payload: Vec<u8>) -> Self {
        Self {
            header: EthernetHeader { dst, src, ethertype },
            payload,
        }
    }

    /// Parse a whole frame; everything past the header is payload.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let header = EthernetHeader::parse(data)?;
        Ok(Self {
            header,
            payload: data[ETH_HEADER_LEN..].to_vec(),
        })
    }

    /// Serialize to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ETH_HEADER_LEN + self.payload.len());
        self.header.write(&mut out);
        out.extend_from_slice(&self.payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let frame = EthernetFrame::new(
            MacAddr([2, 0, 0, 0, 0, 1]),
            MacAddr([2, 0, 0, 0, 0, 2]),
            EtherType::Ipv4,
            alloc::vec![0xde, 0xad, 0xbe, 0xef],
        );
        let bytes = frame.serialize();
        assert_eq!(bytes.len(), ETH_HEADER_LEN + 4);
        assert_eq!(EthernetFrame::parse(&bytes), Ok(frame));
    }

    #[test]
    fn truncated_header_rejected() {
        assert_eq!(
            EthernetHeader::parse(&[0u8; ETH_HEADER_LEN - 1]),
            Err(ParseError::Truncated)
        );
    }

    #[test]
    fn unknown_ethertype_rejected() {
        let mut bytes = EthernetFrame::new(
            MacAddr::BROADCAST,
            MacAddr([2, 0, 0, 0, 0, 2]),
            EtherType::Arp,
            alloc::vec![],
        )
        .serialize();
        bytes[12] = 0x12;
        bytes[13] = 0x34;
        assert_eq!(EthernetFrame::parse(&bytes), Err(ParseError::UnknownEtherType));
    }
}
