//! Shared builders for the interface and router scenarios.
#![allow(dead_code)]

use ethgate_net::NetworkInterface;
use ethgate_wire::arp::ArpMessage;
use ethgate_wire::ethernet::EthernetFrame;
use ethgate_wire::ipv4::{IPV4_HEADER_LEN, InternetDatagram, Ipv4Header};
use ethgate_wire::types::{EtherType, Ipv4Addr, MacAddr};

/// A locally administered unicast hardware address, distinct per tag.
pub fn mac(tag: u8) -> MacAddr {
    MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, tag])
}

/// A small datagram with a "hello" payload and a freshly computed checksum.
pub fn make_datagram(src: Ipv4Addr, dst: Ipv4Addr) -> InternetDatagram {
    make_datagram_ttl(src, dst, ethgate_wire::ipv4::DEFAULT_TTL)
}

pub fn make_datagram_ttl(src: Ipv4Addr, dst: Ipv4Addr, ttl: u8) -> InternetDatagram {
    let payload = b"hello".to_vec();
    let mut header = Ipv4Header {
        src,
        dst,
        ttl,
        len: (IPV4_HEADER_LEN + payload.len()) as u16,
        ..Ipv4Header::default()
    };
    header.compute_checksum();
    InternetDatagram { header, payload }
}

pub fn arp_frame(src: MacAddr, dst: MacAddr, msg: &ArpMessage) -> EthernetFrame {
    EthernetFrame::new(dst, src, EtherType::Arp, msg.serialize())
}

pub fn ipv4_frame(src: MacAddr, dst: MacAddr, dgram: &InternetDatagram) -> EthernetFrame {
    EthernetFrame::new(dst, src, EtherType::Ipv4, dgram.serialize())
}

/// Assert the interface's next outbound frame is exactly `expected`.
pub fn expect_frame(iface: &mut NetworkInterface, expected: &EthernetFrame) {
    let frame = iface.maybe_send().expect("an outbound frame should be queued");
    assert_eq!(&frame, expected);
}

/// Assert the interface has nothing left to transmit.
pub fn expect_no_frame(iface: &mut NetworkInterface) {
    assert!(iface.maybe_send().is_none(), "no outbound frame should be queued");
}
