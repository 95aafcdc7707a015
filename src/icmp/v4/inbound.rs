use super::checksum::verify_checksum;
use super::echo_request::ICMP_HEADER_SIZE;
use crate::icmp::v4::{SequenceNumber, Ttl};
use crate::ping_error::{PingError, PingErrorKind, PingResult};
use pnet_packet::icmp::echo_reply::EchoReplyPacket;
use pnet_packet::icmp::{IcmpCode, IcmpPacket, IcmpType, IcmpTypes};
use pnet_packet::ipv4::Ipv4Packet;

const MIN_IPV4_HEADER_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IpHeaderView {
    pub version: u8,
    /// In bytes.
    pub header_length: usize,
    pub ttl: Ttl,
    pub protocol: u8,
    pub total_length: u16,
}

/// The first eight bytes of an ICMP message. Identifier and sequence are only meaningful for
/// echo messages but are always decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IcmpHeaderView {
    pub icmp_type: IcmpType,
    pub icmp_code: IcmpCode,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence_number: SequenceNumber,
}

/// A raw-socket datagram split into its IPv4 and ICMP headers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InboundDatagram {
    pub ip: IpHeaderView,
    pub icmp: IcmpHeaderView,
    /// Bytes from the start of the ICMP header to the end of the buffer.
    pub icmp_size: usize,
    pub checksum_valid: bool,
}

fn malformed(message: String) -> PingError {
    PingError::new(PingErrorKind::MalformedPacket, message)
}

/// Parses a datagram as delivered by a raw IPv4 socket: IP header first, ICMP message after.
pub fn parse_inbound(bytes: &[u8]) -> PingResult<InboundDatagram> {
    let ipv4_packet = Ipv4Packet::new(bytes).ok_or_else(|| {
        malformed(format!("{} bytes cannot hold an IPv4 header", bytes.len()))
    })?;

    let header_length = usize::from(ipv4_packet.get_header_length()) * 4;
    if header_length < MIN_IPV4_HEADER_SIZE {
        return Err(malformed(format!("IPv4 header length {header_length} is below the minimum")));
    }
    if bytes.len() < header_length + ICMP_HEADER_SIZE {
        return Err(malformed(format!(
            "{} bytes cannot hold a {header_length} byte IPv4 header and an ICMP header",
            bytes.len()
        )));
    }

    let icmp_bytes = &bytes[header_length..];
    let icmp_packet = IcmpPacket::new(icmp_bytes)
        .ok_or_else(|| malformed(format!("{} bytes cannot hold an ICMP header", icmp_bytes.len())))?;
    let echo_packet = EchoReplyPacket::new(icmp_bytes)
        .ok_or_else(|| malformed(format!("{} bytes cannot hold an ICMP echo header", icmp_bytes.len())))?;

    Ok(InboundDatagram {
        ip: IpHeaderView {
            version: ipv4_packet.get_version(),
            header_length,
            ttl: ipv4_packet.get_ttl().into(),
            protocol: ipv4_packet.get_next_level_protocol().0,
            total_length: ipv4_packet.get_total_length(),
        },
        icmp: IcmpHeaderView {
            icmp_type: icmp_packet.get_icmp_type(),
            icmp_code: icmp_packet.get_icmp_code(),
            checksum: icmp_packet.get_checksum(),
            identifier: echo_packet.get_identifier(),
            sequence_number: echo_packet.get_sequence_number().into(),
        },
        icmp_size: icmp_bytes.len(),
        checksum_valid: verify_checksum(icmp_bytes),
    })
}

#[must_use]
pub fn icmp_type_name(icmp_type: IcmpType) -> &'static str {
    match icmp_type {
        IcmpTypes::EchoReply => "Echo Reply",
        IcmpTypes::DestinationUnreachable => "Destination Unreachable",
        IcmpTypes::RedirectMessage => "Redirect",
        IcmpTypes::EchoRequest => "Echo Request",
        IcmpTypes::TimeExceeded => "Time Exceeded",
        _ => "Unknown",
    }
}
