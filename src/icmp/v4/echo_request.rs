use crate::icmp::v4::SequenceNumber;
use crate::ping_error::{PingError, PingErrorKind, PingResult};
use pnet_packet::icmp::echo_request::{EchoRequestPacket, MutableEchoRequestPacket};
use pnet_packet::icmp::{IcmpCode, IcmpPacket, IcmpTypes};
use pnet_packet::Packet;

pub const PAYLOAD_SIZE: usize = 56;
pub const ICMP_HEADER_SIZE: usize = 8;
pub const ECHO_REQUEST_SIZE: usize = ICMP_HEADER_SIZE + PAYLOAD_SIZE;

/// Fixed padding pattern: byte `i` is `i + 0x20`.
#[must_use]
pub fn payload() -> [u8; PAYLOAD_SIZE] {
    let mut payload = [0u8; PAYLOAD_SIZE];
    for (i, byte) in payload.iter_mut().enumerate() {
        // i < PAYLOAD_SIZE
        #[allow(clippy::cast_possible_truncation)]
        let value = (i as u8).wrapping_add(0x20);
        *byte = value;
    }
    payload
}

/// An encoded ICMP echo request, ready to be sent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EchoRequest {
    identifier: u16,
    sequence_number: SequenceNumber,
    checksum: u16,
    bytes: Vec<u8>,
}

impl EchoRequest {
    pub fn build(identifier: u16, sequence_number: SequenceNumber) -> PingResult<EchoRequest> {
        let buf = vec![0u8; EchoRequestPacket::minimum_packet_size() + PAYLOAD_SIZE];
        let mut package = MutableEchoRequestPacket::owned(buf).ok_or_else(|| {
            PingError::new(PingErrorKind::SendFailed, "could not create ICMP package")
        })?;
        package.set_icmp_type(IcmpTypes::EchoRequest);
        package.set_icmp_code(IcmpCode::new(0));
        package.set_identifier(identifier);
        package.set_sequence_number(sequence_number.into());
        package.set_payload(&payload());

        package.set_checksum(0_u16);
        let icmp_packet = IcmpPacket::new(package.packet())
            .ok_or_else(|| PingError::new(PingErrorKind::SendFailed, "could not view ICMP package"))?;
        let checksum = pnet_packet::icmp::checksum(&icmp_packet);
        package.set_checksum(checksum);

        Ok(EchoRequest { identifier, sequence_number, checksum, bytes: package.packet().to_vec() })
    }

    #[must_use]
    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    #[must_use]
    pub fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }

    #[must_use]
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
