//! Internet checksum (RFC 1071).

/// One's complement of the one's complement sum of all 16-bit big-endian words in `data`.
///
/// A trailing odd byte is added as a zero-extended word. When computing the checksum of an
/// outgoing datagram its checksum field must be zero.
#[must_use]
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut words = data.chunks_exact(2);
    for word in &mut words {
        sum = sum.wrapping_add(u32::from(u16::from_be_bytes([word[0], word[1]])));
    }
    if let [last] = words.remainder() {
        sum = sum.wrapping_add(u32::from(*last) << 8);
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    // sum fits into 16 bits after folding
    #[allow(clippy::cast_possible_truncation)]
    let folded = sum as u16;
    !folded
}

/// A datagram carrying a correct checksum sums to zero including its checksum field.
#[must_use]
pub fn verify_checksum(data: &[u8]) -> bool {
    internet_checksum(data) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet_packet::icmp::echo_request::MutableEchoRequestPacket;
    use pnet_packet::icmp::{IcmpPacket, IcmpTypes};
    use pnet_packet::Packet;

    #[test]
    fn zeros_give_all_ones() {
        assert_eq!(0xFFFF, internet_checksum(&[0u8; 20]));
    }

    #[test]
    fn all_ones_fold_to_zero() {
        assert_eq!(0, internet_checksum(&[0xFFu8; 20]));
    }

    #[test]
    fn empty_input() {
        assert_eq!(0xFFFF, internet_checksum(&[]));
    }

    #[test]
    fn rfc_1071_example() {
        // RFC 1071 section 3: the sum of these words is 0xddf2 (after folding).
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(!0xddf2u16, internet_checksum(&data));
    }

    #[test]
    fn odd_length_pads_last_byte_with_zero() {
        assert_eq!(internet_checksum(&[0x12, 0x34, 0x56, 0x00]), internet_checksum(&[0x12, 0x34, 0x56]));
    }

    #[test]
    fn carries_are_folded_repeatedly() {
        // 0x1FFFF folds to 0x10000, which folds again to 0x0001.
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x01];
        assert_eq!(!0x0001u16, internet_checksum(&data));
    }

    #[test]
    fn verify_accepts_inserted_checksum() {
        let mut data = [
            0x45, 0x00, 0x00, 0x3c, 0x1c, 0x46, 0x40, 0x00, 0x40, 0x06, 0x00, 0x00, 0xac, 0x10, 0x0a, 0x63, 0xac,
            0x10, 0x0a, 0x0c,
        ];
        let checksum = internet_checksum(&data);
        data[10..12].copy_from_slice(&checksum.to_be_bytes());

        assert!(verify_checksum(&data));
        data[0] ^= 0x01;
        assert!(!verify_checksum(&data));
    }

    #[test]
    fn agrees_with_pnet_icmp_checksum() {
        let mut package = MutableEchoRequestPacket::owned(vec![0u8; 8 + 8]).unwrap();
        package.set_icmp_type(IcmpTypes::EchoRequest);
        package.set_identifier(0xBEEF);
        package.set_sequence_number(42);
        package.set_payload(&[1, 2, 3, 4, 5, 6, 7, 8]);

        let expected = pnet_packet::icmp::checksum(&IcmpPacket::new(package.packet()).unwrap());
        assert_eq!(expected, internet_checksum(package.packet()));
    }
}
