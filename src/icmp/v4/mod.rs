pub mod checksum;

mod echo_request;
pub use echo_request::{payload, EchoRequest, ECHO_REQUEST_SIZE, ICMP_HEADER_SIZE, PAYLOAD_SIZE};

mod inbound;
pub use inbound::{icmp_type_name, parse_inbound, IcmpHeaderView, InboundDatagram, IpHeaderView};

mod sequence_number;
pub use sequence_number::SequenceNumber;

mod socket;
pub use socket::raw_socket::RawSocket;
pub use socket::{Receive, TSocket};

#[cfg(test)]
pub(crate) use socket::tests;

mod ttl;
pub use ttl::Ttl;
