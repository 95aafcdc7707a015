use crate::icmp::v4::{EchoRequest, InboundDatagram, SequenceNumber};
use crate::ping_error::PingError;
use crate::reply_matcher::{EchoReply, Rejection};
use crate::statistics::PingStatisticsSnapshot;
use std::net::Ipv4Addr;

/// Hooks invoked by a [`crate::PingSession`] at each step of a run. Every method defaults to
/// doing nothing, so implementors only override what they want to report.
#[allow(unused_variables)]
pub trait PingObserver {
    fn on_packet_built(&mut self, request: &EchoRequest) {}

    fn on_packet_sent(&mut self, request: &EchoRequest, destination: Ipv4Addr, n_bytes: usize) {}

    fn on_send_failed(&mut self, sequence_number: SequenceNumber, error: &PingError) {}

    /// A datagram was received and parsed, before it is checked against the outstanding request.
    fn on_datagram_received(&mut self, datagram: &InboundDatagram, source: Ipv4Addr) {}

    fn on_reply_rejected(&mut self, attempt: u8, attempt_budget: u8, rejection: &Rejection) {}

    fn on_reply_matched(&mut self, reply: &EchoReply) {}

    /// The receive phase ended without a matching reply: timeout, receive error or exhausted
    /// attempt budget.
    fn on_reply_missing(&mut self, sequence_number: SequenceNumber, error: &PingError) {}

    fn on_statistics(&mut self, snapshot: &PingStatisticsSnapshot) {}
}

impl PingObserver for () {}

impl<O: PingObserver + ?Sized> PingObserver for &mut O {
    fn on_packet_built(&mut self, request: &EchoRequest) {
        (**self).on_packet_built(request);
    }

    fn on_packet_sent(&mut self, request: &EchoRequest, destination: Ipv4Addr, n_bytes: usize) {
        (**self).on_packet_sent(request, destination, n_bytes);
    }

    fn on_send_failed(&mut self, sequence_number: SequenceNumber, error: &PingError) {
        (**self).on_send_failed(sequence_number, error);
    }

    fn on_datagram_received(&mut self, datagram: &InboundDatagram, source: Ipv4Addr) {
        (**self).on_datagram_received(datagram, source);
    }

    fn on_reply_rejected(&mut self, attempt: u8, attempt_budget: u8, rejection: &Rejection) {
        (**self).on_reply_rejected(attempt, attempt_budget, rejection);
    }

    fn on_reply_matched(&mut self, reply: &EchoReply) {
        (**self).on_reply_matched(reply);
    }

    fn on_reply_missing(&mut self, sequence_number: SequenceNumber, error: &PingError) {
        (**self).on_reply_missing(sequence_number, error);
    }

    fn on_statistics(&mut self, snapshot: &PingStatisticsSnapshot) {
        (**self).on_statistics(snapshot);
    }
}
