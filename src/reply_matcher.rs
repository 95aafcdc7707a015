use crate::icmp::v4::{parse_inbound, Receive, SequenceNumber, TSocket, Ttl};
use crate::ping_error::{PingError, PingErrorKind, PingResult};
use crate::ping_observer::PingObserver;
use pnet_packet::icmp::IcmpTypes;
use std::io;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// Datagrams that may be rejected while waiting for one reply. Timeouts and receive errors end
/// the wait at once and never count against it.
pub const MAX_RECEIVE_ATTEMPTS: u8 = 10;

const RECEIVE_BUFFER_SIZE: usize = 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct EchoReply {
    pub source: Ipv4Addr,
    pub sequence_number: SequenceNumber,
    pub ttl: Ttl,
    /// ICMP bytes, without the IP header.
    pub icmp_size: usize,
    pub rtt_ms: f64,
}

/// Which of the three acceptance predicates held.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Mismatch {
    pub type_matches: bool,
    pub identifier_matches: bool,
    pub sequence_matches: bool,
}

impl Mismatch {
    fn is_match(self) -> bool {
        self.type_matches && self.identifier_matches && self.sequence_matches
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
    /// Our own echo request, seen on a loopback path.
    OwnEchoRequest,
    Mismatch(Mismatch),
    Malformed(String),
}

#[derive(Debug)]
pub enum MatchState {
    Waiting,
    /// The last datagram was rejected. Receiving continues while attempts remain.
    Rejected(Rejection),
    Accepted(EchoReply),
    TimedOut,
    /// Every attempt was spent on rejected datagrams.
    Exhausted,
    ReceiveError(io::Error),
}

impl MatchState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchState::Waiting | MatchState::Rejected(_))
    }
}

#[derive(Debug)]
pub enum ReceiveEvent<'a> {
    Datagram { bytes: &'a [u8], source: Ipv4Addr, receive_time: Instant },
    Timeout,
    Error(io::Error),
}

/// Waits for the echo reply matching one outstanding request.
#[derive(Debug)]
pub struct ReplyMatcher {
    expected_identifier: u16,
    expected_sequence_number: SequenceNumber,
    send_time: Instant,
    attempt_budget: u8,
    attempts: u8,
    state: MatchState,
}

impl ReplyMatcher {
    #[must_use]
    pub fn new(expected_identifier: u16, expected_sequence_number: SequenceNumber, send_time: Instant) -> Self {
        ReplyMatcher {
            expected_identifier,
            expected_sequence_number,
            send_time,
            attempt_budget: MAX_RECEIVE_ATTEMPTS,
            attempts: 0,
            state: MatchState::Waiting,
        }
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Datagrams consumed so far.
    #[must_use]
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Advances the state machine by one receive outcome. Events arriving after a terminal
    /// state are ignored.
    pub fn step<O: PingObserver>(&mut self, event: ReceiveEvent<'_>, observer: &mut O) -> &MatchState {
        if self.state.is_terminal() {
            return &self.state;
        }

        self.state = match event {
            ReceiveEvent::Timeout => {
                tracing::warn!("timeout waiting for icmp_seq={}", self.expected_sequence_number);
                MatchState::TimedOut
            }
            ReceiveEvent::Error(e) => {
                tracing::warn!("receive error waiting for icmp_seq={}: {}", self.expected_sequence_number, e);
                MatchState::ReceiveError(e)
            }
            ReceiveEvent::Datagram { bytes, source, receive_time } => {
                self.attempts += 1;
                match self.verify(bytes, source, receive_time, observer) {
                    Ok(reply) => {
                        tracing::trace!("echo reply icmp_seq={} matched", reply.sequence_number);
                        observer.on_reply_matched(&reply);
                        MatchState::Accepted(reply)
                    }
                    Err(rejection) => {
                        tracing::debug!(
                            "attempt {}/{} rejected: {:?}",
                            self.attempts,
                            self.attempt_budget,
                            rejection
                        );
                        observer.on_reply_rejected(self.attempts, self.attempt_budget, &rejection);
                        if self.attempts >= self.attempt_budget {
                            MatchState::Exhausted
                        } else {
                            MatchState::Rejected(rejection)
                        }
                    }
                }
            }
        };
        &self.state
    }

    fn verify<O: PingObserver>(
        &self,
        bytes: &[u8],
        source: Ipv4Addr,
        receive_time: Instant,
        observer: &mut O,
    ) -> Result<EchoReply, Rejection> {
        let datagram = parse_inbound(bytes).map_err(|e| Rejection::Malformed(e.message))?;
        observer.on_datagram_received(&datagram, source);

        let icmp = datagram.icmp;
        if icmp.icmp_type == IcmpTypes::EchoRequest {
            return Err(Rejection::OwnEchoRequest);
        }

        let mismatch = Mismatch {
            type_matches: icmp.icmp_type == IcmpTypes::EchoReply,
            identifier_matches: icmp.identifier == self.expected_identifier,
            sequence_matches: icmp.sequence_number == self.expected_sequence_number,
        };
        if !mismatch.is_match() {
            return Err(Rejection::Mismatch(mismatch));
        }

        Ok(EchoReply {
            source,
            sequence_number: icmp.sequence_number,
            ttl: datagram.ip.ttl,
            icmp_size: datagram.icmp_size,
            rtt_ms: rtt_ms(receive_time.saturating_duration_since(self.send_time)),
        })
    }

    /// Receives on `socket` until the state machine reaches a terminal state.
    pub fn run<S, O>(mut self, socket: &S, observer: &mut O) -> PingResult<EchoReply>
    where
        S: TSocket + ?Sized,
        O: PingObserver,
    {
        let mut buf = [0u8; RECEIVE_BUFFER_SIZE];
        while !self.state.is_terminal() {
            let event = match socket.receive(&mut buf) {
                Receive::Data { n_bytes, source } => ReceiveEvent::Datagram {
                    bytes: &buf[..n_bytes.min(RECEIVE_BUFFER_SIZE)],
                    source,
                    receive_time: Instant::now(),
                },
                Receive::Timeout => ReceiveEvent::Timeout,
                Receive::Error(e) => ReceiveEvent::Error(e),
            };
            self.step(event, observer);
        }
        self.into_result()
    }

    /// Exhaustion reports as a timeout.
    pub fn into_result(self) -> PingResult<EchoReply> {
        match self.state {
            MatchState::Accepted(reply) => Ok(reply),
            MatchState::TimedOut => Err(PingError::new(
                PingErrorKind::ReceiveTimeout,
                format!("no reply for icmp_seq={}", self.expected_sequence_number),
            )),
            MatchState::Exhausted => Err(PingError::new(
                PingErrorKind::ReceiveTimeout,
                format!(
                    "no matching reply for icmp_seq={} after {} attempts",
                    self.expected_sequence_number, self.attempts
                ),
            )),
            MatchState::ReceiveError(e) => Err(PingError::from_io(PingErrorKind::ReceiveError, &e)),
            MatchState::Waiting | MatchState::Rejected(_) => Err(PingError::new(
                PingErrorKind::ReceiveTimeout,
                format!("still waiting for icmp_seq={}", self.expected_sequence_number),
            )),
        }
    }
}

/// Fractional milliseconds at microsecond resolution.
#[allow(clippy::cast_precision_loss)]
fn rtt_ms(elapsed: Duration) -> f64 {
    elapsed.as_micros() as f64 / 1000.0
}
