use crate::icmp::v4::{EchoRequest, RawSocket, SequenceNumber, TSocket};
use crate::ping_error::{PingError, PingErrorKind, PingResult};
use crate::ping_observer::PingObserver;
use crate::reply_matcher::ReplyMatcher;
use crate::statistics::{PingStatistics, PingStatisticsSnapshot};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

pub const DEFAULT_COUNT: u32 = 4;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PingConfig {
    pub ip: Ipv4Addr,
    /// Receive timeout applied to the socket.
    pub timeout: Duration,
    pub count: u32,
    /// ICMP identifier carried by every request of the session.
    pub identifier: u16,
    /// Pause between two consecutive requests.
    pub interval: Duration,
}

impl PingConfig {
    #[must_use]
    pub fn new(ip: Ipv4Addr, count: u32) -> Self {
        PingConfig { ip, timeout: DEFAULT_TIMEOUT, count, identifier: process_identifier(), interval: DEFAULT_INTERVAL }
    }
}

/// The low 16 bits of the process id, the identifier ping implementations conventionally use.
#[must_use]
pub fn process_identifier() -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let identifier = std::process::id() as u16;
    identifier
}

/// Opens a raw socket for `config` and wraps it in a session.
pub fn create<O: PingObserver>(config: &PingConfig, observer: O) -> PingResult<PingSession<RawSocket, O>> {
    let socket = RawSocket::new(config.timeout).map_err(|e| {
        tracing::error!("could not create raw socket: {}", e);
        PingError::from_io(PingErrorKind::SocketCreationFailed, &e)
    })?;
    Ok(PingSession::with_socket(config.clone(), socket, observer))
}

/// One ping run against a single destination. Exactly one request is outstanding at any time.
#[allow(clippy::module_name_repetitions)]
pub struct PingSession<S, O> {
    config: PingConfig,
    socket: S,
    observer: O,
    statistics: PingStatistics,
}

impl<S, O> PingSession<S, O>
where
    S: TSocket,
    O: PingObserver,
{
    pub fn with_socket(config: PingConfig, socket: S, observer: O) -> Self {
        PingSession { config, socket, observer, statistics: PingStatistics::new() }
    }

    #[must_use]
    pub fn config(&self) -> &PingConfig {
        &self.config
    }

    /// Whether the socket bounds each receive by `config.timeout`. When it does not, a run can
    /// hang on a silent destination.
    #[must_use]
    pub fn timeout_configured(&self) -> bool {
        self.socket.timeout_configured()
    }

    /// Pings `config.count` times and returns the final statistics. The socket is closed when
    /// the session is consumed.
    pub fn run(mut self, host: &str) -> PingStatisticsSnapshot {
        let mut sequence_number = SequenceNumber::start_value();
        for remaining in (0..self.config.count).rev() {
            self.ping_once(sequence_number);
            if remaining > 0 && !self.config.interval.is_zero() {
                std::thread::sleep(self.config.interval);
            }
            sequence_number = sequence_number.next();
        }

        let snapshot = self.statistics.snapshot(host);
        self.observer.on_statistics(&snapshot);
        snapshot
    }

    fn ping_once(&mut self, sequence_number: SequenceNumber) {
        let request = match EchoRequest::build(self.config.identifier, sequence_number) {
            Ok(request) => request,
            Err(e) => {
                self.observer.on_send_failed(sequence_number, &e);
                self.statistics.record_error();
                return;
            }
        };
        self.observer.on_packet_built(&request);

        let send_time = Instant::now();
        if let Err(e) = self.send(&request) {
            tracing::warn!("could not send icmp_seq={}: {}", sequence_number, e);
            self.observer.on_send_failed(sequence_number, &e);
            self.statistics.record_error();
            return;
        }
        self.statistics.record_transmitted();

        let matcher = ReplyMatcher::new(self.config.identifier, sequence_number, send_time);
        match matcher.run(&self.socket, &mut self.observer) {
            Ok(reply) => self.statistics.record_received(reply.rtt_ms),
            Err(e) => {
                self.observer.on_reply_missing(sequence_number, &e);
                self.statistics.record_error();
            }
        }
    }

    fn send(&mut self, request: &EchoRequest) -> PingResult<usize> {
        let addr: socket2::SockAddr = SocketAddr::new(IpAddr::V4(self.config.ip), 0).into();
        let n_bytes = self
            .socket
            .send_to(request.as_bytes(), &addr)
            .map_err(|e| PingError::from_io(PingErrorKind::SendFailed, &e))?;
        tracing::trace!("icmp_seq={} sent {} bytes to {}", request.sequence_number(), n_bytes, self.config.ip);
        self.observer.on_packet_sent(request, self.config.ip, n_bytes);
        Ok(n_bytes)
    }
}
