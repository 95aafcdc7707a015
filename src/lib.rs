#![warn(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub use ping_error::{GenericError, PingError, PingErrorKind, PingResult};
pub use ping_observer::PingObserver;
pub use ping_session::{
    create, process_identifier, PingConfig, PingSession, DEFAULT_COUNT, DEFAULT_INTERVAL, DEFAULT_TIMEOUT,
};
pub use reply_matcher::{EchoReply, MatchState, Mismatch, ReceiveEvent, Rejection, ReplyMatcher, MAX_RECEIVE_ATTEMPTS};
pub use resolve::resolve;
pub use statistics::{PingStatistics, PingStatisticsSnapshot, RttSummary};

pub mod icmp;
mod ping_error;
mod ping_observer;
mod ping_session;
mod reply_matcher;
mod resolve;
mod statistics;
