use std::fmt;
use std::time::{Duration, Instant};

/// Counters and round-trip samples of one ping run.
#[derive(Clone, Debug)]
pub struct PingStatistics {
    transmitted: u32,
    received: u32,
    errors: u32,
    total_rtt_ms: f64,
    min_rtt_ms: f64,
    max_rtt_ms: f64,
    rtts_ms: Vec<f64>,
    start_time: Instant,
}

impl Default for PingStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl PingStatistics {
    #[must_use]
    pub fn new() -> Self {
        PingStatistics {
            transmitted: 0,
            received: 0,
            errors: 0,
            total_rtt_ms: 0.0,
            min_rtt_ms: f64::INFINITY,
            max_rtt_ms: 0.0,
            rtts_ms: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record_transmitted(&mut self) {
        self.transmitted += 1;
        tracing::trace!("transmitted {}", self.transmitted);
    }

    pub fn record_received(&mut self, rtt_ms: f64) {
        self.received += 1;
        self.total_rtt_ms += rtt_ms;
        self.rtts_ms.push(rtt_ms);
        self.min_rtt_ms = self.min_rtt_ms.min(rtt_ms);
        self.max_rtt_ms = self.max_rtt_ms.max(rtt_ms);
        tracing::trace!("received {}/{}", self.received, self.transmitted);
    }

    /// Send failures, receive timeouts, receive errors and exhausted attempt budgets.
    pub fn record_error(&mut self) {
        self.errors += 1;
        tracing::trace!("errors {}", self.errors);
    }

    #[must_use]
    pub fn transmitted(&self) -> u32 {
        self.transmitted
    }

    #[must_use]
    pub fn received(&self) -> u32 {
        self.received
    }

    #[must_use]
    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// `+inf` until the first reply arrives.
    #[must_use]
    pub fn min_rtt(&self) -> f64 {
        self.min_rtt_ms
    }

    #[must_use]
    pub fn max_rtt(&self) -> f64 {
        self.max_rtt_ms
    }

    #[must_use]
    pub fn average_rtt(&self) -> f64 {
        if self.received > 0 {
            self.total_rtt_ms / f64::from(self.received)
        } else {
            0.0
        }
    }

    /// Population standard deviation of the samples; 0 below two samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn standard_deviation(&self) -> f64 {
        if self.rtts_ms.len() < 2 {
            return 0.0;
        }
        let average = self.average_rtt();
        let sum_of_squares: f64 = self.rtts_ms.iter().map(|rtt| (rtt - average).powi(2)).sum();
        (sum_of_squares / self.rtts_ms.len() as f64).sqrt()
    }

    /// Truncated percentage of transmitted packets without a reply. Errors do not enter into it.
    #[must_use]
    pub fn packet_loss_percent(&self) -> u32 {
        if self.transmitted == 0 {
            return 0;
        }
        let lost = u64::from(self.transmitted.saturating_sub(self.received));
        // lost <= transmitted, so the quotient is at most 100
        #[allow(clippy::cast_possible_truncation)]
        let percent = (lost * 100 / u64::from(self.transmitted)) as u32;
        percent
    }

    #[must_use]
    pub fn rtts(&self) -> &[f64] {
        &self.rtts_ms
    }

    #[must_use]
    pub fn snapshot(&self, host: &str) -> PingStatisticsSnapshot {
        let rtt = (self.received > 0).then(|| RttSummary {
            min_ms: self.min_rtt_ms,
            average_ms: self.average_rtt(),
            max_ms: self.max_rtt_ms,
            standard_deviation_ms: self.standard_deviation(),
        });
        PingStatisticsSnapshot {
            host: host.to_owned(),
            transmitted: self.transmitted,
            received: self.received,
            errors: self.errors,
            packet_loss_percent: self.packet_loss_percent(),
            rtt,
            rtts_ms: self.rtts_ms.clone(),
            duration: self.start_time.elapsed(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RttSummary {
    pub min_ms: f64,
    pub average_ms: f64,
    pub max_ms: f64,
    pub standard_deviation_ms: f64,
}

impl RttSummary {
    #[must_use]
    pub fn range_ms(&self) -> f64 {
        self.max_ms - self.min_ms
    }
}

/// Read-only view of [`PingStatistics`] at the time it was taken.
#[derive(Clone, Debug, PartialEq)]
pub struct PingStatisticsSnapshot {
    pub host: String,
    pub transmitted: u32,
    pub received: u32,
    pub errors: u32,
    pub packet_loss_percent: u32,
    /// `None` when no reply was received.
    pub rtt: Option<RttSummary>,
    pub rtts_ms: Vec<f64>,
    pub duration: Duration,
}

impl PingStatisticsSnapshot {
    #[must_use]
    pub fn lost(&self) -> u32 {
        self.transmitted.saturating_sub(self.received)
    }

    #[must_use]
    pub fn received_percent(&self) -> f64 {
        if self.transmitted == 0 {
            0.0
        } else {
            f64::from(self.received) * 100.0 / f64::from(self.transmitted)
        }
    }
}

impl fmt::Display for PingStatisticsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ping statistics ---", self.host)?;
        write!(
            f,
            "{} packets transmitted, {} received, {}% packet loss, {} errors, time {}ms",
            self.transmitted,
            self.received,
            self.packet_loss_percent,
            self.errors,
            self.duration.as_millis()
        )?;
        if let Some(rtt) = &self.rtt {
            write!(
                f,
                "\nrtt min/avg/max/stddev = {:.3}/{:.3}/{:.3}/{:.3} ms",
                rtt.min_ms, rtt.average_ms, rtt.max_ms, rtt.standard_deviation_ms
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts as ma;

    fn statistics_with(rtts: &[f64]) -> PingStatistics {
        let mut statistics = PingStatistics::new();
        for rtt in rtts {
            statistics.record_transmitted();
            statistics.record_received(*rtt);
        }
        statistics
    }

    #[test]
    fn empty_statistics() {
        let statistics = PingStatistics::new();

        assert_eq!(0, statistics.transmitted());
        assert_eq!(0, statistics.packet_loss_percent());
        assert!((statistics.average_rtt() - 0.0).abs() < f64::EPSILON);
        assert!((statistics.standard_deviation() - 0.0).abs() < f64::EPSILON);
        assert!(statistics.min_rtt().is_infinite());
        assert!((statistics.max_rtt() - 0.0).abs() < f64::EPSILON);
        assert!(statistics.snapshot("localhost").rtt.is_none());
    }

    #[test]
    fn three_samples() {
        let statistics = statistics_with(&[10.0, 20.0, 30.0]);

        assert!((statistics.average_rtt() - 20.0).abs() < 1e-9);
        assert!((statistics.min_rtt() - 10.0).abs() < 1e-9);
        assert!((statistics.max_rtt() - 30.0).abs() < 1e-9);
        assert!((statistics.standard_deviation() - 8.164_965_809).abs() < 1e-6);
        assert_eq!(&[10.0, 20.0, 30.0], statistics.rtts());
    }

    #[test]
    fn single_sample_has_no_deviation() {
        let statistics = statistics_with(&[42.5]);

        assert!((statistics.standard_deviation() - 0.0).abs() < f64::EPSILON);
        assert!((statistics.min_rtt() - 42.5).abs() < f64::EPSILON);
        assert!((statistics.max_rtt() - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn loss_is_derived_from_transmitted_and_received() {
        let mut statistics = statistics_with(&[1.0, 2.0]);
        statistics.record_transmitted();
        statistics.record_transmitted();

        assert_eq!(50, statistics.packet_loss_percent());

        // errors do not change the loss
        statistics.record_error();
        statistics.record_error();
        statistics.record_error();
        assert_eq!(50, statistics.packet_loss_percent());
        assert_eq!(3, statistics.errors());
    }

    #[test]
    fn loss_truncates() {
        let mut statistics = statistics_with(&[1.0, 2.0]);
        statistics.record_transmitted();

        assert_eq!(33, statistics.packet_loss_percent());
    }

    #[test]
    fn loss_without_transmissions_is_zero() {
        let mut statistics = PingStatistics::new();
        statistics.record_error();

        assert_eq!(0, statistics.packet_loss_percent());
    }

    #[test]
    fn snapshot_reflects_state_without_mutating_it() {
        let mut statistics = statistics_with(&[10.0, 20.0, 30.0]);
        statistics.record_transmitted();
        statistics.record_error();

        let first = statistics.snapshot("example.com");
        let second = statistics.snapshot("example.com");

        assert_eq!(4, first.transmitted);
        assert_eq!(3, first.received);
        assert_eq!(1, first.errors);
        assert_eq!(1, first.lost());
        assert_eq!(25, first.packet_loss_percent);
        assert!((first.received_percent() - 75.0).abs() < 1e-9);
        let rtt = first.rtt.unwrap();
        assert!((rtt.range_ms() - 20.0).abs() < 1e-9);
        assert_eq!(first.rtts_ms, second.rtts_ms);
        assert_eq!(first.rtt, second.rtt);
        ma::assert_le!(first.duration, second.duration);
        assert_eq!(4, statistics.transmitted());
    }

    #[test]
    fn display_summary() {
        let statistics = statistics_with(&[10.0, 20.0, 30.0]);
        let text = statistics.snapshot("127.0.0.1").to_string();

        assert!(text.starts_with("--- 127.0.0.1 ping statistics ---\n"));
        assert!(text.contains("3 packets transmitted, 3 received, 0% packet loss, 0 errors"));
        assert!(text.ends_with("rtt min/avg/max/stddev = 10.000/20.000/30.000/8.165 ms"));
    }

    #[test]
    fn display_without_replies_omits_rtt_line() {
        let mut statistics = PingStatistics::new();
        statistics.record_transmitted();
        statistics.record_error();
        let text = statistics.snapshot("10.0.0.1").to_string();

        assert!(text.contains("1 packets transmitted, 0 received, 100% packet loss, 1 errors"));
        assert!(!text.contains("rtt"));
    }
}
