use ping_stat::icmp::v4::{
    icmp_type_name, EchoRequest, InboundDatagram, SequenceNumber, ECHO_REQUEST_SIZE, PAYLOAD_SIZE,
};
use ping_stat::{
    EchoReply, GenericError, PingConfig, PingError, PingErrorKind, PingObserver, PingStatisticsSnapshot, Rejection,
};
use std::net::Ipv4Addr;
use std::num::IntErrorKind;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(argh::FromArgs)]
/// ping-stat - send ICMP ECHO_REQUEST to a host and report round-trip statistics
struct Args {
    #[argh(switch, short = 'v')]
    /// print the IP and ICMP headers of every received datagram
    verbose: bool,

    #[argh(switch)]
    /// log at trace level
    trace: bool,

    #[argh(option, short = 'W', default = "2", from_str_fn(parse_positive))]
    /// seconds to wait for each reply (default 2)
    timeout: u32,

    #[argh(positional)]
    /// hostname or IPv4 address
    destination: String,

    #[argh(positional, from_str_fn(parse_positive))]
    /// number of echo requests to send (default 4)
    count: Option<u32>,
}

fn parse_positive(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(format!("'{value}' is not a positive integer")),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(format!("'{value}' is too large")),
        Err(_) => Err(format!("'{value}' is not a positive integer")),
    }
}

struct ConsolePrinter {
    verbose: bool,
}

fn describe(rejection: &Rejection) -> String {
    match rejection {
        Rejection::OwnEchoRequest => "own echo request".to_string(),
        Rejection::Mismatch(mismatch) => {
            let mut reasons = Vec::new();
            if !mismatch.type_matches {
                reasons.push("wrong ICMP type");
            }
            if !mismatch.identifier_matches {
                reasons.push("wrong identifier");
            }
            if !mismatch.sequence_matches {
                reasons.push("wrong sequence number");
            }
            reasons.join(", ")
        }
        Rejection::Malformed(message) => format!("malformed datagram: {message}"),
    }
}

impl PingObserver for ConsolePrinter {
    fn on_packet_sent(&mut self, request: &EchoRequest, destination: Ipv4Addr, n_bytes: usize) {
        if self.verbose {
            println!(
                "sent icmp_seq={} id={} checksum=0x{:04x} ({} bytes) to {}",
                request.sequence_number(),
                request.identifier(),
                request.checksum(),
                n_bytes,
                destination
            );
        }
    }

    fn on_send_failed(&mut self, sequence_number: SequenceNumber, error: &PingError) {
        println!("icmp_seq={sequence_number}: send failed: {}", error.message);
    }

    fn on_datagram_received(&mut self, datagram: &InboundDatagram, source: Ipv4Addr) {
        if !self.verbose {
            return;
        }
        let ip = &datagram.ip;
        let icmp = &datagram.icmp;
        println!(
            "  from {source}: IPv{} hlen={} ttl={} proto={} len={}",
            ip.version, ip.header_length, ip.ttl, ip.protocol, ip.total_length
        );
        println!(
            "  ICMP type={} ({}) code={} id={} seq={} checksum=0x{:04x}{}",
            icmp.icmp_type.0,
            icmp_type_name(icmp.icmp_type),
            icmp.icmp_code.0,
            icmp.identifier,
            icmp.sequence_number,
            icmp.checksum,
            if datagram.checksum_valid { "" } else { " (bad checksum)" }
        );
    }

    fn on_reply_rejected(&mut self, attempt: u8, attempt_budget: u8, rejection: &Rejection) {
        if self.verbose {
            println!("  attempt {attempt}/{attempt_budget} skipped: {}", describe(rejection));
        }
    }

    fn on_reply_matched(&mut self, reply: &EchoReply) {
        println!(
            "{} bytes from {}: icmp_seq={} ttl={} time={:.3} ms",
            reply.icmp_size, reply.source, reply.sequence_number, reply.ttl, reply.rtt_ms
        );
    }

    fn on_reply_missing(&mut self, sequence_number: SequenceNumber, error: &PingError) {
        match error.kind {
            PingErrorKind::ReceiveTimeout => println!("Request timeout for icmp_seq {sequence_number}"),
            _ => println!("icmp_seq={sequence_number}: {}", error.message),
        }
    }

    fn on_statistics(&mut self, snapshot: &PingStatisticsSnapshot) {
        println!();
        println!("{snapshot}");
        if self.verbose {
            println!("received {:.1}% of transmitted packets", snapshot.received_percent());
            if let Some(rtt) = &snapshot.rtt {
                println!("rtt range = {:.3} ms", rtt.range_ms());
            }
            for (i, rtt) in snapshot.rtts_ms.iter().enumerate() {
                println!("  reply {}: {rtt:.3} ms", i + 1);
            }
        }
    }
}

fn run(args: Args) -> Result<(), GenericError> {
    let ip = ping_stat::resolve(&args.destination)?;
    let mut config = PingConfig::new(ip, args.count.unwrap_or(ping_stat::DEFAULT_COUNT));
    config.timeout = Duration::from_secs(u64::from(args.timeout));

    let session = ping_stat::create(&config, ConsolePrinter { verbose: args.verbose })?;
    if !session.timeout_configured() {
        eprintln!("ping-stat: warning: receive timeout not set, a missing reply may block forever");
    }
    // 20 bytes of IPv4 header on top of the ICMP datagram
    println!("PING {} ({ip}) {PAYLOAD_SIZE}({}) bytes of data.", args.destination, ECHO_REQUEST_SIZE + 20);
    session.run(&args.destination);
    Ok(())
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let max_level = if args.trace { Level::TRACE } else { Level::ERROR };
    let subscriber = FmtSubscriber::builder().with_max_level(max_level).with_writer(std::io::stderr).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ping-stat: {e}");
            ExitCode::FAILURE
        }
    }
}
