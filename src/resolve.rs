use crate::ping_error::{PingError, PingErrorKind, PingResult};
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

/// Resolves a hostname or dotted-quad to its first IPv4 address with one blocking lookup.
pub fn resolve(host: &str) -> PingResult<Ipv4Addr> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    tracing::trace!("resolving {}", host);
    let addrs = (host, 0)
        .to_socket_addrs()
        .map_err(|e| PingError::new(PingErrorKind::ResolutionFailed, format!("cannot resolve {host}: {e}")))?;
    addrs
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| PingError::new(PingErrorKind::ResolutionFailed, format!("no IPv4 address for {host}")))
}
