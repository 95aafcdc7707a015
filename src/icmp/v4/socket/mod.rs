use std::io;
use std::net::Ipv4Addr;

pub(crate) mod raw_socket;

/// The transport seam: everything the ping engine needs from a socket.
pub trait TSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize>;

    /// Blocks until a datagram arrives or the receive timeout elapses. Returns the number of
    /// bytes written into `buf` and the source address.
    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, Ipv4Addr)>;

    /// Whether receives are bounded by a timeout. Without one a receive may block indefinitely.
    fn timeout_configured(&self) -> bool {
        true
    }

    fn receive(&self, buf: &mut [u8]) -> Receive {
        match self.recv_from(buf) {
            Ok((n_bytes, source)) => Receive::Data { n_bytes, source },
            Err(e) if is_timeout(&e) => Receive::Timeout,
            Err(e) => Receive::Error(e),
        }
    }
}

#[derive(Debug)]
pub enum Receive {
    Data { n_bytes: usize, source: Ipv4Addr },
    Timeout,
    Error(io::Error),
}

// An expired SO_RCVTIMEO surfaces as EAGAIN on unix and as WSAETIMEDOUT on windows.
fn is_timeout(error: &io::Error) -> bool {
    matches!(error.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}
