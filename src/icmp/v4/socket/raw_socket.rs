use super::TSocket;
use socket2::{Domain, Protocol, Type};
use std::mem::MaybeUninit;
use std::net::Ipv4Addr;
use std::{io, time::Duration};

/// A raw IPv4 ICMP socket. Opening it usually requires elevated privileges. Every datagram it
/// receives starts with the IPv4 header.
pub struct RawSocket {
    socket: socket2::Socket,
    timeout_configured: bool,
}

impl RawSocket {
    pub fn new(timeout: Duration) -> Result<Self, io::Error> {
        tracing::trace!("creating RawSocket");
        let socket = socket2::Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        let timeout_configured = match socket.set_read_timeout(Some(timeout)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not set socket receive timeout: {}", e);
                false
            }
        };
        Ok(RawSocket { socket, timeout_configured })
    }

}

impl TSocket for RawSocket {
    fn send_to(&self, buf: &[u8], addr: &socket2::SockAddr) -> io::Result<usize> {
        self.socket.send_to(buf, addr)
    }

    fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, Ipv4Addr)> {
        // Socket2 gives a safety guaranty which allows us to do an unsafe cast from `&mut [u8]`
        // to `&mut [std::mem::MaybeUninit<u8>]`: it never writes uninitialised bytes into the
        // buffer.
        // https://docs.rs/socket2/0.4.7/socket2/struct.Socket.html#method.recv
        let uninit_buf = unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) };
        let (n_bytes, socket_addr) = self.socket.recv_from(uninit_buf)?;
        let source = socket_addr
            .as_socket_ipv4()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "received from a non-IPv4 address"))?;
        Ok((n_bytes, *source.ip()))
    }

    fn timeout_configured(&self) -> bool {
        self.timeout_configured
    }
}

impl Drop for RawSocket {
    fn drop(&mut self) {
        tracing::trace!("closing RawSocket");
    }
}
