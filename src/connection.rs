//! Connection lifecycle: bind, listen, accept, connect, shutdown
//!
//! These calls drive the [`SocketState`] machine. A socket is never both
//! listening and connected: `connect` is refused on a listener, `listen` is
//! refused on a connected socket, and `accept` only works on a listener.

use std::net::{Ipv4Addr, Shutdown};

use crate::address::SocketAddress;
use crate::error::{NetError, OsContext, Result};
use crate::raw as r;
use crate::socket::{Socket, SocketKind, SocketState};

/// Result of a successful `connect` call
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Connect {
    /// The connection is up
    Established,
    /// Non-blocking handshake started; wait for writability
    InProgress,
}

impl Socket {
    /// Binds the socket to a local address, returning whether it succeeded
    pub fn bind(&mut self, addr: &SocketAddress) -> bool {
        match self.try_bind(addr) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("bind {} on socket {} failed: {}", addr, self.os(), e);
                false
            }
        }
    }

    /// Binds to a host-order IPv4 address and port without building a [`SocketAddress`]
    pub fn bind_ipv4(&mut self, ip: impl Into<Ipv4Addr>, port: u16) -> bool {
        let ip: Ipv4Addr = ip.into();
        self.bind(&SocketAddress::from((ip, port)))
    }

    /// Binds the socket to a local address, reporting the OS error
    pub fn try_bind(&mut self, addr: &SocketAddress) -> Result<()> {
        if self.state() != SocketState::Created {
            return Err(NetError::InvalidState { op: "bind", state: self.state() });
        }
        r::bind_raw(self.os(), addr.as_raw()).op("bind")?;
        self.set_state(SocketState::Bound);
        Ok(())
    }

    /// Starts accepting connections with the given queue length
    pub fn listen(&mut self, backlog: i32) -> Result<()> {
        match (self.kind(), self.state()) {
            (SocketKind::Tcp, SocketState::Created | SocketState::Bound) => {}
            (_, state) => return Err(NetError::InvalidState { op: "listen", state }),
        }
        r::listen_raw(self.os(), backlog).op("listen")?;
        self.set_state(SocketState::Listening);
        Ok(())
    }

    /// Accepts one pending connection
    ///
    /// Returns `Ok(None)` when a non-blocking listener has nothing pending. The
    /// accepted socket is Connected and uses the listener's blocking mode.
    pub fn accept(&self) -> Result<Option<Socket>> {
        if self.state() != SocketState::Listening {
            return Err(NetError::InvalidState { op: "accept", state: self.state() });
        }
        match r::accept_raw(self.os(), self.is_non_blocking()) {
            Ok(os) => {
                log::debug!("socket {} accepted {}", self.os(), os);
                Ok(Some(Socket::wrap(os, SocketKind::Tcp, SocketState::Connected, self.is_non_blocking())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(NetError::os("accept", e)),
        }
    }

    /// Connects to a remote address
    ///
    /// On a non-blocking TCP socket the handshake usually completes later and
    /// [`Connect::InProgress`] is returned; the socket is considered Connected
    /// from that point on and a failed handshake surfaces as `Disconnected` on
    /// the first I/O call.
    pub fn connect(&mut self, addr: &SocketAddress) -> Result<Connect> {
        if self.state() == SocketState::Listening {
            return Err(NetError::InvalidState { op: "connect", state: self.state() });
        }
        let status = match r::connect_raw(self.os(), addr.as_raw()) {
            Ok(()) => Connect::Established,
            Err(e) if r::is_in_progress(&e) => Connect::InProgress,
            Err(e) => return Err(NetError::os("connect", e)),
        };
        self.set_state(SocketState::Connected);
        Ok(status)
    }

    /// Shuts down the read half, write half, or both
    pub fn shutdown(&self, how: Shutdown) -> Result<()> {
        r::shutdown_raw(self.os(), how).op("shutdown")
    }

    /// Local address; after binding to port 0 this reveals the assigned port
    pub fn local_addr(&self) -> Result<SocketAddress> {
        r::local_name(self.os()).op("local_addr").map(SocketAddress::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::IoOutcome;
    use crate::testing::{loopback_pair, settle};

    #[test]
    fn test_state_transitions() -> anyhow::Result<()> {
        let mut s = Socket::tcp(false)?;
        assert_eq!(s.state(), SocketState::Created);
        assert!(s.bind(&SocketAddress::new(u32::from(Ipv4Addr::LOCALHOST), 0)));
        assert_eq!(s.state(), SocketState::Bound);
        s.listen(8)?;
        assert_eq!(s.state(), SocketState::Listening);

        let target = s.local_addr()?;
        assert!(matches!(s.connect(&target), Err(NetError::InvalidState { op: "connect", .. })));
        assert!(!s.bind_ipv4(Ipv4Addr::LOCALHOST, 0));
        Ok(())
    }

    #[test]
    fn test_accept_requires_listening() -> anyhow::Result<()> {
        let s = Socket::tcp(false)?;
        assert!(matches!(s.accept(), Err(NetError::InvalidState { op: "accept", state: SocketState::Created })));
        Ok(())
    }

    #[test]
    fn test_accept_without_pending_connection() -> anyhow::Result<()> {
        let mut s = Socket::tcp(false)?;
        assert!(s.bind_ipv4(Ipv4Addr::LOCALHOST, 0));
        s.listen(4)?;
        assert!(s.accept()?.is_none());
        Ok(())
    }

    #[test]
    fn test_listen_on_udp_is_refused() -> anyhow::Result<()> {
        let mut s = Socket::udp()?;
        assert!(matches!(s.listen(4), Err(NetError::InvalidState { op: "listen", .. })));
        Ok(())
    }

    #[test]
    fn test_bind_conflict_reports_false() -> anyhow::Result<()> {
        let mut first = Socket::tcp(true)?;
        assert!(first.bind_ipv4(Ipv4Addr::LOCALHOST, 0));
        first.listen(1)?;
        let taken = first.local_addr()?;

        let mut second = Socket::tcp(true)?;
        assert!(!second.bind(&taken));
        assert_eq!(second.state(), SocketState::Created);
        Ok(())
    }

    #[test]
    fn test_connect_and_accept_on_loopback() -> anyhow::Result<()> {
        let (a, b, c) = loopback_pair()?;
        assert_eq!(b.state(), SocketState::Connected);
        assert_eq!(c.state(), SocketState::Connected);
        assert!(c.is_non_blocking());
        assert_eq!(c.local_addr()?, a.local_addr()?);
        assert_eq!(b.peer_port()?, a.local_addr()?.port());
        Ok(())
    }

    #[test]
    fn test_blocking_connect_is_established() -> anyhow::Result<()> {
        let mut a = Socket::tcp(true)?;
        assert!(a.bind_ipv4(Ipv4Addr::LOCALHOST, 0));
        a.listen(1)?;
        let mut b = Socket::tcp(true)?;
        assert_eq!(b.connect(&a.local_addr()?)?, Connect::Established);
        let c = a.accept()?.expect("blocking accept returns a socket");
        assert!(!c.is_non_blocking());
        Ok(())
    }

    #[test]
    fn test_shutdown_write_is_seen_as_disconnect() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        b.shutdown(Shutdown::Write)?;
        let mut buf = [0u8; 4];
        assert_eq!(settle(|| c.recv(&mut buf)), IoOutcome::Disconnected);
        Ok(())
    }

    #[test]
    fn test_shutdown_on_unconnected_socket_fails() -> anyhow::Result<()> {
        let s = Socket::tcp(true)?;
        assert!(s.shutdown(Shutdown::Both).is_err());
        Ok(())
    }
}
