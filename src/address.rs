//! Owned IPv4 endpoint descriptors
//!
//! A [`SocketAddress`] keeps a heap-allocated, wire-format `sockaddr_in`
//! (`SOCKADDR_IN` on Windows) that can be handed straight to `bind`, `connect`
//! and `sendto`. The allocation is released exactly once, when the value is
//! dropped; there is no way to read it after release.
//!
//! Callers only ever see host byte order:
//!
//! ```rust
//! use horizon_netcore::address::{self, SocketAddress};
//!
//! let addr = SocketAddress::new(0x7f00_0001, 9000);
//! assert_eq!(addr.ip(), std::net::Ipv4Addr::LOCALHOST);
//! assert_eq!(addr.port(), 9000);
//! address::free(Some(addr));
//! address::free(None); // no-op
//! ```

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::raw;

/// Heap-allocated IPv4 endpoint in network byte order
pub struct SocketAddress {
    inner: Box<raw::SockAddrIn>,
}

impl SocketAddress {
    /// Build an endpoint from a host-order address and port
    pub fn new(ipv4: u32, port: u16) -> Self {
        Self { inner: Box::new(raw::sockaddr_v4(ipv4, port)) }
    }

    /// Host-order IPv4 address
    pub fn ip(&self) -> Ipv4Addr { Ipv4Addr::from(raw::sockaddr_ip(&self.inner)) }

    /// Host-order port
    pub fn port(&self) -> u16 { raw::sockaddr_port(&self.inner) }

    /// Copy out as a standard library address
    pub fn as_socket_addr(&self) -> SocketAddrV4 { SocketAddrV4::new(self.ip(), self.port()) }

    pub(crate) fn as_raw(&self) -> &raw::SockAddrIn { &self.inner }

    pub(crate) fn from_raw(sa: raw::SockAddrIn) -> Self { Self { inner: Box::new(sa) } }
}

/// Build an endpoint from a host-order address and port
pub fn build(ipv4: u32, port: u16) -> SocketAddress { SocketAddress::new(ipv4, port) }

/// Release an endpoint; `None` is accepted and ignored
pub fn free(addr: Option<SocketAddress>) { drop(addr) }

impl From<SocketAddrV4> for SocketAddress {
    fn from(a: SocketAddrV4) -> Self { Self::new(u32::from(*a.ip()), a.port()) }
}

impl From<(Ipv4Addr, u16)> for SocketAddress {
    fn from((ip, port): (Ipv4Addr, u16)) -> Self { Self::new(u32::from(ip), port) }
}

impl Clone for SocketAddress {
    fn clone(&self) -> Self { Self::from_raw(*self.inner) }
}

impl PartialEq for SocketAddress {
    fn eq(&self, other: &Self) -> bool { self.as_socket_addr() == other.as_socket_addr() }
}

impl Eq for SocketAddress {}

impl fmt::Debug for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SocketAddress").field(&self.as_socket_addr()).finish()
    }
}

impl fmt::Display for SocketAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.as_socket_addr().fmt(f) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_converts_to_network_order() {
        let addr = build(0xc0a8_0102, 0x1f90);
        assert_eq!(addr.as_raw().sin_port, 0x1f90u16.to_be());
        assert_eq!(addr.ip(), Ipv4Addr::new(192, 168, 1, 2));
        assert_eq!(addr.port(), 8080);
        assert_eq!(addr.to_string(), "192.168.1.2:8080");
    }

    #[test]
    fn test_build_then_free_is_independent() {
        let keep = build(0x0a00_0001, 1);
        for port in [0u16, 1, 80, u16::MAX] {
            let tmp = build(u32::MAX, port);
            assert_eq!(tmp.port(), port);
            free(Some(tmp));
        }
        assert_eq!(keep.as_socket_addr(), SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 1), 1));
        free(None);
        free(None);
    }

    #[test]
    fn test_conversions_agree() {
        let std_addr = SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5555);
        let a = SocketAddress::from(std_addr);
        let b = SocketAddress::from((Ipv4Addr::LOCALHOST, 5555));
        assert_eq!(a, b);
        assert_eq!(a.clone().as_socket_addr(), std_addr);
    }
}
