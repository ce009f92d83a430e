//! Remote endpoint lookup
//!
//! Through the numeric contract, lookup failures map to `-1`
//! ([`NetError::NoPeer`]) and non-IPv4 peers to `-2`
//! ([`NetError::UnsupportedFamily`]).

use std::net::{Ipv4Addr, SocketAddrV4};

use crate::error::{NetError, Result};
use crate::raw as r;
use crate::socket::Socket;

impl Socket {
    /// Remote endpoint of a connected socket
    pub fn peer_addr(&self) -> Result<SocketAddrV4> {
        match r::peer_name(self.os()) {
            Ok(r::PeerName::V4(sin)) => Ok(SocketAddrV4::new(Ipv4Addr::from(r::sockaddr_ip(&sin)), r::sockaddr_port(&sin))),
            Ok(r::PeerName::Other(family)) => Err(NetError::UnsupportedFamily { family }),
            Err(e) => {
                log::trace!("getpeername on socket {} failed: {}", self.os(), e);
                Err(NetError::NoPeer)
            }
        }
    }

    /// Remote IPv4 address
    pub fn peer_ip(&self) -> Result<Ipv4Addr> { self.peer_addr().map(|a| *a.ip()) }

    /// Remote port
    pub fn peer_port(&self) -> Result<u16> { self.peer_addr().map(|a| a.port()) }
}
