//! IPv4 multicast on UDP sockets
//!
//! Group membership lives entirely in the kernel; nothing is tracked here. A
//! rejected join or leave leaves the socket exactly as it was.

use std::net::Ipv4Addr;

use crate::error::{OsContext, Result};
use crate::raw as r;
use crate::socket::Socket;

impl Socket {
    /// Joins `group` on the local interface `bind`, returning whether it succeeded
    ///
    /// `Ipv4Addr::UNSPECIFIED` for `bind` lets the kernel pick the interface.
    pub fn join_multicast(&self, bind: impl Into<Ipv4Addr>, group: impl Into<Ipv4Addr>) -> bool {
        self.membership(bind.into(), group.into(), true)
    }

    /// Leaves a group previously joined with the same addresses
    pub fn leave_multicast(&self, bind: impl Into<Ipv4Addr>, group: impl Into<Ipv4Addr>) -> bool {
        self.membership(bind.into(), group.into(), false)
    }

    fn membership(&self, bind: Ipv4Addr, group: Ipv4Addr, add: bool) -> bool {
        match r::set_membership(self.os(), bind.into(), group.into(), add) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("socket {}: membership change for {} via {} failed: {}", self.os(), group, bind, e);
                false
            }
        }
    }

    /// Sets the TTL of outgoing multicast datagrams
    pub fn set_multicast_ttl(&self, ttl: u8) -> Result<()> {
        r::set_multicast_ttl(self.os(), ttl).op("set_multicast_ttl")
    }

    /// Enables or disables local loopback of outgoing multicast datagrams
    pub fn set_multicast_loop(&self, on: bool) -> Result<()> {
        r::set_multicast_loop(self.os(), on).op("set_multicast_loop")
    }

    /// Selects the local interface used for outgoing multicast datagrams
    pub fn set_multicast_interface(&self, iface: impl Into<Ipv4Addr>) -> Result<()> {
        let iface: Ipv4Addr = iface.into();
        r::set_multicast_if(self.os(), iface.into()).op("set_multicast_interface")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{IoOutcome, StatusCode};

    #[test]
    fn test_join_rejects_non_multicast_group() -> anyhow::Result<()> {
        let mut s = Socket::udp()?;
        assert!(s.bind_ipv4(Ipv4Addr::UNSPECIFIED, 0));
        assert!(!s.join_multicast(Ipv4Addr::UNSPECIFIED, Ipv4Addr::new(10, 1, 2, 3)));
        assert!(!s.join_multicast(Ipv4Addr::UNSPECIFIED, 0xffff_ffffu32));

        // the handle is unaffected by the failed joins
        s.set_multicast_ttl(4)?;
        s.set_multicast_loop(true)?;
        let mut buf = [0u8; 4];
        assert_eq!(s.recv(&mut buf), IoOutcome::Retry);
        Ok(())
    }

    #[test]
    fn test_leave_without_join_fails() -> anyhow::Result<()> {
        let s = Socket::udp()?;
        assert!(!s.leave_multicast(Ipv4Addr::UNSPECIFIED, Ipv4Addr::new(239, 1, 2, 3)));
        Ok(())
    }

    #[test]
    fn test_setters_report_status() -> anyhow::Result<()> {
        let s = Socket::udp()?;
        assert_eq!(s.set_multicast_ttl(1).status_code(), 0);
        assert_eq!(s.set_multicast_loop(false).status_code(), 0);
        s.set_multicast_interface(Ipv4Addr::UNSPECIFIED)?;
        Ok(())
    }

    #[test]
    fn test_join_then_leave() -> anyhow::Result<()> {
        let group = Ipv4Addr::new(239, 255, 42, 99);
        let mut s = Socket::udp()?;
        assert!(s.bind_ipv4(Ipv4Addr::UNSPECIFIED, 0));
        // hosts without a usable interface for the group refuse the join
        if !s.join_multicast(Ipv4Addr::LOCALHOST, group) {
            return Ok(());
        }
        // a second join of the same group is rejected by the kernel
        assert!(!s.join_multicast(Ipv4Addr::LOCALHOST, group));
        assert!(s.leave_multicast(Ipv4Addr::LOCALHOST, group));
        assert!(!s.leave_multicast(Ipv4Addr::LOCALHOST, group));
        Ok(())
    }
}
