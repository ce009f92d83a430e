//! Socket-level tunables
//!
//! Uniform get/set pairs over SO_SNDBUF, SO_RCVBUF, SO_LINGER, SO_REUSEADDR,
//! SO_REUSEPORT and TCP_NODELAY. A failed call is a configuration failure: it
//! is reported but leaves the handle usable.
//!
//! Through the numeric contract ([`StatusCode`](crate::StatusCode)) setters map
//! to `0`/`-1` and getters to `value`/`-1`. A getter that legitimately returns
//! `-1` is indistinguishable from a failure there; use the typed result when
//! that matters.

use std::time::Duration;

use crate::error::{OsContext, Result};
use crate::raw as r;
use crate::socket::Socket;

fn buffer_size(sz: usize) -> i32 { sz.min(i32::MAX as usize) as i32 }

impl Socket {
    /// Set SO_SNDBUF; the kernel may round or double the value
    pub fn set_send_buffer_size(&self, size: usize) -> Result<()> {
        r::set_send_buffer(self.os(), buffer_size(size)).op("set_send_buffer_size")
    }

    /// Current SO_SNDBUF
    pub fn send_buffer_size(&self) -> Result<i32> {
        r::send_buffer(self.os()).op("send_buffer_size")
    }

    /// Set SO_RCVBUF; the kernel may round or double the value
    pub fn set_recv_buffer_size(&self, size: usize) -> Result<()> {
        r::set_recv_buffer(self.os(), buffer_size(size)).op("set_recv_buffer_size")
    }

    /// Current SO_RCVBUF
    pub fn recv_buffer_size(&self) -> Result<i32> {
        r::recv_buffer(self.os()).op("recv_buffer_size")
    }

    /// Configure SO_LINGER
    ///
    /// `Some(d)` enables lingering for `d` rounded down to whole seconds;
    /// `Some(Duration::ZERO)` makes `close` reset the connection. `None`
    /// disables it.
    pub fn set_linger(&self, linger: Option<Duration>) -> Result<()> {
        let secs = linger.map(|d| d.as_secs().min(i32::MAX as u64) as i32);
        r::set_linger(self.os(), secs).op("set_linger")
    }

    /// Current SO_LINGER, `None` when disabled
    pub fn linger(&self) -> Result<Option<Duration>> {
        let secs = r::linger(self.os()).op("linger")?;
        Ok(secs.map(|s| Duration::from_secs(s.max(0) as u64)))
    }

    /// Set SO_REUSEADDR
    pub fn set_reuse_address(&self, on: bool) -> Result<()> {
        r::set_reuse_addr(self.os(), on).op("set_reuse_address")
    }

    /// Whether SO_REUSEADDR is set
    pub fn reuse_address(&self) -> Result<bool> {
        r::reuse_addr(self.os()).op("reuse_address")
    }

    /// Set SO_REUSEPORT; `NetError::Unsupported` where the platform lacks it
    pub fn set_reuse_port(&self, on: bool) -> Result<()> {
        r::set_reuse_port(self.os(), on).op("set_reuse_port")
    }

    /// Whether SO_REUSEPORT is set
    pub fn reuse_port(&self) -> Result<bool> {
        r::reuse_port(self.os()).op("reuse_port")
    }

    /// Set TCP_NODELAY (disable Nagle's algorithm)
    pub fn set_tcp_nodelay(&self, on: bool) -> Result<()> {
        r::set_tcp_nodelay(self.os(), on).op("set_tcp_nodelay")
    }

    /// Whether TCP_NODELAY is set
    pub fn tcp_nodelay(&self) -> Result<bool> {
        r::tcp_nodelay(self.os()).op("tcp_nodelay")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetError;
    use crate::outcome::{StatusCode, FAILURE};

    #[test]
    fn test_buffer_sizes() -> anyhow::Result<()> {
        let s = Socket::tcp(false)?;
        s.set_send_buffer_size(128 * 1024)?;
        s.set_recv_buffer_size(128 * 1024)?;
        // Linux reports double the requested size to account for bookkeeping.
        assert!(s.send_buffer_size()? >= 128 * 1024);
        assert!(s.recv_buffer_size()? >= 128 * 1024);
        assert_eq!(s.set_send_buffer_size(64 * 1024).status_code(), 0);
        Ok(())
    }

    #[test]
    fn test_linger_round_trip() -> anyhow::Result<()> {
        let s = Socket::tcp(true)?;
        assert_eq!(s.linger()?, None);
        s.set_linger(Some(Duration::from_millis(5_500)))?;
        assert_eq!(s.linger()?, Some(Duration::from_secs(5)));
        s.set_linger(None)?;
        assert_eq!(s.linger()?, None);
        Ok(())
    }

    #[test]
    fn test_reuse_flags() -> anyhow::Result<()> {
        let s = Socket::tcp(true)?;
        s.set_reuse_address(true)?;
        assert!(s.reuse_address()?);
        s.set_reuse_address(false)?;
        assert!(!s.reuse_address()?);

        match s.set_reuse_port(true) {
            Ok(()) => assert!(s.reuse_port()?),
            Err(NetError::Unsupported { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    #[test]
    fn test_tcp_nodelay() -> anyhow::Result<()> {
        let s = Socket::tcp(false)?;
        s.set_tcp_nodelay(true)?;
        assert!(s.tcp_nodelay()?);
        s.set_tcp_nodelay(false)?;
        assert!(!s.tcp_nodelay()?);
        Ok(())
    }

    #[test]
    fn test_tcp_option_on_udp_fails_without_harming_handle() -> anyhow::Result<()> {
        let s = Socket::udp()?;
        let res = s.set_tcp_nodelay(true);
        assert!(res.is_err());
        assert_eq!(res.status_code(), FAILURE);
        assert_eq!(s.tcp_nodelay().status_code(), FAILURE);
        // handle still works
        s.set_recv_buffer_size(64 * 1024)?;
        Ok(())
    }
}
