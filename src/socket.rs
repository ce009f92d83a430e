//! Socket creation and ownership
//!
//! [`Socket`] owns one OS descriptor for its whole life. The descriptor is
//! closed exactly once: by [`Socket::close`], which reports the close error, or
//! by `Drop`, which logs it. Every construction path wraps the descriptor in a
//! `Socket` before applying any flags, so a failed setup step cannot leak a
//! half-configured descriptor.
//!
//! A `Socket` may move between threads but cannot be shared by reference across
//! them (`Send`, `!Sync`). Operations on one handle are therefore serialized by
//! construction; different handles are fully independent.

use std::cell::Cell;
use std::marker::PhantomData;
use std::mem;

use crate::error::{NetError, OsContext, Result};
use crate::raw as r;

/// Transport protocol of a socket
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SocketKind {
    /// TCP stream socket
    Tcp,
    /// UDP datagram socket
    Udp,
}

/// Lifecycle position of a socket
///
/// `Created → (Bound →) Listening | Connected`. Closing consumes the
/// [`Socket`], so there is no closed state to observe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SocketState {
    /// Freshly created, no local address yet
    Created,
    /// Bound to a local address
    Bound,
    /// Accepting connections
    Listening,
    /// Connected to a peer
    Connected,
}

/// Owned IPv4 socket handle
#[derive(Debug)]
pub struct Socket {
    os: r::OsSocket,
    kind: SocketKind,
    state: SocketState,
    nonblocking: bool,
    _not_sync: PhantomData<Cell<()>>,
}

impl Socket {
    /// Creates an IPv4 TCP socket
    ///
    /// When `blocking` is false the socket is switched to non-blocking mode and
    /// SO_REUSEADDR is enabled. If either step fails the descriptor is closed
    /// before the error is returned.
    pub fn tcp(blocking: bool) -> Result<Self> {
        let mut s = Self::open(SocketKind::Tcp)?;
        if !blocking {
            s.configure_non_blocking()
                .and_then(|()| r::set_reuse_addr(s.os, true).op("set_reuse_addr"))
                .map_err(|e| s.rollback(e))?;
        }
        log::debug!("created tcp socket {} (blocking={})", s.os, blocking);
        Ok(s)
    }

    /// Creates an IPv4 UDP socket, always non-blocking
    pub fn udp() -> Result<Self> {
        let mut s = Self::open(SocketKind::Udp)?;
        s.configure_non_blocking().map_err(|e| s.rollback(e))?;
        log::debug!("created udp socket {}", s.os);
        Ok(s)
    }

    fn open(kind: SocketKind) -> Result<Self> {
        let ty = match kind { SocketKind::Tcp => r::Type::Stream, SocketKind::Udp => r::Type::Dgram };
        let os = r::socket(ty).op("socket")?;
        Ok(Self::wrap(os, kind, SocketState::Created, false))
    }

    // The caller drops `self` right after, which closes the descriptor.
    fn rollback(&self, e: NetError) -> NetError {
        log::debug!("socket {} setup failed, closing: {}", self.os, e);
        e
    }

    pub(crate) fn wrap(os: r::OsSocket, kind: SocketKind, state: SocketState, nonblocking: bool) -> Self {
        Self { os, kind, state, nonblocking, _not_sync: PhantomData }
    }

    /// Takes ownership of a raw descriptor
    ///
    /// The handle is assumed to be in blocking mode and in `state`; call
    /// [`configure_non_blocking`](Self::configure_non_blocking) if it is not.
    ///
    /// # Safety
    ///
    /// `os` must be an open IPv4 socket of type `kind` that nothing else will
    /// close. An obviously invalid value (e.g. `-1`) is rejected with
    /// [`NetError::InvalidHandle`] and is not closed.
    pub unsafe fn from_raw(os: r::OsSocket, kind: SocketKind, state: SocketState) -> Result<Self> {
        if !r::is_valid(os) {
            return Err(NetError::InvalidHandle);
        }
        Ok(Self::wrap(os, kind, state, false))
    }

    /// Releases ownership of the descriptor without closing it
    pub fn into_raw(self) -> r::OsSocket {
        let os = self.os;
        mem::forget(self);
        os
    }

    /// Raw descriptor, still owned by this socket
    pub fn as_raw(&self) -> r::OsSocket { self.os }

    /// Closes the socket, reporting any error from the OS
    pub fn close(self) -> Result<()> {
        let os = self.into_raw();
        log::debug!("closing socket {}", os);
        r::close(os).op("close")
    }

    /// Switches the socket to non-blocking mode
    pub fn configure_non_blocking(&mut self) -> Result<()> {
        r::set_nonblocking(self.os, true).op("set_nonblocking")?;
        self.nonblocking = true;
        Ok(())
    }

    /// Transport protocol
    pub fn kind(&self) -> SocketKind { self.kind }

    /// Current lifecycle state
    pub fn state(&self) -> SocketState { self.state }

    /// Whether calls on this socket return instead of blocking
    pub fn is_non_blocking(&self) -> bool { self.nonblocking }

    pub(crate) fn os(&self) -> r::OsSocket { self.os }

    pub(crate) fn set_state(&mut self, state: SocketState) {
        log::debug!("socket {}: {:?} -> {:?}", self.os, self.state, state);
        self.state = state;
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        if let Err(e) = r::close(self.os) {
            log::warn!("failed to close socket {}: {}", self.os, e);
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, RawFd};

        impl AsRawFd for Socket {
            fn as_raw_fd(&self) -> RawFd { self.os }
        }

        impl AsFd for Socket {
            fn as_fd(&self) -> BorrowedFd<'_> {
                // SAFETY: the descriptor stays open for as long as `self` is borrowed.
                unsafe { BorrowedFd::borrow_raw(self.os) }
            }
        }
    } else {
        use std::os::windows::io::{AsRawSocket, RawSocket};

        impl AsRawSocket for Socket {
            fn as_raw_socket(&self) -> RawSocket { self.os }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonblocking_tcp_sets_baseline_flags() -> anyhow::Result<()> {
        let s = Socket::tcp(false)?;
        assert_eq!(s.kind(), SocketKind::Tcp);
        assert_eq!(s.state(), SocketState::Created);
        assert!(s.is_non_blocking());
        assert!(s.reuse_address()?);
        s.close()?;
        Ok(())
    }

    #[test]
    fn test_blocking_tcp_leaves_defaults() -> anyhow::Result<()> {
        let s = Socket::tcp(true)?;
        assert!(!s.is_non_blocking());
        assert!(!s.reuse_address()?);
        Ok(())
    }

    #[test]
    fn test_udp_is_always_nonblocking() -> anyhow::Result<()> {
        let s = Socket::udp()?;
        assert_eq!(s.kind(), SocketKind::Udp);
        assert!(s.is_non_blocking());
        Ok(())
    }

    #[test]
    fn test_rollback_passes_error_through() -> anyhow::Result<()> {
        let s = Socket::udp()?;
        let e = s.rollback(NetError::Unsupported { op: "set_nonblocking" });
        assert!(matches!(e, NetError::Unsupported { op: "set_nonblocking" }));
        drop(s);
        Ok(())
    }

    #[test]
    fn test_from_raw_rejects_invalid_handle() {
        let res = unsafe { Socket::from_raw(r::INVALID_HANDLE, SocketKind::Tcp, SocketState::Created) };
        assert!(matches!(res, Err(NetError::InvalidHandle)));
    }

    #[test]
    fn test_into_raw_and_back() -> anyhow::Result<()> {
        let s = Socket::udp()?;
        let os = s.into_raw();
        let back = unsafe { Socket::from_raw(os, SocketKind::Udp, SocketState::Created)? };
        assert_eq!(back.as_raw(), os);
        assert!(!back.is_non_blocking());
        back.close()?;
        Ok(())
    }
}
