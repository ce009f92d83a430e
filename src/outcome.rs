//! Normalized I/O outcomes and the numeric status contract
//!
//! Every data-path call collapses its OS result into an [`IoOutcome`]. Callers
//! that need plain integers (for example a runtime bridging these primitives to
//! another language) use [`StatusCode`] to obtain the fixed sentinel values below.
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `n >= 0` | bytes transferred, option value, host-order address or port |
//! | [`FAILURE`] | creation, lifecycle or option call failed |
//! | [`RETRY`] | would block; reschedule, the connection is intact |
//! | [`DISCONNECTED`] | treat the connection as terminated |
//! | [`PEER_LOOKUP_FAILED`] | no established peer |
//! | [`PEER_UNSUPPORTED_FAMILY`] | peer is not IPv4 |
//!
//! `RETRY` and `FAILURE` share a value; they are never returned by the same call.

use std::net::Ipv4Addr;

use crate::connection::Connect;
use crate::error::NetError;

/// Creation or operation failure.
pub const FAILURE: i32 = -1;
/// I/O would block; not fatal.
pub const RETRY: i32 = -1;
/// Connection closed by the peer or failed.
pub const DISCONNECTED: i32 = -2;
/// Peer lookup failed (no established peer).
pub const PEER_LOOKUP_FAILED: i32 = -1;
/// Peer address family is not IPv4.
pub const PEER_UNSUPPORTED_FAMILY: i32 = -2;

/// Classified result of a send/recv/peek call
///
/// The specific OS error behind [`IoOutcome::Disconnected`] is dropped on
/// purpose: the only decision a caller makes is retry-or-close.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IoOutcome {
    /// `n` bytes were sent or received
    Transferred(usize),
    /// The operation would block; poll for readiness and try again
    Retry,
    /// Orderly close or any other failure; the connection is finished
    Disconnected,
}

impl IoOutcome {
    /// Bytes transferred, if any
    pub fn bytes(self) -> Option<usize> {
        match self {
            Self::Transferred(n) => Some(n),
            _ => None,
        }
    }

    /// Whether the caller should reschedule the call
    pub fn is_retry(self) -> bool { self == Self::Retry }

    /// Whether the connection must be treated as terminated
    pub fn is_disconnected(self) -> bool { self == Self::Disconnected }
}

/// Collapse a typed result into the fixed integer contract
pub trait StatusCode {
    /// Integer status as seen by callers of the numeric contract
    fn status_code(&self) -> i32;
}

impl StatusCode for IoOutcome {
    fn status_code(&self) -> i32 {
        match *self {
            Self::Transferred(n) => n.status_code(),
            Self::Retry => RETRY,
            Self::Disconnected => DISCONNECTED,
        }
    }
}

impl StatusCode for NetError {
    fn status_code(&self) -> i32 {
        match self {
            NetError::UnsupportedFamily { .. } => PEER_UNSUPPORTED_FAMILY,
            NetError::NoPeer => PEER_LOOKUP_FAILED,
            _ => FAILURE,
        }
    }
}

impl StatusCode for () {
    fn status_code(&self) -> i32 { 0 }
}

impl StatusCode for i32 {
    fn status_code(&self) -> i32 { *self }
}

impl StatusCode for bool {
    fn status_code(&self) -> i32 { *self as i32 }
}

impl StatusCode for usize {
    fn status_code(&self) -> i32 { (*self).min(i32::MAX as usize) as i32 }
}

// A pending handshake is still a successful call.
impl StatusCode for Connect {
    fn status_code(&self) -> i32 { 0 }
}

impl StatusCode for u16 {
    fn status_code(&self) -> i32 { i32::from(*self) }
}

impl StatusCode for Ipv4Addr {
    // Addresses above 127.255.255.255 come out negative, as they do for any
    // signed 32-bit consumer of a host-order IPv4 value.
    fn status_code(&self) -> i32 { u32::from(*self) as i32 }
}

impl<T: StatusCode> StatusCode for Result<T, NetError> {
    fn status_code(&self) -> i32 {
        match self {
            Ok(v) => v.status_code(),
            Err(e) => e.status_code(),
        }
    }
}
