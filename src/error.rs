//! Error types for socket lifecycle, option and peer operations.
//!
//! Connected data-path calls (`send`, `recv`, `peek`) never produce a
//! [`NetError`]; they collapse into [`IoOutcome`](crate::IoOutcome) instead.

use std::io;

use crate::socket::SocketState;

/// Result type for socket operations.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors that can occur while creating, configuring or inspecting a socket.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// A system call failed. Failures of option calls are non-fatal to the handle.
    #[error("{op}: {source}")]
    Os {
        /// The operation that failed.
        op: &'static str,
        /// The OS error.
        #[source]
        source: io::Error,
    },

    /// The raw value does not name a usable socket.
    #[error("invalid socket handle")]
    InvalidHandle,

    /// The operation is not valid in the socket's current lifecycle state.
    #[error("{op} is not valid on a {state:?} socket")]
    InvalidState {
        /// The operation that was attempted.
        op: &'static str,
        /// The state the socket was in.
        state: SocketState,
    },

    /// The handle has no established peer.
    #[error("socket has no peer")]
    NoPeer,

    /// The peer is not an IPv4 endpoint.
    #[error("unsupported peer address family {family}")]
    UnsupportedFamily {
        /// Raw address family reported by the OS.
        family: i32,
    },

    /// The option is not available on this platform.
    #[error("{op} is not supported on this platform")]
    Unsupported {
        /// The operation that was attempted.
        op: &'static str,
    },
}

impl NetError {
    /// Wrap an OS error with the name of the failing operation.
    ///
    /// `ErrorKind::Unsupported` is lifted into [`NetError::Unsupported`].
    pub fn os(op: &'static str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::Unsupported {
            Self::Unsupported { op }
        } else {
            Self::Os { op, source }
        }
    }

    /// Underlying OS error, if any.
    pub fn os_error(&self) -> Option<&io::Error> {
        match self {
            Self::Os { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Shorthand for `map_err(|e| NetError::os(op, e))`.
pub(crate) trait OsContext<T> {
    fn op(self, op: &'static str) -> Result<T>;
}

impl<T> OsContext<T> for io::Result<T> {
    fn op(self, op: &'static str) -> Result<T> {
        self.map_err(|e| NetError::os(op, e))
    }
}
