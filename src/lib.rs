#![deny(unsafe_op_in_unsafe_fn)]
//! Native IPv4 socket primitives for non-blocking I/O engines
//!
//! Handles are created with [`Socket::tcp`] / [`Socket::udp`], configured with
//! the option, lifecycle and multicast methods, and driven with
//! [`send`](Socket::send) / [`recv`](Socket::recv), whose results collapse into
//! [`IoOutcome`]. Readiness and retry scheduling belong to the caller's event
//! loop; with the `mio-runtime` feature a `Socket` is a `mio` event source.

pub mod address;
pub mod config;
pub mod connection;
pub mod error;
pub mod io;
pub mod multicast;
pub mod options;
pub mod outcome;
pub mod peer;
pub mod raw; // OS-Level socket helpers (Linux/Windows)
pub mod socket;

cfg_if::cfg_if! {
    if #[cfg(all(unix, feature = "mio-runtime"))] {
        pub mod rt_mio;
    }
}

#[cfg(test)]
mod testing;

/// Convenience re-exports
pub use address::SocketAddress;
pub use config::SocketConfig;
pub use connection::Connect;
pub use error::{NetError, Result};
pub use outcome::{IoOutcome, StatusCode};
pub use socket::{Socket, SocketKind, SocketState};
