//! Socket option presets
//!
//! A [`SocketConfig`] bundles the tunables of the options layer so an engine
//! can configure every new handle with one call instead of a chain of setters.
//!
//! ## Latency
//! - `tcp_nodelay`: disables Nagle's algorithm for immediate send
//! - small buffers keep queuing delay down
//!
//! ## Throughput
//! - `recv_buf`/`send_buf`: larger socket buffers for high-bandwidth links
//! - `reuse_port`: lets several listeners share one port
//!
//! # Examples
//!
//! ```rust,no_run
//! use horizon_netcore::{Socket, SocketConfig};
//!
//! let mut listener = Socket::tcp(false)?;
//! let cfg = SocketConfig::low_latency();
//! cfg.apply(&listener)?;
//! listener.bind_ipv4(std::net::Ipv4Addr::UNSPECIFIED, 9009);
//! listener.listen(cfg.tcp_backlog)?;
//! # Ok::<(), horizon_netcore::NetError>(())
//! ```

use std::time::Duration;

use crate::error::{NetError, Result};
use crate::socket::{Socket, SocketKind};

/// Option values applied to a socket by [`SocketConfig::apply`]
///
/// `None` leaves the OS default untouched. Options that do not apply to the
/// socket's kind (TCP options on UDP, multicast options on TCP) are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct SocketConfig {
/// TCP_NODELAY (TCP only)
///
/// **Default**: `Some(true)`
pub tcp_nodelay: Option<bool>,

/// SO_REUSEADDR
///
/// **Default**: `Some(true)`
pub reuse_addr: Option<bool>,

/// SO_REUSEPORT (Unix only)
///
/// Ignored on platforms without it rather than failing the whole apply.
///
/// **Default**: `false`
pub reuse_port: bool,

/// Socket receive buffer size in bytes
///
/// **Default**: `None` (system default)
pub recv_buf: Option<usize>,

/// Socket send buffer size in bytes
///
/// **Default**: `None` (system default)
pub send_buf: Option<usize>,

/// SO_LINGER; `Some(Some(d))` enables, `Some(None)` disables
///
/// **Default**: `None` (untouched)
pub linger: Option<Option<Duration>>,

/// Listen backlog for callers that pass it to [`Socket::listen`]
///
/// **Default**: `1024`
pub tcp_backlog: i32,

/// Multicast TTL (UDP only)
///
/// **Default**: `None`
pub multicast_ttl: Option<u8>,

/// Multicast loopback (UDP only)
///
/// **Default**: `None`
pub multicast_loop: Option<bool>,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            tcp_nodelay: Some(true),
            reuse_addr: Some(true),
            reuse_port: false,
            recv_buf: None,
            send_buf: None,
            linger: None,
            tcp_backlog: 1024,
            multicast_ttl: None,
            multicast_loop: None,
        }
    }
}

impl SocketConfig {
    /// Small buffers, Nagle disabled, connections reset on close
    pub fn low_latency() -> Self {
        Self {
            tcp_nodelay: Some(true),
            recv_buf: Some(256 * 1024),
            send_buf: Some(256 * 1024),
            linger: Some(Some(Duration::ZERO)),
            tcp_backlog: 512,
            multicast_ttl: Some(1),
            ..Self::default()
        }
    }

    /// Large buffers, Nagle enabled, port sharing
    pub fn high_throughput() -> Self {
        Self {
            tcp_nodelay: Some(false), // Allow Nagle for efficiency
            reuse_port: true,
            recv_buf: Some(16 << 20),
            send_buf: Some(16 << 20),
            tcp_backlog: 2048,
            ..Self::default()
        }
    }

    /// Applies every option relevant to `socket`'s kind, stopping at the first failure
    pub fn apply(&self, socket: &Socket) -> Result<()> {
        if let Some(sz) = self.recv_buf { socket.set_recv_buffer_size(sz)?; }
        if let Some(sz) = self.send_buf { socket.set_send_buffer_size(sz)?; }
        if let Some(on) = self.reuse_addr { socket.set_reuse_address(on)?; }
        if self.reuse_port {
            match socket.set_reuse_port(true) {
                Err(NetError::Unsupported { .. }) => log::debug!("SO_REUSEPORT unavailable, skipped"),
                other => other?,
            }
        }
        if let Some(linger) = self.linger { socket.set_linger(linger)?; }

        match socket.kind() {
            SocketKind::Tcp => {
                if let Some(on) = self.tcp_nodelay { socket.set_tcp_nodelay(on)?; }
            }
            SocketKind::Udp => {
                if let Some(ttl) = self.multicast_ttl { socket.set_multicast_ttl(ttl)?; }
                if let Some(on) = self.multicast_loop { socket.set_multicast_loop(on)?; }
            }
        }
        Ok(())
    }
}
