//! Non-blocking data transfer
//!
//! Each call performs a single `send`/`recv` and classifies the result:
//!
//! | OS result | [`IoOutcome`] |
//! |-----------|---------------|
//! | `n > 0` | `Transferred(n)` |
//! | would block | `Retry` |
//! | `0` from a read (orderly close) | `Disconnected` |
//! | any other error | `Disconnected` |
//!
//! Nothing here buffers, loops or retries; `Retry` hands the decision back to
//! the caller's event loop. Unconnected datagram sends (`send_to`) have no
//! connection to lose and report failures as [`NetError`](crate::NetError).

use std::io;

use crate::address::SocketAddress;
use crate::error::{OsContext, Result};
use crate::outcome::IoOutcome;
use crate::raw as r;
use crate::socket::Socket;

fn classify(os: r::OsSocket, op: &str, res: io::Result<usize>) -> IoOutcome {
    match res {
        Ok(n) => IoOutcome::Transferred(n),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => IoOutcome::Retry,
        Err(e) => {
            log::trace!("{} on socket {} disconnected: {}", op, os, e);
            IoOutcome::Disconnected
        }
    }
}

fn classify_read(os: r::OsSocket, op: &str, res: io::Result<usize>) -> IoOutcome {
    match res {
        Ok(0) => {
            log::trace!("{} on socket {}: peer closed", op, os);
            IoOutcome::Disconnected
        }
        other => classify(os, op, other),
    }
}

impl Socket {
    /// Sends bytes on a connected socket
    pub fn send(&self, buf: &[u8]) -> IoOutcome {
        classify(self.os(), "send", r::send_raw(self.os(), buf))
    }

    /// Receives bytes from a connected socket
    ///
    /// An empty `buf` returns `Transferred(0)` without touching the socket,
    /// since a zero-byte read cannot be told apart from an orderly close.
    pub fn recv(&self, buf: &mut [u8]) -> IoOutcome {
        if buf.is_empty() {
            return IoOutcome::Transferred(0);
        }
        classify_read(self.os(), "recv", r::recv_raw(self.os(), buf, false))
    }

    /// Like [`recv`](Self::recv) but leaves the data queued for the next read
    pub fn peek(&self, buf: &mut [u8]) -> IoOutcome {
        if buf.is_empty() {
            return IoOutcome::Transferred(0);
        }
        classify_read(self.os(), "peek", r::recv_raw(self.os(), buf, true))
    }

    /// Sends one datagram to `addr` on an unconnected UDP socket
    ///
    /// There is no connection to lose here, so every OS error, would-block
    /// included, is reported as a plain failure (`-1` through the numeric
    /// contract) with the cause kept in [`NetError::Os`].
    pub fn send_to(&self, buf: &[u8], addr: &SocketAddress) -> Result<usize> {
        r::send_to_raw(self.os(), buf, addr.as_raw()).op("send_to")
    }

    /// Probes whether the peer has gone away
    ///
    /// **This consumes one byte of application data** when any is pending. Use
    /// it only where losing that byte is acceptable, such as reaping idle
    /// connections, never on a socket whose protocol stream is still live.
    ///
    /// Returns `true` on orderly close or a read error, `false` when a byte was
    /// read or the read would block. On a blocking socket with nothing pending
    /// this call blocks.
    pub fn is_dead(&self) -> bool {
        let mut probe = [0u8; 1];
        self.recv(&mut probe).is_disconnected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetError;
    use crate::outcome::{StatusCode, FAILURE};
    use crate::testing::{loopback_pair, settle};
    use std::net::{Ipv4Addr, Shutdown};

    #[test]
    fn test_recv_without_data_is_retry() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        let mut buf = [0u8; 16];
        assert_eq!(c.recv(&mut buf), IoOutcome::Retry);
        assert_eq!(b.recv(&mut buf), IoOutcome::Retry);
        assert_eq!(c.peek(&mut buf), IoOutcome::Retry);
        Ok(())
    }

    #[test]
    fn test_send_then_recv_is_byte_identical() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        let payload: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        assert_eq!(b.send(&payload), IoOutcome::Transferred(payload.len()));

        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        while received.len() < payload.len() {
            match settle(|| c.recv(&mut buf)) {
                IoOutcome::Transferred(n) => received.extend_from_slice(&buf[..n]),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(received, payload);
        Ok(())
    }

    #[test]
    fn test_peek_does_not_consume() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        assert_eq!(b.send(b"abcdef"), IoOutcome::Transferred(6));

        let mut peeked = [0u8; 6];
        let mut read = [0u8; 6];
        // wait until the whole payload is queued so both calls see the same bytes
        crate::testing::retry_until(|| (c.peek(&mut peeked) == IoOutcome::Transferred(6)).then_some(()));
        assert_eq!(c.recv(&mut read), IoOutcome::Transferred(6));
        assert_eq!(peeked, read);
        assert_eq!(&read, b"abcdef");
        Ok(())
    }

    #[test]
    fn test_orderly_close_is_disconnected_both_directions() -> anyhow::Result<()> {
        let mut buf = [0u8; 8];

        let (_a, b, c) = loopback_pair()?;
        b.close()?;
        assert_eq!(settle(|| c.recv(&mut buf)), IoOutcome::Disconnected);

        let (_a, b, c) = loopback_pair()?;
        c.close()?;
        assert_eq!(settle(|| b.recv(&mut buf)), IoOutcome::Disconnected);
        assert_eq!(settle(|| b.peek(&mut buf)), IoOutcome::Disconnected);
        Ok(())
    }

    #[test]
    fn test_send_after_peer_reset_disconnects() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        c.set_linger(Some(std::time::Duration::ZERO))?;
        c.close()?; // linger 0 sends RST
        let outcome = settle(|| match b.send(b"x") {
            IoOutcome::Transferred(_) => IoOutcome::Retry,
            other => other,
        });
        assert_eq!(outcome, IoOutcome::Disconnected);
        Ok(())
    }

    #[test]
    fn test_empty_buffer_never_reports_close() -> anyhow::Result<()> {
        let (_a, _b, c) = loopback_pair()?;
        assert_eq!(c.recv(&mut []), IoOutcome::Transferred(0));
        assert_eq!(c.peek(&mut []), IoOutcome::Transferred(0));
        Ok(())
    }

    #[test]
    fn test_send_to_between_udp_sockets() -> anyhow::Result<()> {
        let mut rx = Socket::udp()?;
        assert!(rx.bind_ipv4(Ipv4Addr::LOCALHOST, 0));
        let dest = rx.local_addr()?;
        let tx = Socket::udp()?;

        assert_eq!(tx.send_to(b"datagram", &dest)?, 8);
        let mut buf = [0u8; 64];
        assert_eq!(settle(|| rx.recv(&mut buf)), IoOutcome::Transferred(8));
        assert_eq!(&buf[..8], b"datagram");
        Ok(())
    }

    #[test]
    fn test_send_to_broadcast_without_permission_fails() -> anyhow::Result<()> {
        let tx = Socket::udp()?;
        let res = tx.send_to(b"x", &SocketAddress::new(0xffff_ffff, 9));
        assert!(matches!(res, Err(NetError::Os { op: "send_to", .. })));
        assert_eq!(res.status_code(), FAILURE);
        Ok(())
    }

    #[test]
    fn test_is_dead_probe() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        assert!(!c.is_dead());

        assert_eq!(b.send(b"z"), IoOutcome::Transferred(1));
        crate::testing::retry_until(|| (c.peek(&mut [0u8; 1]) == IoOutcome::Transferred(1)).then_some(()));
        assert!(!c.is_dead());
        // the probe consumed the byte
        assert_eq!(c.recv(&mut [0u8; 1]), IoOutcome::Retry);

        b.shutdown(Shutdown::Both)?;
        crate::testing::retry_until(|| c.is_dead().then_some(()));
        Ok(())
    }

    #[test]
    fn test_ping_scenario() -> anyhow::Result<()> {
        let (_a, b, c) = loopback_pair()?;
        assert_eq!(b.send(b"PING"), IoOutcome::Transferred(4));

        let mut buf = [0u8; 4];
        assert_eq!(settle(|| c.recv(&mut buf)), IoOutcome::Transferred(4));
        assert_eq!(&buf, b"PING");
        assert!(!c.is_dead());

        b.shutdown(Shutdown::Both)?;
        crate::testing::retry_until(|| c.is_dead().then_some(()));
        Ok(())
    }
}
