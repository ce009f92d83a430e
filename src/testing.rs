//! Loopback fixtures shared by the unit tests.

use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use crate::outcome::IoOutcome;
use crate::socket::Socket;

/// Re-polls `f` until it yields a value, standing in for an event loop.
pub(crate) fn retry_until<T>(mut f: impl FnMut() -> Option<T>) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(v) = f() {
            return v;
        }
        assert!(Instant::now() < deadline, "timed out waiting for socket readiness");
        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Reads until `outcome` is something other than `Retry`.
pub(crate) fn settle(mut op: impl FnMut() -> IoOutcome) -> IoOutcome {
    retry_until(|| match op() {
        IoOutcome::Retry => None,
        other => Some(other),
    })
}

/// Listener A, client B, accepted C, all non-blocking.
pub(crate) fn loopback_pair() -> anyhow::Result<(Socket, Socket, Socket)> {
    let mut a = Socket::tcp(false)?;
    anyhow::ensure!(a.bind_ipv4(Ipv4Addr::LOCALHOST, 0), "bind 127.0.0.1:0 failed");
    a.listen(16)?;
    let bound = a.local_addr()?;

    let mut b = Socket::tcp(false)?;
    b.connect(&bound)?;
    let c = retry_until(|| a.accept().transpose())?;
    Ok((a, b, c))
}
