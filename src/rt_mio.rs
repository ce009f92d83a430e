//! Mio readiness adapter
//!
//! Registers a [`Socket`] with a caller-owned [`mio::Poll`] so the event loop
//! learns when a call that returned `Retry` is worth repeating. The socket layer
//! itself never polls; this only exposes the descriptor as an event source.
//!
//! - **Linux**: epoll
//! - **macOS / BSD**: kqueue

use mio::event::Source;
use mio::unix::SourceFd;
use mio::{Interest, Registry, Token};
use std::io;

use crate::socket::Socket;

impl Source for Socket {
    fn register(&mut self, registry: &Registry, token: Token, interests: Interest) -> io::Result<()> {
        SourceFd(&self.os()).register(registry, token, interests)
    }

    fn reregister(&mut self, registry: &Registry, token: Token, interests: Interest) -> io::Result<()> {
        SourceFd(&self.os()).reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
        SourceFd(&self.os()).deregister(registry)
    }
}
