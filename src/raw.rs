//! Platform socket primitives
//!
//! This module is the only place in the crate that talks to the operating
//! system. It wraps the POSIX socket API (Linux, macOS, BSD, Android) and
//! WinSock2 (Windows) behind one set of thin `io::Result` functions, so the
//! layers above can stay platform-agnostic.
//!
//! # Conventions
//!
//! - Every function performs exactly one system call (plus, at most, a flag
//!   fix-up on the freshly created descriptor) and never retries.
//! - Failures are reported as `io::Error` built from the OS error code. The
//!   standard library already normalizes `EAGAIN`/`EWOULDBLOCK`/`WSAEWOULDBLOCK`
//!   to [`io::ErrorKind::WouldBlock`]; upper layers classify on that kind alone.
//! - All endpoints are IPv4. Addresses and ports cross this boundary in host
//!   byte order and are converted to network order here.
//!
//! # Safety
//!
//! Raw descriptors are plain integers. Functions here assume the caller passes a
//! descriptor it owns; the owning [`Socket`](crate::Socket) type is what makes
//! that assumption hold.

use std::io;
use std::net::Shutdown;

/// Socket type for protocol communication
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Type {
    /// TCP stream socket
    Stream,
    /// UDP datagram socket
    Dgram,
}

/// Result of a `getpeername` lookup
#[derive(Copy, Clone)]
pub enum PeerName {
    /// IPv4 peer
    V4(SockAddrIn),
    /// Peer of another address family
    Other(i32),
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use std::mem;
        use std::os::unix::io::RawFd;

        /// Unix socket handle type
        pub type OsSocket = RawFd;
        /// Wire-level IPv4 endpoint
        pub type SockAddrIn = libc::sockaddr_in;

        /// Value never returned by a successful socket call
        pub const INVALID_HANDLE: OsSocket = -1;

        // BSD-derived stacks take a single byte for the multicast TTL/loop options.
        #[cfg(any(target_os = "freebsd", target_os = "openbsd", target_os = "netbsd", target_os = "dragonfly", target_os = "solaris", target_os = "illumos"))]
        type MulticastOpt = libc::c_uchar;
        #[cfg(not(any(target_os = "freebsd", target_os = "openbsd", target_os = "netbsd", target_os = "dragonfly", target_os = "solaris", target_os = "illumos")))]
        type MulticastOpt = libc::c_int;

        #[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd", target_os = "dragonfly"))]
        const CREATE_FLAGS: libc::c_int = libc::SOCK_CLOEXEC;
        #[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd", target_os = "dragonfly")))]
        const CREATE_FLAGS: libc::c_int = 0;

        #[cfg(any(target_os = "linux", target_os = "android"))]
        const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        const SEND_FLAGS: libc::c_int = 0;

        const SOCKADDR_IN_LEN: libc::socklen_t = mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;

        fn cvt(rc: libc::c_int) -> io::Result<libc::c_int> {
            if rc < 0 { Err(io::Error::last_os_error()) } else { Ok(rc) }
        }

        fn cvt_len(rc: libc::ssize_t) -> io::Result<usize> {
            if rc < 0 { Err(io::Error::last_os_error()) } else { Ok(rc as usize) }
        }

        /// Whether `os` can possibly name an open descriptor
        pub fn is_valid(os: OsSocket) -> bool { os >= 0 }

        /// Build an IPv4 endpoint from host-order address and port
        pub fn sockaddr_v4(ip: u32, port: u16) -> SockAddrIn {
            let mut s: libc::sockaddr_in = unsafe { mem::zeroed() };
            s.sin_family = libc::AF_INET as _;
            s.sin_port = port.to_be();
            s.sin_addr = libc::in_addr { s_addr: ip.to_be() };
            s
        }
        /// Host-order address of an endpoint
        pub fn sockaddr_ip(s: &SockAddrIn) -> u32 { u32::from_be(s.sin_addr.s_addr) }
        /// Host-order port of an endpoint
        pub fn sockaddr_port(s: &SockAddrIn) -> u16 { u16::from_be(s.sin_port) }

        /// Create a new IPv4 socket of the given type
        pub fn socket(ty: Type) -> io::Result<OsSocket> {
            let t = match ty { Type::Stream => libc::SOCK_STREAM, Type::Dgram => libc::SOCK_DGRAM };
            let fd = cvt(unsafe { libc::socket(libc::AF_INET, t | CREATE_FLAGS, 0) })?;
            #[cfg(target_vendor = "apple")]
            if let Err(e) = setsockopt(fd, libc::SOL_SOCKET, libc::SO_NOSIGPIPE, &(1 as libc::c_int)) {
                let _ = close(fd);
                return Err(e);
            }
            Ok(fd)
        }

        /// Release a descriptor
        pub fn close(os: OsSocket) -> io::Result<()> { cvt(unsafe { libc::close(os) }).map(drop) }

        /// Set socket non-blocking mode
        pub fn set_nonblocking(os: OsSocket, on: bool) -> io::Result<()> {
            unsafe {
                let flags = cvt(libc::fcntl(os, libc::F_GETFL))?;
                let nb = if on { flags | libc::O_NONBLOCK } else { flags & !libc::O_NONBLOCK };
                if nb != flags { cvt(libc::fcntl(os, libc::F_SETFL, nb))?; }
                Ok(())
            }
        }

        /// Raw bind operation for socket to address
        pub fn bind_raw(os: OsSocket, sa: &SockAddrIn) -> io::Result<()> {
            cvt(unsafe { libc::bind(os, sa as *const _ as *const libc::sockaddr, SOCKADDR_IN_LEN) }).map(drop)
        }

        /// Start listening on socket with specified backlog
        pub fn listen_raw(os: OsSocket, backlog: i32) -> io::Result<()> { cvt(unsafe { libc::listen(os, backlog) }).map(drop) }

        /// Accept one pending connection; the new descriptor gets `nonblocking` mode
        #[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd", target_os = "dragonfly"))]
        pub fn accept_raw(os: OsSocket, nonblocking: bool) -> io::Result<OsSocket> {
            let flags = libc::SOCK_CLOEXEC | if nonblocking { libc::SOCK_NONBLOCK } else { 0 };
            cvt(unsafe { libc::accept4(os, std::ptr::null_mut(), std::ptr::null_mut(), flags) })
        }

        /// Accept one pending connection; the new descriptor gets `nonblocking` mode
        #[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "netbsd", target_os = "openbsd", target_os = "dragonfly")))]
        pub fn accept_raw(os: OsSocket, nonblocking: bool) -> io::Result<OsSocket> {
            let fd = cvt(unsafe { libc::accept(os, std::ptr::null_mut(), std::ptr::null_mut()) })?;
            if let Err(e) = set_nonblocking(fd, nonblocking) {
                let _ = close(fd);
                return Err(e);
            }
            Ok(fd)
        }

        /// Raw connect operation
        pub fn connect_raw(os: OsSocket, sa: &SockAddrIn) -> io::Result<()> {
            cvt(unsafe { libc::connect(os, sa as *const _ as *const libc::sockaddr, SOCKADDR_IN_LEN) }).map(drop)
        }

        /// Whether a connect error means the handshake continues in the background
        pub fn is_in_progress(err: &io::Error) -> bool {
            // EAGAIN from connect means no local ports are left, not a pending handshake.
            err.raw_os_error() == Some(libc::EINPROGRESS)
        }

        /// Shut down one or both directions
        pub fn shutdown_raw(os: OsSocket, how: Shutdown) -> io::Result<()> {
            let how = match how { Shutdown::Read => libc::SHUT_RD, Shutdown::Write => libc::SHUT_WR, Shutdown::Both => libc::SHUT_RDWR };
            cvt(unsafe { libc::shutdown(os, how) }).map(drop)
        }

        /// Send on a connected socket
        pub fn send_raw(os: OsSocket, buf: &[u8]) -> io::Result<usize> {
            cvt_len(unsafe { libc::send(os, buf.as_ptr() as *const _, buf.len(), SEND_FLAGS) })
        }

        /// Receive into `buf`, leaving the data queued when `peek` is set
        pub fn recv_raw(os: OsSocket, buf: &mut [u8], peek: bool) -> io::Result<usize> {
            let flags = if peek { libc::MSG_PEEK } else { 0 };
            cvt_len(unsafe { libc::recv(os, buf.as_mut_ptr() as *mut _, buf.len(), flags) })
        }

        /// Send a datagram to an explicit endpoint
        pub fn send_to_raw(os: OsSocket, buf: &[u8], sa: &SockAddrIn) -> io::Result<usize> {
            cvt_len(unsafe {
                libc::sendto(os, buf.as_ptr() as *const _, buf.len(), SEND_FLAGS, sa as *const _ as *const libc::sockaddr, SOCKADDR_IN_LEN)
            })
        }

        /// Remote endpoint of a connected socket
        pub fn peer_name(os: OsSocket) -> io::Result<PeerName> {
            let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
            let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
            cvt(unsafe { libc::getpeername(os, &mut storage as *mut _ as *mut libc::sockaddr, &mut len) })?;
            if storage.ss_family as i32 == libc::AF_INET {
                let sin = unsafe { *(&storage as *const _ as *const libc::sockaddr_in) };
                Ok(PeerName::V4(sin))
            } else {
                Ok(PeerName::Other(storage.ss_family as i32))
            }
        }

        /// Local endpoint of a socket
        pub fn local_name(os: OsSocket) -> io::Result<SockAddrIn> {
            let mut sin: libc::sockaddr_in = unsafe { mem::zeroed() };
            let mut len = SOCKADDR_IN_LEN;
            cvt(unsafe { libc::getsockname(os, &mut sin as *mut _ as *mut libc::sockaddr, &mut len) })?;
            Ok(sin)
        }

        fn setsockopt<T>(fd: RawFd, level: i32, opt: i32, val: &T) -> io::Result<()> {
            cvt(unsafe { libc::setsockopt(fd, level, opt, val as *const T as *const _, mem::size_of::<T>() as libc::socklen_t) }).map(drop)
        }

        fn getsockopt<T: Copy>(fd: RawFd, level: i32, opt: i32) -> io::Result<T> {
            let mut val: T = unsafe { mem::zeroed() };
            let mut len = mem::size_of::<T>() as libc::socklen_t;
            cvt(unsafe { libc::getsockopt(fd, level, opt, &mut val as *mut T as *mut _, &mut len) })?;
            Ok(val)
        }

        fn set_flag(fd: RawFd, level: i32, opt: i32, on: bool) -> io::Result<()> { setsockopt(fd, level, opt, &(on as libc::c_int)) }
        fn flag(fd: RawFd, level: i32, opt: i32) -> io::Result<bool> { getsockopt::<libc::c_int>(fd, level, opt).map(|v| v != 0) }

        /// Set socket receive buffer size
        pub fn set_recv_buffer(os: OsSocket, sz: i32) -> io::Result<()> { setsockopt(os, libc::SOL_SOCKET, libc::SO_RCVBUF, &sz) }
        /// Socket receive buffer size
        pub fn recv_buffer(os: OsSocket) -> io::Result<i32> { getsockopt(os, libc::SOL_SOCKET, libc::SO_RCVBUF) }
        /// Set socket send buffer size
        pub fn set_send_buffer(os: OsSocket, sz: i32) -> io::Result<()> { setsockopt(os, libc::SOL_SOCKET, libc::SO_SNDBUF, &sz) }
        /// Socket send buffer size
        pub fn send_buffer(os: OsSocket) -> io::Result<i32> { getsockopt(os, libc::SOL_SOCKET, libc::SO_SNDBUF) }
        /// Enable or disable SO_LINGER; `Some(secs)` turns it on
        pub fn set_linger(os: OsSocket, secs: Option<i32>) -> io::Result<()> {
            let l = libc::linger { l_onoff: secs.is_some() as libc::c_int, l_linger: secs.unwrap_or(0) };
            setsockopt(os, libc::SOL_SOCKET, libc::SO_LINGER, &l)
        }
        /// Current SO_LINGER setting, `None` when off
        pub fn linger(os: OsSocket) -> io::Result<Option<i32>> {
            let l: libc::linger = getsockopt(os, libc::SOL_SOCKET, libc::SO_LINGER)?;
            Ok((l.l_onoff != 0).then_some(l.l_linger))
        }
        /// Allow rebinding a recently used local address
        pub fn set_reuse_addr(os: OsSocket, on: bool) -> io::Result<()> { set_flag(os, libc::SOL_SOCKET, libc::SO_REUSEADDR, on) }
        /// Whether SO_REUSEADDR is set
        pub fn reuse_addr(os: OsSocket) -> io::Result<bool> { flag(os, libc::SOL_SOCKET, libc::SO_REUSEADDR) }
        /// Enable port reuse for multiple binds
        pub fn set_reuse_port(os: OsSocket, on: bool) -> io::Result<()> { set_flag(os, libc::SOL_SOCKET, libc::SO_REUSEPORT, on) }
        /// Whether SO_REUSEPORT is set
        pub fn reuse_port(os: OsSocket) -> io::Result<bool> { flag(os, libc::SOL_SOCKET, libc::SO_REUSEPORT) }
        /// Disable TCP Nagle algorithm for low latency
        pub fn set_tcp_nodelay(os: OsSocket, on: bool) -> io::Result<()> { set_flag(os, libc::IPPROTO_TCP, libc::TCP_NODELAY, on) }
        /// Whether TCP_NODELAY is set
        pub fn tcp_nodelay(os: OsSocket) -> io::Result<bool> { flag(os, libc::IPPROTO_TCP, libc::TCP_NODELAY) }

        /// Set the TTL of outgoing multicast datagrams
        pub fn set_multicast_ttl(os: OsSocket, ttl: u8) -> io::Result<()> { setsockopt(os, libc::IPPROTO_IP, libc::IP_MULTICAST_TTL, &(ttl as MulticastOpt)) }
        /// Loop outgoing multicast datagrams back to local listeners
        pub fn set_multicast_loop(os: OsSocket, on: bool) -> io::Result<()> { setsockopt(os, libc::IPPROTO_IP, libc::IP_MULTICAST_LOOP, &(on as MulticastOpt)) }
        /// Select the outbound interface for multicast datagrams
        pub fn set_multicast_if(os: OsSocket, iface: u32) -> io::Result<()> {
            setsockopt(os, libc::IPPROTO_IP, libc::IP_MULTICAST_IF, &libc::in_addr { s_addr: iface.to_be() })
        }
        /// Join (`add`) or leave a multicast group on the given local interface
        pub fn set_membership(os: OsSocket, iface: u32, group: u32, add: bool) -> io::Result<()> {
            let mreq = libc::ip_mreq {
                imr_multiaddr: libc::in_addr { s_addr: group.to_be() },
                imr_interface: libc::in_addr { s_addr: iface.to_be() },
            };
            let opt = if add { libc::IP_ADD_MEMBERSHIP } else { libc::IP_DROP_MEMBERSHIP };
            setsockopt(os, libc::IPPROTO_IP, opt, &mreq)
        }

    } else {
        // Windows
        use std::mem;
        use std::os::windows::io::RawSocket;
        use std::sync::OnceLock;
        use windows_sys::Win32::Networking::WinSock::*;

        /// Windows socket handle type
        pub type OsSocket = RawSocket; // SOCKET
        /// Wire-level IPv4 endpoint
        pub type SockAddrIn = SOCKADDR_IN;

        /// Value never returned by a successful socket call
        pub const INVALID_HANDLE: OsSocket = INVALID_SOCKET as OsSocket;

        const SOCKADDR_IN_LEN: i32 = mem::size_of::<SOCKADDR_IN>() as i32;

        static START: OnceLock<i32> = OnceLock::new();
        fn ensure_wsa() -> io::Result<()> {
            let rc = *START.get_or_init(|| unsafe {
                let mut data: WSADATA = mem::zeroed();
                WSAStartup(0x202, &mut data) // MAKEWORD(2,2)
            });
            if rc != 0 { Err(io::Error::from_raw_os_error(rc)) } else { Ok(()) }
        }

        fn last_error() -> io::Error { io::Error::from_raw_os_error(unsafe { WSAGetLastError() }) }
        fn cvt(rc: i32) -> io::Result<i32> { if rc == SOCKET_ERROR { Err(last_error()) } else { Ok(rc) } }
        fn clamp_len(len: usize) -> i32 { len.min(i32::MAX as usize) as i32 }

        /// Whether `os` can possibly name an open socket
        pub fn is_valid(os: OsSocket) -> bool { os != INVALID_HANDLE }

        /// Build an IPv4 endpoint from host-order address and port
        pub fn sockaddr_v4(ip: u32, port: u16) -> SockAddrIn {
            let mut s: SOCKADDR_IN = unsafe { mem::zeroed() };
            s.sin_family = AF_INET as _;
            s.sin_port = port.to_be();
            s.sin_addr = IN_ADDR { S_un: IN_ADDR_0 { S_addr: ip.to_be() } };
            s
        }
        /// Host-order address of an endpoint
        pub fn sockaddr_ip(s: &SockAddrIn) -> u32 { u32::from_be(unsafe { s.sin_addr.S_un.S_addr }) }
        /// Host-order port of an endpoint
        pub fn sockaddr_port(s: &SockAddrIn) -> u16 { u16::from_be(s.sin_port) }

        /// Create a new IPv4 socket of the given type
        pub fn socket(ty: Type) -> io::Result<OsSocket> {
            ensure_wsa()?;
            let t = match ty { Type::Stream => SOCK_STREAM, Type::Dgram => SOCK_DGRAM } as i32;
            let s = unsafe { WSASocketW(AF_INET as i32, t, 0, std::ptr::null(), 0, WSA_FLAG_OVERLAPPED | WSA_FLAG_NO_HANDLE_INHERIT) };
            if s == INVALID_SOCKET { return Err(last_error()); }
            Ok(s as _)
        }

        /// Release a socket
        pub fn close(os: OsSocket) -> io::Result<()> { cvt(unsafe { closesocket(os as usize) }).map(drop) }

        /// Set socket non-blocking mode
        pub fn set_nonblocking(os: OsSocket, on: bool) -> io::Result<()> {
            let mut nb: u32 = on as u32;
            cvt(unsafe { ioctlsocket(os as usize, FIONBIO, &mut nb) }).map(drop)
        }

        /// Raw bind operation for socket to address
        pub fn bind_raw(os: OsSocket, sa: &SockAddrIn) -> io::Result<()> {
            cvt(unsafe { bind(os as usize, sa as *const _ as *const SOCKADDR, SOCKADDR_IN_LEN) }).map(drop)
        }

        /// Start listening on socket with specified backlog
        pub fn listen_raw(os: OsSocket, backlog: i32) -> io::Result<()> { cvt(unsafe { listen(os as usize, backlog) }).map(drop) }

        /// Accept one pending connection; the new socket gets `nonblocking` mode
        pub fn accept_raw(os: OsSocket, nonblocking: bool) -> io::Result<OsSocket> {
            let s = unsafe { accept(os as usize, std::ptr::null_mut(), std::ptr::null_mut()) };
            if s == INVALID_SOCKET { return Err(last_error()); }
            // Accepted sockets inherit FIONBIO from the listener; force the requested mode.
            if let Err(e) = set_nonblocking(s as _, nonblocking) {
                let _ = close(s as _);
                return Err(e);
            }
            Ok(s as _)
        }

        /// Raw connect operation
        pub fn connect_raw(os: OsSocket, sa: &SockAddrIn) -> io::Result<()> {
            cvt(unsafe { connect(os as usize, sa as *const _ as *const SOCKADDR, SOCKADDR_IN_LEN) }).map(drop)
        }

        /// Whether a connect error means the handshake continues in the background
        pub fn is_in_progress(err: &io::Error) -> bool { err.kind() == io::ErrorKind::WouldBlock }

        /// Shut down one or both directions
        pub fn shutdown_raw(os: OsSocket, how: Shutdown) -> io::Result<()> {
            let how = match how { Shutdown::Read => SD_RECEIVE, Shutdown::Write => SD_SEND, Shutdown::Both => SD_BOTH };
            cvt(unsafe { shutdown(os as usize, how as _) }).map(drop)
        }

        /// Send on a connected socket
        pub fn send_raw(os: OsSocket, buf: &[u8]) -> io::Result<usize> {
            cvt(unsafe { send(os as usize, buf.as_ptr(), clamp_len(buf.len()), 0) }).map(|n| n as usize)
        }

        /// Receive into `buf`, leaving the data queued when `peek` is set
        pub fn recv_raw(os: OsSocket, buf: &mut [u8], peek: bool) -> io::Result<usize> {
            let flags = if peek { MSG_PEEK as i32 } else { 0 };
            cvt(unsafe { recv(os as usize, buf.as_mut_ptr(), clamp_len(buf.len()), flags as _) }).map(|n| n as usize)
        }

        /// Send a datagram to an explicit endpoint
        pub fn send_to_raw(os: OsSocket, buf: &[u8], sa: &SockAddrIn) -> io::Result<usize> {
            cvt(unsafe {
                sendto(os as usize, buf.as_ptr(), clamp_len(buf.len()), 0, sa as *const _ as *const SOCKADDR, SOCKADDR_IN_LEN)
            }).map(|n| n as usize)
        }

        /// Remote endpoint of a connected socket
        pub fn peer_name(os: OsSocket) -> io::Result<PeerName> {
            let mut storage: SOCKADDR_STORAGE = unsafe { mem::zeroed() };
            let mut len = mem::size_of::<SOCKADDR_STORAGE>() as i32;
            cvt(unsafe { getpeername(os as usize, &mut storage as *mut _ as *mut SOCKADDR, &mut len) })?;
            if storage.ss_family as i32 == AF_INET as i32 {
                let sin = unsafe { *(&storage as *const _ as *const SOCKADDR_IN) };
                Ok(PeerName::V4(sin))
            } else {
                Ok(PeerName::Other(storage.ss_family as i32))
            }
        }

        /// Local endpoint of a socket
        pub fn local_name(os: OsSocket) -> io::Result<SockAddrIn> {
            let mut sin: SOCKADDR_IN = unsafe { mem::zeroed() };
            let mut len = SOCKADDR_IN_LEN;
            cvt(unsafe { getsockname(os as usize, &mut sin as *mut _ as *mut SOCKADDR, &mut len) })?;
            Ok(sin)
        }

        fn setsockopt_val<T>(os: OsSocket, level: i32, opt: i32, val: &T) -> io::Result<()> {
            cvt(unsafe { setsockopt(os as usize, level, opt, val as *const T as *const u8, mem::size_of::<T>() as i32) }).map(drop)
        }

        fn getsockopt_val<T: Copy>(os: OsSocket, level: i32, opt: i32) -> io::Result<T> {
            let mut val: T = unsafe { mem::zeroed() };
            let mut len = mem::size_of::<T>() as i32;
            cvt(unsafe { getsockopt(os as usize, level, opt, &mut val as *mut T as *mut u8, &mut len) })?;
            Ok(val)
        }

        fn set_flag(os: OsSocket, level: i32, opt: i32, on: bool) -> io::Result<()> { setsockopt_val(os, level, opt, &(on as i32)) }
        fn flag(os: OsSocket, level: i32, opt: i32) -> io::Result<bool> { getsockopt_val::<i32>(os, level, opt).map(|v| v != 0) }

        /// Set socket receive buffer size
        pub fn set_recv_buffer(os: OsSocket, sz: i32) -> io::Result<()> { setsockopt_val(os, SOL_SOCKET as _, SO_RCVBUF as _, &sz) }
        /// Socket receive buffer size
        pub fn recv_buffer(os: OsSocket) -> io::Result<i32> { getsockopt_val(os, SOL_SOCKET as _, SO_RCVBUF as _) }
        /// Set socket send buffer size
        pub fn set_send_buffer(os: OsSocket, sz: i32) -> io::Result<()> { setsockopt_val(os, SOL_SOCKET as _, SO_SNDBUF as _, &sz) }
        /// Socket send buffer size
        pub fn send_buffer(os: OsSocket) -> io::Result<i32> { getsockopt_val(os, SOL_SOCKET as _, SO_SNDBUF as _) }
        /// Enable or disable SO_LINGER; `Some(secs)` turns it on
        pub fn set_linger(os: OsSocket, secs: Option<i32>) -> io::Result<()> {
            let l = LINGER { l_onoff: secs.is_some() as u16, l_linger: secs.unwrap_or(0).clamp(0, u16::MAX as i32) as u16 };
            setsockopt_val(os, SOL_SOCKET as _, SO_LINGER as _, &l)
        }
        /// Current SO_LINGER setting, `None` when off
        pub fn linger(os: OsSocket) -> io::Result<Option<i32>> {
            let l: LINGER = getsockopt_val(os, SOL_SOCKET as _, SO_LINGER as _)?;
            Ok((l.l_onoff != 0).then_some(l.l_linger as i32))
        }
        /// Allow rebinding a recently used local address
        pub fn set_reuse_addr(os: OsSocket, on: bool) -> io::Result<()> { set_flag(os, SOL_SOCKET as _, SO_REUSEADDR as _, on) }
        /// Whether SO_REUSEADDR is set
        pub fn reuse_addr(os: OsSocket) -> io::Result<bool> { flag(os, SOL_SOCKET as _, SO_REUSEADDR as _) }
        /// Port reuse is not available on Windows
        pub fn set_reuse_port(_os: OsSocket, _on: bool) -> io::Result<()> { Err(io::ErrorKind::Unsupported.into()) }
        /// Port reuse is not available on Windows
        pub fn reuse_port(_os: OsSocket) -> io::Result<bool> { Err(io::ErrorKind::Unsupported.into()) }
        /// Disable TCP Nagle algorithm for low latency
        pub fn set_tcp_nodelay(os: OsSocket, on: bool) -> io::Result<()> { set_flag(os, IPPROTO_TCP as _, TCP_NODELAY as _, on) }
        /// Whether TCP_NODELAY is set
        pub fn tcp_nodelay(os: OsSocket) -> io::Result<bool> { flag(os, IPPROTO_TCP as _, TCP_NODELAY as _) }

        /// Set the TTL of outgoing multicast datagrams
        pub fn set_multicast_ttl(os: OsSocket, ttl: u8) -> io::Result<()> { setsockopt_val(os, IPPROTO_IP as _, IP_MULTICAST_TTL as _, &(ttl as i32)) }
        /// Loop outgoing multicast datagrams back to local listeners
        pub fn set_multicast_loop(os: OsSocket, on: bool) -> io::Result<()> { set_flag(os, IPPROTO_IP as _, IP_MULTICAST_LOOP as _, on) }
        /// Select the outbound interface for multicast datagrams
        pub fn set_multicast_if(os: OsSocket, iface: u32) -> io::Result<()> {
            setsockopt_val(os, IPPROTO_IP as _, IP_MULTICAST_IF as _, &IN_ADDR { S_un: IN_ADDR_0 { S_addr: iface.to_be() } })
        }
        /// Join (`add`) or leave a multicast group on the given local interface
        pub fn set_membership(os: OsSocket, iface: u32, group: u32, add: bool) -> io::Result<()> {
            let mreq = IP_MREQ {
                imr_multiaddr: IN_ADDR { S_un: IN_ADDR_0 { S_addr: group.to_be() } },
                imr_interface: IN_ADDR { S_un: IN_ADDR_0 { S_addr: iface.to_be() } },
            };
            let opt = if add { IP_ADD_MEMBERSHIP } else { IP_DROP_MEMBERSHIP };
            setsockopt_val(os, IPPROTO_IP as _, opt as _, &mreq)
        }
    }
}
