//! Resolves the broadcast target and sends a magic packet as a single UDP
//! datagram.
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use log::{debug, info};
use thiserror::Error;

use crate::wol::MagicPacket;

pub const DEFAULT_BROADCAST: Ipv4Addr = Ipv4Addr::BROADCAST;
pub const DEFAULT_PORT: u16 = 9;

#[derive(Error, Debug)]
pub enum TransmitError {
    #[error("invalid IPv4 broadcast address '{0}'")]
    InvalidBroadcastAddress(String),

    #[error("invalid port '{0}', expected a number between 0 and 65535")]
    InvalidPort(String),

    #[error("unable to set up broadcast socket: {0} (ports below 1024, such as 9, may need elevated privileges)")]
    SocketCreate(#[source] io::Error),

    #[error("unable to send datagram: {0}")]
    Send(#[source] io::Error),
}

/// A UDP socket able to broadcast. Dropping it closes the socket.
pub trait DatagramSocket {
    fn set_broadcast(&self, on: bool) -> io::Result<()>;
    fn send_to(&self, buf: &[u8], addr: SocketAddrV4) -> io::Result<usize>;
}

/// Opens datagram sockets bound to a local endpoint.
pub trait Network {
    type Socket: DatagramSocket;

    fn open(&self, local: SocketAddrV4) -> io::Result<Self::Socket>;
}

impl DatagramSocket for UdpSocket {
    fn set_broadcast(&self, on: bool) -> io::Result<()> {
        UdpSocket::set_broadcast(self, on)
    }

    fn send_to(&self, buf: &[u8], addr: SocketAddrV4) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, addr)
    }
}

/// The operating system's network stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNetwork;

impl Network for SystemNetwork {
    type Socket = UdpSocket;

    fn open(&self, local: SocketAddrV4) -> io::Result<UdpSocket> {
        UdpSocket::bind(local)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastTarget {
    pub address: Ipv4Addr,
    pub port: u16,
}

impl Default for BroadcastTarget {
    fn default() -> Self {
        Self {
            address: DEFAULT_BROADCAST,
            port: DEFAULT_PORT,
        }
    }
}

impl BroadcastTarget {
    /// Resolves optional address and port strings, falling back to
    /// `255.255.255.255:9` for whichever is absent.
    pub fn resolve(address: Option<&str>, port: Option<&str>) -> Result<Self, TransmitError> {
        let address = match address {
            Some(text) => resolve_broadcast(text)?,
            None => DEFAULT_BROADCAST,
        };
        let port = match port {
            Some(text) => resolve_port(text)?,
            None => DEFAULT_PORT,
        };
        Ok(Self { address, port })
    }

    pub fn socket_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.address, self.port)
    }
}

impl fmt::Display for BroadcastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Parses a dotted-decimal IPv4 address.
pub fn resolve_broadcast(text: &str) -> Result<Ipv4Addr, TransmitError> {
    text.parse::<Ipv4Addr>()
        .map_err(|_| TransmitError::InvalidBroadcastAddress(text.to_string()))
}

/// Parses a decimal port number. Signs, whitespace and values above 65535 are
/// rejected; port 0 is accepted.
pub fn resolve_port(text: &str) -> Result<u16, TransmitError> {
    if text.is_empty() || !text.bytes().all(|c| c.is_ascii_digit()) {
        return Err(TransmitError::InvalidPort(text.to_string()));
    }
    text.parse::<u16>()
        .map_err(|_| TransmitError::InvalidPort(text.to_string()))
}

/// Sends `packet` once to `target`. The local endpoint is bound to the
/// wildcard address on the target port. Nothing is retried.
pub fn send<N: Network>(
    network: &N,
    packet: &MagicPacket,
    target: BroadcastTarget,
) -> Result<usize, TransmitError> {
    let local = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, target.port);
    let socket = network.open(local).map_err(TransmitError::SocketCreate)?;
    socket
        .set_broadcast(true)
        .map_err(TransmitError::SocketCreate)?;
    debug!("bound broadcast socket on {}", local);

    let payload = packet.as_bytes();
    let sent = socket
        .send_to(payload, target.socket_addr())
        .map_err(TransmitError::Send)?;
    if sent != payload.len() {
        return Err(TransmitError::Send(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("sent {} of {} bytes", sent, payload.len()),
        )));
    }

    info!("sent {} byte magic packet to {}", sent, target);
    Ok(sent)
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Open(SocketAddrV4),
        Broadcast(bool),
        Send(Vec<u8>, SocketAddrV4),
        Close,
    }

    /// Records every socket call; individual steps can be made to fail.
    #[derive(Default, Clone)]
    pub struct FakeNetwork {
        pub events: Rc<RefCell<Vec<Event>>>,
        pub fail_open: bool,
        pub fail_broadcast: bool,
        pub fail_send: bool,
        pub short_send: bool,
    }

    pub struct FakeSocket {
        net: FakeNetwork,
    }

    impl FakeNetwork {
        pub fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn record(&self, event: Event) {
            self.events.borrow_mut().push(event);
        }
    }

    impl Network for FakeNetwork {
        type Socket = FakeSocket;

        fn open(&self, local: SocketAddrV4) -> io::Result<FakeSocket> {
            if self.fail_open {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.record(Event::Open(local));
            Ok(FakeSocket { net: self.clone() })
        }
    }

    impl DatagramSocket for FakeSocket {
        fn set_broadcast(&self, on: bool) -> io::Result<()> {
            if self.net.fail_broadcast {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.net.record(Event::Broadcast(on));
            Ok(())
        }

        fn send_to(&self, buf: &[u8], addr: SocketAddrV4) -> io::Result<usize> {
            if self.net.fail_send {
                return Err(io::Error::new(io::ErrorKind::Other, "network unreachable"));
            }
            self.net.record(Event::Send(buf.to_vec(), addr));
            if self.net.short_send {
                return Ok(buf.len() - 1);
            }
            Ok(buf.len())
        }
    }

    impl Drop for FakeSocket {
        fn drop(&mut self) {
            self.net.record(Event::Close);
        }
    }
}
