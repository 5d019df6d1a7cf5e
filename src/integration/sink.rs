//! Outbound message transports.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::info;

use crate::error::SinkError;
use crate::integration::osc::OscMessage;

/// Fire-and-forget destination for OSC messages.
pub trait MessageSink {
    fn send(&mut self, message: &OscMessage) -> Result<(), SinkError>;
}

/// Sends each message as one UDP datagram.
#[derive(Debug)]
pub struct UdpOscSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpOscSink {
    /// Bind an ephemeral local socket and resolve the destination.
    pub fn connect(host: &str, port: u16) -> Result<Self, SinkError> {
        let target = (host, port)
            .to_socket_addrs()
            .map_err(|_| SinkError::Resolve(format!("{host}:{port}")))?
            .next()
            .ok_or_else(|| SinkError::Resolve(format!("{host}:{port}")))?;

        let local = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(local).map_err(SinkError::Bind)?;

        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl MessageSink for UdpOscSink {
    fn send(&mut self, message: &OscMessage) -> Result<(), SinkError> {
        self.socket
            .send_to(&message.encode(), self.target)
            .map_err(SinkError::Send)?;
        Ok(())
    }
}

/// Keeps every message in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub messages: Vec<OscMessage>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageSink for RecordingSink {
    fn send(&mut self, message: &OscMessage) -> Result<(), SinkError> {
        self.messages.push(message.clone());
        Ok(())
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn send(&mut self, message: &OscMessage) -> Result<(), SinkError> {
        info!(address = %message.address, args = ?message.args, "osc");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::osc::OscArg;

    #[test]
    fn test_udp_sink_delivers_encoded_packet() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut sink = UdpOscSink::connect("127.0.0.1", port).unwrap();
        let message = OscMessage::new("/balls/count", vec![OscArg::Int(2)]);
        sink.send(&message).unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], message.encode().as_slice());
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.send(&OscMessage::new("/a", vec![])).unwrap();
        sink.send(&OscMessage::new("/b", vec![])).unwrap();

        let addresses: Vec<&str> = sink.messages.iter().map(|m| m.address.as_str()).collect();
        assert_eq!(addresses, vec!["/a", "/b"]);
    }
}
