use std::collections::VecDeque;
use std::io;
use std::net::{SocketAddr, UdpSocket};

use tracing::warn;

use crate::queue::{NetworkPacket, OutboundQueue};

/// Best-effort UDP send worker.
///
/// Packets accumulate in a queue and drain during `process`; a socket
/// that would block stops the pass and the remainder is retried on the
/// next tick. Hard send errors drop the packet.
#[derive(Debug)]
pub struct UdpOutbound {
    socket: UdpSocket,
    pending: VecDeque<NetworkPacket>,
}

impl UdpOutbound {
    /// Binds a non-blocking socket on `local`.
    pub fn bind(local: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket,
            pending: VecDeque::new(),
        })
    }

    /// The bound local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl OutboundQueue for UdpOutbound {
    fn queue_packet(&mut self, dest: SocketAddr, bytes: &[u8]) {
        self.pending.push_back(NetworkPacket::new(dest, bytes.to_vec()));
    }

    fn process(&mut self) -> bool {
        while let Some(packet) = self.pending.front() {
            match self.socket.send_to(&packet.bytes, packet.dest) {
                Ok(_) => {
                    self.pending.pop_front();
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    return true;
                }
                Err(err) => {
                    warn!("udp send to {} failed, dropping packet: {err}", packet.dest);
                    self.pending.pop_front();
                }
            }
        }
        false
    }

    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
