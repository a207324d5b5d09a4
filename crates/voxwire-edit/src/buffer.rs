use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;
use voxwire_proto::{write_edit_preamble, PacketType};

/// Microseconds since the Unix epoch, for packet creation timestamps.
pub(crate) fn unix_usec_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_micros() as u64)
        .unwrap_or(0)
}

/// Per-destination staging buffer for one in-progress edit packet.
///
/// State machine: empty (no type, no bytes) until `initialize` stamps
/// the preamble for one packet type; appends of that type accumulate
/// until `take` resets the buffer to empty. Empty and untyped always
/// coincide, and the byte count never exceeds the capacity.
#[derive(Debug)]
pub struct EditPacketBuffer {
    server: Uuid,
    current_type: Option<PacketType>,
    bytes: Vec<u8>,
    capacity: usize,
}

impl EditPacketBuffer {
    pub fn new(server: Uuid, capacity: usize) -> Self {
        Self {
            server,
            current_type: None,
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// The destination server this buffer accumulates for.
    pub fn server(&self) -> Uuid {
        self.server
    }

    /// Type of the packet being assembled, if one is open.
    pub fn current_type(&self) -> Option<PacketType> {
        self.current_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when `extra` more bytes would still fit.
    pub fn fits(&self, extra: usize) -> bool {
        self.bytes.len() + extra <= self.capacity
    }

    /// Opens a fresh packet of `packet_type`: preamble bytes, then the
    /// given sequence number and creation timestamp. Discards anything
    /// previously buffered.
    pub fn initialize(&mut self, packet_type: PacketType, sequence: u16, created_at_usec: u64) {
        self.bytes.clear();
        write_edit_preamble(&mut self.bytes, packet_type, sequence, created_at_usec);
        self.current_type = Some(packet_type);
    }

    /// Appends one encoded edit payload. Returns false (and appends
    /// nothing) when the buffer is untyped or the payload does not fit.
    pub fn append(&mut self, payload: &[u8]) -> bool {
        if self.current_type.is_none() || !self.fits(payload.len()) {
            return false;
        }
        self.bytes.extend_from_slice(payload);
        true
    }

    /// Closes the in-progress packet, returning its type and bytes and
    /// resetting the buffer to empty. `None` when nothing is open.
    pub fn take(&mut self) -> Option<(PacketType, Vec<u8>)> {
        let packet_type = self.current_type.take()?;
        let bytes = std::mem::take(&mut self.bytes);
        if bytes.is_empty() {
            return None;
        }
        Some((packet_type, bytes))
    }
}
