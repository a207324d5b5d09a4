use crate::error::ProtoError;

/// Largest packet the fleet will accept on the edit path.
pub const MAX_PACKET_SIZE: usize = 1500;

const SEQUENCE_LEN: usize = 2;
const TIMESTAMP_LEN: usize = 8;

/// Registry of edit packet types carried on the voxel wire.
///
/// The numeric values are fleet-wide and stable; the buffer state
/// machine's "unknown" state is expressed as `Option<PacketType>` rather
/// than a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    SetVoxel,
    SetVoxelDestructive,
    EraseVoxel,
}

impl PacketType {
    /// Wire byte for this type.
    pub const fn wire_value(self) -> u8 {
        match self {
            PacketType::SetVoxel => b'S',
            PacketType::SetVoxelDestructive => b'O',
            PacketType::EraseVoxel => b'E',
        }
    }

    /// Looks a wire byte up in the registry.
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            b'S' => Some(PacketType::SetVoxel),
            b'O' => Some(PacketType::SetVoxelDestructive),
            b'E' => Some(PacketType::EraseVoxel),
            _ => None,
        }
    }

    /// Current wire version stamped after the type byte.
    pub const fn version(self) -> u8 {
        1
    }
}

/// Appends the `[type][version]` packet header, returning its length.
pub fn write_packet_header(out: &mut Vec<u8>, packet_type: PacketType) -> usize {
    out.push(packet_type.wire_value());
    out.push(packet_type.version());
    2
}

/// Header length of the packet in `bytes`, determined by inspecting the
/// leading type byte. Header layout is allowed to vary per type, so
/// offset arithmetic must go through this rather than a constant.
pub fn packet_header_len(bytes: &[u8]) -> Result<usize, ProtoError> {
    let Some(&type_byte) = bytes.first() else {
        return Err(ProtoError::Truncated("missing packet type byte"));
    };
    match PacketType::from_wire(type_byte) {
        Some(_) => Ok(2),
        None => Err(ProtoError::UnknownPacketType(type_byte)),
    }
}

/// Appends the full edit preamble: header, `sequence` (LE), then the
/// creation timestamp in microseconds (LE). Returns the preamble length.
pub fn write_edit_preamble(
    out: &mut Vec<u8>,
    packet_type: PacketType,
    sequence: u16,
    created_at_usec: u64,
) -> usize {
    let header = write_packet_header(out, packet_type);
    out.extend_from_slice(&sequence.to_le_bytes());
    out.extend_from_slice(&created_at_usec.to_le_bytes());
    header + SEQUENCE_LEN + TIMESTAMP_LEN
}

/// Offset of the first payload byte in an edit packet.
pub fn edit_preamble_len(bytes: &[u8]) -> Result<usize, ProtoError> {
    let preamble = packet_header_len(bytes)? + SEQUENCE_LEN + TIMESTAMP_LEN;
    if bytes.len() < preamble {
        return Err(ProtoError::Truncated("incomplete edit preamble"));
    }
    Ok(preamble)
}

/// Reads the sequence number back out of an edit packet.
pub fn read_sequence(bytes: &[u8]) -> Result<u16, ProtoError> {
    let at = packet_header_len(bytes)?;
    let raw: [u8; SEQUENCE_LEN] = bytes
        .get(at..at + SEQUENCE_LEN)
        .and_then(|s| s.try_into().ok())
        .ok_or(ProtoError::Truncated("missing sequence number"))?;
    Ok(u16::from_le_bytes(raw))
}

/// Reads the creation timestamp back out of an edit packet.
pub fn read_created_usec(bytes: &[u8]) -> Result<u64, ProtoError> {
    let at = packet_header_len(bytes)? + SEQUENCE_LEN;
    let raw: [u8; TIMESTAMP_LEN] = bytes
        .get(at..at + TIMESTAMP_LEN)
        .and_then(|s| s.try_into().ok())
        .ok_or(ProtoError::Truncated("missing creation timestamp"))?;
    Ok(u64::from_le_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::{
        edit_preamble_len, packet_header_len, read_created_usec, read_sequence,
        write_edit_preamble, write_packet_header, PacketType,
    };
    use crate::error::ProtoError;

    #[test]
    fn registry_wire_values_are_stable() {
        assert_eq!(PacketType::SetVoxel.wire_value(), b'S');
        assert_eq!(PacketType::SetVoxelDestructive.wire_value(), b'O');
        assert_eq!(PacketType::EraseVoxel.wire_value(), b'E');
        for t in [
            PacketType::SetVoxel,
            PacketType::SetVoxelDestructive,
            PacketType::EraseVoxel,
        ] {
            assert_eq!(PacketType::from_wire(t.wire_value()), Some(t));
        }
        assert_eq!(PacketType::from_wire(0x00), None);
    }

    #[test]
    fn header_is_type_then_version() {
        let mut out = Vec::new();
        let len = write_packet_header(&mut out, PacketType::EraseVoxel);
        assert_eq!(len, 2);
        assert_eq!(out, vec![b'E', 1]);
        assert_eq!(packet_header_len(&out).expect("header should parse"), 2);
    }

    #[test]
    fn header_len_rejects_unknown_types() {
        let err = packet_header_len(&[0x7F, 1]).expect_err("unknown type should fail");
        assert!(matches!(err, ProtoError::UnknownPacketType(0x7F)));
        assert!(matches!(
            packet_header_len(&[]).expect_err("empty should fail"),
            ProtoError::Truncated(_)
        ));
    }

    #[test]
    fn preamble_packs_sequence_and_timestamp_little_endian() {
        let mut out = Vec::new();
        let len = write_edit_preamble(&mut out, PacketType::SetVoxel, 0x0102, 0x0A0B_0C0D);
        assert_eq!(len, 12);
        assert_eq!(out.len(), 12);
        assert_eq!(&out[..2], &[b'S', 1]);
        assert_eq!(&out[2..4], &[0x02, 0x01]);
        assert_eq!(&out[4..8], &[0x0D, 0x0C, 0x0B, 0x0A]);

        assert_eq!(edit_preamble_len(&out).expect("preamble should parse"), 12);
        assert_eq!(read_sequence(&out).expect("sequence should read"), 0x0102);
        assert_eq!(
            read_created_usec(&out).expect("timestamp should read"),
            0x0A0B0C0D
        );
    }

    #[test]
    fn preamble_len_rejects_short_packets() {
        let mut out = Vec::new();
        write_packet_header(&mut out, PacketType::SetVoxel);
        out.extend_from_slice(&[0, 0]);
        let err = edit_preamble_len(&out).expect_err("timestamp missing should fail");
        assert!(matches!(err, ProtoError::Truncated(_)));
    }
}
