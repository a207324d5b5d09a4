use voxwire_core::OctalCode;

use crate::error::ProtoError;
use crate::packet::{edit_preamble_len, write_edit_preamble, PacketType};

/// RGB colour carried with set-voxel payloads.
pub type VoxelColor = [u8; 3];

const COLOR_LEN: usize = 3;

/// One voxel mutation: the target octal code plus its colour payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelEdit {
    pub code: OctalCode,
    pub color: VoxelColor,
}

impl VoxelEdit {
    pub fn new(code: OctalCode, color: VoxelColor) -> Self {
        Self { code, color }
    }

    /// Encoded size of this edit's octal-code+colour triple.
    pub fn encoded_len(&self) -> usize {
        self.code.as_bytes().len() + COLOR_LEN
    }
}

/// Encodes one self-delimiting octal-code+colour triple.
pub fn encode_edit_payload(edit: &VoxelEdit) -> Vec<u8> {
    let mut out = Vec::with_capacity(edit.encoded_len());
    out.extend_from_slice(edit.code.as_bytes());
    out.extend_from_slice(&edit.color);
    out
}

/// Encodes a run of edits as consecutive triples, without any packet
/// preamble. Fails when the triples exceed `max_size`.
pub fn encode_edit_details(edits: &[VoxelEdit], max_size: usize) -> Result<Vec<u8>, ProtoError> {
    let needed: usize = edits.iter().map(VoxelEdit::encoded_len).sum();
    if needed > max_size {
        return Err(ProtoError::PayloadTooLarge {
            needed,
            max: max_size,
        });
    }
    let mut out = Vec::with_capacity(needed);
    for edit in edits {
        out.extend_from_slice(edit.code.as_bytes());
        out.extend_from_slice(&edit.color);
    }
    Ok(out)
}

/// Builds one whole single-message edit packet: preamble (header,
/// sequence, creation timestamp) followed by the edit triples.
pub fn encode_edit_message(
    packet_type: PacketType,
    sequence: u16,
    created_at_usec: u64,
    edits: &[VoxelEdit],
    max_size: usize,
) -> Result<Vec<u8>, ProtoError> {
    let mut out = Vec::new();
    let preamble = write_edit_preamble(&mut out, packet_type, sequence, created_at_usec);
    let payload_budget = max_size.saturating_sub(preamble);
    let payload = encode_edit_details(edits, payload_budget)?;
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Walks the self-delimiting triples of an edit payload back out.
pub fn decode_edit_payloads(mut bytes: &[u8]) -> Result<Vec<VoxelEdit>, ProtoError> {
    let mut edits = Vec::new();
    while !bytes.is_empty() {
        let code = OctalCode::from_bytes(bytes)?;
        let consumed = code.as_bytes().len();
        let color: VoxelColor = bytes
            .get(consumed..consumed + COLOR_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or(ProtoError::Truncated("missing colour bytes"))?;
        bytes = &bytes[consumed + COLOR_LEN..];
        edits.push(VoxelEdit::new(code, color));
    }
    Ok(edits)
}

/// Extracts the first octal code of a whole edit packet, skipping the
/// preamble. Used to classify a pre-encoded packet by jurisdiction.
pub fn code_in_edit_packet(packet: &[u8]) -> Result<OctalCode, ProtoError> {
    let at = edit_preamble_len(packet)?;
    Ok(OctalCode::from_bytes(&packet[at..])?)
}

#[cfg(test)]
mod tests {
    use voxwire_core::OctalCode;

    use super::{
        code_in_edit_packet, decode_edit_payloads, encode_edit_details, encode_edit_message,
        encode_edit_payload, VoxelEdit,
    };
    use crate::error::ProtoError;
    use crate::packet::PacketType;

    fn sample_edit(section: u8) -> VoxelEdit {
        VoxelEdit::new(OctalCode::root().child(section), [10, 20, 30])
    }

    #[test]
    fn payload_is_code_bytes_then_colour() {
        let payload = encode_edit_payload(&sample_edit(3));
        assert_eq!(payload, vec![0x01, 0x60, 10, 20, 30]);
    }

    #[test]
    fn details_concatenate_self_delimiting_triples() {
        let edits = vec![sample_edit(3), sample_edit(0)];
        let payload = encode_edit_details(&edits, 64).expect("payload should fit");
        assert_eq!(payload.len(), 10);

        let decoded = decode_edit_payloads(&payload).expect("triples should walk back out");
        assert_eq!(decoded, edits);
    }

    #[test]
    fn details_fail_when_over_budget() {
        let edits = vec![sample_edit(1), sample_edit(2)];
        let err = encode_edit_details(&edits, 9).expect_err("ten bytes should not fit in nine");
        assert!(matches!(
            err,
            ProtoError::PayloadTooLarge { needed: 10, max: 9 }
        ));
    }

    #[test]
    fn message_wraps_payload_with_preamble() {
        let edit = sample_edit(5);
        let packet = encode_edit_message(PacketType::SetVoxel, 7, 99, &[edit.clone()], 1500)
            .expect("message should encode");
        assert_eq!(packet.len(), 12 + 5);
        assert_eq!(packet[0], b'S');

        let code = code_in_edit_packet(&packet).expect("leading code should parse");
        assert_eq!(code, edit.code);
    }

    #[test]
    fn message_budget_accounts_for_the_preamble() {
        let edit = sample_edit(5);
        let err = encode_edit_message(PacketType::SetVoxel, 7, 99, &[edit], 16)
            .expect_err("five payload bytes should not fit after a twelve byte preamble");
        assert!(matches!(err, ProtoError::PayloadTooLarge { .. }));
    }

    #[test]
    fn decode_rejects_truncated_colour() {
        let mut payload = encode_edit_payload(&sample_edit(3));
        payload.truncate(payload.len() - 1);
        let err = decode_edit_payloads(&payload).expect_err("missing colour byte should fail");
        assert!(matches!(err, ProtoError::Truncated(_)));
    }
}
