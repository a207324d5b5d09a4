//! Wire protocol for voxel edit traffic.
//!
//! Covers the packet-type registry, the batched edit packet preamble
//! (header, sequence number, creation timestamp), the self-delimiting
//! octal-code+colour edit payloads, and the per-server jurisdiction map
//! with its broadcast wire form.

pub mod edit;
pub mod error;
pub mod jurisdiction;
pub mod packet;

pub use edit::{
    code_in_edit_packet, decode_edit_payloads, encode_edit_details, encode_edit_message,
    encode_edit_payload, VoxelColor, VoxelEdit,
};
pub use error::ProtoError;
pub use jurisdiction::{Containment, JurisdictionMap};
pub use packet::{
    edit_preamble_len, packet_header_len, read_created_usec, read_sequence, write_edit_preamble,
    write_packet_header, PacketType, MAX_PACKET_SIZE,
};
