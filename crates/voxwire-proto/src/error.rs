use thiserror::Error;
use voxwire_core::OctalCodeError;

/// Errors returned by wire encode/decode operations.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// An embedded octal code failed to decode.
    #[error("octal code error: {0}")]
    OctalCode(#[from] OctalCodeError),
    /// The leading type byte is not in the packet registry.
    #[error("unknown packet type byte 0x{0:02X}")]
    UnknownPacketType(u8),
    /// Input ended before a complete field.
    #[error("packet truncated: {0}")]
    Truncated(&'static str),
    /// An encoded payload would exceed the caller's size cap.
    #[error("edit payload does not fit: {needed} bytes needed, {max} allowed")]
    PayloadTooLarge { needed: usize, max: usize },
    /// A jurisdiction broadcast failed structural validation.
    #[error("malformed jurisdiction broadcast: {0}")]
    MalformedJurisdiction(&'static str),
}
