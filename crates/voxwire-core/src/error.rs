use thiserror::Error;

/// Errors produced while decoding or constructing octal codes.
#[derive(Debug, Error)]
pub enum OctalCodeError {
    /// Fewer bytes available than the section count requires.
    #[error("octal code truncated: {0}")]
    Truncated(&'static str),
    /// Unused trailing bits of the last packed byte were not zero.
    #[error("octal code has nonzero padding bits")]
    NonZeroPadding,
    /// Hex input was not a well-formed octal code.
    #[error("invalid hex octal code")]
    InvalidHex,
    /// The section-count header ran past the caller's byte bound.
    #[error("octal code length overflowed the available buffer")]
    OverflowedBuffer,
}

#[cfg(test)]
mod tests {
    use super::OctalCodeError;

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            OctalCodeError::Truncated("missing packed sections").to_string(),
            "octal code truncated: missing packed sections"
        );
        assert_eq!(
            OctalCodeError::OverflowedBuffer.to_string(),
            "octal code length overflowed the available buffer"
        );
    }
}
