use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Container errors
    #[error("Container too short: {len} bytes (header needs 8)")]
    ContainerTooShort { len: usize },

    #[error("Container truncated: header declares {declared} bytes, buffer has {actual}")]
    ContainerTruncated { declared: u64, actual: usize },

    #[error("Invalid metadata block: {0}")]
    InvalidMetadata(String),

    #[error("Invalid tree block: {0}")]
    InvalidTree(String),

    #[error("Invalid padding: {0} bits")]
    InvalidPadding(u8),

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(String),

    // Decode errors
    #[error("Bit at position {bit_position} has no matching child in the Huffman tree")]
    DecodeTraversal { bit_position: usize },

    #[error("Bit stream ended inside a code at position {bit_position}")]
    TruncatedCode { bit_position: usize },

    // Integrity errors
    #[error("Size mismatch: expected {expected} bytes, got {found}")]
    SizeMismatch { expected: u64, found: u64 },

    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{found:08x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means the container itself could not be read
    pub fn is_malformed_container(&self) -> bool {
        matches!(
            self,
            Self::ContainerTooShort { .. }
                | Self::ContainerTruncated { .. }
                | Self::InvalidMetadata(_)
                | Self::InvalidTree(_)
                | Self::InvalidPadding(_)
                | Self::UnsupportedVersion(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
