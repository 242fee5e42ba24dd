//! Common types and constants for the odz container format
//!
//! This module defines the error type, format constants, and block header
//! structures shared by the compression and decompression paths.

use thiserror::Error;

/// Stream magic bytes `O D Z`
pub const MAGIC: [u8; 3] = *b"ODZ";

/// Current container format version
pub const FORMAT_VERSION: u8 = 2;

/// Size of the fixed stream header (magic + version + original size)
pub const STREAM_HEADER_SIZE: usize = 12;

/// Block size: every block decompresses to at most this many bytes
pub const BLOCK_SIZE: usize = 1 << 20;

/// Minimum match length worth encoding
pub const MIN_MATCH: usize = 3;

/// Maximum match length
pub const MAX_MATCH: usize = 258;

/// Maximum backward distance of a match
pub const MAX_DISTANCE: usize = 32768;

/// Literal/length alphabet size (256 literals + end-of-block + 29 length codes)
pub const LITLEN_SYMS: usize = 286;

/// Distance alphabet size
pub const DIST_SYMS: usize = 30;

/// End-of-block symbol in the literal/length alphabet
pub const END_OF_BLOCK: u16 = 256;

/// Maximum Huffman code length in bits
pub const MAX_CODE_BITS: u8 = 15;

/// Default compression level (1 = fastest, 9 = best)
pub const DEFAULT_LEVEL: u8 = 6;

/// Progress callback invoked after each block with `(processed, total)` byte
/// counts. Returning `false` aborts the operation with [`OdzError::Aborted`].
pub type Progress<'a> = Option<&'a mut dyn FnMut(u64, u64) -> bool>;

/// Error type for odz operations
#[derive(Debug, Error)]
pub enum OdzError {
    /// Underlying source or sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Progress callback requested abort
    #[error("operation aborted by progress callback")]
    Aborted,

    /// A buffer allocation failed
    #[error("out of memory")]
    OutOfMemory,

    /// Stream header does not start with the `ODZ` magic
    #[error("bad magic bytes in stream header")]
    BadMagic,

    /// Stream header carries a version this build does not read
    #[error("unsupported format version: {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u8),

    /// Block flags byte carries an illegal type field
    #[error("unknown block type: {0}")]
    UnknownBlockType(u8),

    /// Block header declares a raw size above the block limit
    #[error("block raw size {0} exceeds the 1 MiB block limit")]
    BlockTooLarge(u32),

    /// Transmitted code lengths violate the Kraft inequality
    #[error("oversubscribed Huffman code lengths")]
    OversubscribedCode,

    /// Bit pattern does not resolve to any codeword
    #[error("invalid Huffman code in bitstream")]
    InvalidCode,

    /// Decoded symbol falls outside its alphabet
    #[error("invalid symbol: {0}")]
    InvalidSymbol(u32),

    /// Match references data before the start of the block
    #[error("match distance {distance} exceeds {available} bytes of output")]
    InvalidDistance {
        /// Backward distance of the offending match
        distance: u32,
        /// Output bytes available to reference
        available: u32,
    },

    /// Decoded token stream overruns the declared block size
    #[error("decoded data overruns the declared block size")]
    BlockOverflow,

    /// Decoded output size disagrees with the declared size
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Declared size (block or stream header)
        expected: u64,
        /// Bytes actually decoded
        actual: u64,
    },

    /// Bitstream ended inside a codeword or extra-bit field
    #[error("compressed bitstream truncated")]
    TruncatedBitstream,

    /// Serialized code-length table is malformed
    #[error("invalid code-length table: {0}")]
    InvalidCodeTable(&'static str),
}

/// Broad failure category of an [`OdzError`], mirroring the four error codes
/// of the original C library surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source/sink failure or progress abort
    Io,
    /// Allocation failure
    OutOfMemory,
    /// Bad magic, unsupported version, or unknown block type
    Format,
    /// Data-integrity violation
    Corrupt,
}

impl OdzError {
    /// Classify this error into one of the four wire-level categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OdzError::Io(_) | OdzError::Aborted => ErrorKind::Io,
            OdzError::OutOfMemory => ErrorKind::OutOfMemory,
            OdzError::BadMagic
            | OdzError::UnsupportedVersion(_)
            | OdzError::UnknownBlockType(_) => ErrorKind::Format,
            _ => ErrorKind::Corrupt,
        }
    }
}

/// Result type alias for odz operations
pub type Result<T> = std::result::Result<T, OdzError>;

/// Block type field of the flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// Raw bytes stored verbatim
    Stored = 0,
    /// LZ77 token stream under per-block Huffman codes
    Huffman = 1,
}

impl BlockType {
    /// Extract the block type from a flags byte
    pub fn from_flags(flags: u8) -> Result<Self> {
        match (flags >> 1) & 3 {
            0 => Ok(BlockType::Stored),
            1 => Ok(BlockType::Huffman),
            t => Err(OdzError::UnknownBlockType(t)),
        }
    }

    /// Build the flags byte for this type with the given last-block bit
    pub fn to_flags(self, last: bool) -> u8 {
        ((self as u8) << 1) | (last as u8)
    }
}

/// Last-block bit of a flags byte
pub fn is_last_block(flags: u8) -> bool {
    flags & 1 != 0
}

/// Parsed block header with per-type payload sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHeader {
    /// Stored block: `raw_size` literal payload bytes follow
    Stored {
        /// Decompressed (and payload) length of the block
        raw_size: u32,
    },
    /// Huffman block: `comp_size` bit-packed payload bytes follow
    Huffman {
        /// Decompressed length of the block
        raw_size: u32,
        /// Byte length of the compressed payload
        comp_size: u32,
    },
}

impl BlockHeader {
    /// Decompressed length of this block
    pub fn raw_size(&self) -> u32 {
        match *self {
            BlockHeader::Stored { raw_size } | BlockHeader::Huffman { raw_size, .. } => raw_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_flags() {
        assert_eq!(BlockType::Stored.to_flags(false), 0x00);
        assert_eq!(BlockType::Stored.to_flags(true), 0x01);
        assert_eq!(BlockType::Huffman.to_flags(false), 0x02);
        assert_eq!(BlockType::Huffman.to_flags(true), 0x03);

        for flags in 0u8..8 {
            let parsed = BlockType::from_flags(flags);
            match (flags >> 1) & 3 {
                0 => assert_eq!(parsed.unwrap(), BlockType::Stored),
                1 => assert_eq!(parsed.unwrap(), BlockType::Huffman),
                _ => assert!(parsed.is_err()),
            }
            assert_eq!(is_last_block(flags), flags & 1 != 0);
        }
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(OdzError::Aborted.kind(), ErrorKind::Io);
        assert_eq!(OdzError::OutOfMemory.kind(), ErrorKind::OutOfMemory);
        assert_eq!(OdzError::BadMagic.kind(), ErrorKind::Format);
        assert_eq!(OdzError::UnsupportedVersion(7).kind(), ErrorKind::Format);
        assert_eq!(OdzError::UnknownBlockType(3).kind(), ErrorKind::Format);
        assert_eq!(OdzError::OversubscribedCode.kind(), ErrorKind::Corrupt);
        assert_eq!(
            OdzError::SizeMismatch {
                expected: 1,
                actual: 0
            }
            .kind(),
            ErrorKind::Corrupt
        );
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAGIC, [0x4F, 0x44, 0x5A]);
        assert_eq!(BLOCK_SIZE, 1048576);
        assert_eq!(MAX_MATCH, 258);
        assert_eq!(MAX_DISTANCE, 32768);
        assert_eq!(LITLEN_SYMS, 286);
        assert_eq!(DIST_SYMS, 30);
    }
}
