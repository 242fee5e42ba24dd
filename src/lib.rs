//! odz - block-oriented LZ77 + Huffman compression
//!
//! This crate implements the odz container format (version 2): input bytes
//! are split into independent 1 MiB blocks, each factorized by a hash-chain
//! LZ77 pass and entropy-coded with per-block canonical Huffman trees. The
//! container decompresses bit-exactly to the original byte sequence.
//!
//! # Features
//!
//! - Stored fallback per block, so incompressible data never expands by
//!   more than a few header bytes per megabyte
//! - Compression levels 1-9 trading hash-chain depth for speed
//! - Two-level table decoder resolving most codewords in a single lookup
//! - Optional per-block progress callback with abort support
//!
//! # Example - in-memory round trip
//!
//! ```
//! use odz::{compress_bytes, decompress_bytes, DEFAULT_LEVEL};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!";
//! let compressed = compress_bytes(data, DEFAULT_LEVEL)?;
//! let decompressed = decompress_bytes(&compressed)?;
//! assert_eq!(&data[..], &decompressed[..]);
//! # Ok::<(), odz::OdzError>(())
//! ```
//!
//! # Example - streaming between files
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//! use odz::DEFAULT_LEVEL;
//!
//! let input = File::open("data.bin")?;
//! let size = input.metadata()?.len();
//! let output = BufWriter::new(File::create("data.odz")?);
//! odz::compress(BufReader::new(input), size, output, DEFAULT_LEVEL, None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod bitstream;
pub mod common;
pub mod compress;
pub mod decompress;
pub mod error;
pub mod huffman;
pub mod tables;

// Re-export commonly used types
pub use common::{
    is_last_block, BlockHeader, BlockType, ErrorKind, OdzError, Progress, Result, BLOCK_SIZE,
    DEFAULT_LEVEL, FORMAT_VERSION, MAGIC, MAX_DISTANCE, MAX_MATCH, MIN_MATCH,
    STREAM_HEADER_SIZE,
};
pub use compress::{compress, compress_bytes};
pub use decompress::{decompress, decompress_bytes};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        // Test that common types are accessible
        let _ = BlockType::Stored;
        let _ = ErrorKind::Corrupt;

        // Test that the convenience functions are accessible
        let compressed = compress_bytes(b"test", DEFAULT_LEVEL).unwrap();
        let decompressed = decompress_bytes(&compressed).unwrap();
        assert_eq!(decompressed, b"test");
    }
}
