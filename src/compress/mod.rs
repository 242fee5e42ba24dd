//! odz compression: stream framing and the block pipeline
//!
//! Compression fills a 1 MiB buffer per block, runs the LZ77 + Huffman
//! pipeline over it, and appends the encoded block to the container. The
//! total input size must be known upfront because the stream header records
//! it before the first block.

mod block;
mod matcher;

pub use block::BlockEncoder;
pub use matcher::{MatchFinder, Token};

use std::io::{Read, Write};

use crate::common::{
    OdzError, Progress, Result, BLOCK_SIZE, FORMAT_VERSION, MAGIC, STREAM_HEADER_SIZE,
};

/// Compress `input_size` bytes from `input` into the odz container format.
///
/// The progress callback, when present, runs after each block with the
/// cumulative `(processed, total)` byte counts; returning `false` aborts
/// with [`OdzError::Aborted`].
pub fn compress<R: Read, W: Write>(
    mut input: R,
    input_size: u64,
    mut output: W,
    level: u8,
    mut progress: Progress<'_>,
) -> Result<()> {
    let mut header = [0u8; STREAM_HEADER_SIZE];
    header[..3].copy_from_slice(&MAGIC);
    header[3] = FORMAT_VERSION;
    header[4..].copy_from_slice(&input_size.to_le_bytes());
    output.write_all(&header)?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(BLOCK_SIZE)
        .map_err(|_| OdzError::OutOfMemory)?;
    buffer.resize(BLOCK_SIZE, 0);

    let mut encoder = BlockEncoder::new(level);
    let mut processed = 0u64;

    loop {
        let want = (input_size - processed).min(BLOCK_SIZE as u64) as usize;
        let mut filled = 0;
        while filled < want {
            let n = input.read(&mut buffer[filled..want])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled < want {
            return Err(OdzError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input ended before the declared size",
            )));
        }

        processed += filled as u64;
        let last = processed == input_size;
        encoder.encode(&buffer[..filled], last, &mut output)?;

        if let Some(callback) = progress.as_mut() {
            if !callback(processed, input_size) {
                return Err(OdzError::Aborted);
            }
        }

        if last {
            break;
        }
    }

    output.flush()?;
    Ok(())
}

/// Compress a byte slice in memory.
pub fn compress_bytes(data: &[u8], level: u8) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress(data, data.len() as u64, &mut output, level, None)?;
    Ok(output)
}
