//! odz decompression: stream framing and block decoding
//!
//! Decompression validates the 12-byte stream header, then walks the block
//! sequence until the last-block flag, decoding each block into a reused
//! 1 MiB buffer. Decode tables are allocated once per stream and rebuilt in
//! place for every huffman block.

mod block;

use std::io::{Read, Write};

use crate::common::{
    is_last_block, BlockHeader, BlockType, OdzError, Progress, Result, BLOCK_SIZE,
    FORMAT_VERSION, MAGIC, STREAM_HEADER_SIZE,
};
use crate::huffman::DecodeTable;

/// Streams larger than this are not pre-reserved from the header alone.
const PREALLOC_LIMIT: u64 = 256 << 20;

/// Decompress an odz container from `input` into `output`.
///
/// Returns the number of decompressed bytes written. The progress callback,
/// when present, runs after each block with the cumulative `(processed,
/// total)` byte counts; returning `false` aborts with [`OdzError::Aborted`].
pub fn decompress<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    mut progress: Progress<'_>,
) -> Result<u64> {
    let mut header = [0u8; STREAM_HEADER_SIZE];
    input.read_exact(&mut header)?;
    if header[..3] != MAGIC {
        return Err(OdzError::BadMagic);
    }
    if header[3] != FORMAT_VERSION {
        return Err(OdzError::UnsupportedVersion(header[3]));
    }
    let original_size = u64::from_le_bytes(header[4..12].try_into().unwrap());

    let mut block_buf = Vec::new();
    block_buf
        .try_reserve_exact(BLOCK_SIZE)
        .map_err(|_| OdzError::OutOfMemory)?;
    block_buf.resize(BLOCK_SIZE, 0);
    let mut comp_buf: Vec<u8> = Vec::new();

    let mut ll_table = DecodeTable::new();
    let mut dist_table = DecodeTable::new();

    let mut total_out = 0u64;
    loop {
        let mut flags = [0u8; 1];
        input.read_exact(&mut flags)?;
        let last = is_last_block(flags[0]);

        let block_header = match BlockType::from_flags(flags[0])? {
            BlockType::Stored => BlockHeader::Stored {
                raw_size: read_u32_le(&mut input)?,
            },
            BlockType::Huffman => BlockHeader::Huffman {
                raw_size: read_u32_le(&mut input)?,
                comp_size: read_u32_le(&mut input)?,
            },
        };

        let raw_size = block_header.raw_size();
        if raw_size as usize > BLOCK_SIZE {
            return Err(OdzError::BlockTooLarge(raw_size));
        }
        if total_out + raw_size as u64 > original_size {
            return Err(OdzError::SizeMismatch {
                expected: original_size,
                actual: total_out + raw_size as u64,
            });
        }

        let out = &mut block_buf[..raw_size as usize];
        match block_header {
            BlockHeader::Stored { .. } => {
                input.read_exact(out)?;
            }
            BlockHeader::Huffman { comp_size, .. } => {
                comp_buf.clear();
                comp_buf
                    .try_reserve(comp_size as usize)
                    .map_err(|_| OdzError::OutOfMemory)?;
                comp_buf.resize(comp_size as usize, 0);
                input.read_exact(&mut comp_buf)?;
                block::decode_huffman_block(&comp_buf, out, &mut ll_table, &mut dist_table)?;
            }
        }
        output.write_all(out)?;
        total_out += raw_size as u64;

        if let Some(callback) = progress.as_mut() {
            if !callback(total_out, original_size) {
                return Err(OdzError::Aborted);
            }
        }

        if last {
            break;
        }
    }

    if total_out != original_size {
        return Err(OdzError::SizeMismatch {
            expected: original_size,
            actual: total_out,
        });
    }

    output.flush()?;
    Ok(total_out)
}

/// Decompress an odz container held in memory.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();

    // Pre-size from the header when it looks sane; hostile sizes surface as
    // oom instead of aborting the process.
    if data.len() >= STREAM_HEADER_SIZE && data[..3] == MAGIC {
        let declared = u64::from_le_bytes(data[4..12].try_into().unwrap());
        if declared <= PREALLOC_LIMIT {
            output
                .try_reserve_exact(declared as usize)
                .map_err(|_| OdzError::OutOfMemory)?;
        }
    }

    decompress(data, &mut output, None)?;
    Ok(output)
}

fn read_u32_le<R: Read>(input: &mut R) -> Result<u32> {
    let mut bytes = [0u8; 4];
    input.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}
