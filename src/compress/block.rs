//! Per-block encoder
//!
//! Runs the LZ77 pass over one raw block, builds per-block Huffman codes from
//! the token frequencies, and emits whichever of the stored or huffman
//! encodings is smaller on the wire.

use std::io::Write;

use crate::bitstream::BitWriter;
use crate::common::{BlockType, Result, DIST_SYMS, END_OF_BLOCK, LITLEN_SYMS};
use crate::compress::matcher::{MatchFinder, Token};
use crate::huffman::{build_lengths, canonical_codes, write_code_lengths};
use crate::tables::{distance_symbol, length_symbol};

/// Wire overhead of a stored block header (flags + raw_size)
const STORED_OVERHEAD: usize = 5;

/// Wire overhead of a huffman block header (flags + raw_size + comp_size)
const HUFFMAN_OVERHEAD: usize = 9;

/// Block encoder owning the match finder and per-block scratch buffers.
#[derive(Debug)]
pub struct BlockEncoder {
    finder: MatchFinder,
    tokens: Vec<Token>,
    ll_freqs: Vec<u32>,
    dist_freqs: Vec<u32>,
}

impl BlockEncoder {
    /// Create a block encoder for the given compression level.
    pub fn new(level: u8) -> Self {
        Self {
            finder: MatchFinder::new(level),
            tokens: Vec::new(),
            ll_freqs: vec![0; LITLEN_SYMS],
            dist_freqs: vec![0; DIST_SYMS],
        }
    }

    /// Encode one raw block (at most the block size) to the sink.
    pub fn encode<W: Write>(&mut self, data: &[u8], last: bool, writer: &mut W) -> Result<()> {
        self.finder.tokenize(data, &mut self.tokens);

        self.ll_freqs.fill(0);
        self.dist_freqs.fill(0);
        for &token in &self.tokens {
            match token {
                Token::Literal(byte) => self.ll_freqs[byte as usize] += 1,
                Token::Match { length, distance } => {
                    let (sym, _, _) = length_symbol(length);
                    self.ll_freqs[sym as usize] += 1;
                    let (dsym, _, _) = distance_symbol(distance);
                    self.dist_freqs[dsym as usize] += 1;
                }
            }
        }
        // End-of-block terminates every huffman payload.
        self.ll_freqs[END_OF_BLOCK as usize] += 1;

        let ll_lens = build_lengths(&self.ll_freqs);
        let dist_lens = build_lengths(&self.dist_freqs);
        let payload = self.encode_huffman_payload(&ll_lens, &dist_lens);

        if payload.len() + HUFFMAN_OVERHEAD < data.len() + STORED_OVERHEAD {
            writer.write_all(&[BlockType::Huffman.to_flags(last)])?;
            writer.write_all(&(data.len() as u32).to_le_bytes())?;
            writer.write_all(&(payload.len() as u32).to_le_bytes())?;
            writer.write_all(&payload)?;
        } else {
            writer.write_all(&[BlockType::Stored.to_flags(last)])?;
            writer.write_all(&(data.len() as u32).to_le_bytes())?;
            writer.write_all(data)?;
        }

        Ok(())
    }

    /// Serialize the code-length tables and the token stream into a
    /// bit-packed payload.
    fn encode_huffman_payload(&self, ll_lens: &[u8], dist_lens: &[u8]) -> Vec<u8> {
        let ll_codes = canonical_codes(ll_lens);
        let dist_codes = canonical_codes(dist_lens);

        let mut writer = BitWriter::with_capacity(512 + self.tokens.len() / 2);
        write_code_lengths(&mut writer, ll_lens, dist_lens);

        for &token in &self.tokens {
            match token {
                Token::Literal(byte) => {
                    let code = ll_codes[byte as usize];
                    writer.write_bits(code.bits as u32, code.len);
                }
                Token::Match { length, distance } => {
                    let (sym, extra_bits, extra) = length_symbol(length);
                    let code = ll_codes[sym as usize];
                    writer.write_bits(code.bits as u32, code.len);
                    if extra_bits > 0 {
                        writer.write_bits(extra as u32, extra_bits);
                    }

                    let (dsym, extra_bits, extra) = distance_symbol(distance);
                    let code = dist_codes[dsym as usize];
                    writer.write_bits(code.bits as u32, code.len);
                    if extra_bits > 0 {
                        writer.write_bits(extra as u32, extra_bits);
                    }
                }
            }
        }

        let eob = ll_codes[END_OF_BLOCK as usize];
        writer.write_bits(eob.bits as u32, eob.len);
        writer.finish()
    }
}
