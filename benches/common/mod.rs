//! Shared corpus generation for the odz benchmarks.

/// Generate a benchmark corpus of `size` bytes with the given shape.
///
/// The shapes map onto the codec's distinct paths: `logs` is ordinary
/// compressible text, `window` repeats a page that lands just inside the
/// 32 KiB match distance limit, `runs` exercises the distance-1 fill path,
/// and `noise` forces the stored fallback.
pub fn generate_corpus(size: usize, shape: &str) -> Vec<u8> {
    match shape {
        "logs" => {
            let mut data = Vec::with_capacity(size);
            let mut line = 0u32;
            while data.len() < size {
                let entry = format!(
                    "{:08} block={} state=committed bytes={} ratio={}\n",
                    line,
                    line % 3,
                    (line.wrapping_mul(37)) % 1024,
                    (line.wrapping_mul(11)) % 100,
                );
                data.extend_from_slice(entry.as_bytes());
                line += 1;
            }
            data.truncate(size);
            data
        }
        "window" => {
            // A 24 KiB page of hash noise, repeated: within a page there is
            // nothing to match, but every repeat is reachable inside the
            // 32 KiB window.
            let page: Vec<u8> = (0..24 * 1024u32)
                .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
                .collect();
            let mut data = Vec::with_capacity(size + page.len());
            while data.len() < size {
                data.extend_from_slice(&page);
            }
            data.truncate(size);
            data
        }
        "runs" => {
            // Alternating single-byte runs, each longer than the 258-byte
            // match cap.
            let mut data = Vec::with_capacity(size);
            let mut byte = 0x20u8;
            while data.len() < size {
                let run = 300 + (byte as usize % 5) * 100;
                data.resize((data.len() + run).min(size), byte);
                byte = byte.wrapping_add(7);
            }
            data
        }
        "noise" => {
            // xorshift noise defeats both the match finder and the entropy
            // coder, driving the stored fallback.
            let mut state = 0x2545_F491u32;
            (0..size)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    (state >> 24) as u8
                })
                .collect()
        }
        _ => panic!("unknown corpus shape: {}", shape),
    }
}
