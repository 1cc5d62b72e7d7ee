//! Metadata bitstream carried at the bottom of a laid out image.
//!
//! ```text
//! magic        11 bytes  "GENKINOMORI"
//! body length  u32       number of body bits
//! body length  u32       repeated, both copies must agree
//! body:
//!   height       var u32
//!   block count  var u32
//!   { run: var u32, gap: var u32 } ... until gap == 0
//! ```
//!
//! Block indices are stored as runs of consecutive indices separated by gaps.
//! A pair `(run, gap)` expands to `run` indices directly after the cursor,
//! followed (when `gap != 0`) by one index `gap` past the end of the run.

use crate::bits::BitStream;
use crate::error::HeaderError;

pub const MAGIC: &[u8; 11] = b"GENKINOMORI";

/// Bits taken by the magic and the two copies of the body length.
pub const PREAMBLE_BITS: usize = (MAGIC.len() + 8) * 8;

/// Decoded header body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub height: u32,
    pub block_count: u32,
    /// Strictly increasing cell indices, one per stored block.
    pub block_index: Vec<u32>,
}

/// Encode the header body: height, block count and run-length block indices.
///
/// `indices` must be strictly increasing and positive.
pub fn encode_body(height: u32, indices: &[u32]) -> BitStream {
    let mut body = BitStream::new();
    body.push_var_u32(height);
    body.push_var_u32(indices.len() as u32);

    let mut run = 0u32;
    let mut cursor = 0u32;
    for &k in indices {
        debug_assert!(k > cursor, "block indices must be strictly increasing");
        let gap = k - cursor;
        if gap == 1 {
            run += 1;
        } else {
            body.push_var_u32(run);
            body.push_var_u32(gap);
            run = 0;
        }
        cursor = k;
    }
    body.push_var_u32(run);
    body.push_var_u32(0);
    body
}

/// Build the full header: magic, duplicated body length, then the body.
pub fn make_header(height: u32, indices: &[u32]) -> BitStream {
    let body = encode_body(height, indices);
    let mut header = BitStream::with_capacity(PREAMBLE_BITS + body.len());
    for &b in MAGIC {
        header.push_byte(b);
    }
    let nbits = body.len() as u32;
    header.push_u32(nbits);
    header.push_u32(nbits);
    header.concat(&body);
    header
}

/// Consume and validate the preamble, returning the body length in bits.
pub fn parse_magic_and_length(stream: &mut BitStream) -> Result<u32, HeaderError> {
    for &expected in MAGIC {
        if stream.pop_byte() != expected {
            return Err(HeaderError::WrongFormat);
        }
    }
    let first = stream.pop_u32();
    let second = stream.pop_u32();
    if first != second {
        return Err(HeaderError::CorruptedLength(first, second));
    }
    Ok(first)
}

/// Height and block count at the front of a body, without consuming them.
pub fn peek_counts(stream: &BitStream) -> (u32, u32) {
    let mut s = stream.clone();
    let height = s.pop_var_u32();
    (height, s.pop_var_u32())
}

fn advance(cursor: u32, by: u32) -> u32 {
    cursor
        .checked_add(by)
        .unwrap_or_else(|| panic!("block index overflow: {cursor} + {by}"))
}

/// Decode a header body.
///
/// # Panics
///
/// If the stream ends early, an index passes `u32::MAX`, or the decoded index
/// count differs from the declared block count. All of these mean the header
/// was not written by [`make_header`].
pub fn parse_header(stream: &mut BitStream) -> ParsedHeader {
    let height = stream.pop_var_u32();
    let block_count = stream.pop_var_u32();

    // Every pair takes at least 16 bits, which bounds the useful capacity.
    let mut block_index = Vec::with_capacity((block_count as usize).min(stream.len()));
    let mut cursor = 0u32;
    loop {
        let run = stream.pop_var_u32();
        let gap = stream.pop_var_u32();
        assert!(
            block_index.len() as u64 + run as u64 + (gap != 0) as u64 <= block_count as u64,
            "block count not consistent: more than {block_count} indices"
        );
        for _ in 0..run {
            cursor = advance(cursor, 1);
            block_index.push(cursor);
        }
        if gap == 0 {
            break;
        }
        cursor = advance(cursor, gap);
        block_index.push(cursor);
    }
    assert_eq!(
        block_index.len(),
        block_count as usize,
        "block count not consistent"
    );

    ParsedHeader {
        height,
        block_count,
        block_index,
    }
}
