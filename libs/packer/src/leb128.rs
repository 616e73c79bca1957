//! Unsigned LEB128 variable-length encoding of 64-bit values.
//!
//! Each byte carries 7 value bits, least significant group first. The high
//! bit (`0x80`) is set on every byte except the last. No zigzag transform is
//! applied to signed values, so anything with the top bit set takes the full
//! [`MAX_LEN`] bytes.
//!
//! See also: <https://en.wikipedia.org/wiki/LEB128>

use std::io;

use crate::error::{Error, Partial};
use crate::stream;

/// Maximum encoded length of a 64-bit value.
pub const MAX_LEN: usize = 10;

const CONTINUE: u8 = 0x80;

/// Counts the 7-bit groups needed to encode `x`.
pub const fn size(mut x: u64) -> usize {
    let mut n = 1;
    while x >= 0x80 {
        x >>= 7;
        n += 1;
    }
    n
}

/// Encodes `x` into the start of `buf` and returns the encoded length.
///
/// Any 64-bit value fits in [`MAX_LEN`] bytes.
#[allow(clippy::cast_possible_truncation)]
pub fn encode(mut x: u64, buf: &mut [u8; MAX_LEN]) -> usize {
    let mut i = 0usize;
    while x >= u64::from(CONTINUE) {
        buf[i] = x as u8 | CONTINUE;
        x >>= 7;
        i += 1;
    }

    buf[i] = x as u8;
    i + 1
}

/// Writes `x` with a single call to the writer.
pub fn write(writer: &mut dyn io::Write, x: u64) -> Result<usize, Partial> {
    let mut buf = [0u8; MAX_LEN];
    let len = encode(x, &mut buf);
    stream::write_full(writer, &buf[..len])
}

/// Reads a value one byte at a time, returning it with the number of bytes
/// consumed.
///
/// Bits past the 64th in the final byte are discarded.
pub fn read(reader: &mut dyn io::Read) -> Result<(u64, usize), Partial> {
    let mut x = 0u64;
    let mut byte = [0u8; 1];
    for i in 0..MAX_LEN {
        stream::read_full(reader, &mut byte).map_err(|e| e.after(i))?;

        let [b] = byte;
        x |= u64::from(b & 0x7F) << (i * 7);

        if b < CONTINUE {
            // No continuation bit is set
            return Ok((x, i + 1));
        }
    }

    Err(Partial::new(MAX_LEN, Error::MalformedVarint))
}
