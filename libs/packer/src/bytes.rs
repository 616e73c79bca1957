//! Byte sequences, framed by their LEB128 length.

use std::{io, mem};

use crate::cache::Builder;
use crate::codec::{Codec, Pack};
use crate::error::{Error, Partial, Result};
use crate::{leb128, stream};

/// Framed sequences up to this size are staged and written with one call.
const STAGING_LEN: usize = 128;

fn framed_size(len: usize) -> usize {
    leb128::size(len as u64) + len
}

fn write_framed(writer: &mut dyn io::Write, data: &[u8]) -> Result<usize, Partial> {
    let mut len_buf = [0u8; leb128::MAX_LEN];
    let prefix = leb128::encode(data.len() as u64, &mut len_buf);
    let len_buf = &len_buf[..prefix];

    if prefix + data.len() <= STAGING_LEN {
        let end = prefix + data.len();
        let mut buf = [0u8; STAGING_LEN];
        buf[..prefix].copy_from_slice(len_buf);
        buf[prefix..end].copy_from_slice(data);
        return stream::write_full(writer, &buf[..end]);
    }

    // large payloads skip the copy and go straight to the writer
    stream::write_full(writer, len_buf)?;
    stream::write_full(writer, data).map_err(|e| e.after(prefix))?;
    Ok(prefix + data.len())
}

/// Reads a framed sequence into `dst`, reusing its allocation where possible.
fn read_framed(
    reader: &mut dyn io::Read,
    dst: &mut Vec<u8>,
    max_len: usize,
) -> Result<usize, Partial> {
    let (len, prefix) = leb128::read(reader)?;
    let len = usize::try_from(len)
        .ok()
        .filter(|&l| l <= max_len)
        .ok_or_else(|| {
            Partial::new(
                prefix,
                Error::LengthLimit {
                    len,
                    limit: max_len,
                },
            )
        })?;

    if dst.capacity() >= len {
        dst.clear();
        dst.resize(len, 0);
    } else {
        *dst = vec![0u8; len];
    }

    let n = stream::read_full(reader, dst).map_err(|e| e.after(prefix))?;
    Ok(prefix + n)
}

/// Codec for raw byte sequences.
#[derive(Debug)]
pub struct BytesCodec {
    max_len: usize,
}

impl BytesCodec {
    /// Creates a codec that rejects sequences longer than `max_len` when
    /// reading.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Codec for BytesCodec {
    type Value = Vec<u8>;

    fn size(&self, value: &Vec<u8>) -> usize {
        framed_size(value.len())
    }

    fn write(&self, writer: &mut dyn io::Write, value: &Vec<u8>) -> Result<usize, Partial> {
        write_framed(writer, value)
    }

    fn read(&self, reader: &mut dyn io::Read, dst: &mut Vec<u8>) -> Result<usize, Partial> {
        read_framed(reader, dst, self.max_len)
    }
}

/// Codec for UTF-8 strings. Encoded the same as [`BytesCodec`].
#[derive(Debug)]
pub struct StringCodec {
    max_len: usize,
}

impl StringCodec {
    /// Creates a codec that rejects strings longer than `max_len` bytes when
    /// reading.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Codec for StringCodec {
    type Value = String;

    fn size(&self, value: &String) -> usize {
        framed_size(value.len())
    }

    fn write(&self, writer: &mut dyn io::Write, value: &String) -> Result<usize, Partial> {
        write_framed(writer, value.as_bytes())
    }

    fn read(&self, reader: &mut dyn io::Read, dst: &mut String) -> Result<usize, Partial> {
        let mut buf = mem::take(dst).into_bytes();
        let res = read_framed(reader, &mut buf, self.max_len);

        match String::from_utf8(buf) {
            Ok(s) => {
                *dst = s;
                res
            },
            Err(e) => {
                // hand the allocation back, emptied
                let mut buf = e.into_bytes();
                buf.clear();
                *dst = String::from_utf8(buf).unwrap_or_default();

                // an earlier read error takes priority over the encoding
                res.and_then(|n| Err(Partial::new(n, Error::InvalidUtf8)))
            },
        }
    }
}

impl Pack for Vec<u8> {
    type Codec = BytesCodec;

    fn build_codec(builder: &mut Builder<'_>) -> Result<Self::Codec> {
        Ok(BytesCodec::new(builder.config().max_bytes_len))
    }
}

impl Pack for String {
    type Codec = StringCodec;

    fn build_codec(builder: &mut Builder<'_>) -> Result<Self::Codec> {
        Ok(StringCodec::new(builder.config().max_bytes_len))
    }
}
