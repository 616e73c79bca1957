//! Loops over the caller's writer and reader that keep track of how many bytes
//! actually went through, even when the operation fails halfway.

use std::io;

use crate::error::{Partial, eof};

/// Writes the entire buffer.
///
/// Like [`io::Write::write_all`], but a failure reports how many bytes were
/// accepted by the writer first.
pub(crate) fn write_full(writer: &mut dyn io::Write, mut buf: &[u8]) -> Result<usize, Partial> {
    let len = buf.len();
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => {
                let err = io::Error::from(io::ErrorKind::WriteZero);
                return Err(Partial::new(len - buf.len(), err));
            },
            Ok(n) => buf = &buf[n..],
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(err) => return Err(Partial::new(len - buf.len(), err)),
        }
    }

    Ok(len)
}

/// Fills the entire buffer.
///
/// Readers may hand out fewer bytes than asked for, so this keeps reading until
/// the buffer is full or the reader signals the end of input, which is
/// reported as [`io::ErrorKind::UnexpectedEof`].
pub(crate) fn read_full(reader: &mut dyn io::Read, buf: &mut [u8]) -> Result<usize, Partial> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(Partial::new(filled, eof())),
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {},
            Err(err) => return Err(Partial::new(filled, err)),
        }
    }

    Ok(filled)
}
