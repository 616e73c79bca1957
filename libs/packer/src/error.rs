//! Error handling types.
//!
//! Codecs report failures as [`Partial`], which remembers how many bytes were
//! already produced or consumed. The [`Encoder`](crate::Encoder) and
//! [`Decoder`](crate::Decoder) unwrap that into a plain [`Error`].

use std::io;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Potential errors to encounter when building codecs, encoding, or decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The error originated from the [`io::Write`] or [`io::Read`]
    /// implementation. Reaching the end of the input early is reported as
    /// [`io::ErrorKind::UnexpectedEof`].
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A LEB128 integer did not terminate within 10 bytes.
    #[error("varint does not terminate within 10 bytes")]
    MalformedVarint,
    /// A decoded integer does not fit the target type.
    #[error("LEB encoded integer overflows target type")]
    IntegerOverflow,
    /// A byte sequence length prefix exceeded the configured limit.
    #[error("byte sequence length {len} exceeds the limit of {limit}")]
    LengthLimit { len: u64, limit: usize },
    /// Tried to decode a [`String`] but the data was not valid UTF-8.
    #[error("invalid utf-8 in data for string")]
    InvalidUtf8,
    /// The type contains itself, directly or through other types.
    #[error("type `{0}` contains itself and cannot be packed")]
    RecursiveType(&'static str),
}

/// An [`Error`] together with the number of bytes processed before it
/// occurred.
///
/// For writes, the count is how many bytes reached the writer. For reads, it
/// is how many bytes were taken from the reader.
#[derive(Debug, thiserror::Error)]
#[error("{source} (after {processed} bytes)")]
pub struct Partial {
    processed: usize,
    source: Error,
}

impl Partial {
    /// Creates a new partial failure.
    pub fn new(processed: usize, source: impl Into<Error>) -> Self {
        Self {
            processed,
            source: source.into(),
        }
    }

    /// The number of bytes processed before the failure.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Gets the underlying error.
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// Discards the byte count.
    pub fn into_error(self) -> Error {
        self.source
    }

    /// Adds bytes that were processed before the failing operation started.
    #[must_use]
    pub fn after(mut self, processed: usize) -> Self {
        self.processed += processed;
        self
    }
}

impl From<Error> for Partial {
    fn from(value: Error) -> Self {
        Self::new(0, value)
    }
}

impl From<io::Error> for Partial {
    fn from(value: io::Error) -> Self {
        Self::new(0, value)
    }
}

impl From<Partial> for Error {
    fn from(value: Partial) -> Self {
        value.source
    }
}

/// Returns an [`io::Error`] with kind [`io::ErrorKind::UnexpectedEof`].
pub(crate) fn eof() -> Error {
    io::Error::from(io::ErrorKind::UnexpectedEof).into()
}
