//! Signed 64-bit integers as plain LEB128 of their bit pattern.

use std::io;
use std::marker::PhantomData;

use crate::cache::Builder;
use crate::codec::{Codec, Pack};
use crate::error::{Error, Partial, Result};
use crate::leb128;

/// Converts between a signed integer and the bits that get encoded.
pub trait Int64: Copy + Send + Sync + 'static {
    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Option<Self>;
}

impl Int64 for i64 {
    #[allow(clippy::cast_sign_loss)]
    fn to_bits(self) -> u64 {
        self as u64
    }

    #[allow(clippy::cast_possible_wrap)]
    fn from_bits(bits: u64) -> Option<Self> {
        Some(bits as i64)
    }
}

impl Int64 for isize {
    fn to_bits(self) -> u64 {
        // isize is at most 64 bits wide
        (self as i64).to_bits()
    }

    fn from_bits(bits: u64) -> Option<Self> {
        i64::from_bits(bits).and_then(|v| Self::try_from(v).ok())
    }
}

/// Codec for signed integers.
///
/// Negative values have their top bit set and always take 10 bytes.
pub struct IntCodec<T>(PhantomData<fn() -> T>);

impl<T> IntCodec<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for IntCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Int64> Codec for IntCodec<T> {
    type Value = T;

    fn size(&self, value: &T) -> usize {
        leb128::size(value.to_bits())
    }

    fn write(&self, writer: &mut dyn io::Write, value: &T) -> Result<usize, Partial> {
        leb128::write(writer, value.to_bits())
    }

    fn read(&self, reader: &mut dyn io::Read, dst: &mut T) -> Result<usize, Partial> {
        let (bits, n) = leb128::read(reader)?;
        *dst = T::from_bits(bits).ok_or_else(|| Partial::new(n, Error::IntegerOverflow))?;
        Ok(n)
    }
}

macro_rules! impl_pack_int {
    ($($Ty:ty)*) => { $(
        impl Pack for $Ty {
            type Codec = IntCodec<$Ty>;

            fn build_codec(_builder: &mut Builder<'_>) -> Result<Self::Codec> {
                Ok(IntCodec::new())
            }
        }
    )* };
}

impl_pack_int!(i64 isize);

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: Int64>(v: T) -> Vec<u8> {
        let codec = IntCodec::<T>::new();
        let mut buf = Vec::new();
        let n = codec.write(&mut buf, &v).expect("vec write can't fail");
        assert_eq!(n, buf.len(), "write must report its length");
        assert_eq!(codec.size(&v), buf.len(), "size must match write");
        buf
    }

    #[test]
    fn zero_is_one_byte() {
        assert_eq!(encode(0i64), [0x00]);
    }

    #[test]
    fn three_hundred() {
        assert_eq!(encode(300i64), [0xAC, 0x02]);
    }

    #[test]
    fn negative_takes_ten_bytes() {
        for v in [-1i64, -300, i64::MIN] {
            assert_eq!(encode(v).len(), 10, "{v} must be 10 bytes");
        }
    }

    #[test]
    fn isize_matches_i64() {
        for v in [0isize, 1, -1, 300, isize::MAX, isize::MIN] {
            assert_eq!(encode(v), encode(v as i64), "{v} must encode like i64");
        }
    }

    #[test]
    fn round_trip() {
        let codec = IntCodec::<i64>::new();
        for v in [0i64, 1, -1, 300, -300, i64::MIN, i64::MAX] {
            let buf = encode(v);
            let mut r = 12345i64;
            let n = codec.read(&mut buf.as_slice(), &mut r).expect("valid data");
            assert_eq!(n, buf.len(), "must consume everything");
            assert_eq!(v, r, "must be equal");
        }
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn isize_overflow() {
        let buf = encode(i64::MAX);
        let mut r = 0isize;
        let err = IntCodec::<isize>::new()
            .read(&mut buf.as_slice(), &mut r)
            .expect_err("too large for isize");
        assert!(matches!(err.error(), Error::IntegerOverflow), "got {err:?}");
    }
}
