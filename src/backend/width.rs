//! Offset integer widths.
//!
//! Every size, boundary and descriptor field of an image is stored at one
//! integer width, recorded in the low byte of the header flags. The width is
//! picked at the type level: `Master<u16>`, `Master<u32>` or `Master<u64>`.

use byteorder::{ByteOrder, LittleEndian};
use nom::IResult;
use nom::number::complete::{le_u16, le_u32, le_u64};

mod private {
    pub trait Sealed {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Header length for a given offset width.
///
/// The header is `magic[4] + flags:u32 + 3 * width`, padded to the alignment
/// of its widest field. That gives 16, 20 and 32 bytes for 2-, 4- and 8-byte
/// offsets.
pub const fn head_size(width: usize) -> usize {
    let align = if width > 4 { width } else { 4 };
    (8 + 3 * width).next_multiple_of(align)
}

/// Integer type used for offsets and sizes inside an image.
///
/// Implemented for `u16`, `u32` and `u64` only.
pub trait SizeType: private::Sealed + Copy + core::fmt::Debug + Send + Sync + 'static {
    /// Width in bytes, as recorded in the header.
    const WIDTH: usize;
    /// Largest representable offset.
    const MAX: u64;
    /// Header length for this width.
    const HEAD_SIZE: usize = head_size(Self::WIDTH);
    /// Descriptor length: `data_size`, `offset` and `flags`.
    const ENTRY_SIZE: usize = 3 * Self::WIDTH;

    /// Parses one little-endian field from untrusted input.
    fn parse(input: &[u8]) -> IResult<&[u8], u64>;

    /// Reads one field from the start of `bytes`.
    ///
    /// Panics if `bytes` is shorter than `WIDTH`.
    fn read(bytes: &[u8]) -> u64;

    /// Writes `value` truncated to the width into the start of `bytes`.
    fn write(bytes: &mut [u8], value: u64);

    /// True if `value` can be stored at this width.
    fn fits(value: usize) -> bool {
        u64::try_from(value).is_ok_and(|v| v <= Self::MAX)
    }
}

macro_rules! impl_size_type {
    ($ty:ty, $parse:ident, $read:ident, $write:ident) => {
        impl SizeType for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>();
            const MAX: u64 = <$ty>::MAX as u64;

            fn parse(input: &[u8]) -> IResult<&[u8], u64> {
                $parse(input).map(|(rest, v)| (rest, u64::from(v)))
            }

            #[inline]
            fn read(bytes: &[u8]) -> u64 {
                u64::from(LittleEndian::$read(bytes))
            }

            #[inline]
            fn write(bytes: &mut [u8], value: u64) {
                LittleEndian::$write(bytes, value as $ty)
            }
        }
    };
}

impl_size_type!(u16, le_u16, read_u16, write_u16);
impl_size_type!(u32, le_u32, read_u32, write_u32);
impl_size_type!(u64, le_u64, read_u64, write_u64);

/// Converts a stored field to `usize`, saturating on 32-bit targets.
#[inline]
pub(crate) fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
