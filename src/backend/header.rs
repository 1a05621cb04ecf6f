//! Image header codec.
//!
//! ```text
//! offset 0   magic     "EAT\0"
//! offset 4   flags     u32, low byte = offset width, bits 8..32 = tags
//! offset 8   total_size
//!            boundary_1   end of the data area
//!            boundary_2   start of the descriptor table
//!            (zero padding up to HEAD_SIZE)
//! ```
//!
//! All integers are little-endian. The three size fields use the image's
//! offset width.

use super::width::{SizeType, to_usize};
use crate::error::{EatError, Result};
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian};
use nom::bytes::complete::{tag, take};
use nom::number::complete::le_u32;
use nom::{IResult, Parser};

/// Magic bytes at the start of every image.
pub const MAGIC: [u8; 4] = *b"EAT\0";

/// Bits of the flags word that hold the offset width.
pub const WIDTH_MASK: u32 = 0x0000_00FF;

bitflags! {
    /// User-assigned classification tags stored in the header flags.
    ///
    /// The allocator ignores all of them except `INVALID`, which marks the
    /// whole image as untrusted and makes validation fail.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Classification: u32 {
        /// Image is untrusted; validation fails while set.
        const INVALID       = 0x0000_0100;
        /// Hidden from listings.
        const HIDDEN        = 0x0000_0200;
        /// May be relocated.
        const MOVEABLE      = 0x0000_0400;
        /// Public content.
        const PUBLIC        = 0x0000_0800;
        /// Confidential content.
        const CONFIDENTIAL  = 0x0000_1000;
        /// Archived.
        const ARCHIVE       = 0x0000_2000;
        /// Important.
        const IMPORTANT     = 0x0000_4000;
        /// Owned by the system.
        const SYSTEM        = 0x0000_8000;
        /// Not yet confirmed.
        const UNCONFIRMED   = 0x0001_0000;
        /// Draft.
        const DRAFT         = 0x0002_0000;
        /// Final version.
        const FINAL         = 0x0004_0000;
        /// Due for renewal.
        const RENEWAL       = 0x0008_0000;
        /// Expired.
        const EXPIRED       = 0x0010_0000;
        /// Payloads are encrypted.
        const ENCRYPTED     = 0x0020_0000;
        /// Internal use.
        const INTERNAL      = 0x0040_0000;
        /// External origin.
        const EXTERNAL      = 0x0080_0000;
        /// Holds image data.
        const IMAGE         = 0x0100_0000;
        /// Holds program data.
        const PROGRAM_DATA  = 0x0200_0000;
        /// Microfilm record.
        const MICROFILM     = 0x0400_0000;
        /// Report.
        const REPORT        = 0x0800_0000;
        /// List.
        const LIST          = 0x1000_0000;
        /// Evidence.
        const EVIDENCE      = 0x2000_0000;
        /// Agreement.
        const AGREEMENT     = 0x4000_0000;
        /// Communication.
        const COMMUNICATION = 0x8000_0000;
    }
}

/// Decoded image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Must equal [`MAGIC`].
    pub magic: [u8; 4],
    /// Width byte plus classification tags.
    pub flags: u32,
    /// Length of the whole image in bytes.
    pub total_size: usize,
    /// End of the data area.
    pub boundary_1: usize,
    /// Start of the descriptor table.
    pub boundary_2: usize,
}

impl Header {
    /// Header of an empty image of `total_size` bytes.
    pub fn new<S: SizeType>(total_size: usize) -> Self {
        Self {
            magic: MAGIC,
            flags: S::WIDTH as u32,
            total_size,
            boundary_1: S::HEAD_SIZE,
            boundary_2: total_size,
        }
    }

    /// Offset width recorded in the flags word.
    pub fn width(&self) -> usize {
        (self.flags & WIDTH_MASK) as usize
    }

    /// Classification tags currently set.
    pub fn classification(&self) -> Classification {
        Classification::from_bits_retain(self.flags & !WIDTH_MASK)
    }

    /// Removes `remove`, then adds `add`. The width byte is never touched.
    pub fn modify_flags(&mut self, add: Classification, remove: Classification) {
        let tags = (self.classification() - remove) | add;
        self.flags = (self.flags & WIDTH_MASK) | (tags.bits() & !WIDTH_MASK);
    }

    /// Checks the header on its own, without looking at the table.
    pub fn validate<S: SizeType>(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(EatError::invalid("bad magic"));
        }
        if self.width() != S::WIDTH {
            return Err(EatError::invalid("offset width mismatch"));
        }
        if self.classification().contains(Classification::INVALID) {
            return Err(EatError::invalid("image is tagged invalid"));
        }
        if self.boundary_1 < S::HEAD_SIZE {
            return Err(EatError::invalid("data area starts inside the header"));
        }
        if self.boundary_2 < self.boundary_1 {
            return Err(EatError::invalid("boundaries are crossed"));
        }
        if self.total_size < self.boundary_2 {
            return Err(EatError::invalid("table extends past the image"));
        }
        Ok(())
    }

    /// Decodes a header from the start of `bytes`.
    ///
    /// Only the layout is checked here; call [`Header::validate`] before
    /// trusting the values.
    pub fn decode<S: SizeType>(bytes: &[u8]) -> Result<Self> {
        match parse_header::<S>(bytes) {
            Ok((_, header)) => Ok(header),
            Err(nom::Err::Error(e) | nom::Err::Failure(e))
                if e.code == nom::error::ErrorKind::Tag =>
            {
                Err(EatError::invalid("bad magic"))
            }
            Err(_) => Err(EatError::invalid("truncated header")),
        }
    }

    /// Writes the header into the first `S::HEAD_SIZE` bytes of `out`.
    pub fn encode<S: SizeType>(&self, out: &mut [u8]) {
        let w = S::WIDTH;
        out[..4].copy_from_slice(&self.magic);
        LittleEndian::write_u32(&mut out[4..8], self.flags);
        S::write(&mut out[8..], self.total_size as u64);
        S::write(&mut out[8 + w..], self.boundary_1 as u64);
        S::write(&mut out[8 + 2 * w..], self.boundary_2 as u64);
        out[8 + 3 * w..S::HEAD_SIZE].fill(0);
    }
}

fn magic(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&MAGIC[..]).parse(input)
}

fn flags_word(input: &[u8]) -> IResult<&[u8], u32> {
    le_u32(input)
}

fn parse_header<S: SizeType>(input: &[u8]) -> IResult<&[u8], Header> {
    let padding = S::HEAD_SIZE - (8 + 3 * S::WIDTH);
    let (input, (magic_bytes, flags, total_size, boundary_1, boundary_2, _)) = (
        magic,
        flags_word,
        S::parse,
        S::parse,
        S::parse,
        take::<usize, &[u8], nom::error::Error<&[u8]>>(padding),
    )
        .parse(input)?;

    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(magic_bytes);

    Ok((
        input,
        Header {
            magic: bytes,
            flags,
            total_size: to_usize(total_size),
            boundary_1: to_usize(boundary_1),
            boundary_2: to_usize(boundary_2),
        },
    ))
}
