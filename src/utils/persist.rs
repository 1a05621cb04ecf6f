//! Saving and loading images.
//!
//! An image is written as exactly its `total_size` bytes; there is no
//! framing around it. Loading reads at most the buffer's capacity, so a
//! stream may be shorter than the buffer but never needs to match it.

use crate::backend::master::Master;
use crate::backend::width::SizeType;
use crate::error::{EatError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// What [`Master::load`] did with the bytes it read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stream held a valid image, now adopted.
    Loaded,
    /// The stream did not hold a valid image. The master now holds an empty
    /// image spanning its whole buffer.
    Repaired {
        /// Why the stream was rejected.
        reason: &'static str,
    },
}

impl LoadOutcome {
    /// True if the stream was rejected and the image reset.
    pub fn is_repaired(&self) -> bool {
        matches!(self, LoadOutcome::Repaired { .. })
    }
}

impl<S: SizeType, B: AsRef<[u8]>> Master<S, B> {
    /// Writes the image to `writer`.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.image())?;
        writer.flush()?;
        debug!(bytes = self.total_size(), "saved image");
        Ok(())
    }

    /// Writes the image to a file, removing the file again if writing fails.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let written = File::create(path)
            .map_err(EatError::from)
            .and_then(|file| self.save(BufWriter::new(file)));
        if written.is_err() {
            let _ = fs::remove_file(path);
        }
        written
    }
}

impl<S: SizeType, B: AsRef<[u8]> + AsMut<[u8]>> Master<S, B> {
    /// Replaces the image with one read from `reader`.
    ///
    /// A valid image is adopted and grown to fill the buffer. Anything else
    /// leaves a fresh empty image and reports [`LoadOutcome::Repaired`]. If
    /// reading fails the current image is kept and the error is returned.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<LoadOutcome> {
        let capacity = self.buffer_len();
        let mut staged = Vec::with_capacity(capacity);
        reader.take(capacity as u64).read_to_end(&mut staged)?;

        match Master::<S, _>::open(staged.as_slice()) {
            Ok(loaded) => {
                let total = loaded.total_size();
                self.buf.as_mut()[..total].copy_from_slice(loaded.image());
                self.header = *loaded.header();
                let target = if S::fits(capacity) {
                    capacity
                } else {
                    S::MAX as usize
                };
                self.resize(target)?;
                debug!(bytes = total, capacity, "loaded image");
                Ok(LoadOutcome::Loaded)
            }
            Err(err) => {
                let reason = match err {
                    EatError::InvalidImage { reason } => reason,
                    _ => "unreadable image",
                };
                warn!(reason, bytes = staged.len(), "discarding invalid image");
                self.reinitialize()?;
                Ok(LoadOutcome::Repaired { reason })
            }
        }
    }

    /// Replaces the image with the contents of a file.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadOutcome> {
        let file = File::open(path)?;
        self.load(file)
    }
}

impl<S: SizeType> Master<S, Vec<u8>> {
    /// Reads an image into a new owned buffer of `capacity` bytes.
    pub fn from_reader<R: Read>(reader: R, capacity: usize) -> Result<(Self, LoadOutcome)> {
        let mut master = Self::with_capacity(capacity)?;
        let outcome = master.load(reader)?;
        Ok((master, outcome))
    }

    /// Reads an image file into a new owned buffer of `capacity` bytes.
    pub fn from_file<P: AsRef<Path>>(path: P, capacity: usize) -> Result<(Self, LoadOutcome)> {
        let file = File::open(path)?;
        Self::from_reader(file, capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::header::{Classification, Header};
    use std::io::{self, Cursor};
    use tempfile::tempdir;

    fn sample() -> Master<u32> {
        let mut heap = Master::<u32>::with_capacity(256).unwrap();
        heap.duplicate_str("ABC").unwrap();
        let b = heap.duplicate(b"freed").unwrap();
        heap.duplicate(&[9; 16]).unwrap();
        heap.free(b).unwrap();
        heap
    }

    fn live(m: &Master<u32>) -> Vec<(u64, Vec<u8>)> {
        m.blocks().map(|(h, b)| (h.offset(), b.to_vec())).collect()
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_save_writes_total_size_bytes() {
        let heap = sample();
        let mut out = Vec::new();
        heap.save(&mut out).unwrap();
        assert_eq!(out.len(), heap.total_size());
        assert_eq!(out, heap.image());
    }

    #[test]
    fn test_save_then_load_same_capacity() {
        let heap = sample();
        let mut bytes = Vec::new();
        heap.save(&mut bytes).unwrap();

        let mut target = Master::<u32>::with_capacity(256).unwrap();
        let outcome = target.load(Cursor::new(bytes)).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(target.image(), heap.image());
    }

    #[test]
    fn test_load_into_larger_buffer() {
        let heap = sample();
        let mut bytes = Vec::new();
        heap.save(&mut bytes).unwrap();

        let (target, outcome) = Master::<u32>::from_reader(Cursor::new(bytes), 1024).unwrap();
        assert!(!outcome.is_repaired());
        assert_eq!(target.total_size(), 1024);
        assert_eq!(live(&target), live(&heap));
        assert_eq!(target.num_entries(), heap.num_entries());
        assert!(target.check().is_ok());
    }

    #[test]
    fn test_load_garbage_repairs() {
        let mut target = sample();
        let outcome = target.load(Cursor::new(vec![0xEE; 64])).unwrap();
        assert_eq!(outcome, LoadOutcome::Repaired { reason: "bad magic" });
        assert!(target.is_empty());
        assert_eq!(target.total_size(), 256);
        assert!(target.check().is_ok());
    }

    #[test]
    fn test_load_truncated_or_tagged_invalid() {
        let heap = sample();
        let mut target = Master::<u32>::with_capacity(256).unwrap();

        let outcome = target.load(Cursor::new(&heap.image()[..10])).unwrap();
        assert!(outcome.is_repaired());

        // Image is cut off before its table
        let outcome = target.load(Cursor::new(&heap.image()[..200])).unwrap();
        assert!(outcome.is_repaired());

        let mut tagged = heap.image().to_vec();
        let mut header = Header::decode::<u32>(&tagged).unwrap();
        header.modify_flags(Classification::INVALID, Classification::empty());
        header.encode::<u32>(&mut tagged);
        let outcome = target.load(Cursor::new(tagged)).unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Repaired {
                reason: "image is tagged invalid"
            }
        );
        assert!(target.is_empty());
    }

    #[test]
    fn test_oversized_buffer_is_clamped_to_offset_width() {
        let mut small = Master::<u16>::with_capacity(300).unwrap();
        let abc = small.duplicate(b"abc").unwrap();
        let mut bytes = Vec::new();
        small.save(&mut bytes).unwrap();

        let mut target = Master::<u16>::init_with_size(vec![0u8; 70_000], 1000).unwrap();
        let outcome = target.load(Cursor::new(bytes)).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(target.total_size(), 65_535);
        assert_eq!(target.buffer_len(), 70_000);
        assert_eq!(target.get(abc).unwrap(), b"abc");
        assert!(target.check().is_ok());

        let outcome = target.load(Cursor::new(vec![0x42; 32])).unwrap();
        assert_eq!(outcome, LoadOutcome::Repaired { reason: "bad magic" });
        assert_eq!(target.total_size(), 65_535);
        assert!(target.is_empty());
        assert!(target.check().is_ok());
    }

    #[test]
    fn test_load_io_error_keeps_image() {
        let mut target = sample();
        let before = target.image().to_vec();
        assert!(matches!(target.load(FailingReader), Err(EatError::Io(_))));
        assert_eq!(target.image(), &before[..]);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heap.eat");

        let heap = sample();
        heap.save_to_file(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), 256);

        let (restored, outcome) = Master::<u32>::from_file(&path, 512).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(live(&restored), live(&heap));

        let mut again = Master::<u32>::with_capacity(256).unwrap();
        again.load_from_file(&path).unwrap();
        assert_eq!(again.image(), heap.image());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Master::<u32>::from_file(dir.path().join("absent.eat"), 128);
        assert!(matches!(result, Err(EatError::Io(_))));
    }

    #[test]
    fn test_save_to_unwritable_path_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("heap.eat");
        assert!(sample().save_to_file(&path).is_err());
        assert!(!path.exists());
    }
}
