//! The raw sector-addressable disk: a backing image file opened for
//! sequential and random read.

use std::cell::RefCell;
use std::fs::File as StdFile;
use std::io::{Read, Seek, SeekFrom as StdSeekFrom};
use std::path::Path;

use log::error;

use crate::error::{Error, ErrorKind, Result};
use crate::SECTOR_SIZE;

/// A byte-addressable handle to a disk image file, read in fixed 512-byte
/// sectors.
///
/// `Disk` only ever opens its backing file for reading: this crate has no
/// write path (see spec.md §1's Non-goals). The file position is mutated by
/// every [`Disk::read`] call, so sharing one `Disk` across concurrently
/// running readers requires external locking, same as the reference
/// implementation's single `FILE*`.
pub struct Disk {
    file: RefCell<StdFile>,
    sector_count: u32,
}

impl Disk {
    /// Opens `path` for sector reads.
    ///
    /// Sector count is derived directly from the file's byte length divided
    /// by 512, rounding down — not, as the reference implementation does, by
    /// reading the file one byte at a time and dividing as floating point
    /// (see spec.md §9).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "path is empty"));
        }

        let file = StdFile::open(path).map_err(|e| {
            error!("failed to open disk image {}: {e}", path.display());
            Error::new(ErrorKind::NotFound, format!("{}: {e}", path.display()))
        })?;

        let len = file
            .metadata()
            .map_err(|e| Error::new(ErrorKind::NotFound, e.to_string()))?
            .len();
        let sector_count = u32::try_from(len / SECTOR_SIZE as u64)
            .map_err(|_| Error::new(ErrorKind::OutOfMemory, "disk image too large to address"))?;

        Ok(Self {
            file: RefCell::new(file),
            sector_count,
        })
    }

    /// Number of 512-byte sectors in the backing image.
    pub fn sector_count(&self) -> u32 {
        self.sector_count
    }

    /// Reads `sectors_to_read` sectors starting at `first_sector` into
    /// `buffer`, returning the number of sectors read.
    ///
    /// `buffer` must be at least `sectors_to_read * 512` bytes. The upper
    /// bound on `first_sector` is inclusive of `sector_count` only to permit
    /// a zero-length read at the one-past-end sector to succeed as a
    /// degenerate case; any positive-length read crossing the end of the
    /// disk fails (see spec.md §9 — the reference implementation's looser
    /// check is not reproduced).
    pub fn read(&self, first_sector: u32, buffer: &mut [u8], sectors_to_read: u32) -> Result<u32> {
        if first_sector > self.sector_count {
            return Err(Error::new(
                ErrorKind::OutOfRange,
                format!(
                    "first_sector {first_sector} is past the end of a {}-sector disk",
                    self.sector_count
                ),
            ));
        }
        let end = first_sector as u64 + sectors_to_read as u64;
        if end > self.sector_count as u64 {
            return Err(Error::new(
                ErrorKind::OutOfRange,
                format!(
                    "read of {sectors_to_read} sectors from {first_sector} crosses the end of a {}-sector disk",
                    self.sector_count
                ),
            ));
        }
        if sectors_to_read == 0 {
            return Ok(0);
        }

        let byte_len = sectors_to_read as usize * SECTOR_SIZE;
        let buffer = buffer
            .get_mut(..byte_len)
            .ok_or_else(|| Error::new(ErrorKind::InvalidArgument, "buffer shorter than requested read"))?;

        let mut file = self.file.borrow_mut();
        file.seek(StdSeekFrom::Start(first_sector as u64 * SECTOR_SIZE as u64))
            .map_err(|e| Error::new(ErrorKind::OutOfRange, e.to_string()))?;
        file.read_exact(buffer)
            .map_err(|e| Error::new(ErrorKind::OutOfRange, e.to_string()))?;

        Ok(sectors_to_read)
    }

    /// Releases the handle. Dropping a `Disk` has the same effect; this
    /// exists for symmetry with the boundary operation table.
    pub fn close(self) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) fn write_temp_image(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fat12-rs-test-{name}-{:?}",
            std::thread::current().id()
        ));
        let mut f = StdFile::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn sector_count_from_file_length() {
        let path = write_temp_image("sector-count", &vec![0u8; SECTOR_SIZE * 3]);
        let disk = Disk::open(&path).unwrap();
        assert_eq!(disk.sector_count(), 3);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn read_past_end_fails_but_zero_length_at_boundary_succeeds() {
        let path = write_temp_image("read-bounds", &vec![0u8; SECTOR_SIZE * 2]);
        let disk = Disk::open(&path).unwrap();

        let mut buf = [0u8; SECTOR_SIZE];
        assert!(disk.read(2, &mut buf, 0).is_ok());
        assert!(disk.read(2, &mut buf, 1).is_err());
        assert!(disk.read(3, &mut buf, 0).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn read_recovers_exact_bytes() {
        let mut image = vec![0u8; SECTOR_SIZE * 2];
        image[SECTOR_SIZE..SECTOR_SIZE + 4].copy_from_slice(b"FAT1");
        let path = write_temp_image("read-exact", &image);
        let disk = Disk::open(&path).unwrap();

        let mut buf = [0u8; SECTOR_SIZE];
        let read = disk.read(1, &mut buf, 1).unwrap();
        assert_eq!(read, 1);
        assert_eq!(&buf[0..4], b"FAT1");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn open_rejects_empty_path() {
        assert_eq!(Disk::open("").unwrap_err().kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn open_rejects_missing_file() {
        crate::init_test_logger();
        assert_eq!(
            Disk::open("/nonexistent/path/to/fat12.img").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
