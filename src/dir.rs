//! Root directory enumeration.
//!
//! FAT12 as scoped here has exactly one directory: the fixed-size root
//! directory table loaded at mount time. There is no nested-directory
//! traversal (spec.md §1's Non-goals) — [`Dir::open`] only ever resolves the
//! root itself.

use crate::entry::ShortEntry;
use crate::error::{Error, ErrorKind, Result};
use crate::volume::Volume;

/// One entry as handed back by [`Dir::read`]: a displayable name and the
/// subset of on-disk attributes and sizing a caller can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_read_only: bool,
    pub is_hidden: bool,
    pub is_system: bool,
    pub is_directory: bool,
    pub is_archive: bool,
    /// The entry's file size in bytes. Always `0` for directory entries.
    ///
    /// The reference implementation reports the *count of entries in the
    /// directory* here, for every entry, file or not — apparently a copy-paste
    /// artifact rather than an intentional convention. This reports the
    /// entry's own byte size instead (spec.md §9).
    pub size: u32,
}

impl DirEntry {
    fn from_short_entry(entry: &ShortEntry) -> Self {
        Self {
            name: entry.display_name(),
            is_read_only: entry.is_read_only(),
            is_hidden: entry.is_hidden(),
            is_system: entry.is_system(),
            is_directory: entry.is_directory(),
            is_archive: entry.is_archive(),
            size: entry.file_size,
        }
    }
}

/// A cursor over a mounted volume's root directory.
pub struct Dir<'v, 'd> {
    volume: &'v Volume<'d>,
    cursor: usize,
}

impl<'v, 'd> Dir<'v, 'd> {
    /// Opens a directory by path. Only `"\"`, the DOS-style root path the
    /// reference implementation checks for (`original_source/disk.c`'s
    /// `dir_open`), resolves — anything else names a path this crate cannot
    /// traverse and fails with [`ErrorKind::NotFound`].
    pub fn open(volume: &'v Volume<'d>, path: &str) -> Result<Self> {
        if path == "\\" {
            Ok(Self { volume, cursor: 0 })
        } else {
            Err(Error::new(ErrorKind::NotFound, format!("{path}: no such directory")))
        }
    }

    /// Returns the next present entry, or `None` once the end of the root
    /// directory table is reached. Deleted slots (`0xE5`) are skipped
    /// silently; the first never-used slot (`0x00`) ends iteration.
    pub fn read(&mut self) -> Result<Option<DirEntry>> {
        let entries = self.volume.root_dir();
        while self.cursor < entries.len() {
            let entry = &entries[self.cursor];
            self.cursor += 1;

            if entry.is_end_marker() {
                return Ok(None);
            }
            if entry.is_present() {
                return Ok(Some(DirEntry::from_short_entry(entry)));
            }
        }
        Ok(None)
    }

    /// Rewinds the cursor to the first entry.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Releases the handle. Dropping a `Dir` has the same effect; this exists
    /// for symmetry with the boundary operation table.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpb::tests::floppy_boot_sector;
    use crate::disk::tests::write_temp_image;
    use crate::disk::Disk;
    use crate::volume::Volume;
    use crate::SECTOR_SIZE;

    fn image_with_entries() -> Vec<u8> {
        let boot = floppy_boot_sector();
        let mut image = vec![0u8; SECTOR_SIZE * 2880];
        image[0..SECTOR_SIZE].copy_from_slice(&boot);

        let root_dir_start = SECTOR_SIZE * 19;

        // entry 0: a deleted slot, must be skipped
        image[root_dir_start] = 0xE5;

        // entry 1: "A.TXT", archive, size 10
        let e1 = root_dir_start + 32;
        image[e1..e1 + 11].copy_from_slice(b"A       TXT");
        image[e1 + 11] = 0x20;
        image[e1 + 28..e1 + 32].copy_from_slice(&10u32.to_le_bytes());

        // entry 2: "SUBDIR", directory attribute, size 0
        let e2 = root_dir_start + 64;
        image[e2..e2 + 11].copy_from_slice(b"SUBDIR     ");
        image[e2 + 11] = 0x10;

        // entry 3: end marker (already zeroed)
        image
    }

    #[test]
    fn enumerates_present_entries_skipping_deleted() {
        let image = image_with_entries();
        let path = write_temp_image("dir-enumerate", &image);
        let disk = Disk::open(&path).unwrap();
        let volume = Volume::mount(&disk, 0).unwrap();
        let mut dir = Dir::open(&volume, "\\").unwrap();

        let first = dir.read().unwrap().unwrap();
        assert_eq!(first.name, "A.TXT");
        assert_eq!(first.size, 10);
        assert!(first.is_archive);
        assert!(!first.is_directory);

        let second = dir.read().unwrap().unwrap();
        assert_eq!(second.name, "SUBDIR");
        assert!(second.is_directory);
        assert_eq!(second.size, 0);

        assert_eq!(dir.read().unwrap(), None);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn only_root_path_resolves() {
        let image = image_with_entries();
        let path = write_temp_image("dir-only-root", &image);
        let disk = Disk::open(&path).unwrap();
        let volume = Volume::mount(&disk, 0).unwrap();

        assert!(Dir::open(&volume, "\\").is_ok());
        assert_eq!(
            Dir::open(&volume, "\\SUBDIR").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        std::fs::remove_file(path).ok();
    }
}
