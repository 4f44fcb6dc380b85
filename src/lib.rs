//! Read-only accessor for a FAT12-formatted disk image stored as a regular
//! file.
//!
//! Four layers, composed bottom-up:
//!
//! - [`disk::Disk`] opens the backing image and serves fixed-size 512-byte
//!   sector reads.
//! - [`volume::Volume`] mounts a FAT12 filesystem on a [`disk::Disk`]: it
//!   parses and validates the boot sector, loads both FAT copies and checks
//!   they agree, and loads the root directory.
//! - [`fat::ClusterChain`] is a pure decoder that turns a FAT byte buffer and
//!   a starting cluster into the ordered list of clusters making up a file.
//! - [`file::File`] and [`dir::Dir`] are stateful cursors over a mounted
//!   [`volume::Volume`]: seek/read for regular files, enumeration for the
//!   root directory.
//!
//! Write support, VFAT long file names, nested directories, and the FAT16/32
//! variants are deliberately not implemented; see spec.md/SPEC_FULL.md in the
//! crate's source tree for the full rationale.

pub mod dir;
pub mod disk;
pub mod entry;
pub mod error;
pub mod fat;
pub mod file;
pub mod volume;

pub(crate) mod bpb;

pub use dir::{Dir, DirEntry};
pub use disk::Disk;
pub use entry::ShortEntry;
pub use error::{Error, ErrorKind, Result};
pub use fat::ClusterChain;
pub use file::{File, SeekFrom};
pub use volume::Volume;

/// Bytes per sector. FAT12 images in scope here are always 512-byte sectored;
/// [`bpb::BootSector`] still records the on-disk field and validates it, this
/// constant is just the size most callers construct buffers with.
pub const SECTOR_SIZE: usize = 512;

/// Size in bytes of a packed short (8.3) directory entry.
pub const DIR_ENTRY_SIZE: usize = 32;

pub const ATTR_READ_ONLY: u8 = 0x01;
pub const ATTR_HIDDEN: u8 = 0x02;
pub const ATTR_SYSTEM: u8 = 0x04;
pub const ATTR_VOLUME_ID: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;
pub const ATTR_ARCHIVE: u8 = 0x20;

/// First byte of a directory entry's name field when the slot has never been
/// used, and all entries after it are also unused.
pub const DIR_ENTRY_LAST_AND_UNUSED: u8 = 0x00;
/// First byte of a directory entry's name field when the slot held a deleted
/// entry.
pub const DIR_ENTRY_UNUSED: u8 = 0xE5;

pub(crate) fn read_le_u16(input: &[u8]) -> u16 {
    u16::from_le_bytes(input[..2].try_into().unwrap())
}

pub(crate) fn read_le_u32(input: &[u8]) -> u32 {
    u32::from_le_bytes(input[..4].try_into().unwrap())
}

/// Installs a test-scoped logger so `log::error!`/`log::warn!` diagnostics
/// from the validation/mount/chain-decode failure paths are visible with
/// `RUST_LOG=debug cargo test -- --nocapture`. Idempotent across the whole
/// test binary, per `env_logger::Builder::is_test`'s own guarantee.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn le_readers_roundtrip_native_values() {
        let bytes = 0x1234u16.to_le_bytes();
        assert_eq!(read_le_u16(&bytes), 0x1234);

        let bytes = 0xDEAD_BEEFu32.to_le_bytes();
        assert_eq!(read_le_u32(&bytes), 0xDEAD_BEEF);
    }
}
