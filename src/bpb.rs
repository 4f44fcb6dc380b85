//! The FAT12 boot sector (BIOS Parameter Block).
//!
//! The first sector of the volume — the "boot sector", "reserved sector", or
//! "0th sector" — carries the BPB. Decoded here from a borrowed 512-byte
//! window rather than overlaid with `#[repr(packed)]`: packed structs hide
//! unaligned-access hazards behind ordinary field syntax, so every
//! multi-byte field is read out explicitly as little-endian instead (see
//! SPEC_FULL.md §3).

use log::error;

use crate::error::{Error, ErrorKind, Result};
use crate::{read_le_u16, read_le_u32};

/// Extended boot signature values that mark the volume serial/label/fs-type
/// fields as present.
const EXTENDED_BOOT_SIGNATURE_VALUES: [u8; 2] = [0x28, 0x29];

/// FAT12/16 boot sector, decoded in full. Field names follow the Microsoft
/// FAT spec's `BPB_*`/`BS_*` naming, same convention the teacher crate uses
/// for its FAT32 BPB.
#[derive(Debug, Clone, Copy)]
pub struct BootSector {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sector_count: u16,
    pub number_of_fats: u8,
    pub max_root_entries: u16,
    pub total_sectors_16: u16,
    pub media_type: u8,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub heads: u16,
    pub hidden_sectors: u32,
    pub total_sectors_32: u32,
    pub drive_number: u8,
    pub extended_boot_signature: u8,
    pub volume_serial: u32,
    pub volume_label: [u8; 11],
    pub fs_type: [u8; 8],
    pub signature: u16,
}

impl BootSector {
    /// Parses and validates a 512-byte boot sector.
    ///
    /// Fails with [`ErrorKind::InvalidData`] unless `signature == 0xAA55`,
    /// `extended_boot_signature` is `0x28` or `0x29`, and `number_of_fats` is
    /// `1` or `2` (spec.md §3).
    pub fn parse(sector: &[u8]) -> Result<Self> {
        if sector.len() < 512 {
            return Err(Error::new(ErrorKind::InvalidData, "boot sector shorter than 512 bytes"));
        }

        let bpb = Self {
            bytes_per_sector: read_le_u16(&sector[11..13]),
            sectors_per_cluster: sector[13],
            reserved_sector_count: read_le_u16(&sector[14..16]),
            number_of_fats: sector[16],
            max_root_entries: read_le_u16(&sector[17..19]),
            total_sectors_16: read_le_u16(&sector[19..21]),
            media_type: sector[21],
            sectors_per_fat: read_le_u16(&sector[22..24]),
            sectors_per_track: read_le_u16(&sector[24..26]),
            heads: read_le_u16(&sector[26..28]),
            hidden_sectors: read_le_u32(&sector[28..32]),
            total_sectors_32: read_le_u32(&sector[32..36]),
            drive_number: sector[36],
            extended_boot_signature: sector[38],
            volume_serial: read_le_u32(&sector[39..43]),
            volume_label: sector[43..54].try_into().unwrap(),
            fs_type: sector[54..62].try_into().unwrap(),
            signature: read_le_u16(&sector[510..512]),
        };

        bpb.validate()?;
        Ok(bpb)
    }

    fn validate(&self) -> Result<()> {
        if self.signature != 0xAA55 {
            error!("boot sector signature {:#06x} is not 0xAA55", self.signature);
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("bad boot sector signature {:#06x}", self.signature),
            ));
        }
        if !EXTENDED_BOOT_SIGNATURE_VALUES.contains(&self.extended_boot_signature) {
            error!(
                "extended boot signature {:#04x} is neither 0x28 nor 0x29",
                self.extended_boot_signature
            );
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("bad extended boot signature {:#04x}", self.extended_boot_signature),
            ));
        }
        if self.number_of_fats != 1 && self.number_of_fats != 2 {
            error!("number of FATs {} is neither 1 nor 2", self.number_of_fats);
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("bad number_of_fats {}", self.number_of_fats),
            ));
        }
        if self.bytes_per_sector == 0 {
            error!("bytes_per_sector is 0");
            return Err(Error::new(ErrorKind::InvalidData, "bytes_per_sector is 0"));
        }
        Ok(())
    }

    /// Number of bytes occupied by a single copy of the FAT.
    pub fn fat_bytes(&self) -> usize {
        self.bytes_per_sector as usize * self.sectors_per_fat as usize
    }

    /// Sector at which the first FAT copy begins.
    pub fn fat1_sector(&self) -> u32 {
        self.reserved_sector_count as u32
    }

    /// Sector at which the second FAT copy begins (only meaningful when
    /// `number_of_fats == 2`).
    pub fn fat2_sector(&self) -> u32 {
        self.fat1_sector() + self.sectors_per_fat as u32
    }

    /// Number of sectors occupied by the root directory table.
    pub fn root_dir_sectors(&self) -> u32 {
        let root_dir_bytes = self.max_root_entries as u32 * crate::DIR_ENTRY_SIZE as u32;
        (root_dir_bytes + self.bytes_per_sector as u32 - 1) / self.bytes_per_sector as u32
    }

    /// Sector at which the root directory table begins.
    pub fn root_dir_sector(&self) -> u32 {
        self.fat1_sector() + self.number_of_fats as u32 * self.sectors_per_fat as u32
    }

    /// Sector at which the data region (cluster 2) begins.
    pub fn first_data_sector(&self) -> u32 {
        self.root_dir_sector() + self.root_dir_sectors()
    }

    /// Bytes per cluster (`bytes_per_sector * sectors_per_cluster`).
    pub fn bytes_per_cluster(&self) -> usize {
        self.bytes_per_sector as usize * self.sectors_per_cluster as usize
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a minimal but valid 512-byte FAT12 boot sector matching the
    /// 1.44 MB floppy geometry from spec.md §8 scenario 1: 2 FATs of 9
    /// sectors, 224 root entries, 1 sector/cluster.
    pub(crate) fn floppy_boot_sector() -> [u8; 512] {
        let mut s = [0u8; 512];
        s[11..13].copy_from_slice(&512u16.to_le_bytes());
        s[13] = 1; // sectors_per_cluster
        s[14..16].copy_from_slice(&1u16.to_le_bytes()); // reserved_sector_count
        s[16] = 2; // number_of_fats
        s[17..19].copy_from_slice(&224u16.to_le_bytes()); // max_root_entries
        s[19..21].copy_from_slice(&2880u16.to_le_bytes()); // total_sectors_16
        s[21] = 0xF0;
        s[22..24].copy_from_slice(&9u16.to_le_bytes()); // sectors_per_fat
        s[38] = 0x29;
        s[510..512].copy_from_slice(&0xAA55u16.to_le_bytes());
        s
    }

    #[test]
    fn parses_floppy_geometry() {
        let sector = floppy_boot_sector();
        let bpb = BootSector::parse(&sector).unwrap();
        assert_eq!(bpb.bytes_per_sector, 512);
        assert_eq!(bpb.sectors_per_fat, 9);
        assert_eq!(bpb.max_root_entries, 224);
        // 1 (reserved) + 2*9 (FATs) + 14 (root dir: 224*32/512) = 33
        assert_eq!(bpb.root_dir_sectors(), 14);
        assert_eq!(bpb.first_data_sector(), 33);
    }

    #[test]
    fn rejects_bad_signature() {
        crate::init_test_logger();
        let mut sector = floppy_boot_sector();
        sector[510] = 0;
        assert_eq!(
            BootSector::parse(&sector).unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }

    #[test]
    fn rejects_bad_extended_boot_signature() {
        crate::init_test_logger();
        let mut sector = floppy_boot_sector();
        sector[38] = 0x00;
        assert_eq!(
            BootSector::parse(&sector).unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }

    #[test]
    fn rejects_bad_number_of_fats() {
        crate::init_test_logger();
        let mut sector = floppy_boot_sector();
        sector[16] = 3;
        assert_eq!(
            BootSector::parse(&sector).unwrap_err().kind(),
            ErrorKind::InvalidData
        );
    }
}
