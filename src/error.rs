//! The error channel shared by every public operation.
//!
//! Replaces the reference implementation's process-wide `errno` with a
//! per-operation [`Result`] carrying an [`ErrorKind`], per the re-architecture
//! guidance in the design notes: each constructor either returns a fully
//! initialized value or an [`Error`] describing exactly what failed.

use std::fmt;

/// The taxonomy of failures a FAT12 accessor operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Null/empty required input, or an unsupported `whence` value.
    InvalidArgument,
    /// A path, file name, or directory entry does not exist.
    NotFound,
    /// A name matched a directory entry, but that entry is a directory.
    IsADirectory,
    /// Boot sector signature wrong, FAT mirrors disagree, a cluster index is
    /// out of range, or a chain is truncated.
    InvalidData,
    /// An allocation failed.
    OutOfMemory,
    /// A sector index lies outside the disk, or a read would cross its end.
    OutOfRange,
}

/// An error from a FAT12 accessor operation: an [`ErrorKind`] plus a message
/// naming the specific invariant that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The abstract kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
