use crate::{FileEntry, FileMetadata, VfsError};
use std::io::Read;
use std::path::Path;

/// Virtual File System trait for abstracting filesystem operations
///
/// Every path handed to a `Vfs` is relative to the root it was created for;
/// the empty path names the root itself. The comparison engine reads each
/// root through one of these, which keeps the indexer and comparator free of
/// direct `std::fs` calls.
pub trait Vfs: Send + Sync {
    /// Uniquely identifies the VFS instance (e.g., "local:/home/me/src")
    fn instance_id(&self) -> &str;

    /// Returns the metadata for a specific path
    fn metadata(&self, path: &Path) -> Result<FileMetadata, VfsError>;

    /// Lists the contents of a directory
    fn read_dir(&self, path: &Path) -> Result<Vec<FileEntry>, VfsError>;

    /// Opens a file for reading (returns a Read trait object)
    fn open_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, VfsError>;

    /// Checks if a path exists
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}
