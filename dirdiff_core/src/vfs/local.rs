use dirdiff_common::{FileEntry, FileMetadata, Vfs, VfsError};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Local filesystem VFS implementation
pub struct LocalVfs {
    instance_id: String,
    root: PathBuf,
    follow_symlinks: bool,
}

impl LocalVfs {
    pub fn new(root: PathBuf) -> Self {
        let instance_id = format!("local:{}", root.display());
        Self {
            instance_id,
            root,
            follow_symlinks: false,
        }
    }

    /// Walk into symlinked directories instead of skipping them
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the metadata used for a listed entry, or `None` to leave it out
    fn entry_metadata(&self, entry: &fs::DirEntry) -> Option<fs::Metadata> {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                return None;
            }
        };

        if !file_type.is_symlink() {
            return match entry.metadata() {
                Ok(meta) => Some(meta),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            };
        }

        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() && !self.follow_symlinks => {
                debug!("Not following symlinked directory {}", path.display());
                None
            }
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!("Skipping dangling symlink {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl Vfs for LocalVfs {
    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, VfsError> {
        let full_path = self.root.join(path);
        let meta = fs::metadata(&full_path).map_err(|e| VfsError::from_io(e, &full_path))?;
        Ok(FileMetadata {
            size: meta.len(),
            is_dir: meta.is_dir(),
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<FileEntry>, VfsError> {
        let full_path = self.root.join(path);

        if !full_path.is_dir() {
            return Err(VfsError::NotADirectory(full_path.display().to_string()));
        }

        let listing = fs::read_dir(&full_path).map_err(|e| VfsError::from_io(e, &full_path))?;

        let mut entries = Vec::new();
        for entry in listing {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", full_path.display(), e);
                    continue;
                }
            };
            let Some(meta) = self.entry_metadata(&entry) else {
                continue;
            };

            entries.push(FileEntry {
                path: path.join(entry.file_name()),
                is_dir: meta.is_dir(),
            });
        }

        Ok(entries)
    }

    fn open_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, VfsError> {
        let full_path = self.root.join(path);

        if full_path.is_dir() {
            return Err(VfsError::NotAFile(full_path.display().to_string()));
        }

        let file = fs::File::open(&full_path).map_err(|e| VfsError::from_io(e, &full_path))?;
        Ok(Box::new(file))
    }
}
