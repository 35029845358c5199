//! Whole-file byte comparison and content hashing.
//!
//! Both helpers treat a file that vanished since indexing as empty, so an
//! interactive session keeps working after files are deleted underneath it.
//! Any other read failure counts as a difference.

use dirdiff_common::{Blake3Hash, Vfs, VfsError};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

const HASH_BUFFER_SIZE: usize = 128 * 1024;

/// Read the whole file into memory; a missing file yields no bytes
pub fn read_contents(vfs: &dyn Vfs, path: &Path) -> Result<Vec<u8>, VfsError> {
    let mut reader = match vfs.open_file(path) {
        Ok(reader) => reader,
        Err(e) if e.is_not_found() => {
            debug!("{} vanished from {}, treating as empty", path.display(), vfs.instance_id());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| VfsError::from_io(e, path))?;
    Ok(buffer)
}

/// Compare the bytes of `path` in every root, stopping at the first copy
/// that disagrees with the first root's
///
/// A copy that cannot be read never compares equal.
pub fn contents_equal(roots: &[&dyn Vfs], path: &Path) -> bool {
    let Some((first, rest)) = roots.split_first() else {
        return true;
    };

    let read = |vfs: &dyn Vfs| {
        read_contents(vfs, path)
            .map_err(|e| warn!("Cannot read {} in {}: {}", path.display(), vfs.instance_id(), e))
            .ok()
    };

    let Some(reference) = read(*first) else {
        return false;
    };
    for vfs in rest {
        match read(*vfs) {
            Some(contents) if contents == reference => {}
            _ => return false,
        }
    }
    true
}

/// BLAKE3 digest over the concatenated contents of `paths`
///
/// A path that no longer exists contributes no bytes.
pub fn hash_files<I, P>(paths: I) -> io::Result<Blake3Hash>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    for path in paths {
        let path = path.as_ref();
        let mut file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} vanished before hashing", path.display());
                continue;
            }
            Err(e) => return Err(e),
        };

        loop {
            let n = file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(hasher.finalize().into())
}
