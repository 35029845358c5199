use crate::tree::{child_path, TreeNode};
use dirdiff_common::Vfs;
use std::path::Path;
use tracing::{debug, warn};

/// Counters reported after indexing one root
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub directories: usize,
    pub files: usize,
    pub pruned: usize,
}

/// Walks roots top-down and records, per relative path, which roots have it
///
/// All roots are indexed into the same tree, one after the other, so a
/// path seen in several roots resolves to a single node.
pub struct PathIndexer<'a> {
    should_include: &'a dyn Fn(&str) -> bool,
}

impl<'a> PathIndexer<'a> {
    pub fn new(should_include: &'a dyn Fn(&str) -> bool) -> Self {
        Self { should_include }
    }

    /// Index the root behind `vfs` as root number `root_index`
    pub fn index_root(&self, tree: &mut TreeNode, vfs: &dyn Vfs, root_index: usize) -> IndexStats {
        let mut stats = IndexStats::default();
        tree.exists_in.insert(root_index);
        self.index_dir(tree, vfs, "", root_index, &mut stats);
        debug!(
            "Indexed {}: {} directories, {} files, {} pruned",
            vfs.instance_id(),
            stats.directories,
            stats.files,
            stats.pruned
        );
        stats
    }

    fn index_dir(
        &self,
        node: &mut TreeNode,
        vfs: &dyn Vfs,
        relative: &str,
        root_index: usize,
        stats: &mut IndexStats,
    ) {
        let entries = match vfs.read_dir(Path::new(relative)) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Skipping unreadable directory '{}' in {}: {}",
                    relative,
                    vfs.instance_id(),
                    e
                );
                return;
            }
        };

        for entry in entries {
            let Some(name) = entry.path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let entry_path = child_path(relative, &name);

            if !(self.should_include)(&entry_path) {
                if entry.is_dir {
                    debug!("Pruned directory {}", entry_path);
                    stats.pruned += 1;
                }
                continue;
            }

            if entry.is_dir {
                let child = node.subdir_entry(&name);
                child.exists_in.insert(root_index);
                stats.directories += 1;
                self.index_dir(child, vfs, &entry_path, root_index, stats);
            } else {
                node.file_entry(&name).exists_in.insert(root_index);
                stats.files += 1;
            }
        }
    }
}
