//! Merged logical tree of every path observed in any root.

use crate::action::Action;
use dirdiff_common::Difference;
use std::collections::{BTreeMap, BTreeSet};

/// Relative path of the comparison root itself
pub const ROOT_PATH: &str = ".";

/// Directory or file payload of a [`TreeNode`]
#[derive(Debug, Clone)]
pub enum NodeKind {
    Directory {
        subdirs: BTreeMap<String, TreeNode>,
        files: BTreeMap<String, TreeNode>,
    },
    File,
}

/// A node of the merged tree, tagged with the roots that contain it
///
/// Children are owned by their parent and keyed by name, so the tree is
/// always walked in name order.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Slash-separated path from the comparison root (`.` for the root);
    /// assigned during classification
    pub path: String,
    /// Indices of the roots this path was observed in
    pub exists_in: BTreeSet<usize>,
    pub differences: BTreeSet<Difference>,
    pub actions: Vec<Action>,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn new_dir() -> Self {
        Self::with_kind(NodeKind::Directory {
            subdirs: BTreeMap::new(),
            files: BTreeMap::new(),
        })
    }

    pub fn new_file() -> Self {
        Self::with_kind(NodeKind::File)
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            path: String::new(),
            exists_in: BTreeSet::new(),
            differences: BTreeSet::new(),
            actions: Vec::new(),
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// True when any difference tag was recorded for this node
    pub fn differs(&self) -> bool {
        !self.differences.is_empty()
    }

    /// True when the node differs for a reason other than its descendants
    pub fn differs_itself(&self) -> bool {
        self.differences.iter().any(|d| *d != Difference::Sub)
    }

    /// Difference tags as strings, in tag order
    pub fn tags(&self) -> Vec<String> {
        self.differences.iter().map(Difference::tag).collect()
    }

    /// Get-or-create the sub-directory `name`; panics on a file node
    pub(crate) fn subdir_entry(&mut self, name: &str) -> &mut TreeNode {
        match &mut self.kind {
            NodeKind::Directory { subdirs, .. } => subdirs
                .entry(name.to_string())
                .or_insert_with(TreeNode::new_dir),
            NodeKind::File => unreachable!("files have no children"),
        }
    }

    /// Get-or-create the file `name`; panics on a file node
    pub(crate) fn file_entry(&mut self, name: &str) -> &mut TreeNode {
        match &mut self.kind {
            NodeKind::Directory { files, .. } => files
                .entry(name.to_string())
                .or_insert_with(TreeNode::new_file),
            NodeKind::File => unreachable!("files have no children"),
        }
    }

    /// Direct children: sub-directories first, then files, each in name order
    pub fn children(&self) -> Box<dyn Iterator<Item = (&String, &TreeNode)> + '_> {
        match &self.kind {
            NodeKind::Directory { subdirs, files } => Box::new(subdirs.iter().chain(files.iter())),
            NodeKind::File => Box::new(std::iter::empty()),
        }
    }

    /// Look up a node by relative path (`.` or empty for this node)
    ///
    /// When a name is a directory in one root and a file in another, the
    /// directory node is returned.
    pub fn find(&self, relative_path: &str) -> Option<&TreeNode> {
        let trimmed = relative_path.trim_start_matches("./").trim_matches('/');
        if trimmed.is_empty() || trimmed == ROOT_PATH {
            return Some(self);
        }

        let mut node = self;
        for part in trimmed.split('/').filter(|p| !p.is_empty()) {
            let NodeKind::Directory { subdirs, files } = &node.kind else {
                return None;
            };
            node = subdirs.get(part).or_else(|| files.get(part))?;
        }
        Some(node)
    }

    /// Every node in pre-order, children in name order
    pub fn walk(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children: Vec<_> = node.children().map(|(_, child)| child).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Counts of differing nodes by kind of difference
    pub fn summary(&self) -> TreeSummary {
        let mut summary = TreeSummary::default();
        for node in self.walk() {
            summary.total += 1;
            if !node.differs() {
                summary.identical += 1;
                continue;
            }
            if node.differences.iter().any(Difference::is_missing) {
                summary.missing += 1;
            }
            if node.differences.contains(&Difference::Size) {
                summary.size += 1;
            }
            if node.differences.contains(&Difference::Content) {
                summary.content += 1;
            }
        }
        summary
    }
}

/// Tallies produced by [`TreeNode::summary`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TreeSummary {
    pub total: usize,
    pub identical: usize,
    pub missing: usize,
    pub size: usize,
    pub content: usize,
}

/// Join a child name onto its parent's relative path
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == ROOT_PATH {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
