pub mod action;
pub mod comparison;
pub mod content;
pub mod filter;
pub mod index;
pub mod tree;
pub mod vfs;

pub use action::{path_per_root, Action, ActionTools, IgnoreSink, Invocation};
pub use comparison::{compare, ComparisonEngine};
pub use content::{contents_equal, hash_files, read_contents};
pub use filter::PathFilter;
pub use index::{IndexStats, PathIndexer};
pub use tree::{NodeKind, TreeNode, TreeSummary, ROOT_PATH};
pub use vfs::LocalVfs;
