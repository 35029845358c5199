use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Represents a file or directory entry, with `path` relative to the VFS root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Metadata for a file or directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size: u64,
    pub is_dir: bool,
}

/// One of the directory trees taking part in a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Display name, embedded in difference tags and action labels
    pub name: String,
    /// Base directory; action paths are `base + '/' + relative_path`
    pub base: PathBuf,
}

impl Root {
    pub fn new(name: impl Into<String>, base: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
        }
    }

    /// Base path as a string, the form used when building command arguments
    pub fn base_str(&self) -> String {
        self.base.to_string_lossy().into_owned()
    }
}

/// Why a node differs across roots
///
/// Ordering is by variant first, so the missing-root tags sort ahead of the
/// comparison tags when a node's differences are listed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difference {
    /// Two roots, path missing from one; carries the name of the root that has it
    OnlyIn(String),
    /// More than two roots, path missing from the named root
    MissingFrom(String),
    /// Some direct child differs
    Sub,
    /// Present everywhere, sizes disagree
    Size,
    /// Present everywhere with equal sizes, bytes disagree
    Content,
}

impl Difference {
    /// Tag string shown to the user (`only-in-<name>`, `sub`, `size`, `content`)
    pub fn tag(&self) -> String {
        self.to_string()
    }

    /// Whether the path is absent from at least one root
    pub fn is_missing(&self) -> bool {
        matches!(self, Difference::OnlyIn(_) | Difference::MissingFrom(_))
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::OnlyIn(name) => write!(f, "only-in-{}", name),
            Difference::MissingFrom(name) => write!(f, "missing-from-{}", name),
            Difference::Sub => f.write_str("sub"),
            Difference::Size => f.write_str("size"),
            Difference::Content => f.write_str("content"),
        }
    }
}

impl Serialize for Difference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Display-name rewrite applied by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathShortcut {
    pub from: String,
    pub to: String,
}

/// External programs offered as actions on differing files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_diff_tool")]
    pub diff: String,
    #[serde(default = "default_merge_tool")]
    pub merge: String,
}

fn default_diff_tool() -> String {
    "diff".to_string()
}

fn default_merge_tool() -> String {
    "meld".to_string()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            diff: default_diff_tool(),
            merge: default_merge_tool(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Ignore patterns (e.g., "*.o", "node_modules/")
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Relative paths the user chose to ignore
    #[serde(default)]
    pub ignored_paths: Vec<String>,

    /// Display-name rewrites, applied until nothing changes
    #[serde(default)]
    pub path_shortcuts: Vec<PathShortcut>,

    /// Whether to walk into symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Whether .gitignore files inside the roots filter the comparison
    #[serde(default)]
    pub use_gitignore: bool,

    /// Programs used for the Diff and Merge actions
    #[serde(default)]
    pub tools: ToolConfig,
}

/// BLAKE3 hash value (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake3Hash(pub [u8; 32]);

impl Blake3Hash {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<blake3::Hash> for Blake3Hash {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}
