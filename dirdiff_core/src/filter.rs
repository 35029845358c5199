use dirdiff_common::{AppConfig, DirDiffError};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::{Parallelism, WalkDir};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Inclusion predicate built from configured patterns, ignored paths and
/// `.gitignore` files found in the roots
///
/// The predicate is given a relative path only, never its kind, so every
/// path is matched as if it were a directory. A dir-only pattern such as
/// `build/` therefore also excludes a regular file named `build`.
#[derive(Default)]
pub struct PathFilter {
    custom_ignore: Option<Gitignore>,
    ignored_paths: HashSet<String>,
    /// Each `.gitignore` with the root-relative directory it applies to
    gitignores: Vec<(PathBuf, Gitignore)>,
}

impl PathFilter {
    pub fn new(config: &AppConfig) -> Self {
        let mut filter = Self {
            custom_ignore: Self::build_custom_ignore(&config.ignore_patterns),
            ..Self::default()
        };
        for path in &config.ignored_paths {
            filter.ignore_path(path);
        }
        filter
    }

    /// Build a Gitignore from custom ignore patterns
    fn build_custom_ignore(patterns: &[String]) -> Option<Gitignore> {
        if patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new("");
        for pattern in patterns {
            if let Err(err) = builder.add_line(None, pattern) {
                debug!("Failed to add ignore pattern '{}': {}", pattern, err);
            } else {
                debug!("Added custom ignore pattern: {}", pattern);
            }
        }

        match builder.build() {
            Ok(ignore) => {
                debug!("Built custom ignore with {} patterns", patterns.len());
                Some(ignore)
            }
            Err(e) => {
                debug!("Failed to build custom ignore: {}", e);
                None
            }
        }
    }

    /// Exclude one exact relative path (and, for a directory, its subtree)
    pub fn ignore_path(&mut self, relative_path: &str) {
        let normalized = relative_path.trim_start_matches("./").trim_matches('/');
        if !normalized.is_empty() {
            self.ignored_paths.insert(normalized.to_string());
        }
    }

    /// Load every `.gitignore` under `root`; returns how many were added
    pub fn load_gitignore(&mut self, root: &Path) -> Result<usize, DirDiffError> {
        let mut loaded = 0;

        let walker = WalkDir::new(root)
            .skip_hidden(false)
            .sort(true)
            .parallelism(Parallelism::Serial);

        for entry in walker.into_iter().flatten() {
            if entry.file_name() != std::ffi::OsStr::new(".gitignore") || !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let dir = path
                .parent()
                .and_then(|parent| parent.strip_prefix(root).ok())
                .map(Path::to_path_buf)
                .unwrap_or_default();

            let mut builder = GitignoreBuilder::new(&dir);
            if let Some(e) = builder.add(&path) {
                debug!("Failed to add .gitignore from {:?}: {}", path, e);
                continue;
            }
            let gitignore = builder
                .build()
                .map_err(|e| DirDiffError::Config(format!("Failed to build gitignore: {}", e)))?;
            debug!("Added .gitignore from {:?}", path);
            self.gitignores.push((dir, gitignore));
            loaded += 1;
        }

        Ok(loaded)
    }

    /// True when `relative_path` takes part in the comparison
    pub fn should_include(&self, relative_path: &str) -> bool {
        if self.ignored_paths.contains(relative_path) {
            return false;
        }

        let path = Path::new(relative_path);
        if let Some(ref custom_ignore) = self.custom_ignore {
            if matches_with_parents(custom_ignore, path, Path::new("")) {
                return false;
            }
        }

        for (dir, gitignore) in &self.gitignores {
            if path.starts_with(dir) && path != dir.as_path() && matches_with_parents(gitignore, path, dir) {
                return false;
            }
        }

        true
    }

    /// Borrow this filter as the closure `compare` takes
    pub fn as_predicate(&self) -> impl Fn(&str) -> bool + '_ {
        move |relative_path| self.should_include(relative_path)
    }
}

/// Check a path and its parents below `stop`
///
/// The predicate only sees paths, so the path itself is matched as a
/// directory; that lets dir-only patterns such as `build/` prune the
/// directory before it is walked.
fn matches_with_parents(gitignore: &Gitignore, path: &Path, stop: &Path) -> bool {
    if gitignore.matched(path, true).is_ignore() {
        return true;
    }

    let mut current = path;
    while let Some(parent) = current.parent() {
        if parent.as_os_str().is_empty() || parent == stop {
            break;
        }
        if gitignore.matched(parent, true).is_ignore() {
            return true;
        }
        current = parent;
    }
    false
}
