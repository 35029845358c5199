use crate::action::{
    content_actions, ignore_action, missing_side_actions, path_per_root, ActionTools, IgnoreSink,
};
use crate::content::contents_equal;
use crate::index::PathIndexer;
use crate::tree::{child_path, NodeKind, TreeNode, ROOT_PATH};
use crate::vfs::LocalVfs;
use dirdiff_common::{DirDiffError, Difference, Root, Vfs};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Comparison engine: indexes every root into one tree, then classifies it
///
/// Roots are indexed sequentially in root order. Copy/delete/view and
/// diff/merge actions are only synthesized for exactly two roots; with more
/// roots a differing node gets its tags and the Ignore action only.
pub struct ComparisonEngine {
    roots: Vec<Root>,
    vfs: Vec<Box<dyn Vfs>>,
    tools: ActionTools,
}

impl ComparisonEngine {
    /// Compare local directories
    pub fn local(roots: Vec<Root>, follow_symlinks: bool) -> Result<Self, DirDiffError> {
        let vfs = roots
            .iter()
            .map(|root| {
                Box::new(LocalVfs::new(root.base.clone()).with_follow_symlinks(follow_symlinks))
                    as Box<dyn Vfs>
            })
            .collect();
        Self::with_vfs(roots, vfs)
    }

    /// Compare through caller-supplied filesystems, one per root
    pub fn with_vfs(roots: Vec<Root>, vfs: Vec<Box<dyn Vfs>>) -> Result<Self, DirDiffError> {
        if roots.len() < 2 {
            return Err(DirDiffError::Config(format!(
                "At least two roots are required, got {}",
                roots.len()
            )));
        }
        if roots.len() != vfs.len() {
            return Err(DirDiffError::Config(format!(
                "{} roots but {} filesystems",
                roots.len(),
                vfs.len()
            )));
        }

        Ok(Self {
            roots,
            vfs,
            tools: ActionTools::default(),
        })
    }

    pub fn with_tools(mut self, tools: ActionTools) -> Self {
        self.tools = tools;
        self
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Base paths as strings, in root order
    pub fn base_paths(&self) -> Vec<String> {
        self.roots.iter().map(Root::base_str).collect()
    }

    /// Index every root, then classify the merged tree
    pub fn run(&self, should_include: &dyn Fn(&str) -> bool, add_ignore: &IgnoreSink) -> TreeNode {
        info!(
            "Comparing {}",
            self.roots
                .iter()
                .map(|r| format!("{} ({})", r.name, r.base.display()))
                .collect::<Vec<_>>()
                .join(" with ")
        );

        let mut tree = self.index(should_include);
        self.classify(&mut tree, add_ignore);

        let summary = tree.summary();
        info!(
            "Compared {} nodes: {} missing somewhere, {} differ in size, {} differ in content",
            summary.total, summary.missing, summary.size, summary.content
        );
        tree
    }

    /// Build the merged tree without classifying it
    pub fn index(&self, should_include: &dyn Fn(&str) -> bool) -> TreeNode {
        let indexer = PathIndexer::new(should_include);
        let mut tree = TreeNode::new_dir();
        for (i, vfs) in self.vfs.iter().enumerate() {
            let stats = indexer.index_root(&mut tree, vfs.as_ref(), i);
            info!(
                "Indexed root {}: {} directories, {} files",
                self.roots[i].name, stats.directories, stats.files
            );
        }
        tree
    }

    /// Classify every node of an indexed tree, starting at the root
    pub fn classify(&self, tree: &mut TreeNode, add_ignore: &IgnoreSink) {
        let bases = self.base_paths();
        let names: Vec<&str> = self.roots.iter().map(|r| r.name.as_str()).collect();
        let ctx = Context {
            bases: &bases,
            names: &names,
            add_ignore,
        };
        self.classify_node(tree, ROOT_PATH.to_string(), &ctx);
    }

    fn classify_node(&self, node: &mut TreeNode, path: String, ctx: &Context<'_>) {
        node.path = path;
        let root_count = self.roots.len();

        if root_count == 2 {
            for missing in 0..2 {
                if node.exists_in.contains(&missing) {
                    continue;
                }
                let present = 1 - missing;
                node.differences
                    .insert(Difference::OnlyIn(ctx.names[present].to_string()));
                let paths = path_per_root(&node.path, ctx.bases);
                node.actions.extend(missing_side_actions(
                    ctx.names,
                    &paths,
                    missing,
                    present,
                    node.is_dir(),
                ));
            }
        } else {
            for missing in (0..root_count).filter(|i| !node.exists_in.contains(i)) {
                node.differences
                    .insert(Difference::MissingFrom(ctx.names[missing].to_string()));
            }
        }

        match &mut node.kind {
            NodeKind::Directory { subdirs, files } => {
                let mut sub_differs = false;
                for (name, child) in subdirs.iter_mut().chain(files.iter_mut()) {
                    self.classify_node(child, child_path(&node.path, name), ctx);
                    sub_differs |= child.differs();
                }
                if sub_differs {
                    node.differences.insert(Difference::Sub);
                }
            }
            NodeKind::File => {
                if node.differences.is_empty() {
                    if let Some(difference) = self.compare_file(&node.path) {
                        debug!("{} differs: {}", node.path, difference);
                        node.differences.insert(difference);
                        if root_count == 2 {
                            let paths = path_per_root(&node.path, ctx.bases);
                            node.actions.extend(content_actions(&self.tools, &paths));
                        }
                    }
                }
            }
        }

        if node.differs() {
            node.actions.push(ignore_action(&node.path, ctx.add_ignore));
        }
    }

    /// Size first; contents are only read when every size agrees
    fn compare_file(&self, relative_path: &str) -> Option<Difference> {
        let path = Path::new(relative_path);

        let mut reference = None;
        for vfs in &self.vfs {
            let size = match vfs.metadata(path) {
                Ok(meta) => meta.size,
                Err(e) => {
                    warn!("Cannot stat {} in {}: {}", relative_path, vfs.instance_id(), e);
                    return Some(Difference::Size);
                }
            };
            match reference {
                None => reference = Some(size),
                Some(expected) if expected != size => return Some(Difference::Size),
                Some(_) => {}
            }
        }

        let copies: Vec<&dyn Vfs> = self.vfs.iter().map(|v| v.as_ref()).collect();
        if contents_equal(&copies, path) {
            None
        } else {
            Some(Difference::Content)
        }
    }
}

struct Context<'a> {
    bases: &'a [String],
    names: &'a [&'a str],
    add_ignore: &'a IgnoreSink,
}

/// Compare `roots` (named by `names`, same order) and return the classified tree
pub fn compare<F>(
    roots: &[PathBuf],
    names: &[String],
    should_include: F,
    add_ignore: IgnoreSink,
) -> Result<TreeNode, DirDiffError>
where
    F: Fn(&str) -> bool,
{
    if roots.len() != names.len() {
        return Err(DirDiffError::Config(format!(
            "{} roots but {} names",
            roots.len(),
            names.len()
        )));
    }

    let roots = roots
        .iter()
        .zip(names)
        .map(|(base, name)| Root::new(name.clone(), base.clone()))
        .collect();
    let engine = ComparisonEngine::local(roots, false)?;
    Ok(engine.run(&should_include, &add_ignore))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Invocation;
    use dirdiff_common::{FileEntry, FileMetadata, VfsError};
    use std::fs;
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        a: PathBuf,
        b: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let a = temp.path().join("A");
            let b = temp.path().join("B");
            fs::create_dir(&a).unwrap();
            fs::create_dir(&b).unwrap();
            Self { _temp: temp, a, b }
        }

        fn write(&self, side: &Path, rel: &str, content: &[u8]) {
            let path = side.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }

        fn run(&self) -> TreeNode {
            self.run_with(|_| true)
        }

        fn run_with(&self, include: impl Fn(&str) -> bool) -> TreeNode {
            compare(
                &[self.a.clone(), self.b.clone()],
                &["A".to_string(), "B".to_string()],
                include,
                noop_sink(),
            )
            .unwrap()
        }

        fn a_str(&self, rel: &str) -> String {
            format!("{}/{}", self.a.display(), rel)
        }

        fn b_str(&self, rel: &str) -> String {
            format!("{}/{}", self.b.display(), rel)
        }
    }

    fn noop_sink() -> IgnoreSink {
        Arc::new(|_: &str| {})
    }

    fn labels(node: &TreeNode) -> Vec<&str> {
        node.actions.iter().map(|a| a.label.as_str()).collect()
    }

    fn argv(node: &TreeNode, label: &str) -> Vec<String> {
        node.actions
            .iter()
            .find(|a| a.label == label)
            .and_then(|a| a.invocation.argv())
            .unwrap_or_else(|| panic!("no command action {}", label))
    }

    fn assert_sub_invariant(node: &TreeNode) {
        if node.is_dir() {
            let any_child = node.children().any(|(_, c)| c.differs());
            assert_eq!(
                node.differences.contains(&Difference::Sub),
                any_child,
                "sub tag wrong on {}",
                node.path
            );
        }
        for (_, child) in node.children() {
            assert_sub_invariant(child);
        }
    }

    #[test]
    fn test_scenario_file_only_in_b() {
        let fx = Fixture::new();
        fx.write(&fx.a, "foo.txt", b"hi");
        fs::create_dir(fx.a.join("bar")).unwrap();
        fx.write(&fx.b, "foo.txt", b"hi");
        fs::create_dir(fx.b.join("bar")).unwrap();
        fx.write(&fx.b, "baz.txt", b"x");

        let root = fx.run();

        assert_eq!(root.path, ".");
        assert_eq!(root.tags(), vec!["sub"]);
        assert_eq!(labels(&root), vec!["Ignore"]);

        let bar = root.find("bar").unwrap();
        assert!(!bar.differs());
        assert!(bar.actions.is_empty());

        let foo = root.find("foo.txt").unwrap();
        assert!(!foo.differs());
        assert!(foo.actions.is_empty());

        let baz = root.find("baz.txt").unwrap();
        assert_eq!(baz.path, "baz.txt");
        assert_eq!(baz.tags(), vec!["only-in-B"]);
        assert_eq!(labels(baz), vec!["Copy-B-to-A", "Delete-B", "View", "Ignore"]);
        assert_eq!(
            argv(baz, "Copy-B-to-A"),
            vec!["cp".to_string(), "-rv".to_string(), fx.b_str("baz.txt"), fx.a_str("baz.txt")]
        );
        assert_eq!(
            argv(baz, "Delete-B"),
            vec!["rm".to_string(), "-rv".to_string(), fx.b_str("baz.txt")]
        );
        assert_eq!(argv(baz, "View"), vec!["cat".to_string(), fx.b_str("baz.txt")]);
    }

    #[test]
    fn test_only_in_left_directory() {
        let fx = Fixture::new();
        fx.write(&fx.a, "docs/readme.md", b"doc");

        let root = fx.run();
        let docs = root.find("docs").unwrap();
        assert_eq!(docs.tags(), vec!["only-in-A", "sub"]);
        assert_eq!(labels(docs), vec!["Copy-A-to-B", "Delete-A", "View", "Ignore"]);
        assert_eq!(
            argv(docs, "View"),
            vec!["ls".to_string(), "-lR".to_string(), fx.a_str("docs")]
        );

        let readme = root.find("docs/readme.md").unwrap();
        assert_eq!(readme.path, "docs/readme.md");
        assert_eq!(readme.tags(), vec!["only-in-A"]);
    }

    #[test]
    fn test_identical_trees_have_no_differences() {
        let fx = Fixture::new();
        for side in [&fx.a, &fx.b] {
            fx.write(side, "one.txt", b"same bytes");
            fx.write(side, "nested/deep/two.bin", &[0u8, 1, 2, 3]);
            fs::create_dir_all(side.join("empty")).unwrap();
        }

        let root = fx.run();
        for node in root.walk() {
            assert!(!node.differs(), "{} should be identical", node.path);
            assert!(node.actions.is_empty());
        }
        assert_eq!(root.summary().identical, root.summary().total);
    }

    #[test]
    fn test_content_difference_actions() {
        let fx = Fixture::new();
        fx.write(&fx.a, "f.txt", b"abc");
        fx.write(&fx.b, "f.txt", b"abd");

        let root = fx.run();
        let f = root.find("f.txt").unwrap();
        assert_eq!(f.tags(), vec!["content"]);
        assert_eq!(labels(f), vec!["Diff", "Merge", "Leftboth", "Rightboth", "Ignore"]);

        let (l, r) = (fx.a_str("f.txt"), fx.b_str("f.txt"));
        assert_eq!(argv(f, "Diff"), vec!["diff".to_string(), l.clone(), r.clone()]);
        assert_eq!(argv(f, "Merge"), vec!["meld".to_string(), l.clone(), r.clone()]);
        assert_eq!(
            argv(f, "Leftboth"),
            vec!["cp".to_string(), "-rv".to_string(), l.clone(), r.clone()]
        );
        assert_eq!(
            argv(f, "Rightboth"),
            vec!["cp".to_string(), "-rv".to_string(), r, l]
        );
    }

    #[test]
    fn test_size_difference() {
        let fx = Fixture::new();
        fx.write(&fx.a, "sub/f.txt", b"short");
        fx.write(&fx.b, "sub/f.txt", b"much longer");

        let root = fx.run();
        let f = root.find("sub/f.txt").unwrap();
        assert_eq!(f.tags(), vec!["size"]);
        assert_eq!(root.find("sub").unwrap().tags(), vec!["sub"]);
        assert_eq!(root.tags(), vec!["sub"]);
    }

    #[test]
    fn test_excluded_directory_is_absent_everywhere() {
        let fx = Fixture::new();
        fx.write(&fx.a, "target/out.txt", b"1");
        fx.write(&fx.b, "target/out.txt", b"2");
        fx.write(&fx.b, "target/extra.txt", b"2");
        fx.write(&fx.a, "keep.txt", b"k");
        fx.write(&fx.b, "keep.txt", b"k");

        let root = fx.run_with(|p| p != "target");
        assert!(root.find("target").is_none());
        assert!(root.find("target/out.txt").is_none());
        assert!(!root.differs());
    }

    #[test]
    fn test_sub_tag_holds_recursively() {
        let fx = Fixture::new();
        fx.write(&fx.a, "x/y/z/leaf.txt", b"left");
        fx.write(&fx.b, "x/y/z/leaf.txt", b"rght");
        fx.write(&fx.a, "x/same.txt", b"s");
        fx.write(&fx.b, "x/same.txt", b"s");
        fx.write(&fx.a, "w/ok.txt", b"o");
        fx.write(&fx.b, "w/ok.txt", b"o");
        fx.write(&fx.b, "w/q/only.txt", b"o");

        let root = fx.run();
        assert_sub_invariant(&root);
        assert_eq!(root.find("x/y/z").unwrap().tags(), vec!["sub"]);
        assert!(!root.find("x/same.txt").unwrap().differs());
        assert_eq!(root.find("w/q").unwrap().tags(), vec!["only-in-B", "sub"]);
    }

    #[test]
    fn test_name_is_directory_in_one_root_and_file_in_other() {
        let fx = Fixture::new();
        fx.write(&fx.a, "thing/inside.txt", b"d");
        fx.write(&fx.b, "thing", b"f");

        let root = fx.run();
        let NodeKind::Directory { subdirs, files } = &root.kind else {
            panic!("root is a directory");
        };
        assert_eq!(subdirs["thing"].tags(), vec!["only-in-A", "sub"]);
        assert_eq!(files["thing"].tags(), vec!["only-in-B"]);
    }

    #[test]
    fn test_ignore_callback_calls_sink_once() {
        let fx = Fixture::new();
        fx.write(&fx.b, "bar/baz.txt", b"x");
        fs::create_dir(fx.a.join("bar")).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink: IgnoreSink = {
            let seen = Arc::clone(&seen);
            Arc::new(move |p: &str| seen.lock().unwrap().push(p.to_string()))
        };
        let root = compare(
            &[fx.a.clone(), fx.b.clone()],
            &["A".to_string(), "B".to_string()],
            |_: &str| true,
            sink,
        )
        .unwrap();

        assert!(seen.lock().unwrap().is_empty());
        let node = root.find("bar/baz.txt").unwrap();
        let ignore = node.actions.last().unwrap();
        assert_eq!(ignore.label, "Ignore");
        let Invocation::Callback(callback) = &ignore.invocation else {
            panic!("Ignore must be a callback");
        };
        callback();

        assert_eq!(*seen.lock().unwrap(), vec!["bar/baz.txt".to_string()]);
        // no filesystem side effect
        assert!(fx.b.join("bar/baz.txt").exists());
        assert!(!fx.a.join("bar/baz.txt").exists());
    }

    #[test]
    fn test_name_count_mismatch_is_rejected() {
        let fx = Fixture::new();
        let err = compare(
            &[fx.a.clone(), fx.b.clone()],
            &["A".to_string()],
            |_: &str| true,
            noop_sink(),
        )
        .unwrap_err();
        assert!(matches!(err, DirDiffError::Config(_)));
    }

    #[test]
    fn test_single_root_is_rejected() {
        let fx = Fixture::new();
        let err = ComparisonEngine::local(vec![Root::new("A", fx.a.clone())], false).err();
        assert!(matches!(err, Some(DirDiffError::Config(_))));
    }

    #[test]
    fn test_three_roots_tag_without_pairwise_actions() {
        let temp = TempDir::new().unwrap();
        let bases: Vec<PathBuf> = ["r0", "r1", "r2"].iter().map(|n| temp.path().join(n)).collect();
        for base in &bases {
            fs::create_dir(base).unwrap();
        }
        fs::write(bases[0].join("lonely.txt"), b"1").unwrap();
        fs::write(bases[0].join("pair.txt"), b"2").unwrap();
        fs::write(bases[1].join("pair.txt"), b"2").unwrap();
        for base in &bases {
            fs::write(base.join("shared.txt"), b"same").unwrap();
        }
        fs::write(bases[0].join("varies.txt"), b"aaa").unwrap();
        fs::write(bases[1].join("varies.txt"), b"aaa").unwrap();
        fs::write(bases[2].join("varies.txt"), b"aab").unwrap();

        let names: Vec<String> = ["r0", "r1", "r2"].iter().map(|s| s.to_string()).collect();
        let root = compare(&bases, &names, |_: &str| true, noop_sink()).unwrap();

        // one tag per root the path is missing from
        let lonely = root.find("lonely.txt").unwrap();
        assert_eq!(lonely.tags(), vec!["missing-from-r1", "missing-from-r2"]);
        assert_eq!(labels(lonely), vec!["Ignore"]);

        let pair = root.find("pair.txt").unwrap();
        assert_eq!(pair.tags(), vec!["missing-from-r2"]);
        assert_eq!(labels(pair), vec!["Ignore"]);
        assert_eq!(root.summary().missing, 2);

        assert!(!root.find("shared.txt").unwrap().differs());

        let varies = root.find("varies.txt").unwrap();
        assert_eq!(varies.tags(), vec!["content"]);
        assert_eq!(labels(varies), vec!["Ignore"]);
    }

    #[test]
    fn test_tools_are_configurable() {
        let fx = Fixture::new();
        fx.write(&fx.a, "f", b"1");
        fx.write(&fx.b, "f", b"2");

        let engine = ComparisonEngine::local(
            vec![Root::new("A", fx.a.clone()), Root::new("B", fx.b.clone())],
            false,
        )
        .unwrap()
        .with_tools(ActionTools {
            diff: "vimdiff".to_string(),
            merge: "kdiff3".to_string(),
        });
        let root = engine.run(&|_: &str| true, &noop_sink());
        let f = root.find("f").unwrap();
        assert_eq!(argv(f, "Diff")[0], "vimdiff");
        assert_eq!(argv(f, "Merge")[0], "kdiff3");
    }

    /// Local filesystem that counts how often files are opened
    struct CountingVfs {
        inner: LocalVfs,
        opens: Arc<AtomicUsize>,
    }

    impl Vfs for CountingVfs {
        fn instance_id(&self) -> &str {
            self.inner.instance_id()
        }

        fn metadata(&self, path: &Path) -> Result<FileMetadata, VfsError> {
            self.inner.metadata(path)
        }

        fn read_dir(&self, path: &Path) -> Result<Vec<FileEntry>, VfsError> {
            self.inner.read_dir(path)
        }

        fn open_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, VfsError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            self.inner.open_file(path)
        }
    }

    fn counting_engine(fx: &Fixture, opens: &Arc<AtomicUsize>) -> ComparisonEngine {
        let vfs: Vec<Box<dyn Vfs>> = [&fx.a, &fx.b]
            .iter()
            .map(|base| {
                Box::new(CountingVfs {
                    inner: LocalVfs::new((*base).clone()),
                    opens: Arc::clone(opens),
                }) as Box<dyn Vfs>
            })
            .collect();
        ComparisonEngine::with_vfs(
            vec![Root::new("A", fx.a.clone()), Root::new("B", fx.b.clone())],
            vfs,
        )
        .unwrap()
    }

    #[test]
    fn test_size_mismatch_never_reads_contents() {
        let fx = Fixture::new();
        fx.write(&fx.a, "big.bin", b"0123456789");
        fx.write(&fx.b, "big.bin", b"0123456789 trailing bytes");

        let opens = Arc::new(AtomicUsize::new(0));
        let root = counting_engine(&fx, &opens).run(&|_: &str| true, &noop_sink());

        assert_eq!(root.find("big.bin").unwrap().tags(), vec!["size"]);
        assert_eq!(opens.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_equal_sizes_read_each_copy() {
        let fx = Fixture::new();
        fx.write(&fx.a, "same.bin", b"identical");
        fx.write(&fx.b, "same.bin", b"identical");

        let opens = Arc::new(AtomicUsize::new(0));
        let root = counting_engine(&fx, &opens).run(&|_: &str| true, &noop_sink());

        assert!(!root.find("same.bin").unwrap().differs());
        assert_eq!(opens.load(Ordering::SeqCst), 2);
    }

    /// Local filesystem whose files can be listed and stat'ed but not opened
    struct UnreadableVfs(LocalVfs);

    impl Vfs for UnreadableVfs {
        fn instance_id(&self) -> &str {
            self.0.instance_id()
        }

        fn metadata(&self, path: &Path) -> Result<FileMetadata, VfsError> {
            self.0.metadata(path)
        }

        fn read_dir(&self, path: &Path) -> Result<Vec<FileEntry>, VfsError> {
            self.0.read_dir(path)
        }

        fn open_file(&self, path: &Path) -> Result<Box<dyn Read + Send>, VfsError> {
            Err(VfsError::PermissionDenied(path.display().to_string()))
        }
    }

    #[test]
    fn test_unreadable_copies_are_content_difference() {
        let fx = Fixture::new();
        fx.write(&fx.a, "secret", b"aaaa");
        fx.write(&fx.b, "secret", b"bbbb");

        let vfs: Vec<Box<dyn Vfs>> = [&fx.a, &fx.b]
            .iter()
            .map(|base| Box::new(UnreadableVfs(LocalVfs::new((*base).clone()))) as Box<dyn Vfs>)
            .collect();
        let engine = ComparisonEngine::with_vfs(
            vec![Root::new("A", fx.a.clone()), Root::new("B", fx.b.clone())],
            vfs,
        )
        .unwrap();
        let root = engine.run(&|_: &str| true, &noop_sink());

        assert_eq!(root.find("secret").unwrap().tags(), vec!["content"]);
        assert_eq!(root.tags(), vec!["sub"]);
    }

    #[test]
    fn test_vanished_file_after_indexing_is_size_difference() {
        let fx = Fixture::new();
        fx.write(&fx.a, "gone.txt", b"soon gone");
        fx.write(&fx.b, "gone.txt", b"soon gone");

        let engine = ComparisonEngine::local(
            vec![Root::new("A", fx.a.clone()), Root::new("B", fx.b.clone())],
            false,
        )
        .unwrap();
        let mut tree = engine.index(&|_: &str| true);
        fs::remove_file(fx.b.join("gone.txt")).unwrap();
        engine.classify(&mut tree, &noop_sink());

        assert_eq!(tree.find("gone.txt").unwrap().tags(), vec!["size"]);
        assert_eq!(tree.tags(), vec!["sub"]);
    }
}
