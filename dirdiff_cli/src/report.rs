use crate::session::{flatten, legend};
use anyhow::Result;
use dirdiff_common::{PathShortcut, Root};
use dirdiff_core::{hash_files, TreeNode, TreeSummary};
use serde::Serialize;
use std::io::Write;
use tracing::warn;

const RULE_WIDTH: usize = 80;

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub roots: Vec<JsonRoot>,
    pub summary: TreeSummary,
    pub entries: Vec<JsonEntry>,
}

#[derive(Debug, Serialize)]
pub struct JsonRoot {
    pub name: String,
    pub base: String,
}

#[derive(Debug, Serialize)]
pub struct JsonEntry {
    pub path: String,
    pub kind: &'static str,
    pub exists_in: Vec<String>,
    pub tags: Vec<String>,
    pub actions: Vec<JsonAction>,
    /// Per-root blake3 digest in root order; `None` where the file is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<Option<String>>>,
}

#[derive(Debug, Serialize)]
pub struct JsonAction {
    pub key: Option<char>,
    pub label: String,
    /// Program and arguments; absent for in-process actions
    pub command: Option<Vec<String>>,
}

/// Build the machine-readable report
///
/// Only nodes that differ for their own reason are listed unless
/// `include_all` is set.
pub fn build_json_report(
    roots: &[Root],
    tree: &TreeNode,
    include_all: bool,
    with_hashes: bool,
) -> JsonReport {
    let entries = tree
        .walk()
        .into_iter()
        .filter(|node| include_all || node.differs_itself())
        .map(|node| JsonEntry {
            path: node.path.clone(),
            kind: if node.is_dir() { "directory" } else { "file" },
            exists_in: node
                .exists_in
                .iter()
                .filter_map(|&i| roots.get(i).map(|r| r.name.clone()))
                .collect(),
            tags: node.tags(),
            actions: node
                .actions
                .iter()
                .map(|action| JsonAction {
                    key: action.shortcut(),
                    label: action.label.clone(),
                    command: action.invocation.argv(),
                })
                .collect(),
            hashes: (with_hashes && !node.is_dir()).then(|| side_hashes(roots, node)),
        })
        .collect();

    JsonReport {
        roots: roots
            .iter()
            .map(|r| JsonRoot {
                name: r.name.clone(),
                base: r.base_str(),
            })
            .collect(),
        summary: tree.summary(),
        entries,
    }
}

fn side_hashes(roots: &[Root], node: &TreeNode) -> Vec<Option<String>> {
    roots
        .iter()
        .enumerate()
        .map(|(i, root)| {
            if !node.exists_in.contains(&i) {
                return None;
            }
            let path = root.base.join(&node.path);
            match hash_files([&path]) {
                Ok(hash) => Some(hash.to_hex()),
                Err(e) => {
                    warn!("Cannot hash {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}

/// Human-readable listing: one line per difference with its action legend
pub fn write_text_report<W: Write>(
    out: &mut W,
    roots: &[Root],
    tree: &TreeNode,
    shortcuts: &[PathShortcut],
    use_color: bool,
) -> Result<()> {
    let names: Vec<_> = roots.iter().map(|r| r.name.as_str()).collect();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Comparison of {}", names.join(" / "))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    let lines = flatten(tree, shortcuts);
    for line in &lines {
        let tags = line.tags.join(",");
        let (color, reset) = if use_color {
            let missing = |t: &String| t.starts_with("only-in-") || t.starts_with("missing-from-");
            let color = if line.tags.iter().any(missing) {
                "\x1b[33m" // Yellow
            } else {
                "\x1b[31m" // Red
            };
            (color, "\x1b[0m")
        } else {
            ("", "")
        };
        writeln!(out, "{}[{}]{} {}", color, tags, reset, line.display_name)?;

        if let Some(node) = tree.find(&line.path) {
            let legend = legend(node);
            if !legend.is_empty() {
                writeln!(out, "    {}", legend)?;
            }
        }
    }

    let summary = tree.summary();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Total entries:   {}", summary.total)?;
    writeln!(out, "  Identical:       {}", summary.identical)?;
    writeln!(out, "  Missing:         {}", summary.missing)?;
    writeln!(out, "  Size differs:    {}", summary.size)?;
    writeln!(out, "  Content differs: {}", summary.content)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    Ok(())
}
