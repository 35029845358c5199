//! Flattened difference list and the line-mode browser built on it.

use crate::comparer::Comparer;
use crate::dispatch::{dispatch, find_action, Outcome, Prompt, Runner};
use anyhow::Result;
use dirdiff_common::PathShortcut;
use dirdiff_core::{TreeNode, ROOT_PATH};
use std::io::{BufRead, Write};

const PAGE: isize = 10;
const MAX_SHORTCUT_PASSES: usize = 32;

/// One displayed difference, pointing back at its node by relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub display_name: String,
    pub path: String,
    pub tags: Vec<String>,
}

/// Apply shortcuts until nothing changes, then space out separators
pub fn display_name(path: &str, shortcuts: &[PathShortcut]) -> String {
    let mut name = path.to_string();
    for _ in 0..MAX_SHORTCUT_PASSES {
        let before = name.clone();
        for shortcut in shortcuts {
            if !shortcut.from.is_empty() {
                name = name.replace(&shortcut.from, &shortcut.to);
            }
        }
        if name == before {
            break;
        }
    }
    name.replace('/', " / ")
}

/// Lines for every node that differs for its own reason, in tree order
///
/// Subtrees without differences are skipped entirely; directories that only
/// differ through descendants contribute no line of their own.
pub fn flatten(tree: &TreeNode, shortcuts: &[PathShortcut]) -> Vec<Line> {
    let mut lines = Vec::new();
    collect(tree, shortcuts, &mut lines);
    lines
}

fn collect(node: &TreeNode, shortcuts: &[PathShortcut], lines: &mut Vec<Line>) {
    if !node.differs() {
        return;
    }
    if node.differs_itself() {
        let path = if node.path.is_empty() { ROOT_PATH } else { node.path.as_str() };
        lines.push(Line {
            display_name: display_name(path, shortcuts),
            path: path.to_string(),
            tags: node.tags(),
        });
    }
    for (_, child) in node.children() {
        collect(child, shortcuts, lines);
    }
}

/// `[C]opy-left-to-right  [V]iew ...` legend for a node's actions
pub fn legend(node: &TreeNode) -> String {
    node.actions
        .iter()
        .map(|action| {
            let mut chars = action.label.chars();
            match chars.next() {
                Some(first) => format!("[{}]{}", first, chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Browser state: the current lines and which one is selected
#[derive(Debug, Default)]
pub struct Session {
    pub lines: Vec<Line>,
    pub selected: Option<usize>,
    pub status: Option<String>,
}

impl Session {
    /// Replace the lines, keeping the selected index (clamped to the new list)
    pub fn refresh(&mut self, tree: &TreeNode, shortcuts: &[PathShortcut]) {
        let index = self.selected.unwrap_or(0);
        self.lines = flatten(tree, shortcuts);
        self.selected = if self.lines.is_empty() {
            None
        } else {
            Some(index.min(self.lines.len() - 1))
        };
    }

    /// Move by `delta` lines, wrapping around either end
    pub fn move_selection(&mut self, delta: isize) {
        if self.lines.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(current) => {
                let len = self.lines.len() as isize;
                (current as isize + delta).rem_euclid(len) as usize
            }
        });
    }

    pub fn home(&mut self) {
        self.selected = if self.lines.is_empty() { None } else { Some(0) };
    }

    pub fn end(&mut self) {
        self.selected = self.lines.len().checked_sub(1);
    }

    pub fn selected_line(&self) -> Option<&Line> {
        self.selected.and_then(|i| self.lines.get(i))
    }
}

/// Interactive line-mode loop: one command per input line
///
/// Confirmation prompts share `input` and `output` with the loop itself.
pub fn browse<R: BufRead, W: Write>(
    comparer: &Comparer,
    input: &mut R,
    output: &mut W,
    runner: &mut dyn Runner,
) -> Result<()> {
    let mut session = Session::default();
    let mut tree = comparer.compare()?;
    session.refresh(&tree, &comparer.shortcuts());
    let viewers = comparer.viewer_programs();

    loop {
        render(&session, &tree, output)?;

        let mut command = String::new();
        if input.read_line(&mut command)? == 0 {
            return Ok(());
        }
        let command = command.trim();
        let Some(key) = command.chars().next() else {
            continue;
        };

        match key {
            'q' => return Ok(()),
            'j' => session.move_selection(1),
            'k' => session.move_selection(-1),
            'J' => session.move_selection(PAGE),
            'K' => session.move_selection(-PAGE),
            'g' => session.home(),
            'G' => session.end(),
            's' => {
                tree = comparer.compare()?;
                session.refresh(&tree, &comparer.shortcuts());
            }
            _ => {
                let action = session
                    .selected_line()
                    .and_then(|line| tree.find(&line.path))
                    .and_then(|node| find_action(&node.actions, key));
                let Some(action) = action else {
                    session.status = Some(format!("Unknown key '{}'", key));
                    continue;
                };

                let prompt = Prompt {
                    input: &mut *input,
                    output: &mut *output,
                };
                session.status = Some(match dispatch(action, &viewers, runner, prompt) {
                    Ok(Outcome::Called) | Ok(Outcome::Ran) => format!("{} done", action.label),
                    Ok(Outcome::Declined) => format!("{} aborted", action.label),
                    Err(e) => format!("{} failed: {:#}", action.label, e),
                });
                tree = comparer.compare()?;
                session.refresh(&tree, &comparer.shortcuts());
            }
        }
    }
}

fn render<W: Write>(session: &Session, tree: &TreeNode, output: &mut W) -> Result<()> {
    writeln!(output)?;
    if session.lines.is_empty() {
        writeln!(output, "No differences.")?;
    }
    for (i, line) in session.lines.iter().enumerate() {
        let marker = if session.selected == Some(i) { '>' } else { ' ' };
        writeln!(output, "{} {}  [{}]", marker, line.display_name, line.tags.join(","))?;
    }

    let mut status = String::from("[j|k] Select  [J|K] Page  [s] Rescan  [q] Quit");
    if let Some(node) = session.selected_line().and_then(|line| tree.find(&line.path)) {
        status.push_str("  ");
        status.push_str(&legend(node));
    }
    if let Some(message) = &session.status {
        writeln!(output, "-- {}", message)?;
    }
    writeln!(output, "{}", status)?;
    output.flush()?;
    Ok(())
}
