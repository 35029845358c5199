use dirdiff_common::ToolConfig;
use std::fmt;
use std::sync::Arc;

/// Receives the relative path of a node the user chose to ignore
pub type IgnoreSink = Arc<dyn Fn(&str) + Send + Sync>;

/// How an action is carried out
#[derive(Clone)]
pub enum Invocation {
    /// Run `program` with `args` as a subprocess
    Command { program: String, args: Vec<String> },
    /// Call back into the process; the caller re-runs the comparison afterwards
    Callback(Arc<dyn Fn() + Send + Sync>),
}

impl Invocation {
    fn command(argv: Vec<String>) -> Self {
        let mut argv = argv.into_iter();
        let program = argv.next().unwrap_or_default();
        Invocation::Command {
            program,
            args: argv.collect(),
        }
    }

    /// Program followed by its arguments, for commands
    pub fn argv(&self) -> Option<Vec<String>> {
        match self {
            Invocation::Command { program, args } => {
                let mut argv = Vec::with_capacity(args.len() + 1);
                argv.push(program.clone());
                argv.extend(args.iter().cloned());
                Some(argv)
            }
            Invocation::Callback(_) => None,
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Invocation::Callback(_))
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Command { program, args } => f
                .debug_struct("Command")
                .field("program", program)
                .field("args", args)
                .finish(),
            Invocation::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// A labelled operation offered on a differing node
#[derive(Debug, Clone)]
pub struct Action {
    pub label: String,
    pub invocation: Invocation,
}

impl Action {
    fn command(label: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            label: label.into(),
            invocation: Invocation::command(argv),
        }
    }

    /// Key derived from the label's first character
    pub fn shortcut(&self) -> Option<char> {
        self.label.chars().next().map(|c| c.to_ascii_lowercase())
    }
}

/// Programs behind the Diff and Merge actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTools {
    pub diff: String,
    pub merge: String,
}

impl Default for ActionTools {
    fn default() -> Self {
        ActionTools::from(&ToolConfig::default())
    }
}

impl From<&ToolConfig> for ActionTools {
    fn from(config: &ToolConfig) -> Self {
        Self {
            diff: config.diff.clone(),
            merge: config.merge.clone(),
        }
    }
}

/// Absolute path of `relative_path` under each root base, in root order
pub fn path_per_root<S: AsRef<str>>(relative_path: &str, bases: &[S]) -> Vec<String> {
    bases
        .iter()
        .map(|base| format!("{}/{}", base.as_ref(), relative_path))
        .collect()
}

/// Copy, delete and view actions for a node that only one of two roots has
pub(crate) fn missing_side_actions(
    names: &[&str],
    paths: &[String],
    missing: usize,
    present: usize,
    is_dir: bool,
) -> Vec<Action> {
    let has = paths[present].clone();
    let lacks = paths[missing].clone();
    let view = if is_dir {
        vec!["ls".to_string(), "-lR".to_string(), has.clone()]
    } else {
        vec!["cat".to_string(), has.clone()]
    };

    vec![
        Action::command(
            format!("Copy-{}-to-{}", names[present], names[missing]),
            vec!["cp".to_string(), "-rv".to_string(), has.clone(), lacks],
        ),
        Action::command(
            format!("Delete-{}", names[present]),
            vec!["rm".to_string(), "-rv".to_string(), has],
        ),
        Action::command("View", view),
    ]
}

/// Diff, merge and overwrite actions for a file whose two copies differ
pub(crate) fn content_actions(tools: &ActionTools, paths: &[String]) -> Vec<Action> {
    let (left, right) = (paths[0].clone(), paths[1].clone());
    vec![
        Action::command("Diff", vec![tools.diff.clone(), left.clone(), right.clone()]),
        Action::command("Merge", vec![tools.merge.clone(), left.clone(), right.clone()]),
        Action::command(
            "Leftboth",
            vec!["cp".to_string(), "-rv".to_string(), left.clone(), right.clone()],
        ),
        Action::command(
            "Rightboth",
            vec!["cp".to_string(), "-rv".to_string(), right, left],
        ),
    ]
}

/// Trailing action that hands `relative_path` to the ignore sink
pub(crate) fn ignore_action(relative_path: &str, sink: &IgnoreSink) -> Action {
    let sink = Arc::clone(sink);
    let path = relative_path.to_string();
    Action {
        label: "Ignore".to_string(),
        invocation: Invocation::Callback(Arc::new(move || sink(&path))),
    }
}
