use anyhow::{bail, Context, Result};
use dirdiff_core::{Action, Invocation};
use std::io::{BufRead, Write};
use std::process::Command;
use tracing::{debug, info};

/// What happened when an action was dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// In-process callback ran
    Called,
    /// Command ran and exited successfully
    Ran,
    /// User declined the confirmation prompt
    Declined,
}

/// Executes commands on behalf of the dispatcher
pub trait Runner {
    /// Ask before running `argv`, prompting on `output` and reading the
    /// answer from `input`; `true` means go ahead
    fn confirm(&mut self, argv: &[String], input: &mut dyn BufRead, output: &mut dyn Write) -> Result<bool>;

    /// Run `argv` to completion; `false` when it exited unsuccessfully
    fn spawn(&mut self, argv: &[String]) -> Result<bool>;
}

/// Runs commands as subprocesses
#[derive(Debug, Default)]
pub struct SystemRunner {
    assume_yes: bool,
}

impl SystemRunner {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Runner for SystemRunner {
    fn confirm(&mut self, argv: &[String], input: &mut dyn BufRead, output: &mut dyn Write) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        writeln!(output, "Going to run command:")?;
        for arg in argv {
            writeln!(output, "  {}", arg)?;
        }
        write!(output, "Run y/n? ")?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let approved = answer.trim() == "y";
        if !approved {
            writeln!(output, "Aborted!")?;
        }
        Ok(approved)
    }

    fn spawn(&mut self, argv: &[String]) -> Result<bool> {
        let Some((program, args)) = argv.split_first() else {
            bail!("Empty command");
        };
        info!("Running {}", argv.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to start {}", program))?;
        if !status.success() {
            debug!("{} exited with {}", program, status);
        }
        Ok(status.success())
    }
}

/// Where confirmation prompts are written and answers read
pub struct Prompt<'a> {
    pub input: &'a mut dyn BufRead,
    pub output: &'a mut dyn Write,
}

/// Dispatch one action: callbacks are invoked directly, commands are
/// spawned, after confirmation unless `viewers` lists the program
///
/// A viewer's exit status is not checked (`diff` exits 1 on differences);
/// any other command failing is an error.
pub fn dispatch(
    action: &Action,
    viewers: &[String],
    runner: &mut dyn Runner,
    prompt: Prompt<'_>,
) -> Result<Outcome> {
    match &action.invocation {
        Invocation::Callback(callback) => {
            info!("Invoking {}", action.label);
            callback();
            Ok(Outcome::Called)
        }
        Invocation::Command { program, .. } => {
            let argv = action.invocation.argv().unwrap_or_default();
            let needs_approval = !viewers.iter().any(|viewer| viewer == program);
            if needs_approval && !runner.confirm(&argv, prompt.input, prompt.output)? {
                return Ok(Outcome::Declined);
            }
            if !runner.spawn(&argv)? && needs_approval {
                bail!("{} failed", argv.join(" "));
            }
            Ok(Outcome::Ran)
        }
    }
}

/// First action whose shortcut is `key`
pub fn find_action(actions: &[Action], key: char) -> Option<&Action> {
    let key = key.to_ascii_lowercase();
    actions.iter().find(|action| action.shortcut() == Some(key))
}
