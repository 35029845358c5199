mod comparer;
mod dispatch;
mod report;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comparer::{CompareArgs, Comparer};
use dirdiff_common::{forget_ignore, load_config, LoadedConfig};
use dispatch::{dispatch, find_action, Outcome, Prompt, SystemRunner};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status when the roots differ, as with diff(1)
const EXIT_DIFFERENT: u8 = 2;

#[derive(Parser)]
#[command(name = "dirdiff")]
#[command(author = "DirDiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Recursive directory tree comparison with per-difference actions", long_about = None)]
struct Cli {
    /// Use this config file instead of the discovered one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two directories and list the differences
    Scan {
        #[command(flatten)]
        roots: CompareArgs,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Include identical entries in JSON output
        #[arg(long, requires = "json")]
        all: bool,

        /// Add per-side blake3 digests of files to JSON output
        #[arg(long, requires = "json")]
        hashes: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },
    /// Run one action on the difference at PATH
    Act {
        #[command(flatten)]
        roots: CompareArgs,

        /// Relative path of the node (`.` for the roots themselves)
        path: String,

        /// Action shortcut, e.g. `c` for Copy or `i` for Ignore
        key: char,

        /// Run mutating commands without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Step through the differences interactively
    Browse {
        #[command(flatten)]
        roots: CompareArgs,
    },
    /// Show the paths excluded through the Ignore action
    Ignored {
        /// Take this path off the list instead
        #[arg(long)]
        remove: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays clean
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let loaded = match &cli.config {
        Some(path) => LoadedConfig::at(path.clone())?,
        None => load_config(false)?,
    };
    info!("Using config {}", loaded.path.display());

    match cli.command {
        Commands::Scan {
            roots,
            json,
            all,
            hashes,
            no_color,
        } => run_scan(&roots, loaded, json, all, hashes, no_color),
        Commands::Act {
            roots,
            path,
            key,
            yes,
        } => run_act(&roots, loaded, &path, key, yes),
        Commands::Browse { roots } => {
            let comparer = Comparer::new(&roots, loaded)?;
            let mut input = io::stdin().lock();
            let mut output = io::stdout();
            session::browse(&comparer, &mut input, &mut output, &mut SystemRunner::new(false))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ignored { remove } => run_ignored(loaded, remove),
    }
}

fn run_scan(
    args: &CompareArgs,
    loaded: LoadedConfig,
    json: bool,
    all: bool,
    hashes: bool,
    no_color: bool,
) -> Result<ExitCode> {
    let comparer = Comparer::new(args, loaded)?;
    let tree = comparer.compare()?;

    if json {
        let report = report::build_json_report(comparer.roots(), &tree, all, hashes);
        let output = serde_json::to_string_pretty(&report).context("serializing report")?;
        println!("{output}");
    } else {
        let use_color = !no_color && io::stdout().is_terminal();
        report::write_text_report(
            &mut io::stdout().lock(),
            comparer.roots(),
            &tree,
            &comparer.shortcuts(),
            use_color,
        )?;
    }

    Ok(if tree.differs() {
        ExitCode::from(EXIT_DIFFERENT)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_act(args: &CompareArgs, loaded: LoadedConfig, path: &str, key: char, yes: bool) -> Result<ExitCode> {
    let comparer = Comparer::new(args, loaded)?;
    let tree = comparer.compare()?;

    let Some(node) = tree.find(path) else {
        bail!("No such path in either root: {}", path);
    };
    if node.actions.is_empty() {
        bail!("{} has no differences to act on", path);
    }
    let Some(action) = find_action(&node.actions, key) else {
        let keys: String = node.actions.iter().filter_map(|a| a.shortcut()).collect();
        bail!("No action '{}' for {}; available: {}", key, path, keys);
    };

    let prompt = Prompt {
        input: &mut io::stdin().lock(),
        output: &mut io::stdout(),
    };
    match dispatch(action, &comparer.viewer_programs(), &mut SystemRunner::new(yes), prompt)? {
        Outcome::Declined => Ok(ExitCode::FAILURE),
        Outcome::Called | Outcome::Ran => {
            info!("{} on {} done", action.label, path);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_ignored(mut loaded: LoadedConfig, remove: Option<String>) -> Result<ExitCode> {
    if let Some(path) = remove {
        if !forget_ignore(&mut loaded, &path)? {
            bail!("{} is not on the ignore list", path);
        }
        println!("No longer ignoring {}", path);
        return Ok(ExitCode::SUCCESS);
    }

    for path in &loaded.config.ignored_paths {
        println!("{}", path);
    }
    Ok(ExitCode::SUCCESS)
}
