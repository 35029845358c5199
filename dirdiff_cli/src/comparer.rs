use anyhow::{bail, Context, Result};
use clap::Args;
use dirdiff_common::{record_ignore, LoadedConfig, PathShortcut, Root};
use dirdiff_core::{ActionTools, ComparisonEngine, IgnoreSink, PathFilter, TreeNode};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Roots and filtering options shared by every comparing subcommand
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Left directory path
    pub left: PathBuf,

    /// Right directory path
    pub right: PathBuf,

    /// Name used for the left root in tags and action labels
    #[arg(long, default_value = "left")]
    pub left_name: String,

    /// Name used for the right root in tags and action labels
    #[arg(long, default_value = "right")]
    pub right_name: String,

    /// Ignore patterns (can be specified multiple times)
    #[arg(short, long)]
    pub ignore: Vec<String>,

    /// Honour .gitignore files found in either root
    #[arg(long)]
    pub gitignore: bool,

    /// Follow symbolic links to directories
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,
}

/// Re-runnable comparison bound to one pair of roots and the user's config
///
/// Each run rebuilds the inclusion filter from the current config, so paths
/// ignored through the Ignore action drop out on the next comparison.
pub struct Comparer {
    engine: ComparisonEngine,
    config: Arc<Mutex<LoadedConfig>>,
    extra_patterns: Vec<String>,
    use_gitignore: bool,
    sink: IgnoreSink,
}

impl Comparer {
    pub fn new(args: &CompareArgs, loaded: LoadedConfig) -> Result<Self> {
        for (side, path) in [("Left", &args.left), ("Right", &args.right)] {
            if !path.is_dir() {
                bail!("{} path is not a directory: {}", side, path.display());
            }
        }
        if args.left_name == args.right_name {
            bail!("Root names must differ, both are '{}'", args.left_name);
        }

        let tools = ActionTools::from(&loaded.config.tools);
        let follow_symlinks = args.follow_symlinks || loaded.config.follow_symlinks;
        let use_gitignore = args.gitignore || loaded.config.use_gitignore;

        let engine = ComparisonEngine::local(
            vec![
                Root::new(args.left_name.clone(), args.left.clone()),
                Root::new(args.right_name.clone(), args.right.clone()),
            ],
            follow_symlinks,
        )?
        .with_tools(tools);

        let config = Arc::new(Mutex::new(loaded));
        let sink: IgnoreSink = {
            let config = Arc::clone(&config);
            Arc::new(move |relative_path: &str| {
                let Ok(mut loaded) = config.lock() else {
                    error!("Config lock poisoned, cannot ignore {}", relative_path);
                    return;
                };
                match record_ignore(&mut loaded, relative_path) {
                    Ok(true) => info!("Ignoring {} from now on", relative_path),
                    Ok(false) => info!("{} was already ignored", relative_path),
                    Err(e) => error!("Failed to persist ignore for {}: {}", relative_path, e),
                }
            })
        };

        Ok(Self {
            engine,
            config,
            extra_patterns: args.ignore.clone(),
            use_gitignore,
            sink,
        })
    }

    pub fn roots(&self) -> &[Root] {
        self.engine.roots()
    }

    /// Run a full comparison with the current ignore settings
    pub fn compare(&self) -> Result<TreeNode> {
        let filter = self.build_filter()?;
        let predicate = filter.as_predicate();
        let tree = self.engine.run(&predicate, &self.sink);
        Ok(tree)
    }

    pub fn shortcuts(&self) -> Vec<PathShortcut> {
        self.config
            .lock()
            .map(|loaded| loaded.config.path_shortcuts.clone())
            .unwrap_or_default()
    }

    /// Programs that only display something and never need confirmation
    pub fn viewer_programs(&self) -> Vec<String> {
        let mut viewers = vec!["cat".to_string(), "ls".to_string()];
        if let Ok(loaded) = self.config.lock() {
            viewers.push(loaded.config.tools.diff.clone());
            viewers.push(loaded.config.tools.merge.clone());
        }
        viewers
    }

    fn build_filter(&self) -> Result<PathFilter> {
        let mut config = self
            .config
            .lock()
            .map_err(|_| anyhow::anyhow!("config lock poisoned"))?
            .config
            .clone();
        config.ignore_patterns.extend(self.extra_patterns.iter().cloned());

        let mut filter = PathFilter::new(&config);
        if self.use_gitignore {
            for root in self.engine.roots() {
                let count = filter
                    .load_gitignore(&root.base)
                    .with_context(|| format!("loading .gitignore files from {}", root.base.display()))?;
                info!("Loaded {} .gitignore files from {}", count, root.name);
            }
        }
        Ok(filter)
    }
}
