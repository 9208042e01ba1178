//! Tether - typed git operations from the command line
//!
//! Usage:
//!   tether status             # Show staged and unstaged paths
//!   tether add <pattern>...   # Stage paths
//!   tether commit -m <msg>    # Commit the staged set
//!   tether --repo ../other init

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tether_core::Repository;
use tether_core::config::GitConfig;
use tether_core::status::ChangeSet;

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Typed git operations", long_about = None)]
struct Cli {
    /// Working directory of the repository
    #[arg(long, short = 'C', global = true, default_value = ".")]
    repo: PathBuf,

    /// Config file (defaults to <config dir>/tether/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the directory if needed and initialize a repository
    Init {
        /// Name of the first branch
        #[arg(long)]
        initial_branch: Option<String>,
    },

    /// Clone a repository into an empty or missing directory
    Clone {
        /// Source URL or path
        url: String,
    },

    /// Show staged and unstaged changes
    Status {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Stage files matching the given patterns
    Add {
        /// Paths or globs ("." for everything)
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Commit the staged changes
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,

        /// Allow a commit with nothing staged
        #[arg(long)]
        allow_empty: bool,
    },

    /// Switch branches
    Checkout {
        /// Branch to switch to
        branch: Option<String>,

        /// Create the branch first
        #[arg(short = 'b', long)]
        create: bool,
    },

    /// Fetch and integrate from a remote
    Pull {
        /// Remote name
        remote: Option<String>,

        /// Remote branch (requires a remote)
        branch: Option<String>,

        /// Rebase instead of merging
        #[arg(long)]
        rebase: bool,
    },

    /// Exit with status 1 if the working directory has changes
    Dirty,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable listing
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tether=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    run_cli(cli.command, &cli.repo, &config)
}

fn load_config(path: Option<&std::path::Path>) -> Result<GitConfig> {
    match path {
        Some(path) => GitConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => GitConfig::discover().context("Failed to load default config"),
    }
}

fn run_cli(command: Commands, repo_path: &std::path::Path, config: &GitConfig) -> Result<ExitCode> {
    match command {
        Commands::Init { initial_branch } => {
            let repo = open_allow_missing(repo_path, config)?;
            let mut init = repo.init();
            if let Some(branch) = initial_branch {
                init = init.initial_branch(branch)?;
            }
            init.execute().context("git init failed")?;
            println!("Initialized repository in {}", repo.cwd().display());
        }
        Commands::Clone { url } => {
            let repo = open_allow_missing(repo_path, config)?;
            repo.clone_existing(&url)
                .with_context(|| format!("Failed to clone {url}"))?;
            println!("Cloned {} into {}", url, repo.cwd().display());
        }
        Commands::Status { format } => {
            let repo = open(repo_path, config)?;
            let changes = repo.status().context("Failed to read status")?;
            print_status(&changes, format)?;
        }
        Commands::Add { patterns } => {
            let repo = open(repo_path, config)?;
            let mut add = repo.add();
            for pattern in patterns {
                add = add.file_pattern(pattern)?;
            }
            add.execute().context("git add failed")?;
        }
        Commands::Commit {
            message,
            allow_empty,
        } => {
            let repo = open(repo_path, config)?;
            repo.commit_command(message)?
                .allow_empty(allow_empty)?
                .execute()
                .context("git commit failed")?;
        }
        Commands::Checkout { branch, create } => {
            let repo = open(repo_path, config)?;
            let mut checkout = repo.checkout().create(create)?;
            if let Some(branch) = branch {
                checkout = checkout.branch(branch)?;
            }
            checkout.execute().context("git checkout failed")?;
        }
        Commands::Pull {
            remote,
            branch,
            rebase,
        } => {
            let repo = open(repo_path, config)?;
            let mut pull = repo.pull();
            if let Some(remote) = remote {
                pull = pull.remote(remote)?;
            }
            if let Some(branch) = branch {
                pull = pull.branch(branch)?;
            }
            if rebase {
                pull = pull.rebase(true)?;
            }
            pull.execute().context("git pull failed")?;
        }
        Commands::Dirty => {
            let repo = open(repo_path, config)?;
            if repo.is_dirty().context("Failed to read status")? {
                println!("dirty");
                return Ok(ExitCode::FAILURE);
            }
            println!("clean");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn open(path: &std::path::Path, config: &GitConfig) -> Result<Repository> {
    Ok(Repository::open(path)?.with_config(config))
}

fn open_allow_missing(path: &std::path::Path, config: &GitConfig) -> Result<Repository> {
    Ok(Repository::open_allow_missing(path)?.with_config(config))
}

fn print_status(changes: &ChangeSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(changes)?);
        }
        OutputFormat::Table => {
            if changes.is_clean() {
                println!("Working directory clean");
                return Ok(());
            }
            print_section("Staged", &changes.staged);
            print_section("Unstaged", &changes.unstaged);
        }
    }
    Ok(())
}

fn print_section(title: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    println!("{} ({}):", title, paths.len());
    for path in paths {
        println!("  {path}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_requires_a_pattern() {
        assert!(Cli::try_parse_from(["tether", "add"]).is_err());
        let cli = Cli::try_parse_from(["tether", "-C", "/tmp/x", "add", "a", "b"]).unwrap();
        assert_eq!(cli.repo, PathBuf::from("/tmp/x"));
        match cli.command {
            Commands::Add { patterns } => assert_eq!(patterns, vec!["a", "b"]),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn pull_positionals() {
        let cli = Cli::try_parse_from(["tether", "pull", "origin", "main", "--rebase"]).unwrap();
        match cli.command {
            Commands::Pull {
                remote,
                branch,
                rebase,
            } => {
                assert_eq!(remote.as_deref(), Some("origin"));
                assert_eq!(branch.as_deref(), Some("main"));
                assert!(rebase);
            }
            _ => panic!("expected pull"),
        }
    }
}
