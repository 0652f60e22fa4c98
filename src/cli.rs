use crate::resolver::OutputMode;
use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version = env!("PROJECT_VERSION"), about)]
#[command(args_conflicts_with_subcommands = true)]
#[command(group(
    ArgGroup::new("mode")
        .args(["build", "revision", "commit_hash", "package_version"])
        .multiple(false)
))]
pub struct Cli {
    /// Print the API version (X264_BUILD) only
    #[arg(long)]
    pub build: bool,

    /// Print the revision only
    #[arg(long)]
    pub revision: bool,

    /// Print the commit hash only
    #[arg(long)]
    pub commit_hash: bool,

    /// Print 0.<api>.<revision>
    #[arg(long)]
    pub package_version: bool,

    /// Output the resolved version as JSON (only the API version with --build)
    #[arg(long, conflicts_with_all = ["revision", "commit_hash", "package_version"])]
    pub json: bool,

    /// x264 source tree containing x264.h
    #[arg(short = 'C', long, env = "X264_SOURCE_ROOT")]
    pub source_root: Option<String>,

    /// Upstream branch used as the divergence baseline
    #[arg(long, env = "X264_UPSTREAM")]
    pub upstream: Option<String>,

    /// git executable to run
    #[arg(long, env = "X264_GIT")]
    pub git: Option<String>,

    /// Path to config file (supports .toml, .yaml, .json)
    #[arg(long, default_value = "x264-version.toml")]
    pub config: String,

    /// Log resolution steps to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.build {
            OutputMode::Build
        } else if self.revision {
            OutputMode::Revision
        } else if self.commit_hash {
            OutputMode::CommitHash
        } else if self.package_version {
            OutputMode::PackageVersion
        } else {
            OutputMode::Full
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate shell completions or man pages
    Generate(GenerateArgs),
}

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Type of shell completion to generate
    #[arg(short, long)]
    pub shell: Option<Shell>,

    /// Generate man pages to the specified directory
    #[arg(short, long)]
    pub man: Option<String>,
}
