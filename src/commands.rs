use crate::cli::{Cli, Commands, GenerateArgs};
use crate::config::{merge_configuration, Settings};
use crate::error::AppError;
use crate::fmt::print_output;
use crate::resolver::{resolve, OutputMode, Resolution};
use crate::vcs::{GitClient, VcsClient};
use clap::CommandFactory;
use clap_complete::generate;
use clap_mangen::Man;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

pub fn handle_command(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Some(Commands::Generate(args)) => generate_assets(args),
        None => {
            let settings = merge_configuration(cli)?;
            let vcs = GitClient::new(settings.git.clone(), settings.git_dir());
            let resolution = resolve_version(&settings, cli.output_mode(), &vcs)?;
            print_output(&resolution, cli.output_mode(), cli.json)
        }
    }
}

pub fn resolve_version(
    settings: &Settings,
    mode: OutputMode,
    vcs: &dyn VcsClient,
) -> Result<Resolution, AppError> {
    debug!(
        "Resolving {:?} for {} (upstream {})",
        mode,
        settings.source_root.display(),
        settings.upstream
    );
    resolve(&settings.source_root, &settings.upstream, mode, vcs)
}

/// Emits the warnings for a failed run and writes any degraded version string
/// to `out`. Returns the exit status the process should end with.
pub fn report_failure(err: &AppError, out: &mut impl Write) -> i32 {
    warn!("Warning: {}", err);
    if let AppError::NoVersionSource {
        vcs_tool_missing: true,
        ..
    } = err
    {
        warn!("Warning: git repository but git command not available!");
    }
    if let Some(fallback) = err.fallback_version() {
        if let Err(e) = writeln!(out, "{}", fallback) {
            warn!("Warning: could not print fallback version: {}", e);
        }
    }
    err.exit_code()
}

fn generate_assets(args: &GenerateArgs) -> Result<(), AppError> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    if let Some(shell) = args.shell {
        generate(shell, &mut cmd, bin_name.clone(), &mut io::stdout());
    }

    if let Some(ref man_dir) = args.man {
        let out_dir = Path::new(man_dir);
        if !out_dir.exists() {
            fs::create_dir_all(out_dir).map_err(AppError::Io)?;
        }
        let page = out_dir.join(format!("{}.1", bin_name));
        Man::new(cmd)
            .render(&mut fs::File::create(&page).map_err(AppError::Io)?)
            .map_err(AppError::Io)?;
        eprintln!("Man page generated in {}", page.display());
    }

    if args.shell.is_none() && args.man.is_none() {
        warn!("Please specify --shell <SHELL> or --man <DIR>");
    }
    Ok(())
}
