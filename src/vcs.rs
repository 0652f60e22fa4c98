use crate::error::AppError;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// What the resolver needs from version control.
pub trait VcsClient {
    /// Whether the tool can be run at all.
    fn is_available(&self) -> bool;

    /// Commit ids reachable in `range` (e.g. `HEAD` or `origin/master..HEAD`), newest first.
    fn list_revisions(&self, range: &str) -> Result<Vec<String>, AppError>;

    /// Human-readable working tree status.
    fn current_status(&self) -> Result<String, AppError>;
}

pub struct GitClient {
    program: String,
    git_dir: PathBuf,
    work_tree: PathBuf,
}

impl GitClient {
    /// `git_dir` is the checkout's `.git` entry; its parent is the work tree.
    pub fn new(program: impl Into<String>, git_dir: impl Into<PathBuf>) -> Self {
        let git_dir = git_dir.into();
        let work_tree = match git_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            program: program.into(),
            git_dir,
            work_tree,
        }
    }

    fn run(&self, args: &[&str], what: &str) -> Result<String, AppError> {
        let git_dir_arg = format!("--git-dir={}", self.git_dir.display());
        debug!(
            "Running {} {} {} in {}",
            self.program,
            git_dir_arg,
            args.join(" "),
            self.work_tree.display()
        );

        // status compares against the current directory, so run inside the tree
        let output = Command::new(&self.program)
            .current_dir(&self.work_tree)
            .arg(&git_dir_arg)
            .args(args)
            .output()
            .map_err(|source| AppError::VcsToolUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AppError::VcsQueryFailed {
                what: what.to_string(),
                root: self.work_tree.clone(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VcsClient for GitClient {
    fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn list_revisions(&self, range: &str) -> Result<Vec<String>, AppError> {
        let stdout = self.run(&["rev-list", range], &format!("list revisions of {}", range))?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn current_status(&self) -> Result<String, AppError> {
        self.run(&["status"], "obtain status")
    }
}
