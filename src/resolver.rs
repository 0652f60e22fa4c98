//! Version resolution for an x264 source tree.
//!
//! Resolution is linear: read the API version from `x264.h`, stop there for
//! [`OutputMode::Build`], otherwise derive the revision and commit hash from
//! git or from the `x264_config.h` shipped in release tarballs.

use crate::error::AppError;
use crate::header;
use crate::vcs::VcsClient;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

pub const UNKNOWN_COMMIT: &str = "x";
const HASH_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Build,
    Revision,
    CommitHash,
    PackageVersion,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    Git,
    ConfigHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionInfo {
    pub revision: String,
    pub commit_hash: String,
    pub source: VersionSource,
}

impl RevisionInfo {
    fn unknown(source: VersionSource) -> Self {
        Self {
            revision: "0".to_string(),
            commit_hash: UNKNOWN_COMMIT.to_string(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub api_version: String,
    #[serde(flatten)]
    pub revision: RevisionInfo,
}

/// Outcome of a resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Build mode stops after the API version.
    ApiOnly(String),
    Full(VersionInfo),
}

pub fn resolve_api_version(root: &Path) -> Result<String, AppError> {
    header::read_build(root)?.ok_or_else(|| AppError::MissingVersionMarker {
        root: root.to_path_buf(),
    })
}

fn has_git_metadata(root: &Path) -> bool {
    let git_dir = root.join(".git");
    git_dir.is_dir() || git_dir.is_file()
}

pub fn resolve_revision(
    root: &Path,
    upstream: &str,
    vcs: &dyn VcsClient,
) -> Result<Option<RevisionInfo>, AppError> {
    let is_git = has_git_metadata(root);

    if is_git && vcs.is_available() {
        debug!("Resolving revision from git in {}", root.display());
        return revision_from_git(upstream, vcs).map(Some);
    }

    if root.join(header::CONFIG_HEADER).is_file() {
        debug!("Resolving revision from {}", header::CONFIG_HEADER);
        let info = match header::read_config_version(root)? {
            Some(v) => RevisionInfo {
                revision: v.revision,
                commit_hash: v.commit_hash,
                source: VersionSource::ConfigHeader,
            },
            None => RevisionInfo::unknown(VersionSource::ConfigHeader),
        };
        return Ok(Some(info));
    }

    Ok(None)
}

fn revision_from_git(upstream: &str, vcs: &dyn VcsClient) -> Result<RevisionInfo, AppError> {
    let local = vcs.list_revisions("HEAD")?;
    let local_count = local.len();

    let mut info = RevisionInfo::unknown(VersionSource::Git);
    if let Some(head) = local.first() {
        info.commit_hash = head.chars().take(HASH_LEN).collect();
    }

    // A single-commit history keeps revision 0 and skips the status check.
    if local_count > 1 {
        let ahead_count = vcs.list_revisions(&format!("{}..HEAD", upstream))?.len();
        let base = local_count.saturating_sub(ahead_count);
        info.revision = if ahead_count != 0 {
            format!("{}+{}", base, ahead_count)
        } else {
            base.to_string()
        };

        if vcs.current_status()?.contains("modified:") {
            info.revision.push('M');
        }
    }

    debug!(
        "git: {} local commits, revision {}, head {}",
        local_count, info.revision, info.commit_hash
    );
    Ok(info)
}

/// Runs the whole pipeline without touching process state.
pub fn resolve(
    root: &Path,
    upstream: &str,
    mode: OutputMode,
    vcs: &dyn VcsClient,
) -> Result<Resolution, AppError> {
    let api_version = resolve_api_version(root)?;
    if mode == OutputMode::Build {
        return Ok(Resolution::ApiOnly(api_version));
    }

    match resolve_revision(root, upstream, vcs)? {
        Some(revision) => Ok(Resolution::Full(VersionInfo {
            api_version,
            revision,
        })),
        None => Err(AppError::NoVersionSource {
            api_version,
            vcs_tool_missing: has_git_metadata(root) && !vcs.is_available(),
        }),
    }
}
