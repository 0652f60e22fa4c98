//! Marker scanning for the C headers shipped with x264.

use crate::error::AppError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

pub const BUILD_HEADER: &str = "x264.h";
pub const CONFIG_HEADER: &str = "x264_config.h";

const BUILD_MARKER: &str = "#define X264_BUILD ";
const VERSION_MARKER: &str = "#define X264_VERSION ";

/// Revision and commit hash taken from a tarball's generated config header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVersion {
    pub revision: String,
    pub commit_hash: String,
}

fn read_lines(path: &Path) -> Result<impl Iterator<Item = String>, AppError> {
    let file = File::open(path).map_err(|source| AppError::ReadHeader {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file).lines().map_while(Result::ok))
}

/// Returns the value of the first non-empty `X264_BUILD` define, or `None`.
pub fn scan_build(lines: impl IntoIterator<Item = String>) -> Option<String> {
    lines.into_iter().find_map(|line| {
        let value = line.strip_prefix(BUILD_MARKER)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Parses `"r3095 a1b2c3d"` style values. The last matching define wins.
pub fn scan_config_version(lines: impl IntoIterator<Item = String>) -> Option<ConfigVersion> {
    lines
        .into_iter()
        .filter_map(|line| {
            let value = line.strip_prefix(VERSION_MARKER)?;
            parse_version_value(value)
        })
        .last()
}

fn parse_version_value(value: &str) -> Option<ConfigVersion> {
    let value = value.trim().trim_matches('"').trim();
    let mut tokens = value.split_whitespace();
    let first = tokens.next()?;
    let last = tokens.last().unwrap_or(first);

    let revision = match first.chars().next() {
        Some(c) if !c.is_ascii_digit() => &first[c.len_utf8()..],
        _ => first,
    };

    Some(ConfigVersion {
        revision: revision.to_string(),
        commit_hash: last.to_string(),
    })
}

pub fn read_build(root: &Path) -> Result<Option<String>, AppError> {
    let path = root.join(BUILD_HEADER);
    debug!("Scanning {} for X264_BUILD", path.display());
    Ok(scan_build(read_lines(&path)?))
}

pub fn read_config_version(root: &Path) -> Result<Option<ConfigVersion>, AppError> {
    let path = root.join(CONFIG_HEADER);
    debug!("Scanning {} for X264_VERSION", path.display());
    Ok(scan_config_version(read_lines(&path)?))
}
