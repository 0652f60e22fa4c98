use crate::error::AppError;
use crate::resolver::{OutputMode, Resolution, VersionInfo};
use serde_json::{json, Value};

pub fn package_version(info: &VersionInfo) -> String {
    format!("0.{}.{}", info.api_version, info.revision.revision)
}

pub fn format_version(mode: OutputMode, info: &VersionInfo) -> String {
    match mode {
        OutputMode::Build => info.api_version.clone(),
        OutputMode::Revision => info.revision.revision.clone(),
        OutputMode::CommitHash => info.revision.commit_hash.clone(),
        OutputMode::PackageVersion => package_version(info),
        OutputMode::Full => format!("{} {}", package_version(info), info.revision.commit_hash),
    }
}

pub fn format_resolution(mode: OutputMode, resolution: &Resolution) -> String {
    match resolution {
        Resolution::ApiOnly(api_version) => api_version.clone(),
        Resolution::Full(info) => format_version(mode, info),
    }
}

/// JSON view of a resolution, including the derived package version.
pub fn to_json(resolution: &Resolution) -> Result<Value, AppError> {
    match resolution {
        Resolution::ApiOnly(api_version) => Ok(json!({ "api_version": api_version })),
        Resolution::Full(info) => {
            let mut value = serde_json::to_value(info)?;
            value["package_version"] = Value::String(package_version(info));
            Ok(value)
        }
    }
}

pub fn print_output(resolution: &Resolution, mode: OutputMode, json_mode: bool) -> Result<(), AppError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&to_json(resolution)?)?);
    } else {
        println!("{}", format_resolution(mode, resolution));
    }
    Ok(())
}
