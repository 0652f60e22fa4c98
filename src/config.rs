use crate::cli::Cli;
use crate::error::AppError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "x264-version.toml";
pub const DEFAULT_GIT: &str = "git";
pub const DEFAULT_UPSTREAM: &str = "origin/master";

#[derive(Deserialize, Debug, Clone, Default)]
struct ConfigFile {
    source_root: Option<String>,
    git: Option<String>,
    upstream: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub source_root: PathBuf,
    pub git: String,
    pub upstream: String,
}

impl Settings {
    pub fn git_dir(&self) -> PathBuf {
        self.source_root.join(".git")
    }
}

fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, AppError> {
    if !path.exists() {
        // Only an explicitly named config file has to exist.
        if path != Path::new(DEFAULT_CONFIG) {
            return Err(AppError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(AppError::Io)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let config = match ext.as_str() {
        "toml" => toml::from_str(&content).map_err(AppError::Toml)?,
        "json" => serde_json::from_str(&content).map_err(AppError::Serialization)?,
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(AppError::Yaml)?,
        _ => {
            return Err(AppError::ConfigError(format!(
                "Unsupported config format: .{}",
                ext
            )))
        }
    };
    Ok(Some(config))
}

/// Priority: CLI flag or environment, then config file, then default.
pub fn merge_configuration(cli: &Cli) -> Result<Settings, AppError> {
    let file_config = load_config_file(Path::new(&cli.config))?.unwrap_or_default();

    let source_root = cli
        .source_root
        .clone()
        .or(file_config.source_root)
        .unwrap_or_else(|| ".".to_string());

    let git = cli
        .git
        .clone()
        .or(file_config.git)
        .unwrap_or_else(|| DEFAULT_GIT.to_string());

    let upstream = cli
        .upstream
        .clone()
        .or(file_config.upstream)
        .unwrap_or_else(|| DEFAULT_UPSTREAM.to_string());

    if upstream.trim().is_empty() {
        return Err(AppError::ConfigError("upstream must not be empty".to_string()));
    }

    Ok(Settings {
        source_root: PathBuf::from(source_root),
        git,
        upstream,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_config(config: &str) -> Cli {
        Cli {
            build: false,
            revision: false,
            commit_hash: false,
            package_version: false,
            json: false,
            source_root: None,
            upstream: None,
            git: None,
            config: config.to_string(),
            verbose: false,
            command: None,
        }
    }

    #[test]
    fn test_merge_configuration_defaults() {
        let settings = merge_configuration(&cli_with_config(DEFAULT_CONFIG)).unwrap();
        assert_eq!(settings.source_root, PathBuf::from("."));
        assert_eq!(settings.git, "git");
        assert_eq!(settings.upstream, "origin/master");
        assert_eq!(settings.git_dir(), PathBuf::from("./.git"));
    }

    #[test]
    fn test_merge_configuration_explicit_missing_file() {
        let result = merge_configuration(&cli_with_config("non_existent.toml"));
        match result.unwrap_err() {
            AppError::ConfigError(msg) => assert!(msg.contains("Config file not found")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_configuration_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("x264.toml");
        fs::write(
            &config_path,
            "source_root = \"/src/x264\"\nupstream = \"origin/stable\"\n",
        )
        .unwrap();

        let mut cli = cli_with_config(config_path.to_str().unwrap());
        cli.upstream = Some("upstream/master".to_string());

        let settings = merge_configuration(&cli).unwrap();
        assert_eq!(settings.source_root, PathBuf::from("/src/x264"));
        assert_eq!(settings.upstream, "upstream/master");
        assert_eq!(settings.git, "git");
    }

    #[test]
    fn test_merge_configuration_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "{\"git\": \"/usr/local/bin/git\"}").unwrap();

        let settings = merge_configuration(&cli_with_config(config_path.to_str().unwrap())).unwrap();
        assert_eq!(settings.git, "/usr/local/bin/git");
    }

    #[test]
    fn test_merge_configuration_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "source_root: vendor/x264\n").unwrap();

        let settings = merge_configuration(&cli_with_config(config_path.to_str().unwrap())).unwrap();
        assert_eq!(settings.source_root, PathBuf::from("vendor/x264"));
    }

    #[test]
    fn test_merge_configuration_unsupported_ext() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.txt");
        fs::write(&config_path, "git = \"git\"").unwrap();

        let result = merge_configuration(&cli_with_config(config_path.to_str().unwrap()));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_merge_configuration_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("invalid.toml");
        fs::write(&config_path, "upstream = ").unwrap();

        let result = merge_configuration(&cli_with_config(config_path.to_str().unwrap()));
        assert!(matches!(result, Err(AppError::Toml(_))));
    }

    #[test]
    fn test_merge_configuration_empty_upstream() {
        let mut cli = cli_with_config(DEFAULT_CONFIG);
        cli.upstream = Some("  ".to_string());
        assert!(matches!(
            merge_configuration(&cli),
            Err(AppError::ConfigError(_))
        ));
    }
}
