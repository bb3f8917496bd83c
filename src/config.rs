//! Configuration for the sandbox site.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of the resolved config)
//! 2. Environment variables (SANDBOX_ROOT, SANDBOX_BIND)
//! 3. Config file (.sandbox/config.yaml)
//! 4. Defaults (current directory, 127.0.0.1:8080)
//!
//! Config file discovery:
//! - Searches current directory and parents for .sandbox/config.yaml
//! - `paths.root` is relative to the .sandbox/ directory; the section
//!   directories are relative to the resolved root

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::library::sample::DEFAULT_MAX_SAMPLE_BYTES;
use crate::library::IndexOptions;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Default address for `sandbox serve`
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default deadline for reading a request head
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub index: Option<IndexOptions>,
    #[serde(default)]
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Site root (relative to the .sandbox/ directory)
    pub root: Option<String>,
    /// Projects directory (relative to root)
    pub projects: Option<String>,
    /// Fundamentals directory (relative to root)
    pub fundamentals: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub max_sample_bytes: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Site root
    pub root: PathBuf,
    /// Directory listed on the landing page
    pub projects_dir: PathBuf,
    /// Directory listed on the Fundamentals page
    pub fundamentals_dir: PathBuf,
    /// How directories are indexed
    pub index: IndexOptions,
    /// Server settings
    pub server: ServerSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: String,
    pub max_sample_bytes: u64,
    /// Connections that stall before finishing the request head get a 408
    pub read_timeout: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_sample_bytes: DEFAULT_MAX_SAMPLE_BYTES,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl ResolvedConfig {
    /// Defaults rooted at `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            projects_dir: root.join("Practice_Projects"),
            fundamentals_dir: root.join("Fundamentals"),
            root,
            index: IndexOptions::default(),
            server: ServerSettings::default(),
            config_file: None,
        }
    }

    /// Re-root the section directories, keeping any custom names
    pub fn rebase(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.projects_dir = rebase_path(&self.root, &root, &self.projects_dir);
        self.fundamentals_dir = rebase_path(&self.root, &root, &self.fundamentals_dir);
        self.root = root;
        self
    }
}

fn rebase_path(old_root: &Path, new_root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(old_root) {
        Ok(rel) => new_root.join(rel),
        Err(_) => path.to_path_buf(),
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".sandbox").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration, discovering the config file from `start`
pub fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start);

    let mut resolved = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let sandbox_dir = config_path.parent().unwrap_or(Path::new("."));

        // Without paths.root the site root is the directory holding .sandbox/
        let root = match config.paths.root {
            Some(ref root) => resolve_path(sandbox_dir, root),
            None => sandbox_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start.to_path_buf()),
        };

        let mut resolved = ResolvedConfig::with_root(&root);
        if let Some(ref projects) = config.paths.projects {
            resolved.projects_dir = resolve_path(&root, projects);
        }
        if let Some(ref fundamentals) = config.paths.fundamentals {
            resolved.fundamentals_dir = resolve_path(&root, fundamentals);
        }
        if let Some(index) = config.index {
            resolved.index = index;
        }
        if let Some(server) = config.server {
            if let Some(bind) = server.bind {
                resolved.server.bind = bind;
            }
            if let Some(max) = server.max_sample_bytes {
                resolved.server.max_sample_bytes = max;
            }
            if let Some(secs) = server.read_timeout_secs {
                resolved.server.read_timeout = Duration::from_secs(secs);
            }
        }
        resolved.config_file = Some(config_path.clone());
        resolved
    } else {
        ResolvedConfig::with_root(start)
    };

    Ok(apply_env_overrides(resolved, |key| std::env::var(key).ok()))
}

/// Apply SANDBOX_ROOT and SANDBOX_BIND on top of the file/default config
fn apply_env_overrides<F>(mut resolved: ResolvedConfig, var: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env_root) = var("SANDBOX_ROOT") {
        resolved = resolved.rebase(PathBuf::from(env_root));
    }
    if let Some(env_bind) = var("SANDBOX_BIND") {
        resolved.server.bind = env_bind;
    }
    resolved
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::IndexOrder;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_rooted_at_directory() {
        let config = ResolvedConfig::with_root("/srv/sandbox");

        assert_eq!(config.projects_dir, PathBuf::from("/srv/sandbox/Practice_Projects"));
        assert_eq!(config.fundamentals_dir, PathBuf::from("/srv/sandbox/Fundamentals"));
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.index.metadata_file, "Readme.md");
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let sandbox_dir = temp.path().join(".sandbox");
        std::fs::create_dir_all(&sandbox_dir).unwrap();

        let config_path = sandbox_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  root: ..
  projects: projects
index:
  order: filesystem
  ignore: [".*"]
server:
  bind: 0.0.0.0:9000
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.root, Some("..".to_string()));
        assert_eq!(config.paths.projects, Some("projects".to_string()));
        assert!(config.paths.fundamentals.is_none());

        let index = config.index.unwrap();
        assert_eq!(index.order, IndexOrder::Filesystem);
        assert_eq!(index.ignore, vec![".*".to_string()]);
        // Unspecified index fields keep their defaults
        assert_eq!(index.description_line, 3);

        assert_eq!(config.server.unwrap().bind, Some("0.0.0.0:9000".to_string()));
    }

    #[test]
    fn test_discovery_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join(".sandbox")).unwrap();
        std::fs::create_dir_all(root.join("Practice_Projects").join("todo")).unwrap();
        std::fs::write(
            root.join(".sandbox").join("config.yaml"),
            "version: \"1.0\"\npaths:\n  fundamentals: Basics\n",
        )
        .unwrap();

        let found = find_config_file(&root.join("Practice_Projects").join("todo"));
        assert_eq!(found, Some(root.join(".sandbox").join("config.yaml")));

        let config = load_config_file(found.as_ref().unwrap()).unwrap();
        assert_eq!(config.paths.fundamentals, Some("Basics".to_string()));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        std::fs::create_dir_all(root.join(".sandbox")).unwrap();
        std::fs::create_dir_all(root.join("projects")).unwrap();
        std::fs::create_dir_all(root.join("lessons").join("php")).unwrap();
        std::fs::write(
            root.join(".sandbox").join("config.yaml"),
            r#"
version: "1.0"
paths:
  projects: projects
  fundamentals: lessons/php
server:
  bind: 0.0.0.0:9000
  max_sample_bytes: 1024
  read_timeout_secs: 3
"#,
        )
        .unwrap();

        let config = load_config_from(&root.join("lessons")).unwrap();

        // No paths.root: the directory holding .sandbox/ is the root
        assert_eq!(config.root, root);
        assert_eq!(config.projects_dir, root.join("projects"));
        assert_eq!(config.fundamentals_dir, root.join("lessons").join("php"));
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.max_sample_bytes, 1024);
        assert_eq!(config.server.read_timeout, Duration::from_secs(3));
        assert_eq!(config.index.metadata_file, "Readme.md");
        assert_eq!(config.config_file, Some(root.join(".sandbox").join("config.yaml")));
    }

    #[test]
    fn test_load_config_from_explicit_root() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().canonicalize().unwrap();
        let site = base.join("site");
        std::fs::create_dir_all(base.join(".sandbox")).unwrap();
        std::fs::create_dir_all(site.join("Basics")).unwrap();
        std::fs::write(
            base.join(".sandbox").join("config.yaml"),
            "version: \"1.0\"\npaths:\n  root: ../site\n  fundamentals: Basics\n",
        )
        .unwrap();

        let config = load_config_from(&base).unwrap();
        assert_eq!(config.root, site);
        assert_eq!(config.fundamentals_dir, site.join("Basics"));
        assert_eq!(config.projects_dir, site.join("Practice_Projects"));
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.server.max_sample_bytes, DEFAULT_MAX_SAMPLE_BYTES);
        assert_eq!(config.server.read_timeout, DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ResolvedConfig::with_root("/srv/site");
        config.fundamentals_dir = PathBuf::from("/srv/site/Basics");

        let config = apply_env_overrides(config, |key| match key {
            "SANDBOX_ROOT" => Some("/data/site".to_string()),
            "SANDBOX_BIND" => Some("0.0.0.0:80".to_string()),
            _ => None,
        });
        assert_eq!(config.root, PathBuf::from("/data/site"));
        assert_eq!(config.projects_dir, PathBuf::from("/data/site/Practice_Projects"));
        assert_eq!(config.fundamentals_dir, PathBuf::from("/data/site/Basics"));
        assert_eq!(config.server.bind, "0.0.0.0:80");

        let untouched = apply_env_overrides(ResolvedConfig::with_root("/srv/site"), |_| None);
        assert_eq!(untouched.root, PathBuf::from("/srv/site"));
        assert_eq!(untouched.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_rebase_keeps_custom_names() {
        let mut config = ResolvedConfig::with_root("/old");
        config.fundamentals_dir = PathBuf::from("/old/Basics");
        config.projects_dir = PathBuf::from("/elsewhere/projects");

        let config = config.rebase("/new");
        assert_eq!(config.root, PathBuf::from("/new"));
        assert_eq!(config.fundamentals_dir, PathBuf::from("/new/Basics"));
        assert_eq!(config.projects_dir, PathBuf::from("/elsewhere/projects"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/site");

        assert_eq!(
            resolve_path(&base, "./Fundamentals"),
            PathBuf::from("/home/user/site/./Fundamentals")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
