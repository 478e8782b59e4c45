//! Configuration module for the declaration lister.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.lcdecl/settings.toml`)
//! - Environment variable overrides
//! - CLI argument overrides (applied by the binary)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `LCDECL_` and use double
//! underscores to separate nested levels:
//! - `LCDECL_PARSING__STANDARD=c++11` sets `parsing.standard`
//! - `LCDECL_BATCH__PARALLEL_THREADS=8` sets `batch.parallel_threads`
//! - `LCDECL_OUTPUT__SHOW_DIAGNOSTICS=false` sets `output.show_diagnostics`

use crate::error::{ErrorContext, IndexError, IndexResult};
use crate::io::OutputFormat;
use crate::parsing::{KeywordTable, LanguageStandard};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the settings file, searched upward from the cwd
pub const CONFIG_DIR: &str = ".lcdecl";
/// Settings file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "settings.toml";
/// Gitignore-syntax file with extra exclusions for directory walks
pub const IGNORE_FILE: &str = ".lcdeclignore";

const ENV_PREFIX: &str = "LCDECL_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .lcdecl is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Language standard and keyword settings
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Listing output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Directory walking and parallelism
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ParsingConfig {
    /// Language standard selecting the keyword table
    #[serde(default)]
    pub standard: LanguageStandard,

    /// Additional words treated as keywords (vendor extensions, macros)
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    /// Default output format when `--json` is not given
    #[serde(default)]
    pub format: OutputFormat,

    /// Print diagnostics below each listing
    #[serde(default = "default_true")]
    pub show_diagnostics: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BatchConfig {
    /// Number of parallel threads for batch parsing
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// File extensions picked up when walking directories
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Patterns to ignore during directory walks (gitignore syntax)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_extensions() -> Vec<String> {
    ["c", "h", "cc", "cpp", "cxx", "hpp", "hh", "hxx"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            parsing: ParsingConfig::default(),
            output: OutputConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_diagnostics: true,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            extensions: default_extensions(),
            ignore_patterns: vec!["build/**".to_string(), ".git/**".to_string()],
        }
    }
}

/// `LCDECL_BATCH__PARALLEL_THREADS` -> `batch.parallel_threads`
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| {
        key.as_str()
            .to_lowercase()
            .replace("__", ".") // Double underscore becomes dot
            .into()
    })
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .lcdecl directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));

        Self::load_from(config_path).map(|mut settings| {
            if settings.workspace_root.is_none() {
                settings.workspace_root = Self::workspace_root();
            }
            settings
        })
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path.as_ref()))
            // Layer in environment variables with LCDECL_ prefix
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for .lcdecl directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .lcdecl is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::workspace_root_from(&current)
    }

    /// Nearest ancestor of `start` containing a .lcdecl directory
    pub fn workspace_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Keyword table for the configured standard plus extra keywords
    pub fn keyword_table(&self) -> KeywordTable {
        self.parsing
            .standard
            .keywords()
            .with_extra(self.parsing.extra_keywords.iter().cloned())
    }

    /// Threads for batch parsing; zero means one per CPU
    pub fn effective_threads(&self) -> usize {
        match self.batch.parallel_threads {
            0 => num_cpus::get(),
            n => n,
        }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> IndexResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_path(parent)?;
        }

        let toml_string = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, toml_string).map_err(|source| IndexError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> IndexResult<PathBuf> {
        let current_dir = std::env::current_dir().context("Cannot determine current directory")?;
        Self::init_config_file_in(&current_dir, force)
    }

    /// Create a default settings file with helpful comments under `root`.
    ///
    /// Also writes a default `.lcdeclignore` unless one exists.
    pub fn init_config_file_in(root: &Path, force: bool) -> IndexResult<PathBuf> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err(IndexError::ConfigError {
                reason: format!(
                    "{} already exists. Use --force to overwrite",
                    config_path.display()
                ),
            });
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_path(parent)?;
        }

        let template = format!(
            r#"# lcdecl configuration file

# Version of the configuration schema
version = 1

# Global debug mode (same as --debug)
debug = false

[parsing]
# Language standard: c89, c99, c11, c17, c++98, c++03, c++11, c++14,
# c++17, c++20, c++23 (gnu spellings are accepted too)
standard = "{standard}"

# Extra words to treat as keywords, e.g. vendor extensions
extra_keywords = []

[output]
# Default output format: "text" or "json"
format = "text"

# Print diagnostics below each listing
show_diagnostics = true

[batch]
# Number of parallel threads for batch parsing (defaults to CPU count)
# parallel_threads = {threads}

# Extensions picked up when a directory is listed
extensions = ["c", "h", "cc", "cpp", "cxx", "hpp", "hh", "hxx"]

# Additional patterns to ignore during directory walks (gitignore syntax)
ignore_patterns = ["build/**", ".git/**"]
"#,
            standard = LanguageStandard::default(),
            threads = num_cpus::get()
        );

        std::fs::write(&config_path, template).map_err(|source| IndexError::FileWrite {
            path: config_path.clone(),
            source,
        })?;
        Self::create_default_ignore_file(root, force).map_err(|source| IndexError::FileWrite {
            path: root.join(IGNORE_FILE),
            source,
        })?;

        Ok(config_path)
    }

    /// Create a default .lcdeclignore file with helpful patterns
    fn create_default_ignore_file(root: &Path, force: bool) -> std::io::Result<()> {
        let ignore_path = root.join(IGNORE_FILE);
        if !force && ignore_path.exists() {
            return Ok(());
        }

        let default_content = r#"# lcdecl ignore patterns (gitignore syntax)
#
# Files matching these patterns are skipped when a directory is listed.
# Files named explicitly on the command line are always read.

# Build output
build/
out/
cmake-build-*/
*.o
*.obj

# Generated sources
*.pb.h
*.pb.cc
moc_*.cpp

# Third-party code
third_party/
vendor/
external/
"#;
        std::fs::write(ignore_path, default_content)
    }
}
