//! Configuration.
//!
//! Two independent pieces:
//!
//! - [`Settings`]: layered run settings (defaults, then an optional
//!   `codegraph.toml`, then `CODEGRAPH_`-prefixed environment variables
//!   with `__` separating nested keys).
//! - [`load_domains`]: the optional domain grouping file, a JSON document
//!   with a `domains` key discovered by name in the working directory.
//!   A missing or invalid file silently yields an empty list.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File names probed for the domain configuration, in order.
pub const DOMAIN_CONFIG_NAMES: &[&str] =
    &["codegraph.json", ".codegraph.json", "codegraph.config.json"];

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Worker threads for the parse and resolve stages.
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// Extra ignore globs applied during file discovery.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Directory names stripped when inferring a module path from a file
    /// path (languages without a textual package declaration).
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,

    /// Exclude test files and directories during discovery.
    #[serde(default)]
    pub exclude_tests: bool,

    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_parallel_threads() -> usize {
    num_cpus::get()
}

fn default_source_roots() -> Vec<String> {
    ["src", "lib", "app", "source", "main"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            ignore_patterns: Vec::new(),
            source_roots: default_source_roots(),
            exclude_tests: false,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings layered over defaults: `codegraph.toml` in `dir`
    /// (when present), then environment overrides.
    pub fn load(dir: &Path) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        let toml_path = dir.join("codegraph.toml");
        if toml_path.exists() {
            figment = figment.merge(Toml::file(toml_path));
        }
        figment
            .merge(Env::prefixed("CODEGRAPH_").split("__"))
            .extract()
            .unwrap_or_default()
    }
}

/// One logical domain used to group packages in the emitted graph.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    pub name: String,
    /// Package or path prefixes belonging to this domain.
    #[serde(default)]
    pub prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DomainFile {
    #[serde(default)]
    domains: Vec<DomainConfig>,
}

/// Search `dir` for the first known domain-config file name and parse it.
/// Anything that is not JSON with a `domains` key yields an empty list.
pub fn load_domains(dir: &Path) -> Vec<DomainConfig> {
    for name in DOMAIN_CONFIG_NAMES {
        let candidate = dir.join(name);
        if !candidate.is_file() {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(&candidate) else {
            return Vec::new();
        };
        return serde_json::from_str::<DomainFile>(&text)
            .map(|f| f.domains)
            .unwrap_or_default();
    }
    Vec::new()
}
