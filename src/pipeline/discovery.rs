//! Source-file discovery.
//!
//! Gitignore-aware directory traversal filtered to supported language
//! extensions, with the host's test-exclusion conventions applied on
//! request: a file is a test when its path contains a known test
//! directory segment or its name matches a known test-file pattern.

use crate::config::Settings;
use crate::parsing::Language;
use ignore::WalkBuilder;
use regex::RegexSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Directory segments that mark test trees.
const TEST_DIR_SEGMENTS: &[&str] = &[
    "test",
    "tests",
    "__tests__",
    "androidTest",
    "integrationTest",
    "functionalTest",
    "testFixtures",
];

/// File-name glob patterns that mark test files.
const TEST_FILE_GLOBS: &[&str] = &[
    "*Test.*",
    "*Tests.*",
    "*Spec.*",
    "*.test.*",
    "*.spec.*",
    "*IT.*",
    "*E2E.*",
    "Mock*.*",
    "Fake*.*",
    "Stub*.*",
    "TestUtils*.*",
    "TestHelper.*",
    "TestFixture*.*",
];

static TEST_FILE_PATTERNS: OnceLock<RegexSet> = OnceLock::new();

fn test_file_patterns() -> &'static RegexSet {
    TEST_FILE_PATTERNS.get_or_init(|| {
        let regexes: Vec<String> = TEST_FILE_GLOBS
            .iter()
            .map(|glob| {
                let mut pattern = String::from("^");
                for ch in glob.chars() {
                    match ch {
                        '*' => pattern.push_str(".*"),
                        '.' => pattern.push_str("\\."),
                        other => pattern.push(other),
                    }
                }
                pattern.push('$');
                pattern
            })
            .collect();
        RegexSet::new(regexes).expect("static test-file globs must compile")
    })
}

/// One file selected for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub language: Language,
}

/// Whether a path matches the test conventions.
pub fn is_test_file(path: &Path) -> bool {
    let in_test_dir = path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|segment| TEST_DIR_SEGMENTS.contains(&segment))
    });
    if in_test_dir {
        return true;
    }
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| test_file_patterns().is_match(name))
}

/// Walk `root` and return every supported source file, sorted by path.
pub fn discover_files(root: &Path, settings: &Settings) -> Vec<DiscoveredFile> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .require_git(false);

    if !settings.ignore_patterns.is_empty() {
        let mut overrides = ignore::overrides::OverrideBuilder::new(root);
        for pattern in &settings.ignore_patterns {
            if let Err(e) = overrides.add(&format!("!{pattern}")) {
                tracing::warn!("invalid ignore pattern '{pattern}': {e}");
            }
        }
        if let Ok(built) = overrides.build() {
            builder.overrides(built);
        }
    }

    let mut files: Vec<DiscoveredFile> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let path = entry.into_path();
            let language = Language::from_path(&path)?;
            if settings.exclude_tests {
                let relative = path.strip_prefix(root).unwrap_or(&path);
                if is_test_file(relative) {
                    return None;
                }
            }
            Some(DiscoveredFile { path, language })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
