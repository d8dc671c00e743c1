//! The staged extraction pipeline.
//!
//! ```text
//! source files ─► (A) parse, per-file parallel ─► Vec<ParsedFile>
//!              ─► (B) symbol table, single-threaded ─► SymbolTable
//!              ─► (C) resolve, per-file parallel ─► Vec<ResolvedFile>
//! ```
//!
//! Each stage produces a fresh immutable artifact. Stage A workers run
//! on a dedicated rayon pool and hand completed files back over a
//! channel; the raw syntax tree never leaves the worker.

pub mod discovery;

use crate::config::Settings;
use crate::error::{Diagnostic, DiagnosticKind, IndexError, IndexResult};
use crate::parsing::paths::module_path_from_file;
use crate::parsing::{Language, ParseOutcome, ParsedFile, ParserRegistry};
use crate::resolve::{self, ResolutionStats, ResolvedFile};
use crate::symbols::{SymbolTable, build_symbol_table};
use discovery::{DiscoveredFile, discover_files};
use std::path::Path;

/// Aggregate counters printed at the end of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineStats {
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub symbols_indexed: usize,
    pub calls: ResolutionStats,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct PipelineOutput {
    pub parsed: Vec<ParsedFile>,
    pub table: SymbolTable,
    pub resolved: Vec<ResolvedFile>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: PipelineStats,
}

/// The pipeline runner: settings plus the parser registry, both
/// constructed at startup and passed in explicitly.
pub struct Pipeline {
    settings: Settings,
    registry: ParserRegistry,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: ParserRegistry::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run all three stages over a project directory.
    pub fn run(&self, root: &Path) -> IndexResult<PipelineOutput> {
        if !root.is_dir() {
            return Err(IndexError::ProjectNotFound {
                path: root.to_path_buf(),
            });
        }

        let files = discover_files(root, &self.settings);
        let files_discovered = files.len();
        tracing::info!("discovered {files_discovered} source files under {}", root.display());

        let (mut parsed, mut diagnostics) = self.parse_stage(root, files);
        parsed.sort_by(|a, b| a.path.cmp(&b.path));
        let files_parsed = parsed.len();

        let (table, build_diagnostics) = build_symbol_table(&parsed);
        diagnostics.extend(build_diagnostics);
        let symbols_indexed = table.len();
        tracing::info!("indexed {symbols_indexed} symbols from {files_parsed} files");

        let resolved = self.resolve_stage(&parsed, &table);
        let calls = resolve::stats(&resolved);
        tracing::info!(
            "resolved {}/{} calls ({:.1}%)",
            calls.resolved,
            calls.total,
            calls.rate() * 100.0
        );

        Ok(PipelineOutput {
            parsed,
            table,
            resolved,
            diagnostics,
            stats: PipelineStats {
                files_discovered,
                files_parsed,
                symbols_indexed,
                calls,
            },
        })
    }

    /// Stage A. Per-file workers on a dedicated pool; results come back
    /// over a channel so cancellation can simply drop the receiver.
    fn parse_stage(
        &self,
        root: &Path,
        files: Vec<DiscoveredFile>,
    ) -> (Vec<ParsedFile>, Vec<Diagnostic>) {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.parallel_threads.max(1))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!("falling back to sequential parsing: {e}");
                let mut parsed = Vec::new();
                let mut diagnostics = Vec::new();
                for file in files {
                    let (p, d) = self.parse_one(root, &file);
                    parsed.extend(p);
                    diagnostics.extend(d);
                }
                return (parsed, diagnostics);
            }
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        pool.scope(|scope| {
            for file in &files {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = self.parse_one(root, file);
                    let _ = tx.send(outcome);
                });
            }
            drop(tx);
        });

        let mut parsed = Vec::new();
        let mut diagnostics = Vec::new();
        for (p, d) in rx.try_iter() {
            parsed.extend(p);
            diagnostics.extend(d);
        }
        (parsed, diagnostics)
    }

    fn parse_one(
        &self,
        root: &Path,
        file: &DiscoveredFile,
    ) -> (Option<ParsedFile>, Option<Diagnostic>) {
        let display_path = file
            .path
            .strip_prefix(root)
            .unwrap_or(&file.path)
            .to_string_lossy()
            .to_string();

        let code = match std::fs::read_to_string(&file.path) {
            Ok(code) => code,
            Err(e) => {
                return (
                    None,
                    Some(Diagnostic::new(
                        DiagnosticKind::IoFailure,
                        display_path,
                        format!("failed to read source text: {e}"),
                    )),
                );
            }
        };

        let mut parser = match self.registry.create(file.language) {
            Ok(parser) => parser,
            Err(e) => {
                return (
                    None,
                    Some(Diagnostic::new(
                        DiagnosticKind::ParseFailure,
                        display_path,
                        e.to_string(),
                    )),
                );
            }
        };

        let outcome = parser.parse(&code, &display_path);
        let (parsed, diagnostic) = match outcome {
            ParseOutcome::Clean(f) => (Some(f), None),
            ParseOutcome::Partial(f, d) => (Some(f), Some(d)),
            ParseOutcome::Failed(d) => (None, Some(d)),
        };

        let parsed = parsed.map(|mut f| {
            self.infer_module_path(&mut f);
            f
        });
        (parsed, diagnostic)
    }

    /// Languages without a package declaration get a module path derived
    /// from the file path.
    fn infer_module_path(&self, file: &mut ParsedFile) {
        if file.language.has_package_declaration() || file.package_name.is_some() {
            return;
        }
        file.package_name = module_path_from_file(&file.path, &self.settings.source_roots);
    }

    /// Stage C, on the global pool; the table is frozen by now.
    fn resolve_stage(&self, parsed: &[ParsedFile], table: &SymbolTable) -> Vec<ResolvedFile> {
        resolve::resolve_files(parsed, table)
    }
}

/// Convenience entry: parse in-memory sources through all three stages.
/// Test seam used by the integration suites; no filesystem involved.
pub fn run_on_sources(sources: &[(&str, Language, &str)]) -> PipelineOutput {
    let registry = ParserRegistry::new();
    let settings = Settings::default();
    let mut parsed = Vec::new();
    let mut diagnostics = Vec::new();

    for (path, language, code) in sources {
        let mut parser = match registry.create(*language) {
            Ok(parser) => parser,
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ParseFailure,
                    *path,
                    e.to_string(),
                ));
                continue;
            }
        };
        match parser.parse(code, path) {
            ParseOutcome::Clean(mut f) | ParseOutcome::Partial(mut f, _) => {
                if !f.language.has_package_declaration() && f.package_name.is_none() {
                    f.package_name = module_path_from_file(&f.path, &settings.source_roots);
                }
                parsed.push(f);
            }
            ParseOutcome::Failed(d) => diagnostics.push(d),
        }
    }

    parsed.sort_by(|a, b| a.path.cmp(&b.path));
    let files_parsed = parsed.len();
    let (table, build_diagnostics) = build_symbol_table(&parsed);
    diagnostics.extend(build_diagnostics);
    let resolved = resolve::resolve_files(&parsed, &table);
    let calls = resolve::stats(&resolved);

    PipelineOutput {
        stats: PipelineStats {
            files_discovered: files_parsed,
            files_parsed,
            symbols_indexed: table.len(),
            calls,
        },
        parsed,
        table,
        resolved,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_fails_on_missing_project() {
        let pipeline = Pipeline::new(Settings::default());
        let err = pipeline.run(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, IndexError::ProjectNotFound { .. }));
    }

    #[test]
    fn run_parses_a_small_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(
            root.join("src/App.kt"),
            "package com.example\n\
             class App {\n\
                 fun main() { helper() }\n\
             }\n\
             fun helper() {}\n",
        )
        .unwrap();

        let pipeline = Pipeline::new(Settings::default());
        let output = pipeline.run(root).unwrap();
        assert_eq!(output.stats.files_parsed, 1);
        assert!(output.table.contains("com.example.App"));
        assert!(output.table.contains("com.example.helper"));
        assert_eq!(output.stats.calls.resolved, 1);
    }

    #[test]
    fn module_path_is_inferred_for_typescript() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/billing")).unwrap();
        std::fs::write(
            root.join("src/billing/invoice.ts"),
            "export function total(): number { return 0; }\n",
        )
        .unwrap();

        let pipeline = Pipeline::new(Settings::default());
        let output = pipeline.run(root).unwrap();
        assert_eq!(
            output.parsed[0].package_name.as_deref(),
            Some("billing.invoice")
        );
        assert!(output.table.contains("billing.invoice.total"));
    }
}
