//! Transitive type hierarchy.
//!
//! After all declarations are indexed, each class's declared super-class
//! and interface surface strings are resolved with the same strategies
//! the resolver uses for types; names that do not resolve are kept
//! verbatim so the hierarchy keeps its shape for types the indexer never
//! saw. The transitive closure is flattened nearest-first and
//! deduplicated; cycles are broken by visiting each FQN at most once.

use crate::error::{Diagnostic, DiagnosticKind};
use crate::parsing::ParsedFile;
use crate::resolve::context::FileContext;
use crate::resolve::type_resolution::resolve_type;
use crate::symbols::table::SymbolTable;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolved direct parents of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectSupers {
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
}

impl DirectSupers {
    /// Super class first, then interfaces, declaration order.
    pub fn parents(&self) -> Vec<String> {
        let mut parents = Vec::new();
        if let Some(super_class) = &self.super_class {
            parents.push(super_class.clone());
        }
        parents.extend(self.interfaces.iter().cloned());
        parents
    }
}

pub(crate) fn build(
    table: &mut SymbolTable,
    files: &[&ParsedFile],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let contexts: HashMap<&str, FileContext<'_>> = files
        .iter()
        .map(|f| (f.path.as_str(), FileContext::new(f)))
        .collect();

    // Snapshot the class declarations before resolving against the table.
    let classes: Vec<(String, String, Option<String>, Vec<String>)> = table
        .by_fqn
        .values()
        .filter_map(|s| s.as_class())
        .map(|c| {
            (
                c.header.fqn.clone(),
                c.header.file.clone(),
                c.super_class.clone(),
                c.interfaces.clone(),
            )
        })
        .collect();

    let mut direct: HashMap<String, DirectSupers> = HashMap::new();
    for (fqn, file, super_class, interfaces) in &classes {
        let ctx = contexts.get(file.as_str());
        let resolve_or_verbatim = |surface: &str| -> String {
            ctx.and_then(|c| resolve_type(surface, c, table))
                .unwrap_or_else(|| surface.to_string())
        };
        direct.insert(
            fqn.clone(),
            DirectSupers {
                super_class: super_class.as_deref().map(|s| resolve_or_verbatim(s)),
                interfaces: interfaces
                    .iter()
                    .map(|s| resolve_or_verbatim(s))
                    .collect(),
            },
        );
    }

    let mut hierarchy: HashMap<String, Vec<String>> = HashMap::new();
    for (fqn, file, _, _) in &classes {
        let mut ancestors = Vec::new();
        let mut seen: HashSet<String> = HashSet::from([fqn.clone()]);
        let mut queue: VecDeque<String> = direct
            .get(fqn)
            .map(|d| d.parents().into())
            .unwrap_or_default();
        let mut cycle = false;

        while let Some(parent) = queue.pop_front() {
            if parent == *fqn {
                cycle = true;
                continue;
            }
            if !seen.insert(parent.clone()) {
                continue;
            }
            ancestors.push(parent.clone());
            if let Some(grand) = direct.get(&parent) {
                for next in grand.parents() {
                    if next == *fqn {
                        cycle = true;
                    } else if !seen.contains(&next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        if cycle {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::HierarchyCycle,
                file.clone(),
                format!("inheritance cycle through '{fqn}'; ancestor list truncated"),
            ));
        }
        hierarchy.insert(fqn.clone(), ancestors);
    }

    table.direct_supers = direct;
    table.type_hierarchy = hierarchy;
}

#[cfg(test)]
mod tests {
    use crate::parsing::{Language, ParsedClass, ParsedFile};
    use crate::symbols::build_symbol_table;
    use crate::types::{ClassKind, SourceLocation};

    fn loc(line: u32) -> SourceLocation {
        SourceLocation::new("h.kt", line, 1, line, 30)
    }

    fn class(name: &str, super_class: Option<&str>, interfaces: &[&str], line: u32) -> ParsedClass {
        let mut c = ParsedClass::new(name, ClassKind::Class, loc(line));
        c.super_class = super_class.map(str::to_string);
        c.interfaces = interfaces.iter().map(|s| s.to_string()).collect();
        c
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let mut file = ParsedFile::new("h.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        file.classes.push(class("A", None, &[], 1));
        file.classes.push(class("B", Some("A"), &[], 2));
        file.classes.push(class("C", Some("B"), &["Marked"], 3));
        file.classes.push(class("Marked", None, &[], 4));

        let (table, diagnostics) = build_symbol_table(&[file]);
        assert!(diagnostics.is_empty());
        assert_eq!(
            table.ancestors("p.C"),
            &["p.B".to_string(), "p.Marked".to_string(), "p.A".to_string()]
        );
        assert_eq!(table.ancestors("p.A"), &[] as &[String]);
    }

    #[test]
    fn unresolved_super_is_kept_verbatim() {
        let mut file = ParsedFile::new("h.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        file.classes
            .push(class("Repo", Some("ExternalBase"), &[], 1));

        let (table, _) = build_symbol_table(&[file]);
        assert_eq!(table.ancestors("p.Repo"), &["ExternalBase".to_string()]);
    }

    #[test]
    fn cycles_are_broken_with_a_diagnostic() {
        let mut file = ParsedFile::new("h.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        file.classes.push(class("A", Some("B"), &[], 1));
        file.classes.push(class("B", Some("A"), &[], 2));

        let (table, diagnostics) = build_symbol_table(&[file]);
        // No FQN appears among its own ancestors.
        assert!(!table.ancestors("p.A").contains(&"p.A".to_string()));
        assert!(!table.ancestors("p.B").contains(&"p.B".to_string()));
        assert_eq!(table.ancestors("p.A"), &["p.B".to_string()]);
        assert!(
            diagnostics
                .iter()
                .any(|d| d.kind == crate::error::DiagnosticKind::HierarchyCycle)
        );
    }

    #[test]
    fn diamond_is_deduplicated() {
        let mut file = ParsedFile::new("h.kt", Language::Kotlin);
        file.package_name = Some("p".into());
        file.classes.push(class("Top", None, &[], 1));
        file.classes.push(class("Left", Some("Top"), &[], 2));
        file.classes.push(class("Right", Some("Top"), &[], 3));
        file.classes
            .push(class("Bottom", Some("Left"), &["Right"], 4));

        let (table, _) = build_symbol_table(&[file]);
        let ancestors = table.ancestors("p.Bottom");
        assert_eq!(
            ancestors,
            &[
                "p.Left".to_string(),
                "p.Right".to_string(),
                "p.Top".to_string()
            ]
        );
    }
}
