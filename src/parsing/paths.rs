//! Module path inference for languages without package declarations.
//!
//! TypeScript and JavaScript files carry no textual package name; a
//! dotted module path is derived from the file path instead, with a
//! configured set of source-root directory names stripped from the
//! front.

use std::path::Path;

/// Derive a dotted module path from a file path.
///
/// The file extension is dropped, components before and including the
/// last source-root segment are removed, and the remainder is joined
/// with dots. `index` files collapse to their directory.
///
/// `src/billing/invoice.ts` → `billing.invoice`
/// `packages/app/src/util/index.ts` → `util`
pub fn module_path_from_file(path: &str, source_roots: &[String]) -> Option<String> {
    let path = Path::new(path);
    let stem = path.file_stem()?.to_str()?;

    let mut components: Vec<&str> = path
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    std::path::Component::Normal(os) => os.to_str(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    // Drop everything up to and including the last source-root segment.
    if let Some(idx) = components
        .iter()
        .rposition(|c| source_roots.iter().any(|r| r == c))
    {
        components.drain(..=idx);
    }

    if stem != "index" {
        components.push(stem);
    }

    if components.is_empty() {
        return None;
    }
    Some(components.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> Vec<String> {
        vec!["src".into(), "lib".into(), "app".into()]
    }

    #[test]
    fn strips_source_root() {
        assert_eq!(
            module_path_from_file("src/billing/invoice.ts", &roots()),
            Some("billing.invoice".into())
        );
    }

    #[test]
    fn strips_last_source_root_occurrence() {
        assert_eq!(
            module_path_from_file("packages/app/src/util/helpers.ts", &roots()),
            Some("util.helpers".into())
        );
    }

    #[test]
    fn index_file_collapses_to_directory() {
        assert_eq!(
            module_path_from_file("src/util/index.ts", &roots()),
            Some("util".into())
        );
    }

    #[test]
    fn bare_root_index_has_no_module_path() {
        assert_eq!(module_path_from_file("src/index.ts", &roots()), None);
    }

    #[test]
    fn file_without_roots_keeps_full_path() {
        assert_eq!(
            module_path_from_file("scripts/build.ts", &roots()),
            Some("scripts.build".into())
        );
    }
}
