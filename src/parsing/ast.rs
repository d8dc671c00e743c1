//! Shared CST helpers.
//!
//! Small typed wrappers over tree-sitter traversal that every extractor
//! family uses: child lookup by kind, node text, and node-to-location
//! conversion (tree-sitter positions are 0-based; the model is 1-based).

use crate::types::SourceLocation;
use tree_sitter::Node;

/// Convert a node's span to a 1-based [`SourceLocation`].
pub fn node_location(node: Node, path: &str) -> SourceLocation {
    let start = node.start_position();
    let end = node.end_position();
    SourceLocation::new(
        path,
        start.row as u32 + 1,
        start.column as u32 + 1,
        end.row as u32 + 1,
        end.column as u32 + 1,
    )
}

/// Raw source text for a node.
#[inline]
pub fn node_text<'a>(node: Node, code: &'a str) -> &'a str {
    &code[node.byte_range()]
}

/// Trimmed source text for a node.
#[inline]
pub fn trimmed_text<'a>(node: Node, code: &'a str) -> &'a str {
    node_text(node, code).trim()
}

/// First child with the given kind, named or not.
pub fn find_child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

/// First child whose kind is in `kinds`.
pub fn find_child_of_kinds<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| kinds.contains(&c.kind()))
}

/// All children with the given kind, in order.
pub fn children_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == kind)
        .collect()
}

/// All named children, in order.
pub fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Whether any child (including unnamed tokens) has the given kind.
pub fn has_child_of_kind(node: Node, kind: &str) -> bool {
    find_child_of_kind(node, kind).is_some()
}

/// Strip an outer generic argument list from a surface type:
/// `Map<String, User>` → `Map`. Leaves non-generic types untouched.
pub fn strip_generics(surface: &str) -> &str {
    match surface.find('<') {
        Some(idx) => surface[..idx].trim_end(),
        None => surface,
    }
}

/// Strip nullability and array suffixes for lookup purposes:
/// `User?` → `User`, `User[]` → `User`.
pub fn strip_type_suffixes(surface: &str) -> &str {
    let mut s = surface.trim();
    loop {
        if let Some(rest) = s.strip_suffix('?') {
            s = rest.trim_end();
        } else if let Some(rest) = s.strip_suffix("[]") {
            s = rest.trim_end();
        } else {
            return s;
        }
    }
}

/// Normalize a surface type to its lookup form: suffixes stripped, then
/// outer generics removed. The display form is always preserved upstream.
pub fn type_lookup_key(surface: &str) -> &str {
    strip_generics(strip_type_suffixes(surface))
}

/// Extract a class name from a constructor-call initializer:
/// `User("a")` or `new Store(cfg)` yields the simple class name.
/// Anything else yields `None`.
pub fn constructor_type_from_initializer(initializer: &str) -> Option<String> {
    let trimmed = initializer.trim();
    let trimmed = trimmed.strip_prefix("new ").unwrap_or(trimmed).trim_start();
    let name: String = trimmed
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
        .collect();
    if name.is_empty() {
        return None;
    }
    let rest = trimmed[name.len()..].trim_start();
    let rest = rest.strip_prefix('<').map_or(rest, |_| {
        // Skip a generic argument list: `Repo<String>()`.
        match rest.find('>') {
            Some(idx) => rest[idx + 1..].trim_start(),
            None => rest,
        }
    });
    let simple = name.rsplit('.').next().unwrap_or(&name);
    if rest.starts_with('(') && simple.starts_with(char::is_uppercase) {
        Some(simple.to_string())
    } else {
        None
    }
}

/// Split an argument list on commas that are not nested inside brackets
/// or string literals. Used for raw annotation-argument capture.
pub fn split_top_level_commas(input: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string: Option<char> = None;

    for (idx, ch) in input.char_indices() {
        match (ch, in_string) {
            ('"' | '\'', None) => in_string = Some(ch),
            (c, Some(quote)) if c == quote => in_string = None,
            ('(' | '[' | '{' | '<', None) => depth += 1,
            (')' | ']' | '}' | '>', None) => depth = depth.saturating_sub(1),
            (',', None) if depth == 0 => {
                pieces.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < input.len() {
        pieces.push(&input[start..]);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generics_are_stripped_for_lookup() {
        assert_eq!(strip_generics("Map<String, User>"), "Map");
        assert_eq!(strip_generics("List<List<Int>>"), "List");
        assert_eq!(strip_generics("User"), "User");
    }

    #[test]
    fn suffixes_are_stripped_for_lookup() {
        assert_eq!(strip_type_suffixes("User?"), "User");
        assert_eq!(strip_type_suffixes("User[]"), "User");
        assert_eq!(strip_type_suffixes("User[]?"), "User");
        assert_eq!(strip_type_suffixes("User"), "User");
    }

    #[test]
    fn lookup_key_combines_both() {
        assert_eq!(type_lookup_key("Array<User>?"), "Array");
        assert_eq!(type_lookup_key("Map<String, Int>"), "Map");
    }

    #[test]
    fn constructor_initializer_heuristic() {
        assert_eq!(
            constructor_type_from_initializer("User(\"a\")"),
            Some("User".to_string())
        );
        assert_eq!(
            constructor_type_from_initializer("new Store(cfg)"),
            Some("Store".to_string())
        );
        assert_eq!(
            constructor_type_from_initializer("new Repo<String>()"),
            Some("Repo".to_string())
        );
        assert_eq!(constructor_type_from_initializer("helper()"), None);
        assert_eq!(constructor_type_from_initializer("42"), None);
    }
}
