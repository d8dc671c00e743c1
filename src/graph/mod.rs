//! The property-graph boundary.
//!
//! The pipeline's product is a batch of nodes and relationships derived
//! from the symbol table and the resolved calls. Persistence itself is a
//! downstream concern: the crate ships the batch builder, the
//! [`GraphWriter`] contract, and a JSON-lines writer; a real graph-store
//! client lives behind the same trait.

use crate::error::{IndexError, IndexResult};
use crate::resolve::ResolvedFile;
use crate::symbols::{Symbol, SymbolTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

/// Node labels the writer contract understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Package,
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
    Function,
    Property,
    Parameter,
    TypeAlias,
}

/// Relationship types the writer contract understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelKind {
    Contains,
    Declares,
    Extends,
    Implements,
    HasParameter,
    AnnotatedWith,
    Calls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: NodeLabel,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRelationship {
    pub kind: RelKind,
    pub from: String,
    pub to: String,
    /// Set on `CALLS` edges: how many resolved call sites share this
    /// (from, to) pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// One batch handed to a writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphBatch {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<GraphRelationship>,
}

/// Downstream writer contract.
pub trait GraphWriter {
    /// Wipe the target store before writing.
    fn clear(&mut self) -> IndexResult<()>;
    fn write_batch(&mut self, batch: &GraphBatch) -> IndexResult<()>;
    fn flush(&mut self) -> IndexResult<()>;
}

fn node(id: &str, label: NodeLabel, symbol: Option<&Symbol>) -> GraphNode {
    let mut properties = serde_json::Map::new();
    if let Some(symbol) = symbol {
        let header = symbol.header();
        properties.insert("name".into(), header.name.clone().into());
        properties.insert("file".into(), header.file.clone().into());
        if let Some(location) = &header.location {
            properties.insert("line".into(), location.start_line.into());
        }
    } else {
        properties.insert(
            "name".into(),
            id.rsplit('.').next().unwrap_or(id).to_string().into(),
        );
    }
    GraphNode {
        id: id.to_string(),
        label,
        properties,
    }
}

fn label_for(symbol: &Symbol) -> NodeLabel {
    match symbol {
        Symbol::Class(c) => match c.kind {
            crate::types::ClassKind::Class => NodeLabel::Class,
            crate::types::ClassKind::Interface => NodeLabel::Interface,
            crate::types::ClassKind::Object => NodeLabel::Object,
            crate::types::ClassKind::Enum => NodeLabel::Enum,
            crate::types::ClassKind::Annotation => NodeLabel::Annotation,
        },
        Symbol::Function(_) => NodeLabel::Function,
        Symbol::Property(_) => NodeLabel::Property,
        Symbol::TypeAlias(_) => NodeLabel::TypeAlias,
    }
}

/// Build the full batch from the table and the resolved files.
pub fn build_graph(resolved: &[ResolvedFile], table: &SymbolTable) -> GraphBatch {
    let mut batch = GraphBatch::default();
    let mut annotation_nodes: Vec<String> = Vec::new();

    // Package nodes and declaration nodes, table order (deterministic).
    let mut packages: Vec<&str> = Vec::new();
    for (_, symbol) in table.iter() {
        if let Some(package) = symbol.package() {
            if !packages.contains(&package) {
                packages.push(package);
            }
        }
    }
    for package in &packages {
        batch.nodes.push(node(package, NodeLabel::Package, None));
    }

    for (fqn, symbol) in table.iter() {
        batch.nodes.push(node(fqn, label_for(symbol), Some(symbol)));

        let header = symbol.header();
        match (&header.parent_fqn, &header.package) {
            (Some(parent), _) => {
                batch.relationships.push(GraphRelationship {
                    kind: RelKind::Declares,
                    from: parent.clone(),
                    to: fqn.clone(),
                    count: None,
                });
            }
            (None, Some(package)) => {
                batch.relationships.push(GraphRelationship {
                    kind: RelKind::Contains,
                    from: package.clone(),
                    to: fqn.clone(),
                    count: None,
                });
            }
            _ => {}
        }

        // Parameters hang off their function.
        if let Symbol::Function(function) = symbol {
            for parameter in &function.parameters {
                let parameter_id = format!("{fqn}#{}", parameter.name);
                if !batch.nodes.iter().any(|n| n.id == parameter_id) {
                    let mut properties = serde_json::Map::new();
                    properties.insert("name".into(), parameter.name.clone().into());
                    if let Some(type_name) = &parameter.type_name {
                        properties.insert("type".into(), type_name.clone().into());
                    }
                    batch.nodes.push(GraphNode {
                        id: parameter_id.clone(),
                        label: NodeLabel::Parameter,
                        properties,
                    });
                    batch.relationships.push(GraphRelationship {
                        kind: RelKind::HasParameter,
                        from: fqn.clone(),
                        to: parameter_id,
                        count: None,
                    });
                }
            }
        }

        // Inheritance edges from the resolved direct supers.
        if symbol.as_class().is_some() {
            if let Some(supers) = table.direct_supers(fqn) {
                if let Some(super_class) = &supers.super_class {
                    batch.relationships.push(GraphRelationship {
                        kind: RelKind::Extends,
                        from: fqn.clone(),
                        to: super_class.clone(),
                        count: None,
                    });
                }
                for interface in &supers.interfaces {
                    batch.relationships.push(GraphRelationship {
                        kind: RelKind::Implements,
                        from: fqn.clone(),
                        to: interface.clone(),
                        count: None,
                    });
                }
            }
        }
    }

    // Annotation edges come from the parsed structure.
    for resolved_file in resolved {
        collect_annotation_edges(resolved_file, &mut batch, &mut annotation_nodes);
    }
    for name in annotation_nodes {
        batch.nodes.push(GraphNode {
            id: name.clone(),
            label: NodeLabel::Annotation,
            properties: serde_json::Map::from_iter([(
                "name".to_string(),
                serde_json::Value::from(name),
            )]),
        });
    }

    // CALLS edges aggregate by (from, to).
    let mut call_counts: HashMap<(String, String), u64> = HashMap::new();
    let mut call_order: Vec<(String, String)> = Vec::new();
    for resolved_file in resolved {
        for call in &resolved_file.resolved_calls {
            let key = (call.from_fqn.clone(), call.to_fqn.clone());
            match call_counts.get_mut(&key) {
                Some(count) => *count += 1,
                None => {
                    call_counts.insert(key.clone(), 1);
                    call_order.push(key);
                }
            }
        }
    }
    for key in call_order {
        let count = call_counts[&key];
        batch.relationships.push(GraphRelationship {
            kind: RelKind::Calls,
            from: key.0,
            to: key.1,
            count: Some(count),
        });
    }

    batch
}

fn collect_annotation_edges(
    resolved_file: &ResolvedFile,
    batch: &mut GraphBatch,
    annotation_nodes: &mut Vec<String>,
) {
    use crate::parsing::{ParsedAnnotation, ParsedClass};
    use crate::types::qualify;

    let file = &resolved_file.file;
    let package = file.package_name.as_deref();

    fn push_edges(
        from: &str,
        annotations: &[ParsedAnnotation],
        batch: &mut GraphBatch,
        annotation_nodes: &mut Vec<String>,
    ) {
        for annotation in annotations {
            if !annotation_nodes.contains(&annotation.name) {
                annotation_nodes.push(annotation.name.clone());
            }
            batch.relationships.push(GraphRelationship {
                kind: RelKind::AnnotatedWith,
                from: from.to_string(),
                to: annotation.name.clone(),
                count: None,
            });
        }
    }

    fn walk_class(
        class: &ParsedClass,
        prefix: Option<&str>,
        batch: &mut GraphBatch,
        annotation_nodes: &mut Vec<String>,
    ) {
        let fqn = qualify(prefix, &class.name);
        push_edges(&fqn, &class.annotations, batch, annotation_nodes);
        for function in &class.functions {
            push_edges(
                &format!("{fqn}.{}", function.name),
                &function.annotations,
                batch,
                annotation_nodes,
            );
        }
        for property in &class.properties {
            push_edges(
                &format!("{fqn}.{}", property.name),
                &property.annotations,
                batch,
                annotation_nodes,
            );
        }
        for nested in &class.nested_classes {
            walk_class(nested, Some(&fqn), batch, annotation_nodes);
        }
        if let Some(companion) = &class.companion {
            walk_class(companion, Some(&fqn), batch, annotation_nodes);
        }
    }

    for function in &file.functions {
        push_edges(
            &qualify(package, &function.name),
            &function.annotations,
            batch,
            annotation_nodes,
        );
    }
    for property in &file.properties {
        push_edges(
            &qualify(package, &property.name),
            &property.annotations,
            batch,
            annotation_nodes,
        );
    }
    for class in &file.classes {
        walk_class(class, package, batch, annotation_nodes);
    }
}

/// Writes a batch as JSON lines: one `{"node": ...}` or
/// `{"relationship": ...}` object per line. Serves as the dry-run
/// inspection format and the default sink.
pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, value: &serde_json::Value) -> IndexResult<()> {
        serde_json::to_writer(&mut self.out, value).map_err(|e| IndexError::Writer {
            operation: "serialize".into(),
            cause: e.to_string(),
        })?;
        self.out.write_all(b"\n").map_err(|e| IndexError::Writer {
            operation: "write".into(),
            cause: e.to_string(),
        })
    }
}

impl<W: Write> GraphWriter for JsonLinesWriter<W> {
    fn clear(&mut self) -> IndexResult<()> {
        // The sink is append-only; clearing is the caller's truncation.
        Ok(())
    }

    fn write_batch(&mut self, batch: &GraphBatch) -> IndexResult<()> {
        for node in &batch.nodes {
            self.write_line(&serde_json::json!({ "node": node }))?;
        }
        for relationship in &batch.relationships {
            self.write_line(&serde_json::json!({ "relationship": relationship }))?;
        }
        Ok(())
    }

    fn flush(&mut self) -> IndexResult<()> {
        self.out.flush().map_err(|e| IndexError::Writer {
            operation: "flush".into(),
            cause: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Language;
    use crate::pipeline::run_on_sources;

    #[test]
    fn calls_edges_aggregate_counts() {
        let output = run_on_sources(&[(
            "a.kt",
            Language::Kotlin,
            "package p\n\
             fun helper() {}\n\
             fun go() {\n\
                 helper()\n\
                 helper()\n\
             }\n",
        )]);
        let batch = build_graph(&output.resolved, &output.table);
        let calls: Vec<_> = batch
            .relationships
            .iter()
            .filter(|r| r.kind == RelKind::Calls)
            .collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from, "p.go");
        assert_eq!(calls[0].to, "p.helper");
        assert_eq!(calls[0].count, Some(2));
    }

    #[test]
    fn packages_contain_top_level_declarations() {
        let output = run_on_sources(&[(
            "a.kt",
            Language::Kotlin,
            "package p\nclass C\nfun f() {}\n",
        )]);
        let batch = build_graph(&output.resolved, &output.table);
        assert!(
            batch
                .nodes
                .iter()
                .any(|n| n.id == "p" && n.label == NodeLabel::Package)
        );
        assert!(batch.relationships.iter().any(|r| {
            r.kind == RelKind::Contains && r.from == "p" && r.to == "p.C"
        }));
    }

    #[test]
    fn extends_edge_uses_resolved_fqn() {
        let output = run_on_sources(&[(
            "a.kt",
            Language::Kotlin,
            "package p\nopen class Base\nclass Sub : Base()\n",
        )]);
        let batch = build_graph(&output.resolved, &output.table);
        assert!(batch.relationships.iter().any(|r| {
            r.kind == RelKind::Extends && r.from == "p.Sub" && r.to == "p.Base"
        }));
    }

    #[test]
    fn json_lines_writer_emits_one_object_per_line() {
        let output = run_on_sources(&[("a.kt", Language::Kotlin, "package p\nclass C\n")]);
        let batch = build_graph(&output.resolved, &output.table);

        let mut buffer = Vec::new();
        {
            let mut writer = JsonLinesWriter::new(&mut buffer);
            writer.write_batch(&batch).unwrap();
            writer.flush().unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        for line in text.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("node").is_some() || value.get("relationship").is_some());
        }
    }
}
