//! JavaScript language parser.
//!
//! The untyped sibling of the TypeScript extractor family: no
//! interfaces, enums, aliases or annotations, but the same call capture,
//! destructuring and module handling, plus CommonJS `require` imports.

use crate::parsing::ast::{
    find_child_of_kind, has_child_of_kind, node_location, node_text, strip_generics, trimmed_text,
};
use crate::parsing::parser::{
    ParseOutcome, check_recursion_depth, parse_failure_diagnostic, partial_parse_diagnostic,
};
use crate::parsing::{
    CHAINED_CALL_RECEIVER, Language, LanguageParser, ParsedCall, ParsedClass, ParsedDestructuring,
    ParsedFile, ParsedFunction, ParsedImport, ParsedLocalVariable, ParsedParameter, ParsedProperty,
};
use crate::types::{ClassKind, UNKNOWN_TYPE, Visibility};
use tree_sitter::{Node, Parser};

const NODE_IMPORT_STATEMENT: &str = "import_statement";
const NODE_IMPORT_CLAUSE: &str = "import_clause";
const NODE_NAMED_IMPORTS: &str = "named_imports";
const NODE_IMPORT_SPECIFIER: &str = "import_specifier";
const NODE_NAMESPACE_IMPORT: &str = "namespace_import";
const NODE_EXPORT_STATEMENT: &str = "export_statement";
const NODE_FUNCTION_DECLARATION: &str = "function_declaration";
const NODE_CLASS_DECLARATION: &str = "class_declaration";
const NODE_CLASS_BODY: &str = "class_body";
const NODE_CLASS_HERITAGE: &str = "class_heritage";
const NODE_METHOD_DEFINITION: &str = "method_definition";
const NODE_FIELD_DEFINITION: &str = "field_definition";
const NODE_LEXICAL_DECLARATION: &str = "lexical_declaration";
const NODE_VARIABLE_DECLARATION: &str = "variable_declaration";
const NODE_VARIABLE_DECLARATOR: &str = "variable_declarator";
const NODE_CALL_EXPRESSION: &str = "call_expression";
const NODE_NEW_EXPRESSION: &str = "new_expression";
const NODE_MEMBER_EXPRESSION: &str = "member_expression";
const NODE_FORMAL_PARAMETERS: &str = "formal_parameters";
const NODE_IDENTIFIER: &str = "identifier";
const NODE_PROPERTY_IDENTIFIER: &str = "property_identifier";
const NODE_OBJECT_PATTERN: &str = "object_pattern";
const NODE_ARRAY_PATTERN: &str = "array_pattern";
const NODE_REST_PATTERN: &str = "rest_pattern";
const NODE_ARROW_FUNCTION: &str = "arrow_function";
const NODE_FUNCTION_EXPRESSION: &str = "function_expression";
const NODE_STATEMENT_BLOCK: &str = "statement_block";
const NODE_OPTIONAL_CHAIN: &str = "optional_chain";
const NODE_STRING: &str = "string";
const NODE_STRING_FRAGMENT: &str = "string_fragment";
const NODE_ASSIGNMENT_PATTERN: &str = "assignment_pattern";

fn literal_type_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "number" => Some("number"),
        "string" | "template_string" => Some("string"),
        "true" | "false" => Some("boolean"),
        "regex" => Some("RegExp"),
        "object" => Some("object"),
        _ => None,
    }
}

/// Parser for JavaScript source files.
pub struct JavaScriptParser {
    parser: Parser,
}

impl std::fmt::Debug for JavaScriptParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaScriptParser")
            .field("language", &"JavaScript")
            .finish()
    }
}

impl JavaScriptParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_javascript::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| format!("Failed to initialize JavaScript parser: {e}"))?;
        Ok(Self { parser })
    }

    fn extract_program(&self, root: Node, code: &str, file: &mut ParsedFile) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            self.extract_top_level(child, code, file, false);
        }
    }

    fn extract_top_level(&self, node: Node, code: &str, file: &mut ParsedFile, exported: bool) {
        match node.kind() {
            NODE_EXPORT_STATEMENT => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.is_named() {
                        self.extract_top_level(child, code, file, true);
                    }
                }
            }
            NODE_IMPORT_STATEMENT => {
                file.imports.extend(self.extract_imports(node, code));
            }
            NODE_FUNCTION_DECLARATION => {
                if let Some(function) = self.extract_function(node, code, file, exported) {
                    file.functions.push(function);
                }
            }
            NODE_CLASS_DECLARATION => {
                if let Some(class) = self.extract_class(node, code, file, exported, 0) {
                    file.classes.push(class);
                }
            }
            NODE_LEXICAL_DECLARATION | NODE_VARIABLE_DECLARATION => {
                self.extract_variable_statement(node, code, file, exported);
            }
            _ => {}
        }
    }

    fn string_value(&self, node: Node, code: &str) -> Option<String> {
        let string_node = if node.kind() == NODE_STRING {
            node
        } else {
            find_child_of_kind(node, NODE_STRING)?
        };
        Some(
            find_child_of_kind(string_node, NODE_STRING_FRAGMENT)
                .map(|f| node_text(f, code).to_string())
                .unwrap_or_default(),
        )
    }

    fn extract_imports(&self, node: Node, code: &str) -> Vec<ParsedImport> {
        let Some(path) = self.string_value(node, code) else {
            return Vec::new();
        };
        let mut imports = Vec::new();
        let Some(clause) = find_child_of_kind(node, NODE_IMPORT_CLAUSE) else {
            imports.push(ParsedImport::new(path));
            return imports;
        };

        let mut cursor = clause.walk();
        for child in clause.children(&mut cursor) {
            match child.kind() {
                NODE_IDENTIFIER => {
                    let mut import = ParsedImport::new(path.clone());
                    import.imported_name = Some("default".to_string());
                    import.alias = Some(trimmed_text(child, code).to_string());
                    imports.push(import);
                }
                NODE_NAMED_IMPORTS => {
                    let mut spec_cursor = child.walk();
                    for spec in child.children(&mut spec_cursor) {
                        if spec.kind() != NODE_IMPORT_SPECIFIER {
                            continue;
                        }
                        let names: Vec<_> = {
                            let mut c = spec.walk();
                            spec.children(&mut c)
                                .filter(|n| n.kind() == NODE_IDENTIFIER)
                                .collect()
                        };
                        let Some(first) = names.first() else { continue };
                        let mut import = ParsedImport::new(path.clone());
                        import.imported_name = Some(trimmed_text(*first, code).to_string());
                        if let Some(alias) = names.get(1) {
                            import.alias = Some(trimmed_text(*alias, code).to_string());
                        }
                        imports.push(import);
                    }
                }
                NODE_NAMESPACE_IMPORT => {
                    let mut import = ParsedImport::new(path.clone());
                    import.is_wildcard = true;
                    if let Some(alias) = find_child_of_kind(child, NODE_IDENTIFIER) {
                        import.alias = Some(trimmed_text(alias, code).to_string());
                    }
                    imports.push(import);
                }
                _ => {}
            }
        }
        imports
    }

    fn extract_function(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        exported: bool,
    ) -> Option<ParsedFunction> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_IDENTIFIER))?;
        let mut function = ParsedFunction::new(
            trimmed_text(name_node, code),
            node_location(node, &file.path),
        );
        function.visibility = if exported {
            Visibility::Public
        } else {
            Visibility::Internal
        };
        function.modifiers.is_async = node_text(node, code).trim_start().starts_with("async");

        if let Some(params) = node
            .child_by_field_name("parameters")
            .or_else(|| find_child_of_kind(node, NODE_FORMAL_PARAMETERS))
        {
            function.parameters = self.extract_parameters(params, code);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_calls(
                body,
                code,
                file,
                &mut function.calls,
                &mut function.local_variables,
                0,
            );
        }
        Some(function)
    }

    fn extract_parameters(&self, params: Node, code: &str) -> Vec<ParsedParameter> {
        let mut parameters = Vec::new();
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            match child.kind() {
                NODE_IDENTIFIER => {
                    parameters.push(ParsedParameter::new(trimmed_text(child, code)));
                }
                NODE_ASSIGNMENT_PATTERN => {
                    let Some(name) = child.child_by_field_name("left") else {
                        continue;
                    };
                    let mut parameter = ParsedParameter::new(trimmed_text(name, code));
                    parameter.default_value = child
                        .child_by_field_name("right")
                        .map(|v| trimmed_text(v, code).to_string());
                    parameters.push(parameter);
                }
                NODE_REST_PATTERN => {
                    let name = find_child_of_kind(child, NODE_IDENTIFIER)
                        .map(|n| trimmed_text(n, code).to_string())
                        .unwrap_or_else(|| "rest".to_string());
                    let mut parameter = ParsedParameter::new(name);
                    parameter.is_variadic = true;
                    parameters.push(parameter);
                }
                NODE_OBJECT_PATTERN | NODE_ARRAY_PATTERN => {
                    parameters.push(ParsedParameter::new(trimmed_text(child, code)));
                }
                _ => {}
            }
        }
        parameters
    }

    fn extract_class(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        exported: bool,
        depth: usize,
    ) -> Option<ParsedClass> {
        if !check_recursion_depth(depth, node) {
            return None;
        }
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_IDENTIFIER))?;
        let mut class = ParsedClass::new(
            trimmed_text(name_node, code),
            ClassKind::Class,
            node_location(node, &file.path),
        );
        class.visibility = if exported {
            Visibility::Public
        } else {
            Visibility::Internal
        };

        if let Some(heritage) = find_child_of_kind(node, NODE_CLASS_HERITAGE) {
            // `class A extends B`: everything after the keyword is the base.
            let mut cursor = heritage.walk();
            if let Some(base) = heritage.children(&mut cursor).find(|c| c.is_named()) {
                class.super_class = Some(trimmed_text(base, code).to_string());
            }
        }
        if let Some(body) = find_child_of_kind(node, NODE_CLASS_BODY) {
            self.extract_class_body(body, code, file, &mut class);
        }
        Some(class)
    }

    fn extract_class_body(
        &self,
        body: Node,
        code: &str,
        file: &mut ParsedFile,
        class: &mut ParsedClass,
    ) {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                NODE_METHOD_DEFINITION => {
                    let Some(name_node) = member.child_by_field_name("name") else {
                        continue;
                    };
                    let mut method = ParsedFunction::new(
                        trimmed_text(name_node, code),
                        node_location(member, &file.path),
                    );
                    method.modifiers.is_async = node_text(member, code).contains("async ");
                    if let Some(params) = member
                        .child_by_field_name("parameters")
                        .or_else(|| find_child_of_kind(member, NODE_FORMAL_PARAMETERS))
                    {
                        method.parameters = self.extract_parameters(params, code);
                    }
                    if let Some(block) = member.child_by_field_name("body") {
                        self.collect_calls(
                            block,
                            code,
                            file,
                            &mut method.calls,
                            &mut method.local_variables,
                            0,
                        );
                    }
                    if method.name == "constructor" {
                        method.name = "<init>".to_string();
                        class.secondary_constructors.push(method);
                    } else {
                        class.functions.push(method);
                    }
                }
                NODE_FIELD_DEFINITION => {
                    let Some(name_node) = member
                        .child_by_field_name("property")
                        .or_else(|| find_child_of_kind(member, NODE_PROPERTY_IDENTIFIER))
                    else {
                        continue;
                    };
                    let mut property = ParsedProperty::new(
                        trimmed_text(name_node, code),
                        node_location(member, &file.path),
                    );
                    if let Some(value) = member.child_by_field_name("value") {
                        property.initializer = Some(trimmed_text(value, code).to_string());
                        property.type_name = constructed_type(value, code);
                    }
                    class.properties.push(property);
                }
                _ => {}
            }
        }
    }

    fn extract_variable_statement(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        exported: bool,
    ) {
        let is_const = node_text(node, code).trim_start().starts_with("const");
        let mut cursor = node.walk();
        for declarator in node.children(&mut cursor) {
            if declarator.kind() != NODE_VARIABLE_DECLARATOR {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let value = declarator.child_by_field_name("value");

            // CommonJS: `const fs = require('fs')` binds a module import.
            if let Some(value) = value {
                if let Some(path) = require_path(value, code)
                    .and_then(|n| self.string_value(n, code))
                {
                    let mut import = ParsedImport::new(path);
                    if name_node.kind() == NODE_IDENTIFIER {
                        import.alias = Some(trimmed_text(name_node, code).to_string());
                    }
                    file.imports.push(import);
                    if name_node.kind() == NODE_OBJECT_PATTERN {
                        if let Some(destructuring) = self.extract_destructuring(
                            name_node, declarator, code, &file.path, is_const,
                        ) {
                            file.destructurings.push(destructuring);
                        }
                    }
                    continue;
                }
            }

            match name_node.kind() {
                NODE_OBJECT_PATTERN | NODE_ARRAY_PATTERN => {
                    if let Some(destructuring) = self.extract_destructuring(
                        name_node, declarator, code, &file.path, is_const,
                    ) {
                        file.destructurings.push(destructuring);
                    }
                }
                NODE_IDENTIFIER => {
                    if let Some(value) = value.filter(|v| {
                        v.kind() == NODE_ARROW_FUNCTION || v.kind() == NODE_FUNCTION_EXPRESSION
                    }) {
                        let mut function = ParsedFunction::new(
                            trimmed_text(name_node, code),
                            node_location(declarator, &file.path),
                        );
                        function.visibility = if exported {
                            Visibility::Public
                        } else {
                            Visibility::Internal
                        };
                        function.modifiers.is_async =
                            node_text(value, code).trim_start().starts_with("async");
                        if let Some(params) = value
                            .child_by_field_name("parameters")
                            .or_else(|| find_child_of_kind(value, NODE_FORMAL_PARAMETERS))
                        {
                            function.parameters = self.extract_parameters(params, code);
                        }
                        if let Some(body) = value.child_by_field_name("body") {
                            self.collect_calls(
                                body,
                                code,
                                file,
                                &mut function.calls,
                                &mut function.local_variables,
                                0,
                            );
                        }
                        file.functions.push(function);
                    } else {
                        let mut property = ParsedProperty::new(
                            trimmed_text(name_node, code),
                            node_location(declarator, &file.path),
                        );
                        property.visibility = if exported {
                            Visibility::Public
                        } else {
                            Visibility::Internal
                        };
                        property.is_immutable = is_const;
                        if let Some(value) = value {
                            property.initializer = Some(trimmed_text(value, code).to_string());
                            property.type_name = constructed_type(value, code);
                        }
                        file.properties.push(property);
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_destructuring(
        &self,
        pattern: Node,
        declarator: Node,
        code: &str,
        path: &str,
        is_const: bool,
    ) -> Option<ParsedDestructuring> {
        let mut components = Vec::new();

        match pattern.kind() {
            NODE_OBJECT_PATTERN => {
                let mut cursor = pattern.walk();
                for child in pattern.children(&mut cursor) {
                    match child.kind() {
                        "shorthand_property_identifier_pattern" => {
                            components.push(trimmed_text(child, code).to_string());
                        }
                        "pair_pattern" => {
                            if let Some(value) = child.child_by_field_name("value") {
                                components.push(trimmed_text(value, code).to_string());
                            }
                        }
                        NODE_REST_PATTERN => {
                            if let Some(name) = find_child_of_kind(child, NODE_IDENTIFIER) {
                                components.push(trimmed_text(name, code).to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            NODE_ARRAY_PATTERN => {
                let mut expecting_component = true;
                let mut cursor = pattern.walk();
                for child in pattern.children(&mut cursor) {
                    match child.kind() {
                        "," => {
                            if expecting_component {
                                components.push("_".to_string());
                            }
                            expecting_component = true;
                        }
                        "[" | "]" => {}
                        NODE_IDENTIFIER => {
                            components.push(trimmed_text(child, code).to_string());
                            expecting_component = false;
                        }
                        NODE_REST_PATTERN => {
                            if let Some(name) = find_child_of_kind(child, NODE_IDENTIFIER) {
                                components.push(trimmed_text(name, code).to_string());
                            }
                            expecting_component = false;
                        }
                        _ => {
                            expecting_component = false;
                        }
                    }
                }
            }
            _ => return None,
        }

        if components.is_empty() {
            return None;
        }
        Some(ParsedDestructuring {
            components,
            component_types: None,
            is_immutable: is_const,
            location: node_location(declarator, path),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_calls(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        calls: &mut Vec<ParsedCall>,
        locals: &mut Vec<ParsedLocalVariable>,
        depth: usize,
    ) {
        if !check_recursion_depth(depth, node) {
            return;
        }

        match node.kind() {
            NODE_CALL_EXPRESSION => {
                if let Some(call) = self.extract_call(node, code, file) {
                    calls.push(call);
                }
            }
            NODE_NEW_EXPRESSION => {
                if let Some(call) = self.extract_new_expression(node, code, &file.path) {
                    calls.push(call);
                }
            }
            NODE_LEXICAL_DECLARATION | NODE_VARIABLE_DECLARATION => {
                self.record_local_variables(node, code, &file.path, locals);
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(child, code, file, calls, locals, depth + 1);
        }
    }

    fn extract_call(&self, node: Node, code: &str, file: &mut ParsedFile) -> Option<ParsedCall> {
        let callee = node.child_by_field_name("function")?;
        let location = node_location(node, &file.path);

        if callee.kind() == "import" {
            if let Some(arguments) = node.child_by_field_name("arguments") {
                if let Some(path) = self.string_value(arguments, code) {
                    let mut import = ParsedImport::new(path);
                    import.is_dynamic = true;
                    file.imports.push(import);
                }
            }
            return None;
        }
        // Bare `require(...)` was already lifted into an import binding.
        if callee.kind() == NODE_IDENTIFIER && trimmed_text(callee, code) == "require" {
            return None;
        }

        let (name, receiver, is_safe_call) = match callee.kind() {
            NODE_IDENTIFIER => (trimmed_text(callee, code).to_string(), None, false),
            NODE_MEMBER_EXPRESSION => {
                let property = callee.child_by_field_name("property")?;
                let object = callee.child_by_field_name("object")?;
                let is_safe = has_child_of_kind(callee, NODE_OPTIONAL_CHAIN);
                let receiver = match object.kind() {
                    NODE_CALL_EXPRESSION | NODE_NEW_EXPRESSION => {
                        CHAINED_CALL_RECEIVER.to_string()
                    }
                    _ => trimmed_text(object, code).to_string(),
                };
                (
                    trimmed_text(property, code).to_string(),
                    Some(receiver),
                    is_safe,
                )
            }
            _ => return None,
        };

        let mut call = ParsedCall::new(name, location);
        call.receiver = receiver;
        call.is_safe_call = is_safe_call;
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let (count, types) = self.extract_arguments(arguments, code);
            call.argument_count = count;
            call.argument_types = types;
        }
        Some(call)
    }

    fn extract_new_expression(&self, node: Node, code: &str, path: &str) -> Option<ParsedCall> {
        let constructor = node.child_by_field_name("constructor")?;
        let name = match constructor.kind() {
            NODE_IDENTIFIER => trimmed_text(constructor, code).to_string(),
            NODE_MEMBER_EXPRESSION => constructor
                .child_by_field_name("property")
                .map(|p| trimmed_text(p, code).to_string())?,
            _ => return None,
        };
        let mut call = ParsedCall::new(name, node_location(node, path));
        call.is_constructor_call = true;
        if constructor.kind() == NODE_MEMBER_EXPRESSION {
            if let Some(object) = constructor.child_by_field_name("object") {
                call.receiver = Some(trimmed_text(object, code).to_string());
            }
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let (count, types) = self.extract_arguments(arguments, code);
            call.argument_count = count;
            call.argument_types = types;
        }
        Some(call)
    }

    fn extract_arguments(&self, arguments: Node, code: &str) -> (usize, Option<Vec<String>>) {
        let mut count = 0;
        let mut types = Vec::new();
        let mut cursor = arguments.walk();
        for argument in arguments.named_children(&mut cursor) {
            if argument.kind() == "comment" {
                continue;
            }
            count += 1;
            types.push(self.infer_expression_type(argument, code));
        }
        if count == 0 { (0, None) } else { (count, Some(types)) }
    }

    fn infer_expression_type(&self, node: Node, code: &str) -> String {
        if let Some(literal) = literal_type_for_kind(node.kind()) {
            return literal.to_string();
        }
        match node.kind() {
            "array" => {
                let mut cursor = node.walk();
                let element = node
                    .named_children(&mut cursor)
                    .next()
                    .map(|e| self.infer_expression_type(e, code))
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
                format!("Array<{element}>")
            }
            NODE_ARROW_FUNCTION | NODE_FUNCTION_EXPRESSION => "Function".to_string(),
            NODE_NEW_EXPRESSION => node
                .child_by_field_name("constructor")
                .map(|c| trimmed_text(c, code).to_string())
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            _ => UNKNOWN_TYPE.to_string(),
        }
    }

    fn record_local_variables(
        &self,
        node: Node,
        code: &str,
        path: &str,
        locals: &mut Vec<ParsedLocalVariable>,
    ) {
        let mut cursor = node.walk();
        for declarator in node.children(&mut cursor) {
            if declarator.kind() != NODE_VARIABLE_DECLARATOR {
                continue;
            }
            let Some(name) = declarator
                .child_by_field_name("name")
                .filter(|n| n.kind() == NODE_IDENTIFIER)
            else {
                continue;
            };
            let type_name = declarator
                .child_by_field_name("value")
                .and_then(|v| constructed_type(v, code));
            if let Some(type_name) = type_name {
                locals.push(ParsedLocalVariable {
                    name: trimmed_text(name, code).to_string(),
                    type_name,
                    location: node_location(declarator, path),
                });
            }
        }
    }
}

impl LanguageParser for JavaScriptParser {
    fn parse(&mut self, code: &str, path: &str) -> ParseOutcome {
        let Some(tree) = self.parser.parse(code, None) else {
            return ParseOutcome::Failed(parse_failure_diagnostic(path, Language::JavaScript));
        };
        let root = tree.root_node();
        let mut file = ParsedFile::new(path, Language::JavaScript);
        self.extract_program(root, code, &mut file);

        if root.has_error() {
            ParseOutcome::Partial(file, partial_parse_diagnostic(path, Language::JavaScript))
        } else {
            ParseOutcome::Clean(file)
        }
    }

    fn language(&self) -> Language {
        Language::JavaScript
    }
}

fn constructed_type(value: Node, code: &str) -> Option<String> {
    if value.kind() != NODE_NEW_EXPRESSION {
        return None;
    }
    value
        .child_by_field_name("constructor")
        .map(|c| strip_generics(trimmed_text(c, code)).to_string())
}

/// If `value` is a `require('...')` call (possibly behind member access
/// like `require('m').sub`), return the node holding the argument list.
fn require_path<'tree>(value: Node<'tree>, code: &str) -> Option<Node<'tree>> {
    let call = match value.kind() {
        NODE_CALL_EXPRESSION => value,
        NODE_MEMBER_EXPRESSION => value
            .child_by_field_name("object")
            .filter(|o| o.kind() == NODE_CALL_EXPRESSION)?,
        _ => return None,
    };
    let callee = call.child_by_field_name("function")?;
    if callee.kind() == NODE_IDENTIFIER && trimmed_text(callee, code) == "require" {
        call.child_by_field_name("arguments")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> ParsedFile {
        let mut parser = JavaScriptParser::new().unwrap();
        match parser.parse(code, "src/app.js") {
            ParseOutcome::Clean(f) | ParseOutcome::Partial(f, _) => f,
            ParseOutcome::Failed(d) => panic!("parse failed: {d:?}"),
        }
    }

    #[test]
    fn extracts_es_module_imports() {
        let file = parse(
            "import def from './a';\n\
             import { one, two as duo } from './b';\n\
             import * as ns from './c';\n",
        );
        assert_eq!(file.imports.len(), 4);
        assert_eq!(file.imports[0].alias.as_deref(), Some("def"));
        assert_eq!(file.imports[2].alias.as_deref(), Some("duo"));
        assert!(file.imports[3].is_wildcard);
    }

    #[test]
    fn require_binds_an_import() {
        let file = parse("const fs = require('fs');\nconst { join } = require('path');\n");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].path, "fs");
        assert_eq!(file.imports[0].alias.as_deref(), Some("fs"));
        assert_eq!(file.imports[1].path, "path");
        // Destructured require also records the binding components.
        assert_eq!(file.destructurings.len(), 1);
        assert_eq!(file.destructurings[0].components, vec!["join"]);
    }

    #[test]
    fn extracts_class_and_methods() {
        let file = parse(
            "export class Queue {\n\
                 items = [];\n\
                 constructor(limit) { this.limit = limit; }\n\
                 push(item) { this.items.push(item); validate(item); }\n\
             }\n",
        );
        let class = &file.classes[0];
        assert_eq!(class.name, "Queue");
        assert_eq!(class.visibility, Visibility::Public);
        assert_eq!(class.secondary_constructors.len(), 1);
        assert_eq!(class.functions.len(), 1);
        let push = &class.functions[0];
        assert_eq!(push.calls.len(), 2);
        assert_eq!(push.calls[0].receiver.as_deref(), Some("this.items"));
        assert!(push.calls[1].receiver.is_none());
    }

    #[test]
    fn new_expression_is_constructor_call() {
        let file = parse("function go() { const q = new Queue(10); q.push(1); }\n");
        let function = &file.functions[0];
        let ctor = function.calls.iter().find(|c| c.is_constructor_call).unwrap();
        assert_eq!(ctor.name, "Queue");
        assert_eq!(function.local_variables[0].type_name, "Queue");
    }

    #[test]
    fn optional_chain_is_safe_call() {
        let file = parse("function go(user) { user?.refresh(); }\n");
        assert!(file.functions[0].calls[0].is_safe_call);
    }

    #[test]
    fn array_destructuring_preserves_holes() {
        let file = parse("const [a, , c] = rows;\n");
        assert_eq!(file.destructurings[0].components, vec!["a", "_", "c"]);
    }

    #[test]
    fn arrow_const_is_a_function() {
        let file = parse("export const handler = (req) => { dispatch(req); };\n");
        assert_eq!(file.functions.len(), 1);
        assert_eq!(file.functions[0].name, "handler");
        assert_eq!(file.functions[0].calls.len(), 1);
    }
}
