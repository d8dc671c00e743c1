//! TypeScript language parser.
//!
//! TypeScript has no package declaration; `package_name` stays empty
//! here and the pipeline infers a module path from the file path.
//! Overload signatures that precede an implementation are merged into
//! the implementation's `overloads` list; ambient signatures without an
//! implementation are emitted standalone.

use crate::parsing::ast::{
    find_child_of_kind, find_child_of_kinds, node_location, node_text, split_top_level_commas,
    trimmed_text,
};
use crate::parsing::parser::{
    ParseOutcome, check_recursion_depth, parse_failure_diagnostic, partial_parse_diagnostic,
};
use crate::parsing::{
    AnnotationArgument, CHAINED_CALL_RECEIVER, Language, LanguageParser, ParsedAnnotation,
    ParsedCall, ParsedClass, ParsedDestructuring, ParsedFile, ParsedFunction, ParsedImport,
    ParsedLocalVariable, ParsedParameter, ParsedProperty, ParsedTypeAlias,
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
const NODE_FUNCTION_SIGNATURE: &str = "function_signature";
const NODE_CLASS_DECLARATION: &str = "class_declaration";
const NODE_ABSTRACT_CLASS_DECLARATION: &str = "abstract_class_declaration";
const NODE_INTERFACE_DECLARATION: &str = "interface_declaration";
const NODE_ENUM_DECLARATION: &str = "enum_declaration";
const NODE_TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";
const NODE_INTERNAL_MODULE: &str = "internal_module";
const NODE_MODULE: &str = "module";
const NODE_LEXICAL_DECLARATION: &str = "lexical_declaration";
const NODE_VARIABLE_DECLARATION: &str = "variable_declaration";
const NODE_VARIABLE_DECLARATOR: &str = "variable_declarator";
const NODE_CLASS_BODY: &str = "class_body";
const NODE_CLASS_HERITAGE: &str = "class_heritage";
const NODE_EXTENDS_CLAUSE: &str = "extends_clause";
const NODE_IMPLEMENTS_CLAUSE: &str = "implements_clause";
const NODE_METHOD_DEFINITION: &str = "method_definition";
const NODE_METHOD_SIGNATURE: &str = "method_signature";
const NODE_ABSTRACT_METHOD_SIGNATURE: &str = "abstract_method_signature";
const NODE_PUBLIC_FIELD_DEFINITION: &str = "public_field_definition";
const NODE_PROPERTY_SIGNATURE: &str = "property_signature";
const NODE_INTERFACE_BODY: &str = "interface_body";
const NODE_OBJECT_TYPE: &str = "object_type";
const NODE_ENUM_BODY: &str = "enum_body";
const NODE_ENUM_ASSIGNMENT: &str = "enum_assignment";
const NODE_CALL_EXPRESSION: &str = "call_expression";
const NODE_NEW_EXPRESSION: &str = "new_expression";
const NODE_MEMBER_EXPRESSION: &str = "member_expression";
const NODE_ARGUMENTS: &str = "arguments";
const NODE_FORMAL_PARAMETERS: &str = "formal_parameters";
const NODE_REQUIRED_PARAMETER: &str = "required_parameter";
const NODE_OPTIONAL_PARAMETER: &str = "optional_parameter";
const NODE_REST_PATTERN: &str = "rest_pattern";
const NODE_TYPE_ANNOTATION: &str = "type_annotation";
const NODE_ACCESSIBILITY_MODIFIER: &str = "accessibility_modifier";
const NODE_DECORATOR: &str = "decorator";
const NODE_IDENTIFIER: &str = "identifier";
const NODE_PROPERTY_IDENTIFIER: &str = "property_identifier";
const NODE_TYPE_IDENTIFIER: &str = "type_identifier";
const NODE_NESTED_IDENTIFIER: &str = "nested_identifier";
const NODE_OBJECT_PATTERN: &str = "object_pattern";
const NODE_ARRAY_PATTERN: &str = "array_pattern";
const NODE_ARROW_FUNCTION: &str = "arrow_function";
const NODE_FUNCTION_EXPRESSION: &str = "function_expression";
const NODE_STATEMENT_BLOCK: &str = "statement_block";
const NODE_AS_EXPRESSION: &str = "as_expression";
const NODE_OPTIONAL_CHAIN: &str = "optional_chain";
const NODE_TYPE_PARAMETERS: &str = "type_parameters";
const NODE_TYPE_PARAMETER: &str = "type_parameter";
const NODE_STRING: &str = "string";
const NODE_STRING_FRAGMENT: &str = "string_fragment";

fn literal_type_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "number" => Some("number"),
        "string" | "template_string" => Some("string"),
        "true" | "false" => Some("boolean"),
        "regex" => Some("RegExp"),
        "object" => Some("object"),
        "null" | "undefined" => None,
        _ => None,
    }
}

/// Parser for TypeScript source files.
pub struct TypeScriptParser {
    parser: Parser,
}

impl std::fmt::Debug for TypeScriptParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeScriptParser")
            .field("language", &"TypeScript")
            .finish()
    }
}

impl TypeScriptParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| format!("Failed to initialize TypeScript parser: {e}"))?;
        Ok(Self { parser })
    }

    fn extract_program(&self, root: Node, code: &str, file: &mut ParsedFile) {
        // Pending overload signatures waiting for their implementation.
        let mut pending_signatures: Vec<ParsedFunction> = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            self.extract_top_level(child, code, file, false, &mut pending_signatures);
        }
        self.flush_signatures(&mut pending_signatures, &mut file.functions);
    }

    fn extract_top_level(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        exported: bool,
        pending_signatures: &mut Vec<ParsedFunction>,
    ) {
        match node.kind() {
            NODE_EXPORT_STATEMENT => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.is_named() {
                        self.extract_top_level(child, code, file, true, pending_signatures);
                    }
                }
            }
            NODE_IMPORT_STATEMENT => {
                file.imports.extend(self.extract_imports(node, code));
            }
            NODE_FUNCTION_DECLARATION => {
                if let Some(mut function) = self.extract_function(node, code, file, exported, 0) {
                    // Adopt pending same-named signatures as overloads.
                    let (matching, rest): (Vec<_>, Vec<_>) = pending_signatures
                        .drain(..)
                        .partition(|s| s.name == function.name);
                    *pending_signatures = rest;
                    function.overloads = matching;
                    file.functions.push(function);
                }
            }
            NODE_FUNCTION_SIGNATURE => {
                if let Some(mut signature) = self.extract_function(node, code, file, exported, 0) {
                    signature.is_overload_signature = true;
                    pending_signatures.push(signature);
                }
            }
            NODE_CLASS_DECLARATION | NODE_ABSTRACT_CLASS_DECLARATION => {
                if let Some(class) = self.extract_class(node, code, file, exported, 0) {
                    file.classes.push(class);
                }
            }
            NODE_INTERFACE_DECLARATION => {
                if let Some(interface) = self.extract_interface(node, code, file, exported) {
                    file.classes.push(interface);
                }
            }
            NODE_ENUM_DECLARATION => {
                if let Some(parsed_enum) = self.extract_enum(node, code, file, exported) {
                    file.classes.push(parsed_enum);
                }
            }
            NODE_TYPE_ALIAS_DECLARATION => {
                if let Some(alias) = self.extract_type_alias(node, code, &file.path, exported) {
                    file.type_aliases.push(alias);
                }
            }
            NODE_INTERNAL_MODULE | NODE_MODULE => {
                if let Some(namespace) = self.extract_namespace(node, code, file, exported) {
                    file.classes.push(namespace);
                }
            }
            NODE_LEXICAL_DECLARATION | NODE_VARIABLE_DECLARATION => {
                self.extract_variable_statement(node, code, file, exported);
            }
            _ => {}
        }
    }

    /// Signatures with no implementation in scope are emitted standalone.
    fn flush_signatures(
        &self,
        pending_signatures: &mut Vec<ParsedFunction>,
        functions: &mut Vec<ParsedFunction>,
    ) {
        functions.append(pending_signatures);
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
        let is_type_only = {
            let mut cursor = node.walk();
            node.children(&mut cursor).any(|c| c.kind() == "type")
        };

        let mut imports = Vec::new();
        let Some(clause) = find_child_of_kind(node, NODE_IMPORT_CLAUSE) else {
            // Side-effect import: `import "./polyfill"`.
            let mut import = ParsedImport::new(path);
            import.is_type_only = is_type_only;
            imports.push(import);
            return imports;
        };

        let mut cursor = clause.walk();
        for child in clause.children(&mut cursor) {
            match child.kind() {
                NODE_IDENTIFIER => {
                    // Default import.
                    let mut import = ParsedImport::new(path.clone());
                    import.imported_name = Some("default".to_string());
                    import.alias = Some(trimmed_text(child, code).to_string());
                    import.is_type_only = is_type_only;
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
                                .filter(|n| {
                                    n.kind() == NODE_IDENTIFIER
                                        || n.kind() == NODE_TYPE_IDENTIFIER
                                })
                                .collect()
                        };
                        let Some(first) = names.first() else { continue };
                        let mut import = ParsedImport::new(path.clone());
                        import.imported_name = Some(trimmed_text(*first, code).to_string());
                        if let Some(alias) = names.get(1) {
                            import.alias = Some(trimmed_text(*alias, code).to_string());
                        }
                        import.is_type_only =
                            is_type_only || node_text(spec, code).trim_start().starts_with("type ");
                        imports.push(import);
                    }
                }
                NODE_NAMESPACE_IMPORT => {
                    let mut import = ParsedImport::new(path.clone());
                    import.is_wildcard = true;
                    import.is_type_only = is_type_only;
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
        depth: usize,
    ) -> Option<ParsedFunction> {
        if !check_recursion_depth(depth, node) {
            return None;
        }
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

        if let Some(type_params) = find_child_of_kind(node, NODE_TYPE_PARAMETERS) {
            function.type_parameters = self.extract_type_parameters(type_params, code);
        }
        if let Some(params) = node
            .child_by_field_name("parameters")
            .or_else(|| find_child_of_kind(node, NODE_FORMAL_PARAMETERS))
        {
            function.parameters = self.extract_parameters(params, code);
        }
        if let Some(return_type) = node
            .child_by_field_name("return_type")
            .or_else(|| find_child_of_kind(node, NODE_TYPE_ANNOTATION))
        {
            function.return_type = Some(self.type_annotation_text(return_type, code));
        }
        if let Some(body) = node
            .child_by_field_name("body")
            .filter(|b| b.kind() == NODE_STATEMENT_BLOCK)
        {
            self.collect_calls(
                body,
                code,
                file,
                &mut function.calls,
                &mut function.local_variables,
                depth,
            );
        }
        Some(function)
    }

    fn type_annotation_text(&self, annotation: Node, code: &str) -> String {
        // Drop the leading ':' of a type_annotation node.
        let text = trimmed_text(annotation, code);
        text.trim_start_matches(':').trim().to_string()
    }

    fn extract_type_parameters(&self, node: Node, code: &str) -> Vec<String> {
        let mut params = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != NODE_TYPE_PARAMETER {
                continue;
            }
            if let Some(name) = find_child_of_kind(child, NODE_TYPE_IDENTIFIER) {
                params.push(trimmed_text(name, code).to_string());
            }
        }
        params
    }

    fn extract_parameters(&self, params: Node, code: &str) -> Vec<ParsedParameter> {
        let mut parameters = Vec::new();
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            if child.kind() != NODE_REQUIRED_PARAMETER && child.kind() != NODE_OPTIONAL_PARAMETER {
                continue;
            }
            let pattern = child
                .child_by_field_name("pattern")
                .or_else(|| find_child_of_kinds(child, &[NODE_IDENTIFIER, NODE_REST_PATTERN]));
            let Some(pattern) = pattern else { continue };

            let (name, is_variadic) = match pattern.kind() {
                NODE_REST_PATTERN => {
                    let name = find_child_of_kind(pattern, NODE_IDENTIFIER)
                        .map(|n| trimmed_text(n, code).to_string())
                        .unwrap_or_else(|| "rest".to_string());
                    (name, true)
                }
                NODE_IDENTIFIER => (trimmed_text(pattern, code).to_string(), false),
                // Destructured parameter; keep the raw pattern text.
                _ => (trimmed_text(pattern, code).to_string(), false),
            };

            let mut parameter = ParsedParameter::new(name);
            parameter.is_variadic = is_variadic;
            if let Some(annotation) = find_child_of_kind(child, NODE_TYPE_ANNOTATION) {
                parameter.type_name = Some(self.type_annotation_text(annotation, code));
            }
            if let Some(value) = child.child_by_field_name("value") {
                parameter.default_value = Some(trimmed_text(value, code).to_string());
            } else if child.kind() == NODE_OPTIONAL_PARAMETER {
                // `x?: T` binds undefined when the argument is omitted.
                parameter.default_value = Some("undefined".to_string());
            }
            for decorator in crate::parsing::ast::children_of_kind(child, NODE_DECORATOR) {
                parameter
                    .annotations
                    .push(self.extract_decorator(decorator, code));
            }
            parameters.push(parameter);
        }
        parameters
    }

    fn extract_decorator(&self, node: Node, code: &str) -> ParsedAnnotation {
        let raw = trimmed_text(node, code).trim_start_matches('@');
        let (name, args) = match raw.find('(') {
            Some(idx) => (&raw[..idx], Some(&raw[idx + 1..raw.rfind(')').unwrap_or(raw.len())])),
            None => (raw, None),
        };
        let mut annotation = ParsedAnnotation::new(name.trim());
        if let Some(args) = args {
            for piece in split_top_level_commas(args) {
                let piece = piece.trim();
                if piece.is_empty() {
                    continue;
                }
                annotation.arguments.push(AnnotationArgument {
                    name: None,
                    value: piece.to_string(),
                });
            }
        }
        annotation
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
            .or_else(|| find_child_of_kind(node, NODE_TYPE_IDENTIFIER))?;
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
        class.modifiers.is_abstract = node.kind() == NODE_ABSTRACT_CLASS_DECLARATION;

        for decorator in crate::parsing::ast::children_of_kind(node, NODE_DECORATOR) {
            class.annotations.push(self.extract_decorator(decorator, code));
        }
        if let Some(type_params) = find_child_of_kind(node, NODE_TYPE_PARAMETERS) {
            class.type_parameters = self.extract_type_parameters(type_params, code);
        }
        if let Some(heritage) = find_child_of_kind(node, NODE_CLASS_HERITAGE) {
            if let Some(extends) = find_child_of_kind(heritage, NODE_EXTENDS_CLAUSE) {
                let mut cursor = extends.walk();
                if let Some(value) = extends
                    .children(&mut cursor)
                    .find(|c| c.is_named() && c.kind() != "type_arguments")
                {
                    class.super_class = Some(trimmed_text(value, code).to_string());
                }
            }
            if let Some(implements) = find_child_of_kind(heritage, NODE_IMPLEMENTS_CLAUSE) {
                let mut cursor = implements.walk();
                for t in implements.children(&mut cursor) {
                    if t.is_named() {
                        class.interfaces.push(trimmed_text(t, code).to_string());
                    }
                }
            }
        }
        if let Some(body) = find_child_of_kind(node, NODE_CLASS_BODY) {
            self.extract_class_body(body, code, file, &mut class, depth);
        }
        Some(class)
    }

    fn extract_class_body(
        &self,
        body: Node,
        code: &str,
        file: &mut ParsedFile,
        class: &mut ParsedClass,
        depth: usize,
    ) {
        let mut pending_signatures: Vec<ParsedFunction> = Vec::new();

        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                NODE_METHOD_DEFINITION => {
                    let Some(mut method) = self.extract_method(member, code, file, depth + 1)
                    else {
                        continue;
                    };
                    let (matching, rest): (Vec<_>, Vec<_>) = pending_signatures
                        .drain(..)
                        .partition(|s| s.name == method.name);
                    pending_signatures = rest;
                    method.overloads = matching;
                    if method.name == "constructor" {
                        method.name = "<init>".to_string();
                        self.extract_parameter_properties(member, code, file, class);
                        class.secondary_constructors.push(method);
                    } else {
                        class.functions.push(method);
                    }
                }
                NODE_METHOD_SIGNATURE | NODE_ABSTRACT_METHOD_SIGNATURE => {
                    if let Some(mut signature) = self.extract_method(member, code, file, depth + 1)
                    {
                        signature.is_overload_signature = true;
                        signature.modifiers.is_abstract =
                            member.kind() == NODE_ABSTRACT_METHOD_SIGNATURE;
                        pending_signatures.push(signature);
                    }
                }
                NODE_PUBLIC_FIELD_DEFINITION => {
                    if let Some(property) = self.extract_field(member, code, file) {
                        class.properties.push(property);
                    }
                }
                _ => {}
            }
        }
        self.flush_signatures(&mut pending_signatures, &mut class.functions);
    }

    fn member_visibility(&self, node: Node, code: &str) -> Visibility {
        match find_child_of_kind(node, NODE_ACCESSIBILITY_MODIFIER) {
            Some(modifier) => match node_text(modifier, code) {
                "private" => Visibility::Private,
                "protected" => Visibility::Protected,
                _ => Visibility::Public,
            },
            None => Visibility::Public,
        }
    }

    fn extract_method(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedFunction> {
        let name_node = node.child_by_field_name("name")?;
        let mut method = ParsedFunction::new(
            trimmed_text(name_node, code),
            node_location(node, &file.path),
        );
        method.visibility = self.member_visibility(node, code);
        method.modifiers.is_async = node_text(node, code).contains("async ");

        for decorator in crate::parsing::ast::children_of_kind(node, NODE_DECORATOR) {
            method.annotations.push(self.extract_decorator(decorator, code));
        }
        if let Some(type_params) = find_child_of_kind(node, NODE_TYPE_PARAMETERS) {
            method.type_parameters = self.extract_type_parameters(type_params, code);
        }
        if let Some(params) = node
            .child_by_field_name("parameters")
            .or_else(|| find_child_of_kind(node, NODE_FORMAL_PARAMETERS))
        {
            method.parameters = self.extract_parameters(params, code);
        }
        if let Some(return_type) = node.child_by_field_name("return_type") {
            method.return_type = Some(self.type_annotation_text(return_type, code));
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_calls(
                body,
                code,
                file,
                &mut method.calls,
                &mut method.local_variables,
                depth,
            );
        }
        Some(method)
    }

    /// Constructor parameter properties: `constructor(private db: Store)`
    /// declares both a parameter and a class property.
    fn extract_parameter_properties(
        &self,
        ctor: Node,
        code: &str,
        file: &ParsedFile,
        class: &mut ParsedClass,
    ) {
        let Some(params) = ctor.child_by_field_name("parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            if child.kind() != NODE_REQUIRED_PARAMETER && child.kind() != NODE_OPTIONAL_PARAMETER {
                continue;
            }
            if find_child_of_kind(child, NODE_ACCESSIBILITY_MODIFIER).is_none()
                && !node_text(child, code).contains("readonly ")
            {
                continue;
            }
            let Some(name) = child
                .child_by_field_name("pattern")
                .filter(|p| p.kind() == NODE_IDENTIFIER)
            else {
                continue;
            };
            let mut property = ParsedProperty::new(
                trimmed_text(name, code),
                node_location(child, &file.path),
            );
            property.visibility = self.member_visibility(child, code);
            property.is_immutable = node_text(child, code).contains("readonly ");
            if let Some(annotation) = find_child_of_kind(child, NODE_TYPE_ANNOTATION) {
                property.type_name = Some(self.type_annotation_text(annotation, code));
            }
            class.properties.push(property);
        }
    }

    fn extract_field(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
    ) -> Option<ParsedProperty> {
        let name_node = node.child_by_field_name("name")?;
        let mut property = ParsedProperty::new(
            trimmed_text(name_node, code),
            node_location(node, &file.path),
        );
        property.visibility = self.member_visibility(node, code);
        property.is_immutable = node_text(node, code).contains("readonly ");
        if let Some(annotation) = find_child_of_kind(node, NODE_TYPE_ANNOTATION) {
            property.type_name = Some(self.type_annotation_text(annotation, code));
        }
        for decorator in crate::parsing::ast::children_of_kind(node, NODE_DECORATOR) {
            property.annotations.push(self.extract_decorator(decorator, code));
        }
        if let Some(value) = node.child_by_field_name("value") {
            property.initializer = Some(trimmed_text(value, code).to_string());
            if property.type_name.is_none() {
                property.type_name = constructed_type(value, code);
            }
        }
        Some(property)
    }

    fn extract_interface(
        &self,
        node: Node,
        code: &str,
        file: &ParsedFile,
        exported: bool,
    ) -> Option<ParsedClass> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_TYPE_IDENTIFIER))?;
        let mut interface = ParsedClass::new(
            trimmed_text(name_node, code),
            ClassKind::Interface,
            node_location(node, &file.path),
        );
        interface.visibility = if exported {
            Visibility::Public
        } else {
            Visibility::Internal
        };
        if let Some(type_params) = find_child_of_kind(node, NODE_TYPE_PARAMETERS) {
            interface.type_parameters = self.extract_type_parameters(type_params, code);
        }
        if let Some(extends) = find_child_of_kind(node, "extends_type_clause") {
            let mut cursor = extends.walk();
            for t in extends.children(&mut cursor) {
                if t.is_named() {
                    interface.interfaces.push(trimmed_text(t, code).to_string());
                }
            }
        }

        let body = find_child_of_kinds(node, &[NODE_INTERFACE_BODY, NODE_OBJECT_TYPE])?;
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                NODE_PROPERTY_SIGNATURE => {
                    let Some(name) = member.child_by_field_name("name") else {
                        continue;
                    };
                    let mut property = ParsedProperty::new(
                        trimmed_text(name, code),
                        node_location(member, &file.path),
                    );
                    property.is_immutable = node_text(member, code).contains("readonly ");
                    if let Some(annotation) = find_child_of_kind(member, NODE_TYPE_ANNOTATION) {
                        property.type_name = Some(self.type_annotation_text(annotation, code));
                    }
                    interface.properties.push(property);
                }
                NODE_METHOD_SIGNATURE => {
                    let mut dummy = ParsedFile::new(file.path.clone(), file.language);
                    if let Some(mut method) = self.extract_method(member, code, &mut dummy, 0) {
                        method.modifiers.is_abstract = true;
                        interface.functions.push(method);
                    }
                }
                _ => {}
            }
        }
        Some(interface)
    }

    fn extract_enum(
        &self,
        node: Node,
        code: &str,
        file: &ParsedFile,
        exported: bool,
    ) -> Option<ParsedClass> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_IDENTIFIER))?;
        let mut parsed_enum = ParsedClass::new(
            trimmed_text(name_node, code),
            ClassKind::Enum,
            node_location(node, &file.path),
        );
        parsed_enum.visibility = if exported {
            Visibility::Public
        } else {
            Visibility::Internal
        };

        let body = find_child_of_kind(node, NODE_ENUM_BODY)?;
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            let name = match member.kind() {
                NODE_ENUM_ASSIGNMENT => member.child_by_field_name("name"),
                NODE_PROPERTY_IDENTIFIER => Some(member),
                _ => None,
            };
            if let Some(name) = name {
                let mut constant = ParsedProperty::new(
                    trimmed_text(name, code),
                    node_location(member, &file.path),
                );
                constant.type_name = Some(parsed_enum.name.clone());
                constant.is_immutable = true;
                parsed_enum.properties.push(constant);
            }
        }
        Some(parsed_enum)
    }

    fn extract_type_alias(
        &self,
        node: Node,
        code: &str,
        path: &str,
        exported: bool,
    ) -> Option<ParsedTypeAlias> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_TYPE_IDENTIFIER))?;
        let value = node.child_by_field_name("value")?;
        Some(ParsedTypeAlias {
            name: trimmed_text(name_node, code).to_string(),
            aliased_type: trimmed_text(value, code).to_string(),
            visibility: if exported {
                Visibility::Public
            } else {
                Visibility::Internal
            },
            type_parameters: find_child_of_kind(node, NODE_TYPE_PARAMETERS)
                .map(|tp| self.extract_type_parameters(tp, code))
                .unwrap_or_default(),
            location: node_location(node, path),
        })
    }

    /// `namespace X { ... }` maps to an object-kinded container.
    fn extract_namespace(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        exported: bool,
    ) -> Option<ParsedClass> {
        let name_node = find_child_of_kinds(node, &[NODE_IDENTIFIER, NODE_NESTED_IDENTIFIER])?;
        let mut namespace = ParsedClass::new(
            trimmed_text(name_node, code),
            ClassKind::Object,
            node_location(node, &file.path),
        );
        namespace.visibility = if exported {
            Visibility::Public
        } else {
            Visibility::Internal
        };

        let body = find_child_of_kind(node, NODE_STATEMENT_BLOCK)?;
        let mut pending_signatures: Vec<ParsedFunction> = Vec::new();
        let mut inner = ParsedFile::new(file.path.clone(), file.language);
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            self.extract_top_level(child, code, &mut inner, false, &mut pending_signatures);
        }
        self.flush_signatures(&mut pending_signatures, &mut inner.functions);

        namespace.functions = inner.functions;
        namespace.properties = inner.properties;
        namespace.nested_classes = inner.classes;
        file.type_aliases.extend(inner.type_aliases);
        file.destructurings.extend(inner.destructurings);
        file.object_expressions.extend(inner.object_expressions);
        Some(namespace)
    }

    /// `const`/`let`/`var` statements: arrow-function values become
    /// functions, destructuring patterns become destructuring entries,
    /// everything else becomes a property.
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
            match name_node.kind() {
                NODE_OBJECT_PATTERN | NODE_ARRAY_PATTERN => {
                    if let Some(destructuring) =
                        self.extract_destructuring(name_node, declarator, code, &file.path, is_const)
                    {
                        file.destructurings.push(destructuring);
                    }
                }
                NODE_IDENTIFIER => {
                    let value = declarator.child_by_field_name("value");
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
                        if let Some(return_type) = value.child_by_field_name("return_type") {
                            function.return_type =
                                Some(self.type_annotation_text(return_type, code));
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
                        if let Some(annotation) =
                            find_child_of_kind(declarator, NODE_TYPE_ANNOTATION)
                        {
                            property.type_name = Some(self.type_annotation_text(annotation, code));
                        }
                        if let Some(value) = value {
                            property.initializer = Some(trimmed_text(value, code).to_string());
                            if property.type_name.is_none() {
                                property.type_name = constructed_type(value, code);
                            }
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
                // Track holes between commas to keep positions aligned.
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
                self.record_local_variables(node, code, file, locals);
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

        // `import("module")` is a dynamic import, not a call edge.
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

        let (name, receiver, is_safe_call) = match callee.kind() {
            NODE_IDENTIFIER => (trimmed_text(callee, code).to_string(), None, false),
            NODE_MEMBER_EXPRESSION => {
                let property = callee.child_by_field_name("property")?;
                let object = callee.child_by_field_name("object")?;
                let is_safe = crate::parsing::ast::has_child_of_kind(callee, NODE_OPTIONAL_CHAIN);
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
            NODE_AS_EXPRESSION => {
                let mut cursor = node.walk();
                node.named_children(&mut cursor)
                    .last()
                    .map(|t| trimmed_text(t, code).to_string())
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
            }
            _ => UNKNOWN_TYPE.to_string(),
        }
    }

    fn record_local_variables(
        &self,
        node: Node,
        code: &str,
        file: &ParsedFile,
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
            let type_name = find_child_of_kind(declarator, NODE_TYPE_ANNOTATION)
                .map(|a| self.type_annotation_text(a, code))
                .or_else(|| {
                    declarator
                        .child_by_field_name("value")
                        .and_then(|v| constructed_type(v, code))
                });
            if let Some(type_name) = type_name {
                locals.push(ParsedLocalVariable {
                    name: trimmed_text(name, code).to_string(),
                    type_name,
                    location: node_location(declarator, &file.path),
                });
            }
        }
    }
}

impl LanguageParser for TypeScriptParser {
    fn parse(&mut self, code: &str, path: &str) -> ParseOutcome {
        let Some(tree) = self.parser.parse(code, None) else {
            return ParseOutcome::Failed(parse_failure_diagnostic(path, Language::TypeScript));
        };
        let root = tree.root_node();
        let mut file = ParsedFile::new(path, Language::TypeScript);
        self.extract_program(root, code, &mut file);

        if root.has_error() {
            ParseOutcome::Partial(file, partial_parse_diagnostic(path, Language::TypeScript))
        } else {
            ParseOutcome::Clean(file)
        }
    }

    fn language(&self) -> Language {
        Language::TypeScript
    }
}

/// `new Store()` initializer gives a variable or field the type `Store`.
fn constructed_type(value: Node, code: &str) -> Option<String> {
    if value.kind() != NODE_NEW_EXPRESSION {
        return None;
    }
    value.child_by_field_name("constructor").map(|c| {
        crate::parsing::ast::strip_generics(trimmed_text(c, code)).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> ParsedFile {
        let mut parser = TypeScriptParser::new().unwrap();
        match parser.parse(code, "src/app.ts") {
            ParseOutcome::Clean(f) | ParseOutcome::Partial(f, _) => f,
            ParseOutcome::Failed(d) => panic!("parse failed: {d:?}"),
        }
    }

    #[test]
    fn extracts_import_variants() {
        let file = parse(
            "import Default from './a';\n\
             import { one, two as duo } from './b';\n\
             import * as ns from './c';\n\
             import type { OnlyType } from './d';\n",
        );
        assert_eq!(file.imports.len(), 5);
        assert_eq!(file.imports[0].alias.as_deref(), Some("Default"));
        assert_eq!(file.imports[1].imported_name.as_deref(), Some("one"));
        assert_eq!(file.imports[2].imported_name.as_deref(), Some("two"));
        assert_eq!(file.imports[2].alias.as_deref(), Some("duo"));
        assert!(file.imports[3].is_wildcard);
        assert_eq!(file.imports[3].alias.as_deref(), Some("ns"));
        assert!(file.imports[4].is_type_only);
    }

    #[test]
    fn export_maps_to_public_visibility() {
        let file = parse(
            "export class Shown {}\n\
             class Hidden {}\n",
        );
        assert_eq!(file.classes[0].visibility, Visibility::Public);
        assert_eq!(file.classes[1].visibility, Visibility::Internal);
    }

    #[test]
    fn extracts_class_with_heritage_and_members() {
        let file = parse(
            "export class UserService extends Base implements Audited {\n\
                 private readonly store: Store;\n\
                 find(id: number): User { return this.store.get(id); }\n\
             }\n",
        );
        let class = &file.classes[0];
        assert_eq!(class.super_class.as_deref(), Some("Base"));
        assert_eq!(class.interfaces, vec!["Audited"]);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].type_name.as_deref(), Some("Store"));
        assert!(class.properties[0].is_immutable);
        let method = &class.functions[0];
        assert_eq!(method.return_type.as_deref(), Some("User"));
        assert_eq!(method.calls.len(), 1);
        assert_eq!(method.calls[0].receiver.as_deref(), Some("this.store"));
    }

    #[test]
    fn constructor_becomes_init_with_parameter_properties() {
        let file = parse(
            "export class Api {\n\
                 constructor(private client: HttpClient, timeout: number) {}\n\
             }\n",
        );
        let class = &file.classes[0];
        assert_eq!(class.secondary_constructors.len(), 1);
        assert_eq!(class.secondary_constructors[0].name, "<init>");
        assert_eq!(class.secondary_constructors[0].parameters.len(), 2);
        // Only the accessibility-modified parameter became a property.
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].name, "client");
        assert_eq!(class.properties[0].type_name.as_deref(), Some("HttpClient"));
    }

    #[test]
    fn overload_signatures_merge_into_implementation() {
        let file = parse(
            "export function pick(value: string): string;\n\
             export function pick(value: number): number;\n\
             export function pick(value: unknown): unknown { return value; }\n",
        );
        assert_eq!(file.functions.len(), 1);
        let function = &file.functions[0];
        assert_eq!(function.overloads.len(), 2);
        assert!(function.overloads.iter().all(|o| o.is_overload_signature));
        assert!(!function.is_overload_signature);
    }

    #[test]
    fn ambient_signature_without_implementation_is_standalone() {
        let file = parse("export function ambient(value: string): string;\n");
        assert_eq!(file.functions.len(), 1);
        assert!(file.functions[0].is_overload_signature);
    }

    #[test]
    fn captures_calls_new_and_optional_chain() {
        let file = parse(
            "function go(repo: Repo) {\n\
                 repo.save(1);\n\
                 const user = new User('a');\n\
                 user?.refresh();\n\
                 fetchAll().then(done);\n\
             }\n",
        );
        let function = &file.functions[0];
        let save = function.calls.iter().find(|c| c.name == "save").unwrap();
        assert_eq!(save.receiver.as_deref(), Some("repo"));
        assert_eq!(save.argument_types.as_ref().unwrap()[0], "number");

        let ctor = function.calls.iter().find(|c| c.is_constructor_call).unwrap();
        assert_eq!(ctor.name, "User");

        let refresh = function.calls.iter().find(|c| c.name == "refresh").unwrap();
        assert!(refresh.is_safe_call);

        let then = function.calls.iter().find(|c| c.name == "then").unwrap();
        assert_eq!(then.receiver.as_deref(), Some(CHAINED_CALL_RECEIVER));

        // Local variable got its type from the constructor initializer.
        assert_eq!(function.local_variables[0].name, "user");
        assert_eq!(function.local_variables[0].type_name, "User");
    }

    #[test]
    fn destructuring_preserves_holes() {
        let file = parse(
            "const { host, port } = loadConfig();\n\
             const [first, , third] = items;\n",
        );
        assert_eq!(file.destructurings.len(), 2);
        assert_eq!(file.destructurings[0].components, vec!["host", "port"]);
        assert_eq!(
            file.destructurings[1].components,
            vec!["first", "_", "third"]
        );
    }

    #[test]
    fn arrow_function_const_becomes_function() {
        let file = parse("export const handler = async (req: Request) => { dispatch(req); };\n");
        assert_eq!(file.functions.len(), 1);
        let function = &file.functions[0];
        assert_eq!(function.name, "handler");
        assert!(function.modifiers.is_async);
        assert_eq!(function.parameters.len(), 1);
        assert_eq!(function.calls.len(), 1);
    }

    #[test]
    fn interface_enum_and_alias_extraction() {
        let file = parse(
            "export interface Shape { area(): number; readonly kind: string; }\n\
             export enum Color { Red, Green }\n\
             export type Users = UserList;\n",
        );
        let interface = file.classes.iter().find(|c| c.name == "Shape").unwrap();
        assert_eq!(interface.kind, ClassKind::Interface);
        assert_eq!(interface.functions.len(), 1);
        assert_eq!(interface.properties.len(), 1);

        let color = file.classes.iter().find(|c| c.name == "Color").unwrap();
        assert_eq!(color.kind, ClassKind::Enum);
        assert_eq!(color.properties.len(), 2);

        assert_eq!(file.type_aliases[0].name, "Users");
        assert_eq!(file.type_aliases[0].aliased_type, "UserList");
    }

    #[test]
    fn namespace_maps_to_object_container() {
        let file = parse(
            "export namespace Util {\n\
                 export function format(s: string): string { return s; }\n\
             }\n",
        );
        let namespace = &file.classes[0];
        assert_eq!(namespace.kind, ClassKind::Object);
        assert_eq!(namespace.name, "Util");
        assert_eq!(namespace.functions.len(), 1);
    }

    #[test]
    fn dynamic_import_is_recorded() {
        let file = parse("async function load() { const m = await import('./lazy'); }\n");
        assert!(file.imports.iter().any(|i| i.is_dynamic && i.path == "./lazy"));
    }

    #[test]
    fn array_literal_infers_element_type() {
        let file = parse("function go() { push([1, 2]); }\n");
        let call = &file.functions[0].calls[0];
        assert_eq!(call.argument_types.as_ref().unwrap()[0], "Array<number>");
    }

    #[test]
    fn split_commas_respects_nesting() {
        assert_eq!(
            split_top_level_commas("a, f(b, c), {d: 1, e: 2}"),
            vec!["a", " f(b, c)", " {d: 1, e: 2}"]
        );
    }
}
