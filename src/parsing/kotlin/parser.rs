//! Kotlin language parser.
//!
//! Lifts a Kotlin file into the language-neutral parsed model using
//! tree-sitter. Organized as an extractor family: one function per
//! concrete-syntax-tree shape, dispatched over node kinds.

use crate::parsing::ast::{
    constructor_type_from_initializer, find_child_of_kind, find_child_of_kinds, node_location,
    node_text, split_top_level_commas, trimmed_text,
};
use crate::parsing::parser::{
    ParseOutcome, check_recursion_depth, parse_failure_diagnostic, partial_parse_diagnostic,
};
use crate::parsing::{
    AnnotationArgument, CHAINED_CALL_RECEIVER, Language, LanguageParser, ParsedAnnotation,
    ParsedCall, ParsedClass, ParsedDestructuring, ParsedFile, ParsedFunction, ParsedImport,
    ParsedLocalVariable, ParsedObjectExpression, ParsedParameter, ParsedProperty, ParsedTypeAlias,
};
use crate::types::{ClassKind, UNKNOWN_TYPE, Visibility};
use tree_sitter::{Node, Parser};

const NODE_PACKAGE_HEADER: &str = "package_header";
const NODE_IMPORT_HEADER: &str = "import_header";
const NODE_IMPORT_LIST: &str = "import_list";
const NODE_IMPORT_ALIAS: &str = "import_alias";
const NODE_CLASS_DECLARATION: &str = "class_declaration";
const NODE_OBJECT_DECLARATION: &str = "object_declaration";
const NODE_COMPANION_OBJECT: &str = "companion_object";
const NODE_FUNCTION_DECLARATION: &str = "function_declaration";
const NODE_PROPERTY_DECLARATION: &str = "property_declaration";
const NODE_SECONDARY_CONSTRUCTOR: &str = "secondary_constructor";
const NODE_PRIMARY_CONSTRUCTOR: &str = "primary_constructor";
const NODE_TYPE_ALIAS: &str = "type_alias";
const NODE_TYPE_IDENTIFIER: &str = "type_identifier";
const NODE_SIMPLE_IDENTIFIER: &str = "simple_identifier";
const NODE_IDENTIFIER: &str = "identifier";
const NODE_CLASS_BODY: &str = "class_body";
const NODE_ENUM_CLASS_BODY: &str = "enum_class_body";
const NODE_ENUM_ENTRY: &str = "enum_entry";
const NODE_FUNCTION_BODY: &str = "function_body";
const NODE_MODIFIERS: &str = "modifiers";
const NODE_TYPE_PARAMETERS: &str = "type_parameters";
const NODE_TYPE_PARAMETER: &str = "type_parameter";
const NODE_FUNCTION_VALUE_PARAMETERS: &str = "function_value_parameters";
const NODE_PARAMETER: &str = "parameter";
const NODE_CLASS_PARAMETER: &str = "class_parameter";
const NODE_DELEGATION_SPECIFIER: &str = "delegation_specifier";
const NODE_CONSTRUCTOR_INVOCATION: &str = "constructor_invocation";
const NODE_USER_TYPE: &str = "user_type";
const NODE_SIMPLE_USER_TYPE: &str = "simple_user_type";
const NODE_TYPE_REFERENCE: &str = "type_reference";
const NODE_NULLABLE_TYPE: &str = "nullable_type";
const NODE_VARIABLE_DECLARATION: &str = "variable_declaration";
const NODE_MULTI_VARIABLE_DECLARATION: &str = "multi_variable_declaration";
const NODE_CALL_EXPRESSION: &str = "call_expression";
const NODE_CALL_SUFFIX: &str = "call_suffix";
const NODE_NAVIGATION_EXPRESSION: &str = "navigation_expression";
const NODE_NAVIGATION_SUFFIX: &str = "navigation_suffix";
const NODE_VALUE_ARGUMENTS: &str = "value_arguments";
const NODE_VALUE_ARGUMENT: &str = "value_argument";
const NODE_ANNOTATED_LAMBDA: &str = "annotated_lambda";
const NODE_LAMBDA_LITERAL: &str = "lambda_literal";
const NODE_OBJECT_LITERAL: &str = "object_literal";
const NODE_ANNOTATION: &str = "annotation";
const NODE_AS_EXPRESSION: &str = "as_expression";
const NODE_RECEIVER_TYPE: &str = "receiver_type";
const NODE_ANONYMOUS_INITIALIZER: &str = "anonymous_initializer";

const TYPE_NODE_KINDS: &[&str] = &[
    NODE_USER_TYPE,
    NODE_SIMPLE_USER_TYPE,
    NODE_TYPE_REFERENCE,
    NODE_NULLABLE_TYPE,
    "type",
];

/// Surface type for a Kotlin literal node kind, if it is one.
fn literal_type_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "integer_literal" | "hex_literal" | "bin_literal" => Some("Int"),
        "long_literal" => Some("Long"),
        "real_literal" => Some("Double"),
        "string_literal" | "line_string_literal" | "multi_line_string_literal" => Some("String"),
        "boolean_literal" => Some("Boolean"),
        "character_literal" => Some("Char"),
        _ => None,
    }
}

/// Parser for Kotlin source files.
pub struct KotlinParser {
    parser: Parser,
}

impl std::fmt::Debug for KotlinParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KotlinParser")
            .field("language", &"Kotlin")
            .finish()
    }
}

impl KotlinParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_kotlin_codanna::language())
            .map_err(|e| format!("Failed to initialize Kotlin parser: {e}"))?;
        Ok(Self { parser })
    }

    fn extract_file(&self, root: Node, code: &str, file: &mut ParsedFile) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                NODE_PACKAGE_HEADER => {
                    if let Some(ident) = find_child_of_kind(child, NODE_IDENTIFIER) {
                        file.package_name = Some(trimmed_text(ident, code).to_string());
                    }
                }
                NODE_IMPORT_LIST => {
                    let mut list_cursor = child.walk();
                    for import in child.children(&mut list_cursor) {
                        if import.kind() == NODE_IMPORT_HEADER {
                            if let Some(parsed) = self.extract_import(import, code) {
                                file.imports.push(parsed);
                            }
                        }
                    }
                }
                NODE_IMPORT_HEADER => {
                    if let Some(parsed) = self.extract_import(child, code) {
                        file.imports.push(parsed);
                    }
                }
                NODE_CLASS_DECLARATION => {
                    if let Some(class) = self.extract_class(child, code, file, 0) {
                        file.classes.push(class);
                    }
                }
                NODE_OBJECT_DECLARATION => {
                    if let Some(object) = self.extract_object(child, code, file, 0) {
                        file.classes.push(object);
                    }
                }
                NODE_FUNCTION_DECLARATION => {
                    if let Some(function) = self.extract_function(child, code, file, 0) {
                        file.functions.push(function);
                    }
                }
                NODE_PROPERTY_DECLARATION => {
                    if let Some(destructuring) = self.extract_destructuring(child, code, &file.path)
                    {
                        file.destructurings.push(destructuring);
                    } else if let Some(property) = self.extract_property(child, code, file) {
                        file.properties.push(property);
                    }
                }
                NODE_TYPE_ALIAS => {
                    if let Some(alias) = self.extract_type_alias(child, code, &file.path) {
                        file.type_aliases.push(alias);
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_import(&self, node: Node, code: &str) -> Option<ParsedImport> {
        let ident = find_child_of_kind(node, NODE_IDENTIFIER)?;
        let path = trimmed_text(ident, code).to_string();
        let header_text = trimmed_text(node, code);

        let mut import = ParsedImport::new(path.clone());
        if header_text.ends_with(".*") {
            import.is_wildcard = true;
        } else {
            import.imported_name = path.rsplit('.').next().map(str::to_string);
        }
        if let Some(alias_node) = find_child_of_kind(node, NODE_IMPORT_ALIAS) {
            if let Some(name) =
                find_child_of_kinds(alias_node, &[NODE_SIMPLE_IDENTIFIER, NODE_TYPE_IDENTIFIER])
            {
                import.alias = Some(trimmed_text(name, code).to_string());
            }
        }
        Some(import)
    }

    /// Classify a class declaration. Interfaces and enums show up as
    /// keyword tokens or the enum body; annotation classes only in the
    /// modifier text.
    fn class_kind(&self, node: Node, code: &str) -> ClassKind {
        if find_child_of_kind(node, NODE_ENUM_CLASS_BODY).is_some() {
            return ClassKind::Enum;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "interface" => return ClassKind::Interface,
                "enum" => return ClassKind::Enum,
                NODE_MODIFIERS => {
                    let text = node_text(child, code);
                    if text.contains("annotation") {
                        return ClassKind::Annotation;
                    }
                    if text.contains("enum") {
                        return ClassKind::Enum;
                    }
                }
                _ => {}
            }
        }
        ClassKind::Class
    }

    fn extract_class(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedClass> {
        if !check_recursion_depth(depth, node) {
            return None;
        }

        let name_node = find_child_of_kind(node, NODE_TYPE_IDENTIFIER)?;
        let name = trimmed_text(name_node, code).to_string();
        let location = node_location(node, &file.path);
        let mut class = ParsedClass::new(name, self.class_kind(node, code), location);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => {
                    self.apply_class_modifiers(child, code, &mut class);
                }
                NODE_TYPE_PARAMETERS => {
                    class.type_parameters = self.extract_type_parameters(child, code);
                }
                NODE_PRIMARY_CONSTRUCTOR => {
                    let ctor = self.extract_primary_constructor(child, code, file, &mut class);
                    class.primary_constructor = Some(Box::new(ctor));
                }
                NODE_DELEGATION_SPECIFIER => {
                    self.extract_super_type(child, code, &mut class);
                }
                NODE_CLASS_BODY | NODE_ENUM_CLASS_BODY => {
                    self.extract_class_body(child, code, file, &mut class, depth);
                }
                _ => {}
            }
        }
        Some(class)
    }

    fn apply_class_modifiers(&self, modifiers: Node, code: &str, class: &mut ParsedClass) {
        let text = node_text(modifiers, code);
        class.visibility = visibility_from_modifier_text(text);
        class.modifiers.is_abstract = text.contains("abstract");
        class.modifiers.is_data = text.contains("data");
        class.modifiers.is_sealed = text.contains("sealed");
        class.annotations = self.extract_annotations(modifiers, code);
    }

    fn extract_type_parameters(&self, node: Node, code: &str) -> Vec<String> {
        let mut params = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != NODE_TYPE_PARAMETER {
                continue;
            }
            if let Some(name) =
                find_child_of_kinds(child, &[NODE_TYPE_IDENTIFIER, NODE_SIMPLE_IDENTIFIER])
            {
                params.push(trimmed_text(name, code).to_string());
            }
        }
        params
    }

    /// Primary constructor: `class User(val name: String)`. `val`/`var`
    /// class parameters double as declared properties.
    fn extract_primary_constructor(
        &self,
        node: Node,
        code: &str,
        file: &ParsedFile,
        class: &mut ParsedClass,
    ) -> ParsedFunction {
        let mut ctor = ParsedFunction::new("<init>", node_location(node, &file.path));
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != NODE_CLASS_PARAMETER {
                continue;
            }
            let Some(name_node) = find_child_of_kind(child, NODE_SIMPLE_IDENTIFIER) else {
                continue;
            };
            let name = trimmed_text(name_node, code).to_string();
            let mut parameter = ParsedParameter::new(name.clone());
            parameter.type_name = self.extract_type_child(child, code);
            parameter.is_variadic = node_text(child, code).starts_with("vararg");
            parameter.default_value = self.extract_default_value(child, code);

            let param_text = node_text(child, code);
            let is_val = param_text.trim_start().starts_with("val ")
                || param_text.contains(" val ");
            let is_var = param_text.trim_start().starts_with("var ")
                || param_text.contains(" var ");
            if is_val || is_var {
                let mut property =
                    ParsedProperty::new(name, node_location(child, &file.path));
                property.type_name = parameter.type_name.clone();
                property.is_immutable = is_val;
                class.properties.push(property);
            }
            ctor.parameters.push(parameter);
        }
        ctor
    }

    fn extract_type_child(&self, node: Node, code: &str) -> Option<String> {
        find_child_of_kinds(node, TYPE_NODE_KINDS).map(|t| trimmed_text(t, code).to_string())
    }

    /// Raw default-value text: everything after the `=` token.
    fn extract_default_value(&self, node: Node, code: &str) -> Option<String> {
        let mut cursor = node.walk();
        let mut seen_eq = false;
        for child in node.children(&mut cursor) {
            if child.kind() == "=" {
                seen_eq = true;
                continue;
            }
            if seen_eq && child.is_named() {
                return Some(trimmed_text(child, code).to_string());
            }
        }
        None
    }

    /// A delegation specifier with a constructor invocation is the super
    /// class; a bare type is an implemented interface.
    fn extract_super_type(&self, node: Node, code: &str, class: &mut ParsedClass) {
        if let Some(invocation) = find_child_of_kind(node, NODE_CONSTRUCTOR_INVOCATION) {
            if let Some(type_node) = find_child_of_kinds(invocation, TYPE_NODE_KINDS) {
                class.super_class = Some(trimmed_text(type_node, code).to_string());
                return;
            }
        }
        if let Some(type_node) = find_child_of_kinds(node, TYPE_NODE_KINDS) {
            class
                .interfaces
                .push(trimmed_text(type_node, code).to_string());
        }
    }

    fn extract_class_body(
        &self,
        body: Node,
        code: &str,
        file: &mut ParsedFile,
        class: &mut ParsedClass,
        depth: usize,
    ) {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                NODE_PROPERTY_DECLARATION => {
                    if let Some(property) = self.extract_property(member, code, file) {
                        class.properties.push(property);
                    }
                }
                NODE_FUNCTION_DECLARATION => {
                    if let Some(function) = self.extract_function(member, code, file, depth + 1) {
                        class.functions.push(function);
                    }
                }
                NODE_CLASS_DECLARATION => {
                    if let Some(nested) = self.extract_class(member, code, file, depth + 1) {
                        class.nested_classes.push(nested);
                    }
                }
                NODE_OBJECT_DECLARATION => {
                    if let Some(nested) = self.extract_object(member, code, file, depth + 1) {
                        class.nested_classes.push(nested);
                    }
                }
                NODE_COMPANION_OBJECT => {
                    if let Some(companion) = self.extract_companion(member, code, file, depth + 1) {
                        class.companion = Some(Box::new(companion));
                    }
                }
                NODE_SECONDARY_CONSTRUCTOR => {
                    let ctor = self.extract_secondary_constructor(member, code, file);
                    class.secondary_constructors.push(ctor);
                }
                NODE_ANONYMOUS_INITIALIZER => {
                    // `init { ... }` runs as part of the primary
                    // constructor; its calls belong to `<init>`.
                    let ctor = class.primary_constructor.get_or_insert_with(|| {
                        Box::new(ParsedFunction::new(
                            "<init>",
                            node_location(member, &file.path),
                        ))
                    });
                    let mut calls = std::mem::take(&mut ctor.calls);
                    let mut locals = std::mem::take(&mut ctor.local_variables);
                    self.collect_calls(member, code, file, &mut calls, &mut locals, depth + 1);
                    let ctor = class.primary_constructor.as_deref_mut().unwrap();
                    ctor.calls = calls;
                    ctor.local_variables = locals;
                }
                NODE_ENUM_ENTRY => {
                    if let Some(name_node) =
                        find_child_of_kinds(member, &[NODE_SIMPLE_IDENTIFIER, NODE_TYPE_IDENTIFIER])
                    {
                        let mut entry = ParsedProperty::new(
                            trimmed_text(name_node, code),
                            node_location(member, &file.path),
                        );
                        entry.type_name = Some(class.name.clone());
                        entry.is_immutable = true;
                        class.properties.push(entry);
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_object(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedClass> {
        if !check_recursion_depth(depth, node) {
            return None;
        }
        let name_node = find_child_of_kind(node, NODE_TYPE_IDENTIFIER)?;
        let location = node_location(node, &file.path);
        let mut object = ParsedClass::new(trimmed_text(name_node, code), ClassKind::Object, location);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => self.apply_class_modifiers(child, code, &mut object),
                NODE_DELEGATION_SPECIFIER => self.extract_super_type(child, code, &mut object),
                NODE_CLASS_BODY => {
                    self.extract_class_body(child, code, file, &mut object, depth);
                }
                _ => {}
            }
        }
        Some(object)
    }

    /// Companion object; anonymous companions take the name `Companion`.
    fn extract_companion(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedClass> {
        let name = find_child_of_kind(node, NODE_TYPE_IDENTIFIER)
            .map(|n| trimmed_text(n, code).to_string())
            .unwrap_or_else(|| "Companion".to_string());
        let location = node_location(node, &file.path);
        let mut companion = ParsedClass::new(name, ClassKind::Object, location);

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => self.apply_class_modifiers(child, code, &mut companion),
                NODE_CLASS_BODY => {
                    self.extract_class_body(child, code, file, &mut companion, depth);
                }
                _ => {}
            }
        }
        Some(companion)
    }

    fn extract_secondary_constructor(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
    ) -> ParsedFunction {
        let mut ctor = ParsedFunction::new("<init>", node_location(node, &file.path));
        if let Some(modifiers) = find_child_of_kind(node, NODE_MODIFIERS) {
            ctor.visibility = visibility_from_modifier_text(node_text(modifiers, code));
        }
        if let Some(params) = find_child_of_kind(node, NODE_FUNCTION_VALUE_PARAMETERS) {
            ctor.parameters = self.extract_parameters(params, code);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "statements" || child.kind() == "block" {
                self.collect_calls(child, code, file, &mut ctor.calls, &mut ctor.local_variables, 0);
            }
        }
        ctor
    }

    fn extract_function(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedFunction> {
        if !check_recursion_depth(depth, node) {
            return None;
        }

        let mut function = {
            let name_node = find_child_of_kind(node, NODE_SIMPLE_IDENTIFIER)?;
            ParsedFunction::new(trimmed_text(name_node, code), node_location(node, &file.path))
        };

        let mut seen_params = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => {
                    let text = node_text(child, code);
                    function.visibility = visibility_from_modifier_text(text);
                    function.modifiers.is_abstract = text.contains("abstract");
                    function.modifiers.is_async = text.contains("suspend");
                    function.modifiers.is_inline = text.contains("inline");
                    function.modifiers.is_infix = text.contains("infix");
                    function.modifiers.is_operator = text.contains("operator");
                    function.annotations = self.extract_annotations(child, code);
                }
                NODE_TYPE_PARAMETERS => {
                    function.type_parameters = self.extract_type_parameters(child, code);
                }
                NODE_RECEIVER_TYPE => {
                    let receiver = trimmed_text(child, code).to_string();
                    function.receiver_type = Some(receiver);
                    function.modifiers.is_extension = true;
                }
                NODE_USER_TYPE | NODE_NULLABLE_TYPE if !seen_params => {
                    // `fun Int.squared()` puts the receiver type before the
                    // name when the grammar lacks a receiver_type wrapper.
                    if function.receiver_type.is_none()
                        && child.end_byte() < node_byte_of_name(node, code, &function.name)
                    {
                        function.receiver_type = Some(trimmed_text(child, code).to_string());
                        function.modifiers.is_extension = true;
                    }
                }
                NODE_FUNCTION_VALUE_PARAMETERS => {
                    seen_params = true;
                    function.parameters = self.extract_parameters(child, code);
                }
                NODE_TYPE_REFERENCE | NODE_SIMPLE_USER_TYPE | "type" => {
                    if seen_params {
                        function.return_type = Some(trimmed_text(child, code).to_string());
                    }
                }
                NODE_FUNCTION_BODY => {
                    self.collect_calls(
                        child,
                        code,
                        file,
                        &mut function.calls,
                        &mut function.local_variables,
                        0,
                    );
                }
                _ => {
                    // Return types can also appear as user_type after params.
                    if seen_params
                        && TYPE_NODE_KINDS.contains(&child.kind())
                        && function.return_type.is_none()
                    {
                        function.return_type = Some(trimmed_text(child, code).to_string());
                    }
                }
            }
        }
        Some(function)
    }

    fn extract_parameters(&self, params_node: Node, code: &str) -> Vec<ParsedParameter> {
        let mut parameters = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            let param_node = match child.kind() {
                NODE_PARAMETER | NODE_CLASS_PARAMETER => child,
                // Some grammar versions wrap `parameter` with the default
                // value at the outer level.
                "function_value_parameter" => {
                    if let Some(inner) = find_child_of_kind(child, NODE_PARAMETER) {
                        inner
                    } else {
                        continue;
                    }
                }
                _ => continue,
            };
            let Some(name_node) = find_child_of_kind(param_node, NODE_SIMPLE_IDENTIFIER) else {
                continue;
            };
            let mut parameter = ParsedParameter::new(trimmed_text(name_node, code));
            parameter.type_name = self.extract_type_child(param_node, code);
            parameter.is_variadic = node_text(child, code).contains("vararg");
            parameter.default_value = self
                .extract_default_value(child, code)
                .or_else(|| self.extract_default_value(param_node, code));
            parameters.push(parameter);
        }
        parameters
    }

    fn extract_property(
        &self,
        node: Node,
        code: &str,
        file: &ParsedFile,
    ) -> Option<ParsedProperty> {
        let declaration = find_child_of_kind(node, NODE_VARIABLE_DECLARATION)?;
        let name_node = find_child_of_kind(declaration, NODE_SIMPLE_IDENTIFIER)?;

        let mut property =
            ParsedProperty::new(trimmed_text(name_node, code), node_location(node, &file.path));
        property.is_immutable = property_is_val(node, code);
        property.type_name = self.extract_type_child(declaration, code);

        if let Some(modifiers) = find_child_of_kind(node, NODE_MODIFIERS) {
            property.visibility = visibility_from_modifier_text(node_text(modifiers, code));
            property.annotations = self.extract_annotations(modifiers, code);
        }

        if let Some(initializer) = self.extract_default_value(node, code) {
            property.initializer = Some(initializer);
        }
        Some(property)
    }

    fn extract_destructuring(
        &self,
        node: Node,
        code: &str,
        path: &str,
    ) -> Option<ParsedDestructuring> {
        let multi = find_child_of_kind(node, NODE_MULTI_VARIABLE_DECLARATION)?;
        let mut components = Vec::new();
        let mut component_types = Vec::new();
        let mut any_type = false;

        let mut cursor = multi.walk();
        for child in multi.children(&mut cursor) {
            if child.kind() != NODE_VARIABLE_DECLARATION {
                continue;
            }
            let Some(name_node) = find_child_of_kind(child, NODE_SIMPLE_IDENTIFIER) else {
                continue;
            };
            components.push(trimmed_text(name_node, code).to_string());
            match self.extract_type_child(child, code) {
                Some(t) => {
                    any_type = true;
                    component_types.push(t);
                }
                None => component_types.push(String::new()),
            }
        }
        if components.is_empty() {
            return None;
        }
        Some(ParsedDestructuring {
            components,
            component_types: any_type.then_some(component_types),
            is_immutable: property_is_val(node, code),
            location: node_location(node, path),
        })
    }

    fn extract_type_alias(&self, node: Node, code: &str, path: &str) -> Option<ParsedTypeAlias> {
        let name_node = find_child_of_kind(node, NODE_TYPE_IDENTIFIER)?;
        let mut seen_eq = false;
        let mut aliased = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "=" {
                seen_eq = true;
                continue;
            }
            if seen_eq && child.is_named() {
                aliased = Some(trimmed_text(child, code).to_string());
                break;
            }
        }
        let visibility = find_child_of_kind(node, NODE_MODIFIERS)
            .map(|m| visibility_from_modifier_text(node_text(m, code)))
            .unwrap_or_default();
        Some(ParsedTypeAlias {
            name: trimmed_text(name_node, code).to_string(),
            aliased_type: aliased?,
            visibility,
            type_parameters: find_child_of_kind(node, NODE_TYPE_PARAMETERS)
                .map(|tp| self.extract_type_parameters(tp, code))
                .unwrap_or_default(),
            location: node_location(node, path),
        })
    }

    fn extract_annotations(&self, modifiers: Node, code: &str) -> Vec<ParsedAnnotation> {
        let mut annotations = Vec::new();
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            if child.kind() != NODE_ANNOTATION {
                continue;
            }
            let raw = trimmed_text(child, code);
            let without_at = raw.trim_start_matches('@');
            let (name, args) = match without_at.find('(') {
                Some(idx) => (&without_at[..idx], Some(&without_at[idx..])),
                None => (without_at, None),
            };
            let mut annotation = ParsedAnnotation::new(name.trim());
            if let Some(args) = args {
                let inner = args.trim_start_matches('(').trim_end_matches(')');
                for piece in split_top_level_commas(inner) {
                    let piece = piece.trim();
                    if piece.is_empty() {
                        continue;
                    }
                    let (arg_name, value) = match piece.split_once('=') {
                        Some((n, v)) if !n.trim().contains('"') => {
                            (Some(n.trim().to_string()), v.trim().to_string())
                        }
                        _ => (None, piece.to_string()),
                    };
                    annotation
                        .arguments
                        .push(AnnotationArgument { name: arg_name, value });
                }
            }
            annotations.push(annotation);
        }
        annotations
    }

    /// Recursive call collection over a function body.
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
                if let Some(call) = self.extract_call(node, code, &file.path) {
                    calls.push(call);
                }
            }
            NODE_PROPERTY_DECLARATION => {
                self.record_local_variable(node, code, &file.path, locals);
                if let Some(destructuring) = self.extract_destructuring(node, code, &file.path) {
                    file.destructurings.push(destructuring);
                }
            }
            NODE_OBJECT_LITERAL => {
                if let Some(object) = self.extract_object_expression(node, code, file, depth) {
                    file.object_expressions.push(object);
                }
                // Member bodies were already walked by the extractor.
                return;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(child, code, file, calls, locals, depth + 1);
        }
    }

    /// `val x: T = ...` or `val x = T(...)` inside a body registers the
    /// variable's type for receiver resolution.
    fn record_local_variable(
        &self,
        node: Node,
        code: &str,
        path: &str,
        locals: &mut Vec<ParsedLocalVariable>,
    ) {
        let Some(declaration) = find_child_of_kind(node, NODE_VARIABLE_DECLARATION) else {
            return;
        };
        let Some(name_node) = find_child_of_kind(declaration, NODE_SIMPLE_IDENTIFIER) else {
            return;
        };
        let name = trimmed_text(name_node, code).to_string();

        let type_name = self.extract_type_child(declaration, code).or_else(|| {
            self.extract_default_value(node, code)
                .and_then(|init| constructor_type_from_initializer(&init))
        });
        if let Some(type_name) = type_name {
            locals.push(ParsedLocalVariable {
                name,
                type_name,
                location: node_location(node, path),
            });
        }
    }

    fn extract_call(&self, node: Node, code: &str, path: &str) -> Option<ParsedCall> {
        let callee = node.child(0)?;
        let location = node_location(node, path);

        let (name, receiver, is_safe_call) = match callee.kind() {
            NODE_SIMPLE_IDENTIFIER => (trimmed_text(callee, code).to_string(), None, false),
            NODE_NAVIGATION_EXPRESSION => self.decompose_navigation(callee, code)?,
            _ => {
                // Parenthesized or otherwise wrapped callee; take the last
                // identifier as the syntactic name.
                let name = last_simple_identifier(callee, code)?;
                (name.to_string(), None, false)
            }
        };

        let mut call = ParsedCall::new(name, location);
        call.receiver = receiver;
        call.is_safe_call = is_safe_call;

        if let Some(suffix) = find_child_of_kind(node, NODE_CALL_SUFFIX) {
            let (count, types) = self.extract_arguments(suffix, code);
            call.argument_count = count;
            call.argument_types = types;
        }
        Some(call)
    }

    /// Split `a.b.c.method` into (method, receiver text). A receiver that
    /// is itself a call collapses to the synthetic chained-call marker.
    fn decompose_navigation(
        &self,
        nav: Node,
        code: &str,
    ) -> Option<(String, Option<String>, bool)> {
        let suffix = find_child_of_kind(nav, NODE_NAVIGATION_SUFFIX)?;
        let name_node =
            find_child_of_kinds(suffix, &[NODE_SIMPLE_IDENTIFIER, NODE_TYPE_IDENTIFIER])?;
        let name = trimmed_text(name_node, code).to_string();
        let is_safe_call = node_text(suffix, code).starts_with("?.");

        let receiver_node = nav.child(0)?;
        let receiver = if contains_call_expression(receiver_node) {
            CHAINED_CALL_RECEIVER.to_string()
        } else {
            trimmed_text(receiver_node, code).to_string()
        };
        Some((name, Some(receiver), is_safe_call))
    }

    /// Argument count and literal-inferred types. A trailing lambda
    /// outside the parentheses counts as one more argument.
    fn extract_arguments(&self, suffix: Node, code: &str) -> (usize, Option<Vec<String>>) {
        let mut count = 0;
        let mut types = Vec::new();

        if let Some(arguments) = find_child_of_kind(suffix, NODE_VALUE_ARGUMENTS) {
            let mut cursor = arguments.walk();
            for argument in arguments.children(&mut cursor) {
                if argument.kind() != NODE_VALUE_ARGUMENT {
                    continue;
                }
                count += 1;
                types.push(self.infer_argument_type(argument, code));
            }
        }
        if find_child_of_kind(suffix, NODE_ANNOTATED_LAMBDA).is_some()
            || find_child_of_kind(suffix, NODE_LAMBDA_LITERAL).is_some()
        {
            count += 1;
            types.push("Function".to_string());
        }

        if count == 0 {
            (0, None)
        } else {
            (count, Some(types))
        }
    }

    fn infer_argument_type(&self, argument: Node, code: &str) -> String {
        let mut cursor = argument.walk();
        for child in argument.children(&mut cursor) {
            if !child.is_named() || child.kind() == "value_argument_name" {
                continue;
            }
            return self.infer_expression_type(child, code);
        }
        UNKNOWN_TYPE.to_string()
    }

    fn infer_expression_type(&self, node: Node, code: &str) -> String {
        if let Some(literal) = literal_type_for_kind(node.kind()) {
            return literal.to_string();
        }
        match node.kind() {
            NODE_LAMBDA_LITERAL => "Function".to_string(),
            NODE_AS_EXPRESSION => {
                // `e as T` types as T.
                find_child_of_kinds(node, TYPE_NODE_KINDS)
                    .map(|t| trimmed_text(t, code).to_string())
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
            }
            NODE_CALL_EXPRESSION => {
                // `User("a")` types as User when the callee looks like a type.
                node.child(0)
                    .filter(|c| c.kind() == NODE_SIMPLE_IDENTIFIER)
                    .map(|c| trimmed_text(c, code))
                    .filter(|name| name.starts_with(char::is_uppercase))
                    .map(str::to_string)
                    .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
            }
            _ => UNKNOWN_TYPE.to_string(),
        }
    }

    /// `object : Foo { ... }` inside an expression.
    fn extract_object_expression(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedObjectExpression> {
        let location = node_location(node, &file.path);
        let mut super_types = Vec::new();
        let mut container = ParsedClass::new("<anonymous>", ClassKind::Object, location.clone());

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_DELEGATION_SPECIFIER => {
                    let before = (container.super_class.clone(), container.interfaces.len());
                    self.extract_super_type(child, code, &mut container);
                    if container.super_class != before.0 {
                        if let Some(s) = &container.super_class {
                            super_types.push(s.clone());
                        }
                    } else if container.interfaces.len() > before.1 {
                        super_types.push(container.interfaces.last().unwrap().clone());
                    }
                }
                NODE_CLASS_BODY => {
                    self.extract_class_body(child, code, file, &mut container, depth + 1);
                }
                _ => {}
            }
        }

        Some(ParsedObjectExpression {
            super_types,
            functions: container.functions,
            properties: container.properties,
            location,
        })
    }
}

impl LanguageParser for KotlinParser {
    fn parse(&mut self, code: &str, path: &str) -> ParseOutcome {
        let Some(tree) = self.parser.parse(code, None) else {
            return ParseOutcome::Failed(parse_failure_diagnostic(path, Language::Kotlin));
        };
        let root = tree.root_node();
        let mut file = ParsedFile::new(path, Language::Kotlin);
        self.extract_file(root, code, &mut file);

        if root.has_error() {
            ParseOutcome::Partial(file, partial_parse_diagnostic(path, Language::Kotlin))
        } else {
            ParseOutcome::Clean(file)
        }
    }

    fn language(&self) -> Language {
        Language::Kotlin
    }
}

fn visibility_from_modifier_text(text: &str) -> Visibility {
    if text.contains("private") {
        Visibility::Private
    } else if text.contains("protected") {
        Visibility::Protected
    } else if text.contains("internal") {
        Visibility::Internal
    } else {
        Visibility::Public
    }
}

fn property_is_val(node: Node, code: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "val" => return true,
            "var" => return false,
            "binding_pattern_kind" => {
                return node_text(child, code).trim() == "val";
            }
            _ => {}
        }
    }
    // Fall back to the leading keyword in the raw text.
    node_text(node, code).trim_start().starts_with("val")
}

fn node_byte_of_name(node: Node, code: &str, name: &str) -> usize {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == NODE_SIMPLE_IDENTIFIER && trimmed_text(child, code) == name {
            return child.start_byte();
        }
    }
    usize::MAX
}

fn last_simple_identifier<'a>(node: Node, code: &'a str) -> Option<&'a str> {
    let mut last = None;
    if node.kind() == NODE_SIMPLE_IDENTIFIER {
        last = Some(trimmed_text(node, code));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(name) = last_simple_identifier(child, code) {
            last = Some(name);
        }
    }
    last
}

fn contains_call_expression(node: Node) -> bool {
    if node.kind() == NODE_CALL_EXPRESSION {
        return true;
    }
    // Only look through wrappers, not into argument lists.
    match node.kind() {
        NODE_NAVIGATION_EXPRESSION | "parenthesized_expression" => {
            let mut cursor = node.walk();
            node.children(&mut cursor).any(|c| contains_call_expression(c))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> ParsedFile {
        let mut parser = KotlinParser::new().unwrap();
        match parser.parse(code, "test.kt") {
            ParseOutcome::Clean(f) | ParseOutcome::Partial(f, _) => f,
            ParseOutcome::Failed(d) => panic!("parse failed: {d:?}"),
        }
    }

    #[test]
    fn extracts_package_and_imports() {
        let file = parse(
            "package com.example\n\
             import com.example.util.StringUtils\n\
             import com.example.io.*\n\
             import com.example.db.Store as Db\n",
        );
        assert_eq!(file.package_name.as_deref(), Some("com.example"));
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].imported_name.as_deref(), Some("StringUtils"));
        assert!(file.imports[1].is_wildcard);
        assert_eq!(file.imports[2].alias.as_deref(), Some("Db"));
    }

    #[test]
    fn extracts_class_with_primary_constructor_properties() {
        let file = parse("package com.example\nclass User(val name: String, age: Int)");
        let class = &file.classes[0];
        assert_eq!(class.name, "User");
        let ctor = class.primary_constructor.as_ref().unwrap();
        assert_eq!(ctor.parameters.len(), 2);
        assert_eq!(ctor.parameters[0].type_name.as_deref(), Some("String"));
        // Only the `val` parameter becomes a property.
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.properties[0].name, "name");
        assert!(class.properties[0].is_immutable);
    }

    #[test]
    fn distinguishes_super_class_from_interfaces() {
        let file = parse(
            "package com.example\n\
             open class Base\n\
             interface Audited\n\
             class Service : Base(), Audited",
        );
        let service = file.classes.iter().find(|c| c.name == "Service").unwrap();
        assert_eq!(service.super_class.as_deref(), Some("Base"));
        assert_eq!(service.interfaces, vec!["Audited".to_string()]);
        let audited = file.classes.iter().find(|c| c.name == "Audited").unwrap();
        assert_eq!(audited.kind, ClassKind::Interface);
    }

    #[test]
    fn captures_calls_with_receiver_chain() {
        let file = parse(
            "package com.example\n\
             class S {\n\
                 fun go(repo: Repo) {\n\
                     repo.db.save(1)\n\
                     log(\"x\")\n\
                 }\n\
             }",
        );
        let function = &file.classes[0].functions[0];
        assert_eq!(function.calls.len(), 2);
        assert_eq!(function.calls[0].name, "save");
        assert_eq!(function.calls[0].receiver.as_deref(), Some("repo.db"));
        assert_eq!(function.calls[0].argument_count, 1);
        assert_eq!(
            function.calls[0].argument_types.as_ref().unwrap()[0],
            "Int"
        );
        assert_eq!(function.calls[1].name, "log");
        assert!(function.calls[1].receiver.is_none());
        assert_eq!(
            function.calls[1].argument_types.as_ref().unwrap()[0],
            "String"
        );
    }

    #[test]
    fn chained_call_gets_synthetic_receiver() {
        let file = parse(
            "package com.example\n\
             fun go() { build().run() }",
        );
        let calls = &file.functions[0].calls;
        let run = calls.iter().find(|c| c.name == "run").unwrap();
        assert_eq!(run.receiver.as_deref(), Some(CHAINED_CALL_RECEIVER));
    }

    #[test]
    fn safe_call_flag_is_preserved() {
        let file = parse(
            "package com.example\n\
             fun go(u: User?) { u?.save() }",
        );
        let call = &file.functions[0].calls[0];
        assert_eq!(call.name, "save");
        assert!(call.is_safe_call);
    }

    #[test]
    fn local_variable_types_from_annotation_and_constructor() {
        let file = parse(
            "package com.example\n\
             fun go() {\n\
                 val a: Repo = make()\n\
                 val b = User(\"x\")\n\
                 val c = unknownCall()\n\
             }",
        );
        let locals = &file.functions[0].local_variables;
        assert_eq!(locals.len(), 2);
        assert_eq!(locals[0].name, "a");
        assert_eq!(locals[0].type_name, "Repo");
        assert_eq!(locals[1].name, "b");
        assert_eq!(locals[1].type_name, "User");
    }

    #[test]
    fn extracts_companion_and_secondary_constructor() {
        let file = parse(
            "package com.example\n\
             class Widget {\n\
                 constructor(x: Int) { init() }\n\
                 companion object Factory {\n\
                     fun create(): Widget = Widget(1)\n\
                 }\n\
             }",
        );
        let class = &file.classes[0];
        assert_eq!(class.secondary_constructors.len(), 1);
        assert_eq!(class.secondary_constructors[0].parameters.len(), 1);
        let companion = class.companion.as_ref().unwrap();
        assert_eq!(companion.name, "Factory");
        assert_eq!(companion.functions.len(), 1);
    }

    #[test]
    fn extracts_type_alias_and_destructuring() {
        let file = parse(
            "package com.example\n\
             typealias Users = UserList\n\
             fun go(pair: Pair<Int, Int>) {\n\
                 val (first, _) = pair\n\
             }",
        );
        assert_eq!(file.type_aliases.len(), 1);
        assert_eq!(file.type_aliases[0].name, "Users");
        assert_eq!(file.type_aliases[0].aliased_type, "UserList");
        assert_eq!(file.destructurings.len(), 1);
        assert_eq!(
            file.destructurings[0].components,
            vec!["first".to_string(), "_".to_string()]
        );
    }

    #[test]
    fn extension_function_records_receiver() {
        let file = parse(
            "package com.example\n\
             fun Int.squared(): Int = this * this",
        );
        let function = &file.functions[0];
        assert_eq!(function.name, "squared");
        assert!(function.modifiers.is_extension);
        assert_eq!(function.receiver_type.as_deref(), Some("Int"));
    }

    #[test]
    fn init_block_calls_belong_to_the_constructor() {
        let file = parse(
            "package com.example\n\
             class Session(val id: String) {\n\
                 init {\n\
                     register(id)\n\
                 }\n\
             }",
        );
        let ctor = file.classes[0].primary_constructor.as_ref().unwrap();
        assert_eq!(ctor.parameters.len(), 1);
        assert_eq!(ctor.calls.len(), 1);
        assert_eq!(ctor.calls[0].name, "register");
    }

    #[test]
    fn init_block_without_primary_constructor_synthesizes_one() {
        let file = parse(
            "package com.example\n\
             class Boot {\n\
                 init { warmUp() }\n\
             }",
        );
        let ctor = file.classes[0].primary_constructor.as_ref().unwrap();
        assert!(ctor.parameters.is_empty());
        assert_eq!(ctor.calls[0].name, "warmUp");
    }

    #[test]
    fn enum_entries_become_properties() {
        let file = parse(
            "package com.example\n\
             enum class Color { RED, GREEN }",
        );
        let class = &file.classes[0];
        assert_eq!(class.kind, ClassKind::Enum);
        let names: Vec<_> = class.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN"]);
    }

}
