//! Java language parser.
//!
//! Java has no top-level functions or properties; everything hangs off a
//! class-like declaration. Constructors land in
//! `secondary_constructors`, anonymous classes (`new Foo() { ... }`)
//! become object expressions, and package-private visibility maps to
//! `Internal`.

use crate::parsing::ast::{
    find_child_of_kind, find_child_of_kinds, node_location, node_text, trimmed_text,
};
use crate::parsing::parser::{
    ParseOutcome, check_recursion_depth, parse_failure_diagnostic, partial_parse_diagnostic,
};
use crate::parsing::{
    AnnotationArgument, CHAINED_CALL_RECEIVER, Language, LanguageParser, ParsedAnnotation,
    ParsedCall, ParsedClass, ParsedFile, ParsedFunction, ParsedImport, ParsedLocalVariable,
    ParsedObjectExpression, ParsedParameter, ParsedProperty,
};
use crate::types::{ClassKind, UNKNOWN_TYPE, Visibility};
use tree_sitter::{Node, Parser};

const NODE_PACKAGE_DECLARATION: &str = "package_declaration";
const NODE_IMPORT_DECLARATION: &str = "import_declaration";
const NODE_CLASS_DECLARATION: &str = "class_declaration";
const NODE_INTERFACE_DECLARATION: &str = "interface_declaration";
const NODE_ENUM_DECLARATION: &str = "enum_declaration";
const NODE_ANNOTATION_TYPE_DECLARATION: &str = "annotation_type_declaration";
const NODE_RECORD_DECLARATION: &str = "record_declaration";
const NODE_FIELD_DECLARATION: &str = "field_declaration";
const NODE_METHOD_DECLARATION: &str = "method_declaration";
const NODE_CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";
const NODE_CLASS_BODY: &str = "class_body";
const NODE_INTERFACE_BODY: &str = "interface_body";
const NODE_ENUM_BODY: &str = "enum_body";
const NODE_ENUM_CONSTANT: &str = "enum_constant";
const NODE_ENUM_BODY_DECLARATIONS: &str = "enum_body_declarations";
const NODE_ANNOTATION_TYPE_BODY: &str = "annotation_type_body";
const NODE_MODIFIERS: &str = "modifiers";
const NODE_IDENTIFIER: &str = "identifier";
const NODE_SCOPED_IDENTIFIER: &str = "scoped_identifier";
const NODE_ASTERISK: &str = "asterisk";
const NODE_SUPERCLASS: &str = "superclass";
const NODE_SUPER_INTERFACES: &str = "super_interfaces";
const NODE_EXTENDS_INTERFACES: &str = "extends_interfaces";
const NODE_TYPE_LIST: &str = "type_list";
const NODE_TYPE_PARAMETERS: &str = "type_parameters";
const NODE_TYPE_PARAMETER: &str = "type_parameter";
const NODE_FORMAL_PARAMETERS: &str = "formal_parameters";
const NODE_FORMAL_PARAMETER: &str = "formal_parameter";
const NODE_SPREAD_PARAMETER: &str = "spread_parameter";
const NODE_VARIABLE_DECLARATOR: &str = "variable_declarator";
const NODE_METHOD_INVOCATION: &str = "method_invocation";
const NODE_OBJECT_CREATION: &str = "object_creation_expression";
const NODE_LOCAL_VARIABLE_DECLARATION: &str = "local_variable_declaration";
const NODE_ARGUMENT_LIST: &str = "argument_list";
const NODE_MARKER_ANNOTATION: &str = "marker_annotation";
const NODE_ANNOTATION: &str = "annotation";
const NODE_CAST_EXPRESSION: &str = "cast_expression";
const NODE_LAMBDA_EXPRESSION: &str = "lambda_expression";
const NODE_METHOD_REFERENCE: &str = "method_reference";

const TYPE_NODE_KINDS: &[&str] = &[
    "type_identifier",
    "generic_type",
    "scoped_type_identifier",
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "void_type",
    "array_type",
];

fn literal_type_for_kind(kind: &str) -> Option<&'static str> {
    match kind {
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
        | "binary_integer_literal" => Some("int"),
        "decimal_floating_point_literal" | "hex_floating_point_literal" => Some("double"),
        "string_literal" | "text_block" => Some("String"),
        "character_literal" => Some("char"),
        "true" | "false" => Some("boolean"),
        _ => None,
    }
}

/// Parser for Java source files.
pub struct JavaParser {
    parser: Parser,
}

impl std::fmt::Debug for JavaParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaParser")
            .field("language", &"Java")
            .finish()
    }
}

impl JavaParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| format!("Failed to initialize Java parser: {e}"))?;
        Ok(Self { parser })
    }

    fn extract_file(&self, root: Node, code: &str, file: &mut ParsedFile) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                NODE_PACKAGE_DECLARATION => {
                    if let Some(name) =
                        find_child_of_kinds(child, &[NODE_SCOPED_IDENTIFIER, NODE_IDENTIFIER])
                    {
                        file.package_name = Some(trimmed_text(name, code).to_string());
                    }
                }
                NODE_IMPORT_DECLARATION => {
                    if let Some(import) = self.extract_import(child, code) {
                        file.imports.push(import);
                    }
                }
                NODE_CLASS_DECLARATION
                | NODE_INTERFACE_DECLARATION
                | NODE_ENUM_DECLARATION
                | NODE_ANNOTATION_TYPE_DECLARATION
                | NODE_RECORD_DECLARATION => {
                    if let Some(class) = self.extract_class(child, code, file, 0) {
                        file.classes.push(class);
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_import(&self, node: Node, code: &str) -> Option<ParsedImport> {
        let path_node = find_child_of_kinds(node, &[NODE_SCOPED_IDENTIFIER, NODE_IDENTIFIER])?;
        let path = trimmed_text(path_node, code).to_string();
        let mut import = ParsedImport::new(path.clone());
        if find_child_of_kind(node, NODE_ASTERISK).is_some() {
            import.is_wildcard = true;
        } else {
            import.imported_name = path.rsplit('.').next().map(str::to_string);
        }
        Some(import)
    }

    fn class_kind_for(&self, node: Node) -> ClassKind {
        match node.kind() {
            NODE_INTERFACE_DECLARATION => ClassKind::Interface,
            NODE_ENUM_DECLARATION => ClassKind::Enum,
            NODE_ANNOTATION_TYPE_DECLARATION => ClassKind::Annotation,
            _ => ClassKind::Class,
        }
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

        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_IDENTIFIER))?;
        let location = node_location(node, &file.path);
        let mut class = ParsedClass::new(
            trimmed_text(name_node, code),
            self.class_kind_for(node),
            location,
        );
        // Java default (no modifier) is package-private.
        class.visibility = Visibility::Internal;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => {
                    let text = node_text(child, code);
                    class.visibility = visibility_from_modifier_text(text);
                    class.modifiers.is_abstract = text.contains("abstract");
                    class.annotations = self.extract_annotations(child, code);
                }
                NODE_TYPE_PARAMETERS => {
                    let mut tp_cursor = child.walk();
                    for tp in child.children(&mut tp_cursor) {
                        if tp.kind() == NODE_TYPE_PARAMETER {
                            if let Some(name) = find_child_of_kinds(
                                tp,
                                &[NODE_IDENTIFIER, "type_identifier"],
                            ) {
                                class.type_parameters.push(trimmed_text(name, code).to_string());
                            }
                        }
                    }
                }
                NODE_SUPERCLASS => {
                    if let Some(t) = find_child_of_kinds(child, TYPE_NODE_KINDS) {
                        class.super_class = Some(trimmed_text(t, code).to_string());
                    }
                }
                NODE_SUPER_INTERFACES | NODE_EXTENDS_INTERFACES => {
                    let list = find_child_of_kind(child, NODE_TYPE_LIST).unwrap_or(child);
                    let mut list_cursor = list.walk();
                    for t in list.children(&mut list_cursor) {
                        if TYPE_NODE_KINDS.contains(&t.kind()) {
                            class.interfaces.push(trimmed_text(t, code).to_string());
                        }
                    }
                }
                NODE_CLASS_BODY | NODE_INTERFACE_BODY | NODE_ANNOTATION_TYPE_BODY => {
                    self.extract_class_body(child, code, file, &mut class, depth);
                }
                NODE_ENUM_BODY => {
                    self.extract_enum_body(child, code, file, &mut class, depth);
                }
                _ => {}
            }
        }

        // Record components double as the canonical constructor's
        // parameters and as immutable properties.
        if node.kind() == NODE_RECORD_DECLARATION {
            if let Some(params) = node.child_by_field_name("parameters") {
                let parameters = self.extract_parameters(params, code);
                for parameter in &parameters {
                    let mut component = ParsedProperty::new(
                        parameter.name.clone(),
                        node_location(params, &file.path),
                    );
                    component.type_name = parameter.type_name.clone();
                    component.visibility = class.visibility;
                    component.is_immutable = true;
                    class.properties.push(component);
                }
                let mut ctor = ParsedFunction::new("<init>", node_location(params, &file.path));
                ctor.visibility = class.visibility;
                ctor.parameters = parameters;
                class.primary_constructor = Some(Box::new(ctor));
            }
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
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            match member.kind() {
                NODE_FIELD_DECLARATION => {
                    self.extract_fields(member, code, file, class);
                }
                NODE_METHOD_DECLARATION => {
                    if let Some(method) = self.extract_method(member, code, file, depth + 1) {
                        class.functions.push(method);
                    }
                }
                NODE_CONSTRUCTOR_DECLARATION => {
                    if let Some(ctor) = self.extract_constructor(member, code, file, depth + 1) {
                        class.secondary_constructors.push(ctor);
                    }
                }
                NODE_CLASS_DECLARATION
                | NODE_INTERFACE_DECLARATION
                | NODE_ENUM_DECLARATION
                | NODE_ANNOTATION_TYPE_DECLARATION
                | NODE_RECORD_DECLARATION => {
                    if let Some(nested) = self.extract_class(member, code, file, depth + 1) {
                        class.nested_classes.push(nested);
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_enum_body(
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
                NODE_ENUM_CONSTANT => {
                    if let Some(name) = find_child_of_kind(member, NODE_IDENTIFIER) {
                        let mut constant = ParsedProperty::new(
                            trimmed_text(name, code),
                            node_location(member, &file.path),
                        );
                        constant.type_name = Some(class.name.clone());
                        constant.is_immutable = true;
                        class.properties.push(constant);
                    }
                }
                NODE_ENUM_BODY_DECLARATIONS => {
                    self.extract_class_body(member, code, file, class, depth);
                }
                _ => {}
            }
        }
    }

    /// One field declaration can declare several fields:
    /// `private int a, b;`
    fn extract_fields(
        &self,
        node: Node,
        code: &str,
        file: &ParsedFile,
        class: &mut ParsedClass,
    ) {
        let mut visibility = Visibility::Internal;
        let mut is_final = false;
        let mut annotations = Vec::new();
        let mut type_name = None;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => {
                    let text = node_text(child, code);
                    visibility = visibility_from_modifier_text(text);
                    is_final = text.contains("final");
                    annotations = self.extract_annotations(child, code);
                }
                kind if TYPE_NODE_KINDS.contains(&kind) => {
                    type_name = Some(trimmed_text(child, code).to_string());
                }
                NODE_VARIABLE_DECLARATOR => {
                    let Some(name) = find_child_of_kind(child, NODE_IDENTIFIER) else {
                        continue;
                    };
                    let mut property = ParsedProperty::new(
                        trimmed_text(name, code),
                        node_location(child, &file.path),
                    );
                    property.type_name = type_name.clone();
                    property.visibility = visibility;
                    property.is_immutable = is_final;
                    property.annotations = annotations.clone();
                    if let Some(value) = child.child_by_field_name("value") {
                        property.initializer = Some(trimmed_text(value, code).to_string());
                    }
                    class.properties.push(property);
                }
                _ => {}
            }
        }
    }

    fn extract_method(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedFunction> {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| find_child_of_kind(node, NODE_IDENTIFIER))?;
        let mut method = ParsedFunction::new(
            trimmed_text(name_node, code),
            node_location(node, &file.path),
        );
        method.visibility = Visibility::Internal;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => {
                    let text = node_text(child, code);
                    method.visibility = visibility_from_modifier_text(text);
                    method.modifiers.is_abstract = text.contains("abstract");
                    method.annotations = self.extract_annotations(child, code);
                }
                NODE_TYPE_PARAMETERS => {
                    let mut tp_cursor = child.walk();
                    for tp in child.children(&mut tp_cursor) {
                        if tp.kind() == NODE_TYPE_PARAMETER {
                            if let Some(name) =
                                find_child_of_kinds(tp, &[NODE_IDENTIFIER, "type_identifier"])
                            {
                                method.type_parameters.push(trimmed_text(name, code).to_string());
                            }
                        }
                    }
                }
                kind if TYPE_NODE_KINDS.contains(&kind) => {
                    // The node before the name is the return type.
                    if child.start_byte() < name_node.start_byte() {
                        method.return_type = Some(trimmed_text(child, code).to_string());
                    }
                }
                NODE_FORMAL_PARAMETERS => {
                    method.parameters = self.extract_parameters(child, code);
                }
                "block" => {
                    self.collect_calls(
                        child,
                        code,
                        file,
                        &mut method.calls,
                        &mut method.local_variables,
                        depth,
                    );
                }
                _ => {}
            }
        }
        Some(method)
    }

    fn extract_constructor(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedFunction> {
        let mut ctor = ParsedFunction::new("<init>", node_location(node, &file.path));
        ctor.visibility = Visibility::Internal;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                NODE_MODIFIERS => {
                    ctor.visibility = visibility_from_modifier_text(node_text(child, code));
                    ctor.annotations = self.extract_annotations(child, code);
                }
                NODE_FORMAL_PARAMETERS => {
                    ctor.parameters = self.extract_parameters(child, code);
                }
                "constructor_body" => {
                    self.collect_calls(
                        child,
                        code,
                        file,
                        &mut ctor.calls,
                        &mut ctor.local_variables,
                        depth,
                    );
                }
                _ => {}
            }
        }
        Some(ctor)
    }

    fn extract_parameters(&self, params: Node, code: &str) -> Vec<ParsedParameter> {
        let mut parameters = Vec::new();
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            match child.kind() {
                NODE_FORMAL_PARAMETER => {
                    let Some(name) = child
                        .child_by_field_name("name")
                        .or_else(|| find_child_of_kind(child, NODE_IDENTIFIER))
                    else {
                        continue;
                    };
                    let mut parameter = ParsedParameter::new(trimmed_text(name, code));
                    parameter.type_name = find_child_of_kinds(child, TYPE_NODE_KINDS)
                        .map(|t| trimmed_text(t, code).to_string());
                    if let Some(modifiers) = find_child_of_kind(child, NODE_MODIFIERS) {
                        parameter.annotations = self.extract_annotations(modifiers, code);
                    }
                    parameters.push(parameter);
                }
                NODE_SPREAD_PARAMETER => {
                    let name = find_child_of_kind(child, NODE_VARIABLE_DECLARATOR)
                        .and_then(|d| find_child_of_kind(d, NODE_IDENTIFIER))
                        .map(|n| trimmed_text(n, code).to_string())
                        .unwrap_or_else(|| "args".to_string());
                    let mut parameter = ParsedParameter::new(name);
                    parameter.type_name = find_child_of_kinds(child, TYPE_NODE_KINDS)
                        .map(|t| format!("{}...", trimmed_text(t, code)));
                    parameter.is_variadic = true;
                    parameters.push(parameter);
                }
                _ => {}
            }
        }
        parameters
    }

    fn extract_annotations(&self, modifiers: Node, code: &str) -> Vec<ParsedAnnotation> {
        let mut annotations = Vec::new();
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            match child.kind() {
                NODE_MARKER_ANNOTATION => {
                    if let Some(name) =
                        find_child_of_kinds(child, &[NODE_IDENTIFIER, NODE_SCOPED_IDENTIFIER])
                    {
                        annotations.push(ParsedAnnotation::new(trimmed_text(name, code)));
                    }
                }
                NODE_ANNOTATION => {
                    let Some(name) =
                        find_child_of_kinds(child, &[NODE_IDENTIFIER, NODE_SCOPED_IDENTIFIER])
                    else {
                        continue;
                    };
                    let mut annotation = ParsedAnnotation::new(trimmed_text(name, code));
                    if let Some(args) = find_child_of_kind(child, "annotation_argument_list") {
                        let mut arg_cursor = args.walk();
                        for arg in args.named_children(&mut arg_cursor) {
                            if arg.kind() == "element_value_pair" {
                                let key = arg
                                    .child_by_field_name("key")
                                    .map(|k| trimmed_text(k, code).to_string());
                                let value = arg
                                    .child_by_field_name("value")
                                    .map(|v| trimmed_text(v, code).to_string())
                                    .unwrap_or_default();
                                annotation
                                    .arguments
                                    .push(AnnotationArgument { name: key, value });
                            } else {
                                annotation.arguments.push(AnnotationArgument {
                                    name: None,
                                    value: trimmed_text(arg, code).to_string(),
                                });
                            }
                        }
                    }
                    annotations.push(annotation);
                }
                _ => {}
            }
        }
        annotations
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
            NODE_METHOD_INVOCATION => {
                if let Some(call) = self.extract_invocation(node, code, &file.path) {
                    calls.push(call);
                }
            }
            NODE_OBJECT_CREATION => {
                if let Some(call) = self.extract_object_creation(node, code, file, depth) {
                    calls.push(call);
                }
            }
            NODE_LOCAL_VARIABLE_DECLARATION => {
                self.record_local_variable(node, code, &file.path, locals);
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(child, code, file, calls, locals, depth + 1);
        }
    }

    fn extract_invocation(&self, node: Node, code: &str, path: &str) -> Option<ParsedCall> {
        let name_node = node.child_by_field_name("name")?;
        let mut call = ParsedCall::new(trimmed_text(name_node, code), node_location(node, path));

        if let Some(object) = node.child_by_field_name("object") {
            call.receiver = Some(match object.kind() {
                NODE_METHOD_INVOCATION | NODE_OBJECT_CREATION => CHAINED_CALL_RECEIVER.to_string(),
                _ => trimmed_text(object, code).to_string(),
            });
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let (count, types) = self.extract_arguments(arguments, code);
            call.argument_count = count;
            call.argument_types = types;
        }
        Some(call)
    }

    /// `new Foo(...)`, optionally with an anonymous class body.
    fn extract_object_creation(
        &self,
        node: Node,
        code: &str,
        file: &mut ParsedFile,
        depth: usize,
    ) -> Option<ParsedCall> {
        let type_node = node
            .child_by_field_name("type")
            .or_else(|| find_child_of_kinds(node, TYPE_NODE_KINDS))?;
        let type_text = trimmed_text(type_node, code);
        let simple_name = crate::parsing::ast::strip_generics(type_text)
            .rsplit('.')
            .next()
            .unwrap_or(type_text)
            .to_string();

        let mut call = ParsedCall::new(simple_name, node_location(node, &file.path));
        call.is_constructor_call = true;
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let (count, types) = self.extract_arguments(arguments, code);
            call.argument_count = count;
            call.argument_types = types;
        }

        // An anonymous class body makes this an object expression too.
        if let Some(body) = find_child_of_kind(node, NODE_CLASS_BODY) {
            let location = node_location(node, &file.path);
            let mut container =
                ParsedClass::new("<anonymous>", ClassKind::Object, location.clone());
            self.extract_class_body(body, code, file, &mut container, depth + 1);
            file.object_expressions.push(ParsedObjectExpression {
                super_types: vec![type_text.to_string()],
                functions: container.functions,
                properties: container.properties,
                location,
            });
        }
        Some(call)
    }

    fn extract_arguments(&self, arguments: Node, code: &str) -> (usize, Option<Vec<String>>) {
        let mut count = 0;
        let mut types = Vec::new();
        let mut cursor = arguments.walk();
        for argument in arguments.named_children(&mut cursor) {
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
            NODE_OBJECT_CREATION => node
                .child_by_field_name("type")
                .map(|t| {
                    crate::parsing::ast::strip_generics(trimmed_text(t, code)).to_string()
                })
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            NODE_CAST_EXPRESSION => node
                .child_by_field_name("type")
                .map(|t| trimmed_text(t, code).to_string())
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            NODE_LAMBDA_EXPRESSION | NODE_METHOD_REFERENCE => "Function".to_string(),
            "array_creation_expression" => node
                .child_by_field_name("type")
                .map(|t| format!("{}[]", trimmed_text(t, code)))
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            _ => UNKNOWN_TYPE.to_string(),
        }
    }

    /// `Repo r = ...` or `var r = new Repo()` registers the local's type.
    fn record_local_variable(
        &self,
        node: Node,
        code: &str,
        path: &str,
        locals: &mut Vec<ParsedLocalVariable>,
    ) {
        let declared_type = find_child_of_kinds(node, TYPE_NODE_KINDS)
            .map(|t| trimmed_text(t, code).to_string())
            .filter(|t| t != "var");

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != NODE_VARIABLE_DECLARATOR {
                continue;
            }
            let Some(name) = find_child_of_kind(child, NODE_IDENTIFIER) else {
                continue;
            };
            let type_name = declared_type.clone().or_else(|| {
                child
                    .child_by_field_name("value")
                    .filter(|v| v.kind() == NODE_OBJECT_CREATION)
                    .and_then(|v| v.child_by_field_name("type"))
                    .map(|t| {
                        crate::parsing::ast::strip_generics(trimmed_text(t, code)).to_string()
                    })
            });
            if let Some(type_name) = type_name {
                locals.push(ParsedLocalVariable {
                    name: trimmed_text(name, code).to_string(),
                    type_name,
                    location: node_location(child, path),
                });
            }
        }
    }
}

impl LanguageParser for JavaParser {
    fn parse(&mut self, code: &str, path: &str) -> ParseOutcome {
        let Some(tree) = self.parser.parse(code, None) else {
            return ParseOutcome::Failed(parse_failure_diagnostic(path, Language::Java));
        };
        let root = tree.root_node();
        let mut file = ParsedFile::new(path, Language::Java);
        self.extract_file(root, code, &mut file);

        if root.has_error() {
            ParseOutcome::Partial(file, partial_parse_diagnostic(path, Language::Java))
        } else {
            ParseOutcome::Clean(file)
        }
    }

    fn language(&self) -> Language {
        Language::Java
    }
}

fn visibility_from_modifier_text(text: &str) -> Visibility {
    if text.contains("public") {
        Visibility::Public
    } else if text.contains("private") {
        Visibility::Private
    } else if text.contains("protected") {
        Visibility::Protected
    } else {
        Visibility::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> ParsedFile {
        let mut parser = JavaParser::new().unwrap();
        match parser.parse(code, "Test.java") {
            ParseOutcome::Clean(f) | ParseOutcome::Partial(f, _) => f,
            ParseOutcome::Failed(d) => panic!("parse failed: {d:?}"),
        }
    }

    #[test]
    fn extracts_package_imports_and_class() {
        let file = parse(
            "package com.example;\n\
             import java.util.List;\n\
             import java.io.*;\n\
             public class UserService {}\n",
        );
        assert_eq!(file.package_name.as_deref(), Some("com.example"));
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].imported_name.as_deref(), Some("List"));
        assert!(file.imports[1].is_wildcard);
        assert_eq!(file.classes[0].name, "UserService");
        assert_eq!(file.classes[0].visibility, Visibility::Public);
    }

    #[test]
    fn package_private_maps_to_internal() {
        let file = parse("package p;\nclass Hidden {}\n");
        assert_eq!(file.classes[0].visibility, Visibility::Internal);
    }

    #[test]
    fn extracts_extends_and_implements() {
        let file = parse(
            "package p;\n\
             public class Service extends Base implements Closeable, Runnable {}\n",
        );
        let class = &file.classes[0];
        assert_eq!(class.super_class.as_deref(), Some("Base"));
        assert_eq!(class.interfaces, vec!["Closeable", "Runnable"]);
    }

    #[test]
    fn extracts_methods_fields_and_constructor() {
        let file = parse(
            "package p;\n\
             public class Account {\n\
                 private final String id;\n\
                 public Account(String id) { this.id = id; }\n\
                 public String id() { return id; }\n\
             }\n",
        );
        let class = &file.classes[0];
        assert_eq!(class.properties.len(), 1);
        assert!(class.properties[0].is_immutable);
        assert_eq!(class.secondary_constructors.len(), 1);
        assert_eq!(class.secondary_constructors[0].name, "<init>");
        assert_eq!(class.secondary_constructors[0].parameters.len(), 1);
        assert_eq!(class.functions.len(), 1);
        assert_eq!(class.functions[0].return_type.as_deref(), Some("String"));
    }

    #[test]
    fn captures_method_calls_with_receivers() {
        let file = parse(
            "package p;\n\
             public class S {\n\
                 void go(Repo repo) {\n\
                     repo.save(1);\n\
                     helper();\n\
                     repo.find().commit();\n\
                 }\n\
             }\n",
        );
        let calls = &file.classes[0].functions[0].calls;
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].name, "save");
        assert_eq!(calls[0].receiver.as_deref(), Some("repo"));
        assert_eq!(calls[1].name, "helper");
        assert!(calls[1].receiver.is_none());
        let commit = calls.iter().find(|c| c.name == "commit").unwrap();
        assert_eq!(commit.receiver.as_deref(), Some(CHAINED_CALL_RECEIVER));
    }

    #[test]
    fn object_creation_is_constructor_call() {
        let file = parse(
            "package p;\n\
             public class S {\n\
                 void go() { User u = new User(\"a\"); }\n\
             }\n",
        );
        let function = &file.classes[0].functions[0];
        let ctor = function.calls.iter().find(|c| c.is_constructor_call).unwrap();
        assert_eq!(ctor.name, "User");
        assert_eq!(ctor.argument_count, 1);
        assert_eq!(ctor.argument_types.as_ref().unwrap()[0], "String");
        // The local got its type from the declaration.
        assert_eq!(function.local_variables[0].name, "u");
        assert_eq!(function.local_variables[0].type_name, "User");
    }

    #[test]
    fn var_infers_from_constructor_initializer() {
        let file = parse(
            "package p;\n\
             public class S {\n\
                 void go() { var repo = new Repo<String>(); }\n\
             }\n",
        );
        let locals = &file.classes[0].functions[0].local_variables;
        assert_eq!(locals[0].type_name, "Repo");
    }

    #[test]
    fn anonymous_class_becomes_object_expression() {
        let file = parse(
            "package p;\n\
             public class S {\n\
                 void go() {\n\
                     Runnable r = new Runnable() { public void run() {} };\n\
                 }\n\
             }\n",
        );
        assert_eq!(file.object_expressions.len(), 1);
        assert_eq!(file.object_expressions[0].super_types, vec!["Runnable"]);
        assert_eq!(file.object_expressions[0].functions.len(), 1);
    }

    #[test]
    fn enum_constants_become_properties() {
        let file = parse(
            "package p;\n\
             public enum Color { RED, GREEN; public void dump() {} }\n",
        );
        let class = &file.classes[0];
        assert_eq!(class.kind, ClassKind::Enum);
        let names: Vec<_> = class.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN"]);
        assert_eq!(class.functions.len(), 1);
    }

    #[test]
    fn record_components_become_properties_and_constructor() {
        let file = parse(
            "package p;\n\
             public record Point(int x, int y) {\n\
                 public int sum() { return x + y; }\n\
             }\n",
        );
        let record = &file.classes[0];
        assert_eq!(record.name, "Point");
        let names: Vec<_> = record.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(record.properties.iter().all(|p| p.is_immutable));
        let ctor = record.primary_constructor.as_ref().unwrap();
        assert_eq!(ctor.parameters.len(), 2);
        assert_eq!(record.functions.len(), 1);
    }

    #[test]
    fn varargs_parameter_is_variadic() {
        let file = parse(
            "package p;\n\
             public class S { void log(String fmt, Object... args) {} }\n",
        );
        let params = &file.classes[0].functions[0].parameters;
        assert!(!params[0].is_variadic);
        assert!(params[1].is_variadic);
    }
}
