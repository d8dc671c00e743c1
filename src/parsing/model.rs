//! The language-neutral parsed model.
//!
//! Stage A output: every declaration a source file contains, lifted into
//! immutable values. Types stay as surface strings exactly as written;
//! qualification lives in `package_name` and call receivers, never in
//! simple names.

use crate::parsing::Language;
use crate::types::{ClassKind, SourceLocation, Visibility};
use serde::{Deserialize, Serialize};

/// A fully parsed source file. Self-contained: never references another file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    pub language: Language,
    pub package_name: Option<String>,
    pub imports: Vec<ParsedImport>,
    pub functions: Vec<ParsedFunction>,
    pub properties: Vec<ParsedProperty>,
    pub classes: Vec<ParsedClass>,
    pub type_aliases: Vec<ParsedTypeAlias>,
    pub destructurings: Vec<ParsedDestructuring>,
    pub object_expressions: Vec<ParsedObjectExpression>,
}

impl ParsedFile {
    pub fn new(path: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            language,
            package_name: None,
            imports: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            classes: Vec::new(),
            type_aliases: Vec::new(),
            destructurings: Vec::new(),
            object_expressions: Vec::new(),
        }
    }
}

/// A single import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedImport {
    /// The import path as written (`com.example.util.StringUtils`,
    /// `./helpers`, `react`).
    pub path: String,
    /// The specific name brought into scope, when the syntax names one.
    pub imported_name: Option<String>,
    /// Local alias (`import x as y`, `import { x as y }`).
    pub alias: Option<String>,
    pub is_wildcard: bool,
    pub is_type_only: bool,
    pub is_dynamic: bool,
}

impl ParsedImport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            imported_name: None,
            alias: None,
            is_wildcard: false,
            is_type_only: false,
            is_dynamic: false,
        }
    }

    /// The name this import binds in the file: alias first, then the
    /// imported name, then the last path segment.
    pub fn local_name(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .or(self.imported_name.as_deref())
            .or_else(|| self.path.rsplit('.').next())
    }
}

/// An annotation (or decorator) attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAnnotation {
    pub name: String,
    /// Ordered raw arguments; never evaluated.
    pub arguments: Vec<AnnotationArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationArgument {
    pub name: Option<String>,
    pub value: String,
}

impl ParsedAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }
}

/// Modifier flags shared by class-like declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModifiers {
    pub is_abstract: bool,
    pub is_data: bool,
    pub is_sealed: bool,
}

/// A class-like declaration, recursive through `nested_classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedClass {
    pub name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub modifiers: ClassModifiers,
    pub type_parameters: Vec<String>,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<ParsedAnnotation>,
    pub properties: Vec<ParsedProperty>,
    pub functions: Vec<ParsedFunction>,
    pub nested_classes: Vec<ParsedClass>,
    /// Companion object / static sibling, when the language has one.
    pub companion: Option<Box<ParsedClass>>,
    /// Primary constructor, when the language declares one in the class
    /// header. Java constructors all land in `secondary_constructors`.
    pub primary_constructor: Option<Box<ParsedFunction>>,
    pub secondary_constructors: Vec<ParsedFunction>,
    pub location: SourceLocation,
}

impl ParsedClass {
    pub fn new(name: impl Into<String>, kind: ClassKind, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            modifiers: ClassModifiers::default(),
            type_parameters: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
            nested_classes: Vec::new(),
            companion: None,
            primary_constructor: None,
            secondary_constructors: Vec::new(),
            location,
        }
    }
}

/// Modifier flags for functions. `is_async` also covers Kotlin `suspend`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionModifiers {
    pub is_abstract: bool,
    pub is_async: bool,
    pub is_inline: bool,
    pub is_infix: bool,
    pub is_operator: bool,
    pub is_extension: bool,
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFunction {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<ParsedParameter>,
    /// Return type as written in source, when annotated.
    pub return_type: Option<String>,
    pub modifiers: FunctionModifiers,
    /// Extension receiver type (`fun Int.squared()` → `Int`).
    pub receiver_type: Option<String>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<ParsedAnnotation>,
    /// Every call-like expression captured from the body, in source order.
    pub calls: Vec<ParsedCall>,
    /// Local variable bindings with a known declared or constructed type.
    pub local_variables: Vec<ParsedLocalVariable>,
    /// Merged overload signatures when the language separates signatures
    /// from the implementation.
    pub overloads: Vec<ParsedFunction>,
    /// An ambient signature with no implementation in the file.
    pub is_overload_signature: bool,
    pub location: SourceLocation,
}

impl ParsedFunction {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            parameters: Vec::new(),
            return_type: None,
            modifiers: FunctionModifiers::default(),
            receiver_type: None,
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            calls: Vec::new(),
            local_variables: Vec::new(),
            overloads: Vec::new(),
            is_overload_signature: false,
            location,
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedParameter {
    pub name: String,
    pub type_name: Option<String>,
    /// Raw default value text, when present.
    pub default_value: Option<String>,
    /// Variadic / rest parameter (`vararg`, `...rest`).
    pub is_variadic: bool,
    pub annotations: Vec<ParsedAnnotation>,
}

impl ParsedParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            default_value: None,
            is_variadic: false,
            annotations: Vec::new(),
        }
    }
}

/// A property / field / top-level value declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProperty {
    pub name: String,
    pub type_name: Option<String>,
    pub visibility: Visibility,
    pub is_immutable: bool,
    /// Raw initializer text, when present. Used for constructed-type
    /// inference; initializer expressions are not call sites.
    pub initializer: Option<String>,
    pub annotations: Vec<ParsedAnnotation>,
    pub location: SourceLocation,
}

impl ParsedProperty {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            visibility: Visibility::Public,
            is_immutable: false,
            initializer: None,
            annotations: Vec::new(),
            location,
        }
    }
}

/// A type alias declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTypeAlias {
    pub name: String,
    pub aliased_type: String,
    pub visibility: Visibility,
    pub type_parameters: Vec<String>,
    pub location: SourceLocation,
}

/// A call-like expression captured from a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCall {
    /// Syntactic name of the callee (`log`, `add`, class name for
    /// constructor calls).
    pub name: String,
    /// Literal receiver chain text (`a.b.c`), or the synthetic
    /// `"<previous-call>()"` when chained onto another call's result.
    pub receiver: Option<String>,
    /// Receiver type known from declared annotations, when the parser
    /// can see one.
    pub receiver_type: Option<String>,
    pub argument_count: usize,
    /// Inferred surface types for literal arguments. Set only when
    /// non-empty; `argument_count == argument_types.len()` when present.
    pub argument_types: Option<Vec<String>>,
    pub is_constructor_call: bool,
    pub is_safe_call: bool,
    pub location: SourceLocation,
}

impl ParsedCall {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            receiver_type: None,
            argument_count: 0,
            argument_types: None,
            is_constructor_call: false,
            is_safe_call: false,
            location,
        }
    }
}

/// Synthetic receiver used when a call chains onto another call's result.
pub const CHAINED_CALL_RECEIVER: &str = "<previous-call>()";

/// A local variable binding whose type the parser could determine, from
/// an explicit annotation or a constructor-call initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLocalVariable {
    pub name: String,
    pub type_name: String,
    pub location: SourceLocation,
}

/// An anonymous object expression / anonymous class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedObjectExpression {
    pub super_types: Vec<String>,
    pub functions: Vec<ParsedFunction>,
    pub properties: Vec<ParsedProperty>,
    pub location: SourceLocation,
}

/// A destructuring declaration. `_` components keep their position but
/// produce no symbol downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDestructuring {
    /// Ordered component names, `_` preserved for skipped positions.
    pub components: Vec<String>,
    pub component_types: Option<Vec<String>>,
    pub is_immutable: bool,
    pub location: SourceLocation,
}
