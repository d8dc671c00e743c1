//! Resolution contexts.
//!
//! A [`FileContext`] is built once per file: effective imports (named
//! bindings plus wildcard packages, including the language defaults from
//! the stdlib provider). A [`ResolutionContext`] is built once per
//! enclosing function or property initializer and adds the enclosing
//! class and the local variable types.

use crate::parsing::{Language, ParsedFile, ParsedFunction};
use crate::resolve::stdlib::provider_for;
use crate::symbols::SymbolTable;
use std::collections::HashMap;

/// A name brought into file scope by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local_name: String,
    /// The dotted target the binding points at: an FQN for Kotlin/Java,
    /// a module path (optionally with a member) for TypeScript.
    pub target: String,
    /// Namespace import (`import * as X`): member accesses on the local
    /// name resolve against the target module.
    pub is_namespace: bool,
    pub is_type_only: bool,
}

/// Per-file view the resolver works against.
#[derive(Debug)]
pub struct FileContext<'a> {
    pub file: &'a ParsedFile,
    pub bindings: Vec<ImportBinding>,
    /// Wildcard-imported packages, file imports first, then language
    /// defaults.
    pub wildcard_packages: Vec<String>,
}

impl<'a> FileContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        let mut bindings = Vec::new();
        let mut wildcard_packages = Vec::new();

        for import in &file.imports {
            if import.is_dynamic {
                continue;
            }
            match file.language {
                Language::Kotlin | Language::Java => {
                    if import.is_wildcard {
                        wildcard_packages.push(import.path.clone());
                    } else if let Some(local) = import.local_name() {
                        bindings.push(ImportBinding {
                            local_name: local.to_string(),
                            target: import.path.clone(),
                            is_namespace: false,
                            is_type_only: false,
                        });
                    }
                }
                Language::TypeScript | Language::JavaScript => {
                    let module = module_target(&import.path, file.package_name.as_deref());
                    if import.is_wildcard {
                        if let Some(alias) = &import.alias {
                            bindings.push(ImportBinding {
                                local_name: alias.clone(),
                                target: module,
                                is_namespace: true,
                                is_type_only: import.is_type_only,
                            });
                        }
                    } else {
                        let target = match import.imported_name.as_deref() {
                            Some("default") | None => module,
                            Some(member) => {
                                if module.is_empty() {
                                    member.to_string()
                                } else {
                                    format!("{module}.{member}")
                                }
                            }
                        };
                        if let Some(local) = import.local_name() {
                            bindings.push(ImportBinding {
                                local_name: local.to_string(),
                                target,
                                is_namespace: false,
                                is_type_only: import.is_type_only,
                            });
                        }
                    }
                }
            }
        }

        for package in provider_for(file.language).default_wildcard_imports() {
            wildcard_packages.push(package.to_string());
        }

        Self {
            file,
            bindings,
            wildcard_packages,
        }
    }

    pub fn language(&self) -> Language {
        self.file.language
    }

    pub fn package(&self) -> Option<&str> {
        self.file.package_name.as_deref()
    }

    /// Find the import binding for a local name.
    pub fn binding(&self, name: &str) -> Option<&ImportBinding> {
        self.bindings.iter().find(|b| b.local_name == name)
    }
}

/// Resolve a TypeScript/JavaScript import specifier to a dotted module
/// path, relative specifiers against the importing module's path.
fn module_target(import_path: &str, current_package: Option<&str>) -> String {
    if !import_path.starts_with('.') {
        // Bare specifier: an external package, kept as written.
        return import_path.replace('/', ".");
    }
    let mut base: Vec<String> = current_package
        .map(|p| p.split('.').map(str::to_string).collect())
        .unwrap_or_default();
    // The current module's directory, not the module itself.
    base.pop();

    for segment in import_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                base.pop();
            }
            s => base.push(s.to_string()),
        }
    }
    if base.last().map(String::as_str) == Some("index") {
        base.pop();
    }
    base.join(".")
}

/// Per-declaration context for the strategy ladder.
#[derive(Debug)]
pub struct ResolutionContext<'a> {
    pub file_ctx: &'a FileContext<'a>,
    /// FQN of the declaration the calls belong to.
    pub from_fqn: String,
    /// FQN of the enclosing class, when inside one.
    pub current_class: Option<String>,
    /// Local variable name to declared/constructed surface type.
    pub locals: HashMap<String, String>,
}

impl<'a> ResolutionContext<'a> {
    /// Context for a function body: parameters with declared types plus
    /// the parser-recorded local bindings.
    pub fn for_function(
        file_ctx: &'a FileContext<'a>,
        function: &ParsedFunction,
        from_fqn: String,
        current_class: Option<String>,
    ) -> Self {
        let mut locals = HashMap::new();
        for parameter in &function.parameters {
            if let Some(type_name) = &parameter.type_name {
                locals.insert(parameter.name.clone(), type_name.clone());
            }
        }
        for local in &function.local_variables {
            locals.insert(local.name.clone(), local.type_name.clone());
        }
        Self {
            file_ctx,
            from_fqn,
            current_class,
            locals,
        }
    }

    /// Context for a property initializer: no parameters, no locals.
    pub fn for_initializer(
        file_ctx: &'a FileContext<'a>,
        from_fqn: String,
        current_class: Option<String>,
    ) -> Self {
        Self {
            file_ctx,
            from_fqn,
            current_class,
            locals: HashMap::new(),
        }
    }

    pub fn local_type(&self, name: &str) -> Option<&str> {
        self.locals.get(name).map(String::as_str)
    }

    /// Type of a property on the current class, searching the class
    /// itself first, then its ancestors nearest-first.
    pub fn class_property_type(&self, table: &SymbolTable, name: &str) -> Option<String> {
        let class_fqn = self.current_class.as_deref()?;
        let mut candidates = vec![class_fqn.to_string()];
        candidates.extend(table.ancestors(class_fqn).iter().cloned());

        for owner in candidates {
            let fqn = format!("{owner}.{name}");
            if let Some(property) = table.get(&fqn).and_then(|s| s.as_property()) {
                if let Some(type_name) = &property.type_name {
                    return Some(type_name.clone());
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ParsedImport;

    #[test]
    fn kotlin_imports_split_into_bindings_and_wildcards() {
        let mut file = ParsedFile::new("a.kt", Language::Kotlin);
        file.package_name = Some("com.example".into());
        let mut named = ParsedImport::new("com.example.util.StringUtils");
        named.imported_name = Some("StringUtils".into());
        file.imports.push(named);
        let mut wildcard = ParsedImport::new("com.example.io");
        wildcard.is_wildcard = true;
        file.imports.push(wildcard);

        let ctx = FileContext::new(&file);
        let binding = ctx.binding("StringUtils").unwrap();
        assert_eq!(binding.target, "com.example.util.StringUtils");
        assert!(ctx.wildcard_packages.contains(&"com.example.io".to_string()));
        // Kotlin defaults are appended after file imports.
        assert!(ctx.wildcard_packages.iter().any(|p| p == "kotlin"));
    }

    #[test]
    fn typescript_relative_import_targets_module_path() {
        let mut file = ParsedFile::new("src/billing/invoice.ts", Language::TypeScript);
        file.package_name = Some("billing.invoice".into());
        let mut import = ParsedImport::new("./tax");
        import.imported_name = Some("vatRate".into());
        file.imports.push(import);
        let mut parent = ParsedImport::new("../util/format");
        parent.imported_name = Some("money".into());
        file.imports.push(parent);

        let ctx = FileContext::new(&file);
        assert_eq!(ctx.binding("vatRate").unwrap().target, "billing.tax.vatRate");
        assert_eq!(ctx.binding("money").unwrap().target, "util.format.money");
    }

    #[test]
    fn namespace_import_binds_module() {
        let mut file = ParsedFile::new("src/app.ts", Language::TypeScript);
        file.package_name = Some("app".into());
        let mut import = ParsedImport::new("./helpers");
        import.is_wildcard = true;
        import.alias = Some("H".into());
        file.imports.push(import);

        let ctx = FileContext::new(&file);
        let binding = ctx.binding("H").unwrap();
        assert!(binding.is_namespace);
        assert_eq!(binding.target, "helpers");
    }

    #[test]
    fn function_context_collects_parameter_and_local_types() {
        use crate::parsing::{ParsedLocalVariable, ParsedParameter};
        use crate::types::SourceLocation;

        let file = ParsedFile::new("a.kt", Language::Kotlin);
        let ctx = FileContext::new(&file);

        let mut function =
            ParsedFunction::new("go", SourceLocation::new("a.kt", 1, 1, 3, 1));
        let mut parameter = ParsedParameter::new("repo");
        parameter.type_name = Some("Repo".into());
        function.parameters.push(parameter);
        function.local_variables.push(ParsedLocalVariable {
            name: "user".into(),
            type_name: "User".into(),
            location: SourceLocation::new("a.kt", 2, 5, 2, 30),
        });

        let resolution = ResolutionContext::for_function(&ctx, &function, "go".into(), None);
        assert_eq!(resolution.local_type("repo"), Some("Repo"));
        assert_eq!(resolution.local_type("user"), Some("User"));
        assert_eq!(resolution.local_type("other"), None);
    }
}
