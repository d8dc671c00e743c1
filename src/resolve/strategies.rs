//! The resolution strategy ladder.
//!
//! For each call site the strategies below run in order; the first
//! success wins. Every step is a total function returning `Option`, so
//! a miss in one strategy can never abort the file.
//!
//! 1. qualified call (dotted receiver against known FQNs)
//! 2. constructor call
//! 3. explicit receiver type
//! 4. local-variable receiver
//! 5. class-property receiver
//! 6. extension function
//! 7. current-class method
//! 8. named import
//! 9. same package
//! 10. wildcard imports
//! 11. stdlib

use crate::parsing::ast::strip_generics;
use crate::parsing::{CHAINED_CALL_RECEIVER, ParsedCall};
use crate::resolve::context::ResolutionContext;
use crate::resolve::overloads::{select_overload, types_compatible};
use crate::resolve::stdlib::provider_for;
use crate::resolve::type_resolution::resolve_type;
use crate::symbols::{FunctionSymbol, Symbol, SymbolTable};
use crate::types::qualify;

/// Receiver text after normalization: `this.` prefixes dropped, the
/// chained-call marker singled out.
enum Receiver<'a> {
    None,
    /// `build().run()` — the receiver is a previous call's result.
    Chained,
    Named(&'a str),
}

fn normalize_receiver(raw: Option<&str>) -> Receiver<'_> {
    match raw {
        None => Receiver::None,
        Some(CHAINED_CALL_RECEIVER) => Receiver::Chained,
        Some("this") | Some("super") => Receiver::None,
        Some(r) => {
            let stripped = r.strip_prefix("this.").unwrap_or(r);
            if stripped.is_empty() {
                Receiver::None
            } else {
                Receiver::Named(stripped)
            }
        }
    }
}

/// Resolve one call site to a target FQN, or `None` when every strategy
/// misses.
pub fn resolve_call(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let receiver = normalize_receiver(call.receiver.as_deref());

    match &receiver {
        Receiver::Chained => {
            // The receiver type of a chained call is unknown without the
            // previous call's return type; only the qualified walk on a
            // known prefix could help, and there is none.
            None
        }
        Receiver::Named(r) if r.contains('.') => {
            qualified_call(r, call, ctx, table)
                .or_else(|| rooted_member_chain(r, call, ctx, table))
                .or_else(|| stdlib_static(r, call, ctx))
        }
        Receiver::Named(r) => {
            explicit_receiver_type(call, ctx, table)
                .or_else(|| local_variable_receiver(r, call, ctx, table))
                .or_else(|| class_property_receiver(r, call, ctx, table))
                .or_else(|| receiver_as_type(r, call, ctx, table))
                .or_else(|| import_qualified(r, call, ctx, table))
                .or_else(|| extension_function(Some(r), call, ctx, table))
                .or_else(|| stdlib_static(r, call, ctx))
        }
        Receiver::None => {
            constructor_call(call, ctx, table)
                .or_else(|| explicit_receiver_type(call, ctx, table))
                .or_else(|| extension_function(None, call, ctx, table))
                .or_else(|| current_class_method(call, ctx, table))
                .or_else(|| named_import(call, ctx, table))
                .or_else(|| same_package(call, ctx, table))
                .or_else(|| wildcard_imports(call, ctx, table))
                .or_else(|| stdlib_free(call, ctx))
        }
    }
}

/// Strategy 1: the receiver is (or starts with) a known FQN.
fn qualified_call(
    receiver: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let expanded = expand_first_segment(receiver, ctx);

    // Direct hit: `com.example.utils.StringUtils.format`.
    let full = format!("{expanded}.{}", call.name);
    if let Some(symbol) = table.get(&full) {
        return Some(target_fqn(symbol, call));
    }

    // Longest known prefix fixes the target type; the remainder is a
    // member-access chain updating the candidate type step by step.
    let segments: Vec<&str> = expanded.split('.').collect();
    for end in (1..=segments.len()).rev() {
        let prefix = segments[..end].join(".");
        if !table.contains(&prefix) {
            continue;
        }
        let mut current = match table.get(&prefix) {
            Some(Symbol::Property(p)) => {
                resolve_type(p.type_name.as_deref()?, ctx.file_ctx, table)?
            }
            _ => prefix,
        };
        for segment in &segments[end..] {
            current = member_value_type(&current, segment, ctx, table)?;
        }
        return method_on_type(&current, call, ctx, table);
    }
    None
}

/// Strategies 4+5 generalized to dotted receivers rooted in a local
/// variable or class property: `repo.db.save(...)`.
fn rooted_member_chain(
    receiver: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let (root, rest) = receiver.split_once('.')?;
    let root_type = ctx
        .local_type(root)
        .map(str::to_string)
        .or_else(|| ctx.class_property_type(table, root))?;

    let mut current = resolve_type(&root_type, ctx.file_ctx, table)?;
    for segment in rest.split('.') {
        current = member_value_type(&current, segment, ctx, table)?;
    }
    method_on_type(&current, call, ctx, table)
}

/// Type of the value behind `owner.member`, searching the owner's
/// ancestors: a property's declared type or a function's return type.
fn member_value_type(
    owner: &str,
    member: &str,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let mut owners = vec![owner.to_string()];
    owners.extend(table.ancestors(owner).iter().cloned());

    for candidate_owner in owners {
        let fqn = format!("{candidate_owner}.{member}");
        match table.get(&fqn) {
            Some(Symbol::Property(p)) => {
                let surface = p.type_name.as_deref()?;
                return resolve_type(surface, ctx.file_ctx, table);
            }
            Some(Symbol::Function(f)) => {
                let surface = f.return_type.as_deref()?;
                return resolve_type(surface, ctx.file_ctx, table);
            }
            Some(Symbol::Class(_)) => {
                // Nested type or companion access.
                return Some(fqn);
            }
            _ => continue,
        }
    }
    None
}

/// Strategy 2: constructor call — flagged by the parser, or an
/// upper-case name with no same-named function anywhere in scope.
fn constructor_call(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let looks_like_constructor = call.is_constructor_call
        || (call.name.starts_with(char::is_uppercase)
            && table.functions_named(&call.name).is_empty()
            && provider_for(ctx.file_ctx.language())
                .lookup_function(&call.name)
                .is_none());
    if !looks_like_constructor {
        return None;
    }

    let type_fqn = resolve_type(&call.name, ctx.file_ctx, table)?;
    if table.contains(&type_fqn) {
        // Only class-like symbols take <init>.
        table.get(&type_fqn)?.as_class()?;
        return Some(format!("{type_fqn}.<init>"));
    }
    // Stdlib classes construct against their synthetic FQN.
    if provider_for(ctx.file_ctx.language())
        .lookup_class(&call.name)
        .is_some()
    {
        return Some(format!("{type_fqn}.<init>"));
    }
    None
}

/// Strategy 3: the parser recorded a declared receiver type.
fn explicit_receiver_type(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let surface = call.receiver_type.as_deref()?;
    let type_fqn = resolve_type(surface, ctx.file_ctx, table)?;
    method_on_type(&type_fqn, call, ctx, table)
}

/// Strategy 4: the receiver is a local variable with a known type.
fn local_variable_receiver(
    receiver: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let surface = ctx.local_type(receiver)?.to_string();
    let type_fqn = resolve_type(&surface, ctx.file_ctx, table)?;
    method_on_type(&type_fqn, call, ctx, table)
}

/// Strategy 5: the receiver is a property of the current class (own or
/// inherited) with a known type.
fn class_property_receiver(
    receiver: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let surface = ctx.class_property_type(table, receiver)?;
    let type_fqn = resolve_type(&surface, ctx.file_ctx, table)?;
    method_on_type(&type_fqn, call, ctx, table)
}

/// A single-identifier receiver that names a type directly: a Kotlin
/// object, a companion through its class, or a static-style call.
fn receiver_as_type(
    receiver: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let type_fqn = resolve_type(receiver, ctx.file_ctx, table)?;
    table.get(&type_fqn)?.as_class()?;
    method_on_type(&type_fqn, call, ctx, table)
}

/// Strategy 8 applied to the receiver: the receiver is an import
/// binding, so the callee lives under the binding's target. Covers
/// TypeScript namespace imports, whose members resolve only when the
/// target module was indexed.
fn import_qualified(
    receiver: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let binding = ctx.file_ctx.binding(receiver)?;
    let full = format!("{}.{}", binding.target, call.name);
    if let Some(symbol) = table.get(&full) {
        return Some(target_fqn(symbol, call));
    }
    if table.contains(&binding.target) {
        return method_on_type(&binding.target, call, ctx, table);
    }
    None
}

/// Strategy 6: extension functions matched on the inferred receiver
/// type, exact first, then generics-stripped, then the subtype lattice.
fn extension_function(
    receiver: Option<&str>,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let receiver_surface = call
        .receiver_type
        .clone()
        .or_else(|| receiver.and_then(|r| ctx.local_type(r)).map(str::to_string))
        .or_else(|| receiver.and_then(|r| ctx.class_property_type(table, r)))?;

    let extensions: Vec<&FunctionSymbol> = table
        .functions_named(&call.name)
        .iter()
        .filter(|f| f.is_extension)
        .collect();
    if extensions.is_empty() {
        return None;
    }

    let language = ctx.file_ctx.language();
    let matches_receiver = |f: &&FunctionSymbol, pass: u8| -> bool {
        let Some(declared) = f.receiver_type.as_deref() else {
            return false;
        };
        match pass {
            0 => declared == receiver_surface,
            1 => strip_generics(declared) == strip_generics(&receiver_surface),
            _ => types_compatible(&receiver_surface, declared, language),
        }
    };

    for pass in 0..3u8 {
        let candidates: Vec<&FunctionSymbol> = extensions
            .iter()
            .filter(|f| matches_receiver(f, pass))
            .copied()
            .collect();
        if !candidates.is_empty() {
            return select_overload(&candidates, call, ctx).map(|f| f.header.fqn.clone());
        }
    }
    None
}

/// Strategy 7: a receiver-less call inside a class body binds to the
/// enclosing class or its ancestors.
fn current_class_method(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let class_fqn = ctx.current_class.as_deref()?;
    method_on_type(class_fqn, call, ctx, table)
}

/// Strategy 8: the callee name is an import binding.
fn named_import(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let binding = ctx.file_ctx.binding(&call.name)?;
    let symbol = table.get(&binding.target)?;
    Some(target_fqn(symbol, call))
}

/// Strategy 9: `<current-package>.<name>`.
fn same_package(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let fqn = qualify(ctx.file_ctx.package(), &call.name);
    let symbol = table.get(&fqn)?;
    Some(resolved_function_fqn(symbol, call, ctx, table))
}

/// Strategy 10: each wildcard-imported package in order.
fn wildcard_imports(
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    for package in &ctx.file_ctx.wildcard_packages {
        let fqn = format!("{package}.{}", call.name);
        if let Some(symbol) = table.get(&fqn) {
            return Some(resolved_function_fqn(symbol, call, ctx, table));
        }
    }
    None
}

/// Strategy 11 for receiver-less calls: stdlib function, then class
/// constructor.
fn stdlib_free(call: &ParsedCall, ctx: &ResolutionContext<'_>) -> Option<String> {
    let stdlib = provider_for(ctx.file_ctx.language());
    if let Some(fqn) = stdlib.lookup_function(&call.name) {
        return Some(fqn.to_string());
    }
    stdlib
        .lookup_class(&call.name)
        .map(|fqn| format!("{fqn}.<init>"))
}

/// Strategy 11 for receivers: stdlib static method on the surface form.
fn stdlib_static(receiver: &str, call: &ParsedCall, ctx: &ResolutionContext<'_>) -> Option<String> {
    provider_for(ctx.file_ctx.language())
        .lookup_static_method(&format!("{receiver}.{}", call.name))
        .map(str::to_string)
}

/// Method lookup on a type and its ancestors, nearest-first, including
/// the type's companion. Overload selection picks among same-owner
/// candidates.
fn method_on_type(
    type_fqn: &str,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> Option<String> {
    let mut owners = vec![type_fqn.to_string()];
    owners.extend(table.ancestors(type_fqn).iter().cloned());

    for owner in owners {
        for owner_fqn in [owner.clone(), format!("{owner}.Companion")] {
            let candidates: Vec<&FunctionSymbol> = table
                .functions_named(&call.name)
                .iter()
                .filter(|f| f.declaring_type.as_deref() == Some(owner_fqn.as_str()))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            if let Some(selected) = select_overload(&candidates, call, ctx) {
                return Some(selected.header.fqn.clone());
            }
        }
    }
    None
}

/// Expand a receiver's first segment through the import bindings:
/// `SU.format` with `import ... .StringUtils as SU` becomes the full
/// path rooted at the import target.
fn expand_first_segment(receiver: &str, ctx: &ResolutionContext<'_>) -> String {
    let (first, rest) = match receiver.split_once('.') {
        Some((f, r)) => (f, Some(r)),
        None => (receiver, None),
    };
    match ctx.file_ctx.binding(first) {
        Some(binding) => match rest {
            Some(rest) => format!("{}.{rest}", binding.target),
            None => binding.target.clone(),
        },
        None => receiver.to_string(),
    }
}

/// Target FQN for a directly addressed symbol: classes resolve to their
/// constructor when the call constructs, functions and properties to
/// themselves.
fn target_fqn(symbol: &Symbol, call: &ParsedCall) -> String {
    match symbol {
        Symbol::Class(c)
            if call.is_constructor_call || call.name.starts_with(char::is_uppercase) =>
        {
            format!("{}.<init>", c.header.fqn)
        }
        other => other.fqn().to_string(),
    }
}

/// Like [`target_fqn`] but runs overload selection when the hit is a
/// function with same-named siblings.
fn resolved_function_fqn(
    symbol: &Symbol,
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
    table: &SymbolTable,
) -> String {
    if let Symbol::Function(f) = symbol {
        let candidates: Vec<&FunctionSymbol> = table
            .functions_named(&call.name)
            .iter()
            .filter(|c| c.header.fqn == f.header.fqn)
            .collect();
        if candidates.len() > 1 {
            if let Some(selected) = select_overload(&candidates, call, ctx) {
                return selected.header.fqn.clone();
            }
        }
    }
    target_fqn(symbol, call)
}
