//! Overload selection.
//!
//! Given several candidate functions on the same owning type, pick the
//! one a call binds to: arity filter first, then argument-type scoring
//! over surface strings and a small built-in subtype lattice, then
//! deterministic tie-breaks.

use crate::parsing::ast::strip_generics;
use crate::parsing::{Language, ParsedCall};
use crate::resolve::context::ResolutionContext;
use crate::symbols::FunctionSymbol;
use crate::types::UNKNOWN_TYPE;

const SCORE_EXACT: i32 = 2;
const SCORE_LATTICE: i32 = 1;
const SCORE_UNKNOWN: i32 = 0;

/// Whether `arg` can flow into a parameter of type `param` under the
/// built-in lattice: exact, generics-stripped, primitive to boxed form,
/// anything into the language's top type.
pub fn types_compatible(arg: &str, param: &str, language: Language) -> bool {
    if arg == param {
        return true;
    }
    if strip_generics(arg) == strip_generics(param) {
        return true;
    }
    if is_top_type(param, language) {
        return true;
    }
    boxed_form(arg, language).is_some_and(|boxed| boxed == param)
}

fn is_top_type(name: &str, language: Language) -> bool {
    match language {
        Language::Kotlin => name == "Any" || name == "Any?",
        Language::Java => name == "Object",
        Language::TypeScript | Language::JavaScript => {
            name == "any" || name == "unknown" || name == "object"
        }
    }
}

fn boxed_form(name: &str, language: Language) -> Option<&'static str> {
    match language {
        Language::Java => match name {
            "int" => Some("Integer"),
            "long" => Some("Long"),
            "short" => Some("Short"),
            "byte" => Some("Byte"),
            "float" => Some("Float"),
            "double" => Some("Double"),
            "boolean" => Some("Boolean"),
            "char" => Some("Character"),
            _ => None,
        },
        Language::TypeScript | Language::JavaScript => match name {
            "number" => Some("Number"),
            "string" => Some("String"),
            "boolean" => Some("Boolean"),
            _ => None,
        },
        // Kotlin has no separate boxed spelling.
        Language::Kotlin => None,
    }
}

/// Score one candidate against the call's argument types.
/// `None` means a hard mismatch disqualified the candidate.
fn score(candidate: &FunctionSymbol, argument_types: &[String], language: Language) -> Option<i32> {
    let mut total = 0;
    for (position, arg_type) in argument_types.iter().enumerate() {
        // Excess arguments bind to the trailing variadic parameter.
        let param = candidate
            .parameters
            .get(position)
            .or_else(|| candidate.parameters.last().filter(|p| p.is_variadic))?;

        let Some(param_type) = &param.type_name else {
            total += SCORE_UNKNOWN;
            continue;
        };
        if arg_type == UNKNOWN_TYPE {
            total += SCORE_UNKNOWN;
        } else if arg_type == param_type {
            total += SCORE_EXACT;
        } else if types_compatible(arg_type, param_type, language) {
            total += SCORE_LATTICE;
        } else {
            return None;
        }
    }
    Some(total)
}

/// Pick the best candidate for a call, or `None` when nothing survives
/// the arity filter. Ties break by declaration in the caller's file,
/// then the caller's package, then earliest source position; with no
/// type information the first candidate in source order wins.
pub fn select_overload<'a>(
    candidates: &[&'a FunctionSymbol],
    call: &ParsedCall,
    ctx: &ResolutionContext<'_>,
) -> Option<&'a FunctionSymbol> {
    let mut survivors: Vec<&FunctionSymbol> = candidates
        .iter()
        .copied()
        .filter(|c| c.accepts_arity(call.argument_count))
        .collect();

    match survivors.len() {
        0 => return None,
        1 => return Some(survivors[0]),
        _ => {}
    }

    let language = ctx.file_ctx.language();
    if let Some(argument_types) = &call.argument_types {
        let mut scored: Vec<(i32, &FunctionSymbol)> = survivors
            .iter()
            .filter_map(|c| score(c, argument_types, language).map(|s| (s, *c)))
            .collect();
        if !scored.is_empty() {
            let best = scored.iter().map(|(s, _)| *s).max().unwrap_or(0);
            scored.retain(|(s, _)| *s == best);
            survivors = scored.into_iter().map(|(_, c)| c).collect();
        }
    }

    if survivors.len() > 1 {
        let caller_file = &ctx.file_ctx.file.path;
        let caller_package = ctx.file_ctx.package();
        survivors.sort_by_key(|c| {
            let same_file = c.header.file == *caller_file;
            let same_package = c.header.package.as_deref() == caller_package;
            let position = c
                .header
                .location
                .as_ref()
                .map(|l| l.position_key())
                .unwrap_or((u32::MAX, u32::MAX));
            (!same_file, !same_package, position)
        });
    }
    survivors.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::context::FileContext;
    use crate::parsing::ParsedFile;
    use crate::symbols::{ParamSig, SymbolHeader};
    use crate::types::SourceLocation;

    fn candidate(name: &str, param_types: &[&str], line: u32) -> FunctionSymbol {
        let mut header = SymbolHeader::new(name, format!("p.C.{name}"), "a.kt");
        header.location = Some(SourceLocation::new("a.kt", line, 1, line, 20));
        header.package = Some("p".into());
        FunctionSymbol {
            header,
            parameters: param_types
                .iter()
                .enumerate()
                .map(|(i, t)| ParamSig {
                    name: format!("p{i}"),
                    type_name: Some(t.to_string()),
                    has_default: false,
                    is_variadic: false,
                })
                .collect(),
            return_type: None,
            declaring_type: Some("p.C".into()),
            is_extension: false,
            receiver_type: None,
        }
    }

    fn call_with(count: usize, types: Option<Vec<&str>>) -> ParsedCall {
        let mut call = ParsedCall::new("add", SourceLocation::new("a.kt", 9, 5, 9, 20));
        call.argument_count = count;
        call.argument_types = types.map(|t| t.into_iter().map(String::from).collect());
        call
    }

    #[test]
    fn arity_filters_candidates() {
        let file = ParsedFile::new("a.kt", crate::parsing::Language::Kotlin);
        let file_ctx = FileContext::new(&file);
        let ctx = ResolutionContext::for_initializer(&file_ctx, "p.f".into(), None);

        let one = candidate("add", &["Int"], 1);
        let two = candidate("add", &["Int", "Int"], 2);
        let refs = vec![&one, &two];

        let selected = select_overload(&refs, &call_with(2, None), &ctx).unwrap();
        assert_eq!(selected.parameters.len(), 2);
    }

    #[test]
    fn exact_type_match_beats_lattice_match() {
        let file = ParsedFile::new("a.kt", crate::parsing::Language::Kotlin);
        let file_ctx = FileContext::new(&file);
        let ctx = ResolutionContext::for_initializer(&file_ctx, "p.f".into(), None);

        let by_any = candidate("add", &["Any"], 1);
        let by_int = candidate("add", &["Int"], 2);
        let refs = vec![&by_any, &by_int];

        let selected = select_overload(&refs, &call_with(1, Some(vec!["Int"])), &ctx).unwrap();
        assert_eq!(selected.parameters[0].type_name.as_deref(), Some("Int"));
    }

    #[test]
    fn no_type_info_takes_first_by_source_order() {
        let file = ParsedFile::new("a.kt", crate::parsing::Language::Kotlin);
        let file_ctx = FileContext::new(&file);
        let ctx = ResolutionContext::for_initializer(&file_ctx, "p.f".into(), None);

        let later = candidate("add", &["String"], 9);
        let earlier = candidate("add", &["Int"], 3);
        let refs = vec![&later, &earlier];

        let selected = select_overload(&refs, &call_with(1, None), &ctx).unwrap();
        assert_eq!(
            selected.header.location.as_ref().unwrap().start_line,
            3
        );
    }

    #[test]
    fn java_primitive_fits_boxed_parameter() {
        assert!(types_compatible("int", "Integer", Language::Java));
        assert!(types_compatible("int", "Object", Language::Java));
        assert!(!types_compatible("int", "String", Language::Java));
    }

    #[test]
    fn generics_stripped_comparison() {
        assert!(types_compatible(
            "List<Int>",
            "List<String>",
            Language::Kotlin
        ));
        assert!(types_compatible("Array<number>", "any", Language::TypeScript));
    }
}
