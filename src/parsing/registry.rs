//! Parser registry.
//!
//! A read-only lookup from [`Language`] to parser constructor, built at
//! startup and passed explicitly into the pipeline; no hidden singletons.

use crate::error::{IndexError, IndexResult};
use crate::parsing::java::JavaParser;
use crate::parsing::javascript::JavaScriptParser;
use crate::parsing::kotlin::KotlinParser;
use crate::parsing::typescript::TypeScriptParser;
use crate::parsing::{Language, LanguageParser};

/// Creates parser instances per language. Each worker acquires its own
/// instance; grammar handles are not shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParserRegistry;

impl ParserRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Languages this build supports.
    pub fn supported(&self) -> &'static [Language] {
        &[
            Language::Kotlin,
            Language::Java,
            Language::TypeScript,
            Language::JavaScript,
        ]
    }

    /// Construct a fresh parser for `language`.
    pub fn create(&self, language: Language) -> IndexResult<Box<dyn LanguageParser>> {
        let parser: Box<dyn LanguageParser> = match language {
            Language::Kotlin => Box::new(KotlinParser::new().map_err(|reason| {
                IndexError::GrammarInit {
                    language: language.name().to_string(),
                    reason,
                }
            })?),
            Language::Java => {
                Box::new(
                    JavaParser::new().map_err(|reason| IndexError::GrammarInit {
                        language: language.name().to_string(),
                        reason,
                    })?,
                )
            }
            Language::TypeScript => Box::new(TypeScriptParser::new().map_err(|reason| {
                IndexError::GrammarInit {
                    language: language.name().to_string(),
                    reason,
                }
            })?),
            Language::JavaScript => Box::new(JavaScriptParser::new().map_err(|reason| {
                IndexError::GrammarInit {
                    language: language.name().to_string(),
                    reason,
                }
            })?),
        };
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_creates_every_supported_parser() {
        let registry = ParserRegistry::new();
        for &language in registry.supported() {
            let parser = registry.create(language).unwrap();
            assert_eq!(parser.language(), language);
        }
    }
}
