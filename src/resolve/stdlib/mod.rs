//! Per-language standard-library providers.
//!
//! Read-only lookup tables consulted as the last resolution step. Each
//! entry is a pre-built target with a synthetic file path and no source
//! location; providers never participate in hierarchy computation.

pub mod java;
pub mod javascript;
pub mod kotlin;
pub mod typescript;

use crate::parsing::Language;

pub use java::JavaStdlib;
pub use javascript::JavaScriptStdlib;
pub use kotlin::KotlinStdlib;
pub use typescript::TypeScriptStdlib;

/// Lookup interface shared by all providers. Returned strings are the
/// synthetic FQNs recorded on resolved calls (`kotlin.io.println`,
/// `Buffer.from`).
pub trait StdlibProvider: Send + Sync {
    /// A free function callable without a receiver.
    fn lookup_function(&self, name: &str) -> Option<&'static str>;

    /// A built-in class, looked up by simple name.
    fn lookup_class(&self, name: &str) -> Option<&'static str>;

    /// A static member call, looked up by its qualified surface form
    /// (`Math.max`, `System.out.println`).
    fn lookup_static_method(&self, qualified: &str) -> Option<&'static str>;

    /// Whether the name is anything this provider knows.
    fn is_known_symbol(&self, name: &str) -> bool {
        self.lookup_function(name).is_some() || self.lookup_class(name).is_some()
    }

    /// Whether the name is a primitive or built-in type of the language.
    fn is_builtin_type(&self, name: &str) -> bool;

    /// Packages implicitly wildcard-imported into every file.
    fn default_wildcard_imports(&self) -> &'static [&'static str];

    /// Synthetic path recorded for provider entries.
    fn synthetic_file(&self) -> &'static str;
}

static KOTLIN: KotlinStdlib = KotlinStdlib;
static JAVA: JavaStdlib = JavaStdlib;
static TYPESCRIPT: TypeScriptStdlib = TypeScriptStdlib;
static JAVASCRIPT: JavaScriptStdlib = JavaScriptStdlib;

/// The provider for a language. Providers are stateless statics built at
/// first use; passing them around explicitly keeps stages testable.
pub fn provider_for(language: Language) -> &'static dyn StdlibProvider {
    match language {
        Language::Kotlin => &KOTLIN,
        Language::Java => &JAVA,
        Language::TypeScript => &TYPESCRIPT,
        Language::JavaScript => &JAVASCRIPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_dispatch_matches_language() {
        assert_eq!(
            provider_for(Language::Kotlin).synthetic_file(),
            "<kotlin-stdlib>"
        );
        assert_eq!(
            provider_for(Language::Java).synthetic_file(),
            "<java-stdlib>"
        );
        assert_eq!(
            provider_for(Language::TypeScript).synthetic_file(),
            "<typescript-stdlib>"
        );
        assert_eq!(
            provider_for(Language::JavaScript).synthetic_file(),
            "<javascript-stdlib>"
        );
    }
}
