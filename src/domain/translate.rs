//! Display-string translation lookup
//!
//! Only the repository display name goes through this; lookups never fail,
//! an unresolved key comes back as a visible placeholder instead.

use std::collections::HashMap;

/// Resolves display-string keys to localized text
pub trait Translator {
    /// Never fails; unresolved keys return a `[Untranslated {key}]` placeholder
    fn translate(&self, key: &str) -> String;
}

/// Translator backed by a string table from the browser configuration
#[derive(Debug, Clone, Default)]
pub struct TableTranslator {
    strings: HashMap<String, String>,
}

impl TableTranslator {
    pub fn new(strings: HashMap<String, String>) -> Self {
        Self { strings }
    }
}

impl Translator for TableTranslator {
    fn translate(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.clone(),
            None => format!("[Untranslated {key}]"),
        }
    }
}
