use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Languages the platform ships content for. English is the fallback for
/// every other locale, so English text is mandatory wherever a
/// [`LocalizedText`] is used as reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Mr,
    Ur,
    Pa,
    Ks,
    Doi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
            Language::Ur => "ur",
            Language::Pa => "pa",
            Language::Ks => "ks",
            Language::Doi => "doi",
        }
    }

    /// Parses a language code as sent by the frontend. Unknown codes fall
    /// back to English rather than erroring, matching how the web client
    /// treats unsupported locales.
    pub fn from_code(code: &str) -> Language {
        match code {
            "hi" => Language::Hi,
            "mr" => Language::Mr,
            "ur" => Language::Ur,
            "pa" => Language::Pa,
            "ks" => Language::Ks,
            "doi" => Language::Doi,
            _ => Language::En,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

/// A string keyed by language, e.g. `{"en": "Courses", "hi": "कोर्स"}`.
/// Locales are allowed to be sparse; lookups fall back to English.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Language, String>);

impl LocalizedText {
    pub fn english(text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Language::En, text.into());
        LocalizedText(map)
    }

    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        self.0.insert(language, text.into());
        self
    }

    pub fn has(&self, language: Language) -> bool {
        self.0.contains_key(&language)
    }

    /// Returns the text for `language`, falling back to English when that
    /// locale is missing. Empty string only if English is missing too,
    /// which bank validation rules out for reference data.
    pub fn get(&self, language: Language) -> &str {
        self.0
            .get(&language)
            .or_else(|| self.0.get(&Language::En))
            .map(String::as_str)
            .unwrap_or("")
    }
}
