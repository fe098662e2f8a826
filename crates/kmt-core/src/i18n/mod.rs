//! Internationalization and localization.
//!
//! A [`Dictionary`] holds one Fluent bundle per language. The [`Translator`]
//! looks messages up with the fallback chain of the requested language,
//! the default language and finally the key itself. Applying the translations
//! binds a translator to a [`Document`], whose template looks every label up
//! with the `t` function.

use crate::view::Document;
use std::{fmt, sync::Arc};

mod dictionary;
mod language;

pub use dictionary::Dictionary;
pub use language::{normalize_language, select_language};

/// Default language code.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Name of the cookie persisting the preferred language.
pub const LANGUAGE_PREFERENCE: &str = "preferred-language";

/// The translation engine bound to a current language.
#[derive(Clone, Default)]
pub struct Translator {
    /// Shared dictionary.
    dictionary: Option<Arc<Dictionary>>,
    /// Current language code.
    language: String,
}

impl Translator {
    /// Creates a new instance with the default language of the dictionary.
    #[inline]
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        let language = dictionary.default_language().to_owned();
        Self {
            dictionary: Some(dictionary),
            language,
        }
    }

    /// Returns a reference to the dictionary if it has been loaded.
    #[inline]
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dictionary.as_deref()
    }

    /// Returns the current language code.
    #[inline]
    pub fn language(&self) -> &str {
        if self.language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            &self.language
        }
    }

    /// Returns the supported language codes.
    pub fn languages(&self) -> Vec<&str> {
        self.dictionary
            .as_deref()
            .map(|dictionary| dictionary.languages().collect())
            .unwrap_or_default()
    }

    /// Resolves a language code or alias to a supported language code.
    pub fn resolve_language(&self, language: &str) -> Option<&str> {
        let dictionary = self.dictionary.as_deref()?;
        let code = normalize_language(language)?;
        dictionary.resolve(&code)
    }

    /// Sets the current language.
    ///
    /// Returns `false` and keeps the current language if it is not supported.
    pub fn set_language(&mut self, language: &str) -> bool {
        match self.resolve_language(language) {
            Some(code) => {
                self.language = code.to_owned();
                true
            }
            None => {
                tracing::warn!(language, "unsupported language is ignored");
                false
            }
        }
    }

    /// Returns the translation of the key in the language, or in the current language
    /// if it is not specified. An unsupported language falls back to the default language,
    /// and a missing translation falls back to the default language and then to the key.
    pub fn get_translation(&self, key: &str, language: Option<&str>) -> String {
        let Some(dictionary) = self.dictionary.as_deref() else {
            return key.to_owned();
        };
        let language = match language {
            Some(language) => self
                .resolve_language(language)
                .unwrap_or_else(|| dictionary.default_language()),
            None => self.language(),
        };
        translate(dictionary, language, key).unwrap_or_else(|| key.to_owned())
    }

    /// Binds a translator in the language to the document and sets the document language.
    ///
    /// An unsupported language falls back to the default one. A key without
    /// a translation is rendered as is. Returns the applied language,
    /// or `None` if no dictionary has been loaded.
    pub fn apply_translations(&self, document: &mut Document, language: &str) -> Option<String> {
        let Some(dictionary) = self.dictionary.as_deref() else {
            tracing::error!(language, "translation dictionary has not been loaded");
            return None;
        };
        let applied_language = match self.resolve_language(language) {
            Some(code) => code,
            None => {
                let default_language = dictionary.default_language();
                tracing::error!(
                    language,
                    "translations not found for the language, falling back to `{default_language}`"
                );
                default_language
            }
        };
        let translator = Self {
            dictionary: self.dictionary.clone(),
            language: applied_language.to_owned(),
        };
        document.bind_translator(translator, applied_language);
        Some(applied_language.to_owned())
    }

    /// Translates the key in the current language.
    ///
    /// A missing translation is logged and rendered as the key itself.
    pub(crate) fn localize(&self, key: &str) -> String {
        let Some(dictionary) = self.dictionary.as_deref() else {
            return key.to_owned();
        };
        let language = self.language();
        translate(dictionary, language, key).unwrap_or_else(|| {
            tracing::warn!(language, key, "translation is missing");
            key.to_owned()
        })
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("language", &self.language())
            .field("languages", &self.languages())
            .finish()
    }
}

/// Looks up a message in the language and falls back to the default language.
fn translate(dictionary: &Dictionary, language: &str, key: &str) -> Option<String> {
    dictionary
        .lookup(language, key)
        .or_else(|| dictionary.lookup(dictionary.default_language(), key))
}
