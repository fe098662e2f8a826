use crate::{LazyLock, bail, error::Error};
use fluent::{FluentResource, bundle::FluentBundle};
use intl_memoizer::concurrent::IntlLangMemoizer;
use regex::Regex;
use std::{collections::BTreeSet, fs, path::Path};
use unic_langid::LanguageIdentifier;

/// Translation type.
type Translation = FluentBundle<FluentResource, IntlLangMemoizer>;

/// Message identifiers at the start of a line in an FTL source.
static MESSAGE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([A-Za-z][A-Za-z0-9_-]*)[ \t]*=")
        .unwrap_or_else(|err| panic!("invalid message id pattern: {err}"))
});

/// A localized bundle for one language.
struct Locale {
    /// Language code such as `en` or `mr`.
    code: String,
    /// Parsed language identifier.
    lang_id: LanguageIdentifier,
    /// Fluent bundle.
    bundle: Translation,
    /// Message keys defined in the bundle.
    keys: BTreeSet<String>,
}

/// An immutable translation dictionary keyed by language code.
pub struct Dictionary {
    /// Loaded locales.
    locales: Vec<Locale>,
    /// Default language code.
    default_language: String,
}

impl Dictionary {
    /// Loads all `*.ftl` files in the locale directory.
    ///
    /// A file which fails to be read or parsed is skipped with an error event.
    /// Loading fails if no locale is available or the default locale is missing.
    pub fn load(locale_dir: &Path, default_language: &str) -> Result<Self, Error> {
        let entries = fs::read_dir(locale_dir).map_err(|err| {
            let locale_dir = locale_dir.display();
            Error::with_source(format!("fail to read the locale directory `{locale_dir}`"), err)
        })?;
        let mut sources = Vec::new();
        for entry in entries.filter_map(|entry| entry.ok()) {
            let locale_file = entry.path();
            let Some(code) = locale_file
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".ftl"))
            else {
                continue;
            };
            match fs::read_to_string(&locale_file) {
                Ok(ftl_string) => sources.push((code.to_owned(), ftl_string)),
                Err(err) => {
                    let locale_file = locale_file.display();
                    tracing::error!("fail to read `{locale_file}`: {err}");
                }
            }
        }
        sources.sort_by(|a, b| a.0.cmp(&b.0));
        Self::from_sources(default_language, sources)
    }

    /// Builds a dictionary from pairs of a language code and an FTL source.
    pub fn from_sources<C, S>(
        default_language: &str,
        sources: impl IntoIterator<Item = (C, S)>,
    ) -> Result<Self, Error>
    where
        C: AsRef<str>,
        S: Into<String>,
    {
        let mut locales = Vec::new();
        for (code, ftl_string) in sources {
            let code = code.as_ref();
            match Self::parse_locale(code, ftl_string.into()) {
                Ok(locale) => locales.push(locale),
                Err(err) => tracing::error!(language = code, "{err}"),
            }
        }
        if locales.is_empty() {
            bail!("no translation dictionary is available");
        }

        let default_language = default_language.to_ascii_lowercase();
        if !locales.iter().any(|locale| locale.code == default_language) {
            bail!("default language `{default_language}` has no translation dictionary");
        }
        let dictionary = Self {
            locales,
            default_language,
        };
        for (language, key) in dictionary.missing_keys() {
            tracing::warn!(language, key, "translation key is missing");
        }
        Ok(dictionary)
    }

    /// Parses an FTL source into a locale.
    fn parse_locale(code: &str, ftl_string: String) -> Result<Locale, Error> {
        let lang_id = code
            .parse::<LanguageIdentifier>()
            .map_err(|err| Error::with_source(format!("invalid language code `{code}`"), err))?;
        let keys = MESSAGE_ID
            .captures_iter(&ftl_string)
            .filter_map(|captures| captures.get(1))
            .map(|id| id.as_str().to_owned())
            .collect::<BTreeSet<_>>();
        let resource = match FluentResource::try_new(ftl_string) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                tracing::warn!(language = code, "fail to parse some FTL entries: {errors:?}");
                resource
            }
        };

        let mut bundle = FluentBundle::new_concurrent(vec![lang_id.clone()]);
        bundle.set_use_isolating(false);
        if let Err(errors) = bundle.add_resource(resource) {
            tracing::warn!(language = code, "fail to add some FTL resources: {errors:?}");
        }
        Ok(Locale {
            code: lang_id.to_string().to_ascii_lowercase(),
            lang_id,
            bundle,
            keys,
        })
    }

    /// Returns the default language code.
    #[inline]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Returns an iterator over the supported language codes.
    #[inline]
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(|locale| locale.code.as_str())
    }

    /// Resolves a language code to a supported one.
    ///
    /// An exact match wins, otherwise the primary language subtag is compared,
    /// so `en-IN` resolves to `en`.
    pub fn resolve(&self, language: &str) -> Option<&str> {
        self.find_locale(language).map(|locale| locale.code.as_str())
    }

    /// Returns the keys defined for the language.
    pub fn keys(&self, language: &str) -> Option<&BTreeSet<String>> {
        self.find_locale(language).map(|locale| &locale.keys)
    }

    /// Returns the `(language, key)` pairs which are defined for the default language
    /// but missing in another language.
    pub fn missing_keys(&self) -> Vec<(&str, &str)> {
        let Some(default_keys) = self.keys(&self.default_language) else {
            return Vec::new();
        };
        let mut missing_keys = Vec::new();
        for locale in &self.locales {
            for key in default_keys.difference(&locale.keys) {
                missing_keys.push((locale.code.as_str(), key.as_str()));
            }
        }
        missing_keys
    }

    /// Looks up the message for the key in the language without any fallback.
    pub fn lookup(&self, language: &str, key: &str) -> Option<String> {
        let locale = self.find_locale(language)?;
        let bundle = &locale.bundle;
        let pattern = bundle.get_message(key)?.value()?;
        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            let language = locale.code.as_str();
            tracing::warn!(language, key, "fail to format the message: {errors:?}");
        }
        Some(value.into_owned())
    }

    /// Finds the locale for the language code.
    fn find_locale(&self, language: &str) -> Option<&Locale> {
        let lang_id = language.parse::<LanguageIdentifier>().ok()?;
        self.locales
            .iter()
            .find(|locale| locale.lang_id == lang_id)
            .or_else(|| {
                self.locales
                    .iter()
                    .find(|locale| locale.lang_id.language == lang_id.language)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Dictionary;

    const EN: &str = "nav_home = Home\nsearch_button = Search\nfare_title = Fare Calculator\n";
    const MR: &str = "nav_home = मुख्यपृष्ठ\nsearch_button = शोधा\n";

    #[test]
    fn it_looks_up_messages() {
        let dictionary = Dictionary::from_sources("en", [("en", EN), ("mr", MR)]).unwrap();
        assert_eq!(dictionary.default_language(), "en");
        assert_eq!(dictionary.languages().collect::<Vec<_>>(), ["en", "mr"]);
        assert_eq!(dictionary.lookup("mr", "nav_home").as_deref(), Some("मुख्यपृष्ठ"));
        assert_eq!(dictionary.lookup("en", "fare_title").as_deref(), Some("Fare Calculator"));
        assert!(dictionary.lookup("mr", "fare_title").is_none());
        assert!(dictionary.lookup("fr", "nav_home").is_none());
        assert_eq!(dictionary.resolve("en-IN"), Some("en"));
        assert_eq!(dictionary.resolve("MR"), Some("mr"));
        assert!(dictionary.resolve("hi").is_none());
        assert_eq!(dictionary.missing_keys(), [("mr", "fare_title")]);
    }

    #[test]
    fn it_rejects_unusable_dictionaries() {
        assert!(Dictionary::from_sources("en", Vec::<(&str, &str)>::new()).is_err());
        assert!(Dictionary::from_sources("en", [("mr", MR)]).is_err());
        assert!(Dictionary::from_sources("en", [("not a language", EN)]).is_err());
    }
}
