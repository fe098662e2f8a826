/// Language names accepted in place of the language codes.
const LANGUAGE_ALIASES: [(&str, &str); 3] = [("english", "en"), ("marathi", "mr"), ("hindi", "hi")];

/// Normalizes a language code by resolving aliases and case.
///
/// Returns `None` for an empty input.
pub fn normalize_language(language: &str) -> Option<String> {
    let language = language.trim();
    if language.is_empty() {
        return None;
    }

    let language = language.replace('_', "-").to_ascii_lowercase();
    let code = LANGUAGE_ALIASES
        .iter()
        .find_map(|&(alias, code)| (alias == language).then_some(code))
        .map(|code| code.to_owned())
        .unwrap_or(language);
    Some(code)
}

/// Selects a language from the supported locales
/// according to the quality values of an `Accept-Language` header.
pub fn select_language<'a>(
    accepted_languages: &str,
    supported_locales: &[&'a str],
) -> Option<&'a str> {
    let mut languages = accepted_languages
        .split(',')
        .filter_map(|s| {
            let (language, quality) = if let Some((language, quality)) = s.split_once(';') {
                let quality = quality.trim().strip_prefix("q=")?.parse::<f32>().ok()?;
                (language.trim(), quality)
            } else {
                (s.trim(), 1.0)
            };
            let primary_language = language.split('-').next().unwrap_or(language);
            supported_locales.iter().find_map(|&locale| {
                (locale.eq_ignore_ascii_case(language)
                    || locale.eq_ignore_ascii_case(primary_language))
                .then_some((locale, quality))
            })
        })
        .filter(|&(_, quality)| quality > 0.0)
        .collect::<Vec<_>>();
    languages.sort_by(|a, b| b.1.total_cmp(&a.1));
    languages.first().map(|&(language, _)| language)
}

#[cfg(test)]
mod tests {
    use super::{normalize_language, select_language};

    #[test]
    fn it_normalizes_language() {
        assert_eq!(normalize_language("Marathi").as_deref(), Some("mr"));
        assert_eq!(normalize_language(" english ").as_deref(), Some("en"));
        assert_eq!(normalize_language("HI").as_deref(), Some("hi"));
        assert_eq!(normalize_language("en_IN").as_deref(), Some("en-in"));
        assert_eq!(normalize_language("  "), None);
    }

    #[test]
    fn it_selects_language() {
        let supported = ["en", "mr", "hi"];
        let languages = "mr-IN,mr;q=0.9,en-US;q=0.8,en;q=0.7";
        assert_eq!(select_language(languages, &supported), Some("mr"));

        let languages = "fr-FR,fr;q=0.9,hi;q=0.8,en;q=0.7";
        assert_eq!(select_language(languages, &supported), Some("hi"));

        let languages = "hi;q=0.5, en-GB; q=0.9";
        assert_eq!(select_language(languages, &supported), Some("en"));

        assert_eq!(select_language("de-DE,fr;q=0.8", &supported), None);
        assert_eq!(select_language("hi;q=0", &supported), None);
    }
}
