use super::TRANSLATOR_VARIABLE;
use crate::i18n::Translator;
use minijinja::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// A template with its context, the document language and the bound translator.
#[derive(Debug, Clone)]
pub struct Document {
    /// Name of the template.
    template_name: &'static str,
    /// Value of the `lang` attribute on the root element.
    lang: String,
    /// Template context.
    context: BTreeMap<String, Value>,
    /// Translator used by the `t` function.
    translator: Option<Translator>,
}

impl Document {
    /// Creates a new instance with an empty context.
    #[inline]
    pub fn new(template_name: &'static str) -> Self {
        Self {
            template_name,
            lang: String::new(),
            context: BTreeMap::new(),
            translator: None,
        }
    }

    /// Adds a context variable.
    #[inline]
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a context variable, replacing an existing one.
    #[inline]
    pub fn insert(&mut self, key: &str, value: impl Serialize) {
        self.context.insert(key.to_owned(), Value::from_serialize(value));
    }

    /// Returns the template name.
    #[inline]
    pub fn template_name(&self) -> &'static str {
        self.template_name
    }

    /// Returns the document language.
    #[inline]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Returns the translator bound to the document.
    #[inline]
    pub fn translator(&self) -> Option<&Translator> {
        self.translator.as_ref()
    }

    /// Binds a translator and sets the document language.
    pub(crate) fn bind_translator(&mut self, translator: Translator, lang: &str) {
        self.lang = lang.to_owned();
        self.translator = Some(translator);
    }

    /// Returns the template context with the `lang` and `i18n` variables.
    pub(super) fn context(&self) -> Value {
        let mut context = self.context.clone();
        context.insert("lang".to_owned(), Value::from(self.lang.as_str()));
        if let Some(translator) = &self.translator {
            context.insert(
                TRANSLATOR_VARIABLE.to_owned(),
                Value::from_object(translator.clone()),
            );
        }
        Value::from_iter(context)
    }
}
