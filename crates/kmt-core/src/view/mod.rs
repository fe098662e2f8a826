//! Server-side rendering with [`minijinja`](https://crates.io/crates/minijinja) templates.
//!
//! Templates are loaded from the template directory on first use. Templates
//! ending in `.html` are autoescaped. Every visible label is annotated with
//! `data-translate` or `data-placeholder` and rendered through the `t` function,
//! which looks the key up with the translator bound to the [`Document`].

use crate::{error::Error, i18n::Translator, state::Env};
use minijinja::{Environment, State, value::Object};
use std::path::Path;

mod document;

pub use document::Document;

/// Name of the template of the home page.
pub const HOME_PAGE: &str = "index.html";

/// Name of the context variable holding the bound translator.
const TRANSLATOR_VARIABLE: &str = "i18n";

/// Value of the `overflow` style on the document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overflow {
    /// No explicit value.
    #[default]
    Unset,
    /// Scrolling is allowed.
    Auto,
    /// Scrolling is suspended.
    Hidden,
}

impl Overflow {
    /// Returns the CSS value, or `None` for an unset style.
    #[inline]
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Auto => Some("auto"),
            Self::Hidden => Some("hidden"),
        }
    }
}

/// The template engine of the site.
#[derive(Debug)]
pub struct ViewEngine {
    /// Template environment.
    env: Environment<'static>,
}

impl ViewEngine {
    /// Creates a new instance loading the templates from the directory.
    pub fn new(template_dir: &Path, app_env: Env) -> Self {
        let mut env = Environment::new();
        env.set_debug(app_env.is_dev());
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_loader(minijinja::path_loader(template_dir));
        env.add_global("APP_ENV", app_env.as_str());
        env.add_function("t", translate);
        tracing::info!(template_dir = %template_dir.display(), "view engine is ready");
        Self { env }
    }

    /// Renders the document with its template.
    pub fn render(&self, document: &Document) -> Result<String, Error> {
        let template_name = document.template_name();
        let template = self.env.get_template(template_name).map_err(|err| {
            Error::with_source(format!("fail to load the template `{template_name}`"), err)
        })?;
        template.render(document.context()).map_err(|err| {
            Error::with_source(format!("fail to render the template `{template_name}`"), err)
        })
    }
}

impl Object for Translator {}

/// Translates a key with the translator bound to the rendered document.
/// Without a bound translator the key is rendered as is.
fn translate(state: &State, key: &str) -> String {
    let translator = state.lookup(TRANSLATOR_VARIABLE);
    match translator
        .as_ref()
        .and_then(|value| value.downcast_object_ref::<Translator>())
    {
        Some(translator) => translator.localize(key),
        None => key.to_owned(),
    }
}

/// Returns a view engine over the templates of the site.
#[cfg(test)]
pub(crate) fn test_engine() -> ViewEngine {
    let template_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../kmt-tracker/templates");
    ViewEngine::new(&template_dir, Env::Dev)
}
