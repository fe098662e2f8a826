use super::Visitor;
use crate::service::AppState;
use axum::{
    Form,
    extract::State,
    response::{Html, Response},
};
use kmt_axum::{HeaderMapExt, Rejection, new_cookie};
use kmt_core::i18n::LANGUAGE_PREFERENCE;
use serde::Deserialize;
use std::time::Duration;

/// Lifetime of the language preference.
const LANGUAGE_PREFERENCE_MAX_AGE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageForm {
    lang: String,
}

pub(crate) async fn index(State(state): State<AppState>, visitor: Visitor) -> kmt_axum::Result {
    let html = visitor
        .context()
        .render_page(state.views())
        .map_err(Rejection::internal_server_error)?;
    Ok(visitor.finish(Html(html)))
}

pub(crate) async fn language(visitor: Visitor, Form(form): Form<LanguageForm>) -> Response {
    let language = {
        let mut context = visitor.context();
        context
            .set_language(&form.lang)
            .then(|| context.language().to_owned())
    };
    let mut res = visitor.redirect("home");
    if let Some(language) = language {
        tracing::info!(language, "language selected");
        let cookie = new_cookie(
            LANGUAGE_PREFERENCE,
            language,
            Some(LANGUAGE_PREFERENCE_MAX_AGE),
        );
        res.headers_mut().add_cookie(&cookie);
    }
    res
}
