use crate::service::{
    AppState,
    session::{SESSION_COOKIE, SharedContext},
};
use axum::{
    extract::FromRequestParts,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, HeaderValue, LOCATION},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use kmt_axum::{HeaderMapExt, new_cookie};
use kmt_core::{Uuid, context::AppContext, i18n::LANGUAGE_PREFERENCE};
use parking_lot::MutexGuard;
use std::convert::Infallible;

pub(crate) mod contact;
pub(crate) mod modal;
pub(crate) mod page;
pub(crate) mod search;

/// The visitor of a request with the context of the session.
pub(crate) struct Visitor {
    session_id: Uuid,
    context: SharedContext,
    new_session: bool,
}

impl Visitor {
    /// Locks the context of the visitor.
    #[inline]
    pub(crate) fn context(&self) -> MutexGuard<'_, AppContext> {
        self.context.lock()
    }

    /// Redirects to the section of the page.
    pub(crate) fn redirect(&self, section: &str) -> Response {
        let location = format!("/#{section}");
        let mut res = StatusCode::SEE_OTHER.into_response();
        match HeaderValue::try_from(location) {
            Ok(value) => {
                res.headers_mut().insert(LOCATION, value);
            }
            Err(_) => {
                res.headers_mut().insert(LOCATION, HeaderValue::from_static("/"));
            }
        }
        self.finish(res)
    }

    /// Adds the session cookie to the response of a new session.
    pub(crate) fn finish(&self, res: impl IntoResponse) -> Response {
        let mut res = res.into_response();
        let headers = res.headers_mut();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        if self.new_session {
            let cookie = new_cookie(SESSION_COOKIE, self.session_id.to_string(), None);
            headers.add_cookie(&cookie);
        }
        res
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let session_id = headers.get_cookie(SESSION_COOKIE);
        let preferred_language = headers.get_cookie(LANGUAGE_PREFERENCE);
        let (session_id, context, new_session) = state.sessions().get_or_create(
            session_id.as_ref().map(|cookie| cookie.value()),
            preferred_language.as_ref().map(|cookie| cookie.value()),
            headers.accept_language(),
        );
        Ok(Self {
            session_id,
            context,
            new_session,
        })
    }
}
