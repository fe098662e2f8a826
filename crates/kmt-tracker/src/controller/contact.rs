use super::Visitor;
use crate::service::AppState;
use axum::{Form, extract::State, response::Response};
use kmt_core::contact::ContactForm;

pub(crate) async fn submit(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<ContactForm>,
) -> Response {
    let validation = visitor.context().validate_contact(form);
    if let Ok(template_params) = validation {
        let result = state.send_email(&template_params).await;
        visitor
            .context()
            .complete_contact(result, state.fallback_email());
    }
    visitor.redirect("contact")
}

pub(crate) async fn reset(visitor: Visitor) -> Response {
    visitor.context().reset_contact();
    visitor.redirect("contact")
}
