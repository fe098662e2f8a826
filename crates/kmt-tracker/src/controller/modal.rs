use super::Visitor;
use axum::{Form, response::Response};
use kmt_core::{
    modal::NotificationPreferences,
    simulation::{GoodsBookingForm, PaymentMethod},
};
use serde::Deserialize;

/// Section the overlay flows return to.
const FEATURES_SECTION: &str = "features";

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureForm {
    feature: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TicketForm {
    route: String,
    from: String,
    to: String,
    departure: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentForm {
    ticket_id: String,
    method: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackForm {
    route: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RatingForm {
    stars: u8,
    feedback: String,
}

/// Checked boxes are submitted as `on`, unchecked ones are omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PreferencesForm {
    arrival_alerts: Option<String>,
    delay_notifications: Option<String>,
    route_changes: Option<String>,
    promotional_offers: Option<String>,
}

impl From<PreferencesForm> for NotificationPreferences {
    fn from(form: PreferencesForm) -> Self {
        Self {
            arrival_alerts: form.arrival_alerts.is_some(),
            delay_notifications: form.delay_notifications.is_some(),
            route_changes: form.route_changes.is_some(),
            promotional_offers: form.promotional_offers.is_some(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PlannerForm {
    from: String,
    to: String,
}

pub(crate) async fn show_feature(visitor: Visitor, Form(form): Form<FeatureForm>) -> Response {
    visitor
        .context()
        .dispatcher_mut()
        .show_feature_details(&form.feature);
    visitor.redirect(FEATURES_SECTION)
}

pub(crate) async fn close(visitor: Visitor) -> Response {
    visitor.context().dispatcher_mut().close_modal();
    visitor.redirect(FEATURES_SECTION)
}

pub(crate) async fn show_ticketing(visitor: Visitor, Form(form): Form<TicketForm>) -> Response {
    visitor.context().dispatcher_mut().show_ticketing_options(
        &form.route,
        &form.from,
        &form.to,
        &form.departure,
    );
    visitor.redirect("search-results")
}

pub(crate) async fn pay(visitor: Visitor, Form(form): Form<PaymentForm>) -> kmt_axum::Result {
    let method = form.method.parse::<PaymentMethod>()?;
    visitor
        .context()
        .dispatcher_mut()
        .process_payment(&form.ticket_id, method)?;
    Ok(visitor.redirect("search-results"))
}

pub(crate) async fn track(visitor: Visitor, Form(form): Form<TrackForm>) -> Response {
    visitor.context().dispatcher_mut().track_bus(&form.route);
    visitor.redirect("search-results")
}

pub(crate) async fn show_goods(visitor: Visitor) -> Response {
    visitor.context().dispatcher_mut().show_goods_transport_info();
    visitor.redirect("goods")
}

pub(crate) async fn show_goods_form(visitor: Visitor) -> Response {
    visitor.context().dispatcher_mut().show_goods_booking_form();
    visitor.redirect("goods")
}

pub(crate) async fn book_goods(visitor: Visitor, Form(form): Form<GoodsBookingForm>) -> Response {
    let result = visitor.context().dispatcher_mut().process_goods_booking(form);
    if let Err(err) = result {
        tracing::debug!(error = err.message(), "goods booking form shown again");
    }
    visitor.redirect("goods")
}

pub(crate) async fn show_rating(visitor: Visitor) -> Response {
    visitor.context().dispatcher_mut().show_rating();
    visitor.redirect(FEATURES_SECTION)
}

pub(crate) async fn rate(visitor: Visitor, Form(form): Form<RatingForm>) -> kmt_axum::Result {
    visitor
        .context()
        .dispatcher_mut()
        .submit_rating(form.stars, &form.feedback)?;
    Ok(visitor.redirect(FEATURES_SECTION))
}

pub(crate) async fn show_notifications(visitor: Visitor) -> Response {
    visitor
        .context()
        .dispatcher_mut()
        .show_notification_preferences();
    visitor.redirect(FEATURES_SECTION)
}

pub(crate) async fn save_notifications(
    visitor: Visitor,
    Form(form): Form<PreferencesForm>,
) -> Response {
    visitor
        .context()
        .dispatcher_mut()
        .save_notification_preferences(form.into());
    visitor.redirect(FEATURES_SECTION)
}

pub(crate) async fn plan_journey(visitor: Visitor, Form(form): Form<PlannerForm>) -> Response {
    visitor.context().plan_demo_journey(&form.from, &form.to);
    visitor.redirect(FEATURES_SECTION)
}

pub(crate) async fn reset_planner(visitor: Visitor) -> Response {
    visitor.context().dispatcher_mut().reset_demo_planner();
    visitor.redirect(FEATURES_SECTION)
}
