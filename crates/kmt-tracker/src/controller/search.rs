use super::Visitor;
use axum::{Form, Json, extract::Query, response::Response};
use kmt_core::simulation::{ScheduleTab, suggest_stops};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TripForm {
    from: String,
    to: String,
    fare_type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleForm {
    tab: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct StopQuery {
    q: String,
}

pub(crate) async fn search(visitor: Visitor, Form(form): Form<TripForm>) -> Response {
    visitor.context().search_routes(&form.from, &form.to);
    visitor.redirect("search-results")
}

pub(crate) async fn fare(visitor: Visitor, Form(form): Form<TripForm>) -> Response {
    visitor
        .context()
        .calculate_fare(&form.from, &form.to, &form.fare_type);
    visitor.redirect("fare-calculator")
}

pub(crate) async fn schedule(visitor: Visitor, Form(form): Form<ScheduleForm>) -> kmt_axum::Result {
    let tab = form.tab.parse::<ScheduleTab>()?;
    visitor.context().select_schedule_tab(tab);
    Ok(visitor.redirect("schedule"))
}

pub(crate) async fn stops(Query(query): Query<StopQuery>) -> Json<Vec<&'static str>> {
    Json(suggest_stops(&query.q))
}
