//! Routes of the site.

use crate::{
    controller::{contact, modal, page, search},
    service::AppState,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Returns the routes with the state from the application config.
pub fn routes() -> Vec<Router> {
    routes_with_state(AppState::from_config())
}

/// Returns the routes sharing the state.
pub fn routes_with_state(state: AppState) -> Vec<Router> {
    let mut routes = Vec::new();

    // Page controller.
    let router = Router::new()
        .route("/", get(page::index))
        .route("/language", post(page::language))
        .with_state(state.clone());
    routes.push(router);

    // Search controller.
    let router = Router::new()
        .route("/search", post(search::search))
        .route("/fare", post(search::fare))
        .route("/schedule", post(search::schedule))
        .route("/api/stops", get(search::stops))
        .with_state(state.clone());
    routes.push(router);

    // Modal controller.
    let router = Router::new()
        .route("/features", post(modal::show_feature))
        .route("/modal/close", post(modal::close))
        .route("/tickets", post(modal::show_ticketing))
        .route("/tickets/pay", post(modal::pay))
        .route("/track", post(modal::track))
        .route("/goods", post(modal::show_goods))
        .route("/goods/form", post(modal::show_goods_form))
        .route("/goods/book", post(modal::book_goods))
        .route("/rating", post(modal::show_rating))
        .route("/rating/submit", post(modal::rate))
        .route("/notifications", post(modal::show_notifications))
        .route("/notifications/save", post(modal::save_notifications))
        .route("/planner", post(modal::plan_journey))
        .route("/planner/reset", post(modal::reset_planner))
        .with_state(state.clone());
    routes.push(router);

    // Contact controller.
    let router = Router::new()
        .route("/contact", post(contact::submit))
        .route("/contact/reset", post(contact::reset))
        .with_state(state);
    routes.push(router);

    routes
}
