use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/user", get(handlers::get_user))
        .route("/api/period", get(handlers::get_period))
        .route(
            "/api/settings",
            get(handlers::get_period).post(handlers::save_settings),
        )
        .route(
            "/api/expenses",
            get(handlers::get_expenses).post(handlers::add_expense),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/missions", get(handlers::get_missions))
        .route("/api/onboarding", get(handlers::get_onboarding))
        .route("/api/onboarding/complete", post(handlers::complete_step))
        .route("/api/onboarding/step", post(handlers::go_to_step))
        .route("/api/onboarding/pledge", post(handlers::submit_pledge))
        .route("/api/onboarding/pledge/input", post(handlers::check_pledge_input))
        .with_state(state)
}
