use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/estimate", post(handlers::estimate))
        .route("/api/leaderboard", get(handlers::get_leaderboard))
        .route("/api/challenges", post(handlers::create_challenge))
        .route(
            "/api/users/:user_id/actions",
            get(handlers::list_user_actions).post(handlers::log_action),
        )
        .route("/api/users/:user_id/stats", get(handlers::get_stats))
        .route("/api/users/:user_id/timeline", get(handlers::get_timeline))
        .route("/api/users/:user_id/community", get(handlers::get_community))
        .route("/api/users/:user_id/challenges", get(handlers::list_challenges))
        .route(
            "/api/users/:user_id/challenges/:challenge_id",
            post(handlers::join_challenge).delete(handlers::leave_challenge),
        )
        .with_state(state)
}
