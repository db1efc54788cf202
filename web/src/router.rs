//! Router configuration.

use crate::handlers::{admin, health, reservations, slots};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// # Routes
///
/// - `GET /health` - Liveness probe
/// - `GET /api/slots` - List slots (students see only slots with free seats)
/// - `POST /api/slots` - Create a slot (admin)
/// - `DELETE /api/slots/:id` - Delete a slot (admin)
/// - `POST /api/reservations` - Submit a reservation
/// - `GET /api/reservations` - List reservations (admin)
/// - `DELETE /api/reservations/:id` - Delete a reservation (admin)
/// - `POST /api/admin/login` - Exchange the admin password for a token
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/slots", get(slots::list_slots).post(slots::create_slot))
        .route("/slots/:id", delete(slots::delete_slot))
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::submit_reservation),
        )
        .route("/reservations/:id", delete(reservations::delete_reservation))
        .route("/admin/login", post(admin::login));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
