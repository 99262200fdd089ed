//! Read-view endpoint handlers organized by resource.

pub mod readings;
pub mod system;

use axum::Router;

use crate::app_state::ViewState;

/// Composes all read-view routes.
pub fn routes() -> Router<ViewState> {
    Router::new()
        .merge(readings::routes())
        .merge(system::routes())
}
