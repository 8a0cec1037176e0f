//! HTTP adapter - axum routes over the application handlers.

pub mod error;
pub mod handlers;
pub mod middleware;
mod router;
mod state;

pub use router::{create_router, RouterConfig};
pub use state::AppState;
