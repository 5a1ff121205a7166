//! Server module
//!
//! Contains application state, routing, and server initialization logic.

pub mod app;
pub mod routes;
pub mod stage;
pub mod state;

pub use app::App;
pub use routes::create_router;
pub use stage::strip_stage;
pub use state::AppState;
