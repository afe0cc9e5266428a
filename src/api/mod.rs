pub mod handlers;
pub mod routes;

pub use handlers::{AppState, WebUiState};
pub use routes::create_router;
