pub mod app_state;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{ApiError, Result};
pub use routes::create_router;
