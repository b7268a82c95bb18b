pub mod config;
pub mod error;
pub mod request_log;
pub mod routes;
pub mod schema;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
