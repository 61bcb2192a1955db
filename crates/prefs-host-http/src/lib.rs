pub mod handlers;
mod request_runtime;
pub mod routes;
pub mod server;
pub mod state;
pub mod view;

pub use routes::configure_routes;
pub use server::{HttpConfig, run_server};
pub use state::AppState;
