mod api_error;
pub mod config;
mod http_layers;
pub mod metrics;
mod payload;
mod routes;
pub mod server;
pub mod state;

pub use api_error::ApiError;
pub use config::ServerConfig;
pub use http_layers::*;
pub use routes::Route;
pub use server::{make_app, run_server};
