pub mod adapters;
pub mod assets;
pub mod config;
pub mod domain;
pub mod routes;
pub mod server;
pub mod utils;
pub mod view;
pub mod views;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::AppConfig;
pub use server::{router, AppState};
pub use utils::error::{BackofficeError, Result};
