pub mod app;
pub mod authz;
pub mod client;
pub mod config;
pub mod errors;
pub mod gate;
pub mod guard;
pub mod models;
pub mod screens;
pub mod session;

pub use app::{create_console, Console};
pub use errors::{AppError, AppResult};
