mod config;
mod models;
mod service;

pub use self::config::*;
pub use models::*;
pub use service::*;
