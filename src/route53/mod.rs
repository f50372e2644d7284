mod config;
mod frontend;
mod models;
mod sigv4;

pub use self::config::*;
pub use frontend::*;
