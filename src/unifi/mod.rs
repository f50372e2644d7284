mod backend;
mod config;
mod extract;
mod models;

pub use backend::*;
pub use self::config::*;
pub use extract::*;
