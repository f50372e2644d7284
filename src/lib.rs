pub mod common;
pub mod config;
pub mod route53;
pub mod service;
pub mod unifi;

pub use crate::config::Config;
