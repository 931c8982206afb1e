pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod logging;
pub mod overlay;
pub mod runner;
pub mod session;
