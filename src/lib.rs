pub mod cli;
pub mod client;
pub mod config;
pub mod index;
pub mod logging;
pub mod shape;
pub mod version;
