//! Access to the package index
//!
//! # Modules
//!
//! - [`registry`]: `PackageIndex` and `RpcTransport` traits
//! - [`pypi`]: JSON API client
//! - [`xmlrpc`]: XML-RPC codec and client
//! - [`types`]: metadata records returned by the index

pub mod pypi;
pub mod registry;
pub mod types;
pub mod xmlrpc;

pub use registry::{PackageIndex, RpcTransport};
