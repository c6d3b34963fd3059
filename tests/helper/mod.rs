//! Shared fixtures for the end-to-end tests
#![allow(dead_code)]

mod cli;
mod index;

pub use cli::{Output, run_qypi};
pub use index::{FakeIndex, Release};
