//! Shared helpers for craftgen-scaffold integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_server;
pub mod zip;

pub use fixtures::*;
pub use mock_server::*;
pub use zip::*;
