//! gallery-util - photo gallery thumbnail generation and publishing
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod d1;
pub mod pipeline;
pub mod scanner;
pub mod storage;
pub mod thumbnail;
