//! Gallery-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across gallery-util:
//!
//! - **Error Handling**: Common error types and result aliases
//! - **Path Utilities**: Source image detection and thumbnail naming
//! - **Core Types**: The `(source, thumbnail)` pair every stage passes along
//!
//! # Examples
//!
//! ```
//! use gallery_common::{Error, PhotoPaths, Result};
//! use gallery_common::paths::is_image_file;
//! use std::path::Path;
//!
//! assert!(is_image_file(Path::new("IMG_0001.jpg")));
//!
//! let pair = PhotoPaths::for_source("/photos/IMG_0001.jpg").unwrap();
//! assert_eq!(pair.thumbnail_name(), Some("IMG_0001-thumb.avif"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_argument("empty column set"))
//! }
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
