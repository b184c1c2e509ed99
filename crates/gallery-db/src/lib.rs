//! Gallery-DB: Batched INSERT planning and schema for the photo store.
//!
//! The remote store (Cloudflare D1) accepts at most [`BATCH_PARAM_LIMIT`]
//! bound parameters per statement. This crate turns rows of photo metadata
//! into the fewest parameterized INSERT statements that respect that limit.
//! It performs no I/O; sending a [`StatementPlan`] is up to the caller.
//!
//! # Modules
//!
//! - `value` - Scalar bound-parameter values
//! - `template` - INSERT template builder and caller-owned template cache
//! - `batch` - Partitioning rows into a statement plan
//! - `models` - Table models implementing [`InsertRow`]
//! - `schema` - Table definitions
//! - `collections` - Collection rows and photo links
//!
//! # Example
//!
//! ```
//! use gallery_db::{BatchPlanner, PhotoRecord};
//!
//! let records: Vec<PhotoRecord> = (0..25)
//!     .map(|i| PhotoRecord {
//!         filename: format!("IMG_{i}.jpg"),
//!         thumbnail: format!("IMG_{i}-thumb.avif"),
//!         ..PhotoRecord::default()
//!     })
//!     .collect();
//!
//! let plan = BatchPlanner::for_table::<PhotoRecord>()
//!     .plan_records(&records)
//!     .unwrap();
//!
//! // Nine columns per photo: 11 rows per statement
//! let sizes: Vec<usize> = plan.iter().map(|s| s.params.len() / 9).collect();
//! assert_eq!(sizes, vec![11, 11, 3]);
//! ```

pub mod batch;
pub mod collections;
pub mod models;
pub mod schema;
pub mod template;
pub mod value;

pub use batch::{
    capacity, partition, partition_with_cache, BatchPlanner, Statement, StatementPlan,
    BATCH_PARAM_LIMIT,
};
pub use models::{CollectionRecord, InsertRow, PhotoRecord};
pub use template::{build_insert_template, TemplateCache};
pub use value::{Row, SqlValue};
