//! Collection creation and photo-to-collection links.

use gallery_common::Result;

use crate::batch::{BatchPlanner, Statement, StatementPlan};
use crate::models::CollectionRecord;
use crate::value::SqlValue;

/// Links a photo to a collection by their natural keys.
///
/// Params: `sort_order`, `photo.filename`, `collection.name`. The WHERE
/// clause is required for SQLite to parse the trailing upsert clause.
pub const LINK_PHOTO_SQL: &str = "INSERT INTO photo_collection (photo_id, collection_id, sort_order) \
SELECT photo.id, collection.id, ? FROM photo, collection \
WHERE photo.filename = ? AND collection.name = ? ON CONFLICT DO NOTHING;";

/// Split a `;`-delimited collection list, trimming names and dropping empties.
///
/// # Examples
///
/// ```
/// use gallery_db::collections::parse_collection_list;
///
/// assert_eq!(parse_collection_list("Film; Lisbon ;;"), vec!["Film", "Lisbon"]);
/// ```
pub fn parse_collection_list(list: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in list.split(';').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Batched INSERTs creating every named collection.
pub fn plan_collections(names: &[String], batch_limit: usize) -> Result<StatementPlan> {
    let records: Vec<CollectionRecord> = names.iter().map(CollectionRecord::new).collect();
    BatchPlanner::for_table::<CollectionRecord>()
        .with_batch_limit(batch_limit)
        .plan_records(&records)
}

/// One link statement per photo, numbering photos in the given order.
pub fn link_statements(collection: &str, filenames: &[String]) -> StatementPlan {
    filenames
        .iter()
        .enumerate()
        .map(|(sort_order, filename)| {
            Statement::new(
                LINK_PHOTO_SQL,
                vec![
                    SqlValue::Integer(sort_order as i64),
                    SqlValue::from(filename.as_str()),
                    SqlValue::from(collection),
                ],
            )
        })
        .collect::<Vec<_>>()
        .into()
}
