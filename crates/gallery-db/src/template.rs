//! Multi-row INSERT statement templates.
//!
//! A template holds `row_count` parenthesised groups of `?` placeholders,
//! one per column, and ends in `ON CONFLICT DO NOTHING;` so a statement can
//! be resubmitted without duplicating rows.

use std::collections::HashMap;

use gallery_common::{Error, Result};

/// Trailer appended to every generated INSERT.
pub const CONFLICT_CLAUSE: &str = " ON CONFLICT DO NOTHING;";

/// Check that a table name and column set can form a statement.
///
/// Column names must be non-empty and unique.
pub(crate) fn validate_target(table: &str, columns: &[&str]) -> Result<()> {
    if table.trim().is_empty() {
        return Err(Error::invalid_argument("table name must not be empty"));
    }
    if columns.is_empty() {
        return Err(Error::invalid_argument(format!(
            "column set for table {} must not be empty",
            table
        )));
    }
    for (idx, column) in columns.iter().enumerate() {
        if column.trim().is_empty() {
            return Err(Error::invalid_argument(format!(
                "column {} of table {} has an empty name",
                idx, table
            )));
        }
        if columns[..idx].contains(column) {
            return Err(Error::invalid_argument(format!(
                "column {} appears more than once in table {}",
                column, table
            )));
        }
    }
    Ok(())
}

/// Build a parameterized INSERT for `row_count` rows of `columns`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `row_count` is zero, the table
/// name is empty, or the column set is empty or contains duplicates.
///
/// # Examples
///
/// ```
/// use gallery_db::template::build_insert_template;
///
/// let sql = build_insert_template("collection", &["name", "description"], 2).unwrap();
/// assert_eq!(
///     sql,
///     "INSERT INTO collection (name, description) VALUES (?, ?),\n(?, ?) ON CONFLICT DO NOTHING;"
/// );
/// ```
pub fn build_insert_template(table: &str, columns: &[&str], row_count: usize) -> Result<String> {
    validate_target(table, columns)?;
    if row_count < 1 {
        return Err(Error::invalid_argument(format!(
            "row count for table {} must be at least 1",
            table
        )));
    }

    tracing::debug!(
        "Generating {} row insert statement for table {} with columns: {:?}",
        row_count,
        table,
        columns
    );

    let group = format!("({})", vec!["?"; columns.len()].join(", "));
    let groups = vec![group.as_str(); row_count].join(",\n");

    Ok(format!(
        "INSERT INTO {} ({}) VALUES {}{}",
        table,
        columns.join(", "),
        groups,
        CONFLICT_CLAUSE
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TemplateKey {
    table: String,
    columns: Vec<String>,
    row_count: usize,
}

impl TemplateKey {
    fn new(table: &str, columns: &[&str], row_count: usize) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            row_count,
        }
    }
}

/// Caller-owned memo of built templates, keyed by `(table, columns, row_count)`.
///
/// A plan over many rows only ever needs two shapes per table: the full
/// group and the remainder.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: HashMap<TemplateKey, String>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached template, building and storing it on first use.
    pub fn get_or_build(&mut self, table: &str, columns: &[&str], row_count: usize) -> Result<&str> {
        let key = TemplateKey::new(table, columns, row_count);
        if !self.entries.contains_key(&key) {
            let sql = build_insert_template(table, columns, row_count)?;
            self.entries.insert(key.clone(), sql);
        }
        Ok(self.entries[&key].as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PHOTO_COLUMNS: &[&str] = &[
        "filename",
        "thumbnail",
        "camera_model",
        "lens",
        "date_taken",
        "exposure_time",
        "focal_length",
        "f_stop",
        "iso",
    ];

    #[test]
    fn test_single_row_template() {
        let sql = build_insert_template("photo", PHOTO_COLUMNS, 1).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO photo (filename, thumbnail, camera_model, lens, date_taken, \
             exposure_time, focal_length, f_stop, iso) VALUES \
             (?, ?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT DO NOTHING;"
        );
        assert_eq!(sql.matches('?').count(), 9);
    }

    #[test]
    fn test_groups_joined_with_comma_newline() {
        let sql = build_insert_template("t", &["a"], 3).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO t (a) VALUES (?),\n(?),\n(?) ON CONFLICT DO NOTHING;"
        );
    }

    #[test]
    fn test_group_count_matches_rows() {
        let sql = build_insert_template("photo", PHOTO_COLUMNS, 11).unwrap();
        let group = "(?, ?, ?, ?, ?, ?, ?, ?, ?)";
        assert_eq!(sql.matches(group).count(), 11);
        assert_eq!(sql.matches('?').count(), 99);
        assert!(sql.ends_with(CONFLICT_CLAUSE));
    }

    #[test]
    fn test_deterministic() {
        let a = build_insert_template("photo", PHOTO_COLUMNS, 5).unwrap();
        let b = build_insert_template("photo", PHOTO_COLUMNS, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_rows_rejected() {
        let err = build_insert_template("photo", PHOTO_COLUMNS, 0).unwrap_err();
        assert_matches!(err, Error::InvalidArgument(_));
    }

    #[test]
    fn test_empty_columns_rejected() {
        let err = build_insert_template("photo", &[], 1).unwrap_err();
        assert_matches!(err, Error::InvalidArgument(_));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = build_insert_template("  ", &["a"], 1).unwrap_err();
        assert_matches!(err, Error::InvalidArgument(_));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = build_insert_template("t", &["a", "b", "a"], 1).unwrap_err();
        assert_matches!(err, Error::InvalidArgument(msg) if msg.contains("more than once"));
    }

    #[test]
    fn test_cache_reuses_entries() {
        let mut cache = TemplateCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_build("photo", PHOTO_COLUMNS, 11).unwrap().to_string();
        let second = cache.get_or_build("photo", PHOTO_COLUMNS, 11).unwrap().to_string();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        cache.get_or_build("photo", PHOTO_COLUMNS, 3).unwrap();
        cache.get_or_build("collection", &["name", "description"], 3).unwrap();
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let mut cache = TemplateCache::new();
        assert!(cache.get_or_build("photo", PHOTO_COLUMNS, 0).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_matches_direct_build() {
        let mut cache = TemplateCache::new();
        let cached = cache.get_or_build("t", &["a", "b"], 4).unwrap();
        assert_eq!(cached, build_insert_template("t", &["a", "b"], 4).unwrap());
    }
}
