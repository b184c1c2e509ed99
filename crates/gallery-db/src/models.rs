//! Rust models matching the gallery tables.
//!
//! Each model declares its table and column order through [`InsertRow`],
//! and unknown metadata is `None` rather than a placeholder string.

use gallery_common::PhotoPaths;
use serde::{Deserialize, Serialize};

use crate::value::{Row, SqlValue};

/// A model that can be written as one row of a multi-row INSERT.
pub trait InsertRow {
    /// Target table.
    const TABLE: &'static str;

    /// Column list, in the order [`InsertRow::values`] yields values.
    const COLUMNS: &'static [&'static str];

    /// This record's values in column order.
    fn values(&self) -> Row;
}

/// Photo metadata row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PhotoRecord {
    pub filename: String,
    pub thumbnail: String,
    pub camera_model: Option<String>,
    pub lens: Option<String>,
    pub date_taken: Option<String>,
    pub exposure_time: Option<String>,
    pub focal_length: Option<String>,
    pub f_stop: Option<String>,
    pub iso: Option<String>,
}

impl PhotoRecord {
    /// Record for a source/thumbnail pair with no metadata beyond the names.
    ///
    /// Returns `None` if either path lacks a UTF-8 file name.
    pub fn from_paths(paths: &PhotoPaths) -> Option<Self> {
        Some(Self {
            filename: paths.source_name()?.to_string(),
            thumbnail: paths.thumbnail_name()?.to_string(),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_camera_model(mut self, camera_model: Option<String>) -> Self {
        self.camera_model = camera_model;
        self
    }
}

impl InsertRow for PhotoRecord {
    const TABLE: &'static str = "photo";
    const COLUMNS: &'static [&'static str] = &[
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

    fn values(&self) -> Row {
        vec![
            SqlValue::from(self.filename.as_str()),
            SqlValue::from(self.thumbnail.as_str()),
            SqlValue::from(self.camera_model.clone()),
            SqlValue::from(self.lens.clone()),
            SqlValue::from(self.date_taken.clone()),
            SqlValue::from(self.exposure_time.clone()),
            SqlValue::from(self.focal_length.clone()),
            SqlValue::from(self.f_stop.clone()),
            SqlValue::from(self.iso.clone()),
        ]
    }
}

/// Named collection of photos.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionRecord {
    pub name: String,
    pub description: String,
}

impl CollectionRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

impl InsertRow for CollectionRecord {
    const TABLE: &'static str = "collection";
    const COLUMNS: &'static [&'static str] = &["name", "description"];

    fn values(&self) -> Row {
        vec![
            SqlValue::from(self.name.as_str()),
            SqlValue::from(self.description.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_values_match_columns() {
        let record = PhotoRecord {
            filename: "IMG_1.jpg".to_string(),
            thumbnail: "IMG_1-thumb.avif".to_string(),
            camera_model: Some("OLYMPUS XA2".to_string()),
            ..PhotoRecord::default()
        };
        let values = record.values();
        assert_eq!(values.len(), PhotoRecord::COLUMNS.len());
        assert_eq!(values[0], SqlValue::from("IMG_1.jpg"));
        assert_eq!(values[1], SqlValue::from("IMG_1-thumb.avif"));
        assert_eq!(values[2], SqlValue::from("OLYMPUS XA2"));
        assert!(values[3..].iter().all(SqlValue::is_null));
    }

    #[test]
    fn test_photo_from_paths() {
        let paths = PhotoPaths::for_source("/photos/frame.12.jpg").unwrap();
        let record = PhotoRecord::from_paths(&paths)
            .unwrap()
            .with_camera_model(Some("OLYMPUS XA2".to_string()));
        assert_eq!(record.filename, "frame.12.jpg");
        assert_eq!(record.thumbnail, "frame-thumb.avif");
        assert_eq!(record.camera_model.as_deref(), Some("OLYMPUS XA2"));
        assert_eq!(record.lens, None);
    }

    #[test]
    fn test_collection_values() {
        let record = CollectionRecord::new("Lisbon 2024");
        assert_eq!(
            record.values(),
            vec![SqlValue::from("Lisbon 2024"), SqlValue::from("")]
        );
        assert_eq!(CollectionRecord::COLUMNS.len(), 2);
    }
}
