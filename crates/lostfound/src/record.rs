//! Core report types for lostfound.
//!
//! This module defines the persisted person record and the pieces of a
//! submission before it has been assigned an id and a stored photo.

use serde::{Deserialize, Serialize};

/// A lost person report as persisted in the record file.
///
/// Field order here is the key order in the serialized JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Identifier, unique within the store.
    pub id: u64,
    /// Name of the missing person.
    pub name: String,
    /// Age as entered by the reporter.
    pub age: String,
    /// Where the person was last seen.
    pub location: String,
    /// Free-form description.
    pub details: String,
    /// Root-relative URL path of the stored photo.
    pub photo: String,
}

/// The text fields of a submitted report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReport {
    /// Name of the missing person.
    pub name: String,
    /// Age as entered by the reporter.
    pub age: String,
    /// Where the person was last seen.
    pub location: String,
    /// Free-form description.
    pub details: String,
}

impl NewReport {
    /// Turn the submission into a record with its assigned id and photo path.
    #[must_use]
    pub fn into_record(self, id: u64, photo: String) -> PersonRecord {
        PersonRecord {
            id,
            name: self.name,
            age: self.age,
            location: self.location,
            details: self.details,
            photo,
        }
    }
}

/// An uploaded photo as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// File name supplied by the client, before sanitizing.
    pub file_name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Find the first record carrying `id`.
#[must_use]
pub fn find_by_id(records: &[PersonRecord], id: u64) -> Option<&PersonRecord> {
    records.iter().find(|record| record.id == id)
}

/// Id for the next record: one more than the largest id present, 0 when empty.
///
/// Gaps left by missing ids are never reused.
#[must_use]
pub fn next_id_for(records: &[PersonRecord]) -> u64 {
    records
        .iter()
        .map(|record| record.id)
        .max()
        .map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> PersonRecord {
        NewReport {
            name: format!("Person {id}"),
            ..NewReport::default()
        }
        .into_record(id, format!("/static/uploads/{id}.jpg"))
    }

    #[test]
    fn test_into_record() {
        let report = NewReport {
            name: "Jane Doe".to_string(),
            age: "34".to_string(),
            location: "Central Park".to_string(),
            details: "last seen jogging".to_string(),
        };

        let rec = report.into_record(0, "/static/uploads/photo_1.jpg".to_string());
        assert_eq!(rec.id, 0);
        assert_eq!(rec.name, "Jane Doe");
        assert_eq!(rec.age, "34");
        assert_eq!(rec.location, "Central Park");
        assert_eq!(rec.details, "last seen jogging");
        assert_eq!(rec.photo, "/static/uploads/photo_1.jpg");
    }

    #[test]
    fn test_serialized_key_order() {
        let json = serde_json::to_string(&record(3)).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"name":"Person 3","age":"","location":"","details":"","photo":"/static/uploads/3.jpg"}"#
        );
    }

    #[test]
    fn test_deserialize_existing_file_entry() {
        let json = r#"{"id": 0, "name": "A", "age": "9", "location": "L", "details": "D", "photo": "/static/uploads/a.png"}"#;
        let rec: PersonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, 0);
        assert_eq!(rec.photo, "/static/uploads/a.png");
    }

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id_for(&[]), 0);
    }

    #[test]
    fn test_next_id_tolerates_gaps() {
        let records = vec![record(0), record(4), record(2)];
        assert_eq!(next_id_for(&records), 5);
    }

    #[test]
    fn test_find_by_id() {
        let records = vec![record(0), record(1)];
        assert_eq!(find_by_id(&records, 1).map(|r| r.id), Some(1));
        assert!(find_by_id(&records, 9).is_none());
    }

    #[test]
    fn test_photo_upload_debug_hides_bytes() {
        let upload = PhotoUpload {
            file_name: "a.jpg".to_string(),
            bytes: vec![0; 1024],
        };
        let debug_str = format!("{upload:?}");
        assert!(debug_str.contains("a.jpg"));
        assert!(debug_str.contains("1024"));
    }
}
