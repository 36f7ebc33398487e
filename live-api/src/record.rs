//! Untyped records assembled from per-child reads

use bridge_client::LiveValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{ApiError, Result};

/// Property values read for one child of a collection
///
/// `id` is the child's index in its parent collection. Fields keep the order
/// in which they were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: usize,
    fields: Vec<(String, LiveValue)>,
}

impl Record {
    pub fn new(id: usize, fields: Vec<(String, LiveValue)>) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&LiveValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &LiveValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, field: &str) -> Result<&LiveValue> {
        self.get(field)
            .ok_or_else(|| ApiError::MissingField(field.to_string()))
    }

    /// Text field; numeric atoms are formatted since Max sends numeric-looking
    /// symbols as numbers
    pub fn string(&self, field: &str) -> Result<String> {
        let value = self.require(field)?;
        value.to_text().ok_or_else(|| unexpected(field, "string", value))
    }

    pub fn float(&self, field: &str) -> Result<f64> {
        let value = self.require(field)?;
        value.as_f64().ok_or_else(|| unexpected(field, "number", value))
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        let value = self.require(field)?;
        value.as_i64().ok_or_else(|| unexpected(field, "integer", value))
    }

    pub fn flag(&self, field: &str) -> Result<bool> {
        let value = self.require(field)?;
        value.as_bool().ok_or_else(|| unexpected(field, "boolean", value))
    }
}

pub(crate) fn unexpected(field: &str, expected: &'static str, found: &LiveValue) -> ApiError {
    ApiError::UnexpectedValue {
        field: field.to_string(),
        expected,
        found: format!("{} {}", found.kind(), found),
    }
}

/// Serialized as one flat object: `{"id": 0, "name": "Intro", ...}`
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A typed view of a [`Record`] with a fixed field list
pub trait FromRecord: Sized {
    /// Fields read for every child, in request order
    const FIELDS: &'static [&'static str];

    fn from_record(record: &Record) -> Result<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_record() -> Record {
        Record::new(
            4,
            vec![
                ("name".to_string(), LiveValue::from("A")),
                ("color".to_string(), LiveValue::from("#fff")),
            ],
        )
    }

    #[test]
    fn test_accessors() {
        let record = Record::new(
            0,
            vec![
                ("name".to_string(), "Reverb".into()),
                ("value".to_string(), LiveValue::Float(0.25)),
                ("is_enabled".to_string(), LiveValue::Int(1)),
                ("type".to_string(), LiveValue::Int(2)),
            ],
        );

        assert_eq!(record.string("name").unwrap(), "Reverb");
        assert_eq!(record.float("value").unwrap(), 0.25);
        assert!(record.flag("is_enabled").unwrap());
        assert_eq!(record.int("type").unwrap(), 2);
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let record = scene_record();
        assert!(matches!(record.float("value"), Err(ApiError::MissingField(f)) if f == "value"));
        assert!(matches!(
            record.float("name"),
            Err(ApiError::UnexpectedValue { expected: "number", .. })
        ));
    }

    #[test]
    fn test_numeric_names_are_text() {
        let record = Record::new(
            1,
            vec![
                ("name".to_string(), LiveValue::Int(808)),
                ("original_name".to_string(), LiveValue::Float(1.5)),
                ("flag".to_string(), LiveValue::Bool(true)),
            ],
        );

        assert_eq!(record.string("name").unwrap(), "808");
        assert_eq!(record.string("original_name").unwrap(), "1.5");
        assert!(matches!(
            record.string("flag"),
            Err(ApiError::UnexpectedValue { expected: "string", .. })
        ));
    }

    #[test]
    fn test_serializes_flat_with_id() {
        let json = serde_json::to_value(scene_record()).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 4, "name": "A", "color": "#fff" }));
    }
}
