// Venue record types
// Schema-less rows keyed by the cleaned CSV header names

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single cell value
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// Missing-value marker in the source file
    Null,
}

impl FieldValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// One row of venue data
///
/// Columns keep the header order of the source file, so the JSON object
/// keys come out in the same order as the CSV columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueRecord {
    fields: Vec<(String, FieldValue)>,
}

impl VenueRecord {
    pub const fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Number of missing cells in this record
    pub fn null_count(&self) -> usize {
        self.fields.iter().filter(|(_, value)| value.is_null()).count()
    }
}

impl Serialize for VenueRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_json() {
        assert_eq!(
            serde_json::to_string(&FieldValue::Text("Colegio".into())).unwrap(),
            r#""Colegio""#
        );
        assert_eq!(serde_json::to_string(&FieldValue::Integer(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&FieldValue::Float(-17.8)).unwrap(), "-17.8");
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_record_keeps_column_order() {
        let record = VenueRecord::new(vec![
            ("nombre".to_string(), FieldValue::Text("A".into())),
            ("latitud".to_string(), FieldValue::Text("-17.8".into())),
            ("distrito".to_string(), FieldValue::Null),
        ]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"nombre":"A","latitud":"-17.8","distrito":null}"#
        );
        assert_eq!(record.null_count(), 1);
    }

    #[test]
    fn test_record_lookup() {
        let record = VenueRecord::new(vec![("latitud".to_string(), FieldValue::Null)]);
        assert!(record.get("latitud").is_some_and(FieldValue::is_null));
        assert!(record.get("longitud").is_none());
    }
}
