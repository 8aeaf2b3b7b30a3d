//! Normalized breed records
//!
//! Raw API items are loosely typed JSON objects. Normalization copies the
//! fields the viewer cares about and defaults anything absent or mistyped,
//! so one bad item never rejects its page.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// One catalog entry. Never modified after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedRecord {
    pub id: String,
    pub name: String,
    pub child_friendly: f64,
    pub dog_friendly: f64,
    pub stranger_friendly: f64,
    pub origin: String,
    pub description: String,
}

impl BreedRecord {
    /// Build a record from a raw API item with a freshly generated id
    pub fn normalize(item: &Value) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), item)
    }

    /// Build a record from a raw API item using the given id
    pub fn with_id(id: String, item: &Value) -> Self {
        Self {
            id,
            name: text_field(item, "name"),
            child_friendly: score_field(item, "child_friendly"),
            dog_friendly: score_field(item, "dog_friendly"),
            stranger_friendly: score_field(item, "stranger_friendly"),
            origin: text_field(item, "origin"),
            description: text_field(item, "description"),
        }
    }

    /// The three friendliness scores with their display labels
    pub fn scores(&self) -> [(&'static str, f64); 3] {
        [
            ("Child Friendly", self.child_friendly),
            ("Dog Friendly", self.dog_friendly),
            ("Stranger Friendly", self.stranger_friendly),
        ]
    }

    /// String form of every field, in declaration order
    pub fn field_strings(&self) -> [String; 7] {
        [
            self.id.clone(),
            self.name.clone(),
            self.child_friendly.to_string(),
            self.dog_friendly.to_string(),
            self.stranger_friendly.to_string(),
            self.origin.clone(),
            self.description.clone(),
        ]
    }

    /// Case-folded substring match against any field.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.field_strings()
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

fn text_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn score_field(item: &Value, key: &str) -> f64 {
    item.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn copies_known_fields_and_ignores_extras() {
        let item = json!({
            "name": "Abyssinian",
            "child_friendly": 3,
            "dog_friendly": 4,
            "stranger_friendly": 5,
            "origin": "Egypt",
            "description": "Active and curious.",
            "temperament": "Active, Energetic",
            "weight": { "metric": "3 - 5" }
        });
        let record = BreedRecord::with_id("a1".into(), &item);
        assert_eq!(record.name, "Abyssinian");
        assert_eq!(record.child_friendly, 3.0);
        assert_eq!(record.dog_friendly, 4.0);
        assert_eq!(record.stranger_friendly, 5.0);
        assert_eq!(record.origin, "Egypt");
        assert_eq!(record.description, "Active and curious.");
    }

    #[test]
    fn defaults_missing_and_mistyped_fields() {
        let item = json!({ "name": 42, "dog_friendly": "lots", "origin": null });
        let record = BreedRecord::with_id("x".into(), &item);
        assert_eq!(record.name, "");
        assert_eq!(record.child_friendly, 0.0);
        assert_eq!(record.dog_friendly, 0.0);
        assert_eq!(record.origin, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let item = json!({ "name": "Bengal" });
        let a = BreedRecord::normalize(&item);
        let b = BreedRecord::normalize(&item);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn numeric_fields_match_by_string_form() {
        let item = json!({ "name": "Bengal", "child_friendly": 4, "origin": "United States" });
        let record = BreedRecord::with_id("id-1".into(), &item);
        assert!(record.matches("united"));
        assert!(record.matches("4"));
        assert!(!record.matches("4.0"));
        assert!(!record.matches("persia"));
    }
}
