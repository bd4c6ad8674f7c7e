//! Item field entity (one field of an extraction schema)

use crate::entity::Entity;
use crate::kind::{private, EntityKind, RelationKind};
use serde_json::{json, Map, Value};

pub type ItemField = Entity<ItemFieldKind>;

/// Kind marker for [`ItemField`]
#[derive(Debug, Clone, Copy)]
pub struct ItemFieldKind;

impl private::Sealed for ItemFieldKind {}

impl EntityKind for ItemFieldKind {
    const TYPE_ID: &'static str = "item_field";

    const SERIALIZED_PROPERTIES: &'static [&'static str] =
        &["name", "type", "is_required", "weight", "required", "vary"];

    const SERIALIZED_RELATIONS: &'static [(&'static str, RelationKind)] = &[];

    const ARRAY_PROPERTIES: &'static [&'static str] = &[];

    const TRANSIENT_KEYS: &'static [(&'static str, &'static [&'static str])] = &[];

    fn defaults() -> Map<String, Value> {
        [
            ("type", json!("text")),
            ("is_required", json!(false)),
            ("weight", json!(1.0)),
            ("required", json!(false)),
            ("vary", json!(false)),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
    }
}

impl Entity<ItemFieldKind> {
    #[inline]
    #[must_use]
    pub fn field_type(&self) -> &str {
        self.get_str("type").unwrap_or("text")
    }

    #[inline]
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.get("weight").and_then(Value::as_f64).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_editor() {
        let field = ItemField::new();
        assert_eq!(field.field_type(), "text");
        assert!((field.weight() - 1.0).abs() < f64::EPSILON);
        assert_eq!(field.get_bool("vary"), Some(false));
        assert!(field.get("name").is_none());
    }

    #[test]
    fn server_values_override_defaults() {
        let field = ItemField::from_wire(json!({"id": "f1", "name": "price", "type": "price", "weight": 2.5}))
            .unwrap();
        assert_eq!(field.id(), Some("f1"));
        assert_eq!(field.field_type(), "price");
        assert!((field.weight() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn name_is_serialized_and_tracked() {
        let mut field = ItemField::new();
        field.set("name", "title");
        assert!(field.is_dirty());
    }
}
