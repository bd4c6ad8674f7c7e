//! Wire serialization boundary
//!
//! The payload holds exactly the kind's serialized properties and
//! relations. UI-only keys are stripped from a copy; the live entity is
//! never modified by serializing it.

use crate::entity::{reference_id, Entity};
use crate::kind::{EntityKind, RelationKind};
use serde_json::{Map, Value};

/// Produces the outbound wire representation
pub trait Serializable {
    /// Build the wire payload
    fn serialize(&self) -> Map<String, Value>;
}

/// Tracks unsaved changes
pub trait DirtyTrackable {
    /// True once a serialized property changed
    fn is_dirty(&self) -> bool;

    /// Forget pending changes
    fn mark_clean(&mut self);
}

impl<K: EntityKind> Entity<K> {
    /// Build the wire payload
    ///
    /// Missing properties are emitted as `null`. Relations are emitted per
    /// their [`RelationKind`].
    #[must_use]
    pub fn serialize(&self) -> Map<String, Value> {
        let mut out = Map::new();

        for &prop in K::SERIALIZED_PROPERTIES {
            let value = self.get(prop).cloned().unwrap_or(Value::Null);
            out.insert(prop.to_owned(), value);
        }

        for &(field, keys) in K::TRANSIENT_KEYS {
            if let Some(Value::Array(items)) = out.get_mut(field) {
                for item in items.iter_mut() {
                    strip_keys(item, keys);
                }
            }
        }

        for &(field, kind) in K::SERIALIZED_RELATIONS {
            out.insert(field.to_owned(), serialize_relation(field, self.get(field), kind));
        }

        out
    }
}

impl<K: EntityKind> Serializable for Entity<K> {
    fn serialize(&self) -> Map<String, Value> {
        Entity::serialize(self)
    }
}

/// Serde output is the wire payload, never the raw field map
impl<K: EntityKind> serde::Serialize for Entity<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let payload = Entity::serialize(self);
        serde::Serialize::serialize(&payload, serializer)
    }
}

impl<K: EntityKind> DirtyTrackable for Entity<K> {
    fn is_dirty(&self) -> bool {
        Entity::is_dirty(self)
    }

    fn mark_clean(&mut self) {
        Entity::mark_clean(self);
    }
}

fn strip_keys(item: &mut Value, keys: &[&str]) {
    if let Value::Object(map) = item {
        for key in keys {
            map.remove(*key);
        }
    }
}

fn serialize_relation(field: &str, value: Option<&Value>, kind: RelationKind) -> Value {
    match (kind, value) {
        (_, None | Some(Value::Null)) => Value::Null,
        (RelationKind::Embedded, Some(value)) => value.clone(),
        (RelationKind::Reference, Some(Value::Array(items))) => Value::Array(
            items
                .iter()
                .filter_map(|item| {
                    let id = reference_id(item);
                    if id.is_none() {
                        tracing::debug!(field, "dropping relation element without an id");
                    }
                    id.map(Value::String)
                })
                .collect(),
        ),
        (RelationKind::Reference, Some(single)) => {
            reference_id(single).map_or(Value::Null, Value::String)
        }
    }
}
