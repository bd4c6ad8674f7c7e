//! Entity kind trait
//!
//! Defines the [`EntityKind`] trait describing one editable record type.
//! This is a sealed trait - only kinds defined in this crate implement it.

use serde_json::{Map, Value};
use std::fmt::Debug;

/// How a nested entity is written into the wire payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Emit only the related entity's id
    Reference,
    /// Emit the related entity as-is
    Embedded,
}

/// Declares the shape of one entity type
///
/// # Contract
/// - `SERIALIZED_PROPERTIES` is the exact key set of the wire payload
///   (together with `SERIALIZED_RELATIONS`)
/// - `ARRAY_PROPERTIES` are normalized to `[]` at construction
/// - `TRANSIENT_KEYS` lists, per list field, the element keys that never
///   leave the model
pub trait EntityKind: Send + Sync + 'static + Debug + private::Sealed {
    /// Entity type identifier, lowercase with underscores
    const TYPE_ID: &'static str;

    /// Fields written to the wire, in payload order
    const SERIALIZED_PROPERTIES: &'static [&'static str];

    /// Nested entities written to the wire
    const SERIALIZED_RELATIONS: &'static [(&'static str, RelationKind)];

    /// List-typed fields
    const ARRAY_PROPERTIES: &'static [&'static str];

    /// UI-only keys stripped from each element of a list field
    const TRANSIENT_KEYS: &'static [(&'static str, &'static [&'static str])];

    /// Default field values for a freshly created entity
    fn defaults() -> Map<String, Value>;
}

/// Sealed trait - prevents external implementations
#[doc(hidden)]
pub mod private {
    /// Sealed trait marker
    pub trait Sealed {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemFieldKind, SpiderKind};

    fn assert_sealed<K: crate::__private::Sealed + EntityKind>() {}

    #[test]
    fn kinds_are_sealed() {
        assert_sealed::<SpiderKind>();
        assert_sealed::<ItemFieldKind>();
    }

    #[test]
    fn transient_keys_live_on_list_fields() {
        for (field, _) in SpiderKind::TRANSIENT_KEYS {
            assert!(SpiderKind::ARRAY_PROPERTIES.contains(field));
            assert!(SpiderKind::SERIALIZED_PROPERTIES.contains(field));
        }
        assert!(ItemFieldKind::TRANSIENT_KEYS.is_empty());
    }
}
