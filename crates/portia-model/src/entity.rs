//! Editable entity record
//!
//! [`Entity<K>`] stores its fields in a JSON object map and announces every
//! change through its observers. Dirty tracking is wired up at construction
//! by subscribing the dirty flag to each of `K::SERIALIZED_PROPERTIES`.

use crate::error::{json_type_name, ModelError};
use crate::kind::EntityKind;
use crate::normalize::normalize_arrays;
use crate::observe::{ChangeKind, DirtyFlag, FieldChange, ObserverId, Observers};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

/// Mutable record of one entity kind
///
/// # Invariants
/// - Every field in `K::ARRAY_PROPERTIES` holds a list after construction
/// - The dirty flag is set by any change to a serialized property,
///   including a change to the contents of a serialized list
/// - `id` and `project` are identity, not payload; they are never
///   serialized
pub struct Entity<K: EntityKind> {
    id: Option<String>,
    project: Option<String>,
    fields: Map<String, Value>,
    dirty: DirtyFlag,
    observers: Observers,
    _kind: PhantomData<K>,
}

impl<K: EntityKind> Entity<K> {
    /// Create a fresh entity with the kind's defaults
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(None, None, K::defaults())
    }

    /// Build an entity from its server representation
    ///
    /// `id` and `project` keys are lifted out of the field map. Fields the
    /// server omitted take the kind's defaults.
    ///
    /// # Errors
    /// Returns `ModelError::NotAnObject` if `value` is not a JSON object
    pub fn from_wire(value: Value) -> Result<Self, ModelError> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(ModelError::NotAnObject {
                    type_id: K::TYPE_ID,
                    found: json_type_name(&other),
                })
            }
        };

        let id = fields.remove("id").as_ref().and_then(reference_id);
        let project = fields.remove("project").as_ref().and_then(reference_id);

        for (key, default) in K::defaults() {
            fields.entry(key).or_insert(default);
        }

        Ok(Self::assemble(id, project, fields))
    }

    fn assemble(id: Option<String>, project: Option<String>, mut fields: Map<String, Value>) -> Self {
        // Lists first: observers must only ever see normalized fields.
        normalize_arrays(&mut fields, K::ARRAY_PROPERTIES);

        let mut entity = Self {
            id,
            project,
            fields,
            dirty: DirtyFlag::new(),
            observers: Observers::default(),
            _kind: PhantomData,
        };

        for &prop in K::SERIALIZED_PROPERTIES {
            let dirty = entity.dirty.clone();
            entity
                .observers
                .subscribe(Some(prop.to_owned()), Box::new(move |_| dirty.set()));
        }

        tracing::debug!(
            type_id = K::TYPE_ID,
            id = entity.id.as_deref().unwrap_or("<new>"),
            "entity constructed"
        );
        entity
    }

    /// With server-assigned id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With owning project reference
    #[inline]
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Entity type identifier
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> &'static str {
        K::TYPE_ID
    }

    /// Server-assigned stable identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Id of the owning project
    #[inline]
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[inline]
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    #[inline]
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Contents of a list field, `None` if the field holds no list
    #[inline]
    #[must_use]
    pub fn get_list(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_array).map(Vec::as_slice)
    }

    /// Read-only view of all fields
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Replace a field value
    ///
    /// Observers are notified only when the stored value actually changes.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        let value = value.into();
        if self.fields.get(field) == Some(&value) {
            return;
        }
        self.fields.insert(field.to_owned(), value);
        self.notify(field, ChangeKind::Replaced);
    }

    /// Mutate the contents of a list field in place
    ///
    /// An absent or `null` field is seen by `f` as an empty list and is only
    /// stored once `f` leaves something in it. Observers are notified when
    /// the contents differ after `f` returns.
    ///
    /// # Errors
    /// Returns `ModelError::NotAList` if the field holds a non-list value
    pub fn edit_list<R>(
        &mut self,
        field: &str,
        f: impl FnOnce(&mut Vec<Value>) -> R,
    ) -> Result<R, ModelError> {
        if matches!(self.fields.get(field), None | Some(Value::Null)) {
            let mut items = Vec::new();
            let out = f(&mut items);
            if !items.is_empty() {
                self.fields.insert(field.to_owned(), Value::Array(items));
                self.notify(field, ChangeKind::ListContents);
            }
            return Ok(out);
        }

        let Some(Value::Array(items)) = self.fields.get_mut(field) else {
            return Err(ModelError::NotAList {
                field: field.to_owned(),
            });
        };

        let before = items.clone();
        let out = f(&mut *items);
        let changed = *items != before;

        if changed {
            self.notify(field, ChangeKind::ListContents);
        }
        Ok(out)
    }

    /// Observe changes to one field
    pub fn on_field_changed(
        &mut self,
        field: &str,
        callback: impl FnMut(&FieldChange) + Send + 'static,
    ) -> ObserverId {
        self.observers
            .subscribe(Some(field.to_owned()), Box::new(callback))
    }

    /// Observe changes to every field
    pub fn on_any_field_changed(
        &mut self,
        callback: impl FnMut(&FieldChange) + Send + 'static,
    ) -> ObserverId {
        self.observers.subscribe(None, Box::new(callback))
    }

    /// Remove an observer; returns false if it was already gone
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// True once any serialized property has changed
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    /// Reset the dirty flag, e.g. after a successful save
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    fn notify(&mut self, field: &str, kind: ChangeKind) {
        tracing::trace!(type_id = K::TYPE_ID, field, ?kind, "field changed");
        self.observers.notify(&FieldChange {
            field: field.to_owned(),
            kind,
        });
    }
}

impl<K: EntityKind> Default for Entity<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> fmt::Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("type_id", &K::TYPE_ID)
            .field("id", &self.id)
            .field("project", &self.project)
            .field("dirty", &self.dirty.is_set())
            .field("fields", &self.fields)
            .field("observers", &self.observers)
            .finish()
    }
}

/// Id carried by a reference value: a string, a number, or an object with
/// an `id` key
pub(crate) fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("id").and_then(reference_id),
        _ => None,
    }
}
