//! Portia Entity Models
//!
//! Editable records behind the spider editor.
//!
//! # Core Concepts
//!
//! - [`Entity<K>`]: JSON-backed mutable record for one [`EntityKind`]
//! - [`Spider`] / [`ItemField`]: the concrete kinds the editor edits
//! - Dirty tracking: every serialized property is observed, and any change
//!   (including list contents) marks the entity dirty
//! - [`Serializable`]: produces the wire payload with UI-only keys stripped
//! - Login fields: derived accessors over the spider's `init_requests` list
//!
//! # Example
//!
//! ```rust
//! use portia_model::{Spider, Serializable};
//!
//! let mut spider = Spider::new();
//! assert!(spider.get_list("start_urls").unwrap().is_empty());
//!
//! spider.set_perform_login(true).unwrap();
//! spider.set_login_url("https://example.com/login").unwrap();
//! assert!(spider.is_dirty());
//!
//! let payload = Serializable::serialize(&spider);
//! assert_eq!(payload["init_requests"][0]["loginurl"], "https://example.com/login");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod entity;
mod error;
mod item_field;
mod kind;
mod normalize;
mod observe;
mod serialize;
mod spider;

/// Derived login accessors over `init_requests`
pub mod login;

// Re-exports
pub use entity::Entity;
pub use error::ModelError;
pub use item_field::{ItemField, ItemFieldKind};
pub use kind::{EntityKind, RelationKind};
pub use login::InitRequest;
pub use normalize::{is_falsy, normalize_arrays};
pub use observe::{ChangeKind, DirtyFlag, FieldChange, ObserverId};
pub use serialize::{DirtyTrackable, Serializable};
pub use spider::{Spider, SpiderKind};

/// Sealed trait support for the entity kinds.
/// **Note:** This is only for internal/testing use and may change.
#[doc(hidden)]
pub mod __private {
    pub use super::kind::private::Sealed;
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for editing entities
    pub use crate::{
        DirtyTrackable, Entity, EntityKind, InitRequest, ItemField, ModelError, Serializable,
        Spider,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
