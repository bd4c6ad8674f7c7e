//! Portia Workflow
//!
//! The optimistic rename workflow and the collaborators it talks to.
//!
//! # Overview
//!
//! - [`RenameCoordinator`]: validate, confirm remotely, then commit or roll back
//! - [`Transport`]: sends the confirming request ([`HttpTransport`] over HTTP)
//! - [`Notifier`]: saving indicator and user-visible warnings/errors
//! - [`SavingGuard`]: pairs every saving `start()` with exactly one `end()`
//! - [`EditorConfig`]: backend location and rename endpoint settings
//!
//! # Example
//!
//! ```rust,ignore
//! use portia_workflow::{EditorConfig, HttpTransport, RenameCoordinator, TracingNotifier};
//! use portia_model::Spider;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = EditorConfig::load("portia.toml")?;
//! let transport = HttpTransport::new(&config.base_url);
//! let coordinator = RenameCoordinator::new(transport, TracingNotifier, config.rename);
//!
//! let mut spider = Spider::new().with_id("s1").with_project("p1");
//! spider.set_name("s1-renamed");
//! let outcome = coordinator.rename(&mut spider, |confirmed| {
//!     println!("renamed {} -> {}", confirmed.old_id, confirmed.new_name);
//! }).await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod notify;
pub mod rename;
pub mod state;
pub mod transport;
pub mod validate;

// Re-exports
pub use config::{EditorConfig, RenameConfig};
pub use error::{ConfigError, RenameError, TransportError};
pub use http::HttpTransport;
pub use notify::{Notifier, SavingGuard, TracingNotifier};
pub use rename::{CommitRename, RenameConfirmation, RenameCoordinator, RenameOutcome};
pub use state::{allowed_transitions, validate_transition, RenameState};
pub use transport::{Method, Transport, TransportRequest};
pub use validate::{validate_spider_name, INVALID_NAME_MESSAGE};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running renames
    pub use crate::{
        EditorConfig, Notifier, RenameConfig, RenameCoordinator, RenameOutcome, Transport,
        TransportRequest,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
