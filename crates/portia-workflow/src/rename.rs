//! Optimistic spider rename
//!
//! The UI writes the candidate name into the spider before calling
//! [`RenameCoordinator::rename`]. The coordinator then:
//!
//! 1. validates the name (warning + abort, no request)
//! 2. captures the pre-rename id and project
//! 3. starts the saving notification
//! 4. POSTs `{"name": ...}` to the rename endpoint of the *old* id
//! 5. on success, hands a [`RenameConfirmation`] to the commit callback
//! 6. on failure, shows an error and resets the name to the spider's id
//! 7. ends the saving notification, whichever branch ran
//!
//! Overlapping renames of one `Spider` value are excluded by the `&mut`
//! borrow held across the request. Renames of distinct values that share an
//! id are rejected while one is in flight.

use crate::config::RenameConfig;
use crate::error::{RenameError, TransportError};
use crate::notify::{Notifier, SavingGuard};
use crate::state::{RenameRun, RenameState};
use crate::transport::{Transport, TransportRequest};
use crate::validate::validate_spider_name;
use parking_lot::Mutex;
use portia_model::Spider;
use serde_json::{json, Value};
use std::collections::HashSet;

/// Data handed to the commit callback after the server confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct RenameConfirmation {
    pub project_id: String,
    /// Id the request targeted, captured before it was sent
    pub old_id: String,
    pub new_name: String,
    /// Decoded server response
    pub response: Value,
}

/// Finalizes a confirmed rename in whatever store holds the spider
pub trait CommitRename {
    fn commit(self, confirmation: RenameConfirmation);
}

impl<F: FnOnce(RenameConfirmation)> CommitRename for F {
    fn commit(self, confirmation: RenameConfirmation) {
        self(confirmation);
    }
}

/// How a rename invocation ended
///
/// Every failure has already been surfaced through the notifier; the
/// outcome is informational.
#[derive(Debug, Clone, PartialEq)]
pub enum RenameOutcome {
    /// Server confirmed; commit callback ran
    Committed { old_id: String, new_name: String },
    /// Request failed; name reset to `id`
    RolledBack { id: String, error: TransportError },
    /// Abandoned before any request
    Rejected(RenameError),
}

impl RenameOutcome {
    /// Final workflow state
    #[must_use]
    pub fn state(&self) -> RenameState {
        match self {
            Self::Committed { .. } => RenameState::Committed,
            Self::RolledBack { .. } => RenameState::RolledBack,
            Self::Rejected(_) => RenameState::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Runs renames against one transport and notifier
pub struct RenameCoordinator<T: Transport, N: Notifier> {
    transport: T,
    notifier: N,
    config: RenameConfig,
    /// Spider ids with a request in flight
    pending: Mutex<HashSet<String>>,
}

impl<T: Transport, N: Notifier> RenameCoordinator<T, N> {
    /// Create new coordinator
    #[must_use]
    pub fn new(transport: T, notifier: N, config: RenameConfig) -> Self {
        Self {
            transport,
            notifier,
            config,
            pending: Mutex::new(HashSet::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Check if a rename of `spider_id` is awaiting confirmation
    #[must_use]
    pub fn is_pending(&self, spider_id: &str) -> bool {
        self.pending.lock().contains(spider_id)
    }

    /// Confirm the name already written into `spider`
    ///
    /// See the module docs for the full sequence. Suspends only while the
    /// transport request is in flight.
    pub async fn rename<C: CommitRename>(&self, spider: &mut Spider, commit: C) -> RenameOutcome {
        let mut run = RenameRun::new();

        run.advance(RenameState::Validating);
        let new_name = spider.name().unwrap_or_default().to_owned();
        if let Err(err) = validate_spider_name(&new_name) {
            tracing::warn!(name = %new_name, "rejected spider name");
            self.notifier.show_warning(&err.to_string());
            run.advance(RenameState::Idle);
            return RenameOutcome::Rejected(err);
        }

        run.advance(RenameState::Applying);
        let (project_id, old_id) = match (spider.project_id(), spider.id()) {
            (Some(project), Some(id)) => (project.to_owned(), id.to_owned()),
            _ => {
                let err = RenameError::MissingIdentity;
                self.notifier.show_error(&err.to_string());
                run.advance(RenameState::Idle);
                return RenameOutcome::Rejected(err);
            }
        };

        let Some(_claim) = PendingClaim::acquire(&self.pending, &old_id) else {
            let err = RenameError::RenamePending { id: old_id };
            tracing::warn!("{err}");
            self.notifier.show_warning(&err.to_string());
            run.advance(RenameState::Idle);
            return RenameOutcome::Rejected(err);
        };

        let request = TransportRequest::post_json(
            self.config.rename_url(&project_id, &old_id),
            self.config.content_type.clone(),
            &json!({ "name": new_name }),
        );

        tracing::info!(project = %project_id, spider = %old_id, name = %new_name, "renaming spider");
        let saving = SavingGuard::start(&self.notifier);
        run.advance(RenameState::AwaitingConfirmation);

        let outcome = match self.transport.send(request).await {
            Ok(response) => {
                run.advance(RenameState::Committed);
                tracing::info!(spider = %old_id, name = %new_name, "rename confirmed");
                commit.commit(RenameConfirmation {
                    project_id,
                    old_id: old_id.clone(),
                    new_name: new_name.clone(),
                    response,
                });
                RenameOutcome::Committed { old_id, new_name }
            }
            Err(error) => {
                run.advance(RenameState::RolledBack);
                tracing::warn!(spider = %old_id, %error, "rename failed, rolling back");
                self.notifier
                    .show_error(&format!("Renaming the spider '{old_id}' failed."));
                // Reverts to the stable id, not to the previous display name.
                spider.set_name(old_id.clone());
                RenameOutcome::RolledBack { id: old_id, error }
            }
        };

        saving.finish();
        debug_assert_eq!(run.state(), outcome.state());
        outcome
    }
}

impl<T: Transport, N: Notifier> std::fmt::Debug for RenameCoordinator<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenameCoordinator")
            .field("config", &self.config)
            .field("pending", &*self.pending.lock())
            .finish_non_exhaustive()
    }
}

/// Membership of one id in the pending set, released on drop
struct PendingClaim<'a> {
    pending: &'a Mutex<HashSet<String>>,
    id: String,
}

impl<'a> PendingClaim<'a> {
    fn acquire(pending: &'a Mutex<HashSet<String>>, id: &str) -> Option<Self> {
        if pending.lock().insert(id.to_owned()) {
            Some(Self {
                pending,
                id: id.to_owned(),
            })
        } else {
            None
        }
    }
}

impl Drop for PendingClaim<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.id);
    }
}
