//! Notification collaborator
//!
//! The saving indicator is a paired `start()`/`end()`; [`SavingGuard`]
//! ties `end()` to a scope so it runs exactly once on every exit path,
//! including a dropped future.

use std::sync::Arc;

/// User-facing notifications
pub trait Notifier: Send + Sync {
    /// Saving indicator on
    fn start(&self);
    /// Saving indicator off
    fn end(&self);
    fn show_warning(&self, message: &str);
    fn show_error(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn start(&self) {
        (**self).start();
    }

    fn end(&self) {
        (**self).end();
    }

    fn show_warning(&self, message: &str) {
        (**self).show_warning(message);
    }

    fn show_error(&self, message: &str) {
        (**self).show_error(message);
    }
}

/// Scoped saving notification
///
/// # Invariants
/// - `start()` is called once, in [`SavingGuard::start`]
/// - `end()` is called once, when the guard is dropped
#[must_use = "dropping the guard ends the saving notification immediately"]
pub struct SavingGuard<'a, N: Notifier + ?Sized> {
    notifier: &'a N,
}

impl<'a, N: Notifier + ?Sized> SavingGuard<'a, N> {
    pub fn start(notifier: &'a N) -> Self {
        notifier.start();
        Self { notifier }
    }

    /// End the notification now
    #[inline]
    pub fn finish(self) {
        drop(self);
    }
}

impl<N: Notifier + ?Sized> Drop for SavingGuard<'_, N> {
    fn drop(&mut self) {
        self.notifier.end();
    }
}

/// Notifier that reports through `tracing`
///
/// Used by the command-line tool, where there is no notification UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn start(&self) {
        tracing::info!("saving...");
    }

    fn end(&self) {
        tracing::info!("saving done");
    }

    fn show_warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn show_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
