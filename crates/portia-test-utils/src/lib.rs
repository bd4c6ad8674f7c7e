//! Testing utilities for the Portia workspace
//!
//! Recording collaborators for fault injection, plus spider fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use portia_model::Spider;
use portia_workflow::{Notifier, RenameConfirmation, Transport, TransportError, TransportRequest};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// One call made on a [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Start,
    End,
    Warning(String),
    Error(String),
}

/// Notifier that records every call in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().clone()
    }

    pub fn starts(&self) -> usize {
        self.count(&NotificationEvent::Start)
    }

    pub fn ends(&self) -> usize {
        self.count(&NotificationEvent::End)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                NotificationEvent::Warning(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                NotificationEvent::Error(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, wanted: &NotificationEvent) -> usize {
        self.events.lock().iter().filter(|e| *e == wanted).count()
    }

    fn push(&self, event: NotificationEvent) {
        self.events.lock().push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn start(&self) {
        self.push(NotificationEvent::Start);
    }

    fn end(&self) {
        self.push(NotificationEvent::End);
    }

    fn show_warning(&self, message: &str) {
        self.push(NotificationEvent::Warning(message.to_owned()));
    }

    fn show_error(&self, message: &str) {
        self.push(NotificationEvent::Error(message.to_owned()));
    }
}

/// Transport that replays scripted responses and records requests
///
/// When the script runs dry, requests succeed with `Value::Null`. With a
/// gate installed, every request waits for [`ScriptedTransport::release`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
    gate: Option<Notify>,
}

impl ScriptedTransport {
    /// Every request succeeds
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The first request fails with `error`; later ones succeed
    pub fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self::default().then(Err(error)))
    }

    /// Requests block until released
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    /// Append a scripted response
    pub fn then(self, response: Result<Value, TransportError>) -> Self {
        self.script.lock().push_back(response);
        self
    }

    /// Let one gated request proceed
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        self.requests.lock().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.script.lock().pop_front().unwrap_or(Ok(Value::Null))
    }
}

/// Commit callback sink
#[derive(Debug, Clone, Default)]
pub struct RecordingCommit {
    confirmations: Arc<Mutex<Vec<RenameConfirmation>>>,
}

impl RecordingCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records into this sink
    pub fn callback(&self) -> impl FnOnce(RenameConfirmation) + Send + 'static {
        let sink = Arc::clone(&self.confirmations);
        move |confirmation| sink.lock().push(confirmation)
    }

    pub fn confirmations(&self) -> Vec<RenameConfirmation> {
        self.confirmations.lock().clone()
    }
}

/// Saved spider `id` in project `project`, displaying `name`
pub fn spider_fixture(project: &str, id: &str, name: &str) -> Spider {
    let mut spider = Spider::new().with_id(id).with_project(project);
    spider.set_name(name);
    spider
}
