//! Functional tests for the optimistic rename workflow.
//!
//! Each test drives `RenameCoordinator::rename` with recording collaborators
//! and checks the externally visible contract:
//! - which request (if any) reached the transport
//! - which notifications the user saw
//! - what the spider's name is afterwards
//! - that the saving notification is ended exactly once per invocation

use mockall::mock;
use portia_test_utils::{
    spider_fixture, NotificationEvent, RecordingCommit, RecordingNotifier, ScriptedTransport,
};
use portia_workflow::{
    Method, RenameConfig, RenameCoordinator, RenameError, RenameOutcome, RenameState, Transport,
    TransportError, TransportRequest, INVALID_NAME_MESSAGE,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn coordinator(
    transport: &Arc<ScriptedTransport>,
    notifier: &Arc<RecordingNotifier>,
) -> RenameCoordinator<Arc<ScriptedTransport>, Arc<RecordingNotifier>> {
    RenameCoordinator::new(
        Arc::clone(transport),
        Arc::clone(notifier),
        RenameConfig::default(),
    )
}

/// Tenet: a valid name is confirmed against the *old* id and committed.
#[tokio::test]
async fn rename_success_commits_and_ends_once() {
    let transport = ScriptedTransport::succeeding();
    let notifier = RecordingNotifier::new();
    let commits = RecordingCommit::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = spider_fixture("p1", "s1", "s1-renamed");
    let outcome = coordinator.rename(&mut spider, commits.callback()).await;

    assert_eq!(
        outcome,
        RenameOutcome::Committed {
            old_id: "s1".into(),
            new_name: "s1-renamed".into(),
        }
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].url, "api/projects/p1/spiders/s1/rename");
    assert_eq!(requests[0].content_type, "application/json; charset=UTF-8");
    assert_eq!(requests[0].body, r#"{"name":"s1-renamed"}"#);

    let confirmations = commits.confirmations();
    assert_eq!(confirmations.len(), 1);
    assert_eq!(confirmations[0].old_id, "s1");
    assert_eq!(confirmations[0].project_id, "p1");
    assert_eq!(confirmations[0].new_name, "s1-renamed");

    assert_eq!(
        notifier.events(),
        vec![NotificationEvent::Start, NotificationEvent::End]
    );
    assert_eq!(spider.name(), Some("s1-renamed"));
    assert!(!coordinator.is_pending("s1"));
}

/// Tenet: a rejected request rolls the name back to the id, not the old name.
#[tokio::test]
async fn rename_failure_rolls_back_to_id() {
    let error = TransportError::Status {
        code: 400,
        body: "name taken".into(),
    };
    let transport = ScriptedTransport::failing(error.clone());
    let notifier = RecordingNotifier::new();
    let commits = RecordingCommit::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = spider_fixture("p1", "s1", "s1-renamed");
    let outcome = coordinator.rename(&mut spider, commits.callback()).await;

    assert_eq!(
        outcome,
        RenameOutcome::RolledBack {
            id: "s1".into(),
            error,
        }
    );
    assert_eq!(outcome.state(), RenameState::RolledBack);
    assert_eq!(spider.name(), Some("s1"));
    assert!(commits.confirmations().is_empty());
    assert_eq!(
        notifier.events(),
        vec![
            NotificationEvent::Start,
            NotificationEvent::Error("Renaming the spider 's1' failed.".into()),
            NotificationEvent::End,
        ]
    );
}

#[tokio::test]
async fn rollback_ignores_previous_display_name() {
    let transport = ScriptedTransport::failing(TransportError::Request("offline".into()));
    let notifier = RecordingNotifier::new();
    let coordinator = coordinator(&transport, &notifier);

    // Displayed name drifted from the id in an earlier confirmed rename.
    let mut spider = spider_fixture("p1", "s1", "shop");
    spider.set_name("shop-v2");
    coordinator.rename(&mut spider, |_| {}).await;

    assert_eq!(spider.name(), Some("s1"));
}

/// Tenet: invalid names never reach the transport.
#[tokio::test]
async fn invalid_name_warns_without_request() {
    let transport = ScriptedTransport::succeeding();
    let notifier = RecordingNotifier::new();
    let commits = RecordingCommit::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = spider_fixture("p1", "s1", "My Spider!");
    let outcome = coordinator.rename(&mut spider, commits.callback()).await;

    assert_eq!(
        outcome,
        RenameOutcome::Rejected(RenameError::InvalidName {
            name: "My Spider!".into()
        })
    );
    assert_eq!(outcome.state(), RenameState::Idle);
    assert!(transport.requests().is_empty());
    assert!(commits.confirmations().is_empty());
    assert_eq!(notifier.warnings(), vec![INVALID_NAME_MESSAGE.to_string()]);
    assert_eq!(notifier.starts(), 0);
    assert_eq!(notifier.ends(), 0);
    // The candidate stays in place for the user to fix.
    assert_eq!(spider.name(), Some("My Spider!"));
}

#[tokio::test]
async fn dotted_name_is_accepted() {
    let transport = ScriptedTransport::succeeding();
    let notifier = RecordingNotifier::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = spider_fixture("p1", "s1", "spider_2.v1");
    let outcome = coordinator.rename(&mut spider, |_| {}).await;

    assert!(outcome.is_committed());
    assert_eq!(
        transport.requests()[0].json_body().unwrap(),
        json!({"name": "spider_2.v1"})
    );
}

#[tokio::test]
async fn unsaved_spider_is_rejected() {
    let transport = ScriptedTransport::succeeding();
    let notifier = RecordingNotifier::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = portia_model::Spider::new();
    spider.set_name("fresh");
    let outcome = coordinator.rename(&mut spider, |_| {}).await;

    assert_eq!(outcome, RenameOutcome::Rejected(RenameError::MissingIdentity));
    assert!(transport.requests().is_empty());
    assert_eq!(notifier.errors().len(), 1);
    assert_eq!(notifier.ends(), 0);
}

/// Tenet: while a rename of an id is in flight, a second one is refused.
#[tokio::test]
async fn overlapping_rename_of_same_id_is_rejected() {
    let transport = ScriptedTransport::gated();
    let notifier = RecordingNotifier::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut first = spider_fixture("p1", "s1", "alpha");
    let mut second = spider_fixture("p1", "s1", "beta");

    let (first_outcome, second_outcome, ()) = tokio::join!(
        coordinator.rename(&mut first, |_| {}),
        coordinator.rename(&mut second, |_| {}),
        async {
            tokio::task::yield_now().await;
            transport.release();
        },
    );

    assert!(first_outcome.is_committed());
    assert_eq!(
        second_outcome,
        RenameOutcome::Rejected(RenameError::RenamePending { id: "s1".into() })
    );
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(notifier.starts(), 1);
    assert_eq!(notifier.ends(), 1);
    assert!(!coordinator.is_pending("s1"));
}

mock! {
    pub Backend {}

    #[async_trait::async_trait]
    impl Transport for Backend {
        async fn send(&self, request: TransportRequest) -> Result<Value, TransportError>;
    }
}

/// Tenet: `end()` runs exactly once on every branch, verified by fault
/// injection on the transport.
#[tokio::test]
async fn end_is_called_once_under_fault_injection() {
    let faults = [
        None,
        Some(TransportError::Status {
            code: 500,
            body: String::new(),
        }),
        Some(TransportError::Request("connection reset".into())),
        Some(TransportError::Decode("unexpected token".into())),
        Some(TransportError::Worker("cancelled".into())),
    ];

    for fault in faults {
        let mut backend = MockBackend::new();
        let expected_fault = fault.clone();
        backend
            .expect_send()
            .withf(|req| req.url == "api/projects/p1/spiders/s1/rename")
            .times(1)
            .returning(move |_| match &expected_fault {
                None => Ok(json!({"id": "s1-renamed"})),
                Some(err) => Err(err.clone()),
            });

        let notifier = RecordingNotifier::new();
        let coordinator =
            RenameCoordinator::new(backend, Arc::clone(&notifier), RenameConfig::default());

        let mut spider = spider_fixture("p1", "s1", "s1-renamed");
        let outcome = coordinator.rename(&mut spider, |_| {}).await;

        assert_eq!(notifier.starts(), 1, "fault {fault:?}");
        assert_eq!(notifier.ends(), 1, "fault {fault:?}");
        assert_eq!(notifier.events().last(), Some(&NotificationEvent::End));
        assert_eq!(outcome.is_committed(), fault.is_none());
    }
}

#[tokio::test]
async fn commit_receives_server_response() {
    let transport = Arc::new(
        ScriptedTransport::default().then(Ok(json!({"id": "s1-renamed", "name": "s1-renamed"}))),
    );
    let notifier = RecordingNotifier::new();
    let commits = RecordingCommit::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = spider_fixture("p1", "s1", "s1-renamed");
    coordinator.rename(&mut spider, commits.callback()).await;

    assert_eq!(
        commits.confirmations()[0].response,
        json!({"id": "s1-renamed", "name": "s1-renamed"})
    );
}

#[tokio::test]
async fn custom_api_root_is_used() {
    let transport = ScriptedTransport::succeeding();
    let notifier = RecordingNotifier::new();
    let coordinator = RenameCoordinator::new(
        Arc::clone(&transport),
        Arc::clone(&notifier),
        RenameConfig::new().with_api_root("portia/api"),
    );

    let mut spider = spider_fixture("proj", "books", "books2");
    coordinator.rename(&mut spider, |_| {}).await;

    assert_eq!(
        transport.requests()[0].url,
        "portia/api/projects/proj/spiders/books/rename"
    );
}

#[tokio::test]
async fn rename_does_not_touch_dirty_state() {
    let transport = ScriptedTransport::failing(TransportError::Request("offline".into()));
    let notifier = RecordingNotifier::new();
    let coordinator = coordinator(&transport, &notifier);

    let mut spider = spider_fixture("p1", "s1", "s1-renamed");
    coordinator.rename(&mut spider, |_| {}).await;

    // `name` is identity, not payload.
    assert!(!spider.is_dirty());
}
