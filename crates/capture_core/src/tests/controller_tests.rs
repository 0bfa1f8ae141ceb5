use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shared::error::CaptureErrorKind;
use tokio::sync::Notify;

const INTERVAL: Duration = Duration::from_millis(4000);

struct ScriptedEndpoint {
    calls: AtomicUsize,
    emails: Mutex<Vec<String>>,
    outcome: Result<(), CaptureError>,
    gated_email: Option<String>,
    entered: Notify,
    release: Notify,
}

impl ScriptedEndpoint {
    fn succeeding() -> Self {
        Self::with_outcome(Ok(()))
    }

    fn with_outcome(outcome: Result<(), CaptureError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            emails: Mutex::new(Vec::new()),
            outcome,
            gated_email: None,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Requests for `email` park until `release` is notified.
    fn gating(mut self, email: &str) -> Self {
        self.gated_email = Some(email.to_string());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionEndpoint for ScriptedEndpoint {
    async fn subscribe(&self, email: &str) -> Result<(), CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.emails.lock().await.push(email.to_string());
        if self.gated_email.as_deref() == Some(email) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.outcome.clone()
    }
}

fn controller_over(endpoint: &Arc<ScriptedEndpoint>) -> Arc<SubscriptionFormController> {
    let endpoint: Arc<dyn SubscriptionEndpoint> = endpoint.clone();
    Arc::new(SubscriptionFormController::new(endpoint, INTERVAL))
}

#[tokio::test]
async fn invalid_input_alerts_without_network_call() {
    let endpoint = Arc::new(ScriptedEndpoint::succeeding());
    let controller = controller_over(&endpoint);
    let mut events = controller.subscribe_events();

    for input in ["", "not-an-email"] {
        controller.update_input(SessionSlot::Primary, input).await;
        let err = controller
            .submit(SessionSlot::Primary)
            .await
            .expect_err("validation");
        assert_eq!(err.kind(), CaptureErrorKind::Validation);

        let event = events.recv().await.expect("event");
        assert!(matches!(
            event,
            CaptureEvent::Alert {
                slot: SessionSlot::Primary,
                error: CaptureError::Validation(_)
            }
        ));
    }

    assert_eq!(endpoint.calls(), 0);
    let snapshot = controller.snapshot(SessionSlot::Primary).await;
    assert_eq!(snapshot.status, CaptureStatus::Idle);
    assert_eq!(snapshot.input_value, "not-an-email");
}

#[tokio::test]
async fn valid_input_issues_exactly_one_call() {
    let endpoint = Arc::new(ScriptedEndpoint::succeeding());
    let controller = controller_over(&endpoint);

    controller
        .update_input(SessionSlot::Primary, "someone@example.com")
        .await;
    let outcome = controller
        .submit(SessionSlot::Primary)
        .await
        .expect("subscribed");

    let SubmitOutcome::Subscribed(report) = outcome else {
        panic!("expected subscription, got {outcome:?}");
    };
    assert_eq!(report.slot, SessionSlot::Primary);
    assert_eq!(endpoint.calls(), 1);
    assert_eq!(*endpoint.emails.lock().await, vec!["someone@example.com"]);
}

#[tokio::test]
async fn second_submit_is_ignored_while_first_is_in_flight() {
    let endpoint = Arc::new(ScriptedEndpoint::succeeding().gating("slow@example.com"));
    let controller = controller_over(&endpoint);
    controller
        .update_input(SessionSlot::Primary, "slow@example.com")
        .await;

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit(SessionSlot::Primary).await }
    });
    endpoint.entered.notified().await;

    let second = controller
        .submit(SessionSlot::Primary)
        .await
        .expect("ignored");
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(
        controller.snapshot(SessionSlot::Primary).await.status,
        CaptureStatus::Submitting
    );

    endpoint.release.notify_one();
    let first = first.await.expect("join").expect("subscribed");
    assert!(matches!(first, SubmitOutcome::Subscribed(_)));
    assert_eq!(endpoint.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn success_clears_input_then_reverts_after_interval() {
    let endpoint = Arc::new(ScriptedEndpoint::succeeding());
    let controller = controller_over(&endpoint);
    let mut events = controller.subscribe_events();

    controller
        .update_input(SessionSlot::Secondary, "someone@example.com")
        .await;
    controller
        .submit(SessionSlot::Secondary)
        .await
        .expect("subscribed");

    let snapshot = controller.snapshot(SessionSlot::Secondary).await;
    assert_eq!(snapshot.input_value, "");
    assert_eq!(snapshot.status, CaptureStatus::Succeeded);

    tokio::time::sleep(INTERVAL - Duration::from_millis(1)).await;
    assert_eq!(
        controller.snapshot(SessionSlot::Secondary).await.status,
        CaptureStatus::Succeeded
    );

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(
        controller.snapshot(SessionSlot::Secondary).await.status,
        CaptureStatus::Idle
    );

    let mut statuses = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let CaptureEvent::StatusChanged { status, .. } = event {
            statuses.push(status);
        }
    }
    assert_eq!(
        statuses,
        vec![
            CaptureStatus::Submitting,
            CaptureStatus::Succeeded,
            CaptureStatus::Idle
        ]
    );
}

#[tokio::test]
async fn remote_failure_returns_to_idle_and_keeps_input() {
    let endpoint = Arc::new(ScriptedEndpoint::with_outcome(Err(
        CaptureError::Submission("Submission failed".to_string()),
    )));
    let controller = controller_over(&endpoint);
    let mut events = controller.subscribe_events();

    controller
        .update_input(SessionSlot::Primary, "someone@example.com")
        .await;
    let err = controller
        .submit(SessionSlot::Primary)
        .await
        .expect_err("failure");
    assert_eq!(err.kind(), CaptureErrorKind::Submission);

    let snapshot = controller.snapshot(SessionSlot::Primary).await;
    assert_eq!(snapshot.status, CaptureStatus::Idle);
    assert_eq!(snapshot.input_value, "someone@example.com");

    let mut saw_alert = false;
    while let Ok(event) = events.try_recv() {
        saw_alert |= matches!(
            event,
            CaptureEvent::Alert {
                slot: SessionSlot::Primary,
                error: CaptureError::Submission(_)
            }
        );
    }
    assert!(saw_alert);
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let endpoint = Arc::new(ScriptedEndpoint::succeeding().gating("slow@example.com"));
    let controller = controller_over(&endpoint);
    controller
        .update_input(SessionSlot::Primary, "slow@example.com")
        .await;
    controller
        .update_input(SessionSlot::Secondary, "fast@example.com")
        .await;

    let primary = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit(SessionSlot::Primary).await }
    });
    endpoint.entered.notified().await;

    let secondary_before = controller.snapshot(SessionSlot::Secondary).await;
    assert_eq!(secondary_before.status, CaptureStatus::Idle);
    assert_eq!(secondary_before.input_value, "fast@example.com");

    let secondary = controller
        .submit(SessionSlot::Secondary)
        .await
        .expect("secondary subscribed");
    assert!(matches!(secondary, SubmitOutcome::Subscribed(_)));
    assert_eq!(
        controller.snapshot(SessionSlot::Primary).await,
        SessionSnapshot {
            slot: SessionSlot::Primary,
            input_value: "slow@example.com".to_string(),
            status: CaptureStatus::Submitting,
        }
    );

    endpoint.release.notify_one();
    primary.await.expect("join").expect("primary subscribed");
    assert_eq!(endpoint.calls(), 2);
    assert_eq!(
        controller.snapshot(SessionSlot::Primary).await.status,
        CaptureStatus::Succeeded
    );
}
