use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use crossbeam_channel::bounded;
use shared::{
    domain::{SessionSlot, SubmissionId},
    error::{CaptureError, CaptureErrorKind},
};

struct CountingEndpoint {
    calls: AtomicUsize,
    outcome: Result<(), CaptureError>,
}

#[async_trait]
impl SubscriptionEndpoint for CountingEndpoint {
    async fn subscribe(&self, _email: &str) -> Result<(), CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

fn deps_with(outcome: Result<(), CaptureError>) -> (BackendDeps, Arc<CountingEndpoint>) {
    let endpoint = Arc::new(CountingEndpoint {
        calls: AtomicUsize::new(0),
        outcome,
    });
    let deps = BackendDeps {
        endpoint: endpoint.clone(),
        http: reqwest::Client::new(),
    };
    (deps, endpoint)
}

#[tokio::test]
async fn subscribe_reports_outcome_for_the_same_submission() {
    let (deps, endpoint) = deps_with(Ok(()));
    let (ui_tx, ui_rx) = bounded(8);
    let submission_id = SubmissionId::new();

    handle_command(
        &deps,
        BackendCommand::Subscribe {
            slot: SessionSlot::Secondary,
            submission_id,
            email: "someone@example.com".to_string(),
        },
        &ui_tx,
    )
    .await;

    assert_eq!(endpoint.calls.load(Ordering::SeqCst), 1);
    match ui_rx.try_recv().expect("event") {
        UiEvent::SubscribeFinished {
            slot,
            submission_id: finished_id,
            outcome,
        } => {
            assert_eq!(slot, SessionSlot::Secondary);
            assert_eq!(finished_id, submission_id);
            assert_eq!(outcome, Ok(()));
        }
        _ => panic!("unexpected ui event"),
    }
}

#[tokio::test]
async fn subscribe_forwards_submission_errors() {
    let (deps, _endpoint) = deps_with(Err(CaptureError::Submission(
        "transport failure".to_string(),
    )));
    let (ui_tx, ui_rx) = bounded(8);

    handle_command(
        &deps,
        BackendCommand::Subscribe {
            slot: SessionSlot::Primary,
            submission_id: SubmissionId::new(),
            email: "someone@example.com".to_string(),
        },
        &ui_tx,
    )
    .await;

    match ui_rx.try_recv().expect("event") {
        UiEvent::SubscribeFinished { outcome, .. } => {
            let err = outcome.expect_err("failure");
            assert_eq!(err.kind(), CaptureErrorKind::Submission);
        }
        _ => panic!("unexpected ui event"),
    }
}

#[tokio::test]
async fn unreachable_gif_urls_report_failure_per_url() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let (deps, _endpoint) = deps_with(Ok(()));
    let (ui_tx, ui_rx) = bounded(8);
    let urls = vec![
        format!("http://{addr}/one.gif"),
        format!("http://{addr}/two.gif"),
    ];

    handle_command(&deps, BackendCommand::FetchGifs { urls: urls.clone() }, &ui_tx).await;

    let mut failed = Vec::new();
    while let Ok(event) = ui_rx.try_recv() {
        match event {
            UiEvent::GifFailed { url, reason } => {
                assert!(reason.contains("request failed"), "{reason}");
                failed.push(url);
            }
            _ => panic!("unexpected ui event"),
        }
    }
    assert_eq!(failed, urls);
}

#[tokio::test]
async fn full_ui_queue_drops_gif_events_without_blocking() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let (deps, _endpoint) = deps_with(Ok(()));
    let (ui_tx, ui_rx) = bounded(1);
    ui_tx
        .try_send(UiEvent::Info("queue filler".to_string()))
        .expect("fill queue");

    tokio::time::timeout(
        std::time::Duration::from_secs(5),
        handle_command(
            &deps,
            BackendCommand::FetchGifs {
                urls: vec![format!("http://{addr}/one.gif")],
            },
            &ui_tx,
        ),
    )
    .await
    .expect("gif fetch must not wait on a full ui queue");

    assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Info(_))));
    assert!(ui_rx.try_recv().is_err());
}

#[test]
fn media_events_report_delivery() {
    let (ui_tx, ui_rx) = bounded(1);
    let failed = |url: &str| UiEvent::GifFailed {
        url: url.to_string(),
        reason: "request failed".to_string(),
    };

    assert!(deliver_media_event(&ui_tx, failed("a")));
    assert!(!deliver_media_event(&ui_tx, failed("b")));
    drop(ui_rx);
    assert!(!deliver_media_event(&ui_tx, failed("c")));
}
