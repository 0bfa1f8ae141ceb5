//! Backend worker: owns the tokio runtime and serves commands from the UI queue.

use std::{sync::Arc, thread};

use anyhow::Context;
use capture_core::{EndpointSettings, FormEndpointClient, SubscriptionEndpoint};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use futures::future::join_all;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::media::{decode_gif, DecodedGif};

pub struct BackendDeps {
    pub endpoint: Arc<dyn SubscriptionEndpoint>,
    pub http: reqwest::Client,
}

impl BackendDeps {
    pub fn from_settings(settings: &EndpointSettings) -> anyhow::Result<Self> {
        let endpoint = FormEndpointClient::new(settings)?;
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build media http client")?;
        Ok(Self {
            endpoint: Arc::new(endpoint),
            http,
        })
    }
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: EndpointSettings,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        let deps = match BackendDeps::from_settings(&settings) {
            Ok(deps) => Arc::new(deps),
            Err(err) => {
                tracing::error!("failed to initialize backend clients: {err:#}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: {err:#}"
                )));
                return;
            }
        };

        tracing::info!(form_action = %settings.form_action, "backend worker ready");
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

        while let Ok(cmd) = cmd_rx.recv() {
            let deps = deps.clone();
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move { handle_command(&deps, cmd, &ui_tx).await });
        }
        tracing::info!("ui command queue closed; backend worker stopping");
    });
}

pub async fn handle_command(deps: &BackendDeps, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    match cmd {
        BackendCommand::Subscribe {
            slot,
            submission_id,
            email,
        } => {
            tracing::info!(%slot, %submission_id, "posting subscription");
            let outcome = deps.endpoint.subscribe(&email).await;
            if let Err(err) = &outcome {
                tracing::warn!(
                    %slot,
                    %submission_id,
                    detail = err.detail(),
                    "subscription failed"
                );
            }
            // Blocking send: a lost outcome would leave the form stuck in flight.
            let _ = ui_tx.send(UiEvent::SubscribeFinished {
                slot,
                submission_id,
                outcome,
            });
        }
        BackendCommand::FetchGifs { urls } => {
            for (url, result) in fetch_gifs(&deps.http, urls).await {
                let event = match result {
                    Ok(gif) => UiEvent::GifLoaded { url, gif },
                    Err(reason) => {
                        tracing::warn!(%url, "gif preload failed: {reason}");
                        UiEvent::GifFailed { url, reason }
                    }
                };
                deliver_media_event(ui_tx, event);
            }
        }
    }
}

/// Media events are best effort: a full UI queue drops them instead of parking a
/// runtime worker. The GIF stays on its placeholder.
fn deliver_media_event(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!("ui event queue full; dropping gif event");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

async fn fetch_gifs(
    http: &reqwest::Client,
    urls: Vec<String>,
) -> Vec<(String, Result<DecodedGif, String>)> {
    join_all(urls.into_iter().map(|url| async move {
        let result = fetch_gif(http, &url).await;
        (url, result)
    }))
    .await
}

async fn fetch_gif(http: &reqwest::Client, url: &str) -> Result<DecodedGif, String> {
    let bytes = http
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| format!("request failed: {err}"))?
        .bytes()
        .await
        .map_err(|err| format!("body read failed: {err}"))?;

    tokio::task::spawn_blocking(move || decode_gif(&bytes))
        .await
        .map_err(|err| format!("decode task failed: {err}"))?
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
