use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use capture_core::{
    load_settings, load_settings_from, FormEndpointClient, SubmitOutcome,
    SubscriptionFormController,
};
use chrono::Local;
use clap::Parser;
use futures::future::join_all;
use shared::{domain::SessionSlot, error::CaptureError};

#[derive(Parser, Debug)]
#[command(about = "Submit addresses to the early-access mailing list")]
struct Args {
    /// Address for the primary capture form.
    #[arg(long)]
    email: String,
    /// Address for the secondary capture form, submitted concurrently.
    #[arg(long)]
    secondary_email: Option<String>,
    /// Settings file; defaults to ./landing.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured form action url.
    #[arg(long)]
    form_action: Option<String>,
}

fn describe(slot: SessionSlot, result: &Result<SubmitOutcome, CaptureError>) -> String {
    match result {
        Ok(SubmitOutcome::Subscribed(report)) => format!(
            "{slot}: you're on the list ({} at {})",
            report.submission_id,
            report
                .completed_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        ),
        Ok(SubmitOutcome::Ignored) => format!("{slot}: submission already in flight"),
        Err(err) => format!("{slot}: {} ({})", err.user_message(), err.detail()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => {
            load_settings_from(Some(path.as_path()), |name| std::env::var(name).ok())?
        }
        None => load_settings()?,
    };
    if let Some(form_action) = args.form_action {
        settings.form_action = form_action;
        settings.validate()?;
    }
    tracing::info!(form_action = %settings.form_action, "using subscription endpoint");

    let endpoint = Arc::new(FormEndpointClient::new(&settings)?);
    let controller = Arc::new(SubscriptionFormController::new(
        endpoint,
        settings.success_display_interval(),
    ));

    let mut slots = vec![SessionSlot::Primary];
    controller.update_input(SessionSlot::Primary, args.email).await;
    if let Some(secondary) = args.secondary_email {
        controller
            .update_input(SessionSlot::Secondary, secondary)
            .await;
        slots.push(SessionSlot::Secondary);
    }

    let results = join_all(slots.iter().map(|&slot| {
        let controller = controller.clone();
        async move { (slot, controller.submit(slot).await) }
    }))
    .await;

    let mut failures = 0;
    for (slot, result) in &results {
        println!("{}", describe(*slot, result));
        if result.is_err() {
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} submissions failed", results.len());
    }
    Ok(())
}
