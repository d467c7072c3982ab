use tokio::sync::watch;
use tokio::time::Duration;

use prediction_client::api::ApiClient;
use prediction_client::auth;
use prediction_client::config::AppConfig;
use prediction_client::metrics::init_metrics;
use prediction_client::models::{Credentials, Prediction};
use prediction_client::portfolio::PortfolioView;
use prediction_client::services::{run_live_poller, run_notification_poller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let metrics_handle = init_metrics()?;

    let config = AppConfig::from_env()?;
    tracing::info!(api = %config.api_base_url, "Starting prediction client");

    let client = ApiClient::from_config(&config)?;

    if config.has_login() {
        let creds = Credentials::Email {
            email: config.login_email.clone().unwrap_or_default(),
            password: config.login_password.clone().unwrap_or_default(),
        };
        match auth::login(&client, &creds).await {
            Ok(session) => tracing::info!(
                user_id = ?session.profile.as_ref().map(|p| p.user_id.as_str()),
                "Logged in"
            ),
            Err(e) => tracing::error!(error = %e, code = ?e.code(), "Login failed"),
        }
    } else {
        tracing::warn!("LOGIN_EMAIL/LOGIN_PASSWORD not set, running anonymously");
    }

    match client.list_events(None, None).await {
        Ok(resp) => {
            for event in &resp.events {
                let odds = match event.odds() {
                    Ok(stats) => format!("{:?}", stats.probabilities),
                    Err(e) => e.to_string(),
                };
                tracing::info!(event_id = %event.event_id, name = %event.name, %odds, "Event");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to list events"),
    }

    let Some(user_id) = client.session().user_id()? else {
        tracing::info!("No signed-in user, skipping portfolio and live polling");
        tracing::debug!(metrics = %metrics_handle.render(), "Metrics snapshot");
        return Ok(());
    };

    let mut portfolio = PortfolioView::new(user_id.clone());
    portfolio.load(&client).await;
    let data = portfolio.data();
    tracing::info!(
        available = %data.balance.available,
        total_pnl = %data.total_pnl(),
        positions = data.positions.len(),
        "Portfolio snapshot"
    );

    let (live_tx, mut live_rx) = watch::channel(Vec::<Prediction>::new());
    let (unread_tx, mut unread_rx) = watch::channel(0u64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let live_poller = tokio::spawn(run_live_poller(
        client.clone(),
        user_id.clone(),
        Duration::from_secs(config.live_poll_interval_secs),
        live_tx,
        shutdown_rx.clone(),
    ));
    let notification_poller = tokio::spawn(run_notification_poller(
        client.clone(),
        user_id,
        Duration::from_secs(config.notification_poll_interval_secs),
        unread_tx,
        shutdown_rx,
    ));

    let mut unread_open = true;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl-C received, shutting down");
                break;
            }
            changed = live_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let live = live_rx.borrow_and_update();
                tracing::info!(count = live.len(), "Live predictions updated");
            }
            changed = unread_rx.changed(), if unread_open => {
                if changed.is_err() {
                    tracing::warn!("Notification poller stopped");
                    unread_open = false;
                    continue;
                }
                let unread = *unread_rx.borrow_and_update();
                tracing::info!(unread, "Unread notifications updated");
            }
        }
    }

    shutdown_tx.send(true).ok();
    if let Err(e) = live_poller.await {
        tracing::error!(error = %e, "Live poller task failed");
    }
    if let Err(e) = notification_poller.await {
        tracing::error!(error = %e, "Notification poller task failed");
    }

    tracing::debug!(metrics = %metrics_handle.render(), "Metrics snapshot");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
