use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::api::ApiClient;
use crate::models::{PageRequest, Prediction, TimeInForce};

const LIVE_PAGE_SIZE: u32 = 200;

/// Poll live predictions for `user_id` and publish each successful fetch.
///
/// Fixed period, no backoff. Errors are logged and the loop carries on.
/// Stops when `shutdown` flips to true (or its sender is dropped) or when
/// nobody is listening on `tx` any more.
pub async fn run_live_poller(
    client: ApiClient,
    user_id: String,
    period: Duration,
    tx: watch::Sender<Vec<Prediction>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(non_zero(period));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        let result = client
            .get_predictions(
                &user_id,
                Some(TimeInForce::Live),
                Some(PageRequest::new(1, LIVE_PAGE_SIZE)),
            )
            .await;

        match result {
            Ok(resp) => {
                tracing::debug!(user_id = %user_id, count = resp.predictions.len(), "Live predictions polled");
                if tx.send(resp.predictions).is_err() {
                    tracing::debug!("Live poller has no subscribers, stopping");
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Live poller: failed to fetch predictions");
            }
        }
    }

    tracing::info!(user_id = %user_id, "Live poller stopped");
}

/// Poll the unread notification count. Same loop shape as [`run_live_poller`].
pub async fn run_notification_poller(
    client: ApiClient,
    user_id: String,
    period: Duration,
    tx: watch::Sender<u64>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(non_zero(period));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        match client.unread_count(&user_id).await {
            Ok(count) => {
                if tx.send(count).is_err() {
                    tracing::debug!("Notification poller has no subscribers, stopping");
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Notification poller: failed to fetch unread count");
            }
        }
    }

    tracing::info!(user_id = %user_id, "Notification poller stopped");
}

// tokio's interval panics on a zero period
fn non_zero(period: Duration) -> Duration {
    if period.is_zero() {
        Duration::from_millis(1)
    } else {
        period
    }
}
