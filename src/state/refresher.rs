use crate::state::messages::NetworkRequest;
use cricket_api::Id;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval};

/// Re-fetches live status for whichever innings the scorer has open.
/// Nothing is sent while no innings is watched.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    watched: watch::Receiver<Option<Id>>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        watched: watch::Receiver<Option<Id>>,
        period: Duration,
    ) -> Self {
        Self { network_requests, watched, period }
    }

    pub async fn run(mut self) {
        let mut live_interval = interval(self.period);
        live_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The screen issues its own fetch when an innings is opened.
        live_interval.tick().await;

        loop {
            tokio::select! {
                _ = live_interval.tick() => {
                    let innings = *self.watched.borrow();
                    if let Some(innings_id) = innings
                        && self
                            .network_requests
                            .send(NetworkRequest::LoadLiveStatus { innings_id })
                            .await
                            .is_err()
                    {
                        break;
                    }
                }
                changed = self.watched.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    // Restart the period so a freshly opened innings is not polled twice.
                    live_interval.reset();
                }
            }
        }
    }
}
