use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt as _;
use log::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::messages::{DetectionEvent, DevicePresence};
use crate::prober::Prober;

/// What one cycle did, for the end-of-cycle log line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub probed: usize,
    pub detected: usize,
    pub reported: usize,
}

/// The polling loop: fetch the roster, probe every address in order, report
/// each device found present, sleep, repeat. Nothing carries over between
/// cycles; the roster is re-fetched every time.
pub struct Poller<P> {
    api: ApiClient,
    prober: P,
    room_id: u32,
    poll_interval: Duration,
}

impl<P: Prober> Poller<P> {
    pub fn new(api: ApiClient, prober: P, room_id: u32, poll_interval: Duration) -> Self {
        Poller {
            api,
            prober,
            room_id,
            poll_interval,
        }
    }

    /// Runs forever. No cycle outcome, including a panic inside the cycle,
    /// stops the loop; failures are logged and the next cycle waits its turn.
    pub async fn run_loop(&self) {
        loop {
            match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
                Ok(Ok(summary)) => {
                    info!(
                        "Cycle complete: {} probed, {} present, {} reported",
                        summary.probed, summary.detected, summary.reported
                    );
                }
                Ok(Err(err)) => {
                    error!("Error making API request: {}", err);
                }
                Err(panic) => {
                    let detail = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_string());
                    error!("Unexpected error in polling cycle: {}", detail);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One fetch-probe-report pass. A roster failure abandons the cycle; a
    /// probe or report failure only affects its own address.
    async fn run_cycle(&self) -> Result<CycleSummary, ApiError> {
        let roster = self.api.fetch_roster().await?;
        info!("Checking {} devices", roster.len());

        let mut summary = CycleSummary::default();
        for mac_address in roster {
            summary.probed += 1;
            match self.prober.probe(&mac_address).await {
                DevicePresence::Present => {
                    summary.detected += 1;
                    let event = DetectionEvent {
                        mac_address,
                        room_id: self.room_id,
                    };
                    match self.api.notify_detected(&event).await {
                        Ok(()) => summary.reported += 1,
                        Err(err) => error!("Error making API request: {}", err),
                    }
                }
                DevicePresence::Absent => {
                    info!("{} is offline, skipping notification", mac_address);
                }
            }
        }
        Ok(summary)
    }
}
