use log::{debug, info};
use mac_address::MacAddress;
use serde_derive::Deserialize;
use thiserror::Error;

use crate::config::AppConfig;
use crate::messages::DetectionEvent;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("roster fetch failed: {0}")]
    RosterFetch(#[source] reqwest::Error),
    #[error("detection report failed: {0}")]
    Report(#[source] reqwest::Error),
}

/// Record shape of the `/status` roster endpoint. The service returns more
/// fields per user; only the address matters here.
#[derive(Deserialize, Debug)]
struct RosterEntry {
    mac_address: MacAddress,
}

/// Client for the remote attendance API: fetches the roster of watched
/// addresses and reports detections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        ApiClient {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
        }
    }

    /// `GET {base}/status`, returning the addresses currently being watched.
    /// Transport failures, non-success statuses, and unparseable bodies all
    /// fail the fetch as a whole; there is no partial roster.
    pub async fn fetch_roster(&self) -> Result<Vec<MacAddress>, ApiError> {
        let entries: Vec<RosterEntry> = self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(ApiError::RosterFetch)?
            .json()
            .await
            .map_err(ApiError::RosterFetch)?;

        debug!("Fetched roster of {} devices", entries.len());
        Ok(entries.into_iter().map(|entry| entry.mac_address).collect())
    }

    /// `POST {base}/notify-detected-user` with one detection. The response is
    /// logged but never interpreted; only transport failures surface.
    pub async fn notify_detected(&self, event: &DetectionEvent) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/notify-detected-user", self.base_url))
            .json(event)
            .send()
            .await
            .map_err(ApiError::Report)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        info!("Notified API of {:?}: {} {}", event, status, body);
        Ok(())
    }
}
