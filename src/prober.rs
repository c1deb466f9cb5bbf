use std::time::Duration;

use log::{error, info, warn};
use mac_address::MacAddress;
use tokio::process::Command;

use crate::config::AppConfig;
use crate::messages::DevicePresence;

/// Capability interface for a single presence probe, so the poll loop does
/// not care whether probing shells out or talks to an adapter directly.
pub trait Prober {
    async fn probe(&self, address: &MacAddress) -> DevicePresence;
}

/// Probes by running the device-inquiry tool (`hcitool name <address>`).
/// A device that answers with a name within the timeout is present; an empty
/// answer, a timeout, or a failure to run the tool all count as absent.
pub struct HcitoolProber {
    tool: String,
    timeout: Duration,
}

impl HcitoolProber {
    pub fn new(config: &AppConfig) -> Self {
        HcitoolProber {
            tool: config.inquiry_tool.clone(),
            timeout: config.probe_timeout,
        }
    }

    #[cfg(test)]
    fn with_tool(tool: &str, timeout: Duration) -> Self {
        HcitoolProber {
            tool: tool.to_string(),
            timeout,
        }
    }
}

impl Prober for HcitoolProber {
    async fn probe(&self, address: &MacAddress) -> DevicePresence {
        let output = Command::new(&self.tool)
            .arg("name")
            .arg(address.to_string())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(output)) => {
                // Any non-empty answer counts as a name; the content itself
                // is not inspected.
                if output.stdout.trim_ascii().is_empty() {
                    info!("{} is offline (no response)", address);
                    DevicePresence::Absent
                } else {
                    info!("{} is online (device found)", address);
                    DevicePresence::Present
                }
            }
            Ok(Err(err)) => {
                error!("Error running {} for {}: {}", self.tool, address, err);
                DevicePresence::Absent
            }
            Err(_) => {
                warn!("Timeout expired while checking {}", address);
                DevicePresence::Absent
            }
        }
    }
}
