use std::error::Error;

use log::info;

mod api;
mod config;
mod messages;
mod poller;
mod prober;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let config = config::AppConfig::from_env()?;
    info!(
        "Watching room {} via {} (interval {:?})",
        config.room_id, config.api_base_url, config.poll_interval
    );

    let api = api::ApiClient::new(&config);
    let prober = prober::HcitoolProber::new(&config);
    let poller = poller::Poller::new(api, prober, config.room_id, config.poll_interval);

    poller.run_loop().await;

    Ok(())
}
