use log::debug;
use weather_harvest::{Config, HarvestError, Harvester};

#[tokio::main]
async fn main() -> Result<(), HarvestError> {
    // Set RUST_LOG=debug to see request and upload details next to the journal.
    env_logger::init();

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let config = Config::from_env()?;
    let harvester = Harvester::from_config(&config)?;
    harvester.run().await;
    Ok(())
}
