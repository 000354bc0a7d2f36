use std::error::Error;

use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A .env file is optional; real deployments pass the environment directly.
    let dotenv = dotenvy::dotenv();

    chat_service::telemetry::init("info")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(err.into()),
    }

    if let Err(err) = api::start().await {
        error!(error = %err, "maintainer bot stopped with an error");
        return Err(err.into());
    }

    Ok(())
}
