//! docbox - Entry Point
//!
//! Serves sandboxed markdown file operations over newline-delimited JSON.

use log::{error, info};

use docbox::Server;
use docbox::config::ServerConfig;
use docbox::error::ServerError;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching docbox...");

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;
    let (startup, runtime) = config.split();

    let server = Server::bind(startup, runtime).await?;
    server.start().await;
    Ok(())
}
