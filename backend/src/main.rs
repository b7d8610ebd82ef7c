use anyhow::Result;
use log::info;
use std::sync::Arc;

use petsday_backend::domain::{DigestService, EmailConfig, EmailService};
use petsday_backend::io::rest;
use petsday_backend::storage::csv::CsvConnection;
use petsday_backend::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let csv_conn = Arc::new(CsvConnection::new_default()?);
    info!(
        "Storage ready at {}",
        csv_conn.base_directory().display()
    );

    let mailer = Arc::new(EmailService::new(EmailConfig::from_env())?);
    let digest_service = Arc::new(DigestService::new(csv_conn.clone(), mailer));

    let digest_secret = std::env::var("DIGEST_CRON_SECRET").unwrap_or_default();
    if digest_secret.is_empty() {
        info!("DIGEST_CRON_SECRET not set; the digest endpoint is disabled");
    }

    let state = AppState::new(csv_conn, digest_service, digest_secret);
    let app = rest::router(state);

    let bind_addr =
        std::env::var("PETSDAY_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("🐾 Listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
