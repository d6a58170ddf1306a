use std::net::TcpListener;

use anyhow::Context;

use sqlx::PgPool;

use server::app;
use server::settings::Settings;
use server::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = telemetry::create_subscriber(env_filter, std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = PgPool::connect_with(settings.database.with_db()).await?;

    let signing_key = settings.app.signing_key()?;
    let payment_client = settings.payment.client()?;

    let listener = TcpListener::bind(settings.app.addr())?;

    app::run(listener, pool, signing_key, payment_client)?
        .await
        .context("Failed to run app")
}
