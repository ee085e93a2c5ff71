use std::net::TcpListener;

use anyhow::Context;

use sqlx::postgres::PgPoolOptions;

use alumni_portal::app;
use alumni_portal::settings::Settings;
use alumni_portal::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        std::io::stdout,
    );
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().expect("Failed to load settings");

    // Lazy connection: an unreachable store degrades requests to
    // connectivity errors instead of failing startup
    let pool = PgPoolOptions::new()
        .acquire_timeout(settings.database.acquire_timeout())
        .connect_lazy_with(settings.database.with_db());

    let photo_store = settings.storage.photo_store()?;

    let listener = TcpListener::bind(settings.app.addr())?;

    app::run(listener, pool, photo_store)?
        .await
        .context("Failed to run app")
}
