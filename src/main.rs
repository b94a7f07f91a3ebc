use anyhow::Context;
use dotenv::dotenv;
use safari_booking::config::Settings;
use safari_booking::db::Database;
use safari_booking::utils::logging::init_logging;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::new().context("loading settings")?;
    init_logging(&settings.logging).context("initializing logging")?;

    // Connect to the database
    let database = Database::new(&settings.database)
        .await
        .context("connecting to the database")?;

    if settings.database.run_migrations {
        database.migrate().await.context("running migrations")?;
        tracing::info!("migrations applied");
    }

    let pool = database.get_pool().clone();
    let _rocket = safari_booking::build_rocket(settings, pool)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
