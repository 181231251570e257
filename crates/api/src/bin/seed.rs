//! Load demo accounts and tickets into an empty database.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured) and applies pending
//! migrations first.

use anyhow::Context;

use caretrack_api::seed::{
    seed_demo_data, SeedOutcome, DEMO_ADMIN_EMAIL, DEMO_HOMEOWNER_EMAIL, DEMO_PASSWORD,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caretrack_api=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = caretrack_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    caretrack_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match seed_demo_data(&pool).await.context("Seeding failed")? {
        SeedOutcome::Seeded { users, requests } => {
            tracing::info!(users, requests, "Seeding completed");
            tracing::info!(
                admin = DEMO_ADMIN_EMAIL,
                homeowner = DEMO_HOMEOWNER_EMAIL,
                password = DEMO_PASSWORD,
                "Demo accounts ready",
            );
        }
        SeedOutcome::AlreadySeeded => {
            tracing::info!("Database already has users, skipping seed");
        }
    }

    pool.close().await;
    Ok(())
}
