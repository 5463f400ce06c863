use mimalloc::MiMalloc;
use portfolio_bootstrap::db::{DATABASE_NAME, PortfolioCatalog, connect};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = portfolio_bootstrap::Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        mongodb_url = %cfg.redacted_url(),
        database = DATABASE_NAME,
        loglevel = %cfg.loglevel,
        connect_retries = cfg.connect_retries
    );

    let client = connect(&cfg).await?;
    let catalog = PortfolioCatalog::new(client.database(DATABASE_NAME));
    let report = catalog.init_schema().await?;

    for line in report.confirmation() {
        println!("{line}");
    }
    Ok(())
}
