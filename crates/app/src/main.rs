use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gastos={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let default_budgets = settings.budgets.category_budgets()?;
    let db = connect_database(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(db.clone())
        .default_budgets(default_budgets)
        .build()
        .await?;

    let listener = tokio::net::TcpListener::bind(settings.server.address()).await?;
    server::run_with_listener(engine, listener, shutdown_signal()).await?;

    tracing::info!("Shutting down, closing database");
    db.close().await?;
    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("Database ready");
    Ok(database)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
