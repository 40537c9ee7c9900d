use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger::{db, Config, Ledger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging (configurable via env)
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string())
        .eq_ignore_ascii_case("json");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ledger=info,sqlx=warn".into());

    if use_json {
        // JSON structured logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable logging for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        service = "ledger",
        version = env!("CARGO_PKG_VERSION"),
        log_format = if use_json { "json" } else { "text" },
        "Starting wager ledger"
    );

    let config = Config::load()?;
    tracing::info!(
        default_game = %config.ledger.default_game,
        pool_size = config.database.pool_size,
        "Configuration loaded"
    );

    let pool = db::connect(&config.database).await?;

    // Nothing may touch the ledger before the schema exists
    if let Err(e) = db::ensure_schema(&pool, &config.database.schema_path).await {
        tracing::error!(error = %e, "Schema bootstrap failed, aborting");
        db::close(pool).await;
        return Err(e.into());
    }

    let ledger = Ledger::postgres(config, pool.clone());

    match ledger.rules.get_active_rules().await? {
        Some(rules) => tracing::info!(rules.id = rules.id, "Active game rules"),
        None => tracing::warn!("No game rules configured"),
    }

    let snapshot = ledger.dashboard.snapshot().await?;
    tracing::info!(
        total_users = snapshot.total_users,
        active_games = snapshot.active_games,
        total_volume = %snapshot.total_volume,
        windowed_revenue = %snapshot.windowed_revenue,
        recent = snapshot.recent_activity.len(),
        "Ledger ready"
    );

    db::close(pool).await;
    Ok(())
}
