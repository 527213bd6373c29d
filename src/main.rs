use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mission_control::api;
use mission_control::config::{Cli, Commands, ServerConfig};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "mission_control=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: &ServerConfig, seed: bool) -> anyhow::Result<()> {
    let db = config.open_database()?;

    if seed && db.get_all_planets()?.is_empty() && db.get_all_scientists()?.is_empty() {
        db.seed()?;
    }

    let app = api::create_router(db);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Mission Control listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.config();
    match cli.command() {
        Commands::Serve { seed } => serve(&config, seed).await?,
        Commands::Seed => {
            let db = config.open_database()?;
            let summary = db.seed()?;
            println!(
                "Seeded {} planets, {} scientists, {} missions",
                summary.planets, summary.scientists, summary.missions
            );
        }
    }

    Ok(())
}
