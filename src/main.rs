//! Process bootstrap: env config, database, upload directory, HTTP server.

use exhibition_api::{app, ensure_database_exists, AppState, ExhibitionStore, UploadStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("exhibition_api=info,tower_http=info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/exhibitions".into());
    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let store = ExhibitionStore::new(pool);
    store.ensure_table().await?;

    let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
    let uploads = UploadStore::new(upload_dir).await?;

    let state = AppState { store, uploads };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Server running on port {}", listener.local_addr()?.port());
    axum::serve(listener, app(state)).await?;
    Ok(())
}
