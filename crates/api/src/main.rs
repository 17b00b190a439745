use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledgerly_observability::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://invoice.db".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let frontend_dir =
        std::env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend".to_string());

    let pool = ledgerly_infra::connect(&database_url)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;
    ledgerly_infra::ensure_schema(&pool)
        .await
        .context("failed to initialize schema")?;

    let frontend = std::path::PathBuf::from(frontend_dir);
    let frontend = frontend.is_dir().then_some(frontend);
    if frontend.is_none() {
        tracing::warn!("frontend directory not found; serving API only");
    }

    let app = ledgerly_api::app::build_app(pool, frontend);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
