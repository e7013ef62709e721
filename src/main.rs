use tokio::net::TcpListener;
use tracing::info;
use page_digest::{
    config::Config,
    api::routes::create_router,
    telemetry::init_tracing,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info", std::io::stdout);

    let config = Config::load()?;
    let server_addr = config.server.addr()?;

    let app_state = AppState::new(&config)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;

    info!("Website Summary Generator listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
