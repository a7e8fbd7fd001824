use bill_console::api::router;
use bill_console::config::Config;
use bill_console::settings::SledStore;
use bill_console::transport::HttpApi;
use bill_console::{Console, State};
use bill_console_client::Builder;
use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: Config = Config::parse();
    simple_logger::init_with_level(config.log_level)?;

    let settings_path = config.settings_path();
    let store = SledStore::open(&settings_path)?;
    info!("Using settings at {settings_path}");

    let api = HttpApi::from_builder(Builder::default())?;
    let state = State::new(Console::new(store, api, &config.origin()));

    // connection form, then a best-effort probe and bill list
    state.console.startup(&state.page).await?;

    let addr: std::net::SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;

    info!("Console running on http://{}", addr);

    let server = axum::Server::bind(&addr).serve(router(state).into_make_service());

    let graceful = server.with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
        }
    });

    // Await the server to receive the shutdown signal
    if let Err(e) = graceful.await {
        error!("shutdown error: {}", e);
    }

    Ok(())
}
