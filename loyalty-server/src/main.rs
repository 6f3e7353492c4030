use loyalty_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment first: .env is optional, missing file is fine
    let _ = dotenv::dotenv();
    init_logger();

    print_banner();
    tracing::info!("Loyalty Edge Server starting...");

    let config = Config::from_env()?;
    let state = ServerState::initialize(&config).await?;

    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
