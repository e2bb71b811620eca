use web_server::Service;

// Entry point for `cargo run -p web-server`: runs the dashboard gateway alone.
// The `vendas` binary at the workspace root can start any of the four servers.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_config()?;
    let _guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_service(Service::Dashboard, &settings).await
}
