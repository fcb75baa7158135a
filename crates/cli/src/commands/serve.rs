//! `campusdesk serve` — Start the HTTP API server.

use campusdesk_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let store = campusdesk_store::build_from_config(&config.store).await?;

    println!("🎓 CampusDesk Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Store: {}", store.name());

    campusdesk_gateway::start(&config, store).await?;

    Ok(())
}
