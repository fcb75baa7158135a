//! `campusdesk ask` — One-shot resolution from the terminal.

use campusdesk_config::AppConfig;
use campusdesk_core::resolve::ResolveRequest;
use campusdesk_resolver::QueryResolver;

pub async fn run(question: String, email: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = campusdesk_store::build_from_config(&config.store).await?;

    let resolver = QueryResolver::new(store);
    let request = ResolveRequest {
        question,
        student_email: email,
    };

    let resolution = resolver.resolve(request).await?;
    println!("{}", serde_json::to_string_pretty(&resolution)?);

    Ok(())
}
