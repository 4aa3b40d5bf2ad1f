use std::sync::Arc;
use tracing::info;

use storefront_relay::config::RelayConfig;
use storefront_relay::http::{self, AppState, InteractionVerifier};
use storefront_relay::lifecycle::{setup_tracing, RelaySystem};
use storefront_relay::model::LanguageSetting;
use storefront_relay::platform::{ChatPlatform, DiscordRest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::load()?;
    setup_tracing();

    let verifier = InteractionVerifier::from_hex(&config.discord_public_key)?;
    let platform: Arc<dyn ChatPlatform> = Arc::new(DiscordRest::new(
        config.discord_token.clone(),
        config.discord_api_base.clone(),
        config.discord_timeout(),
    )?);

    let system = RelaySystem::start(config.session_settings(), config.bridge_timeout(), platform);

    let state = Arc::new(AppState {
        session: system.session_client.clone(),
        language: Arc::new(LanguageSetting::default()),
        verifier,
        press_deadline: config.interaction_deadline(),
    });
    let app = http::router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received");
        })
        .await?;

    system.shutdown().await?;
    Ok(())
}
