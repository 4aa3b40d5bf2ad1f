//! Relay configuration module

use clap::Parser;
use std::time::Duration;

use crate::platform::discord::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::platform::Snowflake;
use crate::session_actor::SessionSettings;

/// Storefront to Discord relay configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-relay", about = "Storefront to Discord order relay", long_about = None)]
pub struct RelayConfig {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub discord_token: String,

    /// Application public key (hex) used to verify interaction requests
    #[arg(long, env = "DISCORD_PUBLIC_KEY")]
    pub discord_public_key: String,

    /// Guild that receives the order channels
    #[arg(long, env = "GUILD_ID")]
    pub guild_id: Snowflake,

    /// Name of the category holding order channels (decorated on creation)
    #[arg(long, env = "CATEGORY_NAME")]
    pub category_name: String,

    /// User allowed to mark orders delivered or cancel them
    #[arg(long, env = "STORE_MANAGER_ID")]
    pub store_manager_id: Snowflake,

    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "5040")]
    pub port: u16,

    /// Seconds an HTTP request waits for the session actor
    #[arg(long, env = "BRIDGE_TIMEOUT_SECS", default_value = "30")]
    pub bridge_timeout_secs: u64,

    /// Seconds before a single Discord REST call is abandoned
    #[arg(long, env = "DISCORD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub discord_timeout_secs: u64,

    /// Milliseconds a button press may wait for the session before Discord
    /// gets a deferred response (Discord allows 3 seconds)
    #[arg(
        long,
        env = "INTERACTION_DEADLINE_MS",
        default_value = "2500",
        value_parser = clap::value_parser!(u64).range(1..3000)
    )]
    pub interaction_deadline_ms: u64,

    /// Discord REST base URL
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_API_BASE)]
    pub discord_api_base: String,
}

impl RelayConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or malformed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_secs(self.bridge_timeout_secs)
    }

    #[must_use]
    pub fn discord_timeout(&self) -> Duration {
        Duration::from_secs(self.discord_timeout_secs)
    }

    #[must_use]
    pub fn interaction_deadline(&self) -> Duration {
        Duration::from_millis(self.interaction_deadline_ms)
    }

    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            guild_id: self.guild_id,
            category_name: self.category_name.clone(),
            manager_id: self.store_manager_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 11] = [
        "storefront-relay",
        "--discord-token",
        "secret",
        "--discord-public-key",
        "abcd",
        "--guild-id",
        "10",
        "--category-name",
        "Orders",
        "--store-manager-id",
        "20",
    ];

    #[test]
    fn test_defaults() {
        let config = RelayConfig::try_parse_from(REQUIRED).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:5040");
        assert_eq!(config.bridge_timeout(), Duration::from_secs(30));
        assert_eq!(config.discord_timeout(), Duration::from_secs(10));
        assert!(config.discord_timeout() < config.bridge_timeout());
        assert_eq!(config.interaction_deadline(), Duration::from_millis(2500));
        assert_eq!(config.discord_api_base, "https://discord.com/api/v10");

        let settings = config.session_settings();
        assert_eq!(settings.guild_id, Snowflake(10));
        assert_eq!(settings.manager_id, Snowflake(20));
        assert_eq!(settings.category_name, "Orders");
    }

    #[test]
    fn test_overrides() {
        let args = REQUIRED
            .iter()
            .copied()
            .chain(["--port", "8080", "-H", "127.0.0.1", "--bridge-timeout-secs", "5"])
            .chain(["--discord-timeout-secs", "3", "--interaction-deadline-ms", "1500"]);
        let config = RelayConfig::try_parse_from(args).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.bridge_timeout(), Duration::from_secs(5));
        assert_eq!(config.discord_timeout(), Duration::from_secs(3));
        assert_eq!(config.interaction_deadline(), Duration::from_millis(1500));
    }

    #[test]
    fn test_deadline_past_discord_window_is_rejected() {
        let args = REQUIRED
            .iter()
            .copied()
            .chain(["--interaction-deadline-ms", "3000"]);
        assert!(RelayConfig::try_parse_from(args).is_err());
    }

    #[test]
    fn test_non_numeric_guild_is_rejected() {
        let mut args = REQUIRED;
        args[6] = "my-guild";
        assert!(RelayConfig::try_parse_from(args).is_err());
    }
}
