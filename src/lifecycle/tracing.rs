//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate for the HTTP handlers, the session actor and the Discord
//! client.
//!
//! ## Configuration
//!
//! The compact format hides the crate/module prefix (`with_target(false)`);
//! the actor loop logs an `entity_type` field instead.
//!
//! ```bash
//! # Start-up, posted orders, delivered/cancelled channels
//! RUST_LOG=info storefront-relay
//!
//! # Full request payloads and every Discord call
//! RUST_LOG=debug storefront-relay
//!
//! # Only the Discord client
//! RUST_LOG=storefront_relay::platform=debug storefront-relay
//! ```
//!
//! ## Example Output
//!
//! ```text
//! INFO Actor started entity_type="ChatSession"
//! INFO Bot is ready bot="relay-bot" guild_id=10
//! INFO checkout_handler:checkout: Order posted buyer=alice channel_id=1003 channel=order-alice-260304050607 open_orders=1
//! INFO checkout_handler:checkout: Checkout processed buyer=alice language=en channel=order-alice-260304050607
//! WARN interactions_handler: Button press refused user_id=123 action=cancel
//! ```
//!
//! Failures after an interaction reply (the channel edit or deletion) have no
//! caller to report to; they show up as `Follow-up failed` warnings.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
