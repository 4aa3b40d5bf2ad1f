//! # Storefront Relay
//!
//! > **Turns storefront purchases into private Discord order channels.**
//!
//! When the storefront reports a checkout, the relay creates a channel visible
//! only to the buyer and the store manager, posts the order as an embed, and
//! attaches two buttons: *mark delivered* (locks the channel) and *cancel*
//! (deletes it). A second endpoint switches the display language between
//! Arabic and English for subsequent orders.
//!
//! ## 🏗️ Architecture
//!
//! ### One owner for the Discord session
//! Every Discord call is made by a single actor task ([`session_actor`]).
//! HTTP handlers run concurrently, but they only *submit* work through a
//! bounded channel and wait for a oneshot reply, so two checkouts can never
//! interleave their channel creation.
//!
//! ### Replies before side effects
//! A button interaction should be answered before its channel disappears. The
//! actor hands the reply back first and then runs the permission edit or
//! deletion as follow-up work, still inside the same serial loop. The follow-up
//! starts as soon as the HTTP handler holds the reply, not once Discord has
//! received it, so a fast deletion can still land before the response. Discord
//! then shows the press as failed; the channel is gone either way.
//!
//! ### Language captured at receipt
//! The current language is read once when a request arrives and travels with
//! it. Changing the language never affects an order already in flight.
//!
//! ### Async Context Injection
//! The chat platform is injected when the actor starts (`run(ctx)`), not when
//! it is built. Tests inject an in-memory [`FakePlatform`](platform::mock::FakePlatform);
//! production injects [`DiscordRest`](platform::DiscordRest).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`SerialActor`](framework::SerialActor) loop and its
//! [`BridgeClient`](framework::BridgeClient), plus a
//! [`MockClient`](framework::mock::MockClient) for handler tests.
//!
//! ### 2. The Actor ([`session_actor`])
//! [`ChatSession`](session_actor::ChatSession): checkout, button presses, the
//! posted-order registry, and embed rendering.
//!
//! ### 3. The Interface ([`clients`])
//! [`SessionClient`](clients::SessionClient) hides the request/reply enums
//! and applies the bridge timeout.
//!
//! ### 4. The Edges ([`http`], [`platform`])
//! axum handlers on one side, the Discord REST client on the other.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! Start-up wiring, shutdown, logging and configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! export DISCORD_TOKEN=... DISCORD_PUBLIC_KEY=... GUILD_ID=... \
//!        CATEGORY_NAME=Orders STORE_MANAGER_ID=...
//! RUST_LOG=info cargo run
//!
//! curl -X POST localhost:5040/checkout -H 'content-type: application/json' \
//!      -d '{"username":"alice","discord_id":"123","cart":["item1"],"total":"9.99"}'
//! ```
//!
//! Point the application's *Interactions Endpoint URL* at `/interactions` so
//! that button presses reach the relay.

pub mod clients;
pub mod config;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod platform;
pub mod session_actor;
