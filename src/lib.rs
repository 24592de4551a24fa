//! # mini-twitch
//!
//! A small client for Twitch's OAuth2 authorization-code flow, aimed at
//! desktop and CLI applications, plus a handful of authenticated Helix
//! calls.
//!
//! ## Overview
//!
//! The entry point is [`AuthProcess`]. Calling [`AuthProcess::start`] first
//! tries to validate a previously stored token against the provider; when
//! that fails it runs the interactive flow: a transient listener is bound on
//! localhost, the authorize URL is surfaced to the caller (open it in a
//! browser), and the provider's single redirect is received, CSRF-checked,
//! and exchanged for a user access token. Token persistence is the caller's
//! concern; the [`TokenData`] schema round-trips through serde for that
//! purpose.
//!
//! ## Quick Example
//!
//! ```no_run
//! use mini_twitch::{AuthProcess, Config};
//!
//! #[tokio::main]
//! async fn main() -> mini_twitch::Result<()> {
//!     let config = Config {
//!         client_id: "your_client_id".to_string(),
//!         secret: "your_secret".to_string(),
//!         callback_path: "/auth".to_string(),
//!         scopes: vec!["user:read:email".to_string()],
//!         ..Config::default()
//!     };
//!
//!     let mut proc = AuthProcess::new(config);
//!     proc.on_authorize_url(|url| println!("open this URL: {url}"));
//!     proc.start().await?;
//!
//!     let _users = proc.get_user_info().await?;
//!     let game_id = proc.get_game("Chess").await?;
//!     println!("game id: {game_id}");
//!     Ok(())
//! }
//! ```

mod auth;
mod callback;
mod config;
mod encode;
mod error;
mod provider;
mod schema;

pub use auth::{AuthProcess, AuthState};
pub use config::{Config, DEFAULT_CALLBACK_PORT};
pub use error::{Error, Result};
pub use provider::Provider;
pub use schema::{Game, GamesResponse, TokenData, User, UsersResponse, ValidationAnswer};
