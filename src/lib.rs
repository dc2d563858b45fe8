//! # Libero
//!
//! A membership server for volleyball clubs, usable both as a standalone
//! binary and as a library: accounts and roles, tournament sign-up, match
//! listings, news, training schedules, rankings, and a participation
//! achievement system.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! libero = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use libero::auth::TokenService;
//! use libero::mail::Mailer;
//! use libero::server::{AppState, cors_layer, create_router};
//! use libero::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/libero.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     TokenService::new(b"change-me"),
//!     Mailer::new("./data/outbox".into()),
//! ));
//! let router = create_router(state, cors_layer(&[]));
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the binary's CLI dependencies. Disable with
//!   `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod mail;
pub mod points;
pub mod server;
pub mod store;
pub mod types;
