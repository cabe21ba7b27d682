//! Banklink - Bank Account Linking and Transfers
//!
//! Users sign up, link bank accounts through Plaid, and move money between
//! linked accounts with Dwolla ACH transfers. Users, banks and transfer
//! records live in Appwrite.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration and environment secrets
//! - [`logging`] - tracing subscriber setup
//! - [`models`] - User, Bank and Transaction documents plus read models
//! - [`money`] - USD amount parsing, validation and formatting
//! - [`ids`] - Shareable account ids and document ids
//! - [`session`] - Session cookie storage
//! - [`appwrite`] - Identity and document store clients
//! - [`plaid`] - Account aggregator client
//! - [`dwolla`] - Payment processor client
//! - [`actions`] - User, bank, payment and transaction operations
//! - [`gateway`] - HTTP API (axum) with OpenAPI docs

pub mod config;
pub mod logging;

pub mod ids;
pub mod models;
pub mod money;
pub mod session;

// External services
pub mod appwrite;
pub mod dwolla;
pub mod plaid;

pub mod actions;
pub mod gateway;

// Convenient re-exports at crate root
pub use actions::{ActionError, Actions, Clients, CollectionIds};
pub use config::{AppConfig, Secrets};
pub use models::{Bank, Transaction, User};
