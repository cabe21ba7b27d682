//! Banklink gateway entry point
//!
//! ```text
//! ┌────────────┐    ┌──────────┐    ┌───────────────────────────┐
//! │   Config   │───▶│ Gateway  │───▶│ Appwrite / Plaid / Dwolla │
//! │ (YAML+env) │    │  (axum)  │    │      (REST clients)       │
//! └────────────┘    └──────────┘    └───────────────────────────┘
//! ```
//!
//! Usage:
//!   banklink [--env dev] [--port 8080] [--mock]

use std::sync::Arc;

use anyhow::{Context, Result};
use banklink::actions::{Actions, Clients, CollectionIds};
use banklink::appwrite::AppwriteClient;
use banklink::config::{AppConfig, Secrets};
use banklink::dwolla::DwollaClient;
use banklink::gateway::state::AppState;
use banklink::plaid::PlaidClient;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[cfg(feature = "mock-api")]
fn use_mock_mode() -> bool {
    std::env::args().any(|a| a == "--mock")
}

#[cfg(not(feature = "mock-api"))]
fn use_mock_mode() -> bool {
    false
}

fn live_clients(app_config: &AppConfig) -> Result<Clients> {
    let secrets = Secrets::from_env().context("Missing secrets")?;

    let identity = Arc::new(
        AppwriteClient::new(&app_config.appwrite, secrets.appwrite_key.clone())
            .context("Failed to build Appwrite client")?,
    );
    let aggregator = PlaidClient::new(
        app_config.plaid.env,
        secrets.plaid_client_id.clone(),
        secrets.plaid_secret.clone(),
    )
    .context("Failed to build Plaid client")?;
    let processor = DwollaClient::new(
        secrets.dwolla_env,
        secrets.dwolla_key.clone(),
        secrets.dwolla_secret.clone(),
    )
    .context("Failed to build Dwolla client")?;

    tracing::info!(
        plaid_env = ?app_config.plaid.env,
        dwolla_env = %secrets.dwolla_env,
        "External clients configured"
    );

    Ok(Clients {
        identity: identity.clone(),
        documents: identity,
        aggregator: Arc::new(aggregator),
        processor: Arc::new(processor),
    })
}

#[cfg(feature = "mock-api")]
fn mock_clients() -> Result<Clients> {
    use banklink::appwrite::mock::{MockDocumentStore, MockIdentity};
    use banklink::dwolla::mock::MockProcessor;
    use banklink::plaid::mock::MockAggregator;

    tracing::warn!("Running with in-memory external services (--mock)");
    Ok(Clients {
        identity: Arc::new(MockIdentity::new()),
        documents: Arc::new(MockDocumentStore::new()),
        aggregator: Arc::new(MockAggregator::new()),
        processor: Arc::new(MockProcessor::new()),
    })
}

#[cfg(not(feature = "mock-api"))]
fn mock_clients() -> Result<Clients> {
    anyhow::bail!("Mock mode unavailable: built without the mock-api feature")
}

fn run() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env).context("Failed to load config")?;
    let _log_guard = banklink::logging::init_logging(&app_config);

    tracing::info!("Starting Banklink gateway in {} mode", env);

    let clients = if use_mock_mode() {
        mock_clients()?
    } else {
        live_clients(&app_config)?
    };

    let collections = CollectionIds::from(&app_config.appwrite);
    let state = Arc::new(AppState::new(Actions::new(clients, &collections)));

    let gateway_config = &app_config.gateway;
    let port = get_port_override().unwrap_or(gateway_config.port);
    println!("Gateway will listen on {}:{}", gateway_config.host, port);

    let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    rt.block_on(banklink::gateway::run_server(&gateway_config.host, port, state))
        .context("Gateway stopped")
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
