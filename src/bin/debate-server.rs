// Standalone HTTP server for the debate chat UI.
// Use: cargo run --bin debate-server
// Store the API key once with: debate-server store-key <API_KEY>

use std::env;
use std::sync::Arc;

use debate_room_lib::http_server::{run_http_server, AppState};
use debate_room_lib::providers::{OpenAiCompatibleProvider, ProviderConfig};
use debate_room_lib::{
    default_roster, resolve_api_key, DebateOrchestrator, Keychain, RetryPolicy, SessionState,
    KEYCHAIN_SERVICE, KEYCHAIN_USER,
};
use tokio::sync::Mutex;

/// Try to bind to a port, returning the actual port used
async fn try_bind_port(start_port: u16) -> u16 {
    let mut port = start_port;
    for _ in 0..10 {
        match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
            Ok(listener) => {
                // Successfully bound, drop the listener so the server can use it
                drop(listener);
                return port;
            }
            Err(_) => {
                eprintln!("Port {} is in use, trying {}...", port, port + 1);
                port += 1;
            }
        }
    }
    // Return the last tried port, let the server fail with a clear message
    port
}

#[tokio::main]
async fn main() {
    let mut args = env::args().skip(1);
    if let Some(cmd) = args.next() {
        if cmd == "store-key" {
            let key = match args.next() {
                Some(k) => k,
                None => {
                    eprintln!("Usage: debate-server store-key <API_KEY>");
                    std::process::exit(2);
                }
            };
            if let Err(e) = Keychain::new().store(KEYCHAIN_SERVICE, KEYCHAIN_USER, &key) {
                eprintln!("Failed to store API key: {:#}", e);
                std::process::exit(1);
            }
            eprintln!("API key stored in the OS keychain.");
            return;
        }
        eprintln!("Unknown command: {}", cmd);
        std::process::exit(2);
    }

    let api_key = match resolve_api_key() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let provider_config = ProviderConfig::from_env();
    eprintln!("Debate Room HTTP Server");
    eprintln!("Model: {}", provider_config.model);
    eprintln!("Endpoint: {}", provider_config.endpoint);

    let provider = Arc::new(OpenAiCompatibleProvider::new(provider_config, api_key));
    let orchestrator = Arc::new(DebateOrchestrator::new(provider, RetryPolicy::default()));

    let topic = env::var("DEBATE_TOPIC").unwrap_or_else(|_| "Enter your topic here".to_string());
    let session = Arc::new(Mutex::new(SessionState::new(topic, default_roster())));

    let preferred_port: u16 = env::var("DEBATE_HTTP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let port = try_bind_port(preferred_port).await;

    eprintln!();
    eprintln!("API: http://localhost:{}/api", port);
    eprintln!("Health: http://localhost:{}/api/health", port);
    eprintln!();

    run_http_server(
        AppState {
            session,
            orchestrator,
        },
        port,
    )
    .await;
}
