use std::collections::HashMap;

use dotenvy::dotenv;

use geogate::logging::init_tracing;
use geogate::router::init_router;
use geogate::state::init_app_state;
use geogate_config::GatewayConfig;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Validate a configuration file and exit
    if args.len() > 1 && args[1] == "check-config" {
        handle_check_config(args);
        return;
    }

    // Normal server startup
    init_tracing();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let state = init_app_state(config, HashMap::new()).expect("failed to build gateway state");
    let app = init_router(state);

    let addr = std::env::var("GEOGATE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    println!("🚀 Gateway listening on http://{addr}");
    axum::serve(listener, app).await.unwrap();
}

fn handle_check_config(args: Vec<String>) {
    if args.len() != 3 {
        eprintln!("Usage: {} check-config <path>", args[0]);
        std::process::exit(1);
    }

    match GatewayConfig::load(&args[2]) {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("   Routes: {}", config.routes.len());
            println!("   Services: {}", config.services.len());
        }
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    }
}
