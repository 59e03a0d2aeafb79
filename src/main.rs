use std::sync::Arc;

use sessionkit::config::{load_config, print_schema};
use sessionkit::startup;
use sessionkit::utils::init_logging;
use tracing::error;

const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

// -- Entrypoint

#[tokio::main]
async fn main() {
    let arg = std::env::args().nth(1);

    if arg.as_deref() == Some("schema") {
        if let Err(e) = print_schema() {
            eprintln!("Error rendering configuration schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let path = arg.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match startup::run(Arc::new(config)).await {
        Ok((_state, outcome)) => {
            let status = if outcome.authenticated {
                "authenticated"
            } else {
                "anonymous"
            };
            println!(
                "Session ready ({}) after {} ms",
                status,
                outcome.elapsed.as_millis()
            );
        }
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    }
}
