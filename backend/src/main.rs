//! # Backend Service
//!
//! Thin entry point that delegates to lib-web for server setup.

use lib_utils::get_env_parse_or;
use lib_web::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let port: u16 = get_env_parse_or("SERVER_PORT", 8080)?;

    let config = ServerConfig {
        bind_address: format!("0.0.0.0:{}", port),
        ..Default::default()
    };

    start_server(config).await
}
