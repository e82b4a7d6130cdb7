use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use megasena::router::{DELETE_CALLBACK_PREFIX, menu};
use megasena::{Router, config, http_service};

/// Console chat: every stdin line is a message from the configured user.
/// Lines starting with `excluir_` are treated as button callbacks.
#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let service = Arc::new(http_service(&config)?);
    let router = Router::new(service);
    let user = config.user_id;

    tracing::info!("🔄 Bot ready for user {} ({})", user, config.database_url);
    println!("{}", router.handle_text(user, "/start").await);
    for item in menu() {
        println!("  {}", item);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = if line.starts_with(DELETE_CALLBACK_PREFIX) {
            router.handle_callback(user, line).await
        } else {
            router.handle_text(user, line).await
        };
        println!("{}\n", reply);
    }

    Ok(())
}
