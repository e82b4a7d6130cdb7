use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use megasena::{config, http_service};
use megasena_mcp::{ChatUseCase, DrawUseCase, MCPHandler, PickUseCase, stdio};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Let's check your Mega-Sena picks.");

    let service = Arc::new(http_service(&config)?);

    let pick_use_case = PickUseCase::new(Arc::clone(&service));
    let draw_use_case = DrawUseCase::new(Arc::clone(&service));
    let chat_use_case = ChatUseCase::new(Arc::clone(&service));

    let handler = MCPHandler::new(
        Arc::new(pick_use_case),
        Arc::new(draw_use_case),
        Arc::new(chat_use_case),
    );

    let (reader, writer) = stdio();

    handler.serve(reader, writer).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    Ok(())
}
