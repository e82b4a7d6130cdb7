// JSON-RPC surface over the Mega-Sena core
pub mod mcp_handler;
pub mod use_cases;

pub use megasena;
pub use mcp_handler::{MCPHandler, stdio};
pub use use_cases::{ChatUseCase, DrawUseCase, PickUseCase};
