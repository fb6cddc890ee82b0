//! Model Context Protocol (MCP) Server Implementation
//!
//! Exposes the TODO catalog to MCP clients: every record is a readable
//! resource and the `add_todo` / `complete_todo` tools mutate it.
//!
//! # Example
//!
//! ```rust,no_run
//! use ticklist_core::config::TicklistConfig;
//! use ticklist_core::mcp::{McpServer, StdioTransport};
//!
//! # async fn demo() -> ticklist_core::error::Result<()> {
//! let config = TicklistConfig::default();
//! let catalog = config.catalog.build_catalog()?.into_shared();
//! let server = McpServer::for_catalog(&config, catalog)?;
//!
//! server.run(StdioTransport::new()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Protocol Overview
//!
//! JSON-RPC 2.0, one message per line. Handled methods:
//! - `initialize` / `notifications/initialized` - Connection setup
//! - `ping`
//! - `tools/list` / `tools/call`
//! - `resources/list` / `resources/read`

pub mod protocol;
pub mod resources;
pub mod server;
pub mod transport;

pub use protocol::{
    error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION,
};
pub use resources::{ResourceError, ResourceProvider, TodoResourceProvider};
pub use server::{McpServer, McpServerBuilder};
pub use transport::{MemoryTransport, StdioTransport, Transport};
