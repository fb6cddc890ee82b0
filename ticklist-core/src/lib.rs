//! # Ticklist
//!
//! An in-memory TODO catalog exposed to MCP clients:
//! - every record is a readable `todo:///<id>` resource
//! - `add_todo` and `complete_todo` tools mutate the catalog
//! - a stub HTTP API with placeholder resource, prompt and RAG routes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ticklist_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = TicklistConfig::load()?;
//!     let catalog = config.catalog.build_catalog()?.into_shared();
//!
//!     let server = McpServer::for_catalog(&config, catalog)?;
//!     server.run(StdioTransport::new()).await
//! }
//! ```
//!
//! The catalog is owned by the caller and handed to the tools and resource
//! provider as a [`catalog::SharedCatalog`]; nothing is global and nothing
//! survives a restart.

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod messages;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{
        Catalog, CatalogError, Completion, SharedCatalog, TodoId, TodoItem, TodoStatus,
    };
    pub use crate::config::{CatalogConfig, HttpConfig, SeedEntry, ServerConfig, TicklistConfig};
    pub use crate::error::{Result, TicklistError};
    pub use crate::messages::{Locale, Messages};

    pub use crate::tools::{
        todo_registry, AddTodoTool, CompleteTodoTool, RegistryError, Tool, ToolError,
        ToolErrorKind, ToolExecutionContext, ToolOutput, ToolRegistry,
    };

    pub use crate::mcp::{
        JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer, McpServerBuilder,
        MemoryTransport, RequestId, ResourceProvider, StdioTransport, TodoResourceProvider,
        Transport,
    };
}
