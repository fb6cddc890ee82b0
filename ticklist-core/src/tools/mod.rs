//! Tool system
//!
//! Tools are named actions invoked with JSON arguments. A [`ToolRegistry`]
//! maps each name to its handler; the MCP server looks the handler up at
//! call time and translates [`ToolError`]s into protocol errors.
//!
//! # Example
//!
//! ```rust,no_run
//! use ticklist_core::catalog::Catalog;
//! use ticklist_core::messages::Messages;
//! use ticklist_core::tools::{todo_registry, ToolExecutionContext};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new().into_shared();
//! let registry = todo_registry(catalog, Messages::default())?;
//!
//! let tool = registry.require("add_todo")?;
//! let output = tool
//!     .execute(serde_json::json!({ "title": "Ship it" }), &ToolExecutionContext::new())
//!     .await?;
//! println!("{}", output.text);
//! # Ok(())
//! # }
//! ```

mod registry;
mod result;
mod todo;
mod tool;

pub use registry::{McpToolInfo, RegistryError, ToolRegistry};
pub use result::{ToolError, ToolErrorKind, ToolOutput};
pub use todo::{todo_registry, AddTodoTool, CompleteTodoTool, ADD_TODO, COMPLETE_TODO};
pub use tool::{required_str, BoxedTool, Tool, ToolExecutionContext, ToolMetadata, ToolSchema};
