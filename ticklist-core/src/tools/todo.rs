//! Catalog tools: `add_todo` and `complete_todo`

use super::registry::{RegistryError, ToolRegistry};
use super::result::{ToolError, ToolOutput};
use super::tool::{required_str, Tool, ToolExecutionContext, ToolMetadata, ToolSchema};
use crate::catalog::{CatalogError, Completion, SharedCatalog, TodoId};
use crate::messages::Messages;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

pub const ADD_TODO: &str = "add_todo";
pub const COMPLETE_TODO: &str = "complete_todo";

fn catalog_error(messages: &Messages, err: CatalogError) -> ToolError {
    let text = messages.catalog_error(&err);
    ToolError {
        message: text,
        ..ToolError::from(err)
    }
}

/// Creates a pending TODO from a title
pub struct AddTodoTool {
    metadata: ToolMetadata,
    catalog: SharedCatalog,
    messages: Messages,
}

impl AddTodoTool {
    pub fn new(catalog: SharedCatalog, messages: Messages) -> Self {
        Self {
            metadata: ToolMetadata::new(ADD_TODO, "Add a new TODO").with_tag("todo"),
            catalog,
            messages,
        }
    }
}

#[async_trait]
impl Tool for AddTodoTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::single_string("title", "Title of the TODO")
    }

    #[instrument(skip_all, fields(request_id = ?ctx.request_id))]
    async fn execute(
        &self,
        args: Value,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, ToolError> {
        let title = required_str(&args, "title", self.messages.title_required())?;

        let item = {
            let mut catalog = self.catalog.write().await;
            catalog
                .create(title)
                .map_err(|e| catalog_error(&self.messages, e))?
        };

        info!(id = %item.id, "Added todo");
        let value = serde_json::to_value(&item).map_err(|e| ToolError::internal(e.to_string()))?;
        Ok(ToolOutput::text(self.messages.added(&item)).with_value(value))
    }
}

/// Marks a TODO as completed
pub struct CompleteTodoTool {
    metadata: ToolMetadata,
    catalog: SharedCatalog,
    messages: Messages,
}

impl CompleteTodoTool {
    pub fn new(catalog: SharedCatalog, messages: Messages) -> Self {
        Self {
            metadata: ToolMetadata::new(COMPLETE_TODO, "Mark a TODO as completed").with_tag("todo"),
            catalog,
            messages,
        }
    }
}

#[async_trait]
impl Tool for CompleteTodoTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::single_string("id", "ID of the TODO to complete")
    }

    #[instrument(skip_all, fields(request_id = ?ctx.request_id))]
    async fn execute(
        &self,
        args: Value,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, ToolError> {
        let id = TodoId::from(required_str(&args, "id", self.messages.id_required())?);

        let outcome = {
            let mut catalog = self.catalog.write().await;
            catalog
                .complete(&id)
                .map_err(|e| catalog_error(&self.messages, e))?
        };

        let text = match &outcome {
            Completion::Completed(item) => {
                info!(id = %item.id, "Completed todo");
                self.messages.completed(item)
            }
            Completion::AlreadyCompleted(item) => {
                info!(id = %item.id, "Todo was already completed");
                self.messages.already_completed(item)
            }
        };

        let value = serde_json::to_value(outcome.item())
            .map_err(|e| ToolError::internal(e.to_string()))?;
        Ok(ToolOutput::text(text).with_value(value))
    }
}

/// Registry holding both catalog tools, bound to one catalog
pub fn todo_registry(
    catalog: SharedCatalog,
    messages: Messages,
) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register_all(vec![
        Arc::new(AddTodoTool::new(catalog.clone(), messages)),
        Arc::new(CompleteTodoTool::new(catalog, messages)),
    ])?;
    Ok(registry)
}
