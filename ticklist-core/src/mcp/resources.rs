//! MCP Resource Providers
//!
//! Resources are read-only views that clients list and read by URI.

use super::protocol::{McpResource, ResourceContent};
use crate::catalog::{SharedCatalog, TodoId};
use crate::messages::Messages;
use async_trait::async_trait;

const TEXT_PLAIN: &str = "text/plain";

/// Errors raised while reading a resource
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// The URI belongs to this provider but is malformed
    #[error("Invalid resource URI: {0}")]
    InvalidUri(String),

    /// The URI is well formed but nothing lives there
    #[error("{0}")]
    NotFound(String),
}

/// Trait for providing MCP resources
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Whether this provider owns the URI
    fn handles(&self, uri: &str) -> bool;

    /// List available resources
    async fn list_resources(&self) -> Vec<McpResource>;

    /// Read a resource by URI. Only called when `handles(uri)` is true.
    async fn read_resource(&self, uri: &str) -> Result<ResourceContent, ResourceError>;
}

/// Exposes every catalog record as a `todo:///<id>` resource
pub struct TodoResourceProvider {
    catalog: SharedCatalog,
    messages: Messages,
    scheme: String,
}

impl TodoResourceProvider {
    pub fn new(catalog: SharedCatalog, messages: Messages) -> Self {
        Self {
            catalog,
            messages,
            scheme: "todo".to_string(),
        }
    }

    /// Use a different URI scheme
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Resource URI for a record, with the id percent-encoded
    pub fn uri_for(&self, id: &TodoId) -> String {
        format!("{}:///{}", self.scheme, urlencoding::encode(id.as_str()))
    }

    /// Extract the record id from a URI.
    ///
    /// Format: `todo:///{id}`; `todo://{id}` is accepted too. The scheme is
    /// matched case-insensitively and the id is percent-decoded.
    pub fn parse_uri(&self, uri: &str) -> Result<TodoId, ResourceError> {
        let invalid = || ResourceError::InvalidUri(uri.to_string());
        let rest = self.strip_scheme(uri).ok_or_else(invalid)?;

        let raw = rest.strip_prefix('/').unwrap_or(rest);
        if raw.is_empty() || raw.contains('/') {
            return Err(invalid());
        }

        let id = urlencoding::decode(raw).map_err(|_| invalid())?;
        Ok(TodoId::from(id.into_owned()))
    }

    fn strip_scheme<'a>(&self, uri: &'a str) -> Option<&'a str> {
        let scheme = uri.get(..self.scheme.len())?;
        if !scheme.eq_ignore_ascii_case(&self.scheme) {
            return None;
        }
        uri[self.scheme.len()..].strip_prefix("://")
    }
}

#[async_trait]
impl ResourceProvider for TodoResourceProvider {
    fn handles(&self, uri: &str) -> bool {
        self.strip_scheme(uri).is_some()
    }

    async fn list_resources(&self) -> Vec<McpResource> {
        let catalog = self.catalog.read().await;
        catalog
            .iter()
            .map(|item| McpResource {
                uri: self.uri_for(&item.id),
                name: self.messages.resource_name(item),
                description: Some(self.messages.resource_description(item)),
                mime_type: Some(TEXT_PLAIN.to_string()),
            })
            .collect()
    }

    async fn read_resource(&self, uri: &str) -> Result<ResourceContent, ResourceError> {
        let id = self.parse_uri(uri)?;
        let catalog = self.catalog.read().await;
        let item = catalog
            .get(&id)
            .map_err(|e| ResourceError::NotFound(self.messages.catalog_error(&e)))?;

        Ok(ResourceContent {
            uri: uri.to_string(),
            mime_type: Some(TEXT_PLAIN.to_string()),
            text: Some(self.messages.resource_text(item)),
        })
    }
}
