//! MCP Transport Implementations
//!
//! Transports handle the I/O for MCP communication.

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION};
use crate::error::{Result, TicklistError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tracing::warn;

/// Transport trait for MCP communication
#[async_trait]
pub trait Transport: Send {
    /// Receive the next request; `None` once the peer has closed the stream
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>>;

    /// Send a response through the transport
    async fn send(&mut self, response: JsonRpcResponse) -> Result<()>;
}

/// Newline-delimited JSON transport, stdio by default
///
/// Each message is one line of JSON. A line that is not JSON is answered with
/// a parse error; JSON that is not a JSON-RPC 2.0 request is answered with an
/// invalid request error carrying its `id` when one can be read. Either way
/// the line is skipped.
pub struct StdioTransport<R = BufReader<Stdin>, W = Stdout> {
    reader: R,
    writer: W,
}

impl StdioTransport {
    /// Create a transport over the process's stdin/stdout
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Create a transport over arbitrary line-oriented streams
    pub fn with_io(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Recover the underlying writer (used by tests to inspect output)
    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn write_line(&mut self, response: &JsonRpcResponse) -> Result<()> {
        let mut json = serde_json::to_string(response)?;
        json.push('\n');

        self.writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| TicklistError::Transport(format!("Failed to write response: {}", e)))?;
        self.writer
            .flush()
            .await
            .map_err(|e| TicklistError::Transport(format!("Failed to flush output: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl<R, W> Transport for StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>> {
        let mut line = String::new();

        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(|e| TicklistError::Transport(format!("Failed to read input: {}", e)))?;

            if read == 0 {
                return Ok(None); // EOF
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match parse_request(trimmed) {
                Ok(request) => return Ok(Some(request)),
                Err(response) => self.write_line(&response).await?,
            }
        }
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<()> {
        self.write_line(&response).await
    }
}

fn parse_request(line: &str) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        warn!(error = %e, "Discarding line that is not JSON");
        JsonRpcResponse::error(RequestId::Null, JsonRpcError::parse_error())
    })?;

    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok())
        .unwrap_or(RequestId::Null);

    let request: JsonRpcRequest = serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "Discarding malformed JSON-RPC request");
        JsonRpcResponse::error(
            id.clone(),
            JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
        )
    })?;

    if request.jsonrpc != JSONRPC_VERSION {
        warn!(version = %request.jsonrpc, "Discarding request with wrong JSON-RPC version");
        return Err(JsonRpcResponse::error(
            id,
            JsonRpcError::invalid_request(format!(
                "Unsupported JSON-RPC version: {}",
                request.jsonrpc
            )),
        ));
    }

    Ok(request)
}

/// In-memory transport for testing
#[derive(Debug, Default)]
pub struct MemoryTransport {
    requests: VecDeque<JsonRpcRequest>,
    responses: Vec<JsonRpcResponse>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request to be received
    pub fn push_request(&mut self, request: JsonRpcRequest) {
        self.requests.push_back(request);
    }

    /// Get all sent responses
    pub fn responses(&self) -> &[JsonRpcResponse] {
        &self.responses
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>> {
        Ok(self.requests.pop_front())
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<()> {
        self.responses.push(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport() {
        let mut transport = MemoryTransport::new();
        transport.push_request(JsonRpcRequest::new(1i64, "tools/list"));

        let request = transport.receive().await.unwrap();
        assert_eq!(request.unwrap().method, "tools/list");

        let response = JsonRpcResponse::success(RequestId::Number(1), serde_json::json!({}));
        transport.send(response).await.unwrap();

        assert_eq!(transport.responses().len(), 1);
        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_line_transport_skips_blank_and_malformed_lines() {
        let input: &[u8] = b"\n  \nnot json\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";
        let mut transport = StdioTransport::with_io(BufReader::new(input), Vec::new());

        let request = transport.receive().await.unwrap().unwrap();
        assert_eq!(request.method, "ping");
        assert!(transport.receive().await.unwrap().is_none());

        let output = String::from_utf8(transport.into_writer()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let response: JsonRpcResponse = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(response.id, RequestId::Null);
        assert_eq!(response.error_code(), Some(-32700));
    }

    #[tokio::test]
    async fn test_line_transport_rejects_json_that_is_not_a_request() {
        let input: &[u8] = b"{\"jsonrpc\":\"2.0\",\"id\":7}\n\
            {\"id\":\"x\",\"method\":\"ping\"}\n\
            {\"jsonrpc\":\"1.0\",\"id\":8,\"method\":\"ping\"}\n\
            [1,2]\n";
        let mut transport = StdioTransport::with_io(BufReader::new(input), Vec::new());

        assert!(transport.receive().await.unwrap().is_none());

        let output = String::from_utf8(transport.into_writer()).unwrap();
        let responses: Vec<JsonRpcResponse> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        let ids: Vec<RequestId> = responses.iter().map(|r| r.id.clone()).collect();
        assert_eq!(
            ids,
            [
                RequestId::Number(7),
                RequestId::String("x".to_string()),
                RequestId::Number(8),
                RequestId::Null,
            ]
        );
        assert!(responses.iter().all(|r| r.error_code() == Some(-32600)));
    }

    #[tokio::test]
    async fn test_line_transport_writes_one_line_per_response() {
        let mut transport = StdioTransport::with_io(BufReader::new(&b""[..]), Vec::new());
        transport
            .send(JsonRpcResponse::success(RequestId::Number(1), serde_json::json!({})))
            .await
            .unwrap();
        transport
            .send(JsonRpcResponse::success(RequestId::Number(2), serde_json::json!({})))
            .await
            .unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(output.ends_with('\n'));
    }
}
