//! End-to-end MCP sessions against a seeded catalog
//!
//! These drive the server through the line transport exactly as a stdio
//! client would, then check both the wire responses and the catalog.

use serde_json::{json, Value};
use ticklist_core::catalog::TodoId;
use ticklist_core::config::TicklistConfig;
use ticklist_core::mcp::{error_codes, JsonRpcResponse, McpServer, RequestId, StdioTransport};
use ticklist_core::messages::Locale;
use tokio::io::{AsyncReadExt, BufReader};

/// Feed newline-delimited requests through `McpServer::run` and collect the
/// responses it writes.
async fn session(server: &McpServer, requests: &[Value]) -> Vec<JsonRpcResponse> {
    let mut input = String::new();
    for request in requests {
        input.push_str(&request.to_string());
        input.push('\n');
    }

    let (writer, mut reader) = tokio::io::duplex(256 * 1024);
    let transport = StdioTransport::with_io(BufReader::new(input.as_bytes()), writer);
    server.run(transport).await.unwrap();

    let mut output = String::new();
    reader.read_to_string(&mut output).await.unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn seeded(config: &TicklistConfig) -> (McpServer, ticklist_core::catalog::SharedCatalog) {
    let catalog = config.catalog.build_catalog().unwrap().into_shared();
    let server = McpServer::for_catalog(config, catalog.clone()).unwrap();
    (server, catalog)
}

fn call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

fn text(response: &JsonRpcResponse) -> &str {
    response.result.as_ref().unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
}

#[tokio::test]
async fn test_full_session() {
    let config = TicklistConfig::default();
    let (server, catalog) = seeded(&config);

    let responses = session(
        &server,
        &[
            json!({
                "jsonrpc": "2.0",
                "id": 0,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "e2e", "version": "0.0.1" }
                }
            }),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            call(1, "complete_todo", json!({ "id": "3" })),
            call(2, "add_todo", json!({ "title": "Ship it" })),
            call(3, "complete_todo", json!({ "id": "4" })),
            call(4, "complete_todo", json!({ "id": "4" })),
            json!({ "jsonrpc": "2.0", "id": 5, "method": "resources/list" }),
        ],
    )
    .await;

    // The notification gets no response.
    assert_eq!(responses.len(), 6);
    assert_eq!(responses[0].id, RequestId::Number(0));

    assert_eq!(text(&responses[1]), "Completed TODO 3 \"Test\"");
    assert_eq!(text(&responses[2]), "Added TODO - ID: 4, Title: Ship it");
    assert_eq!(text(&responses[3]), "Completed TODO 4 \"Ship it\"");
    assert_eq!(text(&responses[4]), "TODO 4 is already completed");

    let resources = responses[5].result.as_ref().unwrap()["resources"]
        .as_array()
        .unwrap();
    let uris: Vec<&str> = resources.iter().map(|r| r["uri"].as_str().unwrap()).collect();
    assert_eq!(uris, ["todo:///1", "todo:///2", "todo:///3", "todo:///4"]);
    assert!(resources.iter().all(|r| r["name"].as_str().unwrap().starts_with('✓')));

    let catalog = catalog.read().await;
    assert_eq!(catalog.completed_count(), 4);
    assert_eq!(catalog.get(&TodoId::from("4")).unwrap().title, "Ship it");
}

#[tokio::test]
async fn test_failed_calls_leave_catalog_unchanged() {
    let config = TicklistConfig::default();
    let (server, catalog) = seeded(&config);
    let before = catalog.read().await.list();

    let responses = session(
        &server,
        &[
            call(1, "add_todo", json!({ "title": "" })),
            call(2, "add_todo", json!({ "title": 7 })),
            call(3, "complete_todo", json!({})),
            call(4, "complete_todo", json!({ "id": "99" })),
            call(5, "archive_todo", json!({ "id": "1" })),
        ],
    )
    .await;

    let codes: Vec<Option<i32>> = responses.iter().map(|r| r.error_code()).collect();
    assert_eq!(
        codes,
        [
            Some(error_codes::INVALID_PARAMS),
            Some(error_codes::INVALID_PARAMS),
            Some(error_codes::INVALID_PARAMS),
            Some(error_codes::NOT_FOUND),
            Some(error_codes::METHOD_NOT_FOUND),
        ]
    );
    assert_eq!(responses[4].error.as_ref().unwrap().message, "Unknown tool: archive_todo");
    assert_eq!(catalog.read().await.list(), before);
}

#[tokio::test]
async fn test_bad_lines_get_parse_or_invalid_request_errors() {
    let server = McpServer::new();

    let (writer, mut reader) = tokio::io::duplex(4096);
    let input: &[u8] = b"{not json\n\
        {\"jsonrpc\":\"2.0\",\"id\":7}\n\
        {\"jsonrpc\":\"2.0\",\"id\":\"a\",\"method\":\"ping\"}\n";
    server
        .run(StdioTransport::with_io(BufReader::new(input), writer))
        .await
        .unwrap();

    let mut output = String::new();
    reader.read_to_string(&mut output).await.unwrap();
    let responses: Vec<JsonRpcResponse> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].error_code(), Some(error_codes::PARSE_ERROR));
    assert_eq!(responses[0].id, RequestId::Null);
    assert_eq!(responses[1].error_code(), Some(error_codes::INVALID_REQUEST));
    assert_eq!(responses[1].id, RequestId::Number(7));
    assert_eq!(responses[2].id, RequestId::String("a".to_string()));
    assert!(responses[2].error.is_none());
}

#[tokio::test]
async fn test_japanese_session() {
    let mut config = TicklistConfig::default();
    config.server.locale = Locale::Ja;
    let (server, _) = seeded(&config);

    let responses = session(
        &server,
        &[
            call(1, "add_todo", json!({ "title": "出荷" })),
            call(2, "complete_todo", json!({ "id": "1" })),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "resources/read",
                "params": { "uri": "todo:///4" }
            }),
            call(4, "complete_todo", json!({ "id": "9" })),
        ],
    )
    .await;

    assert_eq!(text(&responses[0]), "TODOを追加しました - ID: 4, タイトル: 出荷");
    assert_eq!(text(&responses[1]), "ID 1 のTODOはすでに完了しています");
    assert_eq!(
        responses[2].result.as_ref().unwrap()["contents"][0]["text"],
        "ID: 4\nタイトル: 出荷\n状態: 未完了"
    );
    assert_eq!(
        responses[3].error.as_ref().unwrap().message,
        "ID 9 のTODOは見つかりません"
    );
}
