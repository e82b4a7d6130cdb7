use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

use megasena::DrawSource;

use crate::use_cases::{ChatUseCase, DrawUseCase, PickUseCase};

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, serde::Deserialize)]
struct JsonRpcRequest {
    method: String,
    params: Option<Value>,
    id: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id: Some(id.unwrap_or(json!(1))),
        }
    }

    fn failure(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id: Some(id.unwrap_or(json!(1))),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

/// Line-delimited JSON-RPC 2.0 server speaking the MCP tool protocol.
pub struct MCPHandler<S> {
    pick_use_case: Arc<PickUseCase<S>>,
    draw_use_case: Arc<DrawUseCase<S>>,
    chat_use_case: Arc<ChatUseCase<S>>,
}

impl<S: DrawSource> MCPHandler<S> {
    pub fn new(
        pick_use_case: Arc<PickUseCase<S>>,
        draw_use_case: Arc<DrawUseCase<S>>,
        chat_use_case: Arc<ChatUseCase<S>>,
    ) -> Self {
        Self {
            pick_use_case,
            draw_use_case,
            chat_use_case,
        }
    }

    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => {
                    // Notifications never get an answer.
                    if request.id.is_none() || request.method.starts_with("notifications/") {
                        if request.method == "notifications/initialized" {
                            info!("🍀 Client initialized");
                        }
                        continue;
                    }
                    self.handle_request(request).await
                }
                Err(e) => {
                    warn!("Failed to parse request: {} - Line: {}", e, line);
                    JsonRpcResponse {
                        jsonrpc: "2.0",
                        result: None,
                        error: Some(JsonRpcError {
                            code: PARSE_ERROR,
                            message: "Parse error".to_string(),
                            data: Some(json!(e.to_string())),
                        }),
                        id: None,
                    }
                }
            };

            writeln!(writer, "{}", serde_json::to_string(&response)?)?;
            writer.flush()?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => {
                info!("🍀 Initializing Mega-Sena MCP server");
                JsonRpcResponse::success(
                    request.id,
                    json!({
                        "protocolVersion": "2024-11-05",
                        "capabilities": {
                            "tools": {}
                        },
                        "serverInfo": {
                            "name": "megasena-mcp-server",
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }),
                )
            }
            "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": self.get_tools() })),
            "tools/call" => self.handle_call_tool(request.params, request.id).await,
            other => JsonRpcResponse::failure(
                request.id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    async fn handle_call_tool(&self, params: Option<Value>, id: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params".to_string());
        };
        let Some(tool_name) = params.get("name").and_then(|n| n.as_str()) else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name".to_string());
        };

        let arguments: HashMap<String, Value> = params
            .get("arguments")
            .cloned()
            .and_then(|a| serde_json::from_value(a).ok())
            .unwrap_or_default();

        debug!("tool call {}", tool_name);
        match self.execute_tool(tool_name, &arguments).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": content
                        }
                    ]
                }),
            ),
            Err(e) => JsonRpcResponse::failure(
                id,
                INTERNAL_ERROR,
                format!("Tool execution error: {}", e),
            ),
        }
    }

    async fn execute_tool(&self, tool_name: &str, arguments: &HashMap<String, Value>) -> Result<String> {
        match tool_name {
            "validate_numbers" => self.pick_use_case.validate_numbers(arguments).await,
            "add_pick" => self.pick_use_case.add_pick(arguments).await,
            "list_picks" => self.pick_use_case.list_picks(arguments).await,
            "remove_pick" => self.pick_use_case.remove_pick(arguments).await,
            "fetch_latest_result" => self.draw_use_case.fetch_latest_result(arguments).await,
            "fetch_result_by_contest" => self.draw_use_case.fetch_result_by_contest(arguments).await,
            "refresh_latest_result" => self.draw_use_case.refresh_latest_result(arguments).await,
            "set_manual_result" => self.draw_use_case.set_manual_result(arguments).await,
            "check_picks" => self.draw_use_case.check_picks(arguments).await,
            "chat_message" => self.chat_use_case.chat_message(arguments).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", tool_name)),
        }
    }

    fn get_tools(&self) -> Vec<Tool> {
        let user_id = json!({
            "type": "integer",
            "description": "Chat user id that owns the picks"
        });
        let numbers = json!({
            "type": "string",
            "description": "Six distinct numbers from 1 to 60, separated by commas or spaces"
        });
        let contest = json!({
            "type": "integer",
            "description": "Contest (draw) number"
        });

        vec![
            Tool {
                name: "validate_numbers".to_string(),
                description: "Check that a text holds exactly six distinct numbers from 1 to 60".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "numbers": numbers },
                    "required": ["numbers"]
                }),
            },
            Tool {
                name: "add_pick".to_string(),
                description: "Register a Mega-Sena pick for a user".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "user_id": user_id, "numbers": numbers },
                    "required": ["user_id", "numbers"]
                }),
            },
            Tool {
                name: "list_picks".to_string(),
                description: "List a user's registered picks in registration order".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "user_id": user_id },
                    "required": ["user_id"]
                }),
            },
            Tool {
                name: "remove_pick".to_string(),
                description: "Delete one of the user's picks by id".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "user_id": user_id,
                        "pick_id": {
                            "type": "integer",
                            "description": "Id returned by add_pick or list_picks"
                        }
                    },
                    "required": ["user_id", "pick_id"]
                }),
            },
            Tool {
                name: "fetch_latest_result".to_string(),
                description: "Get the latest draw (cached for a few minutes)".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            Tool {
                name: "fetch_result_by_contest".to_string(),
                description: "Get the draw of a specific contest".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "contest": contest },
                    "required": ["contest"]
                }),
            },
            Tool {
                name: "refresh_latest_result".to_string(),
                description: "Fetch the latest draw now, replacing the cached or manual result".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            Tool {
                name: "set_manual_result".to_string(),
                description: "Pin a manually entered result as the latest draw".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "numbers": numbers,
                        "label": {
                            "type": "string",
                            "description": "Display label for the result (default: MANUAL)"
                        }
                    },
                    "required": ["numbers"]
                }),
            },
            Tool {
                name: "check_picks".to_string(),
                description: "Score a user's picks against the latest draw or a given contest".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": { "user_id": user_id, "contest": contest },
                    "required": ["user_id"]
                }),
            },
            Tool {
                name: "chat_message".to_string(),
                description: "Send a chat message (menu option or reply) and get the bot's answer".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "user_id": user_id,
                        "text": {
                            "type": "string",
                            "description": "Message text, or an excluir_<id> button payload"
                        }
                    },
                    "required": ["user_id", "text"]
                }),
            },
        ]
    }
}

pub fn stdio() -> (BufReader<io::Stdin>, io::Stdout) {
    (BufReader::new(io::stdin()), io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena::{ContestId, DrawFetcher, DrawResult, FetchError, LotteryService, PickStore};
    use std::io::Cursor;

    struct FixedSource;

    fn draw(contest: u32, numbers: &[u8]) -> DrawResult {
        DrawResult {
            contest: ContestId::Official(contest),
            numbers: numbers.to_vec(),
            draw_date: "20/09/2025".to_string(),
            prize_tiers: Vec::new(),
            accumulated: false,
            rollover_amount: None,
            next_draw: None,
        }
    }

    impl DrawSource for FixedSource {
        async fn fetch(&self, contest: Option<u32>) -> std::result::Result<DrawResult, FetchError> {
            match contest {
                None => Ok(draw(2800, &[4, 15, 23, 9, 11, 56])),
                Some(1000) => Ok(draw(1000, &[1, 2, 3, 40, 50, 60])),
                Some(n) => Err(FetchError::ContestNotFound(n)),
            }
        }
    }

    async fn run(requests: &[Value]) -> Vec<Value> {
        let lines: Vec<String> = requests.iter().map(|r| r.to_string()).collect();
        run_raw(&lines.join("\n")).await
    }

    async fn run_raw(input: &str) -> Vec<Value> {
        let service = Arc::new(LotteryService::new(
            PickStore::open_in_memory().unwrap(),
            DrawFetcher::new(FixedSource),
        ));
        let handler = MCPHandler::new(
            Arc::new(PickUseCase::new(Arc::clone(&service))),
            Arc::new(DrawUseCase::new(Arc::clone(&service))),
            Arc::new(ChatUseCase::new(Arc::clone(&service))),
        );

        let mut out = Vec::new();
        handler
            .serve(Cursor::new(input.to_string()), &mut out)
            .await
            .unwrap();

        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn call(id: i64, tool: &str, arguments: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments }
        })
    }

    fn tool_payload(response: &Value) -> Value {
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn initialize_and_list_tools() {
        let responses = run(&[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ])
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(
            responses[0]["result"]["serverInfo"]["name"],
            "megasena-mcp-server"
        );
        let tools = responses[1]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().any(|t| t["name"] == "check_picks"));
    }

    #[tokio::test]
    async fn protocol_errors() {
        let responses = run_raw(
            "not json\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"resources/list\"}\n\
             {\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"tools/call\"}",
        )
        .await;

        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["error"]["code"], -32601);
        assert_eq!(responses[2]["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn add_list_and_check_picks() {
        let responses = run(&[
            call(1, "add_pick", json!({"user_id": 9, "numbers": "56 40 33 23 15 4"})),
            call(2, "list_picks", json!({"user_id": 9})),
            call(3, "check_picks", json!({"user_id": 9})),
            call(4, "check_picks", json!({"user_id": 9, "contest": 1000})),
            call(5, "check_picks", json!({"user_id": 9, "contest": 77})),
        ])
        .await;

        let added = tool_payload(&responses[0]);
        assert_eq!(added["success"], true);
        assert_eq!(added["pick"]["numbers"], json!([4, 15, 23, 33, 40, 56]));

        let listed = tool_payload(&responses[1]);
        assert_eq!(listed["picks"].as_array().unwrap().len(), 1);

        let latest = tool_payload(&responses[2]);
        assert_eq!(latest["entries"][0]["hit_count"], 4);
        assert_eq!(latest["entries"][0]["tier"], "quadra");
        assert_eq!(latest["entries"][0]["tier_label"], "Quadra");
        assert_eq!(latest["entries"][0]["numbers"], "04,15,23,33,40,56");

        let past = tool_payload(&responses[3]);
        assert_eq!(past["entries"][0]["hit_count"], 1);

        let missing = tool_payload(&responses[4]);
        assert_eq!(missing["success"], false);
    }

    #[tokio::test]
    async fn invalid_numbers_are_reported_not_failed() {
        let responses = run(&[
            call(1, "add_pick", json!({"user_id": 9, "numbers": "1,2,3,4,5,5"})),
            call(2, "validate_numbers", json!({"numbers": "60 1 2 3 4 5"})),
            call(3, "add_pick", json!({"numbers": "1,2,3,4,5,6"})),
        ])
        .await;

        let rejected = tool_payload(&responses[0]);
        assert_eq!(rejected["success"], false);
        assert!(rejected["error"].as_str().unwrap().contains("duplicate"));

        let valid = tool_payload(&responses[1]);
        assert_eq!(valid["canonical"], "01,02,03,04,05,60");

        assert_eq!(responses[2]["error"]["code"], -32603);
    }

    #[tokio::test]
    async fn manual_result_and_remove() {
        let responses = run(&[
            call(1, "set_manual_result", json!({"numbers": "1 2 3 4 5 6"})),
            call(2, "fetch_latest_result", json!({})),
            call(3, "refresh_latest_result", json!({})),
            call(4, "add_pick", json!({"user_id": 1, "numbers": "1,2,3,4,5,6"})),
            call(5, "remove_pick", json!({"user_id": 1, "pick_id": 1})),
            call(6, "remove_pick", json!({"user_id": 1, "pick_id": 1})),
        ])
        .await;

        let latest = tool_payload(&responses[1]);
        assert_eq!(latest["result"]["contest"]["kind"], "manual");
        assert_eq!(latest["result"]["draw_date"], "MANUAL");

        let refreshed = tool_payload(&responses[2]);
        assert_eq!(refreshed["result"]["contest"]["number"], 2800);

        assert_eq!(tool_payload(&responses[4])["removed"], true);
        assert_eq!(tool_payload(&responses[5])["removed"], false);
    }

    #[tokio::test]
    async fn chat_message_drives_the_menu() {
        let responses = run(&[
            call(1, "chat_message", json!({"user_id": 5, "text": "➕ Adicionar Jogo"})),
            call(2, "chat_message", json!({"user_id": 5, "text": "4,15,23,33,40,56"})),
            call(3, "chat_message", json!({"user_id": 5, "text": "excluir_1"})),
        ])
        .await;

        assert!(
            tool_payload(&responses[0])["reply"]
                .as_str()
                .unwrap()
                .contains("6 dezenas")
        );
        assert_eq!(
            tool_payload(&responses[1])["reply"],
            "✅ Jogo cadastrado: 04,15,23,33,40,56"
        );
        assert_eq!(
            tool_payload(&responses[2])["reply"],
            "🗑️ Jogo removido com sucesso!"
        );
    }
}
