//! Probe scenarios and response evaluation.
//!
//! Every platform is asked the same two questions: a weather question with a
//! `get_weather` tool attached (tool-calling), and a weather question with a
//! strict JSON schema attached (structured output). Evaluation turns the
//! response (or the request error) into a [`TestRun`] value; nothing in
//! here is an `Err`.

use serde_json::{json, Value};

use toolgrid_core::{Capability, RunStatus, TestRun, ToolCallRecord};

use crate::api::{ChatRequest, ChatResponse, ProbeError};

/// Prompt used for tool-calling probes.
pub const TOOL_PROMPT: &str = "What's the weather like in San Francisco?";

/// Prompt used for structured-output probes.
pub const STRUCTURED_PROMPT: &str = "What's the weather like in London?";

/// Keys the structured-output response must carry to count as on-schema.
pub const REQUIRED_KEYS: [&str; 3] = ["location", "temperature", "conditions"];

/// The `get_weather` tool definition.
pub fn weather_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": "get_weather",
            "description": "Get the current weather in a given location",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "The city and state, e.g. San Francisco, CA"
                    },
                    "unit": {
                        "type": "string",
                        "enum": ["celsius", "fahrenheit"],
                        "description": "The unit of temperature"
                    }
                },
                "required": ["location"]
            }
        }
    })
}

/// The strict `weather` response format.
pub fn weather_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "weather",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "City or location name"
                    },
                    "temperature": {
                        "type": "number",
                        "description": "Temperature in Celsius"
                    },
                    "conditions": {
                        "type": "string",
                        "description": "Weather conditions description"
                    }
                },
                "required": ["location", "temperature", "conditions"],
                "additionalProperties": false
            }
        }
    })
}

/// Build a tool-calling probe request.
pub fn tool_call_request(model: &str) -> ChatRequest {
    let mut request = ChatRequest::new(model, TOOL_PROMPT);
    request.tools = Some(vec![weather_tool()]);
    request
}

/// Build a structured-output probe request.
pub fn structured_output_request(model: &str) -> ChatRequest {
    let mut request = ChatRequest::new(model, STRUCTURED_PROMPT);
    request.response_format = Some(weather_response_format());
    request
}

fn first_choice(response: &ChatResponse) -> (Option<&str>, Option<&str>) {
    match response.choices.first() {
        Some(choice) => (
            choice.message.content.as_deref(),
            choice.finish_reason.as_deref(),
        ),
        None => (None, None),
    }
}

/// Evaluate one tool-calling attempt.
pub fn evaluate_tool_run(outcome: Result<ChatResponse, ProbeError>) -> TestRun {
    let response = match outcome {
        Ok(response) => response,
        Err(error) => return TestRun::new(RunStatus::Error).with_error(error.to_string()),
    };

    let tool_calls = response
        .choices
        .first()
        .and_then(|c| c.message.tool_calls.as_ref())
        .filter(|calls| !calls.is_empty())
        .map(|calls| {
            calls
                .iter()
                .map(|call| ToolCallRecord {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                })
                .collect::<Vec<_>>()
        });

    let (content, finish_reason) = first_choice(&response);
    let run = match (tool_calls, content) {
        (Some(calls), _) => TestRun::new(RunStatus::Success).with_tool_calls(calls),
        (None, Some(content)) if !content.is_empty() => {
            TestRun::new(RunStatus::NoToolCall).with_content(content.to_string())
        }
        _ => TestRun::new(RunStatus::Unclear),
    };

    match finish_reason {
        Some(reason) => run.with_finish_reason(reason.to_string()),
        None => run,
    }
}

/// Evaluate one attempt for the given capability.
pub fn evaluate_run(capability: Capability, outcome: Result<ChatResponse, ProbeError>) -> TestRun {
    match capability {
        Capability::ToolCalls => evaluate_tool_run(outcome),
        Capability::StructuredOutput => evaluate_structured_run(outcome),
    }
}

/// Evaluate one structured-output attempt.
pub fn evaluate_structured_run(outcome: Result<ChatResponse, ProbeError>) -> TestRun {
    let response = match outcome {
        Ok(response) => response,
        Err(error) => return TestRun::new(RunStatus::Error).with_error(error.to_string()),
    };

    let (content, finish_reason) = first_choice(&response);
    let run = match content {
        Some(content) if !content.is_empty() => {
            let status = match serde_json::from_str::<Value>(content) {
                Ok(parsed) => {
                    if REQUIRED_KEYS.iter().all(|key| parsed.get(key).is_some()) {
                        RunStatus::Success
                    } else {
                        RunStatus::InvalidSchema
                    }
                }
                Err(_) => RunStatus::InvalidJson,
            };
            TestRun::new(status).with_content(content.to_string())
        }
        _ => TestRun::new(RunStatus::Unclear),
    };

    match finish_reason {
        Some(reason) => run.with_finish_reason(reason.to_string()),
        None => run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: Value) -> ChatResponse {
        serde_json::from_value(body).expect("response fixture")
    }

    #[test]
    fn test_tool_request_carries_tool_schema() {
        let request = tool_call_request("vendor/model");
        let tools = request.tools.as_ref().expect("tools");
        assert_eq!(tools[0]["function"]["name"], "get_weather");
        assert!(request.response_format.is_none());
    }

    #[test]
    fn test_structured_request_carries_schema() {
        let request = structured_output_request("vendor/model");
        let format = request.response_format.as_ref().expect("response format");
        assert_eq!(format["json_schema"]["name"], "weather");
        assert!(request.tools.is_none());
    }

    #[test]
    fn test_tool_call_response_is_success() {
        let run = evaluate_tool_run(Ok(response(json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_0",
                        "function": {"name": "get_weather", "arguments": "{}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))));

        assert_eq!(run.status, RunStatus::Success);
        let calls = run.tool_calls.expect("recorded calls");
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(run.finish_reason.as_deref(), Some("tool_calls"));
    }

    #[test]
    fn test_prose_answer_is_no_tool_call() {
        let run = evaluate_tool_run(Ok(response(json!({
            "choices": [{"message": {"content": "It is sunny."}, "finish_reason": "stop"}]
        }))));

        assert_eq!(run.status, RunStatus::NoToolCall);
        assert_eq!(run.response_content.as_deref(), Some("It is sunny."));
    }

    #[test]
    fn test_empty_response_is_unclear() {
        let run = evaluate_tool_run(Ok(response(json!({"choices": [{}]}))));
        assert_eq!(run.status, RunStatus::Unclear);

        let run = evaluate_tool_run(Ok(response(json!({"choices": []}))));
        assert_eq!(run.status, RunStatus::Unclear);
    }

    #[test]
    fn test_request_error_is_error_run() {
        let run = evaluate_tool_run(Err(ProbeError::Api {
            status: 404,
            body: "No endpoints found".to_string(),
        }));

        assert_eq!(run.status, RunStatus::Error);
        assert!(run.error.expect("error text").contains("404"));
    }

    #[test]
    fn test_structured_valid_payload_is_success() {
        let run = evaluate_structured_run(Ok(response(json!({
            "choices": [{"message": {
                "content": "{\"location\":\"London\",\"temperature\":18,\"conditions\":\"cloudy\"}"
            }}]
        }))));

        assert_eq!(run.status, RunStatus::Success);
    }

    #[test]
    fn test_structured_missing_key_is_invalid_schema() {
        let run = evaluate_structured_run(Ok(response(json!({
            "choices": [{"message": {"content": "{\"location\":\"London\"}"}}]
        }))));

        assert_eq!(run.status, RunStatus::InvalidSchema);
    }

    #[test]
    fn test_structured_unparsable_payload_is_invalid_json() {
        let run = evaluate_structured_run(Ok(response(json!({
            "choices": [{"message": {"content": "London is mild today."}}]
        }))));

        assert_eq!(run.status, RunStatus::InvalidJson);
    }
}
