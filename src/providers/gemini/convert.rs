use crate::core::types::{CompletionRequest, HistoryEntry, Role, StopReason, StreamEvent, Usage};
use crate::providers::error::ProviderError;

use super::types::{
    ApiError, ApiRequest, ApiResponse, Content, GenerationConfig, Part, SystemInstruction,
};

pub fn to_api_request(request: &CompletionRequest) -> ApiRequest {
    let contents = request.history.iter().map(to_content).collect();

    let system_instruction = request
        .system_instruction
        .as_ref()
        .filter(|text| !text.is_empty())
        .map(|text| SystemInstruction {
            parts: vec![Part::text(text.clone())],
        });

    ApiRequest {
        contents,
        system_instruction,
        generation_config: Some(GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: Some(request.temperature),
        }),
    }
}

fn to_content(entry: &HistoryEntry) -> Content {
    let role = match entry.role {
        Role::User => "user",
        Role::Assistant => "model",
    };

    Content {
        role: role.to_string(),
        parts: vec![Part::text(entry.text.clone())],
    }
}

fn to_stop_reason(reason: &str) -> StopReason {
    match reason {
        "STOP" => StopReason::EndTurn,
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            StopReason::Safety
        }
        _ => StopReason::Other,
    }
}

/// Decodes one SSE `data` payload. A chunk may carry text and the finish
/// marker together, so text always comes first in the result.
pub fn parse_stream_event(data: &str) -> Result<Vec<StreamEvent>, ProviderError> {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(data) {
        let detail = api_error.error;
        return Err(match detail.code {
            0 => ProviderError::StreamError(detail.message),
            code => ProviderError::server(code, detail.message),
        });
    }

    let response: ApiResponse =
        serde_json::from_str(data).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ProviderError::Blocked(reason.to_string()));
    }

    let mut events = Vec::new();
    let Some(candidate) = response.candidates.first() else {
        return Ok(events);
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(Part::answer_text)
        .collect();

    if !text.is_empty() {
        events.push(StreamEvent::TextDelta(text));
    }

    if let Some(reason) = &candidate.finish_reason {
        events.push(StreamEvent::Finished {
            stop_reason: to_stop_reason(reason),
            usage: response
                .usage_metadata
                .map(|u| Usage::new(u.prompt_token_count, u.candidates_token_count)),
        });
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_api_request_maps_roles() {
        let request = CompletionRequest::new(vec![
            HistoryEntry::user("Hi"),
            HistoryEntry::assistant("Hello!"),
            HistoryEntry::user("What is Firebase?"),
        ])
        .with_system_instruction("You are helpful")
        .with_temperature(0.7);

        let api_request = to_api_request(&request);

        let roles: Vec<_> = api_request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert!(api_request.system_instruction.is_some());

        let config = api_request.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.7));
        assert!(config.max_output_tokens.is_none());
    }

    #[test]
    fn test_empty_system_instruction_is_omitted() {
        let request =
            CompletionRequest::new(vec![HistoryEntry::user("Hi")]).with_system_instruction("");
        assert!(to_api_request(&request).system_instruction.is_none());
    }

    #[test]
    fn test_parse_text_chunk() {
        let data = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Fire"},{"text":"base"}]},"index":0}]}"#;
        let events = parse_stream_event(data).unwrap();
        assert_eq!(events, vec![StreamEvent::TextDelta("Firebase".to_string())]);
    }

    #[test]
    fn test_parse_final_chunk_keeps_text() {
        let data = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":" platform."}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":7}}"#;
        let events = parse_stream_event(data).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::TextDelta(" platform.".to_string()));
        assert_eq!(
            events[1],
            StreamEvent::Finished {
                stop_reason: StopReason::EndTurn,
                usage: Some(Usage::new(12, 7)),
            }
        );
    }

    #[test]
    fn test_parse_skips_thought_parts() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"thinking","thought":true},{"text":"answer"}]}}]}"#;
        let events = parse_stream_event(data).unwrap();
        assert_eq!(events, vec![StreamEvent::TextDelta("answer".to_string())]);
    }

    #[test]
    fn test_parse_metadata_only_chunk() {
        let data = r#"{"usageMetadata":{"promptTokenCount":3}}"#;
        assert!(parse_stream_event(data).unwrap().is_empty());
    }

    #[test]
    fn test_parse_safety_finish() {
        let data = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let events = parse_stream_event(data).unwrap();
        assert!(matches!(
            events[0],
            StreamEvent::Finished {
                stop_reason: StopReason::Safety,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let data = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = parse_stream_event(data).unwrap_err();
        assert!(matches!(err, ProviderError::Blocked(reason) if reason == "SAFETY"));
    }

    #[test]
    fn test_parse_error_payload() {
        let data = r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#;
        let err = parse_stream_event(data).unwrap_err();
        assert!(matches!(err, ProviderError::Server { status: 503, .. }));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_stream_event("not json"),
            Err(ProviderError::ParseError(_))
        ));
    }
}
