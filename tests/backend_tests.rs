// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use futures::StreamExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moat_tutor::error::TutorError;
use moat_tutor::llm::message::{ChatMessage, Conversation};
use moat_tutor::llm::provider::{CompletionRequest, ModelBackend, StopReason};
use moat_tutor::llm::providers::OpenAiBackend;
use moat_tutor::stream::DeltaAccumulator;

fn sample_request() -> CompletionRequest {
    let mut conversation = Conversation::new();
    conversation.set_system("You are MoatTutor.");
    conversation.push(ChatMessage::user("Why did AAPL move?"));
    CompletionRequest::new("gpt-5-nano", conversation)
}

fn backend_for(server: &MockServer) -> OpenAiBackend {
    OpenAiBackend::with_base_url("test-key", format!("{}/v1/chat/completions", server.uri()))
}

#[tokio::test]
async fn test_complete_parses_response_and_stop_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-5-nano",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-5-nano",
            "choices": [{
                "message": {"role": "assistant", "content": "Summary: a fine quarter."},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .complete(sample_request())
        .await
        .unwrap();

    assert_eq!(response.text, "Summary: a fine quarter.");
    assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    assert_eq!(response.id, "chatcmpl-1");
}

#[tokio::test]
async fn test_complete_sends_system_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                {"role": "system", "content": "You are MoatTutor."},
                {"role": "user", "content": "Why did AAPL move?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-2",
            "model": "gpt-5-nano",
            "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server).complete(sample_request()).await.unwrap();
}

#[tokio::test]
async fn test_complete_maps_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"message": "upstream exploded"}
        })))
        .mount(&server)
        .await;

    let error = backend_for(&server)
        .complete(sample_request())
        .await
        .unwrap_err();

    match error {
        TutorError::Api(api) => {
            let text = api.to_string();
            assert!(text.contains("500"));
            assert!(text.contains("upstream exploded"));
        }
        other => panic!("expected Api error, got {other}"),
    }
}

#[tokio::test]
async fn test_complete_maps_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "invalid key"}
        })))
        .mount(&server)
        .await;

    let error = backend_for(&server)
        .complete(sample_request())
        .await
        .unwrap_err();

    assert!(error.to_string().contains("Authentication failed"));
}

#[tokio::test]
async fn test_stream_parses_sse_frames_into_visible_text() {
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Summary: \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"a fine quarter.\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut chunks = backend_for(&server)
        .complete_stream(sample_request())
        .await
        .unwrap();

    let mut accumulator = DeltaAccumulator::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.unwrap();
        if matches!(chunk, moat_tutor::llm::provider::ResponseChunk::Done { .. }) {
            break;
        }
        accumulator.push(&chunk);
    }

    assert_eq!(accumulator.finish(), "Summary: a fine quarter.");
}

#[tokio::test]
async fn test_stream_connect_failure_surfaces_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let error = match backend_for(&server).complete_stream(sample_request()).await {
        Ok(_) => panic!("expected complete_stream to surface connect failure"),
        Err(e) => e,
    };

    assert!(error.to_string().contains("Rate limited"));
}
