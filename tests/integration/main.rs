//! Integration tests using WireMock
//!
//! These tests run the full request/response cycle against a mock Postmark
//! server: payload serialization, authentication headers, and response
//! classification.

mod backend;
mod email;

use postmark_client::PostmarkClient;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "POSTMARK_API_TEST";

/// Helper to create a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Helper to create a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> PostmarkClient {
    PostmarkClient::builder()
        .api_key(TEST_TOKEN)
        .base_url(server.uri())
        .build()
        .unwrap()
}

/// Helper to create an authenticated JSON mock.
pub fn mock_with_auth(path_matcher: &str, method_matcher: &str) -> MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("X-Postmark-Server-Token", TEST_TOKEN))
        .and(header("Accept", "application/json"))
}

/// Helper to create Postmark error responses.
pub fn error_response(status: u16, error_code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "ErrorCode": error_code,
        "Message": message
    }))
}

/// Helper to create an accepted single-message result.
pub fn accepted(to: &str, message_id: &str) -> Value {
    json!({
        "To": to,
        "SubmittedAt": "2014-02-17T07:25:01.4178645-05:00",
        "MessageID": message_id,
        "ErrorCode": 0,
        "Message": "OK"
    })
}

/// Returns the JSON body of the only request the server received.
pub async fn single_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    serde_json::from_slice(&requests[0].body).unwrap()
}
