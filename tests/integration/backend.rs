//! Integration tests for the mail backend

use super::*;
use postmark_client::backend::{ContentSubtype, OutboundAttachment, PostmarkOptions};
use postmark_client::{EmailBackend, OutboundEmail, PostmarkBackend, SendOutcome};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn backend_for(server: &MockServer, return_message_id: bool) -> PostmarkBackend {
    let client = PostmarkClient::builder()
        .api_key(TEST_TOKEN)
        .base_url(server.uri())
        .return_message_id(return_message_id)
        .build()
        .unwrap();
    PostmarkBackend::new(client)
}

fn email(body: &str) -> OutboundEmail {
    OutboundEmail::new("html test", body)
        .from_email("from@test.com")
        .to("recipient@test.com")
}

fn batch_body() -> serde_json::Value {
    json!([
        {
            "ErrorCode": 0,
            "Message": "OK",
            "MessageID": "b7bc2f4a-e38e-4336-af7d-e6c392c2f817",
            "SubmittedAt": "2010-11-26T12:01:05.1794748-05:00",
            "To": "receiver1@example.com"
        },
        {
            "ErrorCode": 0,
            "Message": "OK",
            "MessageID": "e2ecbbfc-fe12-463d-b933-9fe22915106d",
            "SubmittedAt": "2010-11-26T12:01:05.1794748-05:00",
            "To": "receiver2@example.com"
        }
    ])
}

async fn mount_single(server: &MockServer) {
    mock_with_auth("/email", "POST")
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted(
            "recipient@test.com",
            "0a129aee-e1cd-480d-b08d-4f48548ff48d",
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_html_alternative() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let message = email("hello there").attach_alternative("<b>hello</b> there", "text/html");
    backend_for(&mock_server, false)
        .send_message(&message)
        .await
        .unwrap();

    let body = single_request_body(&mock_server).await;
    assert_eq!(body["TextBody"], "hello there");
    assert_eq!(body["HtmlBody"], "<b>hello</b> there");
}

#[tokio::test]
async fn test_html_content_subtype() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let message = email("<b>hello</b> there").content_subtype(ContentSubtype::Html);
    backend_for(&mock_server, false)
        .send_message(&message)
        .await
        .unwrap();

    let body = single_request_body(&mock_server).await;
    assert_eq!(body["HtmlBody"], "<b>hello</b> there");
    assert!(body.get("TextBody").is_none());
}

#[tokio::test]
async fn test_count_single() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let outcome = backend_for(&mock_server, false)
        .send_messages(&[email("<b>hello</b> there")])
        .await
        .unwrap();

    assert_eq!(outcome, SendOutcome::Count(1));
}

#[tokio::test]
async fn test_count_batch() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email/batch", "POST")
        .respond_with(ResponseTemplate::new(200).set_body_json(batch_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = backend_for(&mock_server, false)
        .send_messages(&[email("one"), email("two")])
        .await
        .unwrap();

    assert_eq!(outcome, SendOutcome::Count(2));
}

#[tokio::test]
async fn test_nothing_to_send() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let no_recipients = OutboundEmail::new("html test", "body").from_email("from@test.com");
    let backend = backend_for(&mock_server, false);

    let outcome = backend
        .send_messages(&[no_recipients.clone()])
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::Count(0));

    let outcome = backend
        .send_messages(&[no_recipients.clone(), no_recipients])
        .await
        .unwrap();
    assert_eq!(outcome, SendOutcome::Count(0));
}

#[tokio::test]
async fn test_message_id_single() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let outcome = backend_for(&mock_server, true)
        .send_messages(&[email("<b>hello</b> there")])
        .await
        .unwrap();

    assert_eq!(
        outcome.message_ids().unwrap()[0],
        "0a129aee-e1cd-480d-b08d-4f48548ff48d"
    );
}

#[tokio::test]
async fn test_message_id_batch() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email/batch", "POST")
        .respond_with(ResponseTemplate::new(200).set_body_json(batch_body()))
        .mount(&mock_server)
        .await;

    let outcome = backend_for(&mock_server, true)
        .send_messages(&[email("one"), email("two")])
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SendOutcome::MessageIds(vec![
            "b7bc2f4a-e38e-4336-af7d-e6c392c2f817".to_string(),
            "e2ecbbfc-fe12-463d-b933-9fe22915106d".to_string(),
        ])
    );
}

#[tokio::test]
async fn test_attachment_bytes() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let message = email("hello there").attach(OutboundAttachment::file(
        "filename.csv",
        b"1,2,3".to_vec(),
        Some("text/csv"),
    ));
    backend_for(&mock_server, false)
        .send_message(&message)
        .await
        .unwrap();

    let body = single_request_body(&mock_server).await;
    assert_eq!(
        body["Attachments"],
        json!([{"Name": "filename.csv", "Content": "MSwyLDM=", "ContentType": "text/csv"}])
    );
}

#[tokio::test]
async fn test_message_stream() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let message = email("hello there")
        .attach_alternative("<b>hello</b> there", "text/html")
        .postmark(PostmarkOptions {
            message_stream: Some("broadcast".to_string()),
            ..PostmarkOptions::default()
        });
    backend_for(&mock_server, false)
        .send_message(&message)
        .await
        .unwrap();

    let body = single_request_body(&mock_server).await;
    assert_eq!(body["MessageStream"], "broadcast");
    assert_eq!(body["TextBody"], "hello there");
    assert_eq!(body["HtmlBody"], "<b>hello</b> there");
}

#[tokio::test]
async fn test_reply_to_header() {
    let mock_server = setup_mock_server().await;
    mount_single(&mock_server).await;

    let message = email("hello there")
        .header("Reply-To", "replies@test.com")
        .header("X-PM-Tag", "welcome")
        .header("X-Custom", "value");
    backend_for(&mock_server, false)
        .send_message(&message)
        .await
        .unwrap();

    let body = single_request_body(&mock_server).await;
    assert_eq!(body["ReplyTo"], "replies@test.com");
    assert_eq!(body["Tag"], "welcome");
    assert_eq!(body["Headers"], json!([{"Name": "X-Custom", "Value": "value"}]));
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/email/batch"))
        .respond_with(error_response(500, 0, "Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = backend_for(&mock_server, false)
        .send_messages(&[email("one"), email("two")])
        .await
        .unwrap_err();

    assert!(matches!(err, postmark_client::PostmarkError::Server { .. }));
}
