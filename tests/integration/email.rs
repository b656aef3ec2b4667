//! Integration tests for message sends

use super::*;
use postmark_client::{
    Attachment, Message, Metadata, MimePart, MissingField, PostmarkClient, PostmarkError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn message() -> postmark_client::MessageBuilder {
    Message::builder()
        .sender("sender@example.com")
        .to("receiver@example.com")
        .subject("Subject")
        .text_body("Body")
}

#[tokio::test]
async fn test_send_success() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .and(body_partial_json(json!({
            "From": "sender@example.com",
            "To": "receiver@example.com",
            "Subject": "Subject",
            "TextBody": "Body"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted(
            "receiver@example.com",
            "0a129aee-e1cd-480d-b08d-4f48548ff48d",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server)
        .emails()
        .send(&message().build())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(
        response.message_id.as_deref(),
        Some("0a129aee-e1cd-480d-b08d-4f48548ff48d")
    );
}

#[tokio::test]
async fn test_send_sets_json_content_type() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .and(wiremock::matchers::header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("r@example.com", "id")))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .emails()
        .send(&message().build())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unset_fields_are_omitted() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("r@example.com", "id")))
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .emails()
        .send(&message().build())
        .await
        .unwrap();

    let body = single_request_body(&mock_server).await;
    for key in ["Cc", "Bcc", "HtmlBody", "ReplyTo", "Headers", "Attachments", "Metadata", "TrackOpens", "MessageStream", "Tag"] {
        assert!(body.get(key).is_none(), "{key} should be omitted");
    }
}

#[test_case(Message::builder().to("receiver@example.com").build(), MissingField::Subject; "missing subject")]
#[test_case(Message::builder().subject("Subject").build(), MissingField::Recipients; "missing recipients")]
#[test_case(Message::builder().subject("Subject").cc("cc@example.com").build(), MissingField::Recipients; "cc only")]
#[test_case(Message::builder().to("r@example.com").template_id(1).build(), MissingField::TemplatePairing; "template id without model")]
#[test_case(Message::builder().to("r@example.com").template_alias("welcome").build(), MissingField::TemplatePairing; "template alias without model")]
#[test_case(Message::builder().to("r@example.com").template_id(1).template_alias("welcome").template_model(json!({})).build(), MissingField::TemplatePairing; "template id and alias")]
#[test_case(Message::builder().to("r@example.com").template_model(json!({})).build(), MissingField::TemplateReference; "template model without reference")]
#[tokio::test]
async fn test_validation_fails_without_request(message: Message, expected: MissingField) {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let message = Message {
        sender: Some("sender@example.com".to_string()),
        ..message
    };
    let err = client_for(&mock_server).emails().send(&message).await.unwrap_err();

    assert_eq!(err.missing_field(), Some(expected));
}

#[tokio::test]
async fn test_bcc_only_message_is_sent() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .and(body_partial_json(json!({"Bcc": "hidden@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("hidden@example.com", "id")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let message = Message::builder()
        .sender("sender@example.com")
        .bcc("hidden@example.com")
        .subject("Subject")
        .build();

    client_for(&mock_server).emails().send(&message).await.unwrap();
}

#[test]
fn test_nested_metadata_is_rejected_locally() {
    let err = Metadata::try_from(json!({"test": {}})).unwrap_err();
    assert!(matches!(err, PostmarkError::InvalidMetadata { ref key, .. } if key == "test"));
    assert!(err.is_local());
}

#[tokio::test]
async fn test_metadata_is_sent() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .and(body_partial_json(json!({"Metadata": {"test": "test"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("r@example.com", "id")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let metadata = Metadata::try_from(json!({"test": "test"})).unwrap();
    client_for(&mock_server)
        .emails()
        .send(&message().metadata(metadata).build())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_inactive_recipient() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .respond_with(error_response(
            422,
            406,
            "You tried to send to a recipient that has been marked as inactive.",
        ))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .emails()
        .send(&message().build())
        .await
        .unwrap_err();

    match err {
        PostmarkError::InactiveRecipient { message } => assert!(message.contains("inactive")),
        other => panic!("Expected InactiveRecipient, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unprocessable_entity() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .respond_with(error_response(422, 300, "Invalid email request"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .emails()
        .send(&message().build())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PostmarkError::UnprocessableEntity { error_code: Some(300), .. }
    ));
}

#[tokio::test]
async fn test_server_error() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .emails()
        .send(&message().build())
        .await
        .unwrap_err();

    assert!(matches!(err, PostmarkError::Server { status_code: 500, .. }));
}

#[tokio::test]
async fn test_unauthorized() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(error_response(401, 10, "Bad or missing Server API token."))
        .mount(&mock_server)
        .await;

    let client = PostmarkClient::builder()
        .api_key("wrong-token")
        .base_url(mock_server.uri())
        .build()
        .unwrap();
    let err = client.emails().send(&message().build()).await.unwrap_err();

    assert!(matches!(err, PostmarkError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let client = PostmarkClient::builder()
        .api_key(TEST_TOKEN)
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = client.emails().send(&message().build()).await.unwrap_err();
    assert!(matches!(err, PostmarkError::Transport(_)));
}

#[tokio::test]
async fn test_attachments() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("r@example.com", "id")))
        .mount(&mock_server)
        .await;

    let message = message()
        .attachment(Attachment::new("TextFile", "content", "text/plain"))
        .attachment(
            Attachment::new("InlineImage", "image_content", "image/png")
                .with_content_id("cid:image@postmarkapp.com"),
        )
        .attachment(MimePart::new("image/png", b"image_file".to_vec()).filename("image.png"))
        .attachment(
            MimePart::new("image/png", b"inline_image_file".to_vec())
                .filename("image_with_id.png")
                .content_id("<image2@postmarkapp.com>"),
        )
        .attachment(
            MimePart::new("image/png", b"inline_image_file".to_vec())
                .filename("inline_image.png")
                .content_id("<image3@postmarkapp.com>")
                .disposition("inline"),
        )
        .build();

    client_for(&mock_server).emails().send(&message).await.unwrap();

    let body = single_request_body(&mock_server).await;
    assert_eq!(
        body["Attachments"],
        json!([
            {"Name": "TextFile", "Content": "content", "ContentType": "text/plain"},
            {"Name": "InlineImage", "Content": "image_content", "ContentType": "image/png", "ContentID": "cid:image@postmarkapp.com"},
            {"Name": "image.png", "Content": "aW1hZ2VfZmlsZQ==", "ContentType": "image/png"},
            {"Name": "image_with_id.png", "Content": "aW5saW5lX2ltYWdlX2ZpbGU=", "ContentType": "image/png", "ContentID": "image2@postmarkapp.com"},
            {"Name": "inline_image.png", "Content": "aW5saW5lX2ltYWdlX2ZpbGU=", "ContentType": "image/png", "ContentID": "cid:image3@postmarkapp.com"}
        ])
    );
}

#[tokio::test]
async fn test_template_send_uses_template_endpoint() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email/withTemplate", "POST")
        .and(body_partial_json(json!({
            "TemplateId": 1234,
            "TemplateModel": {"name": "Ada"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("r@example.com", "id")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let message = Message::builder()
        .sender("sender@example.com")
        .to("r@example.com")
        .template_id(1234)
        .template_model(json!({"name": "Ada"}))
        .build();

    client_for(&mock_server).emails().send(&message).await.unwrap();
}

#[tokio::test]
async fn test_defaults_from_config() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email", "POST")
        .and(body_partial_json(json!({
            "From": "default@example.com",
            "TrackOpens": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(accepted("r@example.com", "id")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PostmarkClient::builder()
        .api_key(TEST_TOKEN)
        .base_url(mock_server.uri())
        .default_sender("default@example.com")
        .track_opens(true)
        .build()
        .unwrap();

    let message = Message::builder().to("r@example.com").subject("Subject").build();
    client.emails().send(&message).await.unwrap();
}

#[tokio::test]
async fn test_batch_send() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email/batch", "POST")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            accepted("receiver1@example.com", "b7bc2f4a-e38e-4336-af7d-e6c392c2f817"),
            accepted("receiver2@example.com", "e2ecbbfc-fe12-463d-b933-9fe22915106d")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let messages = [
        message().to("receiver1@example.com").build(),
        message().message_stream("broadcast").build(),
    ];
    let results = client_for(&mock_server)
        .emails()
        .send_batch(&messages)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[1].message_id.as_deref(),
        Some("e2ecbbfc-fe12-463d-b933-9fe22915106d")
    );

    let body = single_request_body(&mock_server).await;
    assert_eq!(body[0]["To"], "receiver@example.com,receiver1@example.com");
    assert_eq!(body[1]["MessageStream"], "broadcast");
}

#[tokio::test]
async fn test_batch_inactive_recipient_fails_whole_batch() {
    let mock_server = setup_mock_server().await;

    mock_with_auth("/email/batch", "POST")
        .respond_with(error_response(422, 406, "Inactive recipient"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .emails()
        .send_batch(&[message().build(), message().build()])
        .await
        .unwrap_err();

    assert!(matches!(err, PostmarkError::InactiveRecipient { .. }));
}
