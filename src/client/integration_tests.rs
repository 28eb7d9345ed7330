//! Transport and notifier tests against a local mock Bot API
//!
//! These exercise the real reqwest transport: multipart encoding, timeouts,
//! redirects and response interpretation.

use super::*;
use crate::{logging::Logger, notifier::TelegramNotifier, types::UploadOutcome};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

const TOKEN: &str = "123456:TEST-token";
const SEND_PATH: &str = "/bot123456:TEST-token/sendPhoto";

/// Mock Bot API server for controlled upload scenarios
struct MockBotApi {
    server: MockServer,
}

impl MockBotApi {
    async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    fn url(&self) -> String {
        self.server.uri()
    }

    async fn reply(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    async fn reply_slowly(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"ok":true}"#)
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    async fn request_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}

fn photo_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().prefix("result").suffix(".png").tempfile().unwrap();
    file.write_all(b"\x89PNG\r\n\x1a\nfake-pixels").unwrap();
    file
}

fn notifier_for(api: &MockBotApi, transport: ReqwestTransport) -> TelegramNotifier<ReqwestTransport> {
    TelegramNotifier::with_transport(transport, Logger::capturing("telegram".to_string()))
        .with_api_base(api.url())
}

mod transport_tests {
    use super::*;

    #[tokio::test]
    async fn test_multipart_fields_reach_the_server() {
        let api = MockBotApi::new().await;
        api.reply(200, r#"{"ok":true,"result":{"message_id":1}}"#).await;

        let transport = ReqwestTransport::new().unwrap();
        let upload = PhotoUpload {
            url: send_photo_url(&api.url(), TOKEN).unwrap(),
            chat_id: "-1001234".to_string(),
            file_name: "result.png".to_string(),
            photo: b"\x89PNGpixels".to_vec(),
            caption: Some("🚀 Stair Speedtest Results".to_string()),
        };

        let response = transport.post_photo(upload).await.unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.contains(r#""ok":true"#));

        let bodies = api.request_bodies().await;
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert!(body.contains(r#"name="chat_id""#));
        assert!(body.contains("-1001234"));
        assert!(body.contains(r#"name="photo"; filename="result.png""#));
        assert!(body.contains("Content-Type: image/png"));
        assert!(body.contains("PNGpixels"));
        assert!(body.contains(r#"name="caption""#));
        assert!(body.contains("🚀 Stair Speedtest Results"));
    }

    #[tokio::test]
    async fn test_caption_field_omitted_when_absent() {
        let api = MockBotApi::new().await;
        api.reply(200, r#"{"ok":true}"#).await;

        let transport = ReqwestTransport::new().unwrap();
        let upload = PhotoUpload {
            url: send_photo_url(&api.url(), TOKEN).unwrap(),
            chat_id: "42".to_string(),
            file_name: "result.jpg".to_string(),
            photo: vec![0xff, 0xd8, 0xff],
            caption: Some(String::new()),
        };
        transport.post_photo(upload).await.unwrap();

        let bodies = api.request_bodies().await;
        assert!(!bodies[0].contains(r#"name="caption""#));
        assert!(bodies[0].contains("Content-Type: image/jpeg"));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let api = MockBotApi::new().await;
        api.reply(400, r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#).await;

        let transport = ReqwestTransport::new().unwrap();
        let upload = PhotoUpload {
            url: send_photo_url(&api.url(), TOKEN).unwrap(),
            chat_id: "42".to_string(),
            file_name: "result.png".to_string(),
            photo: vec![1, 2, 3],
            caption: None,
        };

        let response = transport.post_photo(upload).await.unwrap();
        assert_eq!(response.status, 400);
        assert!(!response.is_success());
        assert!(response.body.contains("chat not found"));
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_timeout_error() {
        let api = MockBotApi::new().await;
        api.reply_slowly(Duration::from_secs(2)).await;

        let transport = ReqwestTransport::with_timeout(Duration::from_millis(200)).unwrap();
        let upload = PhotoUpload {
            url: send_photo_url(&api.url(), TOKEN).unwrap(),
            chat_id: "42".to_string(),
            file_name: "result.png".to_string(),
            photo: vec![1, 2, 3],
            caption: None,
        };

        let error = transport.post_photo(upload).await.unwrap_err();
        assert_eq!(error.category(), "TIMEOUT");
    }
}

mod notifier_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_photo_success() {
        let api = MockBotApi::new().await;
        api.reply(200, r#"{"ok":true,"result":{"message_id":99}}"#).await;
        let notifier = notifier_for(&api, ReqwestTransport::new().unwrap());
        let photo = photo_file();

        assert!(notifier.send_photo(TOKEN, "42", photo.path(), Some("caption text")).await);
        assert_eq!(api.request_bodies().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_photo_api_rejection() {
        let api = MockBotApi::new().await;
        api.reply(400, r#"{"ok":false,"description":"Bad Request"}"#).await;
        let notifier = notifier_for(&api, ReqwestTransport::new().unwrap());
        let photo = photo_file();

        let outcome = notifier.send_photo_outcome(TOKEN, "42", photo.path(), None).await;
        match outcome {
            UploadOutcome::ApiRejected(message) => assert!(message.contains("Bad Request")),
            other => panic!("unexpected outcome: {:?}", other),
        }

        let logged = notifier.logger().captured().await;
        assert!(logged.iter().any(|entry| entry.message.contains("Bad Request")));
    }

    #[tokio::test]
    async fn test_send_photo_follows_redirects() {
        let api = MockBotApi::new().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", format!("{}/moved", api.url())))
            .mount(&api.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&api.server)
            .await;

        let notifier = notifier_for(&api, ReqwestTransport::new().unwrap());
        let photo = photo_file();
        assert!(notifier.send_photo(TOKEN, "42", photo.path(), None).await);
    }

    #[tokio::test]
    async fn test_send_photo_connection_refused() {
        let transport = ReqwestTransport::with_timeout(Duration::from_secs(5)).unwrap();
        let notifier = TelegramNotifier::with_transport(transport, Logger::capturing("telegram".to_string()))
            .with_api_base("http://127.0.0.1:1");
        let photo = photo_file();

        let outcome = notifier.send_photo_outcome(TOKEN, "42", photo.path(), None).await;
        assert!(matches!(outcome, UploadOutcome::TransportFailure(_)));
        assert!(outcome.reached_network());
    }

    #[tokio::test]
    async fn test_missing_file_never_reaches_server() {
        let api = MockBotApi::new().await;
        api.reply(200, r#"{"ok":true}"#).await;
        let notifier = notifier_for(&api, ReqwestTransport::new().unwrap());

        assert!(!notifier.send_photo(TOKEN, "42", "/nonexistent/path.png", None).await);
        assert!(api.request_bodies().await.is_empty());
    }

    #[tokio::test]
    async fn test_chat_id_is_sent_verbatim() {
        let api = MockBotApi::new().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(body_string_contains("@speedtest_channel"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&api.server)
            .await;

        let notifier = notifier_for(&api, ReqwestTransport::new().unwrap());
        let photo = photo_file();
        assert!(notifier.send_photo(TOKEN, "@speedtest_channel", photo.path(), None).await);
    }
}
