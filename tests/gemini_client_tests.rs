//! Tests for the HTTP Gemini client against a loopback stub server.
//!
//! The stub accepts a single connection, captures the raw request and
//! answers with a canned status and body.

#[cfg(test)]
mod gemini_client_tests {
    use serde_json::{Value, json};
    use smart_health::{
        GeminiClient, GeminiConfig, GeminiModel, GenerativeClient, MediaFile, SmartAssistant,
        SmartHealthError,
    };
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    struct CapturedRequest {
        head: String,
        body: Value,
    }

    async fn stub_server(status: &'static str, body: String) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            let head_end = loop {
                let n = socket.read(&mut chunk).await.expect("read request");
                assert!(n > 0, "connection closed before headers were complete");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);

            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.expect("read body");
                assert!(n > 0, "connection closed before body was complete");
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            socket.shutdown().await.ok();

            let body = serde_json::from_slice(&buf[head_end..head_end + content_length])
                .expect("request body is JSON");
            CapturedRequest { head, body }
        });

        (format!("http://{}/v1beta/models/test-model:generateContent", addr), handle)
    }

    // reqwest honours proxy variables, which would route loopback traffic away from the stub
    fn behind_proxy() -> bool {
        let proxied = ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]
            .iter()
            .any(|var| std::env::var(var).is_ok_and(|v| !v.is_empty()));
        if proxied {
            println!("Skipping test: proxy environment variables are set");
        }
        proxied
    }

    fn client_for(endpoint: String) -> GeminiClient {
        let mut config = GeminiConfig::new("test-key");
        config.endpoint = Some(endpoint);
        GeminiClient::with_config(config).expect("client should build")
    }

    fn reply(text: &str) -> String {
        json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}]})
            .to_string()
    }

    #[tokio::test]
    async fn test_posts_prompt_with_key_query_parameter() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server("200 OK", reply("YES")).await;
        let client = client_for(endpoint);

        let text = client.generate("Is a headache a symptom?").await.expect("call succeeds");
        assert_eq!(text.as_deref(), Some("YES"));

        let captured = server.await.expect("stub server task");
        let request_line = captured.head.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("POST /v1beta/models/test-model:generateContent?key=test-key "));
        assert_eq!(
            captured.body,
            json!({"contents": [{"parts": [{"text": "Is a headache a symptom?"}]}]})
        );
    }

    #[tokio::test]
    async fn test_inline_data_is_sent_as_second_part() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server("200 OK", reply("summary")).await;
        let client = client_for(endpoint);
        let media = MediaFile::from_bytes(b"%PDF-1.4", "application/pdf");

        client
            .generate_with_media("Summarize", &[media.clone()])
            .await
            .expect("call succeeds");

        let captured = server.await.expect("stub server task");
        let parts = &captured.body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Summarize");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[1]["inlineData"]["data"], media.data.as_str());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_no_text() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server("200 OK", json!({"promptFeedback": {}}).to_string()).await;
        let client = client_for(endpoint);

        let text = client.generate("hello").await.expect("shape is not an error");
        assert_eq!(text, None);
        server.await.expect("stub server task");
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server(
            "403 Forbidden",
            json!({"error": {"code": 403, "message": "API key not valid"}}).to_string(),
        )
        .await;
        let client = client_for(endpoint);

        let err = client.generate("hello").await.expect_err("403 should fail");
        match err {
            SmartHealthError::ApiError(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("expected ApiError, got {:?}", other),
        }
        server.await.expect("stub server task");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        if behind_proxy() {
            return;
        }
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("address");
        drop(listener);

        let client = client_for(format!("http://{}/generate", addr));
        let err = client.generate("hello").await.expect_err("nothing is listening");
        assert!(matches!(err, SmartHealthError::HttpError(_)));
    }

    #[tokio::test]
    async fn test_assistant_reports_generic_failure_over_http() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server("500 Internal Server Error", "{}".to_string()).await;
        let mut assistant = SmartAssistant::new(client_for(endpoint));
        assistant.set_symptoms("sharp pain in lower back");

        assert!(assistant.submit_symptoms().await.is_err());
        assert_eq!(
            assistant.notification(),
            Some("Failed to analyze symptoms. Please try again.")
        );
        server.await.expect("stub server task");
    }

    #[tokio::test]
    async fn test_builder_settings_reach_generation_config() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server("200 OK", reply("ok")).await;
        let client = GeminiClient::new("test-key")
            .expect("client should build")
            .endpoint(endpoint)
            .temperature(0.1)
            .max_tokens(0);

        client.generate("hello").await.expect("call succeeds");

        let captured = server.await.expect("stub server task");
        let generation = &captured.body["generationConfig"];
        assert_eq!(generation["maxOutputTokens"], 1);
        let temperature = generation["temperature"].as_f64().expect("temperature is sent");
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_base_url_and_model_build_request_path() {
        if behind_proxy() {
            return;
        }
        let (endpoint, server) = stub_server("200 OK", reply("ok")).await;
        let base = endpoint
            .strip_suffix("/models/test-model:generateContent")
            .expect("stub endpoint has the model suffix")
            .to_string();
        let client = GeminiClient::new("test-key")
            .expect("client should build")
            .base_url(base)
            .model(GeminiModel::Gemini25Flash);

        client.generate("hello").await.expect("call succeeds");

        let captured = server.await.expect("stub server task");
        let request_line = captured.head.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent?key=test-key "));
        assert!(captured.body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_timeout_on_silent_server() {
        if behind_proxy() {
            return;
        }
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("address");
        let silent = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.expect("accept connection");
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = client_for(format!("http://{}/generate", addr))
            .timeout(Duration::from_millis(200))
            .expect("client with timeout should build");
        assert_eq!(client.config().timeout, Some(Duration::from_millis(200)));

        let err = client.generate("hello").await.expect_err("server never answers");
        assert_eq!(err, SmartHealthError::Timeout);
        silent.abort();
    }
}
