//! Slack 渠道 - 基于 Slack Web API
//!
//! - 发送：`chat.postMessage`
//! - 读取：`conversations.history`（latest = oldest = ts，inclusive，limit 1）
//! - 删除：`chat.delete`

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{http_client, ClientConfig};
use crate::notification::channel::{
    BackendError, ChannelCapabilities, NotificationChannel, SentMessage,
};
use crate::notification::inputs::ChannelKind;

/// Slack Web API 基础 URL
pub const SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
    channel: Option<String>,
    ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    messages: Vec<HistoryMessage>,
}

#[derive(Debug, Deserialize)]
struct HistoryMessage {
    #[serde(default)]
    text: String,
}

fn api_error(error: Option<String>) -> String {
    error.unwrap_or_else(|| "unknown error".to_string())
}

fn parse_json<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, String> {
    serde_json::from_str(body).map_err(|e| format!("failed to parse response: {} - body: {}", e, body))
}

/// 解析 `chat.postMessage` 响应
fn parse_post_message(body: &str) -> Result<SentMessage, String> {
    let resp: PostMessageResponse = parse_json(body)?;
    if !resp.ok {
        return Err(api_error(resp.error));
    }
    let message_id = resp.ts.ok_or_else(|| "missing ts in response".to_string())?;
    Ok(SentMessage {
        channel_id: resp.channel,
        message_id,
    })
}

/// 解析 `conversations.history` 响应；`Ok(None)` 表示消息不存在
fn parse_history(body: &str) -> Result<Option<String>, String> {
    let resp: HistoryResponse = parse_json(body)?;
    if !resp.ok {
        return Err(api_error(resp.error));
    }
    Ok(resp.messages.into_iter().next().map(|m| m.text))
}

fn parse_ack(body: &str) -> Result<(), String> {
    let resp: SlackResponse = parse_json(body)?;
    if resp.ok {
        Ok(())
    } else {
        Err(api_error(resp.error))
    }
}

/// Slack 渠道
pub struct SlackChannel {
    client: Client,
    token: String,
    api_base: String,
}

impl SlackChannel {
    /// 创建 Slack 客户端（不发起网络请求）
    pub fn new(token: &str, config: &ClientConfig) -> Result<Self, BackendError> {
        let init_error = |reason: String| BackendError::Init {
            channel: ChannelKind::Slack,
            reason,
        };

        if token.trim().is_empty() {
            return Err(init_error("empty api token".to_string()));
        }
        let client = http_client(config)
            .map_err(|e| init_error(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.to_string(),
            api_base: config.slack_api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    fn post(&self, method: &str, body: serde_json::Value) -> Result<String, String> {
        self.client
            .post(self.url(method))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .and_then(|resp| resp.text())
            .map_err(|e| format!("{} request failed: {}", method, e.without_url()))
    }
}

impl NotificationChannel for SlackChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Slack
    }

    fn capabilities(&self) -> ChannelCapabilities {
        ChannelKind::Slack.capabilities()
    }

    fn send(&self, destination: &str, text: &str) -> Result<SentMessage, BackendError> {
        debug!(channel = "slack", destination, len = text.len(), "chat.postMessage");

        let body = json!({
            "channel": destination,
            "text": text,
        });
        self.post("chat.postMessage", body)
            .and_then(|body| parse_post_message(&body))
            .map_err(|reason| BackendError::Send {
                channel: ChannelKind::Slack,
                reason,
            })
    }

    fn fetch_content(&self, destination: &str, message_id: &str) -> Result<String, BackendError> {
        debug!(channel = "slack", destination, message_id, "conversations.history");

        let fetch_error = |reason: String| BackendError::Fetch {
            channel: ChannelKind::Slack,
            reason,
        };

        let body = self
            .client
            .get(self.url("conversations.history"))
            .bearer_auth(&self.token)
            .query(&[
                ("channel", destination),
                ("latest", message_id),
                ("oldest", message_id),
                ("inclusive", "true"),
                ("limit", "1"),
            ])
            .send()
            .and_then(|resp| resp.text())
            .map_err(|e| fetch_error(format!("conversations.history request failed: {}", e.without_url())))?;

        match parse_history(&body).map_err(fetch_error)? {
            Some(text) => {
                if text.is_empty() {
                    warn!(channel = "slack", message_id, "Found Slack message but its empty");
                }
                Ok(text)
            }
            None => Err(BackendError::NotFound {
                channel: ChannelKind::Slack,
                message_id: message_id.to_string(),
            }),
        }
    }

    fn delete(&self, destination: &str, message_id: &str) -> Result<(), BackendError> {
        debug!(channel = "slack", destination, message_id, "chat.delete");

        let body = json!({
            "channel": destination,
            "ts": message_id,
        });
        self.post("chat.delete", body)
            .and_then(|body| parse_ack(&body))
            .map_err(|reason| BackendError::Delete {
                channel: ChannelKind::Slack,
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_token() {
        let err = SlackChannel::new("  ", &ClientConfig::default()).err().unwrap();
        assert!(matches!(err, BackendError::Init { channel: ChannelKind::Slack, .. }));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let config = ClientConfig {
            slack_api_base: "http://localhost:8080/api/".to_string(),
            ..Default::default()
        };
        let channel = SlackChannel::new("xoxb-1", &config).unwrap();
        assert_eq!(channel.url("chat.delete"), "http://localhost:8080/api/chat.delete");
        assert!(channel.capabilities().supports_update());
    }

    #[test]
    fn test_parse_post_message_ok() {
        let body = r#"{"ok":true,"channel":"C123","ts":"1700000000.000200","message":{"text":"hi"}}"#;
        assert_eq!(
            parse_post_message(body),
            Ok(SentMessage {
                channel_id: Some("C123".to_string()),
                message_id: "1700000000.000200".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_post_message_api_error() {
        let body = r#"{"ok":false,"error":"channel_not_found"}"#;
        assert_eq!(parse_post_message(body), Err("channel_not_found".to_string()));

        let body = r#"{"ok":true,"channel":"C123"}"#;
        assert!(parse_post_message(body).unwrap_err().contains("missing ts"));
    }

    #[test]
    fn test_parse_post_message_invalid_json() {
        let err = parse_post_message("ratelimited").unwrap_err();
        assert!(err.contains("failed to parse response"));
        assert!(err.contains("ratelimited"));
    }

    #[test]
    fn test_parse_history() {
        let body = r#"{"ok":true,"messages":[{"type":"message","text":"old text","ts":"1"}],"has_more":false}"#;
        assert_eq!(parse_history(body), Ok(Some("old text".to_string())));

        let body = r#"{"ok":true,"messages":[{"type":"message","ts":"1"}]}"#;
        assert_eq!(parse_history(body), Ok(Some(String::new())));

        let body = r#"{"ok":true,"messages":[]}"#;
        assert_eq!(parse_history(body), Ok(None));

        let body = r#"{"ok":false,"error":"not_in_channel"}"#;
        assert_eq!(parse_history(body), Err("not_in_channel".to_string()));
    }

    #[test]
    fn test_parse_ack() {
        assert_eq!(parse_ack(r#"{"ok":true,"channel":"C1","ts":"1"}"#), Ok(()));
        assert_eq!(
            parse_ack(r#"{"ok":false,"error":"message_not_found"}"#),
            Err("message_not_found".to_string())
        );
        assert_eq!(parse_ack(r#"{"ok":false}"#), Err("unknown error".to_string()));
    }

    mod wire {
        use super::*;
        use crate::notification::channels::stub_server::{config_for, serve_once};

        #[test]
        fn test_send_posts_chat_post_message() {
            let (base, server) =
                serve_once(r#"{"ok":true,"channel":"C1","ts":"1700000000.000200"}"#);
            let channel = SlackChannel::new("xoxb-1", &config_for(&base)).unwrap();

            let sent = channel.send("C1", "hello").unwrap();
            assert_eq!(sent.message_id, "1700000000.000200");
            assert_eq!(sent.channel_id.as_deref(), Some("C1"));

            let req = server.join().unwrap();
            assert_eq!(req.request_line, "POST /api/chat.postMessage HTTP/1.1");
            assert_eq!(req.header("authorization"), Some("Bearer xoxb-1"));
            assert_eq!(req.header("content-type"), Some("application/json"));
            assert_eq!(
                req.json_body(),
                serde_json::json!({ "channel": "C1", "text": "hello" })
            );
        }

        #[test]
        fn test_fetch_content_queries_single_message() {
            let (base, server) = serve_once(r#"{"ok":true,"messages":[{"text":"old text"}]}"#);
            let channel = SlackChannel::new("xoxb-1", &config_for(&base)).unwrap();

            let text = channel.fetch_content("C1", "1700000000.000100").unwrap();
            assert_eq!(text, "old text");

            let req = server.join().unwrap();
            assert_eq!(
                req.request_line,
                "GET /api/conversations.history?channel=C1&latest=1700000000.000100\
                 &oldest=1700000000.000100&inclusive=true&limit=1 HTTP/1.1"
            );
            assert_eq!(req.header("authorization"), Some("Bearer xoxb-1"));
            assert!(req.body.is_empty());
        }

        #[test]
        fn test_fetch_content_missing_message() {
            let (base, server) = serve_once(r#"{"ok":true,"messages":[]}"#);
            let channel = SlackChannel::new("xoxb-1", &config_for(&base)).unwrap();

            let err = channel.fetch_content("C1", "1700000000.000100").unwrap_err();
            assert_eq!(
                err,
                BackendError::NotFound {
                    channel: ChannelKind::Slack,
                    message_id: "1700000000.000100".to_string(),
                }
            );
            server.join().unwrap();
        }

        #[test]
        fn test_delete_posts_channel_and_ts() {
            let (base, server) = serve_once(r#"{"ok":true,"channel":"C1","ts":"1700000000.000100"}"#);
            let channel = SlackChannel::new("xoxb-1", &config_for(&base)).unwrap();

            channel.delete("C1", "1700000000.000100").unwrap();

            let req = server.join().unwrap();
            assert_eq!(req.request_line, "POST /api/chat.delete HTTP/1.1");
            assert_eq!(req.header("authorization"), Some("Bearer xoxb-1"));
            assert_eq!(
                req.json_body(),
                serde_json::json!({ "channel": "C1", "ts": "1700000000.000100" })
            );
        }

        #[test]
        fn test_delete_api_error() {
            let (base, server) = serve_once(r#"{"ok":false,"error":"message_not_found"}"#);
            let channel = SlackChannel::new("xoxb-1", &config_for(&base)).unwrap();

            let err = channel.delete("C1", "1").unwrap_err();
            assert!(matches!(err, BackendError::Delete { ref reason, .. } if reason == "message_not_found"));
            server.join().unwrap();
        }
    }
}
