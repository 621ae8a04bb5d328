//! Telegram 渠道 - 基于 Telegram Bot API `sendMessage`
//!
//! Bot API 无法读取历史消息，因此只支持发送。

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{http_client, ClientConfig};
use crate::notification::channel::{
    BackendError, ChannelCapabilities, NotificationChannel, SentMessage,
};
use crate::notification::inputs::ChannelKind;

/// Telegram Bot API 基础 URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// 消息解析模式
const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct MessageResult {
    message_id: i64,
}

/// 解析 chat ID（Telegram 要求 int64）
fn parse_chat_id(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| format!("failed to parse chat id {:?} to int64: {}", raw, e))
}

/// 解析 `sendMessage` 响应，返回消息 ID 的字符串形式
fn parse_send_message(body: &str) -> Result<String, String> {
    let resp: ApiResponse<MessageResult> = serde_json::from_str(body)
        .map_err(|e| format!("failed to parse response: {} - body: {}", e, body))?;
    if !resp.ok {
        return Err(resp.description.unwrap_or_else(|| "unknown error".to_string()));
    }
    resp.result
        .map(|m| m.message_id.to_string())
        .ok_or_else(|| "missing result in response".to_string())
}

/// Telegram 渠道
pub struct TelegramChannel {
    client: Client,
    /// `<api_base>/bot<token>`
    base_url: String,
}

impl TelegramChannel {
    /// 创建 Telegram 客户端（不发起网络请求）
    ///
    /// Bot token 格式为 `<bot_id>:<secret>`。
    pub fn new(token: &str, config: &ClientConfig) -> Result<Self, BackendError> {
        let init_error = |reason: String| BackendError::Init {
            channel: ChannelKind::Telegram,
            reason,
        };

        let token = token.trim();
        if token.is_empty() {
            return Err(init_error("empty bot token".to_string()));
        }
        if !token.contains(':') {
            return Err(init_error("malformed bot token, expected `<bot_id>:<secret>`".to_string()));
        }
        let client = http_client(config)
            .map_err(|e| init_error(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.telegram_api_base.trim_end_matches('/'),
                token
            ),
        })
    }
}

impl NotificationChannel for TelegramChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    fn capabilities(&self) -> ChannelCapabilities {
        ChannelKind::Telegram.capabilities()
    }

    fn send(&self, destination: &str, text: &str) -> Result<SentMessage, BackendError> {
        let send_error = |reason: String| BackendError::Send {
            channel: ChannelKind::Telegram,
            reason,
        };

        let chat_id = parse_chat_id(destination).map_err(send_error)?;
        debug!(channel = "telegram", chat_id, len = text.len(), "sendMessage");

        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });

        // without_url: URL 中包含 bot token
        let resp_body = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&body)
            .send()
            .and_then(|resp| resp.text())
            .map_err(|e| send_error(format!("sendMessage request failed: {}", e.without_url())))?;

        let message_id = parse_send_message(&resp_body).map_err(send_error)?;
        Ok(SentMessage {
            channel_id: None,
            message_id,
        })
    }
}
