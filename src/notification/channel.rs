//! 通知渠道 trait 定义

use thiserror::Error;

use super::inputs::ChannelKind;

/// 后端调用错误（全部视为致命，不重试）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("failed to initialize {channel} client: {reason}")]
    Init { channel: ChannelKind, reason: String },

    #[error("failed to send {channel} message: {reason}")]
    Send { channel: ChannelKind, reason: String },

    #[error("failed to get {channel} message content: {reason}")]
    Fetch { channel: ChannelKind, reason: String },

    #[error("couldn't locate {channel} message {message_id}")]
    NotFound { channel: ChannelKind, message_id: String },

    #[error("failed to delete {channel} message: {reason}")]
    Delete { channel: ChannelKind, reason: String },

    #[error("{operation} is not supported on {channel}")]
    Unsupported { channel: ChannelKind, operation: &'static str },
}

impl BackendError {
    /// 失败的操作名（用于结构化日志）
    pub fn operation(&self) -> &'static str {
        match self {
            BackendError::Init { .. } => "init",
            BackendError::Send { .. } => "send",
            BackendError::Fetch { .. } | BackendError::NotFound { .. } => "fetch",
            BackendError::Delete { .. } => "delete",
            BackendError::Unsupported { operation, .. } => *operation,
        }
    }

    pub fn channel(&self) -> ChannelKind {
        match self {
            BackendError::Init { channel, .. }
            | BackendError::Send { channel, .. }
            | BackendError::Fetch { channel, .. }
            | BackendError::NotFound { channel, .. }
            | BackendError::Delete { channel, .. }
            | BackendError::Unsupported { channel, .. } => *channel,
        }
    }
}

/// 渠道能力声明
///
/// update 需要同时支持读取与删除历史消息。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelCapabilities {
    /// 可读取已发送消息的文本
    pub fetch_content: bool,
    /// 可删除已发送消息
    pub message_deletion: bool,
}

impl ChannelCapabilities {
    pub fn supports_update(&self) -> bool {
        self.fetch_content && self.message_deletion
    }
}

impl ChannelKind {
    /// 后端固有能力，无需创建客户端即可查询
    pub fn capabilities(&self) -> ChannelCapabilities {
        match self {
            ChannelKind::Slack => ChannelCapabilities {
                fetch_content: true,
                message_deletion: true,
            },
            // Bot API 无法读取历史消息
            ChannelKind::Telegram => ChannelCapabilities::default(),
        }
    }
}

/// 发送结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// 后端回传的 channel ID（Telegram 不回传）
    pub channel_id: Option<String>,
    /// 新消息 ID（Slack 为 ts，Telegram 为数字 ID 的字符串形式）
    pub message_id: String,
}

/// 通知渠道 trait
pub trait NotificationChannel: Send + Sync {
    /// 渠道类型
    fn kind(&self) -> ChannelKind;

    /// 渠道能力
    fn capabilities(&self) -> ChannelCapabilities;

    /// 发送消息到 destination
    fn send(&self, destination: &str, text: &str) -> Result<SentMessage, BackendError>;

    /// 读取已发送消息的文本
    fn fetch_content(&self, _destination: &str, _message_id: &str) -> Result<String, BackendError> {
        Err(BackendError::Unsupported {
            channel: self.kind(),
            operation: "fetch",
        })
    }

    /// 删除已发送消息
    fn delete(&self, _destination: &str, _message_id: &str) -> Result<(), BackendError> {
        Err(BackendError::Unsupported {
            channel: self.kind(),
            operation: "delete",
        })
    }
}
