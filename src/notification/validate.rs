//! 输入校验 - 按固定顺序检查，第一个失败即返回

use thiserror::Error;
use tracing::info;

use super::inputs::{Action, ActionInputs};

/// 输入校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("wrong operation {0:?}: action must be `send` or `update`")]
    InvalidAction(String),

    #[error("message is required")]
    MissingMessage,

    #[error("api_key is required")]
    MissingApiKey,

    #[error("channel_id is required")]
    MissingChannelId,

    #[error("channel is required")]
    MissingChannel,

    #[error("unsupported channel {0:?}: expected `slack` or `telegram`")]
    UnsupportedChannel(String),

    #[error("msgid is required for action `update`")]
    MissingMsgId,
}

impl ValidationError {
    /// 出错的输入字段名（用于结构化日志）
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidAction(_) => "action",
            ValidationError::MissingMessage => "message",
            ValidationError::MissingApiKey => "api_key",
            ValidationError::MissingChannelId => "channel_id",
            ValidationError::MissingChannel | ValidationError::UnsupportedChannel(_) => "channel",
            ValidationError::MissingMsgId => "msgid",
        }
    }
}

/// 校验必填字段
///
/// 顺序：action → message → api_key → channel_id → channel → msgid（仅 update）。
pub fn validate(inputs: &ActionInputs) -> Result<(), ValidationError> {
    let action = inputs.action_kind()?;

    if inputs.message.is_empty() {
        return Err(ValidationError::MissingMessage);
    }
    if inputs.api_key.is_empty() {
        return Err(ValidationError::MissingApiKey);
    }
    if inputs.channel_id.is_empty() {
        return Err(ValidationError::MissingChannelId);
    }
    inputs.channel_kind()?;
    if action == Action::Update && inputs.msg_id.is_empty() {
        return Err(ValidationError::MissingMsgId);
    }

    info!(?inputs, "Inputs validated");
    Ok(())
}
