//! 通知分发器 - 执行 send / update 并收集输出
//!
//! update 在后端上的实现是 fetch → 追加尾行 → delete → 重新 send，
//! 因此每次 update 都会产生新的 message_id。
//!
//! 注意：delete 成功后若重新 send 失败，原消息已丢失且不会回滚，
//! 返回的 Send 错误会带上已删除的消息 ID。

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::channel::{BackendError, NotificationChannel, SentMessage};
use super::formatter::MessageFormatter;
use super::inputs::{Action, ActionInputs, ChannelKind};
use super::validate::ValidationError;
use crate::infra::OutputRecord;

/// 输出 key
pub const OUTPUT_MESSAGE_ID: &str = "message_id";
pub const OUTPUT_CHANNEL_ID: &str = "channel_id";

/// 通知流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// 通知分发器
pub struct NotificationDispatcher {
    channel: Arc<dyn NotificationChannel>,
    formatter: MessageFormatter,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self {
            channel,
            formatter: MessageFormatter::new(),
            dry_run: false,
        }
    }

    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn channel_kind(&self) -> ChannelKind {
        self.channel.kind()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// 按 action 分发，成功时返回待写出的输出
    pub fn dispatch(&self, inputs: &ActionInputs) -> Result<OutputRecord, NotifyError> {
        let result = match inputs.action_kind()? {
            Action::Send => self.send(inputs),
            Action::Update => self.update(inputs),
        };
        Ok(result?)
    }

    fn send(&self, inputs: &ActionInputs) -> Result<OutputRecord, BackendError> {
        let message = self.formatter.compose_send_message(inputs);

        if self.dry_run {
            eprintln!("[DRY-RUN] Would send to {} ({}):\n{}", self.channel.kind(), inputs.channel_id, message);
            return Ok(OutputRecord::new());
        }

        let sent = self.channel.send(&inputs.channel_id, &message)?;
        info!(
            channel = %self.channel.kind(),
            message_id = %sent.message_id,
            "Message sent successfully"
        );
        Ok(Self::record(sent))
    }

    fn update(&self, inputs: &ActionInputs) -> Result<OutputRecord, BackendError> {
        let kind = self.channel.kind();
        if !self.channel.capabilities().supports_update() {
            return Err(BackendError::Unsupported {
                channel: kind,
                operation: "update",
            });
        }

        let trailer = self.formatter.compose_update_trailer(inputs);

        if self.dry_run {
            eprintln!(
                "[DRY-RUN] Would append to {} message {} in {}:\n{}",
                kind, inputs.msg_id, inputs.channel_id, trailer
            );
            return Ok(OutputRecord::new());
        }

        let mut content = self.channel.fetch_content(&inputs.channel_id, &inputs.msg_id)?;
        content.push_str(&trailer);

        self.channel.delete(&inputs.channel_id, &inputs.msg_id)?;
        info!(channel = %kind, message_id = %inputs.msg_id, "Original message deleted");

        let sent = self
            .channel
            .send(&inputs.channel_id, &content)
            .map_err(|e| match e {
                BackendError::Send { channel, reason } => BackendError::Send {
                    channel,
                    reason: format!(
                        "{}; original message {} was already deleted",
                        reason, inputs.msg_id
                    ),
                },
                other => other,
            })?;
        info!(
            channel = %kind,
            old_message_id = %inputs.msg_id,
            message_id = %sent.message_id,
            "Message updated successfully"
        );
        Ok(Self::record(sent))
    }

    fn record(sent: SentMessage) -> OutputRecord {
        let mut record = OutputRecord::new();
        record.add(OUTPUT_MESSAGE_ID, sent.message_id);
        if let Some(channel_id) = sent.channel_id {
            record.add(OUTPUT_CHANNEL_ID, channel_id);
        }
        record
    }
}
