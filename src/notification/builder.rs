//! 通知系统构建器 - 按 channel 选择后端客户端

use std::sync::Arc;
use tracing::info;

use super::channel::{BackendError, NotificationChannel};
use super::channels::{ClientConfig, SlackChannel, TelegramChannel};
use super::dispatcher::{NotificationDispatcher, NotifyError};
use super::formatter::MessageFormatter;
use super::inputs::{Action, ActionInputs, ChannelKind};

/// 创建指定后端的客户端
pub fn init_client(
    kind: ChannelKind,
    api_key: &str,
    config: &ClientConfig,
) -> Result<Arc<dyn NotificationChannel>, BackendError> {
    let channel: Arc<dyn NotificationChannel> = match kind {
        ChannelKind::Slack => Arc::new(SlackChannel::new(api_key, config)?),
        ChannelKind::Telegram => Arc::new(TelegramChannel::new(api_key, config)?),
    };
    info!(channel = %kind, "Initialized notification channel");
    Ok(channel)
}

/// 通知系统构建器
pub struct NotificationBuilder {
    config: ClientConfig,
    formatter: MessageFormatter,
    dry_run: bool,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            formatter: MessageFormatter::new(),
            dry_run: false,
        }
    }

    /// 设置 HTTP 客户端配置
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置消息格式化器
    pub fn formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 按输入构建 NotificationDispatcher
    ///
    /// update 的能力检查在创建客户端之前完成，后端不支持时不会因凭据问题报 Init 错误。
    pub fn build_for(self, inputs: &ActionInputs) -> Result<NotificationDispatcher, NotifyError> {
        let kind = inputs.channel_kind()?;
        if inputs.action_kind()? == Action::Update && !kind.capabilities().supports_update() {
            return Err(BackendError::Unsupported {
                channel: kind,
                operation: "update",
            }
            .into());
        }
        Ok(self.build(kind, &inputs.api_key)?)
    }

    /// 构建 NotificationDispatcher
    pub fn build(self, kind: ChannelKind, api_key: &str) -> Result<NotificationDispatcher, BackendError> {
        let channel = init_client(kind, api_key, &self.config)?;
        Ok(NotificationDispatcher::new(channel)
            .with_formatter(self.formatter)
            .with_dry_run(self.dry_run))
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_selects_backend() {
        let config = ClientConfig::default();

        let slack = init_client(ChannelKind::Slack, "xoxb-1", &config).ok().unwrap();
        assert_eq!(slack.kind(), ChannelKind::Slack);

        let telegram = init_client(ChannelKind::Telegram, "123:abc", &config).ok().unwrap();
        assert_eq!(telegram.kind(), ChannelKind::Telegram);
    }

    #[test]
    fn test_init_client_failure() {
        let err = init_client(ChannelKind::Telegram, "bad", &ClientConfig::default())
            .err()
            .unwrap();
        assert_eq!(err.operation(), "init");
    }

    #[test]
    fn test_builder_build() {
        let dispatcher = NotificationBuilder::new()
            .dry_run(true)
            .build(ChannelKind::Slack, "xoxb-1")
            .ok()
            .unwrap();
        assert_eq!(dispatcher.channel_kind(), ChannelKind::Slack);
        assert!(dispatcher.is_dry_run());
    }

    fn inputs(action: &str, channel: &str, api_key: &str) -> ActionInputs {
        ActionInputs {
            action: action.to_string(),
            channel: channel.to_string(),
            message: "deploy".to_string(),
            api_key: api_key.to_string(),
            channel_id: "-100".to_string(),
            msg_id: "42".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_for_telegram_update_is_unsupported_before_init() {
        // "k" 不是合法 bot token，但 update 不支持应先于 Init 报出
        let err = NotificationBuilder::new()
            .build_for(&inputs("update", "telegram", "k"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            NotifyError::Backend(BackendError::Unsupported {
                channel: ChannelKind::Telegram,
                operation: "update",
            })
        ));
    }

    #[test]
    fn test_build_for_telegram_send_still_checks_token() {
        let err = NotificationBuilder::new()
            .build_for(&inputs("send", "telegram", "k"))
            .err()
            .unwrap();
        assert!(matches!(err, NotifyError::Backend(BackendError::Init { .. })));
    }

    #[test]
    fn test_build_for_slack_update() {
        let dispatcher = NotificationBuilder::new()
            .build_for(&inputs("update", "slack", "xoxb-1"))
            .ok()
            .unwrap();
        assert_eq!(dispatcher.channel_kind(), ChannelKind::Slack);
    }
}
