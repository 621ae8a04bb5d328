//! CI Notifier - 在 Slack / Telegram 上发送或更新 CI/CD 状态消息

pub mod cli;
pub mod infra;
pub mod notification;

pub use infra::{OutputRecord, OutputSink};
pub use notification::{
    validate, Action, ActionInputs, BackendError, ChannelKind, MessageFormatter,
    NotificationBuilder, NotificationChannel, NotificationDispatcher, NotifyError,
    ValidationError,
};
