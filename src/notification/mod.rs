//! 通知层 - 输入模型、校验、消息格式化与后端分发
//!
//! # 流程
//! 1. `ActionInputs::from_map` 构造输入
//! 2. `validate` 校验必填字段
//! 3. `NotificationBuilder` 按 channel 创建后端客户端
//! 4. `NotificationDispatcher::dispatch` 执行 send / update 并返回输出
//!
//! # 使用示例
//! ```ignore
//! use ci_notifier::notification::{validate, ActionInputs, NotificationBuilder};
//!
//! validate(&inputs)?;
//! let dispatcher = NotificationBuilder::new().build(inputs.channel_kind()?, &inputs.api_key)?;
//! let outputs = dispatcher.dispatch(&inputs)?;
//! ```

pub mod builder;
pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod formatter;
pub mod inputs;
pub mod validate;

pub use builder::{init_client, NotificationBuilder};
pub use channel::{BackendError, ChannelCapabilities, NotificationChannel, SentMessage};
pub use channels::ClientConfig;
pub use dispatcher::{NotificationDispatcher, NotifyError, OUTPUT_CHANNEL_ID, OUTPUT_MESSAGE_ID};
pub use formatter::{msg, MessageFormatter};
pub use inputs::{Action, ActionInputs, ChannelKind};
pub use validate::{validate, ValidationError};
