//! 消息格式化模块 - 组装发往聊天渠道的 CI 状态消息
//!
//! 消息结构：
//! 1. 固定标题行 `📦 *Github Workflow*`
//! 2. 提交信息块（可选，`add_commit_info = true` 时按固定顺序输出非空字段）
//! 3. 尾行 ` - *<message>*- <timestamp>`
//!
//! update 时不再生成标题，只把尾行追加到原消息后面。

use chrono::{DateTime, Utc};

use super::inputs::ActionInputs;

/// 消息模板常量（Slack / Telegram 共用 `*bold*` 与 `` `code` `` 语法）
pub mod msg {
    pub const PREAMBLE: &str = "📦 *Github Workflow*\n\n";

    pub const COMMIT: &str = "📌 *Commit:*";
    pub const BRANCH: &str = "🔖 *Branch:*";
    pub const WORKFLOW: &str = "🛠️ *Workflow:*";
    pub const COMMIT_MESSAGE: &str = "📝 *Message:*";
    pub const AUTHOR: &str = "👤 *Author:*";
    pub const IMAGE_TAG: &str = "🐳 *Image Tag:*";
    pub const COMMIT_TIME: &str = "🕗 *Commit Time:*";

    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
}

/// 消息格式化器
///
/// 默认取调用时刻的 UTC 时间；`at()` 固定时钟，便于比较字面量。
#[derive(Debug, Clone, Default)]
pub struct MessageFormatter {
    now: Option<DateTime<Utc>>,
}

impl MessageFormatter {
    pub fn new() -> Self {
        Self { now: None }
    }

    /// 使用固定时间
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Some(now) }
    }

    fn timestamp(&self) -> String {
        self.now
            .unwrap_or_else(Utc::now)
            .format(msg::TIMESTAMP_FORMAT)
            .to_string()
    }

    /// 提交信息块：标题 + 每个非空字段一行 + 空行
    pub fn compose_header(&self, inputs: &ActionInputs) -> String {
        let mut header = String::from(msg::PREAMBLE);

        let code = |label: &str, value: &str| format!("{} `{}`\n", label, value);
        let plain = |label: &str, value: &str| format!("{} {}\n", label, value);

        let lines = [
            (&inputs.commit_sha, code(msg::COMMIT, &inputs.commit_sha)),
            (&inputs.branch, code(msg::BRANCH, &inputs.branch)),
            (&inputs.workflow_name, code(msg::WORKFLOW, &inputs.workflow_name)),
            (&inputs.commit_msg, plain(msg::COMMIT_MESSAGE, &inputs.commit_msg)),
            (&inputs.author, plain(msg::AUTHOR, &inputs.author)),
            (&inputs.image_tag, plain(msg::IMAGE_TAG, &inputs.image_tag)),
            (&inputs.commit_time, plain(msg::COMMIT_TIME, &inputs.commit_time)),
        ];
        for (value, line) in lines {
            if !value.is_empty() {
                header.push_str(&line);
            }
        }

        header.push('\n');
        header
    }

    /// send 消息：标题（含提交信息时为完整信息块）+ 尾行
    pub fn compose_send_message(&self, inputs: &ActionInputs) -> String {
        let mut message = if inputs.add_commit_info {
            self.compose_header(inputs)
        } else {
            msg::PREAMBLE.to_string()
        };
        message.push_str(&self.compose_update_trailer(inputs));
        message
    }

    /// 尾行：` - *<message>*- <timestamp>\n`
    pub fn compose_update_trailer(&self, inputs: &ActionInputs) -> String {
        format!(" - *{}*- {}\n", inputs.message, self.timestamp())
    }
}
