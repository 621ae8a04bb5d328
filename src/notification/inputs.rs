//! Action 输入模型
//!
//! 所有参数在进程启动时一次性读取，之后只读。Slack 与 Telegram 共用同一组
//! `api_key` / `channel_id` 字段，由 `channel` 决定目标后端。

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::validate::ValidationError;
use crate::infra::parse_bool;

/// 请求的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 发送新消息
    Send,
    /// 在已有消息后追加内容
    Update,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Send => "send",
            Action::Update => "update",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send" => Ok(Action::Send),
            "update" => Ok(Action::Update),
            other => Err(ValidationError::InvalidAction(other.to_string())),
        }
    }
}

/// 目标消息后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Slack,
    Telegram,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Slack => "slack",
            ChannelKind::Telegram => "telegram",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = ValidationError;

    /// 大小写不敏感
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slack" => Ok(ChannelKind::Slack),
            "telegram" => Ok(ChannelKind::Telegram),
            _ => Err(ValidationError::UnsupportedChannel(s.to_string())),
        }
    }
}

/// 通知 action 的全部输入参数
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ActionInputs {
    /// 必填：send / update（已转小写）
    pub action: String,
    /// 必填：slack / telegram（已去空白、转小写）
    pub channel: String,
    /// 必填：消息内容
    pub message: String,
    /// 必填：所选后端的凭据
    pub api_key: String,
    /// 必填：Slack channel ID 或 Telegram chat ID
    pub channel_id: String,
    /// update 时必填：要追加的消息 ID
    pub msg_id: String,
    /// 是否附带提交信息
    pub add_commit_info: bool,
    pub commit_sha: String,
    pub branch: String,
    pub author: String,
    pub commit_time: String,
    pub commit_msg: String,
    pub workflow_name: String,
    pub image_tag: String,
}

impl ActionInputs {
    /// 从 `read_inputs` 得到的映射构造
    ///
    /// `add_commit_info` 无法解析时保持默认 `false`。
    pub fn from_map(inputs: &HashMap<String, String>) -> Self {
        let get = |key: &str| inputs.get(key).cloned().unwrap_or_default();

        Self {
            action: get("action").trim().to_lowercase(),
            channel: get("channel").trim().to_lowercase(),
            message: get("message"),
            api_key: get("api_key"),
            channel_id: get("channel_id"),
            msg_id: get("msgid"),
            add_commit_info: inputs
                .get("add_commit_info")
                .and_then(|raw| parse_bool(raw))
                .unwrap_or(false),
            commit_sha: get("commit_sha"),
            branch: get("branch"),
            author: get("author"),
            commit_time: get("commit_time"),
            commit_msg: get("commit_msg"),
            workflow_name: get("workflow_name"),
            image_tag: get("image_tag"),
        }
    }

    pub fn action_kind(&self) -> Result<Action, ValidationError> {
        self.action.parse()
    }

    pub fn channel_kind(&self) -> Result<ChannelKind, ValidationError> {
        if self.channel.is_empty() {
            return Err(ValidationError::MissingChannel);
        }
        self.channel.parse()
    }
}

// api_key 不能出现在日志里
impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "***" };
        f.debug_struct("ActionInputs")
            .field("action", &self.action)
            .field("channel", &self.channel)
            .field("message", &self.message)
            .field("api_key", &api_key)
            .field("channel_id", &self.channel_id)
            .field("msg_id", &self.msg_id)
            .field("add_commit_info", &self.add_commit_info)
            .field("commit_sha", &self.commit_sha)
            .field("branch", &self.branch)
            .field("author", &self.author)
            .field("commit_time", &self.commit_time)
            .field("commit_msg", &self.commit_msg)
            .field("workflow_name", &self.workflow_name)
            .field("image_tag", &self.image_tag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_map_normalizes_action_and_channel() {
        let inputs = ActionInputs::from_map(&map(&[
            ("action", " SEND "),
            ("channel", " Slack\n"),
            ("message", " keep spaces "),
        ]));

        assert_eq!(inputs.action, "send");
        assert_eq!(inputs.channel, "slack");
        assert_eq!(inputs.message, " keep spaces ");
    }

    #[test]
    fn test_from_map_reads_all_fields() {
        let inputs = ActionInputs::from_map(&map(&[
            ("action", "update"),
            ("channel", "slack"),
            ("message", "Updated"),
            ("api_key", "xoxb-1"),
            ("channel_id", "C123"),
            ("msgid", "1700000000.000100"),
            ("add_commit_info", "true"),
            ("commit_sha", "abc123"),
            ("branch", "main"),
            ("author", "octocat"),
            ("commit_time", "2024-01-01"),
            ("commit_msg", "fix bug"),
            ("workflow_name", "CI"),
            ("image_tag", "v1.0"),
        ]));

        assert_eq!(inputs.action_kind(), Ok(Action::Update));
        assert_eq!(inputs.channel_kind(), Ok(ChannelKind::Slack));
        assert_eq!(inputs.api_key, "xoxb-1");
        assert_eq!(inputs.channel_id, "C123");
        assert_eq!(inputs.msg_id, "1700000000.000100");
        assert!(inputs.add_commit_info);
        assert_eq!(inputs.commit_sha, "abc123");
        assert_eq!(inputs.branch, "main");
        assert_eq!(inputs.author, "octocat");
        assert_eq!(inputs.commit_time, "2024-01-01");
        assert_eq!(inputs.commit_msg, "fix bug");
        assert_eq!(inputs.workflow_name, "CI");
        assert_eq!(inputs.image_tag, "v1.0");
    }

    #[test]
    fn test_unparsable_add_commit_info_defaults_false() {
        let inputs = ActionInputs::from_map(&map(&[("add_commit_info", "yes please")]));
        assert!(!inputs.add_commit_info);

        let inputs = ActionInputs::from_map(&map(&[]));
        assert!(!inputs.add_commit_info);
    }

    #[test]
    fn test_channel_kind_parse() {
        assert_eq!("TELEGRAM".parse::<ChannelKind>(), Ok(ChannelKind::Telegram));
        assert_eq!(
            "discord".parse::<ChannelKind>(),
            Err(ValidationError::UnsupportedChannel("discord".to_string()))
        );
        assert_eq!(
            ActionInputs::default().channel_kind(),
            Err(ValidationError::MissingChannel)
        );
    }

    #[test]
    fn test_action_parse_is_exact() {
        assert_eq!("send".parse::<Action>(), Ok(Action::Send));
        assert_eq!(
            "delete".parse::<Action>(),
            Err(ValidationError::InvalidAction("delete".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let inputs = ActionInputs {
            api_key: "xoxb-secret".to_string(),
            ..Default::default()
        };
        let printed = format!("{:?}", inputs);
        assert!(!printed.contains("xoxb-secret"));
        assert!(printed.contains("***"));
    }
}
