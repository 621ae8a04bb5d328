//! 具体渠道实现

pub mod slack;
pub mod telegram;

pub use slack::SlackChannel;
pub use telegram::TelegramChannel;

use std::time::Duration;

/// HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Slack Web API 基础 URL
    pub slack_api_base: String,
    /// Telegram Bot API 基础 URL
    pub telegram_api_base: String,
    /// 单次请求超时
    pub timeout: Duration,
    /// 不使用系统代理
    pub no_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            slack_api_base: slack::SLACK_API_BASE.to_string(),
            telegram_api_base: telegram::TELEGRAM_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
            no_proxy: false,
        }
    }
}

/// 构造阻塞 HTTP 客户端
pub(crate) fn http_client(config: &ClientConfig) -> reqwest::Result<reqwest::blocking::Client> {
    let mut builder = reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("ci-notifier/", env!("CARGO_PKG_VERSION")));
    if config.no_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}
