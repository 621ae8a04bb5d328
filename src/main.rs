//! CI Notifier CLI
//!
//! 在 CI 流水线中发送 / 更新 Slack、Telegram 通知。参数来自 `INPUT_*` 环境变量，
//! 结果（message_id、channel_id）写入 `GITHUB_OUTPUT`。

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};
use ci_notifier::cli::{handle_notify, log_failure, NotifyArgs};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ci-notify")]
#[command(about = "CI Notifier - 在 Slack / Telegram 上发送或更新 CI/CD 状态消息")]
#[command(version)]
struct Cli {
    /// 日志格式
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(flatten)]
    notify: NotifyArgs,
}

fn main() {
    let cli = Cli::parse();

    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug ci-notify
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ci_notifier=info,ci_notify=info"));

    let builder = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    if let Err(e) = handle_notify(cli.notify) {
        log_failure(&e);
        std::process::exit(1);
    }
}
