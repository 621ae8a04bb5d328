//! notify 命令处理
//!
//! 读取输入 → 校验 → 分发到后端 → 写出输出，任何一步失败都直接返回错误。

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::infra::{load_dotenv, read_inputs, OutputRecord, OutputSink, DEFAULT_INPUT_PREFIX};
use crate::notification::channels::slack::SLACK_API_BASE;
use crate::notification::channels::telegram::TELEGRAM_API_BASE;
use crate::notification::{
    validate, ActionInputs, BackendError, ClientConfig, NotificationBuilder,
    NotificationDispatcher, NotifyError, ValidationError,
};

/// notify 命令参数
#[derive(Args, Debug, Clone)]
pub struct NotifyArgs {
    /// 输入环境变量前缀
    #[arg(long, default_value = DEFAULT_INPUT_PREFIX)]
    pub env_prefix: String,

    /// 输出文件（默认 GITHUB_OUTPUT，未设置则打印到控制台）
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,

    /// 不加载 .env 文件
    #[arg(long)]
    pub no_dotenv: bool,

    /// HTTP 请求超时（秒）
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Slack Web API 基础 URL
    #[arg(long, default_value = SLACK_API_BASE)]
    pub slack_api_url: String,

    /// Telegram Bot API 基础 URL
    #[arg(long, default_value = TELEGRAM_API_BASE)]
    pub telegram_api_url: String,

    /// 忽略 HTTP(S)_PROXY 环境变量
    #[arg(long)]
    pub no_proxy: bool,
}

impl NotifyArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            slack_api_base: self.slack_api_url.clone(),
            telegram_api_base: self.telegram_api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            no_proxy: self.no_proxy,
        }
    }

    pub fn output_sink(&self) -> OutputSink {
        OutputSink::from_path(self.output_file.clone())
    }
}

/// 处理 notify 命令
pub fn handle_notify(args: NotifyArgs) -> Result<()> {
    if !args.no_dotenv {
        load_dotenv();
    }

    let inputs = ActionInputs::from_map(&read_inputs(&args.env_prefix));
    validate(&inputs)?;

    let dispatcher = NotificationBuilder::new()
        .client_config(args.client_config())
        .dry_run(args.dry_run)
        .build_for(&inputs)
        .map_err(unwrap_notify_error)?;

    run_notify(&inputs, &dispatcher, &args.output_sink())?;
    Ok(())
}

/// 分发并写出输出
///
/// 输出只在分发成功后写出一次；dry-run 不写出。
pub fn run_notify(
    inputs: &ActionInputs,
    dispatcher: &NotificationDispatcher,
    sink: &OutputSink,
) -> Result<OutputRecord> {
    let record = dispatcher.dispatch(inputs).map_err(unwrap_notify_error)?;

    if dispatcher.is_dry_run() {
        info!("Dry-run finished, no outputs written");
        return Ok(record);
    }

    sink.flush(&record)?;
    Ok(record)
}

// 保留内层错误类型，log_failure 靠 downcast 区分
fn unwrap_notify_error(err: NotifyError) -> anyhow::Error {
    match err {
        NotifyError::Validation(e) => anyhow::Error::new(e),
        NotifyError::Backend(e) => anyhow::Error::new(e),
    }
}

/// 每个失败只输出一行结构化日志
pub fn log_failure(err: &anyhow::Error) {
    if let Some(e) = err.downcast_ref::<ValidationError>() {
        error!(field = e.field(), error = %e, "Invalid inputs");
    } else if let Some(e) = err.downcast_ref::<BackendError>() {
        error!(channel = %e.channel(), operation = e.operation(), error = %e, "Notification failed");
    } else {
        error!(error = %format!("{:#}", err), "Notification failed");
    }
}
