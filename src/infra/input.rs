//! 环境变量输入读取
//!
//! CI 运行器把 action 参数以 `INPUT_<UPPER_SNAKE_NAME>` 形式注入环境变量，
//! 这里统一去掉前缀并转为小写：`INPUT_API_KEY` → `api_key`。

use std::collections::HashMap;
use tracing::{debug, warn};

/// 默认环境变量前缀
pub const DEFAULT_INPUT_PREFIX: &str = "INPUT_";

/// 从当前进程环境读取所有带前缀的变量
///
/// 非 UTF-8 的变量直接忽略。
pub fn read_inputs(prefix: &str) -> HashMap<String, String> {
    let vars = std::env::vars_os().filter_map(|(key, value)| {
        Some((key.into_string().ok()?, value.into_string().ok()?))
    });
    read_inputs_from(prefix, vars)
}

/// 从任意键值迭代器读取带前缀的变量（便于测试，不触碰进程环境）
pub fn read_inputs_from<I, K, V>(prefix: &str, vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut inputs = HashMap::new();
    for (key, value) in vars {
        let Some(name) = key.as_ref().strip_prefix(prefix) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        inputs.insert(name.to_lowercase(), value.into());
    }
    debug!(count = inputs.len(), prefix, "Read action inputs from environment");
    inputs
}

/// 加载工作目录下的 `.env`（本地调试用）
///
/// 文件不存在不算错误。
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => debug!(".env file doesn't exist"),
        Err(e) => warn!(error = %e, "Failed to load .env file"),
    }
}

/// 解析布尔值，接受的写法与常见 CI 约定一致
///
/// 无法识别时返回 `None`，由调用方决定默认值。
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
