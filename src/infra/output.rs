//! 输出记录 - 写入 `GITHUB_OUTPUT` 或打印到控制台

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 按插入顺序保存的输出键值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRecord {
    entries: Vec<(String, String)>,
}

impl OutputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加输出；同名 key 原位覆盖
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 以 `key=value` 行写出
    pub fn write_lines<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (key, value) in self.iter() {
            writeln!(writer, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// 输出目的地
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// 追加写入文件（GitHub Actions 的 `GITHUB_OUTPUT`）
    File(PathBuf),
    /// 不在 CI 中运行时打印到标准输出
    Console,
}

impl OutputSink {
    /// 空路径视为未设置
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) if !p.as_os_str().is_empty() => OutputSink::File(p),
            _ => OutputSink::Console,
        }
    }

    /// 一次性写出全部输出
    pub fn flush(&self, record: &OutputRecord) -> Result<()> {
        match self {
            OutputSink::File(path) => {
                let mut file = open_append(path)
                    .with_context(|| format!("Error opening output file {}", path.display()))?;
                record
                    .write_lines(&mut file)
                    .with_context(|| format!("Error writing output file {}", path.display()))?;
                info!(path = %path.display(), count = record.len(), "Outputs written");
            }
            OutputSink::Console => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "Outputs:")?;
                record.write_lines(&mut out)?;
            }
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}
