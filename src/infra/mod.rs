//! 基础设施层 - 环境变量输入、输出记录

pub mod input;
pub mod output;

pub use input::{load_dotenv, parse_bool, read_inputs, read_inputs_from, DEFAULT_INPUT_PREFIX};
pub use output::{OutputRecord, OutputSink};
