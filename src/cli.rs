// src/cli.rs

use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// 解析结果的输出格式
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// 每行一个直链
    Text,
    /// JSON 数组，包含来源链接与扩展名
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["interactive", "url", "batch_file", "token_help"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 启动交互式会话，逐一输入链接
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub interactive: bool,
    /// 指定要解析的单个帖子链接
    #[arg(long, help_heading = "Mode")]
    pub url: Option<String>,
    /// 从文本文件批量解析多个链接 (每行一个)
    #[arg(short, long, value_name = "FILE", help_heading = "Mode")]
    pub batch_file: Option<PathBuf>,
    /// 显示如何获取 Access Token 的指南并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub token_help: bool,

    // --- 选项 (Options) ---
    /// 提供访问令牌 (Access Token)，优先级最高
    #[arg(long, help_heading = "Options")]
    pub token: Option<String>,
    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub format: OutputFormat,
    /// 指定配置文件路径 (默认: ~/.redgifs-dl/config.json)
    #[arg(short, long, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
