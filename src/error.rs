// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

/// 解析流水线中的所有失败。调用方只需把它当作“解析失败”这一类错误处理。
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("无法从 '{url}' 中提取媒体 ID")]
    MalformedUrl { url: String },
    #[error("请求 '{url}' 未获得响应: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("服务器对 '{url}' 返回了错误状态码 {status}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("未提供 Access Token，无法访问 API")]
    TokenMissing,
    #[error("认证失败 (Token 无效或已过期)")]
    TokenInvalid,
    #[error("来自 '{url}' 的数据不是有效的 JSON: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("无法识别的 API 数据结构: {0}")]
    Schema(#[from] SchemaError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{0}")]
    Mismatch(String),
    #[error("缺少字段 '{0}'")]
    MissingField(&'static str),
    #[error("不支持的媒体类型代码 {0}")]
    UnsupportedMediaType(i64),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("解析失败: {0}")]
    Resolve(#[from] ResolveError),
    #[error("网络客户端初始化失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
