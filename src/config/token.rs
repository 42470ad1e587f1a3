// src/config/token.rs

use crate::{
    config::ExternalConfig, // 只需要从父模块导入结构体定义
    constants,
    error::{AppError, AppResult, ResolveError},
};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// 为 API 请求提供 Bearer Token。
/// 以接口形式注入，Token 的来源与轮换交由配置决定，而不是写死在代码里。
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> Result<String, ResolveError>;
}

/// 持有一个固定 Token 的提供者 (来自命令行、环境变量或配置文件)
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        let token = token.filter(|t| !t.is_empty());
        if let Some(expiry) = token.as_deref().and_then(jwt_expiry) {
            if expiry <= Utc::now() {
                warn!("Access Token 已于 {} 过期，API 请求很可能会被拒绝", expiry);
            } else {
                debug!("Access Token 有效期至 {}", expiry);
            }
        }
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<String, ResolveError> {
        self.token.clone().ok_or(ResolveError::TokenMissing)
    }
}

/// 读取 JWT 载荷中的 `exp` 声明，仅用于诊断。无法解析时返回 None。
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

pub(crate) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config(config_path: &Path) -> AppResult<ExternalConfig> {
    if config_path.is_file() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(config_path, json_content)?;

        Ok(config)
    }
}

/// 按 命令行参数 > 环境变量 > 配置文件 的顺序查找 Token，返回 Token 及其来源描述
pub fn resolve_token(cli_token: Option<&str>, file_token: Option<&str>) -> (Option<String>, String) {
    if let Some(token) = cli_token && !token.is_empty() {
        debug!("使用来自命令行参数的 Token");
        return (Some(token.to_string()), "命令行参数".to_string());
    }
    if let Ok(token) = std::env::var(constants::TOKEN_ENV_VAR) && !token.is_empty() {
        debug!("使用来自环境变量 {} 的 Token", constants::TOKEN_ENV_VAR);
        return (
            Some(token),
            format!("环境变量 ({})", constants::TOKEN_ENV_VAR),
        );
    }
    if let Some(token) = file_token && !token.is_empty() {
        debug!("使用来自本地配置文件的 Token");
        return (Some(token.to_string()), "本地配置文件".to_string());
    }
    debug!("未在任何位置找到可用的 Token");
    (None, "未找到".to_string())
}
