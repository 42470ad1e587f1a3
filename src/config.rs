// src/config.rs

pub mod token;

use self::token::load_or_create_external_config;
use crate::{cli::Cli, constants, error::AppResult};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    /// 传输层对瞬时错误的重试次数。解析流程本身从不重试。
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_gif_template")]
    pub gif_template: String,
    #[serde(default = "default_gallery_template")]
    pub gallery_template: String,
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_origin")]
    pub origin: String,
}

// --- 为上面的 serde default 添加辅助函数 ---
fn default_gif_template() -> String {
    constants::api::GIF_TEMPLATE.to_string()
}

fn default_gallery_template() -> String {
    constants::api::GALLERY_TEMPLATE.to_string()
}

fn default_referer() -> String {
    constants::api::REFERER.to_string()
}

fn default_origin() -> String {
    constants::api::ORIGIN.to_string()
}

fn default_cdn_rewrites() -> Vec<(String, String)> {
    constants::CDN_SUBDOMAIN_REWRITES
        .iter()
        .map(|(old, new)| (old.to_string(), new.to_string()))
        .collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gif_template: default_gif_template(),
            gallery_template: default_gallery_template(),
            referer: default_referer(),
            origin: default_origin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default = "default_cdn_rewrites")]
    pub cdn_rewrites: Vec<(String, String)>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        let network_config = NetworkConfig {
            connect_timeout_secs: Some(10),
            timeout_secs: Some(30),
            max_retries: Some(0),
        };

        Self {
            accesstoken: None,
            network: network_config,
            api: ApiConfig::default(),
            cdn_rewrites: default_cdn_rewrites(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub api: ApiConfig,
    pub cdn_rewrites: Vec<(String, String)>,
    /// 配置文件中保存的 Token，仅作为 Token 解析链的最后一环
    pub file_token: Option<String>,
    pub config_path: PathBuf,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let config_path = match &args.config {
            Some(path) => path.clone(),
            None => token::get_config_path()?,
        };
        let external_config = load_or_create_external_config(&config_path)?;
        Ok(Self::from_external(external_config, config_path))
    }

    pub fn from_external(external_config: ExternalConfig, config_path: PathBuf) -> Self {
        Self {
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                external_config.network.connect_timeout_secs.unwrap_or(10),
            ),
            timeout: Duration::from_secs(external_config.network.timeout_secs.unwrap_or(30)),
            max_retries: external_config.network.max_retries.unwrap_or(0),
            api: external_config.api,
            cdn_rewrites: external_config.cdn_rewrites,
            file_token: external_config.accesstoken.filter(|t| !t.is_empty()),
            config_path,
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            api: ApiConfig::default(),
            cdn_rewrites: default_cdn_rewrites(),
            file_token: None,
            config_path: PathBuf::from(constants::CONFIG_FILE_NAME),
        }
    }
}
