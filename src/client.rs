// src/client.rs

use crate::{
    config::AppConfig,
    error::{AppResult, ResolveError},
};
use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client })
    }

    /// 发起 GET 请求并以文本形式读取响应体。非 2xx 状态码视为失败。
    pub async fn get_text(&self, url: &str, headers: HeaderMap) -> Result<String, ResolveError> {
        debug!("GET {}", url);
        let res = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|source| ResolveError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(ResolveError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        res.text().await.map_err(|e| ResolveError::Transport {
            url: url.to_string(),
            source: reqwest_middleware::Error::Reqwest(e),
        })
    }

    pub async fn get_json(&self, url: &str, headers: HeaderMap) -> Result<Value, ResolveError> {
        let body = self.get_text(url, headers).await?;
        serde_json::from_str(&body).map_err(|source| ResolveError::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }

    /// 用 HEAD 请求检查地址是否可用，不下载内容。任何传输错误都视为不可用。
    pub async fn is_available(&self, url: &str, headers: HeaderMap) -> bool {
        match self.client.head(url).headers(headers).send().await {
            Ok(res) => {
                debug!("检查 '{}' 响应状态码: {}", url, res.status());
                res.status().is_success()
            }
            Err(e) => {
                warn!("检查 '{}' 失败: {}", url, e);
                false
            }
        }
    }
}

/// 用参数替换模板中的 `{key}` 占位符
pub fn fill_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut url = template.to_string();
    for (key, val) in params {
        url = url.replace(&format!("{{{}}}", key), val);
    }
    url
}
