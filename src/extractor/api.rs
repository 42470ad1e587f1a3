// src/extractor/api.rs

use crate::{
    client::{RobustClient, fill_template},
    config::{ApiConfig, token::TokenProvider},
    error::{ResolveError, SchemaError},
    models::{
        GalleryRecord, MediaId, MediaItem,
        api::{GalleryResponse, GifResponse},
    },
};
use log::{debug, info, warn};
use reqwest::{
    StatusCode,
    header::{
        AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue, ORIGIN, REFERER,
    },
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// RedGIFs API 的薄封装: 负责拼接端点、附加请求头以及把 JSON 映射为领域类型
pub struct RedgifsApi {
    http_client: Arc<RobustClient>,
    api: ApiConfig,
    token_provider: Arc<dyn TokenProvider>,
}

impl RedgifsApi {
    pub fn new(
        http_client: Arc<RobustClient>,
        api: ApiConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            http_client,
            api,
            token_provider,
        }
    }

    fn base_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&self.api.referer) {
            headers.insert(REFERER, v);
        }
        if let Ok(v) = HeaderValue::from_str(&self.api.origin) {
            headers.insert(ORIGIN, v);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn auth_headers(&self) -> Result<HeaderMap, ResolveError> {
        let token = self.token_provider.get_token().await?;
        let mut headers = self.base_headers();
        let value = bearer(&token).map_err(|_| ResolveError::TokenInvalid)?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    pub async fn fetch_item(&self, id: &MediaId) -> Result<MediaItem, ResolveError> {
        let url = fill_template(&self.api.gif_template, &[("id", id.as_str())]);
        let headers = self.auth_headers().await?;
        let value = self
            .http_client
            .get_json(&url, headers)
            .await
            .map_err(token_rejection)?;
        let response: GifResponse = decode(value)?;
        let item = MediaItem::try_from(response.gif)?;
        debug!("媒体 '{}' 的记录: {:?}", id, item);
        Ok(item)
    }

    /// 相册接口不附带 Authorization 头
    // TODO: 确认相册接口是否同样需要认证，需要的话改用 auth_headers
    pub async fn fetch_gallery(&self, gallery_id: &str) -> Result<GalleryRecord, ResolveError> {
        let url = fill_template(&self.api.gallery_template, &[("gallery_id", gallery_id)]);
        let value = self.http_client.get_json(&url, self.base_headers()).await?;
        let response: GalleryResponse = decode(value)?;
        let record = GalleryRecord::from_response(gallery_id, response);
        info!("相册 '{}' 共有 {} 个成员", gallery_id, record.members.len());
        Ok(record)
    }

    /// 检查 HD 地址是否真的可用，使用与单条查询相同的请求头
    pub async fn hd_available(&self, url: &str) -> Result<bool, ResolveError> {
        let headers = self.auth_headers().await?;
        Ok(self.http_client.is_available(url, headers).await)
    }
}

fn bearer(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// 只有携带了 Token 的请求，401/403 才意味着 Token 有问题
fn token_rejection(err: ResolveError) -> ResolveError {
    match err {
        ResolveError::HttpStatus { url, status }
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
        {
            warn!("请求 '{}' 被拒绝，状态码 {}", url, status);
            ResolveError::TokenInvalid
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SchemaError> {
    serde_json::from_value(value).map_err(|e| SchemaError::Mismatch(e.to_string()))
}
