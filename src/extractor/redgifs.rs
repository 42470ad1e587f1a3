// src/extractor/redgifs.rs

use super::{ResourceExtractor, api::RedgifsApi, media_id::extract_media_id, normalize};
use crate::{
    client::RobustClient,
    config::{AppConfig, token::TokenProvider},
    error::*,
    models::{MediaItem, ResolvedLinks, Resource},
};
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

pub struct RedgifsExtractor {
    api: RedgifsApi,
    cdn_rewrites: Vec<(String, String)>,
}

impl RedgifsExtractor {
    pub fn new(
        http_client: Arc<RobustClient>,
        config: Arc<AppConfig>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            api: RedgifsApi::new(http_client, config.api.clone(), token_provider),
            cdn_rewrites: config.cdn_rewrites.clone(),
        }
    }

    /// 完整的解析流程: 提取 ID -> 查询记录 -> 按类型展开 -> 规范化 CDN 子域名。
    /// 任一步失败都直接返回错误，不会返回部分结果。
    pub async fn resolve_links(&self, post_url: &str) -> Result<ResolvedLinks, ResolveError> {
        let id = extract_media_id(post_url)?;
        let item = self.api.fetch_item(&id).await?;
        let links = self.resolve_item(item).await?;
        Ok(normalize::normalize_links(links, self.cdn_rewrites.as_slice()))
    }

    pub async fn resolve_item(&self, item: MediaItem) -> Result<ResolvedLinks, ResolveError> {
        match item {
            MediaItem::Video { hd, sd } => {
                if self.api.hd_available(&hd).await? {
                    debug!("HD 地址可用: {}", hd);
                    Ok(ResolvedLinks::from([hd]))
                } else {
                    info!("HD 地址 '{}' 不可用，回退到 SD", hd);
                    let sd = sd.ok_or(SchemaError::MissingField("gif.urls.sd"))?;
                    Ok(ResolvedLinks::from([sd]))
                }
            }
            MediaItem::Image { hd } => Ok(ResolvedLinks::from([hd])),
            MediaItem::Gallery { gallery_id } => self.expand_gallery(&gallery_id).await,
        }
    }

    /// 每个相册成员对应一个 HD 地址，成员本身不会再是相册
    pub async fn expand_gallery(&self, gallery_id: &str) -> Result<ResolvedLinks, ResolveError> {
        let gallery = self.api.fetch_gallery(gallery_id).await?;
        Ok(gallery.members.into_iter().collect())
    }
}

#[async_trait]
impl ResourceExtractor for RedgifsExtractor {
    async fn find_resources(&self, post_url: &str) -> AppResult<Vec<Resource>> {
        info!("使用 RedgifsExtractor 解析链接: {}", post_url);
        let links = self.resolve_links(post_url).await?;
        info!("链接 '{}' 解析出 {} 个资源", post_url, links.len());
        Ok(links
            .into_iter()
            .map(|url| Resource::new(post_url, url))
            .collect())
    }
}
