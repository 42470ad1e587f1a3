// src/models/mod.rs

pub mod api;

use crate::{
    constants::api::media_types,
    error::SchemaError,
};
use serde::Serialize;
use std::{collections::BTreeSet, fmt};
use url::Url;

/// 解析结果: 一组去重后的直链，顺序无关
pub type ResolvedLinks = BTreeSet<String>;

/// 平台上唯一标识一个媒体条目的 ID (小写，不含 "-mobile" 后缀)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaId(String);

impl MediaId {
    /// 只由 `extractor::media_id` 在校验之后构造
    pub(crate) fn new_unchecked(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// API 中 `gif.type` 的取值，只接受已知的两种
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Video,
    Image,
}

impl TryFrom<i64> for MediaType {
    type Error = SchemaError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            media_types::VIDEO => Ok(MediaType::Video),
            media_types::IMAGE => Ok(MediaType::Image),
            other => Err(SchemaError::UnsupportedMediaType(other)),
        }
    }
}

/// 经过校验的单条媒体记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    /// `sd` 只在 HD 地址不可用时才需要
    Video { hd: String, sd: Option<String> },
    Image { hd: String },
    Gallery { gallery_id: String },
}

impl TryFrom<api::GifRecord> for MediaItem {
    type Error = SchemaError;

    fn try_from(record: api::GifRecord) -> Result<Self, Self::Error> {
        // 先检查类型代码，未知类型不再查看其余字段
        let media_type = MediaType::try_from(record.type_code)?;
        let urls = record.urls.unwrap_or_default();

        match media_type {
            MediaType::Video => Ok(MediaItem::Video {
                hd: urls.hd.ok_or(SchemaError::MissingField("gif.urls.hd"))?,
                sd: urls.sd,
            }),
            MediaType::Image => match record.gallery.filter(|g| !g.is_empty()) {
                Some(gallery_id) => Ok(MediaItem::Gallery { gallery_id }),
                None => Ok(MediaItem::Image {
                    hd: urls.hd.ok_or(SchemaError::MissingField("gif.urls.hd"))?,
                }),
            },
        }
    }
}

/// 一个相册及其成员的 HD 地址 (保持 API 返回的顺序)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRecord {
    pub id: String,
    pub members: Vec<String>,
}

impl GalleryRecord {
    pub fn from_response(id: &str, response: api::GalleryResponse) -> Self {
        Self {
            id: id.to_string(),
            members: response.gifs.into_iter().map(|g| g.urls.hd).collect(),
        }
    }
}

/// 交给下载调度方的资源描述: 来源帖子 + 一个可直接下载的地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub source_url: String,
    pub url: String,
    pub extension: Option<String>,
}

impl Resource {
    pub fn new(source_url: &str, url: String) -> Self {
        let extension = extension_from_url(&url);
        Self {
            source_url: source_url.to_string(),
            url,
            extension,
        }
    }
}

fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.next_back()?;
    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
