// src/extractor/media_id.rs

use crate::{error::ResolveError, models::MediaId};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;
use url::{ParseError, Url};

// 末段路径: ID 本体 + 可选的文件扩展名
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<id>[A-Za-z0-9-]+)(?:\..*)?$").unwrap());

const MOBILE_SUFFIX: &str = "-mobile";

// 允许省略协议，例如 "redgifs.com/watch/abc123"
fn parse_post_url(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", url)).ok(),
        Err(_) => None,
    }
}

/// 从帖子链接中提取媒体 ID。
///
/// 支持的形式: `.../abc123`、`.../abc123/`、`.../abc123-mobile`、
/// 带查询参数、片段或扩展名的链接。结果总是小写且非空。
pub fn extract_media_id(url: &str) -> Result<MediaId, ResolveError> {
    let malformed = || ResolveError::MalformedUrl {
        url: url.to_string(),
    };

    let parsed = parse_post_url(url.trim()).ok_or_else(malformed)?;
    let path = parsed.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    let segment = path.rsplit('/').next().unwrap_or_default();

    let id = SEGMENT_RE
        .captures(segment)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str().to_lowercase())
        .ok_or_else(malformed)?;

    let id = id.strip_suffix(MOBILE_SUFFIX).unwrap_or(&id);
    if id.is_empty() {
        return Err(malformed());
    }

    debug!("从 '{}' 中提取到媒体 ID: {}", url, id);
    Ok(MediaId::new_unchecked(id.to_string()))
}
