// src/models/api.rs

use serde::Deserialize;

// --- 单条媒体 (/v2/gifs/{id}) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct GifResponse {
    pub gif: GifRecord,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GifRecord {
    #[serde(rename = "type")]
    pub type_code: i64,
    #[serde(default)]
    pub urls: Option<MediaUrls>,
    #[serde(default)]
    pub gallery: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct MediaUrls {
    pub hd: Option<String>,
    pub sd: Option<String>,
}

// --- 相册 (/v2/gallery/{id}) API 响应结构体 ---

#[derive(Deserialize, Debug, Clone)]
pub struct GalleryResponse {
    pub gifs: Vec<GalleryMember>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GalleryMember {
    pub urls: GalleryMemberUrls,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GalleryMemberUrls {
    pub hd: String,
}
